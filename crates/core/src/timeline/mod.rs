//! Frame timing: the planner that derives block size and frame interval from
//! audio metadata, and the scheduler that paces frames against a clock.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{
    analysis::{Frame, FrameBuilder},
    render::TerminalRenderer,
    Result, VisualizerConfig, VisualizerError,
};

/// Parameters derived once per run from the audio metadata and output shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPlan {
    /// Number of samples in the run.
    pub length: usize,
    /// Samples averaged into one column.
    pub point_interval: usize,
    /// Slot multiplier for the final frame when it is built from a short tail.
    pub last_frame_length: f64,
    /// Seconds per displayed frame.
    pub interval: f64,
    /// Amplitude units per height unit.
    pub divisor: f64,
    pub width: usize,
}

impl TimingPlan {
    pub fn compute(
        length: usize,
        frame_rate: u32,
        max_amplitude: f64,
        width: usize,
        fps: u32,
        height: u32,
    ) -> Result<Self> {
        if width == 0 || fps == 0 || height == 0 {
            return Err(VisualizerError::config(format!(
                "width ({width}), fps ({fps}) and height ({height}) must all be greater than zero"
            )));
        }

        let columns_per_second = (width as u64).saturating_mul(u64::from(fps));
        let point_interval = (u64::from(frame_rate) / columns_per_second) as usize;
        if point_interval == 0 {
            return Err(VisualizerError::FrameLengthSmallerThanWidth { fps, width });
        }

        let frame_mod = length % (point_interval * width);
        let last_frame_length = if frame_mod != 0 {
            f64::from(frame_rate) / frame_mod as f64
        } else {
            1.0
        };

        let plan = Self {
            length,
            point_interval,
            last_frame_length,
            interval: 1.0 / f64::from(fps),
            divisor: max_amplitude / f64::from(height),
            width,
        };
        tracing::debug!(?plan, "computed timing plan");
        Ok(plan)
    }

    /// `(length, point_interval, last_frame_length, interval, divisor)`.
    pub fn as_tuple(&self) -> (usize, usize, f64, f64, f64) {
        (
            self.length,
            self.point_interval,
            self.last_frame_length,
            self.interval,
            self.divisor,
        )
    }

    /// Offset from playback start at which frame `index` should finish.
    ///
    /// The correction multiplier is applied when `index` is the last *sample*
    /// index rather than the last frame index, so for real tracks it never
    /// fires.
    pub fn slot_end(&self, index: usize) -> Duration {
        let multiplier = if index + 1 == self.length {
            self.last_frame_length
        } else {
            1.0
        };
        Duration::from_secs_f64((index as f64 + multiplier) * self.interval)
    }
}

/// Time source used by the [`Scheduler`].
pub trait Clock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;
    /// Blocks for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and a blocking thread sleep.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Outcome of a playback run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackReport {
    /// Frames pulled from the builder and drawn.
    pub frames: usize,
    /// Frames whose slot had already passed, or every frame when sync is off.
    pub skipped_frames: usize,
}

/// Drives a [`FrameBuilder`] and paces each frame against a [`Clock`].
#[derive(Debug)]
pub struct Scheduler<C: Clock = SystemClock> {
    config: VisualizerConfig,
    clock: C,
}

impl Scheduler<SystemClock> {
    pub fn new(config: VisualizerConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(config: VisualizerConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Plays `samples` onto `renderer`, sleeping between frames when sync is
    /// on. Late frames are counted and dropped, never caught up.
    ///
    /// Fails before anything is drawn when the width/fps combination cannot be
    /// satisfied by `frame_rate`.
    pub fn play<T, W>(
        &mut self,
        samples: &[T],
        frame_rate: u32,
        max_amplitude: f64,
        renderer: &mut TerminalRenderer<W>,
    ) -> Result<PlaybackReport>
    where
        T: Copy + Into<f64>,
        W: std::io::Write,
    {
        let height = self.config.height;
        let plan = TimingPlan::compute(
            samples.len(),
            frame_rate,
            max_amplitude,
            self.config.width,
            self.config.fps,
            height,
        )?;
        let frames = FrameBuilder::from_plan(samples, &plan)?;

        renderer.print_frame(&Frame::blank(plan.width), height, ' ')?;
        let start = self.clock.now();

        let mut report = PlaybackReport::default();
        for (index, frame) in frames.enumerate() {
            renderer.clear_frame(height)?;
            renderer.print_frame(&frame, height, self.config.bar_char)?;
            report.frames += 1;

            let deadline = start + plan.slot_end(index);
            match deadline.checked_sub(self.clock.now()) {
                Some(remaining) if self.config.sync && !remaining.is_zero() => {
                    self.clock.sleep(remaining)
                }
                _ => {
                    report.skipped_frames += 1;
                    tracing::trace!(index, "frame skipped");
                }
            }
        }

        if self.config.debug {
            renderer.report_skipped(report.skipped_frames)?;
        }
        tracing::debug!(
            frames = report.frames,
            skipped = report.skipped_frames,
            "playback finished"
        );
        Ok(report)
    }
}
