//! Turns raw samples into frames of bar heights.
//!
//! Samples are quantized one by one, averaged over blocks of `point_interval`
//! samples and packed `width` blocks to a frame. Frames are produced lazily so
//! a full track never has to be materialised as bar data.

mod quantize;

use std::{iter::FusedIterator, mem, slice};

use serde::{Deserialize, Serialize};

use crate::{Result, TimingPlan, VisualizerError};

pub use quantize::quantize;

/// One displayed bar-chart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Frame {
    /// Block averages rounded up to whole height units. Every frame but the
    /// last holds exactly `width` columns.
    Heights(Vec<u32>),
    /// Trailing single column built from an incomplete block. The average is
    /// kept unrounded.
    Averaged(f64),
}

impl Frame {
    /// An all-zero frame of `width` columns.
    pub fn blank(width: usize) -> Self {
        Frame::Heights(vec![0; width])
    }

    pub fn len(&self) -> usize {
        match self {
            Frame::Heights(heights) => heights.len(),
            Frame::Averaged(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the bar in `column` is at least `row` units tall.
    pub fn reaches(&self, column: usize, row: u32) -> bool {
        match self {
            Frame::Heights(heights) => heights.get(column).is_some_and(|&h| h >= row),
            Frame::Averaged(value) => column == 0 && *value >= f64::from(row),
        }
    }
}

/// Lazy, single-pass producer of [`Frame`]s over a borrowed sample slice.
#[derive(Debug)]
pub struct FrameBuilder<'a, T> {
    samples: slice::Iter<'a, T>,
    point_interval: usize,
    width: usize,
    divisor: f64,
    sum: u64,
    count: usize,
    current: Vec<u32>,
    finished: bool,
}

impl<'a, T> FrameBuilder<'a, T>
where
    T: Copy + Into<f64>,
{
    pub fn new(samples: &'a [T], point_interval: usize, width: usize, divisor: f64) -> Result<Self> {
        if point_interval == 0 {
            return Err(VisualizerError::config("point interval must be at least one sample"));
        }
        if width == 0 {
            return Err(VisualizerError::config("frame width must be greater than zero"));
        }
        if !(divisor > 0.0) {
            return Err(VisualizerError::config(format!(
                "amplitude divisor must be positive, got {divisor}"
            )));
        }

        Ok(Self {
            samples: samples.iter(),
            point_interval,
            width,
            divisor,
            sum: 0,
            count: 0,
            current: Vec::with_capacity(width),
            finished: false,
        })
    }

    /// Builds frames using parameters produced by the timing planner.
    pub fn from_plan(samples: &'a [T], plan: &TimingPlan) -> Result<Self> {
        Self::new(samples, plan.point_interval, plan.width, plan.divisor)
    }
}

impl<T> Iterator for FrameBuilder<'_, T>
where
    T: Copy + Into<f64>,
{
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }

        for &sample in self.samples.by_ref() {
            self.sum = self.sum.saturating_add(quantize(sample, self.divisor));
            self.count += 1;
            if self.count == self.point_interval {
                let average = self.sum.div_ceil(self.count as u64);
                self.current.push(u32::try_from(average).unwrap_or(u32::MAX));
                self.sum = 0;
                self.count = 0;
            }
            if self.current.len() == self.width {
                let full = mem::replace(&mut self.current, Vec::with_capacity(self.width));
                return Some(Frame::Heights(full));
            }
        }

        self.finished = true;
        if !self.current.is_empty() {
            Some(Frame::Heights(mem::take(&mut self.current)))
        } else if self.sum != 0 {
            Some(Frame::Averaged(self.sum as f64 / self.count as f64))
        } else {
            None
        }
    }
}

impl<T> FusedIterator for FrameBuilder<'_, T> where T: Copy + Into<f64> {}
