//! Core library for the terminal audio visualiser.
//!
//! Audio is decoded into a flat list of samples, averaged into frames of bar
//! heights and played back against a clock so the bars track elapsed audio
//! time. Each module owns one stage of that pipeline (decoding, analysis,
//! timing, rendering) so the stages can be driven and tested independently.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod render;
pub mod timeline;

pub use analysis::{quantize, Frame, FrameBuilder};
pub use audio::{open_file, AudioSegment, FileType};
pub use config::{RawFormat, VisualizerConfig};
pub use error::{Result, VisualizerError};
pub use render::TerminalRenderer;
pub use timeline::{Clock, PlaybackReport, Scheduler, SystemClock, TimingPlan};
