/// Result alias that carries the custom [`VisualizerError`] type.
pub type Result<T> = std::result::Result<T, VisualizerError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum VisualizerError {
    /// The requested width/fps combination needs more than one column per
    /// audio sample, so no sample block can be formed.
    #[error(
        "Width of frame is lesser than width of print line. Increase fps({fps}) or decrease width({width})"
    )]
    FrameLengthSmallerThanWidth { fps: u32, width: usize },
    /// A configuration value is outside the range the pipeline can work with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The tool needed to decode this container is not installed.
    #[error("cannot decode {format} files: {remediation}")]
    DecoderUnavailable {
        format: String,
        remediation: String,
    },
    #[error("unsupported file type `{0}` (expected one of mp3, wav, flv, ogg, raw)")]
    UnsupportedFileType(String),
    /// Decoding started but the stream could not be turned into samples.
    #[error("decode failed: {0}")]
    Decode(String),
    #[error(transparent)]
    Symphonia(#[from] symphonia::core::errors::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl VisualizerError {
    /// Creates a configuration error that wraps the provided message.
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a decode error that wraps the provided message.
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }
}
