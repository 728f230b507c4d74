use thiserror::Error;

#[derive(Error, Debug)]
pub enum DartError {
    #[error("Invalid frame: {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },

    #[error("Oracle transport failure: {0}")]
    OracleTransport(String),

    #[error("Oracle format failure: {0}")]
    OracleFormat(String),

    #[error("No API key found in ${0}")]
    MissingApiKey(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),
}

impl DartError {
    /// Transport and format failures count as a non-detection while scoring.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(self, Self::OracleTransport(_) | Self::OracleFormat(_))
    }

    /// Short reason string handed to the feedback sink. Full detail stays in the log.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidFrame { .. } => "invalid frame",
            Self::OracleTransport(_) => "connection error",
            Self::OracleFormat(_) => "unreadable response",
            Self::MissingApiKey(_) => "missing API key",
            Self::Config(_) => "invalid configuration",
            Self::Io(_) => "I/O error",
            Self::Image(_) => "image error",
        }
    }
}

pub type Result<T> = std::result::Result<T, DartError>;
