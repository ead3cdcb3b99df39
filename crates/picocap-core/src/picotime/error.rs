use thiserror::Error;

/// Errors returned by [`TimePico::parse`](super::TimePico::parse).
#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("unrecognized timestamp format: '{input}'")]
    InvalidFormat { input: String },
    #[error("invalid fractional seconds: '{input}'")]
    InvalidFraction { input: String },
    #[error("timestamp precedes the epoch: '{input}'")]
    BeforeEpoch { input: String },
}

/// Errors returned when rendering a timestamp with a calendar pattern.
#[derive(Debug, Error)]
pub enum TimeFormatError {
    #[error("invalid format pattern: {0}")]
    Pattern(#[from] time::error::InvalidFormatDescription),
    #[error("timestamp out of range: {0}")]
    Range(#[from] time::error::ComponentRange),
    #[error("formatting failed: {0}")]
    Format(#[from] time::error::Format),
}
