use thiserror::Error;

/// Errors raised when reading a capture record or its frame bytes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    #[error("frame too short: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("captured length {captured} exceeds the {available}-byte frame buffer")]
    CaptureOverrun { captured: u32, available: usize },
}
