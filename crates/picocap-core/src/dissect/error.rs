use thiserror::Error;

use super::ProtocolTag;

/// Fatal dissection failures; truncation is reported in the walk outcome
/// instead, since the chunks emitted before it remain valid.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DissectError {
    #[error("dissection stalled at offset {offset}: header did not advance")]
    Corrupt { offset: usize },
    #[error("no dissector registered for '{0}'")]
    Missing(ProtocolTag),
}
