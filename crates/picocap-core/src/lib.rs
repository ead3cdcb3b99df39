//! Picocap core library for captured-frame analysis.
//!
//! This crate implements the analysis pipeline used by the CLI: capture
//! records carry picosecond timestamps and raw frame bytes, bounds-checked
//! wire views decode the headers, and two consumers sit on top of them.
//! The layer model answers per-layer payload arithmetic, and the dissector
//! registry walks a frame's header chain into an ordered chunk sequence.
//! Parsing is byte-oriented and side-effect free; all I/O stays with the
//! caller.
//!
//! Invariants:
//! - Every header read is validated against the captured length, never the
//!   on-the-wire frame length.
//! - Dissection chunks are ordered by strictly increasing offset and never
//!   overlap; VLAN tags are absorbed into the link-layer chunk.
//! - Timestamp arithmetic is exact over the full picosecond range.
//!
//! # Examples
//! ```
//! use picocap_core::dissect::{default_registry, dissect_frame};
//!
//! let frame = [0u8; 14];
//! let registry = default_registry();
//! let result = dissect_frame(&registry, &frame)?;
//! assert_eq!(result.chunks.len(), 1);
//! # Ok::<(), picocap_core::dissect::DissectError>(())
//! ```

pub mod dissect;
pub mod layers;
pub mod picotime;
pub mod record;
pub mod summary;
pub mod units;
pub mod wire;

pub use picotime::TimePico;
pub use record::{CaptureRecord, ID_LEN, RecordError};
pub use summary::TrafficSummary;
