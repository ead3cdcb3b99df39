//! Protocol dissection: descriptors, registry and the chain walk.
//!
//! The walk starts with the Ethernet descriptor at offset zero and follows
//! each descriptor's `next_payload` resolution, emitting one
//! [`HeaderChunk`] per header. Chunks are ordered by strictly increasing
//! offset and never overlap; VLAN tags are absorbed into the link-layer
//! chunk. Unrecognized payloads resolve to an opaque trailing `data`
//! segment, so the walk has no unknown-protocol failure mode; the only
//! fatal condition is a step that fails to advance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{CaptureRecord, RecordError};
use crate::wire::FrameReader;

mod data;
mod dns;
mod error;
mod ethernet;
mod ipv4;
mod registry;
mod tcp;
mod udp;

pub use data::DataDissector;
pub use dns::DnsDissector;
pub use error::DissectError;
pub use ethernet::EthernetDissector;
pub use ipv4::Ipv4Dissector;
pub use registry::{BuiltinDissector, DissectorRegistry, default_registry};
pub use tcp::TcpDissector;
pub use udp::UdpDissector;

/// Identifies a protocol descriptor in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolTag {
    Ethernet,
    Ipv4,
    Tcp,
    Udp,
    Dns,
    Data,
}

impl ProtocolTag {
    pub fn name(self) -> &'static str {
        match self {
            ProtocolTag::Ethernet => "ethernet",
            ProtocolTag::Ipv4 => "ipv4",
            ProtocolTag::Tcp => "tcp",
            ProtocolTag::Udp => "udp",
            ProtocolTag::Dns => "dns",
            ProtocolTag::Data => "data",
        }
    }
}

impl fmt::Display for ProtocolTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One header segment produced by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderChunk {
    pub tag: ProtocolTag,
    pub offset: usize,
    pub size: usize,
}

impl HeaderChunk {
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Position of a dissector within one frame's captured bytes.
#[derive(Debug, Clone, Copy)]
pub struct DissectContext<'a> {
    frame: &'a [u8],
    offset: usize,
}

impl<'a> DissectContext<'a> {
    pub fn new(frame: &'a [u8], offset: usize) -> Self {
        Self { frame, offset }
    }

    pub fn frame(&self) -> &'a [u8] {
        self.frame
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Captured bytes from the current offset to the end of the capture.
    pub fn remaining(&self) -> usize {
        self.frame.len().saturating_sub(self.offset)
    }

    pub fn reader(&self) -> FrameReader<'a> {
        FrameReader::new(self.frame)
    }
}

/// Where a descriptor hands off after its own header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHeader {
    /// No further headers; the walk stops after this descriptor's chunk.
    Terminal,
    Header { tag: ProtocolTag, offset: usize },
}

/// Capability set of one protocol descriptor.
pub trait Dissector {
    fn name(&self) -> &'static str;

    /// Size of this header at the context offset, in bytes.
    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError>;

    /// Resolve the payload protocol and its offset.
    fn next_payload(&self, ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError>;

    /// One-line rendering of this header.
    fn format(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Field-per-line rendering, each line starting with `prefix`.
    fn dump(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write, prefix: &str)
    -> fmt::Result;
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The capture was exhausted or a terminal descriptor was reached.
    Complete,
    /// A header needed more bytes than were captured; earlier chunks stand.
    Truncated {
        offset: usize,
        needed: usize,
        actual: usize,
    },
}

/// The ordered chunk sequence for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dissection {
    pub chunks: Vec<HeaderChunk>,
    pub end: WalkEnd,
}

impl Dissection {
    pub fn is_complete(&self) -> bool {
        matches!(self.end, WalkEnd::Complete)
    }
}

/// Walk a record's captured bytes through the registry.
pub fn dissect(
    registry: &DissectorRegistry,
    record: &CaptureRecord<'_>,
) -> Result<Dissection, DissectError> {
    dissect_frame(registry, record.captured())
}

/// Walk raw captured bytes, starting with Ethernet at offset zero.
pub fn dissect_frame(
    registry: &DissectorRegistry,
    frame: &[u8],
) -> Result<Dissection, DissectError> {
    let mut chunks = Vec::new();
    let mut tag = ProtocolTag::Ethernet;
    let mut offset = 0usize;

    loop {
        if offset >= frame.len() {
            return Ok(Dissection {
                chunks,
                end: WalkEnd::Complete,
            });
        }

        let dissector = registry.get(tag).ok_or(DissectError::Missing(tag))?;
        let ctx = DissectContext::new(frame, offset);

        let size = match dissector.header_size(&ctx) {
            Ok(size) => size,
            Err(err) => {
                return Ok(Dissection {
                    chunks,
                    end: truncated_end(offset, err, frame.len()),
                });
            }
        };
        if size > ctx.remaining() {
            return Ok(Dissection {
                chunks,
                end: WalkEnd::Truncated {
                    offset,
                    needed: offset + size,
                    actual: frame.len(),
                },
            });
        }

        chunks.push(HeaderChunk { tag, offset, size });

        match dissector.next_payload(&ctx) {
            Ok(NextHeader::Terminal) => {
                return Ok(Dissection {
                    chunks,
                    end: WalkEnd::Complete,
                });
            }
            Ok(NextHeader::Header {
                tag: next_tag,
                offset: next_offset,
            }) => {
                if next_offset <= offset {
                    tracing::warn!(offset, tag = %tag, "dissection failed to advance");
                    return Err(DissectError::Corrupt { offset });
                }
                tag = next_tag;
                offset = next_offset;
            }
            Err(err) => {
                return Ok(Dissection {
                    chunks,
                    end: truncated_end(offset, err, frame.len()),
                });
            }
        }
    }
}

fn truncated_end(offset: usize, err: RecordError, captured: usize) -> WalkEnd {
    match err {
        RecordError::Truncated { needed, actual } => WalkEnd::Truncated {
            offset,
            needed,
            actual,
        },
        RecordError::CaptureOverrun { captured: c, .. } => WalkEnd::Truncated {
            offset,
            needed: c as usize,
            actual: captured,
        },
    }
}
