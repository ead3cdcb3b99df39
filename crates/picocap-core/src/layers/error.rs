use std::fmt;

use thiserror::Error;

use crate::record::RecordError;

/// A recognized link- or transport-level protocol this core does not size.
///
/// These are fully enumerable categories, counted separately from
/// truncation; they are not errors in the aggregate sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unsupported {
    Ipv6,
    Arp,
    StpBridges,
    CdpVtp,
    EtherType(u16),
    IpProtocol(u8),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::Ipv6 => write!(f, "IPv6"),
            Unsupported::Arp => write!(f, "ARP"),
            Unsupported::StpBridges => write!(f, "STP bridges"),
            Unsupported::CdpVtp => write!(f, "CDP/VTP"),
            Unsupported::EtherType(value) => write!(f, "EtherType {value:#06x}"),
            Unsupported::IpProtocol(value) => write!(f, "IP protocol {value}"),
        }
    }
}

/// Outcome of a payload/layer size query that could not produce a size.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SizeError {
    #[error("frame too short: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("unsupported protocol: {0}")]
    Unsupported(Unsupported),
}

impl From<RecordError> for SizeError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Truncated { needed, actual } => SizeError::Truncated { needed, actual },
            RecordError::CaptureOverrun {
                captured,
                available,
            } => SizeError::Truncated {
                needed: captured as usize,
                actual: available,
            },
        }
    }
}
