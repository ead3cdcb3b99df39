//! Protocol layer model and per-layer payload arithmetic.
//!
//! `payload_size` answers "how many payload bytes does layer L carry" for
//! one record; `layer_size` answers "how many bytes does layer L consume",
//! which is by definition the payload of the enclosing layer. VLAN tags
//! are unwrapped with an explicit loop so double-tagged frames resolve to
//! the same inner EtherType as single-tagged ones.

use crate::record::CaptureRecord;
use crate::wire::layout::{
    ETHERNET_HEADER_SIZE, ETHERTYPE_ARP, ETHERTYPE_CDP_VTP, ETHERTYPE_IPV4, ETHERTYPE_IPV6,
    ETHERTYPE_STP_BRIDGES, IP_PROTO_TCP, IP_PROTO_UDP, UDP_HEADER_SIZE,
};
use crate::wire::{Ipv4View, TcpView, UdpView, resolve_link_header};

mod error;

pub use error::{SizeError, Unsupported};

/// Protocol layers in strict order; `Invalid` sorts below everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Invalid,
    Physical,
    Link,
    Network,
    Transport,
    Application,
}

const LEVEL_NAMES: [(&str, Level); 5] = [
    ("physical", Level::Physical),
    ("link", Level::Link),
    ("network", Level::Network),
    ("transport", Level::Transport),
    ("application", Level::Application),
];

impl Level {
    /// Case-insensitive lookup; unknown names map to `Invalid`.
    pub fn from_name(name: &str) -> Level {
        LEVEL_NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, level)| *level)
            .unwrap_or(Level::Invalid)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Level::Invalid => "invalid",
            Level::Physical => "physical",
            Level::Link => "link",
            Level::Network => "network",
            Level::Transport => "transport",
            Level::Application => "application",
        }
    }

    /// The next level down, or `Invalid` when there is none.
    pub fn lower(&self) -> Level {
        match self {
            Level::Invalid | Level::Physical => Level::Invalid,
            Level::Link => Level::Physical,
            Level::Network => Level::Link,
            Level::Transport => Level::Network,
            Level::Application => Level::Transport,
        }
    }
}

/// Location of a resolved IPv4 header within the captured bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkHeader {
    /// Offset of the IPv4 header from the start of the frame.
    pub offset: usize,
    /// Header length in bytes (IHL field times four).
    pub header_len: usize,
}

impl NetworkHeader {
    pub fn payload_offset(&self) -> usize {
        self.offset + self.header_len
    }
}

fn classify_unsupported(ether_type: u16) -> Unsupported {
    match ether_type {
        ETHERTYPE_IPV6 => Unsupported::Ipv6,
        ETHERTYPE_ARP => Unsupported::Arp,
        ETHERTYPE_STP_BRIDGES => Unsupported::StpBridges,
        ETHERTYPE_CDP_VTP => Unsupported::CdpVtp,
        other => Unsupported::EtherType(other),
    }
}

fn find_network_header_in(frame: &[u8]) -> Result<NetworkHeader, SizeError> {
    let (ether_type, link_len) = resolve_link_header(frame, 0)?;
    let payload_offset = link_len;
    if ether_type != ETHERTYPE_IPV4 {
        let what = classify_unsupported(ether_type);
        tracing::debug!(%what, "frame is not IPv4");
        return Err(SizeError::Unsupported(what));
    }

    let ip = Ipv4View::parse(frame, payload_offset)?;
    Ok(NetworkHeader {
        offset: payload_offset,
        header_len: ip.header_len(),
    })
}

/// Locate the IPv4 header of a record, unwrapping VLAN tags.
pub fn find_network_header(record: &CaptureRecord<'_>) -> Result<NetworkHeader, SizeError> {
    find_network_header_in(record.captured())
}

/// Mutable resolution mode for tools that rewrite header fields in place.
///
/// Returns the subslice starting at the IPv4 header together with its
/// location in the original frame; no bytes are copied or reallocated.
pub fn find_network_header_mut(
    frame: &mut [u8],
) -> Result<(&mut [u8], NetworkHeader), SizeError> {
    let header = find_network_header_in(frame)?;
    let slice = &mut frame[header.offset..];
    Ok((slice, header))
}

/// Payload bytes carried at `level` for one record.
///
/// `Physical` reports the declared frame length; deeper levels derive
/// sizes from the captured protocol headers and report
/// [`SizeError::Truncated`] rather than reading past the captured bytes.
/// Application payload sizing is out of scope and reports zero.
pub fn payload_size(level: Level, record: &CaptureRecord<'_>) -> Result<u64, SizeError> {
    match level {
        Level::Invalid => Ok(0),
        Level::Physical => Ok(u64::from(record.frame_length())),
        Level::Link => {
            Ok(u64::from(record.frame_length()).saturating_sub(ETHERNET_HEADER_SIZE as u64))
        }
        Level::Network | Level::Transport | Level::Application => payload_network(level, record),
    }
}

fn payload_network(level: Level, record: &CaptureRecord<'_>) -> Result<u64, SizeError> {
    let frame = record.captured();
    let header = find_network_header_in(frame)?;
    let ip = Ipv4View::parse(frame, header.offset)?;
    let total = u64::from(ip.total_length());
    let header_len = ip.header_len() as u64;

    if level == Level::Network {
        return Ok(total.saturating_sub(header_len));
    }

    match ip.protocol() {
        IP_PROTO_TCP => {
            let tcp = TcpView::parse(frame, ip.payload_offset())?;
            if level == Level::Transport {
                Ok(total
                    .saturating_sub(tcp.header_len() as u64)
                    .saturating_sub(header_len))
            } else {
                Ok(0)
            }
        }
        IP_PROTO_UDP => {
            let udp = UdpView::parse(frame, ip.payload_offset())?;
            if level == Level::Transport {
                Ok(u64::from(udp.length()).saturating_sub(UDP_HEADER_SIZE as u64))
            } else {
                Ok(0)
            }
        }
        other => {
            tracing::debug!(protocol = other, "unknown IP transport protocol");
            Err(SizeError::Unsupported(Unsupported::IpProtocol(other)))
        }
    }
}

/// Bytes consumed by `level`: the payload available one level down.
///
/// `Physical` has no enclosing layer (traces do not retain framing
/// metadata) and reports zero unconditionally, as does `Invalid`.
pub fn layer_size(level: Level, record: &CaptureRecord<'_>) -> Result<u64, SizeError> {
    if matches!(level, Level::Invalid | Level::Physical) {
        return Ok(0);
    }
    payload_size(level.lower(), record)
}
