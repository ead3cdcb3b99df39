//! Per-capture traffic aggregation.
//!
//! A [`TrafficSummary`] is fed one record at a time and keeps packet and
//! byte totals, the timestamp bounds and a per-protocol breakdown. Frames
//! that cannot be classified still count toward the totals.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::layers::{SizeError, Unsupported, find_network_header};
use crate::picotime::TimePico;
use crate::record::CaptureRecord;
use crate::wire::Ipv4View;

/// Running totals over a stream of records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrafficSummary {
    /// Records seen.
    pub packets: u64,
    /// Sum of on-the-wire frame lengths, not captured lengths.
    pub bytes: u64,
    pub first: Option<TimePico>,
    pub last: Option<TimePico>,
    /// IPv4 packet counts keyed by protocol number.
    pub ipv4: BTreeMap<u8, u64>,
    pub arp: u64,
    pub stp_bridges: u64,
    pub cdp_vtp: u64,
    /// Frames with an EtherType this core does not classify (IPv6 included).
    pub other: u64,
    /// Frames whose capture ended before the headers needed to classify.
    pub truncated: u64,
}

impl TrafficSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the totals.
    pub fn add(&mut self, record: &CaptureRecord<'_>) {
        self.packets += 1;
        self.bytes += u64::from(record.frame_length());

        let ts = record.timestamp();
        match self.first {
            Some(first) if first <= ts => {}
            _ => self.first = Some(ts),
        }
        match self.last {
            Some(last) if last >= ts => {}
            _ => self.last = Some(ts),
        }

        match find_network_header(record) {
            Ok(header) => {
                match Ipv4View::parse(record.captured(), header.offset) {
                    Ok(ip) => *self.ipv4.entry(ip.protocol()).or_insert(0) += 1,
                    Err(_) => self.truncated += 1,
                }
            }
            Err(SizeError::Unsupported(Unsupported::Arp)) => self.arp += 1,
            Err(SizeError::Unsupported(Unsupported::StpBridges)) => self.stp_bridges += 1,
            Err(SizeError::Unsupported(Unsupported::CdpVtp)) => self.cdp_vtp += 1,
            Err(SizeError::Unsupported(_)) => self.other += 1,
            Err(SizeError::Truncated { .. }) => self.truncated += 1,
        }
    }

    /// Capture duration from first to last timestamp.
    pub fn duration(&self) -> Option<TimePico> {
        match (self.first, self.last) {
            (Some(first), Some(last)) => Some(last.saturating_sub(first)),
            _ => None,
        }
    }

    /// Mean bit rate over the capture duration, in bits per second.
    ///
    /// `None` for empty captures and for single-instant captures, where no
    /// rate is defined.
    pub fn mean_bit_rate(&self) -> Option<f64> {
        let duration = self.duration()?;
        let seconds =
            duration.seconds() as f64 + duration.picoseconds() as f64 / 1_000_000_000_000.0;
        if seconds <= 0.0 {
            return None;
        }
        Some(self.bytes as f64 * 8.0 / seconds)
    }
}

/// Well-known IP protocol names, for breakdown listings.
pub fn ip_protocol_name(protocol: u8) -> Option<&'static str> {
    match protocol {
        1 => Some("icmp"),
        2 => Some("igmp"),
        6 => Some("tcp"),
        17 => Some("udp"),
        41 => Some("ipv6"),
        47 => Some("gre"),
        50 => Some("esp"),
        51 => Some("ah"),
        89 => Some("ospf"),
        132 => Some("sctp"),
        _ => None,
    }
}
