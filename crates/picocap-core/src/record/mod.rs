//! Captured-frame records.
//!
//! A record is a fixed header followed by the raw frame bytes. The device
//! may cap the captured bytes below the original frame length (snap
//! length); every accessor trusts `captured_length` only, never
//! `frame_length`.

use crate::picotime::TimePico;
use crate::wire::EthernetView;

mod error;

pub use error::RecordError;

/// Length of the interface and measurement-point identifiers.
pub const ID_LEN: usize = 8;

/// One captured frame: fixed header plus a borrowed view of the raw bytes.
///
/// The frame bytes are borrowed from the owning stream's read buffer and
/// are only valid until the next read; copy them to retain a record longer.
/// Identifier fields are fixed-length and compared by all eight bytes, not
/// NUL termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRecord<'a> {
    nic: [u8; ID_LEN],
    source: [u8; ID_LEN],
    timestamp: TimePico,
    frame_length: u32,
    captured_length: u32,
    frame: &'a [u8],
}

impl<'a> CaptureRecord<'a> {
    /// Assemble a record over an already-decoded header and raw bytes.
    ///
    /// Fails when `captured_length` claims more bytes than `frame` holds;
    /// `captured_length < frame_length` is legitimate truncation.
    pub fn new(
        nic: [u8; ID_LEN],
        source: [u8; ID_LEN],
        timestamp: TimePico,
        frame_length: u32,
        captured_length: u32,
        frame: &'a [u8],
    ) -> Result<Self, RecordError> {
        if captured_length as usize > frame.len() {
            return Err(RecordError::CaptureOverrun {
                captured: captured_length,
                available: frame.len(),
            });
        }
        Ok(Self {
            nic,
            source,
            timestamp,
            frame_length,
            captured_length,
            frame,
        })
    }

    /// Capture-interface identifier.
    pub fn nic(&self) -> &[u8; ID_LEN] {
        &self.nic
    }

    /// Measurement-point identifier.
    pub fn source(&self) -> &[u8; ID_LEN] {
        &self.source
    }

    /// Display form of the interface identifier (trailing NULs trimmed).
    pub fn nic_str(&self) -> String {
        id_to_string(&self.nic)
    }

    /// Display form of the measurement-point identifier.
    pub fn source_str(&self) -> String {
        id_to_string(&self.source)
    }

    pub fn timestamp(&self) -> TimePico {
        self.timestamp
    }

    /// Original frame length on the wire.
    pub fn frame_length(&self) -> u32 {
        self.frame_length
    }

    /// Number of frame bytes actually present.
    pub fn captured_length(&self) -> u32 {
        self.captured_length
    }

    /// The captured frame bytes (exactly `captured_length` of them).
    pub fn captured(&self) -> &'a [u8] {
        &self.frame[..self.captured_length as usize]
    }

    /// True when the device capped the capture below the frame length.
    pub fn is_truncated(&self) -> bool {
        self.captured_length < self.frame_length
    }

    /// View of the outermost Ethernet header.
    ///
    /// All deeper header views are reached through this one and re-check
    /// the captured length before each read.
    pub fn ethernet_header(&self) -> Result<EthernetView<'a>, RecordError> {
        EthernetView::parse(self.captured(), 0)
    }
}

fn id_to_string(id: &[u8; ID_LEN]) -> String {
    String::from_utf8_lossy(id)
        .trim_end_matches('\0')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{CaptureRecord, RecordError};
    use crate::picotime::TimePico;

    fn ids() -> ([u8; 8], [u8; 8]) {
        (*b"eth0\0\0\0\0", *b"mp00\0\0\0\0")
    }

    #[test]
    fn rejects_captured_length_beyond_buffer() {
        let (nic, source) = ids();
        let frame = [0u8; 10];
        let err = CaptureRecord::new(nic, source, TimePico::zero(), 100, 11, &frame).unwrap_err();
        assert_eq!(
            err,
            RecordError::CaptureOverrun {
                captured: 11,
                available: 10
            }
        );
    }

    #[test]
    fn captured_view_is_limited_to_captured_length() {
        let (nic, source) = ids();
        let frame = [0xaau8; 20];
        let record = CaptureRecord::new(nic, source, TimePico::zero(), 60, 14, &frame).unwrap();
        assert_eq!(record.captured().len(), 14);
        assert!(record.is_truncated());
    }

    #[test]
    fn ethernet_header_requires_fourteen_bytes() {
        let (nic, source) = ids();
        let frame = [0u8; 13];
        let record = CaptureRecord::new(nic, source, TimePico::zero(), 60, 13, &frame).unwrap();
        assert!(matches!(
            record.ethernet_header(),
            Err(RecordError::Truncated {
                needed: 14,
                actual: 13
            })
        ));
    }

    #[test]
    fn identifiers_compare_by_full_length() {
        let a = *b"eth0\0\0\0\0";
        let b = *b"eth0\0\0\0x";
        assert_ne!(a, b);

        let (nic, source) = ids();
        let frame = [0u8; 14];
        let record = CaptureRecord::new(nic, source, TimePico::zero(), 14, 14, &frame).unwrap();
        assert_eq!(record.nic_str(), "eth0");
        assert_eq!(record.source_str(), "mp00");
    }
}
