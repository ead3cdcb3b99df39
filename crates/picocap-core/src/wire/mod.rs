//! Wire-format layout and bounds-checked header views.
//!
//! Views are parsed eagerly from an explicit byte slice and offset,
//! validated against the captured length before any field is read; raw
//! pointer arithmetic never crosses this module boundary. Header integer
//! fields are network byte order.

pub mod layout;

mod reader;

pub use reader::FrameReader;

use crate::record::RecordError;

/// Resolve the final type/length value of a link header at `offset`,
/// skipping any number of 802.1Q tags.
///
/// Returns the resolved 16-bit value and the link-header length (14 bytes
/// plus 4 per tag). The type/length test is re-applied after every
/// unwrapped tag; each iteration advances, so the loop is bounded by the
/// captured length.
pub fn resolve_link_header(frame: &[u8], offset: usize) -> Result<(u16, usize), RecordError> {
    let reader = FrameReader::new(frame);
    let mut type_offset = offset + layout::ETHER_TYPE_OFFSET;
    loop {
        let value = reader.read_u16_be(type_offset)?;
        if value == layout::ETHERTYPE_VLAN {
            type_offset += layout::VLAN_TAG_SIZE;
            continue;
        }
        return Ok((value, type_offset + 2 - offset));
    }
}

/// Ethernet header at a given offset (addresses plus the type/length field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetView<'a> {
    frame: &'a [u8],
    offset: usize,
    destination: [u8; 6],
    source: [u8; 6],
    ether_type: u16,
}

impl<'a> EthernetView<'a> {
    pub fn parse(frame: &'a [u8], offset: usize) -> Result<Self, RecordError> {
        let reader = FrameReader::new(frame);
        reader.require(offset, layout::ETHERNET_HEADER_SIZE)?;
        Ok(Self {
            frame,
            offset,
            destination: reader.read_array(offset + layout::ETHER_DEST_RANGE.start)?,
            source: reader.read_array(offset + layout::ETHER_SOURCE_RANGE.start)?,
            ether_type: reader.read_u16_be(offset + layout::ETHER_TYPE_OFFSET)?,
        })
    }

    pub fn destination(&self) -> [u8; 6] {
        self.destination
    }

    pub fn source(&self) -> [u8; 6] {
        self.source
    }

    /// The raw 16-bit type/length field. Values below
    /// [`layout::ETHERTYPE_MAX_LENGTH`] are IEEE 802.3 length fields.
    pub fn ether_type(&self) -> u16 {
        self.ether_type
    }

    pub fn is_length_field(&self) -> bool {
        self.ether_type < layout::ETHERTYPE_MAX_LENGTH
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset of the payload for an untagged header.
    pub fn payload_offset(&self) -> usize {
        self.offset + layout::ETHERNET_HEADER_SIZE
    }

    /// The captured bytes this view was parsed from.
    pub fn frame(&self) -> &'a [u8] {
        self.frame
    }
}

/// IPv4 header at a given offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4View {
    offset: usize,
    version: u8,
    header_len: usize,
    total_length: u16,
    ttl: u8,
    protocol: u8,
    source: [u8; 4],
    destination: [u8; 4],
}

impl Ipv4View {
    pub fn parse(frame: &[u8], offset: usize) -> Result<Self, RecordError> {
        let reader = FrameReader::new(frame);
        reader.require(offset, layout::IPV4_MIN_HEADER_SIZE)?;
        let version_ihl = reader.read_u8(offset + layout::IPV4_VERSION_IHL_OFFSET)?;
        Ok(Self {
            offset,
            version: version_ihl >> 4,
            header_len: usize::from(version_ihl & 0x0f) * 4,
            total_length: reader.read_u16_be(offset + layout::IPV4_TOTAL_LENGTH_OFFSET)?,
            ttl: reader.read_u8(offset + layout::IPV4_TTL_OFFSET)?,
            protocol: reader.read_u8(offset + layout::IPV4_PROTOCOL_OFFSET)?,
            source: reader.read_array(offset + layout::IPV4_SOURCE_RANGE.start)?,
            destination: reader.read_array(offset + layout::IPV4_DEST_RANGE.start)?,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Header length in bytes (the IHL field times four).
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    pub fn total_length(&self) -> u16 {
        self.total_length
    }

    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    pub fn source(&self) -> [u8; 4] {
        self.source
    }

    pub fn destination(&self) -> [u8; 4] {
        self.destination
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn payload_offset(&self) -> usize {
        self.offset + self.header_len
    }
}

/// TCP header at a given offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpView {
    offset: usize,
    source_port: u16,
    dest_port: u16,
    sequence: u32,
    ack: u32,
    header_len: usize,
    flags: u8,
}

impl TcpView {
    pub fn parse(frame: &[u8], offset: usize) -> Result<Self, RecordError> {
        let reader = FrameReader::new(frame);
        reader.require(offset, layout::TCP_MIN_HEADER_SIZE)?;
        let data_offset = reader.read_u8(offset + layout::TCP_DATA_OFFSET_OFFSET)?;
        Ok(Self {
            offset,
            source_port: reader.read_u16_be(offset + layout::TCP_SOURCE_PORT_OFFSET)?,
            dest_port: reader.read_u16_be(offset + layout::TCP_DEST_PORT_OFFSET)?,
            sequence: reader.read_u32_be(offset + layout::TCP_SEQUENCE_OFFSET)?,
            ack: reader.read_u32_be(offset + layout::TCP_ACK_OFFSET)?,
            header_len: usize::from(data_offset >> 4) * 4,
            flags: reader.read_u8(offset + layout::TCP_FLAGS_OFFSET)?,
        })
    }

    pub fn source_port(&self) -> u16 {
        self.source_port
    }

    pub fn dest_port(&self) -> u16 {
        self.dest_port
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn ack(&self) -> u32 {
        self.ack
    }

    /// Header length in bytes (the data-offset field times four).
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn payload_offset(&self) -> usize {
        self.offset + self.header_len
    }
}

/// UDP header at a given offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpView {
    offset: usize,
    source_port: u16,
    dest_port: u16,
    length: u16,
    checksum: u16,
}

impl UdpView {
    pub fn parse(frame: &[u8], offset: usize) -> Result<Self, RecordError> {
        let reader = FrameReader::new(frame);
        reader.require(offset, layout::UDP_HEADER_SIZE)?;
        Ok(Self {
            offset,
            source_port: reader.read_u16_be(offset + layout::UDP_SOURCE_PORT_OFFSET)?,
            dest_port: reader.read_u16_be(offset + layout::UDP_DEST_PORT_OFFSET)?,
            length: reader.read_u16_be(offset + layout::UDP_LENGTH_OFFSET)?,
            checksum: reader.read_u16_be(offset + layout::UDP_CHECKSUM_OFFSET)?,
        })
    }

    pub fn source_port(&self) -> u16 {
        self.source_port
    }

    pub fn dest_port(&self) -> u16 {
        self.dest_port
    }

    /// Datagram length including the eight header bytes.
    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn payload_offset(&self) -> usize {
        self.offset + layout::UDP_HEADER_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::{EthernetView, Ipv4View, TcpView, UdpView, layout};
    use crate::record::RecordError;

    fn ethernet_frame(ether_type: u16) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&[0xff; 6]);
        frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        frame.extend_from_slice(&ether_type.to_be_bytes());
        frame
    }

    #[test]
    fn ethernet_view_reads_addresses_and_type() {
        let frame = ethernet_frame(layout::ETHERTYPE_IPV4);
        let view = EthernetView::parse(&frame, 0).unwrap();
        assert_eq!(view.destination(), [0xff; 6]);
        assert_eq!(view.source(), [0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(view.ether_type(), 0x0800);
        assert!(!view.is_length_field());
        assert_eq!(view.payload_offset(), 14);
    }

    #[test]
    fn ethernet_view_flags_length_fields() {
        let frame = ethernet_frame(0x0042);
        let view = EthernetView::parse(&frame, 0).unwrap();
        assert!(view.is_length_field());
    }

    #[test]
    fn ipv4_view_decodes_lengths() {
        let mut header = vec![0u8; 20];
        header[0] = 0x45; // version 4, ihl 5
        header[2..4].copy_from_slice(&100u16.to_be_bytes());
        header[8] = 64;
        header[9] = layout::IP_PROTO_UDP;
        header[12..16].copy_from_slice(&[10, 0, 0, 1]);
        header[16..20].copy_from_slice(&[10, 0, 0, 2]);

        let view = Ipv4View::parse(&header, 0).unwrap();
        assert_eq!(view.version(), 4);
        assert_eq!(view.header_len(), 20);
        assert_eq!(view.total_length(), 100);
        assert_eq!(view.protocol(), 17);
        assert_eq!(view.payload_offset(), 20);
    }

    #[test]
    fn tcp_view_scales_data_offset() {
        let mut header = vec![0u8; 20];
        header[0..2].copy_from_slice(&80u16.to_be_bytes());
        header[2..4].copy_from_slice(&4711u16.to_be_bytes());
        header[12] = 0x80; // data offset 8 -> 32 bytes
        let view = TcpView::parse(&header, 0).unwrap();
        assert_eq!(view.source_port(), 80);
        assert_eq!(view.dest_port(), 4711);
        assert_eq!(view.header_len(), 32);
    }

    #[test]
    fn udp_view_reads_length() {
        let mut header = vec![0u8; 8];
        header[0..2].copy_from_slice(&53u16.to_be_bytes());
        header[2..4].copy_from_slice(&4000u16.to_be_bytes());
        header[4..6].copy_from_slice(&28u16.to_be_bytes());
        let view = UdpView::parse(&header, 0).unwrap();
        assert_eq!(view.source_port(), 53);
        assert_eq!(view.length(), 28);
        assert_eq!(view.payload_offset(), 8);
    }

    #[test]
    fn views_refuse_uncaptured_bytes() {
        let frame = ethernet_frame(layout::ETHERTYPE_IPV4);
        assert!(matches!(
            Ipv4View::parse(&frame, 14),
            Err(RecordError::Truncated { needed: 34, .. })
        ));
        assert!(matches!(
            UdpView::parse(&frame[..4], 0),
            Err(RecordError::Truncated { .. })
        ));
        assert!(matches!(
            TcpView::parse(&frame, 2),
            Err(RecordError::Truncated { .. })
        ));
    }
}
