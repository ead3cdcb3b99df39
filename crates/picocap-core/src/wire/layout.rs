pub const ETHERNET_HEADER_SIZE: usize = 14;
pub const VLAN_TAG_SIZE: usize = 4;
pub const IPV4_MIN_HEADER_SIZE: usize = 20;
pub const TCP_MIN_HEADER_SIZE: usize = 20;
pub const UDP_HEADER_SIZE: usize = 8;
pub const LLC_HEADER_SIZE: usize = 4;

pub const ETHER_DEST_RANGE: std::ops::Range<usize> = 0..6;
pub const ETHER_SOURCE_RANGE: std::ops::Range<usize> = 6..12;
pub const ETHER_TYPE_OFFSET: usize = 12;

/// Values below this are IEEE 802.3 length fields, not EtherTypes.
pub const ETHERTYPE_MAX_LENGTH: u16 = 0x0600;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;
pub const ETHERTYPE_VLAN: u16 = 0x8100;
pub const ETHERTYPE_IPV6: u16 = 0x86DD;
pub const ETHERTYPE_STP_BRIDGES: u16 = 0x0026;
pub const ETHERTYPE_CDP_VTP: u16 = 0x016E;

pub const IPV4_VERSION_IHL_OFFSET: usize = 0;
pub const IPV4_TOTAL_LENGTH_OFFSET: usize = 2;
pub const IPV4_TTL_OFFSET: usize = 8;
pub const IPV4_PROTOCOL_OFFSET: usize = 9;
pub const IPV4_SOURCE_RANGE: std::ops::Range<usize> = 12..16;
pub const IPV4_DEST_RANGE: std::ops::Range<usize> = 16..20;

pub const IP_PROTO_TCP: u8 = 6;
pub const IP_PROTO_UDP: u8 = 17;

pub const TCP_SOURCE_PORT_OFFSET: usize = 0;
pub const TCP_DEST_PORT_OFFSET: usize = 2;
pub const TCP_SEQUENCE_OFFSET: usize = 4;
pub const TCP_ACK_OFFSET: usize = 8;
pub const TCP_DATA_OFFSET_OFFSET: usize = 12;
pub const TCP_FLAGS_OFFSET: usize = 13;

pub const UDP_SOURCE_PORT_OFFSET: usize = 0;
pub const UDP_DEST_PORT_OFFSET: usize = 2;
pub const UDP_LENGTH_OFFSET: usize = 4;
pub const UDP_CHECKSUM_OFFSET: usize = 6;

pub const PORT_DNS: u16 = 53;
