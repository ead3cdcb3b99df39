use std::fmt;

use crate::record::RecordError;
use crate::wire::layout::{
    ETHERTYPE_IPV4, ETHERTYPE_MAX_LENGTH, LLC_HEADER_SIZE,
};
use crate::wire::{EthernetView, resolve_link_header};

use super::{DissectContext, Dissector, NextHeader, ProtocolTag};

/// Link-layer descriptor.
///
/// The header absorbs any 802.1Q tags (14 bytes plus 4 per tag), so the
/// emitted chunk never overlaps the next one. A type/length value below
/// 0x0600 marks an IEEE 802.3 frame whose LLC payload is left opaque.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthernetDissector;

impl Dissector for EthernetDissector {
    fn name(&self) -> &'static str {
        "ethernet"
    }

    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError> {
        let (_, link_len) = resolve_link_header(ctx.frame(), ctx.offset())?;
        Ok(link_len)
    }

    fn next_payload(&self, ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError> {
        let (value, link_len) = resolve_link_header(ctx.frame(), ctx.offset())?;
        let payload = ctx.offset() + link_len;

        if value < ETHERTYPE_MAX_LENGTH {
            // 802.3 length field; the LLC payload is not decoded further.
            return Ok(NextHeader::Header {
                tag: ProtocolTag::Data,
                offset: payload,
            });
        }

        let tag = match value {
            ETHERTYPE_IPV4 => ProtocolTag::Ipv4,
            _ => ProtocolTag::Data,
        };
        Ok(NextHeader::Header {
            tag,
            offset: payload,
        })
    }

    fn format(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        let view = match EthernetView::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return write!(out, "ethernet [truncated]"),
        };

        if view.is_length_field() {
            write!(
                out,
                "IEEE 802.3 [{:#06x}] {} -> {}",
                view.ether_type(),
                format_mac(view.source()),
                format_mac(view.destination()),
            )?;
            if let Ok(llc) = ctx
                .reader()
                .read_slice(view.payload_offset(), LLC_HEADER_SIZE)
            {
                write!(
                    out,
                    " dsap={:02x} ssap={:02x} ctrl={:02x}{:02x}",
                    llc[0], llc[1], llc[2], llc[3]
                )?;
            }
            return Ok(());
        }

        write!(
            out,
            "{} -> {} [{:#06x}]",
            format_mac(view.source()),
            format_mac(view.destination()),
            view.ether_type(),
        )
    }

    fn dump(
        &self,
        ctx: &DissectContext<'_>,
        out: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        let view = match EthernetView::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return writeln!(out, "{prefix}[truncated]"),
        };
        writeln!(out, "{prefix}{:<20}{}", "source:", format_mac(view.source()))?;
        writeln!(
            out,
            "{prefix}{:<20}{}",
            "destination:",
            format_mac(view.destination())
        )?;
        writeln!(out, "{prefix}{:<20}{:#06x}", "ether_type:", view.ether_type())
    }
}

pub(crate) fn format_mac(addr: [u8; 6]) -> String {
    addr.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}
