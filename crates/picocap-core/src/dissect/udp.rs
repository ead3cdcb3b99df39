use std::fmt;

use crate::record::RecordError;
use crate::wire::UdpView;
use crate::wire::layout::{PORT_DNS, UDP_HEADER_SIZE};

use super::{DissectContext, Dissector, NextHeader, ProtocolTag};

#[derive(Debug, Clone, Copy, Default)]
pub struct UdpDissector;

impl Dissector for UdpDissector {
    fn name(&self) -> &'static str {
        "udp"
    }

    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError> {
        UdpView::parse(ctx.frame(), ctx.offset())?;
        Ok(UDP_HEADER_SIZE)
    }

    fn next_payload(&self, ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError> {
        let view = UdpView::parse(ctx.frame(), ctx.offset())?;
        let tag = if view.source_port() == PORT_DNS || view.dest_port() == PORT_DNS {
            ProtocolTag::Dns
        } else {
            ProtocolTag::Data
        };
        Ok(NextHeader::Header {
            tag,
            offset: view.payload_offset(),
        })
    }

    fn format(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        let view = match UdpView::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return write!(out, "udp [truncated]"),
        };
        write!(
            out,
            ":{} -> :{} len={}",
            view.source_port(),
            view.dest_port(),
            view.length(),
        )
    }

    fn dump(
        &self,
        ctx: &DissectContext<'_>,
        out: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        let view = match UdpView::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return writeln!(out, "{prefix}[truncated]"),
        };
        writeln!(out, "{prefix}{:<20}{}", "source_port:", view.source_port())?;
        writeln!(out, "{prefix}{:<20}{}", "dest_port:", view.dest_port())?;
        writeln!(out, "{prefix}{:<20}{}", "length:", view.length())?;
        writeln!(out, "{prefix}{:<20}{:#06x}", "checksum:", view.checksum())
    }
}

#[cfg(test)]
mod tests {
    use super::UdpDissector;
    use crate::dissect::{DissectContext, Dissector, NextHeader, ProtocolTag};

    fn header(source_port: u16, dest_port: u16) -> Vec<u8> {
        let mut udp = vec![0u8; 8];
        udp[0..2].copy_from_slice(&source_port.to_be_bytes());
        udp[2..4].copy_from_slice(&dest_port.to_be_bytes());
        udp[4..6].copy_from_slice(&28u16.to_be_bytes());
        udp
    }

    #[test]
    fn dns_port_is_recognized_either_way() {
        let dissector = UdpDissector;
        for (sport, dport, tag) in [
            (53u16, 40000u16, ProtocolTag::Dns),
            (40000, 53, ProtocolTag::Dns),
            (40000, 123, ProtocolTag::Data),
        ] {
            let udp = header(sport, dport);
            let ctx = DissectContext::new(&udp, 0);
            assert_eq!(
                dissector.next_payload(&ctx).unwrap(),
                NextHeader::Header { tag, offset: 8 }
            );
        }
    }

    #[test]
    fn format_shows_ports_and_length() {
        let udp = header(4000, 53);
        let ctx = DissectContext::new(&udp, 0);
        let mut line = String::new();
        UdpDissector.format(&ctx, &mut line).unwrap();
        assert_eq!(line, ":4000 -> :53 len=28");
    }
}
