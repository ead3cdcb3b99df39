use std::fmt;
use std::net::Ipv4Addr;

use crate::record::RecordError;
use crate::wire::Ipv4View;
use crate::wire::layout::{IP_PROTO_TCP, IP_PROTO_UDP};

use super::{DissectContext, Dissector, NextHeader, ProtocolTag};

#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv4Dissector;

impl Dissector for Ipv4Dissector {
    fn name(&self) -> &'static str {
        "ipv4"
    }

    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError> {
        Ok(Ipv4View::parse(ctx.frame(), ctx.offset())?.header_len())
    }

    fn next_payload(&self, ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError> {
        let view = Ipv4View::parse(ctx.frame(), ctx.offset())?;
        let tag = match view.protocol() {
            IP_PROTO_TCP => ProtocolTag::Tcp,
            IP_PROTO_UDP => ProtocolTag::Udp,
            _ => ProtocolTag::Data,
        };
        Ok(NextHeader::Header {
            tag,
            offset: view.payload_offset(),
        })
    }

    fn format(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        let view = match Ipv4View::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return write!(out, "ipv4 [truncated]"),
        };
        write!(
            out,
            "{} -> {} ttl={} proto={}",
            Ipv4Addr::from(view.source()),
            Ipv4Addr::from(view.destination()),
            view.ttl(),
            view.protocol(),
        )
    }

    fn dump(
        &self,
        ctx: &DissectContext<'_>,
        out: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        let view = match Ipv4View::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return writeln!(out, "{prefix}[truncated]"),
        };
        writeln!(out, "{prefix}{:<20}{}", "version:", view.version())?;
        writeln!(out, "{prefix}{:<20}{}", "header_len:", view.header_len())?;
        writeln!(out, "{prefix}{:<20}{}", "total_length:", view.total_length())?;
        writeln!(out, "{prefix}{:<20}{}", "ttl:", view.ttl())?;
        writeln!(out, "{prefix}{:<20}{}", "protocol:", view.protocol())?;
        writeln!(
            out,
            "{prefix}{:<20}{}",
            "source:",
            Ipv4Addr::from(view.source())
        )?;
        writeln!(
            out,
            "{prefix}{:<20}{}",
            "destination:",
            Ipv4Addr::from(view.destination())
        )
    }
}
