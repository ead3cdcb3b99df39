use std::fmt;

use crate::record::RecordError;
use crate::wire::TcpView;
use crate::wire::layout::PORT_DNS;

use super::{DissectContext, Dissector, NextHeader, ProtocolTag};

#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDissector;

impl Dissector for TcpDissector {
    fn name(&self) -> &'static str {
        "tcp"
    }

    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError> {
        Ok(TcpView::parse(ctx.frame(), ctx.offset())?.header_len())
    }

    fn next_payload(&self, ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError> {
        let view = TcpView::parse(ctx.frame(), ctx.offset())?;
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
        let view = match TcpView::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return write!(out, "tcp [truncated]"),
        };
        write!(
            out,
            ":{} -> :{} seq={} ack={} flags={:#04x}",
            view.source_port(),
            view.dest_port(),
            view.sequence(),
            view.ack(),
            view.flags(),
        )
    }

    fn dump(
        &self,
        ctx: &DissectContext<'_>,
        out: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        let view = match TcpView::parse(ctx.frame(), ctx.offset()) {
            Ok(view) => view,
            Err(_) => return writeln!(out, "{prefix}[truncated]"),
        };
        writeln!(out, "{prefix}{:<20}{}", "source_port:", view.source_port())?;
        writeln!(out, "{prefix}{:<20}{}", "dest_port:", view.dest_port())?;
        writeln!(out, "{prefix}{:<20}{}", "sequence:", view.sequence())?;
        writeln!(out, "{prefix}{:<20}{}", "ack:", view.ack())?;
        writeln!(out, "{prefix}{:<20}{}", "header_len:", view.header_len())?;
        writeln!(out, "{prefix}{:<20}{:#04x}", "flags:", view.flags())
    }
}
