use std::fmt;

use crate::record::RecordError;

use super::{DissectContext, Dissector, NextHeader};

/// Terminal descriptor for traffic on the DNS port. The message body is
/// recognized but not decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsDissector;

impl Dissector for DnsDissector {
    fn name(&self) -> &'static str {
        "dns"
    }

    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError> {
        Ok(ctx.remaining())
    }

    fn next_payload(&self, _ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError> {
        Ok(NextHeader::Terminal)
    }

    fn format(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "DNS message, {} bytes (not decoded)", ctx.remaining())
    }

    fn dump(
        &self,
        ctx: &DissectContext<'_>,
        out: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        writeln!(out, "{prefix}{:<20}{}", "size:", ctx.remaining())?;
        writeln!(out, "{prefix}{:<20}{}", "decoded:", "no")
    }
}
