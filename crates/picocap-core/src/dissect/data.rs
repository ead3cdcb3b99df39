use std::fmt;

use crate::record::RecordError;

use super::{DissectContext, Dissector, NextHeader};

/// Terminal catch-all for payloads with no registered descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataDissector;

impl Dissector for DataDissector {
    fn name(&self) -> &'static str {
        "data"
    }

    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError> {
        Ok(ctx.remaining())
    }

    fn next_payload(&self, _ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError> {
        Ok(NextHeader::Terminal)
    }

    fn format(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{} bytes of data", ctx.remaining())
    }

    fn dump(
        &self,
        ctx: &DissectContext<'_>,
        out: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        writeln!(out, "{prefix}{:<20}{}", "size:", ctx.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::DataDissector;
    use crate::dissect::{DissectContext, Dissector, NextHeader};

    #[test]
    fn consumes_the_rest_of_the_capture() {
        let frame = [0u8; 20];
        let ctx = DissectContext::new(&frame, 14);
        let dissector = DataDissector;
        assert_eq!(dissector.header_size(&ctx).unwrap(), 6);
        assert_eq!(dissector.next_payload(&ctx).unwrap(), NextHeader::Terminal);
    }

    #[test]
    fn empty_remainder_is_an_empty_chunk() {
        let frame = [0u8; 14];
        let ctx = DissectContext::new(&frame, 14);
        assert_eq!(DataDissector.header_size(&ctx).unwrap(), 0);
    }
}
