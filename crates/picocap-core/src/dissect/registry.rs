use std::fmt;

use crate::record::RecordError;

use super::{
    DataDissector, DissectContext, Dissector, DnsDissector, EthernetDissector, Ipv4Dissector,
    NextHeader, ProtocolTag, TcpDissector, UdpDissector,
};

/// Enum of the built-in descriptors, for static dispatch.
#[derive(Debug, Clone, Copy)]
pub enum BuiltinDissector {
    Ethernet(EthernetDissector),
    Ipv4(Ipv4Dissector),
    Tcp(TcpDissector),
    Udp(UdpDissector),
    Dns(DnsDissector),
    Data(DataDissector),
}

macro_rules! delegate_dissector {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            BuiltinDissector::Ethernet(d) => d.$method($($arg),*),
            BuiltinDissector::Ipv4(d) => d.$method($($arg),*),
            BuiltinDissector::Tcp(d) => d.$method($($arg),*),
            BuiltinDissector::Udp(d) => d.$method($($arg),*),
            BuiltinDissector::Dns(d) => d.$method($($arg),*),
            BuiltinDissector::Data(d) => d.$method($($arg),*),
        }
    };
}

impl Dissector for BuiltinDissector {
    #[inline]
    fn name(&self) -> &'static str {
        delegate_dissector!(self, name)
    }

    #[inline]
    fn header_size(&self, ctx: &DissectContext<'_>) -> Result<usize, RecordError> {
        delegate_dissector!(self, header_size, ctx)
    }

    #[inline]
    fn next_payload(&self, ctx: &DissectContext<'_>) -> Result<NextHeader, RecordError> {
        delegate_dissector!(self, next_payload, ctx)
    }

    #[inline]
    fn format(&self, ctx: &DissectContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        delegate_dissector!(self, format, ctx, out)
    }

    #[inline]
    fn dump(
        &self,
        ctx: &DissectContext<'_>,
        out: &mut dyn fmt::Write,
        prefix: &str,
    ) -> fmt::Result {
        delegate_dissector!(self, dump, ctx, out, prefix)
    }
}

impl From<EthernetDissector> for BuiltinDissector {
    fn from(d: EthernetDissector) -> Self {
        BuiltinDissector::Ethernet(d)
    }
}

impl From<Ipv4Dissector> for BuiltinDissector {
    fn from(d: Ipv4Dissector) -> Self {
        BuiltinDissector::Ipv4(d)
    }
}

impl From<TcpDissector> for BuiltinDissector {
    fn from(d: TcpDissector) -> Self {
        BuiltinDissector::Tcp(d)
    }
}

impl From<UdpDissector> for BuiltinDissector {
    fn from(d: UdpDissector) -> Self {
        BuiltinDissector::Udp(d)
    }
}

impl From<DnsDissector> for BuiltinDissector {
    fn from(d: DnsDissector) -> Self {
        BuiltinDissector::Dns(d)
    }
}

impl From<DataDissector> for BuiltinDissector {
    fn from(d: DataDissector) -> Self {
        BuiltinDissector::Data(d)
    }
}

/// Descriptor registry keyed by [`ProtocolTag`].
///
/// Registering a tag twice replaces the earlier descriptor, so callers can
/// override a built-in without rebuilding the registry.
pub struct DissectorRegistry {
    entries: Vec<(ProtocolTag, BuiltinDissector)>,
}

impl DissectorRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register<D: Into<BuiltinDissector>>(&mut self, tag: ProtocolTag, dissector: D) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == tag) {
            entry.1 = dissector.into();
        } else {
            self.entries.push((tag, dissector.into()));
        }
    }

    #[inline]
    pub fn get(&self, tag: ProtocolTag) -> Option<&BuiltinDissector> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, d)| d)
    }

    pub fn tags(&self) -> impl Iterator<Item = ProtocolTag> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DissectorRegistry {
    fn default() -> Self {
        default_registry()
    }
}

/// Registry with every built-in descriptor registered.
pub fn default_registry() -> DissectorRegistry {
    let mut registry = DissectorRegistry::new();
    registry.register(ProtocolTag::Ethernet, EthernetDissector);
    registry.register(ProtocolTag::Ipv4, Ipv4Dissector);
    registry.register(ProtocolTag::Tcp, TcpDissector);
    registry.register(ProtocolTag::Udp, UdpDissector);
    registry.register(ProtocolTag::Dns, DnsDissector);
    registry.register(ProtocolTag::Data, DataDissector);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_every_tag() {
        let registry = default_registry();
        for tag in [
            ProtocolTag::Ethernet,
            ProtocolTag::Ipv4,
            ProtocolTag::Tcp,
            ProtocolTag::Udp,
            ProtocolTag::Dns,
            ProtocolTag::Data,
        ] {
            let dissector = registry.get(tag).unwrap();
            assert_eq!(dissector.name(), tag.name());
        }
    }

    #[test]
    fn registering_a_tag_twice_replaces_it() {
        let mut registry = DissectorRegistry::new();
        registry.register(ProtocolTag::Data, DataDissector);
        registry.register(ProtocolTag::Data, DataDissector);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn missing_tag_is_none() {
        let registry = DissectorRegistry::new();
        assert!(registry.get(ProtocolTag::Tcp).is_none());
        assert!(registry.is_empty());
    }
}
