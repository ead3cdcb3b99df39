//! Human-readable byte and bit-rate quantities.

const BYTE_PREFIXES: [&str; 9] = ["", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];
const RATE_PREFIXES: [&str; 7] = ["bps", "kbps", "Mbps", "Gbps", "Tbps", "Pbps", "Ebps"];

/// Render a byte count with a binary prefix, keeping the exact count in
/// parentheses: `1.5 KiB (1536 bytes)`. Counts below 1024 carry no prefix.
pub fn format_bytes(bytes: u64) -> String {
    let mut multiplier = 1u64;
    let mut n = 0;
    while bytes / multiplier >= 1024 && n < BYTE_PREFIXES.len() - 1 {
        multiplier *= 1024;
        n += 1;
    }
    if n == 0 {
        return format!("{bytes} ({bytes} bytes)");
    }
    let scaled = bytes as f64 / multiplier as f64;
    format!("{scaled:.1} {} ({bytes} bytes)", BYTE_PREFIXES[n])
}

/// Render a bit rate with a decimal prefix, keeping the exact rate in
/// parentheses: `1.5 Mbps (1500000 bps)`. Rates below 1000 carry no
/// prefix. Bit rates use powers of 1000, unlike byte counts.
pub fn format_rate(bps: f64) -> String {
    let bps = if bps.is_finite() && bps > 0.0 { bps } else { 0.0 };
    let mut scaled = bps;
    let mut n = 0;
    while scaled >= 1000.0 && n < RATE_PREFIXES.len() - 1 {
        scaled /= 1000.0;
        n += 1;
    }
    if n == 0 {
        return format!("{bps:.0} ({bps:.0} bps)");
    }
    format!("{scaled:.1} {} ({bps:.0} bps)", RATE_PREFIXES[n])
}

#[cfg(test)]
mod tests {
    use super::{format_bytes, format_rate};

    #[test]
    fn small_counts_have_no_prefix() {
        assert_eq!(format_bytes(0), "0 (0 bytes)");
        assert_eq!(format_bytes(512), "512 (512 bytes)");
        assert_eq!(format_bytes(1023), "1023 (1023 bytes)");
    }

    #[test]
    fn byte_prefixes_are_binary() {
        assert_eq!(format_bytes(1024), "1.0 KiB (1024 bytes)");
        assert_eq!(format_bytes(1536), "1.5 KiB (1536 bytes)");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB (3145728 bytes)");
    }

    #[test]
    fn rate_prefixes_are_decimal() {
        assert_eq!(format_rate(512.0), "512 (512 bps)");
        assert_eq!(format_rate(1_500_000.0), "1.5 Mbps (1500000 bps)");
        assert_eq!(format_rate(2_000.0), "2.0 kbps (2000 bps)");
    }

    #[test]
    fn degenerate_rates_render_as_zero() {
        assert_eq!(format_rate(f64::NAN), "0 (0 bps)");
        assert_eq!(format_rate(-3.0), "0 (0 bps)");
    }
}
