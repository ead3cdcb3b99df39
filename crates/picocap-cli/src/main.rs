use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use picocap_core::dissect::{
    DissectContext, DissectError, Dissector, DissectorRegistry, WalkEnd, default_registry, dissect,
};
use picocap_core::layers::{Level, SizeError, payload_size};
use picocap_core::picotime::format_duration;
use picocap_core::summary::ip_protocol_name;
use picocap_core::units::{format_bytes, format_rate};
use picocap_core::TrafficSummary;

mod stream;

use stream::StreamReader;

/// Version with the build stamp from build.rs, shown by `--version`.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("PICOCAP_BUILD_COMMIT"),
    ", built ",
    env!("PICOCAP_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "picocap")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Inspect captured-frame streams: summaries, header walks, payload sizes.",
    long_about = None,
    after_help = "Examples:\n  picocap info capture.cap --breakdown\n  picocap walk capture.cap -p 10\n  picocap size capture.cap --level transport"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize one or more capture files.
    Info {
        /// Capture files in record-stream format
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// List per-protocol packet counts
        #[arg(long)]
        breakdown: bool,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the header chain of every record.
    Walk {
        /// Capture file in record-stream format
        input: PathBuf,

        /// Stop after this many records
        #[arg(short = 'p', long = "packets")]
        packets: Option<u64>,
    },

    /// Report per-record payload sizes at one protocol layer.
    Size {
        /// Capture file in record-stream format
        input: PathBuf,

        /// Layer: physical, link, network, transport or application
        #[arg(long, default_value = "application")]
        level: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Info {
            inputs,
            breakdown,
            json,
        } => cmd_info(&inputs, breakdown, json),
        Commands::Walk { input, packets } => cmd_walk(&input, packets),
        Commands::Size { input, level } => cmd_size(&input, &level),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn summarize_file(path: &Path) -> Result<TrafficSummary> {
    let mut reader = StreamReader::open(path)?;
    let mut summary = TrafficSummary::new();
    while let Some(buffer) = reader.next_record()? {
        let record = buffer
            .as_record()
            .with_context(|| format!("record {} is malformed", reader.records_read() - 1))?;
        summary.add(&record);
    }
    Ok(summary)
}

fn cmd_info(inputs: &[PathBuf], breakdown: bool, json: bool) -> Result<()> {
    let mut reports = Vec::new();
    for input in inputs {
        let summary = summarize_file(input)?;
        if json {
            reports.push(serde_json::json!({
                "file": input.display().to_string(),
                "summary": serde_json::to_value(&summary).context("serialize summary")?,
            }));
        } else {
            print_info(input, &summary, breakdown)?;
        }
    }

    if json {
        let out = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])
        } else {
            serde_json::to_string_pretty(&reports)
        }
        .context("serialize summary")?;
        println!("{out}");
    }
    Ok(())
}

fn print_info(path: &Path, summary: &TrafficSummary, breakdown: bool) -> Result<()> {
    println!("{}", path.display());
    if let (Some(first), Some(last)) = (summary.first, summary.last) {
        println!(
            " captured: {} to {}",
            first.format_calendar_default()?,
            last.format_calendar_default()?
        );
        let duration = last.saturating_sub(first);
        let exact =
            duration.seconds() as f64 + duration.picoseconds() as f64 / 1e12;
        println!(
            " duration: {} ({exact:.1} seconds)",
            format_duration(first, last)
        );
    }
    println!("  packets: {}", summary.packets);
    println!("    bytes: {}", format_bytes(summary.bytes));
    if let Some(rate) = summary.mean_bit_rate() {
        println!("     rate: {}", format_rate(rate));
    }

    if breakdown {
        if !summary.ipv4.is_empty() {
            let mut line = String::from("       ip:");
            for (proto, count) in &summary.ipv4 {
                match ip_protocol_name(*proto) {
                    Some(name) => line.push_str(&format!(" {name}({count})")),
                    None => line.push_str(&format!(" ipproto-{proto}({count})")),
                }
            }
            println!("{line}");
        }
        for (label, count) in [
            ("arp", summary.arp),
            ("stp", summary.stp_bridges),
            ("cdp/vtp", summary.cdp_vtp),
            ("other", summary.other),
            ("truncated", summary.truncated),
        ] {
            if count > 0 {
                println!("{label:>9}: {count}");
            }
        }
    }
    Ok(())
}

fn cmd_walk(input: &Path, packets: Option<u64>) -> Result<()> {
    let registry = default_registry();
    let mut reader = StreamReader::open(input)?;
    let mut shown = 0u64;

    while let Some(buffer) = reader.next_record()? {
        if let Some(limit) = packets {
            if shown >= limit {
                break;
            }
        }
        shown += 1;

        let record = buffer
            .as_record()
            .with_context(|| format!("record {} is malformed", reader.records_read() - 1))?;
        println!(
            "[{shown}] {}:{} {} len={} caplen={}",
            record.nic_str(),
            record.source_str(),
            record.timestamp(),
            record.frame_length(),
            record.captured_length()
        );

        match dissect(&registry, &record) {
            Ok(result) => print_chunks(&registry, record.captured(), &result.chunks, result.end)?,
            Err(DissectError::Corrupt { offset }) => {
                println!("  corrupt header at offset {offset}");
            }
            Err(DissectError::Missing(tag)) => {
                bail!("no descriptor registered for {tag}");
            }
        }
    }
    Ok(())
}

fn print_chunks(
    registry: &DissectorRegistry,
    frame: &[u8],
    chunks: &[picocap_core::dissect::HeaderChunk],
    end: WalkEnd,
) -> Result<()> {
    for chunk in chunks {
        let Some(dissector) = registry.get(chunk.tag) else {
            continue;
        };
        let ctx = DissectContext::new(frame, chunk.offset);
        let mut line = String::new();
        dissector
            .format(&ctx, &mut line)
            .context("render header line")?;
        println!("  {} @ {} ({} bytes): {line}", chunk.tag, chunk.offset, chunk.size);

        let mut fields = String::new();
        dissector
            .dump(&ctx, &mut fields, "    ")
            .context("render header fields")?;
        print!("{fields}");
    }
    if let WalkEnd::Truncated { needed, actual, .. } = end {
        println!("  truncated: need {needed} bytes, got {actual}");
    }
    Ok(())
}

fn cmd_size(input: &Path, level_name: &str) -> Result<()> {
    let level = Level::from_name(level_name);
    if level == Level::Invalid && !level_name.eq_ignore_ascii_case("invalid") {
        bail!("unknown level '{level_name}' (physical, link, network, transport, application)");
    }

    let mut reader = StreamReader::open(input)?;
    let mut total = 0u64;
    let mut counted = 0u64;
    let mut unsupported = 0u64;
    let mut truncated = 0u64;
    let mut index = 0u64;

    while let Some(buffer) = reader.next_record()? {
        index += 1;
        let record = buffer
            .as_record()
            .with_context(|| format!("record {} is malformed", index - 1))?;
        match payload_size(level, &record) {
            Ok(size) => {
                total += size;
                counted += 1;
                println!("[{index}] {size}");
            }
            Err(SizeError::Unsupported(what)) => {
                unsupported += 1;
                println!("[{index}] unsupported ({what})");
            }
            Err(SizeError::Truncated { needed, actual }) => {
                truncated += 1;
                println!("[{index}] truncated (need {needed} bytes, got {actual})");
            }
        }
    }

    println!(
        "total: {} at {} over {counted} records ({unsupported} unsupported, {truncated} truncated)",
        format_bytes(total),
        level.name()
    );
    Ok(())
}
