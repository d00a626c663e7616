// heaptrail: heap lifecycle history from event traces

use anyhow::Context;
use clap::{Parser, Subcommand};
use heaptrail::events::decode::{load_trace, LoadReport};
use heaptrail::history::{HeapHistory, Tick};
use heaptrail::report;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "heaptrail")]
#[command(about = "Inspect the lifecycle history of heap blocks in an event trace", long_about = None)]
struct Cli {
    /// Log conflicts and skipped records (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a trace and print totals, conflicts, and timeline events
    Summary {
        /// JSON trace file
        trace: PathBuf,
    },
    /// Find the block that owns an address at a given tick
    BlockAt {
        /// JSON trace file
        trace: PathBuf,

        /// Address to look up (decimal or 0x-prefixed hex)
        #[arg(long, short, value_parser = parse_address)]
        address: u64,

        /// Tick to look up
        #[arg(long, short)]
        tick: Tick,

        /// Use the linear scan instead of the sorted index
        #[arg(long)]
        scan: bool,
    },
    /// Find the timeline event nearest to a tick
    EventNear {
        /// JSON trace file
        trace: PathBuf,

        /// Tick to look up
        #[arg(long, short)]
        tick: Tick,
    },
}

fn parse_address(text: &str) -> Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", text, e))
}

fn load(path: &Path) -> anyhow::Result<(HeapHistory, LoadReport)> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut history = HeapHistory::new();
    let load = load_trace(BufReader::new(file), &mut history)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok((history, load))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Summary { trace } => {
            let (history, load) = load(&trace)?;
            println!("{}", report::summary(&history, &load));
            if !history.conflicts().is_empty() {
                println!("\nConflicts\n");
                println!("{}", report::conflicts(&history));
            }
            if !history.timeline_events().is_empty() {
                println!("\nTimeline\n");
                println!("{}", report::timeline(&history));
            }
        }
        Commands::BlockAt {
            trace,
            address,
            tick,
            scan,
        } => {
            let (history, _) = load(&trace)?;
            let hit = if scan {
                history.scan_block_at(address, tick)
            } else {
                history.find_block_at(address, tick)
            };
            match hit {
                Some((index, block)) => println!("{}", report::describe_block(index, block)),
                None => println!("no block at 0x{:x} at tick {}", address, tick),
            }
        }
        Commands::EventNear { trace, tick } => {
            let (history, _) = load(&trace)?;
            match history.event_near(tick) {
                Some(label) => println!("{}", label),
                None => println!("no event within range of tick {}", tick),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("4096"), Ok(4096));
        assert_eq!(parse_address("0x1000"), Ok(4096));
        assert_eq!(parse_address("0XfF"), Ok(255));
        assert!(parse_address("0xZZ").is_err());
        assert!(parse_address("").is_err());
    }
}
