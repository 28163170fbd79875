//! Popbench CLI: time 32-bit population count algorithms.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use popbench::{catalog, AlgorithmInfo, Config, Family, Selection};
use std::io::{self, Write};

mod metadata;

use metadata::RunRecord;

#[derive(Debug, Parser)]
#[command(name = "popbench")]
#[command(about = "Compare 32-bit population count algorithms", long_about = None)]
#[command(version)]
struct Cli {
    /// Timed passes over the random block, divided down for slow algorithms
    #[arg(value_name = "ITERATIONS", required_unless_present = "list")]
    iterations: Option<u32>,

    /// Number of words in the random block
    #[arg(long, default_value = "1000")]
    block_size: usize,

    /// Seed for the random block (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_seed)]
    seed: Option<u64>,

    /// Untimed warm-up passes, divided down like ITERATIONS
    #[arg(long, default_value = "50000")]
    preheat: u32,

    /// Count block words as-is instead of XORing in the running sum
    #[arg(long)]
    no_chain: bool,

    /// Run only these algorithms (comma-separated catalog names)
    /// Example: --only popcount_keane,popcount_builtin
    #[arg(long, value_delimiter = ',', conflicts_with = "family")]
    only: Vec<String>,

    /// Run only these families (comma-separated)
    /// Example: --family table,hardware
    #[arg(long, value_delimiter = ',')]
    family: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// List the algorithm catalog and exit
    #[arg(long)]
    list: bool,

    /// Log more (repeat for debug and trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Log errors only
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Result lines as they are measured
    Text,
    /// One JSON run record at the end
    Json,
}

impl Cli {
    fn families(&self) -> Result<Vec<Family>> {
        self.family
            .iter()
            .map(|s| {
                s.parse::<Family>()
                    .map_err(|_| anyhow::Error::from(popbench::Error::UnknownFamily(s.clone())))
            })
            .collect()
    }

    fn selection(&self) -> Result<Selection> {
        if !self.only.is_empty() {
            return Ok(Selection::Names(self.only.clone()));
        }
        if !self.family.is_empty() {
            return Ok(Selection::Family(self.families()?));
        }
        Ok(Selection::All)
    }

    fn to_config(&self) -> Result<Config> {
        let iterations = self.iterations.context("missing ITERATIONS")?;
        Ok(Config {
            iterations,
            block_size: self.block_size,
            seed: self.seed.unwrap_or(popbench::DEFAULT_SEED),
            preheat: self.preheat,
            chained: !self.no_chain,
            selection: self.selection()?,
        })
    }

    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if cli.list {
        return run_list(&cli);
    }

    let config = cli.to_config()?;
    log::debug!("config: {:?}", config);

    match cli.format {
        OutputFormat::Text => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            popbench::run(&config, &mut out).context("benchmark run failed")?;
        }
        OutputFormat::Json => {
            let report =
                popbench::run(&config, &mut io::sink()).context("benchmark run failed")?;
            let record = RunRecord::new(&config, report);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &record)
                .context("failed to write JSON report")?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Print the catalog, optionally narrowed by `--family`.
fn run_list(cli: &Cli) -> Result<()> {
    let families = cli.families()?;
    let entries: Vec<&AlgorithmInfo> = catalog::ALGORITHMS
        .iter()
        .filter(|a| families.is_empty() || families.contains(&a.family))
        .collect();

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<22} {:<20} {:<8} Description",
                "Name", "Family", "Divisor"
            );
            println!("{:-<22} {:-<20} {:-<8} {:-<40}", "", "", "", "");
            for a in &entries {
                let mut description = a.description.to_string();
                if let Some(capability) = a.requires {
                    if !a.is_compiled_in() {
                        description.push_str(" [not built for this target]");
                    } else if !capability.is_available() {
                        description.push_str(&format!(" [needs {}]", capability));
                    }
                }
                println!(
                    "{:<22} {:<20} {:<8} {}",
                    a.name,
                    a.family.to_string(),
                    a.divisor,
                    description
                );
            }
            println!();
            println!("Total: {} algorithms", entries.len());
        }
    }

    Ok(())
}

/// Parse a seed as decimal or `0x`-prefixed hex.
fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid seed '{}': {}", s, e))
}
