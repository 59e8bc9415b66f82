//! Command-line interface (CLI) argument parsing module.
//!
//! This module provides CLI argument parsing using `clap`.
//! It supports a plain scan with a live progress display, an interactive
//! TUI scan, listing providers, and generating shell completions.

use crate::dns::types::{ScanSettings, DEFAULT_SAMPLE_COUNT};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// CLI argument parser using clap derive macro.
///
/// # Example
///
/// ```ignore
/// let cli = Cli::parse();
/// match cli.command {
///     Some(Commands::Scan(args)) => { /* ... */ }
///     Some(Commands::List { .. }) => { /* ... */ }
///     None => { /* default scan */ }
/// }
/// ```
#[derive(Parser, Debug)]
#[command(
    name = "dnseval",
    version,
    about = "Benchmark DNS providers by lookup latency",
    long_about = "Resolves a fixed list of popular hostnames many times against every \
                  address of every DNS provider and ranks providers by median latency",
    infer_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default, human-readable)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated)
    Tsv,
}

impl OutputFormat {
    /// Get all available output format names.
    #[must_use]
    pub fn names() -> &'static [&'static str] {
        &["table", "json", "csv", "tsv"]
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(format!(
                "Unknown format: {}. Valid options are: {:?}",
                s,
                Self::names()
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

/// Arguments shared by the plain and interactive scans.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ScanArgs {
    /// Provider table file (header line, then `name,ipv4;...,ipv6;...`)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Custom provider record (format: name,ipv4;ipv4,ipv6;ipv6)
    #[arg(long = "provider")]
    pub providers: Vec<String>,

    /// Lookups per address and hostname
    #[arg(short = 'n', long, env = "DNSEVAL_SAMPLES", default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub samples: usize,

    /// Upper bound for a single lookup, in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Hostname to resolve instead of the built-in list
    #[arg(long = "host")]
    pub hosts: Vec<String>,
}

impl ScanArgs {
    /// Scan settings described by these arguments.
    #[must_use]
    pub fn settings(&self) -> ScanSettings {
        ScanSettings::new(self.samples)
            .with_trial_timeout(self.timeout.map(Duration::from_secs))
    }
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            file: None,
            providers: Vec::new(),
            samples: DEFAULT_SAMPLE_COUNT,
            timeout: None,
            hosts: Vec::new(),
        }
    }
}

/// Available commands for the dnseval CLI.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan all providers with a live progress display
    ///
    /// This is the default when no command is given. Progress is drawn on
    /// stderr; the final report goes to stdout in the selected format.
    #[command(alias = "s")]
    Scan(ScanArgs),

    /// Scan inside the interactive terminal user interface (TUI)
    #[command(alias = "i")]
    Interactive(ScanArgs),

    /// List providers and their addresses
    ///
    /// Can filter by address family (IPv4/IPv6).
    #[command(alias = "l")]
    List {
        /// Provider table file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Show only providers with IPv4 addresses
        #[arg(long = "ipv4")]
        ipv4_only: bool,

        /// Show only providers with IPv6 addresses
        #[arg(long = "ipv6")]
        ipv6_only: bool,
    },

    /// Generate a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Parse CLI arguments and return verbose flag.
///
/// # Returns
///
/// Returns a tuple of `(Cli, verbose)` where `verbose` indicates
/// whether verbose logging was enabled.
#[must_use]
pub fn parse_verbose() -> (Cli, bool) {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    (cli, verbose)
}

/// Write a completion script for `shell` to stdout.
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
