//! dnseval - Benchmark and rank DNS providers by lookup latency.
//!
//! This crate provides both a library API and a CLI tool for:
//! - Resolving a fixed list of popular hostnames against every address of
//!   every DNS provider, many times over
//! - Reducing the timings to per-provider median, min and max latency
//! - Ranking providers, with unreachable ones listed last
//! - Live progress display and an interactive TUI
//!
//! # Library Usage
//!
//! ```ignore
//! use dnseval::{ConfigLoader, DirectResolver, ScanSettings, Scanner};
//!
//! let providers = ConfigLoader::load_from_file("providers.csv")?;
//! let hostnames = dnseval::config::default_hostnames();
//!
//! let mut scanner = Scanner::new(DirectResolver::default(), ScanSettings::default());
//! let report = scanner.run(&providers, &hostnames, |_event| {}).await?;
//! for summary in &report.summaries {
//!     println!("{} {}", summary.name, summary.median_display());
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Scan providers.csv with a live progress display
//! dnseval
//! dnseval scan --samples 50 --format json
//! dnseval scan --provider "Quad9,9.9.9.9;149.112.112.112,2620:fe::fe"
//!
//! # Interactive TUI
//! dnseval interactive
//!
//! # List providers
//! dnseval list --ipv6
//! ```

pub mod cli;
pub mod config;
pub mod dns;
pub mod error;
pub mod tui;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat, ScanArgs};
pub use config::ConfigLoader;
pub use dns::types::{
    AddressAverage, AddressFamily, Provider, ProviderSummary, ScanReport, ScanSettings,
    TrialResult,
};
pub use dns::{DirectResolver, Resolve, ScanEvent, ScanState, Scanner};
pub use error::{Error, Result};
