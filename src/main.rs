//! dnseval - DNS provider latency benchmark
//!
//! Binary entry point for the dnseval CLI application.

#![warn(clippy::all, warnings)]
#![warn(clippy::pedantic, clippy::nursery)]

use crossterm::style::Stylize;
use crossterm::{cursor, execute, terminal};
use dnseval::cli::{Commands, OutputFormat, ScanArgs};
use dnseval::config::{hostnames_or_default, ConfigLoader};
use dnseval::dns::progress::{ProgressEvent, DEFAULT_BAR_WIDTH};
use dnseval::dns::{DirectResolver, Provider, ScanEvent, ScanReport, Scanner};
use dnseval::error::Result;
use dnseval::tui::App;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up logging based on verbosity level.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `quiet` - Enable error-level only logging
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

/// Load providers from command-line records, a file, or the default table.
///
/// # Arguments
///
/// * `file` - Optional path to a provider table
/// * `records` - Optional command-line provider records
fn load_providers(file: Option<PathBuf>, records: Vec<String>) -> Result<Vec<Provider>> {
    if !records.is_empty() {
        return ConfigLoader::from_args(records);
    }

    if let Some(path) = file {
        return ConfigLoader::load_from_file(path);
    }

    ConfigLoader::load_default()
}

/// Redraw the live progress display.
fn draw_live(out: &mut impl Write, event: &ProgressEvent) -> std::io::Result<()> {
    let bar = event.progress.bar(DEFAULT_BAR_WIDTH);

    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    writeln!(out, "              {}\n", "D N S / E V A L".dim())?;
    writeln!(
        out,
        "{}{}  {}\n",
        bar.filled_segment().yellow(),
        bar.empty_segment().dim(),
        bar.percent_label()
    )?;
    writeln!(out, "{} {}", "Sampling".dim(), event.provider)?;
    writeln!(out, "{}       {}", "IP".dim(), event.address)?;
    writeln!(out, "{}     {}", "Host".dim(), event.hostname)?;
    out.flush()
}

/// Run a scan with a live progress display and print the report.
///
/// # Arguments
///
/// * `args` - Scan arguments
/// * `format` - Output format
async fn run_scan(args: ScanArgs, format: OutputFormat) -> Result<()> {
    let settings = args.settings();
    settings.validate()?;
    let providers = load_providers(args.file, args.providers)?;
    let hostnames = hostnames_or_default(args.hosts);

    let mut scanner = Scanner::new(DirectResolver::new(settings.trial_timeout), settings);
    let mut err = std::io::stderr();
    execute!(err, cursor::Hide)?;

    let result = scanner
        .run(&providers, &hostnames, |event| {
            if let ScanEvent::Progress(progress) = event {
                if let Err(e) = draw_live(&mut err, &progress) {
                    tracing::debug!("Progress display failed: {e}");
                }
            }
        })
        .await;

    execute!(
        err,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0),
        cursor::Show
    )?;
    let report = result?;
    writeln!(err, "{}\n", "Scanning complete.".dim())?;

    match format {
        OutputFormat::Table => print_report_table(&report),
        OutputFormat::Json => print_report_json(&report)?,
        OutputFormat::Csv => print_report_delimited(&report, ","),
        OutputFormat::Tsv => print_report_delimited(&report, "\t"),
    }

    Ok(())
}

/// Print the report in table format.
fn print_report_table(report: &ScanReport) {
    let name_width = report
        .summaries
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    println!(
        "{:<4} {:<name_width$} {:>12} {:>12} {:>12} {:>8}",
        "#", "name", "median ms", "min ms", "max ms", "samples"
    );
    println!("{}", "-".repeat(name_width + 54));

    for (idx, s) in report.summaries.iter().enumerate() {
        println!(
            "{:<4} {:<name_width$} {:>12} {:>12} {:>12} {:>8}",
            idx + 1,
            s.name,
            s.median_display(),
            s.min_display(),
            s.max_display(),
            s.samples
        );
    }

    println!(
        "\n{} hosts x {} samples, {}/{} providers answered",
        report.hostname_count,
        report.sample_count,
        report.available_count(),
        report.summaries.len()
    );
}

/// Print the report in JSON format.
fn print_report_json(report: &ScanReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

/// Print the report as CSV or TSV.
fn print_report_delimited(report: &ScanReport, sep: &str) {
    println!(
        "{}",
        ["#", "Name", "Median(ms)", "Min(ms)", "Max(ms)", "Samples"].join(sep)
    );
    for (idx, s) in report.summaries.iter().enumerate() {
        println!(
            "{}",
            [
                (idx + 1).to_string(),
                s.name.clone(),
                s.median_display(),
                s.min_display(),
                s.max_display(),
                s.samples.to_string(),
            ]
            .join(sep)
        );
    }
}

/// List providers with optional filtering.
///
/// # Arguments
///
/// * `file` - Optional provider table
/// * `ipv4_only` - Show only providers with IPv4 addresses
/// * `ipv6_only` - Show only providers with IPv6 addresses
/// * `format` - `json` prints the provider list as JSON, anything else as a table
fn run_list_providers(
    file: Option<PathBuf>,
    ipv4_only: bool,
    ipv6_only: bool,
    format: OutputFormat,
) -> Result<()> {
    let providers: Vec<Provider> = load_providers(file, Vec::new())?
        .into_iter()
        .filter(|p| (!ipv4_only || p.has_ipv4()) && (!ipv6_only || p.has_ipv6()))
        .collect();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&providers)?);
        return Ok(());
    }

    println!("Providers ({}):\n", providers.len());
    println!("{:<4} {:<20} {:<40} {:<40}", "#", "Name", "IPv4", "IPv6");
    println!("{}", "-".repeat(104));

    for (idx, p) in providers.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:<40} {:<40}",
            idx + 1,
            p.name,
            p.ipv4_addresses.join(";"),
            p.ipv6_addresses.join(";")
        );
    }

    Ok(())
}

/// Run the interactive TUI.
async fn run_interactive(args: ScanArgs) -> Result<()> {
    let settings = args.settings();
    settings.validate()?;
    let providers = load_providers(args.file, args.providers)?;
    let hostnames = hostnames_or_default(args.hosts);

    let mut app = App::new(providers, hostnames, settings);
    app.run().await
}

/// Main entry point for the dnseval CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (cli, verbose) = dnseval::cli::parse_verbose();
    setup_logging(verbose, cli.quiet);

    tracing::info!("dnseval starting...");

    match cli.command {
        Some(Commands::Scan(args)) => run_scan(args, cli.format).await?,

        Some(Commands::Interactive(args)) => run_interactive(args).await?,

        Some(Commands::List {
            file,
            ipv4_only,
            ipv6_only,
        }) => run_list_providers(file, ipv4_only, ipv6_only, cli.format)?,

        Some(Commands::Completions { shell }) => dnseval::cli::print_completions(shell),

        None => run_scan(ScanArgs::default(), cli.format).await?,
    }

    Ok(())
}
