//! CLI application for fiscal printer journal packaging reports.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{inspect, report, show};

/// Fiscal printer journal tools - extract packaging transactions from .BIN journals
#[derive(Parser)]
#[command(name = "opak")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a journal tree and report packaging transactions
    Report(report::ReportArgs),

    /// Decode a single journal file
    Show(show::ShowArgs),

    /// Print the record structure of a journal file
    Inspect(inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Report(args) => report::run(args),
        Commands::Show(args) => show::run(args),
        Commands::Inspect(args) => inspect::run(args),
    }
}
