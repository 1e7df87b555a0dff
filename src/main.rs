use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use std::{io, path::PathBuf};

use supersaver::{generate_report, Catalog, Session};

/// Key in a customer's purchases and print their bill.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Catalog of items for sale, in CSV format
    #[arg(short, long, default_value = "items.csv")]
    catalog: PathBuf,
    /// File to write the finished bill to
    #[arg(short, long, default_value = "bill.txt")]
    output: PathBuf,
    /// Log catalog loading and billing in detail
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Produce the revenue report for a period
    Report { start: String, end: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if let Some(Command::Report { start, end }) = &args.command {
        return generate_report(start, end, &mut io::stdout().lock());
    }
    let catalog = Catalog::load(&args.catalog);
    Session::new(&catalog, io::stdin().lock(), io::stdout().lock()).run(&args.output)?;
    Ok(())
}
