// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stateproof_cli::commands::inspect::FileKind;
use stateproof_cli::commands::{compact, inspect, verify, TransactionArgs};
use stateproof_cli::telemetry;

#[derive(Parser)]
#[command(name = "stateproof")]
#[command(about = "Offline state proof verifier for record stream files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a state proof bundle (JSON, base64 payloads)
    Verify {
        /// Path to the bundle
        bundle: PathBuf,

        #[command(flatten)]
        transaction: TransactionArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Describe a record file, signature file or address book
    Inspect {
        path: PathBuf,

        #[arg(long, short, value_enum, default_value_t = FileKind::Record)]
        kind: FileKind,
    },
    /// Extract a compact proof for one transaction from a v5/v6 record file
    Compact {
        record_file: PathBuf,

        #[command(flatten)]
        transaction: TransactionArgs,

        /// Write the proof here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { bundle, transaction, json } => {
            let report = verify::run(&bundle, &transaction.key()?, json)?;
            if !report.valid {
                anyhow::bail!("State proof for {} is invalid", report.transaction);
            }
            Ok(())
        }
        Commands::Inspect { path, kind } => inspect::run(&path, kind),
        Commands::Compact { record_file, transaction, output } => {
            compact::run(&record_file, &transaction.key()?, output.as_deref()).map(|_| ())
        }
    }
}
