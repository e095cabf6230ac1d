// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use anyhow::{Context, Result};
use std::path::Path;

use mirror_stateproof::{StateProof, StateProofReport, TransactionKey};

use crate::bundle;

/// Verifies the bundle at `bundle_path` and prints the report.
pub fn run(bundle_path: &Path, transaction: &TransactionKey, json: bool) -> Result<StateProofReport> {
    let bundle = bundle::load(bundle_path)?;
    tracing::debug!(
        address_books = bundle.address_books.len(),
        signature_files = bundle.signature_files.len(),
        "bundle loaded"
    );

    let report = StateProof::default()
        .verify(&bundle, transaction)
        .context("State proof could not be evaluated")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, transaction);
    }
    Ok(report)
}

fn print_report(report: &StateProofReport, transaction: &TransactionKey) {
    if report.valid {
        println!("\n✅ STATE PROOF VALID\n");
    } else {
        println!("\n❌ STATE PROOF INVALID\n");
    }

    let id = &transaction.transaction_id;
    let valid_start = chrono::DateTime::from_timestamp(id.valid_start_seconds, id.valid_start_nanos as u32)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Nanos, true);
    let none = || "-".to_string();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    table.add_row(vec!["Transaction".to_string(), report.transaction.clone()]);
    table.add_row(vec!["Payer".to_string(), id.payer()]);
    table.add_row(vec!["Valid start".to_string(), valid_start]);
    table.add_row(vec![
        "Record file".to_string(),
        format!(
            "v{}{}",
            report.record_file_version,
            if report.compact { " (compact)" } else { "" }
        ),
    ]);
    table.add_row(vec!["File hash".to_string(), report.file_hash.clone().unwrap_or_else(none)]);
    table.add_row(vec!["Metadata hash".to_string(), report.metadata_hash.clone().unwrap_or_else(none)]);
    table.add_row(vec![
        "Consensus hash".to_string(),
        report.consensus_hash.clone().unwrap_or_else(none),
    ]);
    table.add_row(vec![
        "Corroborating nodes".to_string(),
        format!("{} (required {})", report.corroborating_nodes, report.required_nodes),
    ]);
    table.add_row(vec!["Verified nodes".to_string(), report.verified_nodes.join(", ")]);
    table.add_row(vec!["Rejected nodes".to_string(), report.rejected_nodes.join(", ")]);

    println!("{table}");
}
