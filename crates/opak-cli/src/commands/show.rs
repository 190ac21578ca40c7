//! Show command - decode a single journal file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use opak_core::models::document::Document;
use opak_core::packaging::DecodeOutcome;
use opak_core::{decode_document, extract_packaging};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Journal file (.BIN)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ShowFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ShowFormat {
    /// JSON document dump
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ShowArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let data = fs::read(&args.input)?;
    let doc = decode_document(&data);

    match args.format {
        ShowFormat::Json => println!("{}", serde_json::to_string_pretty(&doc)?),
        ShowFormat::Text => print_text(&doc),
    }
    Ok(())
}

fn print_text(doc: &Document) {
    match &doc.header {
        Some(header) => {
            println!("Document {} ({})", header.doc_number, header.doc_type_name());
            if let Some(ts) = header.timestamp {
                println!("Date: {}", ts.format("%Y-%m-%dT%H:%M:%S"));
            }
            if let Some(nip) = &header.nip {
                println!("NIP: {}", nip);
            }
        }
        None => println!("Document (no header)"),
    }
    if let Some(footer) = &doc.footer {
        if let Some(cashier) = &footer.cashier {
            println!("Cashier: {}", cashier);
        }
        if let Some(unique) = &footer.unique_number {
            println!("Device: {}", unique);
        }
    }
    println!(
        "Signature record: {}",
        if doc.signature_present { "present" } else { "absent" }
    );
    if let Some(sha) = &doc.sha {
        println!("SHA: {}", sha);
    }

    if !doc.items.is_empty() {
        println!();
        println!("Items:");
        for item in &doc.items {
            println!("  {} {} x {} = {}", item.name.trim(), item.quantity, item.price, item.total);
        }
    }

    let extraction = extract_packaging(doc);
    println!();
    match &extraction.outcome {
        DecodeOutcome::Structured(entries) => {
            println!("Packaging ({} structured):", entries.len());
        }
        DecodeOutcome::Heuristic(entries) => {
            println!("Packaging ({} from text lines):", entries.len());
        }
        DecodeOutcome::None => println!("Packaging: none"),
    }
    for entry in extraction.outcome.entries() {
        let direction = if entry.is_return() {
            style("return").red()
        } else {
            style("issue").green()
        };
        println!(
            "  {} {} x {} = {} [{}]",
            entry.name, entry.quantity, entry.unit_value, entry.total, direction
        );
    }
    for text in &extraction.unrecognized {
        println!("  {} {}", style("?").yellow(), text);
    }

    if let Some(summary) = &doc.summary {
        if let Some(total) = summary.amounts.first() {
            println!();
            println!(
                "Total: {} {}",
                total,
                summary.currency.as_deref().unwrap_or("")
            );
        }
    }
}
