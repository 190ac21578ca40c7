//! Inspect command - print the record structure of a journal file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use opak_core::journal::reader::{RecordReader, RECORD_HEADER_SIZE};
use opak_core::journal::records::{decode_header, record_type_name, tag};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Journal file (.BIN)
    #[arg(required = true)]
    input: PathBuf,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let data = fs::read(&args.input)?;
    println!("Structure of {} ({} bytes):", args.input.display(), data.len());

    let mut consumed = 0;
    let mut doc_type_shown = false;
    for (idx, record) in RecordReader::new(&data).enumerate() {
        let size = record.payload.len() + RECORD_HEADER_SIZE;
        consumed += size;

        let mut extra = String::new();
        if record.record_type == tag::HEADER && !doc_type_shown {
            if let Ok(header) = decode_header(record.payload) {
                extra = format!(" [{}]", header.doc_type_name());
                doc_type_shown = true;
            }
        }
        println!(
            "  record {:3}: type=0x{:02X} ({}), size={}{}",
            idx,
            record.record_type,
            record_type_name(record.record_type),
            size,
            extra
        );
    }

    if consumed < data.len() {
        println!(
            "  {} {} trailing bytes not framed",
            style("!").yellow(),
            data.len() - consumed
        );
    }
    Ok(())
}
