//! Report command - walk a journal tree and report packaging transactions.

use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use opak_core::models::report::{AggregateBucket, AggregateKey, DetailRow};
use opak_core::walk::{collect_bin_files, scan_file, BinFile, ScanOptions};
use opak_core::Aggregator;

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Journal tree root (<root>/<location>/<printer>/...)
    #[arg(required = true)]
    root: PathBuf,

    /// Aggregate per (location, printer, pack name) instead of detail rows
    #[arg(long)]
    aggregate: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Also list keyword lines the heuristic could not parse
    #[arg(long)]
    all: bool,

    /// Verify .meta.json sidecars against file contents
    #[arg(long)]
    verify: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// CSV on stdout
    Csv,
    /// JSON on stdout
    Json,
}

const DETAIL_HEADERS: [&str; 9] = [
    "location",
    "printer",
    "file",
    "doc_number",
    "timestamp",
    "pack_name",
    "qty",
    "value",
    "total",
];
const DETAIL_NUMERIC: [bool; 9] = [false, false, false, true, false, false, true, true, true];

const AGGREGATE_HEADERS: [&str; 7] = [
    "location",
    "printer",
    "pack_name",
    "rows",
    "returns",
    "issued",
    "sum_total",
];
const AGGREGATE_NUMERIC: [bool; 7] = [false, false, false, true, true, true, true];

/// Rows, partial aggregate and failures from one worker's batch.
#[derive(Default)]
struct BatchOutput {
    rows: Vec<DetailRow>,
    partial: Aggregator,
    skipped: Vec<(PathBuf, String)>,
    mismatches: Vec<PathBuf>,
    missing_signatures: Vec<PathBuf>,
}

pub fn run(args: ReportArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let options = ScanOptions {
        include_unrecognized: args.all,
        verify_sidecars: args.verify,
    };

    let files = collect_bin_files(&args.root)?;
    if files.is_empty() {
        anyhow::bail!("No journal files found under {}", args.root.display());
    }

    let table_mode = matches!(args.format, OutputFormat::Table);
    if table_mode {
        println!(
            "{} Found {} journal files",
            style("ℹ").blue(),
            files.len()
        );
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // One worker per file batch; each owns its rows and partial aggregate
    // until the merge, so no locking is needed.
    let jobs = args.jobs.clamp(1, files.len());
    let merged = if jobs == 1 {
        scan_batch(&files, options, &progress)
    } else {
        let chunk_size = files.len().div_ceil(jobs);
        let progress_ref = &progress;
        let outputs = thread::scope(|scope| {
            let handles: Vec<_> = files
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || scan_batch(chunk, options, progress_ref)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("scan worker panicked"))
                .collect::<Vec<_>>()
        });

        let mut merged = BatchOutput::default();
        for output in outputs {
            merged.rows.extend(output.rows);
            merged.partial.merge(output.partial);
            merged.skipped.extend(output.skipped);
            merged.mismatches.extend(output.mismatches);
            merged.missing_signatures.extend(output.missing_signatures);
        }
        merged
    };
    progress.finish_and_clear();

    if args.aggregate {
        print_aggregate(merged.partial.finalize(), args.format)?;
    } else {
        print_detail(&merged.rows, args.format)?;
    }

    let scanned = files.len() - merged.skipped.len();
    if table_mode {
        println!();
        println!(
            "{} Scanned {} files in {:?}",
            style("✓").green(),
            scanned,
            start.elapsed()
        );
    }
    if !merged.skipped.is_empty() {
        eprintln!("{}", style("Skipped files:").red());
        for (path, reason) in &merged.skipped {
            eprintln!("  - {}: {}", path.display(), reason);
        }
    }
    if !merged.mismatches.is_empty() {
        eprintln!("{}", style("Sidecar mismatches:").yellow());
        for path in &merged.mismatches {
            eprintln!("  - {}", path.display());
        }
    }
    if !merged.missing_signatures.is_empty() {
        eprintln!("{}", style("Missing .SIG files:").yellow());
        for path in &merged.missing_signatures {
            eprintln!("  - {}", path.display());
        }
    }

    Ok(())
}

fn scan_batch(files: &[BinFile], options: ScanOptions, progress: &ProgressBar) -> BatchOutput {
    let mut out = BatchOutput::default();
    for file in files {
        match scan_file(file, options) {
            Ok(scan) => {
                for row in &scan.rows {
                    out.partial.fold(row);
                }
                out.rows.extend(scan.rows);
                if scan.sidecar_mismatch {
                    out.mismatches.push(file.path.clone());
                }
                if options.verify_sidecars && !scan.signature_file {
                    out.missing_signatures.push(file.path.clone());
                }
            }
            Err(err) => out.skipped.push((file.path.clone(), err.to_string())),
        }
        progress.inc(1);
    }
    out
}

fn format_timestamp(row: &DetailRow) -> String {
    row.timestamp
        .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

fn print_detail(rows: &[DetailRow], format: OutputFormat) -> anyhow::Result<()> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.location.clone(),
                row.printer.clone(),
                row.file.clone(),
                row.doc_number.map(|n| n.to_string()).unwrap_or_default(),
                format_timestamp(row),
                row.pack_name.clone(),
                row.qty.map(|v| v.to_string()).unwrap_or_default(),
                row.value.map(|v| v.to_string()).unwrap_or_default(),
                row.total.map(|v| v.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    match format {
        OutputFormat::Table => render_table(&DETAIL_HEADERS, &cells, &DETAIL_NUMERIC),
        OutputFormat::Csv => write_csv(&DETAIL_HEADERS, &cells)?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
    }
    Ok(())
}

fn print_aggregate(
    buckets: Vec<(AggregateKey, AggregateBucket)>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let cells: Vec<Vec<String>> = buckets
        .iter()
        .map(|(key, bucket)| {
            vec![
                key.location.clone(),
                key.printer.clone(),
                key.pack_name.clone(),
                bucket.rows.to_string(),
                bucket.returns.to_string(),
                bucket.issued.to_string(),
                bucket.sum_total.to_string(),
            ]
        })
        .collect();

    match format {
        OutputFormat::Table => render_table(&AGGREGATE_HEADERS, &cells, &AGGREGATE_NUMERIC),
        OutputFormat::Csv => write_csv(&AGGREGATE_HEADERS, &cells)?,
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct AggregateRow<'a> {
                #[serde(flatten)]
                key: &'a AggregateKey,
                #[serde(flatten)]
                bucket: &'a AggregateBucket,
            }
            let rows: Vec<_> = buckets
                .iter()
                .map(|(key, bucket)| AggregateRow { key, bucket })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn write_csv(headers: &[&str], rows: &[Vec<String>]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Print an aligned table: text columns left-aligned, numeric columns
/// right-aligned, a dash rule under the header.
fn render_table(headers: &[&str], rows: &[Vec<String>], numeric: &[bool]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i], numeric[i]))
        .collect();
    println!("{}", header_line.join("  "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i], numeric[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
    if right_align {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}
