//! Core library for fiscal printer journal processing.
//!
//! This crate provides:
//! - Record framing for printer journal `.BIN` buffers
//! - Per-type record decoders (header, footer, text lines, sale and
//!   packaging records)
//! - Two-tier packaging extraction: structured deposit records with a
//!   text-line heuristic fallback, suppressed document-wide whenever a
//!   structured record exists
//! - Aggregation of packaging transactions across a journal tree, grouped
//!   by location, printer and container name

pub mod aggregate;
pub mod error;
pub mod journal;
pub mod models;
pub mod packaging;
pub mod walk;

pub use aggregate::Aggregator;
pub use error::{JournalError, OpakError, Result, WalkError};
pub use journal::document::decode_document;
pub use journal::reader::{RawRecord, RecordReader};
pub use models::document::{
    Document, DocumentFooter, DocumentHeader, EntrySource, LineItem, PackagingEntry,
};
pub use models::report::{AggregateBucket, AggregateKey, DetailRow};
pub use packaging::{extract_packaging, DecodeOutcome, Extraction};
pub use walk::{collect_bin_files, scan_file, scan_tree, BinFile, ScanOptions, ScanReport};
