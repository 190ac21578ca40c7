//! Packaging extraction: a two-tier decode with document-level priority.
//!
//! Structured 0x63 records are authoritative. Any structured entry anywhere
//! in a document suppresses the text heuristic for the whole document, so a
//! physical deposit line can never be counted through both decode paths.

pub mod heuristic;
pub mod normalize;
pub mod patterns;

use tracing::debug;

use crate::models::document::{Document, PackagingEntry};
use heuristic::LineScan;
use normalize::normalize_name;

/// Tagged result of the per-document decode strategy.
///
/// Computed once per document so the suppression rule is enforced by
/// construction rather than by call ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// At least one structured 0x63 entry; text scanning was suppressed.
    Structured(Vec<PackagingEntry>),
    /// No structured entries; these came from the text-line heuristic.
    Heuristic(Vec<PackagingEntry>),
    /// Nothing deposit-related in the document.
    None,
}

impl DecodeOutcome {
    /// The extracted entries regardless of decode path.
    pub fn entries(&self) -> &[PackagingEntry] {
        match self {
            DecodeOutcome::Structured(entries) | DecodeOutcome::Heuristic(entries) => entries,
            DecodeOutcome::None => &[],
        }
    }
}

/// Packaging extracted from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Decode outcome with normalized names.
    pub outcome: DecodeOutcome,
    /// Keyword lines the heuristic could not parse. Always empty when
    /// structured records suppressed text scanning.
    pub unrecognized: Vec<String>,
}

/// Extract the ordered packaging entries of a decoded document.
pub fn extract_packaging(doc: &Document) -> Extraction {
    if !doc.packaging.is_empty() {
        let entries: Vec<_> = doc
            .packaging
            .iter()
            .cloned()
            .map(|mut entry| {
                entry.name = normalize_name(&entry.name);
                entry
            })
            .collect();
        debug!(entries = entries.len(), "structured packaging records found");
        return Extraction {
            outcome: DecodeOutcome::Structured(entries),
            unrecognized: Vec::new(),
        };
    }

    let mut entries = Vec::new();
    let mut unrecognized = Vec::new();
    for line in &doc.lines {
        match heuristic::scan_line(line) {
            LineScan::Entry(mut entry) => {
                entry.name = normalize_name(&entry.name);
                entries.push(entry);
            }
            LineScan::Unrecognized(text) => unrecognized.push(text),
            LineScan::Ordinary => {}
        }
    }

    let outcome = if entries.is_empty() {
        DecodeOutcome::None
    } else {
        DecodeOutcome::Heuristic(entries)
    };
    Extraction { outcome, unrecognized }
}
