//! Reporting row shapes: detail rows and aggregate buckets.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One reported packaging transaction, annotated with the document, file and
/// tree context it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    /// First path segment under the scan root.
    pub location: String,

    /// Second path segment under the scan root.
    pub printer: String,

    /// Journal file name.
    pub file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,

    /// Normalized packaging name; empty for unrecognized keyword lines
    /// surfaced in show-all mode.
    pub pack_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

/// Grouping key for aggregate reporting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    pub location: String,
    pub printer: String,
    pub pack_name: String,
}

/// Rolled-up counters and sums for one aggregate key.
///
/// `rows` counts every folded row; `issued` and `returns` partition the rows
/// with a nonzero total, so `issued + returns <= rows` with equality unless
/// zero-total rows were folded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub rows: u64,
    pub returns: u64,
    pub issued: u64,
    pub sum_total: Decimal,
}
