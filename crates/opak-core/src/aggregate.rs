//! Aggregation of detail rows into per-(location, printer, name) buckets.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::report::{AggregateBucket, AggregateKey, DetailRow};
use crate::packaging::normalize::normalize_name;

/// Accumulating fold over detail rows.
///
/// Two phases: accumulate via [`fold`](Self::fold) and [`merge`](Self::merge),
/// then [`finalize`](Self::finalize) into the read-only bucket list. The fold
/// is commutative and associative, so parallel workers can each own a partial
/// aggregator and merge once at the end, without locks.
#[derive(Debug, Default)]
pub struct Aggregator {
    buckets: BTreeMap<AggregateKey, AggregateBucket>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one detail row into its bucket.
    ///
    /// Rows without a total or without a name (unrecognized text lines
    /// surfaced in show-all mode) are not aggregated. Zero totals count
    /// toward `rows` but neither `issued` nor `returns`.
    pub fn fold(&mut self, row: &DetailRow) {
        let Some(total) = row.total else { return };
        let pack_name = normalize_name(&row.pack_name);
        if pack_name.is_empty() {
            return;
        }

        let key = AggregateKey {
            location: row.location.clone(),
            printer: row.printer.clone(),
            pack_name,
        };
        let bucket = self.buckets.entry(key).or_default();
        bucket.rows += 1;
        if total > Decimal::ZERO {
            bucket.issued += 1;
        } else if total < Decimal::ZERO {
            bucket.returns += 1;
        }
        bucket.sum_total += total;
    }

    /// Merge a partial aggregator produced by another worker.
    pub fn merge(&mut self, other: Aggregator) {
        for (key, partial) in other.buckets {
            let bucket = self.buckets.entry(key).or_default();
            bucket.rows += partial.rows;
            bucket.returns += partial.returns;
            bucket.issued += partial.issued;
            bucket.sum_total += partial.sum_total;
        }
    }

    /// Number of buckets accumulated so far.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Finish accumulating and emit the buckets sorted by location, printer
    /// and packaging name.
    pub fn finalize(self) -> Vec<(AggregateKey, AggregateBucket)> {
        self.buckets.into_iter().collect()
    }
}
