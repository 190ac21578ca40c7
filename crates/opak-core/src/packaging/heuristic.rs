//! Heuristic recovery of deposit transactions from receipt text lines.
//!
//! This is a fallback of last resort for journals whose firmware never
//! emitted structured packaging records. The match is permissive and a
//! non-match is routine: most receipt lines are ordinary items.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{DEPOSIT_KEYWORDS, DEPOSIT_LINE};
use crate::models::document::{EntrySource, PackagingEntry};

/// Outcome of scanning one receipt line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineScan {
    /// The line is not deposit-related.
    Ordinary,
    /// A deposit keyword matched but the line did not fit the pattern.
    Unrecognized(String),
    /// A fully parsed deposit line.
    Entry(PackagingEntry),
}

/// Whether a line mentions a deposit keyword.
pub fn is_deposit_line(text: &str) -> bool {
    let lower = text.to_lowercase();
    DEPOSIT_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Scan one receipt line for a deposit transaction.
///
/// Quantity is always emitted non-negative; direction lives on the sign of
/// the total, matching the structured decoder's contract.
pub fn scan_line(text: &str) -> LineScan {
    if text.is_empty() || !is_deposit_line(text) {
        return LineScan::Ordinary;
    }
    let Some(caps) = DEPOSIT_LINE.captures(text) else {
        return LineScan::Unrecognized(text.trim().to_string());
    };
    let (Some(quantity), Some(unit_value), Some(total)) = (
        parse_amount(&caps["qty"]),
        parse_amount(&caps["price"]),
        parse_amount(&caps["total"]),
    ) else {
        return LineScan::Unrecognized(text.trim().to_string());
    };
    LineScan::Entry(PackagingEntry {
        name: caps["name"].trim().to_string(),
        quantity: quantity.abs(),
        unit_value,
        total,
        source: EntrySource::Heuristic,
    })
}

/// Parse a locale-tolerant amount (`1,50` or `1.50`).
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', ".")).ok()
}
