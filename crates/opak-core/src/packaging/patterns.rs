//! Regex patterns and keyword vocabulary for the text-line heuristic.

use lazy_static::lazy_static;
use regex::Regex;

/// Lower-case substrings marking a receipt line as deposit-related
/// ("kaucja", "opakowanie" and inflections).
pub const DEPOSIT_KEYWORDS: &[&str] = &["kaucja", "opakow"];

lazy_static! {
    /// Deposit line shape: `name <qty> x <unit_price> <total>` with
    /// locale-tolerant decimal separators, `x`/`×` as the multiply token and
    /// an optional trailing currency token.
    pub static ref DEPOSIT_LINE: Regex = Regex::new(
        r"(?i)(?P<name>.+?)\s+(?P<qty>-?\d+(?:[.,]\d+)?)\s*[x×]\s*(?P<price>\d+(?:[.,]\d+)?)\s+(?P<total>-?\d+(?:[.,]\d+)?)(?:\s*(?:zł|PLN))?\s*$"
    ).unwrap();
}
