//! Packaging name canonicalization.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize an extracted name: NFKC composition plus edge trim.
///
/// Pure and idempotent; visually equal names with different encodings
/// (decomposed vs precomposed diacritics) map to the same grouping key.
pub fn normalize_name(name: &str) -> String {
    name.nfkc().collect::<String>().trim().to_string()
}
