//! Decoded journal document models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A decoded journal document (the contents of one `.BIN` file).
///
/// Built incrementally while walking the file's record stream; read-only
/// once assembly finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document header (0x44), when present and decodable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<DocumentHeader>,

    /// Document footer (0x41).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<DocumentFooter>,

    /// Sale line items (0x61), in stream order.
    pub items: Vec<LineItem>,

    /// Structured packaging entries (0x63), in stream order.
    pub packaging: Vec<PackagingEntry>,

    /// Free-text receipt lines (0x0A), in stream order.
    pub lines: Vec<String>,

    /// Totals in register currency (0x73).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DocumentSummary>,

    /// Whether the stream carried an RSA signature record (0x20 or 0x74).
    /// Signature contents are not decoded.
    pub signature_present: bool,

    /// Document SHA digest (0x6D), hex-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Document header fields (record 0x44).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentHeader {
    /// Document type byte.
    pub doc_type: u8,

    /// Device timestamp, when in range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,

    /// Sequential document number.
    pub doc_number: u32,

    /// Device mode byte.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u8>,

    /// Taxpayer NIP (10 characters on the wire).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nip: Option<String>,

    /// Device number prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl DocumentHeader {
    /// Human-readable document type (device documentation terms).
    pub fn doc_type_name(&self) -> &'static str {
        match self.doc_type {
            0x00 => "Zwykły dokument",
            0x01 => "Paragon",
            0x02 => "Faktura",
            0x03 => "Raport dobowy",
            0x04 => "Raport fiskalny",
            _ => "Nieznany typ",
        }
    }
}

/// Document footer fields (record 0x41).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFooter {
    pub doc_type: u8,
    pub mode: u8,
    pub status: u8,
    pub doc_number: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,

    /// Device unique number (14 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_number: Option<String>,

    /// Cash register number (8 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_number: Option<String>,

    /// Cashier name (32 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashier: Option<String>,

    /// Buyer NIP line (30 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_nip: Option<String>,
}

/// A sale line item (record 0x61).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name as printed.
    pub name: String,

    /// VAT rate symbol, when printable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_symbol: Option<char>,

    /// Unit price.
    pub price: Decimal,

    /// Line total.
    pub total: Decimal,

    /// Quantity, scaled by the record's precision byte.
    pub quantity: Decimal,

    /// Unit of measure (4 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Additional description (50 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Origin of a packaging entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Decoded from a structured 0x63 record.
    Structured,
    /// Recovered from a receipt text line.
    Heuristic,
}

/// One deposit-container transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagingEntry {
    /// Container name as printed.
    pub name: String,

    /// Quantity, always non-negative.
    pub quantity: Decimal,

    /// Unit value.
    pub unit_value: Decimal,

    /// Line total. The sign encodes direction: positive totals are issued
    /// containers, negative totals are returns.
    pub total: Decimal,

    /// Decode path that produced this entry.
    pub source: EntrySource,
}

impl PackagingEntry {
    /// Whether this entry is a container return.
    pub fn is_return(&self) -> bool {
        self.total < Decimal::ZERO
    }
}

/// Totals in register currency (record 0x73).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Amount sequence as laid out on the wire.
    pub amounts: Vec<Decimal>,

    /// Register currency code (3 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}
