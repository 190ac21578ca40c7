//! Per-type record payload decoders.
//!
//! Field layouts follow the device journal documentation subset: fixed-width
//! cp1250 text fields padded with NUL bytes, big-endian integers and packed
//! BCD amounts with an explicit precision byte where the scale varies.

use encoding_rs::WINDOWS_1250;
use rust_decimal::Decimal;

use super::bcd::{bcd_to_decimal, device_timestamp};
use crate::error::JournalError;
use crate::models::document::{
    DocumentFooter, DocumentHeader, DocumentSummary, EntrySource, LineItem, PackagingEntry,
};

/// Record type tags handled by document assembly.
pub mod tag {
    /// Free-text receipt line.
    pub const LINE: u16 = 0x0A;
    /// RSA512 document signature.
    pub const SIG_RSA512: u16 = 0x20;
    /// Document footer.
    pub const FOOTER: u16 = 0x41;
    /// Document header.
    pub const HEADER: u16 = 0x44;
    /// Sale line item.
    pub const SALE: u16 = 0x61;
    /// Packaging (deposit container) entry.
    pub const PACKAGING: u16 = 0x63;
    /// SHA digest of the document.
    pub const SHA: u16 = 0x6D;
    /// Totals in register currency.
    pub const TOTALS: u16 = 0x73;
    /// RSA2048 document signature.
    pub const SIG_RSA2048: u16 = 0x74;
}

/// Human-readable record names. The device documentation uses Polish terms;
/// they are kept verbatim so listings match the vendor manuals.
pub fn record_type_name(record_type: u16) -> &'static str {
    match record_type {
        0x0A => "Linia",
        0x20 => "Podpis RSA512",
        0x41 => "Stopka",
        0x42 => "Raport dobowy (biletowy)",
        0x44 => "Nagłówek dokumentu",
        0x46 => "Linie informacyjne w fakturze",
        0x47 => "Identyfikator podatnika (faktura)",
        0x48 => "Nagłówek wydruku",
        0x4A => "Sprzedaż faktury",
        0x4F => "Rabat/narzut do paragonu",
        0x53 => "Separator tekstów",
        0x54 => "Tekst nagłówka",
        0x59 => "Numer systemowy",
        0x5A => "Grafika BMP",
        0x61 => "Sprzedaż",
        0x62 => "Kody kreskowe",
        0x63 => "Opakowanie",
        0x64 => "Podsumowanie opakowań",
        0x65 => "Sekcja",
        0x6A => "Płatność formą płatności",
        0x6B => "Reszta formą płatności",
        0x6C => "Teksty informacyjne ze stopki",
        0x6D => "Podpis SHA dokumentu",
        0x6E => "Podsumowanie rabatów/narzutów",
        0x70 => "Raport dobowy",
        0x72 => "Przeliczanie walut",
        0x73 => "Suma w walucie ewidencyjnej",
        0x74 => "Podpis dokumentu (RSA2048)",
        0x75 => "Rabat/narzut do pozycji",
        0x76 => "Podsumowanie sprzedaży VAT",
        0x80 => "Typ zdarzenia",
        0x81 => "Zmiana stawek VAT",
        0x82 => "Zmiana daty/czasu",
        0xB7 => "Suma kontrolna poprzedniego dokumentu",
        0xB8 => "JPKID poprzedniego dokumentu",
        0xC0 => "Dane JWS",
        0xC1 => "Kod weryfikacyjny paragonu",
        0xC2 => "Dane JPK",
        _ => "Nieznany",
    }
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Decode a NUL-padded cp1250 text field.
fn fixed_str(bytes: &[u8]) -> String {
    let raw = bytes.split(|&b| b == 0).next().unwrap_or(bytes);
    let (text, _, _) = WINDOWS_1250.decode(raw);
    text.into_owned()
}

fn bcd_field(bytes: &[u8], precision: u32, field: &'static str) -> Result<Decimal, JournalError> {
    bcd_to_decimal(bytes, precision).ok_or(JournalError::Field {
        field,
        reason: "invalid BCD".to_string(),
    })
}

/// Decode a document header (0x44).
///
/// The fixed prefix up to the document number is required; NIP and prefix
/// are tolerated missing on short records.
pub fn decode_header(payload: &[u8]) -> Result<DocumentHeader, JournalError> {
    if payload.len() < 9 {
        return Err(JournalError::ShortPayload {
            record_type: tag::HEADER,
            len: payload.len(),
        });
    }
    Ok(DocumentHeader {
        doc_type: payload[0],
        timestamp: device_timestamp(be_u32(&payload[1..5])),
        doc_number: be_u32(&payload[5..9]),
        mode: payload.get(9).copied(),
        nip: (payload.len() >= 20).then(|| fixed_str(&payload[10..20])),
        prefix: (payload.len() >= 21).then(|| fixed_str(&payload[20..21])),
    })
}

/// Decode a document footer (0x41).
pub fn decode_footer(payload: &[u8]) -> Result<DocumentFooter, JournalError> {
    if payload.len() < 11 {
        return Err(JournalError::ShortPayload {
            record_type: tag::FOOTER,
            len: payload.len(),
        });
    }
    Ok(DocumentFooter {
        doc_type: payload[0],
        mode: payload[1],
        status: payload[2],
        doc_number: be_u32(&payload[3..7]),
        timestamp: device_timestamp(be_u32(&payload[7..11])),
        unique_number: (payload.len() >= 25).then(|| fixed_str(&payload[11..25])),
        register_number: (payload.len() >= 33).then(|| fixed_str(&payload[25..33])),
        cashier: (payload.len() >= 65).then(|| fixed_str(&payload[33..65])),
        buyer_nip: (payload.len() >= 95).then(|| fixed_str(&payload[65..95])),
    })
}

/// Decode a free-text line (0x0A): a Pascal string, length byte first.
///
/// The length byte is clamped to the payload so truncated lines still yield
/// their readable prefix.
pub fn decode_line(payload: &[u8]) -> String {
    let Some((&len, rest)) = payload.split_first() else {
        return String::new();
    };
    let take = usize::from(len).min(rest.len());
    let (text, _, _) = WINDOWS_1250.decode(&rest[..take]);
    text.into_owned()
}

/// Decode a sale line item (0x61).
pub fn decode_sale(payload: &[u8]) -> Result<LineItem, JournalError> {
    const MIN: usize = 80 + 1 + 6 + 6 + 6 + 1;
    if payload.len() < MIN {
        return Err(JournalError::ShortPayload {
            record_type: tag::SALE,
            len: payload.len(),
        });
    }
    let precision = u32::from(payload[99]);
    Ok(LineItem {
        name: fixed_str(&payload[..80]),
        vat_symbol: {
            let symbol = payload[80];
            (0x20..0x7F).contains(&symbol).then(|| char::from(symbol))
        },
        price: bcd_field(&payload[81..87], 2, "price")?,
        total: bcd_field(&payload[87..93], 2, "total")?,
        quantity: bcd_field(&payload[93..99], precision, "quantity")?,
        unit: (payload.len() >= 104).then(|| fixed_str(&payload[100..104])),
        description: (payload.len() > 104).then(|| fixed_str(&payload[104..payload.len().min(154)])),
    })
}

/// Decode a structured packaging entry (0x63).
///
/// Layout: 40-byte name, 6-byte BCD unit value (2 dp), 6-byte BCD quantity,
/// quantity precision byte, 6-byte BCD total (2 dp), then a sign byte and a
/// kind byte. Amounts are unsigned on the wire; a nonzero sign byte marks
/// the entry as a return and negates the total.
pub fn decode_packaging(payload: &[u8]) -> Result<PackagingEntry, JournalError> {
    const MIN: usize = 40 + 6 + 6 + 1 + 6;
    if payload.len() < MIN {
        return Err(JournalError::ShortPayload {
            record_type: tag::PACKAGING,
            len: payload.len(),
        });
    }
    let name = fixed_str(&payload[..40]);
    if name.trim().is_empty() {
        return Err(JournalError::Field {
            field: "name",
            reason: "empty".to_string(),
        });
    }
    let unit_value = bcd_field(&payload[40..46], 2, "unit_value")?;
    let precision = u32::from(payload[52]);
    let quantity = bcd_field(&payload[46..52], precision, "quantity")?;
    let mut total = bcd_field(&payload[53..59], 2, "total")?;
    let returned = payload.get(59).is_some_and(|&b| b != 0);
    if returned {
        total = -total;
    }
    Ok(PackagingEntry {
        name,
        quantity,
        unit_value,
        total,
        source: EntrySource::Structured,
    })
}

/// Decode the document SHA digest (0x6D) as lowercase hex.
pub fn decode_sha(payload: &[u8]) -> Result<String, JournalError> {
    if payload.len() < 32 {
        return Err(JournalError::ShortPayload {
            record_type: tag::SHA,
            len: payload.len(),
        });
    }
    Ok(payload[..32].iter().map(|b| format!("{b:02x}")).collect())
}

/// Decode the register-currency totals (0x73): as many 6-byte BCD amounts
/// as fit, followed by a 3-character currency code.
pub fn decode_totals(payload: &[u8]) -> DocumentSummary {
    let mut amounts = Vec::new();
    let mut offset = 0;
    while payload.len() >= offset + 6 {
        if let Some(amount) = bcd_to_decimal(&payload[offset..offset + 6], 2) {
            amounts.push(amount);
        }
        offset += 6;
    }
    let currency = (payload.len() >= offset + 3)
        .then(|| String::from_utf8_lossy(&payload[offset..offset + 3]).into_owned());
    DocumentSummary { amounts, currency }
}
