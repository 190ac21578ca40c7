//! Document assembly from a framed record stream.

use tracing::debug;

use super::reader::RecordReader;
use super::records::{self, tag};
use crate::models::document::Document;

/// Decode a raw journal buffer into a [`Document`].
///
/// Every failure is scoped to the record that caused it: undecodable records
/// are skipped with a debug log, unknown record types are ignored, and a
/// truncated tail ends assembly with whatever was decoded so far.
pub fn decode_document(data: &[u8]) -> Document {
    let mut doc = Document::default();

    for record in RecordReader::new(data) {
        match record.record_type {
            tag::HEADER => match records::decode_header(record.payload) {
                Ok(header) => doc.header = Some(header),
                Err(err) => debug!(%err, "skipping header record"),
            },
            tag::FOOTER => match records::decode_footer(record.payload) {
                Ok(footer) => doc.footer = Some(footer),
                Err(err) => debug!(%err, "skipping footer record"),
            },
            tag::LINE => doc.lines.push(records::decode_line(record.payload)),
            tag::SALE => match records::decode_sale(record.payload) {
                Ok(item) => doc.items.push(item),
                Err(err) => debug!(%err, "skipping sale record"),
            },
            tag::PACKAGING => match records::decode_packaging(record.payload) {
                Ok(entry) => doc.packaging.push(entry),
                Err(err) => debug!(%err, "skipping packaging record"),
            },
            tag::TOTALS => doc.summary = Some(records::decode_totals(record.payload)),
            tag::SHA => match records::decode_sha(record.payload) {
                Ok(sha) => doc.sha = Some(sha),
                Err(err) => debug!(%err, "skipping sha record"),
            },
            tag::SIG_RSA512 | tag::SIG_RSA2048 => doc.signature_present = true,
            other => debug!("skipping record 0x{:02X} ({} bytes)", other, record.payload.len()),
        }
    }

    doc
}
