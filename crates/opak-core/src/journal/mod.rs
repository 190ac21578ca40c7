//! Journal record framing and decoding.

pub mod bcd;
pub mod document;
pub mod reader;
pub mod records;

pub use document::decode_document;
pub use reader::{RawRecord, RecordReader, RECORD_HEADER_SIZE};
