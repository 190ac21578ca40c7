//! Packed-BCD numeric fields and device timestamps.
//!
//! Printer journals encode amounts as unsigned packed BCD (two digits per
//! byte, most significant first) with a separate precision byte where the
//! scale is variable. Timestamps count seconds since 2000-01-01 00:00:00.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Decode packed BCD bytes into an unsigned integer.
///
/// Returns `None` when any nibble is not a decimal digit.
pub fn bcd_to_u64(bytes: &[u8]) -> Option<u64> {
    let mut value: u64 = 0;
    for &byte in bytes {
        let hi = (byte >> 4) as u64;
        let lo = (byte & 0x0F) as u64;
        if hi > 9 || lo > 9 {
            return None;
        }
        value = value * 100 + hi * 10 + lo;
    }
    Some(value)
}

/// Decode packed BCD into a decimal with `precision` fraction digits.
pub fn bcd_to_decimal(bytes: &[u8], precision: u32) -> Option<Decimal> {
    if precision > 28 {
        return None;
    }
    let value = bcd_to_u64(bytes)?;
    Some(Decimal::new(value as i64, precision))
}

/// Convert a device timestamp (seconds since 2000-01-01) to a naive datetime.
pub fn device_timestamp(seconds: u32) -> Option<NaiveDateTime> {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1)?.and_hms_opt(0, 0, 0)?;
    base.checked_add_signed(Duration::seconds(i64::from(seconds)))
}
