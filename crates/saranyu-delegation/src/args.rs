//! Decimal text argument parsing
//!
//! Counts and timestamps reach the ledger as decimal text. Parsing is strict:
//! ASCII digits only, no sign, no whitespace, and values outside the target
//! type are rejected instead of truncated.

use crate::capacity::Capacity;
use saranyu_core::{LedgerError, LedgerTime, Pck, Result};

/// Parse `text` as an unsigned decimal that fits in `T`
pub fn parse_decimal<T: TryFrom<u64>>(field: &str, text: &str) -> Result<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::invalid_argument(format!(
            "{field}: {text:?} is not a decimal number"
        )));
    }
    let value: u64 = text.parse().map_err(|_| {
        LedgerError::invalid_argument(format!("{field}: {text} does not fit in 64 bits"))
    })?;
    T::try_from(value)
        .map_err(|_| LedgerError::invalid_argument(format!("{field}: {value} is out of range")))
}

/// Sub-delegation budget, 0..=255
pub fn parse_capacity(field: &str, text: &str) -> Result<Capacity> {
    parse_decimal::<u8>(field, text).map(Capacity::new)
}

/// Unix timestamp in seconds
pub fn parse_timestamp(field: &str, text: &str) -> Result<LedgerTime> {
    parse_decimal::<u64>(field, text).map(LedgerTime::from_secs)
}

/// Core count for charging
pub fn parse_core_count(text: &str) -> Result<u64> {
    parse_decimal("core count", text)
}

/// Record identifier
pub fn parse_pck(field: &str, text: &str) -> Result<Pck> {
    Pck::new(text).map_err(|err| LedgerError::invalid_argument(format!("{field}: {err}")))
}
