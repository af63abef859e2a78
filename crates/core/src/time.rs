//! Wall-clock helpers for time fields
//!
//! Time fields store epoch milliseconds as a long.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch
///
/// A clock set before 1970 reads as 0.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// True when more than `threshold_ms` have elapsed since `stamp`
pub fn has_elapsed(stamp: i64, threshold_ms: i64) -> bool {
    now_millis().wrapping_sub(stamp) > threshold_ms
}
