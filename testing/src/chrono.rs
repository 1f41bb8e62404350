//! A stand-in for `chrono::Utc` with a clock controlled by the test.
//!
//! The clock is per thread and starts at `1234567890`.

use chrono::DateTime;
use std::cell::Cell;

thread_local! {
    static TIMESTAMP: Cell<i64> = const { Cell::new(1234567890) };
}

pub fn set_timestamp(ts: i64) {
    TIMESTAMP.with(|t| t.set(ts));
}

pub fn timestamp() -> i64 {
    TIMESTAMP.with(|t| t.get())
}

pub struct Utc;

impl Utc {
    pub fn now() -> DateTime<chrono::Utc> {
        DateTime::from_timestamp(timestamp(), 0)
            .unwrap_or_default()
    }
}
