//! Clock abstraction and JST formatting helpers.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Source of "now" for anything that stamps messages or joins.
pub trait Clock: Send + Sync {
    /// Current Unix time in milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Test clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Current Unix timestamp in milliseconds, taken in JST.
pub fn get_jst_timestamp() -> i64 {
    chrono::Utc::now().with_timezone(&jst()).timestamp_millis()
}

/// Render a millisecond timestamp as RFC 3339 in JST.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_millis).map(|dt| dt.with_timezone(&jst()).to_rfc3339())
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("JST offset is within a day")
}
