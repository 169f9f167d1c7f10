use chrono::Utc;
use tokio::time::Instant;

/// Source of "now" for token stamping and validity checks.
pub trait Clock: Send + Sync {
    /// Current UNIX timestamp in seconds
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        now_i64()
    }
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

pub fn get_instant() -> Instant {
    Instant::now()
}
