//! Wall-clock abstraction.

use chrono::{DateTime, Utc};

/// Source of the current time for month scoping, "today" filters and
/// message timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
