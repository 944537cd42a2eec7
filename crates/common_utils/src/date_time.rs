//! Date and time utilities.

use time::OffsetDateTime;

/// Current timestamp, UTC.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
