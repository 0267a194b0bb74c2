//! Time source for changelog timestamps and `{date}` tag placeholders.

use chrono::{Local, NaiveDateTime};

/// Returns the current local date and time.
///
/// Formatters and the tag persister hold one of these so tests can pin the
/// timestamp they render.
pub type Clock = fn() -> NaiveDateTime;

/// The wall clock in the local timezone.
pub fn system_clock() -> NaiveDateTime {
    Local::now().naive_local()
}
