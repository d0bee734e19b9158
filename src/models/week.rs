//! Weekly time grid.
//!
//! The planning week has six working days (Monday to Saturday) and
//! thirteen one-hour slots per day, starting at 08:00. Days and hours are
//! addressed by zero-based index everywhere in the crate; these helpers
//! translate indices into calendar terms for reporting.

/// Working days per week (Monday..Saturday).
pub const DAYS: usize = 6;

/// Hour slots per day.
pub const HOURS: usize = 13;

/// Clock hour of slot index 0.
pub const FIRST_HOUR: usize = 8;

/// Index of the remote (virtual) location.
///
/// Appointments here do not count toward a doctor's single physical
/// location per day.
pub const REMOTE_LOCATION: usize = 0;

const DAY_NAMES: [&str; DAYS] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Name of a day index, or `None` when out of range.
pub fn day_name(day: usize) -> Option<&'static str> {
    DAY_NAMES.get(day).copied()
}

/// Clock hour (8..=20) of an hour slot index.
#[inline]
pub fn clock_hour(hour: usize) -> usize {
    FIRST_HOUR + hour
}

/// Slot index of a clock hour, or `None` outside 08:00..=20:00.
pub fn hour_index(clock: usize) -> Option<usize> {
    clock
        .checked_sub(FIRST_HOUR)
        .filter(|&h| h < HOURS)
}
