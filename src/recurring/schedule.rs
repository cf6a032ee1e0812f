//! Calendar-aware advancement of recurring due dates.

use time::{Date, Duration, Month};

use crate::recurring::core::Frequency;

/// Advance a due date by one step of `frequency`.
///
/// Day-based frequencies add a fixed number of days. Month and year steps are
/// calendar-aware: when the target month is shorter than the current day of
/// month, the day clamps to the last day of the target month, so
/// `2025-01-31` + one month = `2025-02-28` and `2024-02-29` + one year =
/// `2025-02-28`.
pub fn advance(date: Date, frequency: Frequency) -> Date {
    match frequency {
        Frequency::Daily => date + Duration::days(1),
        Frequency::Weekly => date + Duration::days(7),
        Frequency::Biweekly => date + Duration::days(14),
        Frequency::Monthly => {
            let (year, month) = match date.month() {
                Month::December => (date.year() + 1, Month::January),
                month => (date.year(), month.next()),
            };

            clamp_to_month(year, month, date.day())
        }
        Frequency::Yearly => clamp_to_month(date.year() + 1, date.month(), date.day()),
    }
}

/// The date in `year`/`month` closest to `day` without overshooting the
/// month's length.
fn clamp_to_month(year: i32, month: Month, day: u8) -> Date {
    (1..=day)
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .unwrap()
}
