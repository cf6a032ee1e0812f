//! Resolution of the server's configured timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the UTC offset currently in effect for a canonical timezone name,
/// e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current calendar date in the given timezone.
///
/// Period windows and recurrence due checks are all anchored to this date so
/// that "today" agrees with the user's wall clock rather than UTC.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if `canonical_timezone` is not a known
/// canonical timezone name.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{get_local_offset, local_today};

    #[test]
    fn resolves_known_timezone() {
        assert!(get_local_offset("Pacific/Auckland").is_some());
        assert!(get_local_offset("UTC").is_some());
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let got = local_today("Atlantis/Lemuria");

        assert_eq!(got, Err(Error::InvalidTimezone("Atlantis/Lemuria".to_owned())));
    }
}
