//! Availability validation for booking candidates.
//!
//! [`validate`] is a pure function over its inputs: the candidate, the
//! practice schedule in effect, and the current time are all explicit
//! parameters, never looked up internally. The same check therefore runs
//! identically on the client path and server-side before commit, and tests
//! are fully deterministic.

use agenda_core::appointment::{BookingCandidate, Slot};
use agenda_core::catalog::PracticeSchedule;
use agenda_core::error::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Expected date format of a booking candidate (`2026-09-01`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Expected time format of a booking candidate (`09:30`).
pub const TIME_FORMAT: &str = "%H:%M";

/// Decides whether a booking candidate is admissible.
///
/// Checks run in order and short-circuit on the first failure:
///
/// 1. service name, date and time are present and parseable
/// 2. the date is not before the current date at `now`
/// 3. a schedule is configured and the time lies within
///    `[opening, closing)`
///
/// Returns the parsed [`Slot`] on success so callers never re-parse.
///
/// # Errors
///
/// - [`ValidationError::MissingFields`] for empty or malformed fields
/// - [`ValidationError::PastDate`] for retroactive dates
/// - [`ValidationError::NoScheduleConfigured`] when `schedule` is `None`
/// - [`ValidationError::OutsideHours`] when the time misses the window
pub fn validate(
    candidate: &BookingCandidate,
    schedule: Option<&PracticeSchedule>,
    now: DateTime<Utc>,
) -> Result<Slot, ValidationError> {
    let slot = parse_candidate(candidate)?;

    if slot.date < now.date_naive() {
        return Err(ValidationError::PastDate);
    }

    let schedule = schedule.ok_or(ValidationError::NoScheduleConfigured)?;
    if !schedule.admits(slot.time) {
        return Err(ValidationError::OutsideHours);
    }

    Ok(slot)
}

/// Parses the candidate's text fields into a [`Slot`].
fn parse_candidate(candidate: &BookingCandidate) -> Result<Slot, ValidationError> {
    if candidate.service_name.trim().is_empty()
        || candidate.date.trim().is_empty()
        || candidate.time.trim().is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    let date = NaiveDate::parse_from_str(candidate.date.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::MissingFields)?;
    let time = NaiveTime::parse_from_str(candidate.time.trim(), TIME_FORMAT)
        .map_err(|_| ValidationError::MissingFields)?;

    Ok(Slot::new(date, time))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn schedule() -> PracticeSchedule {
        PracticeSchedule::new(time(8, 0), time(18, 0), None).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
    }

    fn candidate(date: &str, time: &str) -> BookingCandidate {
        BookingCandidate::new("Consultation", date, time)
    }

    #[test]
    fn accepts_tomorrow_within_hours() {
        let slot = validate(&candidate("2026-08-26", "09:00"), Some(&schedule()), now()).unwrap();
        assert_eq!(slot.date, NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
        assert_eq!(slot.time, time(9, 0));
    }

    #[test]
    fn accepts_today() {
        assert!(validate(&candidate("2026-08-25", "09:00"), Some(&schedule()), now()).is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        let cases = [
            BookingCandidate::new("", "2026-08-26", "09:00"),
            BookingCandidate::new("Consultation", "", "09:00"),
            BookingCandidate::new("Consultation", "2026-08-26", "  "),
            candidate("not-a-date", "09:00"),
            candidate("2026-08-26", "not-a-time"),
            candidate("2026-13-40", "09:00"),
        ];
        for case in cases {
            assert_eq!(
                validate(&case, Some(&schedule()), now()),
                Err(ValidationError::MissingFields),
                "candidate {case:?}"
            );
        }
    }

    #[test]
    fn rejects_past_date() {
        assert_eq!(
            validate(&candidate("2026-08-24", "09:00"), Some(&schedule()), now()),
            Err(ValidationError::PastDate)
        );
    }

    #[test]
    fn past_date_wins_over_outside_hours() {
        // Check order matters: the date check precedes the schedule check.
        assert_eq!(
            validate(&candidate("2020-01-01", "23:00"), Some(&schedule()), now()),
            Err(ValidationError::PastDate)
        );
    }

    #[test]
    fn rejects_when_no_schedule_configured() {
        assert_eq!(
            validate(&candidate("2026-08-26", "09:00"), None, now()),
            Err(ValidationError::NoScheduleConfigured)
        );
    }

    #[test]
    fn rejects_outside_hours() {
        assert_eq!(
            validate(&candidate("2026-08-26", "19:00"), Some(&schedule()), now()),
            Err(ValidationError::OutsideHours)
        );
        // Closing time itself is excluded: the window is half-open.
        assert_eq!(
            validate(&candidate("2026-08-26", "18:00"), Some(&schedule()), now()),
            Err(ValidationError::OutsideHours)
        );
        // Opening time is included.
        assert!(validate(&candidate("2026-08-26", "08:00"), Some(&schedule()), now()).is_ok());
    }

    #[test]
    fn validation_is_pure() {
        let c = candidate("2026-08-26", "09:00");
        let s = schedule();
        let first = validate(&c, Some(&s), now());
        let second = validate(&c, Some(&s), now());
        assert_eq!(first, second);
    }

    proptest! {
        /// Any well-formed future candidate validates exactly when its time
        /// falls inside the schedule window.
        #[test]
        fn admission_matches_window(hour in 0u32..24, minute in 0u32..60, days_ahead in 0i64..365) {
            let schedule = schedule();
            let now = now();
            let date = (now.date_naive() + Duration::days(days_ahead))
                .format(DATE_FORMAT)
                .to_string();
            let candidate = candidate(&date, &format!("{hour:02}:{minute:02}"));

            let result = validate(&candidate, Some(&schedule), now);
            let requested = time(hour, minute);
            if schedule.admits(requested) {
                prop_assert_eq!(result.unwrap().time, requested);
            } else {
                prop_assert_eq!(result, Err(ValidationError::OutsideHours));
            }
        }
    }
}
