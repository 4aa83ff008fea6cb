//! Calendar helpers: day and ISO-week boundaries.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Monday of the ISO week containing `date`.
pub fn start_of_iso_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Sunday of the ISO week containing `date`.
pub fn end_of_iso_week(date: NaiveDate) -> NaiveDate {
    start_of_iso_week(date) + Duration::days(6)
}

/// Last representable millisecond of `date` (23:59:59.999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_ms)
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn same_iso_week(a: NaiveDate, b: NaiveDate) -> bool {
    start_of_iso_week(a) == start_of_iso_week(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_iso_week_starts_monday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(start_of_iso_week(d(2024, 5, 15)), d(2024, 5, 13));
        assert_eq!(end_of_iso_week(d(2024, 5, 15)), d(2024, 5, 19));
        // Sunday belongs to the week that started the previous Monday
        assert_eq!(start_of_iso_week(d(2024, 5, 19)), d(2024, 5, 13));
        assert_eq!(start_of_iso_week(d(2024, 5, 13)), d(2024, 5, 13));
    }

    #[test]
    fn test_end_of_day() {
        let end = end_of_day(d(2024, 1, 1));
        assert_eq!(end.date(), d(2024, 1, 1));
        assert!(end > start_of_day(d(2024, 1, 1)));
        assert!(end < start_of_day(d(2024, 1, 2)));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(d(2024, 2, 28), d(2024, 3, 1)), 2);
        assert_eq!(days_between(d(2024, 3, 1), d(2024, 2, 28)), -2);
    }

    #[test]
    fn test_weekend_and_week_membership() {
        assert!(is_weekend(d(2024, 5, 18)));
        assert!(!is_weekend(d(2024, 5, 17)));
        assert!(same_iso_week(d(2024, 5, 13), d(2024, 5, 19)));
        assert!(!same_iso_week(d(2024, 5, 19), d(2024, 5, 20)));
    }
}
