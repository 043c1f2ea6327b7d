//! Age arithmetic used for class eligibility.

use chrono::{Datelike, NaiveDate, Utc};

/// Youngest age accepted at registration.
pub const MIN_STUDENT_AGE: i32 = 5;
/// Oldest age accepted at registration.
pub const MAX_STUDENT_AGE: i32 = 14;

/// Whole years between `date_of_birth` and `today`.
///
/// One less than the calendar difference when this year's birthday has not
/// happened yet. A birth date in the future yields 0.
#[must_use]
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0)
}

#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[must_use]
pub fn age_today(date_of_birth: NaiveDate) -> i32 {
    calculate_age(date_of_birth, today())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_already_passed() {
        assert_eq!(calculate_age(date(2015, 3, 10), date(2024, 6, 1)), 9);
    }

    #[test]
    fn test_birthday_not_yet() {
        assert_eq!(calculate_age(date(2015, 9, 10), date(2024, 6, 1)), 8);
    }

    #[test]
    fn test_birthday_today() {
        assert_eq!(calculate_age(date(2016, 6, 1), date(2024, 6, 1)), 8);
    }

    #[test]
    fn test_day_before_birthday() {
        assert_eq!(calculate_age(date(2016, 6, 2), date(2024, 6, 1)), 7);
    }

    #[test]
    fn test_leap_day_birth() {
        assert_eq!(calculate_age(date(2016, 2, 29), date(2024, 2, 28)), 7);
        assert_eq!(calculate_age(date(2016, 2, 29), date(2024, 2, 29)), 8);
        assert_eq!(calculate_age(date(2016, 2, 29), date(2023, 3, 1)), 7);
    }

    #[test]
    fn test_future_birth_date() {
        assert_eq!(calculate_age(date(2030, 1, 1), date(2024, 6, 1)), 0);
    }
}
