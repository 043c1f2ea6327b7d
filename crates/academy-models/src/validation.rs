//! Shared validation rules for request DTOs.

use std::sync::LazyLock;

use academy_core::age::{MAX_STUDENT_AGE, MIN_STUDENT_AGE, age_today};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use validator::ValidationError;

/// Optional leading `+`, no leading zero, up to 16 digits.
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[1-9]\d{0,15}$").expect("phone pattern compiles"));

/// 24h `HH:MM`, single digit hours allowed.
pub static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("time pattern compiles"));

/// Students must be between 5 and 14 years old on the day they register.
pub fn validate_student_birth_date(date_of_birth: &NaiveDate) -> Result<(), ValidationError> {
    let age = age_today(*date_of_birth);
    if (MIN_STUDENT_AGE..=MAX_STUDENT_AGE).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::new("student_age")
            .with_message("Student must be between 5 and 14 years old".into()))
    }
}

/// Parses `HH:MM` into a time of day.
pub fn parse_hh_mm(value: &str) -> Option<NaiveTime> {
    if !TIME_REGEX.is_match(value) {
        return None;
    }
    let (hours, minutes) = value.split_once(':')?;
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

/// Escapes `%`, `_` and `\` so user input is matched literally by `ILIKE`.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
