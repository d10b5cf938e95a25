//! Normalization of raw roster fields.
//!
//! Every function here is total: bad input turns into an absent value
//! (or, for zip codes, a padded/truncated one), never an error.

use crate::models::{AttendeeRecord, CleanedFields, RegistrationTime};
use chrono::NaiveDateTime;
use tracing::warn;

/// Registration timestamps look like `11/12/08 10:47`.
pub const REGISTRATION_FORMAT: &str = "%m/%d/%y %H:%M";

const ZIP_LENGTH: usize = 5;
const PHONE_LENGTH: usize = 10;

/// Left-pad with zeros to five characters, then keep the first five.
///
/// Works on the characters of the string, so non-numeric input is padded
/// and truncated the same way.
pub fn clean_zipcode(raw: &str) -> String {
    let padding = ZIP_LENGTH.saturating_sub(raw.chars().count());

    std::iter::repeat('0')
        .take(padding)
        .chain(raw.chars())
        .take(ZIP_LENGTH)
        .collect()
}

/// Reduce a phone number to its ten significant digits.
///
/// An 11-digit number is accepted only with a leading US country code `1`.
pub fn clean_phone_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        PHONE_LENGTH => Some(digits),
        11 if digits.starts_with('1') => Some(digits[1..].to_string()),
        _ => None,
    }
}

/// Parse a registration timestamp, logging and returning `None` on mismatch.
pub fn parse_registration_timestamp(raw: &str, format: &str) -> Option<RegistrationTime> {
    match NaiveDateTime::parse_from_str(raw.trim(), format) {
        Ok(datetime) => Some(RegistrationTime::new(datetime)),
        Err(e) => {
            warn!("Error parsing registration date '{}': {}", raw, e);
            None
        }
    }
}

/// Clean every field of a record at once.
pub fn clean_record(record: &AttendeeRecord) -> CleanedFields {
    CleanedFields {
        zipcode: clean_zipcode(&record.zipcode),
        phone: clean_phone_number(&record.homephone),
        registration: parse_registration_timestamp(&record.regdate, REGISTRATION_FORMAT),
    }
}
