//! Data models for the event manager.
//!
//! This module contains the core data structures passed between the
//! roster reader, the field cleaner, the civic lookup and the letter
//! renderer.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One attendee row as read from the roster, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendeeRecord {
    /// Positional first field of the row.
    pub id: String,
    /// First name of the attendee.
    pub first_name: String,
    /// Zip code exactly as it appears in the file.
    pub zipcode: String,
    /// Home phone exactly as it appears in the file.
    pub homephone: String,
    /// Registration date/time string (`MM/DD/YY HH:MM`).
    pub regdate: String,
}

/// A successfully parsed registration instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistrationTime(NaiveDateTime);

impl RegistrationTime {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Hour of day, 0-23.
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Full English weekday name ("Monday" .. "Sunday").
    pub fn weekday_name(&self) -> &'static str {
        match self.0.weekday() {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl fmt::Display for RegistrationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

/// Normalized values derived from an [`AttendeeRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedFields {
    /// Always exactly 5 characters.
    pub zipcode: String,
    /// Exactly 10 digits when present.
    pub phone: Option<String>,
    pub registration: Option<RegistrationTime>,
}

/// An elected official returned by the civic information service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Official {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

/// Result of looking up the legislators for a zip code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegislatorLookup {
    /// The service answered with a list of officials.
    Officials(Vec<Official>),
    /// The service failed; the letter carries this message instead.
    Fallback(String),
}

impl LegislatorLookup {
    pub fn is_fallback(&self) -> bool {
        matches!(self, LegislatorLookup::Fallback(_))
    }
}

/// Everything a letter template may reference for one attendee.
#[derive(Debug, Clone)]
pub struct LetterContext<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub zipcode: &'a str,
    pub phone: Option<&'a str>,
    pub regdate: &'a str,
    pub legislators: &'a LegislatorLookup,
}

/// Top-N (key, count) pairs sorted by descending count.
pub type FrequencyRanking<K> = Vec<(K, usize)>;
