//! Field cleaning.
//!
//! Pure normalization of zip codes, phone numbers and registration
//! timestamps read from the roster.

pub mod fields;

pub use fields::*;
