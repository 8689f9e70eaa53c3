//! Validation errors raised while turning caller input into domain values.

use thiserror::Error;

/// A caller supplied a missing or malformed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingRequiredFields,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email '{email}': must be a {domain} address")]
    InvalidEmail { email: String, domain: String },

    #[error("Invalid institution domain: {0}")]
    InvalidDomain(String),

    #[error("Unknown campus: {0}")]
    UnknownCampus(String),

    #[error("Invalid meeting time '{0}': expected HH:MM or h:MM AM/PM")]
    InvalidMeetingTime(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Course search term cannot be empty")]
    EmptyCourseQuery,
}
