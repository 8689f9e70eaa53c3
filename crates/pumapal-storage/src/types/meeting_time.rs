//! Time-of-day a group meets.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

use super::ValidationError;

/// Wall-clock meeting time, persisted as zero-padded 24h `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeetingTime(NaiveTime);

impl MeetingTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Accepts `18:30`, `18:30:00`, `6:30 PM`, `6:30pm`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidMeetingTime(raw.to_string());
        let s = raw.trim();
        if s.is_empty() {
            return Err(ValidationError::MissingField("meetingTime"));
        }

        let upper = s.to_ascii_uppercase();
        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let mut parts = clock.split(':');
        let hour: u32 = parts
            .next()
            .and_then(|h| h.parse().ok())
            .ok_or_else(invalid)?;
        let minute: u32 = parts
            .next()
            .filter(|m| m.len() == 2)
            .and_then(|m| m.parse().ok())
            .ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            if meridiem.is_some() || seconds.parse::<u32>().map_or(true, |s| s > 59) {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        let hour = match meridiem {
            None => hour,
            Some(_) if !(1..=12).contains(&hour) => return Err(invalid()),
            Some(true) if hour == 12 => 12,
            Some(true) => hour + 12,
            Some(false) if hour == 12 => 0,
            Some(false) => hour,
        };

        Self::from_hm(hour, minute).ok_or_else(invalid)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes since midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for MeetingTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
