//! Study group records and the parameters used to create and edit them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Campus, CourseCode, GroupId, InstitutionalEmail, MeetingTime, ValidationError};
use crate::membership::Membership;

/// A member of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    pub email: String,
}

impl Attendee {
    pub fn new(name: impl Into<String>, email: &InstitutionalEmail) -> Self {
        Self {
            name: name.into(),
            email: email.as_str().to_string(),
        }
    }
}

/// Study group record
#[derive(Clone, Debug, PartialEq)]
pub struct StudyGroup {
    pub id: GroupId,
    pub course: String,
    pub campus: Campus,
    pub location: String,
    pub notes: String,
    pub group_title: String,
    pub meeting_time: MeetingTime,
    pub date: NaiveDate,
    pub owner_email: String,
    pub attendees: Vec<Attendee>,
    pub show_owner_email: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Revision counter for compare-and-swap writes; starts at 1.
    pub version: i64,
}

impl StudyGroup {
    pub fn membership(&self) -> Membership {
        Membership {
            owner_email: self.owner_email.clone(),
            attendees: self.attendees.clone(),
        }
    }

    pub fn is_attendee(&self, email: &str) -> bool {
        self.attendees.iter().any(|a| a.email == email)
    }

    pub fn is_owner(&self, email: &str) -> bool {
        self.owner_email == email
    }

    /// The meeting day is strictly before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.date < today
    }

    pub fn details(&self) -> GroupDetails {
        GroupDetails {
            group_title: self.group_title.clone(),
            campus: self.campus,
            location: self.location.clone(),
            date: self.date,
            meeting_time: self.meeting_time,
            notes: self.notes.clone(),
            show_owner_email: self.show_owner_email,
        }
    }
}

/// Parameters for creating a group. The creator becomes owner and sole attendee.
#[derive(Clone, Debug)]
pub struct CreateGroupParams {
    pub course: CourseCode,
    pub campus: Campus,
    pub meeting_time: MeetingTime,
    pub date: NaiveDate,
    pub location: String,
    pub notes: String,
    pub group_title: String,
    pub show_owner_email: bool,
    pub creator_name: String,
    pub creator_email: InstitutionalEmail,
}

impl CreateGroupParams {
    pub fn founding_membership(&self) -> Membership {
        Membership::founded_by(Attendee::new(
            self.creator_name.clone(),
            &self.creator_email,
        ))
    }
}

/// The owner-editable fields of a group, written as a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupDetails {
    pub group_title: String,
    pub campus: Campus,
    pub location: String,
    pub date: NaiveDate,
    pub meeting_time: MeetingTime,
    pub notes: String,
    pub show_owner_email: bool,
}

/// A partial edit; `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupChanges {
    pub group_title: Option<String>,
    pub campus: Option<Campus>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub meeting_time: Option<MeetingTime>,
    pub notes: Option<String>,
    pub show_owner_email: Option<bool>,
}

impl GroupChanges {
    pub fn apply(&self, mut details: GroupDetails) -> GroupDetails {
        // An empty title never clears an existing one.
        if let Some(title) = self.group_title.as_ref().filter(|t| !t.is_empty()) {
            details.group_title = title.clone();
        }
        if let Some(campus) = self.campus {
            details.campus = campus;
        }
        if let Some(location) = &self.location {
            details.location = location.clone();
        }
        if let Some(date) = self.date {
            details.date = date;
        }
        if let Some(time) = self.meeting_time {
            details.meeting_time = time;
        }
        if let Some(notes) = &self.notes {
            details.notes = notes.clone();
        }
        if let Some(show) = self.show_owner_email {
            details.show_owner_email = show;
        }
        details
    }
}

/// Parse a meeting date given as `YYYY-MM-DD` or as an RFC 3339 timestamp (date part, UTC).
pub fn parse_meeting_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ValidationError::MissingField("date"));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}
