//! JSON wire types for the `/api/study-groups` REST surface.
//!
//! Field names are camelCase on the wire. Request bodies keep every field optional so the
//! server can answer a missing field with its own validation message rather than a
//! framework rejection.

use chrono::{DateTime, NaiveDate, Utc};
use pumapal_storage::{Attendee, Campus, StudyGroup};
use serde::{Deserialize, Serialize};

/// Base path of the study group routes.
pub const API_BASE: &str = "/api/study-groups";

/// Message returned when a leave empties a group.
pub const LAST_MEMBER_LEFT: &str = "Group deleted as last member left";

/// A study group as returned by every read and write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupDto {
    pub id: String,
    pub course: String,
    pub campus: Campus,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub group_title: String,
    /// Zero-padded 24-hour `HH:MM`.
    pub meeting_time: String,
    pub date: NaiveDate,
    pub owner_email: String,
    pub attendees: Vec<Attendee>,
    pub show_owner_email: bool,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl From<StudyGroup> for StudyGroupDto {
    fn from(g: StudyGroup) -> Self {
        Self {
            id: g.id.to_string(),
            course: g.course,
            campus: g.campus,
            location: g.location,
            notes: g.notes,
            group_title: g.group_title,
            meeting_time: g.meeting_time.to_string(),
            date: g.date,
            owner_email: g.owner_email,
            attendees: g.attendees,
            show_owner_email: g.show_owner_email,
            created_by: g.created_by,
            updated_by: g.updated_by,
            created_at: g.created_at,
            updated_at: g.updated_at,
            version: g.version,
        }
    }
}

impl StudyGroupDto {
    pub fn is_attendee(&self, email: &str) -> bool {
        self.attendees.iter().any(|a| a.email.eq_ignore_ascii_case(email))
    }

    pub fn is_owner(&self, email: &str) -> bool {
        self.owner_email.eq_ignore_ascii_case(email)
    }
}

/// `POST /` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
    pub campus: Option<String>,
    pub meeting_time: Option<String>,
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_owner_email: Option<bool>,
}

/// `PUT /:id` body. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    /// The student making the edit; must be the current owner.
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_owner_email: Option<bool>,
}

/// `POST /search` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub course: Option<String>,
}

/// `POST /:id/join` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// `POST /:id/leave` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupDeleted {
    pub deleted: bool,
    pub message: String,
}

impl GroupDeleted {
    pub fn last_member_left() -> Self {
        Self {
            deleted: true,
            message: LAST_MEMBER_LEFT.to_string(),
        }
    }
}

/// `POST /:id/leave` response: the surviving group, or notice that it was removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeaveResponse {
    Deleted(GroupDeleted),
    Group(Box<StudyGroupDto>),
}

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
