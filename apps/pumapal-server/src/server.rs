use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use pumapal_api::{CreateGroupRequest, JoinRequest, LeaveRequest, UpdateGroupRequest};
use pumapal_storage::{
    normalize_email, parse_meeting_date, Attendee, Campus, CourseCode, CourseKey, CreateGroupParams,
    EmailPolicy, GroupChanges, GroupId, JoinOutcome, LeaveOutcome, MeetingTime, Store, StoreError,
    StudyGroup, ValidationError,
};
use tracing::{info, warn};

use crate::backend::StoreBackend;
use crate::config::ServerConfig;
use crate::error::{ApiError, NOT_OWNER};
use crate::metrics;

/// Read-modify-write attempts before a contended group answers 409.
pub const MAX_CAS_ATTEMPTS: u32 = 5;

/// What a leave did to the group.
#[derive(Debug)]
pub enum LeaveResult {
    Remaining(StudyGroup),
    Deleted,
}

/// Calendar day (UTC) that decides whether a group has expired.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Study group service over any [`Store`]; the running server uses [`StoreBackend`].
#[derive(Clone)]
pub struct PumaPalServer<S = StoreBackend> {
    pub store: S,
    pub config: Arc<ServerConfig>,
}

impl<S: Store> PumaPalServer<S> {
    pub fn new(store: S, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    fn email_policy(&self) -> &EmailPolicy {
        &self.config.email_policy
    }

    // ───────────────────────────── Reads ─────────────────────────────

    /// Groups meeting today or later.
    pub async fn list_active(&self) -> Result<Vec<StudyGroup>, ApiError> {
        self.store
            .list_groups_from(today())
            .await
            .map_err(|e| ApiError::from_store("Failed to get study groups", e))
    }

    /// Groups whose course matches `raw` ignoring whitespace and case.
    pub async fn search(&self, raw: Option<&str>) -> Result<Vec<StudyGroup>, ApiError> {
        let key = CourseKey::from_query(raw.unwrap_or_default())?;
        self.store
            .search_by_course(&key, today())
            .await
            .map_err(|e| ApiError::from_store("Failed to search study groups", e))
    }

    pub async fn get(&self, id: &GroupId) -> Result<StudyGroup, ApiError> {
        self.store
            .get_group(id)
            .await
            .map_err(|e| ApiError::from_store("Failed to get study group", e))
    }

    // ───────────────────────────── Writes ────────────────────────────

    pub async fn create(&self, req: CreateGroupRequest) -> Result<StudyGroup, ApiError> {
        let params = self.create_params(req)?;
        let group = self
            .store
            .create_group(&params)
            .await
            .map_err(|e| ApiError::from_store("Failed to create study group", e))?;

        info!(group_id = %group.id, course = %group.course, email = %group.owner_email, "group created");
        Ok(group)
    }

    fn create_params(&self, req: CreateGroupRequest) -> Result<CreateGroupParams, ValidationError> {
        let required = [
            &req.name,
            &req.email,
            &req.course,
            &req.campus,
            &req.meeting_time,
            &req.date,
        ];
        if required
            .iter()
            .any(|f| f.as_deref().map_or(true, |v| v.trim().is_empty()))
        {
            return Err(ValidationError::MissingRequiredFields);
        }

        Ok(CreateGroupParams {
            course: CourseCode::parse(req.course.as_deref().unwrap_or_default())?,
            campus: req.campus.as_deref().unwrap_or_default().parse::<Campus>()?,
            meeting_time: MeetingTime::parse(req.meeting_time.as_deref().unwrap_or_default())?,
            date: parse_meeting_date(req.date.as_deref().unwrap_or_default())?,
            location: req.location.unwrap_or_default(),
            notes: req.notes.unwrap_or_default(),
            group_title: req.group_title.unwrap_or_default(),
            show_owner_email: req.show_owner_email.unwrap_or(true),
            creator_name: req.name.unwrap_or_default().trim().to_string(),
            creator_email: self
                .email_policy()
                .validate(req.email.as_deref().unwrap_or_default())?,
        })
    }

    /// Owner-only partial edit.
    pub async fn update(
        &self,
        id: &GroupId,
        req: UpdateGroupRequest,
    ) -> Result<StudyGroup, ApiError> {
        let updater = req
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Email of updater is required".to_string()))?;
        let changes = parse_changes(&req)?;

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let group = self.get(id).await?;
            if !group.is_owner(&updater) {
                return Err(ApiError::Forbidden(NOT_OWNER.to_string()));
            }

            let details = changes.apply(group.details());
            match self
                .store
                .update_details(id, group.version, &details, &updater)
                .await
            {
                Ok(updated) => {
                    info!(group_id = %id, email = %updater, "group updated");
                    return Ok(updated);
                }
                Err(StoreError::Conflict) => {
                    warn!(group_id = %id, attempt, "update lost a concurrent write, retrying");
                }
                Err(e) => return Err(ApiError::from_store("Failed to update group", e)),
            }
        }
        Err(ApiError::concurrent_modification())
    }

    /// Delete by id. Deleting a group that does not exist succeeds.
    pub async fn delete(&self, id: &GroupId) -> Result<(), ApiError> {
        match self.store.delete_group(id).await {
            Ok(()) => {
                info!(group_id = %id, "group deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Ok(()),
            Err(e) => Err(ApiError::from_store("Failed to delete study group", e)),
        }
    }

    /// Add an attendee; joining twice is a no-op.
    pub async fn join(&self, id: &GroupId, req: JoinRequest) -> Result<StudyGroup, ApiError> {
        let name = req.name.as_deref().map(str::trim).unwrap_or_default();
        let email = req.email.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() || email.is_empty() {
            return Err(ApiError::BadRequest(
                "Name and email are required".to_string(),
            ));
        }
        let attendee = Attendee::new(name, &self.email_policy().validate(email)?);

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let group = self.get(id).await?;
            let membership = match group.membership().join(attendee.clone()) {
                JoinOutcome::AlreadyMember => return Ok(group),
                JoinOutcome::Joined(m) => m,
            };

            match self
                .store
                .replace_membership(id, group.version, &membership)
                .await
            {
                Ok(updated) => {
                    info!(group_id = %id, email = %attendee.email, "member joined");
                    return Ok(updated);
                }
                Err(StoreError::Conflict) => {
                    warn!(group_id = %id, attempt, "join lost a concurrent write, retrying");
                }
                Err(e) => return Err(ApiError::from_store("Failed to join group", e)),
            }
        }
        Err(ApiError::concurrent_modification())
    }

    /// Remove an attendee, handing ownership to the earliest remaining member and
    /// deleting the group once nobody is left.
    pub async fn leave(&self, id: &GroupId, req: LeaveRequest) -> Result<LeaveResult, ApiError> {
        let email = req
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Email is required".to_string()))?;

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let group = self.get(id).await?;
            let written = match group.membership().leave(&email)? {
                LeaveOutcome::Remaining(membership) => self
                    .store
                    .replace_membership(id, group.version, &membership)
                    .await
                    .map(LeaveResult::Remaining),
                LeaveOutcome::Emptied => self
                    .store
                    .delete_group_at_version(id, group.version)
                    .await
                    .map(|()| LeaveResult::Deleted),
            };

            match written {
                Ok(LeaveResult::Remaining(updated)) => {
                    if updated.owner_email != group.owner_email {
                        info!(group_id = %id, owner = %updated.owner_email, "ownership transferred");
                    }
                    info!(group_id = %id, email = %email, "member left");
                    return Ok(LeaveResult::Remaining(updated));
                }
                Ok(LeaveResult::Deleted) => {
                    info!(group_id = %id, email = %email, "last member left, group deleted");
                    return Ok(LeaveResult::Deleted);
                }
                Err(StoreError::Conflict) => {
                    warn!(group_id = %id, attempt, "leave lost a concurrent write, retrying");
                }
                Err(e) => return Err(ApiError::from_store("Failed to leave group", e)),
            }
        }
        Err(ApiError::concurrent_modification())
    }

    /// Delete every group whose meeting day is before `today`.
    pub async fn sweep_expired(&self, today: NaiveDate) -> Result<u64, StoreError> {
        let deleted = self.store.delete_groups_before(today).await?;
        metrics::record_sweep(deleted);
        info!(deleted, cutoff = %today, "expired groups swept");
        Ok(deleted)
    }
}

fn parse_changes(req: &UpdateGroupRequest) -> Result<GroupChanges, ValidationError> {
    Ok(GroupChanges {
        group_title: req.group_title.clone(),
        campus: req
            .campus
            .as_deref()
            .map(str::parse::<Campus>)
            .transpose()?,
        location: req.location.clone(),
        date: req.date.as_deref().map(parse_meeting_date).transpose()?,
        meeting_time: req
            .meeting_time
            .as_deref()
            .map(MeetingTime::parse)
            .transpose()?,
        notes: req.notes.clone(),
        show_owner_email: req.show_owner_email,
    })
}
