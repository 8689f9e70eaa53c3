//! The Store trait that backends implement.

use chrono::NaiveDate;

use crate::membership::Membership;
use crate::types::*;
use crate::StoreError;

/// The storage trait the server depends on.
///
/// Every mutation of an existing group is conditional on the `version` the caller read;
/// a stale version yields [`StoreError::Conflict`] and nothing is written.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Reads ──────────────────────────────────────────

    /// Get a group by ID.
    async fn get_group(&self, id: &GroupId) -> Result<StudyGroup, StoreError>;

    /// List every stored group, oldest first.
    async fn list_groups(&self) -> Result<Vec<StudyGroup>, StoreError>;

    /// List groups meeting on or after `date`, oldest first.
    async fn list_groups_from(&self, date: NaiveDate) -> Result<Vec<StudyGroup>, StoreError>;

    /// Groups whose course key equals `key` and that meet on or after `date`.
    async fn search_by_course(
        &self,
        key: &CourseKey,
        date: NaiveDate,
    ) -> Result<Vec<StudyGroup>, StoreError>;

    // ───────────────────────────────────── Writes ─────────────────────────────────────────

    /// Insert a new group owned by its creator (version 1).
    async fn create_group(&self, params: &CreateGroupParams) -> Result<StudyGroup, StoreError>;

    /// Overwrite the owner-editable fields and `updated_by`.
    async fn update_details(
        &self,
        id: &GroupId,
        expected_version: i64,
        details: &GroupDetails,
        updated_by: &str,
    ) -> Result<StudyGroup, StoreError>;

    /// Overwrite owner and attendee list.
    async fn replace_membership(
        &self,
        id: &GroupId,
        expected_version: i64,
        membership: &Membership,
    ) -> Result<StudyGroup, StoreError>;

    /// Delete unconditionally.
    async fn delete_group(&self, id: &GroupId) -> Result<(), StoreError>;

    /// Delete only if nobody changed the group since `expected_version` was read.
    async fn delete_group_at_version(
        &self,
        id: &GroupId,
        expected_version: i64,
    ) -> Result<(), StoreError>;

    /// Delete every group meeting strictly before `date`; returns how many were removed.
    async fn delete_groups_before(&self, date: NaiveDate) -> Result<u64, StoreError>;
}
