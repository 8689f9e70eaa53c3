use chrono::{DateTime, NaiveDate, Utc};
use pumapal_storage::{
    Attendee, CourseKey, CreateGroupParams, GroupDetails, GroupId, MeetingTime, Membership, Store,
    StoreError, StudyGroup,
};
use sqlx::types::Json;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const GROUP_COLUMNS: &str = "id, course, campus, location, notes, group_title, meeting_time, \
     meeting_date, owner_email, attendees, show_owner_email, created_by, updated_by, \
     created_at, updated_at, version";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        // A single connection serializes writers and keeps `sqlite::memory:` one database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Tell a failed conditional write apart: gone, or changed underneath us.
    async fn missing_or_conflict(&self, id: &GroupId) -> StoreError {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT 1 FROM study_groups WHERE id = ?")
            .bind(id.0.to_string())
            .fetch_optional(&self.pool)
            .await;
        match exists {
            Ok(Some(_)) => StoreError::Conflict,
            Ok(None) => StoreError::NotFound,
            Err(e) => StoreError::Backend(e.to_string()),
        }
    }

    async fn fetch_groups(
        &self,
        filter: &str,
        binds: &[String],
    ) -> Result<Vec<StudyGroup>, StoreError> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups {filter} ORDER BY created_at, id"
        );
        let mut query = sqlx::query_as::<_, GroupRow>(&sql);
        for value in binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        rows.into_iter().map(GroupRow::into_group).collect()
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: String,
    course: String,
    campus: String,
    location: String,
    notes: String,
    group_title: String,
    meeting_time: String,
    meeting_date: NaiveDate,
    owner_email: String,
    attendees: Json<Vec<Attendee>>,
    show_owner_email: bool,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl GroupRow {
    fn into_group(self) -> Result<StudyGroup, StoreError> {
        let id = Uuid::try_parse(&self.id).map_err(|e| StoreError::Backend(e.to_string()))?;
        let campus = self
            .campus
            .parse()
            .map_err(|e: pumapal_storage::ValidationError| StoreError::Backend(e.to_string()))?;
        let meeting_time = MeetingTime::parse(&self.meeting_time)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(StudyGroup {
            id: GroupId(id),
            course: self.course,
            campus,
            location: self.location,
            notes: self.notes,
            group_title: self.group_title,
            meeting_time,
            date: self.meeting_date,
            owner_email: self.owner_email,
            attendees: self.attendees.0,
            show_owner_email: self.show_owner_email,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        })
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ───────────────────────────── Reads ─────────────────────────────

    async fn get_group(&self, id: &GroupId) -> Result<StudyGroup, StoreError> {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM study_groups WHERE id = ?");
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => row.into_group(),
        }
    }

    async fn list_groups(&self) -> Result<Vec<StudyGroup>, StoreError> {
        self.fetch_groups("", &[]).await
    }

    async fn list_groups_from(&self, date: NaiveDate) -> Result<Vec<StudyGroup>, StoreError> {
        self.fetch_groups("WHERE meeting_date >= ?", &[date.to_string()])
            .await
    }

    async fn search_by_course(
        &self,
        key: &CourseKey,
        date: NaiveDate,
    ) -> Result<Vec<StudyGroup>, StoreError> {
        self.fetch_groups(
            "WHERE course_key = ? AND meeting_date >= ?",
            &[key.as_str().to_string(), date.to_string()],
        )
        .await
    }

    // ───────────────────────────── Writes ────────────────────────────

    async fn create_group(&self, p: &CreateGroupParams) -> Result<StudyGroup, StoreError> {
        let id = GroupId::generate();
        let now = Utc::now();
        let membership = p.founding_membership();
        let creator = p.creator_email.as_str();

        let sql = format!(
            "INSERT INTO study_groups(id, course, course_key, campus, location, notes, group_title,
                                      meeting_time, meeting_date, owner_email, attendees,
                                      show_owner_email, created_by, updated_by, created_at,
                                      updated_at, version)
             VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
             RETURNING {GROUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(id.0.to_string())
            .bind(p.course.as_str())
            .bind(p.course.key().as_str())
            .bind(p.campus.as_str())
            .bind(&p.location)
            .bind(&p.notes)
            .bind(&p.group_title)
            .bind(p.meeting_time.to_string())
            .bind(p.date)
            .bind(&membership.owner_email)
            .bind(Json(&membership.attendees))
            .bind(p.show_owner_email)
            .bind(creator)
            .bind(creator)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.into_group()
    }

    async fn update_details(
        &self,
        id: &GroupId,
        expected_version: i64,
        details: &GroupDetails,
        updated_by: &str,
    ) -> Result<StudyGroup, StoreError> {
        let sql = format!(
            "UPDATE study_groups
                SET group_title = ?, campus = ?, location = ?, meeting_date = ?,
                    meeting_time = ?, notes = ?, show_owner_email = ?, updated_by = ?,
                    updated_at = ?, version = version + 1
              WHERE id = ? AND version = ?
             RETURNING {GROUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(&details.group_title)
            .bind(details.campus.as_str())
            .bind(&details.location)
            .bind(details.date)
            .bind(details.meeting_time.to_string())
            .bind(&details.notes)
            .bind(details.show_owner_email)
            .bind(updated_by)
            .bind(Utc::now())
            .bind(id.0.to_string())
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            Some(row) => row.into_group(),
            None => Err(self.missing_or_conflict(id).await),
        }
    }

    async fn replace_membership(
        &self,
        id: &GroupId,
        expected_version: i64,
        membership: &Membership,
    ) -> Result<StudyGroup, StoreError> {
        let sql = format!(
            "UPDATE study_groups
                SET owner_email = ?, attendees = ?, updated_at = ?, version = version + 1
              WHERE id = ? AND version = ?
             RETURNING {GROUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(&membership.owner_email)
            .bind(Json(&membership.attendees))
            .bind(Utc::now())
            .bind(id.0.to_string())
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            Some(row) => row.into_group(),
            None => Err(self.missing_or_conflict(id).await),
        }
    }

    async fn delete_group(&self, id: &GroupId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM study_groups WHERE id = ?")
            .bind(id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_group_at_version(
        &self,
        id: &GroupId,
        expected_version: i64,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM study_groups WHERE id = ? AND version = ?")
            .bind(id.0.to_string())
            .bind(expected_version)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(id).await);
        }
        Ok(())
    }

    async fn delete_groups_before(&self, date: NaiveDate) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM study_groups WHERE meeting_date < ?")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
