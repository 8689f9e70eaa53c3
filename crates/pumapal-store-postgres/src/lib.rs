use chrono::{DateTime, NaiveDate, Utc};
use pumapal_storage::{
    Attendee, CourseKey, CreateGroupParams, GroupDetails, GroupId, MeetingTime, Membership, Store,
    StoreError, StudyGroup, ValidationError,
};
use sqlx::types::Json;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const GROUP_COLUMNS: &str = "id, course, campus, location, notes, group_title, meeting_time, \
     meeting_date, owner_email, attendees, show_owner_email, created_by, updated_by, \
     created_at, updated_at, version";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }

    async fn missing_or_conflict(&self, id: &GroupId) -> StoreError {
        let exists = sqlx::query_as::<_, (i32,)>("SELECT 1 FROM study_groups WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await;
        match exists {
            Ok(Some(_)) => StoreError::Conflict,
            Ok(None) => StoreError::NotFound,
            Err(e) => StoreError::Backend(e.to_string()),
        }
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: Uuid,
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
        let campus = self
            .campus
            .parse()
            .map_err(|e: ValidationError| StoreError::Backend(e.to_string()))?;
        let meeting_time = MeetingTime::parse(&self.meeting_time)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(StudyGroup {
            id: GroupId(self.id),
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

fn into_groups(rows: Vec<GroupRow>) -> Result<Vec<StudyGroup>, StoreError> {
    rows.into_iter().map(GroupRow::into_group).collect()
}

#[async_trait::async_trait]
impl Store for PostgresStore {
    // ───────────────────────────── Reads ─────────────────────────────

    async fn get_group(&self, id: &GroupId) -> Result<StudyGroup, StoreError> {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM study_groups WHERE id = $1");
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => row.into_group(),
        }
    }

    async fn list_groups(&self) -> Result<Vec<StudyGroup>, StoreError> {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM study_groups ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, GroupRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        into_groups(rows)
    }

    async fn list_groups_from(&self, date: NaiveDate) -> Result<Vec<StudyGroup>, StoreError> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups
              WHERE meeting_date >= $1
              ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        into_groups(rows)
    }

    async fn search_by_course(
        &self,
        key: &CourseKey,
        date: NaiveDate,
    ) -> Result<Vec<StudyGroup>, StoreError> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM study_groups
              WHERE course_key = $1 AND meeting_date >= $2
              ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(key.as_str())
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        into_groups(rows)
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
             VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13, $14, $14, 1)
             RETURNING {GROUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(id.0)
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
                SET group_title = $1, campus = $2, location = $3, meeting_date = $4,
                    meeting_time = $5, notes = $6, show_owner_email = $7, updated_by = $8,
                    updated_at = NOW(), version = version + 1
              WHERE id = $9 AND version = $10
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
            .bind(id.0)
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
                SET owner_email = $1, attendees = $2, updated_at = NOW(), version = version + 1
              WHERE id = $3 AND version = $4
             RETURNING {GROUP_COLUMNS}"
        );
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(&membership.owner_email)
            .bind(Json(&membership.attendees))
            .bind(id.0)
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
        let result = sqlx::query("DELETE FROM study_groups WHERE id = $1")
            .bind(id.0)
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
        let result = sqlx::query("DELETE FROM study_groups WHERE id = $1 AND version = $2")
            .bind(id.0)
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
        let result = sqlx::query("DELETE FROM study_groups WHERE meeting_date < $1")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
