use chrono::NaiveDate;
use pumapal_storage::*;
use pumapal_store_postgres::PostgresStore;
use pumapal_store_sqlite::SqliteStore;
use std::sync::Arc;

/// Database used when no URL is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://pumapal.db?mode=rwc";

/// StoreBackend abstracts over SQLite and PostgreSQL implementations
#[derive(Clone)]
pub enum StoreBackend {
    Sqlite(Arc<SqliteStore>),
    Postgres(Arc<PostgresStore>),
}

impl StoreBackend {
    /// Open the backend named by the URL scheme: `postgres:` or anything sqlx-sqlite accepts.
    pub async fn open(db_url: &str) -> Result<Self, StoreError> {
        if db_url.starts_with("postgres:") {
            Ok(StoreBackend::Postgres(Arc::new(
                PostgresStore::open(db_url).await?,
            )))
        } else {
            Ok(StoreBackend::Sqlite(Arc::new(SqliteStore::open(db_url).await?)))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite(_) => "sqlite",
            StoreBackend::Postgres(_) => "postgres",
        }
    }
}

#[async_trait::async_trait]
impl Store for StoreBackend {
    async fn get_group(&self, id: &GroupId) -> Result<StudyGroup, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_group(id).await,
            StoreBackend::Postgres(s) => s.get_group(id).await,
        }
    }

    async fn list_groups(&self) -> Result<Vec<StudyGroup>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_groups().await,
            StoreBackend::Postgres(s) => s.list_groups().await,
        }
    }

    async fn list_groups_from(&self, date: NaiveDate) -> Result<Vec<StudyGroup>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_groups_from(date).await,
            StoreBackend::Postgres(s) => s.list_groups_from(date).await,
        }
    }

    async fn search_by_course(
        &self,
        key: &CourseKey,
        date: NaiveDate,
    ) -> Result<Vec<StudyGroup>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.search_by_course(key, date).await,
            StoreBackend::Postgres(s) => s.search_by_course(key, date).await,
        }
    }

    async fn create_group(&self, params: &CreateGroupParams) -> Result<StudyGroup, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_group(params).await,
            StoreBackend::Postgres(s) => s.create_group(params).await,
        }
    }

    async fn update_details(
        &self,
        id: &GroupId,
        expected_version: i64,
        details: &GroupDetails,
        updated_by: &str,
    ) -> Result<StudyGroup, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => {
                s.update_details(id, expected_version, details, updated_by)
                    .await
            }
            StoreBackend::Postgres(s) => {
                s.update_details(id, expected_version, details, updated_by)
                    .await
            }
        }
    }

    async fn replace_membership(
        &self,
        id: &GroupId,
        expected_version: i64,
        membership: &Membership,
    ) -> Result<StudyGroup, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.replace_membership(id, expected_version, membership).await,
            StoreBackend::Postgres(s) => {
                s.replace_membership(id, expected_version, membership)
                    .await
            }
        }
    }

    async fn delete_group(&self, id: &GroupId) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_group(id).await,
            StoreBackend::Postgres(s) => s.delete_group(id).await,
        }
    }

    async fn delete_group_at_version(
        &self,
        id: &GroupId,
        expected_version: i64,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_group_at_version(id, expected_version).await,
            StoreBackend::Postgres(s) => s.delete_group_at_version(id, expected_version).await,
        }
    }

    async fn delete_groups_before(&self, date: NaiveDate) -> Result<u64, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.delete_groups_before(date).await,
            StoreBackend::Postgres(s) => s.delete_groups_before(date).await,
        }
    }
}
