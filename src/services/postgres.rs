use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{IssueStatus, UserIssueRecord};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL client for user-issue interaction state
///
/// Stores which issues a user has saved, started or completed, as small
/// snapshots taken at save time. Computed scores are never written here;
/// feed reads always recompute them.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Create or update a user's interaction record for an issue
    ///
    /// Uses INSERT ... ON CONFLICT so re-saving or changing status updates
    /// the existing row in place.
    pub async fn upsert_user_issue(&self, record: &UserIssueRecord) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO user_issues
                (user_id, issue_id, repo_full_name, title, html_url, is_bounty, status, saved_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            ON CONFLICT (user_id, issue_id)
            DO UPDATE SET
                status = EXCLUDED.status,
                title = EXCLUDED.title,
                is_bounty = EXCLUDED.is_bounty,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(&record.user_id)
            .bind(record.issue_id)
            .bind(&record.repo_full_name)
            .bind(&record.title)
            .bind(&record.html_url)
            .bind(record.is_bounty)
            .bind(record.status)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded issue {} as {:?} for user {}",
            record.issue_id,
            record.status,
            record.user_id
        );

        Ok(())
    }

    /// Fetch a user's interaction record for one issue, if any
    pub async fn get_user_issue(
        &self,
        user_id: &str,
        issue_id: i64,
    ) -> Result<Option<UserIssueRecord>, PostgresError> {
        let query = r#"
            SELECT user_id, issue_id, repo_full_name, title, html_url, is_bounty, status, saved_at, updated_at
            FROM user_issues
            WHERE user_id = $1 AND issue_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Self::row_to_record(&row)))
    }

    /// List a user's stored issues, optionally filtered by status, newest
    /// first
    pub async fn list_user_issues(
        &self,
        user_id: &str,
        status: Option<IssueStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<UserIssueRecord>, PostgresError> {
        let query = r#"
            SELECT user_id, issue_id, repo_full_name, title, html_url, is_bounty, status, saved_at, updated_at
            FROM user_issues
            WHERE user_id = $1 AND ($2::user_issue_status IS NULL OR status = $2)
            ORDER BY updated_at DESC
            LIMIT $3 OFFSET $4
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(status)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::row_to_record).collect())
    }

    /// Count a user's stored issues, optionally filtered by status
    pub async fn count_user_issues(
        &self,
        user_id: &str,
        status: Option<IssueStatus>,
    ) -> Result<u64, PostgresError> {
        let query = r#"
            SELECT COUNT(*) AS total
            FROM user_issues
            WHERE user_id = $1 AND ($2::user_issue_status IS NULL OR status = $2)
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        let total: i64 = row.get("total");
        Ok(total.max(0) as u64)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> UserIssueRecord {
        UserIssueRecord {
            user_id: row.get("user_id"),
            issue_id: row.get("issue_id"),
            repo_full_name: row.get("repo_full_name"),
            title: row.get("title"),
            html_url: row.get("html_url"),
            is_bounty: row.get("is_bounty"),
            status: row.get("status"),
            saved_at: row.get("saved_at"),
            updated_at: row.get("updated_at"),
        }
    }
}
