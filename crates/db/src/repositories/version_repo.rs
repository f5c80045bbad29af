//! Repository for the `resource_versions` table.
//!
//! Versions are append-only. Callers that append must hold the resource's
//! row lock (see `ResourceRepo::lock_row`) so `MAX(version) + 1` is computed
//! without interleaving.

use fieldlight_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::version::ResourceVersion;

/// Column list for `resource_versions` queries.
const COLUMNS: &str = "id, resource_id, version, content, author_id, created_at";

/// Provides append and read operations for version history.
pub struct VersionRepo;

impl VersionRepo {
    /// Insert a new version, auto-incrementing the per-resource version
    /// number. Returns the created row.
    pub async fn append(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
        content: &str,
        author_id: DbId,
    ) -> Result<ResourceVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO resource_versions (resource_id, version, content, author_id) \
             VALUES ($1, \
                     COALESCE((SELECT MAX(version) FROM resource_versions \
                               WHERE resource_id = $1), 0) + 1, \
                     $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResourceVersion>(&query)
            .bind(resource_id)
            .bind(content)
            .bind(author_id)
            .fetch_one(exec)
            .await
    }

    /// Find a version by its primary key.
    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<ResourceVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resource_versions WHERE id = $1");
        sqlx::query_as::<_, ResourceVersion>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List versions for a resource with pagination, newest first.
    ///
    /// Ordered by `version DESC` -- the version number, not `created_at`,
    /// is the authoritative ordering.
    pub async fn history(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ResourceVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resource_versions \
             WHERE resource_id = $1 \
             ORDER BY version DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ResourceVersion>(&query)
            .bind(resource_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(exec)
            .await
    }

    /// Count the total number of versions for a resource.
    pub async fn count_for_resource(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM resource_versions WHERE resource_id = $1")
                .bind(resource_id)
                .fetch_one(exec)
                .await?;
        Ok(row.0)
    }

    /// Get the version the resource's live pointer currently references,
    /// or `None` before the first save.
    pub async fn current(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
    ) -> Result<Option<ResourceVersion>, sqlx::Error> {
        let query = format!(
            "SELECT v.id, v.resource_id, v.version, v.content, v.author_id, v.created_at \
             FROM resource_versions v \
             JOIN resources r ON r.current_version_id = v.id \
             WHERE r.id = $1"
        );
        sqlx::query_as::<_, ResourceVersion>(&query)
            .bind(resource_id)
            .fetch_optional(exec)
            .await
    }
}
