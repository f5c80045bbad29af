//! Repository for the `resources` table.

use fieldlight_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::resource::Resource;

/// Column list for `resources` queries.
const COLUMNS: &str = "id, slug, label, kind, current_version_id, created_at, updated_at";

/// Provides CRUD operations for admin-editable resources.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a new resource. The `current_version_id` starts as NULL and is
    /// set by the first content save.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        slug: &str,
        label: &str,
        kind: &str,
    ) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (slug, label, kind) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(slug)
            .bind(label)
            .bind(kind)
            .fetch_one(exec)
            .await
    }

    /// Find a resource by its primary key.
    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find a resource by its stable slug.
    pub async fn find_by_slug(
        exec: impl PgExecutor<'_>,
        slug: &str,
    ) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE slug = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(slug)
            .fetch_optional(exec)
            .await
    }

    /// List resources, optionally filtered by kind, ordered by slug.
    pub async fn list(
        exec: impl PgExecutor<'_>,
        kind: Option<&str>,
    ) -> Result<Vec<Resource>, sqlx::Error> {
        match kind {
            Some(kind) => {
                let query =
                    format!("SELECT {COLUMNS} FROM resources WHERE kind = $1 ORDER BY slug");
                sqlx::query_as::<_, Resource>(&query)
                    .bind(kind)
                    .fetch_all(exec)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM resources ORDER BY slug");
                sqlx::query_as::<_, Resource>(&query).fetch_all(exec).await
            }
        }
    }

    /// Take a row-level lock on the resource for the current transaction.
    ///
    /// Serializes version appends per resource so concurrent saves cannot
    /// interleave version numbering. Returns `false` if the resource does
    /// not exist.
    pub async fn lock_row(exec: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM resources WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(exec)
                .await?;
        Ok(row.is_some())
    }

    /// Advance the live pointer to the given version.
    pub async fn set_current_version(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
        version_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE resources SET current_version_id = $2 WHERE id = $1")
            .bind(resource_id)
            .bind(version_id)
            .execute(exec)
            .await?;
        Ok(())
    }
}
