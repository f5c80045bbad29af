//! Repository for the `resource_locks` table.
//!
//! The `resource_locks` row is the single serialization point for edits to a
//! resource; unrelated resources stay independently editable.

use fieldlight_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::lock::ResourceLock;

/// Column list for `resource_locks` queries.
const COLUMNS: &str = "resource_id, holder_id, holder_display_name, \
                       acquired_at, lease_expires_at, created_at, updated_at";

/// Provides atomic acquire / release / renew / peek operations for edit locks.
pub struct LockRepo;

impl LockRepo {
    /// Attempt to acquire the edit lock on a resource.
    ///
    /// A single conditional upsert so that under concurrent acquisition
    /// exactly one caller wins:
    /// - no lock row exists: insert wins;
    /// - existing lock held by the same holder: idempotent re-acquire, the
    ///   lease is refreshed and the original `acquired_at` is kept;
    /// - existing lease expired: takeover by the new holder;
    /// - otherwise the statement matches no row and `None` is returned
    ///   (lock conflict).
    pub async fn acquire(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
        holder_id: DbId,
        holder_display_name: Option<&str>,
        lease_secs: i64,
    ) -> Result<Option<ResourceLock>, sqlx::Error> {
        let query = format!(
            "INSERT INTO resource_locks \
                 (resource_id, holder_id, holder_display_name, lease_expires_at) \
             VALUES ($1, $2, $3, NOW() + make_interval(secs => $4)) \
             ON CONFLICT (resource_id) DO UPDATE SET \
                 holder_id = EXCLUDED.holder_id, \
                 holder_display_name = EXCLUDED.holder_display_name, \
                 acquired_at = CASE \
                     WHEN resource_locks.holder_id = EXCLUDED.holder_id \
                          AND resource_locks.lease_expires_at >= NOW() \
                     THEN resource_locks.acquired_at \
                     ELSE NOW() \
                 END, \
                 lease_expires_at = EXCLUDED.lease_expires_at \
             WHERE resource_locks.holder_id = EXCLUDED.holder_id \
                OR resource_locks.lease_expires_at < NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResourceLock>(&query)
            .bind(resource_id)
            .bind(holder_id)
            .bind(holder_display_name)
            .bind(lease_secs as f64)
            .fetch_optional(exec)
            .await
    }

    /// Release the lock. Only the holder's row is deleted.
    ///
    /// Returns `true` if a lock was released, `false` if the caller holds no
    /// lock on this resource (either unlocked or held by someone else; the
    /// caller disambiguates via [`LockRepo::peek`]).
    pub async fn release(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
        holder_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM resource_locks WHERE resource_id = $1 AND holder_id = $2",
        )
        .bind(resource_id)
        .bind(holder_id)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Extend the lease of a held, unexpired lock. Only the holder can renew.
    ///
    /// Returns the updated lock, or `None` if the caller does not hold an
    /// active lease.
    pub async fn renew(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
        holder_id: DbId,
        lease_secs: i64,
    ) -> Result<Option<ResourceLock>, sqlx::Error> {
        let query = format!(
            "UPDATE resource_locks \
             SET lease_expires_at = NOW() + make_interval(secs => $3) \
             WHERE resource_id = $1 AND holder_id = $2 AND lease_expires_at >= NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResourceLock>(&query)
            .bind(resource_id)
            .bind(holder_id)
            .bind(lease_secs as f64)
            .fetch_optional(exec)
            .await
    }

    /// Read the active lock for a resource, or `None` if unlocked.
    ///
    /// An expired lease reads as unlocked; the stale row is left in place
    /// for the next acquire to overwrite.
    pub async fn peek(
        exec: impl PgExecutor<'_>,
        resource_id: DbId,
    ) -> Result<Option<ResourceLock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resource_locks \
             WHERE resource_id = $1 AND lease_expires_at >= NOW()"
        );
        sqlx::query_as::<_, ResourceLock>(&query)
            .bind(resource_id)
            .fetch_optional(exec)
            .await
    }
}
