//! Repository for the `audit_entries` table.
//!
//! Entries are append-only; nothing here updates or deletes rows. Inserts
//! run inside the same transaction as the mutation they record, so a failed
//! audit write aborts the mutation rather than leaving it unaudited.

use fieldlight_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::audit::{AuditEntry, AuditFilter, CreateAuditEntry};

/// Column list for `audit_entries` SELECT queries.
const COLUMNS: &str = "id, actor_id, action_type, target_type, target_id, \
                       details, integrity_hash, created_at";

/// Advisory lock key serializing appends to the integrity hash chain.
const CHAIN_LOCK_KEY: i64 = 0x41554449_54434841; // "AUDITCHA"

/// Provides insert and query operations for the audit trail.
pub struct AuditRepo;

impl AuditRepo {
    /// Take the transaction-scoped advisory lock that serializes chain
    /// appends.
    ///
    /// Must be called inside the transaction that will insert the entry,
    /// BEFORE reading the chain tail: two concurrent transactions that both
    /// read the same committed tail would otherwise fork the chain, making
    /// benign concurrency indistinguishable from tampering. The lock is
    /// released automatically at commit or rollback.
    pub async fn lock_chain(exec: impl PgExecutor<'_>) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CHAIN_LOCK_KEY)
            .execute(exec)
            .await?;
        Ok(())
    }
    /// Insert a single audit entry.
    pub async fn insert(
        exec: impl PgExecutor<'_>,
        entry: &CreateAuditEntry,
    ) -> Result<AuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_entries \
                 (actor_id, action_type, target_type, target_id, details, integrity_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(entry.actor_id)
            .bind(&entry.action_type)
            .bind(&entry.target_type)
            .bind(entry.target_id)
            .bind(&entry.details)
            .bind(&entry.integrity_hash)
            .fetch_one(exec)
            .await
    }

    /// Find the integrity hash of the most recent audit entry, for chaining.
    ///
    /// Callers appending to the chain must hold the [`Self::lock_chain`]
    /// advisory lock when reading this.
    pub async fn find_last_hash(
        exec: impl PgExecutor<'_>,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT integrity_hash FROM audit_entries ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(exec)
        .await
        .map(|opt| opt.flatten())
    }

    /// Query audit entries with filtering and pagination, newest first.
    ///
    /// Ordering is `created_at DESC, id DESC` -- global across targets, so
    /// the result doubles as a unified activity feed.
    pub async fn query(
        exec: impl PgExecutor<'_>,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(50).clamp(1, 500);
        let offset = filter.offset.unwrap_or(0).max(0);

        let (where_clause, bind_values, bind_idx) = build_audit_filter(filter);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_entries {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_audit_values(sqlx::query_as::<_, AuditEntry>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(exec).await
    }

    /// Count audit entries matching the filter (for pagination metadata).
    pub async fn count(
        exec: impl PgExecutor<'_>,
        filter: &AuditFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_audit_filter(filter);

        let query = format!("SELECT COUNT(*)::BIGINT FROM audit_entries {where_clause}");

        let q = bind_audit_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(exec).await
    }

    /// Export audit entries matching the filter, oldest first, capped.
    ///
    /// Used by the CSV projection; ascending order reads naturally in a
    /// spreadsheet.
    pub async fn export(
        exec: impl PgExecutor<'_>,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_audit_filter(filter);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_entries {where_clause} \
             ORDER BY created_at ASC, id ASC \
             LIMIT ${bind_idx}"
        );

        let q = bind_audit_values(sqlx::query_as::<_, AuditEntry>(&query), &bind_values);
        q.bind(10_000i64).fetch_all(exec).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built audit queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `AuditFilter` parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_audit_filter(filter: &AuditFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(actor_id) = filter.actor_id {
        conditions.push(format!("actor_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(actor_id));
    }

    if let Some(ref action_type) = filter.action_type {
        conditions.push(format!("action_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(action_type.clone()));
    }

    if let Some(ref target_type) = filter.target_type {
        conditions.push(format!("target_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(target_type.clone()));
    }

    if let Some(target_id) = filter.target_id {
        conditions.push(format!("target_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(target_id));
    }

    if let Some(from) = filter.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = filter.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_audit_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_audit_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
