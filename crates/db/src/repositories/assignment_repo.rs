//! Repository for the `assignments` table.

use fieldlight_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::assignment::{Assignment, AssignmentFilter, CreateAssignment};

/// Column list for `assignments` queries.
const COLUMNS: &str = "id, scope_type, scope_value, document_id, assigned_by, \
                       is_active, assigned_at, created_at, updated_at";

/// Provides create / deactivate / query operations for scope assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert a new active assignment. Earlier assignments for the same
    /// scope stay in history; resolution picks the newest active one.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateAssignment,
        assigned_by: DbId,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO assignments (scope_type, scope_value, document_id, assigned_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(&input.scope_type)
            .bind(&input.scope_value)
            .bind(input.document_id)
            .bind(assigned_by)
            .fetch_one(exec)
            .await
    }

    /// Find an assignment by its primary key.
    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Retract an assignment. Returns the deactivated row, or `None` if no
    /// active assignment with this id exists.
    pub async fn deactivate(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "UPDATE assignments SET is_active = FALSE \
             WHERE id = $1 AND is_active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// All active assignments for a scope.
    ///
    /// The winner among these is picked by the resolution engine
    /// (`fieldlight_core::resolution::latest_active`), which owns the
    /// ordering rule.
    pub async fn list_active_for_scope(
        exec: impl PgExecutor<'_>,
        scope_type: &str,
        scope_value: &str,
    ) -> Result<Vec<Assignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignments \
             WHERE scope_type = $1 AND scope_value = $2 AND is_active = TRUE"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(scope_type)
            .bind(scope_value)
            .fetch_all(exec)
            .await
    }

    /// List assignments matching the filter, newest first.
    pub async fn list(
        exec: impl PgExecutor<'_>,
        filter: &AssignmentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Assignment>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx = 1u32;

        if filter.scope_type.is_some() {
            conditions.push(format!("scope_type = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.scope_value.is_some() {
            conditions.push(format!("scope_value = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.document_id.is_some() {
            conditions.push(format!("document_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if !filter.include_inactive {
            conditions.push("is_active = TRUE".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM assignments {where_clause} \
             ORDER BY assigned_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, Assignment>(&query);
        if let Some(ref scope_type) = filter.scope_type {
            q = q.bind(scope_type.as_str());
        }
        if let Some(ref scope_value) = filter.scope_value {
            q = q.bind(scope_value.as_str());
        }
        if let Some(document_id) = filter.document_id {
            q = q.bind(document_id);
        }
        q.bind(limit).bind(offset).fetch_all(exec).await
    }
}
