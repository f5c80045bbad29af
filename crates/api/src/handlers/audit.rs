//! Handlers for the audit trail: filtered queries and CSV export.
//!
//! All endpoints require admin role. Entries are read-only; writes happen
//! inside the mutation facade's transactions.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use fieldlight_db::models::audit::{AuditFilter, AuditPage};
use fieldlight_db::repositories::AuditRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /audit?actor_id=&action_type=&target_type=&target_id=&from=&to=&limit=&offset=
///
/// Query audit entries with filters and pagination, newest first. The
/// unfiltered query doubles as the unified activity feed. Admin only.
pub async fn query_audit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<AuditFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref action_type) = filter.action_type {
        if !fieldlight_core::audit::is_valid_action_type(action_type) {
            return Err(AppError::BadRequest(format!(
                "Unknown action_type '{action_type}'"
            )));
        }
    }

    let items = AuditRepo::query(&state.pool, &filter).await?;
    let total = AuditRepo::count(&state.pool, &filter).await?;

    Ok(Json(DataResponse {
        data: AuditPage { items, total },
    }))
}

/// GET /audit/export.csv?from=&to=&...
///
/// Export matching audit entries as CSV, oldest first, capped at 10k rows.
/// Admin only.
pub async fn export_audit_csv(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<AuditFilter>,
) -> AppResult<impl IntoResponse> {
    let entries = AuditRepo::export(&state.pool, &filter).await?;

    let mut csv = String::from(
        "id,created_at,actor_id,action_type,target_type,target_id,details,integrity_hash\n",
    );
    for entry in &entries {
        let details = entry
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            entry.id,
            entry.created_at.to_rfc3339(),
            entry.actor_id,
            csv_escape(&entry.action_type),
            csv_escape(&entry.target_type),
            entry.target_id,
            csv_escape(&details),
            entry.integrity_hash.as_deref().unwrap_or(""),
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"audit_export.csv\"",
            ),
        ],
        csv,
    ))
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_escape("lock_acquired"), "lock_acquired");
    }

    #[test]
    fn json_details_get_quoted() {
        let escaped = csv_escape(r#"{"slug":"pre_description","version":2}"#);
        assert_eq!(
            escaped,
            r#""{""slug"":""pre_description"",""version"":2}""#
        );
    }
}
