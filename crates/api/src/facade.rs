//! Admin mutation facade.
//!
//! Every state-changing operation goes through this module, which owns the
//! transaction boundaries: the mutation and its audit entry commit together
//! or not at all. Handlers stay thin (extract, call, serialize) and never
//! talk to repositories directly for writes.

use fieldlight_core::audit::{canonical_entry_data, compute_integrity_hash, AuditAction};
use fieldlight_core::error::CoreError;
use fieldlight_core::resolution::{
    latest_active, scope_types, validate_scope, AssignmentCandidate, ResolvedDocument,
    SopResolution,
};
use fieldlight_core::types::DbId;
use fieldlight_core::{content, locking};
use fieldlight_db::models::assignment::{Assignment, CreateAssignment};
use fieldlight_db::models::audit::{AuditEntry, CreateAuditEntry};
use fieldlight_db::models::lock::ResourceLock;
use fieldlight_db::models::resource::{CreateResource, Resource};
use fieldlight_db::models::version::ResourceVersion;
use fieldlight_db::repositories::{AssignmentRepo, AuditRepo, LockRepo, ResourceRepo, VersionRepo};
use fieldlight_db::DbPool;
use sqlx::{Postgres, Transaction};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

// ---------------------------------------------------------------------------
// Audit helper
// ---------------------------------------------------------------------------

/// Append an audit entry for `action` inside the caller's transaction,
/// chained to the previous entry's integrity hash.
///
/// Takes the chain advisory lock before reading the tail, so concurrent
/// transactions append one after another instead of forking the chain.
async fn record_audit(
    tx: &mut Transaction<'_, Postgres>,
    actor_id: DbId,
    action: &AuditAction,
) -> Result<AuditEntry, sqlx::Error> {
    AuditRepo::lock_chain(&mut **tx).await?;
    let prev_hash = AuditRepo::find_last_hash(&mut **tx).await?;
    let entry_data = canonical_entry_data(actor_id, action);
    let integrity_hash = compute_integrity_hash(prev_hash.as_deref(), &entry_data);

    AuditRepo::insert(
        &mut **tx,
        &CreateAuditEntry {
            actor_id,
            action_type: action.action_type().to_string(),
            target_type: action.target_type().to_string(),
            target_id: action.target_id(),
            details: Some(action.details()),
            integrity_hash: Some(integrity_hash),
        },
    )
    .await
}

/// Load a resource inside a transaction or fail with 404.
async fn require_resource(
    tx: &mut Transaction<'_, Postgres>,
    resource_id: DbId,
) -> Result<Resource, AppError> {
    ResourceRepo::find_by_id(&mut **tx, resource_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id: resource_id,
        }))
}

// ---------------------------------------------------------------------------
// Resource creation
// ---------------------------------------------------------------------------

/// Create a resource, optionally seeding version 1 with initial content.
///
/// Creation is always audited as `resource_created`; a seeded version adds
/// a `content_saved` entry on top.
pub async fn create_resource(
    pool: &DbPool,
    actor: &AuthUser,
    req: &CreateResource,
) -> AppResult<Resource> {
    locking::validate_slug(&req.slug).map_err(CoreError::Validation)?;
    locking::validate_label(&req.label).map_err(CoreError::Validation)?;
    if !locking::is_valid_resource_kind(&req.kind) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid resource kind '{}'. Must be one of: {}",
            req.kind,
            locking::VALID_RESOURCE_KINDS.join(", ")
        ))));
    }
    if let Some(ref initial) = req.content {
        content::validate_content(initial)?;
    }

    let mut tx = pool.begin().await?;

    let mut resource = ResourceRepo::create(&mut *tx, &req.slug, &req.label, &req.kind).await?;

    record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::ResourceCreated {
            resource_id: resource.id,
            slug: resource.slug.clone(),
            kind: resource.kind.clone(),
        },
    )
    .await?;

    if let Some(ref initial) = req.content {
        let version =
            VersionRepo::append(&mut *tx, resource.id, initial, actor.actor_id).await?;
        ResourceRepo::set_current_version(&mut *tx, resource.id, version.id).await?;
        resource.current_version_id = Some(version.id);

        record_audit(
            &mut tx,
            actor.actor_id,
            &AuditAction::ContentSaved {
                resource_id: resource.id,
                slug: resource.slug.clone(),
                version_id: version.id,
                version: version.version,
            },
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        resource_id = resource.id,
        slug = %resource.slug,
        kind = %resource.kind,
        "resource created"
    );
    Ok(resource)
}

// ---------------------------------------------------------------------------
// Edit session lifecycle
// ---------------------------------------------------------------------------

/// Acquire the edit lock on a resource for the calling admin.
///
/// Re-acquiring a lock you already hold refreshes the lease and succeeds.
/// If another admin holds an active lease, fails with a conflict naming
/// the holder.
pub async fn begin_edit(
    pool: &DbPool,
    actor: &AuthUser,
    resource_id: DbId,
    lease_secs: i64,
) -> AppResult<ResourceLock> {
    let mut tx = pool.begin().await?;

    let resource = require_resource(&mut tx, resource_id).await?;

    let acquired = LockRepo::acquire(
        &mut *tx,
        resource_id,
        actor.actor_id,
        Some(&actor.display_name),
        lease_secs,
    )
    .await?;

    let Some(lock) = acquired else {
        // Lost the race. Surface who holds the lock so the UI can say so.
        let holder = LockRepo::peek(&mut *tx, resource_id).await?;
        return Err(AppError::Core(CoreError::LockConflict {
            holder_display_name: holder.and_then(|l| l.holder_display_name),
        }));
    };

    record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::LockAcquired {
            resource_id,
            slug: resource.slug,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(lock)
}

/// Release the edit lock without saving.
///
/// Releasing a lock you do not hold is a conflict; releasing an already
/// unlocked resource is a no-op (the lease may simply have expired).
pub async fn end_edit(pool: &DbPool, actor: &AuthUser, resource_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let resource = require_resource(&mut tx, resource_id).await?;

    let released = LockRepo::release(&mut *tx, resource_id, actor.actor_id).await?;
    if !released {
        if LockRepo::peek(&mut *tx, resource_id).await?.is_some() {
            return Err(AppError::Core(CoreError::NotHolder));
        }
        // Already unlocked. Nothing to audit.
        return Ok(());
    }

    record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::LockReleased {
            resource_id,
            slug: resource.slug,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Extend the lease on a lock the caller already holds.
///
/// Renewal is not an administrative action, just lease housekeeping, so it
/// produces no audit entry.
pub async fn renew_lease(
    pool: &DbPool,
    actor: &AuthUser,
    resource_id: DbId,
    lease_secs: i64,
) -> AppResult<ResourceLock> {
    let mut tx = pool.begin().await?;

    require_resource(&mut tx, resource_id).await?;

    let renewed = LockRepo::renew(&mut *tx, resource_id, actor.actor_id, lease_secs)
        .await?
        .ok_or(AppError::Core(CoreError::NotHolder))?;

    tx.commit().await?;
    Ok(renewed)
}

// ---------------------------------------------------------------------------
// Content mutation
// ---------------------------------------------------------------------------

/// Save new content as the next version and advance the live pointer.
///
/// Requires the caller to hold the edit lock. The version append, pointer
/// advance, lock release, and audit entry commit atomically; a save also
/// ends the edit session.
pub async fn save(
    pool: &DbPool,
    actor: &AuthUser,
    resource_id: DbId,
    new_content: &str,
) -> AppResult<ResourceVersion> {
    content::validate_content(new_content)?;

    let mut tx = pool.begin().await?;

    let resource = require_resource(&mut tx, resource_id).await?;
    require_holder(&mut tx, resource_id, actor.actor_id).await?;

    // Row lock serializes the MAX(version) + 1 computation per resource.
    ResourceRepo::lock_row(&mut *tx, resource_id).await?;
    let version = VersionRepo::append(&mut *tx, resource_id, new_content, actor.actor_id).await?;
    ResourceRepo::set_current_version(&mut *tx, resource_id, version.id).await?;

    let released = LockRepo::release(&mut *tx, resource_id, actor.actor_id).await?;
    if !released {
        // The holder check above passed, so this should be unreachable.
        tracing::error!(
            resource_id,
            actor_id = actor.actor_id,
            "lock vanished between holder check and release"
        );
    }

    record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::ContentSaved {
            resource_id,
            slug: resource.slug.clone(),
            version_id: version.id,
            version: version.version,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        resource_id,
        slug = %resource.slug,
        version = version.version,
        "content saved"
    );
    Ok(version)
}

/// Restore a prior version by appending its content as a new version.
///
/// History is never rewritten: restoring v1 over a current v2 produces a v3
/// whose content equals v1's. Requires the edit lock; the lock stays held
/// afterwards so the admin can keep editing.
pub async fn restore_version(
    pool: &DbPool,
    actor: &AuthUser,
    resource_id: DbId,
    version_id: DbId,
) -> AppResult<ResourceVersion> {
    let mut tx = pool.begin().await?;

    let resource = require_resource(&mut tx, resource_id).await?;
    require_holder(&mut tx, resource_id, actor.actor_id).await?;

    let source = VersionRepo::find_by_id(&mut *tx, version_id)
        .await?
        .filter(|v| v.resource_id == resource_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Version",
            id: version_id,
        }))?;

    ResourceRepo::lock_row(&mut *tx, resource_id).await?;
    let version =
        VersionRepo::append(&mut *tx, resource_id, &source.content, actor.actor_id).await?;
    ResourceRepo::set_current_version(&mut *tx, resource_id, version.id).await?;

    record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::VersionRestored {
            resource_id,
            slug: resource.slug.clone(),
            restored_from_version_id: source.id,
            new_version_id: version.id,
            new_version: version.version,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        resource_id,
        slug = %resource.slug,
        restored_from = source.version,
        new_version = version.version,
        "version restored"
    );
    Ok(version)
}

/// Fail with a conflict unless the actor holds an active lease on the
/// resource.
async fn require_holder(
    tx: &mut Transaction<'_, Postgres>,
    resource_id: DbId,
    actor_id: DbId,
) -> Result<(), AppError> {
    match LockRepo::peek(&mut **tx, resource_id).await? {
        Some(lock) if lock.holder_id == actor_id => Ok(()),
        Some(lock) => Err(AppError::Core(CoreError::LockConflict {
            holder_display_name: lock.holder_display_name,
        })),
        None => Err(AppError::Core(CoreError::NotHolder)),
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// Assign an SOP document to a scope.
///
/// The new assignment immediately becomes the active one for its scope
/// (newest `assigned_at` wins); prior assignments stay in history.
pub async fn create_assignment(
    pool: &DbPool,
    actor: &AuthUser,
    req: &CreateAssignment,
) -> AppResult<Assignment> {
    validate_scope(&req.scope_type, &req.scope_value).map_err(CoreError::Validation)?;

    let mut tx = pool.begin().await?;

    let document = require_resource(&mut tx, req.document_id).await?;
    if document.kind != locking::resource_kinds::SOP_DOCUMENT {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Resource '{}' is not an SOP document",
            document.slug
        ))));
    }

    let assignment = AssignmentRepo::create(&mut *tx, req, actor.actor_id).await?;

    record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::AssignmentCreated {
            assignment_id: assignment.id,
            scope_type: assignment.scope_type.clone(),
            scope_value: assignment.scope_value.clone(),
            document_id: assignment.document_id,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        assignment_id = assignment.id,
        scope_type = %assignment.scope_type,
        scope_value = %assignment.scope_value,
        document_id = assignment.document_id,
        "assignment created"
    );
    Ok(assignment)
}

/// Retract an assignment. The row is deactivated, not deleted, so history
/// and audit references stay intact.
pub async fn remove_assignment(
    pool: &DbPool,
    actor: &AuthUser,
    assignment_id: DbId,
) -> AppResult<Assignment> {
    let mut tx = pool.begin().await?;

    let assignment = AssignmentRepo::deactivate(&mut *tx, assignment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id: assignment_id,
        }))?;

    record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::AssignmentRemoved {
            assignment_id: assignment.id,
            scope_type: assignment.scope_type.clone(),
            scope_value: assignment.scope_value.clone(),
            document_id: assignment.document_id,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(assignment)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve the active SOP document for the given scopes.
///
/// Read-only; never touches locks. Each requested scope resolves
/// independently and both results are returned without merging. No active
/// assignment anywhere is the valid default outcome, not an error.
pub async fn resolve_sop(
    pool: &DbPool,
    state_code: Option<&str>,
    organization: Option<&str>,
) -> AppResult<SopResolution> {
    let state = match state_code {
        Some(value) => resolve_scope(pool, scope_types::STATE, value).await?,
        None => None,
    };
    let org = match organization {
        Some(value) => resolve_scope(pool, scope_types::ORGANIZATION, value).await?,
        None => None,
    };
    Ok(SopResolution::new(state, org))
}

async fn resolve_scope(
    pool: &DbPool,
    scope_type: &str,
    scope_value: &str,
) -> AppResult<Option<ResolvedDocument>> {
    validate_scope(scope_type, scope_value).map_err(CoreError::Validation)?;

    let active = AssignmentRepo::list_active_for_scope(pool, scope_type, scope_value).await?;
    let candidates: Vec<AssignmentCandidate> = active
        .iter()
        .map(|a| AssignmentCandidate {
            assignment_id: a.id,
            document_id: a.document_id,
            assigned_at: a.assigned_at,
        })
        .collect();

    Ok(latest_active(&candidates).map(|winner| ResolvedDocument {
        scope_type: scope_type.to_string(),
        scope_value: scope_value.to_string(),
        assignment_id: winner.assignment_id,
        document_id: winner.document_id,
    }))
}

// ---------------------------------------------------------------------------
// Account actions
// ---------------------------------------------------------------------------

/// Record an account suspension in the audit trail.
///
/// Account state itself lives in the upstream identity service; this
/// service records the administrative act so it appears in the unified
/// activity feed with the rest.
pub async fn suspend_account(
    pool: &DbPool,
    actor: &AuthUser,
    account_id: DbId,
    reason: &str,
) -> AppResult<AuditEntry> {
    if reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A suspension reason is required".to_string(),
        )));
    }

    let mut tx = pool.begin().await?;
    let entry = record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::AccountSuspended {
            account_id,
            reason: reason.to_string(),
        },
    )
    .await?;
    tx.commit().await?;
    Ok(entry)
}

/// Record a credit gift in the audit trail.
pub async fn gift_credits(
    pool: &DbPool,
    actor: &AuthUser,
    account_id: DbId,
    amount: i64,
) -> AppResult<AuditEntry> {
    if amount <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Gift amount must be positive".to_string(),
        )));
    }

    let mut tx = pool.begin().await?;
    let entry = record_audit(
        &mut tx,
        actor.actor_id,
        &AuditAction::CreditsGifted { account_id, amount },
    )
    .await?;
    tx.commit().await?;
    Ok(entry)
}
