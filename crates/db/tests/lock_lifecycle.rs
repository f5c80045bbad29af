//! Integration tests for the edit-lock repository.
//!
//! Exercises the atomic acquire upsert against a real database: mutual
//! exclusion, idempotent re-acquire, lease expiry takeover, and release
//! semantics.

use fieldlight_db::repositories::{LockRepo, ResourceRepo};
use sqlx::PgPool;

const LEASE: i64 = 900;

async fn make_resource(pool: &PgPool, slug: &str) -> i64 {
    ResourceRepo::create(pool, slug, "Test resource", "prompt")
        .await
        .expect("resource fixture")
        .id
}

#[sqlx::test(migrations = "./migrations")]
async fn acquire_on_unlocked_resource_succeeds(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    let lock = LockRepo::acquire(&pool, id, 1, Some("Alice"), LEASE)
        .await
        .unwrap()
        .expect("lock should be granted");

    assert_eq!(lock.holder_id, 1);
    assert_eq!(lock.holder_display_name.as_deref(), Some("Alice"));
    assert!(lock.lease_expires_at > lock.acquired_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn second_holder_is_refused(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    LockRepo::acquire(&pool, id, 1, Some("Alice"), LEASE)
        .await
        .unwrap()
        .expect("first acquire");

    let refused = LockRepo::acquire(&pool, id, 2, Some("Bob"), LEASE)
        .await
        .unwrap();
    assert!(refused.is_none());

    // Alice still holds it.
    let held = LockRepo::peek(&pool, id).await.unwrap().unwrap();
    assert_eq!(held.holder_id, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn simultaneous_acquires_grant_exactly_one(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    // Race two acquires on the same unlocked resource. The upsert's conflict
    // arm decides the loser; holder identity must not depend on ordering
    // beyond exactly one of them winning.
    let (alice, bob) = tokio::join!(
        LockRepo::acquire(&pool, id, 1, Some("Alice"), LEASE),
        LockRepo::acquire(&pool, id, 2, Some("Bob"), LEASE),
    );
    let alice = alice.unwrap();
    let bob = bob.unwrap();

    assert!(alice.is_some() ^ bob.is_some());

    let held = LockRepo::peek(&pool, id).await.unwrap().unwrap();
    let winner = alice.or(bob).unwrap();
    assert_eq!(held.holder_id, winner.holder_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn reacquire_by_holder_keeps_acquired_at(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    let first = LockRepo::acquire(&pool, id, 1, Some("Alice"), LEASE)
        .await
        .unwrap()
        .unwrap();
    let second = LockRepo::acquire(&pool, id, 1, Some("Alice"), LEASE)
        .await
        .unwrap()
        .expect("re-acquire by holder must succeed");

    assert_eq!(second.acquired_at, first.acquired_at);
    assert!(second.lease_expires_at >= first.lease_expires_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_lease_can_be_taken_over(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    // A lease that expired in the past.
    LockRepo::acquire(&pool, id, 1, Some("Alice"), -5)
        .await
        .unwrap()
        .expect("initial acquire");

    // Expired leases read as unlocked.
    assert!(LockRepo::peek(&pool, id).await.unwrap().is_none());

    let taken = LockRepo::acquire(&pool, id, 2, Some("Bob"), LEASE)
        .await
        .unwrap()
        .expect("takeover of expired lease");
    assert_eq!(taken.holder_id, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn locks_on_different_resources_are_independent(pool: PgPool) {
    let a = make_resource(&pool, "pre_description").await;
    let b = make_resource(&pool, "hvac_notes").await;

    LockRepo::acquire(&pool, a, 1, Some("Alice"), LEASE)
        .await
        .unwrap()
        .unwrap();
    let other = LockRepo::acquire(&pool, b, 2, Some("Bob"), LEASE)
        .await
        .unwrap();
    assert!(other.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn release_is_holder_scoped(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    LockRepo::acquire(&pool, id, 1, Some("Alice"), LEASE)
        .await
        .unwrap()
        .unwrap();

    // Bob cannot release Alice's lock.
    assert!(!LockRepo::release(&pool, id, 2).await.unwrap());
    assert!(LockRepo::peek(&pool, id).await.unwrap().is_some());

    // Alice can.
    assert!(LockRepo::release(&pool, id, 1).await.unwrap());
    assert!(LockRepo::peek(&pool, id).await.unwrap().is_none());

    // Releasing again reports nothing released.
    assert!(!LockRepo::release(&pool, id, 1).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn renew_requires_an_active_lease(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    // No lock at all.
    assert!(LockRepo::renew(&pool, id, 1, LEASE).await.unwrap().is_none());

    let lock = LockRepo::acquire(&pool, id, 1, Some("Alice"), LEASE)
        .await
        .unwrap()
        .unwrap();
    let renewed = LockRepo::renew(&pool, id, 1, LEASE)
        .await
        .unwrap()
        .expect("holder renewal");
    assert!(renewed.lease_expires_at >= lock.lease_expires_at);

    // Non-holders cannot renew.
    assert!(LockRepo::renew(&pool, id, 2, LEASE).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_lease_cannot_be_renewed(pool: PgPool) {
    let id = make_resource(&pool, "pre_description").await;

    LockRepo::acquire(&pool, id, 1, Some("Alice"), -5)
        .await
        .unwrap()
        .unwrap();

    // The lease already lapsed; the holder must re-acquire instead.
    assert!(LockRepo::renew(&pool, id, 1, LEASE).await.unwrap().is_none());
}
