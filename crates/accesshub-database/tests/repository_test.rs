//! Repository tests against a real PostgreSQL schema.
//!
//! `#[sqlx::test]` provisions an isolated database per test and applies
//! the workspace migrations before handing over the pool.

use sqlx::PgPool;

use accesshub_core::error::ErrorKind;
use accesshub_database::repositories::{
    CatalogRepository, ObjectPermissionRepository, ResourceRepository, UserRepository,
};

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_or_create_is_idempotent(pool: PgPool) {
    let catalog = CatalogRepository::new(pool.clone());
    let module = catalog.create_module("document", None).await.unwrap();

    let resources = ResourceRepository::new(pool.clone());
    let mut conn = pool.acquire().await.unwrap();

    let first = resources
        .resolve_or_create(&mut conn, module.id, "42")
        .await
        .unwrap();
    let second = resources
        .resolve_or_create(&mut conn, module.id, "42")
        .await
        .unwrap();
    let third = resources
        .resolve_or_create(&mut conn, module.id, "42")
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(second, third);

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM resources WHERE module_id = $1 AND foreign_id = $2",
    )
    .bind(module.id)
    .bind("42")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);

    // A different token in the same module is a different identity.
    let other = resources
        .resolve_or_create(&mut conn, module.id, "43")
        .await
        .unwrap();
    assert_ne!(first, other);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_if_orphaned_waits_for_last_grant(pool: PgPool) {
    let catalog = CatalogRepository::new(pool.clone());
    let module = catalog.create_module("document", None).await.unwrap();
    let read = catalog.create_action("read", None).await.unwrap();
    let update = catalog.create_action("update", None).await.unwrap();
    let p_read = catalog
        .create_permission(module.id, read.id, None, None)
        .await
        .unwrap();
    let p_update = catalog
        .create_permission(module.id, update.id, None, None)
        .await
        .unwrap();

    let users = UserRepository::new(pool.clone());
    let reader = users.create("reader@example.com", None, None).await.unwrap();
    let admin = users.create("admin@example.com", None, None).await.unwrap();

    let resources = ResourceRepository::new(pool.clone());
    let mut conn = pool.acquire().await.unwrap();
    let resource_id = resources
        .resolve_or_create(&mut conn, module.id, "42")
        .await
        .unwrap();
    ObjectPermissionRepository::insert(
        &mut conn,
        reader.id,
        resource_id,
        p_read.id,
        admin.id,
        None,
    )
    .await
    .unwrap();
    ObjectPermissionRepository::insert(
        &mut conn,
        reader.id,
        resource_id,
        p_update.id,
        admin.id,
        None,
    )
    .await
    .unwrap();

    // Two grants still reference the resource; the guarded delete is a
    // no-op.
    assert!(
        !resources
            .delete_if_orphaned(&mut conn, resource_id)
            .await
            .unwrap()
    );

    ObjectPermissionRepository::delete(&mut conn, reader.id, resource_id, &[p_read.id])
        .await
        .unwrap();
    assert!(
        !resources
            .delete_if_orphaned(&mut conn, resource_id)
            .await
            .unwrap()
    );

    // The last grant goes, and the resource row with it.
    ObjectPermissionRepository::delete(&mut conn, reader.id, resource_id, &[p_update.id])
        .await
        .unwrap();
    assert!(
        resources
            .delete_if_orphaned(&mut conn, resource_id)
            .await
            .unwrap()
    );

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    // The same token can be registered again afterwards under a fresh id.
    let reborn = resources
        .resolve_or_create(&mut conn, module.id, "42")
        .await
        .unwrap();
    assert_ne!(reborn, resource_id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_user_and_duplicate_email_conflict(pool: PgPool) {
    let users = UserRepository::new(pool.clone());

    let created = users
        .create("alice@example.com", Some("Alice"), None)
        .await
        .unwrap();
    assert_eq!(created.email, "alice@example.com");
    assert!(created.is_active);

    let found = users
        .find_by_email("ALICE@example.com")
        .await
        .unwrap()
        .expect("case-insensitive lookup");
    assert_eq!(found.id, created.id);

    let err = users
        .create("alice@example.com", None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}
