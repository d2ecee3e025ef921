/// Integration tests for profiles
///
/// Require PostgreSQL via DATABASE_URL; see tests/common/mod.rs.

mod common;

use lodestar_shared::db::is_unique_violation;
use lodestar_shared::models::account::{Account, UpdateAccount};
use lodestar_shared::models::profile::{Profile, ACCOUNT_UNIQUE_CONSTRAINT};

#[tokio::test]
async fn test_new_account_has_no_profile() {
    let Some(pool) = common::test_pool().await else { return };
    let (store, _rx) = common::channel_store(pool.clone());

    let account = store
        .create_user(Some(&common::unique_email("bare")), Some("password"))
        .await
        .unwrap();

    assert!(Profile::find_by_account(&pool, account.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_profile_once() {
    let Some(pool) = common::test_pool().await else { return };
    let (store, _rx) = common::channel_store(pool.clone());

    let account = store
        .create_user(Some(&common::unique_email("profile")), None)
        .await
        .unwrap();

    let profile = Profile::create(&pool, account.id, None).await.unwrap();
    assert_eq!(profile.account_id, account.id);
    assert!(profile.first_name.is_none());

    let err = Profile::create(&pool, account.id, Some("Again")).await.unwrap_err();
    assert!(is_unique_violation(&err, Some(ACCOUNT_UNIQUE_CONSTRAINT)));
}

#[tokio::test]
async fn test_upsert_first_name() {
    let Some(pool) = common::test_pool().await else { return };
    let (store, _rx) = common::channel_store(pool.clone());

    let account = store
        .create_user(Some(&common::unique_email("upsert")), None)
        .await
        .unwrap();

    let created = Profile::upsert_first_name(&pool, account.id, Some("Ada")).await.unwrap();
    assert_eq!(created.first_name.as_deref(), Some("Ada"));

    let updated = Profile::upsert_first_name(&pool, account.id, Some("Grace")).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name.as_deref(), Some("Grace"));

    let cleared = Profile::upsert_first_name(&pool, account.id, None).await.unwrap();
    assert!(cleared.first_name.is_none());
}

#[tokio::test]
async fn test_deleting_account_removes_profile() {
    let Some(pool) = common::test_pool().await else { return };
    let (store, _rx) = common::channel_store(pool.clone());

    let account = store
        .create_user(Some(&common::unique_email("cascade")), None)
        .await
        .unwrap();
    let profile = Profile::create(&pool, account.id, Some("Linus")).await.unwrap();

    assert!(store.delete_account(account.public_id).await.unwrap());

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE id = $1")
        .bind(profile.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_deleting_profile_keeps_account() {
    let Some(pool) = common::test_pool().await else { return };
    let (store, _rx) = common::channel_store(pool.clone());

    let account = store
        .create_user(Some(&common::unique_email("keep")), None)
        .await
        .unwrap();
    Profile::create(&pool, account.id, Some("Margaret")).await.unwrap();

    assert!(Profile::delete(&pool, account.id).await.unwrap());
    assert!(!Profile::delete(&pool, account.id).await.unwrap());
    assert!(Account::find_by_id(&pool, account.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_account_partial_update_and_listing() {
    let Some(pool) = common::test_pool().await else { return };
    let (store, _rx) = common::channel_store(pool.clone());

    let account = store
        .create_user(Some(&common::unique_email("partial")), Some("password"))
        .await
        .unwrap();

    let update = UpdateAccount {
        is_confirmed: Some(true),
        ..Default::default()
    };
    let updated = Account::update(&pool, account.id, update).await.unwrap().unwrap();
    assert!(updated.is_confirmed);
    assert_eq!(updated.email, account.email);
    assert_eq!(updated.password_hash, account.password_hash);
    assert_eq!(updated.created_at, account.created_at);

    let unchanged = Account::update(&pool, account.id, UpdateAccount::default())
        .await
        .unwrap()
        .unwrap();
    assert!(unchanged.is_confirmed);

    assert!(Account::count(&pool).await.unwrap() >= 1);
    assert!(!Account::list(&pool, 10, 0).await.unwrap().is_empty());
    assert!(Account::update(&pool, -1, UpdateAccount { is_staff: Some(true), ..Default::default() })
        .await
        .unwrap()
        .is_none());
}
