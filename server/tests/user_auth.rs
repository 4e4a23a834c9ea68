//! User registration and authentication integration tests.
//!
//! Run: cargo test -p eshop-server --test user_auth

use eshop_server::auth::{JwtConfig, JwtService};
use eshop_server::db::DbService;
use eshop_server::db::models::{UserCreate, UserUpdate};
use eshop_server::db::repository::{RepoError, UserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn open_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("test.db")).await.unwrap();
    (tmp, service.db)
}

fn registration(email: &str, password: &str) -> UserCreate {
    UserCreate {
        name: "Andy".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        phone: Some("0123456789".to_string()),
        is_admin: Some(false),
        street: None,
        apartment: None,
        zip: None,
        city: None,
        country: None,
    }
}

#[tokio::test]
async fn registration_never_persists_the_raw_password() {
    let (_tmp, db) = open_db().await;
    let repo = UserRepository::new(db.clone());

    let raw_password = "correct horse battery staple";
    let user = repo
        .create(registration("andy@example.com", raw_password))
        .await
        .unwrap();

    assert_ne!(user.password_hash, raw_password);
    assert!(!user.password_hash.contains(raw_password));
    // Argon2 PHC string format
    assert!(user.password_hash.starts_with("$argon2"));

    // The stored record verifies the right password and rejects the wrong one
    let stored = repo
        .find_by_email("andy@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.verify_password(raw_password).unwrap());
    assert!(!stored.verify_password("wrong password").unwrap());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (_tmp, db) = open_db().await;
    let repo = UserRepository::new(db.clone());

    repo.create(registration("dup@example.com", "first-password"))
        .await
        .unwrap();

    match repo
        .create(registration("dup@example.com", "second-password"))
        .await
    {
        Err(RepoError::Duplicate(_)) => {}
        other => panic!("expected Duplicate error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn update_without_password_keeps_the_stored_hash() {
    let (_tmp, db) = open_db().await;
    let repo = UserRepository::new(db.clone());

    let user = repo
        .create(registration("keep@example.com", "original-password"))
        .await
        .unwrap();
    let id = user.id.unwrap().to_string();
    let original_hash = user.password_hash.clone();

    let updated = repo
        .update(
            &id,
            UserUpdate {
                name: Some("Andy Short".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Andy Short");
    assert_eq!(updated.password_hash, original_hash);
    assert!(updated.verify_password("original-password").unwrap());
}

#[tokio::test]
async fn update_with_password_rehashes() {
    let (_tmp, db) = open_db().await;
    let repo = UserRepository::new(db.clone());

    let user = repo
        .create(registration("rotate@example.com", "old-password"))
        .await
        .unwrap();
    let id = user.id.unwrap().to_string();

    let updated = repo
        .update(
            &id,
            UserUpdate {
                password: Some("new-password".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.verify_password("new-password").unwrap());
    assert!(!updated.verify_password("old-password").unwrap());
}

#[tokio::test]
async fn login_token_claims_carry_id_and_admin_flag() {
    let (_tmp, db) = open_db().await;
    let repo = UserRepository::new(db.clone());

    let mut payload = registration("admin@example.com", "admin-password");
    payload.is_admin = Some(true);
    let user = repo.create(payload).await.unwrap();
    let user_id = user.id.as_ref().unwrap().to_string();

    let jwt = JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-32-characters!!".to_string(),
        expiration_minutes: 1440,
    });

    let token = jwt.generate_token(&user_id, user.is_admin).unwrap();
    let claims = jwt.validate_token(&token).unwrap();

    assert_eq!(claims.sub, user_id);
    assert!(claims.is_admin);
    // One-day expiry window
    assert_eq!(claims.exp - claims.iat, 1440 * 60);
}

#[tokio::test]
async fn count_is_zero_on_empty_collection() {
    let (_tmp, db) = open_db().await;
    let repo = UserRepository::new(db.clone());
    assert_eq!(repo.count().await.unwrap(), 0);
}
