//! Integration tests for the `users` repository.
//!
//! - Public projection never carries the password hash
//! - Unique email / username constraints
//! - Partial update, deactivate, delete cascade

use sqlx::PgPool;
use storefront_db::models::product::CreateProduct;
use storefront_db::models::session::CreateSession;
use storefront_db::models::user::{CreateUser, UpdateUser};
use storefront_db::repositories::{ProductRepo, SessionRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str, user_name: Option<&str>) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        user_name: user_name.map(str::to_string),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: None,
        gender: None,
        dob: None,
        phone: None,
    }
}

fn constraint_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("ada@example.com", Some("ada")))
        .await
        .unwrap();
    assert!(created.is_active);
    assert_eq!(created.email, "ada@example.com");

    let found = UserRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found.user_name.as_deref(), Some("ada"));

    let creds = UserRepo::find_credentials_by_email(&pool, "ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(creds.password_hash.starts_with("$argon2id$"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_user_has_no_password_field(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("safe@example.com", None))
        .await
        .unwrap();

    let json = serde_json::to_value(&created).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert!(
        keys.iter().all(|k| !k.to_lowercase().contains("password")),
        "public user leaked a password field: {keys:?}"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com", None))
        .await
        .unwrap();

    let err = UserRepo::create(&pool, &new_user("dup@example.com", None))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_users_email"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind("dup@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("a@example.com", Some("taken")))
        .await
        .unwrap();

    let err = UserRepo::create(&pool, &new_user("b@example.com", Some("taken")))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_users_user_name"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_existence_checks(pool: PgPool) {
    UserRepo::create(&pool, &new_user("here@example.com", Some("here")))
        .await
        .unwrap();

    assert!(UserRepo::email_exists(&pool, "here@example.com").await.unwrap());
    assert!(!UserRepo::email_exists(&pool, "gone@example.com").await.unwrap());
    assert!(UserRepo::user_name_exists(&pool, "here").await.unwrap());
    assert!(!UserRepo::user_name_exists(&pool, "gone").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update_changes_only_supplied_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("upd@example.com", Some("upd")))
        .await
        .unwrap();

    let update = UpdateUser {
        last_name: Some("Lovelace".to_string()),
        ..Default::default()
    };
    let updated = UserRepo::update(&pool, user.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(updated.first_name.as_deref(), Some("Ada"));
    assert_eq!(updated.email, "upd@example.com");
    assert!(updated.updated_at >= user.updated_at);

    let missing = UserRepo::update(&pool, user.id + 1000, &update).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("off@example.com", None))
        .await
        .unwrap();

    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    let found = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!found.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_to_sessions_and_products(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("bye@example.com", None))
        .await
        .unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            token_id: "jti-bye".to_string(),
            ip: None,
            user_agent: None,
        },
    )
    .await
    .unwrap();
    ProductRepo::create(
        &pool,
        &CreateProduct {
            name: "Lamp".to_string(),
            description: None,
            price: rust_decimal::Decimal::new(1500, 2),
            stock: 1,
            image_url: None,
            user_id: user.id,
        },
    )
    .await
    .unwrap();

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(!UserRepo::delete(&pool, user.id).await.unwrap());

    assert!(SessionRepo::find_by_token_id(&pool, "jti-bye")
        .await
        .unwrap()
        .is_none());
    assert!(ProductRepo::list_by_owner(&pool, user.id)
        .await
        .unwrap()
        .is_empty());
}
