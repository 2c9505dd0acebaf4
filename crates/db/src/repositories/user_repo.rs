//! Repository for the `users` table.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::user::{CreateUser, PublicUser, UpdateUser, User};

/// Columns safe to return to callers. The password hash is not among them.
const PUBLIC_COLUMNS: &str = "id, email, user_name, first_name, last_name, gender, dob, phone, \
                              is_active, created_at, updated_at";

/// Public columns plus the password hash, for credential checks only.
const CREDENTIAL_COLUMNS: &str = "id, email, user_name, password_hash, first_name, last_name, \
                                  gender, dob, phone, is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row without its password hash.
    ///
    /// Duplicate emails and usernames surface as unique violations on
    /// `uq_users_email` / `uq_users_user_name`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<PublicUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (email, user_name, password_hash, first_name, last_name, gender, dob, phone)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PUBLIC_COLUMNS}"
        );
        sqlx::query_as::<_, PublicUser>(&query)
            .bind(&input.email)
            .bind(&input.user_name)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.gender)
            .bind(input.dob)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PublicUser>, sqlx::Error> {
        let query = format!("SELECT {PUBLIC_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, PublicUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the full credential row for an email (already normalized).
    pub async fn find_credentials_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {CREDENTIAL_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    pub async fn user_name_exists(pool: &PgPool, user_name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE user_name = $1)")
            .bind(user_name)
            .fetch_one(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                user_name = COALESCE($3, user_name),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                gender = COALESCE($6, gender),
                dob = COALESCE($7, dob),
                phone = COALESCE($8, phone)
             WHERE id = $1
             RETURNING {PUBLIC_COLUMNS}"
        );
        sqlx::query_as::<_, PublicUser>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.user_name)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.gender)
            .bind(input.dob)
            .bind(&input.phone)
            .fetch_optional(pool)
            .await
    }

    /// Set `is_active = false`. Returns `true` if the row was updated.
    ///
    /// Maintenance helper for operators and tests; no HTTP route exposes it.
    /// Login refuses deactivated accounts.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a user. Sessions and products cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
