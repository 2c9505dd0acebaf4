//! Registration, login, and profile management.

use chrono::NaiveDate;
use sqlx::PgPool;
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_core::validation::{normalize_email, trimmed};
use storefront_db::models::user::{CreateUser, PublicUser, UpdateUser};
use storefront_db::repositories::UserRepo;

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password, verify_against_decoy, verify_password};
use crate::error::{unique_violation, AppError};
use crate::services::log_failure;

/// Fields accepted at registration. Rules are checked at the HTTP boundary.
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
}

/// A signed-in user: the public record plus a fresh token and its `jti`.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: PublicUser,
    pub token: String,
    pub token_id: String,
}

/// Registration, login, and profile operations over the `users` table.
#[derive(Clone)]
pub struct AccountService {
    pool: PgPool,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(pool: PgPool, tokens: TokenIssuer) -> Self {
        Self { pool, tokens }
    }

    /// Create an account and sign the new user in.
    ///
    /// The existence checks give the common case a precise error; the
    /// `uq_users_*` constraints still decide races between concurrent
    /// registrations.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthOutcome, AppError> {
        self.register_inner(input)
            .await
            .inspect_err(|e| log_failure("register", e))
    }

    async fn register_inner(&self, input: RegisterInput) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(&input.email);
        let user_name = trimmed(input.user_name.as_deref());

        if UserRepo::email_exists(&self.pool, &email).await? {
            return Err(CoreError::DuplicateEmail.into());
        }
        if let Some(name) = &user_name {
            if UserRepo::user_name_exists(&self.pool, name).await? {
                return Err(CoreError::DuplicateUsername.into());
            }
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let create = CreateUser {
            email,
            user_name,
            password_hash,
            first_name: trimmed(input.first_name.as_deref()),
            last_name: trimmed(input.last_name.as_deref()),
            gender: input.gender.map(|g| g.trim().to_string()),
            dob: input.dob,
            phone: trimmed(input.phone.as_deref()),
        };
        let user = UserRepo::create(&self.pool, &create)
            .await
            .map_err(map_user_conflict)?;

        tracing::info!(user_id = user.id, "User registered");
        self.sign_in(user)
    }

    /// Check credentials and sign the user in.
    ///
    /// Unknown email and wrong password produce the same error, and both
    /// paths run one password verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        self.login_inner(email, password)
            .await
            .inspect_err(|e| log_failure("login", e))
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(email);

        let Some(user) = UserRepo::find_credentials_by_email(&self.pool, &email).await? else {
            verify_against_decoy(password);
            return Err(CoreError::InvalidCredentials.into());
        };

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !password_valid {
            return Err(CoreError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(CoreError::AccountDeactivated.into());
        }

        tracing::info!(user_id = user.id, "User logged in");
        self.sign_in(user.into_public())
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<Option<PublicUser>, AppError> {
        UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("get_user", e))
    }

    /// Apply a partial profile update. Only supplied fields change.
    pub async fn update(&self, id: DbId, input: UpdateUser) -> Result<PublicUser, AppError> {
        self.update_inner(id, input)
            .await
            .inspect_err(|e| log_failure("update_user", e))
    }

    async fn update_inner(&self, id: DbId, input: UpdateUser) -> Result<PublicUser, AppError> {
        let current = UserRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "User", id })?;

        let input = UpdateUser {
            email: input.email.as_deref().map(normalize_email),
            user_name: trimmed(input.user_name.as_deref()),
            first_name: trimmed(input.first_name.as_deref()),
            last_name: trimmed(input.last_name.as_deref()),
            gender: input.gender.map(|g| g.trim().to_string()),
            dob: input.dob,
            phone: trimmed(input.phone.as_deref()),
        };

        if let Some(email) = input.email.as_deref() {
            if email != current.email && UserRepo::email_exists(&self.pool, email).await? {
                return Err(CoreError::DuplicateEmail.into());
            }
        }
        if let Some(name) = input.user_name.as_deref() {
            if current.user_name.as_deref() != Some(name)
                && UserRepo::user_name_exists(&self.pool, name).await?
            {
                return Err(CoreError::DuplicateUsername.into());
            }
        }

        UserRepo::update(&self.pool, id, &input)
            .await
            .map_err(map_user_conflict)?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }

    /// Delete the account. Sessions and products go with it.
    pub async fn delete(&self, id: DbId) -> Result<(), AppError> {
        let deleted = UserRepo::delete(&self.pool, id)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure("delete_user", e))?;
        if !deleted {
            return Err(CoreError::NotFound { entity: "User", id }.into());
        }
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    fn sign_in(&self, user: PublicUser) -> Result<AuthOutcome, AppError> {
        let token_id = TokenIssuer::mint_token_id();
        let token = self
            .tokens
            .issue(user.id, &user.email, Some(&token_id))
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

        Ok(AuthOutcome {
            user,
            token,
            token_id,
        })
    }
}

/// Map a violation of the user uniqueness constraints to its domain error.
fn map_user_conflict(err: sqlx::Error) -> AppError {
    let duplicate = match unique_violation(&err) {
        Some("uq_users_email") => Some(CoreError::DuplicateEmail),
        Some("uq_users_user_name") => Some(CoreError::DuplicateUsername),
        _ => None,
    };
    duplicate.map_or(AppError::Database(err), AppError::Core)
}
