//! Request extractors that answer malformed input with the JSON envelope.
//!
//! Also holds the `validator` custom-rule adapters used by the request DTOs.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body that must deserialize and pass its `validator` rules.
///
/// Malformed JSON is `400 BAD_REQUEST`; rule failures are
/// [`CoreError::Validation`] with every message joined by `", "`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(join_messages(&errors))))?;

        Ok(Self(value))
    }
}

/// Query string that must deserialize; failures are `400 BAD_REQUEST`.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// A `{id}` path segment that must be a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidId(pub DbId);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        match raw.trim().parse::<DbId>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(AppError::Core(CoreError::Validation(
                "ID must be a positive integer".into(),
            ))),
        }
    }
}

/// Every field message, sorted by field name, joined with `", "`.
fn join_messages(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {field}"),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Custom rules for `#[validate(custom(function = "rules::..."))]`.
///
/// Referenced by path so a field named like its rule does not shadow it.
pub mod rules {
    use std::borrow::Cow;

    use rust_decimal::Decimal;
    use storefront_core::error::CoreError;
    use storefront_core::validation::{
        validate_date_of_birth, validate_gender, validate_password_complexity, validate_phone,
        validate_price, validate_product_description, validate_product_name, MAX_NAME_LENGTH,
    };
    use validator::ValidationError;

    fn rule(code: &'static str, result: Result<(), CoreError>) -> Result<(), ValidationError> {
        result.map_err(|err| {
            let message = match err {
                CoreError::Validation(msg) => msg,
                other => other.to_string(),
            };
            ValidationError::new(code).with_message(Cow::Owned(message))
        })
    }

    pub fn password_complexity(value: &str) -> Result<(), ValidationError> {
        rule("password", validate_password_complexity(value))
    }

    pub fn gender(value: &str) -> Result<(), ValidationError> {
        rule("gender", validate_gender(value))
    }

    pub fn date_of_birth(value: &str) -> Result<(), ValidationError> {
        let today = chrono::Utc::now().date_naive();
        rule("dob", validate_date_of_birth(value, today).map(|_| ()))
    }

    pub fn phone(value: &str) -> Result<(), ValidationError> {
        rule("phone", validate_phone(value))
    }

    pub fn first_name(value: &str) -> Result<(), ValidationError> {
        name_length("first_name", "First name", value)
    }

    pub fn last_name(value: &str) -> Result<(), ValidationError> {
        name_length("last_name", "Last name", value)
    }

    pub fn user_name(value: &str) -> Result<(), ValidationError> {
        name_length("user_name", "Username", value)
    }

    /// 1..=50 characters after trimming.
    fn name_length(code: &'static str, label: &str, value: &str) -> Result<(), ValidationError> {
        let len = value.trim().chars().count();
        if len == 0 || len > MAX_NAME_LENGTH {
            return Err(ValidationError::new(code).with_message(Cow::Owned(format!(
                "{label} must be between 1 and {MAX_NAME_LENGTH} characters"
            ))));
        }
        Ok(())
    }

    pub fn product_name(value: &str) -> Result<(), ValidationError> {
        rule("name", validate_product_name(value))
    }

    pub fn product_description(value: &str) -> Result<(), ValidationError> {
        rule("description", validate_product_description(value))
    }

    pub fn price(value: &Decimal) -> Result<(), ValidationError> {
        rule("price", validate_price(*value))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Please provide a valid email address"))]
        email: String,
        #[validate(custom(function = "rules::password_complexity"))]
        password: String,
        #[validate(custom(function = "rules::first_name"))]
        first_name: Option<String>,
    }

    #[test]
    fn messages_are_joined_in_field_order() {
        let sample = Sample {
            email: "not-an-email".into(),
            password: "short".into(),
            first_name: Some("   ".into()),
        };

        let errors = sample.validate().unwrap_err();
        assert_eq!(
            join_messages(&errors),
            "Please provide a valid email address, \
             First name must be between 1 and 50 characters, \
             Password must be at least 6 characters long"
        );
    }

    #[test]
    fn absent_optional_fields_are_not_checked() {
        let sample = Sample {
            email: "a@x.com".into(),
            password: "Abc123".into(),
            first_name: None,
        };
        assert!(sample.validate().is_ok());
    }

    #[test]
    fn date_of_birth_rejects_future_dates() {
        assert!(rules::date_of_birth("1990-05-01").is_ok());
        assert!(rules::date_of_birth("2999-01-01").is_err());
        assert!(rules::date_of_birth("yesterday").is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(rules::price(&Decimal::new(1999, 2)).is_ok());
        assert!(rules::price(&Decimal::new(-1, 2)).is_err());
    }
}
