//! Input rules shared by request validation and the service layer.
//!
//! The HTTP crate runs these on request bodies, and the services run the
//! numeric product rules again before persisting.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::CoreError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum length of first name, last name, and username.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LENGTH: usize = 255;

/// Maximum length of a product description.
pub const MAX_PRODUCT_DESCRIPTION_LENGTH: usize = 1000;

/// Accepted `gender` values. The empty string clears the field.
pub const VALID_GENDERS: &[&str] = &["male", "female", "other", ""];

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$")
        .expect("phone pattern is valid")
});

/// Trim and lower-case an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim an optional text field, mapping blank input to `None`.
pub fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// At least [`MIN_PASSWORD_LENGTH`] characters with one lower-case letter,
/// one upper-case letter, and one digit.
pub fn validate_password_complexity(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(CoreError::Validation(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .into(),
        ));
    }
    Ok(())
}

pub fn validate_gender(gender: &str) -> Result<(), CoreError> {
    if VALID_GENDERS.contains(&gender.trim()) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Gender must be one of: male, female, other, or empty string".into(),
        ))
    }
}

/// Parse an ISO-8601 date (`YYYY-MM-DD`) or date-time (RFC 3339) into a date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, CoreError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| {
            CoreError::Validation(
                "Date of birth must be a valid date (ISO 8601 format)".into(),
            )
        })
}

/// A date of birth must parse and must not lie after `today`.
pub fn validate_date_of_birth(value: &str, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    let dob = parse_iso_date(value)?;
    if dob > today {
        return Err(CoreError::Validation(
            "Date of birth cannot be in the future".into(),
        ));
    }
    Ok(dob)
}

pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Please provide a valid phone number".into(),
        ))
    }
}

pub fn validate_product_name(name: &str) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_PRODUCT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Product name must be between 1 and {MAX_PRODUCT_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_product_description(description: &str) -> Result<(), CoreError> {
    if description.trim().chars().count() > MAX_PRODUCT_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must not exceed {MAX_PRODUCT_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Prices must stay below this to fit the `NUMERIC(10, 2)` column.
pub const PRICE_LIMIT: i64 = 100_000_000;

/// Non-negative, below [`PRICE_LIMIT`], with at most two decimal places.
pub fn validate_price(price: Decimal) -> Result<(), CoreError> {
    if price < Decimal::ZERO {
        return Err(CoreError::Validation(
            "Price must be a non-negative number".into(),
        ));
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        return Err(CoreError::Validation(
            "Price must not exceed 99999999.99".into(),
        ));
    }
    if price.normalize().scale() > 2 {
        return Err(CoreError::Validation(
            "Price must have at most two decimal places".into(),
        ));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), CoreError> {
    if stock < 0 {
        return Err(CoreError::Validation(
            "Stock must be a non-negative integer".into(),
        ));
    }
    Ok(())
}
