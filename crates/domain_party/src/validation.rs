//! Party field validation
//!
//! Validation runs before any store call (validate-then-commit). The rules
//! here are the field-level ones; uniqueness of `id_number` and agent email
//! is the store's job and surfaces as `DuplicateKey`.

use chrono::{NaiveDate, Utc};

use core_kernel::{CoreError, CoreResult};

/// Validates member fields before create or update
pub fn validate_member(name: &str, id_number: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid_argument_field("name is required", "name"));
    }
    if id_number.trim().is_empty() {
        return Err(CoreError::invalid_argument_field(
            "id number is required",
            "id_number",
        ));
    }
    Ok(())
}

/// Validates dependant fields before create or update
pub fn validate_dependant(name: &str, date_of_birth: Option<NaiveDate>) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid_argument_field("name is required", "name"));
    }
    if let Some(dob) = date_of_birth {
        if dob > Utc::now().date_naive() {
            return Err(CoreError::invalid_argument_field(
                "date of birth must be in the past",
                "date_of_birth",
            ));
        }
    }
    Ok(())
}

/// Validates agent fields before create
pub fn validate_agent(name: &str, email: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid_argument_field("name is required", "name"));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(CoreError::invalid_argument_field(
            "a valid email is required",
            "email",
        ));
    }
    Ok(())
}
