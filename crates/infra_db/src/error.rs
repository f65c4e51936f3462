//! SQLx error translation
//!
//! Maps driver errors onto the shared taxonomy. Constraint names follow
//! the `<table>_<field>_key` convention from the migrations, which lets a
//! unique violation report the offending field.

use core_kernel::CoreError;

/// Translates a SQLx error into a `CoreError`
///
/// `entity` names what the failing statement was operating on, for
/// `NotFound` messages.
pub fn map_db_error(entity: &str, error: sqlx::Error) -> CoreError {
    match error {
        sqlx::Error::RowNotFound => CoreError::not_found(entity, "unknown"),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            CoreError::unavailable("database connection pool exhausted")
        }
        sqlx::Error::Io(io) => CoreError::unavailable_from("database connection failed", io),
        sqlx::Error::Database(db) => {
            // PostgreSQL error codes
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            match db.code().as_deref() {
                Some("23505") => CoreError::duplicate_key(constraint_field(db.constraint())),
                Some("23503") => CoreError::invalid_argument(format!(
                    "{entity} references an entity that does not exist"
                )),
                _ => CoreError::unavailable(format!("database query failed: {}", db.message())),
            }
        }
        other => CoreError::unavailable_from("database query failed", other),
    }
}

/// Extracts the field name from a `<table>_<field>_key` constraint name
fn constraint_field(constraint: Option<&str>) -> String {
    constraint
        .and_then(|name| {
            let stem = name.strip_suffix("_key")?;
            let (_, field) = stem.split_once('_')?;
            Some(field.to_string())
        })
        .unwrap_or_else(|| "unique field".to_string())
}

/// Wraps a row holding data the domain refuses, e.g. a negative premium
pub(crate) fn corrupt_row(entity: &str, detail: impl std::fmt::Display) -> CoreError {
    CoreError::unavailable(format!("corrupt {entity} row: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_field_extraction() {
        assert_eq!(constraint_field(Some("users_email_key")), "email");
        assert_eq!(constraint_field(Some("members_id_number_key")), "id_number");
        assert_eq!(constraint_field(Some("weird")), "unique field");
        assert_eq!(constraint_field(None), "unique field");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = map_db_error("Policy", sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_exhaustion_maps_to_unavailable() {
        let err = map_db_error("User", sqlx::Error::PoolTimedOut);
        assert!(err.is_unavailable());
    }
}
