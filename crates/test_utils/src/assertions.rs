//! Error-variant assertion helpers

use core_kernel::{AccessDeniedReason, CoreError};

/// Panics unless the error is `NotFound`
pub fn assert_not_found<T: std::fmt::Debug>(result: Result<T, CoreError>) {
    match result {
        Err(err) if err.is_not_found() => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

/// Panics unless the error is `InvalidTransition`
pub fn assert_invalid_transition<T: std::fmt::Debug>(result: Result<T, CoreError>) {
    match result {
        Err(CoreError::InvalidTransition { .. }) => {}
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
}

/// Panics unless the error is `InvalidArgument`
pub fn assert_invalid_argument<T: std::fmt::Debug>(result: Result<T, CoreError>) {
    match result {
        Err(CoreError::InvalidArgument { .. }) => {}
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

/// Panics unless the error is `AccessDenied` with the given reason
pub fn assert_access_denied<T: std::fmt::Debug>(
    result: Result<T, CoreError>,
    expected: AccessDeniedReason,
) {
    match result {
        Err(CoreError::AccessDenied { reason }) if reason == expected => {}
        other => panic!("expected AccessDenied({expected:?}), got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_not_found_passes() {
        assert_not_found::<()>(Err(CoreError::not_found("User", "USR-1")));
    }

    #[test]
    #[should_panic(expected = "expected NotFound")]
    fn test_assert_not_found_panics_on_ok() {
        assert_not_found(Ok(42));
    }
}
