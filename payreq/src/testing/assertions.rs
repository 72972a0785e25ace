//! Assertions for the error taxonomy.

use crate::errors::{PayreqError, Result};
use std::fmt::Debug;

/// Asserts an `InvalidRequestParameterError` with the given code.
pub fn assert_invalid_parameter<T: Debug>(result: &Result<T>, expected_code: &str) {
    match result {
        Err(PayreqError::InvalidParameter(e)) => assert_eq!(
            e.code, expected_code,
            "Expected code {expected_code}, got {} ({})",
            e.code, e.message
        ),
        other => panic!("Expected invalid parameter error, got {other:?}"),
    }
}

/// Asserts an `ImmutableParameterError` for `key`.
pub fn assert_immutable<T: Debug>(result: &Result<T>, key: &str) {
    match result {
        Err(PayreqError::ImmutableParameter(e)) => assert_eq!(
            e.key, key,
            "Expected immutable parameter {key}, got {}",
            e.key
        ),
        other => panic!("Expected immutable parameter error, got {other:?}"),
    }
}

/// Asserts a `ServerRequestError`.
pub fn assert_server_request<T: Debug>(result: &Result<T>) {
    assert!(
        matches!(result, Err(PayreqError::ServerRequest(_))),
        "Expected server request error, got {result:?}"
    );
}

/// Asserts a `ServerResponseError`.
pub fn assert_server_response<T: Debug>(result: &Result<T>) {
    assert!(
        matches!(result, Err(PayreqError::ServerResponse(_))),
        "Expected server response error, got {result:?}"
    );
}
