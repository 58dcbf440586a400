//! Checks used inside scenarios
//!
//! Each returns an `AssertionFailed` error instead of panicking so a failed
//! check ends only the scenario that made it.

use std::fmt::Debug;

use relix_core::errors::{ExError, ExErrorKind, Result};

use crate::errors::HarnessError;

/// # Errors
/// * `AssertionFailed` - `condition` is false
pub fn ensure(condition: bool, detail: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::Expectation { detail: detail() }.into())
    }
}

/// # Errors
/// * `AssertionFailed` - the values differ
pub fn ensure_eq<T: PartialEq + Debug>(what: &str, actual: T, expected: T) -> Result<()> {
    ensure(actual == expected, || {
        format!("{}: expected {:?}, got {:?}", what, expected, actual)
    })
}

/// Require `result` to have failed with `kind`; returns the error
///
/// # Errors
/// * `AssertionFailed` - `result` succeeded or failed with another kind
pub fn expect_failure<T: Debug>(what: &str, result: Result<T>, kind: ExErrorKind) -> Result<ExError> {
    match result {
        Err(err) if err.kind() == kind => Ok(err),
        Err(err) => Err(HarnessError::Expectation {
            detail: format!("{}: expected {}, got {}", what, kind.code(), err),
        }
        .into()),
        Ok(value) => Err(HarnessError::Expectation {
            detail: format!("{}: expected {}, got Ok({:?})", what, kind.code(), value),
        }
        .into()),
    }
}
