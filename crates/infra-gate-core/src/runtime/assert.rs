// crates/infra-gate-core/src/runtime/assert.rs
// ============================================================================
// Module: Check Assertions
// Description: Assertion helpers returning check results.
// Purpose: Let checks stop at the first failed assertion with `?`.
// Dependencies: crate::core::outcome
// ============================================================================

//! ## Overview
//! Every helper returns [`CheckResult`] so a check body reads as a flat list
//! of assertions joined by `?`. Messages name the subject (`what`) and the
//! literal that was expected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use crate::core::outcome::CheckFailure;
use crate::core::outcome::CheckResult;

// ============================================================================
// SECTION: Verdicts
// ============================================================================

/// Fails the check with `message`.
///
/// # Errors
///
/// Always returns [`CheckFailure::Assertion`].
pub fn fail(message: impl Into<String>) -> CheckResult {
    Err(CheckFailure::Assertion(message.into()))
}

/// Skips the check with `reason`.
///
/// # Errors
///
/// Always returns [`CheckFailure::Skipped`].
pub fn skip(reason: impl Into<String>) -> CheckResult {
    Err(CheckFailure::Skipped(reason.into()))
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Fails with `message` unless `condition` holds.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] when `condition` is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> CheckResult {
    if condition { Ok(()) } else { fail(message) }
}

/// Fails unless `actual == expected`.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] naming both values.
pub fn ensure_eq<T>(actual: &T, expected: &T, what: &str) -> CheckResult
where
    T: PartialEq + Display + ?Sized,
{
    if actual == expected {
        return Ok(());
    }
    fail(format!("{what}: expected `{expected}`, found `{actual}`"))
}

/// Fails unless `haystack` contains `needle`.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] naming the missing literal.
pub fn ensure_contains(haystack: &str, needle: &str, what: &str) -> CheckResult {
    ensure(haystack.contains(needle), format!("{what} must contain `{needle}`"))
}

/// Fails unless `haystack` contains every needle, reporting the first missing one.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] naming the first missing literal.
pub fn ensure_contains_all(haystack: &str, needles: &[&str], what: &str) -> CheckResult {
    for needle in needles {
        ensure_contains(haystack, needle, what)?;
    }
    Ok(())
}

/// Fails unless `haystack` contains at least one of `needles`.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] listing the alternatives.
pub fn ensure_contains_any(haystack: &str, needles: &[&str], what: &str) -> CheckResult {
    if needles.iter().any(|needle| haystack.contains(needle)) {
        return Ok(());
    }
    let alternatives =
        needles.iter().map(|needle| format!("`{needle}`")).collect::<Vec<_>>().join(" or ");
    fail(format!("{what} must contain {alternatives}"))
}

/// Fails when `haystack` contains `needle`.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] naming the forbidden literal.
pub fn ensure_absent(haystack: &str, needle: &str, what: &str) -> CheckResult {
    ensure(!haystack.contains(needle), format!("{what} must not contain `{needle}`"))
}

/// Fails unless `actual >= minimum`.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] naming both counts.
pub fn ensure_at_least(actual: usize, minimum: usize, what: &str) -> CheckResult {
    ensure(actual >= minimum, format!("{what}: expected at least {minimum}, found {actual}"))
}

/// Fails unless `actual == expected`.
///
/// # Errors
///
/// Returns [`CheckFailure::Assertion`] naming both counts.
pub fn ensure_count(actual: usize, expected: usize, what: &str) -> CheckResult {
    ensure(actual == expected, format!("{what}: expected exactly {expected}, found {actual}"))
}
