//! Assertion primitives for test bodies.
//!
//! A test signals an expected failure by returning an [AssertionFailure].
//! Anything else it returns through [TestError::Fault] is a fault and aborts
//! the whole run.
use std::fmt::Debug;

use thiserror::Error;

/// Expected and actual values of a failed equality check, rendered with
/// `Debug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: String,
    pub actual: String,
}

/// The distinguished "assertion failed" signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
    mismatch: Option<Mismatch>,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mismatch: None,
        }
    }

    /// Attach the values that failed to compare equal.
    pub fn with_mismatch<T: Debug + ?Sized>(
        mut self,
        expected: &T,
        actual: &T,
    ) -> Self {
        self.mismatch = Some(Mismatch {
            expected: format!("{:#?}", expected),
            actual: format!("{:#?}", actual),
        });
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        self.mismatch.as_ref()
    }
}

/// Why a test did not pass.
#[derive(Debug, Error)]
pub enum TestError {
    /// Counted as a failure; sibling tests keep running.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
    /// Aborts the run.
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl TestError {
    pub fn is_assertion(&self) -> bool {
        matches!(self, TestError::Assertion(_))
    }

    /// The assertion failure, if this is one.
    pub fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            TestError::Assertion(failure) => Some(failure),
            TestError::Fault(_) => None,
        }
    }
}

/// Outcome of a single test body.
pub type TestResult = Result<(), TestError>;

/// Fail unconditionally.
pub fn fail(message: impl Into<String>) -> TestResult {
    Err(AssertionFailure::new(message).into())
}

/// Fail with `message` unless `cond` holds.
pub fn ensure(cond: bool, message: impl Into<String>) -> TestResult {
    if cond {
        Ok(())
    } else {
        fail(message)
    }
}

/// Fail with `message` unless `expected == actual`.
pub fn ensure_eq<T: PartialEq + Debug + ?Sized>(
    expected: &T,
    actual: &T,
    message: impl Into<String>,
) -> TestResult {
    if expected == actual {
        Ok(())
    } else {
        Err(AssertionFailure::new(message)
            .with_mismatch(expected, actual)
            .into())
    }
}
