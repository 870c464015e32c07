use std::io;

use thiserror::Error;

/// An error from Trial.
///
/// Construction errors (`InvalidArgument`, `OutOfRange`, `Config`) are
/// raised before any test runs. The rest abort a run that already started.
#[derive(Debug, Error)]
pub enum Error {
    /// The suite was given an argument it cannot run with, such as an
    /// empty test table.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested concurrency level does not fit the suite.
    #[error("bad concurrency level {level} for {size} tests")]
    OutOfRange { level: usize, size: usize },

    /// Building the shared state failed. No test ran.
    #[error("failed to set up shared state: {0:#}")]
    Setup(anyhow::Error),

    /// A test raised something other than an assertion failure.
    #[error("test `{test}` aborted the run: {cause:#}")]
    Fault { test: String, cause: anyhow::Error },

    /// Writing progress output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A configuration file or option could not be used.
    #[error("{0}")]
    Config(String),
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(err.to_string())
    }
}
