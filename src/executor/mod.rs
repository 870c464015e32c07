//! Execution strategies decide how a list of jobs is dispatched.
//!
//! Both the suite engine and [MultiTest](crate::multi::MultiTest) reduce
//! their work to a slice of jobs and a closure that runs one job. A job
//! returns `Ok(true)` when it passed, `Ok(false)` for a counted failure, and
//! `Err(_)` to abort.

mod concurrent;
mod level;
mod sequential;

pub use concurrent::Concurrent;
pub use level::check_concurrency_level;
pub use sequential::Sequential;

use serde::Deserialize;

/// How a set of jobs is dispatched.
pub trait Strategy {
    /// Adverb used in the run banner.
    fn label(&self) -> &'static str;

    /// Run `job` over every element of `jobs` and return the number of
    /// failures. Stops early and returns the error when a job aborts.
    fn run<J, E, F>(&self, jobs: &[J], job: F) -> Result<usize, E>
    where
        J: Sync,
        E: Send,
        F: Fn(&J) -> Result<bool, E> + Sync;
}

/// The execution mode selected by users and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Sequential,
    Concurrent,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Concurrent
    }
}

impl std::str::FromStr for Mode {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Mode::Sequential),
            "concurrent" => Ok(Mode::Concurrent),
            _ => Err(crate::errors::Error::Config(
                "Must be one of sequential, concurrent.".to_string(),
            )),
        }
    }
}

/// A strategy chosen at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sequential(Sequential),
    Concurrent(Concurrent),
}

impl Dispatch {
    /// Pick the strategy for `mode`. `level` must already be resolved with
    /// [check_concurrency_level].
    pub fn new(mode: Mode, level: usize) -> Self {
        match mode {
            Mode::Sequential => Dispatch::Sequential(Sequential),
            Mode::Concurrent => Dispatch::Concurrent(Concurrent::new(level)),
        }
    }
}

impl Strategy for Dispatch {
    fn label(&self) -> &'static str {
        match self {
            Dispatch::Sequential(s) => s.label(),
            Dispatch::Concurrent(c) => c.label(),
        }
    }

    fn run<J, E, F>(&self, jobs: &[J], job: F) -> Result<usize, E>
    where
        J: Sync,
        E: Send,
        F: Fn(&J) -> Result<bool, E> + Sync,
    {
        match self {
            Dispatch::Sequential(s) => s.run(jobs, job),
            Dispatch::Concurrent(c) => c.run(jobs, job),
        }
    }
}
