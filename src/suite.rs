//! The suite engine: a table of named tests run against one shared state.
use std::{
    collections::BTreeMap,
    fmt,
    io::Write,
    ops::Deref,
};

use parking_lot::Mutex;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    assert::{TestError, TestResult},
    errors::Error,
    executor::{check_concurrency_level, Dispatch, Mode, Strategy},
    report::{ReportOptions, Reporter},
};

/// A test inspects the shared state and returns normally on success.
pub type Test<S> = Box<dyn Fn(&S) -> TestResult + Send + Sync>;

/// Tests keyed by their unique name. Sequential runs visit them in name
/// order.
pub type Tests<S> = BTreeMap<String, Test<S>>;

type Setup<S> = Box<dyn Fn() -> anyhow::Result<S> + Send + Sync>;
type Teardown<S> = Box<dyn Fn(&mut S) + Send + Sync>;

/// A failed test and the message of its assertion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub test: String,
    pub message: String,
}

/// Counts for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub failed: usize,
    /// Failures ordered by test name.
    pub failures: Vec<Failure>,
}

impl Summary {
    pub fn new(total: usize, mut failures: Vec<Failure>) -> Self {
        failures.sort_by(|a, b| a.test.cmp(&b.test));
        Self {
            total,
            failed: failures.len(),
            failures,
        }
    }

    pub fn passed(&self) -> bool {
        self.failed == 0
    }

    /// Number of tests that passed. A summary built with more failures than
    /// tests reports zero.
    pub fn passing(&self) -> usize {
        self.total.saturating_sub(self.failed)
    }

    /// Names of the failed tests, in order.
    pub fn failed_tests(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.test.as_str())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} passing / {} failing",
            self.passing(),
            self.failed
        )
    }
}

/// Owns the shared state for the duration of a run and tears it down when
/// dropped, including while unwinding from a panicking test.
struct StateGuard<'a, S> {
    state: S,
    teardown: &'a Teardown<S>,
}

impl<S> Deref for StateGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

impl<S> Drop for StateGuard<'_, S> {
    fn drop(&mut self) {
        debug!("tearing down shared state");
        (self.teardown)(&mut self.state);
    }
}

/// Builds a [Suite], validating the concurrency level and the table.
pub struct Builder<S> {
    tests: Tests<S>,
    mode: Mode,
    level: usize,
    allow_empty: bool,
    include: Option<Regex>,
    exclude: Option<Regex>,
    report: ReportOptions,
    setup: Setup<S>,
    teardown: Teardown<S>,
}

impl<S: Default + 'static> Builder<S> {
    /// A builder whose shared state starts as `S::default()`.
    pub fn new() -> Self {
        Self::with_setup(|| Ok(S::default()))
    }
}

impl<S: Default + 'static> Default for Builder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Builder<S> {
    /// A builder that creates the shared state with `setup` at the start of
    /// every run. When `setup` fails the run aborts before any test.
    pub fn with_setup<F>(setup: F) -> Self
    where
        F: Fn() -> anyhow::Result<S> + Send + Sync + 'static,
    {
        Self {
            tests: Tests::new(),
            mode: Mode::default(),
            level: 0,
            allow_empty: false,
            include: None,
            exclude: None,
            report: ReportOptions::default(),
            setup: Box::new(setup),
            teardown: Box::new(|_| ()),
        }
    }

    /// Run `teardown` on the shared state after every run.
    pub fn teardown<F>(mut self, teardown: F) -> Self
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        self.teardown = Box::new(teardown);
        self
    }

    /// Add a test. A test with the same name is replaced.
    pub fn test<F>(mut self, name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&S) -> TestResult + Send + Sync + 'static,
    {
        self.tests.insert(name.into(), Box::new(test));
        self
    }

    /// Add every test of `tests`.
    pub fn tests(mut self, tests: Tests<S>) -> Self {
        self.tests.extend(tests);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of workers including the calling thread; `0` runs every test
    /// on its own worker.
    pub fn concurrency(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Accept an empty table, which then passes trivially.
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Keep only tests whose name matches.
    pub fn with_include_filter(mut self, include: Option<Regex>) -> Self {
        self.include = include;
        self
    }

    /// Remove tests whose name matches.
    pub fn with_exclude_filter(mut self, exclude: Option<Regex>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn report(mut self, report: ReportOptions) -> Self {
        self.report = report;
        self
    }

    /// Apply the filters and validate the table and concurrency level.
    pub fn build(self) -> Result<Suite<S>, Error> {
        let Builder {
            tests,
            mode,
            level,
            allow_empty,
            include,
            exclude,
            report,
            setup,
            teardown,
        } = self;

        let tests: Vec<(String, Test<S>)> = tests
            .into_iter()
            .filter(|(name, _)| {
                include.as_ref().map_or(true, |inc| inc.is_match(name))
                    && !exclude.as_ref().map_or(false, |ex| ex.is_match(name))
            })
            .collect();

        if tests.is_empty() && !allow_empty {
            return Err(Error::InvalidArgument(
                "a test suite needs at least one test".to_string(),
            ));
        }

        let level = check_concurrency_level(tests.len(), level)?;

        Ok(Suite {
            tests,
            strategy: Dispatch::new(mode, level),
            level,
            report,
            setup,
            teardown,
        })
    }
}

/// A validated, immutable test suite.
pub struct Suite<S> {
    tests: Vec<(String, Test<S>)>,
    strategy: Dispatch,
    level: usize,
    report: ReportOptions,
    setup: Setup<S>,
    teardown: Teardown<S>,
}

impl<S: Default + 'static> Suite<S> {
    /// A concurrent suite over `tests` with default shared state.
    pub fn new(tests: Tests<S>, level: usize) -> Result<Self, Error> {
        Builder::new().tests(tests).concurrency(level).build()
    }
}

impl<S> Suite<S> {
    /// Number of tests in the suite.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// The resolved concurrency level.
    pub fn concurrency_level(&self) -> usize {
        self.level
    }

    /// Test names in execution order for sequential runs.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|(name, _)| name.as_str())
    }

    /// Run every test and write progress lines to `out`.
    ///
    /// Assertion failures are counted and reported in the summary. Any other
    /// error from a test aborts the run and is returned as [Error::Fault]
    /// once running workers have stopped; a panicking test unwinds through
    /// this call. In both cases the shared state is torn down exactly once.
    pub fn run<W>(&self, out: W) -> Result<Summary, Error>
    where
        S: Sync,
        W: Write + Send,
    {
        let reporter = Reporter::new(out, self.report);
        let total = self.tests.len();
        reporter.begin(total, self.strategy.label())?;
        debug!(
            tests = total,
            level = self.level,
            strategy = self.strategy.label(),
            "starting run"
        );

        let state = StateGuard {
            state: (self.setup)().map_err(Error::Setup)?,
            teardown: &self.teardown,
        };
        let failures = Mutex::new(Vec::new());

        let dispatched = self.strategy.run(&self.tests, |(name, test)| {
            try_one(name, test, &*state, &reporter, &failures)
        });
        drop(state);

        if let Err(Error::Fault { test, .. }) = &dispatched {
            warn!(test = %test, "run aborted by a fault");
        }
        let failed = dispatched?;

        let summary = Summary::new(total, failures.into_inner());
        debug_assert_eq!(failed, summary.failed);
        reporter.summary(&summary)?;
        Ok(summary)
    }
}

/// Run one test, reporting and recording an assertion failure. Returns
/// whether the test passed; faults propagate.
fn try_one<S, W: Write>(
    name: &str,
    test: &Test<S>,
    state: &S,
    reporter: &Reporter<W>,
    failures: &Mutex<Vec<Failure>>,
) -> Result<bool, Error> {
    reporter.executing(name)?;
    match test(state) {
        Ok(()) => {
            reporter.passed(name)?;
            Ok(true)
        }
        Err(TestError::Assertion(failure)) => {
            reporter.failed(name, &failure)?;
            failures.lock().push(Failure {
                test: name.to_string(),
                message: failure.to_string(),
            });
            Ok(false)
        }
        Err(TestError::Fault(cause)) => Err(Error::Fault {
            test: name.to_string(),
            cause,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{ensure, fail};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn out_of(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_table_is_rejected_by_default() {
        let res = Builder::<()>::new().build();
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn empty_table_passes_when_allowed() {
        let suite = Builder::<()>::new().allow_empty(true).build().unwrap();
        assert_eq!(suite.concurrency_level(), 1);
        let mut buf = Vec::new();
        let summary = suite.run(&mut buf).unwrap();
        assert!(summary.passed());
        assert_eq!(summary.total, 0);
        let out = out_of(buf);
        assert!(!out.contains("Executing"));
        assert!(out.ends_with("Tests passed: 0/0\nA WINNER IS YOU\n"));
    }

    #[test]
    fn level_is_validated_at_build() {
        let res = Builder::<()>::new()
            .test("a", |_| Ok(()))
            .concurrency(2)
            .build();
        assert!(matches!(res, Err(Error::OutOfRange { level: 2, size: 1 })));
    }

    #[test]
    fn zero_level_resolves_to_suite_size() {
        let suite = Builder::<()>::new()
            .test("a", |_| Ok(()))
            .test("b", |_| Ok(()))
            .test("c", |_| Ok(()))
            .build()
            .unwrap();
        assert_eq!(suite.concurrency_level(), 3);
    }

    #[test]
    fn filters_apply_before_validation() {
        let builder = || {
            Builder::<()>::new()
                .test("parse::ok", |_| Ok(()))
                .test("parse::err", |_| Ok(()))
                .test("eval::ok", |_| Ok(()))
        };
        let suite = builder()
            .with_include_filter(Some(Regex::new("^parse").unwrap()))
            .with_exclude_filter(Some(Regex::new("err$").unwrap()))
            .build()
            .unwrap();
        assert_eq!(suite.names().collect::<Vec<_>>(), vec!["parse::ok"]);

        let res = builder()
            .with_include_filter(Some(Regex::new("^lower").unwrap()))
            .build();
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn setup_failure_skips_tests_and_teardown() {
        let torn = Arc::new(AtomicUsize::new(0));
        let torn_c = Arc::clone(&torn);
        let suite = Builder::<u32>::with_setup(|| anyhow::bail!("no db"))
            .teardown(move |_| {
                torn_c.fetch_add(1, Ordering::SeqCst);
            })
            .test("a", |_| fail("should not run"))
            .build()
            .unwrap();
        let mut buf = Vec::new();
        let err = suite.run(&mut buf).unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
        assert_eq!(torn.load(Ordering::SeqCst), 0);
        assert!(!out_of(buf).contains("Executing"));
    }

    #[test]
    fn teardown_sees_state_mutated_by_tests() {
        let total = Arc::new(AtomicUsize::new(0));
        let total_c = Arc::clone(&total);
        let suite = Builder::<AtomicUsize>::new()
            .teardown(move |hits| {
                total_c.store(*hits.get_mut(), Ordering::SeqCst);
            })
            .test("one", |hits| {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .test("two", |hits| {
                hits.fetch_add(2, Ordering::SeqCst);
                ensure(true, "unused")
            })
            .build()
            .unwrap();
        suite.run(std::io::sink()).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn summary_display() {
        let summary = Summary::new(
            4,
            vec![Failure {
                test: "x".to_string(),
                message: "boom".to_string(),
            }],
        );
        assert_eq!(summary.to_string(), "3 passing / 1 failing");
        assert_eq!(summary.failed_tests().collect::<Vec<_>>(), vec!["x"]);
    }
}
