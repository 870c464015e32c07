//! Table-driven tests: one function checked against many expected results.
use std::fmt::Debug;

use crate::{
    assert::{AssertionFailure, TestError, TestResult},
    executor::{Concurrent, Mode, Sequential, Strategy},
};

type Function<X, C, R> =
    Box<dyn Fn(&X, &C) -> Result<R, TestError> + Send + Sync>;
type Comparator<R> = Box<dyn Fn(&R, &R) -> bool + Send + Sync>;

/// Runs a function over a table of test cases and compares every result
/// against the expected one.
///
/// In sequential mode the first mismatch stops the run. In concurrent mode
/// every case runs on its own worker and one of the mismatches, if any, is
/// returned once all workers are done.
pub struct MultiTest<C, R, X = ()> {
    function: Function<X, C, R>,
    cases: Vec<(C, R)>,
    mode: Mode,
    eq: Comparator<R>,
}

impl<C, R> MultiTest<C, R, ()>
where
    C: 'static,
    R: PartialEq + 'static,
{
    /// Check `function` against every `(case, expected)` pair in `table`.
    pub fn new<F, T>(function: F, table: T, mode: Mode) -> Self
    where
        F: Fn(&C) -> R + Send + Sync + 'static,
        T: IntoIterator<Item = (C, R)>,
    {
        Self::try_with_context(
            move |_: &(), case: &C| Ok(function(case)),
            table,
            mode,
        )
    }
}

impl<C, R, X> MultiTest<C, R, X>
where
    C: 'static,
    R: PartialEq + 'static,
    X: 'static,
{
    /// Like [MultiTest::new] for functions that read a shared context.
    pub fn with_context<F, T>(function: F, table: T, mode: Mode) -> Self
    where
        F: Fn(&X, &C) -> R + Send + Sync + 'static,
        T: IntoIterator<Item = (C, R)>,
    {
        Self::try_with_context(
            move |ctx: &X, case: &C| Ok(function(ctx, case)),
            table,
            mode,
        )
    }

    /// Like [MultiTest::with_context] for functions that can fail. Their
    /// errors are returned from the run unchanged.
    pub fn try_with_context<F, T>(function: F, table: T, mode: Mode) -> Self
    where
        F: Fn(&X, &C) -> Result<R, TestError> + Send + Sync + 'static,
        T: IntoIterator<Item = (C, R)>,
    {
        Self {
            function: Box::new(function),
            cases: table.into_iter().collect(),
            mode,
            eq: Box::new(|expected: &R, actual: &R| expected == actual),
        }
    }
}

impl<C, R, X> MultiTest<C, R, X> {
    /// Compare results with `eq` instead of `PartialEq`, for example to allow
    /// a tolerance on floating point results.
    pub fn with_comparator<E>(mut self, eq: E) -> Self
    where
        E: Fn(&R, &R) -> bool + Send + Sync + 'static,
    {
        self.eq = Box::new(eq);
        self
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Apply the function to one case and compare.
    fn check(
        &self,
        ctx: &X,
        case: &C,
        expected: &R,
    ) -> Result<bool, TestError>
    where
        C: Debug,
        R: Debug,
    {
        let actual = (self.function)(ctx, case)?;
        if (self.eq)(expected, &actual) {
            Ok(true)
        } else {
            Err(AssertionFailure::new(format!("Test case {:?} failed", case))
                .with_mismatch(expected, &actual)
                .into())
        }
    }

    /// Run every case against `ctx`.
    pub fn run_with(&self, ctx: &X) -> TestResult
    where
        C: Debug + Sync,
        R: Debug + Sync,
        X: Sync,
    {
        let job = |(case, expected): &(C, R)| self.check(ctx, case, expected);
        let dispatched = match self.mode {
            Mode::Sequential => Sequential.run(&self.cases, job),
            Mode::Concurrent => {
                Concurrent::new(self.cases.len()).run(&self.cases, job)
            }
        };
        dispatched.map(|_| ())
    }
}

impl<C, R> MultiTest<C, R, ()> {
    /// Run every case.
    pub fn run(&self) -> TestResult
    where
        C: Debug + Sync,
        R: Debug + Sync,
    {
        self.run_with(&())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::{
        collections::BTreeMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    fn square(x: &i64) -> i64 {
        x * x
    }

    fn table(entries: &[(i64, i64)]) -> BTreeMap<i64, i64> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn squares_pass_in_both_modes() {
        for &mode in &[Mode::Sequential, Mode::Concurrent] {
            let cases = table(&[(1, 1), (2, 4), (3, 9)]);
            let test = MultiTest::new(square, cases, mode);
            assert!(test.run().is_ok());
        }
    }

    #[test]
    fn mismatch_names_the_case() {
        for &mode in &[Mode::Sequential, Mode::Concurrent] {
            let cases = table(&[(1, 1), (2, 5), (3, 9)]);
            let test = MultiTest::new(square, cases, mode);
            let err = test.run().unwrap_err();
            let failure = err.as_assertion().unwrap();
            assert_eq!(failure.message(), "Test case 2 failed");
            let mismatch = failure.mismatch().unwrap();
            assert_eq!(mismatch.expected, "5");
            assert_eq!(mismatch.actual, "4");
        }
    }

    #[test]
    fn empty_table_passes() {
        for &mode in &[Mode::Sequential, Mode::Concurrent] {
            let test = MultiTest::new(square, Vec::new(), mode);
            assert!(test.is_empty());
            assert!(test.run().is_ok());
        }
    }

    #[test]
    fn sequential_stops_at_first_mismatch() {
        let seen = Mutex::new(Vec::new());
        let test = MultiTest::try_with_context(
            |seen: &Mutex<Vec<i64>>, x: &i64| {
                seen.lock().push(*x);
                Ok(x + 1)
            },
            table(&[(1, 2), (2, 0), (3, 4)]),
            Mode::Sequential,
        );
        assert!(test.run_with(&seen).is_err());
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn concurrent_runs_every_case() {
        let seen = Mutex::new(Vec::new());
        let test = MultiTest::try_with_context(
            |seen: &Mutex<Vec<i64>>, x: &i64| {
                seen.lock().push(*x);
                Ok(x + 1)
            },
            table(&[(1, 2), (2, 0), (3, 4), (4, 0)]),
            Mode::Concurrent,
        );
        let err = test.run_with(&seen).unwrap_err();
        let message = err.as_assertion().unwrap().message().to_string();
        assert!(
            message == "Test case 2 failed" || message == "Test case 4 failed"
        );
        let mut seen = seen.into_inner();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn context_is_passed_through() {
        let test = MultiTest::with_context(
            |base: &i64, x: &i64| base + x,
            vec![(1, 11), (2, 12)],
            Mode::Concurrent,
        );
        assert!(test.run_with(&10).is_ok());
        assert!(test.run_with(&11).is_err());
    }

    #[test]
    fn comparator_allows_tolerance() {
        let test = MultiTest::new(
            |x: &u32| 1.0 / f64::from(*x),
            vec![(3, 0.333_333), (7, 0.142_857)],
            Mode::Sequential,
        );
        assert!(test.run().is_err());
        let test = test.with_comparator(|a, b| (a - b).abs() < 1e-5);
        assert!(test.run().is_ok());
    }

    fn faulty_on_two(mode: Mode) -> MultiTest<i64, i64, AtomicUsize> {
        MultiTest::try_with_context(
            |calls: &AtomicUsize, x: &i64| {
                calls.fetch_add(1, Ordering::SeqCst);
                if *x == 2 {
                    Err(anyhow::anyhow!("overflow").into())
                } else {
                    Ok(*x)
                }
            },
            table(&[(1, 1), (2, 2), (3, 3)]),
            mode,
        )
    }

    #[test]
    fn sequential_fault_skips_remaining_cases() {
        let calls = AtomicUsize::new(0);
        let err = faulty_on_two(Mode::Sequential)
            .run_with(&calls)
            .unwrap_err();
        assert!(!err.is_assertion());
        assert_eq!(err.to_string(), "overflow");
        assert_eq!(calls.into_inner(), 2);
    }

    #[test]
    fn concurrent_fault_lets_other_cases_finish() {
        let calls = AtomicUsize::new(0);
        let err = faulty_on_two(Mode::Concurrent)
            .run_with(&calls)
            .unwrap_err();
        assert!(!err.is_assertion());
        assert_eq!(err.to_string(), "overflow");
        assert_eq!(calls.into_inner(), 3);
    }
}
