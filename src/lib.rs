//! Trial is a small test-suite engine that runs named tests against a shared
//! piece of state, either one at a time or spread over worker threads.
//!
//! ## Testing Model
//! A suite is a table of named tests. Every test receives a reference to the
//! shared state of the run and either returns `Ok(())`, returns an
//! [assertion failure](assert::AssertionFailure), or returns a fault.
//! Assertion failures are counted and the remaining tests keep running.
//! Faults abort the run.
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use trial::{assert::{ensure, ensure_eq}, executor::Mode, suite::Builder};
//!
//! let suite = Builder::<AtomicUsize>::new()
//!     .mode(Mode::Sequential)
//!     .test("counts", |hits| {
//!         hits.fetch_add(1, Ordering::SeqCst);
//!         ensure(hits.load(Ordering::SeqCst) > 0, "no hits")
//!     })
//!     .test("adds", |_| ensure_eq(&4, &(2 + 2), "2 + 2"))
//!     .build()
//!     .unwrap();
//!
//! let mut out = Vec::new();
//! let summary = suite.run(&mut out).unwrap();
//! assert!(summary.passed());
//! assert!(String::from_utf8(out).unwrap().ends_with("A WINNER IS YOU\n"));
//! ```
//!
//! The shared state is created when a run starts and torn down when it ends,
//! even if a test aborted the run. The engine never locks it: tests that
//! mutate it under the concurrent mode use atomics or a mutex.
//!
//! ## Concurrency
//! A suite runs at a concurrency level `L` between 1 and the number of
//! tests; `0` picks one worker per test. The calling thread is one of the
//! `L` workers, so a run spawns `L - 1` threads and joins all of them before
//! it prints the summary.
//!
//! ## Table-driven Tests
//! A [MultiTest](multi::MultiTest) checks one function against a table of
//! inputs and expected outputs:
//!
//! ```
//! use std::collections::BTreeMap;
//! use trial::{executor::Mode, multi::MultiTest};
//!
//! let table: BTreeMap<i64, i64> = vec![(1, 1), (2, 5), (3, 9)].into_iter().collect();
//! let squares = MultiTest::new(|x: &i64| x * x, table, Mode::Concurrent);
//! let err = squares.run().unwrap_err();
//! assert_eq!(err.to_string(), "Test case 2 failed");
//! ```
//!
//! ## Harness Binaries
//! [harness::main] turns a suite into a command line program. Options can
//! also come from a `trial.toml` file:
//!
//! ```toml
//! mode = "concurrent"
//! concurrency = 4
//! include = "^parse"
//! diff = true
//! ```
//!
//! A run prints one line per event and a verdict:
//! ```text
//! Beginning 3 tests sequentially
//! Executing a
//! a passed
//! Executing b
//! b failed: x
//! Executing c
//! c passed
//! Tests passed: 2/3
//! WOW! YOU LOSE
//! ```
pub mod assert;
pub mod cli;
pub mod config;
pub mod diff;
pub mod errors;
pub mod executor;
pub mod harness;
pub mod logger;
pub mod multi;
pub mod report;
pub mod suite;
