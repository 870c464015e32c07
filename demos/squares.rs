//! A demo harness: a few tests sharing a counter plus a table-driven check.
//!
//! ```text
//! cargo run --example squares -- --sequential --diff
//! ```
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::Context;
use trial::{
    assert::{ensure, ensure_eq},
    executor::Mode,
    multi::MultiTest,
    suite::Builder,
};

fn squares() -> MultiTest<i64, i64> {
    let table: BTreeMap<i64, i64> =
        (0..16).map(|x| (x, x * x)).collect();
    MultiTest::new(|x: &i64| x * x, table, Mode::Concurrent)
}

fn main() {
    let suite = Builder::<AtomicUsize>::new()
        .teardown(|hits| {
            eprintln!("{} tests touched the counter", hits.get_mut());
        })
        .test("counter::increments", |hits| {
            let before = hits.fetch_add(1, Ordering::SeqCst);
            ensure(before < usize::MAX, "counter overflowed")
        })
        .test("parse::decimal", |hits| {
            hits.fetch_add(1, Ordering::SeqCst);
            let n = "42".parse::<i64>().context("parsing 42")?;
            ensure_eq(&42, &n, "decimal parse")
        })
        .test("squares::table", |_| squares().run())
        .test("squares::off_by_one", |_| {
            MultiTest::new(
                |x: &i64| x * x,
                vec![(3, 9), (4, 15)],
                Mode::Sequential,
            )
            .run()
        });

    std::process::exit(trial::harness::main(suite));
}
