use std::{
    ops::Range,
    panic,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use tracing::debug;

use super::Strategy;

/// Spreads jobs over `level` workers, one of which is the calling thread.
///
/// Workers are scoped threads, so every job finishes before [Strategy::run]
/// returns and jobs may borrow from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Concurrent {
    level: usize,
}

impl Concurrent {
    pub fn new(level: usize) -> Self {
        Self { level }
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

/// Split `len` jobs over `level` workers.
///
/// Returns the ranges owned by the `level - 1` spawned workers and the range
/// the calling thread runs itself. The caller picks up the remainder of the
/// uneven division.
pub(crate) fn partition(
    len: usize,
    level: usize,
) -> (Vec<Range<usize>>, Range<usize>) {
    if len == 0 {
        return (Vec::new(), 0..0);
    }
    let level = level.max(1).min(len);
    let per = len / level;
    let spawned = (0..level - 1).map(|i| i * per..(i + 1) * per).collect();
    (spawned, (level - 1) * per..len)
}

impl Strategy for Concurrent {
    fn label(&self) -> &'static str {
        "concurrently"
    }

    fn run<J, E, F>(&self, jobs: &[J], job: F) -> Result<usize, E>
    where
        J: Sync,
        E: Send,
        F: Fn(&J) -> Result<bool, E> + Sync,
    {
        if jobs.is_empty() {
            return Ok(0);
        }

        let failed = AtomicUsize::new(0);
        let (spawned, inline) = partition(jobs.len(), self.level);
        debug!(
            jobs = jobs.len(),
            workers = spawned.len() + 1,
            inline = inline.len(),
            "dispatching concurrently"
        );

        // A worker stops its own chunk at the first error. Chunks already
        // handed to other workers still run to the end.
        let worker = |chunk: &[J]| -> Result<(), E> {
            for j in chunk {
                if !job(j)? {
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
            Ok(())
        };
        let worker = &worker;

        let outcome = thread::scope(|s| {
            let handles: Vec<_> = spawned
                .into_iter()
                .map(|range| s.spawn(move || worker(&jobs[range])))
                .collect();

            let inline_res = worker(&jobs[inline]);

            let mut first_err = None;
            let mut first_panic = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => (),
                    Ok(Err(err)) => {
                        first_err.get_or_insert(err);
                    }
                    Err(payload) => {
                        first_panic.get_or_insert(payload);
                    }
                }
            }
            if let Some(payload) = first_panic {
                panic::resume_unwind(payload);
            }
            match first_err {
                Some(err) => Err(err),
                None => inline_res,
            }
        });

        // Every worker has been joined, so the count is final.
        outcome.map(|()| failed.load(Ordering::Relaxed))
    }
}
