use super::Strategy;

/// Runs every job on the calling thread, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sequential;

impl Strategy for Sequential {
    fn label(&self) -> &'static str {
        "sequentially"
    }

    fn run<J, E, F>(&self, jobs: &[J], job: F) -> Result<usize, E>
    where
        J: Sync,
        E: Send,
        F: Fn(&J) -> Result<bool, E> + Sync,
    {
        let mut failed = 0;
        for j in jobs {
            if !job(j)? {
                failed += 1;
            }
        }
        Ok(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn visits_in_order_and_counts() {
        let seen = Mutex::new(Vec::new());
        let failed = Sequential
            .run(&[1, 2, 3, 4], |n: &i32| -> Result<bool, ()> {
                seen.lock().push(*n);
                Ok(n % 2 == 1)
            })
            .unwrap();
        assert_eq!(failed, 2);
        assert_eq!(*seen.lock(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn stops_at_first_error() {
        let seen = Mutex::new(Vec::new());
        let res = Sequential.run(&["a", "b", "c"], |name: &&str| {
            seen.lock().push(*name);
            if *name == "b" {
                Err("boom")
            } else {
                Ok(true)
            }
        });
        assert_eq!(res, Err("boom"));
        assert_eq!(*seen.lock(), vec!["a", "b"]);
    }
}
