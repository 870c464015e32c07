use crate::errors::Error;

/// Resolve the concurrency level for a suite of `suite_size` tests.
///
/// A level of `0` asks for maximum parallelism, which is one worker per test
/// (or a single worker for an empty suite). Any other level must lie in
/// `1..=suite_size`, except that an empty suite always accepts `1`.
pub fn check_concurrency_level(
    suite_size: usize,
    level: usize,
) -> Result<usize, Error> {
    if level == 0 {
        return Ok(if suite_size == 0 { 1 } else { suite_size });
    }
    if (suite_size == 0 && level != 1) || (suite_size > 0 && level > suite_size)
    {
        return Err(Error::OutOfRange {
            level,
            size: suite_size,
        });
    }
    Ok(level)
}
