//! Entry point for test binaries built on trial.
//!
//! A harness binary builds its suite and hands it to [main]:
//!
//! ```no_run
//! use trial::{assert::ensure, suite::Builder};
//!
//! fn main() {
//!     let suite = Builder::<()>::new().test("truth", |_| ensure(true, "lies"));
//!     std::process::exit(trial::harness::main(suite));
//! }
//! ```
use regex::Regex;
use structopt::StructOpt;
use tracing::info;

use crate::{
    cli::Opts,
    config::Config,
    errors::Error,
    logger,
    report::ReportOptions,
    suite::{Builder, Summary},
};

/// Exit code for a run where every test passed.
pub const EXIT_PASSED: i32 = 0;
/// Exit code for a run with assertion failures.
pub const EXIT_FAILED: i32 = 1;
/// Exit code for configuration errors and aborted runs.
pub const EXIT_ERROR: i32 = 2;

/// Load the configuration named by `opts`, or `trial.toml` from the current
/// directory.
pub fn load_config(opts: &Opts) -> Result<Config, Error> {
    match &opts.config {
        Some(path) => Config::from_path(path),
        None => Config::discover(&std::env::current_dir()?),
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>, Error> {
    pattern.map(Regex::new).transpose().map_err(Error::from)
}

/// Apply the configuration, overridden by command line options, to a suite
/// builder.
pub fn configure<S: 'static>(
    builder: Builder<S>,
    conf: &Config,
    opts: &Opts,
) -> Result<Builder<S>, Error> {
    let include =
        compile(opts.include_filter.as_deref().or(conf.include.as_deref()))?;
    let exclude =
        compile(opts.exclude_filter.as_deref().or(conf.exclude.as_deref()))?;

    Ok(builder
        .mode(opts.mode().unwrap_or(conf.mode))
        .concurrency(opts.jobs.unwrap_or(conf.concurrency))
        .allow_empty(opts.allow_empty().unwrap_or(conf.allow_empty))
        .with_include_filter(include)
        .with_exclude_filter(exclude)
        .report(ReportOptions {
            color: opts.color().unwrap_or(conf.color),
            diff: opts.diff().unwrap_or(conf.diff),
        }))
}

/// Configure, build and run a suite, writing progress to stdout.
pub fn run<S>(builder: Builder<S>, opts: &Opts) -> Result<Summary, Error>
where
    S: Sync + 'static,
{
    let conf = load_config(opts)?;
    let suite = configure(builder, &conf, opts)?.build()?;
    info!(
        tests = suite.len(),
        level = suite.concurrency_level(),
        "suite ready"
    );
    suite.run(std::io::stdout())
}

/// Parse the command line, run the suite and return the process exit code.
pub fn main<S>(builder: Builder<S>) -> i32
where
    S: Sync + 'static,
{
    let opts = Opts::from_args();
    logger::init_logger(opts.verbose);

    match run(builder, &opts) {
        Ok(summary) if summary.passed() => EXIT_PASSED,
        Ok(_) => EXIT_FAILED,
        Err(err) => {
            println!("error: {}", err);
            EXIT_ERROR
        }
    }
}
