use crate::executor::Mode;
use std::path::PathBuf;
use structopt::StructOpt;

/// Options for a trial harness binary. They override `trial.toml`.
#[derive(StructOpt, Debug, Default)]
#[structopt(name = "trial", about = "Run a test suite.")]
pub struct Opts {
    /// Configuration file. Defaults to trial.toml in the current directory
    /// when it exists.
    #[structopt(short, long, parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Execution mode: sequential or concurrent.
    #[structopt(short, long, conflicts_with = "sequential")]
    pub mode: Option<Mode>,

    /// Run tests one at a time on the calling thread. Same as
    /// `--mode sequential`.
    #[structopt(short, long)]
    pub sequential: bool,

    /// Number of workers including the calling thread. 0 uses one worker per
    /// test.
    #[structopt(short, long)]
    pub jobs: Option<usize>,

    /// Only run tests whose name matches this regex.
    #[structopt(short, long = "include")]
    pub include_filter: Option<String>,

    /// Skip tests whose name matches this regex.
    #[structopt(short, long = "exclude")]
    pub exclude_filter: Option<String>,

    /// Let a suite with no tests left after filtering pass.
    #[structopt(long, conflicts_with = "no-allow-empty")]
    pub allow_empty: bool,

    /// Reject a suite with no tests left after filtering.
    #[structopt(long)]
    pub no_allow_empty: bool,

    /// Show diffs for failures that compare values.
    #[structopt(short, long, conflicts_with = "no-diff")]
    pub diff: bool,

    /// Never show diffs.
    #[structopt(long)]
    pub no_diff: bool,

    /// Colorize the output.
    #[structopt(long, conflicts_with = "no-color")]
    pub color: bool,

    /// Never colorize the output.
    #[structopt(long)]
    pub no_color: bool,

    /// Log dispatch decisions to stderr.
    #[structopt(short, long)]
    pub verbose: bool,
}

/// Collapse an on/off flag pair into an override.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

impl Opts {
    /// The mode requested on the command line, if any.
    pub fn mode(&self) -> Option<Mode> {
        if self.sequential {
            Some(Mode::Sequential)
        } else {
            self.mode
        }
    }

    /// Whether empty suites are allowed, if given on the command line.
    pub fn allow_empty(&self) -> Option<bool> {
        switch(self.allow_empty, self.no_allow_empty)
    }

    /// Whether to show diffs, if given on the command line.
    pub fn diff(&self) -> Option<bool> {
        switch(self.diff, self.no_diff)
    }

    /// Whether to colorize, if given on the command line.
    pub fn color(&self) -> Option<bool> {
        switch(self.color, self.no_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_flags() {
        let opts = Opts::from_iter(&[
            "trial", "-s", "-j", "3", "-i", "^parse", "-d",
        ]);
        assert!(opts.sequential);
        assert_eq!(opts.mode(), Some(Mode::Sequential));
        assert_eq!(opts.jobs, Some(3));
        assert_eq!(opts.include_filter.as_deref(), Some("^parse"));
        assert_eq!(opts.diff(), Some(true));
        assert_eq!(opts.color(), None);
    }

    #[test]
    fn defaults_leave_config_alone() {
        let opts = Opts::from_iter(&["trial"]);
        assert_eq!(opts.mode(), None);
        assert_eq!(opts.jobs, None);
        assert_eq!(opts.allow_empty(), None);
        assert_eq!(opts.diff(), None);
        assert_eq!(opts.color(), None);
        assert!(opts.config.is_none());
    }

    #[test]
    fn mode_by_name() {
        let opts = Opts::from_iter(&["trial", "--mode", "concurrent"]);
        assert_eq!(opts.mode(), Some(Mode::Concurrent));
        let opts = Opts::from_iter(&["trial", "-m", "sequential"]);
        assert_eq!(opts.mode(), Some(Mode::Sequential));
        assert!(Opts::from_iter_safe(&["trial", "--mode", "eager"]).is_err());
        assert!(
            Opts::from_iter_safe(&["trial", "-s", "--mode", "concurrent"])
                .is_err()
        );
    }

    #[test]
    fn negative_flags_turn_settings_off() {
        let opts = Opts::from_iter(&[
            "trial",
            "--no-color",
            "--no-diff",
            "--no-allow-empty",
        ]);
        assert_eq!(opts.color(), Some(false));
        assert_eq!(opts.diff(), Some(false));
        assert_eq!(opts.allow_empty(), Some(false));

        let opts = Opts::from_iter(&["trial", "--allow-empty", "--color"]);
        assert_eq!(opts.allow_empty(), Some(true));
        assert_eq!(opts.color(), Some(true));
        assert!(
            Opts::from_iter_safe(&["trial", "--color", "--no-color"]).is_err()
        );
    }
}
