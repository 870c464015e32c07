//! Run settings read from a `trial.toml` file.
use serde::Deserialize;
use std::path::Path;

use crate::{errors::Error, executor::Mode};

/// Name of the configuration file looked up by [Config::discover].
pub const CONFIG_FILE: &str = "trial.toml";

/// Configuration for a trial run. Every key is optional.
///
/// ```toml
/// # Run tests one at a time or spread over workers.
/// mode = "concurrent"
/// # Workers including the calling thread. 0 uses one worker per test.
/// concurrency = 4
/// # Let a suite with no (remaining) tests pass.
/// allow_empty = false
/// # Regexes matched against test names.
/// include = "^parse"
/// exclude = "slow"
/// # Output options.
/// color = true
/// diff = true
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: Mode,
    pub concurrency: usize,
    pub allow_empty: bool,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub color: bool,
    pub diff: bool,
}

impl Config {
    /// Read a configuration file.
    pub fn from_path(conf_path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(conf_path).map_err(|err| {
            Error::Config(format!(
                "Failed to read {}: {}",
                conf_path.display(),
                err
            ))
        })?;

        toml::from_str(&contents).map_err(|err| {
            Error::Config(format!(
                "Failed to parse {}: {}",
                conf_path.display(),
                err
            ))
        })
    }

    /// Read `trial.toml` from `conf_dir`, falling back to the defaults when
    /// the directory has none.
    pub fn discover(conf_dir: &Path) -> Result<Self, Error> {
        let conf_path = conf_dir.join(CONFIG_FILE);
        if conf_path.is_file() {
            Self::from_path(&conf_path)
        } else {
            Ok(Self::default())
        }
    }
}
