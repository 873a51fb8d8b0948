// SPDX-License-Identifier: MIT
//
// Runtime configuration.
//
// The command line carries only the file to view. Everything else comes
// from the environment, read once at startup:
//
//   BANKAI_LOG              tracing filter (e.g. `debug`); logging is off
//                           unless this is set
//   BANKAI_LOG_FILE         where log lines go (default: ./bankai.log)
//   BANKAI_KEY_TIMEOUT_MS   bounded wait per key read (default: 100)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use bankai_term::reader::DEFAULT_TIMEOUT;

pub const ENV_LOG: &str = "BANKAI_LOG";
pub const ENV_LOG_FILE: &str = "BANKAI_LOG_FILE";
pub const ENV_KEY_TIMEOUT: &str = "BANKAI_KEY_TIMEOUT_MS";

const DEFAULT_LOG_FILE: &str = "bankai.log";

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub file: PathBuf,
}

/// Everything the viewer needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File to view; `None` shows the welcome banner.
    pub path: Option<PathBuf>,
    /// Wait per key read. Clamped by the reader to 1..=1000 ms.
    pub key_timeout: Duration,
    /// `None` when logging is disabled.
    pub log: Option<LogConfig>,
}

impl Config {
    /// Build from the CLI path and the process environment.
    ///
    /// # Errors
    ///
    /// Fails if an environment knob is set to something unparseable.
    pub fn from_env(path: Option<PathBuf>) -> Result<Self> {
        Self::from_vars(path, |key| std::env::var(key).ok())
    }

    /// Build from the CLI path and an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_vars(path: Option<PathBuf>, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let set = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let key_timeout = match set(ENV_KEY_TIMEOUT) {
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{ENV_KEY_TIMEOUT}={raw:?} is not a number of milliseconds"))?;
                Duration::from_millis(ms)
            }
            None => DEFAULT_TIMEOUT,
        };

        let log = set(ENV_LOG).map(|filter| LogConfig {
            filter,
            file: set(ENV_LOG_FILE).map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
        });

        Ok(Self {
            path,
            key_timeout,
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_vars(None, |k| map.get(k).cloned())
    }

    #[test]
    fn defaults_with_empty_environment() {
        let c = config(&[]).unwrap();
        assert_eq!(
            c,
            Config {
                path: None,
                key_timeout: Duration::from_millis(100),
                log: None,
            }
        );
    }

    #[test]
    fn path_is_carried() {
        let c = Config::from_vars(Some(PathBuf::from("notes.txt")), |_| None).unwrap();
        assert_eq!(c.path, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn log_filter_enables_logging_with_default_file() {
        let c = config(&[(ENV_LOG, "debug")]).unwrap();
        assert_eq!(
            c.log,
            Some(LogConfig {
                filter: "debug".into(),
                file: PathBuf::from("bankai.log"),
            })
        );
    }

    #[test]
    fn log_file_override() {
        let c = config(&[(ENV_LOG, "trace"), (ENV_LOG_FILE, "/tmp/b.log")]).unwrap();
        assert_eq!(c.log.unwrap().file, PathBuf::from("/tmp/b.log"));
    }

    #[test]
    fn log_file_alone_does_not_enable_logging() {
        let c = config(&[(ENV_LOG_FILE, "/tmp/b.log")]).unwrap();
        assert_eq!(c.log, None);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let c = config(&[(ENV_LOG, "  "), (ENV_KEY_TIMEOUT, "")]).unwrap();
        assert_eq!(c.log, None);
        assert_eq!(c.key_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn key_timeout_parsed() {
        let c = config(&[(ENV_KEY_TIMEOUT, " 25 ")]).unwrap();
        assert_eq!(c.key_timeout, Duration::from_millis(25));
    }

    #[test]
    fn key_timeout_garbage_is_error() {
        let err = config(&[(ENV_KEY_TIMEOUT, "fast")]).unwrap_err();
        assert!(err.to_string().contains(ENV_KEY_TIMEOUT));
    }
}
