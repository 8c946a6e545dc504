//! Process configuration read from the environment at startup.

use anyhow::{bail, Context, Result};
use std::{path::PathBuf, time::Duration};

use duely_storage::Database;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const REMINDER_INTERVAL_SECS: &str = "REMINDER_INTERVAL_SECS";
pub const REMINDER_WINDOW_MINUTES: &str = "REMINDER_WINDOW_MINUTES";
pub const REMINDER_REPEAT: &str = "REMINDER_REPEAT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_WINDOW_MINUTES: i64 = 60;
/// Upper bound for both timing settings: one year
const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;
const MAX_WINDOW_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file, or `:memory:`
    pub database_path: PathBuf,
    pub bind_addr: String,
    /// Time between two reminder scans
    pub reminder_interval: Duration,
    /// How far past "now" a scan looks for due tasks
    pub reminder_window: chrono::Duration,
    /// Re-notify on every scan instead of once per due date
    pub reminder_repeat: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Database::default_db_path(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            reminder_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            reminder_window: chrono::Duration::minutes(DEFAULT_WINDOW_MINUTES),
            reminder_repeat: false,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparsable or out-of-range value
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup; unset keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is unparsable or out of range
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(DATABASE_URL) {
            config.database_path = parse_database_url(&url)?;
        }

        if let Some(addr) = lookup(BIND_ADDR) {
            let addr = addr.trim();
            if addr.is_empty() {
                bail!("{BIND_ADDR} must not be empty");
            }
            config.bind_addr = addr.to_string();
        }

        if let Some(raw) = lookup(REMINDER_INTERVAL_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{REMINDER_INTERVAL_SECS} is not a number: {raw}"))?;
            if secs == 0 || secs > MAX_INTERVAL_SECS {
                bail!("{REMINDER_INTERVAL_SECS} must be between 1 and {MAX_INTERVAL_SECS}");
            }
            config.reminder_interval = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(REMINDER_WINDOW_MINUTES) {
            let minutes: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{REMINDER_WINDOW_MINUTES} is not a number: {raw}"))?;
            if minutes <= 0 || minutes > MAX_WINDOW_MINUTES {
                bail!("{REMINDER_WINDOW_MINUTES} must be between 1 and {MAX_WINDOW_MINUTES}");
            }
            config.reminder_window = chrono::Duration::try_minutes(minutes)
                .with_context(|| format!("{REMINDER_WINDOW_MINUTES} is out of range: {raw}"))?;
        }

        if let Some(raw) = lookup(REMINDER_REPEAT) {
            config.reminder_repeat = parse_bool(&raw)
                .with_context(|| format!("{REMINDER_REPEAT} is not a boolean: {raw}"))?;
        }

        Ok(config)
    }
}

/// Accepts a bare path or a `sqlite:` / `sqlite://` URL.
fn parse_database_url(url: &str) -> Result<PathBuf> {
    let url = url.trim();
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    if path.is_empty() {
        bail!("{DATABASE_URL} does not name a database file: {url}");
    }
    Ok(PathBuf::from(path))
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized boolean `{other}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reminder_interval, Duration::from_secs(60));
        assert_eq!(config.reminder_window, chrono::Duration::hours(1));
        assert!(!config.reminder_repeat);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = config_from(&[
            (DATABASE_URL, "sqlite:///tmp/tasks.db"),
            (BIND_ADDR, "0.0.0.0:3000"),
            (REMINDER_INTERVAL_SECS, "5"),
            (REMINDER_WINDOW_MINUTES, "90"),
            (REMINDER_REPEAT, "yes"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/tasks.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.reminder_interval, Duration::from_secs(5));
        assert_eq!(config.reminder_window, chrono::Duration::minutes(90));
        assert!(config.reminder_repeat);
    }

    #[test]
    fn test_database_url_forms() {
        assert_eq!(
            parse_database_url("sqlite:tasks.db").unwrap(),
            PathBuf::from("tasks.db")
        );
        assert_eq!(
            parse_database_url(":memory:").unwrap(),
            PathBuf::from(":memory:")
        );
        assert!(parse_database_url("sqlite://").is_err());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(config_from(&[(REMINDER_INTERVAL_SECS, "0")]).is_err());
        assert!(config_from(&[(REMINDER_INTERVAL_SECS, "soon")]).is_err());
        assert!(config_from(&[(REMINDER_WINDOW_MINUTES, "-5")]).is_err());
        assert!(config_from(&[(REMINDER_REPEAT, "maybe")]).is_err());
        assert!(config_from(&[(BIND_ADDR, "  ")]).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_timing_without_panicking() {
        assert!(config_from(&[(REMINDER_WINDOW_MINUTES, "9223372036854775807")]).is_err());
        assert!(config_from(&[(REMINDER_WINDOW_MINUTES, "1000000000000")]).is_err());
        assert!(config_from(&[(REMINDER_INTERVAL_SECS, "18446744073709551615")]).is_err());
        assert!(config_from(&[(REMINDER_INTERVAL_SECS, "31536001")]).is_err());

        let config = config_from(&[
            (REMINDER_WINDOW_MINUTES, "525600"),
            (REMINDER_INTERVAL_SECS, "31536000"),
        ])
        .unwrap();
        assert_eq!(config.reminder_window, chrono::Duration::days(365));
        assert_eq!(config.reminder_interval, Duration::from_secs(31_536_000));
    }
}
