//! Configuration management for HealthScan.
//!
//! Loads configuration from ${HEALTHSCAN_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Session resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on the initial session resolution.
    pub resolve_timeout_secs: u64,
    /// Lifetime of a persisted session.
    pub session_ttl_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_secs: 10,
            session_ttl_days: 7,
        }
    }
}

impl SessionConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }

    /// Lifetime of a new session. Must be a positive, representable number
    /// of days.
    pub fn session_ttl(&self) -> Result<TimeDelta> {
        let days = self.session_ttl_days;
        if days <= 0 {
            anyhow::bail!("session_ttl_days must be positive, got {days}");
        }
        TimeDelta::try_days(days)
            .with_context(|| format!("session_ttl_days {days} is out of range"))
    }
}

/// Interactive shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Idle poll interval for the event loop.
    pub tick_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

impl ShellConfig {
    pub fn tick(&self) -> Duration {
        // Zero would spin the event loop.
        Duration::from_millis(self.tick_ms.max(10))
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "healthscan.log".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub shell: ShellConfig,
    pub logging: LoggingConfig,
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path()?)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default template to `path`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

pub mod paths {
    //! Path resolution for HealthScan configuration and data directories.
    //!
    //! HEALTHSCAN_HOME resolution order:
    //! 1. HEALTHSCAN_HOME environment variable (if set)
    //! 2. ~/.config/healthscan (default)

    use std::path::PathBuf;

    use anyhow::{Context, Result};

    /// Returns the HealthScan home directory.
    pub fn healthscan_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("HEALTHSCAN_HOME") {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("healthscan"))
            .context("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(healthscan_home()?.join("config.toml"))
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(healthscan_home()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[session]\nresolve_timeout_secs = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.session.resolve_timeout(), Duration::from_secs(3));
        assert_eq!(config.session.session_ttl_days, 7);
        assert_eq!(config.shell, ShellConfig::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::init(&path).unwrap();
        let err = Config::init(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_tick_has_floor() {
        let shell = ShellConfig { tick_ms: 0 };
        assert_eq!(shell.tick(), Duration::from_millis(10));
    }

    #[test]
    fn test_session_ttl_range() {
        let ttl = |days| {
            SessionConfig {
                session_ttl_days: days,
                ..SessionConfig::default()
            }
            .session_ttl()
        };

        assert_eq!(ttl(7).unwrap(), TimeDelta::days(7));
        assert!(ttl(0).unwrap_err().to_string().contains("must be positive"));
        assert!(ttl(-3).is_err());
        let err = ttl(200_000_000_000_000).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[session\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }
}
