//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The telemetry endpoint is not configurable; see
//! [`crate::transport::TELEMETRY_URL`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard (terminal UI) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// How often the UI polls for redraws and input
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl DashboardConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

/// Development agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Span of the pointer sample window
    #[serde(default = "default_window_secs")]
    pub window_secs: f64,

    /// Pause between feature reports
    #[serde(default = "default_send_interval")]
    pub send_interval_secs: f64,

    /// Pointer polling rate
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: u32,
}

fn default_window_secs() -> f64 {
    5.0
}

fn default_send_interval() -> f64 {
    2.0
}

fn default_sample_rate() -> u32 {
    60
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            send_interval_secs: default_send_interval(),
            sample_rate_hz: default_sample_rate(),
        }
    }
}

impl AgentConfig {
    pub fn window(&self) -> Duration {
        secs_or(self.window_secs, default_window_secs())
    }

    pub fn send_interval(&self) -> Duration {
        secs_or(self.send_interval_secs, default_send_interval())
    }
}

fn secs_or(value: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(value)
        .ok()
        .filter(|d| !d.is_zero())
        .unwrap_or_else(|| Duration::from_secs_f64(fallback))
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicitly named file with environment overrides
    pub fn load_explicit(path: &Path) -> Result<ConfigSearch, ConfigError> {
        Ok(ConfigSearch {
            config: Self::load_with_env(path)?,
            source: Some(path.to_path_buf()),
            errors: Vec::new(),
        })
    }

    /// Load from default locations or environment
    ///
    /// Nothing is logged here; the caller reports the outcome once logging
    /// is initialised.
    pub fn load_default() -> ConfigSearch {
        Self::search(&default_config_paths())
    }

    /// Load the first of `paths` that exists and parses
    ///
    /// Files that exist but fail to load are collected in
    /// [`ConfigSearch::errors`] and the search moves on.
    pub fn search(paths: &[PathBuf]) -> ConfigSearch {
        let mut errors = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return ConfigSearch {
                        config,
                        source: Some(path.clone()),
                        errors,
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        ConfigSearch {
            config: Self::from_env(),
            source: None,
            errors,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Dashboard overrides
        if let Some(rate) = lookup("TELEMETRY_TICK_RATE_MS").and_then(|s| s.parse().ok()) {
            self.dashboard.tick_rate_ms = rate;
        }

        // Agent overrides
        if let Some(secs) = lookup("TELEMETRY_AGENT_WINDOW_SECS").and_then(|s| s.parse().ok()) {
            self.agent.window_secs = secs;
        }
        if let Some(secs) = lookup("TELEMETRY_AGENT_SEND_INTERVAL_SECS").and_then(|s| s.parse().ok())
        {
            self.agent.send_interval_secs = secs;
        }
        if let Some(hz) = lookup("TELEMETRY_AGENT_SAMPLE_RATE_HZ").and_then(|s| s.parse().ok()) {
            self.agent.sample_rate_hz = hz;
        }

        // Logging overrides
        if let Some(level) = lookup("TELEMETRY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TELEMETRY_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(file) = lookup("TELEMETRY_LOG_FILE") {
            self.logging.file = Some(file);
        }
    }
}

/// Outcome of a config file search
#[derive(Debug)]
pub struct ConfigSearch {
    pub config: Config,

    /// File the config was read from; `None` means defaults plus environment
    pub source: Option<PathBuf>,

    /// Files that exist but could not be loaded
    pub errors: Vec<ConfigError>,
}

impl ConfigSearch {
    /// Log where the config came from and every file that was skipped
    pub fn report(&self) {
        for error in &self.errors {
            tracing::warn!("Skipping config file: {}", error);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Config file locations, in search order
pub fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::config_dir().map(|p| p.join("telemetry-view").join("config.toml")),
        Some(PathBuf::from("/etc/telemetry-view/config.toml")),
        Some(PathBuf::from("./config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Telemetry View Configuration
#
# The telemetry source is always ws://localhost:8765.
#
# Environment variables override these settings:
# - TELEMETRY_TICK_RATE_MS
# - TELEMETRY_AGENT_WINDOW_SECS
# - TELEMETRY_AGENT_SEND_INTERVAL_SECS
# - TELEMETRY_AGENT_SAMPLE_RATE_HZ
# - TELEMETRY_LOG_LEVEL
# - TELEMETRY_LOG_FORMAT
# - TELEMETRY_LOG_FILE

[dashboard]
# UI refresh and input poll interval (ms)
tick_rate_ms = 250

[agent]
# Span of the pointer sample window (seconds)
window_secs = 5.0

# Pause between feature reports (seconds)
send_interval_secs = 2.0

# Pointer polling rate (Hz)
sample_rate_hz = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path. The terminal dashboard always logs to a file,
# defaulting to <cache dir>/telemetry-view/telemetry-view.log
# file = "/var/log/telemetry-view/telemetry-view.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.dashboard.tick_rate(), Duration::from_millis(250));
        assert_eq!(config.agent.window(), Duration::from_secs(5));
        assert_eq!(config.agent.send_interval(), Duration::from_secs(2));
        assert_eq!(config.agent.sample_rate_hz, 60);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.dashboard.tick_rate_ms, 250);
        assert_eq!(config.agent.window_secs, 5.0);
        assert_eq!(config.agent.send_interval_secs, 2.0);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse("[agent]\nsend_interval_secs = 0.5\n").unwrap();
        assert_eq!(config.agent.send_interval(), Duration::from_millis(500));
        assert_eq!(config.agent.window(), Duration::from_secs(5));
        assert_eq!(config.dashboard.tick_rate_ms, 250);
    }

    #[test]
    fn test_invalid_durations_fall_back() {
        let config = Config::parse("[agent]\nwindow_secs = -1.0\nsend_interval_secs = 0.0\n")
            .unwrap();
        assert_eq!(config.agent.window(), Duration::from_secs(5));
        assert_eq!(config.agent.send_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard\ntick_rate_ms = ").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_search_reports_broken_file_and_moves_on() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[logging\nlevel = ").unwrap();
        std::fs::write(&good, "[dashboard]\ntick_rate_ms = 100\n").unwrap();

        let paths = [dir.path().join("missing.toml"), broken.clone(), good.clone()];
        let search = Config::search(&paths);
        assert_eq!(search.source.as_deref(), Some(good.as_path()));
        assert_eq!(search.errors.len(), 1);
        assert!(matches!(
            &search.errors[0],
            ConfigError::Parse { path, .. } if path == &broken
        ));
    }

    #[test]
    fn test_search_with_only_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        std::fs::write(&broken, "not = [valid").unwrap();

        let search = Config::search(&[broken]);
        assert!(search.source.is_none());
        assert_eq!(search.errors.len(), 1);
        assert!(search.errors[0].to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_search_without_files_has_no_errors() {
        let dir = tempfile::tempdir().unwrap();
        let search = Config::search(&[dir.path().join("missing.toml")]);
        assert!(search.source.is_none());
        assert!(search.errors.is_empty());
    }

    #[test]
    fn test_load_explicit_records_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent]\nsample_rate_hz = 30").unwrap();

        let search = Config::load_explicit(file.path()).unwrap();
        assert_eq!(search.source.as_deref(), Some(file.path()));
        assert!(search.errors.is_empty());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TELEMETRY_TICK_RATE_MS", "100"),
            ("TELEMETRY_AGENT_SAMPLE_RATE_HZ", "120"),
            ("TELEMETRY_AGENT_WINDOW_SECS", "not-a-number"),
            ("TELEMETRY_LOG_FILE", "/tmp/view.log"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.dashboard.tick_rate_ms, 100);
        assert_eq!(config.agent.sample_rate_hz, 120);
        assert_eq!(config.agent.window_secs, 5.0);
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/view.log"));
    }
}
