//! Logging Setup
//!
//! Installs the global `tracing` subscriber from [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Configured file, else stderr
    pub fn from_config(config: &LoggingConfig) -> Self {
        match &config.file {
            Some(path) => LogTarget::File(PathBuf::from(path)),
            None => LogTarget::Stderr,
        }
    }

    /// Configured file, else the default log file
    ///
    /// Used when stderr belongs to a full-screen UI.
    pub fn file_from_config(config: &LoggingConfig) -> Self {
        match &config.file {
            Some(path) => LogTarget::File(PathBuf::from(path)),
            None => LogTarget::File(default_log_file()),
        }
    }
}

/// `<cache dir>/telemetry-view/telemetry-view.log`
pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("telemetry-view")
        .join("telemetry-view.log")
}

/// Filter at the configured level for this crate's library and binaries,
/// unless `RUST_LOG` is set
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "telemetry_view={level},telemetry_agent={level},tower_http=info",
            level = config.level
        ))
    })
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig, target: LogTarget) -> anyhow::Result<()> {
    let filter = env_filter(config);
    let json = config.format.eq_ignore_ascii_case("json");

    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .try_init()?;
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()?;
            }
        }
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .try_init()?;
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()?;
            }
        }
    }

    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_config() {
        let mut config = LoggingConfig::default();
        assert_eq!(LogTarget::from_config(&config), LogTarget::Stderr);
        assert_eq!(
            LogTarget::file_from_config(&config),
            LogTarget::File(default_log_file())
        );

        config.file = Some("/tmp/view.log".to_string());
        assert_eq!(
            LogTarget::from_config(&config),
            LogTarget::File(PathBuf::from("/tmp/view.log"))
        );
    }

    #[test]
    fn test_default_log_file_name() {
        let path = default_log_file();
        assert!(path.ends_with("telemetry-view/telemetry-view.log"));
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("view.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
