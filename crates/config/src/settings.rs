//! Runtime settings

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::augment::AugmentConfig;
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Session and summary configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// LLM augmentation configuration
    #[serde(default)]
    pub augment: AugmentConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; empty means localhost-only
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Session, snapshot, and summary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle timeout before a session is expired (seconds)
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// How often the expiry sweep runs (seconds)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Path of the durable snapshot file
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Snapshots older than this are discarded on load (days)
    #[serde(default = "default_retention_days")]
    pub snapshot_retention_days: u32,

    /// Endpoint chat summaries are posted to at session close
    #[serde(default = "default_summary_endpoint")]
    pub summary_endpoint: String,

    /// Sessions with fewer messages than this never post a summary
    #[serde(default = "default_min_messages")]
    pub min_messages_for_summary: usize,

    /// Simulated typing delay before a reply is delivered (milliseconds)
    #[serde(default = "default_typing_delay")]
    pub typing_delay_ms: u64,

    /// Seed for the responder's follow-up selection; None means entropy
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_max_sessions() -> usize {
    500
}
fn default_session_timeout() -> u64 {
    1800
}
fn default_cleanup_interval() -> u64 {
    300
}
fn default_snapshot_path() -> String {
    "data/leadbot_session.json".to_string()
}
fn default_retention_days() -> u32 {
    30
}
fn default_summary_endpoint() -> String {
    "http://localhost:3001/api/chat/summary".to_string()
}
fn default_min_messages() -> usize {
    3
}
fn default_typing_delay() -> u64 {
    900
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
            snapshot_path: default_snapshot_path(),
            snapshot_retention_days: default_retention_days(),
            summary_endpoint: default_summary_endpoint(),
            min_messages_for_summary: default_min_messages(),
            typing_delay_ms: default_typing_delay(),
            rng_seed: None,
        }
    }
}

/// Load settings from defaults, an optional TOML file, and the environment.
///
/// Priority: env vars (LEADBOT_ prefix) > file > defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path));
    }

    let config = builder
        .add_source(Environment::with_prefix("LEADBOT").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;

    if settings.session.min_messages_for_summary == 0 {
        return Err(ConfigError::InvalidValue {
            field: "session.min_messages_for_summary".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    tracing::debug!(port = settings.server.port, "Settings loaded");

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 3001);
        assert_eq!(settings.session.min_messages_for_summary, 3);
        assert_eq!(settings.session.snapshot_retention_days, 30);
        assert!(!settings.augment.enabled);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8088\n\n[session]\nmin_messages_for_summary = 5\n"
        )
        .unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.server.port, 8088);
        assert_eq!(settings.session.min_messages_for_summary, 5);
        // Untouched fields keep their defaults
        assert_eq!(settings.session.snapshot_retention_days, 30);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/leadbot.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
