//! Configuration for the lead-qualification chat engine
//!
//! Supports loading runtime settings from:
//! - TOML files
//! - Environment variables (LEADBOT_ prefix)
//!
//! The keyword tables, response templates, and augmentation policy are plain
//! data structs passed into the classifier and responder at construction, so
//! tests can run against overridden tables.

pub mod augment;
pub mod keywords;
pub mod responses;
pub mod settings;

pub use augment::AugmentConfig;
pub use keywords::{IntentPatterns, KeywordConfig};
pub use responses::ResponseTemplates;
pub use settings::{load_settings, ServerConfig, SessionConfig, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
