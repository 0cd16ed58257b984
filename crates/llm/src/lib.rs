//! Best-effort LLM reply augmentation
//!
//! The augmentation path is never load-bearing: the caller always computes a
//! rule-based reply first, makes at most one bounded-timeout attempt here,
//! and falls back on any failure. Everything works with this crate disabled.

pub mod client;
pub mod policy;

pub use client::{AugmentRequest, AugmentedReply, Augmentor, HttpAugmentor};
pub use policy::AugmentPolicy;

use thiserror::Error;

/// Augmentation errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Augmentation disabled")]
    Disabled,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}
