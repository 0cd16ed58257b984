//! HTTP server for the lead-qualification chat engine
//!
//! Provides the chat endpoints, the summary/context ingestion endpoints, and
//! the llm-response endpoint consumed by the augmentation path.

pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler};
pub use session::{Session, SessionManager};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Session(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
