//! Prometheus metrics endpoint

use axum::extract::State;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;

/// Install the Prometheus recorder.
///
/// Returns None (and logs) if a recorder is already installed, which happens
/// in test binaries; counters then become no-ops, never errors.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "failed to install metrics recorder");
            None
        }
    }
}

/// Render the metrics snapshot
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
