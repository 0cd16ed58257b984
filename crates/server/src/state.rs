//! Shared application state

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;

use leadbot_agent::AgentConfig;
use leadbot_config::Settings;
use leadbot_core::ChatSummary;
use leadbot_llm::{Augmentor, HttpAugmentor};
use leadbot_session::{FileSnapshotStore, HttpSummarySink, SnapshotStore, SummarySink};

use crate::session::SessionManager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    /// Ingested chat summaries keyed by id
    pub summaries: Arc<RwLock<HashMap<String, ChatSummary>>>,
    /// Persisted session contexts keyed by session id
    pub contexts: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    /// Augmentation backend, present only when enabled and constructible
    pub augmentor: Option<Arc<dyn Augmentor>>,
    /// Destination for end-of-session summaries
    pub summary_sink: Option<Arc<dyn SummarySink>>,
    /// Durable cross-visit snapshot storage
    pub snapshot_store: Arc<dyn SnapshotStore>,
    /// Configuration handed to each new agent
    pub agent_config: AgentConfig,
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let sessions = Arc::new(SessionManager::with_config(
            settings.session.max_sessions,
            Duration::from_secs(settings.session.session_timeout_secs),
            Duration::from_secs(settings.session.cleanup_interval_secs),
            Duration::from_millis(settings.session.typing_delay_ms),
        ));

        let augmentor: Option<Arc<dyn Augmentor>> = if settings.augment.enabled {
            match HttpAugmentor::new(&settings.augment) {
                Ok(augmentor) => Some(Arc::new(augmentor)),
                Err(e) => {
                    tracing::warn!(error = %e, "augmentor unavailable, running rule-based only");
                    None
                }
            }
        } else {
            None
        };

        let summary_sink: Option<Arc<dyn SummarySink>> =
            match HttpSummarySink::new(settings.session.summary_endpoint.clone()) {
                Ok(sink) => Some(Arc::new(sink)),
                Err(e) => {
                    tracing::warn!(error = %e, "summary sink unavailable, summaries will be dropped");
                    None
                }
            };

        let snapshot_store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(
            settings.session.snapshot_path.clone(),
            settings.session.snapshot_retention_days,
        ));

        let agent_config = AgentConfig {
            augment: settings.augment.clone(),
            rng_seed: settings.session.rng_seed,
            ..Default::default()
        };

        Self {
            settings: Arc::new(settings),
            sessions,
            summaries: Arc::new(RwLock::new(HashMap::new())),
            contexts: Arc::new(RwLock::new(HashMap::new())),
            augmentor,
            summary_sink,
            snapshot_store,
            agent_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(Arc::new(handle));
        self
    }
}
