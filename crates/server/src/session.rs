//! Live chat session management
//!
//! Sessions hold one agent each and expire after an idle timeout. A
//! background task sweeps expired sessions; capacity is bounded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, watch};

use leadbot_agent::LeadAgent;
use leadbot_session::ReplyTimer;

use crate::ServerError;

/// One live chat session
pub struct Session {
    pub id: String,
    pub agent: Arc<LeadAgent>,
    pub created_at: Instant,
    pub last_activity: RwLock<Instant>,
    active: RwLock<bool>,
    /// Typing-delayed reply waiting to be delivered to subscribers
    pending_reply: Mutex<Option<ReplyTimer>>,
    typing_delay: Duration,
    reply_tx: broadcast::Sender<String>,
}

impl Session {
    pub fn new(id: impl Into<String>, agent: LeadAgent, typing_delay: Duration) -> Self {
        let (reply_tx, _) = broadcast::channel(16);
        Self {
            id: id.into(),
            agent: Arc::new(agent),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
            active: RwLock::new(true),
            pending_reply: Mutex::new(None),
            typing_delay,
            reply_tx,
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    pub fn is_active(&self) -> bool {
        *self.active.read()
    }

    /// Close the session, discarding any typing-delayed reply
    pub fn close(&self) {
        *self.active.write() = false;
        if let Some(timer) = self.pending_reply.lock().take() {
            timer.cancel();
        }
    }

    /// Deliver a reply to subscribers after the simulated typing delay.
    ///
    /// Scheduling a new reply replaces (and discards) any pending one.
    pub fn schedule_delivery(&self, reply: String) {
        if !self.is_active() {
            return;
        }
        let tx = self.reply_tx.clone();
        let timer = ReplyTimer::schedule(self.typing_delay, move || {
            let _ = tx.send(reply);
        });
        *self.pending_reply.lock() = Some(timer);
    }

    /// Subscribe to typing-delayed reply deliveries
    pub fn subscribe_replies(&self) -> broadcast::Receiver<String> {
        self.reply_tx.subscribe()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
    typing_delay: Duration,
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout: Duration::from_secs(1800),
            cleanup_interval: Duration::from_secs(300),
            typing_delay: Duration::from_millis(900),
        }
    }

    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
        typing_delay: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
            typing_delay,
        }
    }

    /// Start a background task that periodically removes expired sessions.
    ///
    /// Returns a shutdown sender used to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                removed = before - after,
                                remaining = after,
                                "expired session cleanup"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a new session; `build` receives the generated session id
    pub fn create(
        &self,
        build: impl FnOnce(&str) -> LeadAgent,
    ) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);
            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Session("max sessions reached".to_string()));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let agent = build(&id);
        let session = Arc::new(Session::new(&id, agent, self.typing_delay));
        sessions.insert(id.clone(), session.clone());

        metrics::counter!("leadbot_sessions_created_total").increment(1);
        tracing::info!(session_id = %id, "created session");

        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session, closing it first
    pub fn remove(&self, id: &str) {
        if let Some(session) = self.sessions.write().remove(id) {
            session.close();
            tracing::info!(session_id = %id, "removed session");
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in expired {
            if let Some(session) = sessions.remove(&id) {
                session.close();
                tracing::info!(session_id = %id, "expired session");
            }
        }
    }

    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbot_agent::AgentConfig;

    fn manager() -> SessionManager {
        SessionManager::with_config(
            4,
            Duration::from_secs(60),
            Duration::from_secs(10),
            Duration::from_millis(10),
        )
    }

    fn build_agent(id: &str) -> LeadAgent {
        LeadAgent::new(id, AgentConfig::default())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let manager = manager();
        let session = manager.create(build_agent).unwrap();

        assert!(session.is_active());
        let fetched = manager.get(&session.id).unwrap();
        assert_eq!(fetched.id, session.id);
    }

    #[tokio::test]
    async fn test_remove_closes_session() {
        let manager = manager();
        let session = manager.create(build_agent).unwrap();
        let id = session.id.clone();

        manager.remove(&id);
        assert!(manager.get(&id).is_none());
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let manager = manager();
        for _ in 0..4 {
            manager.create(build_agent).unwrap();
        }
        assert!(manager.create(build_agent).is_err());
    }

    #[tokio::test]
    async fn test_close_discards_pending_delivery() {
        let manager = manager();
        let session = manager.create(build_agent).unwrap();
        let mut rx = session.subscribe_replies();

        session.schedule_delivery("delayed reply".to_string());
        session.close();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delivery_after_typing_delay() {
        let manager = manager();
        let session = manager.create(build_agent).unwrap();
        let mut rx = session.subscribe_replies();

        session.schedule_delivery("delayed reply".to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.try_recv().unwrap(), "delayed reply");
    }
}
