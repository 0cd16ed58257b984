//! Chat summary construction and fire-and-forget submission

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

use leadbot_agent::ConversationState;
use leadbot_core::{ChatMessage, ChatSummary, Sender};

use crate::SessionError;

/// Truncation width per user message in the free-text recap
const RECAP_SNIPPET_LEN: usize = 50;

/// Build the write-once summary projection from the final state.
///
/// Qualification is recomputed here from the discussed sets, never carried
/// from intermediate turns.
pub fn build_summary(
    state: &ConversationState,
    messages: &[ChatMessage],
    closed_at: DateTime<Utc>,
) -> ChatSummary {
    let snippets: Vec<String> = messages
        .iter()
        .filter(|m| m.sender == Sender::User)
        .map(|m| m.content.chars().take(RECAP_SNIPPET_LEN).collect())
        .collect();
    let chat_summary = if snippets.is_empty() {
        "No visitor messages".to_string()
    } else {
        format!("Visitor discussed: {}", snippets.join("; "))
    };

    let next_step = if state.contact_info.is_complete() {
        "Schedule discovery call".to_string()
    } else if state.call_to_action_offered {
        "Follow up for remaining contact details".to_string()
    } else {
        "Nurture; no call to action offered yet".to_string()
    };

    ChatSummary {
        interaction_date: closed_at,
        contact_info: state.contact_info.clone(),
        chat_summary,
        services_discussed: state.services_discussed.clone(),
        key_pain_points: state.pain_points.clone(),
        call_to_action_offered: state.call_to_action_offered,
        next_step,
        lead_qualification: state.qualification(),
    }
}

/// Pluggable summary destination
#[async_trait]
pub trait SummarySink: Send + Sync {
    async fn submit(&self, summary: &ChatSummary) -> Result<(), SessionError>;
}

/// Sink that POSTs summaries to the ingestion endpoint
pub struct HttpSummarySink {
    client: Client,
    endpoint: String,
}

impl HttpSummarySink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| SessionError::Submission(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SummarySink for HttpSummarySink {
    async fn submit(&self, summary: &ChatSummary) -> Result<(), SessionError> {
        let response = self.client.post(&self.endpoint).json(summary).send().await?;
        if !response.status().is_success() {
            return Err(SessionError::Submission(format!(
                "summary endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Submit the end-of-session summary, fire-and-forget.
///
/// Below `min_messages` nothing is sent at all; otherwise exactly one POST is
/// spawned. The caller never blocks on, or observes, the submission result;
/// failures surface only in the logs.
pub fn submit_on_close(
    sink: Arc<dyn SummarySink>,
    state: &ConversationState,
    messages: &[ChatMessage],
    min_messages: usize,
) {
    if messages.len() < min_messages {
        tracing::debug!(
            message_count = messages.len(),
            min_messages,
            "skipping summary for short session"
        );
        return;
    }

    let summary = build_summary(state, messages, Utc::now());
    tokio::spawn(async move {
        match sink.submit(&summary).await {
            Ok(()) => {
                metrics::counter!("leadbot_summaries_submitted_total").increment(1);
                tracing::debug!(qualification = %summary.lead_qualification, "chat summary submitted");
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat summary submission failed");
            }
        }
    });
}
