//! Lead-qualification agent
//!
//! Combines the classifier, extractor, responder, and reducer into one
//! per-session agent. The rule-based reply is computed on every turn and is
//! the safety net for the optional LLM augmentation path: any augmentation
//! failure falls back to it and increments the session's fallback counter.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use leadbot_config::{AugmentConfig, KeywordConfig, ResponseTemplates};
use leadbot_core::{
    ChatMessage, ContactField, ContactInfo, ConversationStage, ExpectedReply, LeadQualification,
};
use leadbot_llm::{AugmentPolicy, AugmentRequest, Augmentor};

use crate::extract::ContactExtractor;
use crate::intent::{Classification, Intent, IntentClassifier};
use crate::reducer::{reduce, ConversationState};
use crate::responder::Responder;

/// Agent configuration
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub keywords: KeywordConfig,
    pub templates: ResponseTemplates,
    pub augment: AugmentConfig,
    /// Seed for follow-up selection; None means entropy
    pub rng_seed: Option<u64>,
}

/// Agent events
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Final reply for the turn
    Reply(String),
    /// Intent detected for the user turn
    IntentDetected(Intent),
    /// Stage transition happened
    StageChanged(ConversationStage),
    /// Contact fields newly captured this turn
    ContactCaptured(Vec<ContactField>),
    /// Augmentation failed; the rule-based reply was used
    AugmentationFallback,
}

/// Result of processing one user turn
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    pub intent: Intent,
    pub stage: ConversationStage,
    pub expecting: ExpectedReply,
    pub qualification: LeadQualification,
}

/// Per-session conversational agent
pub struct LeadAgent {
    session_id: String,
    classifier: IntentClassifier,
    extractor: ContactExtractor,
    responder: Mutex<Responder>,
    state: Mutex<ConversationState>,
    transcript: RwLock<Vec<ChatMessage>>,
    augmentor: Option<Arc<dyn Augmentor>>,
    policy: AugmentPolicy,
    fallback_count: AtomicU32,
    event_tx: broadcast::Sender<AgentEvent>,
}

impl LeadAgent {
    /// Create an agent with no augmentation backend
    pub fn new(session_id: impl Into<String>, config: AgentConfig) -> Self {
        Self::build(session_id, config, None)
    }

    /// Create an agent with an augmentation backend
    pub fn with_augmentor(
        session_id: impl Into<String>,
        config: AgentConfig,
        augmentor: Arc<dyn Augmentor>,
    ) -> Self {
        Self::build(session_id, config, Some(augmentor))
    }

    fn build(
        session_id: impl Into<String>,
        config: AgentConfig,
        augmentor: Option<Arc<dyn Augmentor>>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            session_id: session_id.into(),
            classifier: IntentClassifier::new(config.keywords.clone()),
            extractor: ContactExtractor::new(&config.keywords),
            responder: Mutex::new(Responder::new(config.templates, config.rng_seed)),
            state: Mutex::new(ConversationState::default()),
            transcript: RwLock::new(Vec::new()),
            augmentor,
            policy: AugmentPolicy::new(config.augment),
            fallback_count: AtomicU32::new(0),
            event_tx,
        }
    }

    /// Subscribe to agent events
    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.event_tx.subscribe()
    }

    /// Process one user turn. Always produces a reply.
    pub async fn process(&self, input: &str) -> AgentReply {
        let prior = self.state.lock().clone();

        let classification = self.classifier.classify(input, &prior);
        let update = self.extractor.extract(input, &prior.contact_info);
        let outcome = self
            .responder
            .lock()
            .respond(input, &classification, &update, &prior);

        let next = outcome
            .events
            .iter()
            .fold(prior.clone(), |state, event| reduce(&state, event));

        let _ = self
            .event_tx
            .send(AgentEvent::IntentDetected(classification.intent));
        if next.stage != prior.stage {
            let _ = self.event_tx.send(AgentEvent::StageChanged(next.stage));
        }
        let captured = newly_captured(&prior.contact_info, &next.contact_info);
        if !captured.is_empty() {
            let _ = self.event_tx.send(AgentEvent::ContactCaptured(captured));
        }

        let text = self
            .augmented_or_rule_reply(input, &classification, &prior, outcome.reply)
            .await;

        *self.state.lock() = next.clone();
        {
            let mut transcript = self.transcript.write();
            transcript.push(ChatMessage::user(input));
            transcript.push(ChatMessage::bot(text.clone()));
        }

        let _ = self.event_tx.send(AgentEvent::Reply(text.clone()));

        AgentReply {
            text,
            intent: classification.intent,
            stage: next.stage,
            expecting: next.expecting,
            qualification: next.qualification(),
        }
    }

    /// Try the augmentation path, falling back to the rule-based reply on any
    /// failure. At most one attempt per turn.
    async fn augmented_or_rule_reply(
        &self,
        input: &str,
        classification: &Classification,
        prior: &ConversationState,
        rule_reply: String,
    ) -> String {
        let Some(augmentor) = &self.augmentor else {
            return rule_reply;
        };

        let fallbacks = self.fallback_count.load(Ordering::Relaxed);
        let admitted = self.policy.should_augment(
            input,
            prior.stage,
            prior.expecting,
            classification.intent == Intent::Greeting,
            fallbacks,
        );
        if !admitted {
            return rule_reply;
        }

        let request = AugmentRequest {
            prompt: input.to_string(),
            context: context_for(prior),
        };
        match augmentor.augment(request).await {
            Ok(reply) if !reply.fallback_used && !reply.response.trim().is_empty() => {
                tracing::debug!(session_id = %self.session_id, "using augmented reply");
                reply.response
            }
            Ok(_) => {
                self.note_fallback("upstream reported fallback");
                rule_reply
            }
            Err(e) => {
                self.note_fallback(&e.to_string());
                rule_reply
            }
        }
    }

    fn note_fallback(&self, reason: &str) {
        let count = self.fallback_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!(
            session_id = %self.session_id,
            reason,
            count,
            "augmentation fell back to rule-based reply"
        );
        let _ = self.event_tx.send(AgentEvent::AugmentationFallback);
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Snapshot of the current conversation state
    pub fn state(&self) -> ConversationState {
        self.state.lock().clone()
    }

    /// Copy of the transcript so far
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.read().clone()
    }

    pub fn message_count(&self) -> usize {
        self.transcript.read().len()
    }

    pub fn stage(&self) -> ConversationStage {
        self.state.lock().stage
    }

    pub fn fallback_count(&self) -> u32 {
        self.fallback_count.load(Ordering::Relaxed)
    }
}

/// Contact fields present in `next` but not in `prior`
fn newly_captured(prior: &ContactInfo, next: &ContactInfo) -> Vec<ContactField> {
    let mut fields = Vec::new();
    if prior.name.is_none() && next.name.is_some() {
        fields.push(ContactField::Name);
    }
    if prior.email.is_none() && next.email.is_some() {
        fields.push(ContactField::Email);
    }
    if prior.phone.is_none() && next.phone.is_some() {
        fields.push(ContactField::Phone);
    }
    if prior.company_name.is_none() && next.company_name.is_some() {
        fields.push(ContactField::CompanyName);
    }
    fields
}

/// Compact state description shipped as augmentation context
fn context_for(state: &ConversationState) -> String {
    let services: Vec<&str> = state
        .services_discussed
        .iter()
        .map(|s| s.display_name())
        .collect();
    let pain_points: Vec<&str> = state.pain_points.iter().map(|p| p.display_name()).collect();
    format!(
        "stage: {}; services discussed: {}; pain points: {}; qualification: {}",
        state.stage,
        if services.is_empty() { "none".to_string() } else { services.join(", ") },
        if pain_points.is_empty() { "none".to_string() } else { pain_points.join(", ") },
        state.qualification(),
    )
}
