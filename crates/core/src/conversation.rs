//! Conversation types: stages, pending-reply flag, and messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversation stages for the lead-qualification flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// Initial greeting and introduction
    #[default]
    Greeting,
    /// Understanding what the visitor is looking for
    Qualifying,
    /// Discussing specific services and pain points
    ServiceDiscussion,
    /// Collecting name, email, and company
    ContactCollection,
    /// Wrap-up once contact details are captured or declined
    Closing,
}

impl ConversationStage {
    /// Get allowed transitions from the current stage
    pub fn allowed_transitions(&self) -> Vec<ConversationStage> {
        match self {
            ConversationStage::Greeting => vec![
                ConversationStage::Qualifying,
                ConversationStage::ServiceDiscussion,
                ConversationStage::ContactCollection,
            ],
            ConversationStage::Qualifying => vec![
                ConversationStage::ServiceDiscussion,
                ConversationStage::ContactCollection,
                ConversationStage::Closing,
            ],
            ConversationStage::ServiceDiscussion => vec![
                ConversationStage::Qualifying,
                ConversationStage::ContactCollection,
                ConversationStage::Closing,
            ],
            ConversationStage::ContactCollection => vec![
                ConversationStage::ServiceDiscussion,
                ConversationStage::Closing,
            ],
            ConversationStage::Closing => vec![],
        }
    }

    /// Check if transition to target stage is allowed
    pub fn can_transition_to(&self, target: ConversationStage) -> bool {
        *self == target || self.allowed_transitions().contains(&target)
    }

    /// Get default next stage
    pub fn default_next(&self) -> Option<ConversationStage> {
        match self {
            ConversationStage::Greeting => Some(ConversationStage::Qualifying),
            ConversationStage::Qualifying => Some(ConversationStage::ServiceDiscussion),
            ConversationStage::ServiceDiscussion => Some(ConversationStage::ContactCollection),
            ConversationStage::ContactCollection => Some(ConversationStage::Closing),
            ConversationStage::Closing => None,
        }
    }

    /// Get stage display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ConversationStage::Greeting => "Greeting",
            ConversationStage::Qualifying => "Qualifying",
            ConversationStage::ServiceDiscussion => "Service Discussion",
            ConversationStage::ContactCollection => "Contact Collection",
            ConversationStage::Closing => "Closing",
        }
    }
}

impl std::fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Single-slot pending-question flag.
///
/// When set to `Name`/`Email`/`Company`, the next user turn is interpreted
/// primarily as an answer to that question before generic intent dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedReply {
    Name,
    Email,
    Company,
    /// An open question was asked; no specific field is pending
    General,
    #[default]
    None,
}

impl ExpectedReply {
    /// Whether a specific contact field is pending
    pub fn is_contact_field(&self) -> bool {
        matches!(
            self,
            ExpectedReply::Name | ExpectedReply::Email | ExpectedReply::Company
        )
    }

    /// Whether any reply at all is pending
    pub fn is_pending(&self) -> bool {
        !matches!(self, ExpectedReply::None)
    }
}

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A single message in the transcript.
///
/// Transcripts are append-only; messages are never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    /// Create a bot message
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content)
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
