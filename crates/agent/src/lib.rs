//! Conversational lead-qualification engine
//!
//! Features:
//! - Priority-cascade intent classification over injected keyword tables
//! - Regex-based contact info extraction with first-write-wins merging
//! - Pure reducer-style conversation state machine
//! - Intent-keyed response dispatch with seedable follow-up selection
//! - Best-effort LLM reply augmentation with a rule-based safety net

pub mod agent;
pub mod extract;
pub mod intent;
pub mod reducer;
pub mod responder;

pub use agent::{AgentConfig, AgentEvent, AgentReply, LeadAgent};
pub use extract::ContactExtractor;
pub use intent::{Classification, Intent, IntentClassifier};
pub use reducer::{reduce, ConversationState, StateEvent};
pub use responder::{Responder, TurnOutcome};
