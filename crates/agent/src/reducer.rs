//! Conversation state and the pure reducer
//!
//! All state mutation flows through `reduce(state, event) -> state`, which
//! enforces the session invariants: discussed sets are append-only, the
//! call-to-action flag flips false -> true at most once, contact fields are
//! first-write-wins, and stage changes must be legal transitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use leadbot_core::{
    ContactInfo, ContactUpdate, ConversationStage, ExpectedReply, LeadQualification, PainPoint,
    ServiceCategory,
};

/// Per-session conversation state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub stage: ConversationStage,
    pub services_discussed: BTreeSet<ServiceCategory>,
    pub pain_points: BTreeSet<PainPoint>,
    pub call_to_action_offered: bool,
    pub expecting: ExpectedReply,
    pub contact_info: ContactInfo,
}

impl ConversationState {
    /// Current tier, always derived from the discussed sets
    pub fn qualification(&self) -> LeadQualification {
        LeadQualification::from_sets(&self.services_discussed, &self.pain_points)
    }
}

/// Events produced by one turn and folded into the state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateEvent {
    /// Categories this turn touched; unioned into the discussed sets
    TopicsDiscussed {
        services: BTreeSet<ServiceCategory>,
        pain_points: BTreeSet<PainPoint>,
    },
    /// Contact fields extracted this turn; merged first-write-wins
    ContactCaptured(ContactUpdate),
    /// The one-time call to action was made
    CtaOffered,
    /// The next turn should be read as an answer to this pending question
    Expect(ExpectedReply),
    /// Move to a new stage; illegal transitions leave the state unchanged
    StageChanged(ConversationStage),
    /// The visitor declined while a reply was pending
    OptedOut,
}

/// Apply one event to the state, returning the next state.
///
/// Pure: no I/O, no clock, no randomness.
pub fn reduce(state: &ConversationState, event: &StateEvent) -> ConversationState {
    let mut next = state.clone();
    match event {
        StateEvent::TopicsDiscussed {
            services,
            pain_points,
        } => {
            next.services_discussed.extend(services.iter().copied());
            next.pain_points.extend(pain_points.iter().copied());
        }
        StateEvent::ContactCaptured(update) => {
            next.contact_info.absorb(update);
        }
        StateEvent::CtaOffered => {
            next.call_to_action_offered = true;
        }
        StateEvent::Expect(reply) => {
            next.expecting = *reply;
        }
        StateEvent::StageChanged(stage) => {
            if next.stage.can_transition_to(*stage) {
                next.stage = *stage;
            }
        }
        StateEvent::OptedOut => {
            next.expecting = ExpectedReply::None;
        }
    }
    next
}
