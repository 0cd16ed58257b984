//! Response dispatch
//!
//! Maps (intent, state) to a reply plus the state events for the reducer.
//! The pending-field sub-protocol runs before generic dispatch: while a
//! name/email/company question is outstanding, the turn is read as an answer
//! first and only falls back to intent dispatch when the field can't be
//! parsed out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use leadbot_config::ResponseTemplates;
use leadbot_core::{ContactField, ContactUpdate, ConversationStage, ExpectedReply};

use crate::intent::{Classification, Intent};
use crate::reducer::{ConversationState, StateEvent};

/// One turn's worth of output: the reply text and the events to fold
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub events: Vec<StateEvent>,
}

/// Intent-keyed response dispatcher
pub struct Responder {
    templates: ResponseTemplates,
    rng: StdRng,
}

impl Responder {
    /// A seed makes follow-up selection deterministic for tests
    pub fn new(templates: ResponseTemplates, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { templates, rng }
    }

    /// Produce the reply and state events for one user turn
    pub fn respond(
        &mut self,
        message: &str,
        classification: &Classification,
        update: &ContactUpdate,
        state: &ConversationState,
    ) -> TurnOutcome {
        let mut events = Vec::new();

        if !classification.services.is_empty() || !classification.pain_points.is_empty() {
            events.push(StateEvent::TopicsDiscussed {
                services: classification.services.clone(),
                pain_points: classification.pain_points.clone(),
            });
        }

        // Declining while any reply is pending clears the pending question
        if classification.intent == Intent::Negative && state.expecting.is_pending() {
            events.push(StateEvent::OptedOut);
            return TurnOutcome {
                reply: self.templates.opt_out.clone(),
                events,
            };
        }

        if state.expecting.is_contact_field() {
            if let Some(reply) = self.handle_pending(classification, update, state, &mut events) {
                return TurnOutcome { reply, events };
            }
            // Unparseable answer with a meaningful intent: dispatch generically,
            // leaving the pending question in place.
        }

        let reply = self.dispatch(message, classification, update, state, &mut events);
        TurnOutcome { reply, events }
    }

    /// Interpret the turn as an answer to the pending contact question.
    ///
    /// Returns None when the field couldn't be parsed and the intent is worth
    /// dispatching generically instead of re-asking.
    fn handle_pending(
        &mut self,
        classification: &Classification,
        update: &ContactUpdate,
        state: &ConversationState,
        events: &mut Vec<StateEvent>,
    ) -> Option<String> {
        let captured = match state.expecting {
            ExpectedReply::Name => update.name.is_some(),
            ExpectedReply::Email => update.email.is_some(),
            ExpectedReply::Company => update.company_name.is_some(),
            _ => false,
        };

        if captured {
            events.push(StateEvent::ContactCaptured(update.clone()));

            // Advance to whatever is still missing after this capture
            let mut preview = state.contact_info.clone();
            preview.absorb(update);
            return Some(match preview.next_missing() {
                Some(ContactField::Name) => {
                    events.push(StateEvent::Expect(ExpectedReply::Name));
                    self.templates.ask_name.clone()
                }
                Some(ContactField::Email) => {
                    events.push(StateEvent::Expect(ExpectedReply::Email));
                    self.templates
                        .ask_email
                        .replace("{name}", preview.first_name().unwrap_or("there"))
                }
                Some(ContactField::CompanyName) | Some(ContactField::Phone) => {
                    events.push(StateEvent::Expect(ExpectedReply::Company));
                    self.templates.ask_company.clone()
                }
                None => {
                    events.push(StateEvent::Expect(ExpectedReply::None));
                    events.push(StateEvent::StageChanged(ConversationStage::Closing));
                    self.templates.contact_complete.clone()
                }
            });
        }

        match classification.intent {
            Intent::General | Intent::ContactInfo | Intent::BusinessInfo => {
                // Keep anything that was volunteered even though the pending
                // field itself didn't parse
                if !update.is_empty() {
                    events.push(StateEvent::ContactCaptured(update.clone()));
                }
                let retry = match state.expecting {
                    ExpectedReply::Name => &self.templates.retry_name,
                    ExpectedReply::Email => &self.templates.retry_email,
                    _ => &self.templates.retry_company,
                };
                Some(retry.clone())
            }
            _ => None,
        }
    }

    fn dispatch(
        &mut self,
        message: &str,
        classification: &Classification,
        update: &ContactUpdate,
        state: &ConversationState,
        events: &mut Vec<StateEvent>,
    ) -> String {
        match classification.intent {
            Intent::Greeting => {
                events.push(StateEvent::Expect(ExpectedReply::General));
                events.push(StateEvent::StageChanged(ConversationStage::Qualifying));
                self.templates.greeting.clone()
            }
            Intent::WhatWeDo => {
                events.push(StateEvent::StageChanged(ConversationStage::ServiceDiscussion));
                self.templates.what_we_do.clone()
            }
            Intent::ChatbotRequest => {
                events.push(StateEvent::StageChanged(ConversationStage::ServiceDiscussion));
                self.templates.chatbot_pitch.clone()
            }
            Intent::NeedStatement => {
                let stage = if classification.services.is_empty()
                    && classification.pain_points.is_empty()
                {
                    ConversationStage::Qualifying
                } else {
                    ConversationStage::ServiceDiscussion
                };
                events.push(StateEvent::StageChanged(stage));
                match classification.services.iter().next() {
                    Some(service) => self
                        .templates
                        .need_acknowledgement
                        .replace("{service}", service.display_name()),
                    None => self.templates.need_acknowledgement_generic.clone(),
                }
            }
            Intent::Clarification => self.templates.clarification.clone(),
            Intent::Question => self.question_answer(message),
            Intent::Interest => self.handle_interest(state, events),
            Intent::ContactInfo | Intent::BusinessInfo => {
                if update.is_empty() {
                    self.templates.fallback.clone()
                } else {
                    events.push(StateEvent::ContactCaptured(update.clone()));
                    self.templates.contact_thanks.clone()
                }
            }
            Intent::Negative => {
                events.push(StateEvent::Expect(ExpectedReply::None));
                self.templates.closing.clone()
            }
            Intent::General => {
                if self.templates.general_followups.is_empty() {
                    self.templates.fallback.clone()
                } else {
                    let index = self.rng.gen_range(0..self.templates.general_followups.len());
                    self.templates.general_followups[index].clone()
                }
            }
        }
    }

    /// The first interest turn carries the one-time call to action; later
    /// ones prompt for whatever contact field is still missing.
    fn handle_interest(
        &mut self,
        state: &ConversationState,
        events: &mut Vec<StateEvent>,
    ) -> String {
        if !state.call_to_action_offered {
            events.push(StateEvent::CtaOffered);
            events.push(StateEvent::StageChanged(ConversationStage::ContactCollection));
            events.push(StateEvent::Expect(ExpectedReply::Name));
            return self.templates.call_to_action.clone();
        }

        match state.contact_info.next_missing() {
            Some(ContactField::Name) => {
                events.push(StateEvent::StageChanged(ConversationStage::ContactCollection));
                events.push(StateEvent::Expect(ExpectedReply::Name));
                self.templates.ask_name.clone()
            }
            Some(ContactField::Email) => {
                events.push(StateEvent::StageChanged(ConversationStage::ContactCollection));
                events.push(StateEvent::Expect(ExpectedReply::Email));
                self.templates
                    .ask_email
                    .replace("{name}", state.contact_info.first_name().unwrap_or("there"))
            }
            Some(_) => {
                events.push(StateEvent::StageChanged(ConversationStage::ContactCollection));
                events.push(StateEvent::Expect(ExpectedReply::Company));
                self.templates.ask_company.clone()
            }
            None => {
                events.push(StateEvent::StageChanged(ConversationStage::Closing));
                self.templates.contact_complete.clone()
            }
        }
    }

    fn question_answer(&self, message: &str) -> String {
        let text = message.to_lowercase();
        if ["price", "pricing", "cost", "how much"]
            .iter()
            .any(|kw| text.contains(kw))
        {
            self.templates.pricing_answer.clone()
        } else if ["founder", "founded", "who started"]
            .iter()
            .any(|kw| text.contains(kw))
        {
            self.templates.founder_answer.clone()
        } else if text.contains("case stud") || text.contains("example") {
            self.templates.case_study_answer.clone()
        } else {
            self.templates.generic_question_answer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentClassifier;
    use leadbot_config::KeywordConfig;
    use leadbot_core::ContactInfo;
    use std::collections::BTreeSet;

    fn run_turn(
        responder: &mut Responder,
        message: &str,
        state: &ConversationState,
    ) -> TurnOutcome {
        let classifier = IntentClassifier::new(KeywordConfig::default());
        let classification = classifier.classify(message, state);
        let extractor = crate::extract::ContactExtractor::new(&KeywordConfig::default());
        let update = extractor.extract(message, &state.contact_info);
        responder.respond(message, &classification, &update, state)
    }

    fn fold(state: &ConversationState, outcome: &TurnOutcome) -> ConversationState {
        outcome
            .events
            .iter()
            .fold(state.clone(), |s, e| crate::reducer::reduce(&s, e))
    }

    #[test]
    fn test_greeting_sets_general_expectation() {
        let mut responder = Responder::new(ResponseTemplates::default(), Some(7));
        let state = ConversationState::default();

        let outcome = run_turn(&mut responder, "Hi", &state);
        assert!(outcome.reply.to_lowercase().contains("hi")
            || outcome.reply.to_lowercase().contains("welcome"));

        let next = fold(&state, &outcome);
        assert_eq!(next.expecting, ExpectedReply::General);
    }

    #[test]
    fn test_interest_offers_cta_exactly_once() {
        let mut responder = Responder::new(ResponseTemplates::default(), Some(7));
        let state = ConversationState::default();

        let outcome = run_turn(&mut responder, "I'm interested, let's talk", &state);
        let next = fold(&state, &outcome);
        assert!(next.call_to_action_offered);
        assert_eq!(next.stage, ConversationStage::ContactCollection);
        assert_eq!(next.expecting, ExpectedReply::Name);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, StateEvent::CtaOffered)));

        // A second interest turn must not emit the CTA event again
        let outcome2 = run_turn(&mut responder, "sounds great", &next);
        assert!(!outcome2
            .events
            .iter()
            .any(|e| matches!(e, StateEvent::CtaOffered)));
    }

    #[test]
    fn test_pending_name_failure_stays_on_name() {
        let mut responder = Responder::new(ResponseTemplates::default(), Some(7));
        let state = ConversationState {
            stage: ConversationStage::ContactCollection,
            call_to_action_offered: true,
            expecting: ExpectedReply::Name,
            ..Default::default()
        };

        // No parseable name: the flag must not advance
        let outcome = run_turn(&mut responder, "hmm ok", &state);
        let next = fold(&state, &outcome);
        assert_eq!(next.expecting, ExpectedReply::Name);
        assert!(next.contact_info.name.is_none());
    }

    #[test]
    fn test_negative_while_pending_opts_out() {
        let mut responder = Responder::new(ResponseTemplates::default(), Some(7));
        let state = ConversationState {
            expecting: ExpectedReply::Email,
            call_to_action_offered: true,
            ..Default::default()
        };

        let outcome = run_turn(&mut responder, "no thanks", &state);
        assert_eq!(outcome.reply, ResponseTemplates::default().opt_out);
        let next = fold(&state, &outcome);
        assert_eq!(next.expecting, ExpectedReply::None);
    }

    #[test]
    fn test_contact_collection_cycle() {
        let mut responder = Responder::new(ResponseTemplates::default(), Some(7));
        let mut state = ConversationState {
            stage: ConversationStage::ContactCollection,
            call_to_action_offered: true,
            expecting: ExpectedReply::Name,
            ..Default::default()
        };

        let outcome = run_turn(&mut responder, "John Smith", &state);
        assert!(outcome.reply.contains("John"));
        state = fold(&state, &outcome);
        assert_eq!(state.expecting, ExpectedReply::Email);

        let outcome = run_turn(&mut responder, "john@acme.com", &state);
        state = fold(&state, &outcome);
        assert_eq!(state.expecting, ExpectedReply::Company);

        let outcome = run_turn(&mut responder, "Acme Corp", &state);
        state = fold(&state, &outcome);
        assert_eq!(state.expecting, ExpectedReply::None);
        assert_eq!(state.stage, ConversationStage::Closing);
        assert_eq!(
            state.contact_info,
            ContactInfo {
                name: Some("John Smith".to_string()),
                email: Some("john@acme.com".to_string()),
                phone: None,
                company_name: Some("Acme Corp".to_string()),
            }
        );
    }

    #[test]
    fn test_seeded_followups_are_deterministic() {
        let templates = ResponseTemplates::default();
        let classification = Classification {
            intent: Intent::General,
            services: BTreeSet::new(),
            pain_points: BTreeSet::new(),
            has_contact_info: false,
            qualification: Default::default(),
        };
        let state = ConversationState::default();
        let update = ContactUpdate::default();

        let picks = |seed: u64| -> Vec<String> {
            let mut responder = Responder::new(templates.clone(), Some(seed));
            (0..5)
                .map(|_| {
                    responder
                        .respond("tell you about my business", &classification, &update, &state)
                        .reply
                })
                .collect()
        };

        assert_eq!(picks(42), picks(42));
    }
}
