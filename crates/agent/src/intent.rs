//! Intent classification
//!
//! A deterministic priority cascade over injected keyword tables: the first
//! pattern group with a match wins. Service and pain-point detection run
//! independently of the cascade, so a single message can both carry an intent
//! and touch several categories.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use leadbot_config::KeywordConfig;
use leadbot_core::{ExpectedReply, LeadQualification, PainPoint, ServiceCategory};

use crate::reducer::ConversationState;

/// Intent labels, one per user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    WhatWeDo,
    ChatbotRequest,
    NeedStatement,
    Clarification,
    Question,
    Interest,
    Negative,
    /// The message carries contact details (email/phone, or a pending name)
    ContactInfo,
    /// The message answers a pending company question
    BusinessInfo,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::WhatWeDo => "what_we_do",
            Intent::ChatbotRequest => "chatbot_request",
            Intent::NeedStatement => "need_statement",
            Intent::Clarification => "clarification",
            Intent::Question => "question",
            Intent::Interest => "interest",
            Intent::Negative => "negative",
            Intent::ContactInfo => "contact_info",
            Intent::BusinessInfo => "business_info",
            Intent::General => "general",
        }
    }
}

/// Result of classifying one message
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    /// Service categories this message touched
    pub services: BTreeSet<ServiceCategory>,
    /// Pain-point categories this message touched
    pub pain_points: BTreeSet<PainPoint>,
    /// Whether an email or phone pattern is present
    pub has_contact_info: bool,
    /// Tier after unioning this message's categories with the prior state
    pub qualification: LeadQualification,
}

/// Deterministic keyword/regex intent classifier
pub struct IntentClassifier {
    config: KeywordConfig,
    email_probe: Regex,
    phone_probe: Regex,
}

impl IntentClassifier {
    pub fn new(config: KeywordConfig) -> Self {
        Self {
            config,
            email_probe: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap(),
            phone_probe: Regex::new(r"\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap(),
        }
    }

    /// Normalize a message: lowercase, trim, apply the substitution table
    pub fn normalize(&self, message: &str) -> String {
        let mut text = message.trim().to_lowercase();
        for (variant, canonical) in &self.config.substitutions {
            if text.contains(variant.as_str()) {
                text = text.replace(variant.as_str(), canonical);
            }
        }
        text
    }

    /// Classify a message against the prior conversation state.
    ///
    /// Never errors; empty input falls through to `General`.
    pub fn classify(&self, message: &str, prior: &ConversationState) -> Classification {
        let text = self.normalize(message);
        let words: BTreeSet<&str> = text.unicode_words().collect();

        let services = self.scan_services(&text, &words);
        let pain_points = self.scan_pain_points(&text, &words);
        let has_contact_info =
            self.email_probe.is_match(message) || self.phone_probe.is_match(message);

        let intent = if text.is_empty() {
            Intent::General
        } else {
            self.cascade(&text, &words)
                .unwrap_or_else(|| self.fallback_intent(has_contact_info, prior.expecting))
        };

        let mut all_services = prior.services_discussed.clone();
        all_services.extend(services.iter().copied());
        let mut all_pain_points = prior.pain_points.clone();
        all_pain_points.extend(pain_points.iter().copied());
        let qualification = LeadQualification::from_sets(&all_services, &all_pain_points);

        Classification {
            intent,
            services,
            pain_points,
            has_contact_info,
            qualification,
        }
    }

    /// Evaluate the ordered pattern groups; the first group that matches wins
    fn cascade(&self, text: &str, words: &BTreeSet<&str>) -> Option<Intent> {
        let groups: [(&[String], Intent); 8] = [
            (self.config.intents.greeting.as_slice(), Intent::Greeting),
            (self.config.intents.what_we_do.as_slice(), Intent::WhatWeDo),
            (self.config.intents.chatbot_request.as_slice(), Intent::ChatbotRequest),
            (self.config.intents.need_statement.as_slice(), Intent::NeedStatement),
            (self.config.intents.clarification.as_slice(), Intent::Clarification),
            (self.config.intents.question.as_slice(), Intent::Question),
            (self.config.intents.interest.as_slice(), Intent::Interest),
            (self.config.intents.negative.as_slice(), Intent::Negative),
        ];

        for (keywords, intent) in groups {
            if keywords.iter().any(|kw| self.keyword_matches(text, words, kw, intent)) {
                return Some(intent);
            }
        }
        None
    }

    /// Single-word keywords match on word boundaries; multi-word keywords as
    /// substrings. Interest keywords are suppressed under a direct negation
    /// ("not interested") so they don't shadow the negative group.
    fn keyword_matches(
        &self,
        text: &str,
        words: &BTreeSet<&str>,
        keyword: &str,
        intent: Intent,
    ) -> bool {
        let hit = if keyword.contains(char::is_whitespace) {
            text.contains(keyword)
        } else {
            words.contains(keyword)
        };
        if hit && intent == Intent::Interest {
            return !text.contains(&format!("not {keyword}"));
        }
        hit
    }

    /// Lowest-priority interpretation when no cascade group matched
    fn fallback_intent(&self, has_contact_info: bool, expecting: ExpectedReply) -> Intent {
        if has_contact_info {
            Intent::ContactInfo
        } else {
            match expecting {
                ExpectedReply::Company => Intent::BusinessInfo,
                ExpectedReply::Name | ExpectedReply::Email => Intent::ContactInfo,
                _ => Intent::General,
            }
        }
    }

    fn scan_services(&self, text: &str, words: &BTreeSet<&str>) -> BTreeSet<ServiceCategory> {
        self.config
            .service_keywords
            .iter()
            .filter(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|kw| self.keyword_matches(text, words, kw, Intent::General))
            })
            .map(|(category, _)| *category)
            .collect()
    }

    fn scan_pain_points(&self, text: &str, words: &BTreeSet<&str>) -> BTreeSet<PainPoint> {
        self.config
            .pain_point_keywords
            .iter()
            .filter(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|kw| self.keyword_matches(text, words, kw, Intent::General))
            })
            .map(|(category, _)| *category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(KeywordConfig::default())
    }

    #[test]
    fn test_greeting() {
        let result = classifier().classify("Hi", &ConversationState::default());
        assert_eq!(result.intent, Intent::Greeting);
        assert!(result.services.is_empty());
        assert_eq!(result.qualification, LeadQualification::Cold);
    }

    #[test]
    fn test_greeting_not_matched_inside_words() {
        // "hi" inside "this" must not trigger the greeting group
        let result = classifier().classify("this product", &ConversationState::default());
        assert_ne!(result.intent, Intent::Greeting);
    }

    #[test]
    fn test_chatbot_request_detects_service() {
        let result =
            classifier().classify("I need a chatbot for my website", &ConversationState::default());
        assert!(matches!(
            result.intent,
            Intent::ChatbotRequest | Intent::NeedStatement
        ));
        assert!(result.services.contains(&ServiceCategory::AiAutomation));
    }

    #[test]
    fn test_chat_boot_variant_normalized() {
        let c = classifier();
        assert_eq!(c.normalize("We want a Chat Boot"), "we want a chatbot");
        let result = c.classify("We want a chat boot", &ConversationState::default());
        assert!(result.services.contains(&ServiceCategory::AiAutomation));
    }

    #[test]
    fn test_not_interested_is_negative() {
        let result = classifier().classify("I'm not interested", &ConversationState::default());
        assert_eq!(result.intent, Intent::Negative);
    }

    #[test]
    fn test_empty_input_is_general() {
        let result = classifier().classify("   ", &ConversationState::default());
        assert_eq!(result.intent, Intent::General);
    }

    #[test]
    fn test_contact_probe() {
        let result =
            classifier().classify("reach me at john@acme.com", &ConversationState::default());
        assert!(result.has_contact_info);
        assert_eq!(result.intent, Intent::ContactInfo);
    }

    #[test]
    fn test_company_reply_while_pending() {
        let state = ConversationState {
            expecting: ExpectedReply::Company,
            ..Default::default()
        };
        let result = classifier().classify("Acme Corp", &state);
        assert_eq!(result.intent, Intent::BusinessInfo);
    }

    #[test]
    fn test_pain_point_detection() {
        let result = classifier().classify(
            "everything is manual and our systems are disconnected",
            &ConversationState::default(),
        );
        assert!(result.pain_points.contains(&PainPoint::ManualProcesses));
        assert!(result
            .pain_points
            .contains(&PainPoint::SystemIntegrationProblems));
        assert_eq!(result.qualification, LeadQualification::Hot);
    }

    #[test]
    fn test_qualification_includes_prior_state() {
        let mut state = ConversationState::default();
        state.services_discussed.insert(ServiceCategory::CustomSoftware);

        let result = classifier().classify("we also struggle with lead generation", &state);
        // One prior service + one new pain point
        assert_eq!(result.qualification, LeadQualification::Hot);
    }

    #[test]
    fn test_services_and_pain_points_subset_of_fixed_lists() {
        let result = classifier().classify(
            "manual marketing spreadsheets cost too much, need ai software integration",
            &ConversationState::default(),
        );
        for s in &result.services {
            assert!(ServiceCategory::ALL.contains(s));
        }
        for p in &result.pain_points {
            assert!(PainPoint::ALL.contains(p));
        }
    }
}
