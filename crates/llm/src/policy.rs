//! Augmentation gating policy
//!
//! Decides whether a turn is worth an enhancement attempt. The gate is
//! conjunctive: the global flag, the per-session fallback budget, the message
//! heuristics, and the stage guards must all admit the turn.

use leadbot_config::AugmentConfig;
use leadbot_core::{ConversationStage, ExpectedReply};

/// Policy gate over the augmentation path
#[derive(Debug, Clone)]
pub struct AugmentPolicy {
    config: AugmentConfig,
}

impl AugmentPolicy {
    pub fn new(config: AugmentConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Whether this turn should attempt an enhanced reply
    pub fn should_augment(
        &self,
        message: &str,
        stage: ConversationStage,
        expecting: ExpectedReply,
        is_greeting: bool,
        fallback_count: u32,
    ) -> bool {
        if !self.config.enabled {
            return false;
        }
        if fallback_count >= self.config.max_fallbacks {
            return false;
        }
        let mid_collection =
            stage == ConversationStage::ContactCollection || expecting.is_contact_field();
        if mid_collection && !self.config.allow_during_contact_collection {
            return false;
        }
        if is_greeting && !self.config.allow_for_greetings {
            return false;
        }
        self.looks_worth_augmenting(message)
    }

    fn looks_worth_augmenting(&self, message: &str) -> bool {
        let text = message.to_lowercase();
        let marked = |markers: &[String]| markers.iter().any(|m| text.contains(m.as_str()));
        marked(&self.config.complex_markers)
            || marked(&self.config.comparison_markers)
            || marked(&self.config.urgency_markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_config() -> AugmentConfig {
        AugmentConfig {
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_gate_rejects_everything() {
        let policy = AugmentPolicy::new(AugmentConfig::default());
        assert!(!policy.should_augment(
            "how would this compare to hiring in-house?",
            ConversationStage::Qualifying,
            ExpectedReply::None,
            false,
            0,
        ));
    }

    #[test]
    fn test_complex_question_admitted() {
        let policy = AugmentPolicy::new(enabled_config());
        assert!(policy.should_augment(
            "how would an ai chatbot handle refund disputes?",
            ConversationStage::ServiceDiscussion,
            ExpectedReply::None,
            false,
            0,
        ));
    }

    #[test]
    fn test_plain_chatter_rejected() {
        let policy = AugmentPolicy::new(enabled_config());
        assert!(!policy.should_augment(
            "nice weather today",
            ConversationStage::Qualifying,
            ExpectedReply::None,
            false,
            0,
        ));
    }

    #[test]
    fn test_fallback_budget_exhausts_the_path() {
        let config = enabled_config();
        let max = config.max_fallbacks;
        let policy = AugmentPolicy::new(config);
        assert!(!policy.should_augment(
            "what if we compare this to zapier?",
            ConversationStage::Qualifying,
            ExpectedReply::None,
            false,
            max,
        ));
    }

    #[test]
    fn test_mid_collection_rejected_unless_allowed() {
        let policy = AugmentPolicy::new(enabled_config());
        assert!(!policy.should_augment(
            "what if I give you my work email?",
            ConversationStage::ContactCollection,
            ExpectedReply::Email,
            false,
            0,
        ));

        let policy = AugmentPolicy::new(AugmentConfig {
            enabled: true,
            allow_during_contact_collection: true,
            ..Default::default()
        });
        assert!(policy.should_augment(
            "what if I give you my work email?",
            ConversationStage::ContactCollection,
            ExpectedReply::Email,
            false,
            0,
        ));
    }

    #[test]
    fn test_bare_greeting_rejected() {
        let policy = AugmentPolicy::new(enabled_config());
        assert!(!policy.should_augment(
            "hello?",
            ConversationStage::Greeting,
            ExpectedReply::None,
            true,
            0,
        ));
    }
}
