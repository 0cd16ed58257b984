//! Lead qualification and the end-of-session projections

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{PainPoint, ServiceCategory};
use crate::contact::ContactInfo;
use crate::conversation::ConversationStage;

/// Lead qualification tier.
///
/// A pure function of how many distinct service/pain-point categories the
/// conversation has touched. Recomputed whenever needed, never stored
/// incrementally, so it can only move Cold -> Warm -> Hot within a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum LeadQualification {
    #[default]
    Cold,
    Warm,
    Hot,
}

impl LeadQualification {
    /// Derive the tier from the number of distinct topics discussed
    pub fn from_topic_count(count: usize) -> Self {
        match count {
            0 => LeadQualification::Cold,
            1 => LeadQualification::Warm,
            _ => LeadQualification::Hot,
        }
    }

    /// Derive the tier from the discussed sets
    pub fn from_sets(
        services: &BTreeSet<ServiceCategory>,
        pain_points: &BTreeSet<PainPoint>,
    ) -> Self {
        Self::from_topic_count(services.len() + pain_points.len())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LeadQualification::Cold => "Cold",
            LeadQualification::Warm => "Warm",
            LeadQualification::Hot => "Hot",
        }
    }
}

impl std::fmt::Display for LeadQualification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Write-once projection of a finished conversation, posted to the
/// summary-ingestion endpoint at chat close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub interaction_date: DateTime<Utc>,
    pub contact_info: ContactInfo,
    /// Free-text recap of what the visitor brought up
    pub chat_summary: String,
    pub services_discussed: BTreeSet<ServiceCategory>,
    pub key_pain_points: BTreeSet<PainPoint>,
    pub call_to_action_offered: bool,
    pub next_step: String,
    pub lead_qualification: LeadQualification,
}

/// Durable cross-visit snapshot of a visitor's conversation state.
///
/// Persisted under a fixed key and used to personalize a return visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub services_discussed: BTreeSet<ServiceCategory>,
    #[serde(default)]
    pub pain_points: BTreeSet<PainPoint>,
    #[serde(default)]
    pub stage: ConversationStage,
    pub last_visit: DateTime<Utc>,
    #[serde(default)]
    pub visit_count: u32,
}

impl SessionSnapshot {
    pub fn new(last_visit: DateTime<Utc>) -> Self {
        Self {
            contact_info: ContactInfo::default(),
            services_discussed: BTreeSet::new(),
            pain_points: BTreeSet::new(),
            stage: ConversationStage::default(),
            last_visit,
            visit_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualification_tiers() {
        assert_eq!(LeadQualification::from_topic_count(0), LeadQualification::Cold);
        assert_eq!(LeadQualification::from_topic_count(1), LeadQualification::Warm);
        assert_eq!(LeadQualification::from_topic_count(2), LeadQualification::Hot);
        assert_eq!(LeadQualification::from_topic_count(7), LeadQualification::Hot);
    }

    #[test]
    fn test_qualification_is_monotonic_in_count() {
        let mut last = LeadQualification::Cold;
        for n in 0..6 {
            let tier = LeadQualification::from_topic_count(n);
            assert!(tier >= last);
            last = tier;
        }
    }

    #[test]
    fn test_qualification_from_sets() {
        let mut services = BTreeSet::new();
        let mut pains = BTreeSet::new();
        assert_eq!(
            LeadQualification::from_sets(&services, &pains),
            LeadQualification::Cold
        );

        services.insert(ServiceCategory::AiAutomation);
        assert_eq!(
            LeadQualification::from_sets(&services, &pains),
            LeadQualification::Warm
        );

        pains.insert(PainPoint::ManualProcesses);
        assert_eq!(
            LeadQualification::from_sets(&services, &pains),
            LeadQualification::Hot
        );
    }
}
