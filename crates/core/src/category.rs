//! Service and pain-point category labels

use serde::{Deserialize, Serialize};

/// Service categories the agency offers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    AiAutomation,
    DigitalMarketing,
    CustomSoftware,
    SystemsIntegration,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::AiAutomation,
        ServiceCategory::DigitalMarketing,
        ServiceCategory::CustomSoftware,
        ServiceCategory::SystemsIntegration,
    ];

    /// Human-readable label used in replies and summaries
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceCategory::AiAutomation => "AI Automation",
            ServiceCategory::DigitalMarketing => "Digital Marketing",
            ServiceCategory::CustomSoftware => "Custom Software",
            ServiceCategory::SystemsIntegration => "Systems Integration",
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Pain-point categories detected in visitor messages
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PainPoint {
    ManualProcesses,
    LeadGenerationIssues,
    MarketingInefficiency,
    SystemIntegrationProblems,
    CostConcerns,
}

impl PainPoint {
    pub const ALL: [PainPoint; 5] = [
        PainPoint::ManualProcesses,
        PainPoint::LeadGenerationIssues,
        PainPoint::MarketingInefficiency,
        PainPoint::SystemIntegrationProblems,
        PainPoint::CostConcerns,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PainPoint::ManualProcesses => "Manual processes",
            PainPoint::LeadGenerationIssues => "Lead generation issues",
            PainPoint::MarketingInefficiency => "Marketing inefficiency",
            PainPoint::SystemIntegrationProblems => "System integration problems",
            PainPoint::CostConcerns => "Cost concerns",
        }
    }
}

impl std::fmt::Display for PainPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ServiceCategory::AiAutomation.display_name(), "AI Automation");
        assert_eq!(PainPoint::CostConcerns.display_name(), "Cost concerns");
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&ServiceCategory::SystemsIntegration).unwrap();
        assert_eq!(json, "\"systems_integration\"");

        let back: PainPoint = serde_json::from_str("\"lead_generation_issues\"").unwrap();
        assert_eq!(back, PainPoint::LeadGenerationIssues);
    }
}
