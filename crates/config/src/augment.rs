//! LLM augmentation policy configuration

use serde::{Deserialize, Serialize};

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Gate and transport knobs for the optional LLM augmentation path.
///
/// Augmentation is best-effort: the rule-based reply is always computed and
/// every knob here only decides whether an enhancement attempt is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentConfig {
    /// Global enable flag; the default is fully disabled
    #[serde(default)]
    pub enabled: bool,

    /// Text-generation endpoint POSTed for enhanced replies
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bounded request timeout (milliseconds); a single attempt, no retries
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// After this many failed attempts the path is skipped for the rest of
    /// the session
    #[serde(default = "default_max_fallbacks")]
    pub max_fallbacks: u32,

    /// Allow augmentation while a contact field is pending
    #[serde(default)]
    pub allow_during_contact_collection: bool,

    /// Allow augmentation for bare greetings
    #[serde(default)]
    pub allow_for_greetings: bool,

    /// Markers suggesting a complex question worth an enhanced reply
    #[serde(default = "default_complex_markers")]
    pub complex_markers: Vec<String>,

    /// Markers suggesting a comparison request
    #[serde(default = "default_comparison_markers")]
    pub comparison_markers: Vec<String>,

    /// Markers suggesting urgency
    #[serde(default = "default_urgency_markers")]
    pub urgency_markers: Vec<String>,
}

fn default_endpoint() -> String {
    "http://localhost:3001/api/chat/llm-response".to_string()
}
fn default_timeout_ms() -> u64 {
    4000
}
fn default_max_fallbacks() -> u32 {
    2
}
fn default_complex_markers() -> Vec<String> {
    strings(&["how would", "what if", "why does", "explain how", "difference between", "?"])
}
fn default_comparison_markers() -> Vec<String> {
    strings(&["versus", " vs ", "compared to", "better than", "instead of"])
}
fn default_urgency_markers() -> Vec<String> {
    strings(&["urgent", "asap", "immediately", "right away", "today"])
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            max_fallbacks: default_max_fallbacks(),
            allow_during_contact_collection: false,
            allow_for_greetings: false,
            complex_markers: default_complex_markers(),
            comparison_markers: default_comparison_markers(),
            urgency_markers: default_urgency_markers(),
        }
    }
}
