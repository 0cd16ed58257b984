//! Keyword tables driving intent classification and category detection
//!
//! All tables are injected into the classifier at construction. The defaults
//! carry the production vocabulary; tests may substitute trimmed tables.

use serde::{Deserialize, Serialize};

use leadbot_core::{PainPoint, ServiceCategory};

/// Ordered keyword groups for the intent priority cascade.
///
/// Groups are evaluated in declaration order and the first group with a
/// matching keyword wins. Single-word keywords match on word boundaries;
/// multi-word keywords match as substrings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPatterns {
    #[serde(default)]
    pub greeting: Vec<String>,
    #[serde(default)]
    pub what_we_do: Vec<String>,
    #[serde(default)]
    pub chatbot_request: Vec<String>,
    #[serde(default)]
    pub need_statement: Vec<String>,
    #[serde(default)]
    pub clarification: Vec<String>,
    #[serde(default)]
    pub question: Vec<String>,
    #[serde(default)]
    pub interest: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for IntentPatterns {
    fn default() -> Self {
        Self {
            greeting: strings(&[
                "hi", "hello", "hey", "good morning", "good afternoon", "good evening",
                "greetings", "howdy",
            ]),
            what_we_do: strings(&[
                "what do you do",
                "what does your company do",
                "what services",
                "what can you do",
                "who are you",
                "tell me about your",
                "what is this",
            ]),
            chatbot_request: strings(&[
                "chatbot",
                "chat bot",
                "virtual assistant",
                "conversational ai",
                "bot for my",
            ]),
            need_statement: strings(&[
                "i need", "we need", "i want", "we want", "looking for", "help me",
                "help us", "i require", "we require",
            ]),
            clarification: strings(&[
                "what do you mean",
                "can you explain",
                "don't understand",
                "dont understand",
                "confused",
                "clarify",
                "elaborate",
            ]),
            question: strings(&[
                "how much",
                "price",
                "pricing",
                "cost",
                "who founded",
                "founder",
                "case study",
                "case studies",
                "how long",
                "timeline",
                "how does",
                "do you offer",
            ]),
            interest: strings(&[
                "interested",
                "sounds good",
                "sounds great",
                "sign me up",
                "get started",
                "let's talk",
                "lets talk",
                "tell me more",
                "yes please",
                "book a call",
                "schedule a call",
                "demo",
            ]),
            negative: strings(&[
                "no thanks",
                "no thank you",
                "not interested",
                "not right now",
                "not now",
                "maybe later",
                "goodbye",
                "bye",
                "stop",
            ]),
        }
    }
}

/// Keyword configuration injected into the classifier and extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Normalization table applied after lowercasing: (variant, canonical)
    #[serde(default)]
    pub substitutions: Vec<(String, String)>,

    /// Intent cascade keyword groups
    #[serde(default)]
    pub intents: IntentPatterns,

    /// Service category keyword table
    #[serde(default)]
    pub service_keywords: Vec<(ServiceCategory, Vec<String>)>,

    /// Pain-point category keyword table
    #[serde(default)]
    pub pain_point_keywords: Vec<(PainPoint, Vec<String>)>,

    /// Words that disqualify a candidate person name
    #[serde(default)]
    pub name_stoplist: Vec<String>,

    /// Words that disqualify a candidate company name
    #[serde(default)]
    pub company_stoplist: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            substitutions: vec![
                ("chat boot".to_string(), "chatbot".to_string()),
                ("chat bot".to_string(), "chatbot".to_string()),
                ("chatbots".to_string(), "chatbot".to_string()),
                ("a.i.".to_string(), "ai".to_string()),
                ("e-mail".to_string(), "email".to_string()),
            ],
            intents: IntentPatterns::default(),
            service_keywords: vec![
                (
                    ServiceCategory::AiAutomation,
                    strings(&[
                        "chatbot",
                        "automation",
                        "automate",
                        "ai",
                        "artificial intelligence",
                        "machine learning",
                        "workflow",
                        "bot",
                    ]),
                ),
                (
                    ServiceCategory::DigitalMarketing,
                    strings(&[
                        "marketing",
                        "seo",
                        "social media",
                        "ads",
                        "advertising",
                        "campaign",
                        "content strategy",
                        "branding",
                    ]),
                ),
                (
                    ServiceCategory::CustomSoftware,
                    strings(&[
                        "software",
                        "app",
                        "application",
                        "website",
                        "web development",
                        "platform",
                        "portal",
                        "dashboard",
                    ]),
                ),
                (
                    ServiceCategory::SystemsIntegration,
                    strings(&[
                        "integration",
                        "integrate",
                        "crm",
                        "erp",
                        "api",
                        "sync",
                        "connect our systems",
                    ]),
                ),
            ],
            pain_point_keywords: vec![
                (
                    PainPoint::ManualProcesses,
                    strings(&[
                        "manual",
                        "by hand",
                        "spreadsheet",
                        "repetitive",
                        "tedious",
                        "time consuming",
                        "time-consuming",
                    ]),
                ),
                (
                    PainPoint::LeadGenerationIssues,
                    strings(&[
                        "no leads",
                        "not enough leads",
                        "lead generation",
                        "need more customers",
                        "need more clients",
                        "empty pipeline",
                    ]),
                ),
                (
                    PainPoint::MarketingInefficiency,
                    strings(&[
                        "low conversion",
                        "poor roi",
                        "wasted ad spend",
                        "nobody responds",
                        "low engagement",
                        "marketing isn't working",
                        "marketing not working",
                    ]),
                ),
                (
                    PainPoint::SystemIntegrationProblems,
                    strings(&[
                        "don't talk to each other",
                        "dont talk to each other",
                        "disconnected",
                        "double entry",
                        "duplicate data",
                        "data silos",
                    ]),
                ),
                (
                    PainPoint::CostConcerns,
                    strings(&[
                        "expensive",
                        "too costly",
                        "budget",
                        "can't afford",
                        "cant afford",
                        "cost too much",
                        "pricey",
                    ]),
                ),
            ],
            name_stoplist: strings(&[
                "thanks", "thank", "hello", "hi", "hey", "yes", "no", "okay", "ok", "sure",
                "please", "good", "morning", "afternoon", "evening", "interested", "not",
            ]),
            company_stoplist: strings(&[
                "business", "company", "work", "working", "home", "here", "there", "nothing",
                "myself", "freelance", "unemployed",
            ]),
        }
    }
}
