//! Canned response templates for the dispatch table
//!
//! Templates use `{name}`, `{service}`, and `{pain_point}` placeholders filled
//! by the responder. All text is injected data, not code.

use serde::{Deserialize, Serialize};

fn strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Response templates injected into the responder at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTemplates {
    pub greeting: String,
    pub what_we_do: String,
    pub chatbot_pitch: String,
    /// Acknowledgement when a concrete need was stated; `{service}` is filled
    /// with the first detected category
    pub need_acknowledgement: String,
    /// Fallback acknowledgement when no category was detected
    pub need_acknowledgement_generic: String,
    pub clarification: String,
    pub pricing_answer: String,
    pub founder_answer: String,
    pub case_study_answer: String,
    pub generic_question_answer: String,
    /// The one-time call to action on an interest intent
    pub call_to_action: String,
    pub ask_name: String,
    /// `{name}` is filled with the captured first name
    pub ask_email: String,
    pub ask_company: String,
    /// Sent once name, email, and company are all captured
    pub contact_complete: String,
    /// Re-ask lines when the pending field could not be parsed
    pub retry_name: String,
    pub retry_email: String,
    pub retry_company: String,
    /// Thanks for contact details volunteered without being asked
    pub contact_thanks: String,
    pub opt_out: String,
    pub closing: String,
    /// Open-ended follow-ups picked at random for general chatter
    pub general_followups: Vec<String>,
    pub fallback: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            greeting: "Hi there! Welcome — I'm the assistant for our digital agency. \
                       What brings you here today?"
                .to_string(),
            what_we_do: "We help businesses grow with AI automation, digital marketing, \
                         custom software, and systems integration. Is there an area \
                         you're focused on right now?"
                .to_string(),
            chatbot_pitch: "Great choice — we build custom chatbots that qualify leads \
                            and answer customer questions around the clock. What would \
                            you want a chatbot to handle for you?"
                .to_string(),
            need_acknowledgement: "Got it — {service} is one of our core strengths. \
                                   Can you tell me a bit more about what you're dealing \
                                   with today?"
                .to_string(),
            need_acknowledgement_generic: "Understood. Can you tell me a bit more about \
                                           what you're trying to achieve?"
                .to_string(),
            clarification: "Happy to clarify! In short, we build automation, marketing, \
                            and software solutions tailored to your business. What part \
                            would you like me to expand on?"
                .to_string(),
            pricing_answer: "Pricing depends on scope — most projects start with a free \
                             consultation so we can quote accurately. Would you like us \
                             to reach out with details?"
                .to_string(),
            founder_answer: "Our agency was founded by engineers who spent a decade \
                             automating operations for growing companies. They still \
                             review every project we take on."
                .to_string(),
            case_study_answer: "We've helped clients cut manual work by half and double \
                                inbound leads. I can have the team send over case \
                                studies relevant to your industry."
                .to_string(),
            generic_question_answer: "Good question! The honest answer depends on your \
                                      setup — our team can walk you through it on a \
                                      quick call."
                .to_string(),
            call_to_action: "Love it — let's get you set up with a free consultation. \
                             May I have your name?"
                .to_string(),
            ask_name: "May I have your name so the team knows who to reach out to?".to_string(),
            ask_email: "Thanks, {name}! What's the best email to reach you at?".to_string(),
            ask_company: "Perfect. And what company are you with?".to_string(),
            contact_complete: "You're all set — our team will reach out within one \
                               business day. Anything else I can help with meanwhile?"
                .to_string(),
            retry_name: "Sorry, I didn't catch that — could you share your full name?".to_string(),
            retry_email: "Hmm, that doesn't look like an email address. Could you \
                          re-enter it?"
                .to_string(),
            retry_company: "Could you share your company's name?".to_string(),
            contact_thanks: "Thanks for sharing that — I've passed it along to the team."
                .to_string(),
            opt_out: "No problem at all! I'm here if you change your mind or have any \
                      other questions."
                .to_string(),
            closing: "Thanks for stopping by! Feel free to come back anytime.".to_string(),
            general_followups: strings(&[
                "Interesting — tell me more about your business.",
                "What's the biggest bottleneck in your operations right now?",
                "Are you currently handling that manually, or do you have tooling in place?",
                "How are you generating leads for your business today?",
            ]),
            fallback: "I want to make sure I help you properly — could you rephrase that?"
                .to_string(),
        }
    }
}
