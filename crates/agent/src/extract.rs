//! Contact info extraction
//!
//! Ordered regex probes per field; the first match wins. Only fields not
//! already set are extracted (first-write-wins lives in
//! `ContactInfo::absorb`, but unset-field checks here avoid wasted work).
//! No match on any field yields an empty update, never an error.

use regex::Regex;

use leadbot_config::KeywordConfig;
use leadbot_core::{ContactInfo, ContactUpdate};

const MAX_NAME_LEN: usize = 50;
const MAX_COMPANY_LEN: usize = 60;

/// Regex-based contact field extractor
pub struct ContactExtractor {
    email: Regex,
    phones: Vec<Regex>,
    name_patterns: Vec<Regex>,
    company_patterns: Vec<Regex>,
    name_stoplist: Vec<String>,
    company_stoplist: Vec<String>,
}

impl ContactExtractor {
    pub fn new(config: &KeywordConfig) -> Self {
        Self {
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap(),
            // North-American variants, most specific first
            phones: vec![
                Regex::new(r"\+?1[-.\s]\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap(),
                Regex::new(r"\(\d{3}\)\s?\d{3}[-.\s]?\d{4}").unwrap(),
                Regex::new(r"\b\d{3}[-.\s]\d{3}[-.\s]\d{4}\b").unwrap(),
                Regex::new(r"\b\d{10}\b").unwrap(),
            ],
            name_patterns: vec![
                // Explicit introduction
                Regex::new(r"(?i)my name(?:'s| is)\s+([A-Za-z][A-Za-z'-]*(?:\s+[A-Za-z][A-Za-z'-]*){1,3})")
                    .unwrap(),
                Regex::new(r"(?i:i am|i'm|this is)\s+([A-Z][a-z'-]+(?:\s+[A-Z][a-z'-]+){1,3})")
                    .unwrap(),
                // Capitalized run at string start
                Regex::new(r"^([A-Z][a-z'-]+(?:\s+[A-Z][a-z'-]+){1,3})\b").unwrap(),
                // Capitalized run after punctuation
                Regex::new(r"[,!.]\s+([A-Z][a-z'-]+(?:\s+[A-Z][a-z'-]+){1,3})\s*[.!]?$").unwrap(),
            ],
            company_patterns: vec![
                Regex::new(
                    r"(?i)(?:my company is|our company is|company is called|company name is)\s+([^,.!?\n]{2,60})",
                )
                .unwrap(),
                Regex::new(r"(?i)(?:i work (?:at|for)|we work at|i'm with|i am with)\s+([^,.!?\n]{2,60})")
                    .unwrap(),
                // Capitalized run ending in a corporate suffix
                Regex::new(
                    r"\b([A-Z][A-Za-z0-9&'-]*(?:\s+[A-Z][A-Za-z0-9&'-]*){0,3}\s+(?:Inc|LLC|Corp|Corporation|Ltd|Co)\b\.?)",
                )
                .unwrap(),
            ],
            name_stoplist: config.name_stoplist.clone(),
            company_stoplist: config.company_stoplist.clone(),
        }
    }

    /// Extract contact fields from a message, skipping fields already set
    pub fn extract(&self, message: &str, current: &ContactInfo) -> ContactUpdate {
        let mut update = ContactUpdate::default();

        if current.email.is_none() {
            if let Some(m) = self.email.find(message) {
                update.email = Some(m.as_str().to_string());
            }
        }

        if current.phone.is_none() {
            update.phone = self
                .phones
                .iter()
                .find_map(|re| re.find(message))
                .map(|m| m.as_str().trim().to_string());
        }

        if current.name.is_none() {
            update.name = self.extract_name(message);
        }

        if current.company_name.is_none() {
            update.company_name = self.extract_company(message);
        }

        update
    }

    fn extract_name(&self, message: &str) -> Option<String> {
        for pattern in &self.name_patterns {
            if let Some(captures) = pattern.captures(message) {
                if let Some(candidate) = captures.get(1) {
                    let candidate = candidate.as_str().trim();
                    if self.is_plausible_name(candidate) {
                        return Some(candidate.to_string());
                    }
                }
            }
        }
        None
    }

    fn is_plausible_name(&self, candidate: &str) -> bool {
        let word_count = candidate.split_whitespace().count();
        if !(2..=4).contains(&word_count) || candidate.len() > MAX_NAME_LEN {
            return false;
        }
        !candidate
            .split_whitespace()
            .any(|word| self.name_stoplist.iter().any(|s| s == &word.to_lowercase()))
    }

    fn extract_company(&self, message: &str) -> Option<String> {
        for pattern in &self.company_patterns {
            if let Some(captures) = pattern.captures(message) {
                if let Some(candidate) = captures.get(1) {
                    let candidate = candidate
                        .as_str()
                        .trim()
                        .trim_end_matches(['.', ',', '!', '?'])
                        .trim();
                    if self.is_plausible_company(candidate) {
                        return Some(candidate.to_string());
                    }
                }
            }
        }
        None
    }

    fn is_plausible_company(&self, candidate: &str) -> bool {
        if candidate.is_empty() || candidate.len() > MAX_COMPANY_LEN {
            return false;
        }
        let lowered = candidate.to_lowercase();
        !self.company_stoplist.iter().any(|s| s == &lowered)
    }
}
