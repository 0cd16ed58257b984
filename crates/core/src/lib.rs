//! Core types for the lead-qualification chat engine
//!
//! This crate provides the domain types shared across all other crates:
//! - Conversation stages and the pending-reply flag
//! - Chat messages and transcripts
//! - Contact info with first-write-wins merging
//! - Service and pain-point categories
//! - Lead qualification and the end-of-session summary
//! - The cross-visit session snapshot

pub mod category;
pub mod contact;
pub mod conversation;
pub mod summary;

pub use category::{PainPoint, ServiceCategory};
pub use contact::{ContactField, ContactInfo, ContactUpdate};
pub use conversation::{ChatMessage, ConversationStage, ExpectedReply, Sender};
pub use summary::{ChatSummary, LeadQualification, SessionSnapshot};
