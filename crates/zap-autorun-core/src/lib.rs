//! Core types for the zap-autorun scanner wrapper.
//!
//! This crate provides the types shared by the plan builder, the report
//! summarizer and the CLI:
//! - Scan intents (ScanMode, ScanIntent)
//! - Severity tiers and risk code classification
//! - Errors raised while turning operator input into an intent

mod error;
mod intent;
mod severity;

pub use error::BuildError;
pub use intent::{ScanIntent, ScanMode};
pub use severity::{SeverityTier, classify};
