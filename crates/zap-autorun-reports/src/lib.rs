//! Report handling for zap-autorun.
//!
//! This crate provides:
//! - Decoding of the scanner's `traditional-json` report
//! - Severity-bucketed summaries of the reported alerts
//! - Summary export as JSON or Markdown

pub mod markdown;
pub mod report;
pub mod summary;

pub use markdown::to_markdown;
pub use report::{Alert, ReportError, ScanReport, Site};
pub use summary::{Detail, Summarizer, Summary, UnknownRiskPolicy, summarize};
