pub mod cli;
pub mod config;
pub mod pipeline;
pub mod runner;

// Re-export core types for convenience
pub use zap_autorun_core::{BuildError, ScanIntent, ScanMode, SeverityTier};
pub use zap_autorun_plan::RunConfiguration;
pub use zap_autorun_reports::{Summary, UnknownRiskPolicy};
