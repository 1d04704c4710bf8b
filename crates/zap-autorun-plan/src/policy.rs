//! Tunable plan policy and the constants the rest of the pipeline relies on.

use serde::{Deserialize, Serialize};

use crate::model::RunParameters;

/// Name of the single context every plan declares.
pub const DEFAULT_CONTEXT_NAME: &str = "default";

/// Base name shared by both report jobs. The orchestrator reads
/// `<directory>/report.json` after the scan, so this is not configurable.
pub const REPORT_FILE: &str = "report";

pub const PDF_REPORT_TEMPLATE: &str = "traditional-pdf";
pub const JSON_REPORT_TEMPLATE: &str = "traditional-json";

pub const DEFAULT_SPIDER_MAX_DURATION: u32 = 60;
pub const DEFAULT_SPIDER_MAX_DEPTH: u32 = 1;
pub const DEFAULT_REPORT_TITLE: &str = "Automated Vulnerability Scan";
pub const DEFAULT_REPORT_DESCRIPTION: &str = "This is an automated report";

/// Values baked into every generated plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunPolicy {
    pub parameters: RunParameters,
    pub spider_max_duration: u32,
    pub spider_max_depth: u32,
    pub scan_only_in_scope: bool,
    pub report_title: String,
    pub report_description: String,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            parameters: RunParameters::default(),
            spider_max_duration: DEFAULT_SPIDER_MAX_DURATION,
            spider_max_depth: DEFAULT_SPIDER_MAX_DEPTH,
            scan_only_in_scope: true,
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            report_description: DEFAULT_REPORT_DESCRIPTION.to_string(),
        }
    }
}

impl RunPolicy {
    pub fn with_parameters(mut self, parameters: RunParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the spider limits (duration in minutes, link depth).
    pub fn with_spider_limits(mut self, max_duration: u32, max_depth: u32) -> Self {
        self.spider_max_duration = max_duration;
        self.spider_max_depth = max_depth;
        self
    }

    pub fn with_scan_only_in_scope(mut self, enabled: bool) -> Self {
        self.scan_only_in_scope = enabled;
        self
    }

    pub fn with_report_text(mut self, title: String, description: String) -> Self {
        self.report_title = title;
        self.report_description = description;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RunPolicy::default();
        assert_eq!(policy.spider_max_duration, 60);
        assert_eq!(policy.spider_max_depth, 1);
        assert!(policy.scan_only_in_scope);
        assert_eq!(policy.report_title, "Automated Vulnerability Scan");
        assert_eq!(policy.report_description, "This is an automated report");
        assert_eq!(policy.parameters, RunParameters::default());
    }

    #[test]
    fn test_policy_overrides() {
        let policy = RunPolicy::default()
            .with_spider_limits(5, 3)
            .with_scan_only_in_scope(false);
        assert_eq!(policy.spider_max_duration, 5);
        assert_eq!(policy.spider_max_depth, 3);
        assert!(!policy.scan_only_in_scope);
    }
}
