//! Data model of the ZAP automation framework plan.
//!
//! Field names follow the automation framework schema verbatim, so the
//! serialized document can be handed to `zap.sh -autorun` unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::policy::JSON_REPORT_TEMPLATE;

/// Errors that can occur while producing or persisting a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to serialize plan: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write plan to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The document handed to the scanner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfiguration {
    #[serde(rename = "env")]
    pub environment: Environment,
    /// Executed in order by the scanner.
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    pub contexts: Vec<Context>,
    pub parameters: RunParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub name: String,
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunParameters {
    pub fail_on_error: bool,
    pub fail_on_warning: bool,
    pub progress_to_stdout: bool,
    pub continue_on_failure: bool,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            fail_on_error: true,
            fail_on_warning: false,
            progress_to_stdout: true,
            continue_on_failure: false,
        }
    }
}

/// A single step of the pipeline. `type` and `parameters` come from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    #[serde(flatten)]
    pub kind: JobKind,
}

/// Job kinds understood by the automation framework, each with its own
/// parameter record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "parameters")]
pub enum JobKind {
    #[serde(rename = "passiveScan-config")]
    PassiveScanConfig(PassiveScanConfigParameters),
    #[serde(rename = "spider")]
    Spider(SpiderParameters),
    #[serde(rename = "passiveScan-wait")]
    PassiveScanWait,
    #[serde(rename = "activeScan")]
    ActiveScan,
    #[serde(rename = "report")]
    Report(ReportParameters),
}

impl JobKind {
    /// The `type` value written to the plan.
    pub fn job_type(&self) -> &'static str {
        match self {
            JobKind::PassiveScanConfig(_) => "passiveScan-config",
            JobKind::Spider(_) => "spider",
            JobKind::PassiveScanWait => "passiveScan-wait",
            JobKind::ActiveScan => "activeScan",
            JobKind::Report(_) => "report",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PassiveScanConfigParameters {
    pub scan_only_in_scope: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpiderParameters {
    /// Minutes.
    pub max_duration: u32,
    pub max_depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_description: Option<String>,
    pub template: String,
    /// Base name without extension; the template decides the extension.
    pub report_file: String,
}

impl Job {
    pub fn new(name: impl Into<String>, kind: JobKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn job_type(&self) -> &'static str {
        self.kind.job_type()
    }
}

impl RunConfiguration {
    /// Serialize to the YAML document read by `zap.sh -autorun`.
    pub fn to_yaml(&self) -> Result<String, PlanError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, PlanError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn write_to_file(&self, path: &Path) -> Result<(), PlanError> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|source| PlanError::Write {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Wrote automation plan to {}", path.display());
        Ok(())
    }

    /// File name of the JSON report the plan asks the scanner to produce.
    pub fn json_report_file(&self) -> Option<String> {
        self.jobs.iter().find_map(|job| match &job.kind {
            JobKind::Report(params) if params.template == JSON_REPORT_TEMPLATE => {
                Some(format!("{}.json", params.report_file))
            }
            _ => None,
        })
    }

    pub fn job_types(&self) -> Vec<&'static str> {
        self.jobs.iter().map(Job::job_type).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_job() -> Job {
        Job::new(
            "json",
            JobKind::Report(ReportParameters {
                report_title: None,
                report_description: None,
                template: JSON_REPORT_TEMPLATE.to_string(),
                report_file: "report".to_string(),
            }),
        )
    }

    fn sample_plan() -> RunConfiguration {
        RunConfiguration {
            environment: Environment {
                contexts: vec![Context {
                    name: "default".to_string(),
                    urls: vec!["https://example.com".to_string()],
                    exclude_paths: vec![],
                    include_paths: vec![],
                }],
                parameters: RunParameters::default(),
            },
            jobs: vec![
                Job::new(
                    "spider",
                    JobKind::Spider(SpiderParameters {
                        max_duration: 60,
                        max_depth: 1,
                    }),
                ),
                Job::new("activeScan", JobKind::ActiveScan),
                report_job(),
            ],
        }
    }

    #[test]
    fn test_default_run_parameters() {
        let params = RunParameters::default();
        assert!(params.fail_on_error);
        assert!(!params.fail_on_warning);
        assert!(params.progress_to_stdout);
        assert!(!params.continue_on_failure);
    }

    #[test]
    fn test_yaml_uses_schema_keys() {
        let yaml = sample_plan().to_yaml().unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let env = &doc["env"];
        assert_eq!(env["contexts"][0]["name"].as_str(), Some("default"));
        assert_eq!(env["contexts"][0]["urls"][0].as_str(), Some("https://example.com"));
        assert_eq!(env["parameters"]["failOnError"].as_bool(), Some(true));
        assert_eq!(env["parameters"]["failOnWarning"].as_bool(), Some(false));
        assert_eq!(env["parameters"]["progressToStdout"].as_bool(), Some(true));
        assert_eq!(env["parameters"]["continueOnFailure"].as_bool(), Some(false));

        let spider = &doc["jobs"][0];
        assert_eq!(spider["name"].as_str(), Some("spider"));
        assert_eq!(spider["type"].as_str(), Some("spider"));
        assert_eq!(spider["parameters"]["maxDuration"].as_u64(), Some(60));
        assert_eq!(spider["parameters"]["maxDepth"].as_u64(), Some(1));

        let report = &doc["jobs"][2];
        assert_eq!(report["type"].as_str(), Some("report"));
        assert_eq!(report["parameters"]["template"].as_str(), Some("traditional-json"));
        assert_eq!(report["parameters"]["reportFile"].as_str(), Some("report"));
    }

    #[test]
    fn test_yaml_omits_empty_fields() {
        let yaml = sample_plan().to_yaml().unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let context = doc["env"]["contexts"][0].as_mapping().unwrap();
        assert!(!context.contains_key("excludePaths"));
        assert!(!context.contains_key("includePaths"));

        let active = doc["jobs"][1].as_mapping().unwrap();
        assert_eq!(active.get("type").and_then(|v| v.as_str()), Some("activeScan"));
        assert!(!active.contains_key("parameters"));

        let report_params = doc["jobs"][2]["parameters"].as_mapping().unwrap();
        assert!(!report_params.contains_key("reportTitle"));
        assert!(!report_params.contains_key("reportDescription"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let plan = sample_plan();
        let parsed = RunConfiguration::from_yaml(&plan.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn test_json_report_file() {
        assert_eq!(sample_plan().json_report_file().as_deref(), Some("report.json"));

        let mut plan = sample_plan();
        plan.jobs.pop();
        assert_eq!(plan.json_report_file(), None);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zap.yaml");
        sample_plan().write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(RunConfiguration::from_yaml(&content).unwrap(), sample_plan());
    }
}
