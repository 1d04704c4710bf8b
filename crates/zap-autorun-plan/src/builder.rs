//! Builds automation plans from scan intents.

use tracing::debug;

use zap_autorun_core::{BuildError, ScanIntent, ScanMode};

use crate::model::{
    Context, Environment, Job, JobKind, PassiveScanConfigParameters, ReportParameters,
    RunConfiguration, SpiderParameters,
};
use crate::policy::{
    DEFAULT_CONTEXT_NAME, JSON_REPORT_TEMPLATE, PDF_REPORT_TEMPLATE, REPORT_FILE, RunPolicy,
};

/// Build a plan with the default policy.
pub fn build(intent: &ScanIntent) -> Result<RunConfiguration, BuildError> {
    ConfigBuilder::default().build(intent)
}

/// Turns a [`ScanIntent`] into a [`RunConfiguration`] under a [`RunPolicy`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    policy: RunPolicy,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RunPolicy) -> Self {
        Self { policy }
    }

    /// Build the plan for `intent`.
    ///
    /// The target is validated first; nothing is returned unless the whole
    /// plan could be built.
    pub fn build(&self, intent: &ScanIntent) -> Result<RunConfiguration, BuildError> {
        intent.validate_target()?;

        let jobs = match intent.mode {
            ScanMode::Passive => self.passive_jobs(),
            ScanMode::Active => self.active_jobs(),
        };

        debug!(
            "Built {} plan for {} with {} jobs",
            intent.mode,
            intent.target_url,
            jobs.len()
        );

        Ok(RunConfiguration {
            environment: Environment {
                contexts: vec![self.context(&intent.target_url)],
                parameters: self.policy.parameters,
            },
            jobs,
        })
    }

    // Exclude/include paths are not exposed yet.
    fn context(&self, target_url: &str) -> Context {
        Context {
            name: DEFAULT_CONTEXT_NAME.to_string(),
            urls: vec![target_url.to_string()],
            exclude_paths: Vec::new(),
            include_paths: Vec::new(),
        }
    }

    fn passive_jobs(&self) -> Vec<Job> {
        let mut jobs = vec![
            Job::new(
                "passiveScan-config",
                JobKind::PassiveScanConfig(PassiveScanConfigParameters {
                    scan_only_in_scope: self.policy.scan_only_in_scope,
                }),
            ),
            self.spider_job(),
            Job::new("passiveScan-wait", JobKind::PassiveScanWait),
        ];
        jobs.extend(self.report_jobs());
        jobs
    }

    fn active_jobs(&self) -> Vec<Job> {
        let mut jobs = vec![self.spider_job(), Job::new("activeScan", JobKind::ActiveScan)];
        jobs.extend(self.report_jobs());
        jobs
    }

    fn spider_job(&self) -> Job {
        Job::new(
            "spider",
            JobKind::Spider(SpiderParameters {
                max_duration: self.policy.spider_max_duration,
                max_depth: self.policy.spider_max_depth,
            }),
        )
    }

    /// Report jobs always close the pipeline so both artifacts describe a
    /// finished scan.
    fn report_jobs(&self) -> [Job; 2] {
        [
            Job::new(
                "pdf",
                JobKind::Report(ReportParameters {
                    report_title: Some(self.policy.report_title.clone()),
                    report_description: Some(self.policy.report_description.clone()),
                    template: PDF_REPORT_TEMPLATE.to_string(),
                    report_file: REPORT_FILE.to_string(),
                }),
            ),
            Job::new(
                "json",
                JobKind::Report(ReportParameters {
                    report_title: None,
                    report_description: None,
                    template: JSON_REPORT_TEMPLATE.to_string(),
                    report_file: REPORT_FILE.to_string(),
                }),
            ),
        ]
    }
}
