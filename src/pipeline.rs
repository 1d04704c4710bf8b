//! Plan → scanner → summary, without any terminal output.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use thiserror::Error;
use tracing::info;

use zap_autorun_core::ScanIntent;
use zap_autorun_plan::{ConfigBuilder, RunConfiguration};
use zap_autorun_reports::{Summarizer, Summary};

use crate::runner::ScannerProcess;

/// Name of the plan file written into the scan directory.
pub const PLAN_FILE: &str = "zap.yaml";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("results marked as high were found ({count})")]
    HighSeverityFindings { count: usize },
}

/// Fail when the summary contains high severity alerts.
pub fn gate(summary: &Summary) -> Result<(), GateError> {
    if summary.has_high() {
        return Err(GateError::HighSeverityFindings {
            count: summary.high,
        });
    }
    Ok(())
}

/// Artifacts and result of one scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub plan: RunConfiguration,
    pub plan_path: PathBuf,
    pub report_path: PathBuf,
    pub summary: Summary,
}

pub struct ScanPipeline<R: ScannerProcess> {
    runner: R,
    builder: ConfigBuilder,
    summarizer: Summarizer,
}

impl<R: ScannerProcess> ScanPipeline<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            builder: ConfigBuilder::default(),
            summarizer: Summarizer::default(),
        }
    }

    pub fn with_builder(mut self, builder: ConfigBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Build and persist the plan for `intent` in `directory`.
    pub fn prepare(
        &self,
        intent: &ScanIntent,
        directory: &Path,
    ) -> Result<(RunConfiguration, PathBuf)> {
        let plan = self.builder.build(intent)?;

        std::fs::create_dir_all(directory)
            .with_context(|| format!("failed to create directory {}", directory.display()))?;

        let plan_path = directory.join(PLAN_FILE);
        plan.write_to_file(&plan_path).context("failed to write config data")?;

        Ok((plan, plan_path))
    }

    /// Hand the plan to the scanner and wait for it to finish.
    pub async fn execute(&self, plan_path: &Path) -> Result<()> {
        self.runner.run(plan_path).await?;
        Ok(())
    }

    /// Summarize the JSON report the plan asked the scanner to write.
    pub fn collect(
        &self,
        plan: &RunConfiguration,
        directory: &Path,
    ) -> Result<(PathBuf, Summary)> {
        let report_file = plan
            .json_report_file()
            .ok_or_else(|| anyhow!("plan does not produce a JSON report"))?;
        let report_path = directory.join(report_file);

        let summary = self
            .summarizer
            .summarize_file(&report_path)
            .context("failed to get summary")?;

        Ok((report_path, summary))
    }

    /// Run the full pipeline. Gating is left to the caller.
    pub async fn run(&self, intent: &ScanIntent, directory: &Path) -> Result<ScanOutcome> {
        let (plan, plan_path) = self.prepare(intent, directory)?;
        info!("Plan written to {}", plan_path.display());

        self.execute(&plan_path).await?;

        let (report_path, summary) = self.collect(&plan, directory)?;

        Ok(ScanOutcome {
            plan,
            plan_path,
            report_path,
            summary,
        })
    }
}
