//! OWASP ZAP automation plan generation.
//!
//! This crate turns a [`ScanIntent`](zap_autorun_core::ScanIntent) into the
//! YAML document consumed by `zap.sh -cmd -autorun`:
//! - Plan data model (environment, contexts, typed jobs)
//! - Tunable run policy with the documented defaults
//! - The builder selecting a job pipeline per scan mode

mod builder;
mod model;
mod policy;

pub use builder::{ConfigBuilder, build};
pub use model::{
    Context, Environment, Job, JobKind, PassiveScanConfigParameters, PlanError, ReportParameters,
    RunConfiguration, RunParameters, SpiderParameters,
};
pub use policy::{
    DEFAULT_CONTEXT_NAME, JSON_REPORT_TEMPLATE, PDF_REPORT_TEMPLATE, REPORT_FILE, RunPolicy,
};
