pub mod plan;
pub mod scan;
pub mod summarize;

pub use plan::run_plan_command;
pub use scan::run_scan_command;
pub use summarize::{present_summary, run_summarize_command};

use anyhow::Result;

use crate::cli::args::ScanArgs;
use crate::config::ZapAutorunConfig;

/// Resolve configuration from files, `ZAP_WRAPPER_*` variables and flags.
pub(crate) fn load_config(args: &ScanArgs) -> Result<ZapAutorunConfig> {
    let env_vars: std::collections::HashMap<String, String> = std::env::vars().collect();
    ZapAutorunConfig::load_with_precedence(args.config.clone(), args, &env_vars)
}
