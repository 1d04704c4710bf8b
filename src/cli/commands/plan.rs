use std::path::PathBuf;

use anyhow::{Context as _, Result};

use zap_autorun_core::ScanIntent;
use zap_autorun_plan::ConfigBuilder;

use crate::cli::args::ScanArgs;
use crate::cli::commands::load_config;
use crate::cli::ui::StatusPrinter;

/// Build the plan and print it, or write it to `output`.
pub async fn run_plan_command(args: ScanArgs, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(&args)?;

    let endpoint = config.require_endpoint()?;
    let intent = ScanIntent::parse(config.scan_type(), endpoint)?;
    let plan = ConfigBuilder::with_policy(config.run_policy()).build(&intent)?;

    match output {
        Some(path) => {
            plan.write_to_file(&path).context("failed to write config data")?;
            StatusPrinter::new().success("Wrote", &path.display().to_string());
        }
        None => print!("{}", plan.to_yaml()?),
    }

    Ok(())
}
