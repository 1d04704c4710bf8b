use std::path::PathBuf;

use anyhow::{Context as _, Result};

use zap_autorun_reports::{Summarizer, Summary, to_markdown};

use crate::cli::args::ScanArgs;
use crate::cli::commands::load_config;
use crate::cli::ui::{StatusPrinter, SummaryTable};
use crate::config::ZapAutorunConfig;
use crate::pipeline::gate;

pub async fn run_summarize_command(args: ScanArgs, report: PathBuf) -> Result<()> {
    let config = load_config(&args)?;

    let summary = Summarizer::with_policy(config.output.unknown_risk)
        .summarize_file(&report)
        .context("failed to get summary")?;

    present_summary(&summary, &config, config.scan.endpoint.as_deref())
}

/// Print the tables, write the requested exports, then apply the gate.
pub fn present_summary(
    summary: &Summary,
    config: &ZapAutorunConfig,
    target: Option<&str>,
) -> Result<()> {
    SummaryTable::new().print(summary);

    let printer = StatusPrinter::new();

    if let Some(ref path) = config.output.summary_json {
        summary.save_json(path)?;
        printer.success("Wrote", &path.display().to_string());
    }

    if let Some(ref path) = config.output.summary_markdown {
        std::fs::write(path, to_markdown(summary, target))
            .with_context(|| format!("failed to write {}", path.display()))?;
        printer.success("Wrote", &path.display().to_string());
    }

    if summary.unknown > 0 {
        printer.warning(
            "Unknown",
            &format!("{} alert(s) with an unrecognized risk code", summary.unknown),
        );
    }

    if !config.output.gate {
        if summary.has_high() {
            printer.warning("Ignored", &format!("{} high severity alert(s)", summary.high));
        }
        return Ok(());
    }

    if let Err(e) = gate(summary) {
        printer.error("Failed", &format!("{} high severity alert(s)", summary.high));
        return Err(e.into());
    }
    printer.success("Finished", &format!("{} alert(s), none high", summary.classified_total()));
    Ok(())
}
