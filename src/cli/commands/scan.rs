use anyhow::Result;
use tracing::info;

use zap_autorun_core::ScanIntent;
use zap_autorun_plan::ConfigBuilder;
use zap_autorun_reports::Summarizer;

use crate::cli::args::ScanArgs;
use crate::cli::commands::{load_config, present_summary};
use crate::cli::ui::StatusPrinter;
use crate::pipeline::ScanPipeline;
use crate::runner::ZapRunner;

pub async fn run_scan_command(args: ScanArgs) -> Result<()> {
    let config = load_config(&args)?;

    let directory = config.require_directory()?.to_path_buf();
    let endpoint = config.require_endpoint()?;
    let intent = ScanIntent::parse(config.scan_type(), endpoint)?;

    let printer = StatusPrinter::new();
    info!("Scanning {} ({} mode)", intent.target_url, intent.mode.as_str());

    let runner = ZapRunner::new(config.scanner.command.clone())
        .with_args(config.scanner.args.clone())
        .with_timeout(config.scanner_timeout());
    let pipeline = ScanPipeline::new(runner)
        .with_builder(ConfigBuilder::with_policy(config.run_policy()))
        .with_summarizer(Summarizer::with_policy(config.output.unknown_risk));

    printer.status(
        "Generating",
        &format!("{} scan plan for {}", intent.mode.as_str(), intent.target_url),
    );
    let (plan, plan_path) = pipeline.prepare(&intent, &directory)?;
    printer.info("Plan", &plan_path.display().to_string());

    printer.status(
        "Running",
        &format!("{} -cmd -autorun {}", config.scanner.command.display(), plan_path.display()),
    );
    pipeline.execute(&plan_path).await?;

    printer.status("Checking", "scan results");
    let (report_path, summary) = pipeline.collect(&plan, &directory)?;
    printer.info("Report", &report_path.display().to_string());

    present_summary(&summary, &config, Some(&intent.target_url))
}
