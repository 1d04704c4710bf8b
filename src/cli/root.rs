use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Args, Commands, ScanArgs};
use crate::cli::commands::{run_plan_command, run_scan_command, run_summarize_command};
use crate::config::ZapAutorunConfig;

pub struct RootCommand;

impl RootCommand {
    pub async fn execute() -> Result<()> {
        let args = Args::parse();
        init_tracing(args.verbosity, args.debug);

        if args.generate_config {
            println!("{}", ZapAutorunConfig::generate_default_config());
            return Ok(());
        }

        eprintln!("zap-autorun v{}", env!("CARGO_PKG_VERSION"));

        let scan_args = ScanArgs::from(&args);

        match &args.command {
            Some(Commands::Plan { output }) => run_plan_command(scan_args, output.clone()).await,
            Some(Commands::Summarize { report }) => {
                run_summarize_command(scan_args, report.clone()).await
            }
            Some(Commands::Scan) | None => run_scan_command(scan_args).await,
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` / `--debug` pick the level for our crates.
fn init_tracing(verbosity: u8, debug: bool) {
    let level = match (debug, verbosity) {
        (true, _) | (_, 2..) => "debug",
        (false, 1) => "info",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,zap_autorun={level},zap_autorun_plan={level},zap_autorun_reports={level}"
        ))
    });

    // Also installs the `log` bridge for crates logging through the facade.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
