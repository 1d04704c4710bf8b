use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Target URL to scan
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Scan type: passive (default) or active
    #[arg(short = 't', long = "type", global = true)]
    pub scan_type: Option<String>,

    /// Directory for zap.yaml and the scanner reports
    #[arg(short, long, global = true)]
    pub directory: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Scanner launcher (default: zap.sh)
    #[arg(long, global = true)]
    pub scanner: Option<PathBuf>,

    /// Kill the scanner after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// How to treat alerts with an unknown risk code: drop or tally
    #[arg(long, global = true)]
    pub unknown_risk: Option<String>,

    /// Write the summary as JSON
    #[arg(long, global = true)]
    pub summary_json: Option<PathBuf>,

    /// Write the summary as Markdown
    #[arg(long, global = true)]
    pub summary_markdown: Option<PathBuf>,

    /// Do not fail when high severity alerts are found
    #[arg(long, global = true)]
    pub no_gate: bool,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[arg(long, global = true)]
    pub debug: bool,

    /// Print a default configuration file and exit
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the plan, run the scanner and summarize its report (default)
    Scan,

    /// Print the automation plan without running the scanner
    Plan {
        /// Write the plan to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize an existing report.json
    Summarize {
        /// Path to the scanner's JSON report
        report: PathBuf,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ScanArgs {
    pub endpoint: Option<String>,
    pub scan_type: Option<String>,
    pub directory: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub scanner: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub unknown_risk: Option<String>,
    pub summary_json: Option<PathBuf>,
    pub summary_markdown: Option<PathBuf>,
    pub no_gate: bool,
    pub verbosity: u8,
    pub debug: bool,
}

impl From<&Args> for ScanArgs {
    fn from(args: &Args) -> Self {
        ScanArgs {
            endpoint: args.endpoint.clone(),
            scan_type: args.scan_type.clone(),
            directory: args.directory.clone(),
            config: args.config.clone(),
            scanner: args.scanner.clone(),
            timeout: args.timeout,
            unknown_risk: args.unknown_risk.clone(),
            summary_json: args.summary_json.clone(),
            summary_markdown: args.summary_markdown.clone(),
            no_gate: args.no_gate,
            verbosity: args.verbosity,
            debug: args.debug,
        }
    }
}
