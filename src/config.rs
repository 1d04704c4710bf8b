use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use zap_autorun_plan::{RunParameters, RunPolicy};
use zap_autorun_reports::UnknownRiskPolicy;

use crate::cli::args::ScanArgs;

/// Prefix of every environment variable the wrapper reads.
pub const ENV_PREFIX: &str = "ZAP_WRAPPER_";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ZapAutorunConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// What to scan and where the artifacts go.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Target URL
    pub endpoint: Option<String>,

    /// "passive" (default) or "active"
    #[serde(default = "default_scan_type")]
    pub scan_type: String,

    /// Directory receiving zap.yaml and the reports
    pub directory: Option<PathBuf>,
}

/// How the scanner process is launched.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    #[serde(default = "default_scanner_command")]
    pub command: PathBuf,

    /// Arguments placed before `-cmd -autorun <plan>`
    #[serde(default)]
    pub args: Vec<String>,

    /// 0 disables the timeout
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Values written into the generated plan.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    #[serde(default = "default_true")]
    pub fail_on_error: bool,

    #[serde(default)]
    pub fail_on_warning: bool,

    #[serde(default = "default_true")]
    pub progress_to_stdout: bool,

    #[serde(default)]
    pub continue_on_failure: bool,

    /// Minutes
    #[serde(default = "default_spider_max_duration")]
    pub spider_max_duration: u32,

    #[serde(default = "default_spider_max_depth")]
    pub spider_max_depth: u32,

    #[serde(default = "default_true")]
    pub scan_only_in_scope: bool,

    #[serde(default = "default_report_title")]
    pub report_title: String,

    #[serde(default = "default_report_description")]
    pub report_description: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub unknown_risk: UnknownRiskPolicy,

    pub summary_json: Option<PathBuf>,

    pub summary_markdown: Option<PathBuf>,

    /// Fail the run when high severity alerts are reported
    #[serde(default = "default_true")]
    pub gate: bool,
}

fn default_scan_type() -> String {
    "passive".to_string()
}

fn default_scanner_command() -> PathBuf {
    PathBuf::from("zap.sh")
}

fn default_true() -> bool {
    true
}

fn default_spider_max_duration() -> u32 {
    RunPolicy::default().spider_max_duration
}

fn default_spider_max_depth() -> u32 {
    RunPolicy::default().spider_max_depth
}

fn default_report_title() -> String {
    RunPolicy::default().report_title
}

fn default_report_description() -> String {
    RunPolicy::default().report_description
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            scan_type: default_scan_type(),
            directory: None,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            command: default_scanner_command(),
            args: Vec::new(),
            timeout_secs: 0,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let parameters = RunParameters::default();
        Self {
            fail_on_error: parameters.fail_on_error,
            fail_on_warning: parameters.fail_on_warning,
            progress_to_stdout: parameters.progress_to_stdout,
            continue_on_failure: parameters.continue_on_failure,
            spider_max_duration: default_spider_max_duration(),
            spider_max_depth: default_spider_max_depth(),
            scan_only_in_scope: true,
            report_title: default_report_title(),
            report_description: default_report_description(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            unknown_risk: UnknownRiskPolicy::default(),
            summary_json: None,
            summary_markdown: None,
            gate: true,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("Invalid value in {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One configuration file. Only the keys the file actually sets are `Some`,
/// so a later layer can also put a value back to its default.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConfigLayer {
    pub scan: ScanLayer,
    pub scanner: ScannerLayer,
    pub policy: PolicyLayer,
    pub output: OutputLayer,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScanLayer {
    pub endpoint: Option<String>,
    pub scan_type: Option<String>,
    pub directory: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScannerLayer {
    pub command: Option<PathBuf>,
    pub args: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PolicyLayer {
    pub fail_on_error: Option<bool>,
    pub fail_on_warning: Option<bool>,
    pub progress_to_stdout: Option<bool>,
    pub continue_on_failure: Option<bool>,
    pub spider_max_duration: Option<u32>,
    pub spider_max_depth: Option<u32>,
    pub scan_only_in_scope: Option<bool>,
    pub report_title: Option<String>,
    pub report_description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OutputLayer {
    pub unknown_risk: Option<UnknownRiskPolicy>,
    pub summary_json: Option<PathBuf>,
    pub summary_markdown: Option<PathBuf>,
    pub gate: Option<bool>,
}

impl ConfigLayer {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

fn set_some<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *slot = value.clone();
    }
}

impl ZapAutorunConfig {
    /// Apply every key `layer` sets, whatever its value.
    pub fn merge(&mut self, layer: &ConfigLayer) {
        set_some(&mut self.scan.endpoint, &layer.scan.endpoint);
        set(&mut self.scan.scan_type, &layer.scan.scan_type);
        set_some(&mut self.scan.directory, &layer.scan.directory);

        set(&mut self.scanner.command, &layer.scanner.command);
        set(&mut self.scanner.args, &layer.scanner.args);
        set(&mut self.scanner.timeout_secs, &layer.scanner.timeout_secs);

        let policy = &layer.policy;
        set(&mut self.policy.fail_on_error, &policy.fail_on_error);
        set(&mut self.policy.fail_on_warning, &policy.fail_on_warning);
        set(&mut self.policy.progress_to_stdout, &policy.progress_to_stdout);
        set(&mut self.policy.continue_on_failure, &policy.continue_on_failure);
        set(&mut self.policy.spider_max_duration, &policy.spider_max_duration);
        set(&mut self.policy.spider_max_depth, &policy.spider_max_depth);
        set(&mut self.policy.scan_only_in_scope, &policy.scan_only_in_scope);
        set(&mut self.policy.report_title, &policy.report_title);
        set(&mut self.policy.report_description, &policy.report_description);

        set(&mut self.output.unknown_risk, &layer.output.unknown_risk);
        set_some(&mut self.output.summary_json, &layer.output.summary_json);
        set_some(&mut self.output.summary_markdown, &layer.output.summary_markdown);
        set(&mut self.output.gate, &layer.output.gate);
    }

    pub fn generate_default_config() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_else(|_| {
            r#"# zap-autorun configuration

[scan]
# endpoint = "https://example.com"
scan_type = "passive"
# directory = "/zap/wrk"

[scanner]
command = "zap.sh"
args = []
timeout_secs = 0

[policy]
fail_on_error = true
fail_on_warning = false
progress_to_stdout = true
continue_on_failure = false
spider_max_duration = 60
spider_max_depth = 1
scan_only_in_scope = true
report_title = "Automated Vulnerability Scan"
report_description = "This is an automated report"

[output]
unknown_risk = "drop"
gate = true
"#
            .to_string()
        })
    }

    /// Defaults overlaid with a single file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge(&ConfigLayer::load_from_file(path)?);
        Ok(config)
    }

    /// Get the user config file path (~/.config/zap-autorun/config.toml)
    pub fn get_user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/zap-autorun/config.toml"))
    }

    /// Get the current directory config file path (./zap-autorun.toml)
    pub fn get_current_config_path() -> PathBuf {
        PathBuf::from("./zap-autorun.toml")
    }

    /// Load and merge configs from all sources with priority:
    /// 1. User config (~/.config/zap-autorun/config.toml) - lowest priority
    /// 2. Current directory (./zap-autorun.toml)
    pub fn load_with_merged_configs() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_path) = Self::get_user_config_path() {
            if user_path.exists() {
                config.merge(&ConfigLayer::load_from_file(&user_path)?);
                tracing::debug!("Loaded user config from: {}", user_path.display());
            }
        }

        let current_path = Self::get_current_config_path();
        if current_path.exists() {
            config.merge(&ConfigLayer::load_from_file(&current_path)?);
            tracing::debug!("Loaded current directory config from: {}", current_path.display());
        }

        Ok(config)
    }

    /// Apply `ZAP_WRAPPER_*` variables. Empty values are ignored.
    pub fn apply_env_vars(&mut self, env_vars: &HashMap<String, String>) -> Result<()> {
        for (key, value) in env_vars {
            let Some(config_key) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }

            match config_key {
                "ENDPOINT" => self.scan.endpoint = Some(value.clone()),
                "DIRECTORY" => self.scan.directory = Some(PathBuf::from(value)),
                "TYPE" => self.scan.scan_type = value.clone(),
                "SCANNER_COMMAND" => self.scanner.command = PathBuf::from(value),
                "TIMEOUT_SECS" => {
                    self.scanner.timeout_secs = value
                        .parse()
                        .map_err(|_| anyhow!("Invalid timeout_secs value: {}", value))?;
                }
                "SPIDER_MAX_DURATION" => {
                    self.policy.spider_max_duration = value
                        .parse()
                        .map_err(|_| anyhow!("Invalid spider_max_duration value: {}", value))?;
                }
                "SPIDER_MAX_DEPTH" => {
                    self.policy.spider_max_depth = value
                        .parse()
                        .map_err(|_| anyhow!("Invalid spider_max_depth value: {}", value))?;
                }
                "UNKNOWN_RISK" => {
                    self.output.unknown_risk = value.parse().map_err(|e: String| anyhow!(e))?;
                }
                "SUMMARY_JSON" => self.output.summary_json = Some(PathBuf::from(value)),
                "SUMMARY_MARKDOWN" => self.output.summary_markdown = Some(PathBuf::from(value)),
                _ => {} // Ignore unknown environment variables
            }
        }

        Ok(())
    }

    pub fn apply_scan_args(&mut self, args: &ScanArgs) -> Result<()> {
        if let Some(ref endpoint) = args.endpoint {
            self.scan.endpoint = Some(endpoint.clone());
        }
        if let Some(ref scan_type) = args.scan_type {
            self.scan.scan_type = scan_type.clone();
        }
        if let Some(ref directory) = args.directory {
            self.scan.directory = Some(directory.clone());
        }
        if let Some(ref scanner) = args.scanner {
            self.scanner.command = scanner.clone();
        }
        if let Some(timeout) = args.timeout {
            self.scanner.timeout_secs = timeout;
        }
        if let Some(ref unknown_risk) = args.unknown_risk {
            self.output.unknown_risk = unknown_risk.parse().map_err(|e: String| anyhow!(e))?;
        }
        if let Some(ref path) = args.summary_json {
            self.output.summary_json = Some(path.clone());
        }
        if let Some(ref path) = args.summary_markdown {
            self.output.summary_markdown = Some(path.clone());
        }
        if args.no_gate {
            self.output.gate = false;
        }

        Ok(())
    }

    /// Load configuration with full precedence chain:
    /// 1. Default values (lowest)
    /// 2. User config (~/.config/zap-autorun/config.toml)
    /// 3. Current directory (./zap-autorun.toml)
    /// 4. Explicit --config file
    /// 5. Environment variables (ZAP_WRAPPER_*)
    /// 6. CLI arguments (highest)
    pub fn load_with_precedence(
        config_path: Option<PathBuf>,
        cli_args: &ScanArgs,
        env_vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut config = Self::load_with_merged_configs()?;

        if let Some(path) = config_path {
            let explicit_layer = ConfigLayer::load_from_file(&path)
                .map_err(|e| anyhow!("Failed to load config file {}: {}", path.display(), e))?;
            config.merge(&explicit_layer);
        }

        config.apply_env_vars(env_vars)?;
        config.apply_scan_args(cli_args)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.command.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scanner.command".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }

        if let Some(ref directory) = self.scan.directory {
            if directory.exists() && !directory.is_dir() {
                return Err(ConfigError::InvalidValue {
                    field: "scan.directory".to_string(),
                    value: directory.display().to_string(),
                    reason: "not a directory".to_string(),
                });
            }
        }

        if self.policy.report_title.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "policy.report_title".to_string(),
                value: self.policy.report_title.clone(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        self.scan
            .endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "endpoint".to_string(),
            })
    }

    pub fn require_directory(&self) -> Result<&Path, ConfigError> {
        self.scan
            .directory
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "directory".to_string(),
            })
    }

    /// Scan type with the passive default applied to blank values.
    pub fn scan_type(&self) -> &str {
        if self.scan.scan_type.trim().is_empty() {
            "passive"
        } else {
            &self.scan.scan_type
        }
    }

    pub fn run_policy(&self) -> RunPolicy {
        let policy = &self.policy;
        RunPolicy::default()
            .with_parameters(RunParameters {
                fail_on_error: policy.fail_on_error,
                fail_on_warning: policy.fail_on_warning,
                progress_to_stdout: policy.progress_to_stdout,
                continue_on_failure: policy.continue_on_failure,
            })
            .with_spider_limits(policy.spider_max_duration, policy.spider_max_depth)
            .with_scan_only_in_scope(policy.scan_only_in_scope)
            .with_report_text(policy.report_title.clone(), policy.report_description.clone())
    }

    pub fn scanner_timeout(&self) -> Option<std::time::Duration> {
        match self.scanner.timeout_secs {
            0 => None,
            secs => Some(std::time::Duration::from_secs(secs)),
        }
    }
}
