//! Launching the ZAP process for a generated plan.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Errors that can occur while running the scanner.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn scanner process: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("Scanner binary not found at: {0}")]
    BinaryNotFound(PathBuf),

    #[error("Scanner timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("zap scan failed: exit code {code}")]
    NonZeroExit { code: i32 },
}

/// Something that executes an automation plan and leaves its reports next to it.
#[async_trait]
pub trait ScannerProcess: Send + Sync {
    async fn run(&self, plan_path: &Path) -> Result<(), RunnerError>;
}

/// Runs `zap.sh -cmd -autorun <plan>` with the scanner's output streamed to
/// the terminal.
#[derive(Debug, Clone)]
pub struct ZapRunner {
    command: PathBuf,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl Default for ZapRunner {
    fn default() -> Self {
        Self {
            command: PathBuf::from("zap.sh"),
            extra_args: Vec::new(),
            timeout: None,
        }
    }
}

impl ZapRunner {
    pub fn new(command: PathBuf) -> Self {
        Self {
            command,
            ..Default::default()
        }
    }

    /// Arguments placed before `-cmd -autorun`.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    fn build_command(&self, plan_path: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.extra_args)
            .arg("-cmd")
            .arg("-autorun")
            .arg(plan_path)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ScannerProcess for ZapRunner {
    async fn run(&self, plan_path: &Path) -> Result<(), RunnerError> {
        let mut cmd = self.build_command(plan_path);
        debug!("Spawning scanner process: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RunnerError::BinaryNotFound(self.command.clone())
            } else {
                RunnerError::SpawnError(e)
            }
        })?;

        let status = match self.timeout {
            Some(limit) => {
                let waited = timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status?,
                    Err(_) => {
                        warn!("Scanner exceeded {:?}, killing it", limit);
                        if let Err(e) = child.kill().await {
                            warn!("Failed to kill scanner process: {}", e);
                        }
                        return Err(RunnerError::Timeout {
                            timeout_secs: limit.as_secs(),
                        });
                    }
                }
            }
            None => child.wait().await?,
        };

        if !status.success() {
            return Err(RunnerError::NonZeroExit {
                code: status.code().unwrap_or(-1),
            });
        }

        info!("Scanner finished for {}", plan_path.display());
        Ok(())
    }
}
