//! Scan intents: what the operator asked the scanner to do.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::BuildError;

/// The kind of scan to run against the target.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Spider the target and only observe traffic.
    #[default]
    Passive,
    /// Spider the target and send attack payloads.
    Active,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Passive => "passive",
            ScanMode::Active => "active",
        }
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passive" => Ok(ScanMode::Passive),
            "active" => Ok(ScanMode::Active),
            _ => Err(BuildError::UnsupportedScanType(s.to_string())),
        }
    }
}

/// A scan mode paired with the URL it targets.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ScanIntent {
    pub mode: ScanMode,
    pub target_url: String,
}

impl ScanIntent {
    pub fn new(mode: ScanMode, target_url: impl Into<String>) -> Self {
        Self {
            mode,
            target_url: target_url.into(),
        }
    }

    /// Build an intent from the raw strings an operator supplies.
    ///
    /// Only the mode is checked here; the target is validated when the
    /// intent is turned into a run configuration.
    pub fn parse(mode: &str, target_url: &str) -> Result<Self, BuildError> {
        Ok(Self::new(mode.parse()?, target_url))
    }

    /// Check that the target is a usable absolute http(s) URL.
    pub fn validate_target(&self) -> Result<(), BuildError> {
        let target = self.target_url.as_str();
        if target.trim().is_empty() {
            return Err(BuildError::invalid_target(target, "target URL is empty"));
        }
        // The URL parser strips surrounding whitespace, the plan would not.
        if target != target.trim() || target.chars().any(char::is_control) {
            return Err(BuildError::invalid_target(
                target,
                "target URL contains whitespace or control characters",
            ));
        }

        let parsed =
            Url::parse(target).map_err(|e| BuildError::invalid_target(target, e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(BuildError::invalid_target(
                    target,
                    format!("unsupported scheme '{}'", other),
                ));
            }
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(BuildError::invalid_target(target, "target URL has no host"));
        }

        Ok(())
    }
}
