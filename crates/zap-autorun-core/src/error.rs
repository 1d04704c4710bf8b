//! Errors raised while turning operator input into a scan plan.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Scan type not supported: {0:?} (expected \"passive\" or \"active\")")]
    UnsupportedScanType(String),
}

impl BuildError {
    pub(crate) fn invalid_target(target: &str, reason: impl Into<String>) -> Self {
        BuildError::InvalidTarget {
            target: target.to_string(),
            reason: reason.into(),
        }
    }
}
