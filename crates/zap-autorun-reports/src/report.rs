//! The subset of the ZAP `traditional-json` report that the summary needs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to load report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode report: {0}")]
    DecodeFailure(#[from] serde_json::Error),
}

/// Scanner output. Fields not listed here are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanReport {
    #[serde(rename = "site", default)]
    pub sites: Vec<Site>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Text, not a number: ZAP writes `"riskcode": "3"`.
    #[serde(rename = "riskcode", default)]
    pub risk_code: String,
}

impl Alert {
    pub fn new(name: &str, description: &str, risk_code: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            risk_code: risk_code.to_string(),
        }
    }
}

impl ScanReport {
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let report = Self::from_json(&content)?;
        log::debug!(
            "Loaded report {} ({} sites, {} alerts)",
            path.display(),
            report.sites.len(),
            report.alert_count()
        );
        Ok(report)
    }

    /// Alerts across all sites, in report order.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.sites.iter().flat_map(|site| site.alerts.iter())
    }

    pub fn alert_count(&self) -> usize {
        self.sites.iter().map(|site| site.alerts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_traditional_json() {
        let json = r#"{
            "@version": "2.14.0",
            "@generated": "Mon, 1 Jan 2024 00:00:00",
            "site": [{
                "@name": "https://example.com",
                "@host": "example.com",
                "alerts": [{
                    "pluginid": "10038",
                    "name": "Content Security Policy (CSP) Header Not Set",
                    "riskcode": "2",
                    "confidence": "3",
                    "riskdesc": "Medium (High)",
                    "desc": "<p>CSP is missing</p>",
                    "instances": []
                }]
            }]
        }"#;

        let report = ScanReport::from_json(json).unwrap();
        assert_eq!(report.sites.len(), 1);
        let alert = &report.sites[0].alerts[0];
        assert_eq!(alert.name, "Content Security Policy (CSP) Header Not Set");
        assert_eq!(alert.description, "<p>CSP is missing</p>");
        assert_eq!(alert.risk_code, "2");
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let report = ScanReport::from_json("{}").unwrap();
        assert!(report.sites.is_empty());

        let report = ScanReport::from_json(r#"{"site":[{"@name":"x"}]}"#).unwrap();
        assert_eq!(report.sites.len(), 1);
        assert_eq!(report.alert_count(), 0);
    }

    #[test]
    fn test_numeric_risk_code_is_a_decode_failure() {
        let json = r#"{"site":[{"alerts":[{"name":"a","desc":"b","riskcode":3}]}]}"#;
        assert!(matches!(
            ScanReport::from_json(json),
            Err(ReportError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ScanReport::from_json("not json"),
            Err(ReportError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(
            &path,
            r#"{"site":[{"alerts":[{"name":"a","desc":"b","riskcode":"1"}]},{"alerts":[]}]}"#,
        )
        .unwrap();

        let report = ScanReport::from_file(&path).unwrap();
        assert_eq!(report.sites.len(), 2);
        assert_eq!(report.alerts().count(), 1);

        let missing = ScanReport::from_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ReportError::Io { .. })));
    }
}
