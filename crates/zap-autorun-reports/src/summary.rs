//! Severity-bucketed summary of a scan report.

use std::path::Path;

use serde::{Deserialize, Serialize};

use zap_autorun_core::{SeverityTier, classify};

use crate::report::{ReportError, ScanReport};

/// What to do with alerts whose risk code is not one of `"0".."3"`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRiskPolicy {
    /// Leave them out of both counts and details.
    #[default]
    Drop,
    /// Count them under `unknown` and list them with severity "Unknown".
    Tally,
}

impl std::str::FromStr for UnknownRiskPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(UnknownRiskPolicy::Drop),
            "tally" => Ok(UnknownRiskPolicy::Tally),
            other => Err(format!(
                "unknown risk policy '{}' (expected 'drop' or 'tally')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
    /// Always zero under [`UnknownRiskPolicy::Drop`].
    #[serde(default)]
    pub unknown: usize,
    pub details: Vec<Detail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Detail {
    pub name: String,
    pub description: String,
    /// `None` for alerts kept under [`UnknownRiskPolicy::Tally`].
    #[serde(with = "severity_label")]
    pub severity: Option<SeverityTier>,
}

impl Detail {
    pub fn severity_label(&self) -> &'static str {
        severity_label::label(self.severity)
    }
}

impl Summary {
    pub fn count(&self, tier: SeverityTier) -> usize {
        match tier {
            SeverityTier::High => self.high,
            SeverityTier::Medium => self.medium,
            SeverityTier::Low => self.low,
            SeverityTier::Info => self.info,
        }
    }

    /// Alerts that mapped onto a known tier.
    pub fn classified_total(&self) -> usize {
        self.high + self.medium + self.low + self.info
    }

    pub fn has_high(&self) -> bool {
        self.high > 0
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn record(&mut self, tier: SeverityTier) {
        match tier {
            SeverityTier::High => self.high += 1,
            SeverityTier::Medium => self.medium += 1,
            SeverityTier::Low => self.low += 1,
            SeverityTier::Info => self.info += 1,
        }
    }
}

/// Folds a [`ScanReport`] into a [`Summary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Summarizer {
    policy: UnknownRiskPolicy,
}

impl Summarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnknownRiskPolicy) -> Self {
        Self { policy }
    }

    /// Walk sites then alerts in report order. Details keep that order.
    pub fn summarize(&self, report: &ScanReport) -> Summary {
        let mut summary = Summary::default();

        for alert in report.alerts() {
            let severity = classify(&alert.risk_code);
            match severity {
                Some(tier) => summary.record(tier),
                None => match self.policy {
                    UnknownRiskPolicy::Drop => {
                        log::debug!(
                            "Dropping alert '{}' with unknown risk code {:?}",
                            alert.name,
                            alert.risk_code
                        );
                        continue;
                    }
                    UnknownRiskPolicy::Tally => summary.unknown += 1,
                },
            }

            summary.details.push(Detail {
                name: alert.name.clone(),
                description: alert.description.clone(),
                severity,
            });
        }

        summary
    }

    pub fn summarize_file(&self, path: &Path) -> Result<Summary, ReportError> {
        let report = ScanReport::from_file(path)?;
        Ok(self.summarize(&report))
    }
}

/// Summarize with the default policy (unknown risk codes are dropped).
pub fn summarize(report: &ScanReport) -> Summary {
    Summarizer::default().summarize(report)
}

mod severity_label {
    use serde::{Deserialize, Deserializer, Serializer};

    use zap_autorun_core::SeverityTier;

    pub const UNKNOWN: &str = "Unknown";

    pub fn label(severity: Option<SeverityTier>) -> &'static str {
        severity.map_or(UNKNOWN, |tier| tier.as_str())
    }

    pub fn serialize<S: Serializer>(
        severity: &Option<SeverityTier>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(label(*severity))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SeverityTier>, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(SeverityTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Alert, Site};

    const SCENARIO: &str = r#"{"site":[{"alerts":[
        {"name":"XSS","desc":"d1","riskcode":"3"},
        {"name":"Info leak","desc":"d2","riskcode":"0"},
        {"name":"Unknown","desc":"d3","riskcode":"9"}
    ]}]}"#;

    fn detail(name: &str, description: &str, severity: Option<SeverityTier>) -> Detail {
        Detail {
            name: name.to_string(),
            description: description.to_string(),
            severity,
        }
    }

    fn report(sites: Vec<Vec<Alert>>) -> ScanReport {
        ScanReport {
            sites: sites.into_iter().map(|alerts| Site { alerts }).collect(),
        }
    }

    #[test]
    fn test_unknown_codes_dropped_by_default() {
        let summary = summarize(&ScanReport::from_json(SCENARIO).unwrap());

        assert_eq!(
            summary,
            Summary {
                high: 1,
                medium: 0,
                low: 0,
                info: 1,
                unknown: 0,
                details: vec![
                    detail("XSS", "d1", Some(SeverityTier::High)),
                    detail("Info leak", "d2", Some(SeverityTier::Info)),
                ],
            }
        );
    }

    #[test]
    fn test_unknown_codes_tallied() {
        let summary = Summarizer::with_policy(UnknownRiskPolicy::Tally)
            .summarize(&ScanReport::from_json(SCENARIO).unwrap());

        assert_eq!(summary.high, 1);
        assert_eq!(summary.info, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.classified_total(), 2);
        assert_eq!(summary.details.len(), 3);
        assert_eq!(summary.details[2], detail("Unknown", "d3", None));
        assert_eq!(summary.details[2].severity_label(), "Unknown");
    }

    #[test]
    fn test_counts_match_known_alerts() {
        let alerts = vec![
            Alert::new("a", "", "0"),
            Alert::new("b", "", "1"),
            Alert::new("c", "", "1"),
            Alert::new("d", "", "2"),
            Alert::new("e", "", "3"),
            Alert::new("f", "", "3"),
            Alert::new("g", "", "3"),
            Alert::new("h", "", "03"),
            Alert::new("i", "", ""),
        ];
        let known = alerts
            .iter()
            .filter(|a| classify(&a.risk_code).is_some())
            .count();

        let summary = summarize(&report(vec![alerts]));
        assert_eq!(summary.classified_total(), known);
        assert_eq!(summary.details.len(), known);
        assert_eq!(
            (summary.high, summary.medium, summary.low, summary.info),
            (3, 1, 2, 1)
        );
        assert_eq!(summary.count(SeverityTier::Low), 2);
    }

    #[test]
    fn test_details_follow_site_then_alert_order() {
        let summary = summarize(&report(vec![
            vec![Alert::new("s1-a", "", "1"), Alert::new("s1-b", "", "3")],
            vec![],
            vec![Alert::new("s3-a", "", "0")],
        ]));

        let names: Vec<&str> = summary.details.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["s1-a", "s1-b", "s3-a"]);
    }

    #[test]
    fn test_counts_ignore_order() {
        let alerts = vec![
            Alert::new("a", "", "3"),
            Alert::new("b", "", "2"),
            Alert::new("c", "", "7"),
            Alert::new("d", "", "0"),
        ];
        let mut reversed = alerts.clone();
        reversed.reverse();

        let forward = summarize(&report(vec![alerts]));
        let backward = summarize(&report(vec![reversed]));
        assert_eq!(
            (forward.high, forward.medium, forward.low, forward.info),
            (backward.high, backward.medium, backward.low, backward.info)
        );
        assert_ne!(forward.details, backward.details);
    }

    #[test]
    fn test_empty_report() {
        let summary = summarize(&ScanReport::default());
        assert_eq!(summary, Summary::default());
        assert!(!summary.has_high());
    }

    #[test]
    fn test_summary_json_labels() {
        let summary = Summarizer::with_policy(UnknownRiskPolicy::Tally)
            .summarize(&ScanReport::from_json(SCENARIO).unwrap());
        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();

        assert_eq!(value["high"], 1);
        assert_eq!(value["unknown"], 1);
        assert_eq!(value["details"][0]["severity"], "High");
        assert_eq!(value["details"][1]["severity"], "Info");
        assert_eq!(value["details"][2]["severity"], "Unknown");

        let parsed: Summary = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, summary);
    }

    #[test]
    fn test_summarize_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, SCENARIO).unwrap();

        let summary = Summarizer::new().summarize_file(&path).unwrap();
        assert_eq!(summary.high, 1);

        std::fs::write(&path, "{\"site\": 5}").unwrap();
        assert!(matches!(
            Summarizer::new().summarize_file(&path),
            Err(ReportError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("drop".parse::<UnknownRiskPolicy>(), Ok(UnknownRiskPolicy::Drop));
        assert_eq!("Tally".parse::<UnknownRiskPolicy>(), Ok(UnknownRiskPolicy::Tally));
        assert!("keep".parse::<UnknownRiskPolicy>().is_err());
    }
}
