use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use zap_autorun::cli::ScanArgs;
use zap_autorun::config::{ConfigLayer, ZapAutorunConfig};
use zap_autorun_reports::UnknownRiskPolicy;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_then_env_then_cli() {
    let file = config_file(
        r#"
        [scan]
        endpoint = "https://file.example"
        scan_type = "active"
        directory = "/from/file"

        [scanner]
        command = "/opt/zap/zap.sh"
        timeout_secs = 900

        [output]
        unknown_risk = "tally"
        "#,
    );

    let mut config = ZapAutorunConfig::default();
    config.merge(&ConfigLayer::load_from_file(file.path()).unwrap());

    let env: HashMap<String, String> = [
        ("ZAP_WRAPPER_DIRECTORY", "/from/env"),
        ("ZAP_WRAPPER_TIMEOUT_SECS", "120"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    config.apply_env_vars(&env).unwrap();

    let args = ScanArgs {
        scan_type: Some("passive".to_string()),
        ..Default::default()
    };
    config.apply_scan_args(&args).unwrap();

    assert_eq!(config.require_endpoint().unwrap(), "https://file.example");
    assert_eq!(config.require_directory().unwrap(), PathBuf::from("/from/env"));
    assert_eq!(config.scan_type(), "passive");
    assert_eq!(config.scanner.command, PathBuf::from("/opt/zap/zap.sh"));
    assert_eq!(config.scanner.timeout_secs, 120);
    assert_eq!(config.output.unknown_risk, UnknownRiskPolicy::Tally);
    assert!(config.validate().is_ok());
}

#[test]
fn test_project_file_can_restore_defaults_over_user_file() {
    let user = config_file(
        r#"
        [scan]
        scan_type = "active"

        [scanner]
        timeout_secs = 900

        [policy]
        spider_max_depth = 4

        [output]
        gate = false
        "#,
    );
    let project = config_file(
        r#"
        [scan]
        scan_type = "passive"

        [scanner]
        timeout_secs = 0

        [policy]
        spider_max_depth = 1

        [output]
        gate = true
        "#,
    );

    let mut config = ZapAutorunConfig::default();
    for file in [&user, &project] {
        config.merge(&ConfigLayer::load_from_file(file.path()).unwrap());
    }

    assert_eq!(config.scan_type(), "passive");
    assert_eq!(config.scanner_timeout(), None);
    assert_eq!(config.run_policy().spider_max_depth, 1);
    assert!(config.output.gate);
}

#[test]
fn test_malformed_file_is_rejected() {
    let file = config_file("[scan\nendpoint = ");
    assert!(ZapAutorunConfig::load_from_file(file.path()).is_err());
}

#[test]
fn test_policy_file_values_reach_the_plan() {
    let file = config_file(
        r#"
        [policy]
        spider_max_duration = 10
        spider_max_depth = 5
        report_title = "Nightly scan"
        "#,
    );
    let config = ZapAutorunConfig::load_from_file(file.path()).unwrap();
    let policy = config.run_policy();

    assert_eq!(policy.spider_max_duration, 10);
    assert_eq!(policy.spider_max_depth, 5);
    assert_eq!(policy.report_title, "Nightly scan");
    assert_eq!(policy.report_description, "This is an automated report");
}
