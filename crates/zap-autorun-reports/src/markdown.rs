use zap_autorun_core::SeverityTier;

use crate::summary::Summary;

/// Render a summary as a Markdown document, e.g. for a CI job summary.
pub fn to_markdown(summary: &Summary, target: Option<&str>) -> String {
    let mut md = String::new();

    md.push_str("# Vulnerability Scan Summary\n\n");
    if let Some(target) = target {
        md.push_str(&format!("Target: `{}`\n\n", target));
    }

    md.push_str("| High | Medium | Low | Info |");
    if summary.unknown > 0 {
        md.push_str(" Unknown |");
    }
    md.push('\n');
    md.push_str("|------|--------|-----|------|");
    if summary.unknown > 0 {
        md.push_str("---------|");
    }
    md.push('\n');
    md.push_str(&format!(
        "| {} | {} | {} | {} |",
        summary.count(SeverityTier::High),
        summary.count(SeverityTier::Medium),
        summary.count(SeverityTier::Low),
        summary.count(SeverityTier::Info),
    ));
    if summary.unknown > 0 {
        md.push_str(&format!(" {} |", summary.unknown));
    }
    md.push_str("\n\n");

    if summary.details.is_empty() {
        md.push_str("No alerts reported.\n");
        return md;
    }

    md.push_str("## Alerts\n\n");
    md.push_str("| Severity | Name | Description |\n");
    md.push_str("|----------|------|-------------|\n");
    for detail in &summary.details {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            detail.severity_label(),
            escape_cell(&detail.name),
            escape_cell(&detail.description),
        ));
    }

    md
}

// ZAP descriptions are HTML fragments spanning several lines.
fn escape_cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::Detail;

    #[test]
    fn test_markdown_tables() {
        let summary = Summary {
            high: 1,
            info: 1,
            details: vec![
                Detail {
                    name: "XSS".to_string(),
                    description: "a | b\nc".to_string(),
                    severity: Some(SeverityTier::High),
                },
                Detail {
                    name: "Info leak".to_string(),
                    description: "d2".to_string(),
                    severity: Some(SeverityTier::Info),
                },
            ],
            ..Default::default()
        };

        let md = to_markdown(&summary, Some("https://example.com"));
        assert!(md.contains("Target: `https://example.com`"));
        assert!(md.contains("| 1 | 0 | 0 | 1 |\n"));
        assert!(!md.contains("Unknown"));
        assert!(md.contains("| High | XSS | a \\| b c |\n"));
        assert!(md.contains("| Info | Info leak | d2 |\n"));
    }

    #[test]
    fn test_markdown_unknown_column_and_empty() {
        let summary = Summary {
            unknown: 2,
            ..Default::default()
        };
        let md = to_markdown(&summary, None);
        assert!(md.contains("| High | Medium | Low | Info | Unknown |"));
        assert!(md.contains("| 0 | 0 | 0 | 0 | 2 |"));
        assert!(md.contains("No alerts reported."));
    }
}
