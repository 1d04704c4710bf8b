//! Severity tiers derived from ZAP risk codes.

use serde::{Deserialize, Serialize};

/// Human-readable severity of a single alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum SeverityTier {
    Info,
    Low,
    Medium,
    High,
}

impl SeverityTier {
    /// All tiers, highest first.
    pub const ALL: [SeverityTier; 4] = [
        SeverityTier::High,
        SeverityTier::Medium,
        SeverityTier::Low,
        SeverityTier::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Info => "Info",
            SeverityTier::Low => "Low",
            SeverityTier::Medium => "Medium",
            SeverityTier::High => "High",
        }
    }

    /// The risk code ZAP emits for this tier.
    pub fn risk_code(&self) -> &'static str {
        match self {
            SeverityTier::Info => "0",
            SeverityTier::Low => "1",
            SeverityTier::Medium => "2",
            SeverityTier::High => "3",
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a raw ZAP risk code onto a severity tier.
///
/// The code is compared exactly as the scanner emits it. Anything outside
/// `"0"..="3"` (padded, zero-prefixed or out of range) yields `None`.
pub fn classify(risk_code: &str) -> Option<SeverityTier> {
    match risk_code {
        "0" => Some(SeverityTier::Info),
        "1" => Some(SeverityTier::Low),
        "2" => Some(SeverityTier::Medium),
        "3" => Some(SeverityTier::High),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_codes() {
        assert_eq!(classify("0"), Some(SeverityTier::Info));
        assert_eq!(classify("1"), Some(SeverityTier::Low));
        assert_eq!(classify("2"), Some(SeverityTier::Medium));
        assert_eq!(classify("3"), Some(SeverityTier::High));
    }

    #[test]
    fn test_classify_rejects_unknown_codes() {
        for code in ["", "4", "9", "-1", "03", " 3", "3 ", "High", "3.0"] {
            assert_eq!(classify(code), None, "code {:?} should not classify", code);
        }
    }

    #[test]
    fn test_risk_code_round_trip() {
        for tier in SeverityTier::ALL {
            assert_eq!(classify(tier.risk_code()), Some(tier));
        }
    }

    #[test]
    fn test_tier_display_and_order() {
        assert_eq!(SeverityTier::High.to_string(), "High");
        assert_eq!(SeverityTier::Info.to_string(), "Info");
        assert!(SeverityTier::High > SeverityTier::Medium);
        assert!(SeverityTier::Low > SeverityTier::Info);
    }
}
