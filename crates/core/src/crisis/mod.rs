//! Keyword screening for crisis language.
//!
//! Phrases are grouped into three tiers. The highest tier with any hit
//! decides the risk level, and only the first hit of that tier is reported.

use serde::{Deserialize, Serialize};
use std::fmt;

const LOG_TARGET: &str = "crisis";

const HIGH_RISK: &[&str] = &[
    "want to die",
    "kill myself",
    "suicide",
    "end it all",
    "better off dead",
    "no point living",
    "hurt myself",
    "self-harm",
    "overdose",
    "jump off",
    "hang myself",
];

const MEDIUM_RISK: &[&str] = &[
    "hopeless",
    "worthless",
    "burden",
    "give up",
    "can't go on",
    "end the pain",
    "no way out",
    "everyone would be better",
    "tired of living",
];

const DISTRESS: &[&str] = &[
    "sad",
    "depressed",
    "anxious",
    "stressed",
    "overwhelmed",
    "lonely",
    "frustrated",
];

const HIGH_RISK_ACTIONS: &[&str] = &[
    "Contact crisis hotline immediately",
    "Ensure user safety",
    "Provide immediate resources",
];

const MEDIUM_RISK_ACTIONS: &[&str] = &[
    "Provide supportive response",
    "Offer coping strategies",
    "Monitor closely",
];

const DISTRESS_ACTIONS: &[&str] = &[
    "Provide empathetic response",
    "Offer therapeutic techniques",
];

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrisisAssessment {
    pub risk_level: RiskLevel,
    pub indicators: Vec<String>,
    pub immediate_actions: Vec<String>,
}

impl CrisisAssessment {
    pub fn is_crisis(&self) -> bool {
        self.risk_level == RiskLevel::High
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CrisisScreener;

impl CrisisScreener {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, text: &str) -> CrisisAssessment {
        let lower_text = text.to_lowercase();
        let first_hit = |phrases: &[&'static str]| {
            phrases
                .iter()
                .copied()
                .find(|phrase| lower_text.contains(phrase))
        };

        let (risk_level, indicator, actions) = if let Some(kw) = first_hit(HIGH_RISK) {
            (RiskLevel::High, format!("High-risk keyword: {kw}"), HIGH_RISK_ACTIONS)
        } else if let Some(kw) = first_hit(MEDIUM_RISK) {
            (
                RiskLevel::Medium,
                format!("Medium-risk keyword: {kw}"),
                MEDIUM_RISK_ACTIONS,
            )
        } else if let Some(kw) = first_hit(DISTRESS) {
            (RiskLevel::Low, format!("Emotional distress: {kw}"), DISTRESS_ACTIONS)
        } else {
            return CrisisAssessment::default();
        };

        if risk_level == RiskLevel::High {
            tracing::warn!(target: LOG_TARGET, indicator = %indicator, "high-risk language detected");
        }

        CrisisAssessment {
            risk_level,
            indicators: vec![indicator],
            immediate_actions: actions.iter().map(|a| (*a).to_owned()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_low_without_indicators() {
        let assessment = CrisisScreener::new().assess("Had a nice walk today");
        assert_eq!(assessment, CrisisAssessment::default());
        assert!(!assessment.is_crisis());
    }

    #[test]
    fn high_risk_phrase_is_detected_case_insensitively() {
        let assessment = CrisisScreener::new().assess("Sometimes I want to DIE");
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.indicators, vec!["High-risk keyword: want to die"]);
        assert_eq!(assessment.immediate_actions.len(), 3);
        assert!(assessment.is_crisis());
    }

    #[test]
    fn high_risk_outranks_medium() {
        let assessment = CrisisScreener::new().assess("I feel hopeless and think about suicide");
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.indicators, vec!["High-risk keyword: suicide"]);
    }

    #[test]
    fn medium_risk_reports_first_listed_phrase() {
        let assessment = CrisisScreener::new().assess("I'm worthless and hopeless");
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert_eq!(assessment.indicators, vec!["Medium-risk keyword: hopeless"]);
        assert_eq!(
            assessment.immediate_actions,
            vec!["Provide supportive response", "Offer coping strategies", "Monitor closely"]
        );
    }

    #[test]
    fn distress_keeps_low_level_with_indicator() {
        let assessment = CrisisScreener::new().assess("Work has me stressed");
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.indicators, vec!["Emotional distress: stressed"]);
        assert_eq!(assessment.immediate_actions.len(), 2);
    }

    #[test]
    fn risk_levels_order_by_severity() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }
}
