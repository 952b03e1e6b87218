use crate::config::{EmailScoringConfig, UrlScoringConfig};
use crate::features::{EmailFeatures, UrlFeatures};
use serde::Serialize;

// Cutoffs for the numeric rule predicates. All comparisons are strict.
const LONG_URL_LENGTH: usize = 75;
const DEEP_SUBDOMAIN_COUNT: usize = 2;
const MANY_DOTS: usize = 4;
const MANY_SLASHES: usize = 6;
const HIGH_ENTROPY_BITS: f64 = 4.5;
const LINK_FLOOD: usize = 3;
const LINK_PRESENCE: usize = 1;
const MANY_EXCLAMATIONS: usize = 2;
const HIGH_CAPITAL_RATIO: f64 = 0.3;
const LONG_SUBJECT_LENGTH: usize = 100;

/// Direction and strength of a classification. `confidence` expresses how
/// far the normalized score sits from the decision threshold, not a
/// calibrated probability, and is left unrounded; presentation layers round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub is_malicious: bool,
    pub confidence: f64,
}

/// One evaluated rule: the points it awarded and the most it could have.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub points: u32,
    pub max_points: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub max_score: u32,
    pub normalized_score: f64,
    pub verdict: Verdict,
    pub outcomes: Vec<RuleOutcome>,
}

impl RiskAssessment {
    fn from_outcomes(outcomes: Vec<RuleOutcome>, threshold: f64) -> Self {
        let risk_score: u32 = outcomes.iter().map(|o| o.points).sum();
        let max_score: u32 = outcomes.iter().map(|o| o.max_points).sum();
        let normalized_score = if max_score > 0 {
            f64::from(risk_score) / f64::from(max_score)
        } else {
            0.0
        };

        // Strict comparison: a score exactly on the threshold is benign
        let is_malicious = normalized_score > threshold;
        let confidence = if is_malicious {
            normalized_score
        } else {
            1.0 - normalized_score
        };

        Self {
            risk_score,
            max_score,
            normalized_score,
            verdict: Verdict {
                is_malicious,
                confidence,
            },
            outcomes,
        }
    }

    /// Names of the rules that awarded points, in table order.
    pub fn triggered(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|o| o.points > 0)
            .map(|o| o.rule)
            .collect()
    }
}

fn rule(name: &'static str, matched: bool, weight: u32) -> RuleOutcome {
    RuleOutcome {
        rule: name,
        points: if matched { weight } else { 0 },
        max_points: weight,
    }
}

pub fn score_url(config: &UrlScoringConfig, features: &UrlFeatures) -> RiskAssessment {
    let w = &config.weights;
    let outcomes = vec![
        rule("ip_host", features.has_ip, w.ip_host),
        rule("at_symbol", features.has_at_symbol, w.at_symbol),
        rule("missing_https", !features.has_https, w.missing_https),
        rule("long_url", features.length > LONG_URL_LENGTH, w.long_url),
        rule(
            "deep_subdomains",
            features.subdomain_count > DEEP_SUBDOMAIN_COUNT,
            w.deep_subdomains,
        ),
        rule("many_dots", features.dot_count > MANY_DOTS, w.many_dots),
        rule(
            "many_slashes",
            features.slash_count > MANY_SLASHES,
            w.many_slashes,
        ),
        rule(
            "suspicious_keywords",
            features.has_suspicious_keywords,
            w.suspicious_keywords,
        ),
        rule(
            "high_entropy",
            features.entropy_score > HIGH_ENTROPY_BITS,
            w.high_entropy,
        ),
    ];

    RiskAssessment::from_outcomes(outcomes, config.phishing_threshold)
}

pub fn score_email(config: &EmailScoringConfig, features: &EmailFeatures) -> RiskAssessment {
    let w = &config.weights;

    // The two link tiers are mutually exclusive and share one slot in the
    // maximum; only the flood tier's weight counts toward it.
    let link_points = if features.link_count > LINK_FLOOD {
        w.link_flood
    } else if features.link_count > LINK_PRESENCE {
        w.link_presence
    } else {
        0
    };

    let outcomes = vec![
        rule("urgent_words", features.has_urgent_words, w.urgent_words),
        rule("money_words", features.has_money_words, w.money_words),
        RuleOutcome {
            rule: "link_volume",
            points: link_points,
            max_points: w.link_flood,
        },
        rule("all_caps", features.has_all_caps, w.all_caps),
        rule(
            "exclamations",
            features.exclamation_count > MANY_EXCLAMATIONS,
            w.exclamations,
        ),
        rule(
            "suspicious_sender",
            features.has_suspicious_sender,
            w.suspicious_sender,
        ),
        rule(
            "attachment_keywords",
            features.has_attachment_keywords,
            w.attachment_keywords,
        ),
        rule(
            "capital_ratio",
            features.capital_ratio > HIGH_CAPITAL_RATIO,
            w.capital_ratio,
        ),
        rule(
            "long_subject",
            features.subject_length > LONG_SUBJECT_LENGTH,
            w.long_subject,
        ),
    ];

    RiskAssessment::from_outcomes(outcomes, config.spam_threshold)
}
