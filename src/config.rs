use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scoring configuration for both classification pipelines.
///
/// Every field has a built-in default reproducing the stock rule set, so an
/// empty file (or no file at all) yields a fully working classifier and a
/// partial file overrides only the sections it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub url: UrlScoringConfig,
    #[serde(default)]
    pub email: EmailScoringConfig,
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the built-in configuration to `path` as YAML.
    pub fn write_default(path: &Path) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(&Config::default())
            .context("Failed to serialize default configuration")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlScoringConfig {
    /// Normalized-score cutoff; strictly above means phishing.
    #[serde(default = "default_phishing_threshold")]
    pub phishing_threshold: f64,
    #[serde(default = "default_suspicious_keywords")]
    pub suspicious_keywords: Vec<String>,
    #[serde(default)]
    pub weights: UrlWeights,
}

impl Default for UrlScoringConfig {
    fn default() -> Self {
        Self {
            phishing_threshold: default_phishing_threshold(),
            suspicious_keywords: default_suspicious_keywords(),
            weights: UrlWeights::default(),
        }
    }
}

/// Points awarded per matched URL rule. The scoring maximum is the sum of
/// these, so changing a weight rescales every normalized score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlWeights {
    pub ip_host: u32,
    pub at_symbol: u32,
    pub missing_https: u32,
    pub long_url: u32,
    pub deep_subdomains: u32,
    pub many_dots: u32,
    pub many_slashes: u32,
    pub suspicious_keywords: u32,
    pub high_entropy: u32,
}

impl Default for UrlWeights {
    fn default() -> Self {
        Self {
            ip_host: 15,
            at_symbol: 10,
            missing_https: 8,
            long_url: 12,
            deep_subdomains: 10,
            many_dots: 8,
            many_slashes: 7,
            suspicious_keywords: 15,
            high_entropy: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailScoringConfig {
    /// Normalized-score cutoff; strictly above means spam. Deliberately
    /// lower than the URL threshold.
    #[serde(default = "default_spam_threshold")]
    pub spam_threshold: f64,
    #[serde(default = "default_urgent_words")]
    pub urgent_words: Vec<String>,
    #[serde(default = "default_money_words")]
    pub money_words: Vec<String>,
    #[serde(default = "default_attachment_keywords")]
    pub attachment_keywords: Vec<String>,
    /// Regex patterns tested against the raw sender address.
    #[serde(default = "default_sender_patterns")]
    pub suspicious_sender_patterns: Vec<String>,
    #[serde(default)]
    pub weights: EmailWeights,
}

impl Default for EmailScoringConfig {
    fn default() -> Self {
        Self {
            spam_threshold: default_spam_threshold(),
            urgent_words: default_urgent_words(),
            money_words: default_money_words(),
            attachment_keywords: default_attachment_keywords(),
            suspicious_sender_patterns: default_sender_patterns(),
            weights: EmailWeights::default(),
        }
    }
}

/// Points awarded per matched email rule. `link_presence` is the lower tier
/// of the link rule and shares its slot in the maximum with `link_flood`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailWeights {
    pub urgent_words: u32,
    pub money_words: u32,
    pub link_flood: u32,
    pub link_presence: u32,
    pub all_caps: u32,
    pub exclamations: u32,
    pub suspicious_sender: u32,
    pub attachment_keywords: u32,
    pub capital_ratio: u32,
    pub long_subject: u32,
}

impl Default for EmailWeights {
    fn default() -> Self {
        Self {
            urgent_words: 15,
            money_words: 18,
            link_flood: 12,
            link_presence: 6,
            all_caps: 10,
            exclamations: 8,
            suspicious_sender: 12,
            attachment_keywords: 10,
            capital_ratio: 10,
            long_subject: 5,
        }
    }
}

fn default_phishing_threshold() -> f64 {
    0.5
}

fn default_spam_threshold() -> f64 {
    0.45
}

fn default_suspicious_keywords() -> Vec<String> {
    [
        "login", "verify", "secure", "account", "update", "confirm", "banking", "paypal", "ebay",
        "amazon", "signin", "password",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_urgent_words() -> Vec<String> {
    [
        "urgent",
        "immediate",
        "action required",
        "act now",
        "limited time",
        "expires",
        "hurry",
        "quick",
        "fast",
        "now",
        "today only",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_money_words() -> Vec<String> {
    [
        "free",
        "cash",
        "money",
        "prize",
        "winner",
        "congratulations",
        "claim",
        "reward",
        "discount",
        "50%",
        "100%",
        "$$$",
        "million",
        "billion",
        "inheritance",
        "lottery",
        "credit card",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_attachment_keywords() -> Vec<String> {
    [
        "invoice",
        "receipt",
        "document",
        "file attached",
        "see attachment",
        "open attachment",
        "download",
        "click here",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_sender_patterns() -> Vec<String> {
    [
        "(?i)noreply",
        "(?i)no-reply",
        "(?i)admin@",
        "(?i)support@",
        "(?i)info@",
        "[0-9]{5,}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weight_tables_sum_to_one_hundred() {
        let w = UrlWeights::default();
        let url_max = w.ip_host
            + w.at_symbol
            + w.missing_https
            + w.long_url
            + w.deep_subdomains
            + w.many_dots
            + w.many_slashes
            + w.suspicious_keywords
            + w.high_entropy;
        assert_eq!(url_max, 100);

        // link_presence is a lower tier of the same rule, not extra maximum
        let w = EmailWeights::default();
        let email_max = w.urgent_words
            + w.money_words
            + w.link_flood
            + w.all_caps
            + w.exclamations
            + w.suspicious_sender
            + w.attachment_keywords
            + w.capital_ratio
            + w.long_subject;
        assert_eq!(email_max, 100);
    }

    #[test]
    fn empty_config_file_yields_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.url.phishing_threshold, 0.5);
        assert_eq!(config.email.spam_threshold, 0.45);
        assert_eq!(config.url.suspicious_keywords.len(), 12);
        assert_eq!(config.email.money_words.len(), 17);
    }

    #[test]
    fn partial_config_overrides_named_fields_only() {
        let yaml = "url:\n  phishing_threshold: 0.7\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.url.phishing_threshold, 0.7);
        assert_eq!(config.url.weights.ip_host, 15);
        assert_eq!(config.email.spam_threshold, 0.45);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = "url:\n  no_such_option: true\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.url.weights.high_entropy, 15);
        assert_eq!(parsed.email.weights.link_presence, 6);
    }
}
