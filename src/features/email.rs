use super::contains_any_keyword;
use crate::config::EmailScoringConfig;
use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HTTP_LINK: Regex = Regex::new(r"(?i)https?://").unwrap();
    static ref ALL_CAPS_WORD: Regex = Regex::new(r"\b[A-Z]{3,}\b").unwrap();
}

/// Signals derived from one email's subject, content, and sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailFeatures {
    pub subject_length: usize,
    pub content_length: usize,
    pub has_urgent_words: bool,
    pub has_money_words: bool,
    #[serde(rename = "hasLinkCount")]
    pub link_count: usize,
    pub has_all_caps: bool,
    #[serde(rename = "hasExclamationCount")]
    pub exclamation_count: usize,
    pub has_suspicious_sender: bool,
    pub has_attachment_keywords: bool,
    pub capital_ratio: f64,
}

pub struct EmailFeatureExtractor {
    urgent_words: Vec<String>,
    money_words: Vec<String>,
    attachment_keywords: Vec<String>,
    sender_patterns: Vec<Regex>,
}

impl EmailFeatureExtractor {
    /// Pre-compiles the configured sender patterns so extraction itself
    /// cannot fail. Bad patterns surface here, at startup.
    pub fn new(config: &EmailScoringConfig) -> anyhow::Result<Self> {
        let mut sender_patterns = Vec::with_capacity(config.suspicious_sender_patterns.len());
        for pattern in &config.suspicious_sender_patterns {
            let compiled = Regex::new(pattern)
                .with_context(|| format!("Invalid sender pattern: {pattern}"))?;
            sender_patterns.push(compiled);
        }

        Ok(Self {
            urgent_words: config.urgent_words.clone(),
            money_words: config.money_words.clone(),
            attachment_keywords: config.attachment_keywords.clone(),
            sender_patterns,
        })
    }

    /// Keyword flags are evaluated over `subject + " " + content`; link
    /// counting is restricted to the content. Empty input yields
    /// well-defined features, with `capital_ratio` 0 when no letters exist.
    pub fn extract(&self, subject: &str, content: &str, sender: &str) -> EmailFeatures {
        let combined = format!("{subject} {content}");
        let combined_lower = combined.to_lowercase();

        let mut letters = 0usize;
        let mut capitals = 0usize;
        for c in combined.chars() {
            if c.is_ascii_alphabetic() {
                letters += 1;
                if c.is_ascii_uppercase() {
                    capitals += 1;
                }
            }
        }
        let capital_ratio = if letters > 0 {
            capitals as f64 / letters as f64
        } else {
            0.0
        };

        EmailFeatures {
            subject_length: subject.chars().count(),
            content_length: content.chars().count(),
            has_urgent_words: contains_any_keyword(&combined_lower, &self.urgent_words),
            has_money_words: contains_any_keyword(&combined_lower, &self.money_words),
            link_count: HTTP_LINK.find_iter(content).count(),
            has_all_caps: ALL_CAPS_WORD.find_iter(&combined).count() > 2,
            exclamation_count: combined.matches('!').count(),
            has_suspicious_sender: self
                .sender_patterns
                .iter()
                .any(|pattern| pattern.is_match(sender)),
            has_attachment_keywords: contains_any_keyword(
                &combined_lower,
                &self.attachment_keywords,
            ),
            capital_ratio,
        }
    }
}
