use crate::config::Config;
use crate::features::{EmailFeatureExtractor, EmailFeatures, UrlFeatureExtractor, UrlFeatures};
use crate::scoring::{score_email, score_url, RiskAssessment};
use serde::Serialize;

/// Construct-once classification engine. Keyword lists and sender patterns
/// are compiled up front; classification itself cannot fail and holds no
/// state across calls, so a single instance is safe to share between
/// threads.
pub struct Classifier {
    config: Config,
    url_extractor: UrlFeatureExtractor,
    email_extractor: EmailFeatureExtractor,
}

/// URL verdict paired with the feature vector that produced it, for
/// persistence and display by the caller. Confidence is unrounded here;
/// transport boundaries round to two decimals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlDetection {
    pub is_phishing: bool,
    pub confidence: f64,
    pub risk_score: u32,
    pub max_score: u32,
    pub triggered: Vec<&'static str>,
    pub features: UrlFeatures,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDetection {
    pub is_spam: bool,
    pub confidence: f64,
    pub risk_score: u32,
    pub max_score: u32,
    pub triggered: Vec<&'static str>,
    pub features: EmailFeatures,
}

impl Classifier {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let url_extractor = UrlFeatureExtractor::new(&config.url);
        let email_extractor = EmailFeatureExtractor::new(&config.email)?;

        Ok(Self {
            config,
            url_extractor,
            email_extractor,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classify a URL string as given. Callers own trimming and
    /// lowercasing; empty or malformed input is scored, not rejected.
    pub fn classify_url(&self, url: &str) -> UrlDetection {
        let features = self.url_extractor.extract(url);
        let assessment = score_url(&self.config.url, &features);

        log::debug!(
            "url scored {}/{} (normalized {:.3}), phishing={}",
            assessment.risk_score,
            assessment.max_score,
            assessment.normalized_score,
            assessment.verdict.is_malicious
        );

        let RiskAssessment {
            risk_score,
            max_score,
            verdict,
            ..
        } = &assessment;

        UrlDetection {
            is_phishing: verdict.is_malicious,
            confidence: verdict.confidence,
            risk_score: *risk_score,
            max_score: *max_score,
            triggered: assessment.triggered(),
            features,
        }
    }

    /// Classify an email from its subject, content, and sender. Empty
    /// fields are scored as given; validating their presence is the
    /// caller's job.
    pub fn classify_email(&self, subject: &str, content: &str, sender: &str) -> EmailDetection {
        let features = self.email_extractor.extract(subject, content, sender);
        let assessment = score_email(&self.config.email, &features);

        log::debug!(
            "email scored {}/{} (normalized {:.3}), spam={}",
            assessment.risk_score,
            assessment.max_score,
            assessment.normalized_score,
            assessment.verdict.is_malicious
        );

        let RiskAssessment {
            risk_score,
            max_score,
            verdict,
            ..
        } = &assessment;

        EmailDetection {
            is_spam: verdict.is_malicious,
            confidence: verdict.confidence,
            risk_score: *risk_score,
            max_score: *max_score,
            triggered: assessment.triggered(),
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(Config::default()).unwrap()
    }

    #[test]
    fn ip_login_url_is_phishing() {
        let url = "http://192.168.1.1/login/secure/verify/account@evil.com/a/b/c/d/e/f";
        let detection = classifier().classify_url(url);

        assert!(detection.features.has_ip);
        assert!(detection.features.has_at_symbol);
        assert!(!detection.features.has_https);
        assert!(detection.features.has_suspicious_keywords);
        assert!(detection.features.slash_count > 6);
        assert!(detection.risk_score >= 48);
        assert!(detection.is_phishing);
        assert!(detection.confidence > 0.5);
    }

    #[test]
    fn plain_https_url_is_benign() {
        let detection = classifier().classify_url("https://example.com");

        assert!(!detection.is_phishing);
        assert_eq!(detection.risk_score, 0);
        assert_eq!(detection.confidence, 1.0);
        assert!(detection.triggered.is_empty());
    }

    #[test]
    fn uppercase_scheme_is_scored_as_given() {
        // The core does not normalize; the missing-https rule fires
        let detection = classifier().classify_url("HTTPS://EXAMPLE.COM");
        assert!(!detection.features.has_https);
        assert_eq!(detection.triggered, vec!["missing_https"]);
    }

    #[test]
    fn prize_email_with_link_flood_is_spam() {
        let content = "You are our lucky winner! Visit http://a.io http://b.io \
                       http://c.io http://d.io http://e.io to claim";
        let detection = classifier().classify_email(
            "URGENT: You won $$$ money!!!",
            content,
            "noreply@promo123456.com",
        );

        assert!(detection.features.has_urgent_words);
        assert!(detection.features.has_money_words);
        assert!(detection.features.link_count > 3);
        assert!(detection.features.has_suspicious_sender);
        assert!(detection.risk_score >= 57);
        assert!(detection.is_spam);
        assert!(detection.confidence > 0.55);
    }

    #[test]
    fn meeting_email_is_benign() {
        let detection = classifier().classify_email(
            "Meeting notes",
            "See you at 3pm, thanks.",
            "alice@company.com",
        );

        assert!(!detection.is_spam);
        assert_eq!(detection.risk_score, 0);
        assert_eq!(detection.confidence, 1.0);
    }

    #[test]
    fn empty_input_is_scored_not_rejected() {
        let c = classifier();

        let url_detection = c.classify_url("");
        // Empty string still hits the missing-https rule and nothing else
        assert_eq!(url_detection.triggered, vec!["missing_https"]);
        assert!(!url_detection.is_phishing);

        let email_detection = c.classify_email("", "", "");
        assert_eq!(email_detection.risk_score, 0);
        assert!(!email_detection.is_spam);
    }

    #[test]
    fn classification_is_bit_identical_across_calls() {
        let c = classifier();
        let url = "http://paypal-secure.example.accounts.io/login?next=10.0.0.1";

        let first = c.classify_url(url);
        let second = c.classify_url(url);
        assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
        assert_eq!(
            first.features.entropy_score.to_bits(),
            second.features.entropy_score.to_bits()
        );
        assert_eq!(first.is_phishing, second.is_phishing);

        let first = c.classify_email("Hi!", "all good", "bob@co.com");
        let second = c.classify_email("Hi!", "all good", "bob@co.com");
        assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
    }

    #[test]
    fn confidence_never_drops_below_one_half() {
        let c = classifier();
        let samples = [
            "",
            "https://example.com",
            "http://192.168.1.1/login/secure/verify/account@evil.com/a/b/c/d/e/f",
            "ftp://weird.example.com/@@@@",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        ];
        for url in samples {
            let detection = c.classify_url(url);
            assert!(
                detection.confidence >= 0.5,
                "confidence {} for {url:?}",
                detection.confidence
            );
            assert!(detection.confidence <= 1.0);
        }
    }

    #[test]
    fn detection_json_uses_wire_names() {
        let detection = classifier().classify_url("https://example.com");
        let json = serde_json::to_value(&detection).unwrap();
        assert!(json.get("isPhishing").is_some());
        assert!(json.get("riskScore").is_some());
        assert!(json["features"].get("hasIP").is_some());

        let detection = classifier().classify_email("a", "b", "c@d.com");
        let json = serde_json::to_value(&detection).unwrap();
        assert!(json.get("isSpam").is_some());
        assert!(json["features"].get("hasLinkCount").is_some());
    }
}
