use super::{contains_any_keyword, shannon_entropy};
use crate::config::UrlScoringConfig;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

lazy_static! {
    static ref DOTTED_QUAD: Regex = Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").unwrap();
}

/// Signals derived from a single URL string. Computed once per
/// classification and never mutated afterwards.
///
/// Serialized names match the wire format consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlFeatures {
    pub length: usize,
    #[serde(rename = "hasIP")]
    pub has_ip: bool,
    pub has_at_symbol: bool,
    pub dot_count: usize,
    pub slash_count: usize,
    pub has_https: bool,
    pub subdomain_count: usize,
    pub has_suspicious_keywords: bool,
    pub entropy_score: f64,
}

pub struct UrlFeatureExtractor {
    suspicious_keywords: Vec<String>,
}

impl UrlFeatureExtractor {
    pub fn new(config: &UrlScoringConfig) -> Self {
        Self {
            suspicious_keywords: config.suspicious_keywords.clone(),
        }
    }

    /// Derive the feature vector from a URL string as given. Total over any
    /// input: malformed strings still produce a feature struct, with
    /// `subdomain_count` falling back to 0 when no hostname can be parsed.
    /// The caller owns trimming and lowercasing; nothing is re-normalized
    /// here, so `HTTPS://` does not count as an https prefix.
    pub fn extract(&self, url: &str) -> UrlFeatures {
        let lower = url.to_lowercase();

        UrlFeatures {
            length: url.chars().count(),
            has_ip: DOTTED_QUAD.is_match(url),
            has_at_symbol: url.contains('@'),
            dot_count: url.matches('.').count(),
            slash_count: url.matches('/').count(),
            has_https: url.starts_with("https://"),
            subdomain_count: subdomain_count(url),
            has_suspicious_keywords: contains_any_keyword(&lower, &self.suspicious_keywords),
            entropy_score: shannon_entropy(url),
        }
    }
}

/// Hostname labels beyond the registrable domain, e.g.
/// `a.b.example.com` has two. Unparseable or hostless input counts zero.
fn subdomain_count(url: &str) -> usize {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.split('.').count().saturating_sub(2))
            .unwrap_or(0),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> UrlFeatureExtractor {
        UrlFeatureExtractor::new(&UrlScoringConfig::default())
    }

    #[test]
    fn benign_url_features() {
        let features = extractor().extract("https://example.com");

        assert_eq!(features.length, 19);
        assert!(!features.has_ip);
        assert!(!features.has_at_symbol);
        assert_eq!(features.dot_count, 1);
        assert_eq!(features.slash_count, 2);
        assert!(features.has_https);
        assert_eq!(features.subdomain_count, 0);
        assert!(!features.has_suspicious_keywords);
        assert!(features.entropy_score > 0.0);
    }

    #[test]
    fn dotted_quad_is_detected_anywhere_in_the_string() {
        let fx = extractor();
        assert!(fx.extract("http://192.168.1.1/x").has_ip);
        assert!(fx.extract("http://evil.com/path?next=10.0.0.1").has_ip);
        assert!(!fx.extract("http://evil.com/1.2.3").has_ip);
    }

    #[test]
    fn https_prefix_check_is_case_sensitive() {
        let fx = extractor();
        assert!(fx.extract("https://example.com").has_https);
        // Core trusts its input as given; callers lowercase first
        assert!(!fx.extract("HTTPS://example.com").has_https);
        assert!(!fx.extract("http://example.com").has_https);
    }

    #[test]
    fn subdomain_count_from_parsed_hostname() {
        let fx = extractor();
        assert_eq!(fx.extract("https://example.com").subdomain_count, 0);
        assert_eq!(fx.extract("https://mail.example.com").subdomain_count, 1);
        assert_eq!(fx.extract("https://a.b.example.com").subdomain_count, 2);
        // Dotted-quad hosts count like any other labels
        assert_eq!(fx.extract("http://192.168.1.1/x").subdomain_count, 2);
    }

    #[test]
    fn unparseable_input_yields_zero_subdomains_without_panicking() {
        let fx = extractor();
        assert_eq!(fx.extract("not a url at all").subdomain_count, 0);
        assert_eq!(fx.extract("example.com/no-scheme").subdomain_count, 0);
        assert_eq!(fx.extract("http://").subdomain_count, 0);
        assert_eq!(fx.extract("").subdomain_count, 0);
    }

    #[test]
    fn suspicious_keywords_match_case_insensitively() {
        let fx = extractor();
        assert!(fx.extract("http://evil.com/LOGIN").has_suspicious_keywords);
        assert!(fx.extract("http://secure-update.example.com").has_suspicious_keywords);
        assert!(!fx.extract("http://news.example.com/weather").has_suspicious_keywords);
    }

    #[test]
    fn empty_string_scores_out_with_defaults() {
        let features = extractor().extract("");

        assert_eq!(features.length, 0);
        assert!(!features.has_ip);
        assert_eq!(features.dot_count, 0);
        assert_eq!(features.slash_count, 0);
        assert_eq!(features.subdomain_count, 0);
        assert_eq!(features.entropy_score, 0.0);
    }

    #[test]
    fn extraction_is_idempotent() {
        let fx = extractor();
        let url = "http://192.168.1.1/login/secure/verify/account@evil.com/a/b/c/d/e/f";
        assert_eq!(fx.extract(url), fx.extract(url));
    }

    #[test]
    fn wire_names_are_preserved() {
        let features = extractor().extract("https://example.com");
        let json = serde_json::to_value(&features).unwrap();
        assert!(json.get("hasIP").is_some());
        assert!(json.get("hasAtSymbol").is_some());
        assert!(json.get("dotCount").is_some());
        assert!(json.get("subdomainCount").is_some());
        assert!(json.get("entropyScore").is_some());
    }
}
