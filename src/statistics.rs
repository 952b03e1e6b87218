use crate::classifier::{EmailDetection, UrlDetection};
use serde::Serialize;

/// Aggregate counters for a batch run. Mirrors the shape of the detection
/// history a persistence collaborator would keep, without storing any of it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    pub urls_scanned: u64,
    pub emails_scanned: u64,
    pub phishing_detected: u64,
    pub spam_detected: u64,
    #[serde(skip)]
    confidence_sum: f64,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_url(&mut self, detection: &UrlDetection) {
        self.urls_scanned += 1;
        if detection.is_phishing {
            self.phishing_detected += 1;
        }
        self.confidence_sum += detection.confidence;
    }

    pub fn record_email(&mut self, detection: &EmailDetection) {
        self.emails_scanned += 1;
        if detection.is_spam {
            self.spam_detected += 1;
        }
        self.confidence_sum += detection.confidence;
    }

    pub fn total_scanned(&self) -> u64 {
        self.urls_scanned + self.emails_scanned
    }

    pub fn threats_detected(&self) -> u64 {
        self.phishing_detected + self.spam_detected
    }

    /// Mean verdict confidence over everything recorded; 0 when empty.
    pub fn mean_confidence(&self) -> f64 {
        let total = self.total_scanned();
        if total == 0 {
            return 0.0;
        }
        self.confidence_sum / total as f64
    }
}
