pub mod classifier;
pub mod config;
pub mod features;
pub mod scoring;
pub mod statistics;

// Re-export the types callers need for classification and display
pub use classifier::{Classifier, EmailDetection, UrlDetection};
pub use config::Config;
pub use features::{EmailFeatures, UrlFeatures};
pub use scoring::{RiskAssessment, RuleOutcome, Verdict};
pub use statistics::ScanStats;
