use clap::{Arg, Command};
use log::LevelFilter;
use lurescan::classifier::{Classifier, EmailDetection, UrlDetection};
use lurescan::config::Config;
use lurescan::statistics::ScanStats;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process;

fn main() {
    let matches = Command::new("lurescan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rule-weighted phishing URL and spam email classifier")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/lurescan.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Classify a single URL")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("TEXT")
                .help("Email subject (requires --content and --sender)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("content")
                .long("content")
                .value_name("TEXT")
                .help("Email body content")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("sender")
                .long("sender")
                .value_name("ADDRESS")
                .help("Email sender address")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("scan")
                .long("scan")
                .value_name("FILE")
                .help("Classify a JSON-lines batch file and print a summary")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit JSON instead of text")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logger based on verbose flag
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches.get_one::<String>("config").cloned().unwrap_or_default();
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        test_config(config);
        return;
    }

    let classifier = match Classifier::new(config) {
        Ok(classifier) => classifier,
        Err(e) => {
            eprintln!("Error building classifier: {e}");
            process::exit(1);
        }
    };

    let json = matches.get_flag("json");

    if let Some(raw_url) = matches.get_one::<String>("url") {
        classify_one_url(&classifier, raw_url, json);
        return;
    }

    let subject = matches.get_one::<String>("subject");
    let content = matches.get_one::<String>("content");
    let sender = matches.get_one::<String>("sender");
    if subject.is_some() || content.is_some() || sender.is_some() {
        classify_one_email(&classifier, subject, content, sender, json);
        return;
    }

    if let Some(scan_path) = matches.get_one::<String>("scan") {
        run_scan(&classifier, scan_path, json);
        return;
    }

    eprintln!("Nothing to do. Pass --url, --subject/--content/--sender, or --scan (see --help).");
    process::exit(2);
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if Path::new(path).exists() {
        Config::load_from_file(Path::new(path))
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Ok(Config::default())
    }
}

fn generate_default_config(path: &str) {
    match Config::write_default(Path::new(path)) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn test_config(config: Config) {
    println!("🔍 Testing configuration...");
    println!();
    println!("URL scoring:");
    println!("  Phishing threshold: {}", config.url.phishing_threshold);
    println!(
        "  Suspicious keywords: {}",
        config.url.suspicious_keywords.len()
    );
    println!("Email scoring:");
    println!("  Spam threshold: {}", config.email.spam_threshold);
    println!(
        "  Keyword lists: {} urgent, {} money, {} attachment",
        config.email.urgent_words.len(),
        config.email.money_words.len(),
        config.email.attachment_keywords.len()
    );
    println!(
        "  Sender patterns: {}",
        config.email.suspicious_sender_patterns.len()
    );
    println!();

    match Classifier::new(config) {
        Ok(_) => println!("✅ All sender patterns compiled successfully."),
        Err(e) => {
            println!("❌ Configuration validation failed:");
            println!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Response envelope for a URL classification; field names and the
/// 2-decimal confidence match the wire format.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UrlReport<'a> {
    url: &'a str,
    is_phishing: bool,
    confidence: f64,
    features: &'a lurescan::UrlFeatures,
    message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailReport<'a> {
    subject: &'a str,
    sender: &'a str,
    is_spam: bool,
    confidence: f64,
    features: &'a lurescan::EmailFeatures,
    message: &'static str,
}

impl<'a> UrlReport<'a> {
    fn new(url: &'a str, detection: &'a UrlDetection) -> Self {
        Self {
            url,
            is_phishing: detection.is_phishing,
            confidence: round2(detection.confidence),
            features: &detection.features,
            message: url_message(detection.is_phishing),
        }
    }
}

impl<'a> EmailReport<'a> {
    fn new(subject: &'a str, sender: &'a str, detection: &'a EmailDetection) -> Self {
        Self {
            subject,
            sender,
            is_spam: detection.is_spam,
            confidence: round2(detection.confidence),
            features: &detection.features,
            message: email_message(detection.is_spam),
        }
    }
}

fn classify_one_url(classifier: &Classifier, raw_url: &str, json: bool) {
    // Boundary normalization; the core scores the string exactly as given
    let normalized = raw_url.trim().to_lowercase();
    if normalized.is_empty() {
        eprintln!("❌ Valid URL required");
        process::exit(1);
    }

    let detection = classifier.classify_url(&normalized);
    if json {
        print_json(&UrlReport::new(&normalized, &detection), true);
    } else {
        print_url_text(&normalized, &detection);
    }
}

fn classify_one_email(
    classifier: &Classifier,
    subject: Option<&String>,
    content: Option<&String>,
    sender: Option<&String>,
    json: bool,
) {
    let (Some(subject), Some(content), Some(sender)) = (subject, content, sender) else {
        eprintln!("❌ Subject, content, and sender are required");
        process::exit(1);
    };
    if subject.is_empty() || content.is_empty() || sender.is_empty() {
        eprintln!("❌ Subject, content, and sender are required");
        process::exit(1);
    }

    let detection = classifier.classify_email(subject, content, sender);
    if json {
        print_json(&EmailReport::new(subject, sender, &detection), true);
    } else {
        print_email_text(subject, sender, &detection);
    }
}

/// One classification request per line, tagged by kind.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
enum ScanRequest {
    Url {
        url: String,
    },
    Email {
        subject: String,
        content: String,
        sender: String,
    },
}

fn run_scan(classifier: &Classifier, path: &str, json: bool) {
    let batch = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("❌ Error reading scan file '{path}': {e}");
            process::exit(1);
        }
    };

    let mut stats = ScanStats::new();
    for (index, line) in batch.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: ScanRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Skipping line {}: {e}", index + 1);
                continue;
            }
        };

        match request {
            ScanRequest::Url { url } => {
                let normalized = url.trim().to_lowercase();
                let detection = classifier.classify_url(&normalized);
                if json {
                    print_json(&UrlReport::new(&normalized, &detection), false);
                } else {
                    let verdict = if detection.is_phishing { "phishing" } else { "safe" };
                    println!(
                        "[{}] url {} -> {} ({:.2})",
                        index + 1,
                        normalized,
                        verdict,
                        round2(detection.confidence)
                    );
                }
                stats.record_url(&detection);
            }
            ScanRequest::Email {
                subject,
                content,
                sender,
            } => {
                let detection = classifier.classify_email(&subject, &content, &sender);
                if json {
                    print_json(&EmailReport::new(&subject, &sender, &detection), false);
                } else {
                    let verdict = if detection.is_spam { "spam" } else { "safe" };
                    println!(
                        "[{}] email \"{}\" from {} -> {} ({:.2})",
                        index + 1,
                        subject,
                        sender,
                        verdict,
                        round2(detection.confidence)
                    );
                }
                stats.record_email(&detection);
            }
        }
    }

    if json {
        print_json(&ScanSummary::new(&stats), true);
    } else {
        print_summary_text(&stats);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanSummary {
    total_scanned: u64,
    urls_scanned: u64,
    emails_scanned: u64,
    phishing_detected: u64,
    spam_detected: u64,
    mean_confidence: f64,
}

impl ScanSummary {
    fn new(stats: &ScanStats) -> Self {
        Self {
            total_scanned: stats.total_scanned(),
            urls_scanned: stats.urls_scanned,
            emails_scanned: stats.emails_scanned,
            phishing_detected: stats.phishing_detected,
            spam_detected: stats.spam_detected,
            mean_confidence: round2(stats.mean_confidence()),
        }
    }
}

fn print_summary_text(stats: &ScanStats) {
    println!();
    println!("📊 Scan summary");
    println!("  Total scanned: {}", stats.total_scanned());
    println!(
        "  ├─ URLs: {} (phishing: {})",
        stats.urls_scanned, stats.phishing_detected
    );
    println!(
        "  ├─ Emails: {} (spam: {})",
        stats.emails_scanned, stats.spam_detected
    );
    println!("  └─ Mean confidence: {:.2}", round2(stats.mean_confidence()));
}

fn print_url_text(url: &str, detection: &UrlDetection) {
    println!("URL: {url}");
    println!(
        "Verdict: {}",
        if detection.is_phishing { "phishing" } else { "safe" }
    );
    println!("Confidence: {:.2}", round2(detection.confidence));
    println!(
        "Risk score: {}/{}",
        detection.risk_score, detection.max_score
    );
    print_triggered(&detection.triggered);
    println!("{}", url_message(detection.is_phishing));
}

fn print_email_text(subject: &str, sender: &str, detection: &EmailDetection) {
    println!("Subject: {subject}");
    println!("Sender: {sender}");
    println!(
        "Verdict: {}",
        if detection.is_spam { "spam" } else { "safe" }
    );
    println!("Confidence: {:.2}", round2(detection.confidence));
    println!(
        "Risk score: {}/{}",
        detection.risk_score, detection.max_score
    );
    print_triggered(&detection.triggered);
    println!("{}", email_message(detection.is_spam));
}

fn print_triggered(triggered: &[&'static str]) {
    if triggered.is_empty() {
        println!("Triggered rules: none");
    } else {
        println!("Triggered rules: {}", triggered.join(", "));
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let serialized = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match serialized {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            process::exit(1);
        }
    }
}

fn url_message(is_phishing: bool) -> &'static str {
    if is_phishing {
        "Warning: This URL appears to be a phishing attempt"
    } else {
        "Safe: This URL appears to be safe"
    }
}

fn email_message(is_spam: bool) -> &'static str {
    if is_spam {
        "Warning: This email appears to be spam"
    } else {
        "Safe: This email appears to be legitimate"
    }
}

/// Confidence is rounded only here, at the presentation boundary; the core
/// hands out exact fractions.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
