use logscope_vector_store::Document;
use once_cell::sync::Lazy;
use regex::Regex;

/// Source name recorded for the built-in sample
pub const SAMPLE_SOURCE: &str = "sample";

pub const SAMPLE_LOGS: [&str; 5] = [
    "2025-07-27T10:00:15Z INFO: User 'alex' successfully logged in.",
    "2025-07-27T10:01:05Z ERROR: Authentication failed for user 'admin'. Invalid password attempt.",
    "2025-07-27T10:02:30Z DEBUG: Database connection pool size: 5.",
    "2025-07-27T10:03:45Z WARN: High CPU usage detected on server-web-01.",
    "2025-07-27T10:05:00Z ERROR: Payment gateway timeout for transaction id 98765.",
];

/// `<timestamp> <LEVEL>: message`
static LOG_PREFIX: Lazy<Regex> = Lazy::new(|| {
    match Regex::new(r"^(?P<timestamp>\S+)\s+(?P<level>[A-Za-z]+):(?:\s|$)") {
        Ok(regex) => regex,
        Err(err) => panic!("Log prefix regex is invalid: {err}"),
    }
});

/// One document per non-blank line of `text`.
///
/// Metadata: `source`, 1-based `line`, and `timestamp`/`level` when the line
/// carries a `<timestamp> <LEVEL>:` prefix. Levels are upper-cased.
pub fn documents_from_lines(source: &str, text: &str) -> Vec<Document> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line = raw.trim();
            if line.is_empty() {
                return None;
            }
            let line_no = i64::try_from(idx + 1).unwrap_or(i64::MAX);
            let mut document = Document::new(line)
                .with_metadata("source", source)
                .with_metadata("line", line_no);
            if let Some(caps) = LOG_PREFIX.captures(line) {
                document = document
                    .with_metadata("timestamp", &caps["timestamp"])
                    .with_metadata("level", caps["level"].to_ascii_uppercase());
            }
            Some(document)
        })
        .collect()
}

/// The built-in sample as documents
pub fn sample_documents() -> Vec<Document> {
    documents_from_lines(SAMPLE_SOURCE, &SAMPLE_LOGS.join("\n"))
}
