//! Message log collaborator: append-only CSV of inbound messages.
//!
//! Fire-and-forget from the router's perspective; append failures are
//! reported to the caller, which logs them at warn and moves on.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

/// Records every inbound non-bot message.
pub trait MessageLog: Send + Sync {
    fn log_message(&self, message_id: u64, author: &str, content: &str) -> std::io::Result<()>;
}

/// CSV file implementation: one row per message, `id,author,content,timestamp`.
/// Rows are appended; concurrent appends rely on the OS append-mode guarantee.
pub struct CsvMessageLog {
    path: PathBuf,
}

impl CsvMessageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Quotes a CSV field; embedded quotes are doubled per RFC 4180.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

impl MessageLog for CsvMessageLog {
    fn log_message(&self, message_id: u64, author: &str, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{},{},{},{}",
            message_id,
            quote(author),
            quote(content),
            Utc::now().to_rfc3339()
        )
    }
}
