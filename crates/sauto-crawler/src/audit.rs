//! Request audit trail.
//!
//! Every request the client dispatches is reported to a [`RequestAudit`]
//! observer before it goes on the wire. The audit sits at the
//! request-emission boundary and is injected explicitly — there is no
//! process-global logger to initialize or guard. The line format is stable
//! and grep-friendly; operators use the file to replay or debug a crawl,
//! nothing in the crawler reads it back.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Observer for dispatched requests.
pub trait RequestAudit: Send + Sync {
    /// Called once per request, immediately before it is sent.
    fn request_dispatched(&self, url: &str);
}

/// Appends one `Date: <timestamp>, scraping url: <url>` line per request.
///
/// Write failures are logged and swallowed; auditing never fails a request.
pub struct LineAudit<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> LineAudit<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl LineAudit<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be opened.
    pub fn append_to(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> RequestAudit for LineAudit<W> {
    fn request_dispatched(&self, url: &str) {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let outcome = writeln!(writer, "Date: {now}, scraping url: {url}")
            .and_then(|()| writer.flush());
        if let Err(error) = outcome {
            tracing::warn!(%error, "failed to append request audit line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_request() {
        let audit = LineAudit::new(Vec::new());
        audit.request_dispatched("https://example.com/api/v1/items/search?offset=0");
        audit.request_dispatched("https://example.com/api/v1/items/123");

        let buffer = audit.writer.into_inner().expect("audit mutex not poisoned");
        let written = String::from_utf8(buffer).expect("audit output is UTF-8");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Date: "), "got: {}", lines[0]);
        assert!(
            lines[0].ends_with(", scraping url: https://example.com/api/v1/items/search?offset=0"),
            "got: {}",
            lines[0]
        );
        assert!(
            lines[1].ends_with(", scraping url: https://example.com/api/v1/items/123"),
            "got: {}",
            lines[1]
        );
    }
}
