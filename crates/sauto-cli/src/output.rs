//! JSON-lines record output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use sauto_crawler::{CrawlerError, ListingRecord, RecordSink};

/// Writes each emitted record as one JSON document per line.
pub struct JsonLinesSink {
    writer: Box<dyn Write + Send>,
}

impl JsonLinesSink {
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be created.
    pub fn to_file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
        })
    }

    #[must_use]
    pub fn to_stdout() -> Self {
        Self {
            writer: Box::new(io::stdout()),
        }
    }

    /// # Errors
    ///
    /// Returns the underlying I/O error from flushing buffered output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl RecordSink for JsonLinesSink {
    fn emit(&mut self, record: ListingRecord) -> Result<(), CrawlerError> {
        let line = serde_json::to_string(&record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}
