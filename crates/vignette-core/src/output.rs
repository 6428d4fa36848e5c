//! Machine-readable run reports.
//!
//! A report lists one record per input file, either the thumbnail it
//! produced or the stage it failed in. JSON Lines streams records as they
//! arrive; JSON collects them and writes a single array on `finish`.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{FailedFile, ProcessedThumbnail};

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One JSON array of records
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// One line of the report.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReportRecord {
    /// A thumbnail was written or reused
    Ok(ProcessedThumbnail),
    /// The file was skipped because of an error
    Failed(FailedFile),
}

/// Serializes report records to JSON or JSONL.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    pending: Vec<ReportRecord>,
    records_written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// Create a report writer over `writer`.
    ///
    /// Nothing is written until the first record (JSONL) or `finish` (JSON).
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self {
            writer,
            format,
            pending: Vec::new(),
            records_written: 0,
        }
    }

    /// Record a successful file.
    pub fn processed(&mut self, item: &ProcessedThumbnail) -> io::Result<()> {
        self.record(ReportRecord::Ok(item.clone()))
    }

    /// Record a failed file.
    pub fn failed(&mut self, item: &FailedFile) -> io::Result<()> {
        self.record(ReportRecord::Failed(item.clone()))
    }

    fn record(&mut self, record: ReportRecord) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => self.pending.push(record),
            ReportFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, &record).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.records_written += 1;
        Ok(())
    }

    /// Number of records accepted so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Write any buffered records, flush, and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == ReportFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, &self.pending)
                .map_err(io::Error::other)?;
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
