use std::fs::File;
use std::io::Write;
use std::path::Path;

use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::Species;

use crate::record::EventRecord;

/// Receives committed event records, one row each.
pub trait SpectrumSink {
    /// Commits one record as a row.
    fn commit(&mut self, record: &EventRecord) -> Result<(), HadrError>;

    /// Flushes buffered rows.
    fn finish(&mut self) -> Result<(), HadrError> {
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySink {
    records: Vec<EventRecord>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records committed so far.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Takes ownership of the committed records.
    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }
}

impl SpectrumSink for MemorySink {
    fn commit(&mut self, record: &EventRecord) -> Result<(), HadrError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Writes records as CSV rows of `event` followed by the ten score columns.
pub struct CsvSpectrumSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl CsvSpectrumSink<File> {
    /// Creates the file at `path` and writes the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, HadrError> {
        let path = path.as_ref();
        let writer = csv::Writer::from_path(path).map_err(|err| {
            HadrError::Serde(
                wrap_csv("spectrum_csv_create", err)
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::with_writer(writer)
    }
}

impl<W: Write> CsvSpectrumSink<W> {
    /// Wraps an arbitrary writer and writes the header.
    pub fn from_writer(inner: W) -> Result<Self, HadrError> {
        Self::with_writer(csv::Writer::from_writer(inner))
    }

    fn with_writer(mut writer: csv::Writer<W>) -> Result<Self, HadrError> {
        let header = std::iter::once("event").chain(Species::ALL.iter().map(|s| s.column()));
        writer
            .write_record(header)
            .map_err(|err| HadrError::Serde(wrap_csv("spectrum_csv_header", err)))?;
        Ok(Self { writer, rows: 0 })
    }

    /// Rows written so far, header excluded.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flushes and returns the inner writer.
    pub fn into_inner(self) -> Result<W, HadrError> {
        self.writer.into_inner().map_err(|err| {
            HadrError::Serde(ErrorInfo::new("spectrum_csv_flush", err.to_string()))
        })
    }
}

impl<W: Write> SpectrumSink for CsvSpectrumSink<W> {
    fn commit(&mut self, record: &EventRecord) -> Result<(), HadrError> {
        let scores = record.scores();
        let row =
            std::iter::once(record.event.to_string()).chain(scores.iter().map(f64::to_string));
        self.writer
            .write_record(row)
            .map_err(|err| HadrError::Serde(wrap_csv("spectrum_csv_row", err)))?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), HadrError> {
        self.writer.flush().map_err(|err| {
            HadrError::Serde(ErrorInfo::new("spectrum_csv_flush", err.to_string()))
        })
    }
}

fn wrap_csv(code: &str, err: csv::Error) -> ErrorInfo {
    ErrorInfo::new(code, "spectrum CSV failure").with_hint(err.to_string())
}
