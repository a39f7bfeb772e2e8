//! CSV iteration log.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nrsolve_math::prelude::{IterationRecord, IterationSink, RootFindOutcome};
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Header row of every iteration log.
pub const LOG_HEADER: [&str; 4] = ["k", "x_n", "f(x_n)", "Erro Estimado"];

/// Marker written in the first column when a run fails to evaluate.
pub const ERROR_MARKER: &str = "ERRO";

/// Writes one CSV row per iteration record.
///
/// Write errors cannot be reported from [`IterationSink::record`], so the
/// first one is kept and returned by [`finish`](Self::finish). Rows after a
/// failed write are dropped.
pub struct CsvLogSink<W: Write> {
    writer: csv::Writer<W>,
    precision: usize,
    error: Option<csv::Error>,
}

impl CsvLogSink<BufWriter<File>> {
    /// Creates (or truncates) the log file at `path`.
    pub fn create(path: &Path, precision: usize) -> CliResult<Self> {
        debug!("Writing iteration log to {}", path.display());
        Self::new(BufWriter::new(File::create(path)?), precision)
    }
}

impl<W: Write> CsvLogSink<W> {
    /// Wraps `inner` and writes the header row.
    pub fn new(inner: W, precision: usize) -> CliResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(inner);
        writer.write_record(LOG_HEADER)?;
        Ok(Self {
            writer,
            precision,
            error: None,
        })
    }

    /// Writes the error row for failed runs, flushes, and returns the writer.
    pub fn finish(mut self, outcome: &RootFindOutcome) -> CliResult<W> {
        if let Some(error) = self.error.take() {
            return Err(error.into());
        }
        if let RootFindOutcome::EvaluationFailed { message } = outcome {
            self.writer.write_record([ERROR_MARKER, message.as_str()])?;
        }
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| CliError::Io(e.into_error()))
    }
}

impl<W: Write> IterationSink for CsvLogSink<W> {
    fn record(&mut self, record: &IterationRecord) {
        if self.error.is_some() {
            return;
        }
        let prec = self.precision;
        let row = [
            record.index.to_string(),
            format!("{:.prec$}", record.x_n),
            format!("{:.prec$}", record.fx_n),
            format!("{:.prec$}", record.estimated_error),
        ];
        if let Err(e) = self.writer.write_record(&row) {
            warn!("Failed to write iteration {}: {}", record.index, e);
            self.error = Some(e);
        }
    }
}
