//! Output formatting utilities.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use nrsolve_math::prelude::{FunctionDescription, IterationRecord, IterationSink, RootFindOutcome};

use crate::cli::OutputFormat;
use crate::commands::Run;
use crate::sink::CsvLogSink;

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from a float at a fixed precision.
    pub fn from_f64(key: impl Into<String>, value: f64, precision: usize) -> Self {
        Self {
            key: key.into(),
            value: format!("{:.prec$}", value, prec = precision),
        }
    }
}

/// One row of the iteration table.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct IterationRow {
    #[tabled(rename = "k")]
    pub k: u32,
    #[tabled(rename = "x_n")]
    pub x_n: String,
    #[tabled(rename = "f(x_n)")]
    #[serde(rename = "f(x_n)")]
    pub fx_n: String,
    #[tabled(rename = "Erro Estimado")]
    #[serde(rename = "Erro Estimado")]
    pub estimated_error: String,
}

impl IterationRow {
    /// Formats a record at the given precision.
    pub fn new(record: &IterationRecord, precision: usize) -> Self {
        Self {
            k: record.index,
            x_n: format!("{:.prec$}", record.x_n, prec = precision),
            fx_n: format!("{:.prec$}", record.fx_n, prec = precision),
            estimated_error: format!("{:.prec$}", record.estimated_error, prec = precision),
        }
    }
}

/// JSON document for one run.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub function: FunctionDescription,
    pub records: &'a [IterationRecord],
    pub outcome: &'a RootFindOutcome,
}

impl<'a> From<&'a Run> for RunSummary<'a> {
    fn from(run: &'a Run) -> Self {
        Self {
            function: FunctionDescription::from(&run.source),
            records: &run.report.records,
            outcome: &run.report.outcome,
        }
    }
}

/// Builds a rounded table with a left-aligned first column.
pub fn table<T: Tabled>(data: &[T]) -> String {
    Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string()
}

/// Prints data as a formatted table.
pub fn print_table<T: Tabled>(data: &[T]) {
    if data.is_empty() {
        println!("No results.");
        return;
    }
    println!("{}", table(data));
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Writes a section header.
pub fn write_header<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "\n{}", title.bold().underline())
}

/// Writes a finished run in the requested format.
pub fn write_run<W: Write>(out: &mut W, run: &Run, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = &run.report.outcome;
    match format {
        OutputFormat::Table => write_run_table(out, run)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&RunSummary::from(run))?)?;
        }
        OutputFormat::Csv => {
            let mut log = CsvLogSink::new(&mut *out, run.precision)?;
            for record in &run.report.records {
                log.record(record);
            }
            log.finish(outcome)?;
        }
        OutputFormat::Minimal => match outcome.root() {
            Some(root) => writeln!(out, "{:.prec$}", root, prec = run.precision)?,
            None => writeln!(out, "{}", outcome)?,
        },
    }
    Ok(())
}

fn write_run_table<W: Write>(out: &mut W, run: &Run) -> anyhow::Result<()> {
    let precision = run.precision;

    write_header(out, "Newton-Raphson")?;
    let function = FunctionDescription::from(&run.source);
    let summary = vec![
        KeyValue::new("f(x)", function.function),
        KeyValue::new("f'(x)", function.derivative),
    ];
    writeln!(out, "{}", table(&summary))?;

    write_header(out, "Iterations")?;
    if run.report.records.is_empty() {
        writeln!(out, "No iterations.")?;
    } else {
        let rows: Vec<IterationRow> = run
            .report
            .records
            .iter()
            .map(|record| IterationRow::new(record, precision))
            .collect();
        writeln!(out, "{}", table(&rows))?;
    }

    write_header(out, "Result")?;
    let outcome = &run.report.outcome;
    let mut results = vec![KeyValue::new("Status", outcome.status())];
    match outcome {
        RootFindOutcome::Converged { root, iterations } => {
            results.push(KeyValue::from_f64("Root", *root, precision));
            results.push(KeyValue::new("Iterations", iterations.to_string()));
        }
        RootFindOutcome::ExhaustedIterations { last_approximation } => {
            results.push(KeyValue::from_f64(
                "Last approximation",
                *last_approximation,
                precision,
            ));
        }
        RootFindOutcome::DerivativeVanished { at_x } => {
            results.push(KeyValue::from_f64("At x", *at_x, precision));
        }
        RootFindOutcome::EvaluationFailed { message } => {
            results.push(KeyValue::new("Message", message.clone()));
        }
    }
    writeln!(out, "{}", table(&results))?;
    Ok(())
}
