//! Eval command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use nrsolve_math::prelude::{preprocess, ExpressionEvaluator};

use crate::cli::OutputFormat;
use crate::commands::validate_precision;
use crate::config::Settings;
use crate::output::{print_header, print_table, KeyValue};

/// Arguments for the eval command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Expression in x, e.g. "2x + 1"
    pub expression: String,

    /// Value bound to x
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub x: f64,

    /// Digits after the decimal point
    #[arg(short, long)]
    pub precision: Option<usize>,
}

/// Evaluation result.
#[derive(Debug, Serialize)]
pub struct Evaluation {
    pub expression: String,
    pub interpreted: String,
    pub x: f64,
    pub value: f64,
}

/// Execute the eval command.
pub fn execute(args: EvalArgs, format: OutputFormat, settings: &Settings) -> Result<()> {
    let precision = validate_precision(args.precision.unwrap_or(settings.precision))?;
    let evaluator = ExpressionEvaluator::new().with_division_threshold(settings.division_threshold);

    let value = evaluator.evaluate(&args.expression, args.x)?;
    let result = Evaluation {
        interpreted: preprocess(&args.expression),
        expression: args.expression,
        x: args.x,
        value,
    };

    match format {
        OutputFormat::Table => {
            print_header("Evaluation");
            print_table(&[
                KeyValue::new("Expression", result.expression.as_str()),
                KeyValue::new("Interpreted as", result.interpreted.as_str()),
                KeyValue::new("x", result.x.to_string()),
                KeyValue::from_f64("Value", result.value, precision),
            ]);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(&result)?;
            wtr.flush()?;
        }
        OutputFormat::Minimal => {
            println!("{}", result.value);
        }
    }

    Ok(())
}
