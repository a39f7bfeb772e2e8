//! List command implementation.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use nrsolve_math::prelude::BuiltinFunction;

use crate::cli::OutputFormat;
use crate::output::{print_header, print_table};

/// One catalog entry.
#[derive(Debug, Serialize, Tabled)]
pub struct CatalogEntry {
    #[tabled(rename = "#")]
    pub number: usize,
    #[tabled(rename = "Id")]
    pub id: &'static str,
    #[tabled(rename = "f(x)")]
    pub function: &'static str,
    #[tabled(rename = "f'(x)")]
    pub derivative: &'static str,
}

impl From<BuiltinFunction> for CatalogEntry {
    fn from(function: BuiltinFunction) -> Self {
        Self {
            number: function.menu_number(),
            id: function.id(),
            function: function.label(),
            derivative: function.derivative_label(),
        }
    }
}

/// Execute the list command.
pub fn execute(format: OutputFormat) -> Result<()> {
    let entries: Vec<CatalogEntry> = BuiltinFunction::ALL
        .into_iter()
        .map(CatalogEntry::from)
        .collect();

    match format {
        OutputFormat::Table => {
            print_header("Built-in Functions");
            print_table(&entries);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for entry in &entries {
                wtr.serialize(entry)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Minimal => {
            for entry in &entries {
                println!("{}", entry.id);
            }
        }
    }

    Ok(())
}
