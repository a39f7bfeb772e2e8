//! Interactive command implementation.
//!
//! Menu-driven session: pick a built-in function or type one in, then enter
//! the initial guess, tolerance and iteration limit. A blank answer keeps
//! the configured default.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Result;
use clap::Args;

use nrsolve_math::prelude::{BuiltinFunction, FunctionSource, RootFindOutcome};

use crate::cli::OutputFormat;
use crate::commands::solve::exit_code;
use crate::commands::{run_newton, user_function, RunParameters};
use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::output::write_run;

/// Menu entry for a user-entered function.
const CUSTOM_OPTION: usize = 5;

/// Arguments for the interactive command.
#[derive(Args, Debug, Default)]
pub struct InteractiveArgs {
    /// Digits after the decimal point
    #[arg(short, long)]
    pub precision: Option<usize>,

    /// Write the iterations to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the interactive command.
pub fn execute(args: InteractiveArgs, format: OutputFormat, settings: &Settings) -> Result<ExitCode> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock());
    let outcome = session.run(&args, format, settings)?;
    Ok(exit_code(&outcome))
}

/// A question-and-answer session over a reader and a writer.
pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs the whole session and returns the outcome of the solve.
    pub fn run(
        &mut self,
        args: &InteractiveArgs,
        format: OutputFormat,
        settings: &Settings,
    ) -> Result<RootFindOutcome> {
        let source = self.choose_function(settings)?;
        let params = self.read_parameters(settings, args.precision)?;

        let run = run_newton(source, &params, args.output.as_deref())?;
        write_run(&mut self.output, &run, format)?;
        self.output.flush()?;
        Ok(run.report.outcome)
    }

    /// Shows the menu and builds the chosen function.
    pub fn choose_function(&mut self, settings: &Settings) -> CliResult<FunctionSource> {
        writeln!(self.output, "=== Newton-Raphson ===")?;
        for function in BuiltinFunction::ALL {
            writeln!(self.output, "{}. f(x) = {}", function.menu_number(), function)?;
        }
        writeln!(self.output, "{}. Enter your own function", CUSTOM_OPTION)?;

        let answer = self.ask("Option: ", "menu option")?;
        let option: usize = answer
            .parse()
            .map_err(|_| CliError::InvalidOption(answer.clone()))?;

        if option != CUSTOM_OPTION {
            return BuiltinFunction::from_menu_number(option)
                .map(FunctionSource::Builtin)
                .ok_or(CliError::InvalidOption(answer));
        }

        writeln!(self.output, "\n--- Quick guide ---")?;
        writeln!(self.output, "Operators: + - * / ^")?;
        writeln!(self.output, "Functions: sin cos tan exp log sqrt")?;
        writeln!(self.output, "Example:   x^2 - 4")?;
        writeln!(self.output, "'2x' is read as '2*x'.")?;

        let function = self.ask("f(x): ", "function")?;
        let derivative = self.ask("f'(x) (blank for numeric): ", "derivative")?;
        let source = FunctionSource::from(user_function(&function, Some(&derivative), settings));

        writeln!(self.output, "\nInterpreted as:")?;
        writeln!(self.output, "  f(x):  {}", source.describe())?;
        writeln!(self.output, "  f'(x): {}", source.describe_derivative())?;
        Ok(source)
    }

    /// Reads the initial guess, tolerance and iteration limit.
    pub fn read_parameters(
        &mut self,
        settings: &Settings,
        precision: Option<usize>,
    ) -> CliResult<RunParameters> {
        writeln!(self.output, "\n--- Parameters ---")?;
        let x0 = self.ask_number("Initial guess (x0)", "initial guess", settings.x0)?;
        let epsilon = self.ask_number("Tolerance (epsilon)", "epsilon", settings.epsilon)?;
        let max_iterations = self.ask_number(
            "Maximum iterations",
            "maximum iterations",
            settings.max_iterations,
        )?;

        RunParameters::resolve(
            settings,
            Some(x0),
            Some(epsilon),
            Some(max_iterations),
            precision,
        )
    }

    /// Writes `prompt` and reads one trimmed line.
    fn ask(&mut self, prompt: &str, what: &str) -> CliResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::UnexpectedEof(what.to_string()));
        }
        Ok(line.trim().to_string())
    }

    fn ask_number<T>(&mut self, prompt: &str, what: &str, default: T) -> CliResult<T>
    where
        T: FromStr + Display,
    {
        let answer = self.ask(&format!("{} [{}]: ", prompt, default), what)?;
        if answer.is_empty() {
            return Ok(default);
        }
        answer.parse().map_err(|_| CliError::InvalidNumber {
            field: what.to_string(),
            value: answer,
        })
    }
}
