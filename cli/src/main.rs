mod error_formatter;
mod formatter;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formatter::Formatter;
use sieve::{serializers, CollectingReporter, Engine, SieveError, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sieve")]
#[command(about = "Named boolean rules, evaluated in order.")]
#[command(
    long_about = "Sieve evaluates batches of named boolean expressions against a set of parameters.\nLater expressions can use the results of earlier ones."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a batch file and display the results
    ///
    /// The file is a JSON object with "params" and "expressions" keys.
    /// Expressions are evaluated in file order; a failing expression is
    /// reported and recorded as false.
    Run {
        /// Batch file ({"params": {..}, "expressions": {..}})
        file: PathBuf,
        /// Parameters to add or override (format: name=value)
        ///
        /// Examples: age=21, member=true, name=Ada
        params: Vec<String>,
        /// JSON file with composite operation definitions (repeatable)
        #[arg(short = 'o', long = "operations")]
        operations: Vec<PathBuf>,
        /// Print results as a JSON object
        #[arg(long)]
        json: bool,
        /// Exit with an error if any expression failed
        #[arg(long)]
        strict: bool,
    },
    /// Compile an expression and print its canonical form
    Check {
        /// Expression text
        expression: String,
        /// JSON file with composite operation definitions (repeatable)
        #[arg(short = 'o', long = "operations")]
        operations: Vec<PathBuf>,
    },
    /// List registered operations with their canonical arguments
    Operations {
        /// JSON file with composite operation definitions (repeatable)
        #[arg(short = 'o', long = "operations")]
        operations: Vec<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sieve=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run {
            file,
            params,
            operations,
            json,
            strict,
        } => run_command(file, params, operations, *json, *strict),
        Commands::Check {
            expression,
            operations,
        } => check_command(expression, operations),
        Commands::Operations { operations } => operations_command(operations),
    };

    if let Err(e) = result {
        // Bare engine errors get the engine formatting, anything with context keeps its chain
        match e.downcast_ref::<SieveError>() {
            Some(sieve_err) if e.chain().count() == 1 => {
                eprintln!("{}", error_formatter::format_error(sieve_err, None));
            }
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run_command(
    file: &Path,
    params: &[String],
    operations: &[PathBuf],
    json: bool,
    strict: bool,
) -> Result<()> {
    let reporter = Arc::new(CollectingReporter::new());
    let mut engine = Engine::new().with_reporter(reporter.clone());
    load_operations(&mut engine, operations)?;

    let content =
        fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))?;
    let mut document = serializers::parse_batch(&content)?;
    for param in params {
        let (name, value) = parse_param(param)?;
        document.parameters.insert(name, value);
    }

    let results = engine.evaluate(document.expressions, &document.parameters);
    let failures = reporter.take();

    let formatter = Formatter::default();
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", formatter.format_results(&results));
    }
    if !failures.is_empty() {
        eprint!("{}", formatter.format_failures(&failures));
    }

    if strict && !failures.is_empty() {
        anyhow::bail!("{} expression(s) failed", failures.len());
    }
    Ok(())
}

fn check_command(expression: &str, operations: &[PathBuf]) -> Result<()> {
    let mut engine = Engine::new();
    load_operations(&mut engine, operations)?;

    match engine.compile(expression) {
        Ok(compiled) => {
            println!("{}", compiled);
            Ok(())
        }
        Err(err) => {
            eprintln!(
                "{}",
                error_formatter::format_error(&err, Some(("<expression>", expression)))
            );
            std::process::exit(1);
        }
    }
}

fn operations_command(operations: &[PathBuf]) -> Result<()> {
    let mut engine = Engine::new();
    load_operations(&mut engine, operations)?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_operations(engine.registry()));
    Ok(())
}

/// Load composite operation definitions, in the order given
fn load_operations(engine: &mut Engine, files: &[PathBuf]) -> Result<()> {
    for file in files {
        let content =
            fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))?;
        let names = engine
            .load_operations(&content)
            .with_context(|| format!("cannot load operations from {}", file.display()))?;
        tracing::info!(file = %file.display(), count = names.len(), "loaded operations");
    }
    Ok(())
}

/// Parse "name=value" into a parameter
fn parse_param(param: &str) -> Result<(String, Value)> {
    let (name, value) = param
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid parameter '{}', expected name=value", param))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Invalid parameter '{}', name is empty", param);
    }
    Ok((name.to_string(), parse_literal_value(value)))
}

fn parse_literal_value(s: &str) -> Value {
    if s == "true" {
        Value::Boolean(true)
    } else if s == "false" {
        Value::Boolean(false)
    } else if let Some(num) = s.parse::<f64>().ok().filter(|n| n.is_finite()) {
        Value::Number(num)
    } else {
        Value::Text(s.to_string())
    }
}
