//! Command dispatch for the `stepcheck` entrypoint.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::slice;

use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result};
use stepcheck::datatable::{parse_check_rows, parse_pipe_table};
use stepcheck::{
    BatchEvaluator, Evaluator, EvaluatorConfig, RawMatchSpec, RawValue, TypedPath, ValueOrigin,
    ValueSource, registry,
};

use crate::output::{Format, write_operators, write_outcomes, write_strategies, write_verdict};

/// Evaluate typed-value checks from the command line.
#[derive(Parser)]
#[command(author, version, about)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Supported commands.
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Evaluate one check and exit non-zero when it does not hold.
    Assert(AssertArgs),
    /// Evaluate one check and print `true` or `false`.
    Check(CheckArgs),
    /// Evaluate a pipe-delimited table of checks, stopping at the first failure.
    Batch(BatchArgs),
    /// List recognised operator tokens.
    Operators,
    /// List recognised text match strategies.
    Strategies,
}

#[derive(Args)]
pub(crate) struct EngineArgs {
    /// Treat an empty list as absent in presence checks.
    ///
    /// Overrides `STEPCHECK_EMPTY_LIST_IS_ABSENT` when given.
    #[arg(long, value_name = "BOOL")]
    pub empty_list_is_absent: Option<bool>,
}

impl EngineArgs {
    fn evaluator(&self) -> Evaluator {
        let mut config = EvaluatorConfig::default();
        if let Some(flag) = self.empty_list_is_absent {
            config.empty_list_is_absent = flag;
        }
        Evaluator::new(config)
    }
}

#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path naming the value, optionally suffixed with `:type`.
    pub path: String,
    /// Comparison operator token.
    pub operator: String,
    /// Expected value, either a bare literal or a JSON match document.
    #[arg(default_value = "")]
    pub spec: String,
    /// Actual value as JSON. Text that is not valid JSON is read as a string.
    #[arg(long, conflicts_with = "document")]
    pub actual: Option<String>,
    /// JSON document the path is resolved against.
    #[arg(long)]
    pub document: Option<PathBuf>,
    /// Describe the value as a page element in messages.
    #[arg(long)]
    pub element: bool,
    #[command(flatten)]
    pub engine: EngineArgs,
}

impl CheckArgs {
    fn typed_path(&self) -> TypedPath {
        let path = TypedPath::parse(&self.path);
        if self.element {
            path.with_origin(ValueOrigin::Element)
        } else {
            path
        }
    }

    fn actual_value(&self, path: &TypedPath) -> Result<RawValue> {
        if let Some(file) = &self.document {
            let document = read_document(file)?;
            return Ok(document.value_at(path.path()).unwrap_or(RawValue::Null));
        }
        Ok(self.actual.as_deref().map_or(RawValue::Null, parse_literal))
    }

    fn raw_spec(&self) -> RawMatchSpec {
        RawMatchSpec::from(self.spec.as_str())
    }
}

#[derive(Args)]
pub(crate) struct AssertArgs {
    #[command(flatten)]
    pub check: CheckArgs,
    /// Output format for the outcome.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Args)]
pub(crate) struct BatchArgs {
    /// JSON document the checks read from.
    #[arg(long)]
    pub document: PathBuf,
    /// Pipe-delimited table of `path | operator | expected` rows.
    #[arg(long)]
    pub table: PathBuf,
    /// Output format for the outcomes.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    #[command(flatten)]
    pub engine: EngineArgs,
}

pub(crate) fn run() -> Result<()> {
    match Cli::parse().command {
        Commands::Assert(args) => handle_assert(&args),
        Commands::Check(args) => handle_check(&args),
        Commands::Batch(args) => handle_batch(&args),
        Commands::Operators => handle_operators(),
        Commands::Strategies => handle_strategies(),
    }
}

fn handle_assert(args: &AssertArgs) -> Result<()> {
    let check = &args.check;
    let path = check.typed_path();
    let actual = check.actual_value(&path)?;
    let result = check
        .engine
        .evaluator()
        .assert(&path, &actual, &check.operator, &check.raw_spec());
    let mut stdout = io::stdout();
    let reported = match &result {
        Ok(outcome) => Some(outcome),
        Err(err) => err.outcome(),
    };
    if let Some(outcome) = reported {
        write_outcomes(&mut stdout, args.format, slice::from_ref(outcome))?;
        stdout.flush().wrap_err("failed to flush outcome to stdout")?;
    }
    result.map(drop).wrap_err("assertion failed")
}

fn handle_check(args: &CheckArgs) -> Result<()> {
    let path = args.typed_path();
    let actual = args.actual_value(&path)?;
    let holds = args
        .engine
        .evaluator()
        .check(&path, &actual, &args.operator, &args.raw_spec());
    let mut stdout = io::stdout();
    write_verdict(&mut stdout, holds)?;
    stdout.flush().wrap_err("failed to flush verdict to stdout")
}

fn handle_batch(args: &BatchArgs) -> Result<()> {
    let document = read_document(&args.document)?;
    let table = fs::read_to_string(&args.table)
        .wrap_err_with(|| format!("failed to read {}", args.table.display()))?;
    let rows = parse_pipe_table(&table)
        .and_then(parse_check_rows)
        .wrap_err_with(|| format!("invalid check table in {}", args.table.display()))?;
    let outcomes = BatchEvaluator::new(args.engine.evaluator())
        .run(&document, &rows)
        .wrap_err_with(|| format!("batch {} stopped", args.table.display()))?;
    let mut stdout = io::stdout();
    write_outcomes(&mut stdout, args.format, &outcomes)?;
    stdout.flush().wrap_err("failed to flush batch outcomes to stdout")
}

fn handle_operators() -> Result<()> {
    let mut stdout = io::stdout();
    write_operators(&mut stdout, &registry::operator_tokens())?;
    stdout.flush().wrap_err("failed to flush operator listing")
}

fn handle_strategies() -> Result<()> {
    let mut stdout = io::stdout();
    write_strategies(&mut stdout, &registry::strategy_names())?;
    stdout.flush().wrap_err("failed to flush strategy listing")
}

fn read_document(path: &Path) -> Result<RawValue> {
    let text =
        fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).wrap_err_with(|| format!("invalid JSON in {}", path.display()))
}

/// Read a command line literal as JSON, falling back to a plain string.
fn parse_literal(text: &str) -> RawValue {
    serde_json::from_str(text).unwrap_or_else(|_| RawValue::String(text.to_owned()))
}
