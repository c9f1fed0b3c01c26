//! `sift` - compile free-text boolean searches into column filters.
//!
//! ```text
//! sift compile '(urgent OR high) AND critical' --binding 'Tickets[Priority]'
//! sift cnf '(a b) OR c'
//! sift batch queries.txt --table Tickets --column Priority
//! ```

mod batch;
mod cli;
mod config;
mod input;
mod output;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use sift_query::{SearchCompiler, SiftError};
use tracing_subscriber::EnvFilter;

use crate::batch::FilterHost;
use crate::cli::{BatchArgs, Cli, Command, CompileArgs, StageArgs};
use crate::input::{read_batch, resolve_query, RealStdin};
use crate::output::to_json_line;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let policy = cli.policy.resolve()?;
    let compiler = SearchCompiler::with_policy(policy);

    match &cli.command {
        Command::Compile(args) => run_compile(&compiler, args),
        Command::Tokens(args) => run_stage(args, |q| to_value(compiler.tokens(q)?)),
        Command::Parse(args) => run_stage(args, |q| to_value(compiler.parse(q)?)),
        Command::Cnf(args) => run_stage(args, |q| to_value(compiler.clauses(q)?)),
        Command::Batch(args) => run_batch(compiler, args),
    }
}

/// Logs to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// the verbosity flags.
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn to_value<T: serde::Serialize>(data: T) -> Result<serde_json::Value, SiftError> {
    Ok(serde_json::to_value(data)?)
}

fn run_compile(compiler: &SearchCompiler, args: &CompileArgs) -> Result<()> {
    let query = resolve_query(
        args.input.query.as_deref(),
        args.input.file.as_deref(),
        &RealStdin,
    )?;

    // Blank means "no filter".
    if query.trim().is_empty() {
        println!("{}", args.format.serialize(&())?);
        return Ok(());
    }

    let target = args.target.target();
    let compiled = compiler
        .compile(&query, &target)
        .with_context(|| format!("cannot compile query for {target}"))?;

    let rendered = if compiled.metrics.is_some() {
        args.format.serialize(&compiled)?
    } else {
        args.format.serialize(&compiled.filters)?
    };
    println!("{rendered}");
    Ok(())
}

/// Prints one intermediate stage. A blank query prints `null` except for
/// `tokens`, where it is an empty list.
fn run_stage<F>(args: &StageArgs, stage: F) -> Result<()>
where
    F: Fn(&str) -> Result<serde_json::Value, SiftError>,
{
    let query = resolve_query(
        args.input.query.as_deref(),
        args.input.file.as_deref(),
        &RealStdin,
    )?;

    let value = match stage(&query) {
        Ok(value) => value,
        Err(SiftError::Syntax(_)) if query.trim().is_empty() => serde_json::Value::Null,
        Err(err) => return Err(err.into()),
    };
    println!("{}", args.format.serialize(&value)?);
    Ok(())
}

fn run_batch(compiler: SearchCompiler, args: &BatchArgs) -> Result<()> {
    let text = read_batch(args.path.as_deref(), &RealStdin)?;
    let mut host = FilterHost::new(compiler, args.target.target());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in text.lines() {
        let record = host.submit(line);
        writeln!(out, "{}", to_json_line(&record)?).context("failed to write output")?;
    }
    tracing::debug!(applied = host.applied(), "batch finished");
    Ok(())
}
