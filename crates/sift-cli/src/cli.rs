//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sift_query::TargetRef;

use crate::config::PolicyArgs;
use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "sift", version, about = "Compile free-text boolean searches into column filters")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a query into filter predicates
    Compile(CompileArgs),
    /// Print the token stream of a query
    Tokens(StageArgs),
    /// Print the parsed expression tree of a query
    Parse(StageArgs),
    /// Print the CNF clause list of a query
    Cnf(StageArgs),
    /// Compile one query per line, reporting what a host would apply
    Batch(BatchArgs),
}

/// Query text from an argument, `--file`, or stdin.
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Query text, or a .txt/.query file holding it
    pub query: Option<String>,

    /// Read the query from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// The column every predicate filters on.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Table name
    #[arg(long, default_value = "Employees")]
    pub table: String,

    /// Column name
    #[arg(long, default_value = "JobTitle")]
    pub column: String,

    /// Column binding such as `Table[Column]` or `schema.Table.Column`
    #[arg(long, value_name = "REF", conflicts_with_all = ["table", "column"])]
    pub binding: Option<TargetRef>,
}

impl TargetArgs {
    pub fn target(&self) -> TargetRef {
        match &self.binding {
            Some(binding) => binding.clone(),
            None => TargetRef::new(&self.table, &self.column),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub input: QueryArgs,

    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct StageArgs {
    #[command(flatten)]
    pub input: QueryArgs,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// File with one query per line; stdin when omitted
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compile_defaults_to_employees_job_title() {
        let cli = Cli::try_parse_from(["sift", "compile", "engineer"]).unwrap();
        let Command::Compile(args) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(args.input.query.as_deref(), Some("engineer"));
        assert_eq!(args.target.target(), TargetRef::new("Employees", "JobTitle"));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn binding_is_parsed() {
        let cli =
            Cli::try_parse_from(["sift", "compile", "x", "--binding", "Tickets[Priority]"]).unwrap();
        let Command::Compile(args) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(args.target.target(), TargetRef::new("Tickets", "Priority"));
    }

    #[test]
    fn binding_conflicts_with_table() {
        let result = Cli::try_parse_from([
            "sift", "compile", "x", "--binding", "T[C]", "--table", "Other",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_binding_is_refused() {
        assert!(Cli::try_parse_from(["sift", "compile", "x", "--binding", "nodots"]).is_err());
    }

    #[test]
    fn global_limits_after_subcommand() {
        let cli = Cli::try_parse_from(["sift", "cnf", "a", "--max-cnf-clauses", "8", "--measure"])
            .unwrap();
        assert_eq!(cli.policy.max_cnf_clauses, Some(8));
        assert_eq!(cli.policy.measure, Some(true));
    }
}
