//! End-to-end pipeline: guard, tokenize, parse, normalize, compile.
//!
//! [`SearchCompiler`] holds a [`GuardPolicy`] and exposes each stage so a
//! host can inspect intermediate results. Every method is a pure function
//! of its arguments and the policy.

use serde::Serialize;

use crate::cnf::{to_cnf_bounded, ClauseList};
use crate::compiler::compile;
use crate::error::Result;
use crate::expr::Expr;
use crate::guard::GuardPolicy;
use crate::parser::parse;
use crate::predicate::FilterSet;
use crate::target::TargetRef;
use crate::token::{tokenize, Token};

/// Size measurements of one compiled query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetrics {
    /// Query length in characters.
    pub length: usize,
    pub tokens: usize,
    /// Leaf conditions in the parsed tree.
    pub leaves: usize,
    /// CNF clauses after distribution.
    pub clauses: usize,
    pub predicates: usize,
}

/// Result of [`SearchCompiler::compile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSearch {
    pub filters: FilterSet,
    /// Present only when the policy enables the measurement chip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QueryMetrics>,
}

/// Compiles search expressions under a guard policy.
///
/// # Example
///
/// ```
/// use sift_query::{SearchCompiler, TargetRef};
///
/// let target = TargetRef::new("Tickets", "Priority");
/// let compiled = SearchCompiler::new()
///     .compile("(urgent OR high) AND critical", &target)
///     .unwrap();
/// assert_eq!(compiled.filters.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchCompiler {
    policy: GuardPolicy,
}

impl SearchCompiler {
    /// A compiler with the default limits.
    pub fn new() -> Self {
        SearchCompiler::default()
    }

    pub fn with_policy(policy: GuardPolicy) -> Self {
        SearchCompiler { policy }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Length check, then tokenize, then token-count check.
    pub fn tokens(&self, raw: &str) -> Result<Vec<Token>> {
        self.policy.check_length(raw)?;
        let tokens = tokenize(raw);
        self.policy.check_tokens(&tokens)?;
        Ok(tokens)
    }

    /// Everything up to and including the leaf-count check.
    pub fn parse(&self, raw: &str) -> Result<Expr> {
        let tokens = self.tokens(raw)?;
        let expr = parse(&tokens)?;
        self.policy.check_leaves(&expr)?;
        Ok(expr)
    }

    /// Everything up to and including bounded CNF conversion.
    pub fn clauses(&self, raw: &str) -> Result<ClauseList> {
        let expr = self.parse(raw)?;
        Ok(to_cnf_bounded(&expr, self.policy.max_cnf_clauses)?)
    }

    /// Runs the full pipeline.
    pub fn compile(&self, raw: &str, target: &TargetRef) -> Result<CompiledSearch> {
        let tokens = self.tokens(raw)?;
        let expr = parse(&tokens)?;
        self.policy.check_leaves(&expr)?;
        let leaves = expr.leaf_count();

        let clauses = to_cnf_bounded(&expr, self.policy.max_cnf_clauses)?;
        let filters = compile(&clauses, target)?;

        tracing::debug!(
            tokens = tokens.len(),
            leaves,
            clauses = clauses.len(),
            predicates = filters.len(),
            column = %target,
            "compiled search query"
        );

        let metrics = self.policy.measure_chip_enabled.then(|| QueryMetrics {
            length: raw.chars().count(),
            tokens: tokens.len(),
            leaves,
            clauses: clauses.len(),
            predicates: filters.len(),
        });

        Ok(CompiledSearch { filters, metrics })
    }
}

/// Compiles `raw` against `target`.
///
/// `None` for `policy` applies [`GuardPolicy::default`].
pub fn compile_query(
    raw: &str,
    target: &TargetRef,
    policy: Option<&GuardPolicy>,
) -> Result<FilterSet> {
    let compiler = SearchCompiler::with_policy(policy.cloned().unwrap_or_default());
    Ok(compiler.compile(raw, target)?.filters)
}
