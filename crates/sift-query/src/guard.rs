//! Size limits that bound parsing and CNF distribution.
//!
//! Checks run cheapest first and stop at the first failure:
//!
//! 1. query length (characters) against `max_query_length`
//! 2. token count against `max_token_count`
//! 3. leaf conditions in the parsed tree against `max_clause_leaf_count`
//!
//! A fourth limit, `max_cnf_clauses`, is enforced during distribution by
//! [`to_cnf_bounded`](crate::cnf::to_cnf_bounded).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::Expr;
use crate::parser::parse;
use crate::token::{tokenize, Token};

/// Host-supplied limits. Read-only to the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuardPolicy {
    /// Maximum query length in characters.
    pub max_query_length: usize,
    /// Maximum number of tokens.
    #[serde(alias = "maxTokens")]
    pub max_token_count: usize,
    /// Maximum number of leaf conditions after parsing.
    #[serde(alias = "maxClauses")]
    pub max_clause_leaf_count: usize,
    /// Maximum number of CNF clauses produced by distribution.
    pub max_cnf_clauses: usize,
    /// Report size metrics alongside compiled predicates.
    pub measure_chip_enabled: bool,
}

impl GuardPolicy {
    pub const DEFAULT_MAX_QUERY_LENGTH: usize = 500;
    pub const DEFAULT_MAX_TOKENS: usize = 100;
    pub const DEFAULT_MAX_CLAUSES: usize = 50;
    pub const DEFAULT_MAX_CNF_CLAUSES: usize = 256;

    /// A policy with every limit disabled.
    pub fn unbounded() -> Self {
        GuardPolicy {
            max_query_length: usize::MAX,
            max_token_count: usize::MAX,
            max_clause_leaf_count: usize::MAX,
            max_cnf_clauses: usize::MAX,
            measure_chip_enabled: false,
        }
    }

    /// Check 1: raw query length.
    pub fn check_length(&self, raw: &str) -> Result<(), GuardRejection> {
        let length = raw.chars().count();
        if length > self.max_query_length {
            return Err(GuardRejection::QueryTooLong {
                length,
                max: self.max_query_length,
            });
        }
        Ok(())
    }

    /// Check 2: token count.
    pub fn check_tokens(&self, tokens: &[Token]) -> Result<(), GuardRejection> {
        if tokens.len() > self.max_token_count {
            return Err(GuardRejection::TooManyTokens {
                count: tokens.len(),
                max: self.max_token_count,
            });
        }
        Ok(())
    }

    /// Check 3: leaf conditions of a parsed tree.
    pub fn check_leaves(&self, expr: &Expr) -> Result<(), GuardRejection> {
        let count = count_leaves(expr);
        if count > self.max_clause_leaf_count {
            return Err(GuardRejection::TooManyLeaves {
                count,
                max: self.max_clause_leaf_count,
            });
        }
        Ok(())
    }
}

impl Default for GuardPolicy {
    fn default() -> Self {
        GuardPolicy {
            max_query_length: Self::DEFAULT_MAX_QUERY_LENGTH,
            max_token_count: Self::DEFAULT_MAX_TOKENS,
            max_clause_leaf_count: Self::DEFAULT_MAX_CLAUSES,
            max_cnf_clauses: Self::DEFAULT_MAX_CNF_CLAUSES,
            measure_chip_enabled: false,
        }
    }
}

/// Why a query was refused. `Display` is the user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardRejection {
    #[error("query is {length} characters long; the limit is {max}")]
    QueryTooLong { length: usize, max: usize },

    #[error("query has {count} tokens; the limit is {max}")]
    TooManyTokens { count: usize, max: usize },

    #[error("query has {count} search terms; the limit is {max}")]
    TooManyLeaves { count: usize, max: usize },

    #[error("query expands to more than {max} filter clauses ({count} needed)")]
    TooManyClauses { count: usize, max: usize },
}

impl GuardRejection {
    /// Human-readable reason, distinct per check.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Counts leaf conditions under `expr`, including those nested in groups.
pub fn count_leaves(expr: &Expr) -> usize {
    expr.leaf_count()
}

/// Runs all size checks against a raw query.
///
/// A query that fails to parse passes the leaf check: syntax errors are
/// reported by compilation, not by the guard.
pub fn validate(raw: &str, policy: &GuardPolicy) -> Result<(), GuardRejection> {
    policy.check_length(raw)?;
    let tokens = tokenize(raw);
    policy.check_tokens(&tokens)?;
    if let Ok(expr) = parse(&tokens) {
        policy.check_leaves(&expr)?;
    }
    Ok(())
}
