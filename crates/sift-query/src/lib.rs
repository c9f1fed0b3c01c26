//! Sift - compiles free-text boolean search expressions into column filters.
//!
//! A query such as `(urgent OR high) AND critical -draft` is turned into a
//! minimal list of declarative predicates over a single table column, ready
//! to hand to an external evaluation engine.
//!
//! # Quick Start
//!
//! ```rust
//! use sift_query::{compile_query, FilterSet, TargetRef};
//!
//! let target = TargetRef::from_binding("Tickets[Priority]").unwrap();
//! let filters = compile_query("(urgent OR high) AND critical", &target, None).unwrap();
//!
//! // One AND predicate for `critical`, one OR predicate for `urgent | high`
//! assert!(matches!(filters, FilterSet::Many(ref ps) if ps.len() == 2));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! raw ─▶ guard(length) ─▶ tokenize ─▶ guard(tokens) ─▶ parse ─▶ guard(leaves)
//!     ─▶ to_cnf (bounded) ─▶ compile ─▶ FilterSet
//! ```
//!
//! Each stage is also available on its own: [`tokenize`], [`parse`],
//! [`to_cnf`], [`compile`], [`validate`].
//!
//! # Query Syntax
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `a b` | both terms (implicit AND) |
//! | `a AND b`, `a OR b` | explicit operators, AND binds tighter |
//! | `( ... )` | grouping; a missing `)` closes at end of input |
//! | `"exact phrase"` | quoted phrase |
//! | `+term` | required term |
//! | `-term`, `NOT term` | excluded term |
//!
//! # Output
//!
//! | Clause shape | Predicate |
//! |--------------|-----------|
//! | all single terms | one `And` of `Contains`/`DoesNotContain` |
//! | OR of quoted phrases or numbers | equality list (`In`) |
//! | any other OR | `Or` of `Contains`/`DoesNotContain` |

mod cnf;
mod compiler;
mod error;
mod expr;
mod guard;
mod op;
mod parser;
mod predicate;
mod query;
mod target;
mod token;
mod value;

// Re-export public API
pub use cnf::{distribute, to_cnf, to_cnf_bounded, Clause, ClauseList};
pub use compiler::{compile, is_equality_eligible};
pub use error::{ParseError, Result, SiftError};
pub use expr::{Condition, Expr, Polarity};
pub use guard::{count_leaves, validate, GuardPolicy, GuardRejection};
pub use op::{ConditionOp, LogicalOp, MembershipOp};
pub use parser::{parse, Parser, MAX_NESTING_DEPTH};
pub use predicate::{
    BooleanPredicate, EqualityPredicate, FilterSet, FilterType, Predicate, PredicateCondition,
    ADVANCED_SCHEMA, BASIC_SCHEMA,
};
pub use query::{compile_query, CompiledSearch, QueryMetrics, SearchCompiler};
pub use target::TargetRef;
pub use token::{tokenize, Token, TokenKind, Tokenizer};
pub use value::{is_numeric_literal, FilterValue, Number};
