//! Operators used by expression groups and emitted predicates.
//!
//! Serialized names match the evaluation engine's schema exactly
//! (`"And"`, `"Or"`, `"Contains"`, `"DoesNotContain"`, `"In"`).

use serde::{Deserialize, Serialize};

/// Logical connective of a group node or a boolean predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    /// Every child must hold.
    And,
    /// At least one child must hold.
    Or,
}

impl LogicalOp {
    /// Returns the schema name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "And",
            LogicalOp::Or => "Or",
        }
    }

    /// Maps an operator keyword token (`AND`/`OR`) to its connective.
    pub fn from_keyword(keyword: &str) -> Option<LogicalOp> {
        if keyword.eq_ignore_ascii_case("AND") {
            Some(LogicalOp::And)
        } else if keyword.eq_ignore_ascii_case("OR") {
            Some(LogicalOp::Or)
        } else {
            None
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator of a single condition inside a boolean predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOp {
    /// Column value contains the term.
    Contains,
    /// Column value does not contain the term.
    DoesNotContain,
}

impl ConditionOp {
    /// Chooses the operator for a term given its exclusion flag.
    pub fn for_exclusion(excluded: bool) -> ConditionOp {
        if excluded {
            ConditionOp::DoesNotContain
        } else {
            ConditionOp::Contains
        }
    }

    /// Returns the schema name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionOp::Contains => "Contains",
            ConditionOp::DoesNotContain => "DoesNotContain",
        }
    }
}

impl std::fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator of an equality-list predicate. The engine only knows `In`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MembershipOp {
    /// Column value is one of the listed values.
    #[default]
    In,
}

impl std::fmt::Display for MembershipOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "In")
    }
}
