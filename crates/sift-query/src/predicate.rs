//! Output predicates: the data contract toward the evaluation engine.
//!
//! Two shapes exist:
//!
//! ```text
//! equality list: { "$schema", target, filterType: 1, operator: "In", values: [..] }
//! boolean:       { "$schema", target, filterType: 0, logicalOperator: "And"|"Or",
//!                  conditions: [{ operator: "Contains"|"DoesNotContain", value }] }
//! ```
//!
//! A [`FilterSet`] is one predicate or an ordered list of them; a list is
//! the conjunction of its members.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::expr::Condition;
use crate::op::{ConditionOp, LogicalOp, MembershipOp};
use crate::target::TargetRef;
use crate::value::FilterValue;

/// Schema marker of equality-list predicates.
pub const BASIC_SCHEMA: &str = "http://powerbi.com/product/schema#basic";

/// Schema marker of boolean predicates.
pub const ADVANCED_SCHEMA: &str = "http://powerbi.com/product/schema#advanced";

/// Numeric filter kind tag expected by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FilterType {
    Advanced,
    Basic,
}

impl From<FilterType> for u8 {
    fn from(t: FilterType) -> u8 {
        match t {
            FilterType::Advanced => 0,
            FilterType::Basic => 1,
        }
    }
}

impl TryFrom<u8> for FilterType {
    type Error = String;

    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        match n {
            0 => Ok(FilterType::Advanced),
            1 => Ok(FilterType::Basic),
            other => Err(format!("unsupported filterType {other}")),
        }
    }
}

/// "Column value is one of `values`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EqualityPredicate {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub target: TargetRef,
    pub filter_type: FilterType,
    pub operator: MembershipOp,
    pub values: Vec<FilterValue>,
}

/// A single `Contains`/`DoesNotContain` test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredicateCondition {
    pub operator: ConditionOp,
    pub value: String,
}

impl From<&Condition> for PredicateCondition {
    fn from(c: &Condition) -> Self {
        PredicateCondition {
            operator: ConditionOp::for_exclusion(c.is_excluded()),
            value: c.value.clone(),
        }
    }
}

/// Conditions joined by one logical operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanPredicate {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub target: TargetRef,
    pub filter_type: FilterType,
    pub logical_operator: LogicalOp,
    pub conditions: Vec<PredicateCondition>,
}

/// One emitted filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Predicate {
    Equality(EqualityPredicate),
    Boolean(BooleanPredicate),
}

impl Predicate {
    pub fn equality(target: &TargetRef, values: Vec<FilterValue>) -> Self {
        Predicate::Equality(EqualityPredicate {
            schema: BASIC_SCHEMA.to_string(),
            target: target.clone(),
            filter_type: FilterType::Basic,
            operator: MembershipOp::In,
            values,
        })
    }

    pub fn boolean(
        target: &TargetRef,
        logical_operator: LogicalOp,
        conditions: Vec<PredicateCondition>,
    ) -> Self {
        Predicate::Boolean(BooleanPredicate {
            schema: ADVANCED_SCHEMA.to_string(),
            target: target.clone(),
            filter_type: FilterType::Advanced,
            logical_operator,
            conditions,
        })
    }

    pub fn target(&self) -> &TargetRef {
        match self {
            Predicate::Equality(p) => &p.target,
            Predicate::Boolean(p) => &p.target,
        }
    }

    pub fn as_equality(&self) -> Option<&EqualityPredicate> {
        match self {
            Predicate::Equality(p) => Some(p),
            Predicate::Boolean(_) => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&BooleanPredicate> {
        match self {
            Predicate::Boolean(p) => Some(p),
            Predicate::Equality(_) => None,
        }
    }
}

/// Compiler output: a single predicate or an implicitly ANDed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSet {
    Single(Predicate),
    Many(Vec<Predicate>),
}

impl FilterSet {
    /// Wraps a list, unwrapping it when it holds exactly one predicate.
    pub fn from_vec(mut predicates: Vec<Predicate>) -> Self {
        if predicates.len() == 1 {
            if let Some(only) = predicates.pop() {
                return FilterSet::Single(only);
            }
        }
        FilterSet::Many(predicates)
    }

    pub fn predicates(&self) -> &[Predicate] {
        match self {
            FilterSet::Single(p) => std::slice::from_ref(p),
            FilterSet::Many(ps) => ps,
        }
    }

    pub fn len(&self) -> usize {
        self.predicates().len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Hex SHA-256 of the JSON encoding.
    ///
    /// Structurally identical sets always produce the same fingerprint, so
    /// a host can skip re-applying a filter that has not changed.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}
