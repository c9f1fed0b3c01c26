//! Boolean expression tree produced by the parser.
//!
//! An [`Expr`] is either a leaf [`Condition`] or an n-ary [`Expr::Group`]
//! joined by a [`LogicalOp`]. `NOT` never appears as a node: it is folded
//! into the leaf's polarity while parsing.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::op::LogicalOp;

/// Whether a term must, may, or must not appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// Plain term.
    #[default]
    Neutral,
    /// `+term`.
    Required,
    /// `-term` or `NOT term`.
    Excluded,
}

/// An atomic search term.
///
/// Required and excluded are mutually exclusive by construction: both are
/// views of a single [`Polarity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub value: String,
    pub quoted: bool,
    pub polarity: Polarity,
}

impl Condition {
    /// A plain, unquoted term.
    pub fn term(value: impl Into<String>) -> Self {
        Condition {
            value: value.into(),
            quoted: false,
            polarity: Polarity::Neutral,
        }
    }

    /// A quoted exact phrase.
    pub fn phrase(value: impl Into<String>) -> Self {
        Condition {
            quoted: true,
            ..Condition::term(value)
        }
    }

    /// Returns this condition with the given polarity.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn required(self) -> Self {
        self.with_polarity(Polarity::Required)
    }

    pub fn excluded(self) -> Self {
        self.with_polarity(Polarity::Excluded)
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn is_required(&self) -> bool {
        self.polarity == Polarity::Required
    }

    pub fn is_excluded(&self) -> bool {
        self.polarity == Polarity::Excluded
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Condition", 4)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("isQuoted", &self.quoted)?;
        state.serialize_field("isRequired", &self.is_required())?;
        state.serialize_field("isExcluded", &self.is_excluded())?;
        state.end()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.polarity {
            Polarity::Neutral => {}
            Polarity::Required => f.write_str("+")?,
            Polarity::Excluded => f.write_str("-")?,
        }
        if self.quoted {
            write!(f, "\"{}\"", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

/// A node of the parsed expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Expr {
    /// Leaf term.
    Condition(Condition),
    /// Internal node over two or more children.
    Group { op: LogicalOp, children: Vec<Expr> },
}

impl Expr {
    /// Builds a group, collapsing a single child to itself.
    pub fn group(op: LogicalOp, mut children: Vec<Expr>) -> Expr {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Expr::Group { op, children }
    }

    pub fn and(children: Vec<Expr>) -> Expr {
        Expr::group(LogicalOp::And, children)
    }

    pub fn or(children: Vec<Expr>) -> Expr {
        Expr::group(LogicalOp::Or, children)
    }

    /// Returns the leaf condition, if this node is one.
    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Expr::Condition(c) => Some(c),
            Expr::Group { .. } => None,
        }
    }

    /// Number of leaf conditions anywhere under this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expr::Condition(_) => 1,
            Expr::Group { children, .. } => children.iter().map(Expr::leaf_count).sum(),
        }
    }

    /// All leaf conditions in left-to-right order.
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Expr::Condition(c) => out.push(c),
            Expr::Group { children, .. } => {
                for child in children {
                    child.collect_conditions(out);
                }
            }
        }
    }
}

impl From<Condition> for Expr {
    fn from(c: Condition) -> Self {
        Expr::Condition(c)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Condition(c) => write!(f, "{c}"),
            Expr::Group { op, children } => {
                let sep = match op {
                    LogicalOp::And => " AND ",
                    LogicalOp::Or => " OR ",
                };
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sep)?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_is_exclusive() {
        let c = Condition::term("x").required().excluded();
        assert!(c.is_excluded());
        assert!(!c.is_required());
    }

    #[test]
    fn single_child_group_collapses() {
        let e = Expr::and(vec![Condition::term("a").into()]);
        assert_eq!(e, Expr::Condition(Condition::term("a")));
    }

    #[test]
    fn leaf_count_walks_nested_groups() {
        let e = Expr::or(vec![
            Condition::term("a").into(),
            Expr::and(vec![
                Condition::term("b").into(),
                Condition::term("c").excluded().into(),
            ]),
        ]);
        assert_eq!(e.leaf_count(), 3);
        let values: Vec<&str> = e.conditions().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["a", "b", "c"]);
    }

    #[test]
    fn display_round_trips_shape() {
        let e = Expr::or(vec![
            Condition::term("urgent").into(),
            Expr::and(vec![
                Condition::phrase("high risk").required().into(),
                Condition::term("draft").excluded().into(),
            ]),
        ]);
        assert_eq!(e.to_string(), r#"(urgent OR (+"high risk" AND -draft))"#);
    }

    #[test]
    fn serializes_with_flags() {
        let json = serde_json::to_value(Expr::from(Condition::term("draft").excluded())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "condition",
                "value": "draft",
                "isQuoted": false,
                "isRequired": false,
                "isExcluded": true
            })
        );
    }
}
