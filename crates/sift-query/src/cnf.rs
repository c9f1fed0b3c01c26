//! Conjunctive Normal Form conversion.
//!
//! A [`ClauseList`] is an AND of clauses; each [`Clause`] is an OR of
//! conditions. AND nodes concatenate their children's clause lists; OR
//! nodes take the cross product, left to right. Output order is stable.
//!
//! The cross product is exponential in the depth of alternating AND/OR
//! nesting. [`to_cnf_bounded`] aborts as soon as the clause count would
//! pass a ceiling, before the product is materialized.

use crate::expr::{Condition, Expr};
use crate::guard::GuardRejection;
use crate::op::LogicalOp;

/// One OR-clause.
pub type Clause = Vec<Condition>;

/// AND of OR-clauses.
pub type ClauseList = Vec<Clause>;

/// Converts an expression tree to CNF without any size limit.
pub fn to_cnf(expr: &Expr) -> ClauseList {
    match expr {
        Expr::Condition(c) => vec![vec![c.clone()]],
        Expr::Group {
            op: LogicalOp::And,
            children,
        } => children.iter().flat_map(to_cnf).collect(),
        Expr::Group {
            op: LogicalOp::Or,
            children,
        } => {
            let mut lists = children.iter().map(to_cnf);
            match lists.next() {
                Some(first) => lists.fold(first, |acc, next| distribute(&acc, &next)),
                // Empty disjunction is false
                None => vec![Vec::new()],
            }
        }
    }
}

/// Converts an expression tree to CNF, failing once more than
/// `max_clauses` clauses would be produced at any step.
pub fn to_cnf_bounded(expr: &Expr, max_clauses: usize) -> Result<ClauseList, GuardRejection> {
    let clauses = match expr {
        Expr::Condition(c) => vec![vec![c.clone()]],
        Expr::Group {
            op: LogicalOp::And,
            children,
        } => {
            let mut out = ClauseList::new();
            for child in children {
                out.extend(to_cnf_bounded(child, max_clauses)?);
                check_clause_count(out.len(), max_clauses)?;
            }
            out
        }
        Expr::Group {
            op: LogicalOp::Or,
            children,
        } => {
            let mut acc: Option<ClauseList> = None;
            for child in children {
                let next = to_cnf_bounded(child, max_clauses)?;
                acc = Some(match acc {
                    None => next,
                    Some(prev) => {
                        let product = prev.len().saturating_mul(next.len());
                        check_clause_count(product, max_clauses)?;
                        distribute(&prev, &next)
                    }
                });
            }
            acc.unwrap_or_else(|| vec![Vec::new()])
        }
    };
    check_clause_count(clauses.len(), max_clauses)?;
    Ok(clauses)
}

fn check_clause_count(count: usize, max: usize) -> Result<(), GuardRejection> {
    if count > max {
        Err(GuardRejection::TooManyClauses { count, max })
    } else {
        Ok(())
    }
}

/// Distributes OR over two clause lists: `{ a ∪ b : a ∈ A, b ∈ B }`.
///
/// Each output clause is a clause of `a` followed by a clause of `b`;
/// iteration is `a`-major.
pub fn distribute(a: &[Clause], b: &[Clause]) -> ClauseList {
    a.iter()
        .flat_map(|left| {
            b.iter()
                .map(move |right| left.iter().chain(right).cloned().collect())
        })
        .collect()
}
