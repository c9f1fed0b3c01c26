//! Maps a CNF clause list to the smallest set of output predicates.
//!
//! Policy:
//!
//! - every single-condition clause is merged into one `And` predicate,
//!   emitted first
//! - every multi-condition clause becomes its own predicate, in order:
//!   an equality list when all members are eligible, else an `Or`
//!   predicate of `Contains`/`DoesNotContain` conditions
//!
//! A member is eligible for an equality list when it is neither required
//! nor excluded and is either a quoted phrase or a numeric literal.

use crate::cnf::Clause;
use crate::error::{Result, SiftError};
use crate::expr::Condition;
use crate::op::LogicalOp;
use crate::predicate::{FilterSet, Predicate, PredicateCondition};
use crate::target::TargetRef;
use crate::value::{is_numeric_literal, FilterValue, Number};

/// Compiles clauses into predicates against `target`.
///
/// Fails with [`SiftError::CompileInvariant`] if the list or any clause in
/// it is empty; an empty clause has no faithful predicate encoding.
pub fn compile(clauses: &[Clause], target: &TargetRef) -> Result<FilterSet> {
    if clauses.is_empty() {
        return Err(SiftError::CompileInvariant(
            "no clauses to compile".to_string(),
        ));
    }
    if let Some(index) = clauses.iter().position(Vec::is_empty) {
        return Err(SiftError::CompileInvariant(format!(
            "clause {index} is empty"
        )));
    }

    let (singles, multis): (Vec<&Clause>, Vec<&Clause>) =
        clauses.iter().partition(|clause| clause.len() == 1);

    let mut predicates = Vec::with_capacity(multis.len() + 1);
    if !singles.is_empty() {
        let conditions = singles
            .iter()
            .flat_map(|clause| clause.iter())
            .map(PredicateCondition::from)
            .collect();
        predicates.push(Predicate::boolean(target, LogicalOp::And, conditions));
    }
    for clause in multis {
        predicates.push(compile_disjunction(clause, target));
    }

    tracing::trace!(
        singles = singles.len(),
        predicates = predicates.len(),
        "compiled clause list"
    );
    Ok(FilterSet::from_vec(predicates))
}

fn compile_disjunction(clause: &[Condition], target: &TargetRef) -> Predicate {
    if clause.iter().all(is_equality_eligible) {
        let values = clause.iter().map(literal_value).collect();
        return Predicate::equality(target, values);
    }
    let conditions = clause.iter().map(PredicateCondition::from).collect();
    Predicate::boolean(target, LogicalOp::Or, conditions)
}

/// Whether `c` may appear in an equality-list predicate.
pub fn is_equality_eligible(c: &Condition) -> bool {
    !c.is_excluded() && !c.is_required() && (c.is_quoted() || is_numeric_literal(&c.value))
}

/// Quoted phrases stay strings; unquoted numeric literals become numbers.
fn literal_value(c: &Condition) -> FilterValue {
    if c.is_quoted() {
        return FilterValue::Text(c.value.clone());
    }
    match Number::parse(&c.value) {
        Some(n) => FilterValue::Number(n),
        None => FilterValue::Text(c.value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::ConditionOp;
    use crate::predicate::{BooleanPredicate, EqualityPredicate};

    fn target() -> TargetRef {
        TargetRef::new("Tickets", "Priority")
    }

    fn t(v: &str) -> Condition {
        Condition::term(v)
    }

    fn boolean(p: &Predicate) -> &BooleanPredicate {
        p.as_boolean().expect("boolean predicate")
    }

    fn equality(p: &Predicate) -> &EqualityPredicate {
        p.as_equality().expect("equality predicate")
    }

    #[test]
    fn singletons_merge_into_one_and() {
        let set = compile(&[vec![t("a")], vec![t("b").excluded()]], &target()).unwrap();
        let FilterSet::Single(p) = set else {
            panic!("expected a single predicate");
        };
        let p = boolean(&p);
        assert_eq!(p.logical_operator, LogicalOp::And);
        assert_eq!(
            p.conditions,
            vec![
                PredicateCondition {
                    operator: ConditionOp::Contains,
                    value: "a".into()
                },
                PredicateCondition {
                    operator: ConditionOp::DoesNotContain,
                    value: "b".into()
                },
            ]
        );
    }

    #[test]
    fn lone_singleton_is_an_and_of_one() {
        let set = compile(&[vec![t("urgent")]], &target()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(
            boolean(&set.predicates()[0]).logical_operator,
            LogicalOp::And
        );
    }

    #[test]
    fn mixed_emits_merge_then_clauses() {
        let clauses = vec![
            vec![t("urgent"), t("high")],
            vec![t("critical")],
            vec![t("1"), t("2")],
            vec![t("open")],
        ];
        let set = compile(&clauses, &target()).unwrap();
        let ps = set.predicates();
        assert_eq!(ps.len(), 3);

        let merged = boolean(&ps[0]);
        assert_eq!(merged.logical_operator, LogicalOp::And);
        let values: Vec<&str> = merged.conditions.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["critical", "open"]);

        let words = boolean(&ps[1]);
        assert_eq!(words.logical_operator, LogicalOp::Or);
        assert_eq!(words.conditions.len(), 2);

        assert_eq!(
            equality(&ps[2]).values,
            vec![FilterValue::from(1i64), FilterValue::from(2i64)]
        );
    }

    #[test]
    fn only_multis_emit_one_per_clause() {
        let clauses = vec![vec![t("a"), t("b")], vec![t("c"), t("d")]];
        let set = compile(&clauses, &target()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set
            .predicates()
            .iter()
            .all(|p| boolean(p).logical_operator == LogicalOp::Or));
    }

    #[test]
    fn numeric_clause_becomes_equality_list() {
        let set = compile(&[vec![t("1"), t("2")]], &target()).unwrap();
        let p = equality(&set.predicates()[0]);
        assert_eq!(p.values, vec![FilterValue::from(1i64), FilterValue::from(2i64)]);
    }

    #[test]
    fn quoted_member_stays_a_string() {
        let set = compile(&[vec![Condition::phrase("1"), t("2")]], &target()).unwrap();
        let p = equality(&set.predicates()[0]);
        assert_eq!(p.values, vec![FilterValue::from("1"), FilterValue::from(2i64)]);
    }

    #[test]
    fn quoted_phrases_form_equality_list() {
        let clause = vec![Condition::phrase("on hold"), Condition::phrase("waiting")];
        let set = compile(&[clause], &target()).unwrap();
        assert_eq!(
            equality(&set.predicates()[0]).values,
            vec![FilterValue::from("on hold"), FilterValue::from("waiting")]
        );
    }

    #[test]
    fn decimal_literals_become_floats() {
        let set = compile(&[vec![t("1.5"), t("-2")]], &target()).unwrap();
        assert_eq!(
            equality(&set.predicates()[0]).values,
            vec![FilterValue::from(1.5f64), FilterValue::from(-2i64)]
        );
    }

    #[test]
    fn bare_word_blocks_equality_list() {
        let set = compile(&[vec![t("1"), t("two")]], &target()).unwrap();
        assert_eq!(
            boolean(&set.predicates()[0]).logical_operator,
            LogicalOp::Or
        );
    }

    #[test]
    fn non_ascii_digit_words_stay_contains() {
        let set = compile(&[vec![t("١٢"), t("３")]], &target()).unwrap();
        let p = boolean(&set.predicates()[0]);
        assert_eq!(p.logical_operator, LogicalOp::Or);
        assert!(p.conditions.iter().all(|c| c.operator == ConditionOp::Contains));
    }

    #[test]
    fn modifiers_block_equality_list() {
        let required = compile(&[vec![t("1").required(), t("2")]], &target()).unwrap();
        assert!(required.predicates()[0].as_boolean().is_some());

        let excluded = compile(&[vec![t("1"), t("2").excluded()]], &target()).unwrap();
        let p = boolean(&excluded.predicates()[0]);
        assert_eq!(p.conditions[1].operator, ConditionOp::DoesNotContain);
    }

    #[test]
    fn empty_clause_fails_loudly() {
        let err = compile(&[vec![t("a")], vec![]], &target()).unwrap_err();
        assert!(matches!(err, SiftError::CompileInvariant(msg) if msg.contains("clause 1")));
    }

    #[test]
    fn empty_clause_list_fails_loudly() {
        assert!(matches!(
            compile(&[], &target()),
            Err(SiftError::CompileInvariant(_))
        ));
    }

    #[test]
    fn every_predicate_carries_target() {
        let clauses = vec![vec![t("a"), t("b")], vec![t("c")]];
        let set = compile(&clauses, &target()).unwrap();
        assert!(set.predicates().iter().all(|p| p.target() == &target()));
    }
}
