//! N-ary connectives: conjunction (min) and disjunction (max).

use super::tree::{write_children, Node};
use super::types::{holds, EvalOptions, GoalNode, SatisfactionQuery};
use super::utility::UtilityFunction;
use crate::error::GoalResult;
use crate::fuzzy::{fuzzy_and, fuzzy_or};
use crate::history::History;
use crate::value::Values;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    And,
    Or,
}

impl Junction {
    /// Fold seed. An empty junction of either kind is vacuously true.
    fn seed(self, children: usize) -> f64 {
        match self {
            Junction::And => 1.0,
            Junction::Or if children == 0 => 1.0,
            Junction::Or => 0.0,
        }
    }

    fn combine(self, acc: f64, degree: f64) -> f64 {
        match self {
            Junction::And => fuzzy_and(acc, degree),
            Junction::Or => fuzzy_or(acc, degree),
        }
    }

    /// Whether the running result can no longer cross the threshold.
    fn settled(self, acc: f64, threshold: f64) -> bool {
        match self {
            Junction::And => acc < threshold,
            Junction::Or => acc >= threshold,
        }
    }

    /// Folds `visit(0..children)` left to right, stopping early when
    /// short-circuiting is allowed and the result is settled.
    fn fold<F>(self, children: usize, shortcircuit: bool, threshold: f64, mut visit: F) -> GoalResult<f64>
    where
        F: FnMut(usize) -> GoalResult<f64>,
    {
        let mut acc = self.seed(children);
        for i in 0..children {
            acc = self.combine(acc, visit(i)?);
            if shortcircuit && self.settled(acc, threshold) {
                trace!(junction = ?self, visited = i + 1, children, "short-circuit");
                break;
            }
        }
        Ok(acc)
    }
}

macro_rules! junction_node {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $compact:literal, $infix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            key: Option<String>,
            children: Vec<Node>,
            history: History,
        }

        impl $name {
            /// Creates an anonymous node over `children`.
            pub fn new(children: Vec<Node>) -> Self {
                Self {
                    key: None,
                    children,
                    history: History::new(),
                }
            }

            /// Sets the identifier.
            pub fn with_key(mut self, key: impl Into<String>) -> Self {
                self.key = Some(key.into());
                self
            }

            /// Appends a child.
            pub fn push(&mut self, child: impl Into<Node>) {
                self.children.push(child.into());
            }

            /// Children in evaluation order.
            pub fn children(&self) -> &[Node] {
                &self.children
            }
        }

        impl GoalNode for $name {
            fn key(&self) -> Option<&str> {
                self.key.as_deref()
            }

            fn history(&self) -> &History {
                &self.history
            }

            fn evaluate(&mut self, values: &Values, options: &EvalOptions) -> GoalResult<f64> {
                let children = &mut self.children;
                let result = $kind.fold(
                    children.len(),
                    options.shortcircuit,
                    options.threshold,
                    |i| children[i].evaluate(values, options),
                )?;
                if let Some(step) = options.step {
                    self.history.record(step, result);
                }
                Ok(result)
            }

            fn is_satisfied(&self, query: &SatisfactionQuery) -> GoalResult<f64> {
                $kind.fold(
                    self.children.len(),
                    query.shortcircuit,
                    query.threshold,
                    |i| self.children[i].is_satisfied(query),
                )
            }

            /// Reports this node's own key when unsatisfied, plus every
            /// violation found below it regardless of its own status.
            fn get_violated(&self, query: &SatisfactionQuery) -> GoalResult<BTreeSet<String>> {
                let mut violated = BTreeSet::new();
                if let Some(key) = &self.key {
                    if !holds(self.is_satisfied(query)?) {
                        violated.insert(key.clone());
                    }
                }
                for child in &self.children {
                    violated.extend(child.get_violated(query)?);
                }
                Ok(violated)
            }

            fn collect_utility_functions<'a>(
                &'a self,
                out: &mut BTreeMap<String, &'a UtilityFunction>,
            ) {
                for child in &self.children {
                    child.collect_utility_functions(out);
                }
            }

            fn collect_parameters(&self, out: &mut BTreeSet<String>) {
                for child in &self.children {
                    child.collect_parameters(out);
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if f.alternate() {
                    f.write_str("(")?;
                    write_children(f, &self.children, $infix)?;
                    f.write_str(")")
                } else {
                    f.write_str(concat!("(", $compact, " "))?;
                    write_children(f, &self.children, " ")?;
                    f.write_str(")")
                }
            }
        }
    };
}

junction_node!(
    /// Fuzzy AND over any number of children: the minimum degree.
    ///
    /// With short-circuiting, folding stops as soon as the running minimum
    /// drops below the threshold; later children are neither evaluated nor
    /// recorded.
    Conjunction,
    Junction::And,
    "AND",
    " AND "
);

junction_node!(
    /// Fuzzy OR over any number of children: the maximum degree.
    ///
    /// With short-circuiting, folding stops as soon as the running maximum
    /// reaches the threshold.
    Disjunction,
    Junction::Or,
    "OR",
    " OR "
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Objective, Operand, Operator};
    use crate::value::Value;
    use proptest::prelude::*;

    fn leaf(key: &str, param: &str) -> Node {
        UtilityFunction::new(
            Operator::FuzzyLeft,
            vec![
                Operand::parameter(param),
                Operand::literal(1.0),
                Operand::literal(1.0),
            ],
        )
        .unwrap()
        .with_key(key)
        .into()
    }

    fn degrees(ds: &[f64]) -> Values {
        ds.iter()
            .enumerate()
            .map(|(i, d)| (format!("p{i}"), Value::from(*d)))
            .collect()
    }

    fn leaves(n: usize) -> Vec<Node> {
        (0..n).map(|i| leaf(&format!("f{i}"), &format!("p{i}"))).collect()
    }

    #[test]
    fn test_conjunction_is_minimum() {
        let mut and = Conjunction::new(leaves(3));
        let r = and
            .evaluate(&degrees(&[0.9, 0.4, 0.7]), &EvalOptions::default())
            .unwrap();
        assert!((r - 0.4).abs() < 1e-10);
    }

    #[test]
    fn test_disjunction_is_maximum() {
        let mut or = Disjunction::new(leaves(3));
        let r = or
            .evaluate(&degrees(&[0.1, 0.4, 0.3]), &EvalOptions::default())
            .unwrap();
        assert!((r - 0.4).abs() < 1e-10);
    }

    #[test]
    fn test_empty_junctions_are_vacuously_true() {
        let opts = EvalOptions::default().with_step(0);
        let mut and = Conjunction::new(vec![]);
        let mut or = Disjunction::new(vec![]);
        assert_eq!(and.evaluate(&Values::new(), &opts).unwrap(), 1.0);
        assert_eq!(or.evaluate(&Values::new(), &opts).unwrap(), 1.0);
        let q = SatisfactionQuery::default();
        assert_eq!(and.is_satisfied(&q).unwrap(), 1.0);
        assert_eq!(or.is_satisfied(&q).unwrap(), 1.0);
    }

    #[test]
    fn test_shortcircuit_skips_later_children() {
        let mut and = Conjunction::new(leaves(3));
        let opts = EvalOptions::default().with_step(0).with_shortcircuit(true);
        let r = and.evaluate(&degrees(&[0.9, 0.2, 0.7]), &opts).unwrap();
        assert!((r - 0.2).abs() < 1e-10);
        assert_eq!(and.history().get(0), Some(r));
        assert!(and.children()[1].history().get(0).is_some());
        assert!(and.children()[2].history().is_empty());
    }

    #[test]
    fn test_disjunction_shortcircuit_on_reaching_threshold() {
        let mut or = Disjunction::new(leaves(2));
        let opts = EvalOptions::default().with_step(0).with_shortcircuit(true);
        let r = or.evaluate(&degrees(&[0.5, 0.9]), &opts).unwrap();
        assert!((r - 0.5).abs() < 1e-10);
        assert!(or.children()[1].history().is_empty());
    }

    #[test]
    fn test_violations_include_own_key_and_children() {
        let mut and = Conjunction::new(leaves(2)).with_key("G1");
        and.evaluate(&degrees(&[1.0, 0.0]), &EvalOptions::default().with_step(0))
            .unwrap();
        let violated = and.get_violated(&SatisfactionQuery::default()).unwrap();
        assert_eq!(
            violated.into_iter().collect::<Vec<_>>(),
            vec!["G1".to_string(), "f1".to_string()]
        );
    }

    #[test]
    fn test_satisfied_junction_still_reports_children() {
        let mut or = Disjunction::new(leaves(2)).with_key("G2");
        or.evaluate(&degrees(&[1.0, 0.0]), &EvalOptions::default().with_step(0))
            .unwrap();
        let violated = or.get_violated(&SatisfactionQuery::default()).unwrap();
        assert!(!violated.contains("G2"));
        assert!(violated.contains("f1"));
    }

    #[test]
    fn test_is_satisfied_folds_child_verdicts() {
        let mut achieve = UtilityFunction::new(
            Operator::FuzzyLeft,
            vec![
                Operand::parameter("p0"),
                Operand::literal(1.0),
                Operand::literal(1.0),
            ],
        )
        .unwrap()
        .with_objective(Objective::Achieve);
        let mut and = Conjunction::new(vec![]);
        for (step, d) in [0.1, 0.6, 0.2].into_iter().enumerate() {
            achieve
                .evaluate(&degrees(&[d]), &EvalOptions::default().with_step(step as u64))
                .unwrap();
        }
        and.push(achieve);
        assert_eq!(and.is_satisfied(&SatisfactionQuery::default()).unwrap(), 1.0);
    }

    #[test]
    fn test_display() {
        let and = Conjunction::new(vec![leaf("a", "p0"), leaf("b", "p1")]);
        assert_eq!(and.to_string(), "(AND a b)");
        assert_eq!(
            format!("{and:#}"),
            "(fuzzy_left(p0, 1, 1) AND fuzzy_left(p1, 1, 1))"
        );
    }

    proptest! {
        #[test]
        fn prop_shortcircuit_preserves_recorded_result(
            ds in proptest::collection::vec(0.0f64..=1.0, 0..8),
            threshold in 0.05f64..0.95,
        ) {
            let vals = degrees(&ds);
            let full = EvalOptions::default().with_step(0).with_threshold(threshold);
            let short = full.with_shortcircuit(true);

            let mut and_full = Conjunction::new(leaves(ds.len()));
            let mut and_short = Conjunction::new(leaves(ds.len()));
            let a = and_full.evaluate(&vals, &full).unwrap();
            let b = and_short.evaluate(&vals, &short).unwrap();
            prop_assert_eq!(a >= threshold, b >= threshold);
            prop_assert_eq!(and_full.history().len(), and_short.history().len());

            let mut or_full = Disjunction::new(leaves(ds.len()));
            let mut or_short = Disjunction::new(leaves(ds.len()));
            let a = or_full.evaluate(&vals, &full).unwrap();
            let b = or_short.evaluate(&vals, &short).unwrap();
            prop_assert_eq!(a >= threshold, b >= threshold);
        }
    }
}
