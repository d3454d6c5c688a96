//! The closed set of node kinds a goal tree is made of.

use super::conditional::{Biconditional, Conditional};
use super::junction::{Conjunction, Disjunction};
use super::types::{EvalOptions, GoalNode, SatisfactionQuery};
use super::utility::UtilityFunction;
use crate::error::GoalResult;
use crate::history::History;
use crate::value::Values;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A node of a goal tree.
#[derive(Debug, Clone)]
pub enum Node {
    Conjunction(Conjunction),
    Disjunction(Disjunction),
    Conditional(Conditional),
    Biconditional(Biconditional),
    /// A utility function leaf.
    Function(UtilityFunction),
}

macro_rules! dispatch {
    ($node:expr, $n:ident => $body:expr) => {
        match $node {
            Node::Conjunction($n) => $body,
            Node::Disjunction($n) => $body,
            Node::Conditional($n) => $body,
            Node::Biconditional($n) => $body,
            Node::Function($n) => $body,
        }
    };
}

impl Node {
    /// Element tag naming this kind of node.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Conjunction(_) => "conjunction",
            Node::Disjunction(_) => "disjunction",
            Node::Conditional(_) => "conditional",
            Node::Biconditional(_) => "biconditional",
            Node::Function(_) => "function",
        }
    }

    /// Direct children; empty for utility functions.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Conjunction(n) => n.children(),
            Node::Disjunction(n) => n.children(),
            Node::Conditional(n) => n.children(),
            Node::Biconditional(n) => n.children(),
            Node::Function(_) => &[],
        }
    }

    /// The utility function, if this is a leaf.
    pub fn as_function(&self) -> Option<&UtilityFunction> {
        match self {
            Node::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The conditional, if this is one.
    pub fn as_conditional(&self) -> Option<&Conditional> {
        match self {
            Node::Conditional(c) => Some(c),
            _ => None,
        }
    }
}

impl GoalNode for Node {
    fn key(&self) -> Option<&str> {
        dispatch!(self, n => n.key())
    }

    fn history(&self) -> &History {
        dispatch!(self, n => n.history())
    }

    fn evaluate(&mut self, values: &Values, options: &EvalOptions) -> GoalResult<f64> {
        dispatch!(self, n => n.evaluate(values, options))
    }

    fn is_satisfied(&self, query: &SatisfactionQuery) -> GoalResult<f64> {
        dispatch!(self, n => n.is_satisfied(query))
    }

    fn get_violated(&self, query: &SatisfactionQuery) -> GoalResult<BTreeSet<String>> {
        dispatch!(self, n => n.get_violated(query))
    }

    fn collect_utility_functions<'a>(&'a self, out: &mut BTreeMap<String, &'a UtilityFunction>) {
        dispatch!(self, n => n.collect_utility_functions(out))
    }

    fn collect_parameters(&self, out: &mut BTreeSet<String>) {
        dispatch!(self, n => n.collect_parameters(out))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, n => fmt::Display::fmt(n, f))
    }
}

/// Writes `children` separated by `sep`, keeping the caller's alternate flag.
pub(crate) fn write_children(
    f: &mut fmt::Formatter<'_>,
    children: &[Node],
    sep: &str,
) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        if f.alternate() {
            write!(f, "{child:#}")?;
        } else {
            write!(f, "{child}")?;
        }
    }
    Ok(())
}

impl From<Conjunction> for Node {
    fn from(n: Conjunction) -> Self {
        Node::Conjunction(n)
    }
}

impl From<Disjunction> for Node {
    fn from(n: Disjunction) -> Self {
        Node::Disjunction(n)
    }
}

impl From<Conditional> for Node {
    fn from(n: Conditional) -> Self {
        Node::Conditional(n)
    }
}

impl From<Biconditional> for Node {
    fn from(n: Biconditional) -> Self {
        Node::Biconditional(n)
    }
}

impl From<UtilityFunction> for Node {
    fn from(f: UtilityFunction) -> Self {
        Node::Function(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Operand, Operator};
    use crate::value::Value;

    fn greater(key: &str, param: &str, bound: f64) -> Node {
        UtilityFunction::new(
            Operator::Greater,
            vec![Operand::parameter(param), Operand::literal(bound)],
        )
        .unwrap()
        .with_key(key)
        .into()
    }

    fn nested() -> Node {
        let inner = Disjunction::new(vec![greater("fast", "speed", 1.0), greater("dup", "x", 0.0)]);
        Conjunction::new(vec![
            greater("dup", "power_level", 0.3),
            inner.into(),
            Conditional::new(greater("c1", "x", 0.0), greater("c2", "y", 0.0)).into(),
        ])
        .with_key("root")
        .into()
    }

    #[test]
    fn test_kind_and_children() {
        let node = nested();
        assert_eq!(node.kind(), "conjunction");
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.children()[0].kind(), "function");
        assert!(node.children()[0].children().is_empty());
        assert!(node.children()[2].as_conditional().is_some());
        assert!(node.children()[0].as_function().is_some());
    }

    #[test]
    fn test_first_keyed_function_wins() {
        let node = nested();
        let mut funcs = BTreeMap::new();
        node.collect_utility_functions(&mut funcs);
        assert_eq!(
            funcs.keys().cloned().collect::<Vec<_>>(),
            vec!["c1", "c2", "dup", "fast"]
        );
        assert_eq!(
            funcs["dup"].operands()[0],
            Operand::parameter("power_level")
        );
    }

    #[test]
    fn test_parameters() {
        let mut params = BTreeSet::new();
        nested().collect_parameters(&mut params);
        assert_eq!(
            params.into_iter().collect::<Vec<_>>(),
            vec!["power_level", "speed", "x", "y"]
        );
    }

    #[test]
    fn test_dispatch_records_history() {
        let mut node = nested();
        let values: Values = [
            ("power_level", 0.5),
            ("speed", 2.0),
            ("x", 1.0),
            ("y", 1.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::from(v)))
        .collect();
        let r = node
            .evaluate(&values, &EvalOptions::default().with_step(0))
            .unwrap();
        assert_eq!(r, 1.0);
        assert_eq!(node.history().get(0), Some(1.0));
        assert_eq!(node.key(), Some("root"));
    }

    #[test]
    fn test_display_nested() {
        let node = nested();
        assert_eq!(node.to_string(), "(AND dup (OR fast dup) (IF c1 c2))");
    }
}
