//! Binary connectives: conditional ("if pre then post") and biconditional.
//!
//! Both take one or two children. A single child stands for a bare
//! antecedent whose degree passes through unchanged.

use super::tree::{write_children, Node};
use super::types::{holds, EvalOptions, GoalNode, SatisfactionQuery};
use super::utility::UtilityFunction;
use crate::error::{GoalError, GoalResult};
use crate::fuzzy::{fuzzy_equiv, fuzzy_not};
use crate::history::History;
use crate::value::Values;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

fn check_arity(kind: &'static str, children: &[Node]) -> GoalResult<()> {
    match children.len() {
        1 | 2 => Ok(()),
        n => Err(GoalError::MalformedExpression { kind, children: n }),
    }
}

/// Fuzzy conditional.
///
/// When the antecedent reaches the threshold the result is the
/// consequent's degree; otherwise the conditional holds vacuously with
/// degree `1 - antecedent`.
///
/// Without short-circuiting the consequent is evaluated (and recorded) on
/// every call. With short-circuiting it is visited only when the
/// antecedent fires.
#[derive(Debug, Clone, Default)]
pub struct Conditional {
    key: Option<String>,
    children: Vec<Node>,
    history: History,
}

impl Conditional {
    /// Creates `if pre then post`.
    pub fn new(pre: impl Into<Node>, post: impl Into<Node>) -> Self {
        Self::from_children(vec![pre.into(), post.into()])
    }

    /// Creates a conditional over raw children. The child count is checked
    /// when the node is evaluated or queried.
    pub fn from_children(children: Vec<Node>) -> Self {
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

    /// The antecedent (first child).
    pub fn pre_condition(&self) -> Option<&Node> {
        self.children.first()
    }

    /// The consequent (second child), if present.
    pub fn post_condition(&self) -> Option<&Node> {
        self.children.get(1)
    }

    /// All children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl GoalNode for Conditional {
    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn history(&self) -> &History {
        &self.history
    }

    fn evaluate(&mut self, values: &Values, options: &EvalOptions) -> GoalResult<f64> {
        check_arity("conditional", &self.children)?;
        let left = self.children[0].evaluate(values, options)?;
        let fires = left >= options.threshold;
        let result = match self.children.get_mut(1) {
            None => left,
            Some(post) if fires => post.evaluate(values, options)?,
            Some(post) => {
                if !options.shortcircuit {
                    post.evaluate(values, options)?;
                }
                fuzzy_not(left)
            }
        };
        if let Some(step) = options.step {
            self.history.record(step, result);
        }
        Ok(result)
    }

    fn is_satisfied(&self, query: &SatisfactionQuery) -> GoalResult<f64> {
        check_arity("conditional", &self.children)?;
        let left = self.children[0].is_satisfied(query)?;
        let fires = left >= query.threshold;
        Ok(match self.children.get(1) {
            None => left,
            Some(post) if fires => post.is_satisfied(query)?,
            Some(post) => {
                if !query.shortcircuit {
                    post.is_satisfied(query)?;
                }
                fuzzy_not(left)
            }
        })
    }

    /// Never reports its own key. A satisfied antecedent contributes
    /// nothing; the consequent's violations are always included.
    fn get_violated(&self, query: &SatisfactionQuery) -> GoalResult<BTreeSet<String>> {
        check_arity("conditional", &self.children)?;
        let pre = &self.children[0];
        let mut violated = BTreeSet::new();
        if !holds(pre.is_satisfied(query)?) {
            violated.extend(pre.get_violated(query)?);
        }
        if let Some(post) = self.children.get(1) {
            violated.extend(post.get_violated(query)?);
        }
        Ok(violated)
    }

    fn collect_utility_functions<'a>(&'a self, out: &mut BTreeMap<String, &'a UtilityFunction>) {
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

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let split = self.children.len().min(1);
            let (pre, post) = self.children.split_at(split);
            f.write_str("(IF ")?;
            write_children(f, pre, " ")?;
            f.write_str(" THEN ")?;
            write_children(f, post, " ")?;
            f.write_str(")")
        } else {
            f.write_str("(IF ")?;
            write_children(f, &self.children, " ")?;
            f.write_str(")")
        }
    }
}

/// Fuzzy equivalence of two children: `1 - |left - right|`.
///
/// Both children are always evaluated. Like [`Conditional`], it never
/// reports its own key as violated and passes a single child through.
#[derive(Debug, Clone, Default)]
pub struct Biconditional {
    key: Option<String>,
    children: Vec<Node>,
    history: History,
}

impl Biconditional {
    /// Creates `left iff right`.
    pub fn new(left: impl Into<Node>, right: impl Into<Node>) -> Self {
        Self::from_children(vec![left.into(), right.into()])
    }

    /// Creates a biconditional over raw children. The child count is checked
    /// when the node is evaluated or queried.
    pub fn from_children(children: Vec<Node>) -> Self {
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

    /// All children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl GoalNode for Biconditional {
    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn history(&self) -> &History {
        &self.history
    }

    fn evaluate(&mut self, values: &Values, options: &EvalOptions) -> GoalResult<f64> {
        check_arity("biconditional", &self.children)?;
        let left = self.children[0].evaluate(values, options)?;
        let result = match self.children.get_mut(1) {
            Some(right) => fuzzy_equiv(left, right.evaluate(values, options)?),
            None => left,
        };
        if let Some(step) = options.step {
            self.history.record(step, result);
        }
        Ok(result)
    }

    fn is_satisfied(&self, query: &SatisfactionQuery) -> GoalResult<f64> {
        check_arity("biconditional", &self.children)?;
        let left = self.children[0].is_satisfied(query)?;
        Ok(match self.children.get(1) {
            Some(right) => fuzzy_equiv(left, right.is_satisfied(query)?),
            None => left,
        })
    }

    fn get_violated(&self, query: &SatisfactionQuery) -> GoalResult<BTreeSet<String>> {
        check_arity("biconditional", &self.children)?;
        let mut violated = BTreeSet::new();
        for child in &self.children {
            violated.extend(child.get_violated(query)?);
        }
        Ok(violated)
    }

    fn collect_utility_functions<'a>(&'a self, out: &mut BTreeMap<String, &'a UtilityFunction>) {
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

impl fmt::Display for Biconditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("(")?;
            write_children(f, &self.children, " IFF ")?;
            f.write_str(")")
        } else {
            f.write_str("(IFF ")?;
            write_children(f, &self.children, " ")?;
            f.write_str(")")
        }
    }
}
