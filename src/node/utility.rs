//! Leaf nodes: utility functions over state variables.

use super::objective::{satisfaction, Objective};
use super::operator::Operator;
use super::types::{holds, EvalOptions, GoalNode, SatisfactionQuery};
use crate::error::{GoalError, GoalResult};
use crate::history::History;
use crate::value::{strip_quotes, Value, Values};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One operand of a utility function.
///
/// Whether an operand is a literal or a reference to a state variable is
/// decided once, when the function is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A constant value.
    Literal(Value),
    /// The name of an entry in the evaluation [`Values`].
    Parameter(String),
}

impl Operand {
    /// A constant operand.
    pub fn literal(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }

    /// A reference to the state variable `name`.
    pub fn parameter(name: impl Into<String>) -> Self {
        Operand::Parameter(name.into())
    }

    /// Classifies raw operand text: quoted text is a string literal (quotes
    /// removed), anything else names a parameter.
    ///
    /// ```
    /// use u_kaos::node::Operand;
    ///
    /// assert_eq!(Operand::parse("'normal'"), Operand::literal("normal"));
    /// assert_eq!(Operand::parse("mode"), Operand::parameter("mode"));
    /// ```
    pub fn parse(raw: &str) -> Self {
        match strip_quotes(raw) {
            Some(inner) => Operand::Literal(Value::Text(inner.to_string())),
            None => Operand::Parameter(raw.to_string()),
        }
    }

    /// The parameter name, if this operand is a reference.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Operand::Parameter(name) => Some(name),
            Operand::Literal(_) => None,
        }
    }

    fn resolve(&self, values: &Values) -> GoalResult<Value> {
        match self {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Parameter(name) => values
                .get(name)
                .cloned()
                .map(Value::unquoted)
                .ok_or_else(|| GoalError::MissingParameters(vec![name.clone()])),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(Value::Text(s)) => write!(f, "\"{s}\""),
            Operand::Literal(value) => write!(f, "{value}"),
            Operand::Parameter(name) => f.write_str(name),
        }
    }
}

/// A leaf comparing or fuzzy-classifying operands drawn from the state.
///
/// # Examples
///
/// ```
/// use u_kaos::node::{EvalOptions, GoalNode, Operand, Operator, UtilityFunction};
/// use u_kaos::value::{Value, Values};
///
/// let mut f = UtilityFunction::new(
///     Operator::Greater,
///     vec![Operand::parameter("power_level"), Operand::literal(0.3)],
/// )
/// .unwrap()
/// .with_key("enough_power");
///
/// let values: Values = [("power_level".to_string(), Value::from(0.28))].into();
/// let degree = f.evaluate(&values, &EvalOptions::default().with_step(0)).unwrap();
/// assert_eq!(degree, 0.0);
/// assert_eq!(f.history().get(0), Some(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct UtilityFunction {
    key: Option<String>,
    operator: Operator,
    objective: Option<Objective>,
    operands: Vec<Operand>,
    history: History,
}

impl UtilityFunction {
    /// Creates a function, checking the operand count against the
    /// operator's arity.
    pub fn new(operator: Operator, operands: Vec<Operand>) -> GoalResult<Self> {
        check_arity(operator, operands.len())?;
        Ok(Self {
            key: None,
            operator,
            objective: None,
            operands,
            history: History::new(),
        })
    }

    /// Creates a function from an operator name.
    pub fn from_type_name(type_name: &str, operands: Vec<Operand>) -> GoalResult<Self> {
        Self::new(type_name.parse()?, operands)
    }

    /// Sets the identifier.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the satisfaction-over-time objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = Some(objective);
        self
    }

    /// The operator applied on evaluation.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The objective, or `None` for instant satisfaction.
    pub fn objective(&self) -> Option<Objective> {
        self.objective
    }

    /// Operands in positional order.
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }
}

fn check_arity(operator: Operator, got: usize) -> GoalResult<()> {
    if got != operator.arity() {
        return Err(GoalError::ArityMismatch {
            operator: operator.name(),
            expected: operator.arity(),
            got,
        });
    }
    Ok(())
}

impl GoalNode for UtilityFunction {
    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn history(&self) -> &History {
        &self.history
    }

    /// Short-circuiting and the threshold do not apply at the leaves.
    fn evaluate(&mut self, values: &Values, options: &EvalOptions) -> GoalResult<f64> {
        check_arity(self.operator, self.operands.len())?;
        let args = self
            .operands
            .iter()
            .map(|operand| operand.resolve(values))
            .collect::<GoalResult<Vec<_>>>()?;
        let result = self.operator.apply(&args)?;
        if let Some(step) = options.step {
            self.history.record(step, result);
        }
        Ok(result)
    }

    /// A function that was never evaluated is unsatisfied whatever its
    /// objective.
    fn is_satisfied(&self, query: &SatisfactionQuery) -> GoalResult<f64> {
        if self.history.is_empty() {
            return Ok(0.0);
        }
        let degrees = self.history.window(query.start, query.end);
        Ok(satisfaction(self.objective, &degrees, query.threshold))
    }

    fn get_violated(&self, query: &SatisfactionQuery) -> GoalResult<BTreeSet<String>> {
        let mut violated = BTreeSet::new();
        if let Some(key) = &self.key {
            if !holds(self.is_satisfied(query)?) {
                violated.insert(key.clone());
            }
        }
        Ok(violated)
    }

    fn collect_utility_functions<'a>(&'a self, out: &mut BTreeMap<String, &'a UtilityFunction>) {
        if let Some(key) = &self.key {
            out.entry(key.clone()).or_insert(self);
        }
    }

    fn collect_parameters(&self, out: &mut BTreeSet<String>) {
        out.extend(
            self.operands
                .iter()
                .filter_map(Operand::parameter_name)
                .map(str::to_string),
        );
    }
}

/// Compact form is the key; the alternate form (`{:#}`) spells out the
/// call, e.g. `greater(power_level, 0.3)`.
impl fmt::Display for UtilityFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}(", self.operator)?;
            for (i, operand) in self.operands.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{operand}")?;
            }
            f.write_str(")")
        } else {
            f.write_str(self.key.as_deref().unwrap_or(""))
        }
    }
}
