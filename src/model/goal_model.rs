//! The root aggregator driving evaluation steps over a forest of goals.

use super::config::ModelConfig;
use crate::error::{GoalError, GoalResult};
use crate::history::History;
use crate::node::{Conditional, EvalOptions, GoalNode, Node, SatisfactionQuery, UtilityFunction};
use crate::value::Values;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-goal results of a model-level call.
///
/// A model with one top-level goal yields [`Single`](Evaluation::Single);
/// with several, [`Multiple`](Evaluation::Multiple) in goal order.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Single(f64),
    Multiple(Vec<f64>),
}

impl Evaluation {
    fn from_results(mut results: Vec<f64>) -> Option<Self> {
        match results.len() {
            0 => None,
            1 => results.pop().map(Evaluation::Single),
            _ => Some(Evaluation::Multiple(results)),
        }
    }

    /// The degree of a single-goal model.
    pub fn as_single(&self) -> Option<f64> {
        match self {
            Evaluation::Single(d) => Some(*d),
            Evaluation::Multiple(_) => None,
        }
    }

    /// All degrees in goal order.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Evaluation::Single(d) => vec![*d],
            Evaluation::Multiple(ds) => ds.clone(),
        }
    }
}

/// A goal model: a forest of top-level goals evaluated in lock-step.
///
/// Each call to [`evaluate`](Self::evaluate) is one time step. Every node
/// visited during the call records its degree under the current step, and
/// the step counter advances by one once all goals have been evaluated.
///
/// # Examples
///
/// ```
/// use u_kaos::model::{GoalModel, ModelConfig};
/// use u_kaos::node::{Conjunction, Operand, Operator, SatisfactionQuery, UtilityFunction};
/// use u_kaos::value::{Value, Values};
///
/// let power = UtilityFunction::new(
///     Operator::Greater,
///     vec![Operand::parameter("power_level"), Operand::literal(0.3)],
/// )
/// .unwrap()
/// .with_key("power");
/// let speed = UtilityFunction::new(
///     Operator::LessOrEqual,
///     vec![Operand::parameter("speed"), Operand::literal(1.0)],
/// )
/// .unwrap()
/// .with_key("speed");
///
/// let mut model = GoalModel::new(ModelConfig::default());
/// model.push(Conjunction::new(vec![power.into(), speed.into()]).with_key("safe"));
///
/// let values: Values = [
///     ("power_level".to_string(), Value::from(0.28)),
///     ("speed".to_string(), Value::from(1.0)),
/// ]
/// .into();
/// let result = model.evaluate(&values).unwrap().unwrap();
/// assert_eq!(result.as_single(), Some(0.0));
///
/// let violated = model.get_violated(&SatisfactionQuery::default()).unwrap();
/// assert!(violated.contains("safe") && violated.contains("power"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GoalModel {
    key: Option<String>,
    children: Vec<Node>,
    step: u64,
    config: ModelConfig,
}

impl GoalModel {
    /// Creates an empty model.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            key: None,
            children: Vec::new(),
            step: 0,
            config,
        }
    }

    /// Creates an empty model after validating `config`.
    pub fn with_config(config: ModelConfig) -> GoalResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Sets the model identifier.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Appends a top-level goal.
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Model identifier.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Top-level goals.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The step the next evaluation records under.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Configuration in use.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Sorted, de-duplicated names of every free parameter referenced
    /// anywhere in the forest.
    pub fn utility_parameters(&self) -> Vec<String> {
        let mut params = BTreeSet::new();
        for child in &self.children {
            child.collect_parameters(&mut params);
        }
        params.into_iter().collect()
    }

    /// Every reachable keyed utility function. On a key collision the first
    /// function in depth-first order wins.
    pub fn utility_functions(&self) -> BTreeMap<String, &UtilityFunction> {
        let mut funcs = BTreeMap::new();
        for child in &self.children {
            child.collect_utility_functions(&mut funcs);
        }
        funcs
    }

    /// Recorded history of every keyed utility function.
    pub fn utility_history(&self) -> BTreeMap<String, &History> {
        self.utility_functions()
            .into_iter()
            .map(|(k, f)| (k, f.history()))
            .collect()
    }

    /// Most recent degree of every keyed utility function evaluated so far.
    pub fn utility(&self) -> BTreeMap<String, f64> {
        self.utility_functions()
            .into_iter()
            .filter_map(|(k, f)| f.history().latest().map(|(_, d)| (k, d)))
            .collect()
    }

    /// Value range of every keyed utility function.
    pub fn utility_specification(&self) -> BTreeMap<String, (f64, f64)> {
        self.utility_functions()
            .into_keys()
            .map(|k| (k, (0.0, 1.0)))
            .collect()
    }

    /// Conditionals attached directly below any node keyed `key`.
    ///
    /// Conditionals under a matching node are returned without descending
    /// into them; every other child is searched recursively.
    pub fn obstacles(&self, key: &str) -> Vec<&Conditional> {
        fn fetch<'a>(parent: &'a Node, key: &str, out: &mut Vec<&'a Conditional>) {
            let matched = parent.key() == Some(key);
            for child in parent.children() {
                match child.as_conditional() {
                    Some(c) if matched => out.push(c),
                    _ => fetch(child, key, out),
                }
            }
        }

        let mut out = Vec::new();
        for child in &self.children {
            fetch(child, key, &mut out);
        }
        out
    }

    /// Evaluates every goal with the configured threshold.
    pub fn evaluate(&mut self, values: &Values) -> GoalResult<Option<Evaluation>> {
        self.evaluate_with_threshold(values, self.config.threshold)
    }

    /// Evaluates every goal at the current step, then advances the step.
    ///
    /// `threshold` is clamped into [0, 1]; NaN falls back to the default.
    ///
    /// Fails with [`GoalError::MissingParameters`] before touching any
    /// history when `values` lacks a referenced parameter. When a goal fails
    /// part-way, the step is not advanced, so the next call re-records the
    /// same step.
    pub fn evaluate_with_threshold(
        &mut self,
        values: &Values,
        threshold: f64,
    ) -> GoalResult<Option<Evaluation>> {
        let missing: Vec<String> = self
            .utility_parameters()
            .into_iter()
            .filter(|name| !values.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(GoalError::MissingParameters(missing));
        }

        let options = EvalOptions::default()
            .with_shortcircuit(self.config.shortcircuit)
            .with_step(self.step)
            .with_threshold(threshold);
        debug!(step = self.step, goals = self.children.len(), "evaluating goal model");
        let results = self
            .children
            .iter_mut()
            .map(|child| child.evaluate(values, &options))
            .collect::<GoalResult<Vec<_>>>()?;
        self.step += 1;
        Ok(Evaluation::from_results(results))
    }

    /// Satisfaction of every goal over the query window.
    pub fn is_satisfied(&self, query: &SatisfactionQuery) -> GoalResult<Option<Evaluation>> {
        let results = self.map_children(|child| child.is_satisfied(query))?;
        Ok(Evaluation::from_results(results))
    }

    /// Union of the violation sets of every goal.
    pub fn get_violated(&self, query: &SatisfactionQuery) -> GoalResult<BTreeSet<String>> {
        let sets = self.map_children(|child| child.get_violated(query))?;
        let violated: BTreeSet<String> = sets.into_iter().flatten().collect();
        debug!(violated = violated.len(), "collected violations");
        Ok(violated)
    }

    #[cfg(feature = "parallel")]
    fn map_children<T, F>(&self, f: F) -> GoalResult<Vec<T>>
    where
        T: Send,
        F: Fn(&Node) -> GoalResult<T> + Sync + Send,
    {
        if self.config.parallel {
            self.children.par_iter().map(f).collect()
        } else {
            self.children.iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn map_children<T, F>(&self, f: F) -> GoalResult<Vec<T>>
    where
        F: Fn(&Node) -> GoalResult<T>,
    {
        self.children.iter().map(f).collect()
    }
}

impl fmt::Display for GoalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if f.alternate() {
                write!(f, "{child:#}")?;
            } else {
                write!(f, "{child}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Conjunction, Disjunction, Objective, Operand, Operator};
    use crate::value::Value;

    fn function(key: &str, op: Operator, operands: Vec<Operand>) -> UtilityFunction {
        UtilityFunction::new(op, operands).unwrap().with_key(key)
    }

    fn state(power_level: f64, speed: f64) -> Values {
        [
            ("power_level".to_string(), Value::from(power_level)),
            ("speed".to_string(), Value::from(speed)),
        ]
        .into()
    }

    fn rover() -> GoalModel {
        let power = function(
            "enough_power",
            Operator::Greater,
            vec![Operand::parameter("power_level"), Operand::literal(0.3)],
        );
        let speed = function(
            "safe_speed",
            Operator::LessOrEqual,
            vec![Operand::parameter("speed"), Operand::literal(1.0)],
        );
        let mut model = GoalModel::new(ModelConfig::default());
        model.push(Conjunction::new(vec![power.into(), speed.into()]).with_key("G1"));
        model
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut model = rover();
        let result = model.evaluate(&state(0.28, 1.0)).unwrap();
        assert_eq!(result, Some(Evaluation::Single(0.0)));
        assert_eq!(model.step(), 1);

        let violated = model.get_violated(&SatisfactionQuery::default()).unwrap();
        assert_eq!(
            violated.into_iter().collect::<Vec<_>>(),
            vec!["G1".to_string(), "enough_power".to_string()]
        );
        assert_eq!(model.utility()["safe_speed"], 1.0);
        assert_eq!(model.utility()["enough_power"], 0.0);
    }

    #[test]
    fn test_step_advances_once_per_call() {
        let mut model = rover();
        model.push(Disjunction::new(vec![]));
        for _ in 0..3 {
            model.evaluate(&state(0.5, 0.5)).unwrap();
        }
        assert_eq!(model.step(), 3);
        let history = model.utility_history()["enough_power"];
        assert_eq!(history.iter().map(|(s, _)| s).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_parameters() {
        let mut model = rover();
        let values: Values = [("speed".to_string(), Value::from(1.0))].into();
        assert_eq!(
            model.evaluate(&values),
            Err(GoalError::MissingParameters(vec!["power_level".into()]))
        );
        assert_eq!(model.step(), 0);
        assert!(model.utility_history()["safe_speed"].is_empty());
    }

    #[test]
    fn test_result_shape_follows_goal_count() {
        let mut empty = GoalModel::default();
        assert_eq!(empty.evaluate(&Values::new()).unwrap(), None);
        assert_eq!(empty.step(), 1);

        let mut model = rover();
        model.push(Disjunction::new(vec![]));
        let result = model.evaluate(&state(0.5, 0.5)).unwrap().unwrap();
        assert_eq!(result, Evaluation::Multiple(vec![1.0, 1.0]));
        assert_eq!(result.as_single(), None);
        assert_eq!(result.to_vec().len(), 2);
    }

    #[test]
    fn test_utility_parameters_sorted_and_unique() {
        let mut model = rover();
        model.push(function(
            "again",
            Operator::Greater,
            vec![Operand::parameter("speed"), Operand::parameter("limit")],
        ));
        model.push(function(
            "mode",
            Operator::Equal,
            vec![Operand::parameter("mode"), Operand::parse("'normal'")],
        ));
        assert_eq!(
            model.utility_parameters(),
            vec!["limit", "mode", "power_level", "speed"]
        );
    }

    #[test]
    fn test_satisfaction_over_time() {
        let mut model = GoalModel::new(ModelConfig::default());
        model.push(
            function(
                "reach",
                Operator::Greater,
                vec![Operand::parameter("x"), Operand::literal(0.5)],
            )
            .with_objective(Objective::Achieve),
        );
        for x in [0.1, 0.6, 0.2] {
            let values: Values = [("x".to_string(), Value::from(x))].into();
            model.evaluate(&values).unwrap();
        }
        let all = SatisfactionQuery::default();
        assert_eq!(model.is_satisfied(&all).unwrap(), Some(Evaluation::Single(1.0)));
        let first = SatisfactionQuery::default().with_end(1);
        assert_eq!(model.is_satisfied(&first).unwrap(), Some(Evaluation::Single(0.0)));
        assert!(model.get_violated(&first).unwrap().contains("reach"));
        assert!(model.get_violated(&all).unwrap().is_empty());
    }

    #[test]
    fn test_unevaluated_model_is_unsatisfied() {
        let model = rover();
        assert_eq!(
            model.is_satisfied(&SatisfactionQuery::default()).unwrap(),
            Some(Evaluation::Single(0.0))
        );
    }

    #[test]
    fn test_shortcircuit_config_limits_recording() {
        let mut model = rover();
        model.config = ModelConfig::default().with_shortcircuit(true);
        model.evaluate(&state(0.1, 0.5)).unwrap();
        assert_eq!(model.utility_history()["enough_power"].len(), 1);
        assert!(model.utility_history()["safe_speed"].is_empty());
        assert_eq!(model.utility().len(), 1);
    }

    #[test]
    fn test_obstacles() {
        let guard = Conditional::new(
            function(
                "low",
                Operator::Less,
                vec![Operand::parameter("power_level"), Operand::literal(0.2)],
            ),
            function("dock", Operator::Existence, vec![Operand::parameter("docked")]),
        );
        let mut model = GoalModel::new(ModelConfig::default());
        model.push(
            Conjunction::new(vec![
                guard.into(),
                Disjunction::new(vec![Conditional::from_children(vec![function(
                    "inner",
                    Operator::Existence,
                    vec![Operand::parameter("x")],
                )
                .into()])
                .into()])
                .with_key("nested")
                .into(),
            ])
            .with_key("mission"),
        );
        assert_eq!(model.obstacles("mission").len(), 1);
        assert_eq!(model.obstacles("nested").len(), 1);
        assert!(model.obstacles("unknown").is_empty());
    }

    #[test]
    fn test_utility_specification() {
        let spec = rover().utility_specification();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec["safe_speed"], (0.0, 1.0));
    }

    #[test]
    fn test_nan_threshold_uses_default() {
        let power = function(
            "enough_power",
            Operator::Greater,
            vec![Operand::parameter("power_level"), Operand::literal(0.3)],
        );
        let speed = function(
            "safe_speed",
            Operator::LessOrEqual,
            vec![Operand::parameter("speed"), Operand::literal(1.0)],
        );
        let mut model = GoalModel::new(ModelConfig::default());
        model.push(Conditional::new(power, speed));
        let result = model
            .evaluate_with_threshold(&state(0.8, 0.5), f64::NAN)
            .unwrap();
        assert_eq!(result, Some(Evaluation::Single(1.0)));
    }

    #[test]
    fn test_with_config_validates() {
        let bad = ModelConfig {
            threshold: 3.0,
            ..ModelConfig::default()
        };
        assert!(GoalModel::with_config(bad).is_err());
        let model = GoalModel::with_config(ModelConfig::default()).unwrap().with_key("rover");
        assert_eq!(model.key(), Some("rover"));
    }

    #[test]
    fn test_display() {
        let model = rover();
        assert_eq!(model.to_string(), "(AND enough_power safe_speed)");
        assert_eq!(
            format!("{model:#}"),
            "(greater(power_level, 0.3) AND less_or_equal(speed, 1))"
        );
    }
}
