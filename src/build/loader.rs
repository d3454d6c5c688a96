//! Builds goal trees from [`Element`]s.

use super::element::Element;
use crate::error::GoalResult;
use crate::model::{GoalModel, ModelConfig};
use crate::node::{
    Biconditional, Conditional, Conjunction, Disjunction, Node, Objective, Operand, Operator,
    UtilityFunction,
};
use crate::value::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Builds the node for `element`.
///
/// Returns `Ok(None)` when the tag is not one of `biconditional`,
/// `conditional`, `conjunction`, `disjunction` or `function`. Unrecognized
/// nested elements are skipped.
pub fn node_from_element(element: &Element) -> GoalResult<Option<Node>> {
    let key = element.attribute("id").map(str::to_string);
    let node: Node = if element.is("conjunction") {
        with_key(Conjunction::new(children_from(element)?), key, |node, key| node.with_key(key)).into()
    } else if element.is("disjunction") {
        with_key(Disjunction::new(children_from(element)?), key, |node, key| node.with_key(key)).into()
    } else if element.is("conditional") {
        with_key(
            Conditional::from_children(children_from(element)?),
            key,
            |node, key| node.with_key(key),
        )
        .into()
    } else if element.is("biconditional") {
        with_key(
            Biconditional::from_children(children_from(element)?),
            key,
            |node, key| node.with_key(key),
        )
        .into()
    } else if element.is("function") {
        with_key(function_from(element)?, key, |node, key| node.with_key(key)).into()
    } else {
        return Ok(None);
    };
    Ok(Some(node))
}

fn with_key<T>(node: T, key: Option<String>, set: impl FnOnce(T, String) -> T) -> T {
    match key {
        Some(key) => set(node, key),
        None => node,
    }
}

fn children_from(element: &Element) -> GoalResult<Vec<Node>> {
    let mut children = Vec::with_capacity(element.children.len());
    for child in &element.children {
        match node_from_element(child)? {
            Some(node) => children.push(node),
            None => warn!(tag = %child.tag, parent = %element.tag, "skipping unrecognized element"),
        }
    }
    Ok(children)
}

fn function_from(element: &Element) -> GoalResult<UtilityFunction> {
    let operator: Operator = element.attribute("type").unwrap_or_default().parse()?;

    let mut params: BTreeMap<i64, Operand> = BTreeMap::new();
    for param in element.children.iter().filter(|e| e.is("parameter")) {
        let Some(index) = param.attribute("index").and_then(|i| i.trim().parse::<i64>().ok())
        else {
            warn!(index = ?param.attribute("index"), "skipping parameter without integer index");
            continue;
        };
        let operand = match param.attribute("value") {
            Some(raw) => operand_from(raw),
            None => {
                warn!(index, "parameter without value, using false");
                Operand::literal(false)
            }
        };
        params.insert(index, operand);
    }

    let mut function = UtilityFunction::new(operator, params.into_values().collect())?;
    if let Some(raw) = element.attribute("objective") {
        match raw.parse::<Objective>() {
            Ok(objective) => function = function.with_objective(objective),
            Err(reason) => warn!(%reason, "treating objective as instant"),
        }
    }
    Ok(function)
}

/// Coerces a raw parameter value: float, then boolean, then a quoted
/// string literal or a parameter name.
fn operand_from(raw: &str) -> Operand {
    if let Ok(x) = raw.trim().parse::<f64>() {
        return Operand::Literal(Value::Number(x));
    }
    if raw.eq_ignore_ascii_case("true") {
        return Operand::Literal(Value::Bool(true));
    }
    if raw.eq_ignore_ascii_case("false") {
        return Operand::Literal(Value::Bool(false));
    }
    Operand::parse(raw)
}

impl GoalModel {
    /// Builds a model from a `logic` root element.
    ///
    /// The root's `id` becomes the model key and each recognized child
    /// element a top-level goal. A root with any other tag yields an empty
    /// model.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_kaos::build::Element;
    /// use u_kaos::model::{GoalModel, ModelConfig};
    ///
    /// let param = |i: &str, v: &str| {
    ///     Element::new("parameter").with_attribute("index", i).with_attribute("value", v)
    /// };
    /// let root = Element::new("logic").with_attribute("id", "rover").with_child(
    ///     Element::new("function")
    ///         .with_attribute("id", "power")
    ///         .with_attribute("type", "greater")
    ///         .with_child(param("0", "power_level"))
    ///         .with_child(param("1", "0.3")),
    /// );
    ///
    /// let model = GoalModel::from_element(&root, ModelConfig::default()).unwrap();
    /// assert_eq!(model.key(), Some("rover"));
    /// assert_eq!(model.utility_parameters(), vec!["power_level"]);
    /// ```
    pub fn from_element(root: &Element, config: ModelConfig) -> GoalResult<Self> {
        let mut model = GoalModel::with_config(config)?;
        if !root.is("logic") {
            warn!(tag = %root.tag, "root element is not <logic>; model is empty");
            return Ok(model);
        }
        if let Some(id) = root.attribute("id") {
            model = model.with_key(id);
        }
        for child in children_from(root)? {
            model.push(child);
        }
        Ok(model)
    }
}
