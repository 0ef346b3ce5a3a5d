mod group;
mod roll;

pub use group::{ResultGroup, ResultNode};
pub use roll::{RollResult, RollResults};

use crate::error::Error;
use crate::modifier::{Flag, FlagSet};
use crate::Result;
use serde_json::Value;

/// Formats a value the way it appears in expressions and output: whole
/// numbers without a fractional part.
pub(crate) fn fmt_num(x: f64) -> String {
    format!("{}", x)
}

/// Rebuilds a result-tree element list from its serialized form.
pub(crate) fn nodes_from_values(values: &[Value]) -> Result<Vec<ResultNode>> {
    values.iter().map(node_from_value).collect()
}

fn node_from_value(value: &Value) -> Result<ResultNode> {
    match value {
        Value::String(op) => Ok(ResultNode::Operator(op.clone())),
        Value::Number(n) => Ok(ResultNode::Number(
            n.as_f64()
                .ok_or_else(|| Error::data_format("non-finite number in results"))?,
        )),
        Value::Object(obj) => match obj.get("type").and_then(Value::as_str) {
            Some("roll-results") => Ok(ResultNode::Results(roll_results_from_value(value)?)),
            Some("result-group") => Ok(ResultNode::Group(group_from_value(value)?)),
            other => Err(Error::data_format(format!(
                "unexpected result element type {:?}",
                other
            ))),
        },
        other => Err(Error::data_format(format!(
            "unexpected result element {}",
            other
        ))),
    }
}

fn flags_from_value(value: Option<&Value>) -> Result<FlagSet> {
    let Some(value) = value else {
        return Ok(FlagSet::new());
    };
    let names = value
        .as_array()
        .ok_or_else(|| Error::data_format("modifiers must be an array"))?;
    names
        .iter()
        .map(|name| {
            let name = name
                .as_str()
                .ok_or_else(|| Error::data_format("modifier flags must be strings"))?;
            Flag::from_name(name)
                .ok_or_else(|| Error::data_format(format!("unknown modifier flag {:?}", name)))
        })
        .collect()
}

fn roll_result_from_value(value: &Value) -> Result<RollResult> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::data_format("roll result must be an object"))?;
    let initial = obj
        .get("initialValue")
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::data_format("roll result lacks initialValue"))?;
    let roll_value = obj.get("value").and_then(Value::as_f64).unwrap_or(initial);
    let calc = obj
        .get("calculationValue")
        .and_then(Value::as_f64)
        .filter(|&cv| cv != roll_value);
    let use_in_total = obj
        .get("useInTotal")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let modifiers = flags_from_value(obj.get("modifiers"))?;
    Ok(RollResult::from_parts(
        initial,
        roll_value,
        calc,
        modifiers,
        use_in_total,
    ))
}

fn roll_results_from_value(value: &Value) -> Result<RollResults> {
    let rolls = value
        .get("rolls")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::data_format("roll results lack a rolls array"))?;
    rolls
        .iter()
        .map(roll_result_from_value)
        .collect::<Result<Vec<_>>>()
        .map(RollResults::new)
}

fn group_from_value(value: &Value) -> Result<ResultGroup> {
    let results = value
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::data_format("result group lacks a results array"))?;
    let nodes = nodes_from_values(results)?;
    let modifiers = flags_from_value(value.get("modifiers"))?;
    let is_roll_group = value
        .get("isRollGroup")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let use_in_total = value
        .get("useInTotal")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let serialized_value = value.get("value").and_then(Value::as_f64);
    let calc_override = value
        .get("calculationValue")
        .and_then(Value::as_f64)
        .filter(|&cv| use_in_total && serialized_value.map_or(true, |v| cv != v));
    Ok(ResultGroup::from_parts(
        nodes,
        modifiers,
        is_roll_group,
        use_in_total,
        calc_override,
    ))
}
