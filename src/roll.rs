use crate::dice::Rollable;
use crate::error::Error;
use crate::generator::{MaxValue, MinValue, NumberGenerator};
use crate::parse::ast::ExpressionNode;
use crate::results::{fmt_num, nodes_from_values, ResultGroup, ResultNode};
use crate::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

/// Rounds a total to two decimal places.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Evaluates a parsed expression list into a result group, rolling
/// every die and brace group it contains.
pub(crate) fn roll_expression(
    nodes: &[ExpressionNode],
    gen: &mut NumberGenerator,
) -> Result<ResultGroup> {
    let mut results = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            ExpressionNode::Die(die) => results.push(ResultNode::Results(die.roll(gen)?)),
            ExpressionNode::Group(group) => results.push(ResultNode::Group(group.roll(gen)?)),
            ExpressionNode::Number(n) => results.push(ResultNode::Number(*n)),
            ExpressionNode::Operator(op) => results.push(ResultNode::Operator(op.clone())),
        }
    }
    Ok(ResultGroup::new(results))
}

/// One notation bound to one evaluation: the parsed expression, its
/// rolled results, and the actual/minimum/maximum totals.
#[derive(Debug, Clone, PartialEq)]
pub struct DiceRoll {
    notation: String,
    expressions: Vec<ExpressionNode>,
    rolls: ResultGroup,
    total: f64,
    min_total: f64,
    max_total: f64,
}

impl DiceRoll {
    /// Parses and rolls with a fresh default generator.
    pub fn new(notation: &str) -> Result<Self> {
        Self::roll_with(notation, &mut NumberGenerator::default())
    }

    /// Parses and rolls, drawing every sample from the given generator.
    pub fn roll_with(notation: &str, gen: &mut NumberGenerator) -> Result<Self> {
        let expressions = crate::parse::parse(notation)?;
        let rolls = roll_expression(&expressions, gen)?;
        Self::from_rolls(notation, expressions, rolls)
    }

    fn from_rolls(
        notation: &str,
        expressions: Vec<ExpressionNode>,
        rolls: ResultGroup,
    ) -> Result<Self> {
        let total = round2(rolls.value()?);
        // The bounds re-evaluate the same expression with the
        // deterministic engines, so no shared generator is mutated.
        let min_total = round2(
            roll_expression(&expressions, &mut NumberGenerator::new(MinValue))?.value()?,
        );
        let max_total = round2(
            roll_expression(&expressions, &mut NumberGenerator::new(MaxValue::new()))?.value()?,
        );
        Ok(Self {
            notation: notation.to_string(),
            expressions,
            rolls,
            total,
            min_total,
            max_total,
        })
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn expressions(&self) -> &[ExpressionNode] {
        &self.expressions
    }

    pub fn rolls(&self) -> &ResultGroup {
        &self.rolls
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn min_total(&self) -> f64 {
        self.min_total
    }

    pub fn max_total(&self) -> f64 {
        self.max_total
    }

    pub fn average_total(&self) -> f64 {
        round2((self.min_total + self.max_total) / 2.0)
    }

    /// `notation: rolls = total`.
    pub fn output(&self) -> String {
        format!("{}: {} = {}", self.notation, self.rolls, fmt_num(self.total))
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::data_format(e))
    }

    pub fn to_base64(&self) -> Result<String> {
        Ok(BASE64.encode(self.to_json()?))
    }

    /// Accepts a JSON object string, a base64-wrapped JSON string, or
    /// anything [import_value](Self::import_value) takes. When the
    /// payload carries `rolls`, nothing is re-rolled.
    pub fn import(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Err(Error::Notation);
        }
        let value: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(_) => {
                let bytes = BASE64
                    .decode(data.trim())
                    .map_err(|e| Error::data_format(e))?;
                let text =
                    String::from_utf8(bytes).map_err(|e| Error::data_format(e))?;
                serde_json::from_str(&text).map_err(|e| Error::data_format(e))?
            }
        };
        Self::import_value(&value)
    }

    /// Rebuilds a roll from `{notation, rolls?}`. Without `rolls` the
    /// notation is rolled fresh.
    pub fn import_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::data_format("import payload must be an object"))?;
        let notation = match obj.get("notation") {
            Some(Value::String(notation)) => notation,
            Some(other) => {
                return Err(Error::data_format(format!(
                    "notation must be a string, got {}",
                    other
                )))
            }
            None => return Err(Error::MissingArgument("notation")),
        };

        match obj.get("rolls") {
            None | Some(Value::Null) => Self::new(notation),
            Some(Value::Array(rolls)) => {
                let expressions = crate::parse::parse(notation)?;
                let group = ResultGroup::new(nodes_from_values(rolls)?);
                Self::from_rolls(notation, expressions, group)
            }
            Some(other) => Err(Error::data_format(format!(
                "rolls must be an array, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output())
    }
}

impl Serialize for DiceRoll {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry("notation", &self.notation)?;
        map.serialize_entry("output", &self.output())?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry("minTotal", &self.min_total)?;
        map.serialize_entry("maxTotal", &self.max_total)?;
        map.serialize_entry("averageTotal", &self.average_total())?;
        map.serialize_entry("rolls", &self.rolls.results())?;
        map.serialize_entry("type", "dice-roll")?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::Flag;
    use crate::test_utils::{face_generator, max_generator, min_generator, seeded_generator};

    fn max_roll(notation: &str) -> DiceRoll {
        DiceRoll::roll_with(notation, &mut max_generator()).unwrap()
    }

    fn seq_roll(notation: &str, faces: Vec<i64>) -> DiceRoll {
        DiceRoll::roll_with(notation, &mut face_generator(faces)).unwrap()
    }

    #[test]
    fn test_plain_dice() {
        let roll = max_roll("4d6");
        assert_eq!(roll.total(), 24.0);
        assert_eq!(roll.output(), "4d6: [6, 6, 6, 6] = 24");
    }

    #[test]
    fn test_explode() {
        let roll = seq_roll("4d6!", vec![6, 3, 6, 1, 4, 2]);
        assert_eq!(roll.total(), 22.0);
        assert_eq!(roll.output(), "4d6!: [6!, 4, 3, 6!, 2, 1] = 22");
    }

    #[test]
    fn test_keep_highest() {
        let roll = seq_roll("4d6kh2", vec![1, 5, 2, 6]);
        assert_eq!(roll.total(), 11.0);
        assert_eq!(roll.output(), "4d6kh2: [1d, 5, 2d, 6] = 11");
    }

    #[test]
    fn test_critical_success_leaves_total() {
        let roll = seq_roll("2d20cs>=18", vec![20, 17]);
        assert_eq!(roll.total(), 37.0);
        assert_eq!(roll.output(), "2d20cs>=18: [20**, 17] = 37");
    }

    #[test]
    fn test_target_counts_successes() {
        let roll = seq_roll("4d6>4", vec![6, 3, 5, 4]);
        assert_eq!(roll.total(), 2.0);
        let calc: Vec<f64> = match &roll.rolls().results()[0] {
            ResultNode::Results(results) => results
                .rolls()
                .iter()
                .map(|r| r.calculation_value())
                .collect(),
            other => panic!("expected roll results, got {:?}", other),
        };
        assert_eq!(calc, vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_group_keep_highest_sub() {
        let roll = seq_roll("{4d6+4, 2d10}kh1", vec![3, 3, 3, 3, 9, 10]);
        assert_eq!(roll.total(), 19.0);
    }

    #[test]
    fn test_math_function() {
        let roll = seq_roll("2d6 + floor(3.7)", vec![4, 5]);
        assert_eq!(roll.total(), 12.0);
    }

    #[test]
    fn test_reroll_once() {
        let roll = seq_roll("1d6ro<2", vec![1, 4]);
        assert_eq!(roll.total(), 4.0);
        match &roll.rolls().results()[0] {
            ResultNode::Results(results) => {
                let result = &results.rolls()[0];
                assert_eq!(result.initial_value(), 1.0);
                assert_eq!(result.value(), 4.0);
                assert!(result.modifiers().contains(Flag::ReRollOnce));
            }
            other => panic!("expected roll results, got {:?}", other),
        }
    }

    #[test]
    fn test_total_rounding() {
        let roll = seq_roll("3d6/4", vec![1, 2, 2]);
        // 5/4 = 1.25 needs no rounding; 5/3 below does.
        assert_eq!(roll.total(), 1.25);
        let roll = seq_roll("5/1d6", vec![3]);
        assert_eq!(roll.total(), 1.67);
        assert_eq!(fmt_num(roll.total()), "1.67");
    }

    #[test]
    fn test_total_bounds() {
        for notation in ["4d6", "4d6kh2", "2d20+3", "4dF.2", "2d%", "{2d6, 1d8}kh1"] {
            let roll = DiceRoll::roll_with(notation, &mut seeded_generator()).unwrap();
            assert!(
                roll.min_total() <= roll.total() && roll.total() <= roll.max_total(),
                "bounds violated for {:?}: {} <= {} <= {}",
                notation,
                roll.min_total(),
                roll.total(),
                roll.max_total()
            );
        }
    }

    #[test]
    fn test_min_max_totals() {
        let roll = DiceRoll::new("4d6kh2").unwrap();
        assert_eq!(roll.min_total(), 2.0);
        assert_eq!(roll.max_total(), 12.0);
        assert_eq!(roll.average_total(), 7.0);

        let roll = DiceRoll::new("2d20+3").unwrap();
        assert_eq!(roll.min_total(), 5.0);
        assert_eq!(roll.max_total(), 43.0);
    }

    #[test]
    fn test_explode_max_total_hits_iteration_cap() {
        let roll = DiceRoll::new("1d6!").unwrap();
        // The max engine explodes until the cap: 1001 sixes.
        assert_eq!(roll.max_total(), 6006.0);
    }

    #[test]
    fn test_serialize_shape() {
        let roll = max_roll("1d4");
        let json = roll.to_value();
        assert_eq!(json["notation"], "1d4");
        assert_eq!(json["total"], 4.0);
        assert_eq!(json["minTotal"], 1.0);
        assert_eq!(json["maxTotal"], 4.0);
        assert_eq!(json["averageTotal"], 2.5);
        assert_eq!(json["type"], "dice-roll");
        assert_eq!(json["rolls"][0]["type"], "roll-results");
    }

    #[test]
    fn test_import_export_round_trip() {
        let roll = seq_roll("4d6kh2", vec![1, 5, 2, 6]);

        let from_json = DiceRoll::import(&roll.to_json().unwrap()).unwrap();
        assert_eq!(from_json.notation(), roll.notation());
        assert_eq!(from_json.total(), roll.total());
        assert_eq!(from_json.rolls(), roll.rolls());

        let from_base64 = DiceRoll::import(&roll.to_base64().unwrap()).unwrap();
        assert_eq!(from_base64.total(), roll.total());
        assert_eq!(from_base64.rolls(), roll.rolls());
    }

    #[test]
    fn test_import_does_not_reroll() {
        // A scripted total no real roll could repeat by chance alone
        // would still come back identical; totals are recomputed from
        // the payload, not re-rolled.
        let json = serde_json::json!({
            "notation": "2d6",
            "rolls": [
                {
                    "rolls": [
                        { "initialValue": 2.0, "value": 2.0, "calculationValue": 2.0,
                          "modifiers": [], "modifierFlags": "", "useInTotal": true,
                          "type": "result" },
                        { "initialValue": 5.0, "value": 5.0, "calculationValue": 5.0,
                          "modifiers": [], "modifierFlags": "", "useInTotal": true,
                          "type": "result" }
                    ],
                    "value": 7.0,
                    "type": "roll-results"
                }
            ]
        });
        let roll = DiceRoll::import_value(&json).unwrap();
        assert_eq!(roll.total(), 7.0);
        assert_eq!(roll.output(), "2d6: [2, 5] = 7");
    }

    #[test]
    fn test_import_failures() {
        assert!(matches!(
            DiceRoll::import("not json at all"),
            Err(Error::DataFormat(_))
        ));
        assert_eq!(
            DiceRoll::import_value(&serde_json::json!({})),
            Err(Error::MissingArgument("notation"))
        );
        assert!(matches!(
            DiceRoll::import_value(&serde_json::json!({ "notation": "2d6", "rolls": 4 })),
            Err(Error::DataFormat(_))
        ));
    }

    #[test]
    fn test_group_output_rendering() {
        let roll = seq_roll("{4d6+4, 2d10}kh1", vec![3, 3, 3, 3, 9, 10]);
        assert_eq!(
            roll.output(),
            "{4d6+4, 2d10}kh1: {([3, 3, 3, 3]+4)d, [9, 10]} = 19"
        );
    }

    #[test]
    fn test_percentile_and_fudge_rolls() {
        let roll = max_roll("2d%");
        assert_eq!(roll.total(), 200.0);
        let roll = max_roll("4dF");
        assert_eq!(roll.total(), 4.0);
        let roll = DiceRoll::roll_with("4dF", &mut min_generator()).unwrap();
        assert_eq!(roll.total(), -4.0);
    }
}
