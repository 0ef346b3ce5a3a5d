use crate::error::Error;
use crate::math;
use crate::modifier::{Flag, FlagSet};
use crate::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use super::{fmt_num, RollResults};

/// One element of a [ResultGroup]: rolled results and nested groups
/// interleaved with the operators and plain numbers of the source
/// expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultNode {
    Operator(String),
    Number(f64),
    Results(RollResults),
    Group(ResultGroup),
}

impl ResultNode {
    fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    fn contribution(&self) -> Result<f64> {
        Ok(match self {
            Self::Operator(_) => 0.0,
            Self::Number(n) => *n,
            Self::Results(r) => r.value(),
            Self::Group(g) => g.calculation_value()?,
        })
    }
}

impl Serialize for ResultNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Operator(op) => serializer.serialize_str(op),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Results(r) => r.serialize(serializer),
            Self::Group(g) => g.serialize(serializer),
        }
    }
}

/// The evaluated form of an expression or brace group: an ordered list
/// of [ResultNode]s plus group-level modifier flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGroup {
    results: Vec<ResultNode>,
    modifiers: FlagSet,
    is_roll_group: bool,
    use_in_total: bool,
    calc_override: Option<f64>,
}

impl ResultGroup {
    /// A plain expression group.
    pub fn new(results: Vec<ResultNode>) -> Self {
        Self {
            results,
            modifiers: FlagSet::new(),
            is_roll_group: false,
            use_in_total: true,
            calc_override: None,
        }
    }

    /// A brace group wrapping its sub-expression groups.
    pub fn roll_group(subs: Vec<ResultGroup>) -> Self {
        let mut group = Self::new(subs.into_iter().map(ResultNode::Group).collect());
        group.is_roll_group = true;
        group
    }

    pub(crate) fn from_parts(
        results: Vec<ResultNode>,
        modifiers: FlagSet,
        is_roll_group: bool,
        use_in_total: bool,
        calc_override: Option<f64>,
    ) -> Self {
        Self {
            results,
            modifiers,
            is_roll_group,
            use_in_total,
            calc_override,
        }
    }

    pub fn results(&self) -> &[ResultNode] {
        &self.results
    }

    pub(crate) fn results_mut(&mut self) -> &mut Vec<ResultNode> {
        &mut self.results
    }

    pub fn modifiers(&self) -> &FlagSet {
        &self.modifiers
    }

    pub(crate) fn add_flag(&mut self, flag: Flag) {
        self.modifiers.insert(flag);
    }

    pub fn is_roll_group(&self) -> bool {
        self.is_roll_group
    }

    pub fn use_in_total(&self) -> bool {
        self.use_in_total
    }

    pub(crate) fn set_use_in_total(&mut self, use_in_total: bool) {
        self.use_in_total = use_in_total;
    }

    pub(crate) fn set_calculation_value(&mut self, value: f64) {
        self.calc_override = Some(value);
    }

    /// The group's numeric value: children concatenated into an
    /// arithmetic expression when operators are present, a plain sum
    /// otherwise.
    pub fn value(&self) -> Result<f64> {
        if !self.results.iter().any(ResultNode::is_operator) {
            let mut total = 0.0;
            for node in &self.results {
                total += node.contribution()?;
            }
            return Ok(total);
        }

        let mut expr = String::new();
        for node in &self.results {
            match node {
                ResultNode::Operator(op) => expr.push_str(op),
                ResultNode::Number(n) => expr.push_str(&fmt_num(*n)),
                ResultNode::Results(r) => expr.push_str(&fmt_num(r.value())),
                ResultNode::Group(g) => expr.push_str(&fmt_num(g.calculation_value()?)),
            }
        }
        math::evaluate(&expr)
    }

    /// What this group contributes to an enclosing total: zero when
    /// dropped, the override when a target-style modifier set one, the
    /// plain value otherwise.
    pub fn calculation_value(&self) -> Result<f64> {
        if !self.use_in_total {
            return Ok(0.0);
        }
        match self.calc_override {
            Some(v) => Ok(v),
            None => self.value(),
        }
    }
}

impl fmt::Display for ResultGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .results
            .iter()
            .map(|node| match node {
                ResultNode::Operator(op) => op.clone(),
                ResultNode::Number(n) => fmt_num(*n),
                ResultNode::Results(r) => r.to_string(),
                ResultNode::Group(g) => g.to_string(),
            })
            .collect();

        let body = if self.is_roll_group {
            format!("{{{}}}", rendered.join(", "))
        } else {
            rendered.concat()
        };

        if self.modifiers.is_empty() {
            f.write_str(&body)
        } else {
            write!(f, "({}){}", body, self.modifiers.symbols())
        }
    }
}

impl Serialize for ResultGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let value = self.value().unwrap_or(0.0);
        let calculation_value = self.calculation_value().unwrap_or(0.0);
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry("results", &self.results)?;
        map.serialize_entry("modifiers", &self.modifiers.names())?;
        map.serialize_entry("modifierFlags", &self.modifiers.symbols())?;
        map.serialize_entry("isRollGroup", &self.is_roll_group)?;
        map.serialize_entry("useInTotal", &self.use_in_total)?;
        map.serialize_entry("calculationValue", &calculation_value)?;
        map.serialize_entry("value", &value)?;
        map.serialize_entry("type", "result-group")?;
        map.end()
    }
}
