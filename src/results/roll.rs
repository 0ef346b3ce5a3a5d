use crate::modifier::{Flag, FlagSet};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use super::fmt_num;

/// The outcome of a single die roll.
///
/// `initial_value` is the raw sampled number and never changes. `value`
/// starts equal to it and may be overwritten by modifiers; the
/// calculation value starts equal to `value` and is only overridden by
/// the target modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RollResult {
    initial_value: f64,
    value: f64,
    calc_override: Option<f64>,
    modifiers: FlagSet,
    use_in_total: bool,
}

impl RollResult {
    pub fn new(value: i64) -> Self {
        Self {
            initial_value: value as f64,
            value: value as f64,
            calc_override: None,
            modifiers: FlagSet::new(),
            use_in_total: true,
        }
    }

    pub(crate) fn from_parts(
        initial_value: f64,
        value: f64,
        calc_override: Option<f64>,
        modifiers: FlagSet,
        use_in_total: bool,
    ) -> Self {
        Self {
            initial_value,
            value,
            calc_override,
            modifiers,
            use_in_total,
        }
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// The number this roll contributes to totals.
    pub fn calculation_value(&self) -> f64 {
        self.calc_override.unwrap_or(self.value)
    }

    pub(crate) fn set_calculation_value(&mut self, value: f64) {
        self.calc_override = Some(value);
    }

    pub fn modifiers(&self) -> &FlagSet {
        &self.modifiers
    }

    pub(crate) fn add_flag(&mut self, flag: Flag) {
        self.modifiers.insert(flag);
    }

    pub fn use_in_total(&self) -> bool {
        self.use_in_total
    }

    pub(crate) fn set_use_in_total(&mut self, use_in_total: bool) {
        self.use_in_total = use_in_total;
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", fmt_num(self.value), self.modifiers.symbols())
    }
}

impl Serialize for RollResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry("initialValue", &self.initial_value)?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("calculationValue", &self.calculation_value())?;
        map.serialize_entry("modifiers", &self.modifiers.names())?;
        map.serialize_entry("modifierFlags", &self.modifiers.symbols())?;
        map.serialize_entry("useInTotal", &self.use_in_total)?;
        map.serialize_entry("type", "result")?;
        map.end()
    }
}

/// An ordered collection of [RollResult]s from one die.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollResults {
    rolls: Vec<RollResult>,
}

impl RollResults {
    pub fn new(rolls: Vec<RollResult>) -> Self {
        Self { rolls }
    }

    pub fn rolls(&self) -> &[RollResult] {
        &self.rolls
    }

    pub(crate) fn rolls_mut(&mut self) -> &mut Vec<RollResult> {
        &mut self.rolls
    }

    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    /// The sum of calculation values over rolls still counted in the
    /// total.
    pub fn value(&self) -> f64 {
        self.rolls
            .iter()
            .filter(|r| r.use_in_total())
            .map(RollResult::calculation_value)
            .sum()
    }
}

impl FromIterator<RollResult> for RollResults {
    fn from_iter<I: IntoIterator<Item = RollResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for RollResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rolls = self
            .rolls
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{}]", rolls)
    }
}

impl Serialize for RollResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("rolls", &self.rolls)?;
        map.serialize_entry("value", &self.value())?;
        map.serialize_entry("type", "roll-results")?;
        map.end()
    }
}
