use crate::error::Error;
use crate::results::{fmt_num, RollResults};
use crate::Result;

use super::Flag;

/// Raises every roll below a floor up to it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MinModifier {
    min: f64,
}

impl MinModifier {
    pub fn new(min: f64) -> Result<Self> {
        if !min.is_finite() {
            return Err(Error::invalid_argument(
                "minimum",
                format!("{} is not finite", min),
            ));
        }
        Ok(Self { min })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub(crate) fn notation(&self) -> String {
        format!("min{}", fmt_num(self.min))
    }

    pub(crate) fn run(&self, results: &mut RollResults) {
        for roll in results.rolls_mut() {
            if roll.value() < self.min {
                roll.set_value(self.min);
                roll.add_flag(Flag::Min);
            }
        }
    }
}

/// Lowers every roll above a ceiling down to it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaxModifier {
    max: f64,
}

impl MaxModifier {
    pub fn new(max: f64) -> Result<Self> {
        if !max.is_finite() {
            return Err(Error::invalid_argument(
                "maximum",
                format!("{} is not finite", max),
            ));
        }
        Ok(Self { max })
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub(crate) fn notation(&self) -> String {
        format!("max{}", fmt_num(self.max))
    }

    pub(crate) fn run(&self, results: &mut RollResults) {
        for roll in results.rolls_mut() {
            if roll.value() > self.max {
                roll.set_value(self.max);
                roll.add_flag(Flag::Max);
            }
        }
    }
}
