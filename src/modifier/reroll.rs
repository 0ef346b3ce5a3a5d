use crate::compare::ComparePoint;
use crate::error::Error;
use crate::results::RollResults;
use crate::Result;

use super::{Flag, ModifierContext, MAX_ITERATIONS};

/// Replaces a roll's value with a fresh sample while it matches the
/// compare point. The initial value is never touched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReRollModifier {
    once: bool,
    compare_point: Option<ComparePoint>,
}

impl ReRollModifier {
    pub fn new(once: bool, compare_point: Option<ComparePoint>) -> Self {
        Self {
            once,
            compare_point,
        }
    }

    pub fn is_once(&self) -> bool {
        self.once
    }

    pub fn compare_point(&self) -> Option<&ComparePoint> {
        self.compare_point.as_ref()
    }

    pub(crate) fn flag(&self) -> Flag {
        if self.once {
            Flag::ReRollOnce
        } else {
            Flag::ReRoll
        }
    }

    pub(crate) fn notation(&self) -> String {
        let mut notation = String::from(if self.once { "ro" } else { "r" });
        if let Some(cp) = &self.compare_point {
            notation.push_str(&cp.to_string());
        }
        notation
    }

    pub(crate) fn run(&self, results: &mut RollResults, ctx: &mut ModifierContext<'_>) -> Result<()> {
        if ctx.min == ctx.max {
            return Err(Error::InvalidDieAction { action: "re-roll" });
        }
        let cp = self
            .compare_point
            .unwrap_or_else(|| ComparePoint::equal_to(ctx.min as f64));

        for roll in results.rolls_mut() {
            let mut iterations = 0;
            while cp.matches(roll.value()) && iterations < MAX_ITERATIONS {
                roll.set_value(ctx.roll_once().value());
                roll.add_flag(self.flag());
                iterations += 1;
                if self.once {
                    break;
                }
            }
        }
        Ok(())
    }
}
