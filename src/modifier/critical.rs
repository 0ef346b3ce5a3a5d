use crate::compare::ComparePoint;
use crate::results::RollResults;

use super::{Flag, ModifierContext};

/// Flags rolls matching the compare point (default: the die's maximum)
/// without changing any values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CriticalSuccessModifier {
    compare_point: Option<ComparePoint>,
}

impl CriticalSuccessModifier {
    pub fn new(compare_point: Option<ComparePoint>) -> Self {
        Self { compare_point }
    }

    pub fn compare_point(&self) -> Option<&ComparePoint> {
        self.compare_point.as_ref()
    }

    pub(crate) fn notation(&self) -> String {
        match &self.compare_point {
            Some(cp) => format!("cs{}", cp),
            None => "cs".to_string(),
        }
    }

    pub(crate) fn run(&self, results: &mut RollResults, ctx: &ModifierContext<'_>) {
        let cp = self
            .compare_point
            .unwrap_or_else(|| ComparePoint::equal_to(ctx.max as f64));
        for roll in results.rolls_mut() {
            if cp.matches(roll.value()) {
                roll.add_flag(Flag::CriticalSuccess);
            }
        }
    }
}

/// Flags rolls matching the compare point (default: the die's minimum)
/// without changing any values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CriticalFailureModifier {
    compare_point: Option<ComparePoint>,
}

impl CriticalFailureModifier {
    pub fn new(compare_point: Option<ComparePoint>) -> Self {
        Self { compare_point }
    }

    pub fn compare_point(&self) -> Option<&ComparePoint> {
        self.compare_point.as_ref()
    }

    pub(crate) fn notation(&self) -> String {
        match &self.compare_point {
            Some(cp) => format!("cf{}", cp),
            None => "cf".to_string(),
        }
    }

    pub(crate) fn run(&self, results: &mut RollResults, ctx: &ModifierContext<'_>) {
        let cp = self
            .compare_point
            .unwrap_or_else(|| ComparePoint::equal_to(ctx.min as f64));
        for roll in results.rolls_mut() {
            if cp.matches(roll.value()) {
                roll.add_flag(Flag::CriticalFailure);
            }
        }
    }
}
