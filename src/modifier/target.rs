use crate::compare::ComparePoint;
use crate::results::{ResultGroup, ResultNode, RollResults};
use crate::Result;

use super::Flag;

/// Success/failure counting: each roll contributes 1, −1, or 0 to the
/// total instead of its face value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetModifier {
    success: ComparePoint,
    failure: Option<ComparePoint>,
}

impl TargetModifier {
    pub fn new(success: ComparePoint, failure: Option<ComparePoint>) -> Self {
        Self { success, failure }
    }

    pub fn success(&self) -> &ComparePoint {
        &self.success
    }

    pub fn failure(&self) -> Option<&ComparePoint> {
        self.failure.as_ref()
    }

    pub(crate) fn notation(&self) -> String {
        match &self.failure {
            Some(failure) => format!("{}f{}", self.success, failure),
            None => self.success.to_string(),
        }
    }

    fn state(&self, value: f64) -> (Option<Flag>, f64) {
        if self.success.matches(value) {
            (Some(Flag::TargetSuccess), 1.0)
        } else if self.failure.map_or(false, |f| f.matches(value)) {
            (Some(Flag::TargetFailure), -1.0)
        } else {
            (None, 0.0)
        }
    }

    pub(crate) fn run(&self, results: &mut RollResults) {
        for roll in results.rolls_mut() {
            let (flag, calc) = self.state(roll.value());
            if let Some(flag) = flag {
                roll.add_flag(flag);
            }
            roll.set_calculation_value(calc);
        }
    }

    pub(crate) fn run_group(&self, group: &mut ResultGroup) -> Result<()> {
        let mut states = Vec::new();
        for node in group.results() {
            if let ResultNode::Group(sub) = node {
                states.push(self.state(sub.value()?));
            }
        }

        let mut states = states.into_iter();
        for node in group.results_mut() {
            if let ResultNode::Group(sub) = node {
                let (flag, calc) = states.next().expect("one state per sub-expression");
                if let Some(flag) = flag {
                    sub.add_flag(flag);
                }
                sub.set_calculation_value(calc);
            }
        }
        Ok(())
    }
}
