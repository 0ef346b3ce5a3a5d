use crate::compare::ComparePoint;
use crate::error::Error;
use crate::results::RollResults;
use crate::Result;

use super::{Flag, ModifierContext, MAX_ITERATIONS};

/// Re-rolls duplicates so every value in the set is distinct.
///
/// The first occurrence of a value is never re-rolled. Without a compare
/// point every duplicate is eligible; with one, only duplicates whose
/// value matches it are.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniqueModifier {
    once: bool,
    compare_point: Option<ComparePoint>,
}

impl UniqueModifier {
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
            Flag::UniqueOnce
        } else {
            Flag::Unique
        }
    }

    pub(crate) fn notation(&self) -> String {
        let mut notation = String::from(if self.once { "uo" } else { "u" });
        if let Some(cp) = &self.compare_point {
            notation.push_str(&cp.to_string());
        }
        notation
    }

    pub(crate) fn run(&self, results: &mut RollResults, ctx: &mut ModifierContext<'_>) -> Result<()> {
        if ctx.min == ctx.max {
            return Err(Error::InvalidDieAction {
                action: "enforce unique rolls on",
            });
        }

        let rolls = results.rolls_mut();
        for i in 1..rolls.len() {
            let mut iterations = 0;
            loop {
                let value = rolls[i].value();
                let eligible = self
                    .compare_point
                    .map_or(true, |cp| cp.matches(value));
                let duplicate = rolls[..i].iter().any(|r| r.value() == value);
                if !(eligible && duplicate) || iterations >= MAX_ITERATIONS {
                    break;
                }

                let next = ctx.roll_once().value();
                rolls[i].set_value(next);
                rolls[i].add_flag(self.flag());
                iterations += 1;
                if self.once {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::CompareOperator;
    use crate::dice::Sampler;
    use crate::generator::{NumberGenerator, SequenceEngine};
    use crate::results::RollResult;

    fn results(values: &[i64]) -> RollResults {
        values.iter().map(|&v| RollResult::new(v)).collect()
    }

    fn d6_ctx(gen: &mut NumberGenerator) -> ModifierContext<'_> {
        ModifierContext::new(1, 6, Sampler::Range { min: 1, max: 6 }, gen)
    }

    #[test]
    fn test_first_occurrence_keeps_later_rerolls() {
        let mut gen = NumberGenerator::new(SequenceEngine::faces(1, vec![4, 5]));
        let mut rolls = results(&[3, 3, 3]);
        let modifier = UniqueModifier::new(false, None);
        modifier.run(&mut rolls, &mut d6_ctx(&mut gen)).unwrap();

        let values: Vec<f64> = rolls.rolls().iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0]);
        assert!(rolls.rolls()[0].modifiers().is_empty());
        assert!(rolls.rolls()[1].modifiers().contains(Flag::Unique));
        assert_eq!(rolls.rolls()[1].initial_value(), 3.0);
    }

    #[test]
    fn test_rerolls_until_distinct() {
        let mut gen = NumberGenerator::new(SequenceEngine::faces(1, vec![3, 2]));
        let mut rolls = results(&[3, 3]);
        let modifier = UniqueModifier::new(false, None);
        modifier.run(&mut rolls, &mut d6_ctx(&mut gen)).unwrap();

        // First replacement was another 3, so it rolled again.
        let values: Vec<f64> = rolls.rolls().iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![3.0, 2.0]);
    }

    #[test]
    fn test_compare_point_limits_eligibility() {
        let mut gen = NumberGenerator::new(SequenceEngine::faces(1, vec![6]));
        let mut rolls = results(&[2, 2, 5, 5]);
        let cp = ComparePoint::new(CompareOperator::Equal, 5.0).unwrap();
        let modifier = UniqueModifier::new(false, Some(cp));
        modifier.run(&mut rolls, &mut d6_ctx(&mut gen)).unwrap();

        // Only the duplicate 5 matches the compare point.
        let values: Vec<f64> = rolls.rolls().iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![2.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_unique_once() {
        let mut gen = NumberGenerator::new(SequenceEngine::faces(1, vec![3]));
        let mut rolls = results(&[3, 3]);
        let modifier = UniqueModifier::new(true, None);
        modifier.run(&mut rolls, &mut d6_ctx(&mut gen)).unwrap();

        // The single replacement duplicated again; once means no retry.
        let values: Vec<f64> = rolls.rolls().iter().map(|r| r.value()).collect();
        assert_eq!(values, vec![3.0, 3.0]);
        assert!(rolls.rolls()[1].modifiers().contains(Flag::UniqueOnce));
    }

    #[test]
    fn test_rejects_fixed_die() {
        let mut gen = NumberGenerator::default();
        let mut ctx = ModifierContext::new(1, 1, Sampler::Range { min: 1, max: 1 }, &mut gen);
        let mut rolls = results(&[1, 1]);
        assert!(matches!(
            UniqueModifier::new(false, None).run(&mut rolls, &mut ctx),
            Err(Error::InvalidDieAction { .. })
        ));
    }
}
