use crate::compare::ComparePoint;
use crate::error::Error;
use crate::results::RollResults;
use crate::Result;

use super::{Flag, ModifierContext, MAX_ITERATIONS};

/// Rolls again while a roll matches the compare point, appending the
/// extra rolls. `compound` collapses each chain into a single summed
/// roll; `penetrate` knocks one off every follow-up roll.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExplodeModifier {
    compare_point: Option<ComparePoint>,
    compound: bool,
    penetrate: bool,
}

impl ExplodeModifier {
    pub fn new(compare_point: Option<ComparePoint>, compound: bool, penetrate: bool) -> Self {
        Self {
            compare_point,
            compound,
            penetrate,
        }
    }

    pub fn compare_point(&self) -> Option<&ComparePoint> {
        self.compare_point.as_ref()
    }

    pub fn is_compound(&self) -> bool {
        self.compound
    }

    pub fn is_penetrating(&self) -> bool {
        self.penetrate
    }

    pub(crate) fn notation(&self) -> String {
        let mut notation = String::from("!");
        if self.compound {
            notation.push('!');
        }
        if self.penetrate {
            notation.push('p');
        }
        if let Some(cp) = &self.compare_point {
            notation.push_str(&cp.to_string());
        }
        notation
    }

    pub(crate) fn run(&self, results: &mut RollResults, ctx: &mut ModifierContext<'_>) -> Result<()> {
        if ctx.min == ctx.max {
            return Err(Error::InvalidDieAction { action: "explode" });
        }
        let cp = self
            .compare_point
            .unwrap_or_else(|| ComparePoint::equal_to(ctx.max as f64));

        let original = std::mem::take(results.rolls_mut());
        let out = results.rolls_mut();
        for roll in original {
            let mut subs = vec![roll];
            let mut iterations = 0;
            while cp.matches(subs.last().map_or(0.0, |r| r.value())) && iterations < MAX_ITERATIONS
            {
                let mut next = ctx.roll_once();
                let prev = subs.last_mut().expect("chain starts non-empty");
                prev.add_flag(Flag::Explode);
                if self.penetrate {
                    prev.add_flag(Flag::Penetrate);
                    next.set_value(next.value() - 1.0);
                }
                subs.push(next);
                iterations += 1;
            }

            if self.compound && subs.len() > 1 {
                let total: f64 = subs.iter().map(|r| r.value()).sum();
                let mut first = subs.remove(0);
                first.set_value(total);
                first.add_flag(Flag::Explode);
                first.add_flag(Flag::Compound);
                if self.penetrate {
                    first.add_flag(Flag::Penetrate);
                }
                out.push(first);
            } else {
                out.extend(subs);
            }
        }
        Ok(())
    }
}
