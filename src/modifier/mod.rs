mod critical;
mod explode;
mod flag;
mod keep_drop;
mod min_max;
mod reroll;
mod sort;
mod target;
mod unique;

pub use critical::{CriticalFailureModifier, CriticalSuccessModifier};
pub use explode::ExplodeModifier;
pub use flag::{Flag, FlagSet};
pub use keep_drop::{DropModifier, End, KeepModifier};
pub use min_max::{MaxModifier, MinModifier};
pub use reroll::ReRollModifier;
pub use sort::{SortDirection, SortModifier};
pub use target::TargetModifier;
pub use unique::UniqueModifier;

use crate::dice::Sampler;
use crate::generator::NumberGenerator;
use crate::results::{ResultGroup, RollResult, RollResults};
use crate::Result;
use std::fmt;

/// How many times explode, re-roll, and unique may iterate on a single
/// roll. Hitting the cap stops the loop silently.
pub const MAX_ITERATIONS: usize = 1000;

/// What a modifier needs from the die it is attached to: its bounds for
/// default compare points, and a way to draw fresh rolls.
pub struct ModifierContext<'a> {
    pub min: i64,
    pub max: i64,
    sampler: Sampler,
    gen: &'a mut NumberGenerator,
}

impl<'a> ModifierContext<'a> {
    pub fn new(min: i64, max: i64, sampler: Sampler, gen: &'a mut NumberGenerator) -> Self {
        Self {
            min,
            max,
            sampler,
            gen,
        }
    }

    pub fn roll_once(&mut self) -> RollResult {
        RollResult::new(self.sampler.sample(self.gen))
    }
}

/// A modifier attached to a die or roll group.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Min(MinModifier),
    Max(MaxModifier),
    Explode(ExplodeModifier),
    ReRoll(ReRollModifier),
    Unique(UniqueModifier),
    Keep(KeepModifier),
    Drop(DropModifier),
    Target(TargetModifier),
    CriticalSuccess(CriticalSuccessModifier),
    CriticalFailure(CriticalFailureModifier),
    Sort(SortModifier),
}

impl Modifier {
    /// Position in the fixed execution pipeline; lists run ascending.
    pub fn order(&self) -> u8 {
        match self {
            Self::Min(_) => 1,
            Self::Max(_) => 2,
            Self::Explode(_) => 3,
            Self::ReRoll(_) => 4,
            Self::Unique(_) => 5,
            Self::Keep(_) => 6,
            Self::Drop(_) => 7,
            Self::Target(_) => 8,
            Self::CriticalSuccess(_) => 9,
            Self::CriticalFailure(_) => 10,
            Self::Sort(_) => 11,
        }
    }

    /// The map key: adding a modifier with the name of an existing one
    /// replaces it.
    pub fn name(&self) -> String {
        match self {
            Self::Min(_) => "min".to_string(),
            Self::Max(_) => "max".to_string(),
            Self::Explode(_) => "explode".to_string(),
            Self::ReRoll(m) => (if m.is_once() { "re-roll-once" } else { "re-roll" }).to_string(),
            Self::Unique(m) => (if m.is_once() { "unique-once" } else { "unique" }).to_string(),
            Self::Keep(m) => format!("keep-{}", m.end()),
            Self::Drop(m) => format!("drop-{}", m.end()),
            Self::Target(_) => "target".to_string(),
            Self::CriticalSuccess(_) => "critical-success".to_string(),
            Self::CriticalFailure(_) => "critical-failure".to_string(),
            Self::Sort(_) => "sorting".to_string(),
        }
    }

    pub fn notation(&self) -> String {
        match self {
            Self::Min(m) => m.notation(),
            Self::Max(m) => m.notation(),
            Self::Explode(m) => m.notation(),
            Self::ReRoll(m) => m.notation(),
            Self::Unique(m) => m.notation(),
            Self::Keep(m) => m.notation(),
            Self::Drop(m) => m.notation(),
            Self::Target(m) => m.notation(),
            Self::CriticalSuccess(m) => m.notation(),
            Self::CriticalFailure(m) => m.notation(),
            Self::Sort(m) => m.notation(),
        }
    }

    pub(crate) fn run_on_rolls(
        &self,
        results: &mut RollResults,
        ctx: &mut ModifierContext<'_>,
    ) -> Result<()> {
        match self {
            Self::Min(m) => m.run(results),
            Self::Max(m) => m.run(results),
            Self::Explode(m) => m.run(results, ctx)?,
            Self::ReRoll(m) => m.run(results, ctx)?,
            Self::Unique(m) => m.run(results, ctx)?,
            Self::Keep(m) => m.run(results),
            Self::Drop(m) => m.run(results),
            Self::Target(m) => m.run(results),
            Self::CriticalSuccess(m) => m.run(results, ctx),
            Self::CriticalFailure(m) => m.run(results, ctx),
            Self::Sort(m) => m.run(results),
        }
        Ok(())
    }

    // Only the group-capable kinds reach here; the parser rejects the
    // rest after a brace group.
    pub(crate) fn run_on_group(&self, group: &mut ResultGroup) -> Result<()> {
        match self {
            Self::Keep(m) => m.run_group(group),
            Self::Drop(m) => m.run_group(group),
            Self::Target(m) => m.run_group(group),
            Self::Sort(m) => m.run_group(group),
            _ => unreachable!("{} cannot run on a roll group", self.name()),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

macro_rules! modifier_from_impl {
    ($($Variant:ident($Type:ty)),+ $(,)?) => {
        $(impl From<$Type> for Modifier {
            fn from(m: $Type) -> Self {
                Self::$Variant(m)
            }
        })+
    };
}

modifier_from_impl!(
    Min(MinModifier),
    Max(MaxModifier),
    Explode(ExplodeModifier),
    ReRoll(ReRollModifier),
    Unique(UniqueModifier),
    Keep(KeepModifier),
    Drop(DropModifier),
    Target(TargetModifier),
    CriticalSuccess(CriticalSuccessModifier),
    CriticalFailure(CriticalFailureModifier),
    Sort(SortModifier),
);

/// The ordered modifier map a die or group owns: keyed by name, kept
/// sorted by [order](Modifier::order) with insertion order breaking
/// ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierList {
    mods: Vec<Modifier>,
}

impl ModifierList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, modifier: impl Into<Modifier>) -> &mut Self {
        let modifier = modifier.into();
        self.mods.retain(|m| m.name() != modifier.name());
        self.mods.push(modifier);
        self.mods.sort_by_key(Modifier::order);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.mods.iter()
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn notation(&self) -> String {
        self.mods.iter().map(Modifier::notation).collect()
    }
}

impl fmt::Display for ModifierList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

impl FromIterator<Modifier> for ModifierList {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut list = Self::new();
        for modifier in iter {
            list.add(modifier);
        }
        list
    }
}
