use crate::description::Description;
use crate::error::Error;
use crate::generator::NumberGenerator;
use crate::modifier::{ModifierContext, ModifierList};
use crate::results::{RollResult, RollResults};
use crate::Result;
use std::fmt;

/// The largest quantity of dice a single term may roll.
pub const MAX_QTY: i64 = 999;

/// How a die draws one raw value from the generator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sampler {
    Range { min: i64, max: i64 },
    Fudge { non_blanks: u8 },
}

impl Sampler {
    pub(crate) fn sample(&self, gen: &mut NumberGenerator) -> i64 {
        match *self {
            Self::Range { min, max } => gen.integer(min, max),
            Self::Fudge { non_blanks: 2 } => gen.integer(1, 3) - 2,
            Self::Fudge { .. } => match gen.integer(1, 6) {
                1 => -1,
                6 => 1,
                _ => 0,
            },
        }
    }
}

#[enum_dispatch::enum_dispatch]
pub trait Rollable {
    fn qty(&self) -> u16;

    fn min(&self) -> i64;

    fn max(&self) -> i64;

    fn sides_notation(&self) -> String;

    fn sampler(&self) -> Sampler;

    fn modifiers(&self) -> &ModifierList;

    fn description(&self) -> Option<&Description>;

    fn roll_once(&self, gen: &mut NumberGenerator) -> RollResult {
        RollResult::new(self.sampler().sample(gen))
    }

    /// Samples `qty` results, then applies the die's modifiers in
    /// pipeline order.
    fn roll(&self, gen: &mut NumberGenerator) -> Result<RollResults> {
        let mut results: RollResults = (0..self.qty()).map(|_| self.roll_once(gen)).collect();
        let mut ctx = ModifierContext::new(self.min(), self.max(), self.sampler(), gen);
        for modifier in self.modifiers().iter() {
            modifier.run_on_rolls(&mut results, &mut ctx)?;
        }
        Ok(results)
    }

    fn notation(&self) -> String {
        format!(
            "{}d{}{}",
            self.qty(),
            self.sides_notation(),
            self.modifiers().notation()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch::enum_dispatch(Rollable)]
pub enum Die {
    Standard(StandardDie),
    Percentile(PercentileDie),
    Fudge(FudgeDie),
}

impl Die {
    pub fn with_modifiers(self, modifiers: ModifierList) -> Self {
        match self {
            Self::Standard(d) => Self::Standard(d.with_modifiers(modifiers)),
            Self::Percentile(d) => Self::Percentile(d.with_modifiers(modifiers)),
            Self::Fudge(d) => Self::Fudge(d.with_modifiers(modifiers)),
        }
    }

    pub fn with_description(self, description: Description) -> Self {
        match self {
            Self::Standard(d) => Self::Standard(d.with_description(description)),
            Self::Percentile(d) => Self::Percentile(d.with_description(description)),
            Self::Fudge(d) => Self::Fudge(d.with_description(description)),
        }
    }

    pub(crate) fn set_description_if_empty(&mut self, description: Description) {
        let slot = match self {
            Self::Standard(d) => &mut d.description,
            Self::Percentile(d) => &mut d.description,
            Self::Fudge(d) => &mut d.description,
        };
        if slot.is_none() {
            *slot = Some(description);
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

fn check_qty(qty: i64) -> Result<u16> {
    if (1..=MAX_QTY).contains(&qty) {
        Ok(qty as u16)
    } else {
        Err(Error::out_of_range(
            "die quantity",
            format!("must be between 1 and {}, got {}", MAX_QTY, qty),
        ))
    }
}

/// A polyhedral die with a fixed number of sides.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardDie {
    qty: u16,
    sides: u32,
    min: i64,
    max: i64,
    modifiers: ModifierList,
    description: Option<Description>,
}

impl StandardDie {
    pub fn new(qty: i64, sides: i64) -> Result<Self> {
        if sides < 1 {
            return Err(Error::out_of_range(
                "die sides",
                format!("must be at least 1, got {}", sides),
            ));
        }
        Ok(Self {
            qty: check_qty(qty)?,
            sides: sides as u32,
            min: 1,
            max: sides,
            modifiers: ModifierList::new(),
            description: None,
        })
    }

    /// Overrides the default 1..=sides face range.
    pub fn with_range(mut self, min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(Error::invalid_argument(
                "die range",
                format!("minimum {} exceeds maximum {}", min, max),
            ));
        }
        self.min = min;
        self.max = max;
        Ok(self)
    }

    pub fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }
}

impl Rollable for StandardDie {
    fn qty(&self) -> u16 {
        self.qty
    }

    fn min(&self) -> i64 {
        self.min
    }

    fn max(&self) -> i64 {
        self.max
    }

    fn sides_notation(&self) -> String {
        self.sides.to_string()
    }

    fn sampler(&self) -> Sampler {
        Sampler::Range {
            min: self.min,
            max: self.max,
        }
    }

    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }
}

/// A d100, rendered as `d%` unless configured otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileDie {
    qty: u16,
    sides_as_number: bool,
    modifiers: ModifierList,
    description: Option<Description>,
}

impl PercentileDie {
    pub fn new(qty: i64) -> Result<Self> {
        Ok(Self {
            qty: check_qty(qty)?,
            sides_as_number: false,
            modifiers: ModifierList::new(),
            description: None,
        })
    }

    pub fn with_sides_as_number(mut self) -> Self {
        self.sides_as_number = true;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }
}

impl Rollable for PercentileDie {
    fn qty(&self) -> u16 {
        self.qty
    }

    fn min(&self) -> i64 {
        1
    }

    fn max(&self) -> i64 {
        100
    }

    fn sides_notation(&self) -> String {
        if self.sides_as_number {
            "100".to_string()
        } else {
            "%".to_string()
        }
    }

    fn sampler(&self) -> Sampler {
        Sampler::Range { min: 1, max: 100 }
    }

    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }
}

/// A fudge/Fate die: faces −1, 0, +1.
///
/// `non_blanks = 2` is the common two-of-each die; `non_blanks = 1` has
/// a single + and − face among six.
#[derive(Debug, Clone, PartialEq)]
pub struct FudgeDie {
    qty: u16,
    non_blanks: u8,
    modifiers: ModifierList,
    description: Option<Description>,
}

impl FudgeDie {
    pub fn new(qty: i64, non_blanks: i64) -> Result<Self> {
        if !matches!(non_blanks, 1 | 2) {
            return Err(Error::out_of_range(
                "fudge die non-blanks",
                format!("must be 1 or 2, got {}", non_blanks),
            ));
        }
        Ok(Self {
            qty: check_qty(qty)?,
            non_blanks: non_blanks as u8,
            modifiers: ModifierList::new(),
            description: None,
        })
    }

    pub fn non_blanks(&self) -> u8 {
        self.non_blanks
    }

    pub fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }
}

impl Rollable for FudgeDie {
    fn qty(&self) -> u16 {
        self.qty
    }

    fn min(&self) -> i64 {
        -1
    }

    fn max(&self) -> i64 {
        1
    }

    fn sides_notation(&self) -> String {
        format!("F.{}", self.non_blanks)
    }

    fn sampler(&self) -> Sampler {
        Sampler::Fudge {
            non_blanks: self.non_blanks,
        }
    }

    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }
}
