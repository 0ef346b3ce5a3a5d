use std::fmt;

/// A marker left on a roll (or group) by a modifier that affected it.
///
/// Serialized by [name](Flag::name); rendered in output strings by
/// [symbol](Flag::symbol).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Flag {
    Compound,
    CriticalFailure,
    CriticalSuccess,
    Drop,
    Explode,
    Max,
    Min,
    Penetrate,
    ReRoll,
    ReRollOnce,
    TargetFailure,
    TargetSuccess,
    Unique,
    UniqueOnce,
}

impl Flag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Compound => "compound",
            Self::CriticalFailure => "critical-failure",
            Self::CriticalSuccess => "critical-success",
            Self::Drop => "drop",
            Self::Explode => "explode",
            Self::Max => "max",
            Self::Min => "min",
            Self::Penetrate => "penetrate",
            Self::ReRoll => "re-roll",
            Self::ReRollOnce => "re-roll-once",
            Self::TargetFailure => "target-failure",
            Self::TargetSuccess => "target-success",
            Self::Unique => "unique",
            Self::UniqueOnce => "unique-once",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Compound => "!",
            Self::CriticalFailure => "__",
            Self::CriticalSuccess => "**",
            Self::Drop => "d",
            Self::Explode => "!",
            Self::Max => "v",
            Self::Min => "^",
            Self::Penetrate => "p",
            Self::ReRoll => "r",
            Self::ReRollOnce => "ro",
            Self::TargetFailure => "_",
            Self::TargetSuccess => "*",
            Self::Unique => "u",
            Self::UniqueOnce => "uo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "compound" => Self::Compound,
            "critical-failure" => Self::CriticalFailure,
            "critical-success" => Self::CriticalSuccess,
            "drop" => Self::Drop,
            "explode" => Self::Explode,
            "max" => Self::Max,
            "min" => Self::Min,
            "penetrate" => Self::Penetrate,
            "re-roll" => Self::ReRoll,
            "re-roll-once" => Self::ReRollOnce,
            "target-failure" => Self::TargetFailure,
            "target-success" => Self::TargetSuccess,
            "unique" => Self::Unique,
            "unique-once" => Self::UniqueOnce,
            _ => return None,
        })
    }
}

/// An insertion-ordered, duplicate-free set of [Flag]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet(Vec<Flag>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: Flag) {
        if !self.0.contains(&flag) {
            self.0.push(flag);
        }
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|f| f.name()).collect()
    }

    /// The concatenated symbols, in insertion order.
    pub fn symbols(&self) -> String {
        self.0.iter().map(|f| f.symbol()).collect()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols())
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}
