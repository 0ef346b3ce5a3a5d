pub mod compare;
pub mod description;
pub mod dice;
pub mod error;
pub mod generator;
pub mod group;
mod math;
pub mod modifier;
pub mod parse;
pub mod results;
pub mod roll;

pub type Result<T, E = error::Error> = std::result::Result<T, E>;

pub use error::Error;
pub use roll::DiceRoll;

pub mod prelude {
    pub use crate::compare::{CompareOperator, ComparePoint};
    pub use crate::dice::{Die, FudgeDie, PercentileDie, Rollable, StandardDie};
    pub use crate::generator::{Engine, MaxValue, MinValue, NumberGenerator, RandEngine};
    pub use crate::group::RollGroup;
    pub use crate::modifier::{Modifier, ModifierList};
    pub use crate::results::{ResultGroup, RollResult, RollResults};
    pub use crate::roll::DiceRoll;
    pub use crate::Error;
}

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::generator::{MaxValue, MinValue, NumberGenerator, RandEngine, SequenceEngine};
    use rand::SeedableRng;

    const SEED: u64 = 0x0dd5_eed5;

    pub fn seeded_generator() -> NumberGenerator {
        NumberGenerator::new(RandEngine::new(rand_pcg::Pcg64::seed_from_u64(SEED)))
    }

    pub fn min_generator() -> NumberGenerator {
        NumberGenerator::new(MinValue)
    }

    pub fn max_generator() -> NumberGenerator {
        NumberGenerator::new(MaxValue::new())
    }

    /// Scripts the face values the next rolls will produce, assuming
    /// dice whose lowest face is 1.
    pub fn face_generator(faces: Vec<i64>) -> NumberGenerator {
        NumberGenerator::new(SequenceEngine::faces(1, faces))
    }
}
