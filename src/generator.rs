use rand::rngs::{OsRng, ThreadRng};
use rand::{Rng, SeedableRng};
use rand_mt::Mt64;

/// A source of uniform indexes for the [NumberGenerator].
///
/// Before each draw the generator calls [set_range](Engine::set_range)
/// with the number of distinct outcomes it wants; [next](Engine::next)
/// must then return an index in `[0, range)`. Deterministic engines may
/// ignore the hint ([MinValue]) or use it to pin the extreme ([MaxValue]).
pub trait Engine {
    fn set_range(&mut self, _range: u64) {}

    fn next(&mut self) -> u64;
}

/// Adapts any `rand` RNG to the [Engine] contract.
#[derive(Debug, Clone)]
pub struct RandEngine<R> {
    rng: R,
    range: u64,
}

impl<R: Rng> RandEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, range: 1 }
    }
}

impl RandEngine<ThreadRng> {
    /// The platform-default engine.
    pub fn native() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandEngine<OsRng> {
    /// The operating system's cryptographic source.
    pub fn crypto() -> Self {
        Self::new(OsRng)
    }
}

impl RandEngine<Mt64> {
    /// A Mersenne Twister seeded from system entropy.
    pub fn mersenne_twister() -> Self {
        Self::new(Mt64::from_entropy())
    }

    /// A Mersenne Twister with a caller-supplied seed, for reproducible
    /// streams.
    pub fn seeded_mersenne_twister(seed: u64) -> Self {
        Self::new(Mt64::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine for RandEngine<R> {
    fn set_range(&mut self, range: u64) {
        self.range = range.max(1);
    }

    fn next(&mut self) -> u64 {
        self.rng.gen_range(0..self.range)
    }
}

/// Always yields the lowest possible index.
#[derive(Debug, Default, Copy, Clone)]
pub struct MinValue;

impl Engine for MinValue {
    fn next(&mut self) -> u64 {
        0
    }
}

/// Always yields the highest index the range hint allows.
#[derive(Debug, Copy, Clone)]
pub struct MaxValue {
    range: u64,
}

impl Default for MaxValue {
    fn default() -> Self {
        Self { range: 1 }
    }
}

impl MaxValue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for MaxValue {
    fn set_range(&mut self, range: u64) {
        self.range = range.max(1);
    }

    fn next(&mut self) -> u64 {
        self.range - 1
    }
}

/// Uniform integer and real sampling over a swappable [Engine].
pub struct NumberGenerator {
    engine: Box<dyn Engine>,
}

impl NumberGenerator {
    pub fn new<E: Engine + 'static>(engine: E) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    /// Replaces the engine, leaving any in-progress state of the old one
    /// behind.
    pub fn set_engine<E: Engine + 'static>(&mut self, engine: E) {
        self.engine = Box::new(engine);
    }

    /// A uniform integer in `[min, max]`, both ends inclusive.
    pub fn integer(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max);
        let span = max.wrapping_sub(min) as u64 + 1;
        self.engine.set_range(span);
        min.wrapping_add((self.engine.next() % span) as i64)
    }

    /// A uniform float in `[min, max)`, or `[min, max]` when `inclusive`.
    pub fn real(&mut self, min: f64, max: f64, inclusive: bool) -> f64 {
        const STEPS: u64 = 1 << 53;
        self.engine
            .set_range(if inclusive { STEPS + 1 } else { STEPS });
        let index = self.engine.next();
        min + (max - min) * (index as f64 / STEPS as f64)
    }
}

impl Default for NumberGenerator {
    fn default() -> Self {
        Self::new(RandEngine::native())
    }
}

#[cfg(test)]
pub(crate) use sequence::SequenceEngine;
