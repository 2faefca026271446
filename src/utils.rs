//! Random index generation shared by the samplers.

use rand::distributions::Uniform;
use rand::prelude::*;

/// Uniform integer random-number generator over a configurable range.
///
/// By default this uses an entropy-seeded RNG, but test code can construct
/// it from a fixed seed for reproducible behavior.
pub struct UniformRandomGenerator<T>
where
    T: Copy + rand::distributions::uniform::SampleUniform + PartialOrd,
{
    rng: StdRng,
    dist: Option<Uniform<T>>,
}

impl<T> Default for UniformRandomGenerator<T>
where
    T: Copy + rand::distributions::uniform::SampleUniform + PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UniformRandomGenerator<T>
where
    T: Copy + rand::distributions::uniform::SampleUniform + PartialOrd,
{
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            dist: None,
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            dist: None,
        }
    }

    /// Reset the distribution to the inclusive range `[min, max]`.
    pub fn reset(&mut self, min: T, max: T) {
        self.dist = Some(Uniform::new_inclusive(min, max));
    }

    /// Draw a single value, or `None` if no range has been set.
    pub fn next(&mut self) -> Option<T> {
        let dist = self.dist.as_ref()?;
        Some(self.rng.sample(dist))
    }

    /// Fill `out` with distinct values from `[min, max]`.
    ///
    /// Returns `false` (leaving `out` untouched) when the range holds fewer
    /// values than `out.len()`. Leaves the generator reset to `[min, max]`.
    pub fn gen_unique(&mut self, out: &mut [T], min: T, max: T) -> bool
    where
        T: Eq + TryInto<usize>,
    {
        let span = match (
            TryInto::<usize>::try_into(min),
            TryInto::<usize>::try_into(max),
        ) {
            (Ok(lo), Ok(hi)) if hi >= lo => hi - lo + 1,
            _ => return false,
        };
        if span < out.len() {
            return false;
        }

        self.reset(min, max);
        for i in 0..out.len() {
            loop {
                let Some(candidate) = self.next() else {
                    return false;
                };
                if out[..i].iter().all(|&v| v != candidate) {
                    out[i] = candidate;
                    break;
                }
            }
        }
        true
    }
}
