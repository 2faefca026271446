//! Uniform random sampler drawing minimal samples without replacement.

use crate::core::Sampler;
use crate::types::{SAMPLE_SIZE, SampleIndices};
use crate::utils::UniformRandomGenerator;

/// How the indices of the two point sets relate within one minimal sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Both sets use the same three indices, drawn from the common prefix.
    #[default]
    Shared,
    /// Each set gets its own three indices, drawn over its full length.
    Independent,
}

/// Uniform random sampler drawing three distinct indices per set.
pub struct UniformRandomSampler {
    rng: UniformRandomGenerator<usize>,
    strategy: SamplingStrategy,
}

impl Default for UniformRandomSampler {
    fn default() -> Self {
        Self::new(SamplingStrategy::default())
    }
}

impl UniformRandomSampler {
    /// Construct a new sampler with a random seed.
    pub fn new(strategy: SamplingStrategy) -> Self {
        Self {
            rng: UniformRandomGenerator::new(),
            strategy,
        }
    }

    /// Construct a sampler from a fixed seed.
    pub fn from_seed(strategy: SamplingStrategy, seed: u64) -> Self {
        Self {
            rng: UniformRandomGenerator::from_seed(seed),
            strategy,
        }
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }
}

impl Sampler for UniformRandomSampler {
    fn sample(
        &mut self,
        reference_len: usize,
        candidate_len: usize,
        out: &mut SampleIndices,
    ) -> bool {
        match self.strategy {
            SamplingStrategy::Shared => {
                let n = reference_len.min(candidate_len);
                if n < SAMPLE_SIZE {
                    return false;
                }
                let mut indices = [0usize; SAMPLE_SIZE];
                if !self.rng.gen_unique(&mut indices, 0, n - 1) {
                    return false;
                }
                out.reference = indices;
                out.candidate = indices;
                true
            }
            SamplingStrategy::Independent => {
                if reference_len < SAMPLE_SIZE || candidate_len < SAMPLE_SIZE {
                    return false;
                }
                self.rng
                    .gen_unique(&mut out.reference, 0, reference_len - 1)
                    && self
                        .rng
                        .gen_unique(&mut out.candidate, 0, candidate_len - 1)
            }
        }
    }
}
