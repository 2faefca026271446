//! Core RANSAC traits and the registration driver.
//!
//! The driver repeatedly draws a minimal sample, solves a hypothesis from it,
//! scores the hypothesis against the full point sets and keeps the best one:
//!
//! ```text
//! Idle -> Sampling -> Solving -> Scoring -> (improved? update best) -> Sampling ...
//! ```
//!
//! The loop ends when the iteration budget is exhausted or the termination
//! criterion fires. A [`Ransac`] value holds no state beyond a single search.

use tracing::{debug, trace};

use crate::error::{PointSetRole, RegistrationError};
use crate::scoring::Score;
use crate::types::{MinimalSample, Point, SAMPLE_SIZE, SampleIndices};

/// Estimator responsible for generating hypotheses from minimal samples.
pub trait Estimator {
    /// Model type produced by this estimator.
    type Model: Clone;

    /// Check whether a given sample is geometrically valid.
    fn is_valid_sample(&self, sample: &MinimalSample) -> bool;

    /// Estimate a model from a minimal sample.
    ///
    /// Degenerate samples yield [`RegistrationError::DegenerateSample`].
    fn estimate_model(&self, sample: &MinimalSample) -> Result<Self::Model, RegistrationError>;
}

/// Sampler responsible for drawing minimal sample indices.
pub trait Sampler {
    /// Draw indices for both point sets into `out`.
    ///
    /// Returns `false` if a sample could not be drawn.
    fn sample(&mut self, reference_len: usize, candidate_len: usize, out: &mut SampleIndices)
    -> bool;
}

/// Scoring strategy used to evaluate model quality.
pub trait Scoring<M> {
    /// Score type; ordering decides "better than".
    type Score: Clone + PartialOrd;

    /// Inlier/outlier threshold for residuals.
    fn threshold(&self) -> f64;

    fn score(&self, reference: &[Point], candidate: &[Point], model: &M) -> Self::Score;
}

/// Termination criterion deciding when the RANSAC loop can stop early.
pub trait TerminationCriterion<S> {
    /// Returns `true` if the search should stop with the current best.
    fn check(&mut self, best_score: &S, reference_len: usize, candidate_len: usize) -> bool;
}

/// Stops once the best inlier count exceeds a fraction of the candidate set.
///
/// With `fraction: None` the search always runs its full budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyStopCriterion {
    pub fraction: Option<f64>,
}

impl TerminationCriterion<Score> for EarlyStopCriterion {
    fn check(&mut self, best_score: &Score, _reference_len: usize, candidate_len: usize) -> bool {
        match self.fraction {
            Some(fraction) => best_score.inlier_count as f64 > fraction * candidate_len as f64,
            None => false,
        }
    }
}

/// Hypotheses solved per batch by [`Ransac::run_parallel`].
#[cfg(feature = "parallel")]
pub const PARALLEL_CHUNK_SIZE: usize = 64;

/// Where a search stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RansacStatus {
    Idle,
    Running,
    /// Every iteration of the budget was used.
    Exhausted,
    /// The termination criterion fired.
    EarlyStopped,
}

/// Solve and score a single sample.
fn evaluate<E, Sc>(
    estimator: &E,
    scoring: &Sc,
    reference: &[Point],
    candidate: &[Point],
    indices: Option<SampleIndices>,
) -> Result<(E::Model, Sc::Score), RegistrationError>
where
    E: Estimator,
    Sc: Scoring<E::Model>,
{
    let indices = indices.ok_or(RegistrationError::DegenerateSample(
        "sampler could not draw a sample",
    ))?;
    let sample = MinimalSample::gather(reference, candidate, &indices);
    let model = estimator.estimate_model(&sample)?;
    let score = scoring.score(reference, candidate, &model);
    Ok((model, score))
}

/// RANSAC search over a pair of positionally corresponding point sets.
pub struct Ransac<'a, E, Sa, Sc, T>
where
    E: Estimator,
    Sa: Sampler,
    Sc: Scoring<E::Model>,
    T: TerminationCriterion<Sc::Score>,
{
    reference: &'a [Point],
    candidate: &'a [Point],
    pub max_iterations: usize,
    pub estimator: E,
    pub sampler: Sa,
    pub scoring: Sc,
    pub termination: T,

    // Outputs / diagnostics
    pub best_model: E::Model,
    pub best_score: Sc::Score,
    /// Iteration that produced the best model, `None` while it is the baseline.
    pub best_iteration: Option<usize>,
    pub iteration: usize,
    pub degenerate_samples: usize,
    status: RansacStatus,
}

impl<'a, E, Sa, Sc, T> Ransac<'a, E, Sa, Sc, T>
where
    E: Estimator,
    Sa: Sampler,
    Sc: Scoring<E::Model>,
    Sc::Score: Default + std::fmt::Debug,
    T: TerminationCriterion<Sc::Score>,
{
    /// Create a search. `baseline` is reported when no hypothesis beats the
    /// default score.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reference: &'a [Point],
        candidate: &'a [Point],
        max_iterations: usize,
        estimator: E,
        sampler: Sa,
        scoring: Sc,
        termination: T,
        baseline: E::Model,
    ) -> Result<Self, RegistrationError> {
        if reference.len() < SAMPLE_SIZE {
            return Err(RegistrationError::InsufficientPoints {
                set: PointSetRole::Reference,
                found: reference.len(),
            });
        }
        if candidate.len() < SAMPLE_SIZE {
            return Err(RegistrationError::InsufficientPoints {
                set: PointSetRole::Candidate,
                found: candidate.len(),
            });
        }
        Ok(Self {
            reference,
            candidate,
            max_iterations,
            estimator,
            sampler,
            scoring,
            termination,
            best_model: baseline,
            best_score: Sc::Score::default(),
            best_iteration: None,
            iteration: 0,
            degenerate_samples: 0,
            status: RansacStatus::Idle,
        })
    }

    pub fn status(&self) -> RansacStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            RansacStatus::Exhausted | RansacStatus::EarlyStopped
        )
    }

    /// Run one iteration.
    ///
    /// Returns `None` once the search has finished, otherwise whether the
    /// best hypothesis improved.
    pub fn step(&mut self) -> Option<bool> {
        if self.iteration >= self.max_iterations {
            self.status = RansacStatus::Exhausted;
        }
        if self.is_finished() {
            return None;
        }
        let indices = self.draw();
        let result = evaluate(
            &self.estimator,
            &self.scoring,
            self.reference,
            self.candidate,
            indices,
        );
        Some(self.record(result))
    }

    /// Run until the budget is exhausted or the termination criterion fires.
    pub fn run(&mut self) {
        while self.step().is_some() {}
        debug!(
            iterations = self.iteration,
            best_score = ?self.best_score,
            degenerate_samples = self.degenerate_samples,
            status = ?self.status,
            "ransac finished"
        );
    }

    fn draw(&mut self) -> Option<SampleIndices> {
        let mut indices = SampleIndices::default();
        self.sampler
            .sample(self.reference.len(), self.candidate.len(), &mut indices)
            .then_some(indices)
    }

    /// Fold one evaluated iteration into the search state.
    fn record(&mut self, result: Result<(E::Model, Sc::Score), RegistrationError>) -> bool {
        self.status = RansacStatus::Running;
        let iteration = self.iteration;
        self.iteration += 1;

        let improved = match result {
            Ok((model, score)) if score > self.best_score => {
                debug!(iteration, score = ?score, "new best hypothesis");
                self.best_model = model;
                self.best_score = score;
                self.best_iteration = Some(iteration);
                true
            }
            Ok(_) => false,
            Err(err) => {
                trace!(iteration, %err, "hypothesis rejected");
                self.degenerate_samples += 1;
                false
            }
        };

        if improved
            && self.termination.check(
                &self.best_score,
                self.reference.len(),
                self.candidate.len(),
            )
        {
            debug!(iteration, "early stop");
            self.status = RansacStatus::EarlyStopped;
        } else if self.iteration >= self.max_iterations {
            self.status = RansacStatus::Exhausted;
        }
        improved
    }
}

#[cfg(feature = "parallel")]
impl<'a, E, Sa, Sc, T> Ransac<'a, E, Sa, Sc, T>
where
    E: Estimator + Sync,
    E::Model: Send,
    Sa: Sampler,
    Sc: Scoring<E::Model> + Sync,
    Sc::Score: Default + std::fmt::Debug + Send,
    T: TerminationCriterion<Sc::Score>,
{
    /// Like [`run`](Self::run), solving and scoring hypotheses on the rayon pool.
    ///
    /// Samples are drawn in chunks of [`PARALLEL_CHUNK_SIZE`] in iteration
    /// order and each chunk is folded back in that order, so the outcome
    /// matches `run` for the same sampler state. No further chunk is drawn
    /// once the search has finished.
    pub fn run_parallel(&mut self) {
        use rayon::prelude::*;

        while !self.is_finished() {
            let remaining = self.max_iterations.saturating_sub(self.iteration);
            if remaining == 0 {
                self.status = RansacStatus::Exhausted;
                break;
            }
            let chunk = remaining.min(PARALLEL_CHUNK_SIZE);
            let samples: Vec<Option<SampleIndices>> = (0..chunk).map(|_| self.draw()).collect();

            let (estimator, scoring) = (&self.estimator, &self.scoring);
            let (reference, candidate) = (self.reference, self.candidate);
            let results: Vec<_> = samples
                .into_par_iter()
                .map(|indices| evaluate(estimator, scoring, reference, candidate, indices))
                .collect();

            for result in results {
                self.record(result);
                if self.is_finished() {
                    break;
                }
            }
        }
        debug!(
            iterations = self.iteration,
            best_score = ?self.best_score,
            degenerate_samples = self.degenerate_samples,
            status = ?self.status,
            "parallel ransac finished"
        );
    }
}
