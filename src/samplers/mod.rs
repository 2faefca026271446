//! Sampling strategies for minimal samples.

pub mod uniform;

pub use uniform::{SamplingStrategy, UniformRandomSampler};
