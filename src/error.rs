use thiserror::Error;

/// Which of the two input point sets an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSetRole {
    Reference,
    Candidate,
}

impl std::fmt::Display for PointSetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointSetRole::Reference => write!(f, "reference"),
            PointSetRole::Candidate => write!(f, "candidate"),
        }
    }
}

/// Errors that can occur while loading point sets or registering them.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Centroid of zero points.
    #[error("cannot compute the centroid of an empty point set")]
    EmptyInput,
    /// Fewer than three points in one of the sets.
    #[error("{set} point set needs at least 3 points, got {found}")]
    InsufficientPoints { set: PointSetRole, found: usize },
    /// Minimal sample with no well-defined rotation.
    ///
    /// Recovered inside the RANSAC loop; never returned by `register`.
    #[error("degenerate sample: {0}")]
    DegenerateSample(&'static str),
    /// Malformed point record.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
