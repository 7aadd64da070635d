use thiserror::Error;

use crate::profile::Section;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Candidate '{candidate}' is missing required section: {section}")]
    MissingSection { candidate: String, section: Section },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("No candidates supplied")]
    NoCandidates,

    #[error("Candidate already exists: {0}")]
    DuplicateCandidate(String),

    #[error("Candidate not found: {0}")]
    CandidateNotFound(String),

    #[error("Invalid value for '{field}' in '{owner}': {value}")]
    InvalidValue { owner: String, field: String, value: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Statistical degeneracy: {0}")]
    Degenerate(String),
}
