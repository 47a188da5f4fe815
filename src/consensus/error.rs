use thiserror::Error;

/// Failures that abort a consensus build. Degenerate data (no coverage,
/// filtered columns) is never an error and is reported through the calls.
#[derive(Error, Debug, PartialEq)]
pub enum ConsensusError {
    #[error("Malformed observation: {0}")]
    Format(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Pileup error: {0}")]
    Pileup(String),

    #[error("Reference error: {0}")]
    Reference(String),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
