use thiserror::Error;

/// Result alias for `vartree`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned when assembling embedding sets or configuring a build.
///
/// Numeric degeneracies (empty groups, zero variance) are never errors; they
/// are substituted with zero where they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty where at least one record was required.
    #[error("empty input provided")]
    EmptyInput,

    /// A feature vector's length disagrees with the set's column count.
    #[error("dimension mismatch: expected {expected}, found {found} (record {index})")]
    DimensionMismatch {
        /// Expected column count.
        expected: usize,
        /// Length of the offending vector.
        found: usize,
        /// Position of the offending record in the input.
        index: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
