//! Error types for fixture generation.

use thiserror::Error;

/// Errors that can occur while building trees, filling histograms, or
/// writing to a container.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// I/O error reading a text fixture or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A branch with this name was already declared in the schema.
    #[error("duplicate branch: {0}")]
    DuplicateBranch(String),

    /// Invalid branch shape (e.g. zero-length fixed array).
    #[error("invalid shape for branch '{branch}': {reason}")]
    InvalidShape {
        /// Branch being declared.
        branch: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A variable-length branch references a counter that is not a
    /// previously declared integer scalar branch.
    #[error("unknown counter '{counter}' for branch '{branch}'")]
    UnknownCounter {
        /// Branch being declared.
        branch: String,
        /// The counter name it referenced.
        counter: String,
    },

    /// Branch not found in the schema.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Staged values do not match the branch's declared leaf type.
    #[error("type mismatch for branch '{branch}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Branch being staged.
        branch: String,
        /// Declared leaf type.
        expected: &'static str,
        /// Leaf type of the staged values.
        actual: &'static str,
    },

    /// Commit attempted with one or more branches left unstaged.
    #[error("incomplete row: missing value for branch '{0}'")]
    IncompleteRow(String),

    /// Staged value count does not match the declared shape (fixed
    /// array length or counter value).
    #[error("length mismatch for branch '{branch}': expected {expected}, got {actual}")]
    LengthMismatch {
        /// Branch being staged or committed.
        branch: String,
        /// Expected element count.
        expected: usize,
        /// Staged element count.
        actual: usize,
    },

    /// Counter branch holds a negative value at commit time.
    #[error("negative counter value for branch '{branch}': {value}")]
    NegativeCounter {
        /// The counter branch.
        branch: String,
        /// Its staged value.
        value: i64,
    },

    /// Invalid histogram binning (empty axis, inverted limits,
    /// non-monotonic edges).
    #[error("binning error: {0}")]
    Binning(String),

    /// Fill attempted on a histogram that was already finalized.
    #[error("histogram '{0}' is finalized and can no longer be filled")]
    FinalizedHistogram(String),

    /// Failure reported by the container writer.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Write attempted after the container was closed.
    #[error("container is closed")]
    ClosedContainer,

    /// Malformed line in a text fixture.
    #[error("text fixture parse error at line {line}: {reason}")]
    FixtureParse {
        /// 1-based line number.
        line: usize,
        /// What failed to parse.
        reason: String,
    },
}

/// Result alias for fixture generation.
pub type Result<T> = std::result::Result<T, FixtureError>;
