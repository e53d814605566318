use thiserror::Error;

/// Errors raised by the archive, metric and wrapper types in this crate.
///
/// Dominated or out-of-domain candidates passed to `add`/`add_list`/`merge` are
/// **not** errors: they are reported through the ordinary return value (`None`,
/// or a zero count) as spelled out on each method.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArchiveError {
    /// A hyper-volume-based query was made before a reference point was set.
    #[error("the archive has no reference point; hyper-volume queries are undefined until one is set")]
    NotInitialized,

    /// A point or constraint vector had the wrong number of coordinates.
    #[error("expected a vector of length {expected}, got {actual}")]
    Arity {
        /// The required length (the archive's declared dimensionality).
        expected: usize,
        /// The length actually supplied.
        actual: usize,
    },

    /// An index-based query was made with an index beyond the archive's length.
    #[error("index {index} is out of range for an archive of length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The archive's length at the time of the query.
        len: usize,
    },

    /// A self-check (only run when `ArchiveConfig::check_invariants` is set)
    /// found that the archive violated one of its structural invariants. This is
    /// always a bug in this crate, never a caller error.
    #[error("archive invariant violated: {0}")]
    Inconsistent(String),
}
