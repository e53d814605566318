use crate::error::ArchiveError;

/// Construction-time configuration shared by every archive in this crate.
///
/// Bundles per-archive settings such as the reference point, normalisation
/// inputs, and debug-mode checks into a single value fixed when the archive
/// is created, rather than mutable globals toggled after the fact.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchiveConfig {
    /// The reference point `r`. Hyper-volume queries are undefined (return
    /// [`ArchiveError::NotInitialized`]) until this is set. Immutable once the
    /// archive is constructed.
    pub reference_point: Option<Vec<f64>>,
    /// The ideal point, used only to normalise indicator reads; never mutates
    /// stored objective vectors.
    pub ideal_point: Option<Vec<f64>>,
    /// Per-objective weights, used only to normalise indicator reads.
    pub weights: Option<Vec<f64>>,
    /// Set by callers that already know their initial list is sorted by the
    /// first objective ascending, to skip the O(n log n) presort.
    pub presorted: bool,
    /// Run the debug-mode self-check (sortedness, non-domination, dimension
    /// consistency) after every mutating call. Expensive; intended for tests
    /// and development, not hot loops.
    pub check_invariants: bool,
}

impl ArchiveConfig {
    /// A configuration with no reference point, ideal point or weights, and no
    /// presort hint. Equivalent to the `Default` impl, spelled out for call sites
    /// that want to be explicit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference point.
    pub fn with_reference_point(mut self, r: Vec<f64>) -> Self {
        self.reference_point = Some(r);
        self
    }

    /// Set the ideal point.
    pub fn with_ideal_point(mut self, ideal: Vec<f64>) -> Self {
        self.ideal_point = Some(ideal);
        self
    }

    /// Set per-objective weights.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Mark the initial list as already sorted ascending by the first objective.
    pub fn presorted(mut self, value: bool) -> Self {
        self.presorted = value;
        self
    }

    /// Enable the debug-mode invariant self-check.
    pub fn check_invariants(mut self, value: bool) -> Self {
        self.check_invariants = value;
        self
    }

    /// Validate that `r`, the ideal point and the weights (whichever are set)
    /// all have exactly `n_obj` coordinates.
    pub(crate) fn validate_dimension(&self, n_obj: usize) -> Result<(), ArchiveError> {
        if let Some(r) = &self.reference_point {
            if r.len() != n_obj {
                return Err(ArchiveError::Arity {
                    expected: n_obj,
                    actual: r.len(),
                });
            }
        }
        if let Some(ideal) = &self.ideal_point {
            if ideal.len() != n_obj {
                return Err(ArchiveError::Arity {
                    expected: n_obj,
                    actual: ideal.len(),
                });
            }
        }
        if let Some(weights) = &self.weights {
            if weights.len() != n_obj {
                return Err(ArchiveError::Arity {
                    expected: n_obj,
                    actual: weights.len(),
                });
            }
        }
        Ok(())
    }
}
