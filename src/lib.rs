//! `hv-archive`: a non-dominated archive for 2-, 3- and 4-objective problems,
//! with incremental hyper-volume bookkeeping and uncrowded-hyper-volume-
//! improvement (UHVI) queries.
//!
//! The bi-objective archive ([`BiObjectiveArchive`]) is the hard-engineering
//! core: a sorted staircase of non-dominated `(f1, f2)` pairs with an exact,
//! incrementally maintained hyper-volume cache. The 3D/4D archive
//! ([`NAryArchive`]) shares its public contract but keys residents in a
//! [`std::collections::BTreeMap`] on the first objective instead, since the
//! 2D staircase invariant no longer holds once a third objective is added.
//! [`ConstrainedArchive`] wraps either one to add feasibility filtering and
//! the HV+/HV+c indicators. [`get_mo_archive`]/[`get_cmo_archive`] dispatch to
//! the right dimensionality from a reference point's length.
//!
//! Two scalar type parameters run through every archive: `SC` ("ScalarC",
//! see [`scalar::Computation`]) accumulates hyper-volume deltas, and `SF`
//! ("ScalarF", see [`scalar::Final`]) is what queries hand back to the
//! caller. Both default to `f64`; [`scalar::ExactRational`] is available as an
//! exact `SC` for callers who want hyper-volume bookkeeping free of
//! floating-point drift.

pub use bi_archive::BiObjectiveArchive;
pub use config::ArchiveConfig;
pub use constrained::ConstrainedArchive;
pub use error::ArchiveError;
pub use factory::{get_cmo_archive, get_mo_archive, ConstrainedMultiObjectiveArchive, MultiObjectiveArchive};
pub use scalar::{Computation, ExactRational, Final};
pub use tree_archive::NAryArchive;

pub mod bi_archive;
pub mod config;
pub mod constrained;
pub mod dominance;
pub mod error;
pub mod factory;
pub mod indicator;
pub mod scalar;
pub mod tree_archive;
