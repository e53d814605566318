//! Factory dispatch: `get_mo_archive`/`get_cmo_archive` pick the 2D/3D/4D
//! implementation from the dimensionality of the supplied reference point (or
//! the first inserted point), returning a common enum value rather than a
//! `dyn Trait` object — this keeps the `SC`/`SF` scalar parameters
//! monomorphised instead of forcing a trait object that would need to erase
//! them.

use crate::bi_archive::BiObjectiveArchive;
use crate::config::ArchiveConfig;
use crate::constrained::ConstrainedArchive;
use crate::error::ArchiveError;
use crate::scalar::{Computation, Final};
use crate::tree_archive::NAryArchive;

/// A non-dominated archive of 2, 3 or 4 objectives, selected at construction
/// time by [`get_mo_archive`]. Every method here forwards to the matching
/// variant; objective vectors are always `Vec<f64>` at this boundary
/// (the bi-objective archive's `[f64; 2]` is just an implementation detail
/// of the `Bi` variant).
#[derive(Debug, Clone)]
pub enum MultiObjectiveArchive<SC: Computation = f64, SF: Final = f64, Info = ()> {
    /// The 2-objective archive.
    Bi(BiObjectiveArchive<SC, SF, Info>),
    /// The 3-objective archive.
    Tri(NAryArchive<SC, SF, Info>),
    /// The 4-objective archive.
    Quad(NAryArchive<SC, SF, Info>),
}

impl<SC: Computation, SF: Final, Info> MultiObjectiveArchive<SC, SF, Info> {
    /// The reference point, if one was set at construction.
    pub fn reference_point(&self) -> Option<Vec<f64>> {
        match self {
            Self::Bi(a) => a.reference_point().map(|r| r.to_vec()),
            Self::Tri(a) | Self::Quad(a) => a.reference_point().map(|r| r.to_vec()),
        }
    }

    /// The declared dimensionality (2, 3 or 4).
    pub fn dim(&self) -> usize {
        match self {
            Self::Bi(_) => 2,
            Self::Tri(_) => 3,
            Self::Quad(_) => 4,
        }
    }

    /// The number of resident points.
    pub fn len(&self) -> usize {
        match self {
            Self::Bi(a) => a.len(),
            Self::Tri(a) | Self::Quad(a) => a.len(),
        }
    }

    /// `true` if the archive has no resident points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `p`. Returns `true` iff it was actually admitted (non-dominated
    /// and in domain).
    pub fn add(&mut self, p: Vec<f64>, info: Info) -> Result<bool, ArchiveError> {
        match self {
            Self::Bi(a) => {
                let p2 = as_pair(&p)?;
                Ok(a.add(p2, info).is_some())
            }
            Self::Tri(a) | Self::Quad(a) => Ok(a.add(p, info)),
        }
    }

    /// Insert an unsorted batch. Returns the number actually inserted.
    pub fn add_list(&mut self, ps: Vec<Vec<f64>>, infos: Vec<Info>) -> Result<usize, ArchiveError> {
        match self {
            Self::Bi(a) => {
                let pairs = ps.iter().map(as_pair).collect::<Result<Vec<_>, _>>()?;
                Ok(a.add_list(pairs, infos))
            }
            Self::Tri(a) | Self::Quad(a) => Ok(a.add_list(ps, infos)),
        }
    }

    /// Insert a batch sorted ascending by the first objective. Returns the
    /// number actually inserted.
    pub fn merge(&mut self, ps: Vec<Vec<f64>>, infos: Vec<Info>) -> Result<usize, ArchiveError> {
        match self {
            Self::Bi(a) => {
                let pairs = ps.iter().map(as_pair).collect::<Result<Vec<_>, _>>()?;
                Ok(a.merge(pairs, infos))
            }
            Self::Tri(a) | Self::Quad(a) => Ok(a.merge(ps, infos)),
        }
    }

    /// `true` iff `p` is in the reference point's domain.
    pub fn in_domain(&self, p: &[f64]) -> bool {
        match self {
            Self::Bi(a) => a.in_domain(&[p[0], p[1]]),
            Self::Tri(a) | Self::Quad(a) => a.in_domain(p),
        }
    }

    /// `true` iff some resident weakly dominates `p`.
    pub fn dominates(&self, p: &[f64]) -> bool {
        match self {
            Self::Bi(a) => a.dominates(&[p[0], p[1]]),
            Self::Tri(a) | Self::Quad(a) => a.dominates(p),
        }
    }

    /// The hyper-volume w.r.t. the archive's own reference point.
    pub fn hypervolume(&self) -> Result<SF, ArchiveError> {
        match self {
            Self::Bi(a) => a.hypervolume(),
            Self::Tri(a) | Self::Quad(a) => a.hypervolume(),
        }
    }

    /// The ideal-point/weight normalised hyper-volume.
    pub fn hypervolume_normalized(&self) -> Result<SF, ArchiveError> {
        match self {
            Self::Bi(a) => a.hypervolume_normalized(),
            Self::Tri(a) | Self::Quad(a) => a.hypervolume_normalized(),
        }
    }

    /// The uncrowded hyper-volume improvement of `p`.
    pub fn hypervolume_improvement(&self, p: &[f64]) -> Result<SC, ArchiveError> {
        match self {
            Self::Bi(a) => a.hypervolume_improvement(&[p[0], p[1]]),
            Self::Tri(a) | Self::Quad(a) => a.hypervolume_improvement(p),
        }
    }

    /// The non-negative Euclidean distance from `p` to the Pareto front.
    pub fn distance_to_pareto_front(&self, p: &[f64]) -> SF {
        match self {
            Self::Bi(a) => a.distance_to_pareto_front(&[p[0], p[1]]),
            Self::Tri(a) | Self::Quad(a) => a.distance_to_pareto_front(p),
        }
    }

    /// The points removed by the most recently completed `add`.
    pub fn discarded(&self) -> Vec<Vec<f64>> {
        match self {
            Self::Bi(a) => a.discarded().iter().map(|p| p.to_vec()).collect(),
            Self::Tri(a) | Self::Quad(a) => a.discarded().to_vec(),
        }
    }

    /// Remove every resident.
    pub fn clear(&mut self) {
        match self {
            Self::Bi(a) => a.clear(),
            Self::Tri(a) | Self::Quad(a) => a.clear(),
        }
    }

    /// Re-validate the resident set, dropping anything that should have been
    /// evicted. Returns the number removed.
    pub fn prune(&mut self) -> usize {
        match self {
            Self::Bi(a) => a.prune(),
            Self::Tri(a) | Self::Quad(a) => a.prune(),
        }
    }

    /// Iterate over the resident points in ascending-first-objective order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = Vec<f64>> + '_> {
        match self {
            Self::Bi(a) => Box::new(a.iter().map(|p| p.to_vec())),
            Self::Tri(a) | Self::Quad(a) => Box::new(a.iter().map(|p| p.to_vec())),
        }
    }
}

fn as_pair(p: &Vec<f64>) -> Result<[f64; 2], ArchiveError> {
    if p.len() != 2 {
        return Err(ArchiveError::Arity { expected: 2, actual: p.len() });
    }
    Ok([p[0], p[1]])
}

/// Build a [`MultiObjectiveArchive`] of the dimensionality named by
/// `config.reference_point` (2, 3 or 4 coordinates). When no reference point
/// is set, `n_obj` picks the dimensionality explicitly; if that is also
/// absent the first initial point's length is used, falling back to 2.
pub fn get_mo_archive<SC: Computation, SF: Final, Info>(
    initial: Vec<Vec<f64>>,
    infos: Vec<Info>,
    config: ArchiveConfig,
    n_obj: Option<usize>,
) -> Result<MultiObjectiveArchive<SC, SF, Info>, ArchiveError> {
    let dim = config
        .reference_point
        .as_ref()
        .map(|r| r.len())
        .or(n_obj)
        .unwrap_or_else(|| initial.first().map_or(2, |p| p.len()));

    match dim {
        2 => {
            let pairs = initial.iter().map(as_pair).collect::<Result<Vec<_>, _>>()?;
            Ok(MultiObjectiveArchive::Bi(BiObjectiveArchive::new(pairs, infos, config)?))
        }
        3 => Ok(MultiObjectiveArchive::Tri(NAryArchive::new(3, initial, infos, config)?)),
        4 => Ok(MultiObjectiveArchive::Quad(NAryArchive::new(4, initial, infos, config)?)),
        other => Err(ArchiveError::Arity { expected: 2, actual: other }),
    }
}

/// A [`ConstrainedArchive`] wrapping a [`MultiObjectiveArchive`] of the
/// dimensionality named by `config.reference_point`.
pub type ConstrainedMultiObjectiveArchive<SC = f64, SF = f64, Info = ()> =
    ConstrainedArchive<SC, SF, Info>;

/// Build a [`ConstrainedMultiObjectiveArchive`] of the dimensionality named by
/// `config.reference_point` (or `n_obj`, if the reference point is absent),
/// with `n_constraints` constraint coordinates per solution.
pub fn get_cmo_archive<SC: Computation, SF: Final, Info>(
    config: ArchiveConfig,
    n_constraints: usize,
    tau: f64,
    max_g_vals: Option<Vec<f64>>,
    n_obj: Option<usize>,
) -> Result<ConstrainedMultiObjectiveArchive<SC, SF, Info>, ArchiveError> {
    let inner = get_mo_archive(Vec::new(), Vec::new(), config, n_obj)?;
    ConstrainedArchive::new(inner, n_constraints, tau, max_g_vals)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dispatches_on_reference_point_dimension() {
        let a: MultiObjectiveArchive<f64, f64, ()> = get_mo_archive(
            Vec::new(),
            Vec::new(),
            ArchiveConfig::new().with_reference_point(vec![1.0, 1.0]),
            None,
        )
        .unwrap();
        assert_eq!(a.dim(), 2);

        let b: MultiObjectiveArchive<f64, f64, ()> = get_mo_archive(
            Vec::new(),
            Vec::new(),
            ArchiveConfig::new().with_reference_point(vec![1.0, 1.0, 1.0]),
            None,
        )
        .unwrap();
        assert_eq!(b.dim(), 3);

        let c: MultiObjectiveArchive<f64, f64, ()> = get_mo_archive(
            Vec::new(),
            Vec::new(),
            ArchiveConfig::new().with_reference_point(vec![1.0, 1.0, 1.0, 1.0]),
            None,
        )
        .unwrap();
        assert_eq!(c.dim(), 4);
    }

    #[test]
    fn dispatches_on_n_obj_when_reference_point_is_absent() {
        let a: MultiObjectiveArchive<f64, f64, ()> =
            get_mo_archive(Vec::new(), Vec::new(), ArchiveConfig::new(), Some(3)).unwrap();
        assert_eq!(a.dim(), 3);
        assert!(a.reference_point().is_none());
    }

    #[test]
    fn reference_point_takes_priority_over_n_obj() {
        let a: MultiObjectiveArchive<f64, f64, ()> = get_mo_archive(
            Vec::new(),
            Vec::new(),
            ArchiveConfig::new().with_reference_point(vec![1.0, 1.0]),
            Some(4),
        )
        .unwrap();
        assert_eq!(a.dim(), 2);
    }

    #[test]
    fn add_and_hypervolume_round_trip_through_the_enum() {
        let mut a: MultiObjectiveArchive<f64, f64, ()> = get_mo_archive(
            Vec::new(),
            Vec::new(),
            ArchiveConfig::new().with_reference_point(vec![10.0, 10.0]),
            None,
        )
        .unwrap();
        assert!(a.add(vec![1.0, 1.0], ()).unwrap());
        assert_eq!(a.len(), 1);
        assert_eq!(a.hypervolume().unwrap(), 81.0);
    }
}
