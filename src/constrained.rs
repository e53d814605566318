//! The constrained archive wrapper: wraps any [`MultiObjectiveArchive`] and
//! carries a parallel array of constraint vectors, computing the
//! hypervolume-plus (HV+) and constrained hypervolume-plus (HV+c)
//! indicators.
//!
//! A solution is feasible iff every constraint coordinate is `<= 0`.
//! Infeasible solutions are never resident in the inner archive, but the
//! wrapper keeps their objective vectors (and constraint vectors) around so
//! HV+/HV+c can still report a useful signal when the archive has no
//! feasible solution at all.

use crate::error::ArchiveError;
use crate::factory::MultiObjectiveArchive;
use crate::scalar::{Computation, Final};

/// Wraps a [`MultiObjectiveArchive`] with per-solution feasibility.
#[derive(Debug, Clone)]
pub struct ConstrainedArchive<SC: Computation = f64, SF: Final = f64, Info = ()> {
    inner: MultiObjectiveArchive<SC, SF, Info>,
    n_constraints: usize,
    /// Objective vectors of solutions rejected for infeasibility. Needed
    /// (alongside [`Self::infeasible_constraints`]) to compute HV+/HV+c when
    /// the inner archive has no feasible resident.
    infeasible: Vec<Vec<f64>>,
    infeasible_constraints: Vec<Vec<f64>>,
    /// The weight applied to the normalised constraint-violation term in
    /// HV+c (`τ`).
    tau: f64,
    /// Optional per-constraint normalisation divisors for HV+c.
    max_g_vals: Option<Vec<f64>>,
}

impl<SC: Computation, SF: Final, Info> ConstrainedArchive<SC, SF, Info> {
    /// Wrap `inner` (initially empty or already populated with feasible
    /// solutions only) with constraint bookkeeping. `n_constraints` is the
    /// length every constraint vector passed to [`Self::add`] must have.
    pub fn new(
        inner: MultiObjectiveArchive<SC, SF, Info>,
        n_constraints: usize,
        tau: f64,
        max_g_vals: Option<Vec<f64>>,
    ) -> Result<Self, ArchiveError> {
        if let Some(max_g) = &max_g_vals {
            if max_g.len() != n_constraints {
                return Err(ArchiveError::Arity { expected: n_constraints, actual: max_g.len() });
            }
        }
        Ok(Self {
            inner,
            n_constraints,
            infeasible: Vec::new(),
            infeasible_constraints: Vec::new(),
            tau,
            max_g_vals,
        })
    }

    /// The wrapped archive.
    pub fn inner(&self) -> &MultiObjectiveArchive<SC, SF, Info> {
        &self.inner
    }

    /// `true` iff every coordinate of `constraints` is `<= 0`.
    pub fn is_feasible(constraints: &[f64]) -> bool {
        constraints.iter().all(|g| *g <= 0.0)
    }

    /// Insert `p` with its constraint vector. Feasible solutions are
    /// delegated to the inner archive (so dominance/hyper-volume bookkeeping
    /// runs exactly as it would on an unconstrained archive); infeasible
    /// solutions are stashed separately and never compete for residency.
    /// Returns `true` iff `p` was admitted to the inner archive (always
    /// `false` for an infeasible solution).
    pub fn add(&mut self, p: Vec<f64>, constraints: Vec<f64>, info: Info) -> Result<bool, ArchiveError> {
        if constraints.len() != self.n_constraints {
            return Err(ArchiveError::Arity { expected: self.n_constraints, actual: constraints.len() });
        }
        if Self::is_feasible(&constraints) {
            self.inner.add(p, info)
        } else {
            log::trace!("constrained archive: rejected infeasible candidate {p:?}");
            self.infeasible.push(p);
            self.infeasible_constraints.push(constraints);
            Ok(false)
        }
    }

    /// The number of feasible (resident) solutions.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` iff there are no feasible residents (infeasible solutions may
    /// still be tracked).
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// `true` iff at least one feasible solution is resident.
    pub fn has_feasible(&self) -> bool {
        !self.inner.is_empty()
    }

    /// The hyper-volume: the inner archive's hyper-volume if any feasible
    /// solution exists, else zero.
    pub fn hypervolume(&self) -> Result<SF, ArchiveError> {
        if self.has_feasible() {
            self.inner.hypervolume()
        } else {
            Ok(SF::from_f64(0.0))
        }
    }

    /// The ideal-point/weight normalised hyper-volume, honouring the same
    /// normalisation as the inner archive.
    pub fn hypervolume_normalized(&self) -> Result<SF, ArchiveError> {
        if self.has_feasible() {
            self.inner.hypervolume_normalized()
        } else {
            Ok(SF::from_f64(0.0))
        }
    }

    /// The Euclidean distance from `q` to the reference point's dominated
    /// rectangle: zero if `q` is already inside it, else the norm of the
    /// per-axis overshoot past `r`.
    fn distance_to_rectangle(q: &[f64], r: &[f64]) -> f64 {
        q.iter()
            .zip(r)
            .map(|(qi, ri)| (qi - ri).max(0.0).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// The normalised constraint violation for one solution: the Euclidean
    /// norm of the positive part of each constraint, each divided by
    /// [`Self::max_g_vals`]'s matching entry when set.
    fn normalized_violation(&self, g: &[f64]) -> f64 {
        g.iter()
            .enumerate()
            .map(|(i, gi)| {
                let scale = self.max_g_vals.as_ref().map_or(1.0, |m| m[i]);
                (gi / scale).max(0.0).powi(2)
            })
            .sum::<f64>()
            .sqrt()
    }

    /// The hyper-volume-plus indicator (HV+): `hypervolume` if
    /// any feasible solution exists; otherwise the negation of the minimum
    /// Euclidean distance from any infeasible resident's objective vector to
    /// the reference point's dominated rectangle, or `-infinity` if nothing
    /// has ever been archived (feasible or not). Requires the inner archive
    /// to have a reference point.
    pub fn hypervolume_plus(&self) -> Result<SF, ArchiveError> {
        if self.has_feasible() {
            return self.hypervolume();
        }
        let r = self.inner.reference_point().ok_or(ArchiveError::NotInitialized)?;
        if self.infeasible.is_empty() {
            return Ok(SF::from_f64(f64::NEG_INFINITY));
        }
        let min_distance = self
            .infeasible
            .iter()
            .map(|q| Self::distance_to_rectangle(q, &r))
            .fold(f64::INFINITY, f64::min);
        Ok(SF::from_f64(-min_distance))
    }

    /// The constrained hyper-volume-plus indicator (HV+c): like
    /// HV+ when feasible solutions exist; otherwise the negation of
    /// `max(min_distance_to_feasible, tau * min_normalized_violation)`, where
    /// both minima range over every infeasible resident. `-infinity` if
    /// nothing has ever been archived. Requires the inner archive to have a
    /// reference point.
    pub fn hypervolume_plus_constr(&self) -> Result<SF, ArchiveError> {
        if self.has_feasible() {
            return self.hypervolume();
        }
        let r = self.inner.reference_point().ok_or(ArchiveError::NotInitialized)?;
        if self.infeasible.is_empty() {
            return Ok(SF::from_f64(f64::NEG_INFINITY));
        }
        let min_distance = self
            .infeasible
            .iter()
            .map(|q| Self::distance_to_rectangle(q, &r))
            .fold(f64::INFINITY, f64::min);
        let min_violation = self
            .infeasible_constraints
            .iter()
            .map(|g| self.normalized_violation(g))
            .fold(f64::INFINITY, f64::min);
        let penalty = min_distance.max(self.tau * min_violation);
        Ok(SF::from_f64(-penalty))
    }

    /// The infeasible objective vectors archived so far, most-recent last.
    pub fn infeasible(&self) -> &[Vec<f64>] {
        &self.infeasible
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ArchiveConfig;
    use float_cmp::assert_approx_eq;

    fn archive3d() -> MultiObjectiveArchive<f64, f64, ()> {
        MultiObjectiveArchive::Tri(
            crate::tree_archive::NAryArchive::empty(
                3,
                ArchiveConfig::new().with_reference_point(vec![5.0, 5.0, 5.0]),
            )
            .unwrap(),
        )
    }

    #[test]
    /// Infeasible candidates are tracked but never admitted as residents.
    fn scenario_constrained_3d_archive() {
        let mut a = ConstrainedArchive::<f64, f64, ()>::new(archive3d(), 2, 1.0, None).unwrap();
        let objectives = [[1.0, 2.0, 3.0], [1.0, 3.0, 4.0], [4.0, 3.0, 2.0], [1.0, 3.0, 0.0]];
        let constraints = [[3.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 1.0]];
        for (obj, g) in objectives.iter().zip(constraints) {
            a.add(obj.to_vec(), g.to_vec(), ()).unwrap();
        }
        let mut residents: Vec<Vec<f64>> = a.inner().iter().collect();
        residents.sort_by(|x, y| x.partial_cmp(y).unwrap());
        let mut expected = vec![vec![4.0, 3.0, 2.0], vec![1.0, 3.0, 4.0]];
        expected.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(residents, expected);
    }

    #[test]
    fn hypervolume_plus_is_hypervolume_when_feasible_exists() {
        let mut a = ConstrainedArchive::<f64, f64, ()>::new(archive3d(), 1, 1.0, None).unwrap();
        a.add(vec![1.0, 1.0, 1.0], vec![-1.0], ()).unwrap();
        let hv = a.hypervolume().unwrap();
        let hv_plus = a.hypervolume_plus().unwrap();
        assert_approx_eq!(f64, hv, hv_plus, epsilon = 1e-9);
    }

    #[test]
    fn hypervolume_plus_is_negative_distance_when_all_infeasible() {
        let mut a = ConstrainedArchive::<f64, f64, ()>::new(archive3d(), 1, 1.0, None).unwrap();
        a.add(vec![6.0, 6.0, 6.0], vec![1.0], ()).unwrap();
        let hv_plus = a.hypervolume_plus().unwrap();
        assert!(hv_plus < 0.0);
        let expected = -((1.0_f64).powi(2) * 3.0).sqrt();
        assert_approx_eq!(f64, hv_plus, expected, epsilon = 1e-9);
    }

    #[test]
    fn hypervolume_plus_is_negative_infinity_when_never_archived() {
        let a = ConstrainedArchive::<f64, f64, ()>::new(archive3d(), 1, 1.0, None).unwrap();
        assert_eq!(a.hypervolume_plus().unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn hypervolume_plus_constr_applies_tau_weighted_violation() {
        let mut a = ConstrainedArchive::<f64, f64, ()>::new(archive3d(), 1, 2.0, None).unwrap();
        // In domain (so distance-to-rectangle is 0), but constraint is violated.
        a.add(vec![1.0, 1.0, 1.0], vec![3.0], ()).unwrap();
        let hv_plus_c = a.hypervolume_plus_constr().unwrap();
        assert_approx_eq!(f64, hv_plus_c, -6.0, epsilon = 1e-9);
    }
}
