//! The bi-objective sorted archive: the hard-engineering
//! core of this crate. A sequence of non-dominated `(f1, f2)` pairs kept in
//! ascending `f1` / descending `f2` order, with an incrementally maintained
//! hyper-volume cache and uncrowded-hyper-volume-improvement (UHVI) queries.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem;

use crate::config::ArchiveConfig;
use crate::dominance::{equal, weakly_dominates};
use crate::error::ArchiveError;
use crate::scalar::{Computation, Final};

/// A sequence of mutually non-dominated `[f1, f2]` pairs, sorted ascending by
/// `f1` (equivalently descending by `f2`), with an exact incremental
/// hyper-volume cache.
///
/// `SC` ("ScalarC") is the scalar type hyper-volume deltas accumulate in;
/// `SF` ("ScalarF") is the type returned from indicator reads. `Info` is an
/// opaque per-element payload (use `()` if you don't need one — see the
/// `_point`/`_points` convenience methods available for that case).
#[derive(Debug, Clone)]
pub struct BiObjectiveArchive<SC: Computation = f64, SF: Final = f64, Info = ()> {
    points: Vec<[f64; 2]>,
    infos: Vec<Info>,
    config: ArchiveConfig,
    hypervolume: SC,
    discarded: Vec<[f64; 2]>,
    _final: PhantomData<SF>,
}

impl<SC: Computation, SF: Final, Info> BiObjectiveArchive<SC, SF, Info> {
    /// Construct an archive from an initial (not necessarily sorted,
    /// not necessarily non-dominated) list of points and their matching infos.
    ///
    /// Dominated points and points outside the domain of `config`'s reference
    /// point (if one is set) are silently dropped, exactly as `add` would drop
    /// them. Returns [`ArchiveError::Arity`] if the reference point, ideal
    /// point or weights in `config` do not have exactly 2 coordinates.
    pub fn new(
        initial: Vec<[f64; 2]>,
        infos: Vec<Info>,
        config: ArchiveConfig,
    ) -> Result<Self, ArchiveError> {
        assert_eq!(
            initial.len(),
            infos.len(),
            "initial points and infos must have the same length"
        );
        config.validate_dimension(2)?;

        let mut combined: Vec<([f64; 2], Info)> = initial.into_iter().zip(infos).collect();
        if let Some(r) = &config.reference_point {
            combined.retain(|(p, _)| p[0] < r[0] && p[1] < r[1]);
        }
        let (points, infos) = Self::sort_and_scan_prune(combined, config.presorted);

        let mut archive = Self {
            points,
            infos,
            config,
            hypervolume: SC::zero(),
            discarded: Vec::new(),
            _final: PhantomData,
        };
        if let Some(r) = archive.config.reference_point.clone() {
            archive.hypervolume = archive.compute_hypervolume(&r);
        }
        Ok(archive)
    }

    /// An empty archive.
    pub fn empty(config: ArchiveConfig) -> Result<Self, ArchiveError> {
        Self::new(Vec::new(), Vec::new(), config)
    }

    fn sort_and_scan_prune(
        mut combined: Vec<([f64; 2], Info)>,
        already_sorted: bool,
    ) -> (Vec<[f64; 2]>, Vec<Info>) {
        if !already_sorted {
            combined.sort_by(|a, b| {
                a.0[0]
                    .partial_cmp(&b.0[0])
                    .expect("objective coordinates must not be NaN")
            });
        }
        let mut points = Vec::with_capacity(combined.len());
        let mut infos = Vec::with_capacity(combined.len());
        let mut min_f2 = f64::INFINITY;
        for (p, info) in combined {
            if p[1] < min_f2 {
                min_f2 = p[1];
                points.push(p);
                infos.push(info);
            }
        }
        (points, infos)
    }

    /// The number of resident points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if the archive has no resident points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The info payloads, in the same order as the resident points.
    pub fn infos(&self) -> &[Info] {
        &self.infos
    }

    /// The points removed by the most recently completed `add` (cleared at
    /// the start of every call to `add`).
    pub fn discarded(&self) -> &[[f64; 2]] {
        &self.discarded
    }

    /// The reference point, if one was set at construction.
    pub fn reference_point(&self) -> Option<&[f64]> {
        self.config.reference_point.as_deref()
    }

    /// Iterate over the resident points in ascending-`f1` order.
    pub fn iter(&self) -> std::slice::Iter<'_, [f64; 2]> {
        self.points.iter()
    }

    fn require_reference_point(&self) -> Result<&[f64], ArchiveError> {
        self.config
            .reference_point
            .as_deref()
            .ok_or(ArchiveError::NotInitialized)
    }

    /// The smallest index `i >= lo` with `points[i].f1 >= p.f1`, breaking ties
    /// on `f1` by `f2` ascending (the archive itself never has two residents
    /// with equal `f1`; the tie-break only matters when comparing against a
    /// query point that is not itself resident).
    pub fn bisect_left(&self, p: [f64; 2], lo: usize) -> usize {
        let mut lo = lo;
        let mut hi = self.points.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let q = self.points[mid];
            let less = q[0] < p[0] || (q[0] == p[0] && q[1] < p[1]);
            if less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// `true` iff some resident weakly dominates `p`.
    pub fn dominates(&self, p: &[f64; 2]) -> bool {
        let i = self.bisect_left(*p, 0);
        (i < self.points.len() && weakly_dominates(&self.points[i], p))
            || (i > 0 && weakly_dominates(&self.points[i - 1], p))
    }

    /// All residents that weakly dominate `p`, nearest-to-`p` last.
    ///
    /// Because the archive is a staircase, the weak dominators of any query
    /// point always form a contiguous run ending at the bisect position.
    pub fn dominators(&self, p: &[f64; 2]) -> Vec<[f64; 2]> {
        let i = self.bisect_left(*p, 0);
        let mut out = Vec::new();
        if i < self.points.len() && weakly_dominates(&self.points[i], p) {
            out.push(self.points[i]);
        }
        let mut idx = i;
        while idx > 0 && weakly_dominates(&self.points[idx - 1], p) {
            idx -= 1;
            out.push(self.points[idx]);
        }
        out.reverse();
        out
    }

    /// The number of residents that weakly dominate `p`, without allocating.
    pub fn dominator_count(&self, p: &[f64; 2]) -> usize {
        let i = self.bisect_left(*p, 0);
        let mut count = if i < self.points.len() && weakly_dominates(&self.points[i], p) {
            1
        } else {
            0
        };
        let mut idx = i;
        while idx > 0 && weakly_dominates(&self.points[idx - 1], p) {
            idx -= 1;
            count += 1;
        }
        count
    }

    /// `true` iff `p` is strictly inside the reference point's domain
    /// (`f1 < r1 && f2 < r2`). `true` unconditionally if no reference point is
    /// set.
    pub fn in_domain(&self, p: &[f64; 2]) -> bool {
        match &self.config.reference_point {
            Some(r) => p[0] < r[0] && p[1] < r[1],
            None => true,
        }
    }

    /// `true` iff `idx` is a valid index and the resident there is in domain.
    /// Out-of-range indices return `false` rather than erroring.
    pub fn in_domain_index(&self, idx: usize) -> bool {
        match self.points.get(idx) {
            Some(p) => self.in_domain(p),
            None => false,
        }
    }

    /// `true` iff `p` exactly matches a resident (membership test).
    pub fn contains(&self, p: &[f64; 2]) -> bool {
        let i = self.bisect_left(*p, 0);
        i < self.points.len() && equal(&self.points[i], p)
    }

    /// The contribution of the resident at `idx` to the cached hyper-volume:
    /// `(right_neighbour.f1 - p.f1) * (left_neighbour.f2 - p.f2)`, with the
    /// reference point standing in for a missing neighbour at either end.
    fn contribution_at(&self, idx: usize) -> SC {
        let r = self
            .config
            .reference_point
            .as_deref()
            .expect("contribution_at requires a reference point");
        let p = self.points[idx];
        let left_f2 = if idx == 0 {
            r[1]
        } else {
            self.points[idx - 1][1]
        };
        let right_f1 = if idx + 1 == self.points.len() {
            r[0]
        } else {
            self.points[idx + 1][0]
        };
        SC::from_f64(right_f1 - p[0]).mul(SC::from_f64(left_f2 - p[1]))
    }

    /// The total hyper-volume term of the resident at `idx`:
    /// `(right_neighbour.f1 - p.f1) * (r[1] - p.f2)`. Unlike
    /// [`Self::contribution_at`], the height always runs to the reference
    /// point rather than the left neighbour's `f2` — summing this over every
    /// resident gives the archive's true total hyper-volume, whereas summing
    /// `contribution_at` gives the (strictly smaller, for n >= 2) sum of
    /// exclusive leave-one-out contributions.
    fn area_at(&self, idx: usize) -> SC {
        let r = self
            .config
            .reference_point
            .as_deref()
            .expect("area_at requires a reference point");
        let p = self.points[idx];
        let right_f1 = if idx + 1 == self.points.len() {
            r[0]
        } else {
            self.points[idx + 1][0]
        };
        SC::from_f64(right_f1 - p[0]).mul(SC::from_f64(r[1] - p[1]))
    }

    /// The exact contribution of the resident at `idx`. Requires a reference
    /// point.
    pub fn contributing_hypervolume(&self, idx: usize) -> Result<SC, ArchiveError> {
        self.require_reference_point()?;
        if idx >= self.points.len() {
            return Err(ArchiveError::OutOfRange {
                index: idx,
                len: self.points.len(),
            });
        }
        Ok(self.contribution_at(idx))
    }

    /// The exact contribution of the resident equal to `p`. Requires a
    /// reference point and that `p` be resident.
    pub fn contributing_hypervolume_of(&self, p: &[f64; 2]) -> Result<SC, ArchiveError> {
        self.require_reference_point()?;
        let i = self.bisect_left(*p, 0);
        if i < self.points.len() && equal(&self.points[i], p) {
            Ok(self.contribution_at(i))
        } else {
            Err(ArchiveError::OutOfRange {
                index: i,
                len: self.points.len(),
            })
        }
    }

    /// The contribution of every resident, in archive order. Requires a
    /// reference point.
    pub fn contributing_hypervolumes(&self) -> Result<Vec<SC>, ArchiveError> {
        self.require_reference_point()?;
        Ok((0..self.points.len())
            .map(|idx| self.contribution_at(idx))
            .collect())
    }

    /// The hyper-volume of the current resident set with respect to an
    /// arbitrary reference point `r`, computed from scratch (does not read or
    /// update the cache, and does not require `self` to have a reference
    /// point configured).
    pub fn compute_hypervolume(&self, r: &[f64]) -> SC {
        let n = self.points.len();
        let mut total = SC::zero();
        for idx in 0..n {
            let p = self.points[idx];
            let right_f1 = if idx + 1 == n { r[0] } else { self.points[idx + 1][0] };
            let width = SC::from_f64(right_f1 - p[0]);
            let height = SC::from_f64(r[1] - p[1]);
            total = total.add(width.mul(height));
        }
        total
    }

    /// The cached hyper-volume w.r.t. the archive's own reference point.
    /// Requires a reference point.
    pub fn hypervolume(&self) -> Result<SF, ArchiveError> {
        self.require_reference_point()?;
        Ok(self.hypervolume.to_final())
    }

    /// The hyper-volume computed on the ideal-point/weight normalised
    /// residents and reference point. Falls back to
    /// [`Self::hypervolume`]'s value when no ideal point or weights are
    /// configured. Recomputed from scratch (normalisation is a read-time
    /// transform, not part of the incremental cache). Requires a reference
    /// point.
    pub fn hypervolume_normalized(&self) -> Result<SF, ArchiveError> {
        let r = self.require_reference_point()?;
        if self.config.ideal_point.is_none() && self.config.weights.is_none() {
            return self.hypervolume();
        }
        let ideal = self.config.ideal_point.as_deref();
        let weights = self.config.weights.as_deref();
        let r = crate::indicator::normalize(r, ideal, weights);

        let mut total = SC::zero();
        let normalized: Vec<[f64; 2]> = self
            .points
            .iter()
            .map(|p| {
                let n = crate::indicator::normalize(p, ideal, weights);
                [n[0], n[1]]
            })
            .collect();
        let n = normalized.len();
        for idx in 0..n {
            let p = normalized[idx];
            let right_f1 = if idx + 1 == n { r[0] } else { normalized[idx + 1][0] };
            total = total.add(SC::from_f64(right_f1 - p[0]).mul(SC::from_f64(r[1] - p[1])));
        }
        Ok(total.to_final())
    }

    /// Minimal squared Euclidean distance from `p` to the staircase boundary
    /// of the dominated region, used both by the dominated branch of
    /// `hypervolume_improvement` (directly) and by `distance_to_pareto_front`
    /// (after a square root). Assumes the archive is non-empty.
    fn squared_distance_to_front(&self, p: &[f64; 2]) -> SC {
        let n = self.points.len();
        debug_assert!(n > 0);

        let mut best: Option<SC> = None;
        let mut consider = |dx: f64, dy: f64| {
            let d = SC::from_f64(dx).mul(SC::from_f64(dx)).add(SC::from_f64(dy).mul(SC::from_f64(dy)));
            if best.map_or(true, |b| d.partial_cmp(&b) == Some(Ordering::Less)) {
                best = Some(d);
            }
        };

        // The leading vertical ray above points[0]: x = points[0].f1, y in [points[0].f2, +inf).
        let first = self.points[0];
        if p[1] >= first[1] {
            consider(p[0] - first[0], 0.0);
        } else {
            consider(p[0] - first[0], p[1] - first[1]);
        }

        // The staircase's internal corners: for each adjacent pair, a horizontal
        // segment at points[i].f2 and a vertical segment at points[i+1].f1.
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let cx = p[0].clamp(a[0], b[0]);
            consider(p[0] - cx, p[1] - a[1]);
            let cy = p[1].clamp(b[1], a[1]);
            consider(p[0] - b[0], p[1] - cy);
        }

        // The trailing horizontal ray past points[n-1]: y = points[n-1].f2, x in [points[n-1].f1, +inf).
        let last = self.points[n - 1];
        if p[0] >= last[0] {
            consider(0.0, p[1] - last[1]);
        } else {
            consider(p[0] - last[0], p[1] - last[1]);
        }

        best.expect("at least one candidate segment is always considered")
    }

    /// The uncrowded hyper-volume improvement (UHVI) of `p`: a positive exact
    /// hyper-volume increase for non-dominated in-domain points, the negative
    /// squared distance to the dominated region's boundary for dominated
    /// points, or zero for non-dominated points that fall outside the
    /// reference point's domain on at least one axis (no hyper-volume can be
    /// added past the reference point). Requires a reference point.
    pub fn hypervolume_improvement(&self, p: &[f64; 2]) -> Result<SC, ArchiveError> {
        let r = self.require_reference_point()?;
        let r = [r[0], r[1]];

        if self.dominates(p) {
            let d2 = self.squared_distance_to_front(p);
            return Ok(SC::zero().sub(d2));
        }

        if p[0] >= r[0] || p[1] >= r[1] {
            return Ok(SC::zero());
        }

        let i = self.bisect_left(*p, 0);
        let mut removed_end = i;
        while removed_end < self.points.len() && self.points[removed_end][1] >= p[1] {
            removed_end += 1;
        }
        let left_f2 = if i == 0 { r[1] } else { self.points[i - 1][1] };
        let right_f1 = if removed_end == self.points.len() {
            r[0]
        } else {
            self.points[removed_end][0]
        };
        let mut delta = SC::from_f64(right_f1 - p[0]).mul(SC::from_f64(left_f2 - p[1]));
        for idx in i..removed_end {
            delta = delta.sub(self.contribution_at(idx));
        }
        Ok(delta)
    }

    /// The non-negative Euclidean distance from `p` to the Pareto front: zero
    /// if `p` is not weakly dominated by the archive, otherwise the distance
    /// to the nearest point on the staircase boundary.
    pub fn distance_to_pareto_front(&self, p: &[f64; 2]) -> SF {
        if self.points.is_empty() || !self.dominates(p) {
            return SF::from_f64(0.0);
        }
        let d2 = self.squared_distance_to_front(p).approx_f64();
        SF::from_f64(d2.max(0.0).sqrt())
    }

    /// Insert `p`, scanning for its position starting at `lo` (used by
    /// `merge` to keep the total scan linear in `|archive| + |batch|`).
    /// Clears and repopulates `discarded`. Returns the insertion index, or
    /// `None` if `p` was out of domain or weakly dominated (a silent no-op).
    fn add_from(&mut self, p: [f64; 2], info: Info, lo: usize) -> Option<usize> {
        self.discarded.clear();

        if let Some(r) = &self.config.reference_point {
            if p[0] >= r[0] || p[1] >= r[1] {
                return None;
            }
        }

        let i = self.bisect_left(p, lo);
        if i > 0 && weakly_dominates(&self.points[i - 1], &p) {
            return None;
        }
        if i < self.points.len() && weakly_dominates(&self.points[i], &p) {
            return None;
        }

        let mut removed_end = i;
        while removed_end < self.points.len() && self.points[removed_end][1] >= p[1] {
            removed_end += 1;
        }

        let has_ref = self.config.reference_point.is_some();
        if has_ref {
            if i > 0 {
                let c = self.area_at(i - 1);
                self.hypervolume = self.hypervolume.sub(c);
            }
            for idx in i..removed_end {
                let c = self.area_at(idx);
                self.hypervolume = self.hypervolume.sub(c);
            }
        }
        self.discarded.extend_from_slice(&self.points[i..removed_end]);

        self.points.splice(i..removed_end, std::iter::once(p));
        self.infos.splice(i..removed_end, std::iter::once(info));

        if has_ref {
            let c = self.area_at(i);
            self.hypervolume = self.hypervolume.add(c);
            if i > 0 {
                let c = self.area_at(i - 1);
                self.hypervolume = self.hypervolume.add(c);
            }
        }

        log::trace!("inserted {p:?} at index {i}, discarded {} residents", self.discarded.len());
        Some(i)
    }

    /// Insert a single candidate. See [`Self::add_from`] for the algorithm.
    pub fn add(&mut self, p: [f64; 2], info: Info) -> Option<usize> {
        self.add_from(p, info, 0)
    }

    /// Insert an unsorted batch, one candidate at a time. Returns the number
    /// actually inserted (dominated/out-of-domain candidates are silent
    /// no-ops, as in `add`).
    pub fn add_list(&mut self, ps: Vec<[f64; 2]>, infos: Vec<Info>) -> usize {
        assert_eq!(ps.len(), infos.len());
        log::debug!("add_list: {} candidates", ps.len());
        let mut inserted = 0;
        for (p, info) in ps.into_iter().zip(infos) {
            if self.add_from(p, info, 0).is_some() {
                inserted += 1;
            }
        }
        inserted
    }

    /// Insert a batch that is already sorted ascending by `f1`, reusing the
    /// previous insertion point as the lower bound for the next bisect so the
    /// total scan cost is linear in `|archive| + |batch|`. Returns the number
    /// actually inserted.
    pub fn merge(&mut self, ps: Vec<[f64; 2]>, infos: Vec<Info>) -> usize {
        assert_eq!(ps.len(), infos.len());
        log::debug!("merge: {} sorted candidates", ps.len());
        let mut cur = 0;
        let mut inserted = 0;
        for (p, info) in ps.into_iter().zip(infos) {
            let pos = self.bisect_left(p, cur);
            match self.add_from(p, info, pos) {
                Some(idx) => {
                    inserted += 1;
                    cur = idx;
                }
                None => cur = pos,
            }
        }
        inserted
    }

    /// Re-sort and re-scan the resident set, dropping any element whose `f2`
    /// is not a strict running minimum. Returns the number removed. Intended
    /// as a defensive re-validation; an archive only ever mutated through
    /// `add`/`add_list`/`merge` is always already pruned.
    pub fn prune(&mut self) -> usize {
        let n0 = self.points.len();
        let combined: Vec<([f64; 2], Info)> = mem::take(&mut self.points)
            .into_iter()
            .zip(mem::take(&mut self.infos))
            .collect();
        let (points, infos) = Self::sort_and_scan_prune(combined, false);
        self.points = points;
        self.infos = infos;
        if let Some(r) = self.config.reference_point.clone() {
            self.hypervolume = self.compute_hypervolume(&r);
        }
        n0 - self.points.len()
    }

    /// Remove every resident and reset the cached hyper-volume to zero.
    pub fn clear(&mut self) {
        self.points.clear();
        self.infos.clear();
        self.discarded.clear();
        self.hypervolume = SC::zero();
    }

    /// Remove the resident at `idx`, recomputing the hyper-volume cache.
    pub fn remove(&mut self, idx: usize) -> Result<([f64; 2], Info), ArchiveError> {
        if idx >= self.points.len() {
            return Err(ArchiveError::OutOfRange {
                index: idx,
                len: self.points.len(),
            });
        }
        let p = self.points.remove(idx);
        let info = self.infos.remove(idx);
        if let Some(r) = self.config.reference_point.clone() {
            self.hypervolume = self.compute_hypervolume(&r);
        }
        Ok((p, info))
    }

    /// Check that `f1` is strictly ascending (equivalently `f2` strictly
    /// descending) and that `infos` has the same length as the point list,
    /// plus (when a reference point is set) that the cached hyper-volume
    /// matches a from-scratch recomputation. Only ever called when
    /// `config.check_invariants` is set; a violation is always a bug in this
    /// crate, never a caller error.
    pub fn check_invariants(&self) -> Result<(), ArchiveError> {
        if !self.config.check_invariants {
            return Ok(());
        }
        for w in self.points.windows(2) {
            if !(w[0][0] < w[1][0]) {
                return Err(ArchiveError::Inconsistent(format!(
                    "f1 not strictly ascending: {} then {}",
                    w[0][0], w[1][0]
                )));
            }
            if !(w[0][1] > w[1][1]) {
                return Err(ArchiveError::Inconsistent(format!(
                    "f2 not strictly descending: {} then {}",
                    w[0][1], w[1][1]
                )));
            }
        }
        if self.infos.len() != self.points.len() {
            return Err(ArchiveError::Inconsistent(format!(
                "infos length {} does not match archive length {}",
                self.infos.len(),
                self.points.len()
            )));
        }
        if let Some(r) = self.config.reference_point.clone() {
            let recomputed = self.compute_hypervolume(&r);
            // Floating-point accumulation can diverge at the ULP level for the
            // f64 backend; this check is exact (and meaningful) for ExactRational.
            if recomputed != self.hypervolume {
                return Err(ArchiveError::Inconsistent(
                    "cached hyper-volume diverged from a from-scratch recomputation".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl<SC: Computation, SF: Final> BiObjectiveArchive<SC, SF, ()> {
    /// Insert a single candidate with no info payload.
    pub fn add_point(&mut self, p: [f64; 2]) -> Option<usize> {
        self.add(p, ())
    }

    /// Insert an unsorted batch with no info payloads.
    pub fn add_points(&mut self, ps: Vec<[f64; 2]>) -> usize {
        let n = ps.len();
        self.add_list(ps, vec![(); n])
    }

    /// Insert a batch already sorted ascending by `f1`, with no info
    /// payloads.
    pub fn merge_points(&mut self, ps: Vec<[f64; 2]>) -> usize {
        let n = ps.len();
        self.merge(ps, vec![(); n])
    }
}

impl<SC: Computation, SF: Final, Info> std::ops::Index<usize> for BiObjectiveArchive<SC, SF, Info> {
    type Output = [f64; 2];
    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl<'a, SC: Computation, SF: Final, Info> IntoIterator for &'a BiObjectiveArchive<SC, SF, Info> {
    type Item = &'a [f64; 2];
    type IntoIter = std::slice::Iter<'a, [f64; 2]>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn archive(points: &[[f64; 2]], r: [f64; 2]) -> BiObjectiveArchive<f64, f64, ()> {
        let config = ArchiveConfig::new().with_reference_point(r.to_vec());
        let n = points.len();
        BiObjectiveArchive::new(points.to_vec(), vec![(); n], config).unwrap()
    }

    #[test]
    /// Pruning a batch of points keeps only the non-dominated residents.
    fn scenario_construct_and_prune() {
        let points = [
            [-0.749, -1.188],
            [-0.557, 1.1076],
            [0.2454, 0.4724],
            [-1.146, -0.110],
        ];
        let a = archive(&points, [10.0, 10.0]);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0], [-1.146, -0.110]);
        assert_eq!(a[1], [-0.749, -1.188]);

        let contribs = a.contributing_hypervolumes().unwrap();
        assert_approx_eq!(f64, contribs[0], 4.01367, epsilon = 1e-4);
        assert_approx_eq!(f64, contribs[1], 11.587422, epsilon = 1e-4);
    }

    #[test]
    /// Inserting a dominating point removes the dominated resident it replaces.
    fn scenario_add_dominates_existing() {
        let points = [
            [-0.749, -1.188],
            [-0.557, 1.1076],
            [0.2454, 0.4724],
            [-1.146, -0.110],
        ];
        let mut a = archive(&points, [10.0, 10.0]);
        let idx = a.add_point([-1.0, -3.0]);
        assert_eq!(idx, Some(1));
        assert_eq!(a.len(), 2);
        assert_eq!(a[0], [-1.146, -0.110]);
        assert_eq!(a[1], [-1.0, -3.0]);
        assert_eq!(a.discarded(), &[[-0.749, -1.188]]);
    }

    #[test]
    /// A candidate outside the reference point's domain is a silent no-op.
    fn scenario_add_out_of_domain() {
        let points = [
            [-0.749, -1.188],
            [-0.557, 1.1076],
            [0.2454, 0.4724],
            [-1.146, -0.110],
        ];
        let mut a = archive(&points, [10.0, 10.0]);
        a.add_point([-1.0, -3.0]);
        let before: Vec<_> = a.iter().cloned().collect();
        let idx = a.add_point([-1.5, 44.0]);
        assert_eq!(idx, None);
        let after: Vec<_> = a.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_archive_boundary_behaviour() {
        let a: BiObjectiveArchive<f64, f64, ()> =
            BiObjectiveArchive::empty(ArchiveConfig::new().with_reference_point(vec![1.0, 1.0]))
                .unwrap();
        assert_eq!(a.hypervolume().unwrap(), 0.0);
        assert!(!a.dominates(&[0.5, 0.5]));
        assert_eq!(a.distance_to_pareto_front(&[0.5, 0.5]), 0.0);
    }

    #[test]
    fn hypervolume_without_reference_point_is_an_error() {
        let a: BiObjectiveArchive<f64, f64, ()> =
            BiObjectiveArchive::empty(ArchiveConfig::new()).unwrap();
        assert_eq!(a.hypervolume().unwrap_err(), ArchiveError::NotInitialized);
    }

    #[test]
    /// Adding a point already weakly dominated by a resident is a no-op.
    fn law_adding_resident_is_noop() {
        let points = [[1.0, 4.0], [2.0, 3.0], [3.0, 1.0]];
        let mut a = archive(&points, [10.0, 10.0]);
        let hv_before = a.hypervolume().unwrap();
        let idx = a.add_point([2.0, 3.0]);
        assert_eq!(idx, None);
        assert_eq!(a.hypervolume().unwrap(), hv_before);
        assert_eq!(a.len(), 3);
    }

    #[test]
    /// hypervolume_improvement for a non-dominated point equals the
    /// difference between the hyper-volume with and without it.
    fn law_hypervolume_improvement_matches_before_after_delta() {
        let points = [[1.0, 4.0], [3.0, 2.0], [5.0, 1.0]];
        let a = archive(&points, [10.0, 10.0]);
        let candidate = [2.0, 3.0];
        assert!(!a.dominates(&candidate));

        let hv_before = a.hypervolume().unwrap();
        let improvement = a.hypervolume_improvement(&candidate).unwrap();

        let mut with_candidate = a.clone();
        with_candidate.add_point(candidate);
        let hv_after = with_candidate.hypervolume().unwrap();

        assert_approx_eq!(f64, improvement, hv_after - hv_before, epsilon = 1e-9);
    }

    #[test]
    /// For a dominated point, hypervolume_improvement is the negative
    /// squared distance to the front.
    fn law_dominated_improvement_is_negative_squared_distance() {
        let points = [[1.0, 4.0], [3.0, 2.0], [5.0, 1.0]];
        let a = archive(&points, [10.0, 10.0]);
        let candidate = [4.0, 3.0]; // dominated by [3.0, 2.0]
        assert!(a.dominates(&candidate));

        let improvement = a.hypervolume_improvement(&candidate).unwrap();
        let distance = a.distance_to_pareto_front(&candidate);
        assert_approx_eq!(f64, improvement, -(distance * distance), epsilon = 1e-9);
    }

    #[test]
    /// merge and add_list produce equal archives for sorted input.
    fn law_merge_equals_add_list_for_sorted_input() {
        let mut ps = vec![[1.0, 9.0], [2.0, 7.0], [3.0, 3.0], [4.0, 1.0]];
        ps.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());

        let mut via_merge: BiObjectiveArchive<f64, f64, ()> =
            BiObjectiveArchive::empty(ArchiveConfig::new().with_reference_point(vec![10.0, 10.0]))
                .unwrap();
        via_merge.merge_points(ps.clone());

        let mut via_add_list: BiObjectiveArchive<f64, f64, ()> =
            BiObjectiveArchive::empty(ArchiveConfig::new().with_reference_point(vec![10.0, 10.0]))
                .unwrap();
        via_add_list.add_points(ps);

        let a: Vec<_> = via_merge.iter().cloned().collect();
        let b: Vec<_> = via_add_list.iter().cloned().collect();
        assert_eq!(a, b);
        assert_eq!(via_merge.hypervolume().unwrap(), via_add_list.hypervolume().unwrap());
    }

    #[test]
    fn insert_equal_to_resident_is_noop() {
        let points = [[1.0, 4.0], [2.0, 3.0], [3.0, 1.0]];
        let mut a = archive(&points, [10.0, 10.0]);
        assert_eq!(a.add_point([2.0, 3.0]), None);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn insert_same_f1_smaller_f2_dominates_resident() {
        let points = [[1.0, 4.0], [2.0, 3.0], [3.0, 1.0]];
        let mut a = archive(&points, [10.0, 10.0]);
        let idx = a.add_point([2.0, 1.5]);
        assert_eq!(idx, Some(1));
        assert_eq!(a[1], [2.0, 1.5]);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn prune_drops_dominated_points_from_unsorted_input() {
        let points = vec![[3.0, 1.0], [1.0, 4.0], [2.0, 5.0], [2.0, 3.0]];
        let config = ArchiveConfig::new().with_reference_point(vec![10.0, 10.0]);
        let n = points.len();
        let a: BiObjectiveArchive<f64, f64, ()> =
            BiObjectiveArchive::new(points, vec![(); n], config).unwrap();
        // [2.0, 5.0] is dominated by [1.0, 4.0] (f1 worse, f2 worse) -> dropped.
        assert_eq!(a.len(), 3);
        let residents: Vec<_> = a.iter().cloned().collect();
        assert_eq!(residents, vec![[1.0, 4.0], [2.0, 3.0], [3.0, 1.0]]);
    }

    #[test]
    fn contains_and_dominators() {
        let points = [[1.0, 4.0], [2.0, 3.0], [3.0, 1.0]];
        let a = archive(&points, [10.0, 10.0]);
        assert!(a.contains(&[2.0, 3.0]));
        assert!(!a.contains(&[2.0, 2.0]));
        assert_eq!(a.dominators(&[5.0, 5.0]), vec![[1.0, 4.0], [2.0, 3.0], [3.0, 1.0]]);
        assert_eq!(a.dominator_count(&[5.0, 5.0]), 3);
        assert_eq!(a.dominators(&[0.0, 0.0]), Vec::<[f64; 2]>::new());
    }

    /// Property-based check of I1-I6 across many seeded random insertion
    /// sequences (spec.md §8 calls for these invariants to hold "for all
    /// seeds"); `rand_chacha` gives a reproducible sequence per seed.
    #[test]
    fn property_random_insertions_preserve_invariants() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        for seed in 0..8u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let config = ArchiveConfig::new()
                .with_reference_point(vec![100.0, 100.0])
                .check_invariants(true);
            let mut a: BiObjectiveArchive<f64, f64, ()> = BiObjectiveArchive::empty(config).unwrap();

            for _ in 0..200 {
                let p = [rng.gen_range(-50.0..100.0), rng.gen_range(-50.0..100.0)];
                let hv_before = a.hypervolume().unwrap();

                match a.add_point(p) {
                    // I6: the new resident is exactly p, and p weakly
                    // dominates everything it displaced.
                    Some(idx) => {
                        assert_eq!(a[idx], p);
                        for d in a.discarded() {
                            assert!(weakly_dominates(&p, d));
                        }
                    }
                    // I5: a rejected candidate leaves H unchanged.
                    None => assert_eq!(a.hypervolume().unwrap(), hv_before),
                }

                // I1 + I2, checked from scratch by check_invariants.
                a.check_invariants().unwrap();
                // I3: contributions never exceed the whole hyper-volume.
                let sum: f64 = a.contributing_hypervolumes().unwrap().iter().sum();
                assert!(sum <= a.hypervolume().unwrap() + 1e-6);
                // I4.
                assert_eq!(a.infos().len(), a.len());
            }
        }
    }

    /// L2: re-adding any current resident is always a no-op.
    #[test]
    fn property_readding_a_resident_is_always_a_noop() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = ArchiveConfig::new().with_reference_point(vec![100.0, 100.0]);
        let mut a: BiObjectiveArchive<f64, f64, ()> = BiObjectiveArchive::empty(config).unwrap();
        for _ in 0..100 {
            let p = [rng.gen_range(-50.0..100.0), rng.gen_range(-50.0..100.0)];
            a.add_point(p);
        }
        assert!(a.len() > 1);

        let residents: Vec<[f64; 2]> = a.iter().cloned().collect();
        for p in residents {
            let hv_before = a.hypervolume().unwrap();
            assert_eq!(a.add_point(p), None);
            assert_eq!(a.hypervolume().unwrap(), hv_before);
        }
    }
}
