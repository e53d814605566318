//! Ideal-point/weight normalisation, applied at read-time only, layered over
//! the archives' own hyper-volume and distance queries. Normalisation never
//! mutates a stored objective vector — every function here takes a borrow of
//! the archive's raw points and returns a fresh, temporary normalised copy.
//!
//! Normalisation convention: `normalized_i = (p_i - ideal_i) / weight_i`,
//! applied independently on every axis (weight of `1.0` and ideal of `0.0`
//! when unset on that axis). This is the common ideal-point/nadir-style
//! rescaling used to make objectives of different units or magnitudes
//! comparable before a geometric query; see `DESIGN.md` for why this
//! convention was chosen over the alternatives considered.

/// Normalise `p` against an optional ideal point and optional per-objective
/// weights. Missing `ideal`/`weights` behave as all-zero / all-one.
pub fn normalize(p: &[f64], ideal: Option<&[f64]>, weights: Option<&[f64]>) -> Vec<f64> {
    (0..p.len())
        .map(|i| {
            let ideal_i = ideal.map_or(0.0, |v| v[i]);
            let weight_i = weights.map_or(1.0, |v| v[i]);
            (p[i] - ideal_i) / weight_i
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_is_identity_with_no_ideal_or_weights() {
        assert_eq!(normalize(&[1.0, 2.0, 3.0], None, None), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn normalize_subtracts_ideal_and_divides_by_weight() {
        let p = [3.0, 2.0, 1.0];
        let ideal = [0.0, 0.0, 0.0];
        let weights = [2.0, 3.0, 5.0];
        assert_eq!(normalize(&p, Some(&ideal), Some(&weights)), vec![1.5, 2.0 / 3.0, 0.2]);
    }
}
