//! The scalar façade: two pluggable numeric kinds used by
//! the archives for hyper-volume bookkeeping.
//!
//! `Computation` ("ScalarC" in the design notes) is the type hyper-volume
//! deltas are accumulated in; `Final` ("ScalarF") is what a caller gets back
//! from a query. Both default to `f64`. Nothing outside this module inspects
//! a scalar's internal representation.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

/// A scalar type suitable for accumulating hyper-volume deltas.
///
/// Implementors must be closed under `+`, `-`, `×` and support ordering
/// against native `f64` values (used for domain checks against the reference
/// point, which is always supplied as plain floats).
pub trait Computation:
    Copy + Clone + fmt::Debug + PartialEq + PartialOrd + Send + Sync + 'static
{
    /// The additive identity.
    fn zero() -> Self;

    /// Lift a native float into this scalar type. May lose precision for
    /// non-`f64` backends only if the backend itself is lossy; the rational
    /// backend in this crate ([`ExactRational`]) is exact for every finite
    /// `f64`.
    fn from_f64(value: f64) -> Self;

    /// Exact addition.
    fn add(self, rhs: Self) -> Self;

    /// Exact subtraction.
    fn sub(self, rhs: Self) -> Self;

    /// Exact multiplication.
    fn mul(self, rhs: Self) -> Self;

    /// Compare against a native float (used for domain/reference-point checks).
    fn partial_cmp_f64(&self, rhs: f64) -> Option<Ordering>;

    /// A lossy projection to `f64`, used internally for distance
    /// computations (square roots have no exact rational closed form) and for
    /// materialising a [`Final`] value.
    fn approx_f64(&self) -> f64;

    /// Convert to the caller-chosen final/report scalar type.
    fn to_final<F: Final>(&self) -> F {
        F::from_f64(self.approx_f64())
    }
}

/// A scalar type used to materialise indicator values for the caller.
pub trait Final: Copy + Clone + fmt::Debug + PartialEq + PartialOrd + Send + Sync + 'static {
    /// Construct from a native float.
    fn from_f64(value: f64) -> Self;

    /// Convert back to a native float (e.g. for display or further maths).
    fn to_f64(&self) -> f64;
}

impl Computation for f64 {
    fn zero() -> Self {
        0.0
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }

    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }

    fn partial_cmp_f64(&self, rhs: f64) -> Option<Ordering> {
        self.partial_cmp(&rhs)
    }

    fn approx_f64(&self) -> f64 {
        *self
    }
}

impl Final for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(&self) -> f64 {
        *self
    }
}

/// An exact, arbitrary-precision rational scalar, for callers who want the
/// cached hyper-volume and UHVI queries to be free of floating-point drift
/// across long sequences of insertions.
///
/// Only implements [`Computation`]: it is deliberately not a [`Final`] type,
/// since callers asking for a report value almost always want a plain float
/// back rather than a big-integer ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactRational(BigRational);

impl ExactRational {
    /// The underlying exact ratio.
    pub fn as_ratio(&self) -> &BigRational {
        &self.0
    }
}

impl PartialOrd for ExactRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Computation for ExactRational {
    fn zero() -> Self {
        ExactRational(BigRational::zero())
    }

    fn from_f64(value: f64) -> Self {
        // `BigRational::from_float` is exact for every finite f64 (it decomposes
        // the IEEE-754 mantissa/exponent rather than approximating via decimal).
        ExactRational(
            BigRational::from_float(value)
                .unwrap_or_else(|| panic!("cannot represent non-finite value {value} exactly")),
        )
    }

    fn add(self, rhs: Self) -> Self {
        ExactRational(self.0 + rhs.0)
    }

    fn sub(self, rhs: Self) -> Self {
        ExactRational(self.0 - rhs.0)
    }

    fn mul(self, rhs: Self) -> Self {
        ExactRational(self.0 * rhs.0)
    }

    fn partial_cmp_f64(&self, rhs: f64) -> Option<Ordering> {
        BigRational::from_float(rhs).and_then(|rhs| self.0.partial_cmp(&rhs))
    }

    fn approx_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl Add for ExactRational {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Computation::add(self, rhs)
    }
}

impl Sub for ExactRational {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Computation::sub(self, rhs)
    }
}

impl Mul for ExactRational {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Computation::mul(self, rhs)
    }
}

impl From<BigInt> for ExactRational {
    fn from(value: BigInt) -> Self {
        ExactRational(BigRational::from_integer(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn f64_roundtrips_through_final() {
        let c: f64 = Computation::from_f64(3.5);
        let f: f64 = Computation::to_final(&c);
        assert_eq!(f, 3.5);
    }

    #[test]
    fn exact_rational_is_exact_across_many_additions() {
        let mut acc = ExactRational::zero();
        let delta = ExactRational::from_f64(0.1);
        for _ in 0..10 {
            acc = acc.add(delta.clone());
        }
        // 0.1 is not exactly representable, but because we never round-trip
        // through decimal, 10 additions of the *same* f64 bit pattern are exact.
        let expected = ExactRational::from_f64(0.1).mul(ExactRational::from_f64(10.0));
        assert_eq!(acc, expected);
    }

    #[test]
    fn exact_rational_compares_against_native_float() {
        let a = ExactRational::from_f64(1.5);
        assert_eq!(a.partial_cmp_f64(2.0), Some(Ordering::Less));
        assert_eq!(a.partial_cmp_f64(1.5), Some(Ordering::Equal));
        assert_eq!(a.partial_cmp_f64(1.0), Some(Ordering::Greater));
    }
}
