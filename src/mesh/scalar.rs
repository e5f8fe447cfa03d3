//! Native coordinate scalars.

use nalgebra::Scalar;

/// Scalar type the mesh stores vertex coordinates in.
///
/// Public points use `f64`. Reading a native coordinate widens it, which is
/// exact for every implementor; writing narrows it with the semantics of an
/// `as` cast (round to nearest, overflow to infinity).
pub trait NativeScalar: Scalar + Copy + PartialOrd + Send + Sync {
    /// Widen to the public scalar type.
    fn widen(self) -> f64;

    /// Narrow from the public scalar type.
    fn narrow(value: f64) -> Self;
}

impl NativeScalar for f32 {
    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value as f32
    }
}

impl NativeScalar for f64 {
    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_widen_is_exact() {
        let x = 0.1f32;
        assert_eq!(x.widen() as f32, x);
    }

    #[test]
    fn test_f32_narrow_rounds() {
        let x = 0.1f64;
        let narrowed = f32::narrow(x);
        assert_ne!(narrowed.widen(), x);
        assert!((narrowed.widen() - x).abs() <= f64::from(f32::EPSILON) * x.abs());
    }

    #[test]
    fn test_f64_identity() {
        let x = 0.1f64;
        assert_eq!(f64::narrow(x).widen(), x);
    }
}
