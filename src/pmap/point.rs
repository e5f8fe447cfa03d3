//! Vertex positions as a property map.
//!
//! The mesh stores coordinates in its native scalar type `S`. Clients may
//! want them in `f64` regardless; a [`PointStrategy`] decides which point
//! type the map exposes and how it converts. The default is chosen at build
//! time by the `native-points` feature:
//!
//! - without it, [`Widening`] exposes `Point3<f64>`; reads widen exactly and
//!   writes narrow to the nearest representable native value;
//! - with it, [`Native`] exposes `Point3<S>` and no conversion happens.

use std::fmt;
use std::marker::PhantomData;

use nalgebra::Point3;

use super::{MapCategory, ReadablePropertyMap, WritablePropertyMap};
use crate::mesh::{HalfEdgeMesh, MeshIndex, NativeScalar, VertexId};

/// The public point type of the widening strategy.
pub type Point = Point3<f64>;

/// Conversion between native and public vertex positions.
pub trait PointStrategy<S: NativeScalar>: Copy + Default + fmt::Debug + 'static {
    /// Point type seen by clients.
    type Point: Clone + fmt::Debug + PartialEq;

    /// Convert a stored position for reading.
    fn to_public(native: &Point3<S>) -> Self::Point;

    /// Convert a client position for storage.
    fn to_native(point: &Self::Point) -> Point3<S>;
}

/// Expose `f64` points over any native scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Widening;

impl<S: NativeScalar> PointStrategy<S> for Widening {
    type Point = Point;

    #[inline]
    fn to_public(native: &Point3<S>) -> Point {
        Point::new(native.x.widen(), native.y.widen(), native.z.widen())
    }

    #[inline]
    fn to_native(point: &Point) -> Point3<S> {
        Point3::new(S::narrow(point.x), S::narrow(point.y), S::narrow(point.z))
    }
}

/// Expose the native points unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Native;

impl<S: NativeScalar> PointStrategy<S> for Native {
    type Point = Point3<S>;

    #[inline]
    fn to_public(native: &Point3<S>) -> Point3<S> {
        *native
    }

    #[inline]
    fn to_native(point: &Point3<S>) -> Point3<S> {
        *point
    }
}

/// Strategy used by [`VertexPoint`](super::VertexPoint).
#[cfg(not(feature = "native-points"))]
pub type DefaultPoints = Widening;

/// Strategy used by [`VertexPoint`](super::VertexPoint).
#[cfg(feature = "native-points")]
pub type DefaultPoints = Native;

/// Read/write map from a vertex to its position.
///
/// Values are converted on every access, so there is no cell to borrow.
pub struct PointMap<'m, I: MeshIndex = u32, S: NativeScalar = f32, P = DefaultPoints> {
    mesh: &'m HalfEdgeMesh<I, S>,
    _strategy: PhantomData<P>,
}

impl<'m, I: MeshIndex, S: NativeScalar, P: PointStrategy<S>> PointMap<'m, I, S, P> {
    /// Create a point map over `mesh`.
    #[inline]
    pub fn new(mesh: &'m HalfEdgeMesh<I, S>) -> Self {
        Self {
            mesh,
            _strategy: PhantomData,
        }
    }
}

impl<'m, I: MeshIndex, S: NativeScalar, P> Clone for PointMap<'m, I, S, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'m, I: MeshIndex, S: NativeScalar, P> Copy for PointMap<'m, I, S, P> {}

impl<'m, I: MeshIndex, S: NativeScalar, P: PointStrategy<S>> fmt::Debug
    for PointMap<'m, I, S, P>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointMap")
            .field("strategy", &P::default())
            .finish_non_exhaustive()
    }
}

impl<'m, I: MeshIndex, S: NativeScalar, P: PointStrategy<S>> ReadablePropertyMap<VertexId<I>>
    for PointMap<'m, I, S, P>
{
    type Value = P::Point;

    const CATEGORY: MapCategory = MapCategory::ReadWrite;

    #[inline]
    fn get(&self, v: VertexId<I>) -> P::Point {
        P::to_public(&self.mesh.point(v))
    }
}

impl<'m, I: MeshIndex, S: NativeScalar, P: PointStrategy<S>> WritablePropertyMap<VertexId<I>>
    for PointMap<'m, I, S, P>
{
    #[inline]
    fn put(&self, v: VertexId<I>, point: P::Point) {
        self.mesh.set_point(v, P::to_native(&point));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn triangle<S: NativeScalar>(apex: Point3<S>) -> HalfEdgeMesh<u32, S> {
        let zero = S::narrow(0.0);
        let one = S::narrow(1.0);
        let vertices = vec![
            Point3::new(zero, zero, zero),
            Point3::new(one, zero, zero),
            apex,
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_widening_read_is_exact() {
        let mesh = triangle(Point3::new(0.1f32, 0.7, -2.5));
        let map = PointMap::<u32, f32, Widening>::new(&mesh);
        let p = map.get(VertexId::new(2));
        assert_eq!(p, Point::new(f64::from(0.1f32), f64::from(0.7f32), -2.5));
    }

    #[test]
    fn test_widening_write_narrows() {
        let mesh = triangle(Point3::new(0.5f32, 1.0, 0.0));
        let map = PointMap::<u32, f32, Widening>::new(&mesh);
        let written = Point::new(0.1, 1.0e-3, 12345.678);
        map.put(VertexId::new(2), written);

        let read = map.get(VertexId::new(2));
        for i in 0..3 {
            let bound = f64::from(f32::EPSILON) * written[i].abs();
            assert!((read[i] - written[i]).abs() <= bound);
        }
        assert_eq!(mesh.point(VertexId::new(2)), Point3::new(0.1f32, 1.0e-3, 12345.678));
    }

    #[test]
    fn test_widening_over_f64_is_lossless() {
        let mesh = triangle(Point3::new(0.5f64, 1.0, 0.0));
        let map = PointMap::<u32, f64, Widening>::new(&mesh);
        let p = Point::new(0.1, 0.2, 0.3);
        map.put(VertexId::new(0), p);
        assert_eq!(map.get(VertexId::new(0)), p);
    }

    #[test]
    fn test_native_strategy() {
        let mesh = triangle(Point3::new(0.5f32, 1.0, 0.0));
        let map = PointMap::<u32, f32, Native>::new(&mesh);
        map.put(VertexId::new(1), Point3::new(2.0f32, 3.0, 4.0));
        assert_eq!(map.get(VertexId::new(1)), Point3::new(2.0f32, 3.0, 4.0));
        assert_eq!(map.category(), MapCategory::ReadWrite);
    }
}
