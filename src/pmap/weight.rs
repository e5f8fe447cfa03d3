//! Edge lengths computed from vertex positions.

use std::fmt;

use super::{MapCategory, PointMap, ReadablePropertyMap, Widening};
use crate::mesh::{representative, EdgeId, HalfEdgeMesh, MeshIndex, NativeScalar};

/// Read-only map from an edge to its Euclidean length.
///
/// Lengths are recomputed on each read from the current positions of the
/// edge's endpoints, widened to `f64`. Nothing is cached, so moving a vertex
/// is reflected immediately.
pub struct EdgeWeightMap<'m, I: MeshIndex = u32, S: NativeScalar = f32> {
    mesh: &'m HalfEdgeMesh<I, S>,
}

impl<'m, I: MeshIndex, S: NativeScalar> EdgeWeightMap<'m, I, S> {
    /// Create a weight map over `mesh`.
    #[inline]
    pub fn new(mesh: &'m HalfEdgeMesh<I, S>) -> Self {
        Self { mesh }
    }
}

impl<'m, I: MeshIndex, S: NativeScalar> fmt::Debug for EdgeWeightMap<'m, I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EdgeWeightMap")
    }
}

impl<'m, I: MeshIndex, S: NativeScalar> Clone for EdgeWeightMap<'m, I, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'m, I: MeshIndex, S: NativeScalar> Copy for EdgeWeightMap<'m, I, S> {}

impl<'m, I: MeshIndex, S: NativeScalar> ReadablePropertyMap<EdgeId<I>> for EdgeWeightMap<'m, I, S> {
    type Value = f64;

    const CATEGORY: MapCategory = MapCategory::Readable;

    fn get(&self, e: EdgeId<I>) -> f64 {
        let he = representative(e);
        let points = PointMap::<I, S, Widening>::new(self.mesh);
        let a = points.get(self.mesh.origin(he));
        let b = points.get(self.mesh.dest(he));
        nalgebra::distance(&a, &b)
    }
}
