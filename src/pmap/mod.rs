//! Property maps over a [`HalfEdgeMesh`].
//!
//! Algorithms written against the get/put protocol in this module run
//! unmodified on any per-element attribute of the mesh, whether it is stored
//! in the mesh's native property arenas or computed on the fly.
//!
//! # Protocol
//!
//! - [`ReadablePropertyMap`] maps a key (an element id) to a value.
//! - [`WritablePropertyMap`] adds `put`.
//! - [`MapCategory`] tells clients up front what a map supports, so a write
//!   to a derived map is rejected before it is attempted.
//!
//! # Kinds of maps
//!
//! | Map | Key | Value | Category | Storage |
//! |-----|-----|-------|----------|---------|
//! | [`PropertyMap`] | any element id | `T` | [`MapCategory::Lvalue`] | native column |
//! | [`IndexMap`] | any element id | `usize` | [`MapCategory::Readable`] | none |
//! | [`PointMap`] | [`VertexId`] | point | [`MapCategory::ReadWrite`] | vertex points |
//! | [`EdgeWeightMap`] | [`EdgeId`] | `f64` | [`MapCategory::Readable`] | none |
//!
//! Maps are views: they borrow the mesh, copy freely, and never own the
//! storage behind them. Stored properties are released only by [`remove`].
//!
//! # Example
//!
//! ```
//! use meshprop::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(3.0, 0.0, 0.0),
//!     Point3::new(3.0, 4.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! // Intrinsic maps
//! let weights = property_map(EdgeWeight, &mesh);
//! let longest = mesh.edge_ids().map(|e| get(&weights, e)).fold(0.0, f64::max);
//! assert!((longest - 5.0).abs() < 1e-12);
//!
//! // A client-defined edge property
//! let visited = add(EdgeProperty::<bool>::new("visited"), &mesh).unwrap();
//! put(&visited, EdgeId::new(0), true);
//! assert!(get(&visited, EdgeId::new(0)));
//! remove(visited, &mesh);
//! ```

mod index;
mod point;
mod stored;
mod weight;

pub use index::IndexMap;
pub use point::{DefaultPoints, Native, Point, PointMap, PointStrategy, Widening};
pub use stored::{
    add, remove, EdgeProperty, FaceProperty, HalfEdgeProperty, PropertyMap, PropertyTag,
    VertexProperty, UNNAMED_PROPERTY,
};
pub use weight::EdgeWeightMap;

use crate::mesh::{EdgeId, FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, NativeScalar, VertexId};

/// What a property map supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapCategory {
    /// Values can only be read; they are usually derived, not stored.
    Readable,
    /// Values can be read and written, but there is no cell to borrow.
    ReadWrite,
    /// Values live in a cell that can be read, written, and borrowed.
    Lvalue,
}

impl MapCategory {
    /// Whether `put` is available.
    #[inline]
    pub fn is_writable(self) -> bool {
        !matches!(self, MapCategory::Readable)
    }
}

/// A map from keys of type `K` to values.
pub trait ReadablePropertyMap<K> {
    /// The value type.
    type Value;

    /// The capabilities of this map type.
    const CATEGORY: MapCategory;

    /// Read the value for `key`.
    fn get(&self, key: K) -> Self::Value;

    /// The capabilities of this map.
    #[inline]
    fn category(&self) -> MapCategory {
        Self::CATEGORY
    }
}

/// A property map that also accepts writes.
pub trait WritablePropertyMap<K>: ReadablePropertyMap<K> {
    /// Overwrite the value for `key`.
    fn put(&self, key: K, value: Self::Value);
}

/// Read `key` through `map`.
#[inline]
pub fn get<K, M: ReadablePropertyMap<K>>(map: &M, key: K) -> M::Value {
    map.get(key)
}

/// Write `value` for `key` through `map`.
#[inline]
pub fn put<K, M: WritablePropertyMap<K>>(map: &M, key: K, value: M::Value) {
    map.put(key, value)
}

/// Whether `map` accepts writes for keys of type `K`.
#[inline]
pub fn is_writable<K, M: ReadablePropertyMap<K>>(map: &M) -> bool {
    map.category().is_writable()
}

/// Tag for the dense vertex numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VertexIndex;

/// Tag for the dense face numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaceIndex;

/// Tag for the dense half-edge numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HalfEdgeIndex;

/// Tag for the dense edge numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EdgeIndex;

/// Tag for vertex positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VertexPoint;

/// Tag for Euclidean edge lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EdgeWeight;

/// A property every mesh provides without allocation.
///
/// Implemented by the intrinsic tags; the implementation picks the map type
/// for the tag at compile time.
pub trait IntrinsicProperty<'m, I: MeshIndex, S: NativeScalar> {
    /// Key type of the map.
    type Key: Copy;

    /// Map type returned for this tag.
    type Map: ReadablePropertyMap<Self::Key> + Copy;

    /// Build the map over `mesh`.
    fn property_map(self, mesh: &'m HalfEdgeMesh<I, S>) -> Self::Map;
}

macro_rules! index_property {
    ($tag:ident, $id:ident) => {
        impl<'m, I: MeshIndex, S: NativeScalar> IntrinsicProperty<'m, I, S> for $tag {
            type Key = $id<I>;
            type Map = IndexMap<$id<I>>;

            #[inline]
            fn property_map(self, _mesh: &'m HalfEdgeMesh<I, S>) -> Self::Map {
                IndexMap::new()
            }
        }
    };
}

index_property!(VertexIndex, VertexId);
index_property!(FaceIndex, FaceId);
index_property!(HalfEdgeIndex, HalfEdgeId);
index_property!(EdgeIndex, EdgeId);

impl<'m, I: MeshIndex, S: NativeScalar> IntrinsicProperty<'m, I, S> for VertexPoint {
    type Key = VertexId<I>;
    type Map = PointMap<'m, I, S>;

    #[inline]
    fn property_map(self, mesh: &'m HalfEdgeMesh<I, S>) -> Self::Map {
        PointMap::new(mesh)
    }
}

impl<'m, I: MeshIndex, S: NativeScalar> IntrinsicProperty<'m, I, S> for EdgeWeight {
    type Key = EdgeId<I>;
    type Map = EdgeWeightMap<'m, I, S>;

    #[inline]
    fn property_map(self, mesh: &'m HalfEdgeMesh<I, S>) -> Self::Map {
        EdgeWeightMap::new(mesh)
    }
}

/// The map for an intrinsic property tag.
#[inline]
pub fn property_map<'m, P, I, S>(tag: P, mesh: &'m HalfEdgeMesh<I, S>) -> P::Map
where
    P: IntrinsicProperty<'m, I, S>,
    I: MeshIndex,
    S: NativeScalar,
{
    tag.property_map(mesh)
}

/// Read one intrinsic property value.
#[inline]
pub fn get_property<'m, P, I, S>(
    tag: P,
    mesh: &'m HalfEdgeMesh<I, S>,
    key: P::Key,
) -> <P::Map as ReadablePropertyMap<P::Key>>::Value
where
    P: IntrinsicProperty<'m, I, S>,
    I: MeshIndex,
    S: NativeScalar,
{
    tag.property_map(mesh).get(key)
}

/// Write one vertex position through the default point map.
///
/// This is the only intrinsic property that can be written.
#[inline]
pub fn put_point<I: MeshIndex, S: NativeScalar>(
    mesh: &HalfEdgeMesh<I, S>,
    v: VertexId<I>,
    point: <DefaultPoints as PointStrategy<S>>::Point,
) {
    PointMap::<I, S>::new(mesh).put(v, point)
}
