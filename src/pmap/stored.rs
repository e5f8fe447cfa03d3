//! Property maps over native property columns.

use std::borrow::Cow;
use std::cell::{Ref, RefMut};
use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use log::debug;

use super::{MapCategory, ReadablePropertyMap, WritablePropertyMap};
use crate::error::Result;
use crate::mesh::{
    Category, Descriptor, EdgeId, FaceId, HalfEdgeId, HalfEdgeMesh, NativeScalar, PropHandle,
    Property, VertexId,
};

/// Name given to properties created without one.
pub const UNNAMED_PROPERTY: &str = "<unnamed>";

/// A view of one native property column, keyed by element id.
///
/// The map borrows the mesh and holds the column's handle; copying it is
/// free and every copy sees the same cells. The column outlives the map and
/// is released only by [`PropertyMap::remove`] or [`remove`]. Reading or
/// writing through a map whose column was removed panics.
///
/// For edge properties, `get(e)` and `put(e, ..)` address the cell of the
/// edge as a whole, no matter which half-edge `e` was derived from.
pub struct PropertyMap<'m, K: Descriptor, T, S: NativeScalar = f32> {
    mesh: &'m HalfEdgeMesh<K::Index, S>,
    handle: PropHandle<K::Category, T>,
}

impl<'m, K: Descriptor, T, S: NativeScalar> Clone for PropertyMap<'m, K, T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'m, K: Descriptor, T, S: NativeScalar> Copy for PropertyMap<'m, K, T, S> {}

impl<'m, K: Descriptor, T, S: NativeScalar> fmt::Debug for PropertyMap<'m, K, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMap")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<'m, K: Descriptor, T: 'static, S: NativeScalar> PropertyMap<'m, K, T, S> {
    /// Wrap an existing property handle.
    ///
    /// No storage is created; the map refers to the same column as `handle`.
    #[inline]
    pub fn wrap(mesh: &'m HalfEdgeMesh<K::Index, S>, handle: PropHandle<K::Category, T>) -> Self {
        Self { mesh, handle }
    }

    /// The underlying native handle.
    #[inline]
    pub fn handle(&self) -> PropHandle<K::Category, T> {
        self.handle
    }

    /// The mesh this map reads from.
    #[inline]
    pub fn mesh(&self) -> &'m HalfEdgeMesh<K::Index, S> {
        self.mesh
    }

    /// Whether the column behind this map still exists.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.mesh.has_property(self.handle)
    }

    /// Borrow the cell for `key`.
    ///
    /// # Panics
    /// Panics if the column was removed or the cell is borrowed mutably.
    #[inline]
    pub fn borrow(&self, key: K) -> Ref<'m, T> {
        self.mesh.property(self.handle, key)
    }

    /// Borrow the cell for `key` mutably.
    ///
    /// # Panics
    /// Panics if the column was removed or any cell of the same element kind
    /// is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self, key: K) -> RefMut<'m, T> {
        self.mesh.property_mut(self.handle, key)
    }

    /// Release the column.
    ///
    /// Every other copy of this map becomes stale.
    pub fn remove(self) {
        debug!(
            "Removing {:?} property map {:?}",
            <K::Category as Category>::KIND,
            self.handle
        );
        self.mesh.remove_property(self.handle);
    }
}

impl<'m, K: Descriptor, T: Property, S: NativeScalar> PropertyMap<'m, K, T, S> {
    /// Create a new column named `name` on `mesh` and wrap it.
    ///
    /// Every cell starts as `T::default()`.
    pub fn create(mesh: &'m HalfEdgeMesh<K::Index, S>, name: &str) -> Result<Self> {
        let handle = mesh.add_property::<K::Category, T>(name)?;
        Ok(Self::wrap(mesh, handle))
    }
}

impl<'m, K: Descriptor, T: Property, S: NativeScalar> ReadablePropertyMap<K>
    for PropertyMap<'m, K, T, S>
{
    type Value = T;

    const CATEGORY: MapCategory = MapCategory::Lvalue;

    #[inline]
    fn get(&self, key: K) -> T {
        self.borrow(key).clone()
    }
}

impl<'m, K: Descriptor, T: Property, S: NativeScalar> WritablePropertyMap<K>
    for PropertyMap<'m, K, T, S>
{
    #[inline]
    fn put(&self, key: K, value: T) {
        *self.borrow_mut(key) = value;
    }
}

/// Request for a client-defined property of value type `T` on elements
/// keyed by `K`.
///
/// Pass it to [`add`] to allocate the column.
pub struct PropertyTag<K, T> {
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> (K, T)>,
}

/// Tag for a vertex property.
pub type VertexProperty<T, I = u32> = PropertyTag<VertexId<I>, T>;

/// Tag for a face property.
pub type FaceProperty<T, I = u32> = PropertyTag<FaceId<I>, T>;

/// Tag for a half-edge property.
pub type HalfEdgeProperty<T, I = u32> = PropertyTag<HalfEdgeId<I>, T>;

/// Tag for an edge property.
pub type EdgeProperty<T, I = u32> = PropertyTag<EdgeId<I>, T>;

impl<K, T> PropertyTag<K, T> {
    /// A tag with a column name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// A tag named [`UNNAMED_PROPERTY`].
    pub fn unnamed() -> Self {
        Self::new(UNNAMED_PROPERTY)
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<K, T> Default for PropertyTag<K, T> {
    fn default() -> Self {
        Self::unnamed()
    }
}

impl<K, T> Clone for PropertyTag<K, T> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone())
    }
}

impl<K, T> fmt::Debug for PropertyTag<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyTag").field(&self.name).finish()
    }
}

/// Attach a new property described by `tag` to `mesh`.
///
/// The returned map is the only way to reach the column besides a name
/// lookup; keep it (or its handle) to [`remove`] the column later.
pub fn add<'m, K, T, S>(
    tag: PropertyTag<K, T>,
    mesh: &'m HalfEdgeMesh<K::Index, S>,
) -> Result<PropertyMap<'m, K, T, S>>
where
    K: Descriptor,
    T: Property,
    S: NativeScalar,
{
    PropertyMap::create(mesh, tag.name())
}

/// Release the column behind `map`.
///
/// # Panics
/// Panics if `map` was created on a different mesh, or its column was
/// already removed.
pub fn remove<K, T, S>(map: PropertyMap<'_, K, T, S>, mesh: &HalfEdgeMesh<K::Index, S>)
where
    K: Descriptor,
    T: 'static,
    S: NativeScalar,
{
    assert!(
        ptr::eq(map.mesh, mesh),
        "property map belongs to a different mesh"
    );
    map.remove();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, EdgeCategory, ElementKind};
    use crate::pmap::{get, put};
    use nalgebra::Point3;

    fn two_triangles() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap()
    }

    #[test]
    fn test_create_starts_at_default() {
        let mesh = two_triangles();
        let map = PropertyMap::<FaceId, i32>::create(&mesh, "f:label").unwrap();
        assert!(mesh.face_ids().all(|f| get(&map, f) == 0));
        assert_eq!(map.category(), MapCategory::Lvalue);
    }

    #[test]
    fn test_put_then_get() {
        let mesh = two_triangles();
        let map = add(VertexProperty::<String>::new("v:name"), &mesh).unwrap();
        put(&map, VertexId::new(2), "apex".to_string());
        assert_eq!(get(&map, VertexId::new(2)), "apex");
        assert_eq!(get(&map, VertexId::new(1)), "");
    }

    #[test]
    fn test_copies_share_cells() {
        let mesh = two_triangles();
        let a = add(HalfEdgeProperty::<u8>::unnamed(), &mesh).unwrap();
        let b = a;
        put(&a, HalfEdgeId::new(3), 7);
        assert_eq!(get(&b, HalfEdgeId::new(3)), 7);
    }

    #[test]
    fn test_wrap_existing_handle() {
        let mesh = two_triangles();
        let handle = mesh.add_property::<EdgeCategory, f64>("e:cost").unwrap();
        let map = PropertyMap::<EdgeId, f64>::wrap(&mesh, handle);
        put(&map, EdgeId::new(1), 2.5);
        assert_eq!(*mesh.property(handle, EdgeId::new(1)), 2.5);
    }

    #[test]
    fn test_edge_cell_shared_by_twins() {
        let mesh = two_triangles();
        let map = add(EdgeProperty::<u32>::new("e:tag"), &mesh).unwrap();

        // Half-edges 0 and 1 are the shared diagonal
        let h = HalfEdgeId::new(1);
        put(&map, h.edge(), 42);
        assert_eq!(get(&map, h.opposite().edge()), 42);
        assert_eq!(mesh.edge_ids().filter(|&e| get(&map, e) == 42).count(), 1);
    }

    #[test]
    fn test_borrow_in_place() {
        let mesh = two_triangles();
        let map = add(VertexProperty::<Vec<u32>>::new("v:ring"), &mesh).unwrap();
        map.borrow_mut(VertexId::new(0)).push(3);
        map.borrow_mut(VertexId::new(0)).push(4);
        assert_eq!(*map.borrow(VertexId::new(0)), vec![3, 4]);
    }

    #[test]
    fn test_remove_then_add_starts_fresh() {
        let mesh = two_triangles();
        let map = add(VertexProperty::<i32>::new("v:tmp"), &mesh).unwrap();
        put(&map, VertexId::new(0), 9);
        remove(map, &mesh);
        assert!(!map.is_live());
        assert!(!mesh.property_names(ElementKind::Vertex).contains(&"v:tmp".to_string()));

        let again = add(VertexProperty::<i32>::new("v:tmp"), &mesh).unwrap();
        assert_eq!(get(&again, VertexId::new(0)), 0);
    }

    #[test]
    #[should_panic(expected = "stale")]
    fn test_stale_map_panics() {
        let mesh = two_triangles();
        let map = add(FaceProperty::<i32>::unnamed(), &mesh).unwrap();
        let copy = map;
        remove(map, &mesh);
        let _ = get(&copy, FaceId::new(0));
    }

    #[test]
    #[should_panic(expected = "different mesh")]
    fn test_remove_from_wrong_mesh() {
        let mesh = two_triangles();
        let other = two_triangles();
        let map = add(FaceProperty::<i32>::unnamed(), &mesh).unwrap();
        remove(map, &other);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(VertexProperty::<i32>::default().name(), UNNAMED_PROPERTY);
        assert_eq!(EdgeProperty::<i32>::new("e:w").name(), "e:w");
        assert_eq!(format!("{:?}", FaceProperty::<i32>::new("f:x")), "PropertyTag(\"f:x\")");
    }
}
