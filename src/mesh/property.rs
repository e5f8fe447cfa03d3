//! Native per-element property storage.
//!
//! Every mesh owns one [`PropertyContainer`] per [`ElementKind`]. A container
//! is an arena of typed columns; each column holds one cell per element of
//! its kind and grows with the topology. Columns are addressed through
//! [`PropHandle`]s wrapping a versioned [`slotmap`] key: they do not own the
//! column and are not reference counted. Removing a property frees its
//! column immediately, and every handle still pointing at it is detected as
//! stale on its next use, even after the slot has been reused.

use std::any::Any;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use slotmap::{new_key_type, Key, SlotMap};

use super::index::{representative, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// The four element kinds a property can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Vertices.
    Vertex = 0,
    /// Faces.
    Face = 1,
    /// Directed half-edges.
    HalfEdge = 2,
    /// Undirected edges.
    Edge = 3,
}

impl ElementKind {
    /// All kinds, in storage order.
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Vertex,
        ElementKind::Face,
        ElementKind::HalfEdge,
        ElementKind::Edge,
    ];
}

/// Compile-time tag selecting one of the four native storage kinds.
pub trait Category: Copy + Debug + Send + Sync + 'static {
    /// The storage kind this category resolves to.
    const KIND: ElementKind;
}

/// Vertex storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VertexCategory;

/// Face storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaceCategory;

/// Half-edge storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HalfEdgeCategory;

/// Edge storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EdgeCategory;

impl Category for VertexCategory {
    const KIND: ElementKind = ElementKind::Vertex;
}

impl Category for FaceCategory {
    const KIND: ElementKind = ElementKind::Face;
}

impl Category for HalfEdgeCategory {
    const KIND: ElementKind = ElementKind::HalfEdge;
}

impl Category for EdgeCategory {
    const KIND: ElementKind = ElementKind::Edge;
}

/// An element id that can key native property storage.
pub trait Descriptor: Copy + Eq + Hash + Debug + 'static {
    /// Integer type of the mesh the id belongs to.
    type Index: MeshIndex;

    /// Storage kind for this element category.
    type Category: Category;

    /// Position of this element's cell in its kind's storage.
    fn slot(self) -> usize;
}

impl<I: MeshIndex> Descriptor for VertexId<I> {
    type Index = I;
    type Category = VertexCategory;

    #[inline]
    fn slot(self) -> usize {
        self.index()
    }
}

impl<I: MeshIndex> Descriptor for FaceId<I> {
    type Index = I;
    type Category = FaceCategory;

    #[inline]
    fn slot(self) -> usize {
        self.index()
    }
}

impl<I: MeshIndex> Descriptor for HalfEdgeId<I> {
    type Index = I;
    type Category = HalfEdgeCategory;

    #[inline]
    fn slot(self) -> usize {
        self.index()
    }
}

impl<I: MeshIndex> Descriptor for EdgeId<I> {
    type Index = I;
    type Category = EdgeCategory;

    // Edge cells are numbered after the representative half-edge, never by a
    // counter of their own.
    #[inline]
    fn slot(self) -> usize {
        representative(self).index() >> 1
    }
}

/// Value types that can be attached to mesh elements.
///
/// New cells start out as `T::default()`.
pub trait Property: Clone + Default + 'static {}

impl<T: Clone + Default + 'static> Property for T {}

new_key_type! {
    /// Key of one column in a [`PropertyContainer`].
    pub struct ColumnKey;
}

/// Handle to one property column of category `C` holding values of type `T`.
///
/// Handles are cheap to copy and never own the column.
pub struct PropHandle<C, T> {
    key: ColumnKey,
    _marker: PhantomData<fn() -> (C, T)>,
}

/// Vertex property handle.
pub type VPropHandle<T> = PropHandle<VertexCategory, T>;
/// Face property handle.
pub type FPropHandle<T> = PropHandle<FaceCategory, T>;
/// Half-edge property handle.
pub type HPropHandle<T> = PropHandle<HalfEdgeCategory, T>;
/// Edge property handle.
pub type EPropHandle<T> = PropHandle<EdgeCategory, T>;

impl<C, T> PropHandle<C, T> {
    fn new(key: ColumnKey) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// Container key of the column.
    #[inline]
    pub fn key(self) -> ColumnKey {
        self.key
    }
}

impl<C, T> Clone for PropHandle<C, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, T> Copy for PropHandle<C, T> {}

impl<C, T> PartialEq for PropHandle<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<C, T> Eq for PropHandle<C, T> {}

impl<C, T> Hash for PropHandle<C, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<C: Category, T> Debug for PropHandle<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}Prop({:?})", C::KIND, self.key.data())
    }
}

/// Type-erased column.
trait Column: Any {
    fn name(&self) -> &str;
    fn resize(&mut self, len: usize);
    fn clone_box(&self) -> Box<dyn Column>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedColumn<T> {
    name: String,
    fill: T,
    data: Vec<T>,
}

impl<T: Clone + 'static> Column for TypedColumn<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn resize(&mut self, len: usize) {
        self.data.resize(len, self.fill.clone());
    }

    fn clone_box(&self) -> Box<dyn Column> {
        Box::new(TypedColumn {
            name: self.name.clone(),
            fill: self.fill.clone(),
            data: self.data.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct ColumnBox(Box<dyn Column>);

impl Clone for ColumnBox {
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl ColumnBox {
    fn typed<T: 'static>(&self) -> Option<&TypedColumn<T>> {
        self.0.as_any().downcast_ref()
    }

    fn typed_mut<T: 'static>(&mut self) -> Option<&mut TypedColumn<T>> {
        self.0.as_any_mut().downcast_mut()
    }
}

/// Arena of property columns for one element kind.
#[derive(Clone)]
pub struct PropertyContainer {
    kind: ElementKind,
    len: usize,
    columns: SlotMap<ColumnKey, ColumnBox>,
}

impl PropertyContainer {
    /// Create an empty container for `kind` with no elements.
    pub(crate) fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            len: 0,
            columns: SlotMap::with_key(),
        }
    }

    /// The element kind this container stores.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of cells in every column.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if there are no elements of this kind.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live columns.
    pub fn num_properties(&self) -> usize {
        self.columns.len()
    }

    /// Names of the live columns.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.values().map(|c| c.0.name())
    }

    /// Allocate a column of `T::default()` cells.
    pub(crate) fn add<C: Category, T: Property>(&mut self, name: &str) -> Result<PropHandle<C, T>> {
        debug_assert_eq!(C::KIND, self.kind);
        let mut data = Vec::new();
        data.try_reserve_exact(self.len)
            .map_err(|source| MeshError::PropertyAllocation {
                name: name.to_owned(),
                kind: self.kind,
                source,
            })?;
        data.resize(self.len, T::default());
        let handle = self.insert(TypedColumn {
            name: name.to_owned(),
            fill: T::default(),
            data,
        });
        log::debug!("added {:?} property `{}` as {:?}", self.kind, name, handle);
        Ok(handle)
    }

    /// Insert a column whose new cells are filled with `fill`.
    pub(crate) fn add_filled<C: Category, T: Clone + 'static>(
        &mut self,
        name: &str,
        fill: T,
    ) -> PropHandle<C, T> {
        debug_assert_eq!(C::KIND, self.kind);
        let data = vec![fill.clone(); self.len];
        self.insert(TypedColumn {
            name: name.to_owned(),
            fill,
            data,
        })
    }

    fn insert<C, T: Clone + 'static>(&mut self, column: TypedColumn<T>) -> PropHandle<C, T> {
        PropHandle::new(self.columns.insert(ColumnBox(Box::new(column))))
    }

    /// Release the column behind `handle`.
    ///
    /// # Panics
    /// Panics if the handle is stale.
    pub(crate) fn remove<C: Category, T: 'static>(&mut self, handle: PropHandle<C, T>) {
        match self.columns.remove(handle.key) {
            Some(column) => {
                log::debug!("removed {:?} property `{}` ({:?})", self.kind, column.0.name(), handle)
            }
            None => panic!("cannot remove stale {:?} property handle {:?}", self.kind, handle),
        }
    }

    /// Check whether `handle` still refers to a live column of type `T`.
    pub fn contains<C, T: 'static>(&self, handle: PropHandle<C, T>) -> bool {
        self.typed(handle).is_some()
    }

    /// Find a live column by name and value type.
    pub(crate) fn find<C: Category, T: 'static>(&self, name: &str) -> Option<PropHandle<C, T>> {
        self.columns
            .iter()
            .find(|(_, column)| column.typed::<T>().is_some_and(|c| c.name == name))
            .map(|(key, _)| PropHandle::new(key))
    }

    fn typed<C, T: 'static>(&self, handle: PropHandle<C, T>) -> Option<&TypedColumn<T>> {
        self.columns.get(handle.key)?.typed()
    }

    /// All cells of a column.
    ///
    /// # Panics
    /// Panics if the handle is stale.
    pub fn column<C: Category, T: 'static>(&self, handle: PropHandle<C, T>) -> &[T] {
        match self.typed(handle) {
            Some(column) => column.data.as_slice(),
            None => panic!("stale {:?} property handle {:?}", self.kind, handle),
        }
    }

    /// All cells of a column, mutably.
    ///
    /// # Panics
    /// Panics if the handle is stale.
    pub fn column_mut<C: Category, T: 'static>(&mut self, handle: PropHandle<C, T>) -> &mut [T] {
        let kind = self.kind;
        match self.columns.get_mut(handle.key).and_then(|c| c.typed_mut()) {
            Some(column) => column.data.as_mut_slice(),
            None => panic!("stale {:?} property handle {:?}", kind, handle),
        }
    }

    /// Append `count` cells to every live column.
    pub(crate) fn grow(&mut self, count: usize) {
        self.len += count;
        let len = self.len;
        for column in self.columns.values_mut() {
            column.0.resize(len);
        }
    }
}

impl Debug for PropertyContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyContainer")
            .field("kind", &self.kind)
            .field("len", &self.len)
            .field("properties", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
