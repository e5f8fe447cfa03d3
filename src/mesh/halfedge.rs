//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for polygon meshes, together with the native property storage every
//! element kind carries.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions,
//!   stored next to each other (slots `2e` and `2e + 1`)
//! - Each half-edge knows its **twin** (opposite half-edge), **next** (next half-edge
//!   around the face), **origin vertex**, and **incident face**
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge on its boundary
//!
//! # Boundary Handling
//!
//! Boundary half-edges (on mesh boundaries) have an invalid face ID. Their twins
//! are the interior half-edges. Boundary loops can be traversed using the `next`
//! pointer on boundary half-edges.
//!
//! # Properties
//!
//! Per-element values live in four property arenas owned by the mesh, one per
//! [`ElementKind`]. Vertex positions are themselves a vertex property. The
//! arenas sit behind `RefCell`s so values can be read and written through a
//! shared mesh reference; the mesh is therefore not `Sync`, and callers must
//! not hold a borrowed cell across a write to the same kind.

use std::cell::{Ref, RefCell, RefMut};

use nalgebra::Point3;

use super::index::{representative, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::property::{
    Category, Descriptor, ElementKind, PropHandle, Property, PropertyContainer, VPropHandle,
};
use super::scalar::NativeScalar;
use crate::error::Result;

/// Name of the built-in vertex position property.
pub const POINTS_PROPERTY: &str = "v:points";

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Vertex<I: MeshIndex = u32> {
    /// One outgoing half-edge from this vertex.
    /// For boundary vertices, this is guaranteed to be a boundary half-edge.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Default for Vertex<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face (clockwise).
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge belongs to.
    /// Invalid for boundary half-edges.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A half-edge mesh with per-element property storage.
///
/// `S` is the scalar vertex coordinates are stored in. It defaults to `f32`,
/// one step below the `f64` used by public points.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32, S: NativeScalar = f32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All half-edges in the mesh, twins adjacent.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All faces in the mesh.
    pub(crate) faces: Vec<Face<I>>,

    /// One property arena per element kind, indexed by `ElementKind as usize`.
    props: [RefCell<PropertyContainer>; 4],

    /// Vertex positions.
    points: VPropHandle<Point3<S>>,
}

impl<I: MeshIndex, S: NativeScalar> Default for HalfEdgeMesh<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex, S: NativeScalar> HalfEdgeMesh<I, S> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Triangle meshes: E ~ 3F/2, so HE ~ 3F, plus some slack for the boundary
        let num_halfedges = num_faces * 3 + num_faces / 2;

        let mut props = ElementKind::ALL.map(|kind| RefCell::new(PropertyContainer::new(kind)));
        let origin = Point3::new(S::narrow(0.0), S::narrow(0.0), S::narrow(0.0));
        let points = props[ElementKind::Vertex as usize]
            .get_mut()
            .add_filled(POINTS_PROPERTY, origin);

        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
            props,
            points,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex in native coordinates.
    #[inline]
    pub fn point(&self, v: VertexId<I>) -> Point3<S> {
        self.property(self.points, v).clone()
    }

    /// Set the position of a vertex in native coordinates.
    #[inline]
    pub fn set_point(&self, v: VertexId<I>, point: Point3<S>) {
        *self.property_mut(self.points, v) = point;
    }

    /// Handle of the built-in vertex position property.
    #[inline]
    pub fn points_handle(&self) -> VPropHandle<Point3<S>> {
        self.points
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the representative half-edge of an edge.
    #[inline]
    pub fn edge_halfedge(&self, e: EdgeId<I>) -> HalfEdgeId<I> {
        representative(e)
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true; // Isolated vertex
        }

        let mut he = start;
        loop {
            if self.is_boundary_halfedge(he) {
                return true;
            }
            he = self.next(self.twin(he));
            if he == start {
                break;
            }
        }
        false
    }

    /// Check if an edge is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        let he = representative(e);
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(he.opposite())
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.num_edges()).map(EdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over half-edges around a vertex (outgoing half-edges).
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I, S> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I, S> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    // ==================== Construction ====================

    /// Add a new isolated vertex and return its ID.
    ///
    /// Every vertex property gains a default cell for it.
    ///
    /// # Panics
    /// Panics if the vertex count would exceed what `I` can address.
    pub fn add_vertex(&mut self, point: Point3<S>) -> VertexId<I> {
        assert!(
            I::can_address(self.vertices.len() + 1),
            "too many vertices for index type {}",
            std::any::type_name::<I>()
        );
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::default());
        let container = self.props[ElementKind::Vertex as usize].get_mut();
        container.grow(1);
        container.column_mut(self.points)[id.index()] = point;
        id
    }

    /// Append a pair of half-edges `a -> b` and `b -> a` and return the first.
    pub(crate) fn new_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> HalfEdgeId<I> {
        assert!(
            I::can_address(self.halfedges.len() + 2),
            "too many half-edges for index type {}",
            std::any::type_name::<I>()
        );
        let he = HalfEdgeId::new(self.halfedges.len());
        let twin = HalfEdgeId::new(self.halfedges.len() + 1);
        self.halfedges.push(HalfEdge {
            origin: a,
            twin,
            ..HalfEdge::new()
        });
        self.halfedges.push(HalfEdge {
            origin: b,
            twin: he,
            ..HalfEdge::new()
        });
        self.props[ElementKind::HalfEdge as usize].get_mut().grow(2);
        self.props[ElementKind::Edge as usize].get_mut().grow(1);
        he
    }

    /// Append a face with the given boundary half-edge.
    pub(crate) fn new_face(&mut self, halfedge: HalfEdgeId<I>) -> FaceId<I> {
        assert!(
            I::can_address(self.faces.len() + 1),
            "too many faces for index type {}",
            std::any::type_name::<I>()
        );
        let id = FaceId::new(self.faces.len());
        self.faces.push(Face::new(halfedge));
        self.props[ElementKind::Face as usize].get_mut().grow(1);
        id
    }

    // ==================== Native Properties ====================

    #[inline]
    fn container(&self, kind: ElementKind) -> &RefCell<PropertyContainer> {
        &self.props[kind as usize]
    }

    /// Borrow the property arena of one element kind.
    pub fn properties(&self, kind: ElementKind) -> Ref<'_, PropertyContainer> {
        self.container(kind).borrow()
    }

    /// Names of the live properties of one element kind.
    pub fn property_names(&self, kind: ElementKind) -> Vec<String> {
        self.properties(kind).names().map(str::to_owned).collect()
    }

    /// Attach a new property to every element of category `C`.
    ///
    /// All cells start as `T::default()`. The only possible error is a
    /// failed allocation of the new column.
    pub fn add_property<C: Category, T: Property>(&self, name: &str) -> Result<PropHandle<C, T>> {
        self.container(C::KIND).borrow_mut().add(name)
    }

    /// Release a property column.
    ///
    /// Every handle and map still referring to it becomes stale.
    ///
    /// # Panics
    /// Panics if the handle is already stale or names the built-in point
    /// property.
    pub fn remove_property<C: Category, T: 'static>(&self, handle: PropHandle<C, T>) {
        assert!(
            !(C::KIND == ElementKind::Vertex && handle.key() == self.points.key()),
            "the `{}` property cannot be removed",
            POINTS_PROPERTY
        );
        self.container(C::KIND).borrow_mut().remove(handle);
    }

    /// Check whether a property handle is still live.
    pub fn has_property<C: Category, T: 'static>(&self, handle: PropHandle<C, T>) -> bool {
        self.container(C::KIND).borrow().contains(handle)
    }

    /// Look up a live property by name and value type.
    pub fn find_property<C: Category, T: 'static>(&self, name: &str) -> Option<PropHandle<C, T>> {
        self.container(C::KIND).borrow().find(name)
    }

    /// Borrow one property cell.
    ///
    /// # Panics
    /// Panics if the handle is stale, the key is out of range, or the cell's
    /// arena is currently borrowed mutably.
    pub fn property<K, T>(&self, handle: PropHandle<K::Category, T>, key: K) -> Ref<'_, T>
    where
        K: Descriptor<Index = I>,
        T: 'static,
    {
        let kind = <K::Category as Category>::KIND;
        Ref::map(self.container(kind).borrow(), |c| &c.column(handle)[key.slot()])
    }

    /// Borrow one property cell mutably.
    ///
    /// # Panics
    /// Panics if the handle is stale, the key is out of range, or the cell's
    /// arena is currently borrowed.
    pub fn property_mut<K, T>(&self, handle: PropHandle<K::Category, T>, key: K) -> RefMut<'_, T>
    where
        K: Descriptor<Index = I>,
        T: 'static,
    {
        let kind = <K::Category as Category>::KIND;
        RefMut::map(self.container(kind).borrow_mut(), |c| {
            &mut c.column_mut(handle)[key.slot()]
        })
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        if self.halfedges.len() % 2 != 0 {
            return false;
        }

        // Check vertices
        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() && self.halfedge(v.halfedge).origin != VertexId::new(i) {
                return false;
            }
        }

        // Check half-edges
        for (i, he) in self.halfedges.iter().enumerate() {
            let heid = HalfEdgeId::<I>::new(i);

            // Twins are paired by slot
            if he.twin != heid.opposite() || self.halfedge(he.twin).twin != heid {
                return false;
            }

            if he.next.is_valid() && self.halfedge(he.next).prev != heid {
                return false;
            }

            if he.prev.is_valid() && self.halfedge(he.prev).next != heid {
                return false;
            }
        }

        // Check faces
        self.faces.iter().all(|f| f.halfedge.is_valid())
            && self
                .props
                .iter()
                .zip([
                    self.vertices.len(),
                    self.faces.len(),
                    self.halfedges.len(),
                    self.num_edges(),
                ])
                .all(|(c, len)| c.borrow().len() == len)
    }
}

/// Iterator over half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32, S: NativeScalar = f32> {
    mesh: &'a HalfEdgeMesh<I, S>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex, S: NativeScalar> VertexHalfEdgeIter<'a, I, S> {
    fn new(mesh: &'a HalfEdgeMesh<I, S>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex, S: NativeScalar> Iterator for VertexHalfEdgeIter<'a, I, S> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // If he goes v -> w, next(twin(he)) is the next half-edge leaving v.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start || !self.current.is_valid() {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32, S: NativeScalar = f32> {
    mesh: &'a HalfEdgeMesh<I, S>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex, S: NativeScalar> FaceHalfEdgeIter<'a, I, S> {
    fn new(mesh: &'a HalfEdgeMesh<I, S>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex, S: NativeScalar> Iterator for FaceHalfEdgeIter<'a, I, S> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
