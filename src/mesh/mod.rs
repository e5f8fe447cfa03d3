//! Core mesh data structures.
//!
//! This module provides the half-edge mesh the property maps in
//! [`crate::pmap`] are built over: topology, element enumeration and the
//! native per-element property storage.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a polygon mesh stored as a half-edge
//! (doubly-connected edge list). Twin half-edges occupy adjacent slots, so
//! every undirected edge is addressable by an [`EdgeId`] without a separate
//! edge table.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//! - [`EdgeId`] - Identifies a full edge
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size. Indices
//! are dense per element kind.
//!
//! # Native Storage
//!
//! Each element kind has a [`PropertyContainer`] of typed columns addressed
//! by [`PropHandle`]s. Vertex coordinates are stored in the native scalar
//! `S` ([`NativeScalar`], `f32` by default).
//!
//! # Construction
//!
//! ```
//! use meshprop::mesh::{HalfEdgeMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod halfedge;
mod index;
mod property;
mod scalar;

pub use builder::{build_from_polygons, build_from_quads, build_from_triangles};
pub use halfedge::{
    Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter, POINTS_PROPERTY,
};
pub use index::{representative, EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use property::{
    Category, ColumnKey, Descriptor, EPropHandle, EdgeCategory, ElementKind, FPropHandle, FaceCategory,
    HPropHandle, HalfEdgeCategory, PropHandle, Property, PropertyContainer, VPropHandle,
    VertexCategory,
};
pub use scalar::NativeScalar;
