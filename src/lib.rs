//! # meshprop
//!
//! Property maps over a half-edge polygon mesh.
//!
//! Graph and geometry algorithms are easiest to reuse when they see mesh
//! attributes through one narrow protocol: `get(map, key)` and
//! `put(map, key, value)`. This crate provides a half-edge mesh with typed
//! per-element property storage, and adapts everything a mesh knows about
//! its elements to that protocol.
//!
//! ## Features
//!
//! - **Stored properties**: client-defined columns on vertices, faces,
//!   half-edges or edges, allocated with [`pmap::add`] and released with
//!   [`pmap::remove`]
//! - **Intrinsic maps**: dense element indices, vertex positions and
//!   Euclidean edge lengths, with no allocation
//! - **Capability tags**: every map reports whether it is read-only,
//!   read/write or borrowable ([`pmap::MapCategory`])
//! - **Edge canonicalization**: an edge is addressed through either of its
//!   half-edges and always reaches the same cell
//! - **Flexible indexing**: 16-, 32- and 64-bit element indices
//!
//! ## Quick Start
//!
//! ```
//! use meshprop::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // Label faces with a stored property
//! let label = add(FaceProperty::<u32>::new("f:label"), &mesh).unwrap();
//! for f in mesh.face_ids() {
//!     put(&label, f, f.index() as u32 * 10);
//! }
//! assert_eq!(get(&label, FaceId::new(3)), 30);
//!
//! // Read computed edge lengths
//! let weights = property_map(EdgeWeight, &mesh);
//! let total: f64 = mesh.edge_ids().map(|e| get(&weights, e)).sum();
//! assert!(total > 0.0);
//!
//! remove(label, &mesh);
//! ```
//!
//! ## Cargo features
//!
//! - `native-points`: the vertex point map exposes the mesh's native
//!   `Point3<S>` instead of widening to `Point3<f64>`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod pmap;

/// Prelude module for convenient imports.
///
/// ```
/// use meshprop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, build_from_triangles, EdgeId, ElementKind, FaceId,
        HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId,
    };
    pub use crate::pmap::{
        add, get, get_property, is_writable, property_map, put, put_point, remove, EdgeIndex,
        EdgeProperty, EdgeWeight, FaceIndex, FaceProperty, HalfEdgeIndex, HalfEdgeProperty,
        MapCategory, PropertyMap, ReadablePropertyMap, VertexIndex, VertexPoint, VertexProperty,
        WritablePropertyMap,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
