//! Error types for meshprop.
//!
//! Only mesh construction and property allocation report errors. Misuse of a
//! property map (stale handle, key from another mesh, outstanding borrow)
//! is a contract violation and panics.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::mesh::ElementKind;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners.
    #[error("face {face} has {corners} corners, at least 3 are required")]
    FaceTooSmall {
        /// The face index.
        face: usize,
        /// Number of corners given.
        corners: usize,
    },

    /// A face has duplicate vertex indices.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A directed edge is used by more than one face.
    ///
    /// This happens for edges with more than two incident faces and for
    /// neighbouring faces with inconsistent orientation.
    #[error("edge ({v0}, {v1}) has more than two incident faces or inconsistent orientation")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// Two boundary loops pass through the same vertex.
    ///
    /// The faces around such a vertex do not form a single fan, so the
    /// vertex has no well-defined boundary successor.
    #[error("vertex {vertex} is non-manifold (faces around it form more than one fan)")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// The mesh would hold more elements than its index type can address.
    #[error("{count} {kind:?} elements exceed the capacity of the mesh index type")]
    TooManyElements {
        /// Element kind that overflowed.
        kind: ElementKind,
        /// Number of elements requested.
        count: usize,
    },

    /// The mesh could not allocate storage for a new property.
    #[error("failed to allocate {kind:?} property `{name}`: {source}")]
    PropertyAllocation {
        /// Name the property was requested under.
        name: String,
        /// Element kind the property was requested for.
        kind: ElementKind,
        /// The underlying allocation failure.
        #[source]
        source: TryReserveError,
    },
}
