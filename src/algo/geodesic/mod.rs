//! Shortest paths along mesh edges.
//!
//! # Example
//!
//! ```
//! use meshprop::prelude::*;
//! use meshprop::algo::geodesic::{dijkstra, DijkstraOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//!
//! let result = dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();
//! assert_eq!(result.distance(VertexId::new(2)), 2.0);
//!
//! if let Some((v, d)) = result.farthest_vertex() {
//!     println!("farthest: {:?} at {}", v, d);
//! }
//! ```

mod dijkstra;

use std::marker::PhantomData;

pub use dijkstra::{dijkstra, dijkstra_multiple, dijkstra_with, DijkstraOptions};

use crate::mesh::{MeshIndex, VertexId};

/// Distances from one or more sources to every vertex.
///
/// Entries are addressed by vertex index. Unreached vertices hold
/// `f64::INFINITY`.
#[derive(Debug, Clone)]
pub struct GeodesicResult<I: MeshIndex = u32> {
    distances: Vec<f64>,
    /// Predecessor index per vertex, if requested. Sources have none.
    predecessors: Option<Vec<Option<usize>>>,
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> GeodesicResult<I> {
    pub(crate) fn new(distances: Vec<f64>, predecessors: Option<Vec<Option<usize>>>) -> Self {
        Self {
            distances,
            predecessors,
            _marker: PhantomData,
        }
    }

    /// Distance to `v`, or `f64::INFINITY` if it was not reached.
    #[inline]
    pub fn distance(&self, v: VertexId<I>) -> f64 {
        self.distances[v.index()]
    }

    /// All distances, indexed by vertex index.
    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Number of vertices covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Whether the mesh had no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// The reached vertex with the largest distance.
    pub fn farthest_vertex(&self) -> Option<(VertexId<I>, f64)> {
        self.reachable_iter()
            .fold(None, |best: Option<(VertexId<I>, f64)>, (v, d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((v, d)),
            })
    }

    /// Vertices on a shortest path from the nearest source to `target`,
    /// source first.
    ///
    /// Returns `None` when predecessors were not stored or `target` was not
    /// reached. The path to a source is that source alone.
    pub fn path_to(&self, target: VertexId<I>) -> Option<Vec<VertexId<I>>> {
        let predecessors = self.predecessors.as_ref()?;
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target.index();
        while let Some(pred) = predecessors[current] {
            // A cycle would mean corrupted predecessors
            if path.len() > self.distances.len() {
                return None;
            }
            path.push(VertexId::new(pred));
            current = pred;
        }

        path.reverse();
        Some(path)
    }

    /// Whether `v` was reached.
    #[inline]
    pub fn is_reachable(&self, v: VertexId<I>) -> bool {
        self.distances[v.index()].is_finite()
    }

    /// Number of reached vertices, sources included.
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Iterate over `(vertex, distance)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId<I>, f64)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .map(|(i, &d)| (VertexId::new(i), d))
    }

    /// Iterate over reached vertices only.
    pub fn reachable_iter(&self) -> impl Iterator<Item = (VertexId<I>, f64)> + '_ {
        self.iter().filter(|(_, d)| d.is_finite())
    }
}
