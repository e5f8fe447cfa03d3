//! Dijkstra's algorithm over the edge graph.
//!
//! The search is generic in its edge weights and vertex numbering, and keeps
//! its tentative distances in a temporary vertex property that is released
//! before returning.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use super::GeodesicResult;
use crate::error::Result;
use crate::mesh::{EdgeId, HalfEdgeMesh, MeshIndex, NativeScalar, VertexId};
use crate::pmap::{
    add, get, property_map, put, remove, EdgeWeight, ReadablePropertyMap, VertexIndex,
    VertexProperty,
};

/// Name of the scratch property holding tentative distances.
const DISTANCE_PROPERTY: &str = "v:dijkstra_distance";

/// Options for Dijkstra's algorithm.
#[derive(Debug, Clone, Default)]
pub struct DijkstraOptions {
    /// Record predecessors so paths can be reconstructed.
    pub store_predecessors: bool,

    /// Do not expand vertices farther than this.
    pub max_distance: Option<f64>,

    /// Stop once the vertex with this index is settled.
    pub target: Option<usize>,
}

impl DijkstraOptions {
    /// Enable predecessor storage for [`GeodesicResult::path_to`].
    pub fn with_predecessors(mut self, store: bool) -> Self {
        self.store_predecessors = store;
        self
    }

    /// Set the exploration radius.
    pub fn with_max_distance(mut self, max_dist: f64) -> Self {
        self.max_distance = Some(max_dist);
        self
    }

    /// Set the vertex index to stop at.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }
}

/// Queue entry, ordered so that `BinaryHeap` pops the nearest first.
#[derive(Debug, Clone, Copy)]
struct Candidate<I: MeshIndex> {
    vertex: VertexId<I>,
    distance: f64,
}

impl<I: MeshIndex> PartialEq for Candidate<I> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl<I: MeshIndex> Eq for Candidate<I> {}

impl<I: MeshIndex> PartialOrd for Candidate<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: MeshIndex> Ord for Candidate<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Distances from `source` using Euclidean edge lengths.
pub fn dijkstra<I: MeshIndex, S: NativeScalar>(
    mesh: &HalfEdgeMesh<I, S>,
    source: VertexId<I>,
    options: &DijkstraOptions,
) -> Result<GeodesicResult<I>> {
    dijkstra_multiple(mesh, &[source], options)
}

/// Distances from the nearest of `sources` using Euclidean edge lengths.
///
/// Every source starts at distance zero.
pub fn dijkstra_multiple<I: MeshIndex, S: NativeScalar>(
    mesh: &HalfEdgeMesh<I, S>,
    sources: &[VertexId<I>],
    options: &DijkstraOptions,
) -> Result<GeodesicResult<I>> {
    let weights = property_map(EdgeWeight, mesh);
    let index = property_map(VertexIndex, mesh);
    dijkstra_with(mesh, sources, &weights, &index, options)
}

/// Distances from the nearest of `sources` under arbitrary edge weights.
///
/// `weights` must be non-negative. `index` must number the vertices densely
/// in `0..num_vertices`; results and predecessors are laid out by it.
///
/// Sources outside the mesh are ignored. The only error is a failed
/// allocation of the scratch distance property.
pub fn dijkstra_with<I, S, W, X>(
    mesh: &HalfEdgeMesh<I, S>,
    sources: &[VertexId<I>],
    weights: &W,
    index: &X,
    options: &DijkstraOptions,
) -> Result<GeodesicResult<I>>
where
    I: MeshIndex,
    S: NativeScalar,
    W: ReadablePropertyMap<EdgeId<I>, Value = f64>,
    X: ReadablePropertyMap<VertexId<I>, Value = usize>,
{
    let n = mesh.num_vertices();
    if n == 0 || sources.is_empty() {
        return Ok(GeodesicResult::new(vec![f64::INFINITY; n], None));
    }

    let tentative = add(VertexProperty::<f64, I>::new(DISTANCE_PROPERTY), mesh)?;
    for v in mesh.vertex_ids() {
        put(&tentative, v, f64::INFINITY);
    }

    let mut predecessors = options.store_predecessors.then(|| vec![None; n]);
    let mut heap = BinaryHeap::new();

    for &source in sources {
        if source.index() < n {
            put(&tentative, source, 0.0);
            heap.push(Candidate {
                vertex: source,
                distance: 0.0,
            });
        }
    }

    let mut settled = 0usize;
    while let Some(Candidate { vertex: u, distance }) = heap.pop() {
        if distance > get(&tentative, u) {
            continue;
        }
        settled += 1;

        if options.target == Some(index.get(u)) {
            break;
        }
        if options.max_distance.is_some_and(|max| distance > max) {
            continue;
        }

        for he in mesh.vertex_halfedges(u) {
            let v = mesh.dest(he);
            let candidate = distance + weights.get(he.edge());
            if candidate < get(&tentative, v) {
                put(&tentative, v, candidate);
                if let Some(preds) = predecessors.as_mut() {
                    preds[index.get(v)] = Some(index.get(u));
                }
                heap.push(Candidate {
                    vertex: v,
                    distance: candidate,
                });
            }
        }
    }

    let mut distances = vec![f64::INFINITY; n];
    for v in mesh.vertex_ids() {
        distances[index.get(v)] = get(&tentative, v);
    }
    remove(tentative, mesh);

    trace!("Dijkstra settled {} of {} vertices", settled, n);
    Ok(GeodesicResult::new(distances, predecessors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, ElementKind};
    use crate::pmap::{add, EdgeProperty, MapCategory};
    use nalgebra::Point3;

    fn single_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    fn grid(n: usize) -> HalfEdgeMesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f32, j as f32, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + n + 1;
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_single_triangle() {
        let mesh = single_triangle();
        let result = dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.distance(VertexId::new(0)), 0.0);
        assert!((result.distance(VertexId::new(1)) - 1.0).abs() < 1e-10);
        assert!((result.distance(VertexId::new(2)) - 1.25f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_scratch_property_released() {
        let mesh = grid(2);
        let before = mesh.property_names(ElementKind::Vertex);
        dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();
        assert_eq!(mesh.property_names(ElementKind::Vertex), before);
    }

    #[test]
    fn test_grid_diagonal() {
        let mesh = grid(2);
        let result = dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();

        assert_eq!(result.reachable_count(), 9);
        // Two diagonal hops from (0,0) to (2,2)
        assert!((result.distance(VertexId::new(8)) - 2.0 * 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_path_reconstruction() {
        let mesh = single_triangle();
        let options = DijkstraOptions::default().with_predecessors(true);
        let result = dijkstra(&mesh, VertexId::new(0), &options).unwrap();

        assert_eq!(result.path_to(VertexId::new(0)), Some(vec![VertexId::new(0)]));
        assert_eq!(
            result.path_to(VertexId::new(1)),
            Some(vec![VertexId::new(0), VertexId::new(1)])
        );
    }

    #[test]
    fn test_no_path_without_predecessors() {
        let mesh = single_triangle();
        let result = dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();
        assert_eq!(result.path_to(VertexId::new(1)), None);
    }

    #[test]
    fn test_max_distance() {
        let mesh = grid(3);
        let options = DijkstraOptions::default().with_max_distance(1.5);
        let result = dijkstra(&mesh, VertexId::new(0), &options).unwrap();

        assert!(result.is_reachable(VertexId::new(0)));
        assert!(result.is_reachable(VertexId::new(1)));
        assert!(result.is_reachable(VertexId::new(4)));
        assert!(!result.is_reachable(VertexId::new(15)));
    }

    #[test]
    fn test_target() {
        let mesh = grid(3);
        let options = DijkstraOptions::default().with_target(5);
        let result = dijkstra(&mesh, VertexId::new(0), &options).unwrap();
        assert!((result.distance(VertexId::new(5)) - 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_multiple_sources() {
        let mesh = grid(2);
        let sources = [VertexId::new(0), VertexId::new(8)];
        let result = dijkstra_multiple(&mesh, &sources, &DijkstraOptions::default()).unwrap();

        assert_eq!(result.distance(VertexId::new(0)), 0.0);
        assert_eq!(result.distance(VertexId::new(8)), 0.0);
        assert!((result.distance(VertexId::new(4)) - 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_custom_weights() {
        let mesh = grid(2);
        let hops = add(EdgeProperty::<f64>::new("e:hops"), &mesh).unwrap();
        for e in mesh.edge_ids() {
            put(&hops, e, 1.0);
        }
        assert_eq!(hops.category(), MapCategory::Lvalue);

        let index = property_map(VertexIndex, &mesh);
        let result = dijkstra_with(
            &mesh,
            &[VertexId::new(0)],
            &hops,
            &index,
            &DijkstraOptions::default(),
        )
        .unwrap();

        // Opposite corner is two diagonal hops away
        assert_eq!(result.distance(VertexId::new(8)), 2.0);
        assert_eq!(result.distance(VertexId::new(2)), 2.0);
    }

    #[test]
    fn test_farthest_vertex() {
        let mesh = single_triangle();
        let result = dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();

        let (farthest, dist) = result.farthest_vertex().unwrap();
        assert_eq!(farthest, VertexId::new(2));
        assert!((dist - 1.25f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh: HalfEdgeMesh = HalfEdgeMesh::new();
        let result = dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_no_sources() {
        let mesh = single_triangle();
        let result = dijkstra_multiple(&mesh, &[], &DijkstraOptions::default()).unwrap();
        assert_eq!(result.reachable_count(), 0);
    }

    #[test]
    fn test_triangle_inequality() {
        let mesh = grid(3);
        let result = dijkstra(&mesh, VertexId::new(0), &DijkstraOptions::default()).unwrap();
        let weights = property_map(EdgeWeight, &mesh);

        for v in mesh.vertex_ids() {
            for he in mesh.vertex_halfedges(v) {
                let u = mesh.dest(he);
                let len = weights.get(he.edge());
                assert!(
                    (result.distance(v) - result.distance(u)).abs() <= len + 1e-10,
                    "triangle inequality violated on {:?}",
                    he
                );
            }
        }
    }
}
