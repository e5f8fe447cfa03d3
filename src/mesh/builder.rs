//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists as commonly
//! found in mesh file formats. Half-edges are created in twin pairs the first
//! time an undirected edge is seen, so edge `e` always owns half-edge slots
//! `2e` and `2e + 1`.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use super::property::ElementKind;
use super::scalar::NativeScalar;
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and polygonal faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each a counter-clockwise list of vertex indices
///
/// # Returns
/// A half-edge mesh, or an error if the input is invalid, not manifold, or
/// too large for the index type `I`.
pub fn build_from_polygons<I, S, F>(vertices: &[Point3<S>], faces: &[F]) -> Result<HalfEdgeMesh<I, S>>
where
    I: MeshIndex,
    S: NativeScalar,
    F: AsRef<[usize]>,
{
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        validate_face(fi, face.as_ref(), vertices.len())?;
    }

    check_capacity::<I>(ElementKind::Vertex, vertices.len())?;
    check_capacity::<I>(ElementKind::Face, faces.len())?;

    let corners: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());

    let vertex_ids: Vec<VertexId<I>> = vertices.iter().map(|p| mesh.add_vertex(*p)).collect();

    // Map from directed edge (v0, v1) to half-edge ID
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::with_capacity(corners * 2);

    // First pass: create edges, faces and the interior half-edge cycles
    let mut ring: Vec<HalfEdgeId<I>> = Vec::new();
    for face in faces {
        let face = face.as_ref();
        let n = face.len();

        ring.clear();
        for k in 0..n {
            let (a, b) = (face[k], face[(k + 1) % n]);
            let he = match edge_map.get(&(a, b)) {
                Some(&he) => {
                    if !mesh.is_boundary_halfedge(he) {
                        return Err(MeshError::NonManifoldEdge { v0: a, v1: b });
                    }
                    he
                }
                None => {
                    check_capacity::<I>(ElementKind::HalfEdge, mesh.num_halfedges() + 2)?;
                    let he = mesh.new_edge(vertex_ids[a], vertex_ids[b]);
                    edge_map.insert((a, b), he);
                    edge_map.insert((b, a), he.opposite());
                    he
                }
            };
            ring.push(he);
        }

        let face_id = mesh.new_face(ring[0]);
        for k in 0..n {
            let he = mesh.halfedge_mut(ring[k]);
            he.next = ring[(k + 1) % n];
            he.prev = ring[(k + n - 1) % n];
            he.face = face_id;
            let origin = he.origin;
            // Overwritten for shared vertices
            mesh.vertex_mut(origin).halfedge = ring[k];
        }
    }

    // Second pass: link boundary half-edges into loops
    link_boundary_loops(&mut mesh)?;

    // Third pass: ensure boundary vertices point to boundary half-edges
    fix_boundary_vertex_halfedges(&mut mesh);

    log::debug!(
        "built mesh: {} vertices, {} edges, {} faces",
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );

    debug_assert!(mesh.is_valid());
    Ok(mesh)
}

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use meshprop::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex, S: NativeScalar>(
    vertices: &[Point3<S>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I, S>> {
    build_from_polygons(vertices, faces)
}

/// Build a half-edge mesh from vertices and quad faces.
///
/// Each face is `[v0, v1, v2, v3]`, counter-clockwise.
pub fn build_from_quads<I: MeshIndex, S: NativeScalar>(
    vertices: &[Point3<S>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I, S>> {
    build_from_polygons(vertices, faces)
}

fn check_capacity<I: MeshIndex>(kind: ElementKind, count: usize) -> Result<()> {
    if I::can_address(count) {
        Ok(())
    } else {
        Err(MeshError::TooManyElements { kind, count })
    }
}

fn validate_face(fi: usize, face: &[usize], num_vertices: usize) -> Result<()> {
    if face.len() < 3 {
        return Err(MeshError::FaceTooSmall {
            face: fi,
            corners: face.len(),
        });
    }
    for &vi in face {
        if vi >= num_vertices {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }
    for (i, a) in face.iter().enumerate() {
        if face[i + 1..].contains(a) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }
    Ok(())
}

/// Link boundary half-edges into proper loops.
///
/// Each boundary vertex must start exactly one boundary half-edge; two means
/// the faces around it form separate fans.
fn link_boundary_loops<I: MeshIndex, S: NativeScalar>(mesh: &mut HalfEdgeMesh<I, S>) -> Result<()> {
    let boundary_hes: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    // Group by origin vertex for quick lookup
    let mut outgoing: HashMap<usize, HalfEdgeId<I>> = HashMap::new();
    for &he in &boundary_hes {
        let origin = mesh.origin(he).index();
        if outgoing.insert(origin, he).is_some() {
            return Err(MeshError::NonManifoldVertex { vertex: origin });
        }
    }

    // The next boundary half-edge starts where this one ends
    for &he in &boundary_hes {
        let dest = mesh.dest(he).index();
        if let Some(&next_he) = outgoing.get(&dest) {
            mesh.halfedge_mut(he).next = next_he;
            mesh.halfedge_mut(next_he).prev = he;
        }
    }
    Ok(())
}

/// Ensure boundary vertices point to a boundary half-edge.
fn fix_boundary_vertex_halfedges<I: MeshIndex, S: NativeScalar>(mesh: &mut HalfEdgeMesh<I, S>) {
    for vid in mesh.vertex_ids().collect::<Vec<_>>() {
        let boundary = mesh
            .vertex_halfedges(vid)
            .find(|&he| mesh.is_boundary_halfedge(he));
        if let Some(he) = boundary {
            mesh.vertex_mut(vid).halfedge = he;
        }
    }
}
