//! End-to-end behavior of the property map layer.

use meshprop::mesh::{representative, EdgeCategory};
use meshprop::pmap::{EdgeWeightMap, IndexMap, PointMap, Widening};
use meshprop::prelude::*;
use nalgebra::Point3;
use proptest::prelude::*;
use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(PropertyMap<'static, VertexId, f64>: WritablePropertyMap<VertexId>, Copy);
assert_impl_all!(PointMap<'static>: WritablePropertyMap<VertexId>, Copy);
assert_not_impl_any!(EdgeWeightMap<'static>: WritablePropertyMap<EdgeId>);
assert_not_impl_any!(IndexMap<VertexId>: WritablePropertyMap<VertexId>);
assert_not_impl_any!(HalfEdgeMesh: Sync);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
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
fn edge_weight_of_3_4_5_triangle() {
    init_logging();
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 4.0, 0.0),
        Point3::new(0.0, 4.0, 0.0),
    ];
    let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

    let weights = property_map(EdgeWeight, &mesh);
    let he = mesh
        .halfedge_ids()
        .find(|&h| mesh.origin(h) == VertexId::new(0) && mesh.dest(h) == VertexId::new(1))
        .unwrap();
    assert_eq!(get(&weights, he.edge()), 5.0);
    assert_eq!(get(&weights, mesh.twin(he).edge()), 5.0);
}

#[test]
fn indices_are_dense_and_injective() {
    let mesh = grid(4);

    let mut seen: Vec<usize> = mesh
        .vertex_ids()
        .map(|v| get_property(VertexIndex, &mesh, v))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..mesh.num_vertices()).collect::<Vec<_>>());

    let mut seen: Vec<usize> = mesh
        .halfedge_ids()
        .map(|h| get_property(EdgeIndex, &mesh, h.edge()))
        .collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen, (0..mesh.num_edges()).collect::<Vec<_>>());

    let faces = property_map(FaceIndex, &mesh);
    assert!(mesh.face_ids().enumerate().all(|(i, f)| get(&faces, f) == i));
}

#[test]
fn edge_cells_are_shared_by_twins() {
    let mesh = grid(3);
    let tag = add(EdgeProperty::<i64>::new("e:id"), &mesh).unwrap();

    for h in mesh.halfedge_ids() {
        if representative(h.edge()) == h {
            put(&tag, h.edge(), h.index() as i64);
        }
    }
    for h in mesh.halfedge_ids() {
        let owner = representative(h.edge());
        assert_eq!(get(&tag, mesh.twin(h).edge()), owner.index() as i64);
    }
}

#[test]
fn removed_property_comes_back_default() {
    init_logging();
    let mesh = grid(2);

    let weights = add(EdgeProperty::<f64>::new("e:cost"), &mesh).unwrap();
    for e in mesh.edge_ids() {
        put(&weights, e, 1.5);
    }
    remove(weights, &mesh);
    assert!(mesh.find_property::<EdgeCategory, f64>("e:cost").is_none());

    let fresh = add(EdgeProperty::<f64>::new("e:cost"), &mesh).unwrap();
    assert!(mesh.edge_ids().all(|e| get(&fresh, e) == 0.0));
    remove(fresh, &mesh);
}

#[test]
fn capability_queries() {
    let mesh = grid(1);
    let stored = add(FaceProperty::<u8>::unnamed(), &mesh).unwrap();

    assert_eq!(stored.category(), MapCategory::Lvalue);
    assert!(is_writable::<FaceId, _>(&stored));
    assert!(is_writable::<VertexId, _>(&property_map(VertexPoint, &mesh)));
    assert!(!is_writable::<EdgeId, _>(&property_map(EdgeWeight, &mesh)));
    assert!(!is_writable::<HalfEdgeId, _>(&property_map(HalfEdgeIndex, &mesh)));
}

#[test]
fn f64_mesh_points_are_lossless() {
    let vertices = vec![
        Point3::new(0.1f64, 0.2, 0.3),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let mesh: HalfEdgeMesh<u32, f64> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
    let points = PointMap::<u32, f64, Widening>::new(&mesh);

    assert_eq!(get(&points, VertexId::new(0)), Point3::new(0.1, 0.2, 0.3));
    put(&points, VertexId::new(1), Point3::new(1.0 / 3.0, 0.0, 0.0));
    assert_eq!(get(&points, VertexId::new(1)).x, 1.0 / 3.0);
}

#[test]
fn small_indices_work() {
    let vertices = vec![
        Point3::new(0.0f32, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let mesh: HalfEdgeMesh<u16> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
    let marks = add(VertexProperty::<bool, u16>::new("v:mark"), &mesh).unwrap();
    put(&marks, VertexId::new(2), true);
    assert_eq!(
        mesh.vertex_ids().filter(|&v| get(&marks, v)).collect::<Vec<_>>(),
        vec![VertexId::new(2)]
    );
}

proptest! {
    #[test]
    fn put_then_get_vertex(v in 0usize..25, value in any::<i32>()) {
        let mesh = grid(4);
        let map = add(VertexProperty::<i32>::new("v:value"), &mesh).unwrap();
        put(&map, VertexId::new(v), value);
        prop_assert_eq!(get(&map, VertexId::new(v)), value);
        // Other cells stay untouched
        let others = mesh.vertex_ids().filter(|u| u.index() != v);
        for u in others {
            prop_assert_eq!(get(&map, u), 0);
        }
    }

    #[test]
    fn put_through_halfedge_get_through_twin(h in 0usize..56, value in any::<u64>()) {
        let mesh = grid(3);
        prop_assume!(h < mesh.num_halfedges());
        let map = add(EdgeProperty::<u64>::unnamed(), &mesh).unwrap();
        let he = HalfEdgeId::new(h);
        put(&map, he.edge(), value);
        prop_assert_eq!(get(&map, mesh.twin(he).edge()), value);
    }

    #[test]
    fn widened_points_round_trip_within_f32_precision(
        x in -1.0e6f64..1.0e6,
        y in -1.0e6f64..1.0e6,
        z in -1.0e6f64..1.0e6,
    ) {
        let mesh = grid(1);
        let points = PointMap::<u32, f32, Widening>::new(&mesh);
        let written = Point3::new(x, y, z);
        put(&points, VertexId::new(3), written);

        let read = get(&points, VertexId::new(3));
        for i in 0..3 {
            let bound = f64::from(f32::EPSILON) * written[i].abs();
            prop_assert!((read[i] - written[i]).abs() <= bound);
        }
    }

    #[test]
    fn weight_matches_endpoint_distance(h in 0usize..56) {
        let mesh = grid(3);
        prop_assume!(h < mesh.num_halfedges());
        let he = HalfEdgeId::new(h);
        let points = PointMap::<u32, f32, Widening>::new(&mesh);
        let expected = nalgebra::distance(
            &get(&points, mesh.origin(he)),
            &get(&points, mesh.dest(he)),
        );
        prop_assert_eq!(get_property(EdgeWeight, &mesh, he.edge()), expected);
    }
}
