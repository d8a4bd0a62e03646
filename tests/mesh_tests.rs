use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use osteoplan::errors::MeshError;
use osteoplan::mesh::{Mesh, Triangle};
use osteoplan::shapes;

#[test]
fn out_of_range_index_is_rejected() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let result = Mesh::new(vertices, vec![Triangle::new(0, 1, 3)]);
    assert!(matches!(
        result,
        Err(MeshError::VertexIndexOutOfRange { triangle: 0, vertex: 3, vertex_count: 3 })
    ));
}

#[test]
fn repeated_indices_are_rejected() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let result = Mesh::new(vertices, vec![Triangle::new(0, 1, 1)]);
    assert!(matches!(result, Err(MeshError::DegenerateTriangle { .. })));
}

#[test]
fn cube_normals_point_outward() {
    let cube = shapes::cube(2.0);
    let centre = cube.bounding_box_centre();
    for t in 0..cube.triangles().len() as u32 {
        let outward = cube.triangle(t).centroid(cube.vertices()) - centre;
        assert!(cube.triangle_normal(t).dot(&outward) > 0.0, "triangle {t}");
    }
    for v in 0..cube.vertices().len() as u32 {
        let outward = cube.vertex(v) - centre;
        assert!(cube.vertex_normal(v).dot(&outward) > 0.0, "vertex {v}");
    }
}

#[test]
fn inverting_flips_every_reported_normal() {
    let mut cube = shapes::cube(1.0);
    let before = cube.vertex_normal(0);
    cube.invert_normal();
    assert_eq!(cube.normal_direction(), -1.0);
    assert_relative_eq!(cube.vertex_normal(0), -before);
    cube.invert_normal();
    assert_eq!(cube.normal_direction(), 1.0);
    assert_relative_eq!(cube.vertex_normal(0), before);
}

#[test]
fn uniform_scale_moves_vertices_and_keeps_normals_unit() {
    let mut cube = shapes::cube(1.0);
    cube.scale_uniform(3.0).unwrap();
    let (mins, maxs) = cube.bounding_box().unwrap();
    assert_eq!(mins, Point3::origin());
    assert_eq!(maxs, Point3::new(3.0, 3.0, 3.0));
    for v in 0..cube.vertices().len() as u32 {
        assert_relative_eq!(cube.vertex_normal(v).norm(), 1.0, epsilon = 1e-9);
    }

    assert!(cube.scale_uniform(0.0).is_err());
    assert!(cube.scale_uniform(-1.0).is_err());
}

#[test]
fn bounding_radius_spans_the_diagonal() {
    let cuboid = shapes::cuboid(2.0, 4.0, 4.0);
    assert_relative_eq!(cuboid.bounding_box_radius(), 3.0, epsilon = 1e-9);
    assert_eq!(cuboid.bounding_box_centre(), Point3::new(1.0, 2.0, 2.0));
}

#[test]
fn connectivity_links_one_ring_neighbours() {
    let cube = shapes::cube(1.0);
    let connectivity = cube.connectivity();
    assert_eq!(connectivity.vertex_count(), 8);

    for v in 0..8u32 {
        // Every corner touches at least its three edge-adjacent corners.
        assert!(connectivity.neighbours(v).len() >= 3);
        assert!(!connectivity.triangles_of(v).is_empty());
        // Adjacency is symmetric.
        for &w in connectivity.neighbours(v) {
            assert!(connectivity.neighbours(w).contains(&v));
        }
        // Incident triangles actually reference the vertex.
        for &t in connectivity.triangles_of(v) {
            assert!(cube.triangle(t).contains(v));
        }
    }
}

#[test]
fn degenerate_triangle_normal_falls_back() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ];
    // Collinear but index-distinct: construction succeeds, the face normal
    // falls back to +Z.
    let mesh = Mesh::new(vertices, vec![Triangle::new(0, 1, 2)]).unwrap();
    assert_eq!(mesh.triangle_normal(0), Vector3::z());
}
