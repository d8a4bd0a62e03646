//! Closed test meshes: simple watertight solids for exercising the pipeline
//! without loading scan data.

use crate::float_types::Real;
use crate::mesh::{Mesh, Triangle};
use nalgebra::Point3;

/// Axis-aligned closed box with one corner at the origin, CCW winding seen
/// from outside (12 triangles).
pub fn cuboid(width: Real, length: Real, height: Real) -> Mesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),          // 0: origin
        Point3::new(width, 0.0, 0.0),        // 1: +X
        Point3::new(width, length, 0.0),     // 2: +X+Y
        Point3::new(0.0, length, 0.0),       // 3: +Y
        Point3::new(0.0, 0.0, height),       // 4: +Z
        Point3::new(width, 0.0, height),     // 5: +X+Z
        Point3::new(width, length, height),  // 6: +X+Y+Z
        Point3::new(0.0, length, height),    // 7: +Y+Z
    ];

    // Quad faces in CCW order from outside, fanned into two triangles each.
    let faces: [[u32; 4]; 6] = [
        [0, 3, 2, 1], // bottom
        [4, 5, 6, 7], // top
        [0, 1, 5, 4], // front
        [3, 7, 6, 2], // back
        [0, 4, 7, 3], // left
        [1, 2, 6, 5], // right
    ];
    let mut triangles = Vec::with_capacity(12);
    for [a, b, c, d] in faces {
        triangles.push(Triangle::new(a, b, c));
        triangles.push(Triangle::new(a, c, d));
    }
    Mesh::from_parts(vertices, triangles)
}

pub fn cube(width: Real) -> Mesh {
    cuboid(width, width, width)
}

/// An elongated box subdivided into `segments` rings along X — a crude stand
/// in for a long bone, with enough triangles between planes for the flood
/// fill to claim.
pub fn bar(length: Real, thickness: Real, segments: u32) -> Mesh {
    let segments = segments.max(1);
    let step = length / segments as Real;
    let mut vertices = Vec::new();
    // Rings of 4 vertices at each station along X.
    for i in 0..=segments {
        let x = step * i as Real;
        vertices.push(Point3::new(x, 0.0, 0.0));
        vertices.push(Point3::new(x, thickness, 0.0));
        vertices.push(Point3::new(x, thickness, thickness));
        vertices.push(Point3::new(x, 0.0, thickness));
    }
    let ring = |i: u32, k: u32| i * 4 + k;
    let mut triangles = Vec::new();
    // Side walls between consecutive rings.
    for i in 0..segments {
        for k in 0..4 {
            let a = ring(i, k);
            let b = ring(i, (k + 1) % 4);
            let c = ring(i + 1, (k + 1) % 4);
            let d = ring(i + 1, k);
            triangles.push(Triangle::new(a, b, c));
            triangles.push(Triangle::new(a, c, d));
        }
    }
    // End caps: the ring winds CCW seen from +X.
    triangles.push(Triangle::new(ring(0, 0), ring(0, 2), ring(0, 1)));
    triangles.push(Triangle::new(ring(0, 0), ring(0, 3), ring(0, 2)));
    triangles.push(Triangle::new(ring(segments, 0), ring(segments, 1), ring(segments, 2)));
    triangles.push(Triangle::new(ring(segments, 0), ring(segments, 2), ring(segments, 3)));
    Mesh::from_parts(vertices, triangles)
}
