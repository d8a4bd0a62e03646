//! `Mesh`: the indexed triangle mesh the cutting pipeline operates on.
//!
//! A mesh owns its geometry buffers outright; every other component refers to
//! vertices and triangles by index only. Vertex normals are area-weighted
//! averages of the incident face normals, with a ±1 direction toggle for
//! meshes whose winding turns out inverted.

pub mod triangle;

use crate::errors::MeshError;
use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Vector3};
pub use triangle::Triangle;

#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Point3<Real>>,
    triangles: Vec<Triangle>,
    vertex_normals: Vec<Vector3<Real>>,
    normal_direction: Real,
}

impl Mesh {
    /// Build a mesh, validating that every triangle's indices are in range
    /// and pairwise distinct.
    pub fn new(
        vertices: Vec<Point3<Real>>,
        triangles: Vec<Triangle>,
    ) -> Result<Self, MeshError> {
        for (t, tri) in triangles.iter().enumerate() {
            let idx = tri.indices();
            for &v in &idx {
                if v as usize >= vertices.len() {
                    return Err(MeshError::VertexIndexOutOfRange {
                        triangle: t,
                        vertex: v,
                        vertex_count: vertices.len(),
                    });
                }
            }
            if idx[0] == idx[1] || idx[1] == idx[2] || idx[0] == idx[2] {
                return Err(MeshError::DegenerateTriangle {
                    triangle: t,
                    indices: idx,
                });
            }
        }
        let mut mesh = Mesh {
            vertices,
            triangles,
            vertex_normals: Vec::new(),
            normal_direction: 1.0,
        };
        mesh.recompute_normals();
        Ok(mesh)
    }

    /// Crate-internal constructor for statically valid topology (shape
    /// generators). Same invariants as [`Mesh::new`], checked in debug only.
    pub(crate) fn from_parts(vertices: Vec<Point3<Real>>, triangles: Vec<Triangle>) -> Self {
        debug_assert!(
            triangles
                .iter()
                .all(|t| t.indices().iter().all(|&v| (v as usize) < vertices.len())),
            "triangle index out of range"
        );
        let mut mesh = Mesh {
            vertices,
            triangles,
            vertex_normals: Vec::new(),
            normal_direction: 1.0,
        };
        mesh.recompute_normals();
        mesh
    }

    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertex(&self, i: u32) -> Point3<Real> {
        self.vertices[i as usize]
    }

    pub fn triangle(&self, i: u32) -> &Triangle {
        &self.triangles[i as usize]
    }

    /// Vertex normal with the current normal direction applied.
    pub fn vertex_normal(&self, i: u32) -> Vector3<Real> {
        self.vertex_normals[i as usize] * self.normal_direction
    }

    /// Face normal with the current normal direction applied.
    pub fn triangle_normal(&self, i: u32) -> Vector3<Real> {
        self.triangles[i as usize].normal(&self.vertices) * self.normal_direction
    }

    /// Flip the direction of every reported normal.
    pub const fn invert_normal(&mut self) {
        self.normal_direction = -self.normal_direction;
    }

    pub const fn normal_direction(&self) -> Real {
        self.normal_direction
    }

    /// Uniformly scale every vertex position about the origin. Applied once
    /// at init from the persisted configuration, before any cutting.
    pub fn scale_uniform(&mut self, factor: Real) -> Result<(), MeshError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(MeshError::InvalidScale(factor));
        }
        for v in &mut self.vertices {
            v.coords *= factor;
        }
        for t in &mut self.triangles {
            t.invalidate_normal();
        }
        self.recompute_normals();
        Ok(())
    }

    /// Area-weighted vertex normals from incident face normals.
    pub fn recompute_normals(&mut self) {
        self.vertex_normals =
            compute_vertex_normals(&self.vertices, self.triangles.iter().map(|t| t.indices()));
    }

    /// Axis-aligned bounding box corners, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<Real>, Point3<Real>)> {
        let first = *self.vertices.first()?;
        let mut mins = first;
        let mut maxs = first;
        for v in &self.vertices[1..] {
            mins.x = mins.x.min(v.x);
            mins.y = mins.y.min(v.y);
            mins.z = mins.z.min(v.z);
            maxs.x = maxs.x.max(v.x);
            maxs.y = maxs.y.max(v.y);
            maxs.z = maxs.z.max(v.z);
        }
        Some((mins, maxs))
    }

    pub fn bounding_box_centre(&self) -> Point3<Real> {
        match self.bounding_box() {
            Some((mins, maxs)) => Point3::from((mins.coords + maxs.coords) * 0.5),
            None => Point3::origin(),
        }
    }

    pub fn bounding_box_radius(&self) -> Real {
        match self.bounding_box() {
            Some((mins, maxs)) => (maxs - mins).norm() * 0.5,
            None => 0.0,
        }
    }

    /// One-ring adjacency, built fresh per call (no incremental updates).
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::build(self)
    }
}

/// Vertex one-ring adjacency: neighbouring vertices and incident triangles.
/// Two vertices are adjacent iff they co-occur in a triangle.
#[derive(Debug, Clone)]
pub struct Connectivity {
    vertex_neighbours: Vec<Vec<u32>>,
    vertex_triangles: Vec<Vec<u32>>,
}

impl Connectivity {
    fn build(mesh: &Mesh) -> Self {
        let n = mesh.vertices.len();
        let mut vertex_neighbours: Vec<Vec<u32>> = vec![Vec::new(); n];
        let mut vertex_triangles: Vec<Vec<u32>> = vec![Vec::new(); n];
        for (t, tri) in mesh.triangles.iter().enumerate() {
            let idx = tri.indices();
            for (i, &v) in idx.iter().enumerate() {
                vertex_triangles[v as usize].push(t as u32);
                for (j, &w) in idx.iter().enumerate() {
                    if i != j && !vertex_neighbours[v as usize].contains(&w) {
                        vertex_neighbours[v as usize].push(w);
                    }
                }
            }
        }
        Connectivity {
            vertex_neighbours,
            vertex_triangles,
        }
    }

    pub fn neighbours(&self, vertex: u32) -> &[u32] {
        &self.vertex_neighbours[vertex as usize]
    }

    pub fn triangles_of(&self, vertex: u32) -> &[u32] {
        &self.vertex_triangles[vertex as usize]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_neighbours.len()
    }
}

/// Area-weighted vertex normals for an arbitrary indexed triangle list.
/// Shared by `Mesh` and the cut-output materialization.
pub fn compute_vertex_normals(
    vertices: &[Point3<Real>],
    triangles: impl Iterator<Item = [u32; 3]>,
) -> Vec<Vector3<Real>> {
    let mut normals = vec![Vector3::zeros(); vertices.len()];
    for [a, b, c] in triangles {
        let pa = vertices[a as usize];
        let weighted = (vertices[b as usize] - pa).cross(&(vertices[c as usize] - pa));
        normals[a as usize] += weighted;
        normals[b as usize] += weighted;
        normals[c as usize] += weighted;
    }
    for n in &mut normals {
        let len = n.norm();
        if len > EPSILON {
            *n /= len;
        }
    }
    normals
}
