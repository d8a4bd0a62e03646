//! Indexed triangle with a lazily computed face normal.

use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// Three ordered vertex indices into the owning mesh's vertex array.
/// Winding defines the face normal direction (right-hand rule).
#[derive(Debug, Clone)]
pub struct Triangle {
    indices: [u32; 3],
    /// Lazily computed, cached face normal.
    normal: OnceLock<Vector3<Real>>,
}

impl Triangle {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Triangle {
            indices: [a, b, c],
            normal: OnceLock::new(),
        }
    }

    pub const fn indices(&self) -> [u32; 3] {
        self.indices
    }

    /// The three directed edges in winding order.
    pub const fn edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }

    pub fn contains(&self, vertex: u32) -> bool {
        self.indices.contains(&vertex)
    }

    /// Unit face normal from the winding order, cached after the first call.
    /// Degenerate triangles report +Z.
    pub fn normal(&self, vertices: &[Point3<Real>]) -> Vector3<Real> {
        *self.normal.get_or_init(|| {
            let [a, b, c] = self.indices;
            let pa = vertices[a as usize];
            let n = (vertices[b as usize] - pa).cross(&(vertices[c as usize] - pa));
            if n.norm_squared() < EPSILON * EPSILON {
                Vector3::z()
            } else {
                n.normalize()
            }
        })
    }

    pub fn centroid(&self, vertices: &[Point3<Real>]) -> Point3<Real> {
        let [a, b, c] = self.indices;
        let sum = vertices[a as usize].coords
            + vertices[b as usize].coords
            + vertices[c as usize].coords;
        Point3::from(sum / 3.0)
    }

    /// Drop the cached normal after the underlying vertices moved.
    pub(crate) fn invalidate_normal(&mut self) {
        self.normal = OnceLock::new();
    }
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
    }
}
