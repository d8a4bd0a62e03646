//! Cutting plane: a point in mesh space plus a unit normal.
//!
//! Sign convention: the positive half-space is the side the normal points
//! into, and an exact zero distance counts as non-negative. Every stage of
//! the pipeline uses [`Plane::is_forward`] for that tie-break so a vertex
//! sitting exactly on a plane is assigned to a side consistently.

use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Unit, Vector3};

/// Whether the surrounding workflow lets the user drag this plane around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movable {
    Static,
    Dynamic,
}

/// An oriented cutting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    point: Point3<Real>,
    normal: Unit<Vector3<Real>>,
    movable: Movable,
}

impl Plane {
    /// Create a plane through `point` with the given (not necessarily unit)
    /// normal. A degenerate normal falls back to +Z.
    pub fn new(point: Point3<Real>, normal: Vector3<Real>, movable: Movable) -> Self {
        let normal = if normal.norm_squared() < EPSILON * EPSILON {
            Unit::new_unchecked(Vector3::z())
        } else {
            Unit::new_normalize(normal)
        };
        Plane {
            point,
            normal,
            movable,
        }
    }

    pub const fn point(&self) -> Point3<Real> {
        self.point
    }

    pub fn normal(&self) -> Vector3<Real> {
        self.normal.into_inner()
    }

    pub const fn movable(&self) -> Movable {
        self.movable
    }

    pub const fn set_position(&mut self, point: Point3<Real>) {
        self.point = point;
    }

    pub fn set_normal(&mut self, normal: Vector3<Real>) {
        if normal.norm_squared() >= EPSILON * EPSILON {
            self.normal = Unit::new_normalize(normal);
        }
    }

    /// Reverse the plane's orientation in place.
    pub fn flip(&mut self) {
        self.normal = Unit::new_unchecked(-self.normal.into_inner());
    }

    /// Signed distance of `p` to the plane: `dot(p - point, normal)`.
    pub fn signed_distance(&self, p: &Point3<Real>) -> Real {
        (p - self.point).dot(&self.normal)
    }

    /// Side test with the crate-wide tie-break: zero counts as forward.
    pub fn is_forward(&self, p: &Point3<Real>) -> bool {
        self.signed_distance(p) >= 0.0
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project(&self, p: &Point3<Real>) -> Point3<Real> {
        p - self.normal.into_inner() * self.signed_distance(p)
    }

    /// Interpolation parameter of the plane crossing along an edge whose
    /// endpoints have signed distances `d0` and `d1`.
    ///
    /// `t = d0 / (d0 - d1)`, clamped to `[0, 1]` to absorb floating-point
    /// overshoot. A near-zero denominator (edge lying in the plane) yields
    /// the edge start.
    pub fn edge_parameter(d0: Real, d1: Real) -> Real {
        let denom = d0 - d1;
        if denom.abs() < EPSILON {
            return 0.0;
        }
        (d0 / denom).clamp(0.0, 1.0)
    }

    /// Point where the edge `start → end` crosses the plane, projected onto
    /// the plane to absorb floating-point drift.
    pub fn edge_intersection(
        &self,
        start: &Point3<Real>,
        end: &Point3<Real>,
    ) -> Point3<Real> {
        let d0 = self.signed_distance(start);
        let d1 = self.signed_distance(end);
        let t = Self::edge_parameter(d0, d1);
        self.project(&(start + (end - start) * t))
    }
}
