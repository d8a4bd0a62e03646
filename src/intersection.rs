//! Plane/mesh intersection finder.
//!
//! For each plane: the set of triangles whose vertex signed distances are
//! mixed (at least one strictly negative and one non-negative; exact zero
//! counts as non-negative). Results are cached per plane id and invalidated
//! wholesale whenever a plane moves or the plane set changes — there is no
//! per-triangle incremental diffing.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::plane::Plane;
use crate::registry::{PlaneId, PlaneRegistry};
use hashbrown::HashMap;
use log::debug;

/// Ascending triangle indices crossed by a single plane.
pub fn find_intersections(mesh: &Mesh, plane: &Plane) -> Vec<u32> {
    let mut out = Vec::new();
    for (t, tri) in mesh.triangles().iter().enumerate() {
        if triangle_crosses(mesh, plane, tri.indices()) {
            out.push(t as u32);
        }
    }
    out
}

/// Mixed-sign test for one triangle.
pub fn triangle_crosses(mesh: &Mesh, plane: &Plane, indices: [u32; 3]) -> bool {
    let mut forward = false;
    let mut backward = false;
    for v in indices {
        if plane.is_forward(&mesh.vertex(v)) {
            forward = true;
        } else {
            backward = true;
        }
    }
    forward && backward
}

/// Per-plane intersection records, keyed by stable plane id.
#[derive(Debug, Clone, Default)]
pub struct IntersectionMap {
    per_plane: HashMap<PlaneId, Vec<u32>>,
}

impl IntersectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the record for every plane in the registry, dropping records
    /// of planes no longer present.
    pub fn recompute_all(&mut self, mesh: &Mesh, registry: &PlaneRegistry) {
        self.per_plane.clear();
        for &id in registry.order() {
            if let Some(plane) = registry.get(id) {
                let set = find_intersections(mesh, plane);
                debug!(
                    "plane {:?} crosses {} of {} triangles",
                    id,
                    set.len(),
                    mesh.triangles().len()
                );
                self.per_plane.insert(id, set);
            }
        }
    }

    /// Recompute a single plane's record after it moved.
    pub fn recompute(&mut self, mesh: &Mesh, registry: &PlaneRegistry, id: PlaneId) {
        match registry.get(id) {
            Some(plane) => {
                let set = find_intersections(mesh, plane);
                self.per_plane.insert(id, set);
            },
            None => {
                self.per_plane.remove(&id);
            },
        }
    }

    /// Drop a plane's record (plane removed from the registry).
    pub fn invalidate(&mut self, id: PlaneId) {
        self.per_plane.remove(&id);
    }

    /// The cached record for a plane. An empty slice is a valid (degenerate)
    /// outcome for a plane placed entirely outside the mesh.
    pub fn get(&self, id: PlaneId) -> &[u32] {
        self.per_plane.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, id: PlaneId) -> bool {
        self.per_plane.contains_key(&id)
    }

    /// Union of every plane's intersected triangles, ascending and deduped.
    pub fn all_intersected(&self, registry: &PlaneRegistry) -> Vec<u32> {
        let mut all: Vec<u32> = registry
            .order()
            .iter()
            .flat_map(|id| self.get(*id).iter().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}

/// Vertices of a plane's intersected triangles lying within `tolerance` of
/// the plane itself. The viewer layer anchors the resection polyline here.
pub fn vertices_on_plane(
    mesh: &Mesh,
    plane: &Plane,
    intersected: &[u32],
    tolerance: Real,
) -> Vec<u32> {
    let mut out = Vec::new();
    for &t in intersected {
        for v in mesh.triangle(t).indices() {
            if plane.signed_distance(&mesh.vertex(v)).abs() <= tolerance && !out.contains(&v) {
                out.push(v);
            }
        }
    }
    out
}
