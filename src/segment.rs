//! Flood merger: raw per-vertex flood labels → named mesh segments.
//!
//! A segment is the maximal patch lying between two consecutive planes of
//! the registry ordering (or beyond the outermost planes). Keys are built
//! from stable plane ids and the whole map is rebuilt from scratch whenever
//! the plane set or plane positions change, so a removed plane can never be
//! referenced by a stale key.

use crate::flood::{FloodLabel, FloodState};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::registry::{PlaneId, PlaneRegistry};
use hashbrown::HashMap;
use log::debug;
use nalgebra::Point3;

/// Identity of a segment: the band of mesh between consecutive planes, or
/// the open region beyond the first/last plane of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKey {
    /// Behind the first plane of the sequence.
    Before(PlaneId),
    /// Between two consecutive planes, in sequence order.
    Between(PlaneId, PlaneId),
    /// Past the last plane of the sequence.
    After(PlaneId),
}

/// Triangle- and vertex-level segment assignment.
#[derive(Debug, Clone, Default)]
pub struct SegmentMap {
    /// Triangles of each segment, ascending.
    pub triangles: HashMap<SegmentKey, Vec<u32>>,
    /// Per original triangle, its segment (None: unassigned component).
    pub triangle_keys: Vec<Option<SegmentKey>>,
    /// Per original vertex, its resolved segment.
    pub vertex_keys: Vec<Option<SegmentKey>>,
}

impl SegmentMap {
    pub fn triangles_of(&self, key: SegmentKey) -> &[u32] {
        self.triangles.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Segment keys present in the map, ordered along the plane sequence.
    pub fn keys_in_order(&self, registry: &PlaneRegistry) -> Vec<SegmentKey> {
        let mut keys: Vec<SegmentKey> = Vec::new();
        if let Some(&first) = registry.order().first() {
            keys.push(SegmentKey::Before(first));
        }
        keys.extend(registry.bands().map(|(a, b)| SegmentKey::Between(a, b)));
        if let Some(&last) = registry.order().last() {
            keys.push(SegmentKey::After(last));
        }
        keys.retain(|k| self.triangles.contains_key(k));
        keys
    }
}

/// Resolve one vertex's flood label to a segment key.
///
/// A vertex labeled with plane `p` lies in the band ahead of `p` when its
/// signed distance to `p` is non-negative (normals face the next plane in
/// the sequence), otherwise in the band behind. A dual-labeled vertex on the
/// front between two consecutive planes resolves to the band between them.
fn resolve_vertex(
    position: &Point3<Real>,
    label: FloodLabel,
    registry: &PlaneRegistry,
) -> Option<SegmentKey> {
    let resolve_single = |p: PlaneId| -> Option<SegmentKey> {
        let plane = registry.get(p)?;
        let (prev, next) = registry.neighbours(p);
        if plane.is_forward(position) {
            Some(match next {
                Some(n) => SegmentKey::Between(p, n),
                None => SegmentKey::After(p),
            })
        } else {
            Some(match prev {
                Some(b) => SegmentKey::Between(b, p),
                None => SegmentKey::Before(p),
            })
        }
    };

    match label {
        FloodLabel::Unassigned => None,
        FloodLabel::Plane(p) => resolve_single(p),
        FloodLabel::Boundary(p, q) => {
            let (_, next) = registry.neighbours(p);
            if next == Some(q) {
                Some(SegmentKey::Between(p, q))
            } else {
                // Non-adjacent pair (should not arise with sane plane
                // spacing): fall back to the primary plane's geometry.
                resolve_single(p)
            }
        },
    }
}

/// How far outside a segment's band a point lies; zero means contained.
fn band_violation(point: &Point3<Real>, key: SegmentKey, registry: &PlaneRegistry) -> Real {
    match key {
        SegmentKey::Before(p) => registry
            .get(p)
            .map_or(Real::MAX, |pl| pl.signed_distance(point).max(0.0)),
        SegmentKey::After(p) => registry
            .get(p)
            .map_or(Real::MAX, |pl| (-pl.signed_distance(point)).max(0.0)),
        SegmentKey::Between(p, q) => {
            let (Some(pp), Some(pq)) = (registry.get(p), registry.get(q)) else {
                return Real::MAX;
            };
            (-pp.signed_distance(point)).max(0.0) + pq.signed_distance(point).max(0.0)
        },
    }
}

/// Merge flood labels into segments.
///
/// Triangle assignment: unanimous vertices decide directly; a split triangle
/// goes to the majority key, and a full three-way disagreement is settled by
/// the centroid's distance to each candidate band.
pub fn merge_floods(
    mesh: &Mesh,
    registry: &PlaneRegistry,
    flood: &FloodState,
) -> SegmentMap {
    let vertex_keys: Vec<Option<SegmentKey>> = mesh
        .vertices()
        .iter()
        .zip(&flood.labels)
        .map(|(pos, &label)| resolve_vertex(pos, label, registry))
        .collect();

    let mut triangles: HashMap<SegmentKey, Vec<u32>> = HashMap::new();
    let mut triangle_keys: Vec<Option<SegmentKey>> = Vec::with_capacity(mesh.triangles().len());

    for (t, tri) in mesh.triangles().iter().enumerate() {
        let keys: Vec<SegmentKey> = tri
            .indices()
            .iter()
            .filter_map(|&v| vertex_keys[v as usize])
            .collect();

        let chosen = match keys.as_slice() {
            [] => None,
            [only] => Some(*only),
            [a, b] if a == b => Some(*a),
            [a, b, c] if a == b || a == c => Some(*a),
            [a, b, c] if b == c => Some(*b),
            candidates => {
                // No majority: the centroid's signed distances to the
                // candidate bands break the tie.
                let centroid = tri.centroid(mesh.vertices());
                candidates
                    .iter()
                    .copied()
                    .min_by(|&x, &y| {
                        band_violation(&centroid, x, registry)
                            .total_cmp(&band_violation(&centroid, y, registry))
                    })
            },
        };

        triangle_keys.push(chosen);
        if let Some(key) = chosen {
            triangles.entry(key).or_default().push(t as u32);
        }
    }

    debug!(
        "flood merge produced {} segments over {} triangles",
        triangles.len(),
        mesh.triangles().len()
    );
    SegmentMap {
        triangles,
        triangle_keys,
        vertex_keys,
    }
}
