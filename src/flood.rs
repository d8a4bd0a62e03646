//! Region labeler: per-vertex flood fill over the one-ring adjacency graph.
//!
//! Every active plane seeds a flood from the vertices of its intersected
//! triangles. Floods advance breadth-first and level-synchronously for all
//! planes at once, so the final labels do not depend on plane iteration
//! order. A flood halts where it meets a vertex already claimed by a
//! different plane: that vertex becomes a dual-labeled boundary vertex.
//! A vertex reached by two floods in the same level is likewise dual-labeled,
//! never discarded.

use crate::intersection::IntersectionMap;
use crate::mesh::{Connectivity, Mesh};
use crate::registry::{PlaneId, PlaneRegistry};
use hashbrown::HashMap;
use log::{debug, trace};

/// Region label of a single vertex after flooding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodLabel {
    /// Never reached by any flood (disconnected component); excluded from
    /// every segment.
    Unassigned,
    /// Claimed by exactly one plane's flood.
    Plane(PlaneId),
    /// Pinched between two floods; the pair is ordered by registry position.
    Boundary(PlaneId, PlaneId),
}

impl FloodLabel {
    /// The primary plane of the label, if any.
    pub const fn primary(self) -> Option<PlaneId> {
        match self {
            FloodLabel::Unassigned => None,
            FloodLabel::Plane(p) | FloodLabel::Boundary(p, _) => Some(p),
        }
    }
}

/// Per-vertex labels for one flood pass.
#[derive(Debug, Clone)]
pub struct FloodState {
    pub labels: Vec<FloodLabel>,
}

impl FloodState {
    pub fn label(&self, vertex: u32) -> FloodLabel {
        self.labels[vertex as usize]
    }
}

/// Run the interleaved flood fill for every plane in the registry.
pub fn flood_labels(
    mesh: &Mesh,
    connectivity: &Connectivity,
    registry: &PlaneRegistry,
    intersections: &IntersectionMap,
) -> FloodState {
    let mut labels = vec![FloodLabel::Unassigned; mesh.vertices().len()];
    let positions: HashMap<PlaneId, usize> = registry
        .order()
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();

    // Level 0: vertices of each plane's intersected triangles.
    let mut proposals: HashMap<u32, Vec<PlaneId>> = HashMap::new();
    for &id in registry.order() {
        for &t in intersections.get(id) {
            for v in mesh.triangle(t).indices() {
                let entry = proposals.entry(v).or_default();
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        }
    }

    let mut levels = 0usize;
    while !proposals.is_empty() {
        levels += 1;
        trace!("flood level {}: {} proposed vertices", levels, proposals.len());
        let mut claimed_this_level: Vec<(u32, PlaneId)> = Vec::new();

        for (&vertex, proposers) in &proposals {
            match labels[vertex as usize] {
                FloodLabel::Unassigned => {
                    if let [only] = proposers.as_slice() {
                        labels[vertex as usize] = FloodLabel::Plane(*only);
                        claimed_this_level.push((vertex, *only));
                    } else {
                        // Equidistant from several floods: keep the two
                        // lowest planes in registry order, deterministically.
                        let mut sorted = proposers.clone();
                        sorted.sort_by_key(|id| positions.get(id).copied().unwrap_or(usize::MAX));
                        labels[vertex as usize] = FloodLabel::Boundary(sorted[0], sorted[1]);
                    }
                },
                FloodLabel::Plane(p) => {
                    // A different flood arriving at a claimed vertex marks
                    // the meeting front and halts there.
                    let other = proposers
                        .iter()
                        .copied()
                        .filter(|&q| q != p)
                        .min_by_key(|id| positions.get(id).copied().unwrap_or(usize::MAX));
                    if let Some(q) = other {
                        let (pi, qi) = (positions[&p], positions[&q]);
                        labels[vertex as usize] = if pi <= qi {
                            FloodLabel::Boundary(p, q)
                        } else {
                            FloodLabel::Boundary(q, p)
                        };
                    }
                },
                FloodLabel::Boundary(..) => {},
            }
        }

        // Next level: singly claimed vertices push their plane outward.
        let mut next: HashMap<u32, Vec<PlaneId>> = HashMap::new();
        for (vertex, plane) in claimed_this_level {
            // A claim can have been upgraded to Boundary within this level.
            if labels[vertex as usize] != FloodLabel::Plane(plane) {
                continue;
            }
            for &w in connectivity.neighbours(vertex) {
                // Unclaimed vertices extend the flood; vertices claimed by a
                // different plane are proposed once more so the meeting front
                // gets its dual label.
                let reachable = match labels[w as usize] {
                    FloodLabel::Unassigned => true,
                    FloodLabel::Plane(q) => q != plane,
                    FloodLabel::Boundary(..) => false,
                };
                if reachable {
                    let entry = next.entry(w).or_default();
                    if !entry.contains(&plane) {
                        entry.push(plane);
                    }
                }
            }
        }
        proposals = next;
    }

    debug!(
        "flood fill settled after {} levels ({} vertices unassigned)",
        levels,
        labels.iter().filter(|l| **l == FloodLabel::Unassigned).count()
    );
    FloodState { labels }
}
