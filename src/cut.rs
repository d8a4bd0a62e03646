//! Partitioner: segments + smoothed boundaries → kept / extracted / replaced
//! triangle sets plus the cap geometry for both resulting pieces.
//!
//! Everything here is recomputed deterministically from plane state; calling
//! the cut twice with an unchanged configuration yields identical outputs.

use crate::float_types::Real;
use crate::intersection::IntersectionMap;
use crate::mesh::{Mesh, compute_vertex_normals};
use crate::registry::{PlaneId, PlaneRegistry};
use crate::segment::{SegmentKey, SegmentMap};
use crate::smooth::{CollarVertex, PlaneCut};
use hashbrown::{HashMap, HashSet};
use log::debug;
use nalgebra::{Point3, Vector3};

/// Which side of the outermost real planes the caller keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Interior,
    Exterior,
}

/// Which segments survive the cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepPolicy {
    /// Keep the interior (between the outermost planes) or the exterior.
    /// With a single plane, interior means the forward half-space.
    Side(Side),
    /// Keep an explicit ordered subset of segments. The fibula workflow uses
    /// this to retain the bands between chosen plane pairs along the curve.
    Segments(Vec<SegmentKey>),
}

/// A vertex reference in a cap/collar triangle of the cut output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutVertex {
    /// Index into the original mesh's vertex array.
    Mesh(u32),
    /// Index into [`CutOutput::cap_vertices`].
    Cap(u32),
}

/// Result of one cut operation.
///
/// `kept`, `extracted`, and `replaced` are a disjoint partition of the
/// original triangle indices; `replaced` triangles are superseded by the cap
/// and collar triangles listed per side.
#[derive(Debug, Clone, Default)]
pub struct CutOutput {
    pub kept: Vec<u32>,
    pub extracted: Vec<u32>,
    pub replaced: Vec<u32>,
    /// All smoothed vertices of every plane, concatenated.
    pub cap_vertices: Vec<Point3<Real>>,
    /// Caps + collars bounding the kept piece.
    pub kept_caps: Vec<[CutVertex; 3]>,
    /// Caps + collars bounding the extracted piece.
    pub extracted_caps: Vec<[CutVertex; 3]>,
    /// The segment keys that were kept, in plane-sequence order.
    pub kept_segments: Vec<SegmentKey>,
}

/// The fibula's segments-to-keep: the alternating bands
/// `[left, g0], [g1, g2], …, [g_last, right]`. Ghosts arrive in pairs (two
/// cut angles per mandible plane) and the wedge inside each pair is the
/// discarded bone between two transferred segments.
pub fn fibula_segments_to_keep(registry: &PlaneRegistry) -> Vec<SegmentKey> {
    registry
        .bands()
        .enumerate()
        .filter(|(i, _)| i % 2 == 0)
        .map(|(_, (a, b))| SegmentKey::Between(a, b))
        .collect()
}

fn kept_keys(
    registry: &PlaneRegistry,
    segments: &SegmentMap,
    policy: &KeepPolicy,
) -> Vec<SegmentKey> {
    let keys = segments.keys_in_order(registry);
    match policy {
        KeepPolicy::Side(side) => {
            let interior = |key: &SegmentKey| match (key, registry.len()) {
                (SegmentKey::Between(..), _) => true,
                // Lone plane: its forward half-space counts as interior.
                (SegmentKey::After(_), 1) => true,
                _ => false,
            };
            keys.into_iter()
                .filter(|k| match side {
                    Side::Interior => interior(k),
                    Side::Exterior => !interior(k),
                })
                .collect()
        },
        KeepPolicy::Segments(selected) => keys
            .into_iter()
            .filter(|k| selected.contains(k))
            .collect(),
    }
}

/// Partition the mesh.
///
/// With an empty registry the kept set is the entire mesh and everything
/// else is empty. Triangles in no segment (unreached components) land in the
/// extracted set.
pub fn cut(
    mesh: &Mesh,
    registry: &PlaneRegistry,
    intersections: &IntersectionMap,
    segments: &SegmentMap,
    plane_cuts: &[PlaneCut],
    policy: &KeepPolicy,
) -> CutOutput {
    if registry.is_empty() {
        return CutOutput {
            kept: (0..mesh.triangles().len() as u32).collect(),
            ..CutOutput::default()
        };
    }

    let kept_segments = kept_keys(registry, segments, policy);
    let kept_set: HashSet<SegmentKey> = kept_segments.iter().copied().collect();
    let replaced = intersections.all_intersected(registry);
    let replaced_set: HashSet<u32> = replaced.iter().copied().collect();

    let mut kept = Vec::new();
    let mut extracted = Vec::new();
    for t in 0..mesh.triangles().len() as u32 {
        if replaced_set.contains(&t) {
            continue;
        }
        let in_kept = segments.triangle_keys[t as usize]
            .is_some_and(|key| kept_set.contains(&key));
        if in_kept {
            kept.push(t);
        } else {
            extracted.push(t);
        }
    }

    let mut output = CutOutput {
        kept,
        extracted,
        replaced,
        kept_segments,
        ..CutOutput::default()
    };
    attach_caps(&mut output, registry, plane_cuts, &kept_set);
    debug!(
        "cut: {} kept, {} extracted, {} replaced, {} cap vertices",
        output.kept.len(),
        output.extracted.len(),
        output.replaced.len(),
        output.cap_vertices.len()
    );
    output
}

/// The bands on either side of a plane in the sequence.
fn adjacent_keys(registry: &PlaneRegistry, plane: PlaneId) -> (SegmentKey, SegmentKey) {
    let (prev, next) = registry.neighbours(plane);
    let behind = match prev {
        Some(p) => SegmentKey::Between(p, plane),
        None => SegmentKey::Before(plane),
    };
    let ahead = match next {
        Some(n) => SegmentKey::Between(plane, n),
        None => SegmentKey::After(plane),
    };
    (behind, ahead)
}

fn attach_caps(
    output: &mut CutOutput,
    registry: &PlaneRegistry,
    plane_cuts: &[PlaneCut],
    kept_set: &HashSet<SegmentKey>,
) {
    for plane_cut in plane_cuts {
        let offset = output.cap_vertices.len() as u32;
        output.cap_vertices.extend_from_slice(&plane_cut.vertices);

        let collar = |tris: &[[CollarVertex; 3]]| -> Vec<[CutVertex; 3]> {
            tris.iter()
                .map(|t| t.map(|v| match v {
                    CollarVertex::Mesh(i) => CutVertex::Mesh(i),
                    CollarVertex::Cut(i) => CutVertex::Cap(offset + i),
                }))
                .collect()
        };
        // Cap winding: the smoother emits caps facing the plane normal, i.e.
        // outward for a piece behind the plane. A piece ahead of the plane
        // needs the mirrored winding.
        let caps_facing_forward: Vec<[CutVertex; 3]> = plane_cut
            .caps
            .iter()
            .map(|t| t.map(|i| CutVertex::Cap(offset + i)))
            .collect();
        let caps_facing_back: Vec<[CutVertex; 3]> = caps_facing_forward
            .iter()
            .map(|&[a, b, c]| [a, c, b])
            .collect();

        let (behind, ahead) = adjacent_keys(registry, plane_cut.plane);
        let keep_behind = kept_set.contains(&behind);
        let keep_ahead = kept_set.contains(&ahead);

        match (keep_behind, keep_ahead) {
            (true, false) => {
                output.kept_caps.extend(collar(&plane_cut.collars_back));
                output.kept_caps.extend_from_slice(&caps_facing_forward);
                output.extracted_caps.extend(collar(&plane_cut.collars_forward));
                output.extracted_caps.extend_from_slice(&caps_facing_back);
            },
            (false, true) => {
                output.kept_caps.extend(collar(&plane_cut.collars_forward));
                output.kept_caps.extend_from_slice(&caps_facing_back);
                output.extracted_caps.extend(collar(&plane_cut.collars_back));
                output.extracted_caps.extend_from_slice(&caps_facing_forward);
            },
            (true, true) => {
                // Both sides survive: no hole, the collars alone rebuild the
                // crossing triangles.
                output.kept_caps.extend(collar(&plane_cut.collars_back));
                output.kept_caps.extend(collar(&plane_cut.collars_forward));
            },
            (false, false) => {
                // Both sides discarded: each extracted sub-piece gets its
                // own cap, wound outward for its side.
                output.extracted_caps.extend(collar(&plane_cut.collars_back));
                output.extracted_caps.extend(collar(&plane_cut.collars_forward));
                output.extracted_caps.extend_from_slice(&caps_facing_forward);
                output.extracted_caps.extend_from_slice(&caps_facing_back);
            },
        }
    }
}

/// A cut piece materialized into dense, self-contained buffers (used for the
/// cross-mesh transfer and the composite assembly).
#[derive(Debug, Clone, Default)]
pub struct PieceGeometry {
    pub vertices: Vec<Point3<Real>>,
    pub triangles: Vec<[u32; 3]>,
    pub normals: Vec<Vector3<Real>>,
    /// Per vertex: index into [`CutOutput::kept_segments`], or -1 for cap
    /// vertices bounding no kept segment.
    pub colors: Vec<i32>,
}

impl CutOutput {
    /// Materialize the kept piece: compact the used original vertices and the
    /// cap vertices into one dense numbering, colour every vertex by the kept
    /// segment it belongs to, and recompute vertex normals for the new
    /// surface.
    pub fn kept_geometry(
        &self,
        mesh: &Mesh,
        segments: &SegmentMap,
    ) -> PieceGeometry {
        let segment_color: HashMap<SegmentKey, i32> = self
            .kept_segments
            .iter()
            .enumerate()
            .map(|(i, &k)| (k, i as i32))
            .collect();

        let mut remap_mesh: HashMap<u32, u32> = HashMap::new();
        let mut remap_cap: HashMap<u32, u32> = HashMap::new();
        let mut geometry = PieceGeometry::default();

        let mut resolve = |v: CutVertex, geometry: &mut PieceGeometry| -> u32 {
            match v {
                CutVertex::Mesh(i) => *remap_mesh.entry(i).or_insert_with(|| {
                    let idx = geometry.vertices.len() as u32;
                    geometry.vertices.push(mesh.vertex(i));
                    let color = segments.vertex_keys[i as usize]
                        .and_then(|k| segment_color.get(&k).copied())
                        .unwrap_or(-1);
                    geometry.colors.push(color);
                    idx
                }),
                CutVertex::Cap(i) => *remap_cap.entry(i).or_insert_with(|| {
                    let idx = geometry.vertices.len() as u32;
                    geometry.vertices.push(self.cap_vertices[i as usize]);
                    geometry.colors.push(-1);
                    idx
                }),
            }
        };

        for &t in &self.kept {
            let [a, b, c] = mesh.triangle(t).indices();
            let tri = [
                resolve(CutVertex::Mesh(a), &mut geometry),
                resolve(CutVertex::Mesh(b), &mut geometry),
                resolve(CutVertex::Mesh(c), &mut geometry),
            ];
            geometry.triangles.push(tri);
        }
        for &cap in &self.kept_caps {
            let tri = [
                resolve(cap[0], &mut geometry),
                resolve(cap[1], &mut geometry),
                resolve(cap[2], &mut geometry),
            ];
            geometry.triangles.push(tri);
        }

        // Cap vertices inherit the colour of a kept neighbour so the whole
        // transferred segment renders as one provenance block.
        propagate_cap_colors(&mut geometry);

        geometry.normals =
            compute_vertex_normals(&geometry.vertices, geometry.triangles.iter().copied());
        geometry
    }
}

fn propagate_cap_colors(geometry: &mut PieceGeometry) {
    let mut changed = true;
    while changed {
        changed = false;
        for [a, b, c] in geometry.triangles.iter().copied() {
            let tagged = [a, b, c]
                .into_iter()
                .map(|v| geometry.colors[v as usize])
                .find(|&col| col >= 0);
            if let Some(col) = tagged {
                for v in [a, b, c] {
                    if geometry.colors[v as usize] < 0 {
                        geometry.colors[v as usize] = col;
                        changed = true;
                    }
                }
            }
        }
    }
}
