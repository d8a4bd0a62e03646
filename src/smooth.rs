//! Boundary retriangulator ("smoother").
//!
//! For one plane, the intersected triangles form one or more boundary loops
//! around the mesh cross-section. Each crossing edge contributes a new
//! *smoothed* vertex (the edge/plane intersection, projected onto the plane);
//! walking from crossing edge to crossing edge through the intersected
//! triangles orders those vertices into planar polygons. Each closed polygon
//! is fanned from its first point into cap triangles, and each intersected
//! triangle is re-triangulated on both sides of the plane into collar
//! triangles that join the surviving geometry to the smoothed boundary.
//!
//! The fan starts at an arbitrary loop point, which is adequate for the
//! convex-ish cross sections typical of bone; a strongly non-convex loop can
//! produce a self-intersecting cap. Known limitation, not corrected here.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::plane::Plane;
use crate::registry::PlaneId;
use hashbrown::HashMap;
use log::debug;
use nalgebra::{Point3, Vector3};

/// A vertex reference in a collar triangle: either an original mesh vertex
/// or a smoothed vertex created on the cutting plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollarVertex {
    Mesh(u32),
    Cut(u32),
}

/// Everything the smoother produces for one plane.
#[derive(Debug, Clone)]
pub struct PlaneCut {
    pub plane: PlaneId,
    /// Smoothed vertices, lying exactly on the plane. Stored separately from
    /// the mesh's own vertices; referenced only by caps and collars.
    pub vertices: Vec<Point3<Real>>,
    /// Ordered, closed boundary polygons (indices into `vertices`).
    pub loops: Vec<Vec<u32>>,
    /// Cap triangles closing each loop, wound so their normal points along
    /// the plane normal. The consumer mirrors them for the other side.
    pub caps: Vec<[u32; 3]>,
    /// Re-triangulated halves of the intersected triangles on the forward
    /// (non-negative) side of the plane, in the original winding.
    pub collars_forward: Vec<[CollarVertex; 3]>,
    /// Same, for the backward (negative) side.
    pub collars_back: Vec<[CollarVertex; 3]>,
}

impl PlaneCut {
    const fn empty(plane: PlaneId) -> Self {
        PlaneCut {
            plane,
            vertices: Vec::new(),
            loops: Vec::new(),
            caps: Vec::new(),
            collars_forward: Vec::new(),
            collars_back: Vec::new(),
        }
    }
}

const fn canonical(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Retriangulate the cut boundary of one plane.
///
/// `intersected` is the plane's cached intersection record. An empty record
/// (plane outside the mesh) yields an empty result, not an error.
pub fn smooth_plane_cut(
    mesh: &Mesh,
    plane_id: PlaneId,
    plane: &Plane,
    intersected: &[u32],
) -> PlaneCut {
    if intersected.is_empty() {
        return PlaneCut::empty(plane_id);
    }

    let mut cut = PlaneCut::empty(plane_id);
    // Canonical crossing edge -> smoothed vertex index.
    let mut edge_vertex: HashMap<(u32, u32), u32> = HashMap::new();
    // The (always two) crossing edges of each intersected triangle.
    let mut tri_edges: Vec<[(u32, u32); 2]> = Vec::with_capacity(intersected.len());
    // Canonical crossing edge -> positions in `tri_edges` of its triangles.
    let mut edge_tris: HashMap<(u32, u32), Vec<usize>> = HashMap::new();

    for (_local, &t) in intersected.iter().enumerate() {
        let tri = mesh.triangle(t);
        let mut crossings: Vec<(u32, u32)> = Vec::with_capacity(2);
        for (a, b) in tri.edges() {
            if plane.is_forward(&mesh.vertex(a)) != plane.is_forward(&mesh.vertex(b)) {
                crossings.push(canonical(a, b));
            }
        }
        let [e0, e1] = match crossings.as_slice() {
            [e0, e1] => [*e0, *e1],
            other => {
                // A stale intersection record is the only way to get here.
                debug!(
                    "triangle {} has {} crossing edges for plane {:?}, skipping",
                    t,
                    other.len(),
                    plane_id
                );
                continue;
            },
        };
        for e in [e0, e1] {
            edge_vertex.entry(e).or_insert_with(|| {
                let idx = cut.vertices.len() as u32;
                cut.vertices
                    .push(plane.edge_intersection(&mesh.vertex(e.0), &mesh.vertex(e.1)));
                idx
            });
            edge_tris.entry(e).or_default().push(tri_edges.len());
        }
        tri_edges.push([e0, e1]);
    }

    build_loops_and_caps(&mut cut, plane, &edge_vertex, &tri_edges, &edge_tris);
    build_collars(&mut cut, mesh, plane, intersected, &edge_vertex);
    cut
}

/// Walk crossing edges through adjacent intersected triangles into ordered
/// loops, then fan each closed loop into cap triangles.
fn build_loops_and_caps(
    cut: &mut PlaneCut,
    plane: &Plane,
    edge_vertex: &HashMap<(u32, u32), u32>,
    tri_edges: &[[(u32, u32); 2]],
    edge_tris: &HashMap<(u32, u32), Vec<usize>>,
) {
    let mut visited = vec![false; tri_edges.len()];

    for start in 0..tri_edges.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let [first_edge, mut exit_edge] = tri_edges[start];
        let mut chain: Vec<(u32, u32)> = vec![first_edge, exit_edge];
        #[allow(unused_assignments)]
        let mut closed = false;

        loop {
            // Move to the unvisited neighbour across the exit edge.
            let next = edge_tris
                .get(&exit_edge)
                .into_iter()
                .flatten()
                .copied()
                .find(|&n| !visited[n]);
            let Some(next) = next else {
                // Either the loop closed back onto the start triangle or the
                // surface is open here.
                closed = edge_tris
                    .get(&exit_edge)
                    .is_some_and(|tris| tris.contains(&start) && chain.len() > 2);
                break;
            };
            visited[next] = true;
            let [a, b] = tri_edges[next];
            exit_edge = if a == exit_edge { b } else { a };
            if exit_edge == first_edge {
                closed = true;
                break;
            }
            chain.push(exit_edge);
        }

        if !closed || chain.len() < 3 {
            debug!("open boundary chain of {} crossings left uncapped", chain.len());
            continue;
        }

        let mut polygon: Vec<u32> = chain.iter().map(|e| edge_vertex[e]).collect();
        // Orient the polygon so the fan's normal follows the plane normal.
        if polygon_normal(&cut.vertices, &polygon).dot(&plane.normal()) < 0.0 {
            polygon.reverse();
        }
        for i in 1..polygon.len() - 1 {
            cut.caps.push([polygon[0], polygon[i], polygon[i + 1]]);
        }
        cut.loops.push(polygon);
    }
}

/// Newell's method over a polygon of smoothed vertices.
fn polygon_normal(vertices: &[Point3<Real>], polygon: &[u32]) -> Vector3<Real> {
    let mut n = Vector3::zeros();
    for i in 0..polygon.len() {
        let p = vertices[polygon[i] as usize];
        let q = vertices[polygon[(i + 1) % polygon.len()] as usize];
        n += p.coords.cross(&q.coords);
    }
    n
}

/// Clip every intersected triangle against the plane on both sides,
/// replacing the crossing points with the shared smoothed vertices so the
/// collars stitch exactly onto the caps.
fn build_collars(
    cut: &mut PlaneCut,
    mesh: &Mesh,
    plane: &Plane,
    intersected: &[u32],
    edge_vertex: &HashMap<(u32, u32), u32>,
) {
    for &t in intersected {
        let tri = mesh.triangle(t);
        let mut forward_polygon: Vec<CollarVertex> = Vec::with_capacity(4);
        let mut back_polygon: Vec<CollarVertex> = Vec::with_capacity(4);

        for (a, b) in tri.edges() {
            let a_forward = plane.is_forward(&mesh.vertex(a));
            if a_forward {
                forward_polygon.push(CollarVertex::Mesh(a));
            } else {
                back_polygon.push(CollarVertex::Mesh(a));
            }
            if a_forward != plane.is_forward(&mesh.vertex(b)) {
                if let Some(&s) = edge_vertex.get(&canonical(a, b)) {
                    forward_polygon.push(CollarVertex::Cut(s));
                    back_polygon.push(CollarVertex::Cut(s));
                }
            }
        }

        fan_polygon(&forward_polygon, &mut cut.collars_forward);
        fan_polygon(&back_polygon, &mut cut.collars_back);
    }
}

fn fan_polygon(polygon: &[CollarVertex], out: &mut Vec<[CollarVertex; 3]>) {
    for i in 1..polygon.len().saturating_sub(1) {
        out.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
}
