//! Composite assembler: merge a transferred fibula piece into the mandible's
//! kept geometry ("fibula in mandible").
//!
//! The transfer packet is validated in full before anything is merged; a
//! count mismatch or out-of-range index is a contract violation from the
//! producer and is rejected, never truncated away.

use crate::cut::PieceGeometry;
use crate::errors::AssembleError;
use crate::float_types::Real;
use crate::registry::PlaneId;
use log::debug;
use nalgebra::{Point3, Vector3};

/// Colour tag of every mandible-origin vertex in the composite.
pub const MANDIBLE_TAG: i32 = -1;

/// The cross-mesh message carrying a cut fibula piece to the mandible side.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPacket {
    /// The fibula planes the piece was cut with, in sequence order.
    pub plane_ids: Vec<PlaneId>,
    pub vertices: Vec<Point3<Real>>,
    /// Triangles as index triples into `vertices`.
    pub triangles: Vec<[u32; 3]>,
    /// One polyline direction per plane; opaque payload for the viewer.
    pub polyline_angles: Vec<Vector3<Real>>,
    /// Per-vertex segment tag in `[0, color_count)`, or [`MANDIBLE_TAG`].
    pub colors: Vec<i32>,
    pub normals: Vec<Vector3<Real>>,
    /// Number of transferred fibula segments.
    pub color_count: usize,
}

impl TransferPacket {
    /// Check every cross-mesh contract before the packet is consumed.
    pub fn validate(&self) -> Result<(), AssembleError> {
        if self.vertices.len() != self.colors.len() || self.vertices.len() != self.normals.len() {
            return Err(AssembleError::CountMismatch {
                vertices: self.vertices.len(),
                colors: self.colors.len(),
                normals: self.normals.len(),
            });
        }
        for (t, tri) in self.triangles.iter().enumerate() {
            for &v in tri {
                if v as usize >= self.vertices.len() {
                    return Err(AssembleError::TriangleIndexOutOfRange {
                        triangle: t,
                        vertex: v,
                        vertex_count: self.vertices.len(),
                    });
                }
            }
        }
        for (i, &tag) in self.colors.iter().enumerate() {
            if tag < MANDIBLE_TAG || tag >= self.color_count as i32 {
                return Err(AssembleError::ColorTagOutOfRange {
                    vertex: i,
                    tag,
                    color_count: self.color_count,
                });
            }
        }
        if self.plane_ids.len() != self.polyline_angles.len() {
            return Err(AssembleError::PolylineCountMismatch {
                planes: self.plane_ids.len(),
                angles: self.polyline_angles.len(),
            });
        }
        Ok(())
    }
}

/// The merged mandible + fibula geometry for final visualization.
#[derive(Debug, Clone)]
pub struct CompositeMesh {
    pub vertices: Vec<Point3<Real>>,
    pub triangles: Vec<[u32; 3]>,
    pub normals: Vec<Vector3<Real>>,
    /// [`MANDIBLE_TAG`] for mandible-origin vertices, the transferred segment
    /// tag for fibula-origin vertices.
    pub colors: Vec<i32>,
    pub color_count: usize,
    /// Fibula-origin vertices start at this index.
    pub mandible_vertex_count: usize,
}

/// Concatenate the fibula piece after the mandible's kept geometry,
/// offsetting every fibula triangle index by the mandible vertex count.
pub fn assemble(
    mandible_kept: &PieceGeometry,
    packet: &TransferPacket,
) -> Result<CompositeMesh, AssembleError> {
    packet.validate()?;

    let offset = mandible_kept.vertices.len() as u32;
    let mut vertices = mandible_kept.vertices.clone();
    vertices.extend_from_slice(&packet.vertices);

    let mut triangles = mandible_kept.triangles.clone();
    triangles.extend(
        packet
            .triangles
            .iter()
            .map(|&[a, b, c]| [a + offset, b + offset, c + offset]),
    );

    let mut normals = mandible_kept.normals.clone();
    normals.extend_from_slice(&packet.normals);

    // Mandible provenance is a single tag regardless of its own segment
    // colouring; only the fibula segments are tinted.
    let mut colors = vec![MANDIBLE_TAG; mandible_kept.vertices.len()];
    colors.extend_from_slice(&packet.colors);

    debug!(
        "assembled composite: {} mandible + {} fibula vertices, {} triangles",
        mandible_kept.vertices.len(),
        packet.vertices.len(),
        triangles.len()
    );
    Ok(CompositeMesh {
        mandible_vertex_count: mandible_kept.vertices.len(),
        vertices,
        triangles,
        normals,
        colors,
        color_count: packet.color_count,
    })
}
