//! Error taxonomy.
//!
//! Geometric degeneracies (a plane missing the mesh, an empty boundary loop)
//! are *not* errors: they resolve locally to empty results. The enums here
//! cover contract violations that must fail fast at a module boundary.

use crate::float_types::Real;

/// Problems constructing or mutating a [`Mesh`](crate::mesh::Mesh).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A triangle references a vertex index outside the vertex array.
    #[error("triangle {triangle} references vertex {vertex} but the mesh has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        triangle: usize,
        vertex: u32,
        vertex_count: usize,
    },
    /// A triangle's three vertex indices are not pairwise distinct.
    #[error("triangle {triangle} has repeated vertex indices {indices:?}")]
    DegenerateTriangle { triangle: usize, indices: [u32; 3] },
    /// A non-finite or non-positive uniform scale factor.
    #[error("uniform scale factor {0} is not a positive finite number")]
    InvalidScale(Real),
}

/// Contract violations detected while consuming a cross-mesh transfer packet
/// or assembling the composite mesh. Never recovered by truncation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssembleError {
    /// Vertex, colour-tag, and normal counts of a transfer packet must match.
    #[error(
        "transfer packet count mismatch: {vertices} vertices, {colors} colour tags, {normals} normals"
    )]
    CountMismatch {
        vertices: usize,
        colors: usize,
        normals: usize,
    },
    /// A transferred triangle references a vertex outside `[0, vertex_count)`.
    #[error("transferred triangle {triangle} references vertex {vertex} but the packet has {vertex_count} vertices")]
    TriangleIndexOutOfRange {
        triangle: usize,
        vertex: u32,
        vertex_count: usize,
    },
    /// A colour tag lies outside `[-1, color_count)`.
    #[error("colour tag {tag} at vertex {vertex} exceeds the declared colour count {color_count}")]
    ColorTagOutOfRange {
        vertex: usize,
        tag: i32,
        color_count: usize,
    },
    /// The packet must carry one polyline direction per plane it names.
    #[error("transfer packet names {planes} planes but carries {angles} polyline directions")]
    PolylineCountMismatch { planes: usize, angles: usize },
    /// The mandible side must be cut before a fibula piece can be merged in.
    #[error("mandible mesh is not cut; nothing to assemble into")]
    MandibleNotCut,
}

/// Problems loading the persisted planner configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed planner configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scale factor {0} is not a positive finite number")]
    InvalidScale(Real),
}
