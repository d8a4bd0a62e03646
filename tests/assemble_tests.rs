use nalgebra::{Point3, Vector3};
use osteoplan::assemble::{self, MANDIBLE_TAG, TransferPacket};
use osteoplan::cut::PieceGeometry;
use osteoplan::errors::AssembleError;
use osteoplan::registry::PlaneRegistry;
use osteoplan::plane::{Movable, Plane};

fn dummy_plane_ids(n: usize) -> Vec<osteoplan::PlaneId> {
    let mut registry = PlaneRegistry::new();
    (0..n)
        .map(|i| {
            registry.add(Plane::new(
                Point3::new(i as osteoplan::float_types::Real, 0.0, 0.0),
                Vector3::x(),
                Movable::Dynamic,
            ))
        })
        .collect()
}

fn triangle_packet() -> TransferPacket {
    TransferPacket {
        plane_ids: dummy_plane_ids(2),
        vertices: vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        triangles: vec![[0, 1, 2]],
        polyline_angles: vec![Vector3::x(), Vector3::x()],
        colors: vec![0, 0, 1],
        normals: vec![Vector3::z(); 3],
        color_count: 2,
    }
}

fn mandible_piece() -> PieceGeometry {
    PieceGeometry {
        vertices: vec![
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ],
        triangles: vec![[0, 1, 2]],
        normals: vec![Vector3::z(); 3],
        colors: vec![0, 0, 0],
    }
}

#[test]
fn valid_packet_passes_validation() {
    assert_eq!(triangle_packet().validate(), Ok(()));
}

#[test]
fn count_mismatch_is_rejected() {
    let mut packet = triangle_packet();
    packet.colors.pop();
    assert!(matches!(
        packet.validate(),
        Err(AssembleError::CountMismatch { vertices: 3, colors: 2, .. })
    ));
}

#[test]
fn out_of_range_triangle_index_is_rejected() {
    let mut packet = triangle_packet();
    packet.triangles.push([0, 1, 9]);
    assert!(matches!(
        packet.validate(),
        Err(AssembleError::TriangleIndexOutOfRange { triangle: 1, vertex: 9, .. })
    ));
}

#[test]
fn color_tag_outside_declared_range_is_rejected() {
    let mut packet = triangle_packet();
    packet.colors[1] = 2;
    assert!(matches!(
        packet.validate(),
        Err(AssembleError::ColorTagOutOfRange { vertex: 1, tag: 2, .. })
    ));

    let mut packet = triangle_packet();
    packet.colors[0] = -2;
    assert!(matches!(
        packet.validate(),
        Err(AssembleError::ColorTagOutOfRange { tag: -2, .. })
    ));
}

#[test]
fn mandible_tag_is_a_legal_color() {
    let mut packet = triangle_packet();
    packet.colors[0] = MANDIBLE_TAG;
    assert_eq!(packet.validate(), Ok(()));
}

#[test]
fn polyline_count_must_match_plane_count() {
    let mut packet = triangle_packet();
    packet.polyline_angles.pop();
    assert!(matches!(
        packet.validate(),
        Err(AssembleError::PolylineCountMismatch { planes: 2, angles: 1 })
    ));
}

#[test]
fn composite_concatenates_with_offset_indices() {
    let mandible = mandible_piece();
    let packet = triangle_packet();
    let composite = assemble::assemble(&mandible, &packet).unwrap();

    assert_eq!(composite.mandible_vertex_count, 3);
    assert_eq!(composite.vertices.len(), 6);
    assert_eq!(composite.triangles.len(), 2);
    assert_eq!(composite.triangles[0], [0, 1, 2]);
    assert_eq!(composite.triangles[1], [3, 4, 5]);
    assert_eq!(composite.normals.len(), 6);
    assert_eq!(composite.color_count, 2);
    assert_eq!(composite.vertices[3], packet.vertices[0]);
}

#[test]
fn mandible_vertices_carry_the_mandible_tag() {
    let composite = assemble::assemble(&mandible_piece(), &triangle_packet()).unwrap();
    // The mandible's own segment colouring is flattened to the single tag;
    // fibula tags pass through untouched.
    assert_eq!(composite.colors[..3], [MANDIBLE_TAG; 3]);
    assert_eq!(composite.colors[3..], [0, 0, 1]);
}

#[test]
fn invalid_packet_never_reaches_the_composite() {
    let mut packet = triangle_packet();
    packet.normals.pop();
    assert!(assemble::assemble(&mandible_piece(), &packet).is_err());
}
