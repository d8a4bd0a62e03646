use nalgebra::{Point3, Vector3};
use osteoplan::float_types::Real;
use osteoplan::plane::{Movable, Plane};
use osteoplan::registry::PlaneRegistry;

fn plane_at(x: Real) -> Plane {
    Plane::new(Point3::new(x, 0.0, 0.0), Vector3::x(), Movable::Static)
}

#[test]
fn ghosts_sit_between_the_boundary_planes() {
    let mut registry = PlaneRegistry::new();
    let left = registry.add(plane_at(0.0));
    let right = registry.add(plane_at(10.0));
    let g0 = registry.insert_ghost(plane_at(3.0));
    let g1 = registry.insert_ghost(plane_at(6.0));

    assert_eq!(registry.order(), &[left, g0, g1, right]);
    assert!(registry.is_ghost(g0));
    assert!(!registry.is_ghost(left));
}

#[test]
fn removing_ghosts_keeps_boundary_identities() {
    let mut registry = PlaneRegistry::new();
    let left = registry.add(plane_at(0.0));
    let right = registry.add(plane_at(10.0));
    let g0 = registry.insert_ghost(plane_at(4.0));
    let g1 = registry.insert_ghost(plane_at(5.0));

    let removed = registry.remove_ghost_planes();
    assert_eq!(removed, vec![g0, g1]);
    assert_eq!(registry.order(), &[left, right]);
    assert!(registry.get(g0).is_none());
    assert!(registry.get(left).is_some());
    // Ids are never reused.
    let g2 = registry.insert_ghost(plane_at(4.0));
    assert_ne!(g2, g0);
    assert_ne!(g2, g1);
    assert!(g2.index() > g1.index());
}

#[test]
fn neighbours_follow_sequence_order() {
    let mut registry = PlaneRegistry::new();
    let left = registry.add(plane_at(0.0));
    let right = registry.add(plane_at(10.0));
    let ghost = registry.insert_ghost(plane_at(5.0));

    assert_eq!(registry.neighbours(left), (None, Some(ghost)));
    assert_eq!(registry.neighbours(ghost), (Some(left), Some(right)));
    assert_eq!(registry.neighbours(right), (Some(ghost), None));
    assert_eq!(registry.position(ghost), Some(1));
}

#[test]
fn bands_are_consecutive_pairs() {
    let mut registry = PlaneRegistry::new();
    let a = registry.add(plane_at(0.0));
    let d = registry.add(plane_at(9.0));
    let b = registry.insert_ghost(plane_at(3.0));
    let c = registry.insert_ghost(plane_at(6.0));

    let bands: Vec<_> = registry.bands().collect();
    assert_eq!(bands, vec![(a, b), (b, c), (c, d)]);
}

#[test]
fn ghost_pairs_chunk_in_order() {
    let mut registry = PlaneRegistry::new();
    registry.add(plane_at(0.0));
    registry.add(plane_at(20.0));
    let g0 = registry.insert_ghost(plane_at(4.0));
    let g1 = registry.insert_ghost(plane_at(6.0));
    let g2 = registry.insert_ghost(plane_at(12.0));
    let g3 = registry.insert_ghost(plane_at(14.0));

    assert_eq!(registry.ghost_pairs(), vec![(g0, g1), (g2, g3)]);
}
