use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{Point3, Vector3};
use osteoplan::config::PlannerConfig;
use osteoplan::cut::Side;
use osteoplan::errors::AssembleError;
use osteoplan::event::{PlannerEvent, PlannerListener};
use osteoplan::float_types::Real;
use osteoplan::plane::{Movable, Plane};
use osteoplan::planner::{CutPlanner, SegmentSelection};
use osteoplan::shapes;

fn plane_at_x(x: Real) -> Plane {
    Plane::new(Point3::new(x, 0.5, 0.5), Vector3::x(), Movable::Dynamic)
}

struct Recorder(Rc<RefCell<Vec<PlannerEvent>>>);

impl PlannerListener for Recorder {
    fn on_event(&mut self, event: &PlannerEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

#[test]
fn configured_scale_is_applied_at_init() {
    let config = PlannerConfig {
        scale: 2.0,
        ..PlannerConfig::default()
    };
    let planner = CutPlanner::new(shapes::cube(1.0), &config).unwrap();
    let (_, maxs) = planner.mesh().bounding_box().unwrap();
    assert_eq!(maxs, Point3::new(2.0, 2.0, 2.0));
}

#[test]
fn invalid_scale_is_rejected_at_init() {
    let config = PlannerConfig {
        scale: 0.0,
        ..PlannerConfig::default()
    };
    assert!(CutPlanner::new(shapes::cube(1.0), &config).is_err());
}

#[test]
fn uncut_planner_carries_no_derived_state() {
    let mut planner = CutPlanner::new(shapes::cube(1.0), &PlannerConfig::default()).unwrap();
    let id = planner.add_plane(plane_at_x(0.5));
    // Intersections are maintained even before the cut.
    assert_eq!(planner.intersections().get(id).len(), 8);
    assert!(planner.cut_output().is_none());
    assert!(planner.segments().is_none());
    assert!(planner.flood().is_none());
}

#[test]
fn cutting_builds_the_full_pipeline_state() {
    let mut planner = CutPlanner::new(shapes::cube(1.0), &PlannerConfig::default()).unwrap();
    planner.add_plane(plane_at_x(0.5));
    planner.set_is_cut(Side::Interior, true, true);

    assert!(planner.is_cut());
    let output = planner.cut_output().unwrap();
    assert_eq!(output.kept.len(), 2);
    assert_eq!(output.replaced.len(), 8);
    assert!(planner.segments().is_some());
    assert!(planner.flood().is_some());

    planner.set_is_cut(Side::Interior, false, false);
    assert!(planner.cut_output().is_none());
}

#[test]
fn moving_a_plane_off_the_mesh_empties_the_cut() {
    let mut planner = CutPlanner::new(shapes::cube(1.0), &PlannerConfig::default()).unwrap();
    let id = planner.add_plane(plane_at_x(0.5));
    planner.set_is_cut(Side::Interior, true, true);
    assert!(!planner.cut_output().unwrap().kept.is_empty());

    planner.move_plane(id, plane_at_x(5.0));
    assert!(planner.intersections().get(id).is_empty());
    // No intersected triangles means no flood seeds: every triangle is
    // unreachable and lands in the extracted set.
    let output = planner.cut_output().unwrap();
    assert!(output.kept.is_empty());
    assert_eq!(output.extracted.len(), 12);
}

#[test]
fn deleting_ghost_planes_restores_the_boundary_pair() {
    let mut planner = CutPlanner::new(shapes::bar(20.0, 1.0, 20), &PlannerConfig::default()).unwrap();
    let left = planner.add_plane(plane_at_x(2.5));
    let right = planner.add_plane(plane_at_x(17.5));
    let g0 = planner.add_ghost_plane(plane_at_x(8.5));
    let g1 = planner.add_ghost_plane(plane_at_x(11.5));
    assert_eq!(planner.registry().order(), [left, g0, g1, right]);

    planner.delete_ghost_planes();
    assert_eq!(planner.registry().order(), [left, right]);
    assert!(!planner.intersections().contains(g0));
    assert!(!planner.intersections().contains(g1));
}

#[test]
fn listeners_observe_geometry_and_cut_events() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut planner = CutPlanner::new(shapes::cube(1.0), &PlannerConfig::default()).unwrap();
    planner.add_listener(Box::new(Recorder(events.clone())));

    planner.add_plane(plane_at_x(0.5));
    assert_eq!(*events.borrow(), [PlannerEvent::GeometryUpdated]);

    planner.set_is_cut(Side::Interior, true, true);
    assert_eq!(
        events.borrow().last(),
        Some(&PlannerEvent::CutCompleted { side: Side::Interior })
    );
}

#[test]
fn transfer_round_trip_builds_the_composite() {
    // Fibula: keep the alternating bands between the ghost pairs.
    let mut fibula =
        CutPlanner::new(shapes::bar(20.0, 1.0, 20), &PlannerConfig::default()).unwrap();
    fibula.add_plane(plane_at_x(2.5));
    fibula.add_plane(plane_at_x(17.5));
    fibula.add_ghost_plane(plane_at_x(5.5));
    fibula.add_ghost_plane(plane_at_x(8.5));
    fibula.add_ghost_plane(plane_at_x(11.5));
    fibula.add_ghost_plane(plane_at_x(14.5));
    fibula.set_segment_selection(SegmentSelection::AlternatingBands);
    fibula.set_is_cut(Side::Interior, true, true);

    let packet = fibula.send_to_mandible().unwrap();
    assert_eq!(packet.color_count, 3);
    assert_eq!(packet.plane_ids.len(), 6);
    assert_eq!(packet.validate(), Ok(()));

    // Mandible: cut away the middle, keep the outer ends.
    let mut mandible =
        CutPlanner::new(shapes::bar(10.0, 1.0, 10), &PlannerConfig::default()).unwrap();
    mandible.add_plane(plane_at_x(2.5));
    mandible.add_plane(plane_at_x(7.5));
    mandible.set_is_cut(Side::Exterior, true, true);

    let composite = mandible.receive_from_fibula(&packet).unwrap();
    assert!(composite.mandible_vertex_count > 0);
    assert_eq!(composite.color_count, 3);
    assert!(
        composite.colors[..composite.mandible_vertex_count]
            .iter()
            .all(|&c| c == osteoplan::assemble::MANDIBLE_TAG)
    );
    assert_eq!(
        composite.vertices.len(),
        composite.mandible_vertex_count + packet.vertices.len()
    );
    // Fibula-origin triangles were appended after the mandible's and index
    // only into the fibula's block of the concatenated vertex array.
    let mandible_triangles = composite.triangles.len() - packet.triangles.len();
    for tri in &composite.triangles[mandible_triangles..] {
        for &v in tri {
            assert!((v as usize) >= composite.mandible_vertex_count);
            assert!((v as usize) < composite.vertices.len());
        }
    }
    assert!(mandible.composite().is_some());
}

#[test]
fn uncut_mandible_rejects_the_transfer() {
    let mut fibula =
        CutPlanner::new(shapes::bar(10.0, 1.0, 10), &PlannerConfig::default()).unwrap();
    fibula.add_plane(plane_at_x(2.5));
    fibula.add_plane(plane_at_x(7.5));
    fibula.set_is_cut(Side::Interior, true, true);
    let packet = fibula.send_to_mandible().unwrap();

    let mut mandible = CutPlanner::new(shapes::cube(1.0), &PlannerConfig::default()).unwrap();
    assert!(matches!(
        mandible.receive_from_fibula(&packet),
        Err(AssembleError::MandibleNotCut)
    ));
}

#[test]
fn disabled_transfer_produces_no_packet() {
    let mut fibula =
        CutPlanner::new(shapes::bar(10.0, 1.0, 10), &PlannerConfig::default()).unwrap();
    fibula.add_plane(plane_at_x(2.5));
    fibula.add_plane(plane_at_x(7.5));
    fibula.set_is_cut(Side::Interior, true, true);

    fibula.set_transfer(false);
    assert!(fibula.build_transfer_packet().is_none());
    assert!(fibula.send_to_mandible().is_none());

    fibula.set_transfer(true);
    assert!(fibula.build_transfer_packet().is_some());
}

#[test]
fn cutting_is_idempotent_across_recomputes() {
    let mut planner =
        CutPlanner::new(shapes::bar(10.0, 1.0, 10), &PlannerConfig::default()).unwrap();
    planner.add_plane(plane_at_x(2.5));
    planner.add_plane(plane_at_x(7.5));
    planner.set_is_cut(Side::Interior, true, true);
    let first_kept = planner.cut_output().unwrap().kept.clone();

    planner.update_plane_intersections();
    assert_eq!(planner.cut_output().unwrap().kept, first_kept);
}
