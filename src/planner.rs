//! `CutPlanner`: the synchronous orchestrator of the cutting pipeline.
//!
//! One planner owns one mesh, the plane registry, and every cache derived
//! from them. Any change to the plane set or a plane's placement drops the
//! derived state wholesale and recomputes `intersections → flood → segments
//! → smooth → cut` in one blocking pass — intentionally non-incremental, so
//! topology changes from adding or removing ghost planes can never leave a
//! stale cache behind. The rendering/UI layer reads snapshots through the
//! accessors between recomputes and is notified through [`PlannerEvent`]s.

use crate::assemble::{self, CompositeMesh, TransferPacket};
use crate::config::PlannerConfig;
use crate::cut::{self, CutOutput, KeepPolicy, Side};
use crate::errors::{AssembleError, MeshError};
use crate::event::{PlannerEvent, PlannerListener};
use crate::flood::{self, FloodState};
use crate::float_types::Real;
use crate::intersection::{self, IntersectionMap};
use crate::mesh::Mesh;
use crate::plane::Plane;
use crate::registry::{PlaneId, PlaneRegistry};
use crate::segment::{self, SegmentMap};
use crate::smooth::{self, PlaneCut};
use log::debug;

/// How the kept segments are chosen when the mesh is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSelection {
    /// Keep by interior/exterior side of the outermost planes (mandible).
    BySide,
    /// Keep the alternating bands between ghost-plane pairs (fibula).
    AlternatingBands,
}

/// Derived pipeline state, rebuilt in full on every recompute.
#[derive(Debug, Clone)]
struct CutState {
    flood: FloodState,
    segments: SegmentMap,
    #[allow(dead_code)]
    plane_cuts: Vec<PlaneCut>,
    output: CutOutput,
}

pub struct CutPlanner {
    mesh: Mesh,
    registry: PlaneRegistry,
    intersections: IntersectionMap,
    state: Option<CutState>,
    composite: Option<CompositeMesh>,
    is_cut: bool,
    cutting_side: Side,
    selection: SegmentSelection,
    is_transfer: bool,
    listeners: Vec<Box<dyn PlannerListener>>,
}

impl CutPlanner {
    /// Take ownership of a mesh, applying the configured uniform scale
    /// before any cutting can occur.
    pub fn new(mut mesh: Mesh, config: &PlannerConfig) -> Result<Self, MeshError> {
        if config.scale != 1.0 {
            mesh.scale_uniform(config.scale)?;
        }
        Ok(CutPlanner {
            mesh,
            registry: PlaneRegistry::new(),
            intersections: IntersectionMap::new(),
            state: None,
            composite: None,
            is_cut: false,
            cutting_side: Side::Interior,
            selection: SegmentSelection::BySide,
            is_transfer: true,
            listeners: Vec::new(),
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn registry(&self) -> &PlaneRegistry {
        &self.registry
    }

    pub fn intersections(&self) -> &IntersectionMap {
        &self.intersections
    }

    /// The current partition, if the mesh is cut and up to date.
    pub fn cut_output(&self) -> Option<&CutOutput> {
        self.state.as_ref().map(|s| &s.output)
    }

    pub fn segments(&self) -> Option<&SegmentMap> {
        self.state.as_ref().map(|s| &s.segments)
    }

    pub fn flood(&self) -> Option<&FloodState> {
        self.state.as_ref().map(|s| &s.flood)
    }

    pub fn composite(&self) -> Option<&CompositeMesh> {
        self.composite.as_ref()
    }

    pub const fn is_cut(&self) -> bool {
        self.is_cut
    }

    pub fn add_listener(&mut self, listener: Box<dyn PlannerListener>) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, event: PlannerEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    /// Append a real boundary plane.
    pub fn add_plane(&mut self, plane: Plane) -> PlaneId {
        let id = self.registry.add(plane);
        self.intersections.recompute(&self.mesh, &self.registry, id);
        self.rebuild();
        self.notify(PlannerEvent::GeometryUpdated);
        id
    }

    /// Insert a transient ghost plane between the boundary planes.
    pub fn add_ghost_plane(&mut self, plane: Plane) -> PlaneId {
        let id = self.registry.insert_ghost(plane);
        self.intersections.recompute(&self.mesh, &self.registry, id);
        self.rebuild();
        self.notify(PlannerEvent::GeometryUpdated);
        id
    }

    /// Drop every ghost plane and all state keyed by them.
    pub fn delete_ghost_planes(&mut self) {
        let removed = self.registry.remove_ghost_planes();
        for id in removed {
            self.intersections.invalidate(id);
        }
        self.rebuild();
        self.notify(PlannerEvent::GeometryUpdated);
    }

    /// Reposition a plane. Recomputes its intersections and, if the mesh is
    /// cut, the whole partition.
    pub fn move_plane(&mut self, id: PlaneId, plane: Plane) {
        if let Some(slot) = self.registry.get_mut(id) {
            *slot = plane;
            self.update_plane_intersections_for(id);
        }
    }

    /// Recompute the intersection records of every plane, then the cut.
    pub fn update_plane_intersections(&mut self) {
        self.intersections.recompute_all(&self.mesh, &self.registry);
        self.rebuild();
        self.notify(PlannerEvent::GeometryUpdated);
    }

    /// Recompute a single plane's intersection record, then the cut. The
    /// downstream flood/segment/cap state is still rebuilt in full.
    pub fn update_plane_intersections_for(&mut self, id: PlaneId) {
        self.intersections.recompute(&self.mesh, &self.registry, id);
        self.rebuild();
        self.notify(PlannerEvent::GeometryUpdated);
    }

    /// Enter or leave the cut state.
    pub fn set_is_cut(&mut self, side: Side, is_cut: bool, should_recompute: bool) {
        self.cutting_side = side;
        self.is_cut = is_cut;
        if !is_cut {
            self.state = None;
        }
        if should_recompute {
            self.update_plane_intersections();
        } else {
            self.rebuild();
            self.notify(PlannerEvent::GeometryUpdated);
        }
        if self.is_cut {
            self.notify(PlannerEvent::CutCompleted { side });
        }
    }

    pub fn set_segment_selection(&mut self, selection: SegmentSelection) {
        self.selection = selection;
        self.rebuild();
        self.notify(PlannerEvent::GeometryUpdated);
    }

    /// Gate for the fibula→mandible transfer; slider drags disable it.
    pub const fn set_transfer(&mut self, is_transfer: bool) {
        self.is_transfer = is_transfer;
    }

    pub fn invert_normal(&mut self) {
        self.mesh.invert_normal();
        self.notify(PlannerEvent::GeometryUpdated);
    }

    /// Vertices of `id`'s intersected triangles lying within `tolerance` of
    /// the plane (polyline anchoring).
    pub fn vertices_on_plane(&self, id: PlaneId, tolerance: Real) -> Vec<u32> {
        match self.registry.get(id) {
            Some(plane) => intersection::vertices_on_plane(
                &self.mesh,
                plane,
                self.intersections.get(id),
                tolerance,
            ),
            None => Vec::new(),
        }
    }

    fn effective_policy(&self) -> KeepPolicy {
        match self.selection {
            SegmentSelection::BySide => KeepPolicy::Side(self.cutting_side),
            SegmentSelection::AlternatingBands => {
                KeepPolicy::Segments(cut::fibula_segments_to_keep(&self.registry))
            },
        }
    }

    /// Run the full pipeline. Called after every state change; a planner
    /// that is not cut carries no derived state at all.
    fn rebuild(&mut self) {
        self.composite = None;
        if !self.is_cut {
            self.state = None;
            return;
        }
        debug!(
            "rebuilding cut state: {} planes, side {:?}, selection {:?}",
            self.registry.len(),
            self.cutting_side,
            self.selection
        );
        let connectivity = self.mesh.connectivity();
        let flood = flood::flood_labels(
            &self.mesh,
            &connectivity,
            &self.registry,
            &self.intersections,
        );
        let segments = segment::merge_floods(&self.mesh, &self.registry, &flood);
        let plane_cuts: Vec<PlaneCut> = self
            .registry
            .order()
            .iter()
            .filter_map(|&id| {
                let plane = self.registry.get(id)?;
                Some(smooth::smooth_plane_cut(
                    &self.mesh,
                    id,
                    plane,
                    self.intersections.get(id),
                ))
            })
            .collect();
        let output = cut::cut(
            &self.mesh,
            &self.registry,
            &self.intersections,
            &segments,
            &plane_cuts,
            &self.effective_policy(),
        );
        self.state = Some(CutState {
            flood,
            segments,
            plane_cuts,
            output,
        });
    }

    /// Build the fibula→mandible transfer packet from the current kept
    /// geometry. Returns `None` while uncut or with transfer disabled.
    ///
    /// The polyline direction carried per plane is the plane normal; the
    /// viewer layer may substitute its own curve-derived directions.
    pub fn build_transfer_packet(&self) -> Option<TransferPacket> {
        if !self.is_transfer {
            return None;
        }
        let state = self.state.as_ref()?;
        let geometry = state.output.kept_geometry(&self.mesh, &state.segments);
        let plane_ids = self.registry.order().to_vec();
        let polyline_angles = plane_ids
            .iter()
            .filter_map(|&id| self.registry.get(id).map(Plane::normal))
            .collect();
        Some(TransferPacket {
            plane_ids,
            vertices: geometry.vertices,
            triangles: geometry.triangles,
            polyline_angles,
            colors: geometry.colors,
            normals: geometry.normals,
            color_count: state.output.kept_segments.len(),
        })
    }

    /// Emit the transfer packet to the listeners (fibula side).
    pub fn send_to_mandible(&mut self) -> Option<TransferPacket> {
        let packet = self.build_transfer_packet()?;
        self.notify(PlannerEvent::TransferReady(packet.clone()));
        Some(packet)
    }

    /// Consume a fibula transfer packet (mandible side): validate it and
    /// merge it with this planner's kept geometry into the composite mesh.
    pub fn receive_from_fibula(
        &mut self,
        packet: &TransferPacket,
    ) -> Result<&CompositeMesh, AssembleError> {
        let state = self.state.as_ref().ok_or(AssembleError::MandibleNotCut)?;
        let mandible_kept = state.output.kept_geometry(&self.mesh, &state.segments);
        let composite = assemble::assemble(&mandible_kept, packet)?;
        self.composite = Some(composite);
        self.notify(PlannerEvent::GeometryUpdated);
        self.composite.as_ref().ok_or(AssembleError::MandibleNotCut)
    }
}
