//! Typed notifications replacing the original signal/slot wiring.
//!
//! Fan-out is small and statically known, so events go straight to the
//! registered listeners; there is no event bus and no payload beyond what a
//! consumer cannot re-query through accessors.

use crate::assemble::TransferPacket;
use crate::cut::Side;

/// State changes the rendering/UI layer needs to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    /// Previously rendered geometry is stale; re-query the accessors.
    GeometryUpdated,
    /// A cut recomputation finished.
    CutCompleted { side: Side },
    /// The fibula side produced a transfer packet for the mandible side.
    TransferReady(TransferPacket),
}

/// Registered consumer of planner events.
pub trait PlannerListener {
    fn on_event(&mut self, event: &PlannerEvent);
}
