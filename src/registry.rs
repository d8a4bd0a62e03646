//! Ordered arena of cutting planes.
//!
//! Planes are owned here and referred to everywhere else by stable
//! [`PlaneId`]s, never by reference, so a ghost plane can be dropped without
//! leaving anything dangling. The *order* of the sequence is the geometric
//! order along the resection polyline: callers add the two real boundary
//! planes first and insert ghosts between them, with each plane's normal
//! facing the next plane in the sequence.

use crate::plane::Plane;
use hashbrown::HashMap;

/// Stable identity of a plane. Ids are never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(u32);

impl PlaneId {
    pub const fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct PlaneEntry {
    plane: Plane,
    ghost: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlaneRegistry {
    arena: HashMap<PlaneId, PlaneEntry>,
    order: Vec<PlaneId>,
    next: u32,
}

impl PlaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, plane: Plane, ghost: bool) -> PlaneId {
        let id = PlaneId(self.next);
        self.next += 1;
        self.arena.insert(id, PlaneEntry { plane, ghost });
        id
    }

    /// Append a real (boundary) plane at the end of the sequence.
    pub fn add(&mut self, plane: Plane) -> PlaneId {
        let id = self.allocate(plane, false);
        self.order.push(id);
        id
    }

    /// Insert a transient ghost plane just before the last plane, keeping the
    /// two real boundary planes at the ends of the sequence. With fewer than
    /// two planes present the ghost is appended.
    pub fn insert_ghost(&mut self, plane: Plane) -> PlaneId {
        let id = self.allocate(plane, true);
        if self.order.len() < 2 {
            self.order.push(id);
        } else {
            let at = self.order.len() - 1;
            self.order.insert(at, id);
        }
        id
    }

    /// Drop every ghost plane, returning the removed ids so callers can
    /// invalidate any state keyed by them.
    pub fn remove_ghost_planes(&mut self) -> Vec<PlaneId> {
        let removed: Vec<PlaneId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.arena[id].ghost)
            .collect();
        self.order.retain(|id| !self.arena[id].ghost);
        for id in &removed {
            self.arena.remove(id);
        }
        removed
    }

    /// Plane ids in sequence order.
    pub fn order(&self) -> &[PlaneId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: PlaneId) -> Option<&Plane> {
        self.arena.get(&id).map(|e| &e.plane)
    }

    pub fn get_mut(&mut self, id: PlaneId) -> Option<&mut Plane> {
        self.arena.get_mut(&id).map(|e| &mut e.plane)
    }

    pub fn is_ghost(&self, id: PlaneId) -> bool {
        self.arena.get(&id).is_some_and(|e| e.ghost)
    }

    /// Ordinal position of a plane in the sequence.
    pub fn position(&self, id: PlaneId) -> Option<usize> {
        self.order.iter().position(|&p| p == id)
    }

    /// The planes immediately before and after `id` in the sequence.
    pub fn neighbours(&self, id: PlaneId) -> (Option<PlaneId>, Option<PlaneId>) {
        match self.position(id) {
            Some(i) => {
                let prev = i.checked_sub(1).map(|j| self.order[j]);
                let next = self.order.get(i + 1).copied();
                (prev, next)
            },
            None => (None, None),
        }
    }

    /// Consecutive plane pairs: the bands the mesh is segmented into.
    pub fn bands(&self) -> impl Iterator<Item = (PlaneId, PlaneId)> + '_ {
        self.order.windows(2).map(|w| (w[0], w[1]))
    }

    /// Ghost planes grouped into consecutive pairs, in sequence order.
    /// Fibula ghosts always arrive two at a time (two cut angles per mandible
    /// plane); a trailing unpaired ghost is not reported.
    pub fn ghost_pairs(&self) -> Vec<(PlaneId, PlaneId)> {
        let ghosts: Vec<PlaneId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| self.is_ghost(id))
            .collect();
        ghosts.chunks_exact(2).map(|c| (c[0], c[1])).collect()
    }
}
