//! Motion coordination between shapes of one type.
//!
//! Several shapes can be dragged by the same mouse gesture (overlapping
//! shapes all get picked). Exactly one of them, the leader, drives the
//! redraw cycle; the others are recomputed inside the leader's repaint.

use crate::shapes::ShapeId;

/// Phase of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Dragging,
}

/// Outcome of a shape joining the moving set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// First shape of the episode; it drives repaints.
    Leader,
    Follower,
    /// The shape was already moving; nothing changed.
    AlreadyMoving,
}

/// Outcome of a shape leaving the moving set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leave {
    NotMoving,
    Left {
        was_leader: bool,
        /// The moving set is now empty: the episode is over.
        emptied: bool,
    },
}

/// Moving set, leader and snapshot flag of one shape type.
///
/// Invariants: the leader is a member of the moving set, and there is a
/// leader exactly when the set is non-empty.
#[derive(Debug, Clone, Default)]
pub struct MotionCoordinator {
    moving: Vec<ShapeId>,
    leader: Option<ShapeId>,
    snapshot_needed: bool,
}

impl MotionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MotionPhase {
        if self.moving.is_empty() {
            MotionPhase::Idle
        } else {
            MotionPhase::Dragging
        }
    }

    pub fn leader(&self) -> Option<ShapeId> {
        self.leader
    }

    pub fn is_leader(&self, id: ShapeId) -> bool {
        self.leader == Some(id)
    }

    pub fn is_moving(&self, id: ShapeId) -> bool {
        self.moving.contains(&id)
    }

    /// Shapes currently moving, in joining order.
    pub fn moving(&self) -> &[ShapeId] {
        &self.moving
    }

    /// Whether the next repaint must capture a fresh background.
    pub fn snapshot_needed(&self) -> bool {
        self.snapshot_needed
    }

    /// Force the next repaint to capture a fresh background.
    pub fn request_snapshot(&mut self) {
        self.snapshot_needed = true;
    }

    /// Read and clear the snapshot flag.
    pub fn take_snapshot_needed(&mut self) -> bool {
        std::mem::take(&mut self.snapshot_needed)
    }

    /// Register a shape that starts moving.
    pub fn begin(&mut self, id: ShapeId) -> Join {
        if self.is_moving(id) {
            return Join::AlreadyMoving;
        }
        self.moving.push(id);
        // Any change of the moving set makes the background stale: it must
        // not contain the joining shape.
        self.snapshot_needed = true;
        if self.leader.is_none() {
            self.leader = Some(id);
            log::debug!("motion: {id} leads");
            Join::Leader
        } else {
            log::debug!("motion: {id} follows");
            Join::Follower
        }
    }

    /// Retire a shape at the end of its drag.
    pub fn end(&mut self, id: ShapeId) -> Leave {
        let Some(index) = self.moving.iter().position(|m| *m == id) else {
            return Leave::NotMoving;
        };
        self.moving.remove(index);
        let was_leader = self.is_leader(id);
        let emptied = self.moving.is_empty();
        if emptied {
            self.leader = None;
            self.snapshot_needed = false;
            log::debug!("motion: episode over");
        } else {
            if was_leader {
                self.leader = self.moving.first().copied();
                log::debug!("motion: leadership passed to {:?}", self.leader);
            }
            self.snapshot_needed = true;
        }
        Leave::Left { was_leader, emptied }
    }

    /// Remove a shape synchronously (region leave, close, hard delete).
    pub fn evict(&mut self, id: ShapeId) -> Leave {
        self.end(id)
    }

    /// Forget every moving shape.
    pub fn reset(&mut self) {
        self.moving.clear();
        self.leader = None;
        self.snapshot_needed = false;
    }
}
