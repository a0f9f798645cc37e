//! Visit views and block orientation.

/// A read-only view of one occupied slot of a [`Tour`](super::Tour).
///
/// Each visit wraps the directed edge leaving its slot: `origin` is the node
/// at `position` and `destination` is the node at the next position (the
/// successor of the last slot is slot 0). Consecutive visits therefore always
/// satisfy `v.destination == next.origin`.
///
/// The `id` is the node identifier and stays stable while the visit moves
/// between positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// Stable identifier (the node this visit departs from).
    pub id: usize,
    /// Current slot, `0..tour.len()`.
    pub position: usize,
    /// Node at this slot.
    pub origin: usize,
    /// Node at the following slot.
    pub destination: usize,
}

/// Orientation in which a relocated block is re-inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Keep the block's internal order.
    #[default]
    Forward,
    /// Mirror the block before re-inserting it.
    Reversed,
}
