//! Cyclic tour with cached length.
//!
//! # Representation
//!
//! The tour owns a single `order` vector of node ids and an inverse index
//! `positions[node] = slot`. Successor and predecessor are position
//! arithmetic modulo the tour size, so there is no separate link structure
//! to keep in sync with the slot numbers.
//!
//! The cached length is kept consistent by every mutating primitive.
//! Reversal and swap update it incrementally from the boundary edges; block
//! relocation and shuffling rebuild a range of the order and recompute.
//!
//! For asymmetric oracles the tour also keeps prefix sums of the forward and
//! backward edge costs along the order, so the cost of traversing any
//! sub-path backwards is two subtractions. Each mutation refreshes the sums
//! from its first touched slot onward.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::distance::DistanceOracle;

use super::visit::{Orientation, Visit};

const ABSENT: usize = usize::MAX;

/// A closed sequence visiting every node exactly once.
///
/// Position 0 is the anchor: operators never draw it as a move endpoint.
///
/// All mutating primitives take the [`DistanceOracle`] the tour was built
/// with; passing a different oracle leaves the cached length meaningless.
///
/// # Examples
///
/// ```
/// use u_tourmut::distance::DistanceMatrix;
/// use u_tourmut::models::Tour;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// let mut tour = Tour::new(vec![0, 2, 1, 3], &dm).unwrap();
///
/// let predicted = tour.reversed_segment_cost(1, 2, &dm);
/// tour.reverse_segment(1, 2, &dm);
/// assert_eq!(tour.nodes(), &[0, 1, 2, 3]);
/// assert_eq!(tour.length(), predicted);
/// assert!((tour.length() - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    order: Vec<usize>,
    positions: Vec<usize>,
    length: f64,
    // forward_prefix[p] = sum of cost(order[q], order[q + 1]) for q < p;
    // backward_prefix the same with each edge reversed. Empty when symmetric.
    forward_prefix: Vec<f64>,
    backward_prefix: Vec<f64>,
}

impl Tour {
    /// Builds a tour visiting `nodes` in the given order.
    ///
    /// Fails if `nodes` is empty or contains a node twice.
    pub fn new<D: DistanceOracle + ?Sized>(nodes: Vec<usize>, distances: &D) -> Result<Self> {
        if nodes.is_empty() {
            return Err(anyhow!("Tour must contain at least one node"));
        }
        let distinct = nodes.iter().copied().collect::<HashSet<usize>>();
        if distinct.len() != nodes.len() {
            return Err(anyhow!("Tour contains duplicate nodes"));
        }
        Ok(Self::from_permutation(nodes, distances))
    }

    /// Builds a tour from nodes the caller knows to be distinct.
    pub(crate) fn from_permutation<D: DistanceOracle + ?Sized>(
        nodes: Vec<usize>,
        distances: &D,
    ) -> Self {
        let max_node = nodes.iter().copied().max().unwrap_or(0);
        let mut positions = vec![ABSENT; max_node + 1];
        for (pos, &node) in nodes.iter().enumerate() {
            positions[node] = pos;
        }
        let mut tour = Self {
            order: nodes,
            positions,
            length: 0.0,
            forward_prefix: Vec::new(),
            backward_prefix: Vec::new(),
        };
        tour.length = tour.recompute_length(distances);
        tour.refresh_prefix(0, distances);
        tour
    }

    /// Number of visits.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`: a tour holds at least one visit.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node ids in tour order.
    pub fn nodes(&self) -> &[usize] {
        &self.order
    }

    /// Node at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn node_at(&self, position: usize) -> usize {
        self.order[position]
    }

    /// Cached total edge cost.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Current slot of the visit with the given id, if present.
    pub fn position_of(&self, id: usize) -> Option<usize> {
        self.positions.get(id).copied().filter(|&p| p != ABSENT)
    }

    /// Slot following `position`, wrapping to 0.
    pub fn next_position(&self, position: usize) -> usize {
        if position + 1 == self.order.len() {
            0
        } else {
            position + 1
        }
    }

    /// Slot preceding `position`, wrapping to the last slot.
    pub fn prev_position(&self, position: usize) -> usize {
        if position == 0 {
            self.order.len() - 1
        } else {
            position - 1
        }
    }

    /// View of the visit occupying `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn visit_at_position(&self, position: usize) -> Visit {
        let origin = self.order[position];
        Visit {
            id: origin,
            position,
            origin,
            destination: self.order[self.next_position(position)],
        }
    }

    /// View of the visit with the given id, if present.
    pub fn visit_by_id(&self, id: usize) -> Option<Visit> {
        self.position_of(id).map(|p| self.visit_at_position(p))
    }

    /// Returns `true` if the two positions are adjacent in the cycle.
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        a != b && (self.next_position(a) == b || self.prev_position(a) == b)
    }

    /// Sums all edge costs in current order, ignoring the cache.
    pub fn recompute_length<D: DistanceOracle + ?Sized>(&self, distances: &D) -> f64 {
        (0..self.order.len())
            .map(|p| self.edge_cost(p, distances))
            .sum()
    }

    /// Cost change of traversing the open sub-path `from..=to` backwards.
    ///
    /// Sums `cost(next, cur) - cost(cur, next)` over each interior edge of
    /// the path. Zero for symmetric oracles. O(1) from the prefix sums.
    pub fn path_reversal_correction<D: DistanceOracle + ?Sized>(
        &self,
        from: usize,
        to: usize,
        distances: &D,
    ) -> f64 {
        if distances.is_symmetric() || to <= from {
            return 0.0;
        }
        if self.forward_prefix.len() == self.order.len() {
            let backward = self.backward_prefix[to] - self.backward_prefix[from];
            let forward = self.forward_prefix[to] - self.forward_prefix[from];
            return backward - forward;
        }
        self.order[from..=to]
            .windows(2)
            .map(|w| distances.cost(w[1], w[0]) - distances.cost(w[0], w[1]))
            .sum()
    }

    /// Tour length that reversing positions `i..=j` would produce.
    ///
    /// Does not mutate the tour. Argument order does not matter. Only the
    /// two boundary edges are re-costed when the oracle is symmetric.
    pub fn reversed_segment_cost<D: DistanceOracle + ?Sized>(
        &self,
        i: usize,
        j: usize,
        distances: &D,
    ) -> f64 {
        let (lo, hi) = ordered(i, j);
        let n = self.order.len();
        if lo == hi {
            return self.length;
        }
        if hi - lo + 1 == n {
            // Whole cycle: every edge flips direction.
            return self.length + self.cycle_reversal_correction(distances);
        }

        let before = self.order[self.prev_position(lo)];
        let after = self.order[self.next_position(hi)];
        let first = self.order[lo];
        let last = self.order[hi];

        let removed = distances.cost(before, first) + distances.cost(last, after);
        let added = distances.cost(before, last) + distances.cost(first, after);

        self.length - removed + added + self.path_reversal_correction(lo, hi, distances)
    }

    /// Reverses positions `i..=j` in place.
    ///
    /// The cached length becomes exactly the value
    /// [`reversed_segment_cost`](Self::reversed_segment_cost) predicts.
    pub fn reverse_segment<D: DistanceOracle + ?Sized>(
        &mut self,
        i: usize,
        j: usize,
        distances: &D,
    ) {
        let (lo, hi) = ordered(i, j);
        if lo == hi {
            return;
        }
        let new_length = self.reversed_segment_cost(lo, hi, distances);
        self.order[lo..=hi].reverse();
        self.reindex(lo, hi + 1);
        self.length = new_length;
        self.refresh_prefix(lo, distances);
    }

    /// Tour length that exchanging the visits at `i` and `j` would produce.
    pub fn swapped_positions_cost<D: DistanceOracle + ?Sized>(
        &self,
        i: usize,
        j: usize,
        distances: &D,
    ) -> f64 {
        if i == j {
            return self.length;
        }
        let edges = self.edges_touching(i, j);
        let node_after_swap = |p: usize| {
            if p == i {
                self.order[j]
            } else if p == j {
                self.order[i]
            } else {
                self.order[p]
            }
        };

        let mut delta = 0.0;
        for &p in &edges {
            let q = self.next_position(p);
            delta -= self.edge_cost(p, distances);
            delta += distances.cost(node_after_swap(p), node_after_swap(q));
        }
        self.length + delta
    }

    /// Exchanges the visits at positions `i` and `j`.
    pub fn swap_positions<D: DistanceOracle + ?Sized>(
        &mut self,
        i: usize,
        j: usize,
        distances: &D,
    ) {
        if i == j {
            return;
        }
        let new_length = self.swapped_positions_cost(i, j, distances);
        self.order.swap(i, j);
        self.positions[self.order[i]] = i;
        self.positions[self.order[j]] = j;
        self.length = new_length;
        self.refresh_prefix(i.min(j), distances);
    }

    /// Exchanges two disjoint blocks of the order.
    ///
    /// The destination block `[dest, dest + dest_len)` and the source block
    /// `[src, src + src_len)` trade places. A zero-length block acts as an
    /// insertion point before the given position (`len()` appends). The
    /// source block is written with the requested `orientation`; the
    /// destination block keeps its order.
    ///
    /// Returns `false` and leaves the tour untouched when a block runs past
    /// the end or the blocks overlap; returns `true` otherwise.
    pub fn relocate_segment<D: DistanceOracle + ?Sized>(
        &mut self,
        dest: usize,
        dest_len: usize,
        src: usize,
        src_len: usize,
        orientation: Orientation,
        distances: &D,
    ) -> bool {
        let n = self.order.len();
        let dest_block = (dest, dest + dest_len);
        let src_block = (src, src + src_len);
        if dest_block.1 > n || src_block.1 > n {
            return false;
        }
        let (first, second) = if dest <= src {
            (dest_block, src_block)
        } else {
            (src_block, dest_block)
        };
        if first.1 > second.0 {
            return false;
        }

        let block = |range: (usize, usize)| -> Vec<usize> {
            let mut items = self.order[range.0..range.1].to_vec();
            if range == src_block && orientation == Orientation::Reversed {
                items.reverse();
            }
            items
        };

        let mut rebuilt = Vec::with_capacity(second.1 - first.0);
        rebuilt.extend(block(second));
        rebuilt.extend_from_slice(&self.order[first.1..second.0]);
        rebuilt.extend(block(first));

        self.order.splice(first.0..second.1, rebuilt);
        self.reindex(first.0, second.1);
        self.length = self.recompute_length(distances);
        self.refresh_prefix(first.0, distances);
        true
    }

    /// Shuffles the visits strictly between positions `i1` and `i2`.
    pub fn shuffle_between<D, R>(&mut self, i1: usize, i2: usize, rng: &mut R, distances: &D)
    where
        D: DistanceOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let (lo, hi) = ordered(i1, i2);
        if hi - lo < 3 {
            return;
        }
        self.order[lo + 1..hi].shuffle(rng);
        self.reindex(lo + 1, hi);
        self.length = self.recompute_length(distances);
        self.refresh_prefix(lo + 1, distances);
    }

    fn edge_cost<D: DistanceOracle + ?Sized>(&self, p: usize, distances: &D) -> f64 {
        distances.cost(self.order[p], self.order[self.next_position(p)])
    }

    /// Distinct edge indices (edge `p` leaves slot `p`) touching `i` or `j`.
    fn edges_touching(&self, i: usize, j: usize) -> Vec<usize> {
        let mut edges = vec![
            self.prev_position(i),
            i,
            self.prev_position(j),
            j,
        ];
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    fn cycle_reversal_correction<D: DistanceOracle + ?Sized>(&self, distances: &D) -> f64 {
        if distances.is_symmetric() {
            return 0.0;
        }
        (0..self.order.len())
            .map(|p| {
                let a = self.order[p];
                let b = self.order[self.next_position(p)];
                distances.cost(b, a) - distances.cost(a, b)
            })
            .sum()
    }

    /// Rebuilds the prefix sums from slot `from` onward.
    fn refresh_prefix<D: DistanceOracle + ?Sized>(&mut self, from: usize, distances: &D) {
        if distances.is_symmetric() {
            self.forward_prefix.clear();
            self.backward_prefix.clear();
            return;
        }
        let n = self.order.len();
        let from = if self.forward_prefix.len() == n {
            from.max(1)
        } else {
            self.forward_prefix = vec![0.0; n];
            self.backward_prefix = vec![0.0; n];
            1
        };
        for p in from..n {
            let (a, b) = (self.order[p - 1], self.order[p]);
            self.forward_prefix[p] = self.forward_prefix[p - 1] + distances.cost(a, b);
            self.backward_prefix[p] = self.backward_prefix[p - 1] + distances.cost(b, a);
        }
    }

    fn reindex(&mut self, from: usize, to: usize) {
        for p in from..to {
            self.positions[self.order[p]] = p;
        }
    }
}

fn ordered(i: usize, j: usize) -> (usize, usize) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}
