//! Read-only access to a collection of tours.

use super::tour::Tour;

/// An indexed collection of tours, used by population-aware operators to
/// sample a reference tour.
pub trait Population {
    /// Number of members.
    fn len(&self) -> usize;

    /// Returns `true` if there are no members.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member at `index`.
    ///
    /// # Panics
    ///
    /// May panic if `index >= len()`.
    fn member(&self, index: usize) -> &Tour;
}

impl Population for [Tour] {
    fn len(&self) -> usize {
        <[Tour]>::len(self)
    }

    fn member(&self, index: usize) -> &Tour {
        &self[index]
    }
}

impl Population for Vec<Tour> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn member(&self, index: usize) -> &Tour {
        &self[index]
    }
}
