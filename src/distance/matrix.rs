//! Dense distance matrix.

use super::oracle::DistanceOracle;

/// A dense n×n distance matrix stored in row-major order.
///
/// Supports Euclidean construction from planar coordinates and explicit
/// (possibly asymmetric) distance specification. The matrix keeps a running
/// count of asymmetric pairs so that [`DistanceOracle::is_symmetric`] stays
/// O(1) while entries are edited.
///
/// # Examples
///
/// ```
/// use u_tourmut::distance::{DistanceMatrix, DistanceOracle};
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// assert!(dm.is_symmetric());
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
    asymmetric_pairs: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
            asymmetric_pairs: 0,
        }
    }

    /// Computes a Euclidean distance matrix from `(x, y)` coordinates.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let d = dx.hypot(dy);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid in row-major order.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        let mut dm = Self {
            data,
            size,
            asymmetric_pairs: 0,
        };
        dm.asymmetric_pairs = dm.count_asymmetric_pairs();
        Some(dm)
    }

    /// Creates a distance matrix from nested rows.
    ///
    /// Returns `None` unless every row has exactly `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Self::from_data(size, rows.into_iter().flatten().collect())
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        if from == to {
            self.data[from * self.size + to] = distance;
            return;
        }
        let was_asymmetric = self.get(from, to) != self.get(to, from);
        self.data[from * self.size + to] = distance;
        let is_asymmetric = self.get(from, to) != self.get(to, from);
        match (was_asymmetric, is_asymmetric) {
            (false, true) => self.asymmetric_pairs += 1,
            (true, false) => self.asymmetric_pairs -= 1,
            _ => {}
        }
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric_within(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    fn count_asymmetric_pairs(&self) -> usize {
        let mut count = 0;
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl DistanceOracle for DistanceMatrix {
    fn cost(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }

    fn is_symmetric(&self) -> bool {
        self.asymmetric_pairs == 0
    }
}
