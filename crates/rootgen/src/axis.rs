//! Binning of one histogram dimension.

use serde::Serialize;

use crate::error::{FixtureError, Result};

/// Where a coordinate lands on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinIndex {
    /// Below the first edge.
    Underflow,
    /// Regular bin `k` covering `[edge[k], edge[k+1])`.
    In(usize),
    /// At or above the last edge.
    Overflow,
}

/// One histogram axis: an ascending edge sequence.
///
/// Fixed-width axes locate bins arithmetically in O(1); variable axes
/// by binary search over the edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    edges: Vec<f64>,
    fixed: bool,
}

impl Axis {
    /// Fixed-width axis: `n` bins over `[low, high)`.
    pub fn fixed(n: usize, low: f64, high: f64) -> Result<Self> {
        if n == 0 {
            return Err(FixtureError::Binning("axis with zero bins".to_string()));
        }
        if !(low < high) {
            return Err(FixtureError::Binning(format!(
                "invalid axis limits: low={low}, high={high}"
            )));
        }
        let width = (high - low) / n as f64;
        let mut edges: Vec<f64> = (0..n).map(|i| low + i as f64 * width).collect();
        edges.push(high);
        Ok(Axis { edges, fixed: true })
    }

    /// Variable-width axis from explicit edges (strictly increasing,
    /// at least two).
    pub fn variable(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(FixtureError::Binning(format!(
                "need at least 2 edges, got {}",
                edges.len()
            )));
        }
        for w in edges.windows(2) {
            if !(w[0] < w[1]) {
                return Err(FixtureError::Binning(format!(
                    "edges not strictly increasing: {} then {}",
                    w[0], w[1]
                )));
            }
        }
        Ok(Axis {
            edges,
            fixed: false,
        })
    }

    /// Number of regular bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin edges, length `n_bins() + 1`.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Low edge of the axis domain.
    pub fn low(&self) -> f64 {
        self.edges[0]
    }

    /// High edge of the axis domain.
    pub fn high(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Locate the bin for a coordinate, half-open convention: bin `k`
    /// covers `[edge[k], edge[k+1])`, so `x == high()` is overflow.
    pub fn index_of(&self, x: f64) -> BinIndex {
        if x < self.low() || x.is_nan() {
            return BinIndex::Underflow;
        }
        if x >= self.high() {
            return BinIndex::Overflow;
        }
        if self.fixed {
            let n = self.n_bins();
            let w = (self.high() - self.low()) / n as f64;
            // x < high, but rounding can still push the quotient to n.
            let bin = (((x - self.low()) / w) as usize).min(n - 1);
            return BinIndex::In(bin);
        }
        match self
            .edges
            .binary_search_by(|e| e.partial_cmp(&x).expect("edges and x are finite"))
        {
            Ok(i) => BinIndex::In(i.min(self.n_bins() - 1)),
            Err(i) => BinIndex::In(i - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_axis_edges() {
        let ax = Axis::fixed(3, 0.0, 3.0).unwrap();
        assert_eq!(ax.n_bins(), 3);
        assert_eq!(ax.edges(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn fixed_axis_rejects_bad_limits() {
        assert!(Axis::fixed(0, 0.0, 1.0).is_err());
        assert!(Axis::fixed(3, 1.0, 1.0).is_err());
        assert!(Axis::fixed(3, 2.0, 1.0).is_err());
    }

    #[test]
    fn variable_axis_rejects_unsorted_edges() {
        assert!(Axis::variable(vec![0.0]).is_err());
        assert!(Axis::variable(vec![0.0, 1.0, 1.0]).is_err());
        assert!(Axis::variable(vec![0.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn half_open_lookup_fixed() {
        let ax = Axis::fixed(3, 0.0, 3.0).unwrap();
        assert_eq!(ax.index_of(-0.1), BinIndex::Underflow);
        assert_eq!(ax.index_of(0.0), BinIndex::In(0));
        assert_eq!(ax.index_of(0.999), BinIndex::In(0));
        assert_eq!(ax.index_of(1.0), BinIndex::In(1));
        assert_eq!(ax.index_of(2.999), BinIndex::In(2));
        // upper domain bound is overflow, not the last bin
        assert_eq!(ax.index_of(3.0), BinIndex::Overflow);
        assert_eq!(ax.index_of(10.0), BinIndex::Overflow);
    }

    #[test]
    fn half_open_lookup_variable() {
        let ax = Axis::variable(vec![0.0, 1.5, 2.0, 3.0]).unwrap();
        assert_eq!(ax.index_of(1.6), BinIndex::In(1));
        assert_eq!(ax.index_of(1.5), BinIndex::In(1));
        assert_eq!(ax.index_of(2.0), BinIndex::In(2));
        assert_eq!(ax.index_of(0.0), BinIndex::In(0));
        assert_eq!(ax.index_of(3.0), BinIndex::Overflow);
        assert_eq!(ax.index_of(-1.0), BinIndex::Underflow);
    }

    #[test]
    fn nan_goes_to_underflow() {
        let ax = Axis::fixed(3, 0.0, 3.0).unwrap();
        assert_eq!(ax.index_of(f64::NAN), BinIndex::Underflow);
    }
}
