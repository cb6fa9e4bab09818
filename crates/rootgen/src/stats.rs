//! Running weighted-moment accumulators for histograms.
//!
//! Plain incremental sums; derived quantities (mean, variance) are
//! computed on demand at finalize time. Fixture data is small, so no
//! compensated summation is used and two identical runs produce
//! bit-identical sums.

use serde::Serialize;

/// Weighted moments of a 1-D fill sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stats1D {
    /// Number of fills counted.
    pub entries: u64,
    /// Sum of weights.
    pub sum_w: f64,
    /// Sum of squared weights.
    pub sum_w2: f64,
    /// First weighted x moment.
    pub sum_wx: f64,
    /// Second weighted x moment.
    pub sum_wx2: f64,
}

impl Stats1D {
    /// Accumulate one fill.
    pub fn fill(&mut self, x: f64, w: f64) {
        self.entries += 1;
        self.sum_w += w;
        self.sum_w2 += w * w;
        self.sum_wx += w * x;
        self.sum_wx2 += w * x * x;
    }

    /// Weighted mean, `sumWX / sumW`.
    pub fn mean(&self) -> f64 {
        self.sum_wx / self.sum_w
    }

    /// Weighted variance, `sumWX2 / sumW - mean^2`.
    pub fn variance(&self) -> f64 {
        let m = self.mean();
        self.sum_wx2 / self.sum_w - m * m
    }

    /// Weighted standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance().abs().sqrt()
    }
}

/// Weighted moments of a 2-D fill sequence, including the cross term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stats2D {
    /// Number of fills counted.
    pub entries: u64,
    /// Sum of weights.
    pub sum_w: f64,
    /// Sum of squared weights.
    pub sum_w2: f64,
    /// First weighted x moment.
    pub sum_wx: f64,
    /// Second weighted x moment.
    pub sum_wx2: f64,
    /// First weighted y moment.
    pub sum_wy: f64,
    /// Second weighted y moment.
    pub sum_wy2: f64,
    /// Weighted cross term.
    pub sum_wxy: f64,
}

impl Stats2D {
    /// Accumulate one fill.
    pub fn fill(&mut self, x: f64, y: f64, w: f64) {
        self.entries += 1;
        self.sum_w += w;
        self.sum_w2 += w * w;
        self.sum_wx += w * x;
        self.sum_wx2 += w * x * x;
        self.sum_wy += w * y;
        self.sum_wy2 += w * y * y;
        self.sum_wxy += w * x * y;
    }

    /// Weighted mean along x.
    pub fn x_mean(&self) -> f64 {
        self.sum_wx / self.sum_w
    }

    /// Weighted mean along y.
    pub fn y_mean(&self) -> f64 {
        self.sum_wy / self.sum_w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moments_1d() {
        let mut s = Stats1D::default();
        s.fill(1.0, 2.0);
        s.fill(3.0, 1.0);
        assert_eq!(s.entries, 2);
        assert_eq!(s.sum_w, 3.0);
        assert_eq!(s.sum_w2, 5.0);
        assert_eq!(s.sum_wx, 5.0);
        assert_eq!(s.sum_wx2, 11.0);
        assert!((s.mean() - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn cross_term_2d() {
        let mut s = Stats2D::default();
        s.fill(2.0, 3.0, 0.5);
        assert_eq!(s.sum_wxy, 3.0);
        assert_eq!(s.sum_wy2, 4.5);
        assert_eq!(s.x_mean(), 2.0);
        assert_eq!(s.y_mean(), 3.0);
    }
}
