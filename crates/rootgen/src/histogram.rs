//! Weighted 1-D and 2-D histograms with flow accounting.
//!
//! Contents and sumw2 arrays carry `n_bins + 2` cells per dimension:
//! slot 0 is underflow, slot `n_bins + 1` overflow. For 2-D the cells
//! are flattened as `ix + (nx + 2) * iy`.
//!
//! A histogram starts `Building`, moves to `Filling` on the first
//! fill, and becomes `Finalized` when handed to a container; there is
//! no way back, and a finalized histogram rejects further fills.

use crate::axis::{Axis, BinIndex};
use crate::error::{FixtureError, Result};
use crate::stats::{Stats1D, Stats2D};

/// Lifecycle state of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistState {
    /// Created, nothing filled yet.
    Building,
    /// At least one fill recorded.
    Filling,
    /// Handed to a container; read-only.
    Finalized,
}

fn flow_slot(idx: BinIndex, n_bins: usize) -> usize {
    match idx {
        BinIndex::Underflow => 0,
        BinIndex::In(k) => k + 1,
        BinIndex::Overflow => n_bins + 1,
    }
}

/// A weighted 1-D histogram.
#[derive(Debug, Clone)]
pub struct Hist1D {
    name: String,
    title: String,
    axis: Axis,
    contents: Vec<f64>,
    sumw2: Vec<f64>,
    stats: Stats1D,
    stat_overflows: bool,
    state: HistState,
}

impl Hist1D {
    /// Fixed-width histogram: `n` bins over `[low, high)`.
    pub fn fixed(name: &str, n: usize, low: f64, high: f64) -> Result<Self> {
        Ok(Self::with_axis(name, Axis::fixed(n, low, high)?))
    }

    /// Variable-width histogram from explicit edges.
    pub fn variable(name: &str, edges: Vec<f64>) -> Result<Self> {
        Ok(Self::with_axis(name, Axis::variable(edges)?))
    }

    /// Histogram over an already-built axis.
    pub fn with_axis(name: &str, axis: Axis) -> Self {
        let cells = axis.n_bins() + 2;
        Hist1D {
            name: name.to_string(),
            title: String::new(),
            axis,
            contents: vec![0.0; cells],
            sumw2: vec![0.0; cells],
            stats: Stats1D::default(),
            stat_overflows: false,
            state: HistState::Building,
        }
    }

    /// Set the histogram title.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Enable or disable the StatOverflows mode.
    ///
    /// When enabled, under/overflow fills still contribute to the stat
    /// accumulator; when disabled they update only the flow slots.
    pub fn set_stat_overflows(&mut self, enabled: bool) -> Result<()> {
        if self.state == HistState::Finalized {
            return Err(FixtureError::FinalizedHistogram(self.name.clone()));
        }
        self.stat_overflows = enabled;
        Ok(())
    }

    /// Record one fill of weight `w` at `x`.
    pub fn fill(&mut self, x: f64, w: f64) -> Result<()> {
        if self.state == HistState::Finalized {
            return Err(FixtureError::FinalizedHistogram(self.name.clone()));
        }
        self.state = HistState::Filling;

        let idx = self.axis.index_of(x);
        let slot = flow_slot(idx, self.axis.n_bins());
        self.contents[slot] += w;
        self.sumw2[slot] += w * w;

        if matches!(idx, BinIndex::In(_)) || self.stat_overflows {
            self.stats.fill(x, w);
        }
        Ok(())
    }

    /// Freeze the histogram; all further mutation fails.
    pub fn finalize(&mut self) {
        self.state = HistState::Finalized;
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The x axis.
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// All cells including flow slots, length `n_bins + 2`.
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// All sumw2 cells including flow slots.
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Content of regular bin `k`.
    pub fn bin_content(&self, k: usize) -> f64 {
        self.contents[k + 1]
    }

    /// Contents of the regular bins only.
    pub fn bin_contents(&self) -> &[f64] {
        &self.contents[1..self.contents.len() - 1]
    }

    /// Underflow slot content.
    pub fn underflow(&self) -> f64 {
        self.contents[0]
    }

    /// Overflow slot content.
    pub fn overflow(&self) -> f64 {
        self.contents[self.contents.len() - 1]
    }

    /// The stat accumulator snapshot.
    pub fn stats(&self) -> &Stats1D {
        &self.stats
    }

    /// Whether StatOverflows mode is enabled.
    pub fn stat_overflows(&self) -> bool {
        self.stat_overflows
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HistState {
        self.state
    }
}

/// A weighted 2-D histogram over the cartesian product of two axes.
#[derive(Debug, Clone)]
pub struct Hist2D {
    name: String,
    title: String,
    x_axis: Axis,
    y_axis: Axis,
    contents: Vec<f64>,
    sumw2: Vec<f64>,
    stats: Stats2D,
    stat_overflows: bool,
    state: HistState,
}

impl Hist2D {
    /// Fixed-width histogram on both axes.
    pub fn fixed(
        name: &str,
        nx: usize,
        x_low: f64,
        x_high: f64,
        ny: usize,
        y_low: f64,
        y_high: f64,
    ) -> Result<Self> {
        Ok(Self::with_axes(
            name,
            Axis::fixed(nx, x_low, x_high)?,
            Axis::fixed(ny, y_low, y_high)?,
        ))
    }

    /// Variable-width histogram from explicit edges on both axes.
    pub fn variable(name: &str, x_edges: Vec<f64>, y_edges: Vec<f64>) -> Result<Self> {
        Ok(Self::with_axes(
            name,
            Axis::variable(x_edges)?,
            Axis::variable(y_edges)?,
        ))
    }

    /// Histogram over already-built axes.
    pub fn with_axes(name: &str, x_axis: Axis, y_axis: Axis) -> Self {
        let cells = (x_axis.n_bins() + 2) * (y_axis.n_bins() + 2);
        Hist2D {
            name: name.to_string(),
            title: String::new(),
            x_axis,
            y_axis,
            contents: vec![0.0; cells],
            sumw2: vec![0.0; cells],
            stats: Stats2D::default(),
            stat_overflows: false,
            state: HistState::Building,
        }
    }

    /// Set the histogram title.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Enable or disable the StatOverflows mode.
    pub fn set_stat_overflows(&mut self, enabled: bool) -> Result<()> {
        if self.state == HistState::Finalized {
            return Err(FixtureError::FinalizedHistogram(self.name.clone()));
        }
        self.stat_overflows = enabled;
        Ok(())
    }

    /// Record one fill of weight `w` at `(x, y)`.
    pub fn fill(&mut self, x: f64, y: f64, w: f64) -> Result<()> {
        if self.state == HistState::Finalized {
            return Err(FixtureError::FinalizedHistogram(self.name.clone()));
        }
        self.state = HistState::Filling;

        let ix = self.x_axis.index_of(x);
        let iy = self.y_axis.index_of(y);
        let cell = self.cell_index(ix, iy);
        self.contents[cell] += w;
        self.sumw2[cell] += w * w;

        let in_range = matches!(ix, BinIndex::In(_)) && matches!(iy, BinIndex::In(_));
        if in_range || self.stat_overflows {
            self.stats.fill(x, y, w);
        }
        Ok(())
    }

    /// Freeze the histogram; all further mutation fails.
    pub fn finalize(&mut self) {
        self.state = HistState::Finalized;
    }

    fn cell_index(&self, ix: BinIndex, iy: BinIndex) -> usize {
        let sx = flow_slot(ix, self.x_axis.n_bins());
        let sy = flow_slot(iy, self.y_axis.n_bins());
        sx + (self.x_axis.n_bins() + 2) * sy
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The x axis.
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// The y axis.
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// All cells including flow slots, flattened `ix + (nx+2)*iy`.
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// All sumw2 cells, same layout as [`Hist2D::contents`].
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Content of regular bin `(kx, ky)`.
    pub fn bin_content(&self, kx: usize, ky: usize) -> f64 {
        self.contents[(kx + 1) + (self.x_axis.n_bins() + 2) * (ky + 1)]
    }

    /// The stat accumulator snapshot.
    pub fn stats(&self) -> &Stats2D {
        &self.stats
    }

    /// Whether StatOverflows mode is enabled.
    pub fn stat_overflows(&self) -> bool {
        self.stat_overflows
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HistState {
        self.state
    }
}
