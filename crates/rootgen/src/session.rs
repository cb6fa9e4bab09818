//! A generation run: an explicit registry of finalized output.
//!
//! The session owns every tree and histogram destined for one
//! container file and streams them out in a fixed order, so two runs
//! over identical inputs serialize identically. There is no
//! process-wide implicit state.

use crate::container::{ContainerWrite, HistDescriptor};
use crate::error::Result;
use crate::histogram::{Hist1D, Hist2D};
use crate::tree::Tree;

/// Owns the output of one generation run.
#[derive(Debug, Default)]
pub struct Session {
    trees: Vec<Tree>,
    h1: Vec<Hist1D>,
    h2: Vec<Hist2D>,
}

impl Session {
    /// New, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a committed tree.
    pub fn record_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Register a histogram. Recording finalizes it: ownership moves
    /// into the session and further fills are impossible.
    pub fn record_h1(&mut self, mut hist: Hist1D) {
        hist.finalize();
        self.h1.push(hist);
    }

    /// Register a 2-D histogram, finalizing it.
    pub fn record_h2(&mut self, mut hist: Hist2D) {
        hist.finalize();
        self.h2.push(hist);
    }

    /// Registered trees, in record order.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Registered 1-D histograms, in record order.
    pub fn hists_1d(&self) -> &[Hist1D] {
        &self.h1
    }

    /// Registered 2-D histograms, in record order.
    pub fn hists_2d(&self) -> &[Hist2D] {
        &self.h2
    }

    /// Stream everything to a container and close it.
    ///
    /// Trees go first (branches in schema order, rows in event order),
    /// then 1-D and 2-D histograms in record order. Any error aborts
    /// the run; the container is only closed on full success.
    pub fn write_to(&self, w: &mut dyn ContainerWrite) -> Result<()> {
        for tree in &self.trees {
            let tid = w.create_tree(tree.name(), tree.title())?;
            for desc in tree.schema().branches() {
                let bid = w.add_branch(tid, desc)?;
                let column = tree
                    .column(&desc.name)
                    .expect("schema branch has a column");
                for (event, cell) in column.iter().enumerate() {
                    w.write_row(bid, event as u64, cell)?;
                }
            }
            tracing::info!(
                tree = tree.name(),
                entries = tree.entries(),
                branches = tree.schema().len(),
                "tree written"
            );
        }

        for h in &self.h1 {
            let hid = w.create_hist(&HistDescriptor {
                name: h.name().to_string(),
                title: h.title().to_string(),
                x_edges: h.axis().edges().to_vec(),
                y_edges: None,
            })?;
            w.set_stat_overflows(hid, h.stat_overflows())?;
            for (i, &v) in h.contents().iter().enumerate() {
                w.set_bin_content(hid, i, v)?;
            }
            for (i, &v) in h.sumw2().iter().enumerate() {
                w.set_sumw2(hid, i, v)?;
            }
            w.set_stats(hid, &h.stats().into())?;
            tracing::info!(hist = h.name(), entries = h.stats().entries, "histogram written");
        }

        for h in &self.h2 {
            let hid = w.create_hist(&HistDescriptor {
                name: h.name().to_string(),
                title: h.title().to_string(),
                x_edges: h.x_axis().edges().to_vec(),
                y_edges: Some(h.y_axis().edges().to_vec()),
            })?;
            w.set_stat_overflows(hid, h.stat_overflows())?;
            for (i, &v) in h.contents().iter().enumerate() {
                w.set_bin_content(hid, i, v)?;
            }
            for (i, &v) in h.sumw2().iter().enumerate() {
                w.set_sumw2(hid, i, v)?;
            }
            w.set_stats(hid, &h.stats().into())?;
            tracing::info!(hist = h.name(), entries = h.stats().entries, "histogram written");
        }

        w.close()
    }
}
