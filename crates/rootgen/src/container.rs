//! The container-writer seam.
//!
//! The binary container itself is an external collaborator; the core
//! only talks to the [`ContainerWrite`] trait. [`MemoryContainer`]
//! records everything in process and stands in for the real engine in
//! tests; the JSON-file backend lives in [`crate::json`].

use serde::Serialize;

use crate::column::CellValues;
use crate::error::{FixtureError, Result};
use crate::schema::BranchDescriptor;
use crate::stats::{Stats1D, Stats2D};

/// Options for opening a container for writing.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Ask the engine to compress its payload.
    pub compressed: bool,
    /// File-level title.
    pub title: String,
}

/// Handle to a tree created in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeId(pub usize);

/// Handle to a branch added to a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchId(pub usize);

/// Handle to a histogram created in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistId(pub usize);

/// Shape of a histogram as the container sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistDescriptor {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// X bin edges, length `nx + 1`.
    pub x_edges: Vec<f64>,
    /// Y bin edges for 2-D histograms.
    pub y_edges: Option<Vec<f64>>,
}

impl HistDescriptor {
    /// Total cell count including flow slots.
    pub fn n_cells(&self) -> usize {
        let nx = self.x_edges.len() - 1;
        match &self.y_edges {
            None => nx + 2,
            Some(ye) => (nx + 2) * (ye.len() - 1 + 2),
        }
    }
}

/// Flat snapshot of a stat accumulator, y terms zero for 1-D.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatSnapshot {
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

impl From<&Stats1D> for StatSnapshot {
    fn from(s: &Stats1D) -> Self {
        StatSnapshot {
            entries: s.entries,
            sum_w: s.sum_w,
            sum_w2: s.sum_w2,
            sum_wx: s.sum_wx,
            sum_wx2: s.sum_wx2,
            ..Default::default()
        }
    }
}

impl From<&Stats2D> for StatSnapshot {
    fn from(s: &Stats2D) -> Self {
        StatSnapshot {
            entries: s.entries,
            sum_w: s.sum_w,
            sum_w2: s.sum_w2,
            sum_wx: s.sum_wx,
            sum_wx2: s.sum_wx2,
            sum_wy: s.sum_wy,
            sum_wy2: s.sum_wy2,
            sum_wxy: s.sum_wxy,
        }
    }
}

/// Write access to a container.
///
/// Every operation fails with [`FixtureError::ClosedContainer`] after
/// [`ContainerWrite::close`].
pub trait ContainerWrite {
    /// Create a tree.
    fn create_tree(&mut self, name: &str, title: &str) -> Result<TreeId>;
    /// Add a branch to a tree.
    fn add_branch(&mut self, tree: TreeId, desc: &BranchDescriptor) -> Result<BranchId>;
    /// Write the cell of one branch at one event, in event order.
    fn write_row(&mut self, branch: BranchId, event: u64, values: &CellValues) -> Result<()>;
    /// Create a histogram shell.
    fn create_hist(&mut self, desc: &HistDescriptor) -> Result<HistId>;
    /// Set one cell of the bin-content array (flow slots included).
    fn set_bin_content(&mut self, hist: HistId, index: usize, value: f64) -> Result<()>;
    /// Set one cell of the sum-of-squared-weights array.
    fn set_sumw2(&mut self, hist: HistId, index: usize, value: f64) -> Result<()>;
    /// Record whether the stat accumulator included flow fills.
    fn set_stat_overflows(&mut self, hist: HistId, enabled: bool) -> Result<()>;
    /// Set the stat accumulator snapshot.
    fn set_stats(&mut self, hist: HistId, stats: &StatSnapshot) -> Result<()>;
    /// Flush and finalize.
    fn close(&mut self) -> Result<()>;
}

/// One recorded branch: descriptor, leaflist encoding, per-event cells.
#[derive(Debug, Clone, Serialize)]
pub struct BranchDoc {
    /// The declared branch.
    pub descriptor: BranchDescriptor,
    /// Encoded shape grammar, e.g. `SliF64[N]/D`.
    pub leaflist: String,
    /// One cell per event.
    pub rows: Vec<CellValues>,
}

/// One recorded tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeDoc {
    /// Tree name.
    pub name: String,
    /// Tree title.
    pub title: String,
    /// Branches in declaration order.
    pub branches: Vec<BranchDoc>,
}

/// One recorded histogram.
#[derive(Debug, Clone, Serialize)]
pub struct HistDoc {
    /// Shape of the histogram.
    pub descriptor: HistDescriptor,
    /// Whether flow fills were counted in the stats.
    pub stat_overflows: bool,
    /// Cell contents including flow slots.
    pub contents: Vec<f64>,
    /// Sum of squared weights per cell.
    pub sumw2: Vec<f64>,
    /// Stat accumulator snapshot.
    pub stats: StatSnapshot,
}

/// Everything written to a container, in write order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileDoc {
    /// File-level title.
    pub title: String,
    /// Compression flag from the open options.
    pub compressed: bool,
    /// Recorded trees.
    pub trees: Vec<TreeDoc>,
    /// Recorded histograms.
    pub hists: Vec<HistDoc>,
    /// Branch-id table: id -> (tree index, branch index).
    #[serde(skip)]
    branch_ids: Vec<(usize, usize)>,
}

impl FileDoc {
    fn create_tree(&mut self, name: &str, title: &str) -> Result<TreeId> {
        if self.trees.iter().any(|t| t.name == name) {
            return Err(FixtureError::Serialization(format!(
                "tree '{name}' already exists"
            )));
        }
        self.trees.push(TreeDoc {
            name: name.to_string(),
            title: title.to_string(),
            branches: Vec::new(),
        });
        Ok(TreeId(self.trees.len() - 1))
    }

    fn add_branch(&mut self, tree: TreeId, desc: &BranchDescriptor) -> Result<BranchId> {
        let t = self
            .trees
            .get_mut(tree.0)
            .ok_or_else(|| FixtureError::Serialization(format!("no such tree id: {}", tree.0)))?;
        t.branches.push(BranchDoc {
            descriptor: desc.clone(),
            leaflist: desc.leaflist(),
            rows: Vec::new(),
        });
        // Branch ids are global so write_row needs no tree handle.
        self.branch_ids.push((tree.0, t.branches.len() - 1));
        Ok(BranchId(self.branch_ids.len() - 1))
    }

    fn branch_mut(&mut self, branch: BranchId) -> Result<&mut BranchDoc> {
        let (t, b) = *self.branch_ids.get(branch.0).ok_or_else(|| {
            FixtureError::Serialization(format!("no such branch id: {}", branch.0))
        })?;
        Ok(&mut self.trees[t].branches[b])
    }

    fn write_row(&mut self, branch: BranchId, event: u64, values: &CellValues) -> Result<()> {
        let b = self.branch_mut(branch)?;
        if event != b.rows.len() as u64 {
            return Err(FixtureError::Serialization(format!(
                "out-of-order row for branch '{}': got event {event}, expected {}",
                b.descriptor.name,
                b.rows.len()
            )));
        }
        b.rows.push(values.clone());
        Ok(())
    }

    fn create_hist(&mut self, desc: &HistDescriptor) -> Result<HistId> {
        if self.hists.iter().any(|h| h.descriptor.name == desc.name) {
            return Err(FixtureError::Serialization(format!(
                "histogram '{}' already exists",
                desc.name
            )));
        }
        let cells = desc.n_cells();
        self.hists.push(HistDoc {
            descriptor: desc.clone(),
            stat_overflows: false,
            contents: vec![0.0; cells],
            sumw2: vec![0.0; cells],
            stats: StatSnapshot::default(),
        });
        Ok(HistId(self.hists.len() - 1))
    }

    fn hist_mut(&mut self, hist: HistId) -> Result<&mut HistDoc> {
        self.hists
            .get_mut(hist.0)
            .ok_or_else(|| FixtureError::Serialization(format!("no such histogram id: {}", hist.0)))
    }

    fn hist_cell(&mut self, hist: HistId, index: usize) -> Result<&mut HistDoc> {
        let h = self.hist_mut(hist)?;
        if index >= h.contents.len() {
            return Err(FixtureError::Serialization(format!(
                "cell index {index} out of range for histogram '{}' ({} cells)",
                h.descriptor.name,
                h.contents.len()
            )));
        }
        Ok(h)
    }
}

/// In-memory container backend.
///
/// Records every call so tests can read the written state back; the
/// recorded document serializes deterministically via serde.
#[derive(Debug, Default)]
pub struct MemoryContainer {
    doc: FileDoc,
    closed: bool,
}

impl MemoryContainer {
    /// New container with the given open options.
    pub fn new(options: WriteOptions) -> Self {
        MemoryContainer {
            doc: FileDoc {
                title: options.title,
                compressed: options.compressed,
                ..Default::default()
            },
            closed: false,
        }
    }

    /// The recorded document.
    pub fn doc(&self) -> &FileDoc {
        &self.doc
    }

    /// Find a recorded tree by name.
    pub fn tree(&self, name: &str) -> Option<&TreeDoc> {
        self.doc.trees.iter().find(|t| t.name == name)
    }

    /// Find a recorded histogram by name.
    pub fn hist(&self, name: &str) -> Option<&HistDoc> {
        self.doc.hists.iter().find(|h| h.descriptor.name == name)
    }

    /// Canonical JSON rendition of the recorded document.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.doc)
            .map_err(|e| FixtureError::Serialization(e.to_string()))
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(FixtureError::ClosedContainer);
        }
        Ok(())
    }
}

impl ContainerWrite for MemoryContainer {
    fn create_tree(&mut self, name: &str, title: &str) -> Result<TreeId> {
        self.check_open()?;
        self.doc.create_tree(name, title)
    }

    fn add_branch(&mut self, tree: TreeId, desc: &BranchDescriptor) -> Result<BranchId> {
        self.check_open()?;
        self.doc.add_branch(tree, desc)
    }

    fn write_row(&mut self, branch: BranchId, event: u64, values: &CellValues) -> Result<()> {
        self.check_open()?;
        self.doc.write_row(branch, event, values)
    }

    fn create_hist(&mut self, desc: &HistDescriptor) -> Result<HistId> {
        self.check_open()?;
        self.doc.create_hist(desc)
    }

    fn set_bin_content(&mut self, hist: HistId, index: usize, value: f64) -> Result<()> {
        self.check_open()?;
        let h = self.doc.hist_cell(hist, index)?;
        h.contents[index] = value;
        Ok(())
    }

    fn set_sumw2(&mut self, hist: HistId, index: usize, value: f64) -> Result<()> {
        self.check_open()?;
        let h = self.doc.hist_cell(hist, index)?;
        h.sumw2[index] = value;
        Ok(())
    }

    fn set_stat_overflows(&mut self, hist: HistId, enabled: bool) -> Result<()> {
        self.check_open()?;
        self.doc.hist_mut(hist)?.stat_overflows = enabled;
        Ok(())
    }

    fn set_stats(&mut self, hist: HistId, stats: &StatSnapshot) -> Result<()> {
        self.check_open()?;
        self.doc.hist_mut(hist)?.stats = *stats;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BranchShape, LeafType};

    fn desc(name: &str) -> BranchDescriptor {
        BranchDescriptor {
            name: name.to_string(),
            leaf: LeafType::F64,
            shape: BranchShape::Scalar,
        }
    }

    #[test]
    fn closed_container_rejects_writes() {
        let mut c = MemoryContainer::new(WriteOptions::default());
        let t = c.create_tree("t", "").unwrap();
        c.close().unwrap();
        let err = c.add_branch(t, &desc("x")).unwrap_err();
        assert!(matches!(err, FixtureError::ClosedContainer));
        let err = c.close().unwrap_err();
        assert!(matches!(err, FixtureError::ClosedContainer));
    }

    #[test]
    fn rows_must_arrive_in_event_order() {
        let mut c = MemoryContainer::new(WriteOptions::default());
        let t = c.create_tree("t", "").unwrap();
        let b = c.add_branch(t, &desc("x")).unwrap();
        c.write_row(b, 0, &CellValues::from(1.0f64)).unwrap();
        let err = c.write_row(b, 2, &CellValues::from(2.0f64)).unwrap_err();
        assert!(matches!(err, FixtureError::Serialization(_)));
    }

    #[test]
    fn duplicate_tree_name_rejected() {
        let mut c = MemoryContainer::new(WriteOptions::default());
        c.create_tree("t", "").unwrap();
        assert!(c.create_tree("t", "again").is_err());
    }

    #[test]
    fn hist_cells_sized_with_flow_slots() {
        let mut c = MemoryContainer::new(WriteOptions::default());
        let h = c
            .create_hist(&HistDescriptor {
                name: "h".to_string(),
                title: String::new(),
                x_edges: vec![0.0, 1.0, 2.0, 3.0],
                y_edges: None,
            })
            .unwrap();
        assert_eq!(c.hist("h").unwrap().contents.len(), 5);
        assert!(c.set_bin_content(h, 4, 1.0).is_ok());
        assert!(c.set_bin_content(h, 5, 1.0).is_err());
    }
}
