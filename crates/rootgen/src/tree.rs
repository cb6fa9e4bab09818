//! Event staging and row-by-row tree construction.

use crate::column::CellValues;
use crate::error::{FixtureError, Result};
use crate::schema::{BranchShape, TreeSchema};

/// A committed tree: frozen schema plus per-branch columns.
///
/// Rows are immutable once committed; the event index is implicit and
/// starts at 0.
#[derive(Debug, Clone)]
pub struct Tree {
    name: String,
    title: String,
    schema: TreeSchema,
    /// columns[branch][event], branch order matching the schema.
    columns: Vec<Vec<CellValues>>,
    entries: u64,
}

impl Tree {
    /// Tree name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tree title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The frozen branch schema.
    pub fn schema(&self) -> &TreeSchema {
        &self.schema
    }

    /// Number of committed events.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// All committed cells of one branch, in event order.
    pub fn column(&self, name: &str) -> Option<&[CellValues]> {
        let idx = self.schema.index_of(name)?;
        Some(&self.columns[idx])
    }

    /// The cell of one branch at one event.
    pub fn cell(&self, name: &str, event: u64) -> Option<&CellValues> {
        self.column(name)?.get(event as usize)
    }
}

/// Accumulates per-event values and commits complete rows in order.
///
/// Commit is atomic: the row is validated against every declared
/// branch before anything is appended, so a failed commit leaves the
/// tree exactly as it was.
#[derive(Debug)]
pub struct EventWriter {
    tree: Tree,
    staged: Vec<Option<CellValues>>,
}

impl EventWriter {
    /// New writer over a frozen schema.
    pub fn new(name: &str, title: &str, schema: TreeSchema) -> Self {
        let n = schema.len();
        EventWriter {
            tree: Tree {
                name: name.to_string(),
                title: title.to_string(),
                schema,
                columns: vec![Vec::new(); n],
                entries: 0,
            },
            staged: vec![None; n],
        }
    }

    /// Stage the value(s) of one branch for the current row.
    ///
    /// The cell is checked against the declared leaf type and shape.
    /// For a variable-length branch the element count is checked
    /// against the counter as soon as the counter is staged; commit
    /// re-checks in case the counter is staged later.
    pub fn stage(&mut self, name: &str, values: impl Into<CellValues>) -> Result<()> {
        let values = values.into();
        let idx = self
            .tree
            .schema
            .index_of(name)
            .ok_or_else(|| FixtureError::BranchNotFound(name.to_string()))?;
        let desc = &self.tree.schema.branches()[idx];

        if values.leaf_type() != desc.leaf {
            return Err(FixtureError::TypeMismatch {
                branch: name.to_string(),
                expected: desc.leaf.name(),
                actual: values.leaf_type().name(),
            });
        }

        match &desc.shape {
            BranchShape::Scalar => {
                if values.len() != 1 {
                    return Err(FixtureError::LengthMismatch {
                        branch: name.to_string(),
                        expected: 1,
                        actual: values.len(),
                    });
                }
            }
            BranchShape::Fixed(n) => {
                if values.len() != *n {
                    return Err(FixtureError::LengthMismatch {
                        branch: name.to_string(),
                        expected: *n,
                        actual: values.len(),
                    });
                }
            }
            BranchShape::Var(counter) => {
                if let Some(expected) = self.staged_counter(counter)? {
                    if values.len() != expected {
                        return Err(FixtureError::LengthMismatch {
                            branch: name.to_string(),
                            expected,
                            actual: values.len(),
                        });
                    }
                }
            }
        }

        self.staged[idx] = Some(values);
        Ok(())
    }

    /// Validate and append the staged row, returning its event index.
    ///
    /// Fails if any declared branch is unstaged or a variable-length
    /// cell disagrees with its counter; on failure nothing is appended
    /// and the staged values stay in place for correction.
    pub fn commit(&mut self) -> Result<u64> {
        for (idx, desc) in self.tree.schema.branches().iter().enumerate() {
            let cell = self.staged[idx]
                .as_ref()
                .ok_or_else(|| FixtureError::IncompleteRow(desc.name.clone()))?;

            if let BranchShape::Var(counter) = &desc.shape {
                // The counter precedes this branch in schema order, so
                // its presence was already validated above.
                let expected = self
                    .staged_counter(counter)?
                    .ok_or_else(|| FixtureError::IncompleteRow(counter.clone()))?;
                if cell.len() != expected {
                    return Err(FixtureError::LengthMismatch {
                        branch: desc.name.clone(),
                        expected,
                        actual: cell.len(),
                    });
                }
            }
        }

        for (idx, slot) in self.staged.iter_mut().enumerate() {
            let cell = slot.take().expect("validated above");
            self.tree.columns[idx].push(cell);
        }
        let event = self.tree.entries;
        self.tree.entries += 1;
        Ok(event)
    }

    /// Finish writing and yield the immutable tree.
    pub fn finish(self) -> Tree {
        self.tree
    }

    /// Staged value of a counter branch, if staged yet.
    fn staged_counter(&self, counter: &str) -> Result<Option<usize>> {
        let idx = self
            .tree
            .schema
            .index_of(counter)
            .ok_or_else(|| FixtureError::BranchNotFound(counter.to_string()))?;
        match &self.staged[idx] {
            None => Ok(None),
            Some(cell) => match cell.as_counter() {
                Some(Ok(n)) => Ok(Some(n)),
                Some(Err(v)) => Err(FixtureError::NegativeCounter {
                    branch: counter.to_string(),
                    value: v,
                }),
                None => Err(FixtureError::TypeMismatch {
                    branch: counter.to_string(),
                    expected: "integer scalar",
                    actual: cell.leaf_type().name(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LeafType, SchemaBuilder};

    fn schema() -> TreeSchema {
        let mut b = SchemaBuilder::new();
        b.scalar("N", LeafType::I32).unwrap();
        b.var_array("Sli", LeafType::F64, "N").unwrap();
        b.finish()
    }

    #[test]
    fn stage_unknown_branch() {
        let mut w = EventWriter::new("tree", "", schema());
        let err = w.stage("nope", 1i32).unwrap_err();
        assert!(matches!(err, FixtureError::BranchNotFound(_)));
    }

    #[test]
    fn stage_type_mismatch() {
        let mut w = EventWriter::new("tree", "", schema());
        let err = w.stage("N", 1.0f64).unwrap_err();
        assert!(matches!(err, FixtureError::TypeMismatch { .. }));
    }

    #[test]
    fn var_length_checked_against_staged_counter() {
        let mut w = EventWriter::new("tree", "", schema());
        w.stage("N", 2i32).unwrap();
        let err = w.stage("Sli", vec![1.0f64]).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn var_length_checked_when_counter_staged_last() {
        let mut w = EventWriter::new("tree", "", schema());
        w.stage("Sli", vec![1.0f64, 2.0]).unwrap();
        w.stage("N", 3i32).unwrap();
        let err = w.commit().unwrap_err();
        assert!(matches!(err, FixtureError::LengthMismatch { .. }));
        assert_eq!(w.tree.entries, 0);
    }

    #[test]
    fn negative_counter_rejected() {
        let mut w = EventWriter::new("tree", "", schema());
        w.stage("N", -1i32).unwrap();
        let err = w.stage("Sli", Vec::<f64>::new()).unwrap_err();
        assert!(matches!(err, FixtureError::NegativeCounter { .. }));
    }

    #[test]
    fn commit_requires_all_branches() {
        let mut w = EventWriter::new("tree", "", schema());
        w.stage("N", 0i32).unwrap();
        let err = w.commit().unwrap_err();
        assert!(matches!(err, FixtureError::IncompleteRow(name) if name == "Sli"));
    }
}
