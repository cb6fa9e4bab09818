//! JSON file backend for the container seam.
//!
//! Buffers everything in memory and writes the document on `close()`
//! to `<path>.tmp`, renaming into place only on success. A run that
//! errors out or never closes leaves no partial output file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::column::CellValues;
use crate::container::{
    BranchId, ContainerWrite, FileDoc, HistDescriptor, HistId, MemoryContainer, StatSnapshot,
    TreeId, WriteOptions,
};
use crate::error::Result;
use crate::schema::BranchDescriptor;

/// Container backend that serializes to a JSON file.
#[derive(Debug)]
pub struct JsonContainer {
    inner: MemoryContainer,
    path: PathBuf,
    tmp: PathBuf,
    finished: bool,
}

impl JsonContainer {
    /// Open `path` for writing.
    ///
    /// The temp file is created immediately so an unwritable path
    /// fails here, not at close time.
    pub fn create(path: impl AsRef<Path>, options: WriteOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tmp = tmp_path(&path);
        fs::File::create(&tmp)?;
        Ok(JsonContainer {
            inner: MemoryContainer::new(options),
            path,
            tmp,
            finished: false,
        })
    }

    /// The destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The buffered document, for inspection.
    pub fn doc(&self) -> &FileDoc {
        self.inner.doc()
    }

    fn flush_to_disk(&mut self) -> Result<()> {
        let json = self.inner.to_json()?;
        let res = (|| -> Result<()> {
            let mut f = fs::File::create(&self.tmp)?;
            f.write_all(json.as_bytes())?;
            f.write_all(b"\n")?;
            f.sync_all()?;
            fs::rename(&self.tmp, &self.path)?;
            Ok(())
        })();
        if res.is_err() {
            let _ = fs::remove_file(&self.tmp);
        }
        res
    }
}

impl Drop for JsonContainer {
    fn drop(&mut self) {
        if !self.finished {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl ContainerWrite for JsonContainer {
    fn create_tree(&mut self, name: &str, title: &str) -> Result<TreeId> {
        self.inner.create_tree(name, title)
    }

    fn add_branch(&mut self, tree: TreeId, desc: &BranchDescriptor) -> Result<BranchId> {
        self.inner.add_branch(tree, desc)
    }

    fn write_row(&mut self, branch: BranchId, event: u64, values: &CellValues) -> Result<()> {
        self.inner.write_row(branch, event, values)
    }

    fn create_hist(&mut self, desc: &HistDescriptor) -> Result<HistId> {
        self.inner.create_hist(desc)
    }

    fn set_bin_content(&mut self, hist: HistId, index: usize, value: f64) -> Result<()> {
        self.inner.set_bin_content(hist, index, value)
    }

    fn set_sumw2(&mut self, hist: HistId, index: usize, value: f64) -> Result<()> {
        self.inner.set_sumw2(hist, index, value)
    }

    fn set_stat_overflows(&mut self, hist: HistId, enabled: bool) -> Result<()> {
        self.inner.set_stat_overflows(hist, enabled)
    }

    fn set_stats(&mut self, hist: HistId, stats: &StatSnapshot) -> Result<()> {
        self.inner.set_stats(hist, stats)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()?;
        self.flush_to_disk()?;
        self.finished = true;
        tracing::debug!(path = %self.path.display(), "container written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FixtureError;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("rootgen-json-tests");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn close_renames_temp_into_place() {
        let path = scratch("ok.json");
        let _ = fs::remove_file(&path);

        let mut c = JsonContainer::create(&path, WriteOptions::default()).unwrap();
        c.create_tree("t", "").unwrap();
        c.close().unwrap();

        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"trees\""));
    }

    #[test]
    fn abandoned_container_leaves_no_file() {
        let path = scratch("abandoned.json");
        let _ = fs::remove_file(&path);

        {
            let mut c = JsonContainer::create(&path, WriteOptions::default()).unwrap();
            c.create_tree("t", "").unwrap();
            // dropped without close(): fatal-error path
        }
        assert!(!path.exists());
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn unwritable_path_fails_at_create() {
        let err = JsonContainer::create("/no/such/dir/out.json", WriteOptions::default())
            .unwrap_err();
        assert!(matches!(err, FixtureError::Io(_)));
    }
}
