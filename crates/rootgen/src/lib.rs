//! # rootgen
//!
//! Deterministic test-fixture generator for a columnar scientific-data
//! container: typed trees with scalar, fixed-array, and counter-driven
//! variable-array branches, plus weighted 1-D/2-D histograms with
//! under/overflow accounting and second-moment tracking.
//!
//! The container itself is external; the core writes committed trees
//! and finalized histograms through the [`ContainerWrite`] seam so a
//! separately tested reader can be validated against known inputs.
//!
//! ## Example
//!
//! ```
//! use rootgen::{
//!     EventWriter, Hist1D, LeafType, MemoryContainer, SchemaBuilder, Session, WriteOptions,
//! };
//!
//! let mut schema = SchemaBuilder::new();
//! schema.scalar("I32", LeafType::I32).unwrap();
//! let mut writer = EventWriter::new("tree", "demo tree", schema.finish());
//! for i in 0..100i32 {
//!     writer.stage("I32", i).unwrap();
//!     writer.commit().unwrap();
//! }
//!
//! let mut h = Hist1D::fixed("h1", 3, 0.0, 3.0).unwrap();
//! h.fill(0.5, 1.0).unwrap();
//!
//! let mut session = Session::new();
//! session.record_tree(writer.finish());
//! session.record_h1(h);
//!
//! let mut out = MemoryContainer::new(WriteOptions::default());
//! session.write_to(&mut out).unwrap();
//! assert_eq!(out.tree("tree").unwrap().branches[0].leaflist, "I32/I");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axis;
pub mod column;
pub mod container;
pub mod error;
pub mod fills;
pub mod histogram;
pub mod json;
pub mod schema;
pub mod session;
pub mod stats;
pub mod tree;

pub use axis::{Axis, BinIndex};
pub use column::CellValues;
pub use container::{
    BranchId, ContainerWrite, FileDoc, HistDescriptor, HistId, MemoryContainer, StatSnapshot,
    TreeId, WriteOptions,
};
pub use error::{FixtureError, Result};
pub use fills::{read_fills_1d, read_fills_2d};
pub use histogram::{Hist1D, Hist2D, HistState};
pub use json::JsonContainer;
pub use schema::{BranchDescriptor, BranchShape, LeafType, SchemaBuilder, TreeSchema};
pub use session::Session;
pub use stats::{Stats1D, Stats2D};
pub use tree::{EventWriter, Tree};
