//! Branch schema declaration for fixture trees.

use serde::Serialize;

use crate::error::{FixtureError, Result};

/// Leaf data type of a branch (maps to the container's leaf type codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeafType {
    /// 32-bit signed integer (`I`).
    I32,
    /// 64-bit signed integer (`L`).
    I64,
    /// 32-bit unsigned integer (`i`).
    U32,
    /// 64-bit unsigned integer (`l`).
    U64,
    /// 32-bit float (`F`).
    F32,
    /// 64-bit float (`D`).
    F64,
    /// Fixed-size character string (`C`).
    Str,
}

impl LeafType {
    /// Single-character type code used in the leaflist encoding.
    pub fn type_code(self) -> char {
        match self {
            LeafType::I32 => 'I',
            LeafType::I64 => 'L',
            LeafType::U32 => 'i',
            LeafType::U64 => 'l',
            LeafType::F32 => 'F',
            LeafType::F64 => 'D',
            LeafType::Str => 'C',
        }
    }

    /// Whether this type can serve as a counter for variable-length
    /// branches.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            LeafType::I32 | LeafType::I64 | LeafType::U32 | LeafType::U64
        )
    }

    /// Human-readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            LeafType::I32 => "i32",
            LeafType::I64 => "i64",
            LeafType::U32 => "u32",
            LeafType::U64 => "u64",
            LeafType::F32 => "f32",
            LeafType::F64 => "f64",
            LeafType::Str => "str",
        }
    }
}

/// Shape of a branch: one value, N values, or counter-driven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BranchShape {
    /// One value per event.
    Scalar,
    /// Exactly N values per event, N fixed at declare time.
    Fixed(usize),
    /// As many values per event as the named counter branch holds.
    Var(String),
}

/// A single declared branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchDescriptor {
    /// Branch name, unique within the tree.
    pub name: String,
    /// Element type.
    pub leaf: LeafType,
    /// Scalar, fixed array, or variable array.
    pub shape: BranchShape,
}

impl BranchDescriptor {
    /// Leaflist encoding understood by the container:
    /// `Name/I`, `Name[10]/I`, `Name[Counter]/I`.
    pub fn leaflist(&self) -> String {
        let code = self.leaf.type_code();
        match &self.shape {
            BranchShape::Scalar => format!("{}/{}", self.name, code),
            BranchShape::Fixed(n) => format!("{}[{}]/{}", self.name, n, code),
            BranchShape::Var(counter) => format!("{}[{}]/{}", self.name, counter, code),
        }
    }
}

/// Ordered, immutable branch schema of one tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSchema {
    branches: Vec<BranchDescriptor>,
}

impl TreeSchema {
    /// All branches, in declaration order.
    pub fn branches(&self) -> &[BranchDescriptor] {
        &self.branches
    }

    /// Number of declared branches.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// True if no branches were declared.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Index of a branch by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.branches.iter().position(|b| b.name == name)
    }

    /// Descriptor of a branch by name.
    pub fn branch(&self, name: &str) -> Option<&BranchDescriptor> {
        self.branches.iter().find(|b| b.name == name)
    }
}

/// Declares the ordered branch set of a tree.
///
/// Consuming the builder with [`SchemaBuilder::finish`] yields an
/// immutable [`TreeSchema`], so the schema is frozen before any event
/// can be committed.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    branches: Vec<BranchDescriptor>,
}

impl SchemaBuilder {
    /// New, empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a scalar branch.
    pub fn scalar(&mut self, name: &str, leaf: LeafType) -> Result<&mut Self> {
        self.check_name(name)?;
        self.branches.push(BranchDescriptor {
            name: name.to_string(),
            leaf,
            shape: BranchShape::Scalar,
        });
        Ok(self)
    }

    /// Declare a fixed-length array branch of `len` elements per event.
    pub fn fixed_array(&mut self, name: &str, leaf: LeafType, len: usize) -> Result<&mut Self> {
        self.check_name(name)?;
        if len == 0 {
            return Err(FixtureError::InvalidShape {
                branch: name.to_string(),
                reason: "fixed array length must be > 0".to_string(),
            });
        }
        self.branches.push(BranchDescriptor {
            name: name.to_string(),
            leaf,
            shape: BranchShape::Fixed(len),
        });
        Ok(self)
    }

    /// Declare a variable-length array branch whose per-event element
    /// count is the value of `counter`, a previously declared integer
    /// scalar branch.
    pub fn var_array(&mut self, name: &str, leaf: LeafType, counter: &str) -> Result<&mut Self> {
        self.check_name(name)?;
        let ok = self
            .branches
            .iter()
            .any(|b| b.name == counter && b.shape == BranchShape::Scalar && b.leaf.is_integer());
        if !ok {
            return Err(FixtureError::UnknownCounter {
                branch: name.to_string(),
                counter: counter.to_string(),
            });
        }
        self.branches.push(BranchDescriptor {
            name: name.to_string(),
            leaf,
            shape: BranchShape::Var(counter.to_string()),
        });
        Ok(self)
    }

    /// Freeze the schema.
    pub fn finish(self) -> TreeSchema {
        TreeSchema {
            branches: self.branches,
        }
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if self.branches.iter().any(|b| b.name == name) {
            return Err(FixtureError::DuplicateBranch(name.to_string()));
        }
        Ok(())
    }
}
