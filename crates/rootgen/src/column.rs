//! Typed column cells.
//!
//! A [`CellValues`] is the staged or committed payload of one branch
//! for one event: a typed buffer discriminated by leaf type, never a
//! type-code string.

use serde::Serialize;

use crate::schema::LeafType;

/// The values of one branch for one event.
///
/// Scalars are a buffer of length one; fixed and variable arrays carry
/// their full element list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValues {
    /// 32-bit signed integers.
    I32(Vec<i32>),
    /// 64-bit signed integers.
    I64(Vec<i64>),
    /// 32-bit unsigned integers.
    U32(Vec<u32>),
    /// 64-bit unsigned integers.
    U64(Vec<u64>),
    /// 32-bit floats.
    F32(Vec<f32>),
    /// 64-bit floats.
    F64(Vec<f64>),
    /// Strings.
    Str(Vec<String>),
}

impl CellValues {
    /// Number of elements in the cell.
    pub fn len(&self) -> usize {
        match self {
            CellValues::I32(v) => v.len(),
            CellValues::I64(v) => v.len(),
            CellValues::U32(v) => v.len(),
            CellValues::U64(v) => v.len(),
            CellValues::F32(v) => v.len(),
            CellValues::F64(v) => v.len(),
            CellValues::Str(v) => v.len(),
        }
    }

    /// True if the cell holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leaf type of the buffer.
    pub fn leaf_type(&self) -> LeafType {
        match self {
            CellValues::I32(_) => LeafType::I32,
            CellValues::I64(_) => LeafType::I64,
            CellValues::U32(_) => LeafType::U32,
            CellValues::U64(_) => LeafType::U64,
            CellValues::F32(_) => LeafType::F32,
            CellValues::F64(_) => LeafType::F64,
            CellValues::Str(_) => LeafType::Str,
        }
    }

    /// The cell interpreted as a counter value.
    ///
    /// Returns `None` unless the cell is a single integer element.
    /// Negative values are reported as `Some(Err(value))` so the caller
    /// can surface the offending number.
    pub fn as_counter(&self) -> Option<std::result::Result<usize, i64>> {
        let signed = |v: i64| {
            if v < 0 {
                Err(v)
            } else {
                Ok(v as usize)
            }
        };
        match self {
            CellValues::I32(v) if v.len() == 1 => Some(signed(i64::from(v[0]))),
            CellValues::I64(v) if v.len() == 1 => Some(signed(v[0])),
            CellValues::U32(v) if v.len() == 1 => Some(Ok(v[0] as usize)),
            CellValues::U64(v) if v.len() == 1 => Some(Ok(v[0] as usize)),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $var:ident),* $(,)?) => {
        $(
            impl From<$ty> for CellValues {
                fn from(v: $ty) -> Self {
                    CellValues::$var(vec![v])
                }
            }
            impl From<Vec<$ty>> for CellValues {
                fn from(v: Vec<$ty>) -> Self {
                    CellValues::$var(v)
                }
            }
            impl From<&[$ty]> for CellValues {
                fn from(v: &[$ty]) -> Self {
                    CellValues::$var(v.to_vec())
                }
            }
        )*
    };
}

impl_from!(
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Str,
);

impl From<&str> for CellValues {
    fn from(v: &str) -> Self {
        CellValues::Str(vec![v.to_string()])
    }
}
