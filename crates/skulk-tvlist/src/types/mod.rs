//! Value types supported by time-value lists.
//!
//! Each submodule specializes [`TvList`](crate::tvlist::TvList) for one
//! primitive type: it binds the element type to its pool free list and adds
//! the typed `put_*`/`get_*` accessors used by the write and read paths.

pub mod binary;
pub mod boolean;
pub mod double;
pub mod float;
pub mod int;
pub mod long;

use crate::pool::{ArrayKind, FreeList, PrimitiveArrayPool};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

pub use binary::BinaryTvList;
pub use boolean::BooleanTvList;
pub use double::DoubleTvList;
pub use float::FloatTvList;
pub use int::IntTvList;
pub use long::LongTvList;

/// Data type of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `bool` values.
    Boolean,
    /// `i32` values.
    Int32,
    /// `i64` values.
    Int64,
    /// `f32` values.
    Float,
    /// `f64` values.
    Double,
    /// Immutable byte strings.
    Text,
}

impl DataType {
    /// Returns the pool array kind that stores values of this type.
    pub fn array_kind(&self) -> ArrayKind {
        match self {
            DataType::Boolean => ArrayKind::Boolean,
            DataType::Int32 => ArrayKind::Int32,
            DataType::Int64 => ArrayKind::Int64,
            DataType::Float => ArrayKind::Float,
            DataType::Double => ArrayKind::Double,
            DataType::Text => ArrayKind::Text,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Text => "TEXT",
        };
        f.write_str(name)
    }
}

/// A dynamically typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),
    /// A 32-bit integer value.
    Int32(i32),
    /// A 64-bit integer value.
    Int64(i64),
    /// A 32-bit float value.
    Float(f32),
    /// A 64-bit float value.
    Double(f64),
    /// A text/binary value.
    Text(Bytes),
}

impl Value {
    /// Returns the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Boolean(_) => DataType::Boolean,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Text(_) => DataType::Text,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// Element type that can be stored in pooled value chunks.
///
/// This is the whole capability a value store needs: where its arrays come
/// from, how wide an element is, and how to scrub an array before it goes
/// back to the pool. Reads, writes and clones go through `Clone` and slice
/// indexing. The trait is sealed; the implementations live in the submodules
/// of this module.
pub trait Primitive: Sealed + Clone + Default + Send + Sync + 'static {
    /// Data type stored by chunks of this element.
    const DATA_TYPE: DataType;

    /// Size in bytes of one element slot, used for memory estimates.
    const WIDTH: usize;

    /// Returns the pool's free list for this element type.
    #[doc(hidden)]
    fn free_list(pool: &PrimitiveArrayPool) -> &Arc<FreeList<Self>>;

    /// Prepares an array for reuse before it is returned to the pool.
    fn recycle(_chunk: &mut [Self]) {}

    /// Wraps an element in a dynamically typed [`Value`].
    fn into_value(self) -> Value;
}
