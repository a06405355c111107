//! Runtime-typed column buffer.
//!
//! The write path often learns a column's type from a schema at runtime.
//! [`ColumnBuffer`] wraps one [`TvList`] per supported type and checks the
//! type of every typed access, returning `TvListError::TypeMismatch` instead
//! of reinterpreting values.

use crate::error::{Result, TvListError};
use crate::pool::PrimitiveArrayPool;
use crate::tvlist::TvList;
use crate::types::{DataType, Primitive, Value};
use bytes::Bytes;

/// A time-value list whose value type is chosen at runtime.
#[derive(Debug)]
pub enum ColumnBuffer {
    /// Boolean column.
    Boolean(TvList<bool>),
    /// 32-bit integer column.
    Int32(TvList<i32>),
    /// 64-bit integer column.
    Int64(TvList<i64>),
    /// 32-bit float column.
    Float(TvList<f32>),
    /// 64-bit float column.
    Double(TvList<f64>),
    /// Text/binary column.
    Text(TvList<Bytes>),
}

macro_rules! dispatch {
    ($self:expr, $list:ident => $body:expr) => {
        match $self {
            ColumnBuffer::Boolean($list) => $body,
            ColumnBuffer::Int32($list) => $body,
            ColumnBuffer::Int64($list) => $body,
            ColumnBuffer::Float($list) => $body,
            ColumnBuffer::Double($list) => $body,
            ColumnBuffer::Text($list) => $body,
        }
    };
}

macro_rules! typed_access {
    ($put:ident, $get:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Appends a point to a `", stringify!($variant), "` column.")]
        ///
        /// # Errors
        ///
        /// Returns `TvListError::TypeMismatch` for any other column type, or a
        /// pool error if a chunk cannot be acquired.
        pub fn $put(&mut self, timestamp: i64, value: $ty) -> Result<()> {
            match self {
                ColumnBuffer::$variant(list) => list.put(timestamp, value),
                other => Err(other.mismatch(DataType::$variant)),
            }
        }

        #[doc = concat!("Reads the value at `index` of a `", stringify!($variant), "` column.")]
        ///
        /// # Errors
        ///
        /// Returns `TvListError::TypeMismatch` for any other column type, or
        /// `TvListError::IndexOutOfRange` if `index >= size()`.
        pub fn $get(&self, index: usize) -> Result<$ty> {
            match self {
                ColumnBuffer::$variant(list) => list.get(index),
                other => Err(other.mismatch(DataType::$variant)),
            }
        }
    };
}

impl ColumnBuffer {
    /// Creates an empty buffer for `data_type` backed by `pool`.
    pub fn new(data_type: DataType, pool: &PrimitiveArrayPool) -> Self {
        match data_type {
            DataType::Boolean => ColumnBuffer::Boolean(TvList::with_pool(pool)),
            DataType::Int32 => ColumnBuffer::Int32(TvList::with_pool(pool)),
            DataType::Int64 => ColumnBuffer::Int64(TvList::with_pool(pool)),
            DataType::Float => ColumnBuffer::Float(TvList::with_pool(pool)),
            DataType::Double => ColumnBuffer::Double(TvList::with_pool(pool)),
            DataType::Text => ColumnBuffer::Text(TvList::with_pool(pool)),
        }
    }

    /// Returns the data type of the column.
    pub fn data_type(&self) -> DataType {
        dispatch!(self, list => list.data_type())
    }

    fn mismatch(&self, expected: DataType) -> TvListError {
        TvListError::TypeMismatch {
            expected,
            actual: self.data_type(),
        }
    }

    /// Returns the number of entries.
    pub fn size(&self) -> usize {
        dispatch!(self, list => list.size())
    }

    /// Returns true if the column holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the smallest timestamp inserted, or `i64::MAX` if empty.
    pub fn min_time(&self) -> i64 {
        dispatch!(self, list => list.min_time())
    }

    /// Returns true if timestamps are known to be non-decreasing.
    pub fn is_sorted(&self) -> bool {
        dispatch!(self, list => list.is_sorted())
    }

    /// Returns the timestamp at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_time(&self, index: usize) -> Result<i64> {
        dispatch!(self, list => list.get_time(index))
    }

    typed_access!(put_bool, get_bool, Boolean, bool);
    typed_access!(put_int, get_int, Int32, i32);
    typed_access!(put_long, get_long, Int64, i64);
    typed_access!(put_float, get_float, Float, f32);
    typed_access!(put_double, get_double, Double, f64);
    typed_access!(put_binary, get_binary, Text, Bytes);

    /// Appends a dynamically typed point.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::TypeMismatch` if the value's type differs from
    /// the column's, or a pool error if a chunk cannot be acquired.
    pub fn put_value(&mut self, timestamp: i64, value: Value) -> Result<()> {
        match (self, value) {
            (ColumnBuffer::Boolean(list), Value::Boolean(v)) => list.put(timestamp, v),
            (ColumnBuffer::Int32(list), Value::Int32(v)) => list.put(timestamp, v),
            (ColumnBuffer::Int64(list), Value::Int64(v)) => list.put(timestamp, v),
            (ColumnBuffer::Float(list), Value::Float(v)) => list.put(timestamp, v),
            (ColumnBuffer::Double(list), Value::Double(v)) => list.put(timestamp, v),
            (ColumnBuffer::Text(list), Value::Text(v)) => list.put(timestamp, v),
            (column, value) => Err(column.mismatch(value.data_type())),
        }
    }

    /// Reads the value at `index` as a dynamically typed value.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_value(&self, index: usize) -> Result<Value> {
        dispatch!(self, list => list.get(index).map(Primitive::into_value))
    }

    /// Sorts the column by timestamp. A no-op if already sorted.
    ///
    /// # Errors
    ///
    /// Returns a pool error if scratch arrays cannot be acquired; the column
    /// is untouched in that case.
    pub fn sort(&mut self) -> Result<()> {
        dispatch!(self, list => list.sort())
    }

    /// Creates an independent deep copy of the column.
    ///
    /// # Errors
    ///
    /// Returns a pool error if chunks for the copy cannot be acquired.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(match self {
            ColumnBuffer::Boolean(list) => ColumnBuffer::Boolean(list.try_clone()?),
            ColumnBuffer::Int32(list) => ColumnBuffer::Int32(list.try_clone()?),
            ColumnBuffer::Int64(list) => ColumnBuffer::Int64(list.try_clone()?),
            ColumnBuffer::Float(list) => ColumnBuffer::Float(list.try_clone()?),
            ColumnBuffer::Double(list) => ColumnBuffer::Double(list.try_clone()?),
            ColumnBuffer::Text(list) => ColumnBuffer::Text(list.try_clone()?),
        })
    }

    /// Removes every entry with `lower <= timestamp <= upper` and returns how
    /// many were removed.
    pub fn delete_range(&mut self, lower: i64, upper: i64) -> usize {
        dispatch!(self, list => list.delete_range(lower, upper))
    }

    /// Returns every chunk to the pool and resets the column to empty.
    pub fn clear(&mut self) {
        dispatch!(self, list => list.clear())
    }

    /// Returns the estimated memory held by the column's chunks in bytes.
    pub fn memory_bytes(&self) -> usize {
        dispatch!(self, list => list.memory_bytes())
    }

    /// Releases every chunk back to the pool and consumes the column.
    pub fn dispose(self) {
        dispatch!(self, list => list.dispose())
    }
}
