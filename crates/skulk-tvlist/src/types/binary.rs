//! Text/binary column buffer.
//!
//! Values are immutable [`Bytes`] handles. Chunks hold handles rather than
//! inline payloads, so cloning a list or moving entries during a sort only
//! bumps reference counts; the payload bytes themselves are never copied.

use super::{DataType, Primitive, Sealed, Value};
use crate::error::Result;
use crate::pool::{FreeList, PrimitiveArrayPool};
use crate::tvlist::TvList;
use bytes::Bytes;
use std::sync::Arc;

/// Time-value list of binary values.
pub type BinaryTvList = TvList<Bytes>;

impl Sealed for Bytes {}

impl Primitive for Bytes {
    const DATA_TYPE: DataType = DataType::Text;
    const WIDTH: usize = std::mem::size_of::<Bytes>();

    fn free_list(pool: &PrimitiveArrayPool) -> &Arc<FreeList<Self>> {
        &pool.inner.texts
    }

    // Pooled arrays must not keep payloads of released lists alive.
    fn recycle(chunk: &mut [Self]) {
        chunk.fill(Bytes::new());
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl TvList<Bytes> {
    /// Appends a binary point.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a new chunk cannot be acquired.
    pub fn put_binary(&mut self, timestamp: i64, value: impl Into<Bytes>) -> Result<()> {
        self.put(timestamp, value.into())
    }

    /// Appends binary points pairwise.
    ///
    /// # Errors
    ///
    /// Returns a pool error if a chunk cannot be acquired; see
    /// [`put_batch`](TvList::put_batch).
    pub fn put_binaries(&mut self, timestamps: &[i64], values: &[Bytes]) -> Result<()> {
        self.put_batch(timestamps, values)
    }

    /// Returns the binary value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::IndexOutOfRange` if `index >= size()`.
    pub fn get_binary(&self, index: usize) -> Result<Bytes> {
        self.get(index)
    }

    /// Returns the total payload length of every entry in bytes.
    ///
    /// [`memory_bytes`](TvList::memory_bytes) counts only handle slots.
    pub fn payload_bytes(&self) -> usize {
        self.iter().map(|(_, value)| value.len()).sum()
    }
}
