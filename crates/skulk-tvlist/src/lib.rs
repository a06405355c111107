//! Skulk TVList - pooled write buffers for the Skulk time series storage engine
//!
//! This crate provides the in-memory buffer that accumulates newly ingested
//! `(timestamp, value)` points for one column before they are sorted,
//! deduplicated and flushed to immutable storage.
//!
//! # Components
//!
//! - [`PrimitiveArrayPool`]: Shared pool of fixed-length primitive arrays
//! - [`TvList`]: Chunked time-value list, generic over the value type
//! - [`types`]: Per-type lists (`bool`, `i32`, `i64`, `f32`, `f64`, text)
//! - [`ColumnBuffer`]: List whose value type is chosen at runtime
//! - [`FrozenTvList`]: Sorted, read-only view handed to flush and query
//!
//! # Example
//!
//! ```rust,ignore
//! use skulk_tvlist::{DoubleTvList, PoolConfig, PrimitiveArrayPool};
//!
//! let pool = PrimitiveArrayPool::new(PoolConfig::new(2))?;
//! let mut list = DoubleTvList::with_pool(&pool);
//!
//! // Out-of-order and duplicate timestamps are accepted
//! list.put_double(5, 1.0)?;
//! list.put_double(3, 2.0)?;
//! list.put_double(5, 3.0)?;
//!
//! // Hand off to the flush path: sort, then read one value per timestamp
//! let frozen = list.freeze()?;
//! for (timestamp, value) in frozen.dedup_iter() {
//!     println!("{timestamp} -> {value}");
//! }
//! frozen.dispose();
//! ```

#![deny(missing_docs)]

pub mod column;
pub mod config;
pub mod error;
pub mod frozen;
pub mod iter;
pub mod pool;
mod sort;
pub mod tvlist;
pub mod types;

pub use column::ColumnBuffer;
pub use config::{PoolConfig, DEFAULT_ARRAY_SIZE};
pub use error::{Result, TvListError};
pub use frozen::FrozenTvList;
pub use pool::{ArrayKind, PoolStats, PooledArray, PrimitiveArrayPool};
pub use tvlist::{FreezeError, TimeValuePair, TvList};
pub use types::{
    BinaryTvList, BooleanTvList, DataType, DoubleTvList, FloatTvList, IntTvList, LongTvList,
    Primitive, Value,
};
