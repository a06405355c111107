//! Process-wide pool of fixed-length primitive arrays.
//!
//! Every time-value list stores its timestamps and values in chunks of
//! `array_size` elements. Chunks are borrowed from a [`PrimitiveArrayPool`]
//! and handed back when the list no longer needs them, so sustained ingestion
//! recycles the same arrays instead of allocating new ones.
//!
//! # Ownership
//!
//! [`PrimitiveArrayPool::acquire`] returns a [`PooledArray`] handle. The
//! handle owns its array exclusively and returns it to the free list of its
//! kind when dropped, on every exit path. There is no explicit `release`
//! call, so releasing an array twice or releasing an array the pool never
//! handed out cannot be expressed.
//!
//! # Concurrency
//!
//! Each kind has its own free list behind a `parking_lot::Mutex`. Acquire and
//! release may be called from any number of threads; an array is never held
//! by two handles at once.
//!
//! ```text
//! acquire():  pop free list ──(empty)──> allocate fresh array
//! drop():     recycle contents ──> push free list
//! ```

use crate::config::PoolConfig;
use crate::error::{Result, TvListError};
use crate::types::Primitive;
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

static GLOBAL_POOL: OnceLock<PrimitiveArrayPool> = OnceLock::new();

/// Kind of array managed by the pool. Each kind has its own free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    /// `i64` timestamp chunks (also used for sort sequence scratch).
    Timestamp,
    /// `bool` value chunks.
    Boolean,
    /// `i32` value chunks.
    Int32,
    /// `i64` value chunks.
    Int64,
    /// `f32` value chunks.
    Float,
    /// `f64` value chunks.
    Double,
    /// Text/binary handle chunks.
    Text,
}

impl ArrayKind {
    /// Every array kind, in a stable order.
    pub const ALL: [ArrayKind; 7] = [
        ArrayKind::Timestamp,
        ArrayKind::Boolean,
        ArrayKind::Int32,
        ArrayKind::Int64,
        ArrayKind::Float,
        ArrayKind::Double,
        ArrayKind::Text,
    ];

    /// Returns a lowercase name for the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ArrayKind::Timestamp => "timestamp",
            ArrayKind::Boolean => "boolean",
            ArrayKind::Int32 => "int32",
            ArrayKind::Int64 => "int64",
            ArrayKind::Float => "float",
            ArrayKind::Double => "double",
            ArrayKind::Text => "text",
        }
    }
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a free list's accounting.
///
/// `allocated == outstanding + free` holds whenever no acquire is mid-flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Arrays ever allocated for this kind and not discarded.
    pub allocated: usize,
    /// Arrays currently held by a [`PooledArray`] handle.
    pub outstanding: usize,
    /// Arrays sitting in the free list.
    pub free: usize,
}

#[derive(Debug)]
struct FreeListState<T> {
    free: Vec<Box<[T]>>,
    outstanding: usize,
    allocated: usize,
}

/// Free list for one [`ArrayKind`].
///
/// Obtained only through [`PrimitiveArrayPool`]; exposed so that
/// [`Primitive`] can name the list for its element type.
#[derive(Debug)]
pub struct FreeList<T> {
    kind: ArrayKind,
    array_size: usize,
    limit: Option<usize>,
    state: Mutex<FreeListState<T>>,
}

impl<T: Primitive> FreeList<T> {
    fn new(kind: ArrayKind, config: &PoolConfig) -> Arc<Self> {
        Arc::new(Self {
            kind,
            array_size: config.array_size,
            limit: config.max_arrays_per_kind,
            state: Mutex::new(FreeListState {
                free: Vec::new(),
                outstanding: 0,
                allocated: 0,
            }),
        })
    }

    fn acquire(self: &Arc<Self>) -> Result<PooledArray<T>> {
        let recycled = {
            let mut state = self.state.lock();
            if let Some(limit) = self.limit {
                if state.outstanding >= limit {
                    drop(state);
                    warn!(
                        "Refusing {} array: {} already outstanding",
                        self.kind, limit
                    );
                    return Err(TvListError::PoolExhausted {
                        kind: self.kind,
                        limit,
                    });
                }
            }
            // Reserve the slot before unlocking so a concurrent acquire
            // cannot push outstanding past the limit while we allocate.
            state.outstanding += 1;
            let recycled = state.free.pop();
            if recycled.is_none() {
                state.allocated += 1;
            }
            recycled
        };

        let data = match recycled {
            Some(data) => data,
            None => match allocate::<T>(self.kind, self.array_size) {
                Ok(data) => {
                    debug!("Allocated new {} array of {} elements", self.kind, self.array_size);
                    data
                }
                Err(e) => {
                    let mut state = self.state.lock();
                    state.outstanding -= 1;
                    state.allocated -= 1;
                    return Err(e);
                }
            },
        };

        Ok(PooledArray {
            data,
            home: Arc::clone(self),
        })
    }

    fn release(&self, mut data: Box<[T]>) {
        debug_assert_eq!(data.len(), self.array_size);
        T::recycle(&mut data);
        let mut state = self.state.lock();
        state.outstanding = state
            .outstanding
            .checked_sub(1)
            .unwrap_or_else(|| panic!("{} array released more often than acquired", self.kind));
        state.free.push(data);
    }

    fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            allocated: state.allocated,
            outstanding: state.outstanding,
            free: state.free.len(),
        }
    }

    fn clear_free(&self) -> usize {
        let mut state = self.state.lock();
        let dropped = state.free.len();
        state.allocated -= dropped;
        state.free.clear();
        dropped
    }
}

fn allocate<T: Primitive>(kind: ArrayKind, len: usize) -> Result<Box<[T]>> {
    let mut data: Vec<T> = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| TvListError::AllocationFailed { kind, len })?;
    data.resize(len, T::default());
    Ok(data.into_boxed_slice())
}

/// An array borrowed from a [`PrimitiveArrayPool`].
///
/// Dereferences to a slice of exactly `array_size` elements. Contents are
/// whatever the previous holder left behind; callers must not assume zeroed
/// memory. Dropping the handle returns the array to its free list.
pub struct PooledArray<T: Primitive> {
    data: Box<[T]>,
    home: Arc<FreeList<T>>,
}

impl<T: Primitive> PooledArray<T> {
    /// Returns the kind of free list this array belongs to.
    pub fn kind(&self) -> ArrayKind {
        self.home.kind
    }

    /// Returns the address of the backing storage, for reuse checks.
    pub fn ptr_usize(&self) -> usize {
        self.data.as_ptr() as usize
    }
}

impl<T: Primitive> Deref for PooledArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Primitive> DerefMut for PooledArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Primitive> fmt::Debug for PooledArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledArray")
            .field("kind", &self.home.kind)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<T: Primitive> Drop for PooledArray<T> {
    fn drop(&mut self) {
        let data = std::mem::take(&mut self.data);
        self.home.release(data);
    }
}

#[derive(Debug)]
pub(crate) struct PoolInner {
    config: PoolConfig,
    pub(crate) timestamps: Arc<FreeList<i64>>,
    pub(crate) booleans: Arc<FreeList<bool>>,
    pub(crate) ints: Arc<FreeList<i32>>,
    pub(crate) longs: Arc<FreeList<i64>>,
    pub(crate) floats: Arc<FreeList<f32>>,
    pub(crate) doubles: Arc<FreeList<f64>>,
    pub(crate) texts: Arc<FreeList<Bytes>>,
}

/// Shared pool of fixed-length primitive arrays.
///
/// Cloning the pool yields another handle to the same free lists.
#[derive(Debug, Clone)]
pub struct PrimitiveArrayPool {
    pub(crate) inner: Arc<PoolInner>,
}

impl PrimitiveArrayPool {
    /// Creates a new pool with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: PoolConfig) -> Self {
        let inner = PoolInner {
            timestamps: FreeList::new(ArrayKind::Timestamp, &config),
            booleans: FreeList::new(ArrayKind::Boolean, &config),
            ints: FreeList::new(ArrayKind::Int32, &config),
            longs: FreeList::new(ArrayKind::Int64, &config),
            floats: FreeList::new(ArrayKind::Float, &config),
            doubles: FreeList::new(ArrayKind::Double, &config),
            texts: FreeList::new(ArrayKind::Text, &config),
            config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the process-wide pool, creating it with the default
    /// configuration on first use.
    pub fn global() -> &'static PrimitiveArrayPool {
        GLOBAL_POOL.get_or_init(|| Self::from_valid(PoolConfig::default()))
    }

    /// Installs the process-wide pool with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::InvalidConfig` if the configuration is invalid or
    /// the global pool has already been created.
    pub fn init_global(config: PoolConfig) -> Result<()> {
        let pool = Self::new(config)?;
        GLOBAL_POOL.set(pool).map_err(|_| {
            TvListError::InvalidConfig("global array pool already initialized".to_string())
        })
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Returns the number of elements in every array handed out by this pool.
    pub fn array_size(&self) -> usize {
        self.inner.config.array_size
    }

    /// Acquires a value array for element type `T`.
    ///
    /// # Errors
    ///
    /// Returns `TvListError::PoolExhausted` if the kind's outstanding limit is
    /// reached, or `TvListError::AllocationFailed` if a fresh array cannot be
    /// allocated.
    pub fn acquire<T: Primitive>(&self) -> Result<PooledArray<T>> {
        T::free_list(self).acquire()
    }

    /// Acquires a timestamp array.
    ///
    /// # Errors
    ///
    /// Same as [`acquire`](Self::acquire).
    pub fn acquire_timestamps(&self) -> Result<PooledArray<i64>> {
        self.inner.timestamps.acquire()
    }

    /// Acquires enough value arrays to hold `len` elements.
    ///
    /// Either every array is acquired or none is kept: on error the arrays
    /// acquired so far are returned to the pool.
    pub fn acquire_for<T: Primitive>(&self, len: usize) -> Result<Vec<PooledArray<T>>> {
        (0..self.arrays_for(len)).map(|_| self.acquire()).collect()
    }

    /// Acquires enough timestamp arrays to hold `len` elements.
    ///
    /// Same all-or-nothing behavior as [`acquire_for`](Self::acquire_for).
    pub fn acquire_timestamps_for(&self, len: usize) -> Result<Vec<PooledArray<i64>>> {
        (0..self.arrays_for(len))
            .map(|_| self.acquire_timestamps())
            .collect()
    }

    /// Returns how many arrays are needed to hold `len` elements.
    pub fn arrays_for(&self, len: usize) -> usize {
        len.div_ceil(self.array_size())
    }

    /// Returns accounting for one array kind.
    pub fn stats(&self, kind: ArrayKind) -> PoolStats {
        let inner = &self.inner;
        match kind {
            ArrayKind::Timestamp => inner.timestamps.stats(),
            ArrayKind::Boolean => inner.booleans.stats(),
            ArrayKind::Int32 => inner.ints.stats(),
            ArrayKind::Int64 => inner.longs.stats(),
            ArrayKind::Float => inner.floats.stats(),
            ArrayKind::Double => inner.doubles.stats(),
            ArrayKind::Text => inner.texts.stats(),
        }
    }

    /// Returns the number of arrays currently held by handles, over all kinds.
    pub fn outstanding(&self) -> usize {
        ArrayKind::ALL
            .iter()
            .map(|&kind| self.stats(kind).outstanding)
            .sum()
    }

    /// Drops every cached free array, returning the memory to the allocator.
    ///
    /// Outstanding arrays are unaffected. Returns the number of arrays dropped.
    pub fn clear_free(&self) -> usize {
        let inner = &self.inner;
        let dropped = inner.timestamps.clear_free()
            + inner.booleans.clear_free()
            + inner.ints.clear_free()
            + inner.longs.clear_free()
            + inner.floats.clear_free()
            + inner.doubles.clear_free()
            + inner.texts.clear_free();
        debug!("Dropped {} cached pool arrays", dropped);
        dropped
    }
}
