//! In-memory tile cache.
//!
//! A fixed-capacity, recency-ordered store keyed by tile coordinates. The
//! coverage worker owns the cache; eviction hands records back to the worker
//! so resource release can happen on the rendering side.

mod lru;

pub use lru::LruCache;

use crate::coord::TileKey;
use crate::tile::TileRecord;
use thiserror::Error;

/// The engine's tile cache: resolved records keyed by tile coordinates.
pub type TileCache = LruCache<TileKey, TileRecord>;

/// Cache-related errors.
///
/// Both variants are programming errors rather than runtime conditions: the
/// insert path evicts before inserting and looks up before resolving.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Insert attempted while the cache is at capacity.
    #[error("cache is full (capacity {capacity})")]
    Full { capacity: usize },

    /// Insert attempted for a tag already present.
    #[error("tag already present in cache")]
    DuplicateTag,
}
