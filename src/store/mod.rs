//! Local disk tile store.
//!
//! The engine's persistent tile source: PNG files named by tile coordinates
//! under a cache directory. The store is consumed through the [`TileStore`]
//! trait so tests can substitute an in-memory implementation.

use crate::coord::TileKey;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// File path for a tile under a cache directory: `{dir}/{zoom}_{x}_{y}.png`.
pub fn tile_path(cache_dir: &Path, key: &TileKey) -> PathBuf {
    cache_dir.join(format!("{}_{}_{}.png", key.zoom, key.x, key.y))
}

/// Byte-store interface for cached tiles.
pub trait TileStore: Send {
    /// Whether a tile file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read a tile file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write a tile file, creating the parent directory if absent.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Filesystem-backed tile store.
#[derive(Debug, Default, Clone)]
pub struct DiskTileStore;

impl DiskTileStore {
    /// Create a new filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl TileStore for DiskTileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, bytes)?;
        trace!(path = %path.display(), bytes = bytes.len(), "tile written to disk");
        Ok(())
    }
}
