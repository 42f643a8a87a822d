//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default in-memory tile cache capacity, in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Default remote request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1_000;

/// Default worker cycles to wait before re-probing a failed remote server.
pub const DEFAULT_SERVER_COOLDOWN_CYCLES: u32 = 200;

/// Default pause between coverage worker cycles.
pub const DEFAULT_WORKER_TICK: Duration = Duration::from_millis(50);

/// Default number of frames an easing tile takes to fade out.
pub const DEFAULT_EASING_FRAMES: u32 = 30;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Whether the remote tile server is used.
    pub remote_enabled: bool,
    /// Remote tile server base URL.
    pub remote_url: String,
    /// Whether the local disk tile cache is used.
    pub disk_cache_enabled: bool,
    /// Directory holding cached tile files.
    pub cache_dir: PathBuf,
    /// Remote request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// In-memory tile cache capacity, in entries.
    pub cache_capacity: usize,
    /// Worker cycles between remote failure and re-probe.
    pub server_cooldown_cycles: u32,
    /// Pause between coverage worker cycles.
    pub worker_tick: Duration,
    /// Frames an easing tile takes to fade out.
    pub easing_frames: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tilescape");

        Self {
            remote_enabled: false,
            remote_url: String::new(),
            disk_cache_enabled: true,
            cache_dir,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            server_cooldown_cycles: DEFAULT_SERVER_COOLDOWN_CYCLES,
            worker_tick: DEFAULT_WORKER_TICK,
            easing_frames: DEFAULT_EASING_FRAMES,
        }
    }
}

impl MapConfig {
    /// Enable the remote tile server at the given base URL.
    ///
    /// An empty URL leaves the remote source disabled.
    pub fn with_remote(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into();
        self.remote_enabled = !self.remote_url.is_empty();
        self
    }

    /// Set the disk cache directory (and enable the disk cache).
    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = dir;
        self.disk_cache_enabled = true;
        self
    }

    /// Disable the disk cache.
    pub fn without_disk_cache(mut self) -> Self {
        self.disk_cache_enabled = false;
        self
    }

    /// Set the in-memory cache capacity in entries.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the remote request timeout in milliseconds.
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Set the pause between worker cycles.
    pub fn with_worker_tick(mut self, tick: Duration) -> Self {
        self.worker_tick = tick;
        self
    }

    /// Set the easing fade-out length in frames.
    pub fn with_easing_frames(mut self, frames: u32) -> Self {
        self.easing_frames = frames;
        self
    }
}
