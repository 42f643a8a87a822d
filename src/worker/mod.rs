//! Coverage worker
//!
//! The background side of the engine: a dedicated thread that snapshots the
//! viewport under lock, regenerates the coverage list, drives the resolver
//! and the in-memory cache, and publishes a complete display list plus an
//! eviction trash list back under lock.
//!
//! Each cycle runs snapshot, resolve, publish; all slow work (disk checks,
//! remote fetches) happens outside the lock against worker-local scratch
//! lists, so the render thread only ever observes fully-built lists. The
//! termination flag is checked between individual tile resolutions as well
//! as between cycles, which bounds shutdown latency by one resolver call.

use crate::cache::TileCache;
use crate::coverage::coverage_list;
use crate::provider::TileServer;
use crate::resolver::TileResolver;
use crate::store::TileStore;
use crate::viewport::Shared;
use crate::zoom;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Coverage worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Pause between cycles.
    pub tick: Duration,
    /// In-memory cache capacity, in entries.
    pub cache_capacity: usize,
    /// Starting age for easing entries captured on a zoom transition.
    pub easing_frames: u32,
}

/// Handle to the background coverage thread.
///
/// Shutting down is a two-step affair: raise the termination flag, then join.
/// Dropping the handle does both.
pub(crate) struct CoverageWorker {
    thread_handle: Option<JoinHandle<()>>,
    terminate: Arc<AtomicBool>,
}

impl CoverageWorker {
    /// Spawn the coverage thread.
    pub(crate) fn spawn<S, P>(
        shared: Shared,
        resolver: TileResolver<S, P>,
        config: WorkerConfig,
    ) -> Self
    where
        S: TileStore + Send + 'static,
        P: TileServer + Send + 'static,
    {
        let terminate = Arc::new(AtomicBool::new(false));
        let terminate_clone = Arc::clone(&terminate);

        let thread_handle = thread::Builder::new()
            .name("tile-coverage".to_string())
            .spawn(move || {
                run_loop(shared, resolver, config, terminate_clone);
            })
            .expect("failed to spawn coverage thread");

        Self {
            thread_handle: Some(thread_handle),
            terminate,
        }
    }

    /// Raise the termination flag. Non-blocking; the worker exits within one
    /// tick or one resolver call, whichever it is in.
    pub(crate) fn shutdown(&self) {
        self.terminate.store(true, Ordering::Relaxed);
    }

    /// Wait for the worker thread to finish.
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!("coverage thread panicked");
            }
        }
    }
}

impl Drop for CoverageWorker {
    fn drop(&mut self) {
        self.shutdown();
        self.join();
    }
}

fn run_loop<S, P>(
    shared: Shared,
    mut resolver: TileResolver<S, P>,
    config: WorkerConfig,
    terminate: Arc<AtomicBool>,
) where
    S: TileStore,
    P: TileServer,
{
    let mut cache = TileCache::new(config.cache_capacity);
    let mut display_scratch = Vec::new();
    let mut trash_scratch = Vec::new();
    let mut prev_level: Option<u8> = None;

    info!(
        cache_capacity = config.cache_capacity,
        tick_ms = config.tick.as_millis() as u64,
        "coverage worker started"
    );

    'cycle: while !terminate.load(Ordering::Relaxed) {
        let snapshot = shared.lock().unwrap().viewport.clone();

        let scale = zoom::map_scale(snapshot.scale_factor, snapshot.center_lat);

        // coverage radius in pixels: the diagonal from the map center to a
        // window corner, scaled by the configured radius factor
        let radial_x = (snapshot.width_pix as f64 / 2.0)
            * snapshot.coverage_radius_scale as f64
            * scale.scale_x
            / scale.map_zoom;
        let radial_y = (snapshot.height_pix as f64 / 2.0)
            * snapshot.coverage_radius_scale as f64
            * scale.scale_y
            / scale.map_zoom;
        let coverage_radius_pix =
            (radial_x * radial_x + radial_y * radial_y).sqrt() / scale.map_zoom;

        resolver.tick_cooldown();

        let keys = coverage_list(
            snapshot.center_lat,
            snapshot.center_lon,
            scale.level,
            scale.scale_x,
            coverage_radius_pix,
        );

        display_scratch.clear();
        trash_scratch.clear();

        for key in &keys {
            if terminate.load(Ordering::Relaxed) {
                break 'cycle;
            }

            let record = match cache.get(key).cloned() {
                Some(hit) => hit,
                None => {
                    let record = resolver.resolve(key);

                    if cache.is_full() {
                        if let Some((_, evicted)) = cache.get_back() {
                            // placeholders share one renderer resource and
                            // must never be released through the trash list
                            if !evicted.is_placeholder() {
                                trash_scratch.push(evicted);
                            }
                        }
                    }
                    if let Err(e) = cache.put_front(*key, record.clone()) {
                        warn!(tile = %key, error = %e, "cache insert rejected");
                    }

                    record
                }
            };

            display_scratch.push(record);
        }

        {
            let mut state = shared.lock().unwrap();

            let zoom_changed = prev_level.is_some_and(|level| level != scale.level);
            if zoom_changed && snapshot.easing_enabled {
                let frames = config.easing_frames;
                let previous = std::mem::take(&mut state.display);
                state.easing.extend(previous.into_iter().map(|mut tile| {
                    tile.age = frames;
                    tile
                }));
            }

            state.display = std::mem::take(&mut display_scratch);
            state.trash.append(&mut trash_scratch);
        }

        debug!(
            level = scale.level,
            tiles = keys.len(),
            cached = cache.len(),
            radius_pix = coverage_radius_pix as u64,
            "coverage cycle published"
        );

        prev_level = Some(scale.level);
        thread::sleep(config.tick);
    }

    // hand every cached record to the renderer for resource teardown
    let mut state = shared.lock().unwrap();
    for (_, record) in cache.drain() {
        if !record.is_placeholder() {
            state.trash.push(record);
        }
    }

    info!("coverage worker stopped");
}
