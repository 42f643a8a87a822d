//! Map-view facade
//!
//! [`TileMap`] owns the shared viewport state, the coverage worker, and the
//! display publisher, and tears them down together. The render/UI thread
//! talks only to this type: viewport setters, a per-frame [`TileMap::update`]
//! for the derived map scale, and [`TileMap::frame`] for the tile lists.

use crate::config::MapConfig;
use crate::coord::{meters_per_pixel_ew, meters_per_pixel_ns};
use crate::provider::{ProviderError, ReqwestClient, TileServer, WmtsServer};
use crate::publisher::{DisplayPublisher, FrameSet, TextureRegistry};
use crate::resolver::{ResolverConfig, TileResolver};
use crate::store::{DiskTileStore, TileStore};
use crate::viewport::{shared, Shared, ViewportState};
use crate::worker::{CoverageWorker, WorkerConfig};
use crate::zoom::{map_scale, MapScale};
use tracing::{info, warn};

/// Filename of the persisted capabilities document, under the cache
/// directory.
const CAPABILITIES_FILE: &str = "wmts_capabilities.xml";

/// A slippy-map tile engine instance.
///
/// Construction starts the background coverage worker; dropping (or calling
/// [`TileMap::close`]) stops it and hands remaining cached tiles to the
/// trash list for release through the next [`TileMap::frame`] call.
pub struct TileMap {
    shared: Shared,
    worker: Option<CoverageWorker>,
    publisher: DisplayPublisher,
    scale: MapScale,
    meters_per_pix_ns: f64,
    meters_per_pix_ew: f64,
}

impl TileMap {
    /// Open a map engine against the real disk store and WMTS server.
    ///
    /// Fails only if the HTTP client cannot be constructed. An unreachable
    /// tile server is not an error; the engine starts with the remote
    /// source offline and re-probes after the cooldown.
    pub fn open(config: MapConfig) -> Result<Self, ProviderError> {
        let http_client = ReqwestClient::new(config.request_timeout_ms)?;
        let server = WmtsServer::new(config.remote_url.clone(), http_client);

        Ok(Self::open_with(config, DiskTileStore::new(), server))
    }

    /// Open a map engine with caller-supplied store and server
    /// implementations.
    pub fn open_with<S, P>(config: MapConfig, store: S, server: P) -> Self
    where
        S: TileStore + 'static,
        P: TileServer + 'static,
    {
        let mut resolver = TileResolver::new(
            store,
            server,
            ResolverConfig {
                disk_enabled: config.disk_cache_enabled,
                cache_dir: config.cache_dir.clone(),
                remote_enabled: config.remote_enabled,
                cooldown_cycles: config.server_cooldown_cycles,
            },
        );

        if config.remote_enabled {
            probe_capabilities(&mut resolver, &config);
        }

        let shared = shared();
        let worker = CoverageWorker::spawn(
            std::sync::Arc::clone(&shared),
            resolver,
            WorkerConfig {
                tick: config.worker_tick,
                cache_capacity: config.cache_capacity,
                easing_frames: config.easing_frames,
            },
        );
        let publisher = DisplayPublisher::new(std::sync::Arc::clone(&shared), config.easing_frames);

        info!(
            remote = config.remote_enabled,
            disk = config.disk_cache_enabled,
            cache_dir = %config.cache_dir.display(),
            "tile map opened"
        );

        Self {
            shared,
            worker: Some(worker),
            publisher,
            scale: map_scale(ViewportState::default().scale_factor, 0.0),
            meters_per_pix_ns: 0.0,
            meters_per_pix_ew: 0.0,
        }
    }

    /// Set the map center. Latitude is clamped to the Web-Mercator range,
    /// longitude to a half turn.
    pub fn set_center(&self, lat: f64, lon: f64) {
        let mut state = self.shared.lock().unwrap();
        state.viewport.center_lat = ViewportState::clamp_lat(lat);
        state.viewport.center_lon = ViewportState::clamp_lon(lon);
    }

    /// Set the map rotation in degrees clockwise.
    pub fn set_rotation(&self, rotation_clockwise_deg: f64) {
        self.shared.lock().unwrap().viewport.rotation_deg = rotation_clockwise_deg;
    }

    /// Set the viewport scale factor (larger = more zoomed out).
    pub fn set_scale_factor(&self, scale_factor: f32) {
        self.shared.lock().unwrap().viewport.scale_factor = scale_factor;
    }

    /// Set the viewport size in pixels.
    pub fn set_size(&self, width_pix: u32, height_pix: u32) {
        let mut state = self.shared.lock().unwrap();
        state.viewport.width_pix = width_pix;
        state.viewport.height_pix = height_pix;
    }

    /// Set the coverage radius multiplier.
    pub fn set_coverage_radius_scale(&self, scale: f32) {
        self.shared.lock().unwrap().viewport.coverage_radius_scale = scale;
    }

    /// Enable or disable easing of zoom transitions.
    pub fn set_easing_enabled(&self, enabled: bool) {
        self.shared.lock().unwrap().viewport.easing_enabled = enabled;
    }

    /// Recompute the derived map scale from the current viewport.
    ///
    /// Call once per frame before drawing; the returned scale carries the
    /// discrete zoom level and the per-axis draw scales.
    pub fn update(&mut self) -> MapScale {
        let (scale_factor, center_lat) = {
            let state = self.shared.lock().unwrap();
            (state.viewport.scale_factor, state.viewport.center_lat)
        };

        self.scale = map_scale(scale_factor, center_lat);
        self.meters_per_pix_ns = meters_per_pixel_ns(self.scale.level);
        self.meters_per_pix_ew = meters_per_pixel_ew(center_lat, self.scale.level);
        self.scale
    }

    /// The map scale from the last [`TileMap::update`] call.
    pub fn scale(&self) -> MapScale {
        self.scale
    }

    /// Ground meters per pixel (north-south, east-west) from the last
    /// [`TileMap::update`] call.
    pub fn meters_per_pixel(&self) -> (f64, f64) {
        (self.meters_per_pix_ns, self.meters_per_pix_ew)
    }

    /// Run one render frame: realize and release resources, age the easing
    /// list, and return the tile lists to draw.
    pub fn frame<R: TextureRegistry>(&self, registry: &mut R) -> FrameSet {
        self.publisher.frame(registry)
    }

    /// Stop the coverage worker and wait for it to finish.
    ///
    /// Cached tiles land on the trash list; call [`TileMap::frame`] once
    /// more afterwards to release their resources.
    pub fn close(&mut self) {
        if let Some(worker) = self.worker.take() {
            drop(worker);
            info!("tile map closed");
        }
    }
}

impl Drop for TileMap {
    fn drop(&mut self) {
        self.close();
    }
}

/// Probe the remote server's capabilities document once at startup.
///
/// Success brings the remote source online (and persists the document to the
/// cache directory when disk caching is on); failure arms the cooldown.
fn probe_capabilities<S: TileStore, P: TileServer>(
    resolver: &mut TileResolver<S, P>,
    config: &MapConfig,
) {
    let outcome = resolver.server().fetch_capabilities();
    match outcome {
        Ok(bytes) if !bytes.is_empty() => {
            if config.disk_cache_enabled {
                let path = config.cache_dir.join(CAPABILITIES_FILE);
                if let Err(e) = resolver.store().write(&path, &bytes) {
                    warn!(error = %e, "capabilities document write failed");
                }
            }
            resolver.set_online(true);
            info!(bytes = bytes.len(), "tile server capabilities fetched");
        }
        Ok(_) => {
            warn!("tile server returned an empty capabilities document");
            resolver.arm_cooldown();
        }
        Err(e) => {
            warn!(error = %e, "tile server capabilities fetch failed");
            resolver.arm_cooldown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::MAX_LAT;

    #[test]
    fn open_clamps_center_latitude() {
        let config = MapConfig::default()
            .with_cache_dir(std::env::temp_dir().join("tilescape-map-test"))
            .with_worker_tick(std::time::Duration::from_millis(5));

        let mut map = TileMap::open(config).unwrap();
        map.set_center(91.0, -74.0);

        let state = map.shared.lock().unwrap();
        assert_eq!(state.viewport.center_lat, MAX_LAT);
        drop(state);

        map.close();
    }

    #[test]
    fn update_derives_scale_from_viewport() {
        let config = MapConfig::default()
            .without_disk_cache()
            .with_worker_tick(std::time::Duration::from_millis(5));
        let mut map = TileMap::open(config).unwrap();

        map.set_center(40.0, -74.0);
        map.set_scale_factor(35_000.0);

        let scale = map.update();
        assert_eq!(scale.level, 14);
        assert!((scale.map_zoom - 1.0).abs() < 1e-9);

        let (ns, ew) = map.meters_per_pixel();
        assert!(ns > 0.0);
        assert!(ew > ns);
    }
}
