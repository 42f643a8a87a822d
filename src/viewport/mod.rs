//! Shared viewport state.
//!
//! The render side mutates the viewport; the coverage worker snapshots it.
//! Everything that crosses the two threads (viewport parameters and the
//! three published tile lists) lives together behind one mutex, and each
//! side holds the lock only long enough to copy or swap values.

use crate::coord::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use crate::tile::TileRecord;
use std::sync::{Arc, Mutex};

/// Viewport parameters driving coverage computation.
#[derive(Debug, Clone)]
pub struct ViewportState {
    /// Map center latitude in degrees.
    pub center_lat: f64,
    /// Map center longitude in degrees.
    pub center_lon: f64,
    /// Map rotation in degrees clockwise.
    pub rotation_deg: f64,
    /// Scale factor; larger means more zoomed out.
    pub scale_factor: f32,
    /// Viewport width in pixels.
    pub width_pix: u32,
    /// Viewport height in pixels.
    pub height_pix: u32,
    /// Multiplier applied to the coverage radius.
    pub coverage_radius_scale: f32,
    /// Whether zoom transitions feed the easing list.
    pub easing_enabled: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            center_lat: 0.0,
            center_lon: 0.0,
            rotation_deg: 0.0,
            scale_factor: 1.0,
            width_pix: 0,
            height_pix: 0,
            coverage_radius_scale: 1.0,
            easing_enabled: true,
        }
    }
}

impl ViewportState {
    /// Clamp a latitude to the Web-Mercator valid range.
    pub(crate) fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(MIN_LAT, MAX_LAT)
    }

    /// Clamp a longitude to the valid range.
    pub(crate) fn clamp_lon(lon: f64) -> f64 {
        lon.clamp(MIN_LON, MAX_LON)
    }
}

/// All state shared between the render thread and the coverage worker.
#[derive(Debug, Default)]
pub(crate) struct SharedState {
    /// Viewport parameters, written by the render side.
    pub viewport: ViewportState,
    /// Tiles to draw this frame; replaced whole each worker cycle.
    pub display: Vec<TileRecord>,
    /// Previous-zoom tiles fading out after a zoom transition.
    pub easing: Vec<TileRecord>,
    /// Evicted tiles awaiting resource release on the render side.
    pub trash: Vec<TileRecord>,
}

/// Handle to the shared state.
pub(crate) type Shared = Arc<Mutex<SharedState>>;

/// Create a fresh shared-state handle.
pub(crate) fn shared() -> Shared {
    Arc::new(Mutex::new(SharedState::default()))
}
