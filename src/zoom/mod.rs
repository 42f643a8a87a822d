//! Zoom selection
//!
//! Maps a continuous viewport scale factor (larger = more zoomed out) to a
//! discrete tile zoom level through a fixed breakpoint ladder, and derives
//! the continuous per-frame map scale used for visual interpolation between
//! levels.

use crate::coord::MAX_ZOOM;

/// Scale-factor breakpoints, largest first. The selected level is the first
/// entry whose breakpoint the scale factor still meets or exceeds.
const BREAKPOINTS: [(f32, u8); 20] = [
    (500_000_000.0, 0),
    (250_000_000.0, 1),
    (150_000_000.0, 2),
    (70_000_000.0, 3),
    (35_000_000.0, 4),
    (15_000_000.0, 5),
    (10_000_000.0, 6),
    (4_000_000.0, 7),
    (2_000_000.0, 8),
    (1_000_000.0, 9),
    (500_000.0, 10),
    (250_000.0, 11),
    (150_000.0, 12),
    (70_000.0, 13),
    (35_000.0, 14),
    (15_000.0, 15),
    (8_000.0, 16),
    (4_000.0, 17),
    (2_000.0, 18),
    (1_000.0, 19),
];

/// Per-frame map scale derived from the viewport scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapScale {
    /// Discrete tile zoom level (0-20).
    pub level: u8,
    /// Continuous zoom multiplier within the level (breakpoint / scale factor).
    pub map_zoom: f64,
    /// Horizontal draw scale, Mercator-corrected by cos(center latitude).
    pub scale_x: f64,
    /// Vertical draw scale, uncorrected.
    pub scale_y: f64,
}

/// Selects the discrete zoom level for a scale factor.
///
/// Returns the level and the continuous zoom multiplier within it. Scale
/// factors below every breakpoint clamp to level 20, with the multiplier
/// still measured against the final breakpoint.
pub fn select_zoom(scale_factor: f32) -> (u8, f64) {
    for (breakpoint, level) in BREAKPOINTS {
        if scale_factor >= breakpoint {
            return (level, breakpoint as f64 / scale_factor as f64);
        }
    }

    let (last_breakpoint, _) = BREAKPOINTS[BREAKPOINTS.len() - 1];
    (MAX_ZOOM, last_breakpoint as f64 / scale_factor as f64)
}

/// Derives the full per-frame map scale for a viewport.
///
/// The horizontal scale is corrected by cos(center latitude) to compensate
/// for Mercator east-west stretching; the vertical scale is not. Tile
/// alignment depends on this asymmetry.
pub fn map_scale(scale_factor: f32, center_lat: f64) -> MapScale {
    let (level, map_zoom) = select_zoom(scale_factor);

    MapScale {
        level,
        map_zoom,
        scale_x: map_zoom * center_lat.to_radians().cos(),
        scale_y: map_zoom,
    }
}
