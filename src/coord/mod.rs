//! Tile coordinate math
//!
//! Pure conversions between geographic coordinates (latitude/longitude) and
//! Web Mercator tile indices, plus ground-distance-per-pixel derivations.
//! No state, no I/O.

mod types;

pub use types::{TileKey, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM, TILE_SIZE_PIX};

use std::f64::consts::PI;

/// Circumference of the equator in meters.
pub const EQUATOR_CIRCUMFERENCE_M: f64 = 40_075_017.0;

/// Converts a longitude to a tile X index at the given zoom level.
///
/// Returns a signed index: longitudes outside [-180, 180) land outside the
/// grid and it is the caller's job to truncate.
#[inline]
pub fn tile_x(longitude: f64, zoom: u8) -> i64 {
    let n = (1u64 << zoom) as f64;
    ((longitude + 180.0) / 360.0 * n).floor() as i64
}

/// Converts a latitude to a tile Y index at the given zoom level.
///
/// Uses the Web Mercator projection; latitudes beyond the projection's
/// valid range land outside the grid.
#[inline]
pub fn tile_y(latitude: f64, zoom: u8) -> i64 {
    let n = (1u64 << zoom) as f64;
    let lat_rad = latitude.to_radians();
    (((1.0 - lat_rad.tan().asinh() / PI) / 2.0) * n).floor() as i64
}

/// Longitude of the western edge of tile column `x`.
#[inline]
pub fn longitude_from_tile_x(x: i64, zoom: u8) -> f64 {
    let n = (1u64 << zoom) as f64;
    x as f64 / n * 360.0 - 180.0
}

/// Latitude of the northern edge of tile row `y`.
#[inline]
pub fn latitude_from_tile_y(y: i64, zoom: u8) -> f64 {
    let n = (1u64 << zoom) as f64;
    (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees()
}

/// Geographic center of a tile, as (latitude, longitude).
///
/// Averages the tile's corner coordinates; used for offset placement of the
/// tile image relative to the map center.
pub fn tile_center(key: &TileKey) -> (f64, f64) {
    let ul_lat = latitude_from_tile_y(key.y as i64, key.zoom);
    let br_lat = latitude_from_tile_y(key.y as i64 + 1, key.zoom);
    let ul_lon = longitude_from_tile_x(key.x as i64, key.zoom);
    let br_lon = longitude_from_tile_x(key.x as i64 + 1, key.zoom);

    ((ul_lat + br_lat) / 2.0, (ul_lon + br_lon) / 2.0)
}

/// Ground distance covered by one pixel in the north-south direction, in
/// meters, at the given zoom level.
#[inline]
pub fn meters_per_pixel_ns(zoom: u8) -> f64 {
    EQUATOR_CIRCUMFERENCE_M / (1u64 << (zoom as u32 + 8)) as f64
}

/// Ground distance covered by one pixel in the east-west direction, in
/// meters, at the given latitude and zoom level.
#[inline]
pub fn meters_per_pixel_ew(latitude: f64, zoom: u8) -> f64 {
    meters_per_pixel_ns(zoom) / latitude.to_radians().cos()
}
