//! Resolved tile records.

use crate::coord::{tile_center, TileKey};

/// Resource identifier shared by every tile that resolved to no image data.
///
/// The renderer maps this to its single placeholder resource; placeholder
/// records therefore never own anything worth releasing individually.
pub const NO_DATA_IMAGE: &str = "no_data";

/// A resolved tile, ready for the display list.
///
/// Holds only the resource identifier (the cache filename, or
/// [`NO_DATA_IMAGE`]); the renderer owns the actual image resource and
/// creates it lazily by identifier. Placement fields are always populated,
/// even for placeholder tiles, because offset math must proceed regardless
/// of whether image data was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    /// Renderer resource identifier.
    pub image: String,
    /// Latitude of the tile center in degrees.
    pub latitude: f64,
    /// Longitude of the tile center in degrees.
    pub longitude: f64,
    /// Zoom level of the tile.
    pub zoom: u8,
    /// Tile X coordinate.
    pub x: u32,
    /// Tile Y coordinate.
    pub y: u32,
    /// Remaining fade-out frames; meaningful only on the easing list.
    pub age: u32,
}

impl TileRecord {
    /// Create a record for a tile with image data under the given identifier.
    pub fn new(key: TileKey, image: String) -> Self {
        let (latitude, longitude) = tile_center(&key);

        Self {
            image,
            latitude,
            longitude,
            zoom: key.zoom,
            x: key.x,
            y: key.y,
            age: 0,
        }
    }

    /// Create a "no data" placeholder record for a tile.
    pub fn placeholder(key: TileKey) -> Self {
        Self::new(key, NO_DATA_IMAGE.to_string())
    }

    /// Whether this record is a "no data" placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.image == NO_DATA_IMAGE
    }

    /// The tile key this record resolves.
    pub fn key(&self) -> TileKey {
        TileKey::new(self.x, self.y, self.zoom)
    }
}
