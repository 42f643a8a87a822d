//! Coverage-list generation
//!
//! Produces the ordered list of tiles needed to cover a viewport: the center
//! tile first, then concentric rings walked outward until the viewport's
//! coverage radius is met or the walk leaves the tile grid. Ring ordering
//! matters because resolution can be expensive; nearer tiles resolve first.

use crate::coord::{tile_x, tile_y, TileKey, TILE_SIZE_PIX};

/// Ring walk directions: up, left, down, right. Each leg is `2 * ring` steps,
/// tracing the ring perimeter clockwise from just past the top-right corner.
const WALKS: [(i64, i64); 4] = [(0, -1), (-1, 0), (0, 1), (1, 0)];

/// Generates the coverage list for a viewport.
///
/// `scale_x` is the horizontal draw scale from the zoom selector and
/// `coverage_radius_pix` the distance from the map center that must be
/// covered. Output order is deterministic for fixed inputs: center tile,
/// then each ring clockwise.
///
/// Rings are truncated, not wrapped, at the grid boundary: the walk ends the
/// moment a coordinate leaves `[0, 2^zoom)`. Below zoom 2 only the center
/// tile is returned, since the grid is too small to ring.
pub fn coverage_list(
    center_lat: f64,
    center_lon: f64,
    zoom: u8,
    scale_x: f64,
    coverage_radius_pix: f64,
) -> Vec<TileKey> {
    let max_tiles = 1i64 << zoom;
    let x0 = tile_x(center_lon, zoom);
    let y0 = tile_y(center_lat, zoom);

    let mut keys = Vec::new();
    keys.push(TileKey::new(x0 as u32, y0 as u32, zoom));

    if zoom < 2 {
        return keys;
    }

    let mut x = x0;
    let mut y = y0;
    let mut ring = 1i64;

    loop {
        // step to the ring's start corner, one tile past top-right
        x += 1;
        y += 1;
        if x >= max_tiles || y >= max_tiles {
            return keys;
        }

        for (dx, dy) in WALKS {
            for _ in 0..2 * ring {
                x += dx;
                y += dy;
                if x < 0 || y < 0 || x >= max_tiles || y >= max_tiles {
                    return keys;
                }
                keys.push(TileKey::new(x as u32, y as u32, zoom));
            }
        }

        let ring_span_pix = (2 * ring + 1) as f64 * TILE_SIZE_PIX as f64 * 0.5 * scale_x;
        if ring_span_pix > coverage_radius_pix {
            return keys;
        }

        ring += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_zero_returns_only_the_world_tile() {
        let keys = coverage_list(40.0, -74.0, 0, 1.0, 10.0);
        assert_eq!(keys, vec![TileKey::new(0, 0, 0)]);
    }

    #[test]
    fn zoom_one_returns_only_the_center_tile() {
        let keys = coverage_list(40.0, -74.0, 1, 1.0, 10_000.0);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0], TileKey::new(0, 0, 1));
    }

    #[test]
    fn center_tile_comes_first() {
        let keys = coverage_list(40.7128, -74.0060, 16, 1.0, 400.0);
        assert_eq!(keys[0], TileKey::new(19295, 24640, 16));
    }

    #[test]
    fn first_ring_walks_clockwise_from_top_right() {
        // Small radius: the first ring completes, then the span check stops
        // the walk (3 tiles * 256 px * 0.5 = 384 > 300).
        let keys = coverage_list(40.7128, -74.0060, 16, 1.0, 300.0);
        let (x0, y0) = (19295u32, 24640u32);

        let expected = vec![
            TileKey::new(x0, y0, 16),
            // up the right edge
            TileKey::new(x0 + 1, y0, 16),
            TileKey::new(x0 + 1, y0 - 1, 16),
            // left along the top
            TileKey::new(x0, y0 - 1, 16),
            TileKey::new(x0 - 1, y0 - 1, 16),
            // down the left edge
            TileKey::new(x0 - 1, y0, 16),
            TileKey::new(x0 - 1, y0 + 1, 16),
            // right along the bottom, ending on the start corner
            TileKey::new(x0, y0 + 1, 16),
            TileKey::new(x0 + 1, y0 + 1, 16),
        ];
        assert_eq!(keys, expected);
    }

    #[test]
    fn ring_count_tracks_coverage_radius() {
        // Each completed ring spans (2r+1)*256*0.5 pixels; radius 700 needs
        // rings 1 and 2 (384, 640) and stops after ring 3 (896).
        let keys = coverage_list(0.0, 0.0, 10, 1.0, 700.0);
        let rings = 3;
        let expected_len = (1..=rings).map(|r| 8 * r).sum::<usize>() + 1;
        assert_eq!(keys.len(), expected_len);
    }

    #[test]
    fn larger_horizontal_scale_needs_fewer_rings() {
        let narrow = coverage_list(0.0, 0.0, 10, 1.0, 700.0);
        let wide = coverage_list(0.0, 0.0, 10, 2.0, 700.0);
        assert!(wide.len() < narrow.len());
    }

    #[test]
    fn coverage_list_is_deterministic() {
        let a = coverage_list(51.5074, -0.1278, 12, 0.8, 900.0);
        let b = coverage_list(51.5074, -0.1278, 12, 0.8, 900.0);
        assert_eq!(a, b);
    }

    #[test]
    fn no_duplicate_keys_within_a_list() {
        let keys = coverage_list(51.5074, -0.1278, 12, 1.0, 1200.0);
        let mut seen = std::collections::HashSet::new();
        for key in &keys {
            assert!(seen.insert(*key), "duplicate key {key}");
        }
    }

    #[test]
    fn grid_corner_truncates_without_out_of_range_keys() {
        // Center in the north-west grid corner at zoom 3.
        let keys = coverage_list(84.0, -179.0, 3, 1.0, 100_000.0);
        let max = 1u32 << 3;

        assert_eq!(keys[0], TileKey::new(0, 0, 3));
        for key in &keys {
            assert!(key.x < max && key.y < max, "key off grid: {key}");
        }
    }

    #[test]
    fn grid_east_edge_truncates_without_wrapping() {
        // Center tile on the last column: the ring's corner step leaves the
        // grid immediately, so only the center is emitted.
        let keys = coverage_list(0.0, 179.9, 4, 1.0, 100_000.0);
        assert_eq!(keys, vec![TileKey::new(15, 8, 4)]);
    }

    #[test]
    fn north_edge_truncates_mid_ring() {
        // Latitude 80 is tile row 1 at zoom 4. Ring 1 completes; ring 2's
        // upward leg walks past row 0 and ends the list mid-ring.
        let keys = coverage_list(80.0, 0.0, 4, 1.0, 100_000.0);
        let max = 1u32 << 4;

        assert_eq!(keys[0], TileKey::new(8, 1, 4));
        assert_eq!(keys.len(), 12);
        assert_eq!(*keys.last().unwrap(), TileKey::new(10, 0, 4));
        for key in &keys {
            assert!(key.x < max && key.y < max, "key off grid: {key}");
        }
    }
}
