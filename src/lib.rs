//! Tilescape - tile coverage and caching engine for slippy-map rendering
//!
//! This library computes which Web-Mercator map tiles are visible for a
//! viewport, resolves each tile from a bounded in-memory cache, a local disk
//! store, or a remote tile server, and publishes render-ready tile lists to
//! the drawing thread without ever blocking it.
//!
//! # High-Level API
//!
//! For most use cases, the [`map`] module provides the owning facade:
//!
//! ```ignore
//! use tilescape::config::MapConfig;
//! use tilescape::map::TileMap;
//!
//! let config = MapConfig::default().with_remote("http://tiles.example.net:8080");
//! let mut map = TileMap::open(config)?;
//!
//! map.set_center(40.7128, -74.0060);
//! map.set_scale_factor(35_000.0);
//!
//! // each render frame:
//! map.update();
//! let frame = map.frame(&mut registry);
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod coverage;
pub mod logging;
pub mod map;
pub mod provider;
pub mod publisher;
pub mod resolver;
pub mod store;
pub mod tile;
pub mod viewport;
pub mod worker;
pub mod zoom;

/// Version of the tilescape library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
