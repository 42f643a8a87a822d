//! WMTS-style tile server.
//!
//! Fetches map tiles from a WMTS endpoint serving the basic-preview style:
//!
//! - Tiles: `{base}/styles/basic-preview/256/{zoom}/{x}/{y}.png`
//! - Capabilities: `{base}/styles/basic-preview/wmts.xml`

use super::http::HttpClient;
use super::types::{ProviderError, TileServer};

/// Tile server speaking the WMTS basic-preview URL scheme.
pub struct WmtsServer<C: HttpClient> {
    base_url: String,
    http_client: C,
}

impl<C: HttpClient> WmtsServer<C> {
    /// Creates a new server for the given base URL.
    ///
    /// A trailing slash on the base URL is tolerated and stripped.
    pub fn new(base_url: impl Into<String>, http_client: C) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            http_client,
        }
    }

    fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        format!(
            "{}/styles/basic-preview/256/{}/{}/{}.png",
            self.base_url, zoom, x, y
        )
    }

    fn capabilities_url(&self) -> String {
        format!("{}/styles/basic-preview/wmts.xml", self.base_url)
    }
}

impl<C: HttpClient> TileServer for WmtsServer<C> {
    fn fetch_tile(&self, zoom: u8, x: u32, y: u32) -> Result<Vec<u8>, ProviderError> {
        self.http_client.get(&self.tile_url(zoom, x, y))
    }

    fn fetch_capabilities(&self) -> Result<Vec<u8>, ProviderError> {
        self.http_client.get(&self.capabilities_url())
    }

    fn name(&self) -> &str {
        "wmts"
    }
}
