//! Remote tile source traits and errors.

use thiserror::Error;

/// Errors from remote tile source operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response data was not usable
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A remote tile server.
///
/// Implementors fetch raster tiles (PNG buffers) and the server's
/// capabilities document. Failures are ordinary results; the resolver, not
/// the server, decides retry and cooldown policy.
pub trait TileServer: Send {
    /// Fetch the raw tile buffer for a tile.
    fn fetch_tile(&self, zoom: u8, x: u32, y: u32) -> Result<Vec<u8>, ProviderError>;

    /// Fetch the server's capabilities document.
    ///
    /// Used once at startup to probe server availability.
    fn fetch_capabilities(&self) -> Result<Vec<u8>, ProviderError>;

    /// Server name for logging and identification.
    fn name(&self) -> &str;
}
