//! Remote tile source abstraction
//!
//! Traits and implementations for fetching map tiles from a remote server.
//! HTTP transport sits behind the [`HttpClient`] trait so tests run without
//! a network.

mod http;
mod types;
mod wmts;

pub use http::{HttpClient, ReqwestClient};
pub use types::{ProviderError, TileServer};
pub use wmts::WmtsServer;
