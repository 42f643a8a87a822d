//! Tile resolution
//!
//! Resolves a tile key that missed the in-memory cache: local disk first,
//! then the remote server, then a "no data" placeholder. Successful remote
//! fetches are written back to disk. A remote failure takes the server
//! offline for a fixed number of worker cycles before a single re-probe.
//!
//! Resolution is infallible from the caller's view; every failure mode
//! degrades to the placeholder and the render loop never stops for it.

use crate::coord::TileKey;
use crate::provider::TileServer;
use crate::store::{tile_path, TileStore};
use crate::tile::TileRecord;
use std::path::PathBuf;
use tracing::{debug, trace, warn};

/// Minimal integrity check on a fetched buffer: bytes 1-3 must spell `PNG`.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.len() > 3 && &bytes[1..4] == b"PNG"
}

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Whether the local disk store participates in resolution.
    pub disk_enabled: bool,
    /// Directory holding cached tile files.
    pub cache_dir: PathBuf,
    /// Whether the remote server participates in resolution.
    pub remote_enabled: bool,
    /// Worker cycles to wait after a remote failure before retrying.
    pub cooldown_cycles: u32,
}

/// Resolves cache misses against the disk store and remote server.
///
/// Owned by the coverage worker; all state is thread-local to it.
pub struct TileResolver<S: TileStore, P: TileServer> {
    store: S,
    server: P,
    config: ResolverConfig,
    online: bool,
    cooldown: u32,
}

impl<S: TileStore, P: TileServer> TileResolver<S, P> {
    /// Create a resolver. The remote source starts offline until marked
    /// online (normally after a successful capabilities probe).
    pub fn new(store: S, server: P, config: ResolverConfig) -> Self {
        Self {
            store,
            server,
            config,
            online: false,
            cooldown: 0,
        }
    }

    /// The underlying tile store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying tile server.
    pub fn server(&self) -> &P {
        &self.server
    }

    /// Mark the remote source online or offline.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    /// Whether the remote source is currently considered online.
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Start the offline cooldown window.
    pub fn arm_cooldown(&mut self) {
        self.online = false;
        self.cooldown = self.config.cooldown_cycles;
    }

    /// Advance the cooldown by one worker cycle; when it expires the remote
    /// source comes back online for a re-probe.
    pub fn tick_cooldown(&mut self) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            if self.cooldown == 0 {
                self.online = true;
                debug!(server = self.server.name(), "remote source cooldown expired");
            }
        }
    }

    /// Resolve a tile key to a record.
    ///
    /// Placement fields are filled in whatever the outcome; missing data
    /// yields a placeholder record rather than an error.
    pub fn resolve(&mut self, key: &TileKey) -> TileRecord {
        let path = tile_path(&self.config.cache_dir, key);

        if self.config.disk_enabled && self.store.exists(&path) {
            trace!(tile = %key, "resolved from disk");
            return TileRecord::new(*key, path.to_string_lossy().into_owned());
        }

        if self.config.remote_enabled && self.online {
            match self.server.fetch_tile(key.zoom, key.x, key.y) {
                Ok(bytes) if is_png(&bytes) => {
                    if self.config.disk_enabled {
                        if let Err(e) = self.store.write(&path, &bytes) {
                            warn!(tile = %key, error = %e, "tile disk write failed");
                        }
                    }
                    trace!(tile = %key, bytes = bytes.len(), "resolved from server");
                    return TileRecord::new(*key, path.to_string_lossy().into_owned());
                }
                Ok(_) => {
                    warn!(
                        tile = %key,
                        server = self.server.name(),
                        cooldown = self.config.cooldown_cycles,
                        "malformed tile payload, taking server offline"
                    );
                    self.arm_cooldown();
                }
                Err(e) => {
                    warn!(
                        tile = %key,
                        server = self.server.name(),
                        error = %e,
                        cooldown = self.config.cooldown_cycles,
                        "tile fetch failed, taking server offline"
                    );
                    self.arm_cooldown();
                }
            }
        }

        TileRecord::placeholder(*key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory tile store.
    #[derive(Default)]
    struct MemStore {
        files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    }

    impl MemStore {
        fn with_file(path: PathBuf) -> Self {
            let store = Self::default();
            store.files.lock().unwrap().insert(path, PNG.to_vec());
            store
        }
    }

    impl TileStore for MemStore {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }

        fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), bytes.to_vec());
            Ok(())
        }
    }

    /// Scripted tile server counting fetches.
    struct ScriptedServer {
        response: Result<Vec<u8>, ProviderError>,
        fetches: AtomicUsize,
    }

    impl ScriptedServer {
        fn returning(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                response,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl TileServer for ScriptedServer {
        fn fetch_tile(&self, _zoom: u8, _x: u32, _y: u32) -> Result<Vec<u8>, ProviderError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }

        fn fetch_capabilities(&self) -> Result<Vec<u8>, ProviderError> {
            Ok(b"<Capabilities/>".to_vec())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn config() -> ResolverConfig {
        ResolverConfig {
            disk_enabled: true,
            cache_dir: PathBuf::from("/cache"),
            remote_enabled: true,
            cooldown_cycles: 3,
        }
    }

    fn online_resolver(
        store: MemStore,
        server: ScriptedServer,
    ) -> TileResolver<MemStore, ScriptedServer> {
        let mut resolver = TileResolver::new(store, server, config());
        resolver.set_online(true);
        resolver
    }

    #[test]
    fn png_signature_check() {
        assert!(is_png(PNG));
        assert!(!is_png(b""));
        assert!(!is_png(b"PN"));
        assert!(!is_png(b"<html>not a tile</html>"));
    }

    #[test]
    fn disk_hit_short_circuits_remote_fetch() {
        let key = TileKey::new(1, 2, 10);
        let path = tile_path(Path::new("/cache"), &key);
        let resolver_store = MemStore::with_file(path.clone());
        let server = ScriptedServer::returning(Ok(PNG.to_vec()));
        let mut resolver = online_resolver(resolver_store, server);

        let record = resolver.resolve(&key);

        assert_eq!(record.image, path.to_string_lossy());
        assert_eq!(resolver.server.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remote_fetch_is_written_back_to_disk() {
        let key = TileKey::new(1, 2, 10);
        let path = tile_path(Path::new("/cache"), &key);
        let mut resolver = online_resolver(MemStore::default(), ScriptedServer::returning(Ok(PNG.to_vec())));

        let record = resolver.resolve(&key);

        assert!(!record.is_placeholder());
        assert_eq!(record.image, path.to_string_lossy());
        assert_eq!(resolver.store.read(&path).unwrap(), PNG.to_vec());
        assert!(resolver.is_online());
    }

    #[test]
    fn fetch_failure_degrades_to_placeholder_and_arms_cooldown() {
        let key = TileKey::new(1, 2, 10);
        let mut resolver = online_resolver(
            MemStore::default(),
            ScriptedServer::returning(Err(ProviderError::Http("timeout".into()))),
        );

        let record = resolver.resolve(&key);

        assert!(record.is_placeholder());
        assert!(!resolver.is_online());
        assert_eq!(resolver.server.fetches.load(Ordering::SeqCst), 1);

        // While offline no further fetches are attempted.
        let record = resolver.resolve(&key);
        assert!(record.is_placeholder());
        assert_eq!(resolver.server.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn malformed_payload_counts_as_fetch_failure() {
        let key = TileKey::new(1, 2, 10);
        let mut resolver = online_resolver(
            MemStore::default(),
            ScriptedServer::returning(Ok(b"<html>rate limited</html>".to_vec())),
        );

        let record = resolver.resolve(&key);

        assert!(record.is_placeholder());
        assert!(!resolver.is_online());
        assert!(!resolver.store.exists(&tile_path(Path::new("/cache"), &key)));
    }

    #[test]
    fn cooldown_expiry_brings_server_back_online() {
        let mut resolver = online_resolver(
            MemStore::default(),
            ScriptedServer::returning(Err(ProviderError::Http("down".into()))),
        );

        resolver.resolve(&TileKey::new(1, 2, 10));
        assert!(!resolver.is_online());

        resolver.tick_cooldown();
        resolver.tick_cooldown();
        assert!(!resolver.is_online());
        resolver.tick_cooldown();
        assert!(resolver.is_online());
    }

    #[test]
    fn tick_without_cooldown_is_a_noop() {
        let mut resolver = online_resolver(
            MemStore::default(),
            ScriptedServer::returning(Ok(PNG.to_vec())),
        );

        resolver.tick_cooldown();
        assert!(resolver.is_online());
    }

    #[test]
    fn disabled_remote_never_fetches() {
        let key = TileKey::new(1, 2, 10);
        let mut resolver = TileResolver::new(
            MemStore::default(),
            ScriptedServer::returning(Ok(PNG.to_vec())),
            ResolverConfig {
                remote_enabled: false,
                ..config()
            },
        );
        resolver.set_online(true);

        let record = resolver.resolve(&key);

        assert!(record.is_placeholder());
        assert_eq!(resolver.server.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn disabled_disk_skips_existence_check_and_write_back() {
        let key = TileKey::new(1, 2, 10);
        let path = tile_path(Path::new("/cache"), &key);
        let mut resolver = TileResolver::new(
            MemStore::with_file(path.clone()),
            ScriptedServer::returning(Ok(PNG.to_vec())),
            ResolverConfig {
                disk_enabled: false,
                ..config()
            },
        );
        resolver.set_online(true);

        let record = resolver.resolve(&key);

        // Fetched from the server despite the file being present.
        assert_eq!(resolver.server.fetches.load(Ordering::SeqCst), 1);
        assert!(!record.is_placeholder());
    }

    #[test]
    fn placeholder_still_has_placement_fields() {
        let key = TileKey::new(512, 512, 10);
        let mut resolver = TileResolver::new(
            MemStore::default(),
            ScriptedServer::returning(Err(ProviderError::Http("down".into()))),
            ResolverConfig {
                remote_enabled: false,
                disk_enabled: false,
                ..config()
            },
        );

        let record = resolver.resolve(&key);

        assert!(record.is_placeholder());
        assert_eq!(record.key(), key);
        assert!(record.latitude.abs() < 1.0);
        assert!(record.longitude.abs() < 1.0);
    }
}
