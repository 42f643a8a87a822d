//! Display publisher
//!
//! The renderer-facing read side of the engine. Once per render frame the
//! publisher copies the published tile lists out from under the shared lock,
//! realizes image resources through the renderer's texture registry, ages
//! the easing entries, and releases resources for trashed tiles.
//!
//! Resource creation and teardown happen here, never on the worker thread,
//! because both need the rendering context.

use crate::tile::TileRecord;
use crate::viewport::Shared;

/// Renderer-owned image resource registry, keyed by tile resource
/// identifier. Repeated identifiers share one resource.
pub trait TextureRegistry {
    /// Opaque renderer resource handle.
    type Handle;

    /// Look up the resource for an identifier, creating it on first use.
    /// Returns `None` when the resource cannot be realized.
    fn get_or_create(&mut self, image: &str) -> Option<&Self::Handle>;

    /// Release the resource for an identifier. Returns whether a resource
    /// was actually released.
    fn release(&mut self, image: &str) -> bool;
}

/// Tile lists for one render frame.
///
/// Display tiles are drawn as-is, whatever their zoom level; easing tiles
/// are drawn on top at [`FrameSet::opacity`] while they fade out.
#[derive(Debug, Clone)]
pub struct FrameSet {
    /// Tiles currently in view.
    pub display: Vec<TileRecord>,
    /// Previous-zoom tiles still fading out.
    pub easing: Vec<TileRecord>,
    easing_frames: u32,
}

impl FrameSet {
    /// Fade opacity for an easing tile, in `(0, 1]`.
    pub fn opacity(&self, tile: &TileRecord) -> f32 {
        tile.age as f32 / self.easing_frames.max(1) as f32
    }

    /// Configured fade-out length in frames.
    pub fn easing_frames(&self) -> u32 {
        self.easing_frames
    }
}

/// Renderer-facing view over the shared tile lists.
pub struct DisplayPublisher {
    shared: Shared,
    easing_frames: u32,
}

impl DisplayPublisher {
    pub(crate) fn new(shared: Shared, easing_frames: u32) -> Self {
        Self {
            shared,
            easing_frames,
        }
    }

    /// Run one render frame's worth of list maintenance.
    ///
    /// Under the lock: decrement easing ages, drop spent entries, copy the
    /// display and easing lists, and take the trash list. Outside the lock:
    /// realize resources for every visible tile and release resources for
    /// trashed ones.
    pub fn frame<R: TextureRegistry>(&self, registry: &mut R) -> FrameSet {
        let (display, easing, trash) = {
            let mut state = self.shared.lock().unwrap();

            for tile in state.easing.iter_mut() {
                tile.age = tile.age.saturating_sub(1);
            }
            state.easing.retain(|tile| tile.age > 0);

            (
                state.display.clone(),
                state.easing.clone(),
                std::mem::take(&mut state.trash),
            )
        };

        for tile in display.iter().chain(easing.iter()) {
            let _ = registry.get_or_create(&tile.image);
        }
        for tile in &trash {
            registry.release(&tile.image);
        }

        FrameSet {
            display,
            easing,
            easing_frames: self.easing_frames,
        }
    }
}
