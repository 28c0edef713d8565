//! Display surfaces that frames are rendered into.
//!
//! A surface is anything with a pixel size, a settable height, a settable
//! text body and a set of string attributes. The lifecycle manager only talks
//! to surfaces through the [`Surface`] trait:
//!
//! - [`MemorySurface`] - headless surface for tests and embedders
//! - [`TerminalSurface`] - redraws stdout on every frame

mod memory;
mod terminal;

pub use memory::MemorySurface;
pub use terminal::TerminalSurface;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Identity of a surface within a lifecycle manager's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1 << 32);

impl SurfaceId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate an id that no other call to `fresh` has returned.
    ///
    /// Fresh ids start at 2^32 so they don't collide with small hand-picked ids.
    pub fn fresh() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Accessor contract for a display surface.
///
/// Implementations must be cheap to call from the render tasks; every method
/// takes `&self` so a surface can be shared behind an `Arc`.
pub trait Surface: Send + Sync {
    /// Stable identity of this surface.
    fn id(&self) -> SurfaceId;

    /// Current rendered width in pixels.
    fn client_width(&self) -> u32;

    /// Current rendered height in pixels (the forced height when one is set).
    fn client_height(&self) -> u32;

    /// Force the surface height, or clear the forced height with `None`.
    fn set_height(&self, height: Option<u32>);

    /// Replace the text body, or clear it with `None`.
    fn set_text(&self, text: Option<String>);

    /// Look up a per-surface override.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Receiver that observes every change of the surface width.
    fn width_changes(&self) -> watch::Receiver<u32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_id_display() {
        assert_eq!(format!("{}", SurfaceId::new(3)), "#3");
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = SurfaceId::fresh();
        let b = SurfaceId::fresh();
        assert_ne!(a, b);
        assert!(a.raw() >= 1 << 32);
    }
}
