//! Surface that draws frames straight to the terminal.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::watch;

use super::{Surface, SurfaceId};
use crate::ascii::{CELL_HEIGHT, CELL_WIDTH};

/// Clear screen and move the cursor home.
const CLEAR_AND_HOME: &str = "\x1b[2J\x1b[H";

/// A fixed-width terminal region, sized in character cells.
///
/// The pixel size reported to the renderer is the cell count times the cell
/// size, so one rendered character maps to one terminal column.
pub struct TerminalSurface {
    id: SurfaceId,
    width: u32,
    height: Mutex<(u32, Option<u32>)>,
    attributes: HashMap<String, String>,
    width_tx: watch::Sender<u32>,
    frames: AtomicU64,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, attributes: HashMap<String, String>) -> Self {
        let width = cols as u32 * CELL_WIDTH;
        let (width_tx, _) = watch::channel(width);
        Self {
            id: SurfaceId::fresh(),
            width,
            height: Mutex::new((rows as u32 * CELL_HEIGHT, None)),
            attributes,
            width_tx,
            frames: AtomicU64::new(0),
        }
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

impl Surface for TerminalSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn client_width(&self) -> u32 {
        self.width
    }

    fn client_height(&self) -> u32 {
        let (natural, forced) = *self.height.lock().unwrap_or_else(|e| e.into_inner());
        forced.unwrap_or(natural)
    }

    fn set_height(&self, height: Option<u32>) {
        self.height.lock().unwrap_or_else(|e| e.into_inner()).1 = height;
    }

    fn set_text(&self, text: Option<String>) {
        let mut stdout = std::io::stdout().lock();
        let result = match text {
            Some(frame) => {
                self.frames.fetch_add(1, Ordering::Relaxed);
                write!(stdout, "{}{}", CLEAR_AND_HOME, frame)
            }
            None => write!(stdout, "{}", CLEAR_AND_HOME),
        }
        .and_then(|_| stdout.flush());
        if let Err(e) = result {
            log::warn!("Failed to write frame to terminal: {}", e);
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn width_changes(&self) -> watch::Receiver<u32> {
        self.width_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size_follows_cells() {
        let surface = TerminalSurface::new(80, 24, HashMap::new());
        assert_eq!(surface.client_width(), 80 * CELL_WIDTH);
        assert_eq!(surface.client_height(), 24 * CELL_HEIGHT);
    }

    #[test]
    fn test_forced_height() {
        let surface = TerminalSurface::new(10, 10, HashMap::new());
        surface.set_height(Some(30));
        assert_eq!(surface.client_height(), 30);
        surface.set_height(None);
        assert_eq!(surface.client_height(), 10 * CELL_HEIGHT);
    }

    #[test]
    fn test_attributes_from_construction() {
        let mut attrs = HashMap::new();
        attrs.insert("letters".to_string(), "01".to_string());
        let surface = TerminalSurface::new(10, 10, attrs);
        assert_eq!(surface.attribute("letters").as_deref(), Some("01"));
        assert_eq!(surface.attribute("words"), None);
    }
}
