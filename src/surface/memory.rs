//! Headless in-memory surface.

use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

use super::{Surface, SurfaceId};

#[derive(Debug)]
struct State {
    width: u32,
    natural_height: u32,
    forced_height: Option<u32>,
    text: Option<String>,
    attributes: HashMap<String, String>,
}

/// A surface that keeps its text and size in memory.
///
/// The client height reports the forced height while one is set, like a
/// layout engine honouring an explicit `height` style.
#[derive(Debug)]
pub struct MemorySurface {
    id: SurfaceId,
    state: Mutex<State>,
    width_tx: watch::Sender<u32>,
    frames_tx: watch::Sender<u64>,
}

impl MemorySurface {
    /// Create a surface with a fresh id and the given natural pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_id(SurfaceId::fresh(), width, height)
    }

    /// Create a surface with an explicit id. Two surfaces sharing an id are
    /// treated as the same surface by the lifecycle manager.

    pub fn with_id(id: SurfaceId, width: u32, height: u32) -> Self {
        let (width_tx, _) = watch::channel(width);
        let (frames_tx, _) = watch::channel(0);
        Self {
            id,
            state: Mutex::new(State {
                width,
                natural_height: height,
                forced_height: None,
                text: None,
                attributes: HashMap::new(),
            }),
            width_tx,
            frames_tx,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.state()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.state().attributes.remove(name);
    }

    /// Change the natural size. Observers are notified of the new width.
    pub fn resize(&self, width: u32, height: u32) {
        {
            let mut state = self.state();
            state.width = width;
            state.natural_height = height;
        }
        self.width_tx.send_replace(width);
    }

    /// The last text written, if any.
    pub fn text(&self) -> Option<String> {
        self.state().text.clone()
    }

    /// The forced height, if any.
    pub fn forced_height(&self) -> Option<u32> {
        self.state().forced_height
    }

    /// Number of frames written so far.
    pub fn frames(&self) -> u64 {
        *self.frames_tx.borrow()
    }

    /// Receiver that changes every time a frame is written.
    pub fn frame_updates(&self) -> watch::Receiver<u64> {
        self.frames_tx.subscribe()
    }
}

impl Surface for MemorySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn client_width(&self) -> u32 {
        self.state().width
    }

    fn client_height(&self) -> u32 {
        let state = self.state();
        state.forced_height.unwrap_or(state.natural_height)
    }

    fn set_height(&self, height: Option<u32>) {
        self.state().forced_height = height;
    }

    fn set_text(&self, text: Option<String>) {
        let written = text.is_some();
        self.state().text = text;
        if written {
            self.frames_tx.send_modify(|n| *n += 1);
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.state().attributes.get(name).cloned()
    }

    fn width_changes(&self) -> watch::Receiver<u32> {
        self.width_tx.subscribe()
    }
}
