//! Surface lifecycle management.
//!
//! [`LifecycleManager`] tracks every active surface together with the two
//! tasks that keep it animated:
//!
//! 1. a **ticker** that re-renders the frame at the surface's interval
//! 2. a **width observer** that keeps the surface height locked to the
//!    image's aspect ratio
//!
//! Both tasks share one per-surface lock around the render state, so a
//! resize never interleaves with a frame write. The ticker also checks the
//! surface width itself and relocks first if the observer has not caught up. Deactivation flips the
//! state's `active` flag under that lock before clearing the surface, which
//! stops any callback that is already running from writing afterwards.

use futures_util::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ascii::{
    compose, grid_dimensions, locked_height, rasterize, MutationPolicy, RasterImage,
};
use crate::error::{AcquisitionError, NoiseError};
use crate::settings::{SettingsStore, SurfaceSettings};
use crate::source::{ImageRequest, ImageSource};
use crate::surface::{Surface, SurfaceId};

/// Shortest tick interval; a zero interval would spin.
pub const MIN_TICK_INTERVAL_MS: u64 = 1;

/// Render state shared by a surface's ticker and width observer.
#[derive(Debug)]
struct RenderState {
    active: bool,
    /// Text of the last frame. Cleared on resize so the next frame redraws
    /// every cell.
    previous: Option<String>,
    /// Width the forced height was last locked for.
    width: u32,
}

impl RenderState {
    fn new(width: u32) -> Self {
        Self {
            active: true,
            previous: None,
            width,
        }
    }

    /// Lock the surface height for `width` and drop the previous frame.
    fn relock(&mut self, surface: &dyn Surface, aspect: f64, width: u32) {
        let height = locked_height(width, aspect);
        log::debug!(
            "Surface {} resized to width {}, locking height to {}",
            surface.id(),
            width,
            height
        );
        surface.set_height(Some(height));
        self.width = width;
        self.previous = None;
    }
}

type SharedState = Arc<Mutex<RenderState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, RenderState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Resources owned on behalf of one active surface.
struct SurfaceRuntime {
    surface: Arc<dyn Surface>,
    state: SharedState,
    ticker: JoinHandle<()>,
    observer: JoinHandle<()>,
}

impl SurfaceRuntime {
    /// Stop both tasks and clear the surface.
    fn shutdown(self) {
        let mut state = lock(&self.state);
        state.active = false;
        state.previous = None;
        self.ticker.abort();
        self.observer.abort();
        self.surface.set_text(None);
        self.surface.set_height(None);
    }
}

/// Per-surface frame renderer driven by the ticker task.
struct Renderer {
    surface: Arc<dyn Surface>,
    image: RasterImage,
    aspect: f64,
    letters: String,
    words: Vec<String>,
    policy: MutationPolicy,
    rng: StdRng,
    state: SharedState,
}

impl Renderer {
    /// Render and write one frame. Returns false once the surface is inactive.
    fn tick(&mut self) -> bool {
        let mut state = lock(&self.state);
        if !state.active {
            return false;
        }

        let width = self.surface.client_width();
        if width != state.width {
            state.relock(self.surface.as_ref(), self.aspect, width);
        }

        let (cols, rows) = grid_dimensions(width, self.surface.client_height());
        match rasterize(&self.image, cols, rows) {
            Ok(grid) => {
                let frame = compose(
                    &grid,
                    &self.letters,
                    &self.words,
                    state.previous.as_deref(),
                    &self.policy,
                    &mut self.rng,
                );
                self.surface.set_text(Some(frame.clone()));
                state.previous = Some(frame);
            }
            Err(e) => {
                log::error!("Tick failed for surface {}: {}", self.surface.id(), e);
            }
        }
        true
    }
}

async fn run_ticker(mut renderer: Renderer, interval_ms: u64) {
    let period = Duration::from_millis(interval_ms.max(MIN_TICK_INTERVAL_MS));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if !renderer.tick() {
            break;
        }
    }
}

async fn run_width_observer(
    surface: Arc<dyn Surface>,
    aspect: f64,
    state: SharedState,
    mut widths: watch::Receiver<u32>,
) {
    while widths.changed().await.is_ok() {
        let width = *widths.borrow_and_update();

        let mut guard = lock(&state);
        if !guard.active {
            break;
        }
        if width != guard.width {
            guard.relock(surface.as_ref(), aspect, width);
        }
    }
}

/// Registry of active surfaces and their animation tasks.
///
/// Must be used from within a tokio runtime; activation spawns tasks.
pub struct LifecycleManager {
    settings: SettingsStore,
    source: Arc<dyn ImageSource>,
    policy: MutationPolicy,
    seed: Option<u64>,
    registry: Mutex<HashMap<SurfaceId, SurfaceRuntime>>,
}

impl LifecycleManager {
    /// Create a manager reading defaults from `settings` and images from `source`.
    pub fn new(settings: SettingsStore, source: Arc<dyn ImageSource>) -> Self {
        Self {
            settings,
            source,
            policy: MutationPolicy::default(),
            seed: None,
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Use custom mutation probabilities for surfaces activated from now on.
    pub fn with_policy(mut self, policy: MutationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Seed the per-surface random sources (each surface mixes in its id).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The settings store new activations read from.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<SurfaceId, SurfaceRuntime>> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_active(&self, id: SurfaceId) -> bool {
        self.registry().contains_key(&id)
    }

    /// Ids of all active surfaces, sorted.
    pub fn active_ids(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = self.registry().keys().copied().collect();
        ids.sort();
        ids
    }

    fn rng_for(&self, id: SurfaceId) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ id.raw()),
            None => StdRng::from_entropy(),
        }
    }

    /// Start animating `surface`.
    ///
    /// Does nothing if the surface is already active. Otherwise resolves and
    /// validates its settings, acquires the image, locks the height to the
    /// aspect ratio and starts the ticker and width observer. Nothing is
    /// registered if any step fails.
    pub async fn activate(&self, surface: Arc<dyn Surface>) -> Result<SurfaceId, NoiseError> {
        let id = surface.id();
        if self.is_active(id) {
            log::debug!("Surface {} already active", id);
            return Ok(id);
        }

        let settings = SurfaceSettings::resolve(&self.settings.snapshot(), surface.as_ref())
            .inspect_err(|_| log::warn!("Surface {} has invalid settings", id))?;
        let image = self.source.acquire(&ImageRequest::from(&settings)).await?;
        let aspect = match settings.aspect_ratio.or_else(|| image.aspect_ratio()) {
            Some(aspect) => aspect,
            None => {
                return Err(AcquisitionError::Empty {
                    width: image.width(),
                    height: image.height(),
                }
                .into())
            }
        };

        let mut registry = self.registry();
        // Another activation of the same surface may have finished while we
        // were waiting for the image
        if registry.contains_key(&id) {
            return Ok(id);
        }

        let mut widths = surface.width_changes();
        let width = *widths.borrow_and_update();
        surface.set_height(Some(locked_height(width, aspect)));
        let state: SharedState = Arc::new(Mutex::new(RenderState::new(width)));

        let observer = tokio::spawn(run_width_observer(
            Arc::clone(&surface),
            aspect,
            Arc::clone(&state),
            widths,
        ));
        let renderer = Renderer {
            surface: Arc::clone(&surface),
            image,
            aspect,
            letters: settings.letters,
            words: settings.words,
            policy: self.policy,
            rng: self.rng_for(id),
            state: Arc::clone(&state),
        };
        let ticker = tokio::spawn(run_ticker(renderer, settings.tick_interval_ms));

        registry.insert(
            id,
            SurfaceRuntime {
                surface,
                state,
                ticker,
                observer,
            },
        );
        log::info!(
            "Activated surface {} (aspect {:.3}, every {}ms)",
            id,
            aspect,
            settings.tick_interval_ms
        );
        Ok(id)
    }

    /// Stop animating a surface and clear its text and forced height.
    pub fn deactivate(&self, id: SurfaceId) -> Result<(), NoiseError> {
        let runtime = self
            .registry()
            .remove(&id)
            .ok_or(NoiseError::NotActive(id))?;
        runtime.shutdown();
        log::info!("Deactivated surface {}", id);
        Ok(())
    }

    /// Deactivate every tracked surface.
    ///
    /// Every surface is attempted; the first error is returned.
    pub fn deactivate_all(&self) -> Result<(), NoiseError> {
        let mut first_error = None;
        for id in self.active_ids() {
            if let Err(e) = self.deactivate(id) {
                log::warn!("Failed to deactivate surface {}: {}", id, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Activate every given surface concurrently.
    ///
    /// Every activation runs to completion; the first error is returned and
    /// surfaces that did activate stay active.
    pub async fn activate_all<I>(&self, surfaces: I) -> Result<Vec<SurfaceId>, NoiseError>
    where
        I: IntoIterator<Item = Arc<dyn Surface>>,
    {
        let results = join_all(surfaces.into_iter().map(|s| self.activate(s))).await;
        for e in results.iter().filter_map(|r| r.as_ref().err()) {
            log::warn!("Surface activation failed: {}", e);
        }
        results.into_iter().collect()
    }

    /// Restart every tracked surface so it picks up the current global settings.
    pub async fn resynchronize(&self) -> Result<(), NoiseError> {
        let surfaces: Vec<Arc<dyn Surface>> = {
            let registry = self.registry();
            let mut entries: Vec<_> = registry.iter().collect();
            entries.sort_by_key(|(id, _)| **id);
            entries
                .into_iter()
                .map(|(_, runtime)| Arc::clone(&runtime.surface))
                .collect()
        };
        log::info!("Resynchronizing {} surface(s)", surfaces.len());

        self.deactivate_all()?;
        self.activate_all(surfaces).await?;
        Ok(())
    }
}

impl Drop for LifecycleManager {
    fn drop(&mut self) {
        for (_, runtime) in self.registry().drain() {
            runtime.ticker.abort();
            runtime.observer.abort();
        }
    }
}
