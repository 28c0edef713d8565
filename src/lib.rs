//! ascii-noise library crate.
//!
//! Renders a raster image as a block of characters that is re-drawn every
//! tick with a little random noise. The pieces, leaves first:
//!
//! - [`validate`] - predicates for settings values
//! - [`settings`] - global defaults and per-surface resolution
//! - [`ascii`] - rasterizer and frame compositor
//! - [`source`] / [`surface`] - where images come from and where frames go
//! - [`lifecycle`] - activation, deactivation and the per-surface tasks

pub mod ascii;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod settings;
pub mod source;
pub mod surface;
pub mod validate;

pub use error::{AcquisitionError, NoiseError};
pub use lifecycle::LifecycleManager;
pub use settings::{GlobalSettings, SettingsStore, SettingsUpdate, SurfaceSettings};
pub use surface::{Surface, SurfaceId};
