//! Image-to-text rendering.
//!
//! Every tick a frame goes through two stages:
//!
//! 1. **Rasterization** - resample the source image to the character grid and
//!    mark each cell filled (dark and opaque) or empty
//! 2. **Composition** - emit one character per cell, reusing the previous
//!    frame's characters and redrawing a random fraction of them
//!
//! Cell geometry lives in [`dimensions`]: a character cell is
//! [`CELL_WIDTH`] x [`CELL_HEIGHT`] pixels.

mod compositor;
mod dimensions;
mod grid;
mod raster;

pub use compositor::{compose, MutationPolicy, DEFAULT_REPLACE_CHANCE, DEFAULT_WORD_CHANCE};
pub use dimensions::{grid_dimensions, locked_height, CELL_HEIGHT, CELL_WIDTH};
pub use grid::CharacterGrid;
pub use raster::{is_filled, rasterize, RasterImage, DARKNESS_THRESHOLD, OPACITY_THRESHOLD};
