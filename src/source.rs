//! Image sources: where the raster image for a surface comes from.
//!
//! Turning text into an image is not this crate's job. The lifecycle manager
//! hands an [`ImageRequest`] to an [`ImageSource`] and only relies on the
//! decoded pixels it gets back.

use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};

use crate::ascii::RasterImage;
use crate::error::AcquisitionError;
use crate::settings::{FontWeight, SurfaceSettings};

/// Validated parameters describing the image to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub text: String,
    pub font_family: String,
    pub font_weight: FontWeight,
}

impl From<&SurfaceSettings> for ImageRequest {
    fn from(settings: &SurfaceSettings) -> Self {
        Self {
            text: settings.text.clone(),
            font_family: settings.font_family.clone(),
            font_weight: settings.font_weight,
        }
    }
}

/// Provider of decoded raster images.
pub trait ImageSource: Send + Sync {
    /// Produce the image for `request`.
    fn acquire<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> BoxFuture<'a, Result<RasterImage, AcquisitionError>>;
}

/// Loads a pre-rendered image file, whatever the request says.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImageSource {
    fn acquire<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> BoxFuture<'a, Result<RasterImage, AcquisitionError>> {
        log::debug!("Loading {:?} for text {:?}", self.path, request.text);
        Box::pin(load_file(self.path.clone()))
    }
}

async fn load_file(path: PathBuf) -> Result<RasterImage, AcquisitionError> {
    // Decoding is CPU bound, keep it off the async workers
    let decoded = tokio::task::spawn_blocking(move || image::open(path)).await??;
    let pixels = decoded.to_rgba8();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(AcquisitionError::Empty {
            width: pixels.width(),
            height: pixels.height(),
        });
    }
    Ok(RasterImage::new(pixels))
}

/// Hands out a copy of one in-memory image.
#[derive(Debug, Clone)]
pub struct StaticImageSource {
    image: RasterImage,
}

impl StaticImageSource {
    pub fn new(image: RasterImage) -> Self {
        Self { image }
    }
}

impl ImageSource for StaticImageSource {
    fn acquire<'a>(
        &'a self,
        _request: &'a ImageRequest,
    ) -> BoxFuture<'a, Result<RasterImage, AcquisitionError>> {
        Box::pin(async move {
            if self.image.aspect_ratio().is_none() {
                return Err(AcquisitionError::Empty {
                    width: self.image.width(),
                    height: self.image.height(),
                });
            }
            Ok(self.image.clone())
        })
    }
}
