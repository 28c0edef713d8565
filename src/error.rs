//! Error types shared by the settings store, renderer, and lifecycle manager.

use crate::surface::SurfaceId;

/// Errors that can occur while configuring, activating, or rendering surfaces.
#[derive(Debug, thiserror::Error)]
pub enum NoiseError {
    /// A settings value failed validation (blank string, negative number, ...).
    #[error("invalid settings")]
    Validation,

    /// The operation targeted a surface that has no registry entry.
    #[error("surface {0} is not active")]
    NotActive(SurfaceId),

    /// The image source could not produce a raster image.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// A pixel sample was addressed outside the resampled raster.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} raster")]
    Bounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Errors reported by an [`ImageSource`](crate::source::ImageSource).
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("failed to load image: {0}")]
    Load(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("image loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("image source unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_is_generic() {
        assert_eq!(format!("{}", NoiseError::Validation), "invalid settings");
    }

    #[test]
    fn test_not_active_display_includes_id() {
        let msg = format!("{}", NoiseError::NotActive(SurfaceId::new(7)));
        assert!(msg.contains("#7"));
        assert!(msg.contains("not active"));
    }

    #[test]
    fn test_acquisition_error_is_transparent() {
        let err = NoiseError::from(AcquisitionError::Unavailable("offline".to_string()));
        assert_eq!(format!("{}", err), "image source unavailable: offline");
    }

    #[test]
    fn test_bounds_display() {
        let err = NoiseError::Bounds {
            x: 4,
            y: 2,
            width: 3,
            height: 3,
        };
        assert_eq!(format!("{}", err), "pixel (4, 2) is outside the 3x3 raster");
    }
}
