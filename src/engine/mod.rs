//! Compositors turning lights and obstacles into cached rasters.
//!
//! * [`Lighting`]: one light, any number of obstacles; glow with shadows
//!   carved out of it.
//! * [`DarkMask`]: any number of lights, no obstacles; a darkness overlay
//!   with a soft hole at each light.

mod dark_mask;
mod lighting;

pub use dark_mask::{DEFAULT_DARK_COLOR, DarkMask};
pub use lighting::{Lighting, ShadowAlpha};

use crate::world::GeometryError;

/// Why a compositor could not produce its raster.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LightingError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A shared light or obstacle was mutably borrowed during `compute`.
    #[error("scene {0} is borrowed elsewhere")]
    Busy(&'static str),
}
