//! Drawing-surface abstraction.
//!
//! *The lighting code never touches a pixel directly.*
//! Obstacles append path segments and fill them, lights blit cached rasters,
//! compositors switch blend modes; all of it through the [`Surface`] trait.
//!
//! * [`software::Canvas`] is the CPU back-end used by the compositors for
//!   their private caches and by applications without a GPU.
//! * [`SurfaceCache`] hands out canvases keyed by name, reallocating only
//!   when the requested size changes; [`HashedCanvas`] keeps one canvas
//!   until the parameters it was drawn from change.

use crate::{color::Color, math::Vec2};

mod cache;
pub mod software;

pub use cache::{HashedCanvas, SurfaceCache, ensure_canvas};
pub use software::{Canvas, Raster};

/// Pixel format handed to window back-ends (0xAARRGGBB).
pub type Argb = u32;

/// How a drawing operation combines with what is already on the surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Composite {
    /// Plain alpha blending, source drawn over destination.
    #[default]
    SourceOver,
    /// Destination alpha reduced by source alpha; source colour ignored.
    DestinationOut,
}

/// One colour stop of a gradient; `offset` in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Two-circle radial gradient: colour at `t` is taken from the largest `t`
/// whose circle (interpolated between the start and end circles) passes
/// through the pixel.  Outside `0..=1` the end stops are extended.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub start: Vec2,
    pub start_radius: f64,
    pub end: Vec2,
    pub end_radius: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(start: Vec2, start_radius: f64, end: Vec2, end_radius: f64) -> Self {
        Self {
            start,
            start_radius,
            end,
            end_radius,
            stops: Vec::new(),
        }
    }

    /// Append a stop; stops are kept sorted by offset (stable for ties).
    pub fn add_color_stop(&mut self, offset: f64, color: Color) {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.add_color_stop(offset, color);
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}

/// What `fill` and `fill_rect` paint with.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Radial(RadialGradient),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::Radial(g)
    }
}

/// A raster drawing target with a 2-D canvas style API.
///
/// Paths are built with `begin_path`/`move_to`/`line_to`/`arc`/`rect` and
/// filled with the non-zero winding rule; every sub-path is implicitly
/// closed by `fill`.  Angles are radians, measured clockwise in y-down
/// screen space.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Push paint, global alpha and composite mode.
    fn save(&mut self);
    /// Pop the state pushed by the matching `save`; no-op on an empty stack.
    fn restore(&mut self);

    fn set_fill(&mut self, paint: Paint);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_composite(&mut self, op: Composite);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    /// Circular arc from `start` to `end`, joined to the current point.
    fn arc(&mut self, center: Vec2, radius: f64, start: f64, end: f64);
    /// Closed axis-aligned rectangle sub-path.
    fn rect(&mut self, top_left: Vec2, size: Vec2);

    /// Fill the current path with the current paint.
    fn fill(&mut self);
    /// Fill a rectangle without touching the current path.
    fn fill_rect(&mut self, top_left: Vec2, size: Vec2);

    /// Reset every pixel to transparent black.
    fn clear(&mut self);

    /// Composite `image` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &Raster, x: i32, y: i32);
}
