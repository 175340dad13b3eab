//! Shadow-casting bodies.
//!
//! Every shape answers the same four questions through [`Occluder`]; the
//! compositors only ever talk to [`Obstacle`], which adds the body's own
//! translucency on top of its geometry.

use crate::{
    math::{Bounds, Vec2},
    renderer::Surface,
};

use super::{Disc, Polygon};

/// Fraction of light an obstacle body lets through unless told otherwise.
pub const DEFAULT_OBSTACLE_DIFFUSE: f64 = 0.8;

/// Precondition violations on obstacle geometry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeometryError {
    /// Bounds, outline or shadow of a polygon without vertices.
    #[error("polygon has no points")]
    EmptyPolygon,

    /// Raw rectangle fill requested on a polygon that is not a rectangle.
    #[error("polygon is not an axis-aligned rectangle")]
    NotARectangle,
}

/// Geometry that blocks light.
pub trait Occluder {
    /// Axis-aligned box around the shape.
    fn bounds(&self) -> Result<Bounds, GeometryError>;

    /// Whether `point` lies inside the shape.
    fn contains(&self, point: Vec2) -> bool;

    /// Append the shape's outline to the surface's current path.
    fn outline(&self, surface: &mut dyn Surface) -> Result<(), GeometryError>;

    /// Fill the shadow thrown by the shape when lit from `origin`, pushed
    /// far enough to leave `bounds` (the light's reach).
    fn cast(
        &self,
        surface: &mut dyn Surface,
        origin: Vec2,
        bounds: &Bounds,
    ) -> Result<(), GeometryError>;
}

/// The closed set of shapes an obstacle can take.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Disc(Disc),
    Polygon(Polygon),
}

impl From<Disc> for Shape {
    fn from(d: Disc) -> Self {
        Shape::Disc(d)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}

/// A scene object: a shape plus how much light passes through its body.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// `0` = opaque body, `1` = body invisible in the shadow pass.
    pub diffuse: f64,
    pub shape: Shape,
}

impl Obstacle {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            diffuse: DEFAULT_OBSTACLE_DIFFUSE,
            shape: shape.into(),
        }
    }

    pub fn disc(center: Vec2, radius: f64) -> Self {
        Self::new(Disc::new(center, radius))
    }

    pub fn polygon(points: Vec<Vec2>) -> Self {
        Self::new(Polygon::new(points))
    }

    pub fn line(a: Vec2, b: Vec2) -> Self {
        Self::new(Polygon::line(a, b))
    }

    pub fn rectangle(top_left: Vec2, bottom_right: Vec2) -> Self {
        Self::new(Polygon::rectangle(top_left, bottom_right))
    }

    #[must_use]
    pub fn with_diffuse(mut self, diffuse: f64) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Move the whole shape by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.shape {
            Shape::Disc(d) => d.center += delta,
            Shape::Polygon(p) => p.translate(delta),
        }
    }

    /// Fill the body itself with the surface's current paint.
    ///
    /// Rectangles take the raw rectangle path; everything else goes through
    /// its outline.
    pub fn fill_body(&self, surface: &mut dyn Surface) -> Result<(), GeometryError> {
        if let Shape::Polygon(p) = &self.shape {
            if p.is_rectangle() {
                return p.fill_rect(surface);
            }
        }
        surface.begin_path();
        self.outline(surface)?;
        surface.fill();
        Ok(())
    }

    fn occluder(&self) -> &dyn Occluder {
        match &self.shape {
            Shape::Disc(d) => d,
            Shape::Polygon(p) => p,
        }
    }
}

impl Occluder for Obstacle {
    fn bounds(&self) -> Result<Bounds, GeometryError> {
        self.occluder().bounds()
    }

    fn contains(&self, point: Vec2) -> bool {
        self.occluder().contains(point)
    }

    fn outline(&self, surface: &mut dyn Surface) -> Result<(), GeometryError> {
        self.occluder().outline(surface)
    }

    fn cast(
        &self,
        surface: &mut dyn Surface,
        origin: Vec2,
        bounds: &Bounds,
    ) -> Result<(), GeometryError> {
        self.occluder().cast(surface, origin, bounds)
    }
}

/// Append `points` as one sub-path.  With `close`, lines back to the first
/// point, but only for more than two vertices: a segment stays open.
pub(crate) fn trace(
    surface: &mut dyn Surface,
    points: &[Vec2],
    close: bool,
) -> Result<(), GeometryError> {
    let (first, rest) = points.split_first().ok_or(GeometryError::EmptyPolygon)?;
    surface.move_to(*first);
    for &p in rest {
        surface.line_to(p);
    }
    if close && points.len() > 2 {
        surface.line_to(*first);
    }
    Ok(())
}
