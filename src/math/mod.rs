//! Vector algebra shared by every other module.
//!
//! Vectors are plain `glam::DVec2` values: `Copy`, never mutated in place
//! by this crate, so aliasing them is always safe.  Double precision is
//! needed because the tangent solver compares squared lengths against an
//! absolute epsilon.

mod tangent;

pub use glam::{DVec2 as Vec2, dvec2 as vec2};
pub use tangent::{TANGENT_EPSILON, Tangents, tangent_points};

/// `π(3 − √5)`, the angle between consecutive points of a sunflower spiral.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Unit vector, or zero for a zero (or non-finite) input.
///
/// Division by zero is suppressed so downstream geometry stays finite.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Axis-aligned box in screen space (y grows downwards).
///
/// By convention `top_left <= bottom_right` on both axes; nothing enforces it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub top_left: Vec2,
    pub bottom_right: Vec2,
}

impl Bounds {
    #[inline]
    pub const fn new(top_left: Vec2, bottom_right: Vec2) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Square box of half-side `half` around `center`.
    #[inline]
    pub fn around(center: Vec2, half: f64) -> Self {
        let h = Vec2::splat(half);
        Self::new(center - h, center + h)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.bottom_right - self.top_left
    }

    /// How far shadow projections are pushed: `(width + height) / 2`.
    ///
    /// Not infinity, just far enough to leave the light's reach.
    #[inline]
    pub fn extrusion(&self) -> f64 {
        (self.width() + self.height()) / 2.0
    }

    /// Strict containment: points on the border are outside.
    #[inline]
    pub fn contains_strict(&self, p: Vec2) -> bool {
        self.top_left.x < p.x
            && p.x < self.bottom_right.x
            && self.top_left.y < p.y
            && p.y < self.bottom_right.y
    }

    /// Smallest box enclosing `self` and `p`.
    #[inline]
    pub fn expand_to(self, p: Vec2) -> Self {
        Self::new(self.top_left.min(p), self.bottom_right.max(p))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_angle_matches_closed_form() {
        let closed = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        assert!((GOLDEN_ANGLE - closed).abs() < 1e-12);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        let n = normalize(vec2(3.0, 4.0));
        assert!((n - vec2(0.6, 0.8)).length() < 1e-12);
    }

    #[test]
    fn extrusion_is_half_perimeter_average() {
        let b = Bounds::new(vec2(0.0, 0.0), vec2(200.0, 100.0));
        assert_eq!(b.extrusion(), 150.0);
    }

    #[test]
    fn strict_containment_excludes_border() {
        let b = Bounds::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
        assert!(b.contains_strict(vec2(5.0, 5.0)));
        assert!(!b.contains_strict(vec2(0.0, 5.0)));
        assert!(!b.contains_strict(vec2(5.0, 10.0)));
        assert!(!b.contains_strict(vec2(11.0, 5.0)));
    }

    #[test]
    fn around_and_expand() {
        let a = Bounds::around(vec2(10.0, 10.0), 5.0);
        assert_eq!(a, Bounds::new(vec2(5.0, 5.0), vec2(15.0, 15.0)));
        assert_eq!(
            a.expand_to(vec2(20.0, 0.0)),
            Bounds::new(vec2(5.0, 0.0), vec2(20.0, 15.0))
        );
    }
}
