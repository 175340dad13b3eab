use std::f64::consts::{PI, TAU};

use crate::{
    math::{Bounds, Vec2, normalize, tangent_points},
    renderer::Surface,
};

use super::obstacle::{GeometryError, Occluder, trace};

pub const DEFAULT_DISC_RADIUS: f64 = 20.0;

/// Solid circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f64,
}

impl Default for Disc {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius: DEFAULT_DISC_RADIUS,
        }
    }
}

impl Disc {
    pub const fn new(center: Vec2, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Occluder for Disc {
    /// `center ± radius`; never fails.
    fn bounds(&self) -> Result<Bounds, GeometryError> {
        Ok(Bounds::around(self.center, self.radius))
    }

    fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) < self.radius * self.radius
    }

    fn outline(&self, surface: &mut dyn Surface) -> Result<(), GeometryError> {
        surface.arc(self.center, self.radius, 0.0, TAU);
        Ok(())
    }

    /// Shadow = the band between the two tangent rays, pushed out past
    /// `bounds`, closed by the half circle facing `origin`.
    ///
    /// With `origin` inside the disc there are no tangents and nothing is
    /// drawn.
    fn cast(
        &self,
        surface: &mut dyn Surface,
        origin: Vec2,
        bounds: &Bounds,
    ) -> Result<(), GeometryError> {
        let reach = bounds.extrusion();
        let m = self.center;
        let origin_to_m = m - origin;

        let tangents = tangent_points(self.radius, origin_to_m);
        let (origin_to_a, origin_to_b) = (tangents[0], tangents[1]);
        if !(origin_to_a.is_finite() && origin_to_b.is_finite()) {
            return Ok(());
        }
        let a = origin + origin_to_a;
        let b = origin + origin_to_b;

        // far end of the centre ray, shifted onto each tangent point
        let origin_to_m = normalize(origin_to_m) * reach;
        let oam = a + origin_to_m;
        let obm = b + origin_to_m;

        let ap = a + normalize(origin_to_a) * reach;
        let bp = b + normalize(origin_to_b) * reach;

        let start = origin_to_m.x.atan2(-origin_to_m.y);

        surface.begin_path();
        // left open: the arc picks up from `a` and `fill` closes onto `b`
        trace(surface, &[b, bp, obm, oam, ap, a], false)?;
        surface.arc(m, self.radius, start, start + PI);
        surface.fill();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{math::vec2, renderer::Canvas};

    #[test]
    fn containment_is_strict() {
        let d = Disc::new(vec2(0.0, 0.0), 2.0);
        assert!(d.contains(vec2(1.0, 1.0)));
        assert!(!d.contains(vec2(2.0, 0.0)));
        assert!(!d.contains(vec2(2.0, 2.0)));
    }

    #[test]
    fn default_radius() {
        let d = Disc::default();
        assert_eq!(d.radius, 20.0);
        assert_eq!(
            d.bounds().unwrap(),
            Bounds::new(vec2(-20.0, -20.0), vec2(20.0, 20.0))
        );
    }

    #[test]
    fn shadow_falls_behind_the_disc() {
        let mut c = Canvas::new(200, 200);
        let bounds = Bounds::around(vec2(100.0, 100.0), 100.0);
        Disc::new(vec2(150.0, 100.0), 10.0)
            .cast(&mut c, vec2(100.0, 100.0), &bounds)
            .unwrap();
        let r = c.raster();
        // behind, beside the umbra, in front
        assert_eq!(r.alpha(180, 100), 1.0);
        assert_eq!(r.alpha(180, 60), 0.0);
        assert_eq!(r.alpha(60, 100), 0.0);
        // the lit half of the disc belongs to the shadow too
        assert_eq!(r.alpha(143, 100), 1.0);
    }

    #[test]
    fn origin_inside_draws_nothing() {
        let mut c = Canvas::new(50, 50);
        let bounds = Bounds::around(vec2(25.0, 25.0), 25.0);
        Disc::new(vec2(25.0, 25.0), 10.0)
            .cast(&mut c, vec2(26.0, 25.0), &bounds)
            .unwrap();
        let r = c.raster();
        assert!((0..50).all(|y| (0..50).all(|x| r.alpha(x, y) == 0.0)));
    }

    #[test]
    fn origin_inside_off_axis_draws_nothing() {
        let disc = Disc::new(vec2(50.0, 50.0), 20.0);
        let bounds = Bounds::around(vec2(50.0, 50.0), 50.0);
        for origin in [
            vec2(55.0, 55.0),
            vec2(41.0, 58.0),
            vec2(63.0, 38.0),
            vec2(50.0, 50.0),
        ] {
            let mut c = Canvas::new(100, 100);
            disc.cast(&mut c, origin, &bounds).unwrap();
            let r = c.raster();
            let painted = (0..100)
                .flat_map(|y| (0..100).map(move |x| (x, y)))
                .filter(|&(x, y)| r.alpha(x, y) != 0.0)
                .count();
            assert_eq!(painted, 0, "origin {origin}");
        }
    }
}
