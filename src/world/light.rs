//! Light sources.
//!
//! A [`Light`] is a point of emission with a reach (`distance`).  The
//! [`Lamp`] kind adds a coloured glow, an emitting disc of finite `radius`
//! sampled `samples` times (soft penumbrae), and an off-centre hot-spot
//! given by `angle` and `roughness`.
//!
//! Both rasters a light can hand out are cached per instance and redrawn
//! only when the parameters they depend on change:
//!
//! | raster           | drawn by        | depends on                         |
//! |------------------|-----------------|------------------------------------|
//! | visibility mask  | [`Light::mask`] | `floor(1.4 · distance)`            |
//! | glow (lamp only) | [`Light::render`] | colour, distance, diffuse, angle, roughness, samples, radius |

use crate::{
    color::Color,
    math::{Bounds, GOLDEN_ANGLE, Vec2, vec2},
    renderer::{Canvas, HashedCanvas, RadialGradient, Surface},
};

pub const DEFAULT_LIGHT_DISTANCE: f64 = 100.0;
pub const DEFAULT_LIGHT_DIFFUSE: f64 = 0.8;
pub const DEFAULT_LAMP_COLOR: Color = Color::rgba(250, 220, 150, 0.8);

/// Visibility masks reach a bit further than the light itself.
const MASK_REACH: f64 = 1.4;

/// Constructor arguments shared by every light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightOptions {
    pub position: Vec2,
    pub distance: f64,
    pub diffuse: f64,
    pub hidden: bool,
}

impl Default for LightOptions {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            distance: DEFAULT_LIGHT_DISTANCE,
            diffuse: DEFAULT_LIGHT_DIFFUSE,
            hidden: false,
        }
    }
}

/// Lamp-specific constructor arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LampOptions {
    pub color: Color,
    pub radius: f64,
    pub samples: usize,
    pub angle: f64,
    pub roughness: f64,
}

impl Default for LampOptions {
    fn default() -> Self {
        Self {
            color: DEFAULT_LAMP_COLOR,
            radius: 0.0,
            samples: 1,
            angle: 0.0,
            roughness: 0.0,
        }
    }
}

/// Area light parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lamp {
    pub color: Color,
    /// Radius of the emitting disc.
    pub radius: f64,
    /// Emission points spread over the disc.
    pub samples: usize,
    /// Direction of the hot-spot, radians counter-clockwise on screen.
    pub angle: f64,
    /// How far the hot-spot sits from the centre, as a fraction of `distance`.
    pub roughness: f64,
}

impl From<LampOptions> for Lamp {
    fn from(o: LampOptions) -> Self {
        Self {
            color: o.color,
            radius: o.radius,
            samples: o.samples,
            angle: o.angle,
            roughness: o.roughness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Single sample, no glow of its own.
    Point,
    Lamp(Lamp),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct GlowKey {
    color: Color,
    distance: f64,
    diffuse: f64,
    angle: f64,
    roughness: f64,
    samples: usize,
    radius: f64,
}

#[derive(Clone, Debug)]
pub struct Light {
    pub position: Vec2,
    /// Reach of the light in pixels.
    pub distance: f64,
    /// Fraction of this light passing through obstacle bodies.
    pub diffuse: f64,
    /// Hidden lights do not open holes in a dark mask.
    pub hidden: bool,
    pub kind: LightKind,

    mask_cache: Option<HashedCanvas<i64>>,
    glow_cache: Option<HashedCanvas<GlowKey>>,
}

impl Default for Light {
    fn default() -> Self {
        Self::new(LightOptions::default())
    }
}

impl Light {
    pub fn new(options: LightOptions) -> Self {
        Self {
            position: options.position,
            distance: options.distance,
            diffuse: options.diffuse,
            hidden: options.hidden,
            kind: LightKind::Point,
            mask_cache: None,
            glow_cache: None,
        }
    }

    pub fn point(position: Vec2, distance: f64) -> Self {
        Self::new(LightOptions {
            position,
            distance,
            ..LightOptions::default()
        })
    }

    pub fn lamp(options: LightOptions, lamp: LampOptions) -> Self {
        Self {
            kind: LightKind::Lamp(lamp.into()),
            ..Self::new(options)
        }
    }

    pub fn as_lamp(&self) -> Option<&Lamp> {
        match &self.kind {
            LightKind::Lamp(l) => Some(l),
            LightKind::Point => None,
        }
    }

    pub fn as_lamp_mut(&mut self) -> Option<&mut Lamp> {
        match &mut self.kind {
            LightKind::Lamp(l) => Some(l),
            LightKind::Point => None,
        }
    }

    /// Number of emission points [`samples`](Self::samples) yields.
    pub fn sample_count(&self) -> usize {
        match &self.kind {
            LightKind::Point => 1,
            LightKind::Lamp(l) => l.samples,
        }
    }

    /// Emission points: the position itself for a point light, a
    /// golden-angle spiral over the emitting disc for a lamp.
    pub fn samples(&self) -> Samples {
        let radius = self.as_lamp().map_or(0.0, |l| l.radius);
        Samples {
            center: self.position,
            radius,
            count: self.sample_count(),
            next: 0,
        }
    }

    /// Offset of the hot-spot from `position`; zero for point lights.
    fn orientation(&self) -> Vec2 {
        match &self.kind {
            LightKind::Point => Vec2::ZERO,
            LightKind::Lamp(l) => {
                let (sin, cos) = l.angle.sin_cos();
                vec2(cos, -sin) * (l.roughness * self.distance)
            }
        }
    }

    /// Square of half-side `distance` around the (oriented) light.
    pub fn bounds(&self) -> Bounds {
        Bounds::around(self.position + self.orientation(), self.distance)
    }

    /// Hot-spot position inside the glow raster.
    pub fn center(&self) -> Vec2 {
        let d = self.distance;
        match &self.kind {
            LightKind::Point => vec2(d, d),
            LightKind::Lamp(l) => {
                let (sin, cos) = l.angle.sin_cos();
                vec2((1.0 - cos * l.roughness) * d, (1.0 + sin * l.roughness) * d)
            }
        }
    }

    /// Draw the light's own glow; point lights have none.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        let center = self.center();
        let position = self.position;
        if let Some(glow) = self.glow() {
            let at = (position - center).round();
            surface.draw_image(glow.raster(), at.x as i32, at.y as i32);
        }
    }

    /// Draw the visibility mask centred on the light.
    pub fn mask(&mut self, surface: &mut dyn Surface) {
        let origin = self.position + self.orientation();
        let mask = self.visibility_mask();
        let half = vec2(mask.width() as f64, mask.height() as f64) / 2.0;
        let at = (origin - half).round();
        surface.draw_image(mask.raster(), at.x as i32, at.y as i32);
    }

    /// Cached radial falloff, black and opaque in the middle, transparent
    /// at `floor(1.4 · distance)`.
    pub fn visibility_mask(&mut self) -> &Canvas {
        let reach = (self.distance * MASK_REACH).floor() as i64;
        HashedCanvas::recompute_if_stale(&mut self.mask_cache, reach, |&d| {
            log::debug!("redrawing visibility mask, reach {d}");
            let side = (2 * d).max(0) as usize;
            let c = vec2(d as f64, d as f64);
            let mut canvas = Canvas::new(side, side);
            canvas.set_fill(
                RadialGradient::new(c, 0.0, c, d as f64)
                    .with_stop(0.0, Color::BLACK)
                    .with_stop(1.0, Color::TRANSPARENT)
                    .into(),
            );
            canvas.fill_rect(Vec2::ZERO, vec2(side as f64, side as f64));
            canvas
        })
    }

    /// Cached lamp glow; `None` for point lights.
    pub fn glow(&mut self) -> Option<&Canvas> {
        let LightKind::Lamp(lamp) = self.kind else {
            return None;
        };
        let key = GlowKey {
            color: lamp.color,
            distance: self.distance,
            diffuse: self.diffuse,
            angle: lamp.angle,
            roughness: lamp.roughness,
            samples: lamp.samples,
            radius: lamp.radius,
        };
        let center = self.center();
        Some(HashedCanvas::recompute_if_stale(
            &mut self.glow_cache,
            key,
            |k| draw_glow(k, center),
        ))
    }
}

fn draw_glow(key: &GlowKey, hot_spot: Vec2) -> Canvas {
    let d = key.distance.round();
    let side = (2.0 * d).max(0.0) as usize;
    log::debug!("redrawing lamp glow, {side}x{side}");

    let mut canvas = Canvas::new(side, side);
    canvas.set_fill(
        RadialGradient::new(hot_spot, 0.0, vec2(d, d), d)
            .with_stop((key.radius / key.distance).min(1.0), key.color)
            .with_stop(1.0, key.color.with_alpha(0.0))
            .into(),
    );
    canvas.fill_rect(Vec2::ZERO, vec2(side as f64, side as f64));
    canvas
}

/// Iterator returned by [`Light::samples`].
#[derive(Clone, Debug)]
pub struct Samples {
    center: Vec2,
    radius: f64,
    count: usize,
    next: usize,
}

impl Iterator for Samples {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.next >= self.count {
            return None;
        }
        let s = self.next as f64;
        self.next += 1;

        let a = s * GOLDEN_ANGLE;
        let r = (s / self.count as f64).sqrt() * self.radius;
        let (sin, cos) = a.sin_cos();
        Some(self.center + vec2(cos, sin) * r)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Samples {}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(samples: usize, radius: f64) -> Light {
        Light::lamp(
            LightOptions {
                position: vec2(50.0, 50.0),
                ..LightOptions::default()
            },
            LampOptions {
                samples,
                radius,
                ..LampOptions::default()
            },
        )
    }

    #[test]
    fn defaults() {
        let l = Light::default();
        assert_eq!(l.distance, 100.0);
        assert_eq!(l.diffuse, 0.8);
        assert!(!l.hidden);
        assert_eq!(l.kind, LightKind::Point);

        let l = lamp(1, 0.0);
        let lamp = l.as_lamp().unwrap();
        assert_eq!(lamp.color, Color::rgba(250, 220, 150, 0.8));
        assert_eq!((lamp.radius, lamp.samples), (0.0, 1));
    }

    #[test]
    fn point_light_samples_once() {
        let l = Light::point(vec2(3.0, 4.0), 10.0);
        assert_eq!(l.samples().collect::<Vec<_>>(), vec![vec2(3.0, 4.0)]);
        assert_eq!(l.sample_count(), 1);
    }

    #[test]
    fn spiral_stays_inside_radius() {
        let l = lamp(16, 8.0);
        let pts: Vec<_> = l.samples().collect();
        assert_eq!(pts.len(), 16);
        assert_eq!(pts[0], vec2(50.0, 50.0));
        assert!(pts.iter().all(|p| p.distance(vec2(50.0, 50.0)) < 8.0));
        // second sample: radius 8·√(1/16) at the golden angle
        let expect = vec2(50.0, 50.0) + vec2(GOLDEN_ANGLE.cos(), GOLDEN_ANGLE.sin()) * 2.0;
        assert!(pts[1].distance(expect) < 1e-12);
    }

    #[test]
    fn zero_samples_yield_nothing() {
        assert_eq!(lamp(0, 5.0).samples().count(), 0);
    }

    #[test]
    fn bounds_follow_orientation() {
        let mut l = lamp(1, 0.0);
        assert_eq!(
            l.bounds(),
            Bounds::new(vec2(-50.0, -50.0), vec2(150.0, 150.0))
        );
        if let Some(lamp) = l.as_lamp_mut() {
            lamp.roughness = 0.5;
            lamp.angle = std::f64::consts::FRAC_PI_2;
        }
        // hot-spot half the distance "up" the screen
        let b = l.bounds();
        assert!((b.top_left - vec2(-50.0, -100.0)).length() < 1e-9);
        let c = l.center();
        assert!((c - vec2(100.0, 150.0)).length() < 1e-9);
    }

    #[test]
    fn mask_cache_keyed_on_reach() {
        let mut l = Light::point(vec2(0.0, 0.0), 10.0);
        assert_eq!(l.visibility_mask().width(), 28);
        l.distance = 10.3;
        // floor(14.42) is still 14: same canvas
        assert_eq!(l.visibility_mask().width(), 28);
        l.distance = 20.0;
        assert_eq!(l.visibility_mask().width(), 56);
    }

    #[test]
    fn mask_is_opaque_at_centre_and_clear_at_rim() {
        let mut l = Light::point(vec2(0.0, 0.0), 50.0);
        let m = l.visibility_mask().raster();
        assert!(m.alpha(70, 70) > 0.95);
        assert_eq!(m.alpha(0, 0), 0.0);
        assert_eq!(m.alpha(139, 0), 0.0);
    }

    #[test]
    fn point_light_has_no_glow() {
        let mut l = Light::point(vec2(10.0, 10.0), 10.0);
        assert!(l.glow().is_none());
        let mut c = Canvas::new(20, 20);
        l.render(&mut c);
        assert_eq!(c.raster().alpha(10, 10), 0.0);
    }

    #[test]
    fn lamp_glow_is_drawn_around_position() {
        let mut l = lamp(1, 0.0);
        assert_eq!(l.glow().map(|g| g.width()), Some(200));

        let mut c = Canvas::new(100, 100);
        l.render(&mut c);
        let r = c.raster();
        // colour alpha at the hot-spot, fading towards the rim
        assert!((r.alpha(50, 50) - 0.8).abs() < 0.02);
        assert!(r.alpha(90, 50) < r.alpha(60, 50));
        assert_eq!(r.color(50, 50).map(|c| c.r), Some(250));
    }

    #[test]
    fn glow_recomputed_on_colour_change() {
        let mut l = lamp(1, 0.0);
        l.glow();
        if let Some(lamp) = l.as_lamp_mut() {
            lamp.color = Color::rgba(255, 0, 0, 1.0);
        }
        let g = l.glow().unwrap().raster();
        assert_eq!(g.color(100, 100).map(|c| (c.r, c.g)), Some((255, 0)));
    }
}
