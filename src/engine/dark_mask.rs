use std::cell::RefMut;

use crate::{
    Shared,
    color::Color,
    math::{Vec2, vec2},
    renderer::{Canvas, Composite, Surface, ensure_canvas},
    world::Light,
};

use super::LightingError;

pub const DEFAULT_DARK_COLOR: Color = Color::rgba(0, 0, 0, 0.9);

/// Darkness over the whole scene with a soft hole at each visible light.
///
/// Obstacles play no part here: the holes come from each light's
/// visibility mask, which reaches 1.4 × its distance.
pub struct DarkMask {
    pub lights: Vec<Shared<Light>>,
    pub color: Color,

    cache: Option<Canvas>,
}

impl Default for DarkMask {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DarkMask {
    pub fn new(lights: Vec<Shared<Light>>) -> Self {
        Self {
            lights,
            color: DEFAULT_DARK_COLOR,
            cache: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Redraw the overlay at `width × height`.
    ///
    /// Every light is borrowed up front; if one is busy the previous
    /// overlay is left untouched.
    pub fn compute(&mut self, width: usize, height: usize) -> Result<(), LightingError> {
        let mut lights: Vec<RefMut<'_, Light>> = self
            .lights
            .iter()
            .map(|l| l.try_borrow_mut())
            .collect::<Result<_, _>>()
            .map_err(|_| LightingError::Busy("light"))?;

        let canvas = ensure_canvas(&mut self.cache, "dark mask", width, height);
        canvas.clear();
        canvas.save();
        canvas.set_fill(self.color.into());
        canvas.fill_rect(Vec2::ZERO, vec2(width as f64, height as f64));
        canvas.set_composite(Composite::DestinationOut);

        for light in lights.iter_mut().filter(|l| !l.hidden) {
            light.mask(canvas);
        }
        canvas.restore();
        Ok(())
    }

    /// Blit the last computed overlay; nothing before the first `compute`.
    pub fn render(&self, surface: &mut dyn Surface) {
        if let Some(c) = &self.cache {
            surface.draw_image(c.raster(), 0, 0);
        }
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.cache.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared;

    #[test]
    fn no_lights_is_uniform() {
        let mut dm = DarkMask::default();
        dm.compute(16, 9).unwrap();
        let r = dm.canvas().unwrap().raster();
        for y in 0..9 {
            for x in 0..16 {
                assert!((r.alpha(x, y) - 0.9).abs() < 1e-6);
            }
        }
        assert_eq!(r.color(3, 3).map(|c| (c.r, c.g, c.b)), Some((0, 0, 0)));
    }

    #[test]
    fn custom_colour() {
        let mut dm = DarkMask::default().with_color(Color::rgba(10, 20, 30, 1.0));
        dm.compute(2, 2).unwrap();
        let c = dm.canvas().unwrap().raster().color(1, 1);
        assert_eq!(c, Some(Color::rgba(10, 20, 30, 1.0)));
    }

    #[test]
    fn light_opens_a_hole() {
        let light = shared(Light::point(vec2(50.0, 50.0), 20.0));
        let mut dm = DarkMask::new(vec![light]);
        dm.compute(100, 100).unwrap();
        let r = dm.canvas().unwrap().raster();
        assert!(r.alpha(50, 50) < 0.05);
        // the mask reaches floor(1.4 × 20) = 28 px
        assert!(r.alpha(70, 50) > r.alpha(55, 50));
        assert!((r.alpha(80, 50) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn hidden_lights_are_skipped() {
        let light = shared(Light::point(vec2(50.0, 50.0), 20.0));
        light.borrow_mut().hidden = true;
        let mut dm = DarkMask::new(vec![light]);
        dm.compute(100, 100).unwrap();
        assert!((dm.canvas().unwrap().raster().alpha(50, 50) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn busy_light_keeps_previous_overlay() {
        let light = shared(Light::point(vec2(50.0, 50.0), 20.0));
        let mut dm = DarkMask::new(vec![light.clone()]);
        {
            let _guard = light.borrow();
            assert_eq!(dm.compute(100, 100), Err(LightingError::Busy("light")));
        }
        assert!(dm.canvas().is_none());

        dm.compute(100, 100).unwrap();
        let before = dm.canvas().unwrap().raster().clone();
        let _guard = light.borrow();
        assert_eq!(dm.compute(100, 100), Err(LightingError::Busy("light")));
        assert_eq!(dm.canvas().unwrap().raster(), &before);

        let mut frame = Canvas::new(100, 100);
        dm.render(&mut frame);
        assert!(frame.raster().alpha(50, 50) < 0.05);
        assert!((frame.raster().alpha(0, 0) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn render_blits_overlay() {
        let mut dm = DarkMask::default();
        let mut frame = Canvas::new(4, 4);
        dm.render(&mut frame);
        assert_eq!(frame.raster().alpha(0, 0), 0.0);
        dm.compute(4, 4).unwrap();
        dm.render(&mut frame);
        assert!((frame.raster().alpha(2, 2) - 0.9).abs() < 1e-6);
    }
}
