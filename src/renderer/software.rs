//! ---------------------------------------------------------------------------
//! Software (CPU) canvas
//!
//! * Stores pixels as **premultiplied** RGBA `f32` so repeated low-alpha
//!   shadow fills accumulate without 8-bit banding.
//! * Binary coverage at pixel centres, non-zero winding (see [`path`]).
//! * `Raster::to_argb` converts to a `0xAARRGGBB` frame-buffer for minifb.
//! ---------------------------------------------------------------------------

use crate::{
    color::Color,
    math::{Vec2, vec2},
    renderer::{Argb, Composite, Paint, RadialGradient, Surface},
};

mod path;

use path::{Path, pixel_start};

/*───────────────────────────────────────────────────────────────────────*/
/*                               Raster                                  */
/*───────────────────────────────────────────────────────────────────────*/

/// Premultiplied RGBA pixel.
pub type Pixel = [f32; 4];

/// Row-major pixel storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Raster {
    /// Fully transparent raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Premultiplied pixel, `None` when out of range.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Alpha at `(x, y)`; zero outside the raster.
    #[inline]
    pub fn alpha(&self, x: usize, y: usize) -> f32 {
        self.pixel(x, y).map_or(0.0, |p| p[3])
    }

    /// Straight (un-premultiplied) colour at `(x, y)`.
    pub fn color(&self, x: usize, y: usize) -> Option<Color> {
        let [r, g, b, a] = self.pixel(x, y)?;
        if a <= 0.0 {
            return Some(Color::TRANSPARENT);
        }
        let ch = |v: f32| (v / a * 255.0).round().clamp(0.0, 255.0) as u8;
        Some(Color::rgba(ch(r), ch(g), ch(b), a as f64))
    }

    /// Write the raster as opaque-over-black `0xAARRGGBB` into `dst`.
    pub fn to_argb(&self, dst: &mut [Argb]) {
        debug_assert_eq!(dst.len(), self.pixels.len());
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        for (out, &[r, g, b, a]) in dst.iter_mut().zip(&self.pixels) {
            *out = q(a) << 24 | q(r) << 16 | q(g) << 8 | q(b);
        }
    }

    #[inline]
    fn blend(&mut self, idx: usize, src: Pixel, op: Composite) {
        let dst = &mut self.pixels[idx];
        let inv = 1.0 - src[3];
        match op {
            Composite::SourceOver => {
                for c in 0..4 {
                    dst[c] = src[c] + dst[c] * inv;
                }
            }
            Composite::DestinationOut => {
                for c in dst.iter_mut() {
                    *c *= inv;
                }
            }
        }
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                               Canvas                                  */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Clone, Debug)]
struct DrawState {
    paint: Paint,
    alpha: f64,
    op: Composite,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            paint: Paint::default(),
            alpha: 1.0,
            op: Composite::SourceOver,
        }
    }
}

/// CPU implementation of [`Surface`].
#[derive(Clone, Debug)]
pub struct Canvas {
    raster: Raster,
    state: DrawState,
    stack: Vec<DrawState>,
    path: Path,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            raster: Raster::new(width, height),
            state: DrawState::default(),
            stack: Vec::new(),
            path: Path::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.raster.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.raster.height
    }

    /// Read-only view of the pixels.
    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn composite(&self) -> Composite {
        self.state.op
    }

    /// Paint pixels `x0..x1` of row `y` with the current paint.
    fn paint_span(&mut self, y: usize, x0: usize, x1: usize) {
        let alpha = self.global_alpha();
        let op = self.state.op;
        let row = y * self.raster.width;
        match &self.state.paint {
            Paint::Solid(c) => {
                let src = scale(c.premultiplied(), alpha);
                for x in x0..x1 {
                    self.raster.blend(row + x, src, op);
                }
            }
            Paint::Radial(g) => {
                for x in x0..x1 {
                    let p = vec2(x as f64 + 0.5, y as f64 + 0.5);
                    let src = scale(sample_radial(g, p), alpha);
                    self.raster.blend(row + x, src, op);
                }
            }
        }
    }

    /// Global alpha clamped to `0..=1`; NaN counts as zero.
    fn global_alpha(&self) -> f32 {
        if self.state.alpha.is_finite() {
            self.state.alpha.clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }
}

impl Surface for Canvas {
    fn width(&self) -> usize {
        self.raster.width
    }

    fn height(&self) -> usize {
        self.raster.height
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    fn set_fill(&mut self, paint: Paint) {
        self.state.paint = paint;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn set_composite(&mut self, op: Composite) {
        self.state.op = op;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, p: Vec2) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Vec2) {
        self.path.line_to(p);
    }

    fn arc(&mut self, center: Vec2, radius: f64, start: f64, end: f64) {
        self.path.arc(center, radius, start, end);
    }

    fn rect(&mut self, top_left: Vec2, size: Vec2) {
        self.path.rect(top_left, size);
    }

    fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let path = std::mem::take(&mut self.path);
        path.for_each_span(self.raster.width, self.raster.height, |y, x0, x1| {
            self.paint_span(y, x0, x1)
        });
        self.path = path;
    }

    fn fill_rect(&mut self, top_left: Vec2, size: Vec2) {
        let a = top_left;
        let b = top_left + size;
        if !(a.is_finite() && b.is_finite()) {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let clamp_x = |v: f64| pixel_start(v).clamp(0, self.raster.width as i64) as usize;
        let clamp_y = |v: f64| pixel_start(v).clamp(0, self.raster.height as i64) as usize;
        let (x0, x1) = (clamp_x(lo.x), clamp_x(hi.x));
        let (y0, y1) = (clamp_y(lo.y), clamp_y(hi.y));
        for y in y0..y1 {
            self.paint_span(y, x0, x1);
        }
    }

    fn clear(&mut self) {
        self.raster.pixels.fill([0.0; 4]);
    }

    fn draw_image(&mut self, image: &Raster, x: i32, y: i32) {
        let alpha = self.global_alpha();
        let op = self.state.op;
        let (w, h) = (self.raster.width as i64, self.raster.height as i64);

        // intersect the image rectangle with our own
        let sx0 = (-(x as i64)).max(0);
        let sy0 = (-(y as i64)).max(0);
        let sx1 = (image.width as i64).min(w - x as i64);
        let sy1 = (image.height as i64).min(h - y as i64);

        for sy in sy0..sy1 {
            let dy = (sy + y as i64) as usize;
            for sx in sx0..sx1 {
                let dx = (sx + x as i64) as usize;
                let src = scale(image.pixels[sy as usize * image.width + sx as usize], alpha);
                self.raster.blend(dy * self.raster.width + dx, src, op);
            }
        }
    }
}

/*──────────────────────── paint helpers ──────────────────────────────*/

#[inline]
fn scale(p: Pixel, k: f32) -> Pixel {
    [p[0] * k, p[1] * k, p[2] * k, p[3] * k]
}

/// Gradient parameter for `p`: the largest `t` with `r(t) ≥ 0` such that
/// `p` lies on the circle interpolated at `t`.
fn radial_t(g: &RadialGradient, p: Vec2) -> Option<f64> {
    let cd = g.end - g.start;
    let dr = g.end_radius - g.start_radius;
    let q = p - g.start;

    // a·t² − 2·b·t + c = 0
    let a = cd.length_squared() - dr * dr;
    let b = q.dot(cd) + g.start_radius * dr;
    let c = q.length_squared() - g.start_radius * g.start_radius;
    let valid = |t: f64| g.start_radius + t * dr >= 0.0;

    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return None;
        }
        let t = c / (2.0 * b);
        return valid(t).then_some(t);
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let (t1, t2) = ((b + s) / a, (b - s) / a);
    let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
    if valid(hi) {
        Some(hi)
    } else if valid(lo) {
        Some(lo)
    } else {
        None
    }
}

fn sample_radial(g: &RadialGradient, p: Vec2) -> Pixel {
    let stops = g.stops();
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0.0; 4];
    };
    let Some(t) = radial_t(g, p) else {
        return [0.0; 4];
    };
    if !t.is_finite() {
        return [0.0; 4];
    }

    if t <= first.offset {
        return first.color.premultiplied();
    }
    if t >= last.offset {
        return last.color.premultiplied();
    }
    // first stop strictly past t
    let i = stops.partition_point(|s| s.offset <= t);
    let (s0, s1) = (stops[i - 1], stops[i]);
    let span = s1.offset - s0.offset;
    let k = if span > 0.0 { ((t - s0.offset) / span) as f32 } else { 1.0 };
    let (c0, c1) = (s0.color.premultiplied(), s1.color.premultiplied());
    [
        c0[0] + (c1[0] - c0[0]) * k,
        c0[1] + (c1[1] - c0[1]) * k,
        c0[2] + (c1[2] - c0[2]) * k,
        c0[3] + (c1[3] - c0[3]) * k,
    ]
}

/*──────────────────────────────── Tests ───────────────────────────────*/
