//! Path building and non-zero scanline coverage.
//!
//! Coverage is binary and sampled at pixel centres: a pixel `(x, y)` is
//! inside when the point `(x + 0.5, y + 0.5)` has a non-zero winding number.
//! Edges with a non-finite endpoint contribute nothing, which is how NaN
//! geometry from degenerate shadow casts turns into a no-op fill.

use std::f64::consts::TAU;

use crate::math::{Vec2, vec2};

/// Maximum distance (px) between an arc and its flattened chords.
const ARC_TOLERANCE: f64 = 0.25;
const MAX_ARC_SEGMENTS: usize = 512;

#[derive(Clone, Debug, Default)]
pub(crate) struct Path {
    subpaths: Vec<Vec<Vec2>>,
}

impl Path {
    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.len() < 2)
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.subpaths.push(vec![p]);
    }

    /// Without a current point this starts a new sub-path, like `move_to`.
    pub fn line_to(&mut self, p: Vec2) {
        match self.subpaths.last_mut() {
            Some(sp) => sp.push(p),
            None => self.move_to(p),
        }
    }

    /// Clockwise arc (y-down), joined to the current point by a line.
    pub fn arc(&mut self, center: Vec2, radius: f64, start: f64, end: f64) {
        if radius < 0.0 {
            return;
        }
        let delta = end - start;
        let sweep = if delta >= TAU { TAU } else { delta.rem_euclid(TAU) };

        let segments = arc_segments(radius, sweep);
        for i in 0..=segments {
            let a = start + sweep * i as f64 / segments as f64;
            let (s, c) = a.sin_cos();
            self.line_to(center + vec2(c, s) * radius);
        }
    }

    /// Closed rectangle; the current point ends up back at `top_left`.
    pub fn rect(&mut self, top_left: Vec2, size: Vec2) {
        let (x, y) = (top_left.x, top_left.y);
        self.subpaths.push(vec![
            top_left,
            vec2(x + size.x, y),
            vec2(x + size.x, y + size.y),
            vec2(x, y + size.y),
        ]);
        self.move_to(top_left);
    }

    /// Every edge of every sub-path, closing edges included.
    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.subpaths.iter().filter(|sp| sp.len() >= 2).flat_map(|sp| {
            let closing = (sp[sp.len() - 1], sp[0]);
            sp.windows(2).map(|w| (w[0], w[1])).chain(std::iter::once(closing))
        })
    }

    /// Call `span(y, x0, x1)` for each covered run `x0..x1` of row `y`.
    pub fn for_each_span<F>(&self, width: usize, height: usize, mut span: F)
    where
        F: FnMut(usize, usize, usize),
    {
        let edges: Vec<Edge> = self.edges().filter_map(Edge::new).collect();
        if edges.is_empty() || width == 0 || height == 0 {
            return;
        }

        let y_min = edges.iter().map(|e| e.y0).fold(f64::INFINITY, f64::min);
        let y_max = edges.iter().map(|e| e.y1).fold(f64::NEG_INFINITY, f64::max);
        let row_first = pixel_start(y_min).clamp(0, height as i64) as usize;
        let row_end = pixel_start(y_max).clamp(0, height as i64) as usize;

        let mut crossings: Vec<(f64, i32)> = Vec::with_capacity(16);
        for y in row_first..row_end {
            let sy = y as f64 + 0.5;
            crossings.clear();
            crossings.extend(edges.iter().filter_map(|e| e.crossing(sy)));
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let x0 = pixel_start(pair[0].0).clamp(0, width as i64) as usize;
                let x1 = pixel_start(pair[1].0).clamp(0, width as i64) as usize;
                if x0 < x1 {
                    span(y, x0, x1);
                }
            }
        }
    }
}

/// First pixel index whose centre is at or past `v`.
#[inline]
pub(crate) fn pixel_start(v: f64) -> i64 {
    (v - 0.5).ceil() as i64
}

fn arc_segments(radius: f64, sweep: f64) -> usize {
    if !(radius.is_finite() && sweep.is_finite()) || sweep == 0.0 {
        return 1;
    }
    let step = if radius <= ARC_TOLERANCE {
        TAU / 8.0
    } else {
        2.0 * (1.0 - ARC_TOLERANCE / radius).acos()
    };
    ((sweep / step).ceil() as usize).clamp(1, MAX_ARC_SEGMENTS)
}

/// Non-horizontal edge, stored top to bottom.
struct Edge {
    x0: f64,
    y0: f64,
    y1: f64,
    dxdy: f64,
    dir: i32,
}

impl Edge {
    fn new((a, b): (Vec2, Vec2)) -> Option<Self> {
        if !(a.is_finite() && b.is_finite()) || a.y == b.y {
            return None;
        }
        let (top, bot, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        Some(Self {
            x0: top.x,
            y0: top.y,
            y1: bot.y,
            dxdy: (bot.x - top.x) / (bot.y - top.y),
            dir,
        })
    }

    /// Half-open in y so shared vertices are counted once.
    #[inline]
    fn crossing(&self, sy: f64) -> Option<(f64, i32)> {
        (self.y0 <= sy && sy < self.y1).then(|| (self.x0 + (sy - self.y0) * self.dxdy, self.dir))
    }
}
