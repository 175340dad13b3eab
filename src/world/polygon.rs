use crate::{
    math::{Bounds, Vec2, normalize, vec2},
    renderer::Surface,
};

use super::obstacle::{GeometryError, Occluder, trace};

/// Where a polygon's vertex list comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PolygonForm {
    /// Arbitrary vertices supplied by the caller.
    Free,
    /// Open segment `[a, b]`.
    Line { a: Vec2, b: Vec2 },
    /// Axis-aligned box, vertices in clockwise (y-down) order.
    Rectangle { top_left: Vec2, bottom_right: Vec2 },
}

/// Vertex loop, plus the corners it was derived from for lines and
/// rectangles.  The two are kept in sync by every mutator.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
    form: PolygonForm,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            form: PolygonForm::Free,
        }
    }

    pub fn line(a: Vec2, b: Vec2) -> Self {
        Self {
            points: vec![a, b],
            form: PolygonForm::Line { a, b },
        }
    }

    pub fn rectangle(top_left: Vec2, bottom_right: Vec2) -> Self {
        Self {
            points: rectangle_points(top_left, bottom_right),
            form: PolygonForm::Rectangle {
                top_left,
                bottom_right,
            },
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn form(&self) -> PolygonForm {
        self.form
    }

    #[inline]
    pub fn is_rectangle(&self) -> bool {
        matches!(self.form, PolygonForm::Rectangle { .. })
    }

    /// Replace the vertex list; the polygon becomes free-form.
    pub fn set_points(&mut self, points: Vec<Vec2>) {
        self.points = points;
        self.form = PolygonForm::Free;
    }

    /// Turn into (or move) the segment `[a, b]`.
    pub fn set_endpoints(&mut self, a: Vec2, b: Vec2) {
        *self = Self::line(a, b);
    }

    /// Turn into (or move) the rectangle spanned by the two corners.
    pub fn set_corners(&mut self, top_left: Vec2, bottom_right: Vec2) {
        *self = Self::rectangle(top_left, bottom_right);
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
        match &mut self.form {
            PolygonForm::Free => {}
            PolygonForm::Line { a, b } => {
                *a += delta;
                *b += delta;
            }
            PolygonForm::Rectangle {
                top_left,
                bottom_right,
            } => {
                *top_left += delta;
                *bottom_right += delta;
            }
        }
    }

    /// Fill the rectangle directly with the surface's current paint,
    /// bypassing the path.
    pub fn fill_rect(&self, surface: &mut dyn Surface) -> Result<(), GeometryError> {
        match self.form {
            PolygonForm::Rectangle {
                top_left,
                bottom_right,
            } => {
                surface.fill_rect(top_left, bottom_right - top_left);
                Ok(())
            }
            _ => Err(GeometryError::NotARectangle),
        }
    }

    /// `(previous, current)` vertex pairs, starting with the closing edge.
    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let last = self.points.last().copied();
        last.into_iter()
            .chain(self.points.iter().copied())
            .zip(self.points.iter().copied())
    }
}

fn rectangle_points(top_left: Vec2, bottom_right: Vec2) -> Vec<Vec2> {
    vec![
        top_left,
        vec2(bottom_right.x, top_left.y),
        bottom_right,
        vec2(top_left.x, bottom_right.y),
    ]
}

impl Occluder for Polygon {
    /// Componentwise min/max of the vertices.
    fn bounds(&self) -> Result<Bounds, GeometryError> {
        let (first, rest) = self
            .points
            .split_first()
            .ok_or(GeometryError::EmptyPolygon)?;
        Ok(rest
            .iter()
            .fold(Bounds::new(*first, *first), |b, &p| b.expand_to(p)))
    }

    /// Even-odd crossing test.  The half-open comparisons on `y` count a
    /// vertex lying exactly on the test ray once.
    fn contains(&self, point: Vec2) -> bool {
        let (x, y) = (point.x, point.y);
        let mut inside = false;
        for (p1, p2) in self.edges() {
            let crosses_row = (p2.y < y && p1.y >= y) || (p1.y < y && p2.y >= y);
            if crosses_row
                && (p2.x <= x || p1.x <= x)
                && p2.x + (y - p2.y) / (p1.y - p2.y) * (p1.x - p2.x) < x
            {
                inside = !inside;
            }
        }
        inside
    }

    fn outline(&self, surface: &mut dyn Surface) -> Result<(), GeometryError> {
        trace(surface, &self.points, true)
    }

    /// One shadow quad per silhouette edge: an edge whose first vertex is
    /// strictly inside `bounds` and whose outward normal `(Δy, −Δx)` points
    /// away from `origin`.
    fn cast(
        &self,
        surface: &mut dyn Surface,
        origin: Vec2,
        bounds: &Bounds,
    ) -> Result<(), GeometryError> {
        if self.points.is_empty() {
            return Err(GeometryError::EmptyPolygon);
        }
        let reach = bounds.extrusion();

        for (a, b) in self.edges() {
            if !bounds.contains_strict(a) {
                continue;
            }
            let origin_to_a = a - origin;
            let origin_to_b = b - origin;
            let a_to_b = b - a;

            let normal = vec2(a_to_b.y, -a_to_b.x);
            if normal.dot(origin_to_a) >= 0.0 {
                continue;
            }

            // origin projected on the segment
            let t = (-origin_to_a).dot(a_to_b) / a_to_b.length_squared();
            let m = if t < 0.0 {
                a
            } else if t > 1.0 {
                b
            } else {
                a + a_to_b * t
            };

            let origin_to_m = normalize(m - origin) * reach;
            let oam = a + origin_to_m;
            let obm = b + origin_to_m;
            let ap = a + normalize(origin_to_a) * reach;
            let bp = b + normalize(origin_to_b) * reach;

            surface.begin_path();
            trace(surface, &[a, b, bp, obm, oam, ap], true)?;
            surface.fill();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Canvas;

    fn square() -> Polygon {
        Polygon::new(vec![
            vec2(0.0, 0.0),
            vec2(4.0, 0.0),
            vec2(4.0, 4.0),
            vec2(0.0, 4.0),
        ])
    }

    #[test]
    fn rectangle_vertex_order() {
        let r = Polygon::rectangle(vec2(0.0, 0.0), vec2(10.0, 10.0));
        assert_eq!(
            r.points(),
            &[
                vec2(0.0, 0.0),
                vec2(10.0, 0.0),
                vec2(10.0, 10.0),
                vec2(0.0, 10.0)
            ]
        );
        assert_eq!(
            r.bounds().unwrap(),
            Bounds::new(vec2(0.0, 0.0), vec2(10.0, 10.0))
        );
    }

    #[test]
    fn setters_resync_vertices() {
        let mut l = Polygon::line(vec2(0.0, 0.0), vec2(5.0, 5.0));
        assert_eq!(l.points(), &[vec2(0.0, 0.0), vec2(5.0, 5.0)]);
        l.set_endpoints(vec2(1.0, 1.0), vec2(2.0, 3.0));
        assert_eq!(l.points(), &[vec2(1.0, 1.0), vec2(2.0, 3.0)]);

        let mut r = Polygon::rectangle(Vec2::ZERO, Vec2::ONE);
        r.set_corners(vec2(2.0, 2.0), vec2(3.0, 5.0));
        assert_eq!(r.points()[2], vec2(3.0, 5.0));
        assert_eq!(r.points()[3], vec2(2.0, 5.0));

        r.set_points(vec![Vec2::ZERO]);
        assert_eq!(r.form(), PolygonForm::Free);
    }

    #[test]
    fn translate_keeps_corners_in_sync() {
        let mut r = Polygon::rectangle(vec2(0.0, 0.0), vec2(2.0, 1.0));
        r.translate(vec2(3.0, 3.0));
        assert_eq!(
            r.form(),
            PolygonForm::Rectangle {
                top_left: vec2(3.0, 3.0),
                bottom_right: vec2(5.0, 4.0)
            }
        );
        assert_eq!(r.points()[1], vec2(5.0, 3.0));
    }

    #[test]
    fn contains_even_odd() {
        let s = square();
        assert!(s.contains(vec2(2.0, 2.0)));
        assert!(!s.contains(vec2(5.0, 2.0)));
        assert!(!s.contains(vec2(-1.0, 2.0)));

        // two overlapping loops cancel under even-odd
        let bow = Polygon::new(vec![
            vec2(0.0, 0.0),
            vec2(4.0, 0.0),
            vec2(4.0, 4.0),
            vec2(0.0, 4.0),
            vec2(0.0, 0.0),
            vec2(4.0, 0.0),
            vec2(4.0, 4.0),
            vec2(0.0, 4.0),
        ]);
        assert!(!bow.contains(vec2(2.0, 2.0)));
    }

    #[test]
    fn line_contains_nothing() {
        let l = Polygon::line(vec2(0.0, 0.0), vec2(5.0, 5.0));
        assert!(!l.contains(vec2(2.5, 2.5)));
        assert!(!l.contains(vec2(1.0, 3.0)));
    }

    #[test]
    fn bounds_of_free_polygon() {
        let p = Polygon::new(vec![vec2(3.0, -1.0), vec2(-2.0, 4.0), vec2(1.0, 7.0)]);
        assert_eq!(
            p.bounds().unwrap(),
            Bounds::new(vec2(-2.0, -1.0), vec2(3.0, 7.0))
        );
        assert_eq!(
            Polygon::new(Vec::new()).bounds(),
            Err(GeometryError::EmptyPolygon)
        );
    }

    #[test]
    fn fill_rect_only_for_rectangles() {
        let mut c = Canvas::new(8, 8);
        assert_eq!(square().fill_rect(&mut c), Err(GeometryError::NotARectangle));
        Polygon::rectangle(vec2(2.0, 2.0), vec2(6.0, 6.0))
            .fill_rect(&mut c)
            .unwrap();
        assert_eq!(c.raster().alpha(2, 2), 1.0);
        assert_eq!(c.raster().alpha(6, 6), 0.0);
    }

    #[test]
    fn rectangle_shadow_extends_away_from_origin() {
        let mut c = Canvas::new(200, 200);
        let bounds = Bounds::around(vec2(100.0, 100.0), 100.0);
        Polygon::rectangle(vec2(140.0, 90.0), vec2(160.0, 110.0))
            .cast(&mut c, vec2(100.0, 100.0), &bounds)
            .unwrap();
        let r = c.raster();
        assert_eq!(r.alpha(180, 100), 1.0);
        assert_eq!(r.alpha(195, 80), 1.0);
        assert_eq!(r.alpha(120, 100), 0.0);
        assert_eq!(r.alpha(150, 60), 0.0);
    }

    #[test]
    fn edges_outside_bounds_cast_nothing() {
        let mut c = Canvas::new(50, 50);
        let bounds = Bounds::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
        Polygon::line(vec2(20.0, 0.0), vec2(20.0, 40.0))
            .cast(&mut c, vec2(5.0, 5.0), &bounds)
            .unwrap();
        let r = c.raster();
        assert!((0..50).all(|y| (0..50).all(|x| r.alpha(x, y) == 0.0)));
    }
}
