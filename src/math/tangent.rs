use smallvec::{SmallVec, smallvec};

use super::Vec2;

/// Two tangent points are accepted as a pair when their squared distances
/// to the origin differ by less than this.
pub const TANGENT_EPSILON: f64 = 1e-6;

/// Tangent points, origin-relative. Normally two; four when ambiguous.
pub type Tangents = SmallVec<[Vec2; 4]>;

/// Tangent points of the lines through the origin touching a circle.
///
/// `center` is the circle centre relative to the origin.  The tangent
/// angles `t` satisfy `cos t = (−r·x₀ ± y₀·√(|c|² − r²)) / |c|²`; since the
/// sign of `sin t` is lost, four candidates `c + r·(cos t, ±sin t)` are
/// built and the real pair is the one whose members are equidistant from
/// the origin.  Candidates are compared in an order that never yields a
/// crossing pair.
///
/// * Origin inside the circle (`r² ≥ |c|²`): every component is NaN and the
///   caller draws nothing.
/// * No equidistant pair (e.g. `r ≈ 0`): all four candidates are returned.
pub fn tangent_points(radius: f64, center: Vec2) -> Tangents {
    let (x0, y0) = (center.x, center.y);
    let length2 = center.length_squared();

    let length2a = y0 * (length2 - radius * radius).sqrt();

    let tt = ((-radius * x0 + length2a) / length2).acos();
    let nt = ((-radius * x0 - length2a) / length2).acos();

    let (tt_sin, tt_cos) = tt.sin_cos();
    let (nt_sin, nt_cos) = nt.sin_cos();
    let (tt_cos, tt_sin) = (radius * tt_cos, radius * tt_sin);
    let (nt_cos, nt_sin) = (radius * nt_cos, radius * nt_sin);

    let same = |a: f64, b: f64| (a - b).abs() < TANGENT_EPSILON;

    let s0 = Vec2::new(x0 + nt_cos, y0 + nt_sin);
    let s1 = Vec2::new(x0 + tt_cos, y0 - tt_sin);
    let (d0, d1) = (s0.length_squared(), s1.length_squared());
    if same(d0, d1) {
        return smallvec![s0, s1];
    }

    let s2 = Vec2::new(x0 + nt_cos, y0 - nt_sin);
    let d2 = s2.length_squared();
    if same(d1, d2) {
        return smallvec![s2, s1];
    }
    if same(d0, d2) {
        return smallvec![s0, s2];
    }

    let s3 = Vec2::new(x0 + tt_cos, y0 + tt_sin);
    let d3 = s3.length_squared();
    if same(d2, d3) {
        return smallvec![s2, s3];
    }
    if same(d1, d3) {
        return smallvec![s1, s3];
    }
    if same(d0, d3) {
        return smallvec![s0, s3];
    }

    smallvec![s0, s1, s2, s3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;

    fn is_tangent(radius: f64, center: Vec2, p: Vec2) -> bool {
        // on the circle, and the radius is perpendicular to the sight line
        ((p - center).length_squared() - radius * radius).abs() < 1e-9
            && (p - center).dot(p).abs() < 1e-9
    }

    #[test]
    fn circle_on_x_axis() {
        let t = tangent_points(1.0, vec2(2.0, 0.0));
        assert_eq!(t.len(), 2);
        let h = 3f64.sqrt() / 2.0;
        assert!((t[0] - vec2(1.5, h)).length() < 1e-12);
        assert!((t[1] - vec2(1.5, -h)).length() < 1e-12);
    }

    #[test]
    fn circle_on_y_axis_skips_crossing_pair() {
        let c = vec2(0.0, 2.0);
        let t = tangent_points(1.0, c);
        assert_eq!(t.len(), 2);
        assert!(t[0].x < 0.0 && t[1].x > 0.0);
        assert!(t.iter().all(|&p| is_tangent(1.0, c, p)));
    }

    #[test]
    fn general_position_is_tangent() {
        let c = vec2(9.0, 3.0);
        let t = tangent_points(6.0, c);
        assert_eq!(t.len(), 2);
        assert!(t.iter().all(|&p| is_tangent(6.0, c, p)));
        assert!((t[0].length_squared() - 54.0).abs() < 1e-9);
    }

    #[test]
    fn origin_inside_circle_is_nan() {
        let t = tangent_points(10.0, vec2(3.0, 4.0));
        assert!(!t.is_empty());
        assert!(t.iter().all(|p| p.x.is_nan() && p.y.is_nan()));
    }

    #[test]
    fn degenerate_radius_collapses_to_center() {
        let c = vec2(3.0, 4.0);
        let t = tangent_points(0.0, c);
        assert_eq!(t.len(), 2);
        assert!(t.iter().all(|&p| (p - c).length() < 1e-12));
    }
}
