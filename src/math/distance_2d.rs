use super::Point2;

/// Distance from `p` to the closest point of segment `a`-`b`.
///
/// A zero-length segment measures the distance to `a`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-20 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn interior_projection() {
        let d = point_to_segment_dist(&p(0.5, 1.0), &p(0.0, 0.0), &p(1.0, 0.0));
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projection_past_end_clamps() {
        let d = point_to_segment_dist(&p(4.0, 4.0), &p(0.0, 0.0), &p(1.0, 0.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_length_segment() {
        let a = p(1.0, 1.0);
        assert!((point_to_segment_dist(&p(4.0, 5.0), &a, &a) - 5.0).abs() < 1e-12);
    }
}
