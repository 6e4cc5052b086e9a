use crate::math::{Point2, Vector2};

/// A cubic Bezier segment `(p0, p1, p2, p3)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl CubicBezier {
    /// Creates a cubic from its four control points.
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// A straight segment encoded as a cubic, handles at the chord thirds.
    #[must_use]
    pub fn line(from: Point2, to: Point2) -> Self {
        let d = to - from;
        Self {
            p0: from,
            p1: from + d * (1.0 / 3.0),
            p2: from + d * (2.0 / 3.0),
            p3: to,
        }
    }

    /// Evaluates the curve at `t` in `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point2 {
        let mt = 1.0 - t;
        let b0 = mt * mt * mt;
        let b1 = 3.0 * mt * mt * t;
        let b2 = 3.0 * mt * t * t;
        let b3 = t * t * t;
        Point2::from(
            self.p0.coords * b0 + self.p1.coords * b1 + self.p2.coords * b2 + self.p3.coords * b3,
        )
    }

    /// First derivative with respect to `t`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * mt * mt)
            + (self.p2 - self.p1) * (6.0 * mt * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Second derivative with respect to `t`.
    #[must_use]
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        (self.p2.coords - self.p1.coords * 2.0 + self.p0.coords) * (6.0 * mt)
            + (self.p3.coords - self.p2.coords * 2.0 + self.p1.coords) * (6.0 * t)
    }

    /// The same curve traversed from `p3` back to `p0`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            p0: self.p3,
            p1: self.p2,
            p2: self.p1,
            p3: self.p0,
        }
    }

    /// `samples + 1` evenly spaced points from `p0` to `p3` inclusive.
    #[must_use]
    pub fn sample(&self, samples: usize) -> Vec<Point2> {
        let samples = samples.max(1);
        #[allow(clippy::cast_precision_loss)]
        (0..=samples)
            .map(|i| self.evaluate(i as f64 / samples as f64))
            .collect()
    }
}

/// Reverses a chained path, segment order and direction both.
#[must_use]
pub fn reverse_path(segments: &[CubicBezier]) -> Vec<CubicBezier> {
    segments.iter().rev().map(CubicBezier::reversed).collect()
}

/// Straight-line cubics through consecutive points.
#[must_use]
pub fn polyline_to_cubics(points: &[Point2]) -> Vec<CubicBezier> {
    points
        .windows(2)
        .map(|w| CubicBezier::line(w[0], w[1]))
        .collect()
}

/// Samples a chained path into one polyline, dropping shared joints.
#[must_use]
pub fn sample_path(segments: &[CubicBezier], samples_per_curve: usize) -> Vec<Point2> {
    let mut points = Vec::with_capacity(segments.len() * samples_per_curve + 1);
    for (i, seg) in segments.iter().enumerate() {
        let sampled = seg.sample(samples_per_curve);
        let skip = usize::from(i > 0);
        points.extend(sampled.into_iter().skip(skip));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arch() -> CubicBezier {
        CubicBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 3.0),
            Point2::new(3.0, 3.0),
            Point2::new(3.0, 0.0),
        )
    }

    #[test]
    fn evaluate_endpoints_exact() {
        let c = arch();
        assert_eq!(c.evaluate(0.0), c.p0);
        assert_eq!(c.evaluate(1.0), c.p3);
        let mid = c.evaluate(0.5);
        assert_relative_eq!(mid.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(mid.y, 2.25, epsilon = 1e-12);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let c = arch();
        let h = 1e-6;
        let t = 0.3;
        let fd = (c.evaluate(t + h) - c.evaluate(t - h)) / (2.0 * h);
        let d = c.derivative(t);
        assert_relative_eq!(d.x, fd.x, epsilon = 1e-5);
        assert_relative_eq!(d.y, fd.y, epsilon = 1e-5);
    }

    #[test]
    fn second_derivative_matches_finite_difference() {
        let c = arch();
        let h = 1e-5;
        let t = 0.6;
        let fd = (c.derivative(t + h) - c.derivative(t - h)) / (2.0 * h);
        let d = c.second_derivative(t);
        assert_relative_eq!(d.x, fd.x, epsilon = 1e-4);
        assert_relative_eq!(d.y, fd.y, epsilon = 1e-4);
    }

    #[test]
    fn line_cubic_is_straight() {
        let c = CubicBezier::line(Point2::new(0.0, 0.0), Point2::new(3.0, 6.0));
        let p = c.evaluate(0.25);
        assert_relative_eq!(p.x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn reverse_path_swaps_direction() {
        let a = CubicBezier::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let b = CubicBezier::line(Point2::new(1.0, 0.0), Point2::new(1.0, 1.0));
        let rev = reverse_path(&[a, b]);
        assert_eq!(rev[0].p0, Point2::new(1.0, 1.0));
        assert_eq!(rev[0].p3, rev[1].p0);
        assert_eq!(rev[1].p3, Point2::new(0.0, 0.0));
    }

    #[test]
    fn sample_path_shares_joints() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)];
        let path = polyline_to_cubics(&pts);
        assert_eq!(path.len(), 2);
        let sampled = sample_path(&path, 4);
        assert_eq!(sampled.len(), 9);
        assert_eq!(sampled[4], Point2::new(1.0, 0.0));
    }
}
