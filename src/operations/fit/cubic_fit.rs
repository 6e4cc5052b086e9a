use crate::geometry::cubic::{polyline_to_cubics, CubicBezier};
use crate::math::{normalized, Point2, Vector2};

use super::{FitOptions, FitReport};

/// Fits an open chain with a minimal run of cubics.
///
/// End tangents come from the first and last chain edges. The first `p0`
/// and the last `p3` are the chain's endpoints exactly.
#[must_use]
pub fn fit_curve(points: &[Point2], options: &FitOptions, report: &mut FitReport) -> Vec<CubicBezier> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let left = normalized(&(points[1] - points[0])).unwrap_or_else(|| Vector2::new(1.0, 0.0));
    let right = normalized(&(points[n - 2] - points[n - 1])).unwrap_or_else(|| Vector2::new(-1.0, 0.0));
    let mut segments = Vec::new();
    fit_cubic(points, left, right, options, 0, report, &mut segments);
    segments
}

fn fit_cubic(
    points: &[Point2],
    left: Vector2,
    right: Vector2,
    options: &FitOptions,
    depth: usize,
    report: &mut FitReport,
    out: &mut Vec<CubicBezier>,
) {
    let n = points.len();
    let tolerance = options.tolerance();
    if n == 2 {
        let dist = (points[1] - points[0]).norm() / 3.0;
        out.push(CubicBezier::new(
            points[0],
            points[0] + left * dist,
            points[1] + right * dist,
            points[1],
        ));
        return;
    }

    // Step 1: Least-squares fit on chord-length parameters.
    let mut u = chord_length_parameterize(points);
    let mut bezier = generate_bezier(points, &u, &left, &right);
    let (mut error, mut split) = compute_max_error(points, &bezier, &u);
    if error <= tolerance {
        out.push(bezier);
        return;
    }

    // Step 2: Newton-Raphson reparameterization.
    for _ in 0..options.max_reparameterize_iterations() {
        u = reparameterize(points, &bezier, &u);
        bezier = generate_bezier(points, &u, &left, &right);
        (error, split) = compute_max_error(points, &bezier, &u);
        if error <= tolerance {
            out.push(bezier);
            return;
        }
    }

    // Step 3: Subdivide at the worst point, or give up on curvature.
    if depth >= options.max_depth() {
        report.depth_limited_chunks += 1;
        out.extend(polyline_to_cubics(points));
        return;
    }
    report.splits += 1;
    let center = normalized(&(points[split - 1] - points[split + 1]))
        .unwrap_or_else(|| Vector2::new(1.0, 0.0));
    fit_cubic(&points[..=split], left, center, options, depth + 1, report, out);
    fit_cubic(&points[split..], -center, right, options, depth + 1, report, out);
}

/// Normalized cumulative chord length; all zero for a zero-length chain.
fn chord_length_parameterize(points: &[Point2]) -> Vec<f64> {
    let mut u = Vec::with_capacity(points.len());
    let mut total = 0.0;
    u.push(0.0);
    for w in points.windows(2) {
        total += (w[1] - w[0]).norm();
        u.push(total);
    }
    if total <= 0.0 {
        return vec![0.0; points.len()];
    }
    u.iter().map(|d| d / total).collect()
}

/// Solves the 2x2 normal equations for the two handle lengths.
///
/// Falls back to a third of the chord when the system is near singular, or
/// when a solved length is not meaningfully positive or longer than the
/// chord. Longer handles let the cubic loop outside its chain.
fn generate_bezier(points: &[Point2], u: &[f64], left: &Vector2, right: &Vector2) -> CubicBezier {
    let p0 = points[0];
    let p3 = points[points.len() - 1];

    let (mut c00, mut c01, mut c11, mut x0, mut x1) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (point, &t) in points.iter().zip(u).take(points.len() - 1).skip(1) {
        let mt = 1.0 - t;
        let b0 = mt * mt * mt;
        let b1 = 3.0 * mt * mt * t;
        let b2 = 3.0 * mt * t * t;
        let b3 = t * t * t;

        let a1 = left * b1;
        let a2 = right * b2;
        c00 += a1.dot(&a1);
        c01 += a1.dot(&a2);
        c11 += a2.dot(&a2);

        let tmp = point.coords - (p0.coords * (b0 + b1) + p3.coords * (b2 + b3));
        x0 += a1.dot(&tmp);
        x1 += a2.dot(&tmp);
    }

    let seg_length = (p3 - p0).norm();
    let det = c00 * c11 - c01 * c01;
    let (mut alpha1, mut alpha2) = if det.abs() > 1e-9 {
        ((x0 * c11 - x1 * c01) / det, (c00 * x1 - c01 * x0) / det)
    } else {
        (seg_length / 3.0, seg_length / 3.0)
    };
    let min_alpha = 1e-6 * seg_length;
    if alpha1 < min_alpha || alpha2 < min_alpha || alpha1 > seg_length || alpha2 > seg_length {
        alpha1 = seg_length / 3.0;
        alpha2 = alpha1;
    }

    CubicBezier::new(p0, p0 + left * alpha1, p3 + right * alpha2, p3)
}

/// Largest distance between a point and its parameter image, and the index
/// where it occurs. Defaults to the middle index when every error is zero.
fn compute_max_error(points: &[Point2], bezier: &CubicBezier, u: &[f64]) -> (f64, usize) {
    let mut max = 0.0;
    let mut split = points.len() / 2;
    for i in 1..points.len() - 1 {
        let dist = (bezier.evaluate(u[i]) - points[i]).norm();
        if dist > max {
            max = dist;
            split = i;
        }
    }
    (max, split)
}

fn reparameterize(points: &[Point2], bezier: &CubicBezier, u: &[f64]) -> Vec<f64> {
    points
        .iter()
        .zip(u)
        .map(|(p, &t)| newton_raphson_step(bezier, p, t))
        .collect()
}

/// One Newton-Raphson step toward the parameter of the point on `bezier`
/// closest to `point`, clamped to `[0, 1]`.
fn newton_raphson_step(bezier: &CubicBezier, point: &Point2, t: f64) -> f64 {
    let d = bezier.evaluate(t) - point;
    let q1 = bezier.derivative(t);
    let q2 = bezier.second_derivative(t);
    let numerator = d.dot(&q1);
    let denominator = q1.dot(&q1) + d.dot(&q2);
    if denominator.abs() < 1e-9 {
        return t;
    }
    (t - numerator / denominator).clamp(0.0, 1.0)
}
