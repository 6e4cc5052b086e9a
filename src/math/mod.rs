pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod snap;

use crate::error::{GeometryError, Result};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Default epsilon for point equality, snapping and intersection tests.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Returns `true` when `a` and `b` differ by at most `eps`.
#[must_use]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Per-axis epsilon equality of two points.
#[must_use]
pub fn points_approx_eq(a: &Point2, b: &Point2, eps: f64) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps)
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Normalizes `v`, returning `None` for (near) zero-length vectors.
#[must_use]
pub fn normalized(v: &Vector2) -> Option<Vector2> {
    let len = v.norm();
    if len <= 1e-12 || !len.is_finite() {
        return None;
    }
    Some(v / len)
}

/// Total lexicographic order on points: x first, then y.
#[must_use]
pub fn lexicographic_cmp(a: &Point2, b: &Point2) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Checks that every point has finite coordinates.
///
/// # Errors
///
/// Returns `GeometryError::NonFinitePoint` for the first offending point.
pub fn ensure_finite(points: &[Point2]) -> Result<()> {
    for (index, p) in points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(GeometryError::NonFinitePoint {
                index,
                x: p.x,
                y: p.y,
            }
            .into());
        }
    }
    Ok(())
}
