use crate::error::{GeometryError, Result};
use crate::geometry::cubic::CubicBezier;
use crate::math::{ensure_finite, lexicographic_cmp, normalized, Point2, Vector2};

use super::cubic_fit::fit_curve;
use super::{FitOptions, FitReport};

/// Samples per cubic when checking a fitted rail for monotone flow.
const MONOTONE_SAMPLES: usize = 6;

/// Backward slack allowed along the centerline before a rail counts as
/// reversing.
const MONOTONE_SLACK: f64 = 1e-6;

/// Largest tangent deviation from the end-to-end axis, in degrees, for a
/// centerline to count as straight.
const STRAIGHT_CENTERLINE_DEGREES: f64 = 2.0;

/// Polyline approximation of a stroke's centerline, parameterized by
/// normalized arc length `s` in `[0, 1]`.
///
/// Each sample carries the unit tangent of the segment leaving it; the last
/// sample repeats the tangent of the last segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    points: Vec<Point2>,
    s: Vec<f64>,
    tangents: Vec<Vector2>,
}

impl Centerline {
    /// Creates a centerline from its sample points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinitePoint` for non-finite samples and
    /// `GeometryError::Degenerate` when fewer than 2 samples are given or the
    /// samples have no length.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        ensure_finite(&points)?;
        if points.len() < 2 {
            return Err(GeometryError::Degenerate("centerline needs at least 2 points".to_owned()).into());
        }
        let mut s = Vec::with_capacity(points.len());
        let mut total = 0.0;
        s.push(0.0);
        for w in points.windows(2) {
            total += (w[1] - w[0]).norm();
            s.push(total);
        }
        if total <= 1e-9 {
            return Err(GeometryError::Degenerate("centerline has zero length".to_owned()).into());
        }
        for v in &mut s {
            *v /= total;
        }

        // Zero-length segments borrow the previous direction, or the first
        // real one when they lead the centerline.
        let directions: Vec<Option<Vector2>> = points.windows(2).map(|w| normalized(&(w[1] - w[0]))).collect();
        let mut current = directions.iter().flatten().next().copied().unwrap_or_else(|| Vector2::new(1.0, 0.0));
        let mut tangents = Vec::with_capacity(points.len());
        for d in &directions {
            if let Some(d) = d {
                current = *d;
            }
            tangents.push(current);
        }
        tangents.push(current);

        Ok(Self { points, s, tangents })
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn tangents(&self) -> &[Vector2] {
        &self.tangents
    }

    /// Unit vector from the first sample to the last, if they differ.
    #[must_use]
    pub fn axis(&self) -> Option<Vector2> {
        normalized(&(self.points[self.points.len() - 1] - self.points[0]))
    }

    /// Whether every tangent stays within `max_degrees` of the axis.
    #[must_use]
    pub fn is_straight(&self, max_degrees: f64) -> bool {
        let Some(axis) = self.axis() else {
            return false;
        };
        let min_dot = max_degrees.to_radians().cos();
        self.tangents.iter().all(|t| t.dot(&axis) >= min_dot)
    }

    /// Normalized arc-length position of the centerline point closest to `p`.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        let (i, t, _) = self.closest(p);
        self.s[i] + (self.s[i + 1] - self.s[i]) * t
    }

    /// Signed distance from the closest centerline point to `p`, positive on
    /// the left of the centerline's direction.
    #[must_use]
    pub fn offset(&self, p: &Point2) -> f64 {
        let (i, _, foot) = self.closest(p);
        let tangent = self.tangents[i];
        (p - foot).dot(&Vector2::new(-tangent.y, tangent.x))
    }

    /// Segment index, segment parameter and position of the centerline
    /// point closest to `p`.
    fn closest(&self, p: &Point2) -> (usize, f64, Point2) {
        let mut best = (0, 0.0, self.points[0]);
        let mut best_dist = f64::INFINITY;
        for i in 0..self.points.len() - 1 {
            let a = self.points[i];
            let ab = self.points[i + 1] - a;
            let denom = ab.norm_squared();
            let t = if denom > 1e-9 {
                ((p - a).dot(&ab) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let foot = a + ab * t;
            let dist = (p - foot).norm();
            if dist < best_dist {
                best_dist = dist;
                best = (i, t, foot);
            }
        }
        best
    }
}

/// Whether walking an open ring changes direction along the centerline at
/// most twice (once at each end of the stroke).
///
/// Steps shorter than `eps` in `s` carry no direction.
#[must_use]
pub fn is_ring_monotone(ring: &[Point2], centerline: &Centerline, eps: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return true;
    }
    let s: Vec<f64> = ring.iter().map(|p| centerline.project(p)).collect();
    let mut changes = 0;
    let mut last_sign = 0;
    for i in 0..n {
        let ds = s[(i + 1) % n] - s[i];
        let sign = if ds > eps {
            1
        } else if ds < -eps {
            -1
        } else {
            0
        };
        if sign == 0 {
            continue;
        }
        if last_sign != 0 && sign != last_sign {
            changes += 1;
        }
        last_sign = sign;
    }
    changes <= 2
}

/// Whether samples along a fitted path never move backward along the
/// centerline by more than a small slack.
#[must_use]
pub fn is_path_monotone(segments: &[CubicBezier], centerline: &Centerline) -> bool {
    let mut last = f64::NEG_INFINITY;
    for seg in segments {
        for p in seg.sample(MONOTONE_SAMPLES) {
            let s = centerline.project(&p);
            if s + MONOTONE_SLACK < last {
                return false;
            }
            last = s;
        }
    }
    true
}

/// Splits an open ring into two rails running from its minimum to its
/// maximum centerline position, one walking forward and one backward.
///
/// Each rail is reordered by `s` (ties by position) so it flows one way.
#[must_use]
pub fn split_rails(ring: &[Point2], centerline: &Centerline) -> (Vec<Point2>, Vec<Point2>) {
    let n = ring.len();
    if n < 2 {
        return (ring.to_vec(), ring.to_vec());
    }
    let s: Vec<f64> = ring.iter().map(|p| centerline.project(p)).collect();
    let by_s = |a: usize, b: usize| s[a].total_cmp(&s[b]).then(lexicographic_cmp(&ring[a], &ring[b]));
    let min = (0..n).min_by(|&a, &b| by_s(a, b)).unwrap_or(0);
    // Ties on `s` go to the smaller position at both ends.
    let max = (0..n)
        .max_by(|&a, &b| s[a].total_cmp(&s[b]).then(lexicographic_cmp(&ring[b], &ring[a])))
        .unwrap_or(0);

    let mut forward = vec![min];
    let mut i = min;
    while i != max {
        i = (i + 1) % n;
        forward.push(i);
    }
    let mut backward = vec![min];
    let mut i = min;
    while i != max {
        i = (i + n - 1) % n;
        backward.push(i);
    }

    let order = |mut idx: Vec<usize>| -> Vec<Point2> {
        idx.sort_by(|&a, &b| by_s(a, b));
        idx.into_iter().map(|k| ring[k]).collect()
    };
    (order(forward), order(backward))
}

/// Splits an open ring into the points left and right of a straight
/// centerline's axis, each ordered along the axis (ties by position).
///
/// Points on the axis go left. Returns `None` when the centerline has no
/// axis or either side has fewer than 2 points.
#[must_use]
pub fn split_rails_by_side(ring: &[Point2], centerline: &Centerline) -> Option<(Vec<Point2>, Vec<Point2>)> {
    let axis = centerline.axis()?;
    let normal = Vector2::new(-axis.y, axis.x);
    let start = centerline.points()[0];
    let mut left = Vec::new();
    let mut right = Vec::new();
    for p in ring {
        let along = (p - start).dot(&axis);
        let side = (p - start).dot(&normal);
        if side >= 0.0 {
            left.push((along, *p));
        } else {
            right.push((along, *p));
        }
    }
    if left.len() < 2 || right.len() < 2 {
        return None;
    }
    let order = |mut side: Vec<(f64, Point2)>| -> Vec<Point2> {
        side.sort_by(|a, b| a.0.total_cmp(&b.0).then(lexicographic_cmp(&a.1, &b.1)));
        side.into_iter().map(|(_, p)| p).collect()
    };
    Some((order(left), order(right)))
}

/// Splits an outline into two rails for fitting.
///
/// A straight centerline splits the outline by side of its axis; any other
/// centerline, or a side split leaving a side with fewer than 2 points,
/// falls back to [`split_rails`].
#[must_use]
pub fn split_rails_for_fitting(ring: &[Point2], centerline: &Centerline) -> (Vec<Point2>, Vec<Point2>) {
    if centerline.is_straight(STRAIGHT_CENTERLINE_DEGREES) {
        if let Some(rails) = split_rails_by_side(ring, centerline) {
            return rails;
        }
    }
    split_rails(ring, centerline)
}

/// Moves both rails' first points to their midpoint, and likewise their last
/// points, so the rails meet at both ends.
pub fn align_rail_ends(a: &mut [Point2], b: &mut [Point2]) {
    let (Some(&a0), Some(&b0), Some(&a1), Some(&b1)) = (a.first(), b.first(), a.last(), b.last()) else {
        return;
    };
    let start = nalgebra::center(&a0, &b0);
    let end = nalgebra::center(&a1, &b1);
    if let (Some(first_a), Some(first_b)) = (a.first_mut(), b.first_mut()) {
        *first_a = start;
        *first_b = start;
    }
    if let (Some(last_a), Some(last_b)) = (a.last_mut(), b.last_mut()) {
        *last_a = end;
        *last_b = end;
    }
}

/// Fits a rail so its samples flow forward along the centerline.
///
/// When the fit reverses direction, the rail is bisected at its middle point
/// and each half refitted, down to chains of 3 points or the monotone depth
/// cap.
#[must_use]
pub fn fit_monotone_chain(
    points: &[Point2],
    centerline: &Centerline,
    options: &FitOptions,
    report: &mut FitReport,
) -> Vec<CubicBezier> {
    fit_monotone_recursive(points, centerline, options, 0, report)
}

fn fit_monotone_recursive(
    points: &[Point2],
    centerline: &Centerline,
    options: &FitOptions,
    depth: usize,
    report: &mut FitReport,
) -> Vec<CubicBezier> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut trial = FitReport::default();
    let curves = fit_curve(points, options, &mut trial);
    let monotone = is_path_monotone(&curves, centerline);
    if monotone || points.len() <= 3 || depth >= options.monotone_max_depth() {
        if !monotone {
            report.monotone_depth_limited += 1;
        }
        report.merge(&trial);
        return curves;
    }
    report.monotone_splits += 1;
    let mid = points.len() / 2;
    let mut left = fit_monotone_recursive(&points[..=mid], centerline, options, depth + 1, report);
    left.extend(fit_monotone_recursive(&points[mid..], centerline, options, depth + 1, report));
    left
}
