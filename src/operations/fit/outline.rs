use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::error::{OperationError, Result};
use crate::geometry::cubic::{polyline_to_cubics, reverse_path, sample_path, CubicBezier};
use crate::geometry::ring::{close_ring, open_ring};
use crate::math::intersect_2d::polyline_has_self_intersection;
use crate::math::{ensure_finite, Point2};

use super::caps::{cap_segments, detect_caps, trim_rail, RailCaps, TrimmedRail};
use super::monotone::{
    align_rail_ends, fit_monotone_chain, is_ring_monotone, split_rails_for_fitting, Centerline,
};
use super::simplify::simplify_polyline;
use super::{fit_closed, record_report, FitOptions, FitReport, FitResult};

/// Samples per cubic for the self-intersection check.
const CHECK_SAMPLES_PER_CURVE: usize = 24;

/// Upper bound on the sampled polyline length for the self-intersection check.
const CHECK_POINT_CAP: usize = 2000;

/// Direction steps in `s` smaller than this carry no direction.
const MONOTONE_RING_EPS: f64 = 1e-5;

/// Fits a resolved stroke outline along its centerline.
///
/// An outline that flows one way along the centerline on each side, and has
/// no tapered end caps, is fitted as a closed ring with corners. Otherwise
/// the outline is split into two rails. Each rail has its cap points cut
/// off, its body fitted so it flows forward, and the caps are put back as
/// straight segments. A result that crosses itself is replaced with straight
/// segments around the rails, or around the outline when the rails
/// themselves cross.
#[derive(Debug)]
pub struct FitStrokeOutline {
    ring: Vec<Point2>,
    centerline: Centerline,
    options: FitOptions,
}

impl FitStrokeOutline {
    /// Creates a new outline fit.
    #[must_use]
    pub fn new(ring: Vec<Point2>, centerline: Centerline, options: FitOptions) -> Self {
        Self {
            ring,
            centerline,
            options,
        }
    }

    /// Executes the fit, discarding diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinitePoint` for non-finite outline points,
    /// `OperationError::InvalidParameter` for invalid options, and
    /// `OperationError::InvalidInput` when the outline has fewer than 3
    /// distinct points.
    pub fn execute(&self) -> Result<FitResult> {
        self.execute_with_sink(&mut NullSink)
    }

    /// Executes the fit, reporting degradations to `sink`.
    ///
    /// # Errors
    ///
    /// See [`FitStrokeOutline::execute`].
    pub fn execute_with_sink(&self, sink: &mut dyn DiagnosticSink) -> Result<FitResult> {
        ensure_finite(&self.ring)?;
        self.options.validate()?;
        let ring = open_ring(&self.ring, 0.0);
        if ring.len() < 3 {
            return Err(OperationError::InvalidInput(
                "stroke outline needs at least 3 distinct points".to_owned(),
            )
            .into());
        }

        let mut report = FitReport::default();

        // Step 1: Split into rails and look for caps.
        let (rail_a, rail_b) = split_rails_for_fitting(&ring, &self.centerline);
        let caps = detect_caps(&rail_a, &rail_b, &self.centerline, self.options.tolerance());

        // Step 2: Fit either the whole ring or the two rails.
        let segments = if !caps.has_caps() && is_ring_monotone(&ring, &self.centerline, MONOTONE_RING_EPS) {
            let segments = fit_closed(&ring, &self.options, &mut report);
            guard_self_intersection(segments, &ring, &mut report)
        } else {
            let segments = self.fit_rails(&rail_a, &rail_b, &caps, &mut report);
            guard_self_intersection(segments, &loop_from_rails(&rail_a, &rail_b, &ring), &mut report)
        };

        record_report(&report, sink);
        Ok(FitResult { segments, report })
    }

    fn fit_rails(
        &self,
        rail_a: &[Point2],
        rail_b: &[Point2],
        caps: &RailCaps,
        report: &mut FitReport,
    ) -> Vec<CubicBezier> {
        let (mut a, mut b) = match self.options.simplify_tolerance() {
            Some(tol) => (simplify_polyline(rail_a, tol), simplify_polyline(rail_b, tol)),
            None => (rail_a.to_vec(), rail_b.to_vec()),
        };
        align_rail_ends(&mut a, &mut b);
        let a = trim_rail(&a, &caps.start_a, &caps.end_a);
        let b = trim_rail(&b, &caps.start_b, &caps.end_b);
        let curves_a = fit_monotone_chain(&a.body, &self.centerline, &self.options, report);
        let curves_b = fit_monotone_chain(&b.body, &self.centerline, &self.options, report);
        join_rails(curves_a, &curves_b, &a, &b)
    }
}

/// Joins two fitted rail bodies running the same way into one closed path:
/// rail `a` forward, its tail and `b`'s tail as the end cap, rail `b`
/// backward, then both heads as the start cap.
#[must_use]
pub fn join_rails(
    curves_a: Vec<CubicBezier>,
    curves_b: &[CubicBezier],
    a: &TrimmedRail,
    b: &TrimmedRail,
) -> Vec<CubicBezier> {
    let reversed_b = reverse_path(curves_b);
    let Some(start) = curves_a.first().map(|s| s.p0).or_else(|| reversed_b.first().map(|s| s.p0)) else {
        return Vec::new();
    };
    let mut path = curves_a;
    if let (Some(end_a), Some(start_b)) = (path.last().map(|s| s.p3), reversed_b.first().map(|s| s.p0)) {
        path.extend(cap_segments(end_a, a.tail.iter().chain(b.tail.iter().rev()), start_b));
    }
    path.extend(reversed_b);
    if let Some(end) = path.last().map(|s| s.p3) {
        path.extend(cap_segments(end, b.head.iter().rev().chain(&a.head), start));
    }
    path
}

/// The loop around two rails, `a` forward then `b` backward, as an open
/// ring. Falls back to `ring` when that loop crosses itself.
#[must_use]
pub fn loop_from_rails(a: &[Point2], b: &[Point2], ring: &[Point2]) -> Vec<Point2> {
    let mut outline: Vec<Point2> = Vec::with_capacity(a.len() + b.len());
    for p in a.iter().chain(b.iter().rev()) {
        if outline.last() != Some(p) {
            outline.push(*p);
        }
    }
    let outline = open_ring(&outline, 0.0);
    if outline.len() < 3 || polyline_has_self_intersection(&outline, true) {
        return ring.to_vec();
    }
    outline
}

fn sample_for_check(segments: &[CubicBezier]) -> Vec<Point2> {
    let per_curve = (CHECK_POINT_CAP / segments.len().max(1)).clamp(4, CHECK_SAMPLES_PER_CURVE);
    sample_path(segments, per_curve)
}

/// Whether a closed fitted path crosses itself once densely sampled.
#[must_use]
pub fn path_self_intersects(segments: &[CubicBezier]) -> bool {
    if segments.is_empty() {
        return false;
    }
    let mut polyline = sample_for_check(segments);
    if polyline.len() > 1 && polyline.first() == polyline.last() {
        polyline.pop();
    }
    polyline_has_self_intersection(&polyline, true)
}

/// Whether an open fitted path crosses itself once densely sampled.
#[must_use]
pub fn open_path_self_intersects(segments: &[CubicBezier]) -> bool {
    !segments.is_empty() && polyline_has_self_intersection(&sample_for_check(segments), false)
}

/// Replaces a self-intersecting closed path with straight segments through
/// `ring` (an open ring), closing back to its first point.
#[must_use]
pub fn guard_self_intersection(
    segments: Vec<CubicBezier>,
    ring: &[Point2],
    report: &mut FitReport,
) -> Vec<CubicBezier> {
    if !path_self_intersects(&segments) {
        return segments;
    }
    report.self_intersection_fallback = true;
    polyline_to_cubics(&close_ring(ring, 0.0))
}

/// Replaces a self-intersecting open path with straight segments through
/// `chain`. A chain that already crosses itself keeps its fit.
#[must_use]
pub fn guard_open_self_intersection(
    segments: Vec<CubicBezier>,
    chain: &[Point2],
    report: &mut FitReport,
) -> Vec<CubicBezier> {
    if !open_path_self_intersects(&segments) || polyline_has_self_intersection(chain, false) {
        return segments;
    }
    report.self_intersection_fallback = true;
    polyline_to_cubics(chain)
}
