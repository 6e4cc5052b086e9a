pub mod caps;
pub mod corners;
pub mod cubic_fit;
pub mod monotone;
pub mod outline;
pub mod simplify;

pub use monotone::Centerline;
pub use outline::FitStrokeOutline;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, FitStage, NullSink};
use crate::error::{OperationError, Result};
use crate::geometry::cubic::CubicBezier;
use crate::geometry::ring::open_ring;
use crate::math::{ensure_finite, Point2};

use corners::{rotate_to_seam, split_at_corners};
use cubic_fit::fit_curve;
use outline::{guard_open_self_intersection, guard_self_intersection};
use simplify::simplify_polyline;

/// Parameters controlling curve fitting.
///
/// `tolerance` is the maximum distance between an input point and its image
/// on the fitted curve. The remaining fields have defaults suited to glyph
/// outlines in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    tolerance: f64,
    corner_threshold_degrees: f64,
    max_reparameterize_iterations: usize,
    max_depth: usize,
    monotone_max_depth: usize,
    simplify_tolerance: Option<f64>,
}

impl FitOptions {
    /// Creates options with the given tolerance and default limits.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidParameter` if `tolerance` is not a
    /// positive finite number.
    pub fn new(tolerance: f64) -> Result<Self> {
        let options = Self {
            tolerance,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    #[must_use]
    pub fn with_corner_threshold_degrees(mut self, degrees: f64) -> Self {
        self.corner_threshold_degrees = degrees;
        self
    }

    #[must_use]
    pub fn with_max_reparameterize_iterations(mut self, iterations: usize) -> Self {
        self.max_reparameterize_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_monotone_max_depth(mut self, depth: usize) -> Self {
        self.monotone_max_depth = depth;
        self
    }

    /// Simplifies input chains with Ramer-Douglas-Peucker before fitting.
    #[must_use]
    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = Some(tolerance);
        self
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn corner_threshold_degrees(&self) -> f64 {
        self.corner_threshold_degrees
    }

    #[must_use]
    pub fn max_reparameterize_iterations(&self) -> usize {
        self.max_reparameterize_iterations
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub fn monotone_max_depth(&self) -> usize {
        self.monotone_max_depth
    }

    #[must_use]
    pub fn simplify_tolerance(&self) -> Option<f64> {
        self.simplify_tolerance
    }

    /// Checks every field, including those set through the builders.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidParameter` for the first field out of
    /// range.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("tolerance", self.tolerance, self.tolerance > 0.0),
            (
                "corner_threshold_degrees",
                self.corner_threshold_degrees,
                (0.0..=180.0).contains(&self.corner_threshold_degrees),
            ),
        ];
        for (parameter, value, in_range) in checks {
            if !value.is_finite() || !in_range {
                return Err(OperationError::InvalidParameter {
                    parameter,
                    value,
                    reason: "out of range",
                }
                .into());
            }
        }
        if let Some(tol) = self.simplify_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(OperationError::InvalidParameter {
                    parameter: "simplify_tolerance",
                    value: tol,
                    reason: "must be finite and non-negative",
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.5,
            corner_threshold_degrees: 60.0,
            max_reparameterize_iterations: 4,
            max_depth: 16,
            monotone_max_depth: 8,
            simplify_tolerance: None,
        }
    }
}

/// How far a fit had to degrade from a smooth result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Degradation {
    /// Every chunk fit within tolerance without subdivision.
    Smooth,
    /// Some chunks were subdivided to meet the tolerance.
    Subdivided,
    /// Some or all of the path is straight segments through the input.
    PolylineFallback,
}

/// Counters describing the path a fit took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitReport {
    /// Subdivisions at a max-error point.
    pub splits: usize,
    /// Sub-chains emitted as straight segments at the depth cap.
    pub depth_limited_chunks: usize,
    /// Rail bisections made to restore monotone flow.
    pub monotone_splits: usize,
    /// Rail pieces accepted while still reversing, at the monotone depth cap.
    pub monotone_depth_limited: usize,
    /// Whether the assembled path crossed itself and was replaced.
    pub self_intersection_fallback: bool,
}

impl FitReport {
    /// Adds the counters of `other` into `self`.
    pub fn merge(&mut self, other: &FitReport) {
        self.splits += other.splits;
        self.depth_limited_chunks += other.depth_limited_chunks;
        self.monotone_splits += other.monotone_splits;
        self.monotone_depth_limited += other.monotone_depth_limited;
        self.self_intersection_fallback |= other.self_intersection_fallback;
    }

    #[must_use]
    pub fn degradation(&self) -> Degradation {
        if self.self_intersection_fallback || self.depth_limited_chunks > 0 {
            Degradation::PolylineFallback
        } else if self.splits > 0 || self.monotone_splits > 0 {
            Degradation::Subdivided
        } else {
            Degradation::Smooth
        }
    }
}

/// Output of a fit: a chained run of cubics and how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub segments: Vec<CubicBezier>,
    pub report: FitReport,
}

/// Fits a polyline (open chain or closed ring) with cubic Bezier segments.
///
/// Closed rings are split at sharp corners so each corner survives as a
/// segment joint. The assembled path is checked for self-intersection and
/// replaced with straight segments through the input when it crosses.
#[derive(Debug)]
pub struct FitCurves {
    points: Vec<Point2>,
    closed: bool,
    options: FitOptions,
}

impl FitCurves {
    /// Creates a new curve fit.
    #[must_use]
    pub fn new(points: Vec<Point2>, closed: bool, options: FitOptions) -> Self {
        Self {
            points,
            closed,
            options,
        }
    }

    /// Executes the fit, discarding diagnostics.
    ///
    /// Fewer than 2 distinct points give an empty result.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinitePoint` for non-finite input points and
    /// `OperationError::InvalidParameter` for invalid options.
    pub fn execute(&self) -> Result<FitResult> {
        self.execute_with_sink(&mut NullSink)
    }

    /// Executes the fit, reporting degradations to `sink`.
    ///
    /// # Errors
    ///
    /// See [`FitCurves::execute`].
    pub fn execute_with_sink(&self, sink: &mut dyn DiagnosticSink) -> Result<FitResult> {
        ensure_finite(&self.points)?;
        self.options.validate()?;

        let mut points = if self.closed {
            open_ring(&self.points, 0.0)
        } else {
            self.points.clone()
        };
        if let Some(tol) = self.options.simplify_tolerance {
            points = simplify_polyline(&points, tol);
        }

        let mut report = FitReport::default();
        if points.len() < 2 {
            return Ok(FitResult {
                segments: Vec::new(),
                report,
            });
        }

        let segments = if self.closed {
            let segments = fit_closed(&points, &self.options, &mut report);
            guard_self_intersection(segments, &points, &mut report)
        } else {
            let segments = fit_curve(&points, &self.options, &mut report);
            guard_open_self_intersection(segments, &points, &mut report)
        };
        record_report(&report, sink);
        Ok(FitResult { segments, report })
    }
}

/// Fits an open ring as a closed loop starting and ending at its seam.
pub(crate) fn fit_closed(ring: &[Point2], options: &FitOptions, report: &mut FitReport) -> Vec<CubicBezier> {
    let threshold = options.corner_threshold_degrees;
    let rotated = rotate_to_seam(ring, threshold);
    split_at_corners(&rotated, threshold)
        .iter()
        .flat_map(|chunk| fit_curve(chunk, options, report))
        .collect()
}

pub(crate) fn record_report(report: &FitReport, sink: &mut dyn DiagnosticSink) {
    if report.depth_limited_chunks > 0 {
        sink.record(DiagnosticEvent::FitDegraded {
            stage: FitStage::DepthLimited,
            detail: report.depth_limited_chunks,
        });
    }
    if report.monotone_depth_limited > 0 {
        sink.record(DiagnosticEvent::FitDegraded {
            stage: FitStage::MonotoneDepthLimited,
            detail: report.monotone_depth_limited,
        });
    }
    if report.self_intersection_fallback {
        sink.record(DiagnosticEvent::FitDegraded {
            stage: FitStage::SelfIntersectionFallback,
            detail: 1,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::diagnostics::EventLog;
    use crate::math::intersect_2d::polyline_has_self_intersection;
    use crate::operations::fit::outline::{open_path_self_intersects, path_self_intersects};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn wave() -> Vec<Point2> {
        (0..=60)
            .map(|i| {
                let x = f64::from(i) * 0.2;
                p(x, (x * 0.9).sin() * 3.0 + (x * 2.3).cos() * 0.5)
            })
            .collect()
    }

    fn fit(points: Vec<Point2>, closed: bool, options: FitOptions) -> FitResult {
        FitCurves::new(points, closed, options).execute().unwrap()
    }

    #[test]
    fn collinear_chain_is_one_segment() {
        let pts: Vec<Point2> = (0..8).map(|i| p(f64::from(i), f64::from(i) * 0.5)).collect();
        let result = fit(pts, false, FitOptions::new(0.01).unwrap());
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.report.degradation(), Degradation::Smooth);
    }

    #[test]
    fn quarter_arc_is_one_segment() {
        let pts: Vec<Point2> = (0..=16)
            .map(|i| {
                let a = f64::from(i) / 16.0 * std::f64::consts::FRAC_PI_2;
                p(10.0 * a.cos(), 10.0 * a.sin())
            })
            .collect();
        let result = fit(pts, false, FitOptions::new(0.5).unwrap());
        assert_eq!(result.segments.len(), 1);
    }

    #[test]
    fn raising_tolerance_never_adds_segments() {
        let mut previous = usize::MAX;
        for tol in [0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0] {
            let count = fit(wave(), false, FitOptions::new(tol).unwrap()).segments.len();
            assert!(count <= previous, "tolerance {tol} gave {count} > {previous}");
            previous = count;
        }
    }

    #[test]
    fn open_endpoints_are_exact() {
        let pts = wave();
        for tol in [0.001, 0.05, 1.0] {
            for threshold in [30.0, 60.0, 120.0] {
                let options = FitOptions::new(tol)
                    .unwrap()
                    .with_corner_threshold_degrees(threshold);
                let segs = fit(pts.clone(), false, options).segments;
                assert_eq!(segs[0].p0, pts[0]);
                assert_eq!(segs[segs.len() - 1].p3, pts[pts.len() - 1]);
                for w in segs.windows(2) {
                    assert_eq!(w[0].p3, w[1].p0);
                }
            }
        }
    }

    #[test]
    fn square_ring_keeps_corners() {
        let ring = vec![
            p(0.0, 0.0),
            p(5.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 5.0),
            p(10.0, 10.0),
            p(5.0, 10.0),
            p(0.0, 10.0),
            p(0.0, 5.0),
            p(0.0, 0.0),
        ];
        let result = fit(ring, true, FitOptions::new(0.1).unwrap());
        let segs = &result.segments;
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0].p0, p(0.0, 0.0));
        assert_eq!(segs[3].p3, p(0.0, 0.0));
        let joints: Vec<Point2> = segs.iter().map(|s| s.p3).collect();
        assert_eq!(joints, vec![p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(0.0, 0.0)]);
        assert!(!result.report.self_intersection_fallback);
    }

    #[test]
    fn closed_fit_never_self_intersects() {
        let ring: Vec<Point2> = (0..40)
            .map(|i| {
                let a = f64::from(i) * std::f64::consts::TAU / 40.0;
                let r = 10.0 + (a * 5.0).sin() * 3.0;
                p(r * a.cos(), r * a.sin())
            })
            .collect();
        let result = fit(ring, true, FitOptions::new(0.2).unwrap());
        assert!(!path_self_intersects(&result.segments));
        assert_eq!(result.segments[0].p0, result.segments[result.segments.len() - 1].p3);
    }

    #[test]
    fn zigzag_chain_stays_within_reach_of_its_points() {
        // Every other sub-chain has one interior point, where the handle
        // solve is exactly determined.
        let pts = vec![
            p(0.703, 2.084),
            p(1.939, 2.241),
            p(3.264, 0.877),
            p(3.910, 1.923),
            p(5.073, 0.184),
            p(6.207, 1.511),
            p(7.387, 0.232),
        ];
        assert!(!polyline_has_self_intersection(&pts, false));
        let result = fit(pts.clone(), false, FitOptions::new(0.01).unwrap());
        let segs = &result.segments;
        assert!(!open_path_self_intersects(segs));
        assert_eq!(segs[0].p0, pts[0]);
        assert_eq!(segs[segs.len() - 1].p3, pts[6]);
        for w in segs.windows(2) {
            assert_eq!(w[0].p3, w[1].p0);
        }

        // Handles are never longer than their chord, so every control point
        // stays within the chain's diagonal of its bounding box.
        let (min_x, max_x, min_y, max_y): (f64, f64, f64, f64) = (0.703, 7.387, 0.184, 2.241);
        let reach = (max_x - min_x).hypot(max_y - min_y);
        for seg in segs {
            for c in [seg.p0, seg.p1, seg.p2, seg.p3] {
                assert!(c.x >= min_x - reach && c.x <= max_x + reach, "{c:?}");
                assert!(c.y >= min_y - reach && c.y <= max_y + reach, "{c:?}");
            }
        }
    }

    #[test]
    fn crossing_closed_fit_falls_back_to_polyline() {
        // A spike over a notch. At this tolerance the spike's chunk keeps a
        // single shallow cubic that cuts through the notch's tip.
        let ring = vec![
            p(0.0, 0.0),
            p(5.0, 7.0),
            p(10.0, 0.0),
            p(6.0, 0.0),
            p(5.0, 4.0),
            p(4.0, 0.0),
        ];
        assert!(!polyline_has_self_intersection(&ring, true));
        let options = FitOptions::new(10.0)
            .unwrap()
            .with_corner_threshold_degrees(115.0);
        let mut log = EventLog::new();
        let result = FitCurves::new(ring.clone(), true, options)
            .execute_with_sink(&mut log)
            .unwrap();

        assert!(result.report.self_intersection_fallback);
        assert_eq!(result.report.degradation(), Degradation::PolylineFallback);
        let segs = &result.segments;
        assert!(!path_self_intersects(segs));
        assert_eq!(segs.len(), 6);
        assert_eq!(segs[0].p0, ring[0]);
        assert_eq!(segs[5].p3, ring[0]);
        let joints: Vec<Point2> = segs.iter().map(|s| s.p0).collect();
        assert_eq!(joints, ring);
        assert!(log.events.iter().any(|e| matches!(
            e,
            DiagnosticEvent::FitDegraded {
                stage: FitStage::SelfIntersectionFallback,
                ..
            }
        )));
    }

    #[test]
    fn depth_cap_is_reported() {
        let pts: Vec<Point2> = (0..=10)
            .map(|i| p(f64::from(i), if i % 2 == 0 { 0.0 } else { 1.0 }))
            .collect();
        let options = FitOptions::new(1e-6).unwrap().with_max_depth(0);
        let mut log = EventLog::new();
        let result = FitCurves::new(pts, false, options)
            .execute_with_sink(&mut log)
            .unwrap();
        assert_eq!(result.report.degradation(), Degradation::PolylineFallback);
        assert!(matches!(
            log.events.as_slice(),
            [DiagnosticEvent::FitDegraded {
                stage: FitStage::DepthLimited,
                detail: 1
            }]
        ));
    }

    #[test]
    fn simplification_runs_before_fitting() {
        let pts: Vec<Point2> = (0..20).map(|i| p(f64::from(i), 0.0)).collect();
        let options = FitOptions::new(0.1).unwrap().with_simplify_tolerance(0.01);
        let result = fit(pts, false, options);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].p3, p(19.0, 0.0));
    }

    #[test]
    fn short_input_gives_no_segments() {
        assert!(fit(vec![p(1.0, 1.0)], false, FitOptions::default()).segments.is_empty());
        assert!(fit(Vec::new(), true, FitOptions::default()).segments.is_empty());
    }

    #[test]
    fn invalid_options_are_rejected() {
        assert!(FitOptions::new(0.0).is_err());
        assert!(FitOptions::new(-1.0).is_err());
        assert!(FitOptions::new(f64::NAN).is_err());
        let bad = FitOptions::default().with_corner_threshold_degrees(f64::INFINITY);
        assert!(FitCurves::new(vec![p(0.0, 0.0), p(1.0, 0.0)], false, bad).execute().is_err());
        let bad = FitOptions::default().with_simplify_tolerance(-0.5);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let result = FitCurves::new(vec![p(0.0, 0.0), p(f64::NAN, 0.0)], false, FitOptions::default()).execute();
        assert!(result.is_err());
    }
}
