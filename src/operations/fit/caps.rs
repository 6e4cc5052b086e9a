use crate::geometry::cubic::{polyline_to_cubics, CubicBezier};
use crate::math::Point2;

use super::monotone::Centerline;

/// Width of the band at each end of the centerline, in `s`, where cap
/// points are looked for.
const CAP_BAND: f64 = 0.02;

/// Smallest distance from the centerline that still counts as a cap.
const MIN_CAP_WIDTH: f64 = 0.5;

/// Consecutive cap points closer than this are merged.
const CAP_GAP: f64 = 1e-6;

/// Points of two rails that lie on the stroke's end caps.
///
/// A cap is present only when both rails have points on it; otherwise both
/// of its lists are empty. Every list is ordered along the centerline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RailCaps {
    pub start_a: Vec<Point2>,
    pub start_b: Vec<Point2>,
    pub end_a: Vec<Point2>,
    pub end_b: Vec<Point2>,
}

impl RailCaps {
    #[must_use]
    pub fn has_caps(&self) -> bool {
        !self.start_a.is_empty() || !self.end_a.is_empty()
    }
}

/// Finds the cap points of two rails: points within the first or last 2% of
/// the centerline that also lie close to it.
///
/// "Close" is `max(0.5, 2 * tolerance)` on either side.
#[must_use]
pub fn detect_caps(rail_a: &[Point2], rail_b: &[Point2], centerline: &Centerline, tolerance: f64) -> RailCaps {
    let width = MIN_CAP_WIDTH.max(2.0 * tolerance);
    let near_end = |rail: &[Point2], at_start: bool| -> Vec<Point2> {
        rail.iter()
            .filter(|p| {
                let s = centerline.project(p);
                let in_band = if at_start { s <= CAP_BAND } else { s >= 1.0 - CAP_BAND };
                in_band && centerline.offset(p).abs() <= width
            })
            .copied()
            .collect()
    };
    let pair = |a: Vec<Point2>, b: Vec<Point2>| {
        if a.is_empty() || b.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (a, b)
        }
    };
    let (start_a, start_b) = pair(near_end(rail_a, true), near_end(rail_b, true));
    let (end_a, end_b) = pair(near_end(rail_a, false), near_end(rail_b, false));
    RailCaps {
        start_a,
        start_b,
        end_a,
        end_b,
    }
}

/// A rail cut into its cap ends and the body between them.
///
/// `head` ends on the first body point and `tail` starts on the last, so
/// the three pieces chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedRail {
    pub head: Vec<Point2>,
    pub body: Vec<Point2>,
    pub tail: Vec<Point2>,
}

/// Cuts `start_cap` points off the front of `rail` and `end_cap` points off
/// its back. When nothing is left in between, the body is just the rail's
/// two ends.
#[must_use]
pub fn trim_rail(rail: &[Point2], start_cap: &[Point2], end_cap: &[Point2]) -> TrimmedRail {
    let n = rail.len();
    if n < 2 {
        return TrimmedRail {
            head: rail.to_vec(),
            body: rail.to_vec(),
            tail: rail.to_vec(),
        };
    }
    let start = if start_cap.is_empty() { 0 } else { (start_cap.len() - 1).min(n - 1) };
    let end = if end_cap.is_empty() { n - 1 } else { n.saturating_sub(end_cap.len()) };
    if start >= end {
        return TrimmedRail {
            head: vec![rail[0]],
            body: vec![rail[0], rail[n - 1]],
            tail: vec![rail[n - 1]],
        };
    }
    TrimmedRail {
        head: rail[..=start].to_vec(),
        body: rail[start..=end].to_vec(),
        tail: rail[end..].to_vec(),
    }
}

/// Straight cubics from `from` through `via` to `to`, skipping repeated
/// points. Empty when all of them coincide.
#[must_use]
pub fn cap_segments<'a>(from: Point2, via: impl IntoIterator<Item = &'a Point2>, to: Point2) -> Vec<CubicBezier> {
    let mut polyline = vec![from];
    for p in via.into_iter().copied().chain(std::iter::once(to)) {
        if polyline.last().is_some_and(|last| (p - *last).norm() > CAP_GAP) {
            polyline.push(p);
        }
    }
    polyline_to_cubics(&polyline)
}
