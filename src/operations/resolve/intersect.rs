use crate::arrangement::SplitPoint;
use crate::math::intersect_2d::segment_intersection;
use crate::math::{points_approx_eq, Point2};

/// A crossing between two segments of a closed ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Index of the earlier segment.
    pub first: usize,
    /// Index of the later segment.
    pub second: usize,
    pub t: f64,
    pub u: f64,
    pub point: Point2,
}

/// Finds every crossing between non-adjacent segments of an explicitly
/// closed ring.
///
/// The first and last segments share the closing vertex and are treated as
/// adjacent. Hits lying on an existing vertex of both segments are skipped:
/// those vertices already unify through snapping.
#[must_use]
pub fn find_intersections(ring: &[Point2], eps: f64) -> Vec<Intersection> {
    let segment_count = ring.len().saturating_sub(1);
    let mut hits = Vec::new();
    for i in 0..segment_count {
        let (a0, a1) = (&ring[i], &ring[i + 1]);
        for j in (i + 2)..segment_count {
            if i == 0 && j == segment_count - 1 {
                continue;
            }
            let (b0, b1) = (&ring[j], &ring[j + 1]);
            let Some(hit) = segment_intersection(a0, a1, b0, b1, eps) else {
                continue;
            };
            let on_first = points_approx_eq(&hit.point, a0, eps) || points_approx_eq(&hit.point, a1, eps);
            let on_second = points_approx_eq(&hit.point, b0, eps) || points_approx_eq(&hit.point, b1, eps);
            if on_first && on_second {
                continue;
            }
            hits.push(Intersection {
                first: i,
                second: j,
                t: hit.t,
                u: hit.u,
                point: hit.point,
            });
        }
    }
    hits
}

/// Distributes intersections onto the segments they split.
#[must_use]
pub fn collect_splits(segment_count: usize, hits: &[Intersection]) -> Vec<Vec<SplitPoint>> {
    let mut splits = vec![Vec::new(); segment_count];
    for hit in hits {
        splits[hit.first].push(SplitPoint {
            t: hit.t,
            point: hit.point,
        });
        splits[hit.second].push(SplitPoint {
            t: hit.u,
            point: hit.point,
        });
    }
    splits
}
