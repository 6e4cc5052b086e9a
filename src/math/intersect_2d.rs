use super::{cross, points_approx_eq, Point2};

/// Parametric hit between segments `a + t * (b - a)` and `c + u * (d - c)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Parameter on the first segment.
    pub t: f64,
    /// Parameter on the second segment.
    pub u: f64,
    /// Intersection point, evaluated on the first segment.
    pub point: Point2,
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `None` when the segments are near-parallel (`|cross| <= eps`) or
/// when either parameter falls outside `[-eps, 1 + eps]`. The returned
/// parameters are not clamped.
#[must_use]
pub fn segment_intersection(
    a: &Point2,
    b: &Point2,
    c: &Point2,
    d: &Point2,
    eps: f64,
) -> Option<SegmentHit> {
    let r = b - a;
    let s = d - c;
    let denom = cross(&r, &s);
    if denom.abs() <= eps {
        return None;
    }
    let ac = c - a;
    let t = cross(&ac, &s) / denom;
    let u = cross(&ac, &r) / denom;
    if t < -eps || t > 1.0 + eps || u < -eps || u > 1.0 + eps {
        return None;
    }
    Some(SegmentHit {
        t,
        u,
        point: a + r * t,
    })
}

/// Signed orientation of `c` relative to the directed line `a → b`.
#[must_use]
pub fn orientation(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Strict proper crossing test: touching or collinear segments do not count.
#[must_use]
pub fn segments_cross(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);
    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

/// Returns `true` if any two non-adjacent segments of the polyline properly cross.
#[must_use]
pub fn polyline_has_self_intersection(points: &[Point2], closed: bool) -> bool {
    let count = points.len();
    if count < 4 {
        return false;
    }
    let segment_count = if closed { count } else { count - 1 };
    for i in 0..segment_count {
        let a1 = &points[i];
        let a2 = &points[(i + 1) % count];
        for j in (i + 2)..segment_count {
            if closed && i == 0 && j == segment_count - 1 {
                continue;
            }
            let b1 = &points[j];
            let b2 = &points[(j + 1) % count];
            if segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Finds the crossing points of a ring with itself.
///
/// The ring may be explicitly closed (last point equal to the first) or not.
/// Zero-length edges are skipped, as are hits that coincide with an endpoint
/// of either segment (vertex touches are not crossings).
#[must_use]
pub fn ring_self_intersections(ring: &[Point2], eps: f64) -> Vec<Point2> {
    let n = ring.len();
    if n < 4 {
        return Vec::new();
    }
    let last_is_first = points_approx_eq(&ring[0], &ring[n - 1], eps);
    let edge_count = if last_is_first { n - 1 } else { n };

    let mut hits = Vec::new();
    for i in 0..edge_count {
        let a0 = &ring[i];
        let a1 = &ring[(i + 1) % edge_count];
        if (a1 - a0).norm() <= eps || i + 2 >= edge_count {
            continue;
        }
        for j in (i + 2)..edge_count {
            if i == 0 && j == edge_count - 1 {
                continue;
            }
            let b0 = &ring[j];
            let b1 = &ring[(j + 1) % edge_count];
            if (b1 - b0).norm() <= eps {
                continue;
            }
            let Some(hit) = segment_intersection(a0, a1, b0, b1, eps) else {
                continue;
            };
            let touches_vertex = [a0, a1, b0, b1]
                .iter()
                .any(|v| points_approx_eq(&hit.point, v, eps));
            if !touches_vertex {
                hits.push(hit.point);
            }
        }
    }
    hits
}

/// Number of crossings reported by [`ring_self_intersections`].
#[must_use]
pub fn ring_self_intersection_count(ring: &[Point2], eps: f64) -> usize {
    ring_self_intersections(ring, eps).len()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_segments() {
        let hit = segment_intersection(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0), 1e-9)
            .unwrap();
        assert!((hit.t - 0.5).abs() < 1e-12);
        assert!((hit.u - 0.5).abs() < 1e-12);
        assert!((hit.point.x - 1.0).abs() < 1e-12);
        assert!((hit.point.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_segments_return_none() {
        assert!(
            segment_intersection(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0), 1e-9)
                .is_none()
        );
    }

    #[test]
    fn disjoint_segments_return_none() {
        assert!(
            segment_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 0.0), &p(2.0, 1.0), 1e-9)
                .is_none()
        );
    }

    #[test]
    fn endpoint_touch_is_not_a_proper_crossing() {
        assert!(!segments_cross(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)));
        assert!(segments_cross(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0)));
    }

    #[test]
    fn bowtie_has_one_self_intersection() {
        let ring = [p(0.0, 0.0), p(10.0, 10.0), p(10.0, 0.0), p(0.0, 10.0), p(0.0, 0.0)];
        let hits = ring_self_intersections(&ring, 1e-9);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].x - 5.0).abs() < 1e-9);
        assert!((hits[0].y - 5.0).abs() < 1e-9);
        assert!(polyline_has_self_intersection(&ring[..4], true));
    }

    #[test]
    fn square_has_none() {
        let ring = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert_eq!(ring_self_intersection_count(&ring, 1e-9), 0);
        assert!(!polyline_has_self_intersection(&ring, true));
    }

    #[test]
    fn open_polyline_zigzag_crossing() {
        let pts = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0), p(2.0, -2.0)];
        assert!(polyline_has_self_intersection(&pts, false));
    }
}
