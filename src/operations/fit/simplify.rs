use crate::math::distance_2d::point_to_segment_dist;
use crate::math::Point2;

/// Indices of the points a Ramer-Douglas-Peucker pass keeps, ascending.
///
/// A point is kept when it lies farther than `tolerance` from the chord
/// between the kept points around it. Both ends are always kept; chains with
/// fewer than 3 points, or a non-positive tolerance, keep every index.
#[must_use]
pub fn rdp_indices(points: &[Point2], tolerance: f64) -> Vec<usize> {
    let n = points.len();
    if n < 3 || tolerance <= 0.0 {
        return (0..n).collect();
    }
    let mut keep = vec![0, n - 1];
    let mut spans = vec![(0, n - 1)];
    while let Some((first, last)) = spans.pop() {
        // Ties go to the earliest point.
        let farthest = (first + 1..last)
            .map(|i| (i, point_to_segment_dist(&points[i], &points[first], &points[last])))
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)));
        match farthest {
            Some((i, dist)) if dist > tolerance => {
                keep.push(i);
                spans.push((first, i));
                spans.push((i, last));
            }
            _ => {}
        }
    }
    keep.sort_unstable();
    keep
}

/// Simplifies a chain to the points [`rdp_indices`] keeps.
#[must_use]
pub fn simplify_polyline(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    rdp_indices(points, tolerance).into_iter().map(|i| points[i]).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn short_chains_unchanged() {
        assert!(simplify_polyline(&[], 1.0).is_empty());
        assert_eq!(simplify_polyline(&[p(0.0, 0.0), p(1.0, 0.0)], 1.0).len(), 2);
    }

    #[test]
    fn collinear_points_collapse_to_endpoints() {
        let pts: Vec<Point2> = (0..10).map(|i| p(f64::from(i), 0.0)).collect();
        assert_eq!(simplify_polyline(&pts, 0.01), vec![p(0.0, 0.0), p(9.0, 0.0)]);
    }

    #[test]
    fn significant_bend_survives() {
        let pts = [p(0.0, 0.0), p(5.0, 2.4), p(10.0, 5.0), p(15.0, 2.4), p(20.0, 0.0)];
        let out = simplify_polyline(&pts, 1.0);
        assert_eq!(out, vec![p(0.0, 0.0), p(10.0, 5.0), p(20.0, 0.0)]);
    }

    #[test]
    fn kept_indices_are_ascending() {
        // One bump with a small wiggle on each side of it.
        let pts = [p(0.0, 0.0), p(1.0, 0.1), p(2.0, 0.0), p(3.0, 2.0), p(4.0, 0.0), p(5.0, 0.1), p(6.0, 0.0)];
        assert_eq!(rdp_indices(&pts, 0.5), vec![0, 2, 3, 4, 6]);
    }

    #[test]
    fn zero_tolerance_keeps_everything() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
        assert_eq!(simplify_polyline(&pts, 0.0).len(), 3);
    }
}
