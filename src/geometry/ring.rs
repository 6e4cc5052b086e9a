use crate::math::{cross, points_approx_eq, Point2};

/// Result of [`sanitize_ring`].
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedRing {
    /// The cleaned ring, explicitly closed.
    pub points: Vec<Point2>,
    /// Consecutive near-duplicate vertices dropped.
    pub removed_duplicates: usize,
    /// Hairpin (direction-reversal) vertices dropped.
    pub removed_hairpins: usize,
    /// Extra traversals removed when the ring repeated itself.
    pub collapsed_repeats: usize,
}

/// Returns the ring explicitly closed, appending the first point if needed.
#[must_use]
pub fn close_ring(points: &[Point2], eps: f64) -> Vec<Point2> {
    let mut ring = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if !points_approx_eq(first, last, eps) {
            ring.push(*first);
        }
    }
    ring
}

/// Returns the ring without its closing duplicate.
#[must_use]
pub fn open_ring(points: &[Point2], eps: f64) -> Vec<Point2> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 && points_approx_eq(first, last, eps) => {
            points[..points.len() - 1].to_vec()
        }
        _ => points.to_vec(),
    }
}

/// Cleans a raw boundary ring before planarization.
///
/// Drops consecutive vertices within `eps` of each other, removes hairpin
/// vertices where the path reverses onto itself, and collapses a ring that
/// traverses the same vertex sequence several times into a single traversal.
#[must_use]
pub fn sanitize_ring(points: &[Point2], eps: f64) -> SanitizedRing {
    let mut ring = open_ring(points, eps);
    let mut removed_duplicates = dedup_cyclic(&mut ring, eps);

    let mut removed_hairpins = 0;
    // Each pass removes at least one vertex, so the ring length bounds it.
    for _ in 0..points.len() {
        let Some(index) = find_hairpin(&ring, eps) else {
            break;
        };
        ring.remove(index);
        removed_hairpins += 1;
        removed_duplicates += dedup_cyclic(&mut ring, eps);
    }

    let collapsed_repeats = collapse_repeats(&mut ring, eps);

    SanitizedRing {
        points: close_ring(&ring, eps),
        removed_duplicates,
        removed_hairpins,
        collapsed_repeats,
    }
}

/// Removes consecutive near-duplicates, including across the wrap-around.
fn dedup_cyclic(ring: &mut Vec<Point2>, eps: f64) -> usize {
    let before = ring.len();
    ring.dedup_by(|b, a| points_approx_eq(a, b, eps));
    while ring.len() > 1 && points_approx_eq(&ring[0], &ring[ring.len() - 1], eps) {
        ring.pop();
    }
    before - ring.len()
}

/// Finds a vertex where the path turns back exactly onto itself.
fn find_hairpin(ring: &[Point2], eps: f64) -> Option<usize> {
    let n = ring.len();
    if n < 3 {
        return None;
    }
    (0..n).find(|&i| {
        let prev = &ring[(i + n - 1) % n];
        let next = &ring[(i + 1) % n];
        let u = ring[i] - prev;
        let v = next - ring[i];
        let scale = u.norm() * v.norm();
        scale > 0.0 && cross(&u, &v).abs() <= eps * scale && u.dot(&v) < 0.0
    })
}

/// Collapses `k` repetitions of the same vertex sequence into one.
///
/// Returns the number of traversals removed.
fn collapse_repeats(ring: &mut Vec<Point2>, eps: f64) -> usize {
    let n = ring.len();
    for period in 3..n {
        if n % period != 0 {
            continue;
        }
        let repeats = (period..n).all(|i| points_approx_eq(&ring[i], &ring[i % period], eps));
        if repeats {
            ring.truncate(period);
            return n / period - 1;
        }
    }
    0
}
