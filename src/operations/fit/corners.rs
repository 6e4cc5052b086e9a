use crate::math::{lexicographic_cmp, normalized, Point2};

/// Indices of the vertices of a closed ring whose turning angle exceeds
/// `threshold_degrees`. Vertices with a zero-length neighbor edge never count.
#[must_use]
pub fn corner_indices(points: &[Point2], threshold_degrees: f64) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let threshold = threshold_degrees.to_radians();
    (0..n)
        .filter(|&i| {
            let prev = &points[(i + n - 1) % n];
            let next = &points[(i + 1) % n];
            let (Some(v1), Some(v2)) = (normalized(&(points[i] - prev)), normalized(&(next - points[i])))
            else {
                return false;
            };
            v1.dot(&v2).clamp(-1.0, 1.0).acos() > threshold
        })
        .collect()
}

/// Rotates an open ring so it starts at its seam: the corner with the
/// lexicographically smallest position, or the smallest vertex overall when
/// the ring has no corner.
#[must_use]
pub fn rotate_to_seam(points: &[Point2], threshold_degrees: f64) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let corners = corner_indices(points, threshold_degrees);
    let candidates: Vec<usize> = if corners.is_empty() {
        (0..points.len()).collect()
    } else {
        corners
    };
    let seam = candidates
        .into_iter()
        .min_by(|&a, &b| lexicographic_cmp(&points[a], &points[b]).then(a.cmp(&b)))
        .unwrap_or(0);
    let mut rotated = points.to_vec();
    rotated.rotate_left(seam);
    rotated
}

/// Splits a rotated open ring into corner-to-corner chunks.
///
/// Each chunk starts and ends on a corner; the last chunk wraps back to the
/// seam at `points[0]`, so the chunks chain into a closed loop.
#[must_use]
pub fn split_at_corners(points: &[Point2], threshold_degrees: f64) -> Vec<Vec<Point2>> {
    let Some(&seam) = points.first() else {
        return Vec::new();
    };
    if points.len() < 3 {
        let mut chunk = points.to_vec();
        chunk.push(seam);
        return vec![chunk];
    }
    let corners = corner_indices(points, threshold_degrees);
    let mut is_corner = vec![false; points.len()];
    for i in corners {
        is_corner[i] = true;
    }

    let mut chunks = Vec::new();
    let mut current = vec![seam];
    for (i, p) in points.iter().enumerate().skip(1) {
        current.push(*p);
        if is_corner[i] {
            chunks.push(std::mem::replace(&mut current, vec![*p]));
        }
    }
    current.push(seam);
    chunks.push(current);
    chunks
}
