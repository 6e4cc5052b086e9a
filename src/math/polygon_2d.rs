use super::{Point2, Vector2};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. Works for both
/// open and explicitly closed rings: the closing duplicate adds a zero term.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Winding number of `ring` around `point`.
///
/// Counts upward crossings with the point on their left as `+1` and downward
/// crossings with the point on their right as `-1`. A nonzero result means
/// the point is inside under the nonzero fill rule.
#[must_use]
pub fn winding_number(point: &Point2, ring: &[Point2]) -> i32 {
    let n = ring.len();
    if n < 3 {
        return 0;
    }
    let mut winding = 0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        let is_left = (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y);
        if a.y <= point.y {
            if b.y > point.y && is_left > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && is_left < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Average of the distinct vertices of a ring.
///
/// An explicitly closed ring's duplicate closing point is skipped.
#[must_use]
pub fn vertex_average(points: &[Point2]) -> Point2 {
    let distinct = open_len(points);
    if distinct == 0 {
        return Point2::origin();
    }
    let sum = points[..distinct]
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    let inv = 1.0 / distinct as f64;
    Point2::from(sum * inv)
}

/// Area centroid of a polygon.
///
/// Falls back to the vertex average when the polygon has (near) zero area.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    let n = points.len();
    let area = signed_area(points);
    if n < 3 || area.abs() < 1e-12 {
        return vertex_average(points);
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let f = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * f;
        cy += (a.y + b.y) * f;
    }
    let k = 1.0 / (6.0 * area);
    Point2::new(cx * k, cy * k)
}

/// Area of the axis-aligned bounding box of `points`.
#[must_use]
pub fn bbox_area(points: &[Point2]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let (mut min, mut max) = (*first, *first);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (max.x - min.x).max(0.0) * (max.y - min.y).max(0.0)
}

/// Index of the leftmost vertex, breaking ties by smallest y.
#[must_use]
pub fn leftmost_bottom_index(points: &[Point2]) -> usize {
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x || (pt.x == b.x && pt.y < b.y) {
            best = i;
        }
    }
    best
}

/// Number of distinct points of a ring, ignoring an exact closing duplicate.
fn open_len(points: &[Point2]) -> usize {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 && first == last => points.len() - 1,
        _ => points.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn signed_area_ccw_and_cw() {
        let mut pts = square();
        assert_relative_eq!(signed_area(&pts), 4.0);
        pts.reverse();
        assert_relative_eq!(signed_area(&pts), -4.0);
    }

    #[test]
    fn signed_area_closed_ring_matches_open() {
        let mut pts = square();
        pts.push(pts[0]);
        assert_relative_eq!(signed_area(&pts), 4.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[Point2::new(0.0, 0.0)]).abs() < 1e-12);
        assert!(signed_area(&[]).abs() < 1e-12);
    }

    #[test]
    fn winding_inside_outside() {
        let pts = square();
        assert_eq!(winding_number(&Point2::new(1.0, 1.0), &pts), 1);
        assert_eq!(winding_number(&Point2::new(3.0, 1.0), &pts), 0);
        let rev: Vec<_> = pts.iter().rev().copied().collect();
        assert_eq!(winding_number(&Point2::new(1.0, 1.0), &rev), -1);
    }

    #[test]
    fn winding_doubled_ring() {
        let mut pts = square();
        pts.extend(square());
        assert_eq!(winding_number(&Point2::new(1.0, 1.0), &pts), 2);
    }

    #[test]
    fn centroid_of_square() {
        let c = centroid(&square());
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn vertex_average_skips_closing_point() {
        let mut pts = square();
        pts.push(pts[0]);
        let c = vertex_average(&pts);
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bbox_of_triangle() {
        let tri = [Point2::new(0.0, 0.0), Point2::new(4.0, 1.0), Point2::new(1.0, 3.0)];
        assert_relative_eq!(bbox_area(&tri), 12.0);
        assert!(bbox_area(&[]).abs() < 1e-12);
    }

    #[test]
    fn leftmost_bottom_breaks_ties_by_y() {
        let pts = [
            Point2::new(1.0, 2.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.5, 0.5),
            Point2::new(2.0, 0.0),
        ];
        assert_eq!(leftmost_bottom_index(&pts), 2);
    }
}
