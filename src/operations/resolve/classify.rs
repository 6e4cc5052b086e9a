use crate::arrangement::{Arrangement, Face};
use crate::math::polygon_2d::{centroid, winding_number};
use crate::math::{normalized, Point2, Vector2};

/// Marks every bounded face inside or outside of `ring`.
///
/// A face is inside when a point strictly within it has a nonzero winding
/// number against `ring`. Unbounded faces stay outside.
pub fn classify_faces(arrangement: &mut Arrangement, ring: &[Point2]) {
    for face in &mut arrangement.faces {
        face.inside = face.bounded
            && interior_sample(face).is_some_and(|sample| winding_number(&sample, ring) != 0);
    }
}

/// A point strictly inside a bounded face.
///
/// Uses the area centroid when it falls inside the face; otherwise offsets an
/// edge midpoint toward the face interior, which lies on the right of its
/// clockwise half-edges.
#[must_use]
pub fn interior_sample(face: &Face) -> Option<Point2> {
    let c = centroid(&face.polygon);
    if winding_number(&c, &face.polygon) != 0 {
        return Some(c);
    }
    for w in face.polygon.windows(2) {
        let d = w[1] - w[0];
        let Some(dir) = normalized(&d) else {
            continue;
        };
        let right = Vector2::new(dir.y, -dir.x);
        let mid = w[0] + d * 0.5;
        let offset = (d.norm() * 1e-3).max(1e-9);
        let sample = mid + right * offset;
        if winding_number(&sample, &face.polygon) != 0 {
            return Some(sample);
        }
    }
    None
}
