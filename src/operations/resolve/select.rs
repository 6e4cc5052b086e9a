use crate::arrangement::{Arrangement, Face, FaceId, HalfEdgeId, NodeId};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::error::ResolveFailure;
use crate::geometry::ring::close_ring;
use crate::math::intersect_2d::ring_self_intersection_count;
use crate::math::polygon_2d::{bbox_area, leftmost_bottom_index, signed_area};
use crate::math::{points_approx_eq, Point2};

use super::SelectionPolicy;

/// Where a selected contour came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// The n-th boundary cycle, in discovery order.
    BoundaryCycle(usize),
    /// A bounded face of the arrangement.
    Face(FaceId),
}

/// The chosen output contour.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSelection {
    /// Normalized ring: counter-clockwise and explicitly closed.
    pub ring: Vec<Point2>,
    pub source: SelectionSource,
    /// Human-readable explanation, for diagnostics only.
    pub reason: String,
    pub abs_area: f64,
}

/// Half-edges that separate an inside face from an outside one, keeping the
/// side whose face is inside. Ordered by half-edge id.
#[must_use]
pub fn boundary_edges(arrangement: &Arrangement) -> Vec<HalfEdgeId> {
    (0..arrangement.half_edges.len())
        .map(HalfEdgeId)
        .filter(|&e| {
            let twin = arrangement.half_edge(e).twin;
            arrangement.is_inside(e) && !arrangement.is_inside(twin)
        })
        .collect()
}

/// Chains boundary half-edges into closed node cycles.
///
/// At each node the first unvisited boundary edge in angular order is taken.
/// Reaching a node already on the current path closes a cycle there, so a
/// pinch vertex splits the walk into separate simple cycles. Open chains
/// are discarded.
#[must_use]
pub fn chain_boundary(arrangement: &Arrangement, boundary: &[HalfEdgeId]) -> Vec<Vec<NodeId>> {
    let mut is_boundary = vec![false; arrangement.half_edges.len()];
    for e in boundary {
        is_boundary[e.0] = true;
    }
    let mut visited = vec![false; arrangement.half_edges.len()];
    let step_cap = boundary.len() + 2;
    let mut cycles = Vec::new();

    for &start in boundary {
        if visited[start.0] {
            continue;
        }
        let mut path = vec![arrangement.half_edge(start).from];
        for _ in 0..step_cap {
            let Some(&node) = path.last() else {
                break;
            };
            let Some(e) = arrangement.outgoing[node.0]
                .iter()
                .copied()
                .find(|e| is_boundary[e.0] && !visited[e.0])
            else {
                break;
            };
            visited[e.0] = true;
            let to = arrangement.half_edge(e).to;
            if let Some(k) = path.iter().position(|&n| n == to) {
                if path.len() - k >= 3 {
                    cycles.push(path[k..].to_vec());
                }
                path.truncate(k + 1);
                if path.len() == 1 {
                    break;
                }
            } else {
                path.push(to);
            }
        }
    }
    cycles
}

struct Candidate {
    ring: Vec<Point2>,
    source: SelectionSource,
    abs_area: f64,
}

/// Picks the output contour under `policy`.
///
/// `input` is the caller's ring (explicitly closed); its first vertex seeds
/// the rotation of the output and its area scales the minimum-area check.
///
/// # Errors
///
/// Returns the [`ResolveFailure`] that ends the resolution.
pub fn select_contour(
    arrangement: &Arrangement,
    input: &[Point2],
    policy: &SelectionPolicy,
    eps: f64,
    sink: &mut dyn DiagnosticSink,
) -> std::result::Result<ContourSelection, ResolveFailure> {
    let input_area = signed_area(input).abs();
    let min_area = policy.min_area_ratio() * input_area;

    let (best, reason) = match *policy {
        SelectionPolicy::BoundaryOrLargestFace { .. } => boundary_or_largest_face(arrangement, sink)?,
        SelectionPolicy::LargestFace { .. } => largest_inside_face(arrangement)?,
        SelectionPolicy::BoundingBox { min_bbox_ratio, .. } => {
            bounding_box_face(arrangement, bbox_area(input) * min_bbox_ratio, min_area, eps)?
        }
    };

    if best.abs_area < min_area {
        return Err(ResolveFailure::AreaTooSmall {
            best_area: best.abs_area,
            min_area,
        });
    }

    let ring = normalize(&best.ring, input.first(), eps);
    if ring.len() < 4 {
        return Err(ResolveFailure::InvalidResolved);
    }
    sink.record(DiagnosticEvent::Selected {
        reason: reason.clone(),
        abs_area: best.abs_area,
    });
    Ok(ContourSelection {
        ring,
        source: best.source,
        reason,
        abs_area: best.abs_area,
    })
}

fn boundary_or_largest_face(
    arrangement: &Arrangement,
    sink: &mut dyn DiagnosticSink,
) -> std::result::Result<(Candidate, String), ResolveFailure> {
    // Step 1: Boundary edges between inside and outside faces.
    let boundary = boundary_edges(arrangement);
    if boundary.is_empty() {
        return Err(ResolveFailure::NoBoundary);
    }

    // Step 2: Chain them into simple cycles.
    let cycles = chain_boundary(arrangement, &boundary);
    sink.record(DiagnosticEvent::BoundaryChained {
        boundary_edges: boundary.len(),
        cycles: cycles.len(),
    });
    if cycles.is_empty() {
        return Err(ResolveFailure::NoBoundaryCycles);
    }

    // Step 3: Candidates are the cycles, then the largest bounded face.
    let mut candidates: Vec<Candidate> = cycles
        .iter()
        .enumerate()
        .map(|(i, cycle)| {
            let ring: Vec<Point2> = cycle.iter().map(|n| arrangement.node(*n).position).collect();
            Candidate {
                abs_area: signed_area(&ring).abs(),
                ring,
                source: SelectionSource::BoundaryCycle(i),
            }
        })
        .collect();
    if let Some(face) = largest_face(arrangement.bounded_faces()) {
        if face.polygon.len() >= 4 {
            candidates.push(face_candidate(face));
        }
    }

    for (index, c) in candidates.iter().enumerate() {
        sink.record(DiagnosticEvent::Candidate {
            index,
            face: match c.source {
                SelectionSource::Face(id) => Some(id),
                SelectionSource::BoundaryCycle(_) => None,
            },
            abs_area: c.abs_area,
            points: c.ring.len(),
        });
    }

    // Step 4: Greatest absolute area; the earlier candidate keeps ties.
    let mut best_index = 0;
    for (i, c) in candidates.iter().enumerate().skip(1) {
        if c.abs_area > candidates[best_index].abs_area {
            best_index = i;
        }
    }
    let best = candidates.swap_remove(best_index);
    let reason = match best.source {
        SelectionSource::BoundaryCycle(i) => {
            format!("boundary cycle {i} of {} with largest area", cycles.len())
        }
        SelectionSource::Face(id) => format!("largest bounded face {}", id.0),
    };
    Ok((best, reason))
}

fn largest_inside_face(
    arrangement: &Arrangement,
) -> std::result::Result<(Candidate, String), ResolveFailure> {
    let face = largest_face(arrangement.bounded_faces().filter(|f| f.inside))
        .ok_or(ResolveFailure::NoBoundary)?;
    let reason = format!("largest inside face {}", face.id.0);
    Ok((face_candidate(face), reason))
}

fn bounding_box_face(
    arrangement: &Arrangement,
    min_bbox: f64,
    min_area: f64,
    eps: f64,
) -> std::result::Result<(Candidate, String), ResolveFailure> {
    let inside: Vec<&Face> = arrangement.bounded_faces().filter(|f| f.inside).collect();
    if inside.is_empty() {
        return Err(ResolveFailure::NoBoundary);
    }
    let mut scored: Vec<(&Face, usize, f64)> = inside
        .iter()
        .filter(|f| f.abs_area() >= min_area && bbox_area(&f.polygon) >= min_bbox)
        .map(|f| (*f, ring_self_intersection_count(&f.polygon, eps), bbox_area(&f.polygon)))
        .collect();
    if scored.is_empty() {
        let best_area = inside.iter().map(|f| f.abs_area()).fold(0.0, f64::max);
        return Err(ResolveFailure::AreaTooSmall {
            best_area,
            min_area,
        });
    }
    // Fewest self-intersections, then larger box, larger area, lower id.
    scored.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then(b.2.total_cmp(&a.2))
            .then(b.0.abs_area().total_cmp(&a.0.abs_area()))
            .then(a.0.id.cmp(&b.0.id))
    });
    let face = scored[0].0;
    let reason = format!("face {} with largest bounding box", face.id.0);
    Ok((face_candidate(face), reason))
}

/// Bounded face with greatest absolute area; ties keep the lower id.
fn largest_face<'a>(faces: impl Iterator<Item = &'a Face>) -> Option<&'a Face> {
    faces.fold(None, |best: Option<&Face>, f| match best {
        Some(b) if b.abs_area() >= f.abs_area() => Some(b),
        _ => Some(f),
    })
}

fn face_candidate(face: &Face) -> Candidate {
    let mut ring = face.polygon.clone();
    ring.pop();
    Candidate {
        ring,
        source: SelectionSource::Face(face.id),
        abs_area: face.abs_area(),
    }
}

/// Orients an open ring counter-clockwise, rotates it to start at `anchor`
/// when that vertex is present (else at the leftmost-bottom vertex), and
/// closes it.
fn normalize(ring: &[Point2], anchor: Option<&Point2>, eps: f64) -> Vec<Point2> {
    let mut ring = ring.to_vec();
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    if ring.is_empty() {
        return ring;
    }
    let start = anchor
        .and_then(|a| ring.iter().position(|p| points_approx_eq(p, a, eps)))
        .unwrap_or_else(|| leftmost_bottom_index(&ring));
    ring.rotate_left(start);
    close_ring(&ring, eps)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arrangement::{build, trace_faces};
    use crate::diagnostics::NullSink;
    use crate::operations::resolve::classify::classify_faces;
    use crate::operations::resolve::intersect::{collect_splits, find_intersections};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn arrangement_of(ring: &[Point2]) -> Arrangement {
        let hits = find_intersections(ring, 1e-6);
        let splits = collect_splits(ring.len() - 1, &hits);
        let mut arr = build(ring, &splits, 1e-6);
        trace_faces(&mut arr, &mut NullSink);
        classify_faces(&mut arr, ring);
        arr
    }

    fn hourglass() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(10.0, 10.0), p(10.0, 0.0), p(0.0, 10.0), p(0.0, 0.0)]
    }

    #[test]
    fn hourglass_pinch_splits_into_two_cycles() {
        let arr = arrangement_of(&hourglass());
        let boundary = boundary_edges(&arr);
        assert_eq!(boundary.len(), 6);
        let cycles = chain_boundary(&arr, &boundary);
        assert_eq!(cycles.len(), 2);
        assert!(cycles.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn normalize_reverses_and_rotates() {
        let cw = [p(0.0, 2.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 0.0)];
        let out = normalize(&cw, Some(&p(0.0, 0.0)), 1e-6);
        assert_eq!(
            out,
            vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(0.0, 0.0)]
        );
    }

    #[test]
    fn normalize_without_anchor_starts_leftmost_bottom() {
        let ccw = [p(2.0, 2.0), p(0.0, 2.0), p(0.0, 0.0), p(2.0, 0.0)];
        let out = normalize(&ccw, Some(&p(9.0, 9.0)), 1e-6);
        assert_eq!(out[0], p(0.0, 0.0));
        assert!(signed_area(&out) > 0.0);
    }

    #[test]
    fn largest_face_policy_picks_bigger_lobe() {
        // Lobes of area 50 and 12.5 meeting at (10, 10/3).
        let ring = vec![p(0.0, 0.0), p(15.0, 5.0), p(15.0, 0.0), p(0.0, 10.0), p(0.0, 0.0)];
        let arr = arrangement_of(&ring);
        let sel = select_contour(
            &arr,
            &ring,
            &SelectionPolicy::LargestFace { min_area_ratio: 0.0 },
            1e-6,
            &mut NullSink,
        )
        .unwrap();
        assert!(matches!(sel.source, SelectionSource::Face(_)));
        assert!((sel.abs_area - 50.0).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_policy_rejects_small_faces() {
        let ring = vec![p(0.0, 0.0), p(10.0, 10.0), p(10.0, 0.0), p(0.0, 10.0), p(0.0, 0.0)];
        let arr = arrangement_of(&ring);
        let policy = SelectionPolicy::BoundingBox {
            min_area_ratio: 0.0,
            min_bbox_ratio: 0.9,
        };
        let err = select_contour(&arr, &ring, &policy, 1e-6, &mut NullSink).unwrap_err();
        assert_eq!(err.code(), "areaTooSmall");

        let policy = SelectionPolicy::BoundingBox {
            min_area_ratio: 0.0,
            min_bbox_ratio: 0.1,
        };
        let sel = select_contour(&arr, &ring, &policy, 1e-6, &mut NullSink).unwrap();
        assert!((sel.abs_area - 25.0).abs() < 1e-9);
    }
}
