use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, TraceIssue};
use crate::math::polygon_2d::signed_area;
use crate::math::Point2;

use super::{Arrangement, Face, FaceId, HalfEdgeId};

/// Partitions the half-edge graph into closed faces.
///
/// Starting from every half-edge not yet walked, follows
/// [`Arrangement::next`] until the walk returns to its start. Walks that
/// revisit a half-edge, reach one already walked, exceed the step cap, or
/// close with fewer than 3 half-edges produce no face and are reported to
/// `sink`. Every half-edge of a successful walk is stamped with the new
/// face id.
///
/// Returns the number of faces created.
pub fn trace_faces(arrangement: &mut Arrangement, sink: &mut dyn DiagnosticSink) -> usize {
    let count = arrangement.half_edges.len();
    let step_cap = count + 1;
    // Walk id that first reached each half-edge.
    let mut walked: Vec<Option<usize>> = vec![None; count];

    for start in 0..count {
        if walked[start].is_some() {
            continue;
        }
        let walk = start;
        let start = HalfEdgeId(start);
        walked[start.0] = Some(walk);

        let mut cycle = vec![start];
        let mut current = start;
        let mut closed = false;
        for _ in 0..step_cap {
            let Some(next) = arrangement.next(current) else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            if walked[next.0].is_some() {
                break;
            }
            walked[next.0] = Some(walk);
            cycle.push(next);
            current = next;
        }

        if !closed {
            sink.record(DiagnosticEvent::FaceTraceFailed {
                start,
                issue: TraceIssue::NoNextEdgeAtVertex,
            });
            continue;
        }
        if cycle.len() < 3 {
            sink.record(DiagnosticEvent::FaceTraceFailed {
                start,
                issue: TraceIssue::LoopTooShort,
            });
            continue;
        }

        let id = FaceId(arrangement.faces.len());
        let mut polygon: Vec<Point2> = cycle
            .iter()
            .map(|e| arrangement.node(arrangement.half_edge(*e).from).position)
            .collect();
        let area = signed_area(&polygon);
        polygon.push(polygon[0]);
        for e in &cycle {
            arrangement.half_edges[e.0].face = Some(id);
        }
        arrangement.faces.push(Face {
            id,
            half_edges: cycle,
            polygon,
            signed_area: area,
            bounded: area < 0.0,
            inside: false,
        });
    }

    arrangement.faces.len()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arrangement::{build, SplitPoint};
    use crate::diagnostics::{EventLog, NullSink};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn square_has_one_bounded_and_one_unbounded_face() {
        let ring = [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(0.0, 0.0)];
        let mut arr = build(&ring, &[], 1e-6);
        let faces = trace_faces(&mut arr, &mut NullSink);
        assert_eq!(faces, 2);
        assert_eq!(arr.bounded_face_count(), 1);
        let bounded = arr.bounded_faces().next().unwrap();
        assert_relative_eq!(bounded.signed_area, -4.0);
        assert_eq!(bounded.polygon.len(), 5);
        assert!(arr.half_edges.iter().all(|he| he.face.is_some()));
    }

    #[test]
    fn hourglass_traces_two_triangles() {
        let ring = [p(0.0, 0.0), p(10.0, 10.0), p(10.0, 0.0), p(0.0, 10.0), p(0.0, 0.0)];
        let center = p(5.0, 5.0);
        let splits = vec![
            vec![SplitPoint { t: 0.5, point: center }],
            Vec::new(),
            vec![SplitPoint { t: 0.5, point: center }],
        ];
        let mut arr = build(&ring, &splits, 1e-6);
        assert_eq!(arr.nodes.len(), 5);
        trace_faces(&mut arr, &mut NullSink);
        let areas: Vec<f64> = arr.bounded_faces().map(Face::abs_area).collect();
        assert_eq!(areas.len(), 2);
        assert_relative_eq!(areas[0], 25.0, epsilon = 1e-9);
        assert_relative_eq!(areas[1], 25.0, epsilon = 1e-9);
        assert_eq!(arr.faces.iter().filter(|f| !f.bounded).count(), 1);
    }

    #[test]
    fn dangling_edge_stays_inside_one_walk() {
        // A lone segment walks forth and back: two half-edges, too short.
        let ring = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)];
        let mut arr = build(&ring, &[], 1e-6);
        let mut log = EventLog::new();
        let faces = trace_faces(&mut arr, &mut log);
        assert_eq!(faces, 0);
        assert_eq!(log.trace_failures(TraceIssue::LoopTooShort), 1);
    }
}
