use std::collections::{HashMap, HashSet};

use crate::math::snap::SnapKey;
use crate::math::{lexicographic_cmp, points_approx_eq, Point2};

use super::{Arrangement, HalfEdge, HalfEdgeId, Node, NodeId, PlanarStats};

/// An extra split location on one ring segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPoint {
    /// Parameter along the segment, unclamped.
    pub t: f64,
    pub point: Point2,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    t: f64,
    point: Point2,
    vertex: bool,
}

/// Builds the half-edge graph of a closed ring.
///
/// `ring` is explicitly closed, so segment `i` runs from `ring[i]` to
/// `ring[i + 1]`. `splits[i]` holds the intersection points found on that
/// segment (a missing entry means none).
#[must_use]
pub fn build(ring: &[Point2], splits: &[Vec<SplitPoint>], eps: f64) -> Arrangement {
    let segment_count = ring.len().saturating_sub(1);
    let mut arrangement = Arrangement::default();
    let mut node_index: HashMap<SnapKey, NodeId> = HashMap::new();
    let mut seen_edges: HashSet<(NodeId, NodeId)> = HashSet::new();

    let mut min_splits = usize::MAX;
    let mut max_splits = 0;
    let mut total_splits = 0;
    let mut dropped_short_edges = 0;

    for i in 0..segment_count {
        // Step 1: Collect and order this segment's split points.
        let extra = splits.get(i).map(Vec::as_slice).unwrap_or_default();
        let points = segment_splits(ring[i], ring[i + 1], extra, eps);
        let interior = points.len().saturating_sub(2);
        min_splits = min_splits.min(interior);
        max_splits = max_splits.max(interior);
        total_splits += interior;

        // Step 2: Unify split points into nodes and add one twin pair per new
        // undirected edge.
        for pair in points.windows(2) {
            let from = ensure_node(&mut arrangement, &mut node_index, &pair[0], eps);
            let to = ensure_node(&mut arrangement, &mut node_index, &pair[1], eps);
            let length = (arrangement.node(to).position - arrangement.node(from).position).norm();
            if from == to || length <= eps {
                dropped_short_edges += 1;
                continue;
            }
            let key = if from < to { (from, to) } else { (to, from) };
            if !seen_edges.insert(key) {
                continue;
            }
            add_twin_pair(&mut arrangement, from, to);
        }
    }

    // Step 3: Sort outgoing lists angularly.
    sort_outgoing(&mut arrangement);

    #[allow(clippy::cast_precision_loss)]
    let avg_splits = if segment_count == 0 {
        0.0
    } else {
        total_splits as f64 / segment_count as f64
    };
    arrangement.stats = PlanarStats {
        segments: segment_count,
        min_splits: if segment_count == 0 { 0 } else { min_splits },
        max_splits,
        avg_splits,
        dropped_short_edges,
    };
    arrangement
}

/// Endpoints plus interior splits, ordered by parameter then position, with
/// points closer than `eps` collapsed. Ring vertices win over intersection
/// points when the two collapse.
fn segment_splits(a: Point2, b: Point2, extra: &[SplitPoint], eps: f64) -> Vec<Point2> {
    let mut all: Vec<Split> = Vec::with_capacity(extra.len() + 2);
    all.push(Split {
        t: 0.0,
        point: a,
        vertex: true,
    });
    all.extend(extra.iter().map(|s| Split {
        t: s.t,
        point: s.point,
        vertex: false,
    }));
    all.push(Split {
        t: 1.0,
        point: b,
        vertex: true,
    });
    all.sort_by(|p, q| {
        p.t.total_cmp(&q.t)
            .then_with(|| lexicographic_cmp(&p.point, &q.point))
    });

    let mut kept: Vec<Split> = Vec::with_capacity(all.len());
    for split in all {
        match kept.last_mut() {
            Some(last) if points_approx_eq(&last.point, &split.point, eps) => {
                if split.vertex && !last.vertex {
                    *last = split;
                }
            }
            _ => kept.push(split),
        }
    }
    kept.into_iter().map(|s| s.point).collect()
}

fn ensure_node(
    arrangement: &mut Arrangement,
    index: &mut HashMap<SnapKey, NodeId>,
    p: &Point2,
    eps: f64,
) -> NodeId {
    let key = SnapKey::of(p, eps);
    *index.entry(key).or_insert_with(|| {
        let id = NodeId(arrangement.nodes.len());
        arrangement.nodes.push(Node { key, position: *p });
        arrangement.outgoing.push(Vec::new());
        id
    })
}

fn add_twin_pair(arrangement: &mut Arrangement, from: NodeId, to: NodeId) {
    let forward = HalfEdgeId(arrangement.half_edges.len());
    let backward = HalfEdgeId(forward.0 + 1);
    let d = arrangement.node(to).position - arrangement.node(from).position;
    let angle = d.y.atan2(d.x);
    let back_angle = (-d.y).atan2(-d.x);

    arrangement.half_edges.push(HalfEdge {
        from,
        to,
        angle,
        twin: backward,
        face: None,
    });
    arrangement.half_edges.push(HalfEdge {
        from: to,
        to: from,
        angle: back_angle,
        twin: forward,
        face: None,
    });
    arrangement.outgoing[from.0].push(forward);
    arrangement.outgoing[to.0].push(backward);
}

fn sort_outgoing(arrangement: &mut Arrangement) {
    let half_edges = &arrangement.half_edges;
    for list in &mut arrangement.outgoing {
        list.sort_by(|a, b| {
            let ea = &half_edges[a.0];
            let eb = &half_edges[b.0];
            ea.angle
                .total_cmp(&eb.angle)
                .then(ea.to.cmp(&eb.to))
                .then(a.cmp(b))
        });
    }
    arrangement.slot = vec![0; arrangement.half_edges.len()];
    for list in &arrangement.outgoing {
        for (pos, id) in list.iter().enumerate() {
            arrangement.slot[id.0] = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)]
    }

    #[test]
    fn square_builds_four_twin_pairs() {
        let arr = build(&square(), &[], 1e-6);
        assert_eq!(arr.nodes.len(), 4);
        assert_eq!(arr.half_edges.len(), 8);
        assert_eq!(arr.degree_range(), (2, 2));
        for (i, he) in arr.half_edges.iter().enumerate() {
            let twin = arr.half_edge(he.twin);
            assert_eq!(twin.twin, HalfEdgeId(i));
            assert_eq!(twin.from, he.to);
            assert_eq!(twin.to, he.from);
        }
    }

    #[test]
    fn outgoing_lists_are_angle_sorted() {
        let arr = build(&square(), &[], 1e-6);
        for list in &arr.outgoing {
            for w in list.windows(2) {
                assert!(arr.half_edge(w[0]).angle <= arr.half_edge(w[1]).angle);
            }
            for (pos, id) in list.iter().enumerate() {
                assert_eq!(arr.slot[id.0], pos);
            }
        }
    }

    #[test]
    fn duplicate_undirected_edges_are_skipped() {
        // The same edge traversed forward then back.
        let ring = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 0.0)];
        let arr = build(&ring, &[], 1e-6);
        assert_eq!(arr.half_edges.len(), 4);
    }

    #[test]
    fn interior_split_creates_node() {
        let splits = vec![vec![SplitPoint {
            t: 0.5,
            point: p(0.5, 0.0),
        }]];
        let arr = build(&square(), &splits, 1e-6);
        assert_eq!(arr.nodes.len(), 5);
        assert_eq!(arr.half_edges.len(), 10);
        assert_eq!(arr.stats.max_splits, 1);
        assert_eq!(arr.stats.min_splits, 0);
    }

    #[test]
    fn split_near_vertex_collapses_onto_vertex() {
        let splits = vec![vec![SplitPoint {
            t: 1.0 - 1e-9,
            point: p(1.0 - 1e-9, 0.0),
        }]];
        let arr = build(&square(), &splits, 1e-6);
        assert_eq!(arr.nodes.len(), 4);
        assert_eq!(arr.node(NodeId(1)).position, p(1.0, 0.0));
    }

    #[test]
    fn next_follows_angular_order() {
        let arr = build(&square(), &[], 1e-6);
        // Half-edge 0 runs (0,0) -> (1,0); the only other way out of (1,0)
        // leads up to (1,1).
        let next = arr.next(HalfEdgeId(0)).map(|e| arr.half_edge(e).to);
        assert_eq!(next.map(|n| arr.node(n).position), Some(p(1.0, 1.0)));
    }
}
