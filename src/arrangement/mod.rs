pub mod builder;
pub mod faces;

use std::fmt;

use crate::math::snap::SnapKey;
use crate::math::Point2;

pub use builder::{build, SplitPoint};
pub use faces::trace_faces;

macro_rules! index_type {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

index_type!(NodeId);
index_type!(HalfEdgeId);
index_type!(FaceId);

/// A unique vertex of the arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: SnapKey,
    /// Position of the first split point that mapped to this key.
    pub position: Point2,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Direction angle from `from` to `to`, in `(-pi, pi]`.
    pub angle: f64,
    pub twin: HalfEdgeId,
    pub face: Option<FaceId>,
}

/// A closed cycle of half-edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub id: FaceId,
    pub half_edges: Vec<HalfEdgeId>,
    /// Node positions along the cycle, explicitly closed.
    pub polygon: Vec<Point2>,
    pub signed_area: f64,
    /// Bounded faces are traced clockwise; the cycle around the outside of a
    /// connected component runs counter-clockwise and is unbounded.
    pub bounded: bool,
    pub inside: bool,
}

impl Face {
    #[must_use]
    pub fn abs_area(&self) -> f64 {
        self.signed_area.abs()
    }
}

/// Split counts and dropped edges recorded while building.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanarStats {
    pub segments: usize,
    pub min_splits: usize,
    pub max_splits: usize,
    pub avg_splits: f64,
    pub dropped_short_edges: usize,
}

/// Half-edge graph plus the faces traced on it.
///
/// Each undirected edge is a pair of twin half-edges in flat vectors indexed
/// by id newtypes. Outgoing half-edges of a node are sorted by angle, which
/// is all the face tracer needs.
#[derive(Debug, Clone, Default)]
pub struct Arrangement {
    pub nodes: Vec<Node>,
    pub half_edges: Vec<HalfEdge>,
    /// Outgoing half-edges per node, sorted by angle, destination, then id.
    pub outgoing: Vec<Vec<HalfEdgeId>>,
    /// Position of each half-edge inside its source node's `outgoing` list.
    pub(crate) slot: Vec<usize>,
    pub faces: Vec<Face>,
    pub stats: PlanarStats,
}

impl Arrangement {
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    #[must_use]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    /// Next half-edge around the face of `e`.
    ///
    /// This is the entry following `twin(e)` in the angular order around
    /// `e.to`, wrapping at the end of the list.
    #[must_use]
    pub fn next(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        let he = self.half_edges.get(e.0)?;
        let list = self.outgoing.get(he.to.0)?;
        if list.is_empty() {
            return None;
        }
        let pos = *self.slot.get(he.twin.0)?;
        Some(list[(pos + 1) % list.len()])
    }

    /// Smallest and largest node degree.
    #[must_use]
    pub fn degree_range(&self) -> (usize, usize) {
        let min = self.outgoing.iter().map(Vec::len).min().unwrap_or(0);
        let max = self.outgoing.iter().map(Vec::len).max().unwrap_or(0);
        (min, max)
    }

    pub fn bounded_faces(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter().filter(|f| f.bounded)
    }

    #[must_use]
    pub fn bounded_face_count(&self) -> usize {
        self.bounded_faces().count()
    }

    #[must_use]
    pub fn inside_face_count(&self) -> usize {
        self.bounded_faces().filter(|f| f.inside).count()
    }

    /// Whether the face owning `e` is marked inside. Unowned half-edges count
    /// as outside.
    #[must_use]
    pub fn is_inside(&self, e: HalfEdgeId) -> bool {
        self.half_edges[e.0]
            .face
            .is_some_and(|f| self.faces[f.0].inside)
    }
}
