use crate::arrangement::{FaceId, HalfEdgeId};

/// Why a face walk was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceIssue {
    /// The walk closed with fewer than 3 half-edges.
    LoopTooShort,
    /// The walk could not continue, revisited a half-edge, or ran into a
    /// half-edge already owned by another face.
    NoNextEdgeAtVertex,
}

impl TraceIssue {
    /// Stable camelCase name.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::LoopTooShort => "loopTooShort",
            Self::NoNextEdgeAtVertex => "noNextEdgeAtVertex",
        }
    }
}

/// Fitter degradation stage reported with [`DiagnosticEvent::FitDegraded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStage {
    /// A sub-chain hit the depth cap and was emitted as straight segments.
    DepthLimited,
    /// A monotone rail still reversed direction at the recursion cap.
    MonotoneDepthLimited,
    /// The assembled path crossed itself and was replaced by a polyline.
    SelfIntersectionFallback,
}

/// One diagnostic observation.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// Ring cleanup before planarization.
    Sanitized {
        input_points: usize,
        output_points: usize,
        removed_duplicates: usize,
        removed_hairpins: usize,
        collapsed_repeats: usize,
    },
    /// Pairwise intersection search finished.
    Intersections { segments: usize, hits: usize },
    /// Edge splitting statistics.
    Planarized {
        segments: usize,
        min_splits: usize,
        max_splits: usize,
        avg_splits: f64,
        dropped_short_edges: usize,
    },
    /// Half-edge graph built.
    GraphBuilt {
        nodes: usize,
        half_edges: usize,
        min_degree: usize,
        max_degree: usize,
    },
    /// A face walk was abandoned.
    FaceTraceFailed {
        start: HalfEdgeId,
        issue: TraceIssue,
    },
    /// Faces classified against the original ring.
    FacesClassified {
        bounded: usize,
        inside: usize,
        unbounded: usize,
    },
    /// Boundary edges extracted and chained.
    BoundaryChained { boundary_edges: usize, cycles: usize },
    /// One candidate contour considered by the selector.
    Candidate {
        index: usize,
        face: Option<FaceId>,
        abs_area: f64,
        points: usize,
    },
    /// The chosen contour.
    Selected { reason: String, abs_area: f64 },
    /// Resolution failed with the given reason code.
    ResolveFailed { code: &'static str },
    /// The fitter degraded one step.
    FitDegraded { stage: FitStage, detail: usize },
}

/// Receives diagnostic events.
///
/// Operations never log directly; they report to a sink supplied by the
/// caller, and the default sink discards everything. Events never change
/// what an operation computes.
pub trait DiagnosticSink {
    /// Records one event.
    fn record(&mut self, event: DiagnosticEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&mut self, _event: DiagnosticEvent) {}
}

/// Collects events in arrival order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<DiagnosticEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `FaceTraceFailed` events carrying `issue`.
    #[must_use]
    pub fn trace_failures(&self, issue: TraceIssue) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DiagnosticEvent::FaceTraceFailed { issue: i, .. } if *i == issue))
            .count()
    }
}

impl DiagnosticSink for EventLog {
    fn record(&mut self, event: DiagnosticEvent) {
        self.events.push(event);
    }
}

/// Forwards events to `tracing` at debug level under the `calligeo` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::Sanitized {
                input_points,
                output_points,
                removed_duplicates,
                removed_hairpins,
                collapsed_repeats,
            } => tracing::debug!(
                target: "calligeo",
                input_points,
                output_points,
                removed_duplicates,
                removed_hairpins,
                collapsed_repeats,
                "ring sanitized"
            ),
            DiagnosticEvent::Intersections { segments, hits } => {
                tracing::debug!(target: "calligeo", segments, hits, "intersections found");
            }
            DiagnosticEvent::Planarized {
                segments,
                min_splits,
                max_splits,
                avg_splits,
                dropped_short_edges,
            } => tracing::debug!(
                target: "calligeo",
                segments,
                min_splits,
                max_splits,
                avg_splits,
                dropped_short_edges,
                "edges split"
            ),
            DiagnosticEvent::GraphBuilt {
                nodes,
                half_edges,
                min_degree,
                max_degree,
            } => tracing::debug!(
                target: "calligeo",
                nodes,
                half_edges,
                min_degree,
                max_degree,
                "half-edge graph built"
            ),
            DiagnosticEvent::FaceTraceFailed { start, issue } => tracing::debug!(
                target: "calligeo",
                start = start.0,
                issue = issue.code(),
                "face trace failed"
            ),
            DiagnosticEvent::FacesClassified {
                bounded,
                inside,
                unbounded,
            } => tracing::debug!(
                target: "calligeo",
                bounded,
                inside,
                unbounded,
                "faces classified"
            ),
            DiagnosticEvent::BoundaryChained {
                boundary_edges,
                cycles,
            } => tracing::debug!(
                target: "calligeo",
                boundary_edges,
                cycles,
                "boundary chained"
            ),
            DiagnosticEvent::Candidate {
                index,
                face,
                abs_area,
                points,
            } => tracing::debug!(
                target: "calligeo",
                index,
                face = ?face.map(|f| f.0),
                abs_area,
                points,
                "candidate contour"
            ),
            DiagnosticEvent::Selected { reason, abs_area } => {
                tracing::debug!(target: "calligeo", %reason, abs_area, "contour selected");
            }
            DiagnosticEvent::ResolveFailed { code } => {
                tracing::debug!(target: "calligeo", code, "resolve failed");
            }
            DiagnosticEvent::FitDegraded { stage, detail } => {
                tracing::debug!(target: "calligeo", stage = ?stage, detail, "fit degraded");
            }
        }
    }
}
