pub mod classify;
pub mod intersect;
pub mod select;

pub use select::{ContourSelection, SelectionSource};

use crate::arrangement::{self, Arrangement};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink};
use crate::error::{OperationError, ResolveFailure, Result};
use crate::geometry::ring::{close_ring, sanitize_ring};
use crate::math::{ensure_finite, Point2, DEFAULT_EPSILON};

/// How the output contour is chosen among the resolved regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPolicy {
    /// Largest-area cycle among the inside/outside boundary cycles and the
    /// largest bounded face.
    BoundaryOrLargestFace { min_area_ratio: f64 },
    /// The inside face with the largest absolute area.
    LargestFace { min_area_ratio: f64 },
    /// Inside faces filtered by area and bounding box, preferring faces
    /// without self-intersections and then the largest bounding box.
    BoundingBox {
        min_area_ratio: f64,
        min_bbox_ratio: f64,
    },
}

impl SelectionPolicy {
    /// Fraction of the input ring's absolute area the result must reach.
    #[must_use]
    pub fn min_area_ratio(&self) -> f64 {
        match *self {
            Self::BoundaryOrLargestFace { min_area_ratio }
            | Self::LargestFace { min_area_ratio }
            | Self::BoundingBox { min_area_ratio, .. } => min_area_ratio,
        }
    }

    fn validate(&self) -> Result<()> {
        let ratio = self.min_area_ratio();
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(OperationError::InvalidParameter {
                parameter: "min_area_ratio",
                value: ratio,
                reason: "must be finite and non-negative",
            }
            .into());
        }
        if let Self::BoundingBox { min_bbox_ratio, .. } = *self {
            if !min_bbox_ratio.is_finite() || min_bbox_ratio < 0.0 {
                return Err(OperationError::InvalidParameter {
                    parameter: "min_bbox_ratio",
                    value: min_bbox_ratio,
                    reason: "must be finite and non-negative",
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::BoundaryOrLargestFace {
            min_area_ratio: 0.01,
        }
    }
}

/// Parameters of a self-overlap resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveOptions {
    eps: f64,
    selection_policy: SelectionPolicy,
}

impl ResolveOptions {
    /// Creates validated options.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidParameter` if `eps` is not a positive
    /// finite number or the policy carries a negative or non-finite ratio.
    pub fn new(eps: f64, selection_policy: SelectionPolicy) -> Result<Self> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(OperationError::InvalidParameter {
                parameter: "eps",
                value: eps,
                reason: "must be finite and positive",
            }
            .into());
        }
        selection_policy.validate()?;
        Ok(Self {
            eps,
            selection_policy,
        })
    }

    #[must_use]
    pub fn eps(&self) -> f64 {
        self.eps
    }

    #[must_use]
    pub fn selection_policy(&self) -> &SelectionPolicy {
        &self.selection_policy
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPSILON,
            selection_policy: SelectionPolicy::default(),
        }
    }
}

/// Outcome of [`ResolveSelfOverlap::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveResult {
    /// The resolved ring on success; the auto-closed input on failure.
    pub ring: Vec<Point2>,
    /// Segment crossings found in the sanitized ring.
    pub intersections: Vec<Point2>,
    /// Number of bounded faces traced.
    pub face_count: usize,
    /// Number of bounded faces classified inside.
    pub inside_face_count: usize,
    pub selection: Option<ContourSelection>,
    pub failure: Option<ResolveFailure>,
}

impl ResolveResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Resolves a self-overlapping boundary ring into one simple polygon.
///
/// The ring is planarized at its self-intersections, partitioned into faces,
/// and each face is classified with the nonzero winding rule against the
/// ring. The boundary between inside and outside faces is then reduced to a
/// single counter-clockwise contour.
#[derive(Debug)]
pub struct ResolveSelfOverlap {
    points: Vec<Point2>,
    options: ResolveOptions,
}

impl ResolveSelfOverlap {
    /// Creates a new resolve operation.
    #[must_use]
    pub fn new(points: Vec<Point2>, options: ResolveOptions) -> Self {
        Self { points, options }
    }

    /// Executes the resolution, discarding diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinitePoint` if any input point has a
    /// non-finite coordinate. Algorithmic failures are reported through
    /// [`ResolveResult::failure`] instead.
    pub fn execute(&self) -> Result<ResolveResult> {
        self.execute_with_sink(&mut NullSink)
    }

    /// Executes the resolution, reporting diagnostics to `sink`.
    ///
    /// # Errors
    ///
    /// See [`ResolveSelfOverlap::execute`].
    pub fn execute_with_sink(&self, sink: &mut dyn DiagnosticSink) -> Result<ResolveResult> {
        ensure_finite(&self.points)?;
        let eps = self.options.eps;
        let input = close_ring(&self.points, eps);
        let mut result = ResolveResult {
            ring: input.clone(),
            intersections: Vec::new(),
            face_count: 0,
            inside_face_count: 0,
            selection: None,
            failure: None,
        };

        match self.resolve(&input, &mut result, sink) {
            Ok(selection) => {
                result.ring.clone_from(&selection.ring);
                result.selection = Some(selection);
            }
            Err(failure) => {
                sink.record(DiagnosticEvent::ResolveFailed {
                    code: failure.code(),
                });
                result.failure = Some(failure);
            }
        }
        Ok(result)
    }

    fn resolve(
        &self,
        input: &[Point2],
        result: &mut ResolveResult,
        sink: &mut dyn DiagnosticSink,
    ) -> std::result::Result<ContourSelection, ResolveFailure> {
        let eps = self.options.eps;
        if input.len() < 4 {
            return Err(ResolveFailure::RingTooSmall);
        }

        // Step 1: Sanitize.
        let sanitized = sanitize_ring(input, eps);
        sink.record(DiagnosticEvent::Sanitized {
            input_points: input.len(),
            output_points: sanitized.points.len(),
            removed_duplicates: sanitized.removed_duplicates,
            removed_hairpins: sanitized.removed_hairpins,
            collapsed_repeats: sanitized.collapsed_repeats,
        });
        let ring = sanitized.points;
        if ring.len() < 4 {
            return Err(ResolveFailure::RingTooSmall);
        }

        // Step 2: Intersect.
        let hits = intersect::find_intersections(&ring, eps);
        let segment_count = ring.len() - 1;
        result.intersections = hits.iter().map(|h| h.point).collect();
        sink.record(DiagnosticEvent::Intersections {
            segments: segment_count,
            hits: hits.len(),
        });

        // Step 3: Planarize.
        let splits = intersect::collect_splits(segment_count, &hits);
        let mut arrangement = arrangement::build(&ring, &splits, eps);
        record_graph(&arrangement, sink);
        if arrangement.half_edges.is_empty() {
            return Err(ResolveFailure::NoEdges);
        }

        // Step 4: Trace and classify faces.
        arrangement::trace_faces(&mut arrangement, sink);
        classify::classify_faces(&mut arrangement, &ring);
        result.face_count = arrangement.bounded_face_count();
        result.inside_face_count = arrangement.inside_face_count();
        sink.record(DiagnosticEvent::FacesClassified {
            bounded: result.face_count,
            inside: result.inside_face_count,
            unbounded: arrangement.faces.len() - result.face_count,
        });
        if result.face_count == 0 {
            return Err(ResolveFailure::NoFaces);
        }

        // Step 5: Select the output contour.
        select::select_contour(
            &arrangement,
            input,
            &self.options.selection_policy,
            eps,
            sink,
        )
    }
}

fn record_graph(arrangement: &Arrangement, sink: &mut dyn DiagnosticSink) {
    let stats = arrangement.stats;
    sink.record(DiagnosticEvent::Planarized {
        segments: stats.segments,
        min_splits: stats.min_splits,
        max_splits: stats.max_splits,
        avg_splits: stats.avg_splits,
        dropped_short_edges: stats.dropped_short_edges,
    });
    let (min_degree, max_degree) = arrangement.degree_range();
    sink.record(DiagnosticEvent::GraphBuilt {
        nodes: arrangement.nodes.len(),
        half_edges: arrangement.half_edges.len(),
        min_degree,
        max_degree,
    });
}
