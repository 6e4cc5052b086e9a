use thiserror::Error;

/// Top-level error type for the calligeo kernel.
///
/// Only caller-contract violations surface here. Algorithmic failures of the
/// resolver are reported as [`ResolveFailure`] values instead.
#[derive(Debug, Error)]
pub enum CalligeoError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to the geometric input itself.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("point {index} has a non-finite coordinate ({x}, {y})")]
    NonFinitePoint { index: usize, x: f64, y: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to operation parameters.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Terminal failure of a self-overlap resolution.
///
/// Returned inside a [`ResolveResult`](crate::operations::resolve::ResolveResult)
/// rather than as an `Err`: the caller decides whether to keep the unresolved
/// ring, skip the stroke, or surface a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveFailure {
    #[error("ring has fewer than 4 points after closing")]
    RingTooSmall,

    #[error("planarization produced no edges")]
    NoEdges,

    #[error("face tracing produced no bounded faces")]
    NoFaces,

    #[error("no half-edge separates an inside face from an outside face")]
    NoBoundary,

    #[error("boundary edges did not chain into any closed cycle")]
    NoBoundaryCycles,

    #[error("best candidate area {best_area} is below the minimum {min_area}")]
    AreaTooSmall { best_area: f64, min_area: f64 },

    #[error("selected contour has fewer than 4 points")]
    InvalidResolved,
}

impl ResolveFailure {
    /// Stable reason code, suitable for logs and reports.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::RingTooSmall => "ringTooSmall",
            Self::NoEdges => "noEdges",
            Self::NoFaces => "noFaces",
            Self::NoBoundary => "noBoundary",
            Self::NoBoundaryCycles => "noBoundaryCycles",
            Self::AreaTooSmall { .. } => "areaTooSmall",
            Self::InvalidResolved => "invalidResolved",
        }
    }
}

/// Convenience type alias for results using [`CalligeoError`].
pub type Result<T> = std::result::Result<T, CalligeoError>;
