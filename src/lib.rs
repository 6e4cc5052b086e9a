pub mod arrangement;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use diagnostics::{DiagnosticEvent, DiagnosticSink, EventLog, NullSink, TracingSink};
pub use error::{CalligeoError, ResolveFailure, Result};
pub use geometry::CubicBezier;
pub use operations::{
    Centerline, FitCurves, FitOptions, FitReport, FitResult, FitStrokeOutline, ResolveOptions,
    ResolveResult, ResolveSelfOverlap, SelectionPolicy,
};
