pub mod fit;
pub mod resolve;

pub use fit::{Centerline, FitCurves, FitOptions, FitReport, FitResult, FitStrokeOutline};
pub use resolve::{ResolveOptions, ResolveResult, ResolveSelfOverlap, SelectionPolicy};
