pub mod cubic;
pub mod ring;

pub use cubic::CubicBezier;
pub use ring::{close_ring, open_ring, sanitize_ring, SanitizedRing};
