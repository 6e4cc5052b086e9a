use super::Point2;

/// Quantized coordinate pair used to merge near-coincident points.
///
/// Two points within epsilon of each other usually share a key, but may land
/// on different keys when they straddle a quantization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapKey {
    pub x: i64,
    pub y: i64,
}

impl SnapKey {
    /// Quantizes `p` onto the `eps` grid, rounding half up.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(p: &Point2, eps: f64) -> Self {
        let inv = 1.0 / eps;
        Self {
            x: (p.x * inv + 0.5).floor() as i64,
            y: (p.y * inv + 0.5).floor() as i64,
        }
    }
}
