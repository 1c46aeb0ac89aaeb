use thiserror::Error;

/// Result type for centerline ingestion and tube building.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop the centerline → tube pipeline.
///
/// Malformed input rows and degenerate segments are recovered locally and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// A source could not be opened or read (or an output could not be written).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer than two usable points, so no centerline can be built.
    #[error("not enough points for a centerline: need at least 2, found {found}")]
    NotEnoughPoints { found: usize },

    /// Cross-section needs at least a triangle.
    #[error("tube cross-section needs at least 3 sides, got {0}")]
    TooFewSides(usize),

    /// A configured radius is negative or not finite.
    #[error("invalid tube radius: {0}")]
    InvalidRadius(f64),

    /// Per-vertex buffers handed to the mesh builder do not line up with the centerline.
    #[error("expected {expected} {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The mesh would hold more vertices than a `u32` index can address.
    #[error("tube mesh too large: {0} vertices")]
    MeshTooLarge(usize),
}
