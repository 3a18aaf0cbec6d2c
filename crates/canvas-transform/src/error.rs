use glam::DMat3;

/// An error type for transform and point operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    /// Error when the corner element `H[2,2]` of a homogeneous matrix is not 1.
    #[error("transform is not normalized, H[2,2] = {corner} (expected 1): {matrix:?}")]
    NotNormalized {
        /// The offending matrix.
        matrix: DMat3,
        /// The corner element `H[2,2]`.
        corner: f64,
    },

    /// Error when a transform matrix is singular and cannot be inverted or decomposed.
    #[error("transform is singular, determinant = {det}: {matrix:?}")]
    Singular {
        /// The offending matrix.
        matrix: DMat3,
        /// The determinant that fell below the epsilon threshold.
        det: f64,
    },

    /// Error when one operand of a chain is an invalid transform.
    #[error("chain operand {index} is invalid")]
    InvalidChainOperand {
        /// Zero-based position of the failing operand.
        index: usize,
        /// The validation failure for that operand.
        #[source]
        source: Box<TransformError>,
    },

    /// Error when a point does not have 2 (Cartesian) or 3 (homogeneous) components,
    /// or a point sequence mixes the two.
    #[error("malformed point data with trailing dimension {dims} (expected 2 or 3)")]
    MalformedPoints {
        /// The trailing dimension found.
        dims: usize,
    },

    /// Error when a 3-component point is not properly homogeneous (`w` != 1).
    #[error("invalid homogeneous point with w = {w} (expected 1)")]
    InvalidHomogeneousPoint {
        /// The third component found.
        w: f64,
    },

    /// Error when a homogeneous to Cartesian conversion divides by a (near-)zero
    /// third component.
    #[error("degenerate projection, cannot divide by w = {w}")]
    DegenerateProjection {
        /// The third component found.
        w: f64,
    },

    /// Error when the post-factorization determinant check fails. Unreachable for
    /// valid input; reaching it means an upstream invariant was violated.
    #[error("decomposition produced an inconsistent basis, determinant = {det} (expected 1)")]
    DecompositionFailed {
        /// The determinant of the normalized 2x2 basis.
        det: f64,
    },
}
