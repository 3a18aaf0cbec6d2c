#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Canvas Transform
//!
//! Two layers, the second built on the first:
//!
//! - a matrix-algebra layer of pure functions over 3x3 homogeneous matrices
//!   ([`homography`], [`points`], [`decompose`]): validity checks, elementary
//!   constructors, composition, inversion, point warping and QR-style
//!   decomposition;
//! - a stateful handle ([`transform::Transform`]) wrapping one matrix with
//!   in-place mutators and cached decomposition accessors, delegating all its
//!   semantics to the layer beneath.
//!
//! Composition is right-to-left: `chain(&[a, b])` applies `b` to a point
//! first. All matrices are `glam::DMat3`, column-major, normalized so the
//! corner element `H[2,2]` is 1.
//!
//! ## Example
//!
//! ```rust
//! use canvas_transform::homography::{chain, rotate, scale_uniform, translate};
//! use canvas_transform::decompose::decompose;
//! use glam::DVec2;
//!
//! let h = chain(&[
//!     translate(DVec2::new(3.0, -1.0)),
//!     rotate(std::f64::consts::FRAC_PI_4),
//!     scale_uniform(2.0),
//! ])?;
//!
//! let parts = decompose(&h)?;
//! assert!((parts.angle - std::f64::consts::FRAC_PI_4).abs() < 1e-6);
//! # Ok::<(), canvas_transform::TransformError>(())
//! ```

/// Decomposition of a homography into elementary transform parameters.
pub mod decompose;

/// Error types for transform and point operations.
pub mod error;

/// Matrix-algebra layer: validity, elementary constructors, composition,
/// inversion and point warping.
pub mod homography;

/// Cartesian and homogeneous point representations and conversions.
pub mod points;

/// Stateful transform handle built on the matrix-algebra layer.
pub mod transform;

pub use decompose::Decomposition;
pub use error::TransformError;
pub use transform::Transform;

/// Numerical tolerance shared by the validity, singularity, projection and
/// decomposition checks.
pub const EPSILON: f64 = 1e-6;
