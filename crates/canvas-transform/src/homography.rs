use glam::{DMat3, DVec2};

use crate::error::TransformError;
use crate::points::{point_to_cartesian, point_to_homogeneous};
use crate::EPSILON;

/// Returns the identity transform.
#[inline]
pub fn identity() -> DMat3 {
    DMat3::IDENTITY
}

/// Determinant of the top-left 2x2 block.
#[inline]
fn block_det(h: &DMat3) -> f64 {
    h.x_axis.x * h.y_axis.y - h.y_axis.x * h.x_axis.y
}

/// Checks whether the top-left 2x2 block of a transform is singular.
///
/// Independent of the `H[2,2]` normalization check in [`validate`].
#[inline]
pub fn is_singular(h: &DMat3) -> bool {
    block_det(h).abs() <= EPSILON
}

/// Validates a transform matrix, reporting the specific failure.
///
/// A transform is valid when its corner element `H[2,2]` equals 1 within
/// [`EPSILON`] and its top-left 2x2 block is non-singular. Every operation
/// consuming a matrix calls this first and fails before any computation.
pub fn validate(h: &DMat3) -> Result<(), TransformError> {
    let corner = h.z_axis.z;
    if (corner - 1.0).abs() > EPSILON {
        return Err(TransformError::NotNormalized { matrix: *h, corner });
    }
    let det = block_det(h);
    if det.abs() <= EPSILON {
        return Err(TransformError::Singular { matrix: *h, det });
    }
    Ok(())
}

/// Checks whether a transform matrix is valid. See [`validate`] for the rules.
#[inline]
pub fn is_valid(h: &DMat3) -> bool {
    validate(h).is_ok()
}

/// Builds a translation transform.
///
/// Identity with `h13 = offset.x` and `h23 = offset.y`.
pub fn translate(offset: DVec2) -> DMat3 {
    DMat3::from_cols_array(&[
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        offset.x, offset.y, 1.0, //
    ])
}

/// Builds a rotation transform about the coordinate origin.
///
/// The angle is in radians, counter-clockwise; the rotation block is
/// `[[cos, -sin], [sin, cos]]`.
pub fn rotate(angle: f64) -> DMat3 {
    let (sin, cos) = angle.sin_cos();
    DMat3::from_cols_array(&[
        cos, sin, 0.0, //
        -sin, cos, 0.0, //
        0.0, 0.0, 1.0, //
    ])
}

/// Builds a rotation transform about an arbitrary point.
///
/// The translation column is set to `origin - H * origin` so that `origin`
/// maps to itself.
pub fn rotate_about(angle: f64, origin: DVec2) -> DMat3 {
    let mut h = rotate(angle);
    let offset = origin - (h * point_to_homogeneous(origin)).truncate();
    h.z_axis.x = offset.x;
    h.z_axis.y = offset.y;
    h
}

/// Builds a scaling transform with independent X and Y factors,
/// `diag(sx, sy, 1)`.
pub fn scale(factors: DVec2) -> DMat3 {
    DMat3::from_cols_array(&[
        factors.x, 0.0, 0.0, //
        0.0, factors.y, 0.0, //
        0.0, 0.0, 1.0, //
    ])
}

/// Builds a uniform scaling transform.
#[inline]
pub fn scale_uniform(factor: f64) -> DMat3 {
    scale(DVec2::splat(factor))
}

/// Builds a shear transform of the given magnitude along the direction given
/// by `angle` (radians).
///
/// `angle = 0` is a pure X-shear, `h12 = factor`; other directions conjugate
/// that X-shear with a rotation by `angle`.
pub fn shear(factor: f64, angle: f64) -> DMat3 {
    let shear_x = DMat3::from_cols_array(&[
        1.0, 0.0, 0.0, //
        factor, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
    ]);
    if angle == 0.0 {
        return shear_x;
    }
    rotate(angle) * shear_x * rotate(-angle)
}

/// Builds a perspective transform, identity with bottom row
/// `h31 = values.x`, `h32 = values.y`.
pub fn perspective(values: DVec2) -> DMat3 {
    DMat3::from_cols_array(&[
        1.0, 0.0, values.x, //
        0.0, 1.0, values.y, //
        0.0, 0.0, 1.0, //
    ])
}

/// Renormalizes a transform to proper homogeneous form, `H[2,2] = 1`.
fn renormalize(h: DMat3) -> Result<DMat3, TransformError> {
    let corner = h.z_axis.z;
    if corner.abs() <= EPSILON {
        return Err(TransformError::DegenerateProjection { w: corner });
    }
    Ok(h * (1.0 / corner))
}

/// Chains a sequence of transforms into one.
///
/// The convention is right-to-left function composition, matching
/// matrix-times-column-vector math: `chain(&[a, b, c])` returns `a * b * c`,
/// meaning `c` is applied to a point first, then `b`, then `a`. The stateful
/// [`Transform`](crate::transform::Transform) handle delegates to this
/// function and uses the same convention.
///
/// Every operand is validated first; the first invalid one fails the whole
/// chain with [`TransformError::InvalidChainOperand`] reporting its position.
/// The result is renormalized so `H[2,2] = 1`. With no operands the result is
/// the identity.
pub fn chain(matrices: &[DMat3]) -> Result<DMat3, TransformError> {
    let mut h = DMat3::IDENTITY;
    for (index, q) in matrices.iter().enumerate() {
        validate(q).map_err(|source| TransformError::InvalidChainOperand {
            index,
            source: Box::new(source),
        })?;
        h *= *q;
    }
    renormalize(h)
}

/// Inverts a transform matrix, renormalized so `H_inv[2,2] = 1`.
///
/// The affine case (bottom row `(0, 0, 1)`) uses the closed-form 2x2 block
/// inverse; a nonzero perspective row requires the full 3x3 inverse.
pub fn invert(h: &DMat3) -> Result<DMat3, TransformError> {
    validate(h)?;

    let affine = h.x_axis.z.abs() <= EPSILON && h.y_axis.z.abs() <= EPSILON;
    let inv = if affine {
        // L_inv = adj(L) / det(L), t_inv = -L_inv * t
        let inv_det = 1.0 / block_det(h);
        let ia = h.y_axis.y * inv_det;
        let ib = -h.x_axis.y * inv_det;
        let ic = -h.y_axis.x * inv_det;
        let id = h.x_axis.x * inv_det;
        let itx = -(ia * h.z_axis.x + ic * h.z_axis.y);
        let ity = -(ib * h.z_axis.x + id * h.z_axis.y);
        DMat3::from_cols_array(&[
            ia, ib, 0.0, //
            ic, id, 0.0, //
            itx, ity, 1.0, //
        ])
    } else {
        let det = h.determinant();
        if det.abs() <= EPSILON {
            return Err(TransformError::Singular {
                matrix: *h,
                det,
            });
        }
        h.inverse()
    };

    renormalize(inv)
}

#[inline]
fn project(h: &DMat3, point: DVec2) -> Result<DVec2, TransformError> {
    point_to_cartesian(*h * point_to_homogeneous(point))
}

/// Applies a transform to a single Cartesian point.
///
/// Fails with [`TransformError::DegenerateProjection`] when the point maps to
/// the line at infinity.
pub fn transform_point(h: &DMat3, point: DVec2) -> Result<DVec2, TransformError> {
    validate(h)?;
    project(h, point)
}

/// Applies a transform to a sequence of Cartesian points.
///
/// The matrix is validated once; the first degenerate projection fails the
/// whole batch.
pub fn warp_points(h: &DMat3, points: &[DVec2]) -> Result<Vec<DVec2>, TransformError> {
    validate(h)?;
    points.iter().map(|&point| project(h, point)).collect()
}
