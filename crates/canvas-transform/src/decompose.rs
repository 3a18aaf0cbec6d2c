use glam::{DMat3, DVec2};
use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::homography::{chain, perspective, rotate, scale, shear, translate, validate};
use crate::EPSILON;

/// Elementary parameters extracted from a valid 3x3 homogeneous transform.
///
/// Produced by [`decompose`]; [`Decomposition::recompose`] rebuilds the
/// original matrix from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    /// Translation, `(h13, h23)`.
    pub offset: DVec2,
    /// X and Y scale factors. A reflection surfaces as a negative X scale
    /// (never as an extra half-turn rotation); see [`decompose`].
    pub scale: DVec2,
    /// Shear coupling between the normalized basis columns.
    pub shear: f64,
    /// Rotation angle in radians.
    pub angle: f64,
    /// Perspective row, `(h31, h32)`.
    pub perspective: DVec2,
}

impl Decomposition {
    /// Rebuilds the transform matrix from the elementary parameters.
    ///
    /// The canonical composition order is
    /// `translate * rotate * shear * scale * perspective` (scale applied to a
    /// point first, translation last) — the order the column-wise
    /// Gram-Schmidt factorization in [`decompose`] actually produces. For any
    /// matrix accepted by [`decompose`] this reproduces it within
    /// floating-point tolerance.
    pub fn recompose(&self) -> Result<DMat3, TransformError> {
        chain(&[
            translate(self.offset),
            rotate(self.angle),
            shear(self.shear, 0.0),
            scale(self.scale),
            perspective(self.perspective),
        ])
    }
}

/// Decomposes a valid transform into `(offset, scale, shear, angle,
/// perspective)`.
///
/// The translation and perspective terms are read directly off the matrix.
/// The remaining affine block is first corrected for projective coupling
/// (`a_ij = h_ij - h_i3 * h_3j`), then factored QR-style by Gram-Schmidt on
/// its columns: the X scale is the first column norm, the shear is the
/// residual coupling of the second column, the Y scale is what remains of it,
/// and the angle comes from the normalized first column.
///
/// Sign convention: when the normalized basis comes out left-handed, the first
/// column, the X scale and the shear are all negated, so a reflection is
/// always reported as a negative X scale paired with a proper rotation. The
/// final basis determinant must be 1 within [`EPSILON`], anything else is a
/// [`TransformError::DecompositionFailed`].
pub fn decompose(h: &DMat3) -> Result<Decomposition, TransformError> {
    validate(h)?;

    let offset = DVec2::new(h.z_axis.x, h.z_axis.y);
    let persp = DVec2::new(h.x_axis.z, h.y_axis.z);

    // Affine block with the projective coupling removed.
    let mut m11 = h.x_axis.x - offset.x * persp.x;
    let mut m12 = h.y_axis.x - offset.x * persp.y;
    let mut m21 = h.x_axis.y - offset.y * persp.x;
    let mut m22 = h.y_axis.y - offset.y * persp.y;

    // Gram-Schmidt on the columns: factor out X scale, shear, Y scale in turn.
    let mut scale_x = (m11 * m11 + m21 * m21).sqrt();
    if scale_x <= EPSILON {
        return Err(TransformError::DecompositionFailed {
            det: m11 * m22 - m12 * m21,
        });
    }
    m11 /= scale_x;
    m21 /= scale_x;

    let mut shear_factor = m11 * m12 + m21 * m22;
    m12 -= m11 * shear_factor;
    m22 -= m21 * shear_factor;

    let scale_y = (m12 * m12 + m22 * m22).sqrt();
    if scale_y <= EPSILON {
        return Err(TransformError::DecompositionFailed {
            det: m11 * m22 - m12 * m21,
        });
    }
    m12 /= scale_y;
    m22 /= scale_y;
    shear_factor /= scale_y;

    // Left-handed basis: fold the reflection into the X scale.
    if m11 * m22 < m21 * m12 {
        m11 = -m11;
        m21 = -m21;
        scale_x = -scale_x;
        shear_factor = -shear_factor;
    }

    let det = m11 * m22 - m12 * m21;
    if (det - 1.0).abs() > EPSILON {
        return Err(TransformError::DecompositionFailed { det });
    }

    let angle = m21.atan2(m11);

    Ok(Decomposition {
        offset,
        scale: DVec2::new(scale_x, scale_y),
        shear: shear_factor,
        angle,
        perspective: persp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homography::{identity, rotate_about, scale_uniform};
    use approx::assert_relative_eq;
    use rand::Rng;
    use std::f64::consts::FRAC_PI_3;

    const EPSILON: f64 = 1e-6;

    fn assert_mat_eq(a: &DMat3, b: &DMat3) {
        for col in 0..3 {
            for row in 0..3 {
                assert_relative_eq!(a.col(col)[row], b.col(col)[row], epsilon = EPSILON);
            }
        }
    }

    fn assert_roundtrip(h: &DMat3) {
        let d = decompose(h).unwrap();
        let rebuilt = d.recompose().unwrap();
        assert_mat_eq(h, &rebuilt);
    }

    #[test]
    fn test_decompose_identity() {
        let d = decompose(&identity()).unwrap();
        assert_eq!(d.offset, DVec2::ZERO);
        assert_eq!(d.scale, DVec2::ONE);
        assert_relative_eq!(d.shear, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.angle, 0.0, epsilon = EPSILON);
        assert_eq!(d.perspective, DVec2::ZERO);
    }

    #[test]
    fn test_decompose_translation() {
        let d = decompose(&translate(DVec2::new(5.0, -3.0))).unwrap();
        assert_relative_eq!(d.offset.x, 5.0, epsilon = EPSILON);
        assert_relative_eq!(d.offset.y, -3.0, epsilon = EPSILON);
        assert_relative_eq!(d.angle, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_rotation() {
        let d = decompose(&rotate(FRAC_PI_3)).unwrap();
        assert_relative_eq!(d.angle, FRAC_PI_3, epsilon = EPSILON);
        assert_relative_eq!(d.scale.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(d.scale.y, 1.0, epsilon = EPSILON);
        assert_relative_eq!(d.shear, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_scale() {
        // scale(2, 3) comes back exactly, nothing leaks into shear or angle
        let d = decompose(&scale(DVec2::new(2.0, 3.0))).unwrap();
        assert_relative_eq!(d.scale.x, 2.0, epsilon = EPSILON);
        assert_relative_eq!(d.scale.y, 3.0, epsilon = EPSILON);
        assert_relative_eq!(d.shear, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.angle, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.offset.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.offset.y, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_shear() {
        let d = decompose(&shear(0.5, 0.0)).unwrap();
        assert_relative_eq!(d.shear, 0.5, epsilon = EPSILON);
        assert_relative_eq!(d.scale.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(d.scale.y, 1.0, epsilon = EPSILON);
        assert_relative_eq!(d.angle, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_perspective() {
        let d = decompose(&perspective(DVec2::new(0.02, -0.01))).unwrap();
        assert_relative_eq!(d.perspective.x, 0.02, epsilon = EPSILON);
        assert_relative_eq!(d.perspective.y, -0.01, epsilon = EPSILON);
        assert_relative_eq!(d.scale.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(d.scale.y, 1.0, epsilon = EPSILON);
        assert_relative_eq!(d.angle, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_elementary_roundtrips() {
        assert_roundtrip(&translate(DVec2::new(-2.0, 7.5)));
        assert_roundtrip(&rotate(1.1));
        assert_roundtrip(&scale(DVec2::new(0.25, 4.0)));
        assert_roundtrip(&shear(-0.8, 0.0));
        assert_roundtrip(&perspective(DVec2::new(0.05, 0.03)));
    }

    #[test]
    fn test_composed_roundtrip() {
        let h = chain(&[
            rotate(0.6),
            scale(DVec2::new(2.0, 3.0)),
            translate(DVec2::new(1.0, -4.0)),
        ])
        .unwrap();
        assert_roundtrip(&h);

        // anisotropic scale applied after the rotation
        let h = chain(&[
            scale(DVec2::new(0.5, 2.0)),
            rotate(-1.3),
            translate(DVec2::new(-6.0, 2.0)),
        ])
        .unwrap();
        assert_roundtrip(&h);
    }

    #[test]
    fn test_perspective_roundtrip() {
        // nonzero perspective exercises the a_ij = h_ij - h_i3 * h_3j correction
        let h = chain(&[
            translate(DVec2::new(3.0, -1.0)),
            rotate(0.8),
            shear(0.2, 0.0),
            scale(DVec2::new(1.5, 0.7)),
            perspective(DVec2::new(0.04, -0.03)),
        ])
        .unwrap();
        assert_roundtrip(&h);
    }

    #[test]
    fn test_reflection_reported_as_negative_scale() {
        let d = decompose(&scale(DVec2::new(-2.0, 3.0))).unwrap();
        assert_relative_eq!(d.scale.x, -2.0, epsilon = EPSILON);
        assert_relative_eq!(d.scale.y, 3.0, epsilon = EPSILON);
        assert_relative_eq!(d.angle, 0.0, epsilon = EPSILON);
        assert_roundtrip(&scale(DVec2::new(-2.0, 3.0)));

        // reflection composed with a rotation still keeps the angle proper
        let h = chain(&[rotate(0.4), scale(DVec2::new(-1.0, 1.0))]).unwrap();
        let d = decompose(&h).unwrap();
        assert!(d.scale.x < 0.0);
        assert_relative_eq!(d.angle, 0.4, epsilon = EPSILON);
        assert_roundtrip(&h);
    }

    #[test]
    fn test_rotate_about_roundtrip() {
        assert_roundtrip(&rotate_about(0.9, DVec2::new(10.0, -5.0)));
    }

    #[test]
    fn test_random_roundtrips() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let h = chain(&[
                translate(DVec2::new(
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-10.0..10.0),
                )),
                rotate(rng.random_range(-3.0..3.0)),
                shear(rng.random_range(-1.0..1.0), 0.0),
                scale(DVec2::new(
                    rng.random_range(0.1..4.0),
                    rng.random_range(0.1..4.0),
                )),
                perspective(DVec2::new(
                    rng.random_range(-0.05..0.05),
                    rng.random_range(-0.05..0.05),
                )),
            ])
            .unwrap();
            assert_roundtrip(&h);
        }
    }

    #[test]
    fn test_decompose_rejects_invalid() {
        let singular = scale(DVec2::new(0.0, 1.0));
        assert!(matches!(
            decompose(&singular),
            Err(TransformError::Singular { .. })
        ));
    }

    #[test]
    fn test_recompose_of_uniform_zoom() {
        let d = decompose(&scale_uniform(1.1)).unwrap();
        assert_relative_eq!(d.scale.x, 1.1, epsilon = EPSILON);
        assert_relative_eq!(d.scale.y, 1.1, epsilon = EPSILON);
    }
}
