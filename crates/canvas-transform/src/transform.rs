use std::cell::Cell;

use glam::{DMat3, DVec2};

use crate::decompose::{decompose, Decomposition};
use crate::error::TransformError;
use crate::homography;

/// A stateful 2D transform handle wrapping one homogeneous 3x3 matrix.
///
/// The handle keeps its matrix valid at all times: construction validates, and
/// every mutation goes through [`homography::chain`], so the composition
/// ordering convention is the same as for the free functions — applying a new
/// elementary transform post-multiplies, meaning it acts on points first, in
/// the current local coordinate frame (the HTML5-canvas convention).
///
/// Decomposition parameters are computed lazily and cached; the cache is
/// dropped by every mutator, never served stale. The handle is a plain value
/// type: `clone()` yields an independent copy with no shared storage. It is
/// not thread-safe; confine it to one owner.
#[derive(Debug, Clone)]
pub struct Transform {
    h: DMat3,
    decomposition: Cell<Option<Decomposition>>,
}

impl Transform {
    /// Creates a new handle at the identity transform.
    pub fn new() -> Self {
        Self {
            h: DMat3::IDENTITY,
            decomposition: Cell::new(None),
        }
    }

    /// Creates a handle from an existing matrix, validating it first.
    pub fn from_matrix(h: DMat3) -> Result<Self, TransformError> {
        homography::validate(&h)?;
        Ok(Self {
            h,
            decomposition: Cell::new(None),
        })
    }

    /// Creates a handle from the six flattened affine components
    /// `[m11, m12, m21, m22, m13, m23]`, the layout the HTML5 canvas
    /// `setTransform()` API takes.
    pub fn from_values(values: [f64; 6]) -> Result<Self, TransformError> {
        let [m11, m12, m21, m22, m13, m23] = values;
        Self::from_matrix(DMat3::from_cols_array(&[
            m11, m21, 0.0, //
            m12, m22, 0.0, //
            m13, m23, 1.0, //
        ]))
    }

    /// Returns the six flattened affine components
    /// `[m11, m12, m21, m22, m13, m23]`.
    ///
    /// The flat form has no slot for the perspective row; a projective
    /// transform loses its bottom row here.
    pub fn values(&self) -> [f64; 6] {
        [
            self.h.x_axis.x,
            self.h.y_axis.x,
            self.h.x_axis.y,
            self.h.y_axis.y,
            self.h.z_axis.x,
            self.h.z_axis.y,
        ]
    }

    /// Returns the current matrix.
    #[inline]
    pub fn matrix(&self) -> DMat3 {
        self.h
    }

    /// Replaces the current matrix, validating the new one first.
    pub fn set_matrix(&mut self, h: DMat3) -> Result<(), TransformError> {
        homography::validate(&h)?;
        self.h = h;
        self.invalidate();
        Ok(())
    }

    /// Resets the handle to the identity transform.
    pub fn reset(&mut self) {
        self.h = DMat3::IDENTITY;
        self.invalidate();
    }

    /// Returns a new handle composed with `other`, leaving the receiver
    /// untouched.
    ///
    /// Follows the chain convention: `other` is applied to a point before
    /// `self`.
    pub fn compose(&self, other: &Transform) -> Result<Transform, TransformError> {
        Ok(Self {
            h: homography::chain(&[self.h, other.h])?,
            decomposition: Cell::new(None),
        })
    }

    /// Applies a transform matrix to the handle in place (post-multiply).
    pub fn apply(&mut self, q: &DMat3) -> Result<(), TransformError> {
        self.h = homography::chain(&[self.h, *q])?;
        self.invalidate();
        Ok(())
    }

    /// Applies a translation in place.
    pub fn translate(&mut self, offset: DVec2) -> Result<(), TransformError> {
        self.apply(&homography::translate(offset))
    }

    /// Applies a rotation about the local origin in place.
    pub fn rotate(&mut self, angle: f64) -> Result<(), TransformError> {
        self.apply(&homography::rotate(angle))
    }

    /// Applies a rotation about an arbitrary point in place.
    pub fn rotate_about(&mut self, angle: f64, origin: DVec2) -> Result<(), TransformError> {
        self.apply(&homography::rotate_about(angle, origin))
    }

    /// Applies X/Y scale factors in place.
    pub fn scale(&mut self, factors: DVec2) -> Result<(), TransformError> {
        self.apply(&homography::scale(factors))
    }

    /// Applies a uniform scale factor in place.
    pub fn scale_uniform(&mut self, factor: f64) -> Result<(), TransformError> {
        self.apply(&homography::scale_uniform(factor))
    }

    /// Applies a shear in place. See [`homography::shear`].
    pub fn shear(&mut self, factor: f64, angle: f64) -> Result<(), TransformError> {
        self.apply(&homography::shear(factor, angle))
    }

    /// Inverts the handle in place.
    pub fn invert(&mut self) -> Result<(), TransformError> {
        self.h = homography::invert(&self.h)?;
        self.invalidate();
        Ok(())
    }

    /// Returns the inverse as a new handle, leaving the receiver untouched.
    pub fn inverted(&self) -> Result<Transform, TransformError> {
        Ok(Self {
            h: homography::invert(&self.h)?,
            decomposition: Cell::new(None),
        })
    }

    /// Applies the current transform to a single Cartesian point.
    pub fn transform_point(&self, point: DVec2) -> Result<DVec2, TransformError> {
        homography::transform_point(&self.h, point)
    }

    /// Applies the current transform to a sequence of Cartesian points.
    pub fn warp_points(&self, points: &[DVec2]) -> Result<Vec<DVec2>, TransformError> {
        homography::warp_points(&self.h, points)
    }

    fn invalidate(&mut self) {
        self.decomposition.set(None);
    }

    /// Decomposition of the current matrix, computed on first access and
    /// cached until the next mutation.
    pub fn decomposition(&self) -> Result<Decomposition, TransformError> {
        if let Some(cached) = self.decomposition.get() {
            return Ok(cached);
        }
        let computed = decompose(&self.h)?;
        self.decomposition.set(Some(computed));
        Ok(computed)
    }

    /// Translation component of the current transform.
    pub fn offset(&self) -> Result<DVec2, TransformError> {
        Ok(self.decomposition()?.offset)
    }

    /// X/Y scale component of the current transform.
    pub fn scale_factor(&self) -> Result<DVec2, TransformError> {
        Ok(self.decomposition()?.scale)
    }

    /// Shear component of the current transform.
    pub fn shear_factor(&self) -> Result<f64, TransformError> {
        Ok(self.decomposition()?.shear)
    }

    /// Rotation angle of the current transform, in radians.
    pub fn angle(&self) -> Result<f64, TransformError> {
        Ok(self.decomposition()?.angle)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
