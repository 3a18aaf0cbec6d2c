use glam::{DVec2, DVec3};

use crate::error::TransformError;
use crate::EPSILON;

/// Converts a Cartesian point to homogeneous coordinates by appending `w = 1`.
#[inline]
pub fn point_to_homogeneous(point: DVec2) -> DVec3 {
    point.extend(1.0)
}

/// Converts a homogeneous point to Cartesian coordinates by dividing by `w`
/// and dropping it.
///
/// Fails with [`TransformError::DegenerateProjection`] when `|w|` is within
/// [`EPSILON`] of zero.
#[inline]
pub fn point_to_cartesian(point: DVec3) -> Result<DVec2, TransformError> {
    if point.z.abs() <= EPSILON {
        return Err(TransformError::DegenerateProjection { w: point.z });
    }
    Ok(point.truncate() / point.z)
}

/// Classifies a single point row as homogeneous (3 components) or Cartesian
/// (2 components).
///
/// The check is strict: a 3-component point whose third component is not 1
/// (within [`EPSILON`]) is rejected with
/// [`TransformError::InvalidHomogeneousPoint`]. Any other length is
/// [`TransformError::MalformedPoints`].
pub fn is_homogeneous(point: &[f64]) -> Result<bool, TransformError> {
    match point.len() {
        2 => Ok(false),
        3 => {
            let w = point[2];
            if (w - 1.0).abs() > EPSILON {
                return Err(TransformError::InvalidHomogeneousPoint { w });
            }
            Ok(true)
        }
        dims => Err(TransformError::MalformedPoints { dims }),
    }
}

/// Classifies a point sequence with the same rule as [`is_homogeneous`].
///
/// Every row must agree with the first one; a dimensionality mismatch between
/// rows is [`TransformError::MalformedPoints`]. An empty sequence classifies
/// as Cartesian.
pub fn are_homogeneous<P: AsRef<[f64]>>(points: &[P]) -> Result<bool, TransformError> {
    let Some(first) = points.first() else {
        return Ok(false);
    };
    let homogeneous = is_homogeneous(first.as_ref())?;
    for point in &points[1..] {
        if is_homogeneous(point.as_ref())? != homogeneous {
            return Err(TransformError::MalformedPoints {
                dims: point.as_ref().len(),
            });
        }
    }
    Ok(homogeneous)
}

/// Ensures a point sequence is homogeneous, appending `w = 1` to Cartesian
/// rows and passing 3-component rows through untouched.
pub fn to_homogeneous<P: AsRef<[f64]>>(points: &[P]) -> Result<Vec<DVec3>, TransformError> {
    points
        .iter()
        .map(|point| match point.as_ref() {
            &[x, y] => Ok(DVec3::new(x, y, 1.0)),
            &[x, y, w] => Ok(DVec3::new(x, y, w)),
            row => Err(TransformError::MalformedPoints { dims: row.len() }),
        })
        .collect()
}

/// Ensures a point sequence is Cartesian, dividing homogeneous rows by their
/// third component and passing 2-component rows through untouched.
///
/// Fails with [`TransformError::DegenerateProjection`] on a (near-)zero third
/// component.
pub fn to_cartesian<P: AsRef<[f64]>>(points: &[P]) -> Result<Vec<DVec2>, TransformError> {
    points
        .iter()
        .map(|point| match point.as_ref() {
            &[x, y] => Ok(DVec2::new(x, y)),
            &[x, y, w] => point_to_cartesian(DVec3::new(x, y, w)),
            row => Err(TransformError::MalformedPoints { dims: row.len() }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_point_roundtrip() {
        let p = DVec2::new(3.5, -2.0);
        let h = point_to_homogeneous(p);
        assert_eq!(h, DVec3::new(3.5, -2.0, 1.0));

        let back = point_to_cartesian(h).unwrap();
        assert_relative_eq!(back.x, p.x, epsilon = EPSILON);
        assert_relative_eq!(back.y, p.y, epsilon = EPSILON);
    }

    #[test]
    fn test_point_to_cartesian_divides_by_w() {
        let c = point_to_cartesian(DVec3::new(4.0, 6.0, 2.0)).unwrap();
        assert_relative_eq!(c.x, 2.0, epsilon = EPSILON);
        assert_relative_eq!(c.y, 3.0, epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_projection() {
        let result = point_to_cartesian(DVec3::new(1.0, 1.0, 0.0));
        assert!(matches!(
            result,
            Err(TransformError::DegenerateProjection { .. })
        ));

        // near-zero w is just as degenerate
        let result = point_to_cartesian(DVec3::new(1.0, 1.0, 1e-9));
        assert!(matches!(
            result,
            Err(TransformError::DegenerateProjection { .. })
        ));
    }

    #[test]
    fn test_is_homogeneous() {
        assert!(!is_homogeneous(&[1.0, 2.0]).unwrap());
        assert!(is_homogeneous(&[1.0, 2.0, 1.0]).unwrap());

        assert!(matches!(
            is_homogeneous(&[1.0, 2.0, 0.5]),
            Err(TransformError::InvalidHomogeneousPoint { .. })
        ));
        assert!(matches!(
            is_homogeneous(&[1.0]),
            Err(TransformError::MalformedPoints { dims: 1 })
        ));
        assert!(matches!(
            is_homogeneous(&[1.0, 2.0, 1.0, 1.0]),
            Err(TransformError::MalformedPoints { dims: 4 })
        ));
    }

    #[test]
    fn test_are_homogeneous() {
        let cart = [[0.0, 0.0], [1.0, 2.0]];
        assert!(!are_homogeneous(&cart).unwrap());

        let homog = [[0.0, 0.0, 1.0], [1.0, 2.0, 1.0]];
        assert!(are_homogeneous(&homog).unwrap());

        let empty: [[f64; 2]; 0] = [];
        assert!(!are_homogeneous(&empty).unwrap());

        // ragged sequences are malformed
        let ragged: [&[f64]; 2] = [&[0.0, 0.0], &[1.0, 2.0, 1.0]];
        assert!(matches!(
            are_homogeneous(&ragged),
            Err(TransformError::MalformedPoints { dims: 3 })
        ));
    }

    #[test]
    fn test_to_homogeneous_idempotent() {
        let points = [[1.0, 2.0], [-3.0, 0.5]];
        let once = to_homogeneous(&points).unwrap();
        assert_eq!(once, vec![DVec3::new(1.0, 2.0, 1.0), DVec3::new(-3.0, 0.5, 1.0)]);

        let rows: Vec<[f64; 3]> = once.iter().map(|p| p.to_array()).collect();
        let twice = to_homogeneous(&rows).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_to_cartesian_idempotent() {
        let points = [[2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
        let once = to_cartesian(&points).unwrap();
        assert_eq!(once, vec![DVec2::new(1.0, 2.0), DVec2::new(1.0, 2.0)]);

        let rows: Vec<[f64; 2]> = once.iter().map(|p| p.to_array()).collect();
        let twice = to_cartesian(&rows).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_to_cartesian_degenerate_row() {
        let points = [[1.0, 2.0, 1.0], [1.0, 2.0, 0.0]];
        assert!(matches!(
            to_cartesian(&points),
            Err(TransformError::DegenerateProjection { .. })
        ));
    }
}
