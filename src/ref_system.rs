//! Elementary frame rotations and spherical ↔ Cartesian conversions.
//!
//! All rotation matrices in the crate are **passive**: `rotmt(α, axis) · x` expresses the
//! fixed vector `x` in a frame rotated by `+α` about `axis`. Chained frame changes therefore
//! read right to left, e.g. `N · P · B · x_gcrs` for bias, then precession, then nutation.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Degree, Hour, Radian, DPI, RADEG, RADH};

/// Coordinate axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Passive rotation matrix of angle `alpha` about `axis`.
///
/// For `Axis::X` this is
///
/// ```text
/// | 1     0      0    |
/// | 0   cos α  sin α  |
/// | 0  -sin α  cos α  |
/// ```
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `axis`: rotation axis.
///
/// Return
/// ----------
/// * The 3×3 orthonormal matrix changing coordinates into the rotated frame.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    // rotating the frame by +alpha is rotating the vector by -alpha
    Rotation3::from_axis_angle(&axis, -alpha).into_inner()
}

/// Convert a 3D Cartesian position vector to right ascension and declination.
///
/// Arguments
/// ---------
/// * `cartesian_position`: position vector in an equatorial frame, any length unit.
///
/// Returns
/// --------
/// * `(α, δ, ρ)`: right ascension in `[0, 2π)`, declination in `[−π/2, π/2]` (radians) and
///   the norm of the vector. A null vector yields `(0, 0, 0)`; a vector along the pole
///   yields `α = 0`.
pub(crate) fn cartesian_to_radec(cartesian_position: Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).asin();

    let cos_delta = delta.cos();
    if cos_delta == 0.0 {
        return (0.0, delta, pos_norm);
    }

    let cos_alpha = cartesian_position.x / (pos_norm * cos_delta);
    let sin_alpha = cartesian_position.y / (pos_norm * cos_delta);
    let alpha = sin_alpha.atan2(cos_alpha);
    let alpha = if alpha < 0.0 { alpha + DPI } else { alpha };
    (alpha, delta, pos_norm)
}

/// Unit vector `(cos δ cos α, cos δ sin α, sin δ)` pointing at `(α, δ)` radians.
pub(crate) fn radec_to_unit(ra: Radian, dec: Radian) -> Vector3<f64> {
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ra, cos_ra) = ra.sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Cartesian vector to `(ra hours, dec degrees)`, the unit pair used at the place kernel
/// boundary.
pub(crate) fn vector_to_hour_deg(position: Vector3<f64>) -> (Hour, Degree) {
    let (ra, dec, _) = cartesian_to_radec(position);
    (ra / RADH, dec / RADEG)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_matrix_eq(a: &Matrix3<f64>, b: &Matrix3<f64>, tol: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a[(i, j)], b[(i, j)], epsilon = tol);
            }
        }
    }

    #[test]
    fn test_rotmt_equatorial_to_ecliptic() {
        let eps = 0.40909280422232897;
        let reference = Matrix3::new(
            1.0,
            0.0,
            0.0,
            0.0,
            0.9174820620691818,
            0.3977771559319137,
            0.0,
            -0.3977771559319137,
            0.9174820620691818,
        );
        assert_matrix_eq(&rotmt(eps, Axis::X), &reference, 1e-15);
    }

    #[test]
    fn test_rotmt_passive_z() {
        // a frame turned by 90° about z sees the old x axis along -y
        let r = rotmt(std::f64::consts::FRAC_PI_2, Axis::Z);
        let v = r * Vector3::x();
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(v.y, -1.0, epsilon = 1e-15);

        let r = rotmt(0.3, Axis::Y);
        assert_matrix_eq(&(r * r.transpose()), &Matrix3::identity(), 1e-15);
    }

    #[test]
    fn test_cartesian_to_radec() {
        let (ra, dec, norm) = cartesian_to_radec(Vector3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(ra, std::f64::consts::FRAC_PI_2);
        assert_eq!(dec, 0.0);
        assert_eq!(norm, 2.0);

        let (ra, _, _) = cartesian_to_radec(Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(ra, 1.5 * std::f64::consts::PI);

        assert_eq!(cartesian_to_radec(Vector3::zeros()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_radec_round_trip() {
        let (ra, dec) = (4.2, -0.7);
        let (ra2, dec2, norm) = cartesian_to_radec(radec_to_unit(ra, dec));
        assert_relative_eq!(ra2, ra, epsilon = 1e-14);
        assert_relative_eq!(dec2, dec, epsilon = 1e-14);
        assert_relative_eq!(norm, 1.0, epsilon = 1e-15);

        let (h, d) = vector_to_hour_deg(radec_to_unit(std::f64::consts::PI, RADEG * 45.0));
        assert_relative_eq!(h, 12.0, epsilon = 1e-12);
        assert_relative_eq!(d, 45.0, epsilon = 1e-12);
    }
}
