//! Greenwich sidereal time.

use crate::constants::{Radian, DAYS_PER_JULIAN_CENTURY, DPI, MJD, SECONDS_PER_DAY, T2000};
use crate::earth_orientation::equequ;
use crate::place::Accuracy;

/// Greenwich Mean Sidereal Time (IAU 1982) in radians, in `[0, 2π)`.
///
/// The cubic polynomial gives GMST at 0h UT1; the fraction of day is then scaled by the
/// ratio of sidereal to solar day.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date in UT1.
pub fn gmst(tjm: MJD) -> Radian {
    // GMST at 0h UT1, seconds
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // sidereal / solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / DAYS_PER_JULIAN_CENTURY;

    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / SECONDS_PER_DAY;

    let h = (tjm - itjm) * DPI;
    let gmst = gmst0 + h * RAP;

    gmst - (gmst / DPI).floor() * DPI
}

/// Greenwich Apparent Sidereal Time in radians, in `[0, 2π)`.
///
/// Arguments
/// ---------
/// * `ut1_mjd`: Modified Julian Date in UT1 (Earth rotation angle).
/// * `tt_mjd`: the same instant in TT (nutation).
/// * `accuracy`: nutation model used for the equation of the equinoxes.
pub fn gast(ut1_mjd: MJD, tt_mjd: MJD, accuracy: Accuracy) -> Radian {
    let gast = gmst(ut1_mjd) + equequ(tt_mjd, accuracy);
    gast.rem_euclid(DPI)
}

#[cfg(test)]
mod sidereal_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gmst() {
        assert_relative_eq!(gmst(57028.478514610404), 4.851925725092499, epsilon = 1e-12);
        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_gast_close_to_gmst() {
        for tjm in [T2000, 55000.25, 60000.75] {
            let diff = gast(tjm, tjm, Accuracy::Full) - gmst(tjm);
            // equation of the equinoxes stays below about 1.2 s of time
            let diff = (diff + std::f64::consts::PI).rem_euclid(DPI) - std::f64::consts::PI;
            assert!(diff.abs() < 1e-4);
        }
    }
}
