//! # Timescale conversion kernel
//!
//! Two-part Julian Date conversions between UTC, TAI and TT, with the SOFA status
//! conventions ([`utctai`]: `1` dubious year, `-1` unacceptable date; [`taitt`]: always `0`).
//! The offsets are always applied to the part of smaller magnitude, so the split chosen by
//! the caller is preserved as far as possible.

use crate::constants::{DAYS_PER_JULIAN_CENTURY, J2000_JD, SECONDS_PER_DAY, TT_MINUS_TAI};
use crate::time::calendar::{cal2jd, jd2cal, KernelResult};
use crate::time::leap_seconds::dat;

/// Add `delta` days to the smaller-magnitude part of a two-part date.
fn shift_small_part(a: f64, b: f64, delta: f64) -> (f64, f64) {
    if a.abs() > b.abs() {
        (a, b + delta)
    } else {
        (a + delta, b)
    }
}

/// TAI to TT.
pub fn taitt(tai1: f64, tai2: f64) -> KernelResult<(f64, f64)> {
    Ok((shift_small_part(tai1, tai2, TT_MINUS_TAI / SECONDS_PER_DAY), 0))
}

/// TT to TAI.
pub fn tttai(tt1: f64, tt2: f64) -> KernelResult<(f64, f64)> {
    Ok((shift_small_part(tt1, tt2, -TT_MINUS_TAI / SECONDS_PER_DAY), 0))
}

/// UTC to TAI.
///
/// The UTC day fraction is stretched by the length of the current day (leap second and
/// pre-1972 drift) before the TAI − UTC offset at 0h is added.
///
/// Arguments
/// ---------
/// * `utc1`, `utc2`: UTC as a two-part quasi Julian Date.
///
/// Return
/// ----------
/// * `((tai1, tai2), status)`; `status` is `1` for a dubious year, `Err(-1)` on an
///   unacceptable date.
pub fn utctai(utc1: f64, utc2: f64) -> KernelResult<(f64, f64)> {
    let big1 = utc1.abs() >= utc2.abs();
    let (u1, u2) = if big1 { (utc1, utc2) } else { (utc2, utc1) };

    let ((iy, im, id, mut fd), _) = jd2cal(u1, u2)?;

    // TAI − UTC at 0h today, 12h today and 0h tomorrow
    let (dat0, _) = dat(iy, im, id, 0.0)?;
    let (dat12, _) = dat(iy, im, id, 0.5)?;
    let ((iyt, imt, idt, _), _) = jd2cal(u1 + 1.5, u2 - fd)?;
    let (dat24, status) = dat(iyt, imt, idt, 0.0)?;

    // Separate the drift from the leap second
    let dlod = 2.0 * (dat12 - dat0);
    let dleap = dat24 - (dat0 + dlod);

    // Remove the leap second and drift from the day fraction
    fd *= (SECONDS_PER_DAY + dleap) / SECONDS_PER_DAY;
    fd *= (SECONDS_PER_DAY + dlod) / SECONDS_PER_DAY;

    let ((z1, z2), _) = cal2jd(iy, im, id).map_err(|_| -1)?;
    let mut a2 = z1 - u1;
    a2 += z2;
    a2 += fd + dat0 / SECONDS_PER_DAY;

    let tai = if big1 { (u1, a2) } else { (a2, u1) };
    Ok((tai, status))
}

/// TDB − TT in seconds at a TT Julian Date.
///
/// Periodic series good to about 10 µs over a few centuries around J2000; the Einstein
/// term dominates with an amplitude of 1.66 ms.
pub fn tdb_minus_tt(jd_tt: f64) -> f64 {
    let t = (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY;

    0.001657 * (628.3076 * t + 6.2401).sin()
        + 0.000022 * (575.3385 * t + 4.2970).sin()
        + 0.000014 * (1256.6152 * t + 6.1969).sin()
        + 0.000005 * (606.9777 * t + 4.0212).sin()
        + 0.000005 * (52.9691 * t + 0.4444).sin()
        + 0.000002 * (21.3299 * t + 5.5431).sin()
        + 0.000010 * t * (628.3076 * t + 4.2490).sin()
}

#[cfg(test)]
mod conversions_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_taitt() {
        let ((tt1, tt2), status) = taitt(2453750.5, 0.892482639).unwrap();
        assert_eq!(status, 0);
        assert_eq!(tt1, 2453750.5);
        assert_relative_eq!(tt2, 0.892855139, epsilon = 1e-12);

        let ((back1, back2), _) = tttai(tt1, tt2).unwrap();
        assert_eq!(back1, 2453750.5);
        assert_relative_eq!(back2, 0.892482639, epsilon = 1e-12);
    }

    #[test]
    fn test_utctai() {
        let ((tai1, tai2), status) = utctai(2453750.5, 0.892100694).unwrap();
        assert_eq!(status, 0);
        assert_eq!(tai1, 2453750.5);
        assert_relative_eq!(tai2, 0.8924826384444444444, epsilon = 1e-12);
    }

    #[test]
    fn test_utctai_dubious() {
        // Before 1960 there is no tabulated offset
        let (_, status) = utctai(2400000.5, 15000.0).unwrap();
        assert_eq!(status, 1);
        assert_eq!(utctai(-1e10, 0.0), Err(-1));
    }

    #[test]
    fn test_tdb_minus_tt() {
        for k in 0..100 {
            let dt = tdb_minus_tt(J2000_JD + 36.5 * k as f64);
            assert!(dt.abs() < 0.0018);
        }
    }
}
