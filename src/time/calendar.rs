//! # Calendar ↔ Julian Date kernel
//!
//! Proleptic Gregorian calendar conversions on two-part Julian Dates, with the
//! status-code conventions of the IAU SOFA library:
//!
//! | routine  | statuses |
//! |----------|----------|
//! | [`cal2jd`] | `-1` bad year, `-2` bad month, `-3` bad day |
//! | [`jd2cal`] | `-1` unacceptable date |
//! | [`dtf2d`]  | `3` dubious year and time beyond end of day, `2` time beyond end of day, `1` dubious year, `-1..=-3` as [`cal2jd`], `-4` bad hour, `-5` bad minute, `-6` bad second |
//! | [`d2dtf`]  | `1` dubious year, `-1` unacceptable date |
//!
//! Every routine returns a [`KernelResult`]: `Ok((value, status))` when a value could be
//! produced (the status is `0` or a positive warning), `Err(status)` otherwise.
//!
//! For UTC, calendar days containing a leap second are 86401 s long (or 86399 s for a
//! negative one); a UTC time on such a day is expressed in the JD with the day fraction
//! scaled accordingly.

use crate::constants::{DAYS_PER_JULIAN_YEAR, JDTOMJD, SECONDS_PER_DAY, T2000};
use crate::time::leap_seconds::dat;
use crate::time::Timescale;

/// Value computed by a kernel routine and its status code.
///
/// `Ok((value, status))` carries a value and a non-fatal status (`0` for success, positive
/// for a warning); `Err(status)` carries a fatal status.
pub type KernelResult<T> = Result<(T, i32), i32>;

/// Earliest year accepted by the calendar routines.
const IYMIN: i32 = -4799;

/// Days per month of a common year.
const MONTH_LENGTHS: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar fields produced by [`d2dtf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    /// Fraction of a second, as an integer scaled by `10^ndp`.
    pub fraction: i64,
}

/// Round to the nearest whole number, halves away from zero.
pub(crate) fn dnint(a: f64) -> f64 {
    if a.abs() < 0.5 {
        0.0
    } else if a < 0.0 {
        (a - 0.5).ceil()
    } else {
        (a + 0.5).floor()
    }
}

fn is_gregorian_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Gregorian calendar date to a two-part Modified Julian Date at 0h.
///
/// Arguments
/// ---------
/// * `iy`, `im`, `id`: year, month, day (proleptic Gregorian).
///
/// Return
/// ----------
/// * `((2400000.5, mjd), 0)` on success.
pub fn cal2jd(iy: i32, im: i32, id: i32) -> KernelResult<(f64, f64)> {
    if iy < IYMIN {
        return Err(-1);
    }
    if !(1..=12).contains(&im) {
        return Err(-2);
    }

    let leap = i32::from(im == 2 && is_gregorian_leap_year(iy));
    if id < 1 || id > MONTH_LENGTHS[(im - 1) as usize] + leap {
        return Err(-3);
    }

    let (iy, im, id) = (iy as i64, im as i64, id as i64);
    let my = (im - 14) / 12;
    let iypmy = iy + my;
    let djm = (1461 * (iypmy + 4800)) / 4 + (367 * (im - 2 - 12 * my)) / 12
        - (3 * ((iypmy + 4900) / 100)) / 4
        + id
        - 2_432_076;

    Ok(((JDTOMJD, djm as f64), 0))
}

/// Two-part Julian Date to Gregorian year, month, day and fraction of day.
///
/// The day fraction is computed with compensated summation so that a split such as
/// `(2451544.5, 0.5)` yields exactly `0.5`.
///
/// Arguments
/// ---------
/// * `dj1`, `dj2`: the two Julian Date parts, in any split.
///
/// Return
/// ----------
/// * `((year, month, day, fraction), 0)`, or `Err(-1)` when `dj1 + dj2` falls outside
///   `[-68569.5, 1e9]`.
pub fn jd2cal(dj1: f64, dj2: f64) -> KernelResult<(i32, i32, i32, f64)> {
    const DJMIN: f64 = -68569.5;
    const DJMAX: f64 = 1e9;

    let dj = dj1 + dj2;
    if !(DJMIN..=DJMAX).contains(&dj) {
        return Err(-1);
    }

    // Separate day and fraction, -0.5 <= fraction < 0.5
    let d = dnint(dj1);
    let f1 = dj1 - d;
    let mut jd = d as i64;
    let d = dnint(dj2);
    let f2 = dj2 - d;
    jd += d as i64;

    // f1 + f2 + 0.5 with Klein compensated summation
    let mut s = 0.5;
    let mut cs = 0.0;
    for x in [f1, f2] {
        let t = s + x;
        cs += if f64::abs(s) >= f64::abs(x) {
            (s - t) + x
        } else {
            (x - t) + s
        };
        s = t;
        if s >= 1.0 {
            jd += 1;
            s -= 1.0;
        }
    }
    let mut f = s + cs;
    cs = f - s;

    if f < 0.0 {
        f = s + 1.0;
        cs += (1.0 - f) + s;
        s = f;
        f = s + cs;
        cs = f - s;
        jd -= 1;
    }

    if (f - 1.0) >= -f64::EPSILON / 4.0 {
        let t = s - 1.0;
        cs += (s - t) - 1.0;
        s = t;
        f = s + cs;
        if -f64::EPSILON / 2.0 < f {
            jd += 1;
            f = f.max(0.0);
        }
    }

    // Day number to Gregorian calendar
    let mut l = jd + 68569;
    let n = (4 * l) / 146_097;
    l -= (146_097 * n + 3) / 4;
    let i = (4000 * (l + 1)) / 1_461_001;
    l -= (1461 * i) / 4 - 31;
    let k = (80 * l) / 2447;
    let id = (l - (2447 * k) / 80) as i32;
    let l = k / 11;
    let im = (k + 2 - 12 * l) as i32;
    let iy = (100 * (n - 49) + i + l) as i32;

    Ok(((iy, im, id, f), 0))
}

/// Leap-second change at the end of a UTC day.
///
/// `(noon1, noon2)` is any split of a Julian Date falling on the following day. Returns
/// `(dleap, status)` where `dleap` is the jump of TAI−UTC across the end of the day,
/// corrected for the pre-1972 drift.
fn utc_day_leap(iy: i32, im: i32, id: i32, noon1: f64, noon2: f64) -> KernelResult<f64> {
    let (dat0, _) = dat(iy, im, id, 0.0)?;
    let (dat12, _) = dat(iy, im, id, 0.5)?;
    let ((iy2, im2, id2, _), _) = jd2cal(noon1, noon2)?;
    let (dat24, status) = dat(iy2, im2, id2, 0.0)?;
    Ok((dat24 - (2.0 * dat12 - dat0), status))
}

/// Calendar date and time of day to a two-part Julian Date.
///
/// For UTC the day length accounts for a leap second at its end, and `23:59:60.x` is a
/// legal time on such a day.
///
/// Arguments
/// ---------
/// * `scale`: the timescale of the fields.
/// * `iy`, `im`, `id`: year, month, day.
/// * `ihr`, `imn`: hour and minute.
/// * `sec`: seconds, including the fraction.
///
/// Return
/// ----------
/// * `((d1, d2), status)`: `d1` is the 0h Julian Date, `d2` the day fraction.
#[allow(clippy::too_many_arguments)]
pub fn dtf2d(
    scale: Timescale,
    iy: i32,
    im: i32,
    id: i32,
    ihr: i32,
    imn: i32,
    sec: f64,
) -> KernelResult<(f64, f64)> {
    let ((djm0, djm), _) = cal2jd(iy, im, id)?;
    let dj = djm0 + djm;

    let mut day = SECONDS_PER_DAY;
    let mut seclim = 60.0;
    let mut status = 0;

    if scale == Timescale::UTC {
        let (dleap, js) = utc_day_leap(iy, im, id, dj, 1.5)?;
        status = js;
        day += dleap;
        if ihr == 23 && imn == 59 {
            seclim += dleap;
        }
    }

    if !(0..=23).contains(&ihr) {
        return Err(-4);
    }
    if !(0..=59).contains(&imn) {
        return Err(-5);
    }
    if sec < 0.0 {
        return Err(-6);
    }
    if sec >= seclim {
        status += 2;
    }

    let time = (60.0 * f64::from(60 * ihr + imn) + sec) / day;
    Ok(((dj, time), status))
}

/// Day fraction to hours, minutes, seconds and fraction, rounded to `ndp` decimal places.
///
/// Negative `ndp` rounds to tens of seconds (`-1`), minutes (`-2`), tens of minutes (`-3`)
/// and so on. The returned hour may be 24 after rounding.
pub fn d2tf(ndp: i32, days: f64) -> (i32, i32, i32, i64) {
    let mut a = SECONDS_PER_DAY * days.abs();

    if ndp < 0 {
        let nrs: i64 = (1..=-ndp)
            .map(|n| if n == 2 || n == 4 { 6 } else { 10 })
            .product();
        let rs = nrs as f64;
        a = rs * dnint(a / rs);
    }

    let nrs: i64 = (0..ndp.max(0)).map(|_| 10).product();
    let rs = nrs as f64;
    let rm = rs * 60.0;
    let rh = rm * 60.0;

    a = dnint(rs * a);

    let ah = (a / rh).trunc();
    a -= ah * rh;
    let am = (a / rm).trunc();
    a -= am * rm;
    let asec = (a / rs).trunc();
    let af = a - asec * rs;

    (ah as i32, am as i32, asec as i32, af as i64)
}

/// Two-part Julian Date to calendar fields rounded to `ndp` decimal places of seconds.
///
/// Rounding carries into the minutes, hours and calendar date. On a UTC day ending with a
/// leap second, the last second is reported as `23:59:60`.
///
/// Arguments
/// ---------
/// * `scale`: timescale of the date.
/// * `ndp`: number of decimal places of seconds.
/// * `d1`, `d2`: the two Julian Date parts.
///
/// Return
/// ----------
/// * `(fields, status)`; failures are reported as `Err(-1)`.
pub fn d2dtf(scale: Timescale, ndp: i32, d1: f64, d2: f64) -> KernelResult<CalendarFields> {
    let ((mut iy1, mut im1, mut id1, fd0), _) = jd2cal(d1, d2).map_err(|_| -1)?;
    let mut fd = fd0;

    let mut leap = false;
    let mut status = 0;

    if scale == Timescale::UTC {
        let (dleap, js) = utc_day_leap(iy1, im1, id1, d1 + 1.5, d2 - fd0).map_err(|_| -1)?;
        status = js;
        leap = dleap.abs() > 0.5;
        if leap {
            fd += fd * dleap / SECONDS_PER_DAY;
        }
    }

    let (mut hour, mut minute, mut second, mut fraction) = d2tf(ndp, fd);

    if hour > 23 {
        let ((iy2, im2, id2, _), _) = jd2cal(d1 + 1.5, d2 - fd0).map_err(|_| -1)?;

        if !leap || second > 0 {
            iy1 = iy2;
            im1 = im2;
            id1 = id2;
            hour = 0;
            minute = 0;
            second = 0;
            fraction = 0;
        } else {
            hour = 23;
            minute = 59;
            second = 60;
        }
    }

    Ok((
        CalendarFields {
            year: iy1,
            month: im1,
            day: id1,
            hour,
            minute,
            second,
            fraction,
        },
        status,
    ))
}

/// Julian epoch to a two-part Julian Date (TT).
///
/// Return
/// ----------
/// * `(2400000.5, mjd)`; the routine cannot fail.
pub fn epj2jd(epj: f64) -> (f64, f64) {
    (JDTOMJD, T2000 + (epj - 2000.0) * DAYS_PER_JULIAN_YEAR)
}

#[cfg(test)]
mod calendar_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cal2jd() {
        assert_eq!(cal2jd(2003, 6, 1), Ok(((2400000.5, 52791.0), 0)));
        assert_eq!(cal2jd(2000, 1, 1), Ok(((2400000.5, 51544.0), 0)));
        assert_eq!(cal2jd(-4800, 1, 1), Err(-1));
        assert_eq!(cal2jd(2000, 13, 1), Err(-2));
        assert_eq!(cal2jd(2001, 2, 29), Err(-3));
        assert!(cal2jd(2000, 2, 29).is_ok());
        assert_eq!(cal2jd(1900, 2, 29), Err(-3));
    }

    #[test]
    fn test_jd2cal() {
        let ((iy, im, id, fd), status) = jd2cal(2400000.5, 50123.9999).unwrap();
        assert_eq!((iy, im, id, status), (1996, 2, 10, 0));
        assert_relative_eq!(fd, 0.9999, epsilon = 1e-7);

        let ((iy, im, id, fd), _) = jd2cal(2451544.5, 0.5).unwrap();
        assert_eq!((iy, im, id), (2000, 1, 1));
        assert_eq!(fd, 0.5);

        assert_eq!(jd2cal(-1e10, 0.0), Err(-1));
    }

    #[test]
    fn test_dtf2d_tt() {
        let ((d1, d2), status) = dtf2d(Timescale::TT, 1994, 6, 30, 23, 59, 60.13599).unwrap();
        assert_eq!(status, 2);
        assert_eq!(d1, 2449533.5);
        assert_relative_eq!(d2, 86400.13599 / 86400.0, epsilon = 1e-12);

        let ((d1, d2), status) = dtf2d(Timescale::TT, 2000, 1, 1, 12, 0, 0.0).unwrap();
        assert_eq!((d1, d2, status), (2451544.5, 0.5, 0));

        assert_eq!(dtf2d(Timescale::TT, 2000, 1, 1, 24, 0, 0.0), Err(-4));
        assert_eq!(dtf2d(Timescale::TT, 2000, 1, 1, 0, 60, 0.0), Err(-5));
        assert_eq!(dtf2d(Timescale::TT, 2000, 1, 1, 0, 0, -1.0), Err(-6));
    }

    #[test]
    fn test_dtf2d_utc_leap_second() {
        // 1994 June 30 ends with a leap second: 23:59:60.13599 is legal
        let ((d1, d2), status) =
            dtf2d(Timescale::UTC, 1994, 6, 30, 23, 59, 60.13599).unwrap();
        assert_eq!(status, 0);
        assert_relative_eq!(d1 + d2, 2449534.49999, epsilon = 1e-6);
    }

    #[test]
    fn test_d2tf() {
        assert_eq!(d2tf(4, -0.987654321), (23, 42, 13, 3333));
        assert_eq!(d2tf(0, 0.5), (12, 0, 0, 0));
        assert_eq!(d2tf(-2, 0.5 + 40.0 / 86400.0), (12, 1, 0, 0));
    }

    #[test]
    fn test_d2dtf() {
        let (fields, status) = d2dtf(Timescale::UTC, 5, 2400000.5, 49533.99999).unwrap();
        assert_eq!(status, 0);
        assert_eq!(
            fields,
            CalendarFields {
                year: 1994,
                month: 6,
                day: 30,
                hour: 23,
                minute: 59,
                second: 60,
                fraction: 13599,
            }
        );

        // rounding carries into the next day
        let (fields, _) = d2dtf(Timescale::TT, 0, 2451544.5, 1.0 - 1e-7).unwrap();
        assert_eq!(
            (fields.year, fields.month, fields.day, fields.hour),
            (2000, 1, 2, 0)
        );
    }

    #[test]
    fn test_epj2jd() {
        let (d1, d2) = epj2jd(1996.8);
        assert_eq!(d1, 2400000.5);
        assert_relative_eq!(d2, 50375.7, epsilon = 1e-9);
    }
}
