//! # TAI − UTC table
//!
//! Leap-second lookup following the IAU SOFA `dat` conventions. Before 1972 UTC was
//! steered with frequency offsets, so the first [`PRE_LEAP_SECOND_ENTRIES`] rows carry a
//! linear drift `(mjd_reference, seconds_per_day)` on top of the tabulated offset.
//!
//! The table is valid up to the announcement of the last row; dates later than
//! [`TABLE_RELEASE_YEAR`] + 5 are flagged as dubious (status `1`) but still return the
//! latest offset, and dates before 1960 are flagged as dubious with an offset of zero.

use crate::time::calendar::{cal2jd, KernelResult};

/// Release year of the table below.
pub const TABLE_RELEASE_YEAR: i32 = 2024;

/// Number of table rows that carry a pre-1972 drift term.
pub const PRE_LEAP_SECOND_ENTRIES: usize = 14;

/// `(year, month, TAI − UTC in seconds)` for each change of the offset.
const TAI_UTC_OFFSETS: [(i32, i32, f64); 42] = [
    (1960, 1, 1.417_818_0),
    (1961, 1, 1.422_818_0),
    (1961, 8, 1.372_818_0),
    (1962, 1, 1.845_858_0),
    (1963, 11, 1.945_858_0),
    (1964, 1, 3.240_130_0),
    (1964, 4, 3.340_130_0),
    (1964, 9, 3.440_130_0),
    (1965, 1, 3.540_130_0),
    (1965, 3, 3.640_130_0),
    (1965, 7, 3.740_130_0),
    (1965, 9, 3.840_130_0),
    (1966, 1, 4.313_170_0),
    (1968, 2, 4.213_170_0),
    (1972, 1, 10.0),
    (1972, 7, 11.0),
    (1973, 1, 12.0),
    (1974, 1, 13.0),
    (1975, 1, 14.0),
    (1976, 1, 15.0),
    (1977, 1, 16.0),
    (1978, 1, 17.0),
    (1979, 1, 18.0),
    (1980, 1, 19.0),
    (1981, 7, 20.0),
    (1982, 7, 21.0),
    (1983, 7, 22.0),
    (1985, 7, 23.0),
    (1988, 1, 24.0),
    (1990, 1, 25.0),
    (1991, 1, 26.0),
    (1992, 7, 27.0),
    (1993, 7, 28.0),
    (1994, 7, 29.0),
    (1996, 1, 30.0),
    (1997, 7, 31.0),
    (1999, 1, 32.0),
    (2006, 1, 33.0),
    (2009, 1, 34.0),
    (2012, 7, 35.0),
    (2015, 7, 36.0),
    (2017, 1, 37.0),
];

/// `(reference MJD, drift in seconds per day)` for the pre-1972 rows.
const UTC_DRIFT_CORRECTIONS: [(f64, f64); PRE_LEAP_SECOND_ENTRIES] = [
    (37300.0, 0.001_296_0),
    (37300.0, 0.001_296_0),
    (37300.0, 0.001_296_0),
    (37665.0, 0.001_123_2),
    (37665.0, 0.001_123_2),
    (38761.0, 0.001_296_0),
    (38761.0, 0.001_296_0),
    (38761.0, 0.001_296_0),
    (38761.0, 0.001_296_0),
    (38761.0, 0.001_296_0),
    (38761.0, 0.001_296_0),
    (38761.0, 0.001_296_0),
    (39126.0, 0.002_592_0),
    (39126.0, 0.002_592_0),
];

/// TAI − UTC for a UTC calendar date and fraction of day.
///
/// Arguments
/// ---------
/// * `iy`, `im`, `id`: UTC calendar date.
/// * `fd`: fraction of day, only used for the pre-1972 drift (must be in `[0, 1]`).
///
/// Return
/// ----------
/// * `(seconds, status)` with status `1` for a dubious year, or `Err` with `-1..=-3`
///   (bad calendar date) or `-4` (bad fraction).
pub fn dat(iy: i32, im: i32, id: i32, fd: f64) -> KernelResult<f64> {
    if !(0.0..=1.0).contains(&fd) {
        return Err(-4);
    }

    let ((_, djm), _) = cal2jd(iy, im, id)?;

    if iy < TAI_UTC_OFFSETS[0].0 {
        return Ok((0.0, 1));
    }
    let status = i32::from(iy > TABLE_RELEASE_YEAR + 5);

    // Last change not later than the requested month
    let m = 12 * iy + im;
    let idx = TAI_UTC_OFFSETS.partition_point(|&(year, month, _)| 12 * year + month <= m);
    let Some(i) = idx.checked_sub(1) else {
        return Err(-5);
    };

    let mut delta = TAI_UTC_OFFSETS[i].2;
    if i < PRE_LEAP_SECOND_ENTRIES {
        let (mjd_ref, rate) = UTC_DRIFT_CORRECTIONS[i];
        delta += (djm + fd - mjd_ref) * rate;
    }

    Ok((delta, status))
}
