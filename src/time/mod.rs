//! # High-precision time
//!
//! This module defines [`Time`], an instant stored as a two-part Julian Date together with
//! the [`Timescale`] it is measured in, and the conversion graph between timescales.
//!
//! ## Representation
//!
//! `jd1 + jd2` is the Julian Date in the declared timescale. The split exists purely for
//! precision: callers may choose any split, e.g. [`Time::from_jd`] puts everything into
//! `jd1` while [`Time::from_mjd`] uses `jd1 = 2400000.5` and the MJD as `jd2`. A single
//! `f64` Julian Date resolves about 20 µs; the two-part form keeps sub-microsecond
//! precision.
//!
//! ## Conversion graph
//!
//! ```text
//!   UTC ──utctai──▶ TAI ──taitt──▶ TT ┄┄(tt_ok)┄┄▶ "TDB"
//!                                        TDB ──▶ TDB
//! ```
//!
//! * [`Time::as_tt`] supports TT (identity), TAI and UTC. Every other source fails with
//!   [`SkytimeError::UnsupportedTimescale`].
//! * [`Time::as_tdb`] is the identity on TDB. Otherwise, and only when the caller accepts
//!   TT as an approximation of TDB (errors ≈ 2 ms), it returns the TT time **still tagged
//!   TT**, so that callers can tell a true TDB from the approximation.
//!
//! ## UTC caveats
//!
//! UTC JDs follow the SOFA convention: on a day ending with a leap second the day fraction
//! runs at a different rate. Precise arithmetic should avoid UTC; it is safely interchanged
//! only in broken-down calendar form, where a leap second reads `23:59:60.x`.
//!
//! ## Example
//!
//! ```rust
//! use skytime::time::{Time, Timescale};
//!
//! let t = Time::from_calendar(2000, 1, 1, 12, 0, 0.0, Timescale::TT, false).unwrap();
//! assert_eq!(t.as_jd(), 2451545.0);
//! assert_eq!(t.format(3, false).unwrap(), "2000/01/01 12:00:00.000");
//! ```

pub mod barycentric;
pub mod calendar;
pub mod conversions;
pub mod leap_seconds;
pub mod sidereal;

use std::fmt;
use std::str::FromStr;

use hifitime::{Epoch, TimeScale};
use serde::{Deserialize, Serialize};

use crate::constants::{JDTOMJD, POSIX_EPOCH_JD, SECONDS_PER_DAY};
use crate::skytime_errors::{check_status, SkytimeError};
use calendar::KernelResult;

/// Named timescales recognised by [`Time`].
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timescale {
    TAI,
    UTC,
    UT1,
    TT,
    TCG,
    TCB,
    TDB,
}

impl Timescale {
    /// All recognised timescales.
    pub const ALL: [Timescale; 7] = [
        Timescale::TAI,
        Timescale::UTC,
        Timescale::UT1,
        Timescale::TT,
        Timescale::TCG,
        Timescale::TCB,
        Timescale::TDB,
    ];

    /// Validate a timescale name.
    ///
    /// Arguments
    /// ---------
    /// * `name`: one of `TAI`, `UTC`, `UT1`, `TT`, `TCG`, `TCB`, `TDB` (case sensitive).
    ///
    /// Return
    /// ----------
    /// * The matching [`Timescale`], or [`SkytimeError::InvalidTimescale`].
    pub fn validate(name: &str) -> Result<Self, SkytimeError> {
        name.parse()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Timescale::TAI => "TAI",
            Timescale::UTC => "UTC",
            Timescale::UT1 => "UT1",
            Timescale::TT => "TT",
            Timescale::TCG => "TCG",
            Timescale::TCB => "TCB",
            Timescale::TDB => "TDB",
        }
    }
}

impl FromStr for Timescale {
    type Err = SkytimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timescale::ALL
            .into_iter()
            .find(|scale| scale.name() == s)
            .ok_or_else(|| SkytimeError::InvalidTimescale(s.to_string()))
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unwrap a kernel result, checking its status.
pub(crate) fn checked<T>(
    function: &'static str,
    result: KernelResult<T>,
    dubious_ok: bool,
) -> Result<T, SkytimeError> {
    match result {
        Ok((value, status)) => {
            check_status(function, status, dubious_ok)?;
            Ok(value)
        }
        Err(status) => Err(SkytimeError::kernel(function, status)),
    }
}

/// A precisely measured instant and its timescale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Time {
    jd1: f64,
    jd2: f64,
    timescale: Timescale,
}

impl Time {
    /// Build a time from an arbitrary two-part Julian Date.
    pub fn new(jd1: f64, jd2: f64, timescale: Timescale) -> Self {
        Time {
            jd1,
            jd2,
            timescale,
        }
    }

    /// The current time from the system clock, in UTC.
    ///
    /// The clock reports POSIX time, which is ambiguous around leap seconds: on a leap-second
    /// day the result is only good to about one second. Otherwise precision is limited by
    /// the system clock itself.
    pub fn now() -> Self {
        let posix = match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        };
        Time::from_posix(posix)
    }

    /// A POSIX timestamp, in UTC.
    ///
    /// Carries the same leap-second ambiguity as [`Time::now`].
    pub fn from_posix(timestamp: f64) -> Self {
        Time::new(POSIX_EPOCH_JD, timestamp / SECONDS_PER_DAY, Timescale::UTC)
    }

    /// A single-number Julian Date (`jd1 = jd`, `jd2 = 0`).
    pub fn from_jd(jd: f64, timescale: Timescale) -> Self {
        Time::new(jd, 0.0, timescale)
    }

    /// A Modified Julian Date (`jd1 = 2400000.5`, `jd2 = mjd`).
    pub fn from_mjd(mjd: f64, timescale: Timescale) -> Self {
        Time::new(JDTOMJD, mjd, timescale)
    }

    /// A proleptic Gregorian calendar date and time of day.
    ///
    /// The algorithm ignores the historical adoption of the Gregorian calendar and is valid
    /// back to −4799 January 1. For UTC, `second` may reach 60.999… on a day ending with a
    /// leap second.
    ///
    /// Arguments
    /// ---------
    /// * `year`, `month` (1–12), `day` (1–31), `hour` (0–23), `minute` (0–59), `second`.
    /// * `timescale`: timescale of the fields.
    /// * `dubious_ok`: accept years outside the leap-second table (UTC only).
    ///
    /// Return
    /// ----------
    /// * The time, or [`SkytimeError::ExternalLibrary`] from `dtf2d`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_calendar(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: f64,
        timescale: Timescale,
        dubious_ok: bool,
    ) -> Result<Self, SkytimeError> {
        let (jd1, jd2) = checked(
            "dtf2d",
            calendar::dtf2d(timescale, year, month, day, hour, minute, second),
            dubious_ok,
        )?;
        Ok(Time::new(jd1, jd2, timescale))
    }

    /// A calendar date plus a fraction of day.
    ///
    /// The date is converted at 0h and `fday` is then added to `jd2` as is: its range is not
    /// checked, and for UTC it inherits the usual leap-second pitfalls of JD arithmetic.
    pub fn from_fractional_day_calendar(
        year: i32,
        month: i32,
        day: i32,
        fday: f64,
        timescale: Timescale,
        dubious_ok: bool,
    ) -> Result<Self, SkytimeError> {
        let mut time = Time::from_calendar(year, month, day, 0, 0, 0.0, timescale, dubious_ok)?;
        time.jd2 += fday;
        Ok(time)
    }

    /// A Julian epoch (years of exactly 365.25 days), always in TT.
    pub fn from_julian_epoch(julian_epoch: f64) -> Self {
        let (jd1, jd2) = calendar::epj2jd(julian_epoch);
        Time::new(jd1, jd2, Timescale::TT)
    }

    /// Convert a [`hifitime::Epoch`] into a time in `timescale`.
    ///
    /// Only TAI, UTC, TT and TDB have a hifitime counterpart.
    pub fn from_epoch(epoch: Epoch, timescale: Timescale) -> Result<Self, SkytimeError> {
        let mjd = match timescale {
            Timescale::TAI => epoch.to_mjd_tai_days(),
            Timescale::UTC => epoch.to_mjd_utc_days(),
            Timescale::TT => epoch.to_mjd_tt_days(),
            Timescale::TDB => epoch.to_jde_tdb_days() - JDTOMJD,
            other => return Err(SkytimeError::UnsupportedTimescale(other)),
        };
        Ok(Time::from_mjd(mjd, timescale))
    }

    /// Convert into a [`hifitime::Epoch`].
    pub fn to_epoch(&self) -> Result<Epoch, SkytimeError> {
        let scale = match self.timescale {
            Timescale::TAI => TimeScale::TAI,
            Timescale::UTC => TimeScale::UTC,
            Timescale::TT => TimeScale::TT,
            Timescale::TDB => TimeScale::TDB,
            other => return Err(SkytimeError::UnsupportedTimescale(other)),
        };
        Ok(Epoch::from_mjd_in_time_scale(self.as_mjd(), scale))
    }

    pub fn jd1(&self) -> f64 {
        self.jd1
    }

    pub fn jd2(&self) -> f64 {
        self.jd2
    }

    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    /// The time as a single Julian Date (precision about 20 µs).
    pub fn as_jd(&self) -> f64 {
        self.jd1 + self.jd2
    }

    /// The time as a Modified Julian Date.
    ///
    /// Slightly more precise than [`Time::as_jd`] when `jd1` holds the MJD epoch.
    pub fn as_mjd(&self) -> f64 {
        (self.jd1 - JDTOMJD) + self.jd2
    }

    /// The same instant in TT.
    ///
    /// Arguments
    /// ---------
    /// * `dubious_ok`: accept UTC dates outside the leap-second table.
    ///
    /// Return
    /// ----------
    /// * A copy if already TT, the converted time for TAI and UTC,
    ///   [`SkytimeError::UnsupportedTimescale`] otherwise.
    pub fn as_tt(&self, dubious_ok: bool) -> Result<Time, SkytimeError> {
        let (jd1, jd2) = match self.timescale {
            Timescale::TT => (self.jd1, self.jd2),
            Timescale::TAI => checked(
                "taitt",
                conversions::taitt(self.jd1, self.jd2),
                dubious_ok,
            )?,
            Timescale::UTC => {
                let (tai1, tai2) = checked(
                    "utctai",
                    conversions::utctai(self.jd1, self.jd2),
                    dubious_ok,
                )?;
                checked("taitt", conversions::taitt(tai1, tai2), dubious_ok)?
            }
            other => return Err(SkytimeError::UnsupportedTimescale(other)),
        };
        Ok(Time::new(jd1, jd2, Timescale::TT))
    }

    /// The same instant in TDB, or in TT when the caller accepts it.
    ///
    /// With `tt_ok`, a non-TDB time is converted with [`Time::as_tt`] and returned **tagged
    /// TT**: the ≈2 ms TT/TDB difference is ignored but never hidden.
    pub fn as_tdb(&self, tt_ok: bool) -> Result<Time, SkytimeError> {
        if self.timescale == Timescale::TDB {
            return Ok(*self);
        }
        if !tt_ok {
            return Err(SkytimeError::UnsupportedTimescale(self.timescale));
        }
        self.as_tt(false)
    }

    /// Gregorian calendar date and fraction of day.
    ///
    /// Return
    /// ----------
    /// * `(year, month, day, day_fraction)`, or [`SkytimeError::ExternalLibrary`] from
    ///   `jd2cal` for an unacceptable date.
    pub fn to_calendar(&self) -> Result<(i32, i32, i32, f64), SkytimeError> {
        checked("jd2cal", calendar::jd2cal(self.jd1, self.jd2), false)
    }

    /// Format as `YYYY/MM/DD HH:MM:SS[.fff…]`.
    ///
    /// Arguments
    /// ---------
    /// * `precision`: decimal places of the seconds, from −3 to 9. Values below 1 omit the
    ///   decimal point; negative values round to tens of seconds, minutes or tens of
    ///   minutes while keeping the full field layout.
    /// * `dubious_ok`: accept UTC dates outside the leap-second table.
    ///
    /// Rounding carries through the calendar fields, so `23:59:59.9999` at precision 3 reads
    /// as the next day at `00:00:00.000`.
    pub fn format(&self, precision: i32, dubious_ok: bool) -> Result<String, SkytimeError> {
        if !(-3..=9).contains(&precision) {
            return Err(SkytimeError::InvalidArgument(format!(
                "calendar precision must be between -3 and 9, got {precision}"
            )));
        }

        let fields = checked(
            "d2dtf",
            calendar::d2dtf(self.timescale, precision, self.jd1, self.jd2),
            dubious_ok,
        )?;

        let mut out = format!(
            "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
            fields.year, fields.month, fields.day, fields.hour, fields.minute, fields.second
        );
        if precision > 0 {
            out.push_str(&format!(
                ".{:0width$}",
                fields.fraction,
                width = precision as usize
            ));
        }
        Ok(out)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format(0, true) {
            Ok(calendar) => write!(f, "{calendar} {}", self.timescale),
            Err(_) => write!(f, "JD {:.6} {}", self.as_jd(), self.timescale),
        }
    }
}

/// The current time from the system clock; see [`Time::now`].
pub fn now() -> Time {
    Time::now()
}

/// Something that designates an instant in TT.
///
/// Position computations accept either a raw TT Julian Date (`f64`) or a [`Time`], which is
/// converted with [`Time::as_tt`] (without accepting dubious years).
pub trait TtDate {
    /// The instant as a two-part TT Julian Date.
    fn tt_date(&self) -> Result<(f64, f64), SkytimeError>;
}

impl TtDate for f64 {
    fn tt_date(&self) -> Result<(f64, f64), SkytimeError> {
        Ok((*self, 0.0))
    }
}

impl TtDate for Time {
    fn tt_date(&self) -> Result<(f64, f64), SkytimeError> {
        let tt = self.as_tt(false)?;
        Ok((tt.jd1, tt.jd2))
    }
}

/// A two-part TT Julian Date.
impl TtDate for (f64, f64) {
    fn tt_date(&self) -> Result<(f64, f64), SkytimeError> {
        Ok(*self)
    }
}

impl<T: TtDate + ?Sized> TtDate for &T {
    fn tt_date(&self) -> Result<(f64, f64), SkytimeError> {
        (**self).tt_date()
    }
}
