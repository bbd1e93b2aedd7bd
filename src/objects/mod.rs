//! # Celestial objects
//!
//! Objects whose place on the sky can be computed:
//!
//! * [`SiderealObject`]: a catalog star with proper motion, parallax and radial velocity;
//! * [`EphemerisObject`]: the Sun, the Moon or a planet, driven by the ephemeris of a
//!   [`Skytime`] handle;
//! * [`CelestialObject`]: either of them.
//!
//! All three implement [`CelestialPlace`], which provides the astrometric, topocentric and
//! horizon places. Positions are in radians; times are anything implementing [`TtDate`]
//! (a [`Time`](crate::time::Time), converted to TT, or a raw TT Julian Date).
//!
//! ## Places
//!
//! * **astrometric**: geocentric, ICRS axes, with proper motion, parallax and light time;
//! * **topocentric**: seen from a site on the Earth, true equator and equinox of date, with
//!   light deflection and aberration added;
//! * **horizon**: the topocentric place turned into azimuth (from north through east) and
//!   elevation, with optional refraction.
//!
//! ```rust
//! use skytime::objects::{CelestialPlace, EphemerisObject, HorizonOptions};
//! use skytime::observers::{EarthObserver, Observer};
//! use skytime::skytime::Skytime;
//! use skytime::time::{Time, Timescale};
//!
//! let skytime = Skytime::default();
//! let sun = EphemerisObject::new("sun")?;
//! let noon = Time::from_calendar(2000, 1, 1, 12, 0, 0.0, Timescale::UTC, false)?;
//!
//! let site = Observer::from(EarthObserver::new(51.4769f64.to_radians(), 0.0, 46.0)?);
//! let (azimuth, elevation) = sun.horizon_position(&skytime, &noon, &site, &HorizonOptions::default())?;
//! assert!(elevation > 0.0 && azimuth > 2.0);
//! # Ok::<(), skytime::skytime_errors::SkytimeError>(())
//! ```

pub mod ephemeris_object;
pub mod sidereal;

use serde::{Deserialize, Serialize};

pub use ephemeris_object::EphemerisObject;
pub use sidereal::SiderealObject;

use crate::constants::{
    ArcSec, AstronomicalUnit, Radian, Second, RADEG, RADH, SECONDS_PER_DAY,
};
use crate::ephemeris::Ephemeris;
use crate::observers::Observer;
use crate::place::horizon::equ2hor;
use crate::place::{Accuracy, OnSurface, Place, Refraction};
use crate::skytime::Skytime;
use crate::skytime_errors::SkytimeError;
use crate::time::calendar::KernelResult;
use crate::time::{checked, TtDate};

/// A place on the sky, radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPlace {
    pub ra: Radian,
    pub dec: Radian,
    /// Distance from the observer, AU.
    pub distance: AstronomicalUnit,
}

impl From<Place> for SkyPlace {
    fn from(place: Place) -> Self {
        SkyPlace {
            ra: place.ra * RADH,
            dec: place.dec * RADEG,
            distance: place.distance,
        }
    }
}

/// Horizon coordinates, radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonCoordinates {
    /// Azimuth, north through east, in `[0, 2π)`.
    pub azimuth: Radian,
    /// Elevation above the horizon, refracted when requested.
    pub elevation: Radian,
    /// Topocentric right ascension, refracted when requested.
    pub ra: Radian,
    /// Topocentric declination, refracted when requested.
    pub dec: Radian,
}

/// Options of the horizon transformation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HorizonOptions {
    /// TT − UT1, seconds.
    pub delta_t: Second,
    /// Polar motion, arcseconds.
    pub xp: ArcSec,
    pub yp: ArcSec,
    pub refraction: Refraction,
    pub accuracy: Accuracy,
}

/// Places of an object on the sky.
///
/// Implementors provide the two kernel-backed places; the `(ra, dec)` / `(az, el)`
/// shorthands and the horizon transformation come for free.
pub trait CelestialPlace {
    /// Geocentric astrometric place, ICRS axes, with the distance.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::ExternalLibrary`] when the ephemeris cannot be opened or the place
    ///   kernel fails, or any error of converting `time` to TT.
    fn astrometric_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        accuracy: Accuracy,
    ) -> Result<SkyPlace, SkytimeError>;

    /// Topocentric place, true equator and equinox of date, with the distance.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::InvalidArgument`] when `observer` is not on the Earth, before any
    ///   other work.
    /// * As [`CelestialPlace::astrometric_place`].
    fn topocentric_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        observer: &Observer,
        delta_t: Second,
        accuracy: Accuracy,
    ) -> Result<SkyPlace, SkytimeError>;

    /// Astrometric `(ra, dec)`, radians.
    fn astrometric_position(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        accuracy: Accuracy,
    ) -> Result<(Radian, Radian), SkytimeError> {
        let place = self.astrometric_place(skytime, time, accuracy)?;
        Ok((place.ra, place.dec))
    }

    /// Topocentric `(ra, dec)`, radians.
    fn topocentric_position(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        observer: &Observer,
        delta_t: Second,
        accuracy: Accuracy,
    ) -> Result<(Radian, Radian), SkytimeError> {
        let place = self.topocentric_place(skytime, time, observer, delta_t, accuracy)?;
        Ok((place.ra, place.dec))
    }

    /// Horizon coordinates, with the refracted equatorial place.
    ///
    /// UT1 is derived from TT and `options.delta_t`.
    fn horizon_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        observer: &Observer,
        options: &HorizonOptions,
    ) -> Result<HorizonCoordinates, SkytimeError> {
        let site = observer.earth_site()?;
        let (jd1, jd2) = time.tt_date()?;

        let topo =
            self.topocentric_place(skytime, (jd1, jd2), observer, options.delta_t, options.accuracy)?;

        let jd_ut1 = (jd1 + jd2) - options.delta_t / SECONDS_PER_DAY;
        let horizon = equ2hor(
            jd_ut1,
            options.delta_t,
            options.accuracy,
            options.xp,
            options.yp,
            &site.to_on_surface(),
            topo.ra / RADH,
            topo.dec / RADEG,
            options.refraction,
        );

        Ok(HorizonCoordinates {
            azimuth: horizon.az * RADEG,
            elevation: (90.0 - horizon.zd) * RADEG,
            ra: horizon.rar * RADH,
            dec: horizon.decr * RADEG,
        })
    }

    /// `(azimuth, elevation)`, radians.
    fn horizon_position(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        observer: &Observer,
        options: &HorizonOptions,
    ) -> Result<(Radian, Radian), SkytimeError> {
        let place = self.horizon_place(skytime, time, observer, options)?;
        Ok((place.azimuth, place.elevation))
    }
}

/// Run a place kernel on the opened ephemeris and check its status.
pub(crate) fn run_place_kernel(
    function: &'static str,
    skytime: &Skytime,
    kernel: impl FnOnce(&Ephemeris) -> KernelResult<Place>,
) -> Result<SkyPlace, SkytimeError> {
    let ephemeris = skytime.get_ephemeris()?;
    checked(function, kernel(ephemeris), false).map(SkyPlace::from)
}

/// The kernel site of a topocentric observer, or the observer error.
pub(crate) fn surface_of(observer: &Observer) -> Result<OnSurface, SkytimeError> {
    observer.earth_site().map(|site| site.to_on_surface())
}

/// A star or a solar-system body.
#[derive(Debug, Clone, PartialEq)]
pub enum CelestialObject {
    Sidereal(SiderealObject),
    Ephemeris(EphemerisObject),
}

impl CelestialObject {
    pub fn describe(&self) -> String {
        match self {
            CelestialObject::Sidereal(object) => object.describe(),
            CelestialObject::Ephemeris(object) => object.describe(),
        }
    }
}

impl From<SiderealObject> for CelestialObject {
    fn from(object: SiderealObject) -> Self {
        CelestialObject::Sidereal(object)
    }
}

impl From<EphemerisObject> for CelestialObject {
    fn from(object: EphemerisObject) -> Self {
        CelestialObject::Ephemeris(object)
    }
}

impl CelestialPlace for CelestialObject {
    fn astrometric_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        accuracy: Accuracy,
    ) -> Result<SkyPlace, SkytimeError> {
        match self {
            CelestialObject::Sidereal(object) => object.astrometric_place(skytime, time, accuracy),
            CelestialObject::Ephemeris(object) => object.astrometric_place(skytime, time, accuracy),
        }
    }

    fn topocentric_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        observer: &Observer,
        delta_t: Second,
        accuracy: Accuracy,
    ) -> Result<SkyPlace, SkytimeError> {
        match self {
            CelestialObject::Sidereal(object) => {
                object.topocentric_place(skytime, time, observer, delta_t, accuracy)
            }
            CelestialObject::Ephemeris(object) => {
                object.topocentric_place(skytime, time, observer, delta_t, accuracy)
            }
        }
    }
}
