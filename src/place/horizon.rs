//! Equatorial to horizontal coordinates, with optional atmospheric refraction.

use nalgebra::Vector3;

use crate::constants::{ArcSec, Degree, Hour, JDTOMJD, RADEG, RADH, SECONDS_PER_DAY};
use crate::earth_orientation::polar_motion;
use crate::ref_system::{radec_to_unit, rotmt, Axis};
use crate::time::sidereal::gast;

use super::{Accuracy, OnSurface, Refraction};

/// Scale height of the atmosphere used to scale the standard pressure, meters.
const SCALE_HEIGHT: f64 = 9.1e3;

/// Zenith distance change below which the refraction iteration stops, degrees.
const REFRACTION_TOLERANCE: f64 = 3.0e-5;

/// Local horizon place of an equatorial direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonPlace {
    /// Zenith distance, degrees, refracted when requested.
    pub zd: Degree,
    /// Azimuth, degrees east of north in `[0, 360)`.
    pub az: Degree,
    /// Right ascension after refraction, hours (the input when nothing was applied).
    pub rar: Hour,
    /// Declination after refraction, degrees.
    pub decr: Degree,
}

/// Atmospheric refraction, degrees, for an observed zenith distance.
///
/// The standard atmosphere uses 10 °C and a pressure of 1010 mbar scaled with the height
/// of the site; [`Refraction::ObserverAtmosphere`] uses the site's own weather. No
/// refraction is applied below 0.1° or beyond 91° of zenith distance.
pub fn refract(location: &OnSurface, option: Refraction, zd_obs: Degree) -> Degree {
    if option == Refraction::Off || !(0.1..=91.0).contains(&zd_obs) {
        return 0.0;
    }

    let (pressure, temperature) = match option {
        Refraction::ObserverAtmosphere => (location.pressure, location.temperature),
        _ => (1010.0 * (-location.height / SCALE_HEIGHT).exp(), 10.0),
    };

    let h = 90.0 - zd_obs;
    let r = 0.016667 / ((h + 7.31 / (h + 4.4)) * RADEG).tan();
    r * (0.28 * pressure / (temperature + 273.0))
}

/// Transform a true-of-date equatorial direction to the local horizon.
///
/// Arguments
/// -----------------
/// * `jd_ut1`: UT1 Julian Date.
/// * `delta_t`: TT − UT1, seconds.
/// * `accuracy`: nutation model of the sidereal time.
/// * `xp`, `yp`: polar motion, arcseconds.
/// * `location`: the site.
/// * `ra`, `dec`: right ascension (hours) and declination (degrees), true equator and
///   equinox of date.
/// * `refraction`: refraction model.
///
/// Return
/// ----------
/// * The horizon place; with refraction, the refracted equatorial direction too.
#[allow(clippy::too_many_arguments)]
pub fn equ2hor(
    jd_ut1: f64,
    delta_t: f64,
    accuracy: Accuracy,
    xp: ArcSec,
    yp: ArcSec,
    location: &OnSurface,
    ra: Hour,
    dec: Degree,
    refraction: Refraction,
) -> HorizonPlace {
    let (sin_lat, cos_lat) = (location.latitude * RADEG).sin_cos();
    let (sin_lon, cos_lon) = (location.longitude * RADEG).sin_cos();

    // zenith, north and west in the terrestrial frame
    let uze = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
    let une = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let uwe = Vector3::new(sin_lon, -cos_lon, 0.0);

    // ITRS to TIRS, then Earth rotation to the true equator and equinox of date
    let ut1_mjd = jd_ut1 - JDTOMJD;
    let tt_mjd = ut1_mjd + delta_t / SECONDS_PER_DAY;
    let to_celestial = rotmt(-gast(ut1_mjd, tt_mjd, accuracy), Axis::Z)
        * polar_motion(xp, yp).transpose();
    let uz = to_celestial * uze;
    let un = to_celestial * une;
    let uw = to_celestial * uwe;

    let p = radec_to_unit(ra * RADH, dec * RADEG);
    let pz = p.dot(&uz);
    let pn = p.dot(&un);
    let pw = p.dot(&uw);

    let proj = (pn * pn + pw * pw).sqrt();
    let az = if proj > 0.0 {
        (-pw.atan2(pn) / RADEG).rem_euclid(360.0)
    } else {
        0.0
    };
    let mut zd = proj.atan2(pz) / RADEG;

    let mut rar = ra;
    let mut decr = dec;

    if refraction != Refraction::Off {
        let zd0 = zd;
        let mut refr;
        loop {
            let zd1 = zd;
            refr = refract(location, refraction, zd);
            zd = zd0 - refr;
            if (zd - zd1).abs() <= REFRACTION_TOLERANCE {
                break;
            }
        }

        if refr > 0.0 && zd > 3.0e-4 {
            let (sin_zd, cos_zd) = (zd * RADEG).sin_cos();
            let (sin_zd0, cos_zd0) = (zd0 * RADEG).sin_cos();
            let pr = (p - cos_zd0 * uz) / sin_zd0 * sin_zd + uz * cos_zd;

            let proj = (pr.x * pr.x + pr.y * pr.y).sqrt();
            rar = if proj > 0.0 {
                (pr.y.atan2(pr.x) / RADH).rem_euclid(24.0)
            } else {
                0.0
            };
            decr = pr.z.atan2(proj) / RADEG;
        }
    }

    HorizonPlace { zd, az, rar, decr }
}
