//! # Apparent places
//!
//! Astrometric and topocentric places of catalog stars and solar-system bodies, and their
//! conversion to the local horizon.
//!
//! The four place functions follow the kernel convention of the crate: they return the
//! place with a zero status, or an error status (`10 + code` when the ephemeris fails, `1`
//! when the light-time iteration does not converge). Units at this boundary are the
//! catalog ones: hours and degrees, milliarcseconds, km/s.
//!
//! ## Pipeline
//!
//! ```text
//! catalog star ── starvectors ── proper_motion ─┐
//!                                               ├── bary2obs ── (astrometric place)
//! ephemeris body ─────────── light_time ────────┘        │
//!                                                        ├── grav_def ── aberration
//!                                                        │     └── N·P·B ── (topocentric place)
//! ```
//!
//! Astrometric places are geocentric, referred to the ICRS axes. Topocentric places are
//! referred to the true equator and equinox of date and include light deflection and
//! aberration for the moving observer.

pub mod corrections;
pub mod horizon;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AstronomicalUnit, Degree, Hour, Meter, Second, DPI, ERAU, JDTOMJD, RADEG, SECONDS_PER_DAY,
};
use crate::earth_orientation::gcrs_to_true_of_date;
use crate::ephemeris::{Ephemeris, Origin, SolarSystemBody};
use crate::observers::lat_alt_to_parallax;
use crate::ref_system::{rotmt, vector_to_hour_deg, Axis};
use crate::time::calendar::KernelResult;
use crate::time::conversions::tdb_minus_tt;
use crate::time::sidereal::gast;

use corrections::{aberration, bary2obs, distance, grav_def, light_time, proper_motion, starvectors};

/// Offset added to an ephemeris status code by the place functions.
pub(crate) const EPHEMERIS_STATUS_OFFSET: i32 = 10;

/// Sidereal over solar day, the Earth rotation rate in turns per day.
const SIDEREAL_RATE: f64 = 1.00273790934;

/// Model accuracy of the place and sidereal-time computations.
///
/// `Reduced` drops the frame bias, keeps only the four largest nutation terms and deflects
/// light by the Sun alone; the loss is below one arcsecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Accuracy {
    #[default]
    Full,
    Reduced,
}

/// Atmospheric refraction model used by the horizon transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Refraction {
    #[default]
    Off,
    /// 10 °C and 1010 mbar, the pressure scaled with the site height.
    Standard,
    /// The temperature and pressure of the observer.
    ObserverAtmosphere,
}

/// Catalog entry of a star, in catalog units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CatEntry {
    /// ICRS right ascension, hours.
    pub ra: Hour,
    /// ICRS declination, degrees.
    pub dec: Degree,
    /// Proper motion in right ascension times cos(dec), mas/yr.
    pub promora: f64,
    /// Proper motion in declination, mas/yr.
    pub promodec: f64,
    /// Parallax, mas.
    pub parallax: f64,
    /// Radial velocity, km/s.
    pub radialvelocity: f64,
}

/// A site on the surface of the Earth, in kernel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnSurface {
    /// Geodetic latitude, degrees north.
    pub latitude: Degree,
    /// Longitude, degrees east.
    pub longitude: Degree,
    /// Height above the ellipsoid, meters.
    pub height: Meter,
    /// Temperature, °C.
    pub temperature: f64,
    /// Pressure, mbar.
    pub pressure: f64,
}

impl Default for OnSurface {
    fn default() -> Self {
        OnSurface {
            latitude: 0.0,
            longitude: 0.0,
            height: 0.0,
            temperature: 10.0,
            pressure: 1010.0,
        }
    }
}

/// A place as returned by the kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub ra: Hour,
    pub dec: Degree,
    /// Distance from the observer, AU (light-time corrected for bodies).
    pub distance: AstronomicalUnit,
}

impl Place {
    fn from_vector(position: Vector3<f64>) -> Self {
        let (ra, dec) = vector_to_hour_deg(position);
        Place {
            ra,
            dec,
            distance: distance(&position),
        }
    }
}

/// Two-part TT Julian Date to TDB, adding the periodic TDB − TT term to the second part.
fn tt_to_tdb((jd1, jd2): (f64, f64)) -> (f64, f64) {
    (jd1, jd2 + tdb_minus_tt(jd1 + jd2) / SECONDS_PER_DAY)
}

fn tt_mjd((jd1, jd2): (f64, f64)) -> f64 {
    (jd1 - JDTOMJD) + jd2
}

/// Geocentric position (AU) and velocity (AU/day) of a site, GCRS axes.
///
/// The site is carried from the rotating Earth frame to the true equator of date by the
/// apparent sidereal time, then back to the GCRS. Polar motion is neglected.
fn geocentric_site(
    location: &OnSurface,
    jd_tt: (f64, f64),
    delta_t: Second,
    accuracy: Accuracy,
) -> (Vector3<f64>, Vector3<f64>) {
    let (rho_cos_phi, rho_sin_phi) = lat_alt_to_parallax(location.latitude * RADEG, location.height);
    let (sin_lon, cos_lon) = (location.longitude * RADEG).sin_cos();

    let body_fixed = ERAU * Vector3::new(rho_cos_phi * cos_lon, rho_cos_phi * sin_lon, rho_sin_phi);
    let omega = Vector3::new(0.0, 0.0, DPI * SIDEREAL_RATE);
    let body_fixed_velocity = omega.cross(&body_fixed);

    let tt = tt_mjd(jd_tt);
    let ut1 = tt - delta_t / SECONDS_PER_DAY;
    let to_gcrs =
        gcrs_to_true_of_date(tt, accuracy).transpose() * rotmt(-gast(ut1, tt, accuracy), Axis::Z);

    (to_gcrs * body_fixed, to_gcrs * body_fixed_velocity)
}

/// Barycentric position and velocity of the observer: the geocenter, or a surface site.
fn observer_state(
    ephemeris: &Ephemeris,
    jd_tt: (f64, f64),
    jd_tdb: (f64, f64),
    site: Option<(&OnSurface, Second)>,
    accuracy: Accuracy,
) -> Result<(Vector3<f64>, Vector3<f64>), i32> {
    let (earth, _) = ephemeris
        .state(SolarSystemBody::Earth, jd_tdb, Origin::Barycentric)
        .map_err(|code| EPHEMERIS_STATUS_OFFSET + code)?;

    Ok(match site {
        None => (earth.position, earth.velocity),
        Some((location, delta_t)) => {
            let (pos, vel) = geocentric_site(location, jd_tt, delta_t, accuracy);
            (earth.position + pos, earth.velocity + vel)
        }
    })
}

/// Observer-centric geometric position and light time of a star at `jd_tdb`.
fn star_from_observer(
    star: &CatEntry,
    promoepoch: f64,
    jd_tdb: (f64, f64),
    observer: &Vector3<f64>,
) -> (Vector3<f64>, f64) {
    let (pos, vel) = starvectors(star);
    let pos = proper_motion(&pos, &vel, promoepoch, jd_tdb.0 + jd_tdb.1);
    bary2obs(&pos, observer)
}

/// Deflect, aberrate and rotate an observer-centric position to the true equator of date.
fn apparent(
    ephemeris: &Ephemeris,
    jd_tt: (f64, f64),
    jd_tdb: (f64, f64),
    accuracy: Accuracy,
    position: &Vector3<f64>,
    observer: (&Vector3<f64>, &Vector3<f64>),
    tlight: f64,
) -> Result<Vector3<f64>, i32> {
    let (obs_pos, obs_vel) = observer;
    let deflected = grav_def(ephemeris, jd_tdb, accuracy, position, obs_pos)?;
    let aberrated = aberration(&deflected, obs_vel, tlight);
    Ok(gcrs_to_true_of_date(tt_mjd(jd_tt), accuracy) * aberrated)
}

/// Astrometric place of a star, geocentric, ICRS axes.
///
/// Arguments
/// -----------------
/// * `ephemeris`: source of the Earth position.
/// * `jd_tt`: two-part TT Julian Date.
/// * `star`: the catalog entry.
/// * `promoepoch`: TDB Julian Date of the catalog position.
/// * `accuracy`: unused by the astrometric place, kept for the kernel signature.
///
/// Return
/// ----------
/// * The place with status `0`, or `10 + code` on ephemeris failure.
pub fn astro_star(
    ephemeris: &Ephemeris,
    jd_tt: (f64, f64),
    star: &CatEntry,
    promoepoch: f64,
    accuracy: Accuracy,
) -> KernelResult<Place> {
    let jd_tdb = tt_to_tdb(jd_tt);
    let (earth, _) = observer_state(ephemeris, jd_tt, jd_tdb, None, accuracy)?;
    let (pos, _) = star_from_observer(star, promoepoch, jd_tdb, &earth);
    Ok((Place::from_vector(pos), 0))
}

/// Astrometric place of a solar-system body, geocentric, ICRS axes, light-time corrected.
pub fn astro_planet(
    ephemeris: &Ephemeris,
    jd_tt: (f64, f64),
    body: SolarSystemBody,
    accuracy: Accuracy,
) -> KernelResult<Place> {
    let jd_tdb = tt_to_tdb(jd_tt);
    let (earth, _) = observer_state(ephemeris, jd_tt, jd_tdb, None, accuracy)?;
    let (pos, _) = light_time(ephemeris, body, jd_tdb, &earth)?;
    Ok((Place::from_vector(pos), 0))
}

/// Topocentric place of a star, true equator and equinox of date.
///
/// Arguments
/// -----------------
/// * `delta_t`: TT − UT1, seconds, for the rotation of the site.
/// * `location`: the site.
///
/// Other arguments as in [`astro_star`].
pub fn topo_star(
    ephemeris: &Ephemeris,
    jd_tt: (f64, f64),
    delta_t: Second,
    star: &CatEntry,
    promoepoch: f64,
    location: &OnSurface,
    accuracy: Accuracy,
) -> KernelResult<Place> {
    let jd_tdb = tt_to_tdb(jd_tt);
    let (obs_pos, obs_vel) =
        observer_state(ephemeris, jd_tt, jd_tdb, Some((location, delta_t)), accuracy)?;
    let (pos, tlight) = star_from_observer(star, promoepoch, jd_tdb, &obs_pos);

    let pos = apparent(ephemeris, jd_tt, jd_tdb, accuracy, &pos, (&obs_pos, &obs_vel), tlight)?;
    Ok((Place::from_vector(pos), 0))
}

/// Topocentric place of a solar-system body, true equator and equinox of date.
pub fn topo_planet(
    ephemeris: &Ephemeris,
    jd_tt: (f64, f64),
    delta_t: Second,
    body: SolarSystemBody,
    location: &OnSurface,
    accuracy: Accuracy,
) -> KernelResult<Place> {
    let jd_tdb = tt_to_tdb(jd_tt);
    let (obs_pos, obs_vel) =
        observer_state(ephemeris, jd_tt, jd_tdb, Some((location, delta_t)), accuracy)?;
    let (pos, tlight) = light_time(ephemeris, body, jd_tdb, &obs_pos)?;

    let apparent_pos =
        apparent(ephemeris, jd_tt, jd_tdb, accuracy, &pos, (&obs_pos, &obs_vel), tlight)?;
    let (ra, dec) = vector_to_hour_deg(apparent_pos);
    Ok((
        Place {
            ra,
            dec,
            distance: distance(&pos),
        },
        0,
    ))
}

#[cfg(test)]
mod place_test {
    use super::*;
    use crate::constants::J2000_JD;
    use crate::ephemeris::keplerian::KeplerianEphemeris;
    use approx::assert_relative_eq;

    fn keplerian() -> Ephemeris {
        Ephemeris::Keplerian(KeplerianEphemeris)
    }

    fn separation_arcsec(a: &Place, b: &Place) -> f64 {
        let u = crate::ref_system::radec_to_unit(a.ra * crate::constants::RADH, a.dec * RADEG);
        let v = crate::ref_system::radec_to_unit(b.ra * crate::constants::RADH, b.dec * RADEG);
        u.angle(&v) / crate::constants::RADSEC
    }

    #[test]
    fn test_sun_at_j2000() {
        let (sun, status) =
            astro_planet(&keplerian(), (J2000_JD, 0.0), SolarSystemBody::Sun, Accuracy::Full)
                .unwrap();
        assert_eq!(status, 0);
        assert_relative_eq!(sun.ra * 15.0, 281.28, epsilon = 0.1);
        assert_relative_eq!(sun.dec, -23.03, epsilon = 0.1);
        assert_relative_eq!(sun.distance, 0.9833, epsilon = 0.002);
    }

    #[test]
    fn test_topocentric_sun_close_to_astrometric() {
        let eph = keplerian();
        let jd = (J2000_JD, 0.0);
        let (astro, _) = astro_planet(&eph, jd, SolarSystemBody::Sun, Accuracy::Full).unwrap();
        let site = OnSurface {
            latitude: 51.4769,
            ..OnSurface::default()
        };
        let (topo, _) =
            topo_planet(&eph, jd, 64.0, SolarSystemBody::Sun, &site, Accuracy::Full).unwrap();

        // aberration, nutation and the diurnal parallax stay below a minute of arc at J2000
        let sep = separation_arcsec(&astro, &topo);
        assert!(sep > 5.0 && sep < 60.0, "{sep}");

        let (reduced, _) =
            topo_planet(&eph, jd, 64.0, SolarSystemBody::Sun, &site, Accuracy::Reduced).unwrap();
        assert!(separation_arcsec(&topo, &reduced) < 1.0);
    }

    #[test]
    fn test_astro_star_proper_motion() {
        let eph = keplerian();
        let star = CatEntry {
            ra: 12.0,
            dec: 10.0,
            promodec: 10_000.0,
            parallax: 1.0,
            ..CatEntry::default()
        };
        let (at_epoch, _) =
            astro_star(&eph, (J2000_JD, 0.0), &star, J2000_JD, Accuracy::Full).unwrap();
        assert_relative_eq!(at_epoch.ra, 12.0, epsilon = 1e-6);
        assert_relative_eq!(at_epoch.dec, 10.0, epsilon = 1e-6);

        // fifty years later the star has moved 500" north
        let (later, _) =
            astro_star(&eph, (J2000_JD, 18262.5), &star, J2000_JD, Accuracy::Full).unwrap();
        assert_relative_eq!((later.dec - 10.0) * 3600.0, 500.0, epsilon = 0.1);
    }

    #[test]
    fn test_topo_star_aberration() {
        let eph = keplerian();
        let star = CatEntry {
            ra: 6.0,
            dec: -30.0,
            ..CatEntry::default()
        };
        let (astro, _) = astro_star(&eph, (J2000_JD, 0.0), &star, J2000_JD, Accuracy::Full).unwrap();
        let (topo, _) = topo_star(
            &eph,
            (J2000_JD, 0.0),
            64.0,
            &star,
            J2000_JD,
            &OnSurface::default(),
            Accuracy::Full,
        )
        .unwrap();
        // annual aberration up to 20.5" plus nutation up to 17"
        let sep = separation_arcsec(&astro, &topo);
        assert!(sep < 45.0, "{sep}");
    }

    #[test]
    fn test_site_geometry() {
        let (pos, vel) = geocentric_site(&OnSurface::default(), (J2000_JD, 0.0), 64.0, Accuracy::Full);
        assert_relative_eq!(pos.norm(), ERAU, max_relative = 1e-9);
        // 465 m/s at the equator
        let speed = vel.norm() * crate::constants::AU * 1000.0 / SECONDS_PER_DAY;
        assert_relative_eq!(speed, 465.1, epsilon = 0.5);
        assert!(pos.dot(&vel).abs() < 1e-15);
    }

    #[test]
    #[cfg(feature = "jpl-download")]
    fn test_keplerian_matches_de440() {
        use crate::unit_test_global::SKYTIME_NAIF_TEST;

        let de440 = SKYTIME_NAIF_TEST.get_ephemeris().unwrap();
        for body in [SolarSystemBody::Sun, SolarSystemBody::Mars, SolarSystemBody::Jupiter] {
            let (reference, _) =
                astro_planet(de440, (J2000_JD, 3000.0), body, Accuracy::Full).unwrap();
            let (analytic, _) =
                astro_planet(&keplerian(), (J2000_JD, 3000.0), body, Accuracy::Full).unwrap();
            let sep = separation_arcsec(&reference, &analytic);
            assert!(sep < 600.0, "{body}: {sep}");
        }
    }

    #[test]
    fn test_out_of_coverage_status() {
        let eph = keplerian();
        assert_eq!(
            astro_planet(&eph, (2300000.5, 0.0), SolarSystemBody::Mars, Accuracy::Full),
            Err(11)
        );
        assert_eq!(
            astro_star(&eph, (2300000.5, 0.0), &CatEntry::default(), J2000_JD, Accuracy::Full),
            Err(11)
        );
    }
}
