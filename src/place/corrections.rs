//! Vector corrections of the apparent-place pipeline.
//!
//! All vectors are barycentric ICRS-aligned, in AU and AU/day, and all times are TDB
//! Julian Dates.

use nalgebra::Vector3;

use crate::constants::{
    AstronomicalUnit, AU, C_AUDAY, DAYS_PER_JULIAN_YEAR, GS, RADEG, RADH, RADMAS, SECONDS_PER_DAY,
    VLIGHT, VLIGHT_MS,
};
use crate::ephemeris::{Ephemeris, Origin, SolarSystemBody};
use crate::ref_system::radec_to_unit;

use super::{Accuracy, CatEntry, EPHEMERIS_STATUS_OFFSET};

/// Parallax used for stars without one, mas: puts them at about 1e9 pc.
const NEGLIGIBLE_PARALLAX: f64 = 1.0e-6;

/// Barycentric position (AU) and space motion (AU/day) of a catalog star at its
/// catalog epoch.
///
/// The motion includes the Doppler factor `1 / (1 - v_r / c)` for the change in light
/// travel time along the line of sight.
pub fn starvectors(star: &CatEntry) -> (Vector3<f64>, Vector3<f64>) {
    let parallax = if star.parallax <= 0.0 {
        NEGLIGIBLE_PARALLAX
    } else {
        star.parallax
    };
    let distance = 1.0 / (parallax * RADMAS).sin();

    let (ra, dec) = (star.ra * RADH, star.dec * RADEG);
    let (sin_ra, cos_ra) = ra.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    let position = distance * radec_to_unit(ra, dec);

    let doppler = 1.0 / (1.0 - star.radialvelocity / VLIGHT);
    let pm_ra = star.promora / (parallax * DAYS_PER_JULIAN_YEAR) * doppler;
    let pm_dec = star.promodec / (parallax * DAYS_PER_JULIAN_YEAR) * doppler;
    let radial = star.radialvelocity * SECONDS_PER_DAY / AU * doppler;

    let velocity = Vector3::new(
        -pm_ra * sin_ra - pm_dec * sin_dec * cos_ra + radial * cos_dec * cos_ra,
        pm_ra * cos_ra - pm_dec * sin_dec * sin_ra + radial * cos_dec * sin_ra,
        pm_dec * cos_dec + radial * sin_dec,
    );
    (position, velocity)
}

/// Linear space motion from `jd_from` to `jd_to`.
pub fn proper_motion(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    jd_from: f64,
    jd_to: f64,
) -> Vector3<f64> {
    position + velocity * (jd_to - jd_from)
}

/// Move the origin from the barycenter to the observer.
///
/// Return
/// ----------
/// * The observer-centric vector and the light time along it, days.
pub fn bary2obs(position: &Vector3<f64>, observer: &Vector3<f64>) -> (Vector3<f64>, f64) {
    let relative = position - observer;
    let light_time = relative.norm() / C_AUDAY;
    (relative, light_time)
}

/// Observer-centric geometric position of a body, corrected for light time.
///
/// The body is taken at `t = jd_tdb - τ`, `τ` being its light time, iterated until `τ`
/// changes by less than 1e-9 day.
///
/// Return
/// ----------
/// * `(position, light_time)`; error status `10 + code` when the ephemeris fails and `1`
///   when the iteration does not settle in ten rounds.
pub fn light_time(
    ephemeris: &Ephemeris,
    body: SolarSystemBody,
    jd_tdb: (f64, f64),
    observer: &Vector3<f64>,
) -> Result<(Vector3<f64>, f64), i32> {
    let body_at = |jd2: f64| {
        ephemeris
            .state(body, (jd_tdb.0, jd2), Origin::Barycentric)
            .map(|(state, _)| state.position)
            .map_err(|code| EPHEMERIS_STATUS_OFFSET + code)
    };

    let (_, mut tlight) = bary2obs(&body_at(jd_tdb.1)?, observer);
    for _ in 0..10 {
        let (position, next_tlight) = bary2obs(&body_at(jd_tdb.1 - tlight)?, observer);
        if (next_tlight - tlight).abs() <= 1.0e-9 {
            return Ok((position, next_tlight));
        }
        tlight = next_tlight;
    }
    Err(1)
}

/// Deflection of light by one body.
///
/// Arguments
/// -----------------
/// * `position`: observer-centric position of the source, AU.
/// * `observer`: barycentric position of the observer, AU.
/// * `deflector`: barycentric position of the deflecting body, AU.
/// * `mass_ratio`: mass of the Sun over the mass of the body.
///
/// Return
/// ----------
/// * The deflected position, same length as `position`. Unchanged when the source and the
///   deflector are aligned as seen from the observer.
pub fn grav_vec(
    position: &Vector3<f64>,
    observer: &Vector3<f64>,
    deflector: &Vector3<f64>,
    mass_ratio: f64,
) -> Vector3<f64> {
    let body_to_source = position + observer - deflector;
    let body_to_observer = observer - deflector;

    let pmag = position.norm();
    let emag = body_to_observer.norm();
    let qmag = body_to_source.norm();
    if pmag == 0.0 || emag == 0.0 || qmag == 0.0 {
        return *position;
    }

    let phat = position / pmag;
    let ehat = body_to_observer / emag;
    let qhat = body_to_source / qmag;

    let edotp = ehat.dot(&phat);
    if edotp.abs() > 0.99999999999 {
        return *position;
    }
    let pdotq = phat.dot(&qhat);
    let qdote = qhat.dot(&ehat);

    let fac1 = 2.0 * GS / (VLIGHT_MS * VLIGHT_MS * emag * AU * 1000.0 * mass_ratio);
    let fac2 = 1.0 + qdote;

    pmag * (phat + fac1 * (pdotq * ehat - edotp * qhat) / fac2)
}

/// Sun, Jupiter and Saturn with their inverse masses.
const DEFLECTORS: [(SolarSystemBody, f64); 3] = [
    (SolarSystemBody::Sun, 1.0),
    (SolarSystemBody::Jupiter, 1047.3486),
    (SolarSystemBody::Saturn, 3497.898),
];

/// Gravitational light deflection by the Sun, plus Jupiter and Saturn at full accuracy.
///
/// Each deflector is taken at the time the light passes closest to it.
///
/// Return
/// ----------
/// * The deflected position, or `10 + code` when the ephemeris fails.
pub fn grav_def(
    ephemeris: &Ephemeris,
    jd_tdb: (f64, f64),
    accuracy: Accuracy,
    position: &Vector3<f64>,
    observer: &Vector3<f64>,
) -> Result<Vector3<f64>, i32> {
    let deflectors = match accuracy {
        Accuracy::Full => &DEFLECTORS[..],
        Accuracy::Reduced => &DEFLECTORS[..1],
    };

    let pmag = position.norm();
    if pmag == 0.0 {
        return Ok(*position);
    }
    let tlight = pmag / C_AUDAY;

    let body_at = |body, jd2: f64| {
        ephemeris
            .state(body, (jd_tdb.0, jd2), Origin::Barycentric)
            .map(|(state, _)| state.position)
            .map_err(|code| EPHEMERIS_STATUS_OFFSET + code)
    };

    let mut deflected = *position;
    for &(body, mass_ratio) in deflectors {
        let body_obs = body_at(body, jd_tdb.1)? - observer;
        // light time from the body's closest approach to the observer
        let dlt = position.dot(&body_obs) / pmag / C_AUDAY;
        let tclose = if dlt > 0.0 { dlt.min(tlight) } else { 0.0 };

        let deflector = body_at(body, jd_tdb.1 - tclose)?;
        deflected = grav_vec(&deflected, observer, &deflector, mass_ratio);
    }
    Ok(deflected)
}

/// Relativistic aberration for an observer moving at `velocity` (AU/day).
///
/// Arguments
/// -----------------
/// * `position`: observer-centric position of the source, AU.
/// * `velocity`: barycentric velocity of the observer, AU/day.
/// * `light_time`: light time to the source in days, or `0` to derive it from `position`.
pub fn aberration(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    light_time: f64,
) -> Vector3<f64> {
    let pmag = position.norm();
    let vmag = velocity.norm();
    if pmag == 0.0 || vmag == 0.0 {
        return *position;
    }
    let (p1mag, tlight) = if light_time == 0.0 {
        (pmag, pmag / C_AUDAY)
    } else {
        (light_time * C_AUDAY, light_time)
    };

    let beta = vmag / C_AUDAY;
    let cosd = position.dot(velocity) / (p1mag * vmag);
    let gammai = (1.0 - beta * beta).sqrt();
    let p = beta * cosd;
    let q = (1.0 + p / (1.0 + gammai)) * tlight;
    let r = 1.0 + p;

    (gammai * position + q * velocity) / r
}

/// Length of a position vector, AU.
pub fn distance(position: &Vector3<f64>) -> AstronomicalUnit {
    position.norm()
}
