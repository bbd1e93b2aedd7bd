//! Analytic ephemeris from mean orbital elements.
//!
//! Planets follow the JPL "approximate positions of the planets" mean elements, valid from
//! 1800 to 2050, referred to the J2000 ecliptic and equinox. Elements drift linearly with
//! time; the position on the orbit comes from Kepler's equation. The Moon uses a
//! low-precision series of its ecliptic longitude, latitude and horizontal parallax.
//!
//! The Sun is displaced from the Solar System barycenter by the four giant planets. The
//! resulting positions are good to about an arc minute for the inner planets, a few arc
//! minutes for the outer ones, which is enough for pointing and for Rømer delays to within a
//! few tens of milliseconds. Velocities are central differences of the positions.

use nalgebra::Vector3;

use crate::constants::{DAYS_PER_JULIAN_CENTURY, EARTH_MOON_MASS_RATIO, ERAU, J2000_JD, RADEG};
use crate::ref_system::{rotmt, Axis};

use super::SolarSystemBody;

/// Earliest Julian Date (TDB) covered: 1800-01-01.
pub const KEPLERIAN_START_JD: f64 = 2378496.5;
/// Latest Julian Date (TDB) covered: 2050-12-31.
pub const KEPLERIAN_END_JD: f64 = 2470171.5;

/// Obliquity of the J2000 ecliptic used by the element table, degrees.
const OBLIQUITY_J2000: f64 = 23.43928;

/// Half-step of the central difference, days.
const VELOCITY_STEP: f64 = 0.01;

/// Mean elements `[a, e, I, L, ϖ, Ω]` (AU, -, deg, deg, deg, deg) at J2000 and their
/// rates per Julian century.
struct MeanElements {
    at_epoch: [f64; 6],
    rates: [f64; 6],
}

#[rustfmt::skip]
const MERCURY: MeanElements = MeanElements {
    at_epoch: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
    rates: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};
#[rustfmt::skip]
const VENUS: MeanElements = MeanElements {
    at_epoch: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    rates: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};
#[rustfmt::skip]
const EARTH_MOON_BARYCENTER: MeanElements = MeanElements {
    at_epoch: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    rates: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};
#[rustfmt::skip]
const MARS: MeanElements = MeanElements {
    at_epoch: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    rates: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};
#[rustfmt::skip]
const JUPITER: MeanElements = MeanElements {
    at_epoch: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    rates: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};
#[rustfmt::skip]
const SATURN: MeanElements = MeanElements {
    at_epoch: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    rates: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};
#[rustfmt::skip]
const URANUS: MeanElements = MeanElements {
    at_epoch: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    rates: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};
#[rustfmt::skip]
const NEPTUNE: MeanElements = MeanElements {
    at_epoch: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    rates: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};
#[rustfmt::skip]
const PLUTO: MeanElements = MeanElements {
    at_epoch: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    rates: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

/// Mass of the giant planets (with their satellites) over the mass of the Sun.
const GIANT_PLANETS: [(&MeanElements, f64); 4] = [
    (&JUPITER, 1.0 / 1047.3486),
    (&SATURN, 1.0 / 3497.898),
    (&URANUS, 1.0 / 22902.98),
    (&NEPTUNE, 1.0 / 19412.24),
];

/// Solve Kepler's equation `E - e sin E = M` by Newton iterations, radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ecc_anomaly = if eccentricity > 0.8 {
        std::f64::consts::PI.copysign(mean_anomaly)
    } else {
        mean_anomaly + eccentricity * mean_anomaly.sin()
    };

    for _ in 0..30 {
        let delta = (ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly)
            / (1.0 - eccentricity * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < 1e-14 {
            break;
        }
    }
    ecc_anomaly
}

/// Rotation from the J2000 ecliptic to the J2000 equator.
fn ecliptic_to_equatorial(ecliptic: Vector3<f64>) -> Vector3<f64> {
    rotmt(-OBLIQUITY_J2000 * RADEG, Axis::X) * ecliptic
}

impl MeanElements {
    /// Heliocentric equatorial J2000 position (AU) at `t` Julian centuries past J2000.
    fn heliocentric(&self, t: f64) -> Vector3<f64> {
        let el: [f64; 6] = std::array::from_fn(|i| self.at_epoch[i] + self.rates[i] * t);
        let [a, e, incl, mean_longitude, peri_longitude, node] = el;

        let omega = (peri_longitude - node) * RADEG;
        let mean_anomaly = ((mean_longitude - peri_longitude + 180.0).rem_euclid(360.0) - 180.0)
            * RADEG;
        let ecc_anomaly = solve_kepler(mean_anomaly, e);

        // position in the orbital plane, x towards perihelion
        let in_plane = Vector3::new(
            a * (ecc_anomaly.cos() - e),
            a * (1.0 - e * e).sqrt() * ecc_anomaly.sin(),
            0.0,
        );

        // R3(-Ω) R1(-I) R3(-ω): orbital plane to ecliptic
        let to_ecliptic = rotmt(-node * RADEG, Axis::Z)
            * rotmt(-incl * RADEG, Axis::X)
            * rotmt(-omega, Axis::Z);
        ecliptic_to_equatorial(to_ecliptic * in_plane)
    }
}

/// Geocentric equatorial J2000 position of the Moon (AU).
fn moon_geocentric(t: f64) -> Vector3<f64> {
    let sind = |deg: f64| (deg * RADEG).sin();
    let cosd = |deg: f64| (deg * RADEG).cos();

    let longitude = 218.32 + 481267.881 * t + 6.29 * sind(135.0 + 477198.87 * t)
        - 1.27 * sind(259.3 - 413335.36 * t)
        + 0.66 * sind(235.7 + 890534.22 * t)
        + 0.21 * sind(269.9 + 954397.74 * t)
        - 0.19 * sind(357.5 + 35999.05 * t)
        - 0.11 * sind(186.5 + 966404.03 * t);
    let latitude = 5.13 * sind(93.3 + 483202.02 * t) + 0.28 * sind(228.2 + 960400.89 * t)
        - 0.28 * sind(318.3 + 6003.15 * t)
        - 0.17 * sind(217.6 - 407332.21 * t);
    let parallax = 0.9508
        + 0.0518 * cosd(135.0 + 477198.87 * t)
        + 0.0095 * cosd(259.3 - 413335.36 * t)
        + 0.0078 * cosd(235.7 + 890534.22 * t)
        + 0.0028 * cosd(269.9 + 954397.74 * t);

    // the series is referred to the equinox of date
    let longitude = longitude - 1.396971 * t;
    let distance = ERAU / sind(parallax);

    let ecliptic = Vector3::new(
        distance * cosd(latitude) * cosd(longitude),
        distance * cosd(latitude) * sind(longitude),
        distance * sind(latitude),
    );
    ecliptic_to_equatorial(ecliptic)
}

/// Built-in mean-element ephemeris, barycentric ICRS-aligned positions in AU.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeplerianEphemeris;

impl KeplerianEphemeris {
    pub fn covers(&self, jd_tdb: f64) -> bool {
        (KEPLERIAN_START_JD..=KEPLERIAN_END_JD).contains(&jd_tdb)
    }

    /// Barycentric position of `body` (AU) at a two-part TDB Julian Date.
    fn position(&self, body: SolarSystemBody, jd1: f64, jd2: f64) -> Vector3<f64> {
        let t = ((jd1 - J2000_JD) + jd2) / DAYS_PER_JULIAN_CENTURY;

        let sun = -GIANT_PLANETS
            .iter()
            .map(|(elements, mass)| elements.heliocentric(t) * *mass)
            .sum::<Vector3<f64>>()
            / (1.0 + GIANT_PLANETS.iter().map(|(_, mass)| mass).sum::<f64>());

        let earth_moon = || {
            let emb = EARTH_MOON_BARYCENTER.heliocentric(t);
            let moon = moon_geocentric(t);
            let earth = emb - moon / (1.0 + EARTH_MOON_MASS_RATIO);
            (earth, earth + moon)
        };

        let heliocentric = match body {
            SolarSystemBody::Sun => Vector3::zeros(),
            SolarSystemBody::Mercury => MERCURY.heliocentric(t),
            SolarSystemBody::Venus => VENUS.heliocentric(t),
            SolarSystemBody::Earth => earth_moon().0,
            SolarSystemBody::Moon => earth_moon().1,
            SolarSystemBody::Mars => MARS.heliocentric(t),
            SolarSystemBody::Jupiter => JUPITER.heliocentric(t),
            SolarSystemBody::Saturn => SATURN.heliocentric(t),
            SolarSystemBody::Uranus => URANUS.heliocentric(t),
            SolarSystemBody::Neptune => NEPTUNE.heliocentric(t),
            SolarSystemBody::Pluto => PLUTO.heliocentric(t),
        };
        heliocentric + sun
    }

    /// Barycentric position (AU) and velocity (AU/day).
    ///
    /// Return
    /// ----------
    /// * The state, or status `1` outside 1800–2050.
    pub fn state(
        &self,
        body: SolarSystemBody,
        jd1: f64,
        jd2: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), i32> {
        if !self.covers(jd1 + jd2) {
            return Err(super::naif::naif_data::OUT_OF_COVERAGE);
        }
        let position = self.position(body, jd1, jd2);
        let velocity = (self.position(body, jd1, jd2 + VELOCITY_STEP)
            - self.position(body, jd1, jd2 - VELOCITY_STEP))
            / (2.0 * VELOCITY_STEP);
        Ok((position, velocity))
    }
}

#[cfg(test)]
mod keplerian_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_kepler() {
        for (m, e) in [(0.3, 0.0), (1.0, 0.2), (-2.5, 0.6), (3.0, 0.95)] {
            let ecc = solve_kepler(m, e);
            assert_relative_eq!(ecc - e * ecc.sin(), m, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_earth_sun_distance_at_j2000() {
        let eph = KeplerianEphemeris;
        let (earth, _) = eph.state(SolarSystemBody::Earth, J2000_JD, 0.0).unwrap();
        let (sun, _) = eph.state(SolarSystemBody::Sun, J2000_JD, 0.0).unwrap();
        let distance = (earth - sun).norm();
        // perihelion is reached a few days later
        assert!((0.98..0.99).contains(&distance), "{distance}");
    }

    #[test]
    fn test_earth_velocity() {
        let (_, vel) = KeplerianEphemeris
            .state(SolarSystemBody::Earth, J2000_JD, 0.0)
            .unwrap();
        // about 30 km/s
        let km_s = vel.norm() * crate::constants::AU / 86400.0;
        assert!((29.0..31.5).contains(&km_s), "{km_s}");
    }

    #[test]
    fn test_sun_offset_from_barycenter() {
        let (sun, _) = KeplerianEphemeris
            .state(SolarSystemBody::Sun, 2460000.5, 0.0)
            .unwrap();
        // the Sun wanders up to about two solar radii from the barycenter
        assert!(sun.norm() < 0.011);
        assert!(sun.norm() > 1e-4);
    }

    #[test]
    fn test_moon_distance() {
        let eph = KeplerianEphemeris;
        for jd in [J2000_JD, 2455000.5, 2460310.25] {
            let (earth, _) = eph.state(SolarSystemBody::Earth, jd, 0.0).unwrap();
            let (moon, _) = eph.state(SolarSystemBody::Moon, jd, 0.0).unwrap();
            let km = (moon - earth).norm() * crate::constants::AU;
            assert!((350_000.0..410_000.0).contains(&km), "{km}");
        }
    }

    #[test]
    fn test_jupiter_radius() {
        let (jupiter, _) = KeplerianEphemeris
            .state(SolarSystemBody::Jupiter, J2000_JD, 0.0)
            .unwrap();
        assert!((4.9..5.5).contains(&jupiter.norm()));
    }

    #[test]
    fn test_coverage() {
        let eph = KeplerianEphemeris;
        assert!(eph.state(SolarSystemBody::Mars, 2300000.5, 0.0).is_err());
        assert_eq!(
            eph.state(SolarSystemBody::Mars, KEPLERIAN_END_JD, 1.0),
            Err(1)
        );
        assert!(eph.state(SolarSystemBody::Mars, KEPLERIAN_START_JD, 0.0).is_ok());
    }
}
