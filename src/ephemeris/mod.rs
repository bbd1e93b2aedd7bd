//! # Solar-system ephemerides
//!
//! Barycentric (or heliocentric) states of the Sun, the Moon and the planets, in AU and
//! AU/day, in the ICRS-aligned equatorial frame, at a two-part TDB Julian Date.
//!
//! Two backends sit behind [`Ephemeris`]:
//!
//! * [`NaifData`]: a JPL DE kernel in the NAIF SPK format, read once into memory;
//! * [`KeplerianEphemeris`]: a built-in mean-element model that needs no file.
//!
//! Every query follows the kernel convention of the crate: it returns the state with a
//! zero status, or an error status (`1` epoch outside the coverage, `2` body not in the
//! dataset).

pub mod keplerian;
pub mod naif;
pub mod source;

#[cfg(feature = "jpl-download")]
pub mod download;

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{AU, J2000_JD, SECONDS_PER_DAY};
use crate::skytime_errors::SkytimeError;
use crate::time::calendar::KernelResult;
use keplerian::KeplerianEphemeris;
use naif::naif_data::NaifData;
use naif::{EARTH, MOON, SOLAR_SYSTEM_BARYCENTER, SUN};

/// Bodies known to the ephemeris, with their conventional numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolarSystemBody {
    Mercury = 1,
    Venus = 2,
    Earth = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
    Sun = 10,
    Moon = 11,
}

impl SolarSystemBody {
    pub const ALL: [SolarSystemBody; 11] = [
        SolarSystemBody::Mercury,
        SolarSystemBody::Venus,
        SolarSystemBody::Earth,
        SolarSystemBody::Mars,
        SolarSystemBody::Jupiter,
        SolarSystemBody::Saturn,
        SolarSystemBody::Uranus,
        SolarSystemBody::Neptune,
        SolarSystemBody::Pluto,
        SolarSystemBody::Sun,
        SolarSystemBody::Moon,
    ];

    /// Lower-case name, e.g. `"mars"`.
    pub fn name(&self) -> &'static str {
        match self {
            SolarSystemBody::Mercury => "mercury",
            SolarSystemBody::Venus => "venus",
            SolarSystemBody::Earth => "earth",
            SolarSystemBody::Mars => "mars",
            SolarSystemBody::Jupiter => "jupiter",
            SolarSystemBody::Saturn => "saturn",
            SolarSystemBody::Uranus => "uranus",
            SolarSystemBody::Neptune => "neptune",
            SolarSystemBody::Pluto => "pluto",
            SolarSystemBody::Sun => "sun",
            SolarSystemBody::Moon => "moon",
        }
    }

    pub fn number(&self) -> i32 {
        *self as i32
    }

    /// NAIF segments to chain, `(target, center)` from the body down to the barycenter.
    ///
    /// Mercury and Venus have no satellites, so kernels may only carry their system
    /// barycenter: the planet segment is used when present.
    fn naif_chain(&self, naif: &NaifData) -> Vec<(i32, i32)> {
        let n = self.number();
        match self {
            SolarSystemBody::Sun => vec![(SUN, SOLAR_SYSTEM_BARYCENTER)],
            SolarSystemBody::Earth => vec![(EARTH, 3), (3, SOLAR_SYSTEM_BARYCENTER)],
            SolarSystemBody::Moon => vec![(MOON, 3), (3, SOLAR_SYSTEM_BARYCENTER)],
            SolarSystemBody::Mercury | SolarSystemBody::Venus
                if naif.has_segment(100 * n + 99, n) =>
            {
                vec![(100 * n + 99, n), (n, SOLAR_SYSTEM_BARYCENTER)]
            }
            _ => vec![(n, SOLAR_SYSTEM_BARYCENTER)],
        }
    }
}

impl FromStr for SolarSystemBody {
    type Err = SkytimeError;

    /// Case-insensitive body name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SolarSystemBody::ALL
            .into_iter()
            .find(|body| body.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SkytimeError::InvalidArgument(format!("unknown solar system body \"{s}\""))
            })
    }
}

impl fmt::Display for SolarSystemBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Origin of the returned states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Barycentric,
    Heliocentric,
}

/// Position (AU) and velocity (AU/day), ICRS axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    fn from_km(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector {
            position: position / AU,
            velocity: velocity * SECONDS_PER_DAY / AU,
        }
    }
}

impl std::ops::Sub for StateVector {
    type Output = StateVector;

    fn sub(self, rhs: StateVector) -> StateVector {
        StateVector {
            position: self.position - rhs.position,
            velocity: self.velocity - rhs.velocity,
        }
    }
}

/// An opened ephemeris dataset.
#[derive(Debug, Clone)]
pub enum Ephemeris {
    Naif(NaifData),
    Keplerian(KeplerianEphemeris),
}

impl Ephemeris {
    /// State of `body` at a two-part TDB Julian Date.
    ///
    /// Arguments
    /// -----------------
    /// * `body`: the body.
    /// * `jd_tdb`: `(jd1, jd2)`, TDB.
    /// * `origin`: barycentric or heliocentric.
    ///
    /// Return
    /// ----------
    /// * `Ok((state, 0))`, or `Err(1)` outside the coverage and `Err(2)` when the dataset
    ///   lacks a segment needed for the body.
    pub fn state(
        &self,
        body: SolarSystemBody,
        jd_tdb: (f64, f64),
        origin: Origin,
    ) -> KernelResult<StateVector> {
        let state = self.barycentric_state(body, jd_tdb)?;
        let state = match origin {
            Origin::Barycentric => state,
            Origin::Heliocentric => {
                state - self.barycentric_state(SolarSystemBody::Sun, jd_tdb)?
            }
        };
        Ok((state, 0))
    }

    fn barycentric_state(
        &self,
        body: SolarSystemBody,
        (jd1, jd2): (f64, f64),
    ) -> Result<StateVector, i32> {
        match self {
            Ephemeris::Naif(naif) => {
                let et = ((jd1 - J2000_JD) + jd2) * SECONDS_PER_DAY;
                let mut position = Vector3::zeros();
                let mut velocity = Vector3::zeros();
                for (target, center) in body.naif_chain(naif) {
                    let (p, v) = naif.state_km(target, center, et)?;
                    position += p;
                    velocity += v;
                }
                Ok(StateVector::from_km(position, velocity))
            }
            Ephemeris::Keplerian(model) => {
                let (position, velocity) = model.state(body, jd1, jd2)?;
                Ok(StateVector { position, velocity })
            }
        }
    }

    /// Check that every body can be served, returning the first missing one.
    pub(crate) fn missing_body(&self) -> Option<SolarSystemBody> {
        let Ephemeris::Naif(naif) = self else {
            return None;
        };
        SolarSystemBody::ALL.into_iter().find(|body| {
            body.naif_chain(naif)
                .iter()
                .any(|&(target, center)| !naif.has_segment(target, center))
        })
    }

    pub fn describe(&self) -> String {
        match self {
            Ephemeris::Naif(naif) => naif.describe(),
            Ephemeris::Keplerian(_) => "Analytic mean-element ephemeris (1800-2050)\n".to_string(),
        }
    }
}
