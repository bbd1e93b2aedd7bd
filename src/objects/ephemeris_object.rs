//! Solar-system bodies driven by the ephemeris.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ephemeris::{Origin, SolarSystemBody};
use crate::observers::Observer;
use crate::place::{astro_planet, topo_planet, Accuracy};
use crate::skytime::Skytime;
use crate::skytime_errors::SkytimeError;
use crate::time::{checked, Time, TtDate};

use super::{run_place_kernel, surface_of, CelestialPlace, SkyPlace};

/// The Sun, the Moon or a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EphemerisObject {
    body: SolarSystemBody,
}

impl EphemerisObject {
    /// Look a body up by name: `"mercury"` to `"pluto"`, `"sun"` or `"moon"`.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::InvalidArgument`] for any other name.
    pub fn new(name: &str) -> Result<Self, SkytimeError> {
        Ok(EphemerisObject {
            body: SolarSystemBody::from_str(name)?,
        })
    }

    pub fn body(&self) -> SolarSystemBody {
        self.body
    }

    /// `Ephemeris object "mars"`.
    pub fn describe(&self) -> String {
        format!("Ephemeris object \"{}\"", self.body)
    }

    /// Barycentric state `[[x, y, z], [vx, vy, vz]]`, AU and AU/day, ICRS axes.
    ///
    /// Arguments
    /// -----------------
    /// * `skytime`: handle of the ephemeris.
    /// * `time`: the instant, converted to TDB.
    /// * `tt_ok`: accept TT as a stand-in for TDB.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::UnsupportedTimescale`] when `time` cannot be brought to TDB.
    /// * [`SkytimeError::ExternalLibrary`] `("ephemeris", code)` when the body or the epoch is
    ///   not covered, or `("ephem_open", code)` when the ephemeris cannot be opened.
    pub fn ephem(
        &self,
        skytime: &Skytime,
        time: &Time,
        tt_ok: bool,
    ) -> Result<[[f64; 3]; 2], SkytimeError> {
        let tdb = time.as_tdb(tt_ok)?;
        let ephemeris = skytime.get_ephemeris()?;
        let state = checked(
            "ephemeris",
            ephemeris.state(self.body, (tdb.jd1(), tdb.jd2()), Origin::Barycentric),
            false,
        )?;
        Ok([state.position.into(), state.velocity.into()])
    }
}

impl From<SolarSystemBody> for EphemerisObject {
    fn from(body: SolarSystemBody) -> Self {
        EphemerisObject { body }
    }
}

impl CelestialPlace for EphemerisObject {
    fn astrometric_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        accuracy: Accuracy,
    ) -> Result<SkyPlace, SkytimeError> {
        let jd_tt = time.tt_date()?;
        run_place_kernel("astro_planet", skytime, |ephemeris| {
            astro_planet(ephemeris, jd_tt, self.body, accuracy)
        })
    }

    fn topocentric_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        observer: &Observer,
        delta_t: f64,
        accuracy: Accuracy,
    ) -> Result<SkyPlace, SkytimeError> {
        let site = surface_of(observer)?;
        let jd_tt = time.tt_date()?;
        run_place_kernel("topo_planet", skytime, |ephemeris| {
            topo_planet(ephemeris, jd_tt, delta_t, self.body, &site, accuracy)
        })
    }
}
