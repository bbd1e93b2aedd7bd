//! Catalog stars.

use serde::{Deserialize, Serialize};

use crate::constants::{MilliArcSec, Radian, J2000_JD, RADEG, RADH};
use crate::conversion::{format_deg_lat, format_hours, parse_deg_lat, parse_hours};
use crate::observers::Observer;
use crate::place::{astro_star, topo_star, Accuracy, CatEntry};
use crate::sesame::{parse_sesame_response, sesame_url};
use crate::skytime::Skytime;
use crate::skytime_errors::SkytimeError;
use crate::time::{Time, Timescale, TtDate};

use super::{run_place_kernel, surface_of, CelestialPlace, SkyPlace};

fn reject_non_finite(name: &str, value: f64) -> Result<f64, SkytimeError> {
    if !value.is_finite() {
        Err(SkytimeError::InvalidArgument(format!("{name} must be finite")))
    } else {
        Ok(value)
    }
}

/// A star with its ICRS position at `promoepoch` and its space motion.
///
/// Fields
/// -----------------
/// * `ra`, `dec`: ICRS position, radians.
/// * `promora`: proper motion in right ascension, multiplied by cos(dec), mas/yr.
/// * `promodec`: proper motion in declination, mas/yr.
/// * `parallax`: mas; zero or negative means "very far away".
/// * `vradial`: radial velocity, km/s, positive receding.
/// * `promoepoch`: TDB Julian Date of the position, J2000.0 by default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiderealObject {
    ra: Radian,
    dec: Radian,
    promora: MilliArcSec,
    promodec: MilliArcSec,
    parallax: MilliArcSec,
    vradial: f64,
    promoepoch: f64,
}

impl Default for SiderealObject {
    fn default() -> Self {
        SiderealObject {
            ra: 0.0,
            dec: 0.0,
            promora: 0.0,
            promodec: 0.0,
            parallax: 0.0,
            vradial: 0.0,
            promoepoch: J2000_JD,
        }
    }
}

impl SiderealObject {
    /// A motionless star at `(ra, dec)` radians.
    pub fn new(ra: Radian, dec: Radian) -> Result<Self, SkytimeError> {
        let mut object = SiderealObject::default();
        object.set_ra_dec(ra, dec)?;
        Ok(object)
    }

    pub fn ra(&self) -> Radian {
        self.ra
    }

    pub fn dec(&self) -> Radian {
        self.dec
    }

    pub fn promora(&self) -> MilliArcSec {
        self.promora
    }

    pub fn promodec(&self) -> MilliArcSec {
        self.promodec
    }

    pub fn parallax(&self) -> MilliArcSec {
        self.parallax
    }

    pub fn vradial(&self) -> f64 {
        self.vradial
    }

    pub fn promoepoch(&self) -> f64 {
        self.promoepoch
    }

    pub fn set_ra(&mut self, ra: Radian) -> Result<&mut Self, SkytimeError> {
        self.ra = reject_non_finite("ra", ra)?;
        Ok(self)
    }

    pub fn set_dec(&mut self, dec: Radian) -> Result<&mut Self, SkytimeError> {
        self.dec = reject_non_finite("dec", dec)?;
        Ok(self)
    }

    /// Set both coordinates, radians; nothing changes if either is NaN.
    pub fn set_ra_dec(&mut self, ra: Radian, dec: Radian) -> Result<&mut Self, SkytimeError> {
        let ra = reject_non_finite("ra", ra)?;
        let dec = reject_non_finite("dec", dec)?;
        self.ra = ra;
        self.dec = dec;
        Ok(self)
    }

    pub fn set_promora(&mut self, promora: MilliArcSec) -> Result<&mut Self, SkytimeError> {
        self.promora = reject_non_finite("promora", promora)?;
        Ok(self)
    }

    pub fn set_promodec(&mut self, promodec: MilliArcSec) -> Result<&mut Self, SkytimeError> {
        self.promodec = reject_non_finite("promodec", promodec)?;
        Ok(self)
    }

    /// Set both proper-motion components, mas/yr.
    pub fn set_proper_motion(
        &mut self,
        promora: MilliArcSec,
        promodec: MilliArcSec,
    ) -> Result<&mut Self, SkytimeError> {
        let promora = reject_non_finite("promora", promora)?;
        let promodec = reject_non_finite("promodec", promodec)?;
        self.promora = promora;
        self.promodec = promodec;
        Ok(self)
    }

    pub fn set_parallax(&mut self, parallax: MilliArcSec) -> Result<&mut Self, SkytimeError> {
        self.parallax = reject_non_finite("parallax", parallax)?;
        Ok(self)
    }

    pub fn set_vradial(&mut self, vradial: f64) -> Result<&mut Self, SkytimeError> {
        self.vradial = reject_non_finite("vradial", vradial)?;
        Ok(self)
    }

    /// Set the epoch of the catalog position, a TDB Julian Date.
    pub fn set_promoepoch(&mut self, promoepoch: f64) -> Result<&mut Self, SkytimeError> {
        self.promoepoch = reject_non_finite("promoepoch", promoepoch)?;
        Ok(self)
    }

    /// Set the proper-motion epoch from a calendar date.
    ///
    /// The date is converted to TT and used as a TDB Julian Date; the two differ by less
    /// than 2 ms, which is irrelevant for proper motions. Catalog epochs are rarely
    /// known to better than a day, so `Timescale::UTC` at 0h is the usual choice.
    ///
    /// Errors
    /// ----------
    /// * Any error of [`Time::from_calendar`] or [`Time::as_tt`].
    #[allow(clippy::too_many_arguments)]
    pub fn set_promoepoch_from_calendar(
        &mut self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: f64,
        timescale: Timescale,
        dubious_ok: bool,
    ) -> Result<&mut Self, SkytimeError> {
        let epoch = Time::from_calendar(year, month, day, hour, minute, second, timescale, dubious_ok)?
            .as_tt(dubious_ok)?;
        self.promoepoch = epoch.as_jd();
        Ok(self)
    }

    /// Set the position from sexagesimal text, `"HH MM SS.ss"` and `"±DD MM SS.s"`.
    pub fn parse_ra_dec(&mut self, ra: &str, dec: &str) -> Result<&mut Self, SkytimeError> {
        let ra = parse_hours(ra)?;
        let dec = parse_deg_lat(dec)?;
        self.set_ra_dec(ra, dec)
    }

    /// `"HH:MM:SS.sss ±DD:MM:SS.ss"`.
    pub fn format_ra_dec(&self) -> String {
        format!("{} {}", format_hours(self.ra), format_deg_lat(self.dec))
    }

    /// Fill the position, proper motion, parallax and radial velocity from the CDS Sesame
    /// name resolver.
    ///
    /// Only the fields present in the answer are changed. SIMBAD does not always move the
    /// position to J2000.0 for high proper-motion stars: check `promoepoch` for those.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::UreqHttpError`] when the request fails.
    /// * [`SkytimeError::LookupFailure`] when the resolver reports an error.
    pub fn from_sesame(&mut self, skytime: &Skytime, ident: &str) -> Result<&mut Self, SkytimeError> {
        let url = sesame_url(ident);
        tracing::debug!(%url, "querying Sesame");
        let response = skytime.env_state().get_from_url(url.as_str())?;
        parse_sesame_response(&response, self)?;
        Ok(self)
    }

    /// Multi-line summary of the catalog data.
    pub fn describe(&self) -> String {
        let epoch = Time::from_jd(self.promoepoch, Timescale::TDB);
        let epoch = epoch
            .format(0, true)
            .unwrap_or_else(|_| format!("JD {:.6}", epoch.as_jd()));
        [
            format!("ICRS J2000: {}", self.format_ra_dec()),
            format!(
                "Proper motion: {:+.2} {:+.2} mas/yr",
                self.promora, self.promodec
            ),
            format!("Parallax: {:.2} mas", self.parallax),
            format!("Radial velocity: {:+.2} km/s", self.vradial),
            format!("Proper-motion epoch: {epoch} [TDB]"),
        ]
        .join("\n")
    }

    /// The star in the units of the place kernels.
    pub(crate) fn to_cat_entry(&self) -> CatEntry {
        CatEntry {
            ra: self.ra.rem_euclid(crate::constants::DPI) / RADH,
            dec: self.dec / RADEG,
            promora: self.promora,
            promodec: self.promodec,
            parallax: self.parallax,
            radialvelocity: self.vradial,
        }
    }
}

impl CelestialPlace for SiderealObject {
    fn astrometric_place(
        &self,
        skytime: &Skytime,
        time: impl TtDate,
        accuracy: Accuracy,
    ) -> Result<SkyPlace, SkytimeError> {
        let jd_tt = time.tt_date()?;
        let star = self.to_cat_entry();
        run_place_kernel("astro_star", skytime, |ephemeris| {
            astro_star(ephemeris, jd_tt, &star, self.promoepoch, accuracy)
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
        let star = self.to_cat_entry();
        run_place_kernel("topo_star", skytime, |ephemeris| {
            topo_star(ephemeris, jd_tt, delta_t, &star, self.promoepoch, &site, accuracy)
        })
    }
}
