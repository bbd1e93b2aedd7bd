//! Barycentric Julian Dates.

use crate::constants::{Radian, C_AUDAY};
use crate::ephemeris::{Origin, SolarSystemBody};
use crate::objects::SiderealObject;
use crate::ref_system::radec_to_unit;
use crate::skytime::Skytime;
use crate::skytime_errors::SkytimeError;

use super::{checked, Time};

impl Time {
    /// Move this time to the solar-system barycenter for a source at `(ra, dec)`.
    ///
    /// The time is first brought to TDB (see [`Time::as_tdb`]), then the Rømer delay
    /// `r · û / c` is added to `jd2`, `r` being the barycentric position of the geocenter
    /// and `û` the unit vector towards the source. `jd1` and the timescale tag are kept.
    ///
    /// Only the Rømer delay of a geocentric observer at infinite source distance is
    /// applied; the result is good to about 0.1 s. Left out, from largest to smallest:
    ///
    /// * Rømer delay of a solar-system source: up to ≈100 s;
    /// * position of the observatory on the Earth: 8 to 22 ms;
    /// * TT → TDB when `tt_ok` let a TT time through: ≈2 ms;
    /// * Einstein delay: ≈1 ms;
    /// * TT(BIPM) − TT(TAI): ≈30 µs;
    /// * elevation of the observatory: ≈10 µs;
    /// * Shapiro delay: ≈1 µs;
    /// * Earth orientation parameters: ≈1 µs;
    /// * ITRF vs geodetic coordinates: ≈30 ns.
    ///
    /// Arguments
    /// -----------------
    /// * `skytime`: handle of the ephemeris.
    /// * `ra`, `dec`: ICRS direction of the source, radians.
    /// * `tt_ok`: accept TT as a stand-in for TDB.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::UnsupportedTimescale`] when the time cannot be brought to TDB.
    /// * [`SkytimeError::ExternalLibrary`] `("ephemeris", code)` when the Earth position is
    ///   unavailable, or `("ephem_open", code)` when the ephemeris cannot be opened.
    pub fn to_barycentric(
        &self,
        skytime: &Skytime,
        ra: Radian,
        dec: Radian,
        tt_ok: bool,
    ) -> Result<Time, SkytimeError> {
        let mut tdb = self.as_tdb(tt_ok)?;
        let ephemeris = skytime.get_ephemeris()?;
        let earth = checked(
            "ephemeris",
            ephemeris.state(
                SolarSystemBody::Earth,
                (tdb.jd1, tdb.jd2),
                Origin::Barycentric,
            ),
            false,
        )?;

        let delay = earth.position.dot(&radec_to_unit(ra, dec)) / C_AUDAY;
        tdb.jd2 += delay;
        Ok(tdb)
    }

    /// Barycentric Julian Date of this time for a catalog star.
    ///
    /// The star's catalog position is used as is; its proper motion is ignored.
    pub fn as_bjd(
        &self,
        skytime: &Skytime,
        object: &SiderealObject,
        tt_ok: bool,
    ) -> Result<Time, SkytimeError> {
        self.to_barycentric(skytime, object.ra(), object.dec(), tt_ok)
    }

    /// [`Time::as_bjd`] accepting TT as TDB.
    pub fn as_bjd_default(
        &self,
        skytime: &Skytime,
        object: &SiderealObject,
    ) -> Result<Time, SkytimeError> {
        self.as_bjd(skytime, object, true)
    }
}

#[cfg(test)]
mod barycentric_test {
    use super::*;
    use crate::constants::{J2000_JD, RADEG};
    use crate::time::Timescale;

    /// Light time across one AU plus the Sun's wobble, days.
    const MAX_DELAY: f64 = 0.0058;

    #[test]
    fn test_delay_bounds_and_determinism() {
        let skytime = Skytime::default();
        let t = Time::from_jd(2455197.5, Timescale::TT);

        for (ra, dec) in [(0.0, 0.0), (1.0, 0.3), (4.9, -1.2), (3.0, 1.5)] {
            let star = SiderealObject::new(ra, dec).unwrap();
            let bjd = t.as_bjd_default(&skytime, &star).unwrap();
            let again = t.as_bjd_default(&skytime, &star).unwrap();
            assert_eq!(bjd, again);

            assert_eq!(bjd.timescale(), Timescale::TT);
            assert_eq!(bjd.jd1(), t.jd1());
            let delay = bjd.as_jd() - t.as_jd();
            assert!(delay.abs() <= MAX_DELAY, "{delay}");
        }
    }

    #[test]
    fn test_delay_sign() {
        let skytime = Skytime::default();
        let t = Time::from_jd(J2000_JD, Timescale::TDB);

        // early January the Earth sits near RA 6h40m: a source there is seen early
        let toward = t.to_barycentric(&skytime, 100.0 * RADEG, 23.0 * RADEG, false).unwrap();
        let away = t.to_barycentric(&skytime, 280.0 * RADEG, -23.0 * RADEG, false).unwrap();
        assert!(toward.as_jd() > t.as_jd() + 0.005);
        assert!(away.as_jd() < t.as_jd() - 0.005);
        assert_eq!(toward.timescale(), Timescale::TDB);
    }

    #[test]
    fn test_unsupported_timescale() {
        let skytime = Skytime::default();
        let star = SiderealObject::default();
        let t = Time::from_jd(J2000_JD, Timescale::TT);
        assert_eq!(
            t.as_bjd(&skytime, &star, false),
            Err(SkytimeError::UnsupportedTimescale(Timescale::TT))
        );
        let ut1 = Time::from_jd(J2000_JD, Timescale::UT1);
        assert_eq!(
            ut1.as_bjd_default(&skytime, &star),
            Err(SkytimeError::UnsupportedTimescale(Timescale::UT1))
        );
    }
}
