//! # Observers
//!
//! Where a place is computed from: the geocenter, or a site on the surface of the Earth.
//!
//! An [`EarthObserver`] stores WGS84 geodetic coordinates in radians and meters, plus the
//! local atmosphere used by [`Refraction::ObserverAtmosphere`](crate::place::Refraction).
//! Its fields are `NotNan`: every setter rejects NaN with
//! [`SkytimeError::InvalidArgument`], so a site can never carry an undefined coordinate
//! into the place kernels.
//!
//! ```rust
//! use skytime::observers::EarthObserver;
//!
//! let mut site = EarthObserver::default();
//! site.parse_lat_lon("+19 49 20.8", "-155 28 05.5")?;
//! site.set_height(4205.0)?;
//! assert_eq!(site.format_lat_lon(" "), "+19:49:20.80 -155:28:05.50");
//! # Ok::<(), skytime::skytime_errors::SkytimeError>(())
//! ```

use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::constants::{Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, RADEG};
use crate::conversion::{format_deg_lat, format_deg_lon, parse_deg_lat, parse_deg_lon};
use crate::place::OnSurface;
use crate::skytime_errors::SkytimeError;

/// Standard atmosphere of a new site.
const DEFAULT_TEMPERATURE: f64 = 10.0;
const DEFAULT_PRESSURE: f64 = 1010.0;

fn not_nan(name: &str, value: f64) -> Result<NotNan<f64>, SkytimeError> {
    NotNan::new(value)
        .map_err(|_| SkytimeError::InvalidArgument(format!("{name} must not be NaN")))
}

/// An observer on the surface of the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EarthObserver {
    latitude: NotNan<f64>,
    longitude: NotNan<f64>,
    height: NotNan<f64>,
    temperature: NotNan<f64>,
    pressure: NotNan<f64>,
}

impl Default for EarthObserver {
    /// Latitude, longitude and height zero, 10 °C and 1010 mbar.
    fn default() -> Self {
        let zero = NotNan::default();
        EarthObserver {
            latitude: zero,
            longitude: zero,
            height: zero,
            temperature: NotNan::new(DEFAULT_TEMPERATURE).unwrap_or(zero),
            pressure: NotNan::new(DEFAULT_PRESSURE).unwrap_or(zero),
        }
    }
}

impl EarthObserver {
    /// A site from geodetic latitude and east longitude (radians) and height (meters).
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::InvalidArgument`] when any value is NaN.
    pub fn new(latitude: Radian, longitude: Radian, height: Meter) -> Result<Self, SkytimeError> {
        let mut site = EarthObserver::default();
        site.set_latitude(latitude)?;
        site.set_longitude(longitude)?;
        site.set_height(height)?;
        Ok(site)
    }

    /// Geodetic WGS84 latitude, radians.
    pub fn latitude(&self) -> Radian {
        self.latitude.into_inner()
    }

    /// East-positive longitude, radians.
    pub fn longitude(&self) -> Radian {
        self.longitude.into_inner()
    }

    /// Height above the ellipsoid, meters.
    pub fn height(&self) -> Meter {
        self.height.into_inner()
    }

    /// Temperature, °C.
    pub fn temperature(&self) -> f64 {
        self.temperature.into_inner()
    }

    /// Pressure, mbar.
    pub fn pressure(&self) -> f64 {
        self.pressure.into_inner()
    }

    pub fn set_latitude(&mut self, latitude: Radian) -> Result<&mut Self, SkytimeError> {
        self.latitude = not_nan("latitude", latitude)?;
        Ok(self)
    }

    pub fn set_longitude(&mut self, longitude: Radian) -> Result<&mut Self, SkytimeError> {
        self.longitude = not_nan("longitude", longitude)?;
        Ok(self)
    }

    pub fn set_height(&mut self, height: Meter) -> Result<&mut Self, SkytimeError> {
        self.height = not_nan("height", height)?;
        Ok(self)
    }

    /// Set the local temperature (°C) and pressure (mbar) used by observer-supplied refraction.
    pub fn set_atmosphere(
        &mut self,
        temperature: f64,
        pressure: f64,
    ) -> Result<&mut Self, SkytimeError> {
        let temperature = not_nan("temperature", temperature)?;
        let pressure = not_nan("pressure", pressure)?;
        self.temperature = temperature;
        self.pressure = pressure;
        Ok(self)
    }

    /// Set latitude and longitude from sexagesimal degrees, `"±DD MM SS"` and `"±DDD MM SS"`.
    ///
    /// Nothing is changed when either string fails to parse.
    pub fn parse_lat_lon(&mut self, lat: &str, lon: &str) -> Result<&mut Self, SkytimeError> {
        let latitude = parse_deg_lat(lat)?;
        let longitude = parse_deg_lon(lon)?;
        self.set_latitude(latitude)?;
        self.set_longitude(longitude)
    }

    /// `"±DD:MM:SS.ss<separator>±DDD:MM:SS.ss"`.
    pub fn format_lat_lon(&self, separator: &str) -> String {
        format!(
            "{}{separator}{}",
            format_deg_lat(self.latitude()),
            format_deg_lon(self.longitude())
        )
    }

    /// The site in the units of the place kernels.
    pub fn to_on_surface(&self) -> OnSurface {
        OnSurface {
            latitude: self.latitude() / RADEG,
            longitude: self.longitude() / RADEG,
            height: self.height(),
            temperature: self.temperature(),
            pressure: self.pressure(),
        }
    }
}

impl fmt::Display for EarthObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.1} m", self.format_lat_lon(" "), self.height())
    }
}

/// Where a place is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Observer {
    #[default]
    Geocenter,
    Earth(EarthObserver),
}

impl Observer {
    /// The surface site, or [`SkytimeError::InvalidArgument`] for any other observer.
    pub fn earth_site(&self) -> Result<&EarthObserver, SkytimeError> {
        match self {
            Observer::Earth(site) => Ok(site),
            other => Err(SkytimeError::InvalidArgument(format!(
                "must provide an observer position on Earth; got {other}"
            ))),
        }
    }
}

impl From<EarthObserver> for Observer {
    fn from(site: EarthObserver) -> Self {
        Observer::Earth(site)
    }
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observer::Geocenter => f.write_str("geocenter"),
            Observer::Earth(site) => write!(f, "Earth observer at {site}"),
        }
    }
}

/// Geodetic latitude and height to normalized parallax coordinates.
///
/// Arguments
/// ---------
/// * `lat`: geodetic latitude, radians.
/// * `height`: height above the ellipsoid, meters.
///
/// Returns
/// -------
/// * `(ρ cos φ', ρ sin φ')`, in units of the equatorial radius, φ' being the geocentric
///   latitude:
///
/// ```text
/// u = atan2(sin φ · b/a, cos φ)
/// ρ sin φ' = b/a · sin u + h/a · sin φ
/// ρ cos φ' = cos u + h/a · cos φ
/// ```
pub fn lat_alt_to_parallax(lat: Radian, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

#[cfg(test)]
mod observer_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_site() {
        let site = EarthObserver::default();
        assert_eq!(site.latitude(), 0.0);
        assert_eq!(site.temperature(), 10.0);
        assert_eq!(site.pressure(), 1010.0);
        assert_eq!(site.to_on_surface(), OnSurface::default());
    }

    #[test]
    fn test_setters_reject_nan() {
        let mut site = EarthObserver::default();
        assert_eq!(
            site.set_latitude(f64::NAN).map(|_| ()),
            Err(SkytimeError::InvalidArgument("latitude must not be NaN".into()))
        );
        assert!(site.set_atmosphere(5.0, f64::NAN).is_err());
        // the failed call left the temperature untouched
        assert_eq!(site.temperature(), 10.0);
        assert!(EarthObserver::new(0.1, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_parse_and_format() {
        let mut site = EarthObserver::default();
        site.parse_lat_lon("+19 49 20.8", "-155 28 05.5").unwrap();
        assert_relative_eq!(
            site.latitude() / RADEG,
            19.0 + 49.0 / 60.0 + 20.8 / 3600.0,
            epsilon = 1e-12
        );
        assert_eq!(site.format_lat_lon(" "), "+19:49:20.80 -155:28:05.50");

        assert!(site.parse_lat_lon("+95 00 00", "0").is_err());
        assert_relative_eq!(site.longitude() / RADEG, -155.46819444444444, epsilon = 1e-10);
    }

    #[test]
    fn test_on_surface_units() {
        let mut site = EarthObserver::new(45.0 * RADEG, -70.0 * RADEG, 2500.0).unwrap();
        site.set_atmosphere(-5.0, 750.0).unwrap();
        let surface = site.to_on_surface();
        assert_relative_eq!(surface.latitude, 45.0, epsilon = 1e-12);
        assert_relative_eq!(surface.longitude, -70.0, epsilon = 1e-12);
        assert_eq!(surface.height, 2500.0);
        assert_eq!((surface.temperature, surface.pressure), (-5.0, 750.0));
    }

    #[test]
    fn test_earth_site() {
        let site = EarthObserver::default();
        assert!(Observer::from(site).earth_site().is_ok());
        assert_eq!(
            Observer::Geocenter.earth_site(),
            Err(SkytimeError::InvalidArgument(
                "must provide an observer position on Earth; got geocenter".into()
            ))
        );
    }

    #[test]
    fn test_lat_alt_to_parallax() {
        let (c, s) = lat_alt_to_parallax(0.0, 0.0);
        assert_eq!((c, s), (1.0, 0.0));

        let (c, s) = lat_alt_to_parallax(std::f64::consts::FRAC_PI_2, 0.0);
        assert!(c.abs() < 1e-15);
        assert_relative_eq!(s, EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS, epsilon = 1e-15);

        // Pan-STARRS 1, 20.7°N at 3067 m
        let (c, s) = lat_alt_to_parallax(20.707233557 * RADEG, 3067.694);
        assert_relative_eq!(c, 0.936241, epsilon = 1e-6);
        assert_relative_eq!(s, 0.351543, epsilon = 1e-6);
    }
}
