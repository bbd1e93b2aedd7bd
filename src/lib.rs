//! Precision astronomical time scales, barycentric time correction and apparent places of
//! stars and solar-system bodies.
//!
//! * [`time`]: two-double Julian Dates tagged with a timescale, UTC ↔ TAI ↔ TT, calendar
//!   formatting and Barycentric Julian Dates;
//! * [`objects`]: catalog stars and solar-system bodies with their astrometric, topocentric and
//!   horizon places;
//! * [`observers`]: the geocenter or a site on the Earth;
//! * [`skytime`]: the handle owning the ephemeris, opened lazily on first use.

pub mod constants;
pub mod conversion;
pub mod earth_orientation;
pub mod env_state;
pub mod ephemeris;
pub mod objects;
pub mod observers;
pub mod place;
mod ref_system;
pub mod sesame;
pub mod skytime;
pub mod skytime_errors;
pub mod time;

pub use objects::{CelestialObject, CelestialPlace, EphemerisObject, HorizonOptions, SiderealObject};
pub use observers::{EarthObserver, Observer};
pub use place::{Accuracy, Refraction};
pub use skytime::Skytime;
pub use skytime_errors::SkytimeError;
pub use time::{Time, Timescale, TtDate};
