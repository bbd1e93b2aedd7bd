//! # Constants and type definitions for skytime
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Julian Date epochs (POSIX, MJD, J2000)
//! - Astronomical and geophysical constants (AU, speed of light, WGS84 ellipsoid)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, hours ↔ radians)
//! - Type aliases documenting the unit carried by a plain `f64`

// -------------------------------------------------------------------------------------------------
// Julian Date epochs
// -------------------------------------------------------------------------------------------------

/// Julian Date of the POSIX epoch (1970-01-01T00:00:00 UTC)
pub const POSIX_EPOCH_JD: f64 = 2_440_587.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

/// Julian Date of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000_JD: f64 = 2_451_545.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Days per Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Days per Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// TT − TAI in seconds
pub const TT_MINUS_TAI: f64 = 32.184;

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in m/s
pub const VLIGHT_MS: f64 = VLIGHT * 1000.0;

/// Speed of light in astronomical units per day, as used for light-travel delays
pub const C_AUDAY: f64 = 173.144_632_684_669_3;

/// Heliocentric gravitational constant GM☉ in m³/s² (TDB-compatible)
pub const GS: f64 = 1.327_124_400_179_87e20;

/// Earth equatorial radius in meters (WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.314_245;

/// Earth radius expressed in astronomical units
pub const ERAU: f64 = (EARTH_MAJOR_AXIS / 1000.) / AU;

/// Earth/Moon mass ratio
pub const EARTH_MOON_MASS_RATIO: f64 = 81.300_568_94;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Milliarcseconds → radians
pub const RADMAS: f64 = RADSEC / 1000.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in milliarcseconds
pub type MilliArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Angle in hours (right ascension, hour angle)
pub type Hour = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Duration in seconds
pub type Second = f64;
/// Julian Date (days)
pub type JD = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
