//! Reader for JPL planetary ephemerides in the NAIF SPK format.
//!
//! An SPK kernel is a DAF container: a file record ([`daf_header`]), summary records
//! describing each segment ([`summary`]), and the segment data itself. Each segment holds
//! the state of a `target` body relative to a `center` body as Chebyshev records
//! ([`ephemeris_record`]) indexed by a trailing directory ([`directory`]).
//!
//! Bodies are designated by their NAIF integer codes: `0` for the Solar System barycenter,
//! `1..=9` for planetary system barycenters, `10` for the Sun, `199`, `299`, `399` for the
//! planets with satellites and `301` for the Moon.

pub mod daf_header;
pub mod directory;
pub mod ephemeris_record;
pub mod naif_data;
pub mod naif_version;
pub mod summary;

pub const SOLAR_SYSTEM_BARYCENTER: i32 = 0;
pub const SUN: i32 = 10;
pub const MOON: i32 = 301;
pub const EARTH: i32 = 399;

/// Human-readable name of a NAIF body code.
pub fn naif_name(code: i32) -> String {
    let name = match code {
        0 => "Solar System barycenter",
        1 => "Mercury barycenter",
        2 => "Venus barycenter",
        3 => "Earth-Moon barycenter",
        4 => "Mars barycenter",
        5 => "Jupiter barycenter",
        6 => "Saturn barycenter",
        7 => "Uranus barycenter",
        8 => "Neptune barycenter",
        9 => "Pluto barycenter",
        10 => "Sun",
        199 => "Mercury",
        299 => "Venus",
        301 => "Moon",
        399 => "Earth",
        499 => "Mars",
        _ => return format!("NAIF body {code}"),
    };
    name.to_string()
}
