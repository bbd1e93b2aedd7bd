//! Published JPL planetary ephemerides distributed as SPK kernels.

use std::fmt;
use std::str::FromStr;

use crate::skytime_errors::SkytimeError;

/// Base URL of the generic planetary kernels on the NAIF server.
pub const NAIF_PLANETS_URL: &str = "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifVersion {
    DE421,
    DE430,
    DE432,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE441p1,
    DE441p2,
    DE442,
}

impl NaifVersion {
    pub const ALL: [NaifVersion; 10] = [
        NaifVersion::DE421,
        NaifVersion::DE430,
        NaifVersion::DE432,
        NaifVersion::DE435,
        NaifVersion::DE438,
        NaifVersion::DE440,
        NaifVersion::DE440s,
        NaifVersion::DE441p1,
        NaifVersion::DE441p2,
        NaifVersion::DE442,
    ];

    /// Name of the kernel in the NAIF distribution, e.g. `"de440.bsp"`.
    pub fn get_filename(&self) -> &'static str {
        match self {
            NaifVersion::DE421 => "de421.bsp",
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE432 => "de432.bsp",
            NaifVersion::DE435 => "de435.bsp",
            NaifVersion::DE438 => "de438.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE441p1 => "de441_part-1.bsp",
            NaifVersion::DE441p2 => "de441_part-2.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }

    /// Version label, the file name without its extension.
    pub fn label(&self) -> &'static str {
        self.get_filename().trim_end_matches(".bsp")
    }

    pub fn url(&self) -> String {
        format!("{NAIF_PLANETS_URL}/{}", self.get_filename())
    }
}

impl FromStr for NaifVersion {
    type Err = SkytimeError;

    /// Case-insensitive: `"DE440"`, `"de440"` and `"DE441_part-1"` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaifVersion::ALL
            .into_iter()
            .find(|version| version.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| SkytimeError::InvalidEphemFileSource(format!("unknown NAIF version {s}")))
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_uppercase())
    }
}
