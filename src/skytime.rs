//! # Skytime: the ephemeris handle
//!
//! [`Skytime`] is the explicit initialisation handle of the crate. It owns:
//!
//! 1. the shared [`SkytimeEnv`] (HTTP agent for catalog lookups);
//! 2. the configured [`EphemFileSource`];
//! 3. the opened [`Ephemeris`], created on first use.
//!
//! Opening is lazy and idempotent: the first call to [`Skytime::get_ephemeris`] reads (and,
//! with the `jpl-download` feature, downloads) the dataset; later calls, from any thread,
//! reuse it. A failed open is not cached, so a later call tries again.
//!
//! ```rust
//! use skytime::skytime::Skytime;
//!
//! // built-in analytic ephemeris, no file needed
//! let skytime = Skytime::new("keplerian")?;
//! let ephemeris = skytime.get_ephemeris()?;
//! assert!(ephemeris.describe().starts_with("Analytic"));
//! # Ok::<(), skytime::skytime_errors::SkytimeError>(())
//! ```

use once_cell::sync::OnceCell;

use crate::env_state::SkytimeEnv;
use crate::ephemeris::source::EphemFileSource;
use crate::ephemeris::Ephemeris;
use crate::skytime_errors::SkytimeError;
use crate::time::checked;

/// Source used by [`Skytime::default`].
pub const DEFAULT_EPHEMERIS_SOURCE: &str = "keplerian";

#[derive(Debug, Clone)]
pub struct Skytime {
    env_state: SkytimeEnv,
    ephem_source: EphemFileSource,
    ephemeris: OnceCell<Ephemeris>,
}

impl Skytime {
    /// A handle on the given ephemeris source, `"naif:DE440"`, `"file:<path>"` or
    /// `"keplerian"`.
    ///
    /// Nothing is opened yet.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::InvalidEphemFileSource`] for an unknown source string.
    pub fn new(ephem_source: &str) -> Result<Self, SkytimeError> {
        Ok(Skytime {
            env_state: SkytimeEnv::new(),
            ephem_source: ephem_source.try_into()?,
            ephemeris: OnceCell::new(),
        })
    }

    pub fn ephem_source(&self) -> &EphemFileSource {
        &self.ephem_source
    }

    pub fn env_state(&self) -> &SkytimeEnv {
        &self.env_state
    }

    /// The opened ephemeris, opening it on first call.
    ///
    /// Errors
    /// ----------
    /// * [`SkytimeError::ExternalLibrary`] `("ephem_open", code)`: `1` file missing, `2` file
    ///   malformed, `3` download failure.
    pub fn get_ephemeris(&self) -> Result<&Ephemeris, SkytimeError> {
        self.ephemeris
            .get_or_try_init(|| checked("ephem_open", self.ephem_source.open(), false))
    }

    /// Whether the ephemeris has been opened.
    pub fn is_ephemeris_open(&self) -> bool {
        self.ephemeris.get().is_some()
    }
}

impl Default for Skytime {
    fn default() -> Self {
        Skytime {
            env_state: SkytimeEnv::new(),
            ephem_source: EphemFileSource::Keplerian,
            ephemeris: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod skytime_test {
    use super::*;

    fn assert_sync<T: Sync + Send>() {}

    #[test]
    fn test_skytime_is_sync() {
        assert_sync::<Skytime>();
    }

    #[test]
    fn test_lazy_open() {
        let skytime = Skytime::default();
        assert_eq!(skytime.ephem_source().to_string(), DEFAULT_EPHEMERIS_SOURCE);
        assert!(!skytime.is_ephemeris_open());

        let first = skytime.get_ephemeris().unwrap() as *const Ephemeris;
        let second = skytime.get_ephemeris().unwrap() as *const Ephemeris;
        assert_eq!(first, second);
        assert!(skytime.is_ephemeris_open());
    }

    #[test]
    fn test_invalid_source() {
        assert_eq!(
            Skytime::new("horizon:DE440").map(|_| ()),
            Err(SkytimeError::InvalidEphemFileSource("horizon:DE440".into()))
        );
    }

    #[test]
    fn test_open_failure_not_cached() {
        let skytime = Skytime::new("file:/nonexistent/skytime/de440.bsp").unwrap();
        for _ in 0..2 {
            assert_eq!(
                skytime.get_ephemeris().map(|_| ()),
                Err(SkytimeError::ExternalLibrary {
                    function: "ephem_open",
                    code: 1
                })
            );
        }
        assert!(!skytime.is_ephemeris_open());
    }

    #[test]
    fn test_concurrent_open() {
        let skytime = Skytime::default();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert!(skytime.get_ephemeris().is_ok()));
            }
        });
        assert!(skytime.is_ephemeris_open());
    }
}
