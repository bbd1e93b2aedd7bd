//! Where an ephemeris comes from, and how it is opened.
//!
//! Sources are written as short strings:
//!
//! * `"naif:DE440"`: a JPL kernel looked up in the user cache directory
//!   (`<cache>/skytime_cache/jpl_ephem/de440.bsp`), downloaded from the NAIF server when
//!   missing and the `jpl-download` feature is enabled;
//! * `"file:/path/to/kernel.bsp"`: an explicit SPK file;
//! * `"keplerian"`: the built-in analytic ephemeris.
//!
//! Opening follows the kernel status convention: `1` file missing, `2` file unreadable or
//! malformed, `3` download failure. The underlying error is logged, since a status cannot
//! carry it.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use super::keplerian::KeplerianEphemeris;
use super::naif::naif_data::NaifData;
use super::naif::naif_version::NaifVersion;
use super::Ephemeris;
use crate::skytime_errors::SkytimeError;
use crate::time::calendar::KernelResult;

pub const FILE_MISSING: i32 = 1;
pub const FILE_MALFORMED: i32 = 2;
pub const DOWNLOAD_FAILED: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemFileSource {
    Naif(NaifVersion),
    File(Utf8PathBuf),
    Keplerian,
}

impl TryFrom<&str> for EphemFileSource {
    type Error = SkytimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("keplerian") {
            return Ok(EphemFileSource::Keplerian);
        }

        match value.split_once(':') {
            Some(("naif", version)) => version
                .parse()
                .map(EphemFileSource::Naif)
                .map_err(|_| SkytimeError::InvalidEphemFileSource(value.to_string())),
            Some(("file", path)) if !path.is_empty() => {
                Ok(EphemFileSource::File(Utf8PathBuf::from(path)))
            }
            _ => Err(SkytimeError::InvalidEphemFileSource(value.to_string())),
        }
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
            EphemFileSource::File(path) => write!(f, "file:{path}"),
            EphemFileSource::Keplerian => f.write_str("keplerian"),
        }
    }
}

/// `<cache>/skytime_cache/jpl_ephem`, if the platform has a cache directory.
pub fn cache_dir() -> Option<Utf8PathBuf> {
    let base_dirs = BaseDirs::new()?;
    let cache = Utf8Path::from_path(base_dirs.cache_dir())?;
    Some(cache.join("skytime_cache").join("jpl_ephem"))
}

fn read_kernel(path: &Utf8Path) -> KernelResult<Ephemeris> {
    if !path.exists() {
        tracing::error!(%path, "ephemeris file not found");
        return Err(FILE_MISSING);
    }

    match NaifData::read_naif_file(path) {
        Ok(naif) => {
            let ephemeris = Ephemeris::Naif(naif);
            if let Some(body) = ephemeris.missing_body() {
                tracing::warn!(%path, %body, "ephemeris file has no segment for this body");
            }
            tracing::debug!(%path, "opened SPK ephemeris");
            Ok((ephemeris, 0))
        }
        Err(err) => {
            tracing::error!(%path, error = %err, "unable to read the ephemeris file");
            Err(FILE_MALFORMED)
        }
    }
}

impl EphemFileSource {
    /// Local path of the kernel, `None` for the analytic ephemeris.
    pub fn local_path(&self) -> Option<Utf8PathBuf> {
        match self {
            EphemFileSource::Naif(version) => {
                cache_dir().map(|dir| dir.join(version.get_filename()))
            }
            EphemFileSource::File(path) => Some(path.clone()),
            EphemFileSource::Keplerian => None,
        }
    }

    /// Open the ephemeris, downloading it first when needed and allowed.
    pub fn open(&self) -> KernelResult<Ephemeris> {
        match self {
            EphemFileSource::Keplerian => {
                tracing::debug!("using the analytic mean-element ephemeris");
                Ok((Ephemeris::Keplerian(KeplerianEphemeris), 0))
            }
            EphemFileSource::File(path) => read_kernel(path),
            EphemFileSource::Naif(version) => {
                let Some(path) = self.local_path() else {
                    tracing::error!(source = %self, "no cache directory on this platform");
                    return Err(FILE_MISSING);
                };
                if !path.exists() {
                    fetch_kernel(*version, &path)?;
                }
                read_kernel(&path)
            }
        }
    }
}

#[cfg(feature = "jpl-download")]
fn fetch_kernel(version: NaifVersion, path: &Utf8Path) -> Result<(), i32> {
    super::download::download_kernel(&version.url(), path).map_err(|err| {
        tracing::error!(%path, error = %err, "ephemeris download failed");
        DOWNLOAD_FAILED
    })
}

#[cfg(not(feature = "jpl-download"))]
fn fetch_kernel(version: NaifVersion, path: &Utf8Path) -> Result<(), i32> {
    tracing::error!(
        %path,
        %version,
        "ephemeris file not cached and the jpl-download feature is disabled"
    );
    Err(FILE_MISSING)
}

#[cfg(test)]
mod source_test {
    use super::*;
    use crate::ephemeris::naif::naif_data::spk_fixture::{build_spk, SegmentSpec};
    use std::io::Write;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            EphemFileSource::try_from("naif:DE440").unwrap(),
            EphemFileSource::Naif(NaifVersion::DE440)
        );
        assert_eq!(
            EphemFileSource::try_from("naif:de421").unwrap(),
            EphemFileSource::Naif(NaifVersion::DE421)
        );
        assert_eq!(
            EphemFileSource::try_from("file:/data/de440.bsp").unwrap(),
            EphemFileSource::File(Utf8PathBuf::from("/data/de440.bsp"))
        );
        assert_eq!(
            EphemFileSource::try_from("keplerian").unwrap(),
            EphemFileSource::Keplerian
        );

        for bad in ["horizon:DE440", "naif:DE999", "file:", "de440", ""] {
            assert_eq!(
                EphemFileSource::try_from(bad),
                Err(SkytimeError::InvalidEphemFileSource(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["naif:DE440", "file:/tmp/x.bsp", "keplerian"] {
            let source = EphemFileSource::try_from(text).unwrap();
            assert_eq!(source.to_string(), text);
        }
    }

    #[test]
    fn test_local_path() {
        let source = EphemFileSource::try_from("naif:DE440").unwrap();
        if let Some(path) = source.local_path() {
            assert!(path.ends_with("skytime_cache/jpl_ephem/de440.bsp"));
        }
        assert_eq!(EphemFileSource::Keplerian.local_path(), None);
    }

    #[test]
    fn test_open_keplerian() {
        let (ephemeris, status) = EphemFileSource::Keplerian.open().unwrap();
        assert_eq!(status, 0);
        assert!(matches!(ephemeris, Ephemeris::Keplerian(_)));
    }

    #[test]
    fn test_open_missing_and_malformed() {
        let missing = EphemFileSource::File("/nonexistent/skytime/kernel.bsp".into());
        assert!(matches!(missing.open(), Err(FILE_MISSING)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a DAF file").unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();
        assert!(matches!(
            EphemFileSource::File(path).open(),
            Err(FILE_MALFORMED)
        ));

        // a record count larger than the segment
        let mut bytes = build_spk(&[SegmentSpec {
            target: 10,
            center: 0,
            init: -1.0e6,
            intlen: 2.0e6,
            records: vec![[vec![0.0], vec![0.0], vec![0.0]]],
        }]);
        let last = bytes.len() - 8;
        bytes[last..].copy_from_slice(&1e15f64.to_le_bytes());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();
        assert!(matches!(
            EphemFileSource::File(path).open(),
            Err(FILE_MALFORMED)
        ));
    }

    #[test]
    fn test_open_spk_file() {
        let bytes = build_spk(&[SegmentSpec {
            target: 10,
            center: 0,
            init: -1.0e6,
            intlen: 2.0e6,
            records: vec![[vec![0.0], vec![0.0], vec![0.0]]],
        }]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();

        let (ephemeris, _) = EphemFileSource::File(path).open().unwrap();
        assert!(matches!(ephemeris, Ephemeris::Naif(_)));
        assert_eq!(
            ephemeris.missing_body(),
            Some(crate::ephemeris::SolarSystemBody::Mercury)
        );
    }
}
