use thiserror::Error;

use crate::time::Timescale;

#[derive(Error, Debug)]
pub enum SkytimeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Illegal timescale name \"{0}\"")]
    InvalidTimescale(String),

    #[error("No implementation for operation in the {0} timescale")]
    UnsupportedTimescale(Timescale),

    #[error("Kernel error code #{code} in function {function}")]
    ExternalLibrary { function: &'static str, code: i32 },

    #[error("Simbad/Sesame lookup failed: {0}")]
    LookupFailure(String),

    #[error("Invalid ephemeris file source: {0}")]
    InvalidEphemFileSource(String),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "jpl-download")]
    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl SkytimeError {
    /// Shorthand for a kernel status error.
    pub(crate) fn kernel(function: &'static str, code: i32) -> Self {
        SkytimeError::ExternalLibrary { function, code }
    }
}

impl PartialEq for SkytimeError {
    fn eq(&self, other: &Self) -> bool {
        use SkytimeError::*;
        match (self, other) {
            (InvalidArgument(a), InvalidArgument(b)) => a == b,
            (InvalidTimescale(a), InvalidTimescale(b)) => a == b,
            (UnsupportedTimescale(a), UnsupportedTimescale(b)) => a == b,
            (
                ExternalLibrary {
                    function: f1,
                    code: c1,
                },
                ExternalLibrary {
                    function: f2,
                    code: c2,
                },
            ) => f1 == f2 && c1 == c2,
            (LookupFailure(a), LookupFailure(b)) => a == b,
            (InvalidEphemFileSource(a), InvalidEphemFileSource(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,

            // transport errors carry no comparable payload
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (IoError(_), IoError(_)) => true,
            #[cfg(feature = "jpl-download")]
            (ReqwestError(_), ReqwestError(_)) => true,

            _ => false,
        }
    }
}

/// Turn a kernel status code into a result.
///
/// A zero status is success. Status `1` flags a "dubious year" (a date extrapolated beyond the
/// tabulated leap-second data) and is only accepted when `dubious_ok` is set; every other
/// non-zero status is fatal.
///
/// Arguments
/// ---------
/// * `function`: name of the kernel routine that produced the status.
/// * `code`: the status code.
/// * `dubious_ok`: whether the dubious-year status may pass.
///
/// Return
/// ----------
/// * `Ok(())` or [`SkytimeError::ExternalLibrary`] carrying `function` and `code`.
pub(crate) fn check_status(
    function: &'static str,
    code: i32,
    dubious_ok: bool,
) -> Result<(), SkytimeError> {
    match code {
        0 => Ok(()),
        1 if dubious_ok => {
            tracing::warn!(function, "dubious year tolerated on caller request");
            Ok(())
        }
        _ => Err(SkytimeError::kernel(function, code)),
    }
}
