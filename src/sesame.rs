//! # Sesame name resolver
//!
//! The CDS Sesame service resolves an object name through SIMBAD, NED or VizieR and answers
//! with line-oriented records:
//!
//! ```text
//! # Vega    #Q22871218
//! #=S=Simbad (via url):    1
//! %@ 2043
//! %I.0 * alf Lyr
//! %J 279.23473479 +38.78368896 = 18:36:56.33 +38:47:01.2
//! %P +200.94 +286.23 [0.32 0.40 90] A 2007A&A...474..653V
//! %X 130.23 [0.36] A 2007A&A...474..653V
//! %V v -20.60 [0.2] A 1979IAUS...30...57E
//! ```
//!
//! Only `%J` (position, degrees), `%P` (proper motion, mas/yr), `%X` (parallax, mas) and
//! `%V` (radial velocity, km/s, third field) are used. A line starting with `#!` reports a
//! failed lookup.

use crate::constants::RADEG;
use crate::objects::SiderealObject;
use crate::skytime_errors::SkytimeError;

/// Base address of the resolver; the object name follows the `?`.
pub const SESAME_URL: &str = "http://cdsweb.u-strasbg.fr/cgi-bin/nph-sesame?";

/// The query URL for `ident`, percent-encoding everything but unreserved characters.
pub fn sesame_url(ident: &str) -> String {
    let mut url = String::from(SESAME_URL);
    for byte in ident.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{byte:02X}")),
        }
    }
    url
}

fn field(fields: &[&str], index: usize, line: &str) -> Result<f64, SkytimeError> {
    fields
        .get(index)
        .and_then(|text| text.parse::<f64>().ok())
        .ok_or_else(|| SkytimeError::LookupFailure(format!("malformed record \"{line}\"")))
}

/// Apply a Sesame answer to `object`.
///
/// The object is only updated when the whole answer is valid.
///
/// Errors
/// ----------
/// * [`SkytimeError::LookupFailure`] with the resolver message for a `#!` line, or when a
///   used record has a malformed number.
pub fn parse_sesame_response(
    response: &str,
    object: &mut SiderealObject,
) -> Result<(), SkytimeError> {
    let mut updated = *object;

    for line in response.lines() {
        if let Some(message) = line.strip_prefix("#!") {
            return Err(SkytimeError::LookupFailure(message.trim().to_string()));
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.first().copied() {
            Some("%J") => {
                let ra = field(&fields, 1, line)?;
                let dec = field(&fields, 2, line)?;
                updated.set_ra_dec(ra * RADEG, dec * RADEG)?;
            }
            Some("%P") => {
                let promora = field(&fields, 1, line)?;
                let promodec = field(&fields, 2, line)?;
                updated.set_proper_motion(promora, promodec)?;
            }
            Some("%X") => {
                updated.set_parallax(field(&fields, 1, line)?)?;
            }
            Some("%V") => {
                updated.set_vradial(field(&fields, 2, line)?)?;
            }
            _ => {}
        }
    }

    *object = updated;
    Ok(())
}
