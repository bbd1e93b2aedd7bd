//! Chebyshev records of SPK types 2 and 3.
//!
//! A record holds the midpoint `mid` and half-width `radius` of its time span (TDB
//! seconds), followed by `n` Chebyshev coefficients for each of X, Y and Z in km. Type 3
//! records carry three more coefficient sets for the velocity in km/s; type 2 velocities
//! come from the derivative of the position series.
//!
//! With `t = (et - mid) / radius`, the position is `Σ c_k T_k(t)` and the type 2 velocity
//! is `Σ c_k T'_k(t) / radius`.

use std::io::{Read, Seek, SeekFrom};

use nalgebra::Vector3;

use super::summary::SPK_TYPE_CHEBYSHEV_STATE;
use crate::skytime_errors::SkytimeError;

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    /// Midpoint of the record, TDB seconds past J2000.
    pub mid: f64,
    /// Half-width of the record, seconds.
    pub radius: f64,
    /// Position coefficients (km), one set per axis.
    pub position: [Vec<f64>; 3],
    /// Velocity coefficients (km/s), type 3 only.
    pub velocity: Option<[Vec<f64>; 3]>,
}

impl EphemerisRecord {
    /// Decode one record from its words.
    ///
    /// Arguments
    /// -----------------
    /// * `words`: the `rsize` words of the record.
    /// * `data_type`: SPK type, 2 or 3.
    fn from_words(words: &[f64], data_type: i32) -> Result<Self, SkytimeError> {
        let sets = if data_type == SPK_TYPE_CHEBYSHEV_STATE {
            6
        } else {
            3
        };
        if words.len() < 2 + sets {
            return Err(SkytimeError::NomParsingError(format!(
                "SPK record of {} words is too short for type {data_type}",
                words.len()
            )));
        }

        let ncoeff = (words.len() - 2) / sets;
        let coefficients = |set: usize| words[2 + set * ncoeff..2 + (set + 1) * ncoeff].to_vec();

        Ok(EphemerisRecord {
            mid: words[0],
            radius: words[1],
            position: [coefficients(0), coefficients(1), coefficients(2)],
            velocity: (sets == 6).then(|| [coefficients(3), coefficients(4), coefficients(5)]),
        })
    }

    /// Read the contiguous records of a segment.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: the kernel.
    /// * `initial_addr`: first word of the segment (1-based).
    /// * `rsize`: record size in words.
    /// * `n_records`: number of records.
    /// * `data_type`: SPK type of the segment.
    pub fn parse<R: Read + Seek>(
        reader: &mut R,
        initial_addr: usize,
        rsize: usize,
        n_records: usize,
        data_type: i32,
    ) -> Result<Vec<Self>, SkytimeError> {
        let start = (initial_addr.saturating_sub(1) * 8) as u64;
        reader.seek(SeekFrom::Start(start))?;

        let mut buffer = vec![0u8; rsize * 8];
        let mut records = Vec::with_capacity(n_records);
        for _ in 0..n_records {
            reader.read_exact(&mut buffer)?;
            let words: Vec<f64> = buffer
                .chunks_exact(8)
                .map(|chunk| {
                    let mut word = [0u8; 8];
                    word.copy_from_slice(chunk);
                    f64::from_le_bytes(word)
                })
                .collect();
            records.push(Self::from_words(&words, data_type)?);
        }
        Ok(records)
    }

    /// Position (km) and velocity (km/s) at `et`, TDB seconds past J2000.
    ///
    /// The normalized time is clamped to `[-1, 1]`.
    pub fn interpolate(&self, et: f64) -> (Vector3<f64>, Vector3<f64>) {
        let t = ((et - self.mid) / self.radius).clamp(-1.0, 1.0);
        let ncoeff = self.position[0].len();

        // T_0 = 1, T_1 = t, T_n = 2t T_{n-1} - T_{n-2}
        let mut poly = vec![0.0; ncoeff.max(2)];
        poly[0] = 1.0;
        poly[1] = t;
        for n in 2..ncoeff {
            poly[n] = 2.0 * t * poly[n - 1] - poly[n - 2];
        }

        let series = |coefficients: &[f64], basis: &[f64]| -> f64 {
            coefficients.iter().zip(basis).map(|(c, b)| c * b).sum()
        };
        let position = Vector3::from_fn(|i, _| series(&self.position[i], &poly));

        let velocity = match &self.velocity {
            Some(coefficients) => {
                let nv = coefficients[0].len();
                let mut vpoly = vec![0.0; nv.max(2)];
                vpoly[0] = 1.0;
                vpoly[1] = t;
                for n in 2..nv {
                    vpoly[n] = 2.0 * t * vpoly[n - 1] - vpoly[n - 2];
                }
                Vector3::from_fn(|i, _| series(&coefficients[i], &vpoly))
            }
            None => {
                // T'_0 = 0, T'_1 = 1, T'_n = 2t T'_{n-1} + 2 T_{n-1} - T'_{n-2}
                let mut deriv = vec![0.0; ncoeff.max(2)];
                deriv[1] = 1.0;
                for n in 2..ncoeff {
                    deriv[n] = 2.0 * t * deriv[n - 1] + 2.0 * poly[n - 1] - deriv[n - 2];
                }
                Vector3::from_fn(|i, _| series(&self.position[i], &deriv)) / self.radius
            }
        };

        (position, velocity)
    }
}
