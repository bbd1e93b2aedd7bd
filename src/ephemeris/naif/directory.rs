//! Segment directory of Chebyshev SPK segments.
//!
//! Types 2 and 3 end with four doubles: the start epoch of the first record, the interval
//! covered by each record, the record size in words and the number of records.

use std::io::{Read, Seek, SeekFrom};

use nom::{number::complete::le_f64, IResult};

use crate::skytime_errors::SkytimeError;

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    /// Start of the first record, TDB seconds past J2000.
    pub init: f64,
    /// Seconds covered by each record.
    pub intlen: f64,
    /// Record size in double precision words.
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    /// Read the directory closing a segment.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: the kernel, positioned anywhere.
    /// * `initial_addr`, `final_addr`: first and last words of the segment (1-based), from its
    ///   summary.
    ///
    /// Return
    /// ----------
    /// * The directory, or [`SkytimeError::NomParsingError`] when its records do not exactly
    ///   fill the segment.
    pub fn parse<R: Read + Seek>(
        reader: &mut R,
        initial_addr: usize,
        final_addr: usize,
    ) -> Result<Self, SkytimeError> {
        if initial_addr < 1 || final_addr < initial_addr + 3 {
            return Err(SkytimeError::NomParsingError(format!(
                "segment words {initial_addr}..={final_addr} leave no room for a directory"
            )));
        }

        let mut buffer = [0u8; 32];
        reader.seek(SeekFrom::Start(((final_addr - 4) * 8) as u64))?;
        reader.read_exact(&mut buffer)?;

        let (_, [init, intlen, rsize, n_records]) = directory_words(buffer.as_slice())
            .map_err(|e| SkytimeError::NomParsingError(e.to_string()))?;

        let inconsistent = || {
            SkytimeError::NomParsingError(format!(
                "inconsistent segment directory (intlen {intlen}, rsize {rsize}, n {n_records})"
            ))
        };
        let whole = |value: f64, min: f64| value.is_finite() && value >= min && value.fract() == 0.0;
        if !intlen.is_finite() || intlen <= 0.0 || !whole(rsize, 3.0) || !whole(n_records, 1.0) {
            return Err(inconsistent());
        }

        // the records and the four directory words fill the segment exactly
        let (rsize, n_records) = (rsize as usize, n_records as usize);
        let segment_words = final_addr - initial_addr + 1;
        let filled = rsize
            .checked_mul(n_records)
            .and_then(|words| words.checked_add(4));
        if filled != Some(segment_words) {
            return Err(inconsistent());
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize,
            n_records,
        })
    }

    /// Index of the record covering `et`, clamped to the available records.
    pub fn record_index(&self, et: f64) -> usize {
        let idx = ((et - self.init) / self.intlen).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(self.n_records - 1)
        }
    }
}

fn directory_words(input: &[u8]) -> IResult<&[u8], [f64; 4]> {
    let (input, init) = le_f64(input)?;
    let (input, intlen) = le_f64(input)?;
    let (input, rsize) = le_f64(input)?;
    let (input, n_records) = le_f64(input)?;
    Ok((input, [init, intlen, rsize, n_records]))
}

#[cfg(test)]
mod directory_test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_directory() {
        // three records of 11 words, then the directory: 37 words in total
        let mut bytes = vec![0u8; 33 * 8];
        for value in [-14200747200.0f64, 1382400.0, 11.0, 3.0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let dir = DirectoryData::parse(&mut Cursor::new(bytes), 1, 37).unwrap();
        assert_eq!(
            dir,
            DirectoryData {
                init: -14200747200.0,
                intlen: 1382400.0,
                rsize: 11,
                n_records: 3,
            }
        );

        assert_eq!(dir.record_index(-14200747200.0), 0);
        assert_eq!(dir.record_index(-14200747200.0 + 1382400.0 * 1.5), 1);
        assert_eq!(dir.record_index(1e12), 2);
        assert_eq!(dir.record_index(-1e12), 0);
    }

    #[test]
    fn test_bad_directory() {
        let bytes = vec![0u8; 32];
        assert!(matches!(
            DirectoryData::parse(&mut Cursor::new(bytes.clone()), 1, 4),
            Err(SkytimeError::NomParsingError(_))
        ));
        assert!(DirectoryData::parse(&mut Cursor::new(bytes), 1, 2).is_err());
    }

    #[test]
    fn test_directory_must_fill_segment() {
        let directory = |rsize: f64, n_records: f64| {
            let mut bytes = vec![0u8; 33 * 8];
            for value in [0.0f64, 100.0, rsize, n_records] {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            DirectoryData::parse(&mut Cursor::new(bytes), 1, 37)
        };

        assert!(directory(11.0, 3.0).is_ok());
        for (rsize, n_records) in [
            (11.0, 1e15),
            (11.0, 4.0),
            (1e300, 3.0),
            (f64::MAX, f64::MAX),
            (11.0, 2.5),
            (f64::NAN, 3.0),
        ] {
            assert!(
                matches!(
                    directory(rsize, n_records),
                    Err(SkytimeError::NomParsingError(_))
                ),
                "rsize {rsize}, n {n_records}"
            );
        }
    }
}
