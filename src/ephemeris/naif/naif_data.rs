//! In-memory SPK kernel.
//!
//! [`NaifData::read_naif_file`] walks the chain of summary records, reads the directory of
//! every Chebyshev segment and loads all its records, so that later state queries never
//! touch the file again. Segments are indexed by their `(target, center)` pair; when a
//! kernel carries several segments for the same pair, they are all kept and searched in
//! file order.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use camino::Utf8Path;
use nalgebra::Vector3;
use nom::number::complete::le_f64;

use super::daf_header::{DAFHeader, DAF_RECORD_BYTES};
use super::directory::DirectoryData;
use super::ephemeris_record::EphemerisRecord;
use super::summary::{Summary, SPK_TYPE_CHEBYSHEV_POSITION, SPK_TYPE_CHEBYSHEV_STATE};
use crate::skytime_errors::SkytimeError;

/// Status of a state query for an epoch outside every matching segment.
pub const OUT_OF_COVERAGE: i32 = 1;
/// Status of a state query for a `(target, center)` pair absent from the kernel.
pub const MISSING_SEGMENT: i32 = 2;

/// Number of words in the control area of a summary record (next, previous, count).
const SUMMARY_CONTROL_WORDS: usize = 3;

#[derive(Debug, Clone)]
pub struct Segment {
    pub summary: Summary,
    pub directory: DirectoryData,
    pub records: Vec<EphemerisRecord>,
}

#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    pub(crate) segments: HashMap<(i32, i32), Vec<Segment>>,
}

fn nom_error<E: std::fmt::Display>(err: E) -> SkytimeError {
    SkytimeError::NomParsingError(err.to_string())
}

impl NaifData {
    /// Load an SPK kernel from disk.
    pub fn read_naif_file(path: &Utf8Path) -> Result<Self, SkytimeError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::from_reader(&mut reader)
    }

    /// Load an SPK kernel from any seekable byte source.
    ///
    /// Return
    /// ----------
    /// * The kernel, [`SkytimeError::IoError`] on a short read, or
    ///   [`SkytimeError::NomParsingError`] for anything that is not a little-endian SPK.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, SkytimeError> {
        let mut record = [0u8; DAF_RECORD_BYTES];
        reader.read_exact(&mut record)?;
        let (_, daf_header) = DAFHeader::parse(&record).map_err(nom_error)?;

        if daf_header.idword != "DAF/SPK" {
            return Err(SkytimeError::NomParsingError(format!(
                "not an SPK kernel (file id {:?})",
                daf_header.idword
            )));
        }
        if !daf_header.is_little_endian() {
            return Err(SkytimeError::NomParsingError(format!(
                "unsupported binary format {}",
                daf_header.locfmt
            )));
        }

        let summary_bytes = daf_header.summary_words() * 8;
        let mut segments: HashMap<(i32, i32), Vec<Segment>> = HashMap::new();

        let file_records = reader
            .seek(SeekFrom::End(0))?
            .div_ceil(DAF_RECORD_BYTES as u64);
        let mut visited = HashSet::new();

        let mut next = daf_header.fward;
        while next > 0 {
            if next as u64 > file_records || !visited.insert(next) {
                return Err(SkytimeError::NomParsingError(format!(
                    "broken summary record chain at record {next} ({file_records} records in file)"
                )));
            }
            reader.seek(SeekFrom::Start((next as u64 - 1) * DAF_RECORD_BYTES as u64))?;
            reader.read_exact(&mut record)?;

            let (input, next_record) = le_f64::<_, nom::error::Error<_>>(record.as_slice())
                .map_err(nom_error)?;
            let (input, _previous) =
                le_f64::<_, nom::error::Error<_>>(input).map_err(nom_error)?;
            let (_, nsum) = le_f64::<_, nom::error::Error<_>>(input).map_err(nom_error)?;

            for i in 0..nsum as usize {
                let start = SUMMARY_CONTROL_WORDS * 8 + i * summary_bytes;
                let Some(bytes) = record.get(start..start + summary_bytes) else {
                    return Err(SkytimeError::NomParsingError(format!(
                        "summary {i} overflows its record"
                    )));
                };
                let (_, summary) = Summary::parse(bytes).map_err(nom_error)?;

                if summary.data_type != SPK_TYPE_CHEBYSHEV_POSITION
                    && summary.data_type != SPK_TYPE_CHEBYSHEV_STATE
                {
                    tracing::warn!(
                        target = summary.target,
                        center = summary.center,
                        data_type = summary.data_type,
                        "skipping SPK segment of unsupported type"
                    );
                    continue;
                }

                let directory = DirectoryData::parse(
                    reader,
                    usize::try_from(summary.initial_addr).unwrap_or(0),
                    usize::try_from(summary.final_addr).unwrap_or(0),
                )?;
                let records = EphemerisRecord::parse(
                    reader,
                    summary.initial_addr as usize,
                    directory.rsize,
                    directory.n_records,
                    summary.data_type,
                )?;

                segments
                    .entry((summary.target, summary.center))
                    .or_default()
                    .push(Segment {
                        summary,
                        directory,
                        records,
                    });
            }

            // the summary records form a chain ended by 0
            next = next_record as i32;
        }

        Ok(NaifData {
            daf_header,
            segments,
        })
    }

    pub fn has_segment(&self, target: i32, center: i32) -> bool {
        self.segments.contains_key(&(target, center))
    }

    /// Covered interval `(start, end)` in TDB seconds past J2000, over all segments of the
    /// pair.
    pub fn coverage(&self, target: i32, center: i32) -> Option<(f64, f64)> {
        let segments = self.segments.get(&(target, center))?;
        segments.iter().fold(None, |acc, seg| {
            let (s, e) = (seg.summary.start_epoch, seg.summary.end_epoch);
            Some(match acc {
                None => (s, e),
                Some((s0, e0)) => (s0.min(s), e0.max(e)),
            })
        })
    }

    /// State of `target` relative to `center` at `et`, TDB seconds past J2000.
    ///
    /// Return
    /// ----------
    /// * Position (km) and velocity (km/s) in the kernel frame, or the status
    ///   [`MISSING_SEGMENT`] / [`OUT_OF_COVERAGE`].
    pub fn state_km(
        &self,
        target: i32,
        center: i32,
        et: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), i32> {
        let segments = self
            .segments
            .get(&(target, center))
            .ok_or(MISSING_SEGMENT)?;
        let segment = segments
            .iter()
            .find(|seg| seg.summary.covers(et))
            .ok_or(OUT_OF_COVERAGE)?;

        let record = segment
            .records
            .get(segment.directory.record_index(et))
            .ok_or(OUT_OF_COVERAGE)?;
        Ok(record.interpolate(et))
    }

    /// One line per segment, sorted by `(target, center)`.
    pub fn describe(&self) -> String {
        let mut keys: Vec<_> = self.segments.keys().collect();
        keys.sort();

        let mut out = format!("{}\n", self.daf_header);
        for key in keys {
            for segment in &self.segments[key] {
                out.push_str(&format!(
                    "  {} ({} records)\n",
                    segment.summary, segment.directory.n_records
                ));
            }
        }
        out
    }
}

/// Builders for small synthetic SPK kernels used by the tests of the ephemeris layer.
#[cfg(test)]
pub(crate) mod spk_fixture {
    use super::*;

    /// One type 2 segment: `(target, center, init, intlen, records)` where each record is
    /// `(x, y, z)` coefficient sets of equal length.
    pub struct SegmentSpec {
        pub target: i32,
        pub center: i32,
        pub init: f64,
        pub intlen: f64,
        pub records: Vec<[Vec<f64>; 3]>,
    }

    fn push_words(bytes: &mut Vec<u8>, words: &[f64]) {
        for w in words {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
    }

    /// Serialize a little-endian SPK kernel with a single summary record.
    pub fn build_spk(segments: &[SegmentSpec]) -> Vec<u8> {
        // file record
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"DAF/SPK ");
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&6i32.to_le_bytes());
        let mut name = b"SKYTIME TEST KERNEL".to_vec();
        name.resize(60, b' ');
        bytes.extend_from_slice(&name);
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(b"LTL-IEEE");
        bytes.resize(DAF_RECORD_BYTES, 0);

        // segment data starts with record 3
        let mut data = Vec::new();
        let mut summaries = Vec::new();
        let mut addr = 2 * DAF_RECORD_BYTES / 8 + 1;
        for spec in segments {
            let ncoeff = spec.records[0][0].len();
            let rsize = 2 + 3 * ncoeff;
            let initial = addr;
            for (k, coeffs) in spec.records.iter().enumerate() {
                let mid = spec.init + (k as f64 + 0.5) * spec.intlen;
                push_words(&mut data, &[mid, spec.intlen / 2.0]);
                for axis in coeffs {
                    push_words(&mut data, axis);
                }
            }
            push_words(
                &mut data,
                &[spec.init, spec.intlen, rsize as f64, spec.records.len() as f64],
            );
            addr += spec.records.len() * rsize + 4;

            let end_epoch = spec.init + spec.intlen * spec.records.len() as f64;
            let mut summary = Vec::new();
            push_words(&mut summary, &[spec.init, end_epoch]);
            for v in [spec.target, spec.center, 1, 2, initial as i32, (addr - 1) as i32] {
                summary.extend_from_slice(&v.to_le_bytes());
            }
            summaries.push(summary);
        }

        // summary record
        let mut record = Vec::new();
        push_words(&mut record, &[0.0, 0.0, segments.len() as f64]);
        for summary in summaries {
            record.extend_from_slice(&summary);
        }
        record.resize(DAF_RECORD_BYTES, 0);
        bytes.extend_from_slice(&record);

        bytes.extend_from_slice(&data);
        bytes
    }
}
