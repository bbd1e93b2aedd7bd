//! DAF file record (the first 1024 bytes of an SPK kernel).
//!
//! The file record carries the layout of every segment summary (`nd` doubles and `ni`
//! integers), the record numbers of the first and last summary records, and the binary
//! format tag. Only little-endian IEEE kernels (`LTL-IEEE`) are read by this crate; the
//! numeric fields of the record are decoded as little-endian before the tag is checked.

use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

/// Binary format tag of the kernels this crate can read.
pub const LITTLE_ENDIAN_IEEE: &str = "LTL-IEEE";

/// Size of a DAF physical record in bytes.
pub const DAF_RECORD_BYTES: usize = 1024;

/// Decoded DAF file record.
#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    /// Format identifier, `"DAF/SPK"` for an SPK kernel.
    pub idword: String,
    pub internal_filename: String,
    /// Number of double precision components in a segment summary.
    pub nd: i32,
    /// Number of integer components in a segment summary.
    pub ni: i32,
    /// Record number (1-based) of the first summary record.
    pub fward: i32,
    /// Record number (1-based) of the last summary record.
    pub bward: i32,
    /// First free address, in double precision words.
    pub free: i32,
    /// Binary format tag, `"LTL-IEEE"` or `"BIG-IEEE"`.
    pub locfmt: String,
}

impl DAFHeader {
    /// Parse the DAF file record.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: the first bytes of the kernel, at least 727 of them.
    ///
    /// Return
    /// ----------
    /// * The remaining input and the header, with the text fields trimmed.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, idword) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        // reserved area, then the FTP validation string
        let (input, _) = take(631usize)(input)?;

        let text = |bytes: &[u8]| String::from_utf8_lossy(bytes).trim().to_string();
        Ok((
            input,
            DAFHeader {
                idword: text(idword),
                internal_filename: text(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: text(locfmt),
            },
        ))
    }

    /// Summary size in double precision words: `nd + ceil(ni / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }

    /// Whether the numeric content is little-endian IEEE.
    pub fn is_little_endian(&self) -> bool {
        self.locfmt == LITTLE_ENDIAN_IEEE
    }
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\" (ND = {}, NI = {}, summaries in records {}..={}, {})",
            self.idword,
            self.internal_filename,
            self.nd,
            self.ni,
            self.fward,
            self.bward,
            self.locfmt
        )
    }
}

#[cfg(test)]
mod daf_header_test {
    use super::*;

    fn file_record() -> Vec<u8> {
        let mut bytes = Vec::with_capacity(DAF_RECORD_BYTES);
        bytes.extend_from_slice(b"DAF/SPK ");
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&6i32.to_le_bytes());
        let mut name = b"NIO2SPK".to_vec();
        name.resize(60, b' ');
        bytes.extend_from_slice(&name);
        bytes.extend_from_slice(&62i32.to_le_bytes());
        bytes.extend_from_slice(&62i32.to_le_bytes());
        bytes.extend_from_slice(&14974889i32.to_le_bytes());
        bytes.extend_from_slice(b"LTL-IEEE");
        bytes.resize(DAF_RECORD_BYTES, 0);
        bytes
    }

    #[test]
    fn test_parse_daf_header() {
        let bytes = file_record();
        let (rest, header) = DAFHeader::parse(&bytes).unwrap();

        assert_eq!(rest.len(), DAF_RECORD_BYTES - 727);
        assert_eq!(header.idword, "DAF/SPK");
        assert_eq!(header.internal_filename, "NIO2SPK");
        assert_eq!((header.nd, header.ni), (2, 6));
        assert_eq!((header.fward, header.bward, header.free), (62, 62, 14974889));
        assert!(header.is_little_endian());
        assert_eq!(header.summary_words(), 5);
    }

    #[test]
    fn test_truncated_header() {
        let bytes = file_record();
        assert!(DAFHeader::parse(&bytes[..100]).is_err());
    }

    #[test]
    fn test_display() {
        let (_, header) = DAFHeader::parse(&file_record()).unwrap();
        assert_eq!(
            format!("{header}"),
            "DAF/SPK \"NIO2SPK\" (ND = 2, NI = 6, summaries in records 62..=62, LTL-IEEE)"
        );
    }
}
