//! SPK segment summaries.

use std::fmt;

use hifitime::Epoch;
use nom::{
    number::complete::{le_f64, le_i32},
    IResult,
};

use super::naif_name;

/// Chebyshev polynomials for position only.
pub const SPK_TYPE_CHEBYSHEV_POSITION: i32 = 2;
/// Chebyshev polynomials for position and velocity.
pub const SPK_TYPE_CHEBYSHEV_STATE: i32 = 3;

/// Descriptor of one SPK segment (`nd = 2`, `ni = 6`).
#[derive(Debug, PartialEq, Clone)]
pub struct Summary {
    /// First covered epoch, TDB seconds past J2000.
    pub start_epoch: f64,
    /// Last covered epoch, TDB seconds past J2000.
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    /// First word of the segment (1-based address).
    pub initial_addr: i32,
    /// Last word of the segment (1-based address).
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;
        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    /// Whether the segment covers `et` (TDB seconds past J2000), bounds included.
    pub fn covers(&self, et: f64) -> bool {
        (self.start_epoch..=self.end_epoch).contains(&et)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} wrt {} (type {}) from {} to {}",
            naif_name(self.target),
            naif_name(self.center),
            self.data_type,
            Epoch::from_et_seconds(self.start_epoch),
            Epoch::from_et_seconds(self.end_epoch)
        )
    }
}
