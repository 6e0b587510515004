//! Space vehicles
use crate::constellation::Constellation;
use hifitime::TimeScale;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Total number of satellite index slots, all constellations included.
pub const MAX_SAT: usize = 164;

/// SV describes a Satellite Vehicle
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SV {
    /// `GNSS` Constellation to which this vehicle is tied to
    pub constellation: Constellation,
    /// PRN identification # for this vehicle
    pub prn: u8,
}

/// Parsing & identification related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("constellation parsing error")]
    ConstellationParsing(#[from] crate::constellation::ParsingError),
    #[error("sv prn# parsing error")]
    PRNParsing(#[from] std::num::ParseIntError),
}

impl SV {
    /// Builds a new SV
    pub fn new(constellation: Constellation, prn: u8) -> Self {
        Self { constellation, prn }
    }

    /// Builds a new SV when `prn` lies inside the constellation
    /// addressing range, None otherwise.
    pub fn try_new(constellation: Constellation, prn: u8) -> Option<Self> {
        if constellation.prn_range().contains(&prn) {
            Some(Self { constellation, prn })
        } else {
            None
        }
    }

    /// Returns the Timescale of which this SV is a part of.
    pub fn timescale(&self) -> Option<TimeScale> {
        self.constellation.timescale()
    }

    /// Opaque satellite index in `0..MAX_SAT`: each constellation owns
    /// a contiguous block, in the order GPS, Glonass, Galileo, QZSS,
    /// BeiDou, LEO, SBAS. None when the PRN is outside the
    /// constellation range.
    pub fn index(&self) -> Option<usize> {
        if !self.constellation.prn_range().contains(&self.prn) {
            return None;
        }
        let mut base = 0;
        for c in Constellation::ALL {
            if c == self.constellation {
                return Some(base + (self.prn - c.prn_range().start()) as usize);
            }
            base += c.nsat();
        }
        None
    }

    /// Inverse of [SV::index]
    pub fn from_index(index: usize) -> Option<SV> {
        let mut base = 0;
        for c in Constellation::ALL {
            if index < base + c.nsat() {
                return Some(SV::new(c, (index - base) as u8 + c.prn_range().start()));
            }
            base += c.nsat();
        }
        None
    }
}

impl std::str::FromStr for SV {
    type Err = ParsingError;
    /*
     * Parse SV from "XYY" standardized format
     */
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let constellation = Constellation::from_str(&string[0..1])?;
        let prn = string[1..].trim().parse::<u8>()?;
        Ok(SV::new(constellation, prn))
    }
}

impl std::fmt::Display for SV {
    /*
     * Prints self as XYY standard format
     */
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:x}{:02}", self.constellation, self.prn)
    }
}
