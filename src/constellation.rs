//! GNSS constellations known to the RTCM3 message set
use hifitime::TimeScale;
use std::ops::RangeInclusive;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constellation parsing & identification related errors
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParsingError {
    #[error("unknown constellation \"{0}\"")]
    Unknown(String),
}

/// Describes the `GNSS` constellations addressed by RTCM3 messages
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constellation {
    /// `GPS` american constellation
    #[default]
    GPS,
    /// `Glonass` russian constellation
    Glonass,
    /// `Galileo` european constellation
    Galileo,
    /// `QZSS` japanese constellation
    QZSS,
    /// `BeiDou` chinese constellation
    BeiDou,
    /// Low earth orbit augmentation vehicles
    LEO,
    /// `SBAS` geostationary augmentation vehicles
    SBAS,
}

impl Constellation {
    /// All constellations, in satellite-index block order.
    pub(crate) const ALL: [Constellation; 7] = [
        Constellation::GPS,
        Constellation::Glonass,
        Constellation::Galileo,
        Constellation::QZSS,
        Constellation::BeiDou,
        Constellation::LEO,
        Constellation::SBAS,
    ];

    /// Returns true if Self is an augmentation system
    pub fn is_sbas(&self) -> bool {
        *self == Constellation::SBAS
    }

    /// PRN numbers addressable for this constellation
    pub fn prn_range(&self) -> RangeInclusive<u8> {
        match self {
            Self::GPS => 1..=32,
            Self::Glonass => 1..=27,
            Self::Galileo => 1..=30,
            Self::QZSS => 193..=199,
            Self::BeiDou => 1..=35,
            Self::LEO => 1..=10,
            Self::SBAS => 120..=142,
        }
    }

    /// Number of satellite index slots reserved for this constellation
    pub(crate) fn nsat(&self) -> usize {
        let range = self.prn_range();
        (*range.end() - *range.start() + 1) as usize
    }

    /// Returns associated time scale. Returns None
    /// if related time scale is not supported.
    pub fn timescale(&self) -> Option<TimeScale> {
        match self {
            Self::GPS | Self::QZSS | Self::SBAS => Some(TimeScale::GPST),
            Self::Galileo => Some(TimeScale::GST),
            Self::BeiDou => Some(TimeScale::BDT),
            Self::Glonass => Some(TimeScale::UTC),
            Self::LEO => None,
        }
    }
}

impl std::str::FromStr for Constellation {
    type Err = ParsingError;
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let s = string.trim().to_lowercase();
        match s.as_str() {
            "g" | "gps" => Ok(Self::GPS),
            "r" | "glo" | "glonass" => Ok(Self::Glonass),
            "e" | "gal" | "galileo" => Ok(Self::Galileo),
            "j" | "qzss" => Ok(Self::QZSS),
            "c" | "bds" | "beidou" => Ok(Self::BeiDou),
            "l" | "leo" => Ok(Self::LEO),
            "s" | "sbas" | "geo" => Ok(Self::SBAS),
            _ => Err(ParsingError::Unknown(string.to_string())),
        }
    }
}

impl std::fmt::Display for Constellation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:X}", self)
    }
}

impl std::fmt::LowerHex for Constellation {
    /*
     * {:x}: formats Self as single letter standard code
     */
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GPS => write!(f, "G"),
            Self::Glonass => write!(f, "R"),
            Self::Galileo => write!(f, "E"),
            Self::QZSS => write!(f, "J"),
            Self::BeiDou => write!(f, "C"),
            Self::LEO => write!(f, "L"),
            Self::SBAS => write!(f, "S"),
        }
    }
}

impl std::fmt::UpperHex for Constellation {
    /*
     * {:X}: formats Self as 3 letter standard code
     */
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GPS => write!(f, "GPS"),
            Self::Glonass => write!(f, "GLO"),
            Self::Galileo => write!(f, "GAL"),
            Self::QZSS => write!(f, "QZSS"),
            Self::BeiDou => write!(f, "BDS"),
            Self::LEO => write!(f, "LEO"),
            Self::SBAS => write!(f, "SBAS"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn from_str() {
        for (desc, expected) in vec![
            ("G", Ok(Constellation::GPS)),
            ("GPS", Ok(Constellation::GPS)),
            ("R", Ok(Constellation::Glonass)),
            ("GLO", Ok(Constellation::Glonass)),
            ("E", Ok(Constellation::Galileo)),
            ("J", Ok(Constellation::QZSS)),
            ("C", Ok(Constellation::BeiDou)),
            ("BDS", Ok(Constellation::BeiDou)),
            ("S", Ok(Constellation::SBAS)),
        ] {
            assert_eq!(
                Constellation::from_str(desc),
                expected,
                "failed to parse constellation from \"{}\"",
                desc
            );
        }
        for desc in ["X", "GPX", "unknown"] {
            assert!(Constellation::from_str(desc).is_err());
        }
    }

    #[test]
    fn timescale() {
        for (gnss, expected) in [
            (Constellation::GPS, TimeScale::GPST),
            (Constellation::Galileo, TimeScale::GST),
            (Constellation::BeiDou, TimeScale::BDT),
            (Constellation::QZSS, TimeScale::GPST),
        ] {
            assert_eq!(gnss.timescale(), Some(expected));
        }
    }

    #[test]
    fn index_blocks_cover_all_systems() {
        let total: usize = Constellation::ALL.iter().map(|c| c.nsat()).sum();
        assert_eq!(total, crate::sv::MAX_SAT);
    }
}
