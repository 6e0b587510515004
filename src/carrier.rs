//! Carrier frequency bands and associated methods
use crate::constants::*;
use crate::constellation::Constellation;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frequency bands addressed by the RTCM3 observation messages. The
/// band identifiers 1..=7 follow the RINEX-3 observation code digits:
/// 1 = L1/E1/B1, 2 = L2/B1(2), 3 = L5/E5a, 4 = L6/LEX/B3, 5 = E5b/B2,
/// 6 = E5(a+b), 7 = Glonass G3.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// L1 (GPS, SBAS, QZSS), E1 (Galileo), G1 (Glonass), B1I (BDS)
    #[default]
    L1,
    /// L2 (GPS, QZSS), G2 (Glonass), B2 (BDS, remapped slot)
    L2,
    /// L5 (GPS, SBAS, QZSS), E5a (Galileo), B3 (BDS, remapped slot)
    L5,
    /// E6 (Galileo), LEX/L6 (QZSS)
    L6,
    /// E5b (Galileo)
    E5b,
    /// E5(a+b) (Galileo)
    E5ab,
    /// Glonass G3 (CDMA)
    G3,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unknown frequency band {0}")]
    UnknownBand(u8),
}

impl Carrier {
    /// Builds Self from a band identifier in 1..=7
    pub fn from_band(band: u8) -> Result<Self, Error> {
        match band {
            1 => Ok(Self::L1),
            2 => Ok(Self::L2),
            3 => Ok(Self::L5),
            4 => Ok(Self::L6),
            5 => Ok(Self::E5b),
            6 => Ok(Self::E5ab),
            7 => Ok(Self::G3),
            b => Err(Error::UnknownBand(b)),
        }
    }

    /// Band identifier in 1..=7
    pub const fn band(&self) -> u8 {
        match self {
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L5 => 3,
            Self::L6 => 4,
            Self::E5b => 5,
            Self::E5ab => 6,
            Self::G3 => 7,
        }
    }

    /// Carrier frequency (Hz) of this band for the given
    /// constellation. Glonass G1/G2 are FDMA: the frequency channel
    /// number `fcn` (-7..=6) is required, from the ephemeris record or
    /// the MSM extended satellite information.
    pub fn frequency(&self, c: Constellation, fcn: Option<i8>) -> Option<f64> {
        match (self, c) {
            (Self::L1, Constellation::Glonass) => {
                Some(FREQ1_GLO + DFRQ1_GLO * fcn? as f64)
            },
            (Self::L2, Constellation::Glonass) => {
                Some(FREQ2_GLO + DFRQ2_GLO * fcn? as f64)
            },
            (Self::G3, Constellation::Glonass) => Some(FREQ3_GLO),
            (Self::L1, Constellation::BeiDou) => Some(FREQ1_CMP),
            (Self::L2, Constellation::BeiDou) => Some(FREQ2_CMP),
            (Self::L5, Constellation::BeiDou) => Some(FREQ3_CMP),
            (Self::L1, _) => Some(FREQ1),
            (Self::L2, Constellation::GPS | Constellation::QZSS) => Some(FREQ2),
            (Self::L5, _) => Some(FREQ5),
            (Self::L6, Constellation::Galileo | Constellation::QZSS) => Some(FREQ6),
            (Self::E5b, Constellation::Galileo) => Some(FREQ7),
            (Self::E5ab, Constellation::Galileo) => Some(FREQ8),
            _ => None,
        }
    }

    /// Carrier wave length (m), see [Carrier::frequency]
    pub fn wavelength(&self, c: Constellation, fcn: Option<i8>) -> Option<f64> {
        self.frequency(c, fcn).map(|freq| CLIGHT / freq)
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::L6 => write!(f, "L6"),
            Self::E5b => write!(f, "E5b"),
            Self::E5ab => write!(f, "E5(a+b)"),
            Self::G3 => write!(f, "G3"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn band_round_trip() {
        for band in 1..=7u8 {
            assert_eq!(Carrier::from_band(band).unwrap().band(), band);
        }
        assert!(Carrier::from_band(0).is_err());
        assert!(Carrier::from_band(8).is_err());
    }

    #[test]
    fn frequencies() {
        for (carrier, c, fcn, expected) in vec![
            (Carrier::L1, Constellation::GPS, None, 1.57542e9),
            (Carrier::L2, Constellation::GPS, None, 1.2276e9),
            (Carrier::L5, Constellation::Galileo, None, 1.17645e9),
            (Carrier::E5b, Constellation::Galileo, None, 1.20714e9),
            (Carrier::L1, Constellation::Glonass, Some(-7), 1.598_0625e9),
            (Carrier::L1, Constellation::Glonass, Some(0), 1.602e9),
            (Carrier::L2, Constellation::Glonass, Some(6), 1.248_625e9),
            (Carrier::L1, Constellation::BeiDou, None, 1.561098e9),
            (Carrier::L5, Constellation::BeiDou, None, 1.26852e9),
        ] {
            let freq = carrier.frequency(c, fcn);
            assert_eq!(freq, Some(expected), "{} {:?}", carrier, c);
        }
        // FDMA band without channel number
        assert_eq!(Carrier::L1.frequency(Constellation::Glonass, None), None);
        // L2 undefined for Galileo
        assert_eq!(Carrier::L2.frequency(Constellation::Galileo, None), None);
    }

    #[test]
    fn wavelengths() {
        let lambda = Carrier::L1.wavelength(Constellation::GPS, None).unwrap();
        assert!((lambda - 0.19029367).abs() < 1e-7);
    }
}
