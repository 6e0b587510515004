//! Observation codes: RINEX-3 style two character identifiers
//! (frequency band digit + tracking attribute), their frequency band
//! and the selection priority used when several codes of one band are
//! reported together.
use crate::carrier::Carrier;
use crate::constellation::Constellation;
use crate::opts::Options;
use lazy_static::lazy_static;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Every two character code known to the decoder, in code-id order.
    pub(crate) static ref KNOWN_CODES: Vec<&'static str> = vec![
        "1C", "1P", "1W", "1Y", "1M", "1N", "1S", "1L", "1E", "1A",
        "1B", "1X", "1Z", "2C", "2D", "2S", "2L", "2X", "2P", "2W",
        "2Y", "2M", "2N", "5I", "5Q", "5X", "7I", "7Q", "7X", "6A",
        "6B", "6C", "6X", "6Z", "6S", "6L", "8I", "8Q", "8X", "2I",
        "2Q", "6I", "6Q", "3I", "3Q", "3X", "1I", "1Q",
    ];
}

/// Observation code parsing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("unknown observation code \"{0}\"")]
    UnknownCode(String),
}

/// Observation code: the RINEX-3 signal identifier attached to every
/// decoded observable. `None` flags an empty signal slot.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum Code {
    #[default]
    None,
    L1C, L1P, L1W, L1Y, L1M, L1N, L1S, L1L, L1E, L1A,
    L1B, L1X, L1Z, L2C, L2D, L2S, L2L, L2X, L2P, L2W,
    L2Y, L2M, L2N, L5I, L5Q, L5X, L7I, L7Q, L7X, L6A,
    L6B, L6C, L6X, L6Z, L6S, L6L, L8I, L8Q, L8X, L2I,
    L2Q, L6I, L6Q, L3I, L3Q, L3X, L1I, L1Q,
}

impl Code {
    const ALL: [Code; 48] = [
        Code::L1C, Code::L1P, Code::L1W, Code::L1Y, Code::L1M,
        Code::L1N, Code::L1S, Code::L1L, Code::L1E, Code::L1A,
        Code::L1B, Code::L1X, Code::L1Z, Code::L2C, Code::L2D,
        Code::L2S, Code::L2L, Code::L2X, Code::L2P, Code::L2W,
        Code::L2Y, Code::L2M, Code::L2N, Code::L5I, Code::L5Q,
        Code::L5X, Code::L7I, Code::L7Q, Code::L7X, Code::L6A,
        Code::L6B, Code::L6C, Code::L6X, Code::L6Z, Code::L6S,
        Code::L6L, Code::L8I, Code::L8Q, Code::L8X, Code::L2I,
        Code::L2Q, Code::L6I, Code::L6Q, Code::L3I, Code::L3Q,
        Code::L3X, Code::L1I, Code::L1Q,
    ];

    /// Two character identifier, e.g "1C", or "" for [Code::None]
    pub fn as_str(&self) -> &'static str {
        match Self::ALL.iter().position(|c| c == self) {
            Some(index) => KNOWN_CODES[index],
            None => "",
        }
    }

    /// Frequency band identifier in 1..=7 carried by the leading code
    /// digit, with Glonass G3 ("3x" codes) assigned band 7.
    /// [Code::None] has no band and yields 0.
    pub fn band(&self) -> u8 {
        match self.as_str().as_bytes().first() {
            Some(b'1') => 1,
            Some(b'2') => 2,
            Some(b'5') => 3,
            Some(b'6') => 4,
            Some(b'7') => 5,
            Some(b'8') => 6,
            Some(b'3') => 7,
            _ => 0,
        }
    }

    /// [Carrier] matching [Code::band]
    pub fn carrier(&self) -> Option<Carrier> {
        Carrier::from_band(self.band()).ok()
    }

    /// Tracking attribute (second code character)
    pub(crate) fn attribute(&self) -> Option<char> {
        self.as_str().chars().nth(1)
    }

    /// Selection priority in 0..=15: 15 forced by a user override,
    /// 14..=1 from the per constellation preference strings, 0 unknown
    /// or disabled. Governs which code wins a frequency slot when
    /// several codes of one band are present in a single MSM.
    pub fn priority(&self, c: Constellation, opts: &Options) -> u8 {
        if *self == Code::None {
            return 0;
        }
        if let Some(forced) = opts.code_override(c, *self) {
            return forced;
        }
        let attribute = match self.attribute() {
            Some(attribute) => attribute,
            None => return 0,
        };
        match priority_string(c, self.band()).find(attribute) {
            Some(position) => 14 - position as u8,
            None => 0,
        }
    }
}

/// Per constellation, per band preferred-attribute strings: position
/// in the string encodes descending priority.
fn priority_string(c: Constellation, band: u8) -> &'static str {
    const GPS: [&str; 7] = ["CPYWMNSL", "PYWCMNDSLX", "IQX", "", "", "", ""];
    const GLO: [&str; 7] = ["PC", "PC", "IQX", "", "", "", "IQX"];
    const GAL: [&str; 7] = ["CABXZ", "", "IQX", "ABCXZ", "IQX", "IQX", ""];
    const QZS: [&str; 7] = ["CSLXZ", "SLX", "IQX", "SLX", "", "", ""];
    const BDS: [&str; 7] = ["IQX", "IQX", "IQX", "IQX", "IQX", "", ""];
    const SBS: [&str; 7] = ["C", "", "IQX", "", "", "", ""];
    if !(1..=7).contains(&band) {
        return "";
    }
    let table = match c {
        Constellation::GPS => &GPS,
        Constellation::Glonass => &GLO,
        Constellation::Galileo => &GAL,
        Constellation::QZSS => &QZS,
        Constellation::BeiDou => &BDS,
        Constellation::SBAS => &SBS,
        Constellation::LEO => return "",
    };
    table[band as usize - 1]
}

impl std::str::FromStr for Code {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        match KNOWN_CODES.iter().position(|known| *known == code) {
            Some(index) => Ok(Self::ALL[index]),
            None => Err(ParsingError::UnknownCode(s.to_string())),
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn string_round_trip() {
        for code in Code::ALL {
            assert_eq!(Code::from_str(code.as_str()), Ok(code));
        }
        assert!(Code::from_str("9Z").is_err());
        assert_eq!(Code::None.as_str(), "");
    }

    #[test]
    fn bands() {
        for (code, band) in vec![
            (Code::L1C, 1),
            (Code::L2W, 2),
            (Code::L5Q, 3),
            (Code::L6X, 4),
            (Code::L7I, 5),
            (Code::L8X, 6),
            (Code::L3I, 7),
            (Code::L1I, 1),
            (Code::L2I, 2),
            (Code::None, 0),
        ] {
            assert_eq!(code.band(), band, "{:?}", code);
        }
    }

    #[test]
    fn default_priorities() {
        let opts = Options::default();
        // codepris "CPYWMNSL": C first
        assert_eq!(Code::L1C.priority(Constellation::GPS, &opts), 14);
        assert_eq!(Code::L1P.priority(Constellation::GPS, &opts), 13);
        assert_eq!(Code::L1Y.priority(Constellation::GPS, &opts), 12);
        assert_eq!(Code::L1W.priority(Constellation::GPS, &opts), 11);
        // unknown attribute on that system/band
        assert_eq!(Code::L1I.priority(Constellation::GPS, &opts), 0);
        // Glonass G3
        assert_eq!(Code::L3I.priority(Constellation::Glonass, &opts), 14);
    }

    #[test]
    fn forced_priorities() {
        let opts = Options::from_str("-GL1W").unwrap();
        assert_eq!(Code::L1W.priority(Constellation::GPS, &opts), 15);
        // same band, not the forced code: disabled
        assert_eq!(Code::L1C.priority(Constellation::GPS, &opts), 0);
        // other bands unaffected ("PYWCMNDSLX": W third)
        assert_eq!(Code::L2W.priority(Constellation::GPS, &opts), 12);
        // other systems unaffected
        assert_eq!(Code::L1C.priority(Constellation::SBAS, &opts), 14);
    }
}
