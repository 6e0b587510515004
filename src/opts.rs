//! Decoding options: a whitespace separated token string, recognized
//! at decode time.
//!
//! | Token | Effect |
//! |---|---|
//! | `-EPHALL` | store all ephemerides, including unchanged ones |
//! | `-STA=N`  | reject frames whose station id is not N |
//! | `-GLxx` `-RLxx` `-ELxx` `-JLxx` `-CLxx` `-SLxx` | force code `xx` to priority 15 on GPS/GLO/GAL/QZS/BDS/SBS, disabling the other codes of the same band |
//! | `-RT_INP` | real-time input: stamp every frame with the host clock |
//! | `-INVCP`  | invert carrier-phase polarity of the legacy RTK messages |
use crate::constellation::Constellation;
use crate::observable::Code;
use thiserror::Error;

/// Option string parsing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("invalid station id in \"{0}\"")]
    InvalidStationId(String),
    #[error("unknown observation code in \"{0}\"")]
    UnknownCode(String),
}

/// Parsed decoding options, see the module documentation for the
/// token grammar. Unrecognized tokens are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Store all ephemerides, even when issue of data is unchanged
    pub eph_all: bool,
    /// Only accept frames carrying this station id
    pub station_id: Option<u16>,
    /// Stamp every frame with the host clock (real-time input)
    pub realtime_input: bool,
    /// Invert carrier-phase polarity of the legacy RTK messages
    pub invert_phase: bool,
    /// Hard code-priority overrides, per constellation
    overrides: Vec<(Constellation, Code)>,
}

impl Options {
    /// Priority override for `code`: Some(15) when `code` is forced on
    /// its constellation, Some(0) when another code of the same band
    /// is, None otherwise.
    pub(crate) fn code_override(&self, c: Constellation, code: Code) -> Option<u8> {
        for (sys, forced) in self.overrides.iter() {
            if *sys != c || forced.band() != code.band() {
                continue;
            }
            return Some(if *forced == code { 15 } else { 0 });
        }
        None
    }

    /// Forces `code` to priority 15 on its constellation (the
    /// programmatic equivalent of `-GLxx` and friends).
    pub fn with_forced_code(mut self, c: Constellation, code: Code) -> Self {
        self.overrides.push((c, code));
        self
    }
}

impl std::str::FromStr for Options {
    type Err = ParsingError;
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let mut opts = Options::default();
        for token in string.split_whitespace() {
            if token == "-EPHALL" {
                opts.eph_all = true;
            } else if token == "-RT_INP" {
                opts.realtime_input = true;
            } else if token == "-INVCP" {
                opts.invert_phase = true;
            } else if let Some(id) = token.strip_prefix("-STA=") {
                opts.station_id = Some(
                    id.parse::<u16>()
                        .map_err(|_| ParsingError::InvalidStationId(token.to_string()))?,
                );
            } else if token.len() == 5
                && token.is_ascii()
                && token.as_bytes()[0] == b'-'
                && token.as_bytes()[2] == b'L'
            {
                if let Some(sys) = constellation_of(&token[1..2]) {
                    let code = token[3..5]
                        .parse::<Code>()
                        .map_err(|_| ParsingError::UnknownCode(token.to_string()))?;
                    opts.overrides.push((sys, code));
                }
            }
            // anything else: tolerated, for forward compatibility
        }
        Ok(opts)
    }
}

fn constellation_of(letter: &str) -> Option<Constellation> {
    match letter {
        "G" => Some(Constellation::GPS),
        "R" => Some(Constellation::Glonass),
        "E" => Some(Constellation::Galileo),
        "J" => Some(Constellation::QZSS),
        "C" => Some(Constellation::BeiDou),
        "S" => Some(Constellation::SBAS),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn token_grammar() {
        let opts = Options::from_str("-EPHALL -STA=123 -GL1W -RL2P -RT_INP").unwrap();
        assert!(opts.eph_all);
        assert!(opts.realtime_input);
        assert!(!opts.invert_phase);
        assert_eq!(opts.station_id, Some(123));
        assert_eq!(
            opts.code_override(Constellation::GPS, Code::L1W),
            Some(15)
        );
        assert_eq!(opts.code_override(Constellation::GPS, Code::L1C), Some(0));
        assert_eq!(opts.code_override(Constellation::GPS, Code::L2W), None);
        assert_eq!(
            opts.code_override(Constellation::Glonass, Code::L2P),
            Some(15)
        );
    }

    #[test]
    fn empty_and_unknown_tokens() {
        assert_eq!(Options::from_str("").unwrap(), Options::default());
        let opts = Options::from_str("-NOSUCH -X").unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn malformed_tokens() {
        assert!(Options::from_str("-STA=abc").is_err());
        assert!(Options::from_str("-GL9Z").is_err());
    }

    #[test]
    fn known_codes_cover_overrides() {
        assert_eq!(crate::observable::KNOWN_CODES.len(), 48);
    }
}
