//! State Space Representation corrections: per satellite orbit,
//! clock, code bias, URA and high rate clock records, each correction
//! kind stamped independently.
use crate::observable::Code;
use hifitime::Epoch;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The SSR correction kinds carrying independent epoch / update
/// interval / issue-of-data stamps. Combined orbit+clock messages
/// stamp both [SsrKind::Orbit] and [SsrKind::Clock].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SsrKind {
    /// Orbit corrections (radial / along track / cross track)
    Orbit = 0,
    /// Clock polynomial corrections
    Clock = 1,
    /// High rate clock corrections
    HighRateClock = 2,
    /// User range accuracy
    Ura = 3,
    /// Code biases
    CodeBias = 4,
}

/// Number of independently stamped correction kinds
pub(crate) const SSR_KINDS: usize = 5;

/// Mapping of the 4-bit SSR update interval index to seconds
pub(crate) const UPDATE_INTERVAL_S: [f64; 16] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 240.0, 300.0, 600.0, 900.0, 1800.0, 3600.0,
    7200.0, 10800.0,
];

/// SSR corrections of one satellite
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ssr {
    /// Correction epoch, per kind (GPS scale)
    pub t0: [Option<Epoch>; SSR_KINDS],
    /// Update interval (s), per kind
    pub udi: [f64; SSR_KINDS],
    /// Issue of SSR data, per kind
    pub iod: [u8; SSR_KINDS],
    /// Issue of data of the reference broadcast ephemeris
    pub iode: u16,
    /// 24-bit CRC of the reference ephemeris (BeiDou / SBAS)
    pub iodcrc: u32,
    /// Satellite reference datum: 0 = ITRF, 1 = regional
    pub ref_datum: u8,
    /// Orbit correction: radial, along track, cross track (m)
    pub deph_m: [f64; 3],
    /// Orbit correction velocity (m/s)
    pub ddeph_m_s: [f64; 3],
    /// Clock correction polynomial: C0 (m), C1 (m/s), C2 (m/s^2)
    pub dclk: [f64; 3],
    /// High rate clock correction (m)
    pub hr_clk_m: f64,
    /// URA class
    pub ura: u8,
    /// Code biases (m), per observation code
    pub code_bias_m: HashMap<Code, f64>,
    /// Set when any correction of this satellite was refreshed since
    /// the consumer last cleared it
    pub update: bool,
}

impl Ssr {
    pub(crate) fn stamp(&mut self, kind: SsrKind, t0: Epoch, udi: f64, iod: u8) {
        let slot = kind as usize;
        self.t0[slot] = Some(t0);
        self.udi[slot] = udi;
        self.iod[slot] = iod;
        self.update = true;
    }
}
