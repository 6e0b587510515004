#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

use thiserror::Error;

mod frame;
mod message;
mod rtcm;

pub mod bits;
pub mod carrier;
pub mod constants;
pub mod constellation;
pub mod crc;
pub mod navigation;
pub mod observable;
pub mod observation;
pub mod opts;
pub mod ssr;
pub mod station;
pub mod stats;
pub mod sv;
pub mod time;

pub use rtcm::{Rtcm, Status};

pub mod prelude {
    pub use crate::{
        carrier::Carrier,
        constellation::Constellation,
        navigation::{Ephemeris, GloEphemeris, Navigation},
        observable::Code,
        observation::{LliFlags, Observation, ObservationEpoch, MAXOBS, NEXOBS, NFREQ},
        opts::Options,
        rtcm::{Rtcm, Status},
        ssr::{Ssr, SsrKind},
        station::Station,
        stats::MessageStats,
        sv::SV,
        time::{SystemClock, TimeSource},
        Error,
    };
    // re-export
    pub use hifitime::{Epoch, TimeScale};
}

/// Decoding errors. All of them are local to one frame: the stream
/// synchronizer always resumes from its idle state and the control
/// record is never left half written. The public byte input converts
/// every [Error] into the status-code contract of [Status].
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error")]
    IoError(#[from] std::io::Error),
    #[error("rtcm3 {mtype} length error: len={len}")]
    MessageTooShort { mtype: u16, len: usize },
    #[error("rtcm3 {mtype} station id invalid: id={got} expected={expected}")]
    StationIdMismatch { mtype: u16, got: u16, expected: u16 },
    #[error("rtcm3 {mtype} number of sats and signals error: {nsat}x{nsig}")]
    CellMaskOverflow { mtype: u16, nsat: usize, nsig: usize },
    #[error("invalid options")]
    InvalidOptions(#[from] opts::ParsingError),
}
