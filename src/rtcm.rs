//! The RTCM3 control record: owns the frame synchronizer, the most
//! recent observation epoch, the navigation table, the station
//! descriptor, the SSR corrections and the per satellite continuation
//! state, and mutates them as frames are decoded.
use crate::frame::Framer;
use crate::navigation::Navigation;
use crate::observation::{LliFlags, ObservationEpoch};
use crate::opts::Options;
use crate::ssr::Ssr;
use crate::station::Station;
use crate::stats::MessageStats;
use crate::sv::SV;
use crate::time::{self, SystemClock, TimeSource};
use hifitime::{Epoch, TimeScale};
use log::warn;
use std::collections::HashMap;
use std::io::Read;

/// Outcome of feeding one input byte. [Status::code] exposes the
/// conventional numeric return codes for callers that multiplex
/// several decoder backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No complete message yet, or a message without content update
    None,
    /// An observation epoch was completed
    ObsEpoch,
    /// A broadcast ephemeris was updated (see [Rtcm::eph_sv])
    Ephemeris,
    /// Station or antenna information was updated
    Station,
    /// An SSR correction batch was completed
    Ssr,
    /// A frame was consumed but its content was invalid
    Malformed,
    /// End of the input stream (reader input only)
    Eof,
}

impl Status {
    /// Numeric status code: 0 no message, 1 observations, 2 ephemeris,
    /// 5 station, 10 SSR, -1 message error, -2 end of input.
    pub const fn code(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::ObsEpoch => 1,
            Self::Ephemeris => 2,
            Self::Station => 5,
            Self::Ssr => 10,
            Self::Malformed => -1,
            Self::Eof => -2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "pending"),
            Self::ObsEpoch => write!(f, "observation epoch"),
            Self::Ephemeris => write!(f, "ephemeris"),
            Self::Station => write!(f, "station info"),
            Self::Ssr => write!(f, "ssr corrections"),
            Self::Malformed => write!(f, "message error"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// The RTCM3 decoder. Feed it bytes with [Rtcm::input] (or
/// [Rtcm::input_from]) and read the decoded records from the public
/// fields whenever the returned [Status] reports an update.
///
/// Single threaded by design: one `Rtcm` per stream, externally
/// serialized. Dropping it releases every buffered record.
pub struct Rtcm {
    pub(crate) framer: Framer,
    /// Most recently reconstructed absolute epoch, GPS scale
    pub(crate) time: Option<Epoch>,
    /// Most recent observation epoch
    pub obs: ObservationEpoch,
    /// Broadcast ephemerides
    pub nav: Navigation,
    /// Station descriptor
    pub sta: Station,
    /// SSR corrections, per satellite
    pub ssr: HashMap<SV, Ssr>,
    /// Satellite of the most recent ephemeris update
    pub eph_sv: Option<SV>,
    /// Per message type frame counters
    pub stats: MessageStats,
    /// Station id of the observation batch in progress, 0 when unset
    pub(crate) staid: u16,
    /// Set when the last observation frame closed its batch
    /// (`sync == 0`): the next observation frame opens a new epoch
    pub(crate) obs_complete: bool,
    pub(crate) opts: Options,
    clock: Box<dyn TimeSource>,
    /// Carrier phase continuation, per (satellite, signal slot)
    cp: HashMap<(SV, usize), f64>,
    /// Lock time indicators of the previous epoch
    lock: HashMap<(SV, usize), u16>,
}

impl Default for Rtcm {
    fn default() -> Self {
        Self::new()
    }
}

impl Rtcm {
    /// Builds a decoder with default options and the system wall
    /// clock as rollover anchor.
    pub fn new() -> Self {
        Self {
            framer: Framer::default(),
            time: None,
            obs: ObservationEpoch::default(),
            nav: Navigation::default(),
            sta: Station::default(),
            ssr: HashMap::new(),
            eph_sv: None,
            stats: MessageStats::default(),
            staid: 0,
            obs_complete: false,
            opts: Options::default(),
            clock: Box::new(SystemClock),
            cp: HashMap::new(),
            lock: HashMap::new(),
        }
    }

    /// Replaces the decoding [Options]
    pub fn with_options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Replaces the rollover anchor clock, e.g. with a
    /// [crate::time::FrozenClock] for deterministic replays.
    pub fn with_clock<C: TimeSource + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Active decoding options
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Most recently reconstructed absolute epoch (GPS scale)
    pub fn time(&self) -> Option<Epoch> {
        self.time
    }

    /// Feeds one input byte to the decoder. Bounded work: a frame is
    /// decoded only on the byte completing it.
    pub fn input(&mut self, data: u8) -> Status {
        if self.framer.push(data).is_none() {
            return Status::None;
        }
        let frame = self.framer.frame().to_vec();
        match self.decode(&frame) {
            Ok(status) => status,
            Err(error) => {
                warn!("rtcm3 error: {}", error);
                Status::Malformed
            },
        }
    }

    /// Feeds bytes from a reader, up to 4096 of them, stopping early
    /// on any non [Status::None] outcome. Returns [Status::Eof] once
    /// the reader is exhausted.
    pub fn input_from<R: Read>(&mut self, reader: &mut R) -> Status {
        let mut byte = [0u8; 1];
        for _ in 0..4096 {
            match reader.read(&mut byte) {
                Ok(0) => return Status::Eof,
                Ok(_) => {
                    let status = self.input(byte[0]);
                    if status != Status::None {
                        return status;
                    }
                },
                Err(error) => {
                    warn!("rtcm3 read error: {}", error);
                    return Status::Eof;
                },
            }
        }
        Status::None
    }

    /// Current reference epoch for rollover disambiguation: the last
    /// decoded epoch, else the injected wall clock, else the
    /// minimum-week anchor.
    pub(crate) fn epoch_or_now(&mut self) -> Epoch {
        if let Some(t) = self.time {
            return t;
        }
        let t = self
            .clock
            .now()
            .map(|now| now.to_time_scale(TimeScale::GPST))
            .unwrap_or_else(|| time::gpst_from_tow(time::MIN_GPS_WEEK, 0.0));
        self.time = Some(t);
        t
    }

    /// Wall clock reading, UTC scale
    pub(crate) fn now(&self) -> Option<Epoch> {
        self.clock.now()
    }

    /// Station id consistency test. The first id of a batch is
    /// adopted; a different id later in the same batch drops the
    /// carrying frame *and* resets the stored id, so the very next
    /// frame re-adopts whatever id it carries. One valid frame
    /// following a transient corruption is sacrificed.
    pub(crate) fn test_staid(&mut self, mtype: u16, staid: u16) -> Result<(), crate::Error> {
        if let Some(expected) = self.opts.station_id {
            if staid != expected {
                return Err(crate::Error::StationIdMismatch {
                    mtype,
                    got: staid,
                    expected,
                });
            }
        }
        if self.staid == 0 || self.obs_complete {
            self.staid = staid;
        } else if staid != self.staid {
            let expected = self.staid;
            self.staid = 0;
            return Err(crate::Error::StationIdMismatch {
                mtype,
                got: staid,
                expected,
            });
        }
        Ok(())
    }

    /// Entry of satellite `sv` in the observation buffer, clearing
    /// the buffer first when `time` opens a new epoch (moved by more
    /// than 1 ns, or previous batch terminated).
    pub(crate) fn obs_index(&mut self, time: Epoch, sv: SV) -> Option<usize> {
        let stale = self.obs_complete
            || match self.obs.time {
                Some(t0) => (time - t0).total_nanoseconds().abs() > 1,
                None => false,
            };
        if stale {
            self.obs.clear();
            self.obs_complete = false;
        }
        self.obs.index_of(time, sv)
    }

    /// Carrier phase continuation: the legacy messages carry phase
    /// modulo 1500 cycles, reconstructed against the last value seen
    /// for this (satellite, slot).
    pub(crate) fn adjcp(&mut self, sv: SV, slot: usize, cp_cyc: f64) -> f64 {
        let adjusted = match self.cp.get(&(sv, slot)) {
            Some(prev) if cp_cyc < prev - 750.0 => cp_cyc + 1500.0,
            Some(prev) if cp_cyc > prev + 750.0 => cp_cyc - 1500.0,
            _ => cp_cyc,
        };
        self.cp.insert((sv, slot), adjusted);
        adjusted
    }

    /// Loss of lock detection from the lock time indicator: loss when
    /// the indicator decreased, or never reported lock at all.
    pub(crate) fn lossoflock(&mut self, sv: SV, slot: usize, lock: u16) -> LliFlags {
        let prev = self.lock.get(&(sv, slot)).copied().unwrap_or(0);
        let lli = if (lock == 0 && prev == 0) || lock < prev {
            LliFlags::LOCK_LOSS
        } else {
            LliFlags::empty()
        };
        self.lock.insert((sv, slot), lock);
        lli
    }
}

/// Signal strength to the 0.25 dB.Hz wire unit, rounded and clipped
pub(crate) fn snratio(snr_dbhz: f64) -> u8 {
    (snr_dbhz * 4.0 + 0.5).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constellation::Constellation;
    use crate::time::gpst_from_tow;

    #[test]
    fn status_codes() {
        for (status, code) in [
            (Status::None, 0),
            (Status::ObsEpoch, 1),
            (Status::Ephemeris, 2),
            (Status::Station, 5),
            (Status::Ssr, 10),
            (Status::Malformed, -1),
            (Status::Eof, -2),
        ] {
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn phase_continuation() {
        let mut rtcm = Rtcm::new();
        let sv = SV::new(Constellation::GPS, 5);
        assert_eq!(rtcm.adjcp(sv, 0, 100.0), 100.0);
        // jump below the half range: one roll up
        assert_eq!(rtcm.adjcp(sv, 0, -1300.0), 200.0);
        // jump above: one roll down
        assert_eq!(rtcm.adjcp(sv, 0, 1450.0), -50.0);
        // independent per slot
        assert_eq!(rtcm.adjcp(sv, 1, -1300.0), -1300.0);
    }

    #[test]
    fn loss_of_lock() {
        let mut rtcm = Rtcm::new();
        let sv = SV::new(Constellation::GPS, 5);
        // never locked
        assert_eq!(rtcm.lossoflock(sv, 0, 0), LliFlags::LOCK_LOSS);
        assert_eq!(rtcm.lossoflock(sv, 0, 50), LliFlags::empty());
        assert_eq!(rtcm.lossoflock(sv, 0, 50), LliFlags::empty());
        // indicator decreased: loss
        assert_eq!(rtcm.lossoflock(sv, 0, 49), LliFlags::LOCK_LOSS);
        assert_eq!(rtcm.lossoflock(sv, 0, 127), LliFlags::empty());
    }

    #[test]
    fn snr_encoding() {
        assert_eq!(snratio(44.9), 180);
        assert_eq!(snratio(0.0), 0);
        assert_eq!(snratio(-3.0), 0);
        assert_eq!(snratio(80.0), 255);
    }

    #[test]
    fn epoch_gate_clears_on_time_change() {
        let mut rtcm = Rtcm::new();
        let sv = SV::new(Constellation::GPS, 7);
        let t0 = gpst_from_tow(2108, 100.0);
        assert!(rtcm.obs_index(t0, sv).is_some());
        assert_eq!(rtcm.obs.len(), 1);
        // same epoch: entry reused
        assert!(rtcm.obs_index(t0, sv).is_some());
        assert_eq!(rtcm.obs.len(), 1);
        // new epoch: buffer restarted
        let t1 = gpst_from_tow(2108, 101.0);
        assert!(rtcm.obs_index(t1, SV::new(Constellation::GPS, 9)).is_some());
        assert_eq!(rtcm.obs.len(), 1);
        assert_eq!(rtcm.obs.satellites(), vec![SV::new(Constellation::GPS, 9)]);
    }

    #[test]
    fn station_id_consistency() {
        let mut rtcm = Rtcm::new();
        assert!(rtcm.test_staid(1004, 123).is_ok());
        assert!(rtcm.test_staid(1004, 123).is_ok());
        // mid-batch change: rejected, id reset
        assert!(rtcm.test_staid(1004, 99).is_err());
        // next frame re-adopts
        assert!(rtcm.test_staid(1004, 99).is_ok());
        // terminated batch allows a new id
        rtcm.staid = 123;
        rtcm.obs_complete = true;
        assert!(rtcm.test_staid(1004, 45).is_ok());
        assert_eq!(rtcm.staid, 45);
    }

    #[test]
    fn station_id_option_filter() {
        let mut rtcm =
            Rtcm::new().with_options("-STA=77".parse().unwrap());
        assert!(rtcm.test_staid(1005, 78).is_err());
        assert!(rtcm.test_staid(1005, 77).is_ok());
    }
}
