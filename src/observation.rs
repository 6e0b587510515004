//! Observation records: one sliding epoch of per satellite, per
//! signal-slot observables, the way the positioning engine consumes
//! them.
use crate::observable::Code;
use crate::sv::SV;
use bitflags::bitflags;
use hifitime::Epoch;
use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Main frequency slots per satellite
pub const NFREQ: usize = 3;
/// Extended signal slots per satellite, for codes that lost the
/// per band priority selection
pub const NEXOBS: usize = 3;
/// Signal slots per satellite
pub(crate) const NSIG: usize = NFREQ + NEXOBS;
/// Satellite capacity of one observation epoch
pub const MAXOBS: usize = 64;

bitflags! {
    /// Loss of Lock Indication (LLI) for phase tracking
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    pub struct LliFlags: u8 {
        /// Lock lost between previous and current observation,
        /// cycle slip is possible
        const LOCK_LOSS = 0x01;
        /// Half cycle ambiguity not yet resolved
        const HALF_CYCLE_AMBIGUITY = 0x02;
    }
}

#[cfg(feature = "serde")]
impl Serialize for LliFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for LliFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(LliFlags::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

/// Observables of one satellite, one entry per signal slot. Slots
/// `0..NFREQ` hold the per band priority winners (slot = band index),
/// slots `NFREQ..` the extended signals in first-seen order. A zero
/// pseudorange / phase / code marks an empty slot, per the wire
/// sentinel convention.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Satellite vehicle
    pub sv: SV,
    /// Pseudorange (m)
    pub pseudorange_m: [f64; NSIG],
    /// Carrier phase (cycles)
    pub carrier_phase_cyc: [f64; NSIG],
    /// Doppler (Hz)
    pub doppler_hz: [f64; NSIG],
    /// Signal strength, 0.25 dB.Hz units
    pub snr: [u8; NSIG],
    /// Loss of lock indication
    pub lli: [LliFlags; NSIG],
    /// Observation code of each slot
    pub code: [Code; NSIG],
}

impl Observation {
    pub(crate) fn new(sv: SV) -> Self {
        Self {
            sv,
            pseudorange_m: [0.0; NSIG],
            carrier_phase_cyc: [0.0; NSIG],
            doppler_hz: [0.0; NSIG],
            snr: [0; NSIG],
            lli: [LliFlags::empty(); NSIG],
            code: [Code::None; NSIG],
        }
    }
}

/// One observation epoch: the most recently decoded batch, at most
/// one entry per satellite. The buffer is cleared whenever a frame
/// opens a new epoch (time moved by more than 1 ns, or the previous
/// batch was terminated by a clear `sync` flag).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationEpoch {
    /// Epoch all entries refer to (GPS scale)
    pub time: Option<Epoch>,
    /// Per satellite observables
    pub data: Vec<Observation>,
}

impl ObservationEpoch {
    /// Number of satellites buffered
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no satellite is buffered
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.time = None;
        self.data.clear();
    }

    /// Observables of satellite `sv`, if buffered
    pub fn satellite(&self, sv: SV) -> Option<&Observation> {
        self.data.iter().find(|obs| obs.sv == sv)
    }

    /// Buffered satellites, sorted
    pub fn satellites(&self) -> Vec<SV> {
        self.data.iter().map(|obs| obs.sv).sorted().collect()
    }

    /// Index of the entry for `sv`, allocating (zeroed) when absent.
    /// None once the epoch is full.
    pub(crate) fn index_of(&mut self, time: Epoch, sv: SV) -> Option<usize> {
        self.time = Some(time);
        if let Some(index) = self.data.iter().position(|obs| obs.sv == sv) {
            return Some(index);
        }
        if self.data.len() >= MAXOBS {
            return None;
        }
        self.data.push(Observation::new(sv));
        Some(self.data.len() - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constellation::Constellation;
    use crate::time::gpst_from_tow;

    #[test]
    fn one_entry_per_satellite() {
        let mut epoch = ObservationEpoch::default();
        let t = gpst_from_tow(2108, 100.0);
        let g07 = SV::new(Constellation::GPS, 7);
        let g09 = SV::new(Constellation::GPS, 9);
        assert_eq!(epoch.index_of(t, g07), Some(0));
        assert_eq!(epoch.index_of(t, g09), Some(1));
        assert_eq!(epoch.index_of(t, g07), Some(0));
        assert_eq!(epoch.len(), 2);
        assert_eq!(epoch.satellites(), vec![g07, g09]);
    }

    #[test]
    fn saturates_at_capacity() {
        let mut epoch = ObservationEpoch::default();
        let t = gpst_from_tow(2108, 100.0);
        for index in 0..MAXOBS {
            let sv = SV::from_index(index).unwrap();
            assert!(epoch.index_of(t, sv).is_some());
        }
        let extra = SV::from_index(MAXOBS).unwrap();
        assert_eq!(epoch.index_of(t, extra), None);
        assert_eq!(epoch.len(), MAXOBS);
    }
}
