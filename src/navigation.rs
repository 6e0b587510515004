//! Broadcast navigation data: one Keplerian ephemeris record per
//! satellite, plus the Glonass state-vector records keyed by slot
//! number.
use crate::sv::SV;
use hifitime::Epoch;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Keplerian broadcast ephemeris (GPS, Galileo, QZSS, BeiDou)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ephemeris {
    /// Satellite vehicle
    pub sv: SV,
    /// Issue of data, ephemeris
    pub iode: u16,
    /// Issue of data, clock
    pub iodc: u16,
    /// URA (GPS/QZS/BDS) or SISA (Galileo) accuracy index
    pub sva: u8,
    /// Signal health bits (layout is constellation specific)
    pub svh: u16,
    /// Resolved (untruncated) week number, in the constellation's own
    /// counting (Galileo stored GPS aligned, +1024)
    pub week: u32,
    /// Data source indicator: Galileo 1 = F/NAV, 0 = I/NAV
    pub code: u8,
    /// L2 P data flag (GPS), unused elsewhere
    pub flag: u8,
    /// Time of ephemeris, GPS scale
    pub toe: Epoch,
    /// Time of clock, GPS scale
    pub toc: Epoch,
    /// Transmission time: epoch of the carrying frame
    pub ttr: Epoch,
    /// Semi major axis (m)
    pub semi_major_axis_m: f64,
    /// Eccentricity
    pub eccentricity: f64,
    /// Inclination at reference time (rad)
    pub i0_rad: f64,
    /// Longitude of ascending node (rad)
    pub omega0_rad: f64,
    /// Argument of perigee (rad)
    pub omega_rad: f64,
    /// Mean anomaly at reference time (rad)
    pub m0_rad: f64,
    /// Mean motion correction (rad/s)
    pub delta_n_rad_s: f64,
    /// Rate of inclination (rad/s)
    pub idot_rad_s: f64,
    /// Rate of ascending node (rad/s)
    pub omega_dot_rad_s: f64,
    /// Harmonic correction, argument of latitude (rad)
    pub cuc_rad: f64,
    /// Harmonic correction, argument of latitude (rad)
    pub cus_rad: f64,
    /// Harmonic correction, inclination (rad)
    pub cic_rad: f64,
    /// Harmonic correction, inclination (rad)
    pub cis_rad: f64,
    /// Harmonic correction, orbit radius (m)
    pub crc_m: f64,
    /// Harmonic correction, orbit radius (m)
    pub crs_m: f64,
    /// Time of ephemeris, seconds of week
    pub toes: f64,
    /// Fit interval (hours), 0 when unspecified
    pub fit: f64,
    /// Clock bias (s)
    pub af0: f64,
    /// Clock drift (s/s)
    pub af1: f64,
    /// Clock drift rate (s/s^2)
    pub af2: f64,
    /// Group delays (s): tgd / BGD E5a-E1, BGD E5b-E1
    pub tgd: [f64; 2],
}

/// Glonass broadcast ephemeris (state vector form)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GloEphemeris {
    /// Satellite vehicle
    pub sv: SV,
    /// Issue of data: `tb` interval index, 7 low bits
    pub iode: u16,
    /// Frequency channel number (-7..=6)
    pub fcn: i8,
    /// Health (Bn)
    pub svh: u8,
    /// Age of operation information (days)
    pub age: u8,
    /// Epoch of ephemeris, GPS scale
    pub toe: Epoch,
    /// Message frame time, GPS scale
    pub tof: Epoch,
    /// Satellite position, ECEF PZ-90 (m)
    pub position_m: [f64; 3],
    /// Satellite velocity (m/s)
    pub velocity_m_s: [f64; 3],
    /// Satellite acceleration (m/s^2)
    pub acceleration_m_s2: [f64; 3],
    /// Clock bias (s)
    pub taun_s: f64,
    /// Relative frequency bias
    pub gamn: f64,
    /// Time difference between L1 and L2 (s)
    pub dtaun_s: f64,
}

/// The navigation table: most recent broadcast ephemerides
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Navigation {
    /// Keplerian ephemerides, per satellite
    pub eph: HashMap<SV, Ephemeris>,
    /// Glonass ephemerides, keyed by slot number
    pub geph: HashMap<u8, GloEphemeris>,
}

impl Navigation {
    /// Frequency channel number of a Glonass slot, when its ephemeris
    /// has been seen
    pub fn glo_fcn(&self, slot: u8) -> Option<i8> {
        self.geph.get(&slot).map(|geph| geph.fcn)
    }
}
