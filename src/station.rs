//! Station metadata: antenna reference point and hardware
//! descriptors, filled by message types 1005/1006 (position) and
//! 1007/1008/1033 (antenna / receiver information).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Descriptor strings are length prefixed on the wire and clamped to
/// this many characters.
pub(crate) const MAX_DESCRIPTOR_LEN: usize = 31;

/// Station descriptor, progressively updated by the station messages.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Station {
    /// Antenna reference point, ECEF (m)
    pub position_m: (f64, f64, f64),
    /// Antenna delta (m): height only on this message family
    pub antenna_height_m: f64,
    /// Antenna delta type: 0 = ECEF, 1 = ENU
    pub delta_type: u8,
    /// ITRF realization year
    pub itrf_year: u8,
    /// IGS antenna descriptor
    pub antenna_descriptor: String,
    /// Antenna serial number
    pub antenna_serial: String,
    /// Antenna setup id
    pub antenna_setup: u8,
    /// Receiver type descriptor
    pub receiver: String,
    /// Receiver firmware version
    pub firmware: String,
    /// Receiver serial number
    pub receiver_serial: String,
}
