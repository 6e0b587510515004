//! Shared helpers: wire-exact frame construction for the decoder
//! scenarios.
#![allow(dead_code)]
use rtcm3::bits::{set_signed, set_unsigned};
use rtcm3::crc::crc24q;
use rtcm3::prelude::*;

/// Builds one RTCM3 frame bit field by bit field. The payload is
/// padded to a byte boundary and wrapped with the preamble, the
/// 10-bit length and the CRC-24Q trailer.
pub struct FrameBuilder {
    payload: Vec<u8>,
    pos: usize,
}

impl FrameBuilder {
    pub fn new(msg_type: u16) -> Self {
        let builder = Self {
            payload: vec![0u8; 1023],
            pos: 0,
        };
        builder.u(12, msg_type as u32)
    }

    /// Appends an unsigned field of `len` bits
    pub fn u(mut self, len: usize, value: u32) -> Self {
        set_unsigned(&mut self.payload, self.pos, len, value);
        self.pos += len;
        self
    }

    /// Appends a two's complement signed field of `len` bits
    pub fn s(mut self, len: usize, value: i32) -> Self {
        set_signed(&mut self.payload, self.pos, len, value);
        self.pos += len;
        self
    }

    /// Appends a 38-bit coordinate field (32 signed + 6 unsigned bits)
    pub fn coord_38(self, tenth_mm: i64) -> Self {
        let q = tenth_mm.div_euclid(64);
        let r = tenth_mm.rem_euclid(64);
        self.s(32, q as i32).u(6, r as u32)
    }

    pub fn build(self) -> Vec<u8> {
        let nbytes = (self.pos + 7) / 8;
        let mut frame = vec![0xD3u8, (nbytes >> 8) as u8, nbytes as u8];
        frame.extend_from_slice(&self.payload[..nbytes]);
        let crc = crc24q(&frame);
        frame.extend_from_slice(&[(crc >> 16) as u8, (crc >> 8) as u8, crc as u8]);
        frame
    }
}

/// Feeds a frame byte by byte, returning the status of its last byte
pub fn feed(rtcm: &mut Rtcm, frame: &[u8]) -> Status {
    let mut status = Status::None;
    for byte in frame {
        status = rtcm.input(*byte);
    }
    status
}

/// Decoder with the wall clock frozen at 2020-06-01 (GPS week 2108)
pub fn frozen_rtcm() -> Rtcm {
    let t0 = Epoch::from_gregorian_utc_at_midnight(2020, 6, 1);
    Rtcm::new().with_clock(rtcm3::time::FrozenClock(t0))
}

/// GPS-scale (week, seconds of week) of an epoch
pub fn gps_week_tow(t: Epoch) -> (u32, f64) {
    let (week, nanos) = t.to_time_scale(TimeScale::GPST).to_time_of_week();
    (week, nanos as f64 * 1e-9)
}
