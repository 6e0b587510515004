//! Stream synchronization: preamble search, CRC gate, minimal
//! frames, reader input.
mod common;

use common::{feed, FrameBuilder};
use rtcm3::crc::crc24q;
use rtcm3::prelude::*;
use std::io::Cursor;

#[test]
fn minimal_frame_crc_good() {
    // zero length payload: tolerated, counted in the catch-all slot,
    // no decoder runs
    let mut rtcm = Rtcm::new();
    let mut frame = vec![0xD3u8, 0x00, 0x00];
    let crc = crc24q(&frame);
    frame.extend_from_slice(&[(crc >> 16) as u8, (crc >> 8) as u8, crc as u8]);
    assert_eq!(frame.len(), 6);

    let status = feed(&mut rtcm, &frame);
    assert_eq!(status, Status::None);
    for msg_type in 1001u16..=1299 {
        assert_eq!(rtcm.stats.count(msg_type), 0);
    }
    assert_eq!(rtcm.stats.other(), 1);
}

#[test]
fn parity_failure_discards_frame() {
    let mut rtcm = Rtcm::new();
    let mut frame = FrameBuilder::new(1005)
        .u(12, 123)
        .u(6, 14)
        .u(4, 0)
        .coord_38(38_221_456_543)
        .u(2, 0)
        .coord_38(8_458_201_234)
        .u(2, 0)
        .coord_38(50_360_298_765)
        .build();
    let last = frame.len() - 1;
    frame[last] ^= 0x5A;
    assert_eq!(feed(&mut rtcm, &frame), Status::None);
    assert_eq!(rtcm.stats.total(), 0);
    assert_eq!(rtcm.sta, Station::default());
}

#[test]
fn crc_trailer_matches_computation() {
    let frame = FrameBuilder::new(1005)
        .u(12, 123)
        .u(6, 14)
        .u(4, 0)
        .coord_38(38_221_456_543)
        .u(2, 0)
        .coord_38(8_458_201_234)
        .u(2, 0)
        .coord_38(50_360_298_765)
        .build();
    let body = frame.len() - 3;
    let trailer = (frame[body] as u32) << 16 | (frame[body + 1] as u32) << 8 | frame[body + 2] as u32;
    assert_eq!(crc24q(&frame[..body]), trailer);
}

#[test]
fn resynchronizes_after_garbage() {
    let mut rtcm = Rtcm::new();
    let frame = FrameBuilder::new(1005)
        .u(12, 123)
        .u(6, 14)
        .u(4, 0)
        .coord_38(38_221_456_543)
        .u(2, 0)
        .coord_38(8_458_201_234)
        .u(2, 0)
        .coord_38(50_360_298_765)
        .build();
    let mut stream = vec![0x42, 0xD3, 0x01]; // noise, including a stray preamble
    stream.extend_from_slice(&[0u8; 300]);
    stream.extend_from_slice(&frame);
    let mut updated = false;
    for byte in stream {
        updated |= rtcm.input(byte) == Status::Station;
    }
    assert!(updated);
}

#[test]
fn reader_input_surfaces_eof() {
    let mut rtcm = Rtcm::new();
    let frame = FrameBuilder::new(1005)
        .u(12, 123)
        .u(6, 14)
        .u(4, 0)
        .coord_38(38_221_456_543)
        .u(2, 0)
        .coord_38(8_458_201_234)
        .u(2, 0)
        .coord_38(50_360_298_765)
        .build();
    let mut reader = Cursor::new(frame);
    assert_eq!(rtcm.input_from(&mut reader), Status::Station);
    assert_eq!(rtcm.input_from(&mut reader), Status::Eof);
    assert_eq!(Status::Eof.code(), -2);
}
