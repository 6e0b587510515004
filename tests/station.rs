//! Station descriptor messages: reference point (1005/1006) and
//! antenna / receiver text records (1007/1008/1033).
mod common;

use common::{feed, FrameBuilder};
use rtcm3::prelude::*;

fn type_1005(staid: u32) -> Vec<u8> {
    FrameBuilder::new(1005)
        .u(12, staid)
        .u(6, 14)
        .u(4, 0)
        .coord_38(38_221_456_543) // 3822145.6543 m
        .u(2, 0)
        .coord_38(8_458_201_234) // 845820.1234 m
        .u(2, 0)
        .coord_38(50_360_298_765) // 5036029.8765 m
        .build()
}

#[test]
fn reference_point_1005() {
    let mut rtcm = Rtcm::new();
    let status = feed(&mut rtcm, &type_1005(123));
    assert_eq!(status, Status::Station);
    assert_eq!(status.code(), 5);

    let (x, y, z) = rtcm.sta.position_m;
    assert!((x - 3_822_145.6543).abs() < 1e-9);
    assert!((y - 845_820.1234).abs() < 1e-9);
    assert!((z - 5_036_029.8765).abs() < 1e-9);
    assert_eq!(rtcm.sta.itrf_year, 14);
    assert_eq!(rtcm.sta.delta_type, 0);
    assert_eq!(rtcm.sta.antenna_height_m, 0.0);
    assert_eq!(rtcm.stats.count(1005), 1);
}

#[test]
fn reference_point_1006_height() {
    let mut rtcm = Rtcm::new();
    let frame = FrameBuilder::new(1006)
        .u(12, 55)
        .u(6, 8)
        .u(4, 0)
        .coord_38(38_221_456_543)
        .u(2, 0)
        .coord_38(8_458_201_234)
        .u(2, 0)
        .coord_38(50_360_298_765)
        .u(16, 12_345) // 1.2345 m
        .build();
    assert_eq!(feed(&mut rtcm, &frame), Status::Station);
    assert!((rtcm.sta.antenna_height_m - 1.2345).abs() < 1e-9);
}

fn push_str(mut builder: FrameBuilder, text: &str) -> FrameBuilder {
    builder = builder.u(8, text.len() as u32);
    for byte in text.bytes() {
        builder = builder.u(8, byte as u32);
    }
    builder
}

#[test]
fn antenna_descriptor_1008() {
    let mut rtcm = Rtcm::new();
    let mut builder = FrameBuilder::new(1008).u(12, 30);
    builder = push_str(builder, "TRM59800.00     SCIS");
    builder = builder.u(8, 2); // setup id
    builder = push_str(builder, "1440911917");
    assert_eq!(feed(&mut rtcm, &builder.build()), Status::Station);
    assert_eq!(rtcm.sta.antenna_descriptor, "TRM59800.00     SCIS");
    assert_eq!(rtcm.sta.antenna_setup, 2);
    assert_eq!(rtcm.sta.antenna_serial, "1440911917");
}

#[test]
fn receiver_antenna_1033() {
    let mut rtcm = Rtcm::new();
    let mut builder = FrameBuilder::new(1033).u(12, 30);
    builder = push_str(builder, "LEIAR25.R4      LEIT");
    builder = builder.u(8, 0);
    builder = push_str(builder, "726444");
    builder = push_str(builder, "LEICA GR50");
    builder = push_str(builder, "4.51");
    builder = push_str(builder, "1830399");
    assert_eq!(feed(&mut rtcm, &builder.build()), Status::Station);
    assert_eq!(rtcm.sta.antenna_descriptor, "LEIAR25.R4      LEIT");
    assert_eq!(rtcm.sta.antenna_serial, "726444");
    assert_eq!(rtcm.sta.receiver, "LEICA GR50");
    assert_eq!(rtcm.sta.firmware, "4.51");
    assert_eq!(rtcm.sta.receiver_serial, "1830399");
}

#[test]
fn descriptor_clamped_to_31_chars() {
    let mut rtcm = Rtcm::new();
    let long = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"; // 36 chars
    let mut builder = FrameBuilder::new(1007).u(12, 30);
    builder = push_str(builder, long);
    builder = builder.u(8, 1);
    // counter says 36, only 31 are consumed: the setup id byte is
    // read right after them
    assert_eq!(feed(&mut rtcm, &builder.build()), Status::Station);
    assert_eq!(rtcm.sta.antenna_descriptor, &long[..31]);
}

#[test]
fn station_id_filter_option() {
    let mut rtcm = Rtcm::new().with_options("-STA=200".parse().unwrap());
    assert_eq!(feed(&mut rtcm, &type_1005(123)), Status::Malformed);
    assert_eq!(rtcm.sta, Station::default());
    assert_eq!(feed(&mut rtcm, &type_1005(200)), Status::Station);
}
