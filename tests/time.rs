//! Epoch reconstruction through the decoder: week rollover
//! disambiguation anchored to the injected clock.
mod common;

use common::{feed, frozen_rtcm, gps_week_tow, FrameBuilder};
use rtcm3::prelude::*;

fn obs_header_frame(tow_ms: u32) -> Vec<u8> {
    FrameBuilder::new(1001)
        .u(12, 7)
        .u(30, tow_ms)
        .u(1, 1)
        .u(5, 0)
        .build()
}

#[test]
fn tow_resolves_to_current_week() {
    // host clock frozen at 2020-06-01 UTC: GPS week 2108
    let mut rtcm = frozen_rtcm();
    feed(&mut rtcm, &obs_header_frame(100_000));
    let (week, tow) = gps_week_tow(rtcm.time().unwrap());
    assert_eq!(week, 2108);
    assert!((tow - 100.0).abs() < 1e-9);
}

#[test]
fn tow_near_rollover_resolves_to_previous_week() {
    let mut rtcm = frozen_rtcm();
    feed(&mut rtcm, &obs_header_frame(100_000));
    // 604700 s is within half a week of the buffered 100 s only when
    // read in the previous week
    feed(&mut rtcm, &obs_header_frame(604_700_000));
    let (week, tow) = gps_week_tow(rtcm.time().unwrap());
    assert_eq!(week, 2107);
    assert!((tow - 604_700.0).abs() < 1e-9);
}

#[test]
fn tow_after_rollover_resolves_forward() {
    let mut rtcm = frozen_rtcm();
    // 604000 s is behind the anchor by more than half a week: it is
    // read in the previous week first
    feed(&mut rtcm, &obs_header_frame(604_000_000));
    let (week, _) = gps_week_tow(rtcm.time().unwrap());
    assert_eq!(week, 2107);
    // a small TOW right after the rollover steps the week forward
    feed(&mut rtcm, &obs_header_frame(5_000));
    let (week, tow) = gps_week_tow(rtcm.time().unwrap());
    assert_eq!(week, 2108);
    assert!((tow - 5.0).abs() < 1e-9);
}

#[test]
fn realtime_input_stamps_every_frame() {
    // -RT_INP anchors every frame to the host clock, to the second
    let mut rtcm = frozen_rtcm().with_options("-RT_INP".parse().unwrap());
    let frame = FrameBuilder::new(1005)
        .u(12, 7)
        .u(6, 0)
        .u(4, 0)
        .coord_38(0)
        .u(2, 0)
        .coord_38(0)
        .u(2, 0)
        .coord_38(0)
        .build();
    feed(&mut rtcm, &frame);
    let (week, tow) = gps_week_tow(rtcm.time().unwrap());
    // frozen at 2020-06-01 00:00:00 UTC: GPST Monday 00:00:18
    assert_eq!(week, 2108);
    assert_eq!(tow, 86_418.0);
}

#[test]
fn fractional_milliseconds_survive() {
    let mut rtcm = frozen_rtcm();
    feed(&mut rtcm, &obs_header_frame(123_456_789));
    let (_, tow) = gps_week_tow(rtcm.time().unwrap());
    assert!((tow - 123_456.789).abs() < 1e-9);
}
