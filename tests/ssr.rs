//! SSR correction messages: per kind stamping, code bias tables,
//! batch termination.
mod common;

use common::{feed, frozen_rtcm, FrameBuilder};
use rtcm3::prelude::*;

/// SSR1 header (with reference datum bit)
fn ssr1_header(builder: FrameBuilder, sync: u32, nsat: u32) -> FrameBuilder {
    builder
        .u(20, 200_000) // GPS epoch time
        .u(4, 2) // update interval: 5 s
        .u(1, sync)
        .u(1, 0) // reference datum
        .u(4, 3) // iod ssr
        .u(16, 258) // provider
        .u(4, 1) // solution
        .u(6, nsat)
}

/// SSR2-shaped header (no datum bit)
fn ssr2_header(builder: FrameBuilder, sync: u32, nsat: u32) -> FrameBuilder {
    builder
        .u(20, 200_000)
        .u(4, 2)
        .u(1, sync)
        .u(4, 3)
        .u(16, 258)
        .u(4, 1)
        .u(6, nsat)
}

#[test]
fn orbit_corrections_1057() {
    let mut rtcm = frozen_rtcm();
    let frame = ssr1_header(FrameBuilder::new(1057), 0, 1)
        .u(6, 7) // prn
        .u(8, 42) // iode
        .s(22, 1234) // radial (0.1 mm)
        .s(20, -200) // along track (0.4 mm)
        .s(20, 300) // cross track
        .s(21, 50) // radial rate
        .s(19, -40)
        .s(19, 25)
        .build();
    let status = feed(&mut rtcm, &frame);
    assert_eq!(status, Status::Ssr);
    assert_eq!(status.code(), 10);

    let ssr = &rtcm.ssr[&SV::new(Constellation::GPS, 7)];
    assert_eq!(ssr.iode, 42);
    assert!((ssr.deph_m[0] - 0.1234).abs() < 1e-12);
    assert!((ssr.deph_m[1] + 200.0 * 4e-4).abs() < 1e-12);
    assert!((ssr.ddeph_m_s[0] - 50.0 * 1e-6).abs() < 1e-12);
    // only the orbit kind is stamped
    assert!(ssr.t0[SsrKind::Orbit as usize].is_some());
    assert!(ssr.t0[SsrKind::Clock as usize].is_none());
    assert_eq!(ssr.udi[SsrKind::Orbit as usize], 5.0);
    assert_eq!(ssr.iod[SsrKind::Orbit as usize], 3);
    assert!(ssr.update);
}

#[test]
fn clock_corrections_1058() {
    let mut rtcm = frozen_rtcm();
    let frame = ssr2_header(FrameBuilder::new(1058), 0, 1)
        .u(6, 7)
        .s(22, -900) // c0 (0.1 mm)
        .s(21, 15) // c1 (1e-6 m/s)
        .s(27, -4) // c2 (2e-8 m/s^2)
        .build();
    assert_eq!(feed(&mut rtcm, &frame), Status::Ssr);
    let ssr = &rtcm.ssr[&SV::new(Constellation::GPS, 7)];
    assert!((ssr.dclk[0] + 0.09).abs() < 1e-12);
    assert!((ssr.dclk[1] - 15.0 * 1e-6).abs() < 1e-12);
    assert!((ssr.dclk[2] + 4.0 * 2e-8).abs() < 1e-12);
    assert!(ssr.t0[SsrKind::Clock as usize].is_some());
    assert!(ssr.t0[SsrKind::Orbit as usize].is_none());
}

#[test]
fn code_bias_1059() {
    let mut rtcm = frozen_rtcm();
    let frame = ssr2_header(FrameBuilder::new(1059), 0, 1)
        .u(6, 12)
        .u(5, 2) // two biases
        .u(5, 0) // mode 0: 1C
        .s(14, 123) // 1.23 m
        .u(5, 14) // mode 14: 5I
        .s(14, -56)
        .build();
    assert_eq!(feed(&mut rtcm, &frame), Status::Ssr);
    let ssr = &rtcm.ssr[&SV::new(Constellation::GPS, 12)];
    assert!((ssr.code_bias_m[&Code::L1C] - 1.23).abs() < 1e-12);
    assert!((ssr.code_bias_m[&Code::L5I] + 0.56).abs() < 1e-12);
    assert!(ssr.t0[SsrKind::CodeBias as usize].is_some());
}

#[test]
fn unknown_bias_mode_skipped() {
    let mut rtcm = frozen_rtcm();
    let frame = ssr2_header(FrameBuilder::new(1059), 0, 1)
        .u(6, 12)
        .u(5, 2)
        .u(5, 30) // out of the GPS table
        .s(14, 77)
        .u(5, 1) // mode 1: 1P
        .s(14, 10)
        .build();
    assert_eq!(feed(&mut rtcm, &frame), Status::Ssr);
    let ssr = &rtcm.ssr[&SV::new(Constellation::GPS, 12)];
    assert_eq!(ssr.code_bias_m.len(), 1);
    assert!((ssr.code_bias_m[&Code::L1P] - 0.10).abs() < 1e-12);
}

#[test]
fn combined_1060_stamps_orbit_and_clock() {
    let mut rtcm = frozen_rtcm();
    let frame = ssr1_header(FrameBuilder::new(1060), 0, 1)
        .u(6, 3)
        .u(8, 17) // iode
        .s(22, 100)
        .s(20, 200)
        .s(20, 300)
        .s(21, 0)
        .s(19, 0)
        .s(19, 0)
        .s(22, -50)
        .s(21, 5)
        .s(27, 1)
        .build();
    assert_eq!(feed(&mut rtcm, &frame), Status::Ssr);
    let ssr = &rtcm.ssr[&SV::new(Constellation::GPS, 3)];
    assert_eq!(ssr.iode, 17);
    assert!(ssr.t0[SsrKind::Orbit as usize].is_some());
    assert!(ssr.t0[SsrKind::Clock as usize].is_some());
    assert!((ssr.dclk[0] + 50.0 * 1e-4).abs() < 1e-12);
}

#[test]
fn ura_and_high_rate_clock() {
    let mut rtcm = frozen_rtcm();
    let ura = ssr2_header(FrameBuilder::new(1061), 0, 1)
        .u(6, 21)
        .u(6, 13)
        .build();
    assert_eq!(feed(&mut rtcm, &ura), Status::Ssr);
    let hrclk = ssr2_header(FrameBuilder::new(1062), 0, 1)
        .u(6, 21)
        .s(22, -777)
        .build();
    assert_eq!(feed(&mut rtcm, &hrclk), Status::Ssr);

    let ssr = &rtcm.ssr[&SV::new(Constellation::GPS, 21)];
    assert_eq!(ssr.ura, 13);
    assert!((ssr.hr_clk_m + 777.0 * 1e-4).abs() < 1e-12);
    assert!(ssr.t0[SsrKind::Ura as usize].is_some());
    assert!(ssr.t0[SsrKind::HighRateClock as usize].is_some());
}

#[test]
fn sync_flag_defers_completion() {
    let mut rtcm = frozen_rtcm();
    let open = ssr1_header(FrameBuilder::new(1057), 1, 1)
        .u(6, 7)
        .u(8, 42)
        .s(22, 0)
        .s(20, 0)
        .s(20, 0)
        .s(21, 0)
        .s(19, 0)
        .s(19, 0)
        .build();
    // corrections stored, batch still open
    assert_eq!(feed(&mut rtcm, &open), Status::None);
    assert!(rtcm.ssr.contains_key(&SV::new(Constellation::GPS, 7)));
}

#[test]
fn qzss_prn_offset_and_count_width() {
    let mut rtcm = frozen_rtcm();
    // QZSS satellite count is 4 bits wide, PRN field is offset by 192
    let frame = FrameBuilder::new(1246)
        .u(20, 200_000)
        .u(4, 0)
        .u(1, 0)
        .u(1, 0)
        .u(4, 9)
        .u(16, 258)
        .u(4, 1)
        .u(4, 1) // one satellite
        .u(4, 1) // prn 193
        .u(8, 33)
        .s(22, 10)
        .s(20, 20)
        .s(20, 30)
        .s(21, 0)
        .s(19, 0)
        .s(19, 0)
        .build();
    assert_eq!(feed(&mut rtcm, &frame), Status::Ssr);
    let ssr = &rtcm.ssr[&SV::new(Constellation::QZSS, 193)];
    assert_eq!(ssr.iode, 33);
    assert_eq!(ssr.iod[SsrKind::Orbit as usize], 9);
}

#[test]
fn glonass_daily_epoch_1063() {
    let mut rtcm = frozen_rtcm();
    let frame = FrameBuilder::new(1063)
        .u(17, 36_000) // 10:00 moscow time of day
        .u(4, 2)
        .u(1, 0)
        .u(1, 0)
        .u(4, 3)
        .u(16, 258)
        .u(4, 1)
        .u(6, 1)
        .u(5, 4) // slot
        .u(8, 96) // iode (tb)
        .s(22, 40)
        .s(20, 0)
        .s(20, 0)
        .s(21, 0)
        .s(19, 0)
        .s(19, 0)
        .build();
    assert_eq!(feed(&mut rtcm, &frame), Status::Ssr);
    let ssr = &rtcm.ssr[&SV::new(Constellation::Glonass, 4)];
    assert_eq!(ssr.iode, 96);
    let t0 = ssr.t0[SsrKind::Orbit as usize].unwrap();
    // 10:00 moscow is 07:00 UTC on the frozen day
    let expected = Epoch::from_gregorian_utc(2020, 6, 1, 7, 0, 0, 0);
    assert!(((t0.to_time_scale(TimeScale::UTC) - expected).to_seconds()).abs() < 1e-6);
}
