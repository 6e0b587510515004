//! Broadcast ephemeris decoders: GPS 1019, Glonass 1020, BeiDou 1042
//! (and its early draft 63), QZSS 1044, Galileo F/NAV 1045 and I/NAV
//! 1046. Every constellation has its own bit layout and scale
//! factors; all of them fill the common Keplerian record (Glonass
//! excepted, which broadcasts state vectors).
use crate::bits::{get_sign_magnitude, get_signed, get_unsigned};
use crate::constants::*;
use crate::constellation::Constellation;
use crate::navigation::{Ephemeris, GloEphemeris};
use crate::rtcm::{Rtcm, Status};
use crate::sv::SV;
use crate::{time, Error};
use hifitime::{Epoch, TimeScale};
use log::debug;

impl Rtcm {
    /// 1019: GPS broadcast ephemeris
    pub(crate) fn decode_eph_gps(&mut self, buf: &[u8]) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        if i + 476 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let mut prn = get_unsigned(buf, i, 6);
        i += 6;
        let week = get_unsigned(buf, i, 10);
        i += 10;
        let sva = get_unsigned(buf, i, 4) as u8;
        i += 4;
        let code = get_unsigned(buf, i, 2) as u8;
        i += 2;
        let idot = get_signed(buf, i, 14) as f64 * P2_43 * SC2RAD;
        i += 14;
        let iode = get_unsigned(buf, i, 8) as u16;
        i += 8;
        let toc = get_unsigned(buf, i, 16) as f64 * 16.0;
        i += 16;
        let af2 = get_signed(buf, i, 8) as f64 * P2_55;
        i += 8;
        let af1 = get_signed(buf, i, 16) as f64 * P2_43;
        i += 16;
        let af0 = get_signed(buf, i, 22) as f64 * P2_31;
        i += 22;
        let iodc = get_unsigned(buf, i, 10) as u16;
        i += 10;
        let crs = get_signed(buf, i, 16) as f64 * P2_5;
        i += 16;
        let deln = get_signed(buf, i, 16) as f64 * P2_43 * SC2RAD;
        i += 16;
        let m0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cuc = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let e = get_unsigned(buf, i, 32) as f64 * P2_33;
        i += 32;
        let cus = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let sqrt_a = get_unsigned(buf, i, 32) as f64 * P2_19;
        i += 32;
        let toes = get_unsigned(buf, i, 16) as f64 * 16.0;
        i += 16;
        let cic = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let omg0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cis = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let i0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let crc = get_signed(buf, i, 16) as f64 * P2_5;
        i += 16;
        let omg = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let omgd = get_signed(buf, i, 24) as f64 * P2_43 * SC2RAD;
        i += 24;
        let tgd = get_signed(buf, i, 8) as f64 * P2_31;
        i += 8;
        let svh = get_unsigned(buf, i, 6) as u16;
        i += 6;
        let flag = get_unsigned(buf, i, 1) as u8;
        i += 1;
        let fit = if get_unsigned(buf, i, 1) != 0 { 0.0 } else { 4.0 };

        let sys = if prn >= 40 {
            prn += 80;
            Constellation::SBAS
        } else {
            Constellation::GPS
        };
        let sv = match SV::try_new(sys, prn as u8) {
            Some(sv) => sv,
            None => {
                debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                return Ok(Status::None);
            },
        };
        let week = time::adjust_gps_week(self.now(), week);
        let eph = Ephemeris {
            sv,
            iode,
            iodc,
            sva,
            svh,
            week,
            code,
            flag,
            toe: time::gpst_from_tow(week, toes),
            toc: time::gpst_from_tow(week, toc),
            ttr: self.epoch_or_now(),
            semi_major_axis_m: sqrt_a * sqrt_a,
            eccentricity: e,
            i0_rad: i0,
            omega0_rad: omg0,
            omega_rad: omg,
            m0_rad: m0,
            delta_n_rad_s: deln,
            idot_rad_s: idot,
            omega_dot_rad_s: omgd,
            cuc_rad: cuc,
            cus_rad: cus,
            cic_rad: cic,
            cis_rad: cis,
            crc_m: crc,
            crs_m: crs,
            toes,
            fit,
            af0,
            af1,
            af2,
            tgd: [tgd, 0.0],
        };
        if !self.opts.eph_all {
            if let Some(stored) = self.nav.eph.get(&sv) {
                if stored.iode == eph.iode && stored.iodc == eph.iodc {
                    return Ok(Status::None); // unchanged
                }
            }
        }
        self.nav.eph.insert(sv, eph);
        self.eph_sv = Some(sv);
        Ok(Status::Ephemeris)
    }

    /// 1044: QZSS broadcast ephemeris (clock first, then orbit)
    pub(crate) fn decode_eph_qzs(&mut self, buf: &[u8]) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        if i + 473 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let prn = get_unsigned(buf, i, 4) + 192;
        i += 4;
        let toc = get_unsigned(buf, i, 16) as f64 * 16.0;
        i += 16;
        let af2 = get_signed(buf, i, 8) as f64 * P2_55;
        i += 8;
        let af1 = get_signed(buf, i, 16) as f64 * P2_43;
        i += 16;
        let af0 = get_signed(buf, i, 22) as f64 * P2_31;
        i += 22;
        let iode = get_unsigned(buf, i, 8) as u16;
        i += 8;
        let crs = get_signed(buf, i, 16) as f64 * P2_5;
        i += 16;
        let deln = get_signed(buf, i, 16) as f64 * P2_43 * SC2RAD;
        i += 16;
        let m0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cuc = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let e = get_unsigned(buf, i, 32) as f64 * P2_33;
        i += 32;
        let cus = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let sqrt_a = get_unsigned(buf, i, 32) as f64 * P2_19;
        i += 32;
        let toes = get_unsigned(buf, i, 16) as f64 * 16.0;
        i += 16;
        let cic = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let omg0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cis = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let i0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let crc = get_signed(buf, i, 16) as f64 * P2_5;
        i += 16;
        let omg = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let omgd = get_signed(buf, i, 24) as f64 * P2_43 * SC2RAD;
        i += 24;
        let idot = get_signed(buf, i, 14) as f64 * P2_43 * SC2RAD;
        i += 14;
        let code = get_unsigned(buf, i, 2) as u8;
        i += 2;
        let week = get_unsigned(buf, i, 10);
        i += 10;
        let sva = get_unsigned(buf, i, 4) as u8;
        i += 4;
        let svh = get_unsigned(buf, i, 6) as u16;
        i += 6;
        let tgd = get_signed(buf, i, 8) as f64 * P2_31;
        i += 8;
        let iodc = get_unsigned(buf, i, 10) as u16;
        i += 10;
        let fit = if get_unsigned(buf, i, 1) != 0 { 0.0 } else { 2.0 };

        let sv = match SV::try_new(Constellation::QZSS, prn as u8) {
            Some(sv) => sv,
            None => {
                debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                return Ok(Status::None);
            },
        };
        let week = time::adjust_gps_week(self.now(), week);
        let eph = Ephemeris {
            sv,
            iode,
            iodc,
            sva,
            svh,
            week,
            code,
            flag: 0,
            toe: time::gpst_from_tow(week, toes),
            toc: time::gpst_from_tow(week, toc),
            ttr: self.epoch_or_now(),
            semi_major_axis_m: sqrt_a * sqrt_a,
            eccentricity: e,
            i0_rad: i0,
            omega0_rad: omg0,
            omega_rad: omg,
            m0_rad: m0,
            delta_n_rad_s: deln,
            idot_rad_s: idot,
            omega_dot_rad_s: omgd,
            cuc_rad: cuc,
            cus_rad: cus,
            cic_rad: cic,
            cis_rad: cis,
            crc_m: crc,
            crs_m: crs,
            toes,
            fit,
            af0,
            af1,
            af2,
            tgd: [tgd, 0.0],
        };
        if !self.opts.eph_all {
            if let Some(stored) = self.nav.eph.get(&sv) {
                if stored.iode == eph.iode && stored.iodc == eph.iodc {
                    return Ok(Status::None);
                }
            }
        }
        self.nav.eph.insert(sv, eph);
        self.eph_sv = Some(sv);
        Ok(Status::Ephemeris)
    }

    /// 1045 (F/NAV) / 1046 (I/NAV): Galileo broadcast ephemeris
    pub(crate) fn decode_eph_gal(&mut self, buf: &[u8], fnav: bool) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        let need = if fnav { 484 } else { 490 };
        if i + need > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let prn = get_unsigned(buf, i, 6);
        i += 6;
        let week = get_unsigned(buf, i, 12);
        i += 12;
        let iode = get_unsigned(buf, i, 10) as u16;
        i += 10;
        let sva = get_unsigned(buf, i, 8) as u8;
        i += 8;
        let idot = get_signed(buf, i, 14) as f64 * P2_43 * SC2RAD;
        i += 14;
        let toc = get_unsigned(buf, i, 14) as f64 * 60.0;
        i += 14;
        let af2 = get_signed(buf, i, 6) as f64 * P2_59;
        i += 6;
        let af1 = get_signed(buf, i, 21) as f64 * P2_46;
        i += 21;
        let af0 = get_signed(buf, i, 31) as f64 * P2_34;
        i += 31;
        let crs = get_signed(buf, i, 16) as f64 * P2_5;
        i += 16;
        let deln = get_signed(buf, i, 16) as f64 * P2_43 * SC2RAD;
        i += 16;
        let m0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cuc = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let e = get_unsigned(buf, i, 32) as f64 * P2_33;
        i += 32;
        let cus = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let sqrt_a = get_unsigned(buf, i, 32) as f64 * P2_19;
        i += 32;
        let toes = get_unsigned(buf, i, 14) as f64 * 60.0;
        i += 14;
        let cic = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let omg0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cis = get_signed(buf, i, 16) as f64 * P2_29;
        i += 16;
        let i0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let crc = get_signed(buf, i, 16) as f64 * P2_5;
        i += 16;
        let omg = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let omgd = get_signed(buf, i, 24) as f64 * P2_43 * SC2RAD;
        i += 24;
        let bgd_e5a = get_signed(buf, i, 10) as f64 * P2_32;
        i += 10;
        let (tgd, svh) = if fnav {
            let e5a_hs = get_unsigned(buf, i, 2) as u16;
            i += 2;
            let e5a_dvs = get_unsigned(buf, i, 1) as u16;
            // health: E5a status in bits 4-5, validity in bit 3
            ([bgd_e5a, 0.0], (e5a_hs << 4) | (e5a_dvs << 3))
        } else {
            let bgd_e5b = get_signed(buf, i, 10) as f64 * P2_32;
            i += 10;
            let e5b_hs = get_unsigned(buf, i, 2) as u16;
            i += 2;
            let e5b_dvs = get_unsigned(buf, i, 1) as u16;
            i += 1;
            let e1_hs = get_unsigned(buf, i, 2) as u16;
            i += 2;
            let e1_dvs = get_unsigned(buf, i, 1) as u16;
            (
                [bgd_e5a, bgd_e5b],
                (e5b_hs << 7) | (e5b_dvs << 6) | (e1_hs << 1) | e1_dvs,
            )
        };

        let sv = match SV::try_new(Constellation::Galileo, prn as u8) {
            Some(sv) => sv,
            None => {
                debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                return Ok(Status::None);
            },
        };
        // gal week 0 matches gps week 1024
        let week = week + 1024;
        let eph = Ephemeris {
            sv,
            iode,
            iodc: iode,
            sva,
            svh,
            week,
            code: u8::from(fnav),
            flag: 0,
            toe: time::gpst_from_tow(week, toes),
            toc: time::gpst_from_tow(week, toc),
            ttr: self.epoch_or_now(),
            semi_major_axis_m: sqrt_a * sqrt_a,
            eccentricity: e,
            i0_rad: i0,
            omega0_rad: omg0,
            omega_rad: omg,
            m0_rad: m0,
            delta_n_rad_s: deln,
            idot_rad_s: idot,
            omega_dot_rad_s: omgd,
            cuc_rad: cuc,
            cus_rad: cus,
            cic_rad: cic,
            cis_rad: cis,
            crc_m: crc,
            crs_m: crs,
            toes,
            fit: 0.0,
            af0,
            af1,
            af2,
            tgd,
        };
        if !self.opts.eph_all {
            if let Some(stored) = self.nav.eph.get(&sv) {
                if stored.iode == eph.iode {
                    return Ok(Status::None);
                }
            }
        }
        self.nav.eph.insert(sv, eph);
        self.eph_sv = Some(sv);
        Ok(Status::Ephemeris)
    }

    /// 1042 (and early draft 63): BeiDou broadcast ephemeris
    pub(crate) fn decode_eph_bds(&mut self, buf: &[u8]) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        if i + 499 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let prn = get_unsigned(buf, i, 6);
        i += 6;
        let week = get_unsigned(buf, i, 13);
        i += 13;
        let sva = get_unsigned(buf, i, 4) as u8;
        i += 4;
        let idot = get_signed(buf, i, 14) as f64 * P2_43 * SC2RAD;
        i += 14;
        let iode = get_unsigned(buf, i, 5) as u16; // AODE
        i += 5;
        let toc = get_unsigned(buf, i, 17) as f64 * 8.0;
        i += 17;
        let af2 = get_signed(buf, i, 11) as f64 * P2_66;
        i += 11;
        let af1 = get_signed(buf, i, 22) as f64 * P2_50;
        i += 22;
        let af0 = get_signed(buf, i, 24) as f64 * P2_33;
        i += 24;
        let iodc = get_unsigned(buf, i, 5) as u16; // AODC
        i += 5;
        let crs = get_signed(buf, i, 18) as f64 * P2_6;
        i += 18;
        let deln = get_signed(buf, i, 16) as f64 * P2_43 * SC2RAD;
        i += 16;
        let m0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cuc = get_signed(buf, i, 18) as f64 * P2_31;
        i += 18;
        let e = get_unsigned(buf, i, 32) as f64 * P2_33;
        i += 32;
        let cus = get_signed(buf, i, 18) as f64 * P2_31;
        i += 18;
        let sqrt_a = get_unsigned(buf, i, 32) as f64 * P2_19;
        i += 32;
        let toes = get_unsigned(buf, i, 17) as f64 * 8.0;
        i += 17;
        let cic = get_signed(buf, i, 18) as f64 * P2_31;
        i += 18;
        let omg0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let cis = get_signed(buf, i, 18) as f64 * P2_31;
        i += 18;
        let i0 = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let crc = get_signed(buf, i, 18) as f64 * P2_6;
        i += 18;
        let omg = get_signed(buf, i, 32) as f64 * P2_31 * SC2RAD;
        i += 32;
        let omgd = get_signed(buf, i, 24) as f64 * P2_43 * SC2RAD;
        i += 24;
        let tgd1 = get_signed(buf, i, 10) as f64 * 1e-10;
        i += 10;
        let tgd2 = get_signed(buf, i, 10) as f64 * 1e-10;
        i += 10;
        let svh = get_unsigned(buf, i, 1) as u16;

        let sv = match SV::try_new(Constellation::BeiDou, prn as u8) {
            Some(sv) => sv,
            None => {
                debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                return Ok(Status::None);
            },
        };
        let week = time::adjust_bdt_week(self.now(), week);
        let toe = Epoch::from_time_of_week(week, (toes * 1e9).round() as u64, TimeScale::BDT)
            .to_time_scale(TimeScale::GPST);
        let toc = Epoch::from_time_of_week(week, (toc * 1e9).round() as u64, TimeScale::BDT)
            .to_time_scale(TimeScale::GPST);
        let eph = Ephemeris {
            sv,
            iode,
            iodc,
            sva,
            svh,
            week,
            code: 0,
            flag: 0,
            toe,
            toc,
            ttr: self.epoch_or_now(),
            semi_major_axis_m: sqrt_a * sqrt_a,
            eccentricity: e,
            i0_rad: i0,
            omega0_rad: omg0,
            omega_rad: omg,
            m0_rad: m0,
            delta_n_rad_s: deln,
            idot_rad_s: idot,
            omega_dot_rad_s: omgd,
            cuc_rad: cuc,
            cus_rad: cus,
            cic_rad: cic,
            cis_rad: cis,
            crc_m: crc,
            crs_m: crs,
            toes,
            fit: 0.0,
            af0,
            af1,
            af2,
            tgd: [tgd1, tgd2],
        };
        if !self.opts.eph_all {
            if let Some(stored) = self.nav.eph.get(&sv) {
                if stored.iode == eph.iode && stored.toes == eph.toes {
                    return Ok(Status::None);
                }
            }
        }
        self.nav.eph.insert(sv, eph);
        self.eph_sv = Some(sv);
        Ok(Status::Ephemeris)
    }

    /// 1020: Glonass broadcast ephemeris (sign-magnitude state
    /// vectors, day based timing)
    pub(crate) fn decode_eph_glo(&mut self, buf: &[u8]) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        if i + 348 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let prn = get_unsigned(buf, i, 6);
        i += 6;
        let fcn = get_unsigned(buf, i, 5) as i8 - 7;
        i += 5 + 2 + 2;
        let tk_h = get_unsigned(buf, i, 5) as f64;
        i += 5;
        let tk_m = get_unsigned(buf, i, 6) as f64;
        i += 6;
        let tk_s = get_unsigned(buf, i, 1) as f64 * 30.0;
        i += 1;
        let bn = get_unsigned(buf, i, 1) as u8;
        i += 1 + 1;
        let tb = get_unsigned(buf, i, 7);
        i += 7;
        let mut velocity = [0.0f64; 3];
        let mut position = [0.0f64; 3];
        let mut acceleration = [0.0f64; 3];
        for axis in 0..3 {
            velocity[axis] = get_sign_magnitude(buf, i, 24) * P2_20 * 1e3;
            i += 24;
            position[axis] = get_sign_magnitude(buf, i, 27) * P2_11 * 1e3;
            i += 27;
            acceleration[axis] = get_sign_magnitude(buf, i, 5) * P2_30 * 1e3;
            i += 5;
        }
        let gamn = get_sign_magnitude(buf, i, 11) * P2_40;
        i += 11 + 3;
        let taun = get_sign_magnitude(buf, i, 22) * P2_30;
        i += 22;
        let dtaun = get_sign_magnitude(buf, i, 5) * P2_30;
        i += 5;
        let age = get_unsigned(buf, i, 5) as u8;

        let sv = match SV::try_new(Constellation::Glonass, prn as u8) {
            Some(sv) => sv,
            None => {
                debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                return Ok(Status::None);
            },
        };
        let current = self.epoch_or_now();
        // frame time and epoch of ephemeris, Moscow day to UTC
        let tof = time::glo_utc_tod_to_gpst(
            current,
            tk_h * 3600.0 + tk_m * 60.0 + tk_s - time::GLO_UTC_OFFSET_SECONDS,
        );
        let toe = time::glo_utc_tod_to_gpst(
            current,
            tb as f64 * 900.0 - time::GLO_UTC_OFFSET_SECONDS,
        );
        let geph = GloEphemeris {
            sv,
            iode: (tb & 0x7F) as u16,
            fcn,
            svh: bn,
            age,
            toe,
            tof,
            position_m: position,
            velocity_m_s: velocity,
            acceleration_m_s2: acceleration,
            taun_s: taun,
            gamn,
            dtaun_s: dtaun,
        };
        if !self.opts.eph_all {
            if let Some(stored) = self.nav.geph.get(&(prn as u8)) {
                if stored.iode == geph.iode {
                    return Ok(Status::None);
                }
            }
        }
        self.nav.geph.insert(prn as u8, geph);
        self.eph_sv = Some(sv);
        Ok(Status::Ephemeris)
    }
}
