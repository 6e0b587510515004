//! SSR correction decoders: orbit (SSR1), clock (SSR2), code bias
//! (SSR3), combined orbit+clock (SSR4), URA (SSR5) and high rate
//! clock (SSR6), for GPS 1057-1062, Glonass 1063-1068, Galileo
//! 1240-1245, QZSS 1246-1251, SBAS 1252-1257 and BeiDou 1258-1263.
use crate::bits::{get_signed, get_unsigned};
use crate::constellation::Constellation;
use crate::observable::Code;
use crate::rtcm::{Rtcm, Status};
use crate::ssr::{SsrKind, UPDATE_INTERVAL_S};
use crate::sv::SV;
use crate::{time, Error};
use hifitime::Epoch;
use log::{debug, warn};

/// Signal-and-tracking-mode id to observation code, per
/// constellation (SSR3 code bias tables)
const CODES_GPS: [Code; 17] = [
    Code::L1C, Code::L1P, Code::L1W, Code::L1Y, Code::L1M, Code::L2C,
    Code::L2D, Code::L2S, Code::L2L, Code::L2X, Code::L2P, Code::L2W,
    Code::L2Y, Code::L2M, Code::L5I, Code::L5Q, Code::L5X,
];
const CODES_GLO: [Code; 4] = [Code::L1C, Code::L1P, Code::L2C, Code::L2P];
const CODES_GAL: [Code; 19] = [
    Code::L1A, Code::L1B, Code::L1C, Code::L1X, Code::L1Z, Code::L5I,
    Code::L5Q, Code::L5X, Code::L7I, Code::L7Q, Code::L7X, Code::L8I,
    Code::L8Q, Code::L8X, Code::L6A, Code::L6B, Code::L6C, Code::L6X,
    Code::L6Z,
];
const CODES_QZS: [Code; 13] = [
    Code::L1C, Code::L1S, Code::L1L, Code::L2S, Code::L2L, Code::L2X,
    Code::L5I, Code::L5Q, Code::L5X, Code::L6S, Code::L6L, Code::L6X,
    Code::L1X,
];
const CODES_BDS: [Code; 9] = [
    Code::L1I, Code::L1Q, Code::L1X, Code::L7I, Code::L7Q, Code::L7X,
    Code::L6I, Code::L6Q, Code::L6X,
];
const CODES_SBS: [Code; 4] = [Code::L1C, Code::L5I, Code::L5Q, Code::L5X];

fn bias_codes(sys: Constellation) -> &'static [Code] {
    match sys {
        Constellation::GPS => &CODES_GPS,
        Constellation::Glonass => &CODES_GLO,
        Constellation::Galileo => &CODES_GAL,
        Constellation::QZSS => &CODES_QZS,
        Constellation::BeiDou => &CODES_BDS,
        Constellation::SBAS => &CODES_SBS,
        Constellation::LEO => &[],
    }
}

/// Per satellite field widths: PRN, IODE, IODCRC bits and PRN offset
fn sat_params(sys: Constellation) -> (usize, usize, usize, u32) {
    match sys {
        Constellation::GPS => (6, 8, 0, 0),
        Constellation::Glonass => (5, 8, 0, 0),
        Constellation::Galileo => (6, 10, 0, 0),
        Constellation::QZSS => (4, 8, 0, 192),
        Constellation::BeiDou => (6, 10, 24, 1),
        Constellation::SBAS => (6, 9, 24, 120),
        Constellation::LEO => (0, 0, 0, 0),
    }
}

struct SsrHead {
    sync: bool,
    iod: u8,
    udi: f64,
    ref_datum: u8,
    nsat: usize,
}

impl Rtcm {
    /// Common SSR header: epoch, update interval, sync flag,
    /// (optionally) reference datum, issue of data, provider and
    /// solution ids, satellite count.
    fn decode_ssr_head(
        &mut self,
        buf: &[u8],
        sys: Constellation,
        with_datum: bool,
    ) -> Result<(Epoch, SsrHead, usize), Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        let ns = if sys == Constellation::QZSS { 4 } else { 6 };
        let glo = sys == Constellation::Glonass;
        let mut need = (if glo { 47 } else { 50 }) + ns;
        if !with_datum {
            need -= 1;
        }
        if i + need > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let epoch = if glo {
            let tod = get_unsigned(buf, i, 17) as f64;
            i += 17;
            time::adjust_daily_tod_glo(self.epoch_or_now(), tod)
        } else {
            let tow = get_unsigned(buf, i, 20) as f64;
            i += 20;
            time::adjust_weekly_tow(self.epoch_or_now(), tow)
        };
        self.time = Some(epoch);
        let udi = get_unsigned(buf, i, 4) as usize;
        i += 4;
        let sync = get_unsigned(buf, i, 1) != 0;
        i += 1;
        let ref_datum = if with_datum {
            let datum = get_unsigned(buf, i, 1) as u8;
            i += 1;
            datum
        } else {
            0
        };
        let iod = get_unsigned(buf, i, 4) as u8;
        i += 4;
        let _provider_id = get_unsigned(buf, i, 16);
        i += 16;
        let _solution_id = get_unsigned(buf, i, 4);
        i += 4;
        let nsat = get_unsigned(buf, i, ns) as usize;
        i += ns;
        Ok((
            epoch,
            SsrHead {
                sync,
                iod,
                udi: UPDATE_INTERVAL_S[udi],
                ref_datum,
                nsat,
            },
            i,
        ))
    }

    /// SSR1: orbit corrections
    pub(crate) fn decode_ssr_orbit(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, head, mut i) = self.decode_ssr_head(buf, sys, true)?;
        let (np, ni, nj, offp) = sat_params(sys);
        for _ in 0..head.nsat {
            if i + 121 + np + ni + nj > buf.len() * 8 {
                break;
            }
            let prn = get_unsigned(buf, i, np) + offp;
            i += np;
            let iode = get_unsigned(buf, i, ni) as u16;
            i += ni;
            let iodcrc = get_unsigned(buf, i, nj);
            i += nj;
            let deph = [
                get_signed(buf, i, 22) as f64 * 1e-4,
                get_signed(buf, i + 22, 20) as f64 * 4e-4,
                get_signed(buf, i + 42, 20) as f64 * 4e-4,
            ];
            i += 62;
            let ddeph = [
                get_signed(buf, i, 21) as f64 * 1e-6,
                get_signed(buf, i + 21, 19) as f64 * 4e-6,
                get_signed(buf, i + 40, 19) as f64 * 4e-6,
            ];
            i += 59;
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let ssr = self.ssr.entry(sv).or_default();
            ssr.stamp(SsrKind::Orbit, epoch, head.udi, head.iod);
            ssr.iode = iode;
            ssr.iodcrc = iodcrc;
            ssr.ref_datum = head.ref_datum;
            ssr.deph_m = deph;
            ssr.ddeph_m_s = ddeph;
        }
        Ok(if head.sync { Status::None } else { Status::Ssr })
    }

    /// SSR2: clock corrections
    pub(crate) fn decode_ssr_clock(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, head, mut i) = self.decode_ssr_head(buf, sys, false)?;
        let (np, _, _, offp) = sat_params(sys);
        for _ in 0..head.nsat {
            if i + 70 + np > buf.len() * 8 {
                break;
            }
            let prn = get_unsigned(buf, i, np) + offp;
            i += np;
            let dclk = [
                get_signed(buf, i, 22) as f64 * 1e-4,
                get_signed(buf, i + 22, 21) as f64 * 1e-6,
                get_signed(buf, i + 43, 27) as f64 * 2e-8,
            ];
            i += 70;
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let ssr = self.ssr.entry(sv).or_default();
            ssr.stamp(SsrKind::Clock, epoch, head.udi, head.iod);
            ssr.dclk = dclk;
        }
        Ok(if head.sync { Status::None } else { Status::Ssr })
    }

    /// SSR3: code biases
    pub(crate) fn decode_ssr_code_bias(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, head, mut i) = self.decode_ssr_head(buf, sys, false)?;
        let (np, _, _, offp) = sat_params(sys);
        let codes = bias_codes(sys);
        for _ in 0..head.nsat {
            if i + 5 + np > buf.len() * 8 {
                break;
            }
            let prn = get_unsigned(buf, i, np) + offp;
            i += np;
            let nbias = get_unsigned(buf, i, 5) as usize;
            i += 5;
            let mut biases = Vec::with_capacity(nbias);
            for _ in 0..nbias {
                if i + 19 > buf.len() * 8 {
                    break;
                }
                let mode = get_unsigned(buf, i, 5) as usize;
                i += 5;
                let bias = get_signed(buf, i, 14) as f64 * 0.01;
                i += 14;
                match codes.get(mode) {
                    Some(code) => biases.push((*code, bias)),
                    None => {
                        warn!("rtcm3 {} not supported mode: mode={}", mtype, mode);
                    },
                }
            }
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let ssr = self.ssr.entry(sv).or_default();
            ssr.stamp(SsrKind::CodeBias, epoch, head.udi, head.iod);
            for (code, bias) in biases {
                ssr.code_bias_m.insert(code, bias);
            }
        }
        Ok(if head.sync { Status::None } else { Status::Ssr })
    }

    /// SSR4: combined orbit and clock corrections, shared issue of
    /// data
    pub(crate) fn decode_ssr_combined(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, head, mut i) = self.decode_ssr_head(buf, sys, true)?;
        let (np, ni, nj, offp) = sat_params(sys);
        for _ in 0..head.nsat {
            if i + 191 + np + ni + nj > buf.len() * 8 {
                break;
            }
            let prn = get_unsigned(buf, i, np) + offp;
            i += np;
            let iode = get_unsigned(buf, i, ni) as u16;
            i += ni;
            let iodcrc = get_unsigned(buf, i, nj);
            i += nj;
            let deph = [
                get_signed(buf, i, 22) as f64 * 1e-4,
                get_signed(buf, i + 22, 20) as f64 * 4e-4,
                get_signed(buf, i + 42, 20) as f64 * 4e-4,
            ];
            i += 62;
            let ddeph = [
                get_signed(buf, i, 21) as f64 * 1e-6,
                get_signed(buf, i + 21, 19) as f64 * 4e-6,
                get_signed(buf, i + 40, 19) as f64 * 4e-6,
            ];
            i += 59;
            let dclk = [
                get_signed(buf, i, 22) as f64 * 1e-4,
                get_signed(buf, i + 22, 21) as f64 * 1e-6,
                get_signed(buf, i + 43, 27) as f64 * 2e-8,
            ];
            i += 70;
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let ssr = self.ssr.entry(sv).or_default();
            ssr.stamp(SsrKind::Orbit, epoch, head.udi, head.iod);
            ssr.stamp(SsrKind::Clock, epoch, head.udi, head.iod);
            ssr.iode = iode;
            ssr.iodcrc = iodcrc;
            ssr.ref_datum = head.ref_datum;
            ssr.deph_m = deph;
            ssr.ddeph_m_s = ddeph;
            ssr.dclk = dclk;
        }
        Ok(if head.sync { Status::None } else { Status::Ssr })
    }

    /// SSR5: user range accuracy
    pub(crate) fn decode_ssr_ura(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, head, mut i) = self.decode_ssr_head(buf, sys, false)?;
        let (np, _, _, offp) = sat_params(sys);
        for _ in 0..head.nsat {
            if i + 6 + np > buf.len() * 8 {
                break;
            }
            let prn = get_unsigned(buf, i, np) + offp;
            i += np;
            let ura = get_unsigned(buf, i, 6) as u8;
            i += 6;
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let ssr = self.ssr.entry(sv).or_default();
            ssr.stamp(SsrKind::Ura, epoch, head.udi, head.iod);
            ssr.ura = ura;
        }
        Ok(if head.sync { Status::None } else { Status::Ssr })
    }

    /// SSR6: high rate clock corrections
    pub(crate) fn decode_ssr_high_rate_clock(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, head, mut i) = self.decode_ssr_head(buf, sys, false)?;
        let (np, _, _, offp) = sat_params(sys);
        for _ in 0..head.nsat {
            if i + 22 + np > buf.len() * 8 {
                break;
            }
            let prn = get_unsigned(buf, i, np) + offp;
            i += np;
            let hr_clk = get_signed(buf, i, 22) as f64 * 1e-4;
            i += 22;
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let ssr = self.ssr.entry(sv).or_default();
            ssr.stamp(SsrKind::HighRateClock, epoch, head.udi, head.iod);
            ssr.hr_clk_m = hr_clk;
        }
        Ok(if head.sync { Status::None } else { Status::Ssr })
    }
}
