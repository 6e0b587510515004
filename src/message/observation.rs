//! Legacy RTK observation decoders, message types 1001-1012. The
//! basic variants (1001/1003/1009/1011) only carry information the
//! extended ones repeat, so only their headers are consumed.
use crate::bits::{get_signed, get_unsigned};
use crate::carrier::Carrier;
use crate::constants::{PRUNIT_GLO, PRUNIT_GPS};
use crate::constellation::Constellation;
use crate::observable::Code;
use crate::observation::MAXOBS;
use crate::rtcm::{snratio, Rtcm, Status};
use crate::sv::SV;
use crate::{time, Error};
use hifitime::Epoch;
use log::debug;

/// 20-bit phase-range difference sentinel (0xFFF80000): phase absent
const PPR_ABSENT: i32 = -524_288;
/// 14-bit L2-L1 pseudorange difference sentinel (0xFFFFE000)
const PR21_ABSENT: i32 = -8_192;

/// L2 code indicator of the extended GPS messages
const L2_CODES: [Code; 4] = [Code::L2X, Code::L2P, Code::L2D, Code::L2W];

impl Rtcm {
    /// Common header of 1001-1012: station id, epoch (TOW for GPS,
    /// TOD for Glonass), synchronous flag, satellite count.
    fn decode_obs_header(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<(Epoch, bool, usize, usize), Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        let glo = sys == Constellation::Glonass;
        let need = if glo { 45 } else { 48 };
        if i + need > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let staid = get_unsigned(buf, i, 12) as u16;
        i += 12;
        let time = if glo {
            let tod = get_unsigned(buf, i, 27) as f64 * 0.001;
            i += 27;
            time::adjust_daily_tod_glo(self.epoch_or_now(), tod)
        } else {
            let tow = get_unsigned(buf, i, 30) as f64 * 0.001;
            i += 30;
            time::adjust_weekly_tow(self.epoch_or_now(), tow)
        };
        self.time = Some(time);
        let sync = get_unsigned(buf, i, 1) != 0;
        i += 1;
        let nsat = get_unsigned(buf, i, 5) as usize;
        i += 5;
        self.test_staid(mtype, staid)?;
        Ok((time, sync, nsat, i))
    }

    /// 1001/1003/1009/1011: header side effects only
    pub(crate) fn decode_obs_header_only(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<Status, Error> {
        let (_, sync, _, _) = self.decode_obs_header(buf, sys)?;
        self.obs_complete = !sync;
        Ok(if sync { Status::None } else { Status::ObsEpoch })
    }

    /// 1002 (L1) / 1004 (L1&L2) extended GPS observables
    pub(crate) fn decode_obs_gps(&mut self, buf: &[u8], l2: bool) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (time, sync, nsat, mut i) = self.decode_obs_header(buf, Constellation::GPS)?;
        let block = if l2 { 125 } else { 74 };
        let lam1 = Carrier::L1
            .wavelength(Constellation::GPS, None)
            .unwrap_or(0.0);
        let lam2 = Carrier::L2
            .wavelength(Constellation::GPS, None)
            .unwrap_or(0.0);
        for _ in 0..nsat {
            if self.obs.len() >= MAXOBS || i + block > buf.len() * 8 {
                break;
            }
            let mut prn = get_unsigned(buf, i, 6);
            i += 6;
            let code1 = get_unsigned(buf, i, 1);
            i += 1;
            let pr1_raw = get_unsigned(buf, i, 24);
            i += 24;
            let ppr1 = get_signed(buf, i, 20);
            i += 20;
            let lock1 = get_unsigned(buf, i, 7) as u16;
            i += 7;
            let amb = get_unsigned(buf, i, 8);
            i += 8;
            let cnr1 = get_unsigned(buf, i, 8);
            i += 8;
            let mut l2_fields = None;
            if l2 {
                let code2 = get_unsigned(buf, i, 2);
                i += 2;
                let pr21 = get_signed(buf, i, 14);
                i += 14;
                let ppr2 = get_signed(buf, i, 20);
                i += 20;
                let lock2 = get_unsigned(buf, i, 7) as u16;
                i += 7;
                let cnr2 = get_unsigned(buf, i, 8);
                i += 8;
                l2_fields = Some((code2, pr21, ppr2, lock2, cnr2));
            }
            let sys = if prn < 40 {
                Constellation::GPS
            } else {
                // embedded SBAS satellite
                prn += 80;
                Constellation::SBAS
            };
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let index = match self.obs_index(time, sv) {
                Some(index) => index,
                None => continue,
            };
            let pr1 = pr1_raw as f64 * 0.02 + amb as f64 * PRUNIT_GPS;
            self.obs.data[index].pseudorange_m[0] = pr1;
            if ppr1 != PPR_ABSENT {
                let cp1 = self.phase_cycles(sv, 0, ppr1, lam1);
                self.obs.data[index].carrier_phase_cyc[0] = pr1 / lam1 + cp1;
            }
            self.obs.data[index].lli[0] = self.lossoflock(sv, 0, lock1);
            self.obs.data[index].snr[0] = snratio(cnr1 as f64 * 0.25);
            self.obs.data[index].code[0] = if code1 != 0 { Code::L1P } else { Code::L1C };

            if let Some((code2, pr21, ppr2, lock2, cnr2)) = l2_fields {
                if pr21 != PR21_ABSENT {
                    self.obs.data[index].pseudorange_m[1] = pr1 + pr21 as f64 * 0.02;
                }
                if ppr2 != PPR_ABSENT {
                    let cp2 = self.phase_cycles(sv, 1, ppr2, lam2);
                    self.obs.data[index].carrier_phase_cyc[1] = pr1 / lam2 + cp2;
                }
                self.obs.data[index].lli[1] = self.lossoflock(sv, 1, lock2);
                self.obs.data[index].snr[1] = snratio(cnr2 as f64 * 0.25);
                self.obs.data[index].code[1] = L2_CODES[code2 as usize];
            }
        }
        self.obs_complete = !sync;
        Ok(if sync { Status::None } else { Status::ObsEpoch })
    }

    /// 1010 (L1) / 1012 (L1&L2) extended Glonass observables
    pub(crate) fn decode_obs_glo(&mut self, buf: &[u8], l2: bool) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (time, sync, nsat, mut i) = self.decode_obs_header(buf, Constellation::Glonass)?;
        let block = if l2 { 130 } else { 79 };
        for _ in 0..nsat {
            if self.obs.len() >= MAXOBS || i + block > buf.len() * 8 {
                break;
            }
            let mut prn = get_unsigned(buf, i, 6);
            i += 6;
            let code1 = get_unsigned(buf, i, 1);
            i += 1;
            let fcn = get_unsigned(buf, i, 5) as i8 - 7;
            i += 5;
            let pr1_raw = get_unsigned(buf, i, 25);
            i += 25;
            let ppr1 = get_signed(buf, i, 20);
            i += 20;
            let lock1 = get_unsigned(buf, i, 7) as u16;
            i += 7;
            let amb = get_unsigned(buf, i, 7);
            i += 7;
            let cnr1 = get_unsigned(buf, i, 8);
            i += 8;
            let mut l2_fields = None;
            if l2 {
                let code2 = get_unsigned(buf, i, 2);
                i += 2;
                let pr21 = get_signed(buf, i, 14);
                i += 14;
                let ppr2 = get_signed(buf, i, 20);
                i += 20;
                let lock2 = get_unsigned(buf, i, 7) as u16;
                i += 7;
                let cnr2 = get_unsigned(buf, i, 8);
                i += 8;
                l2_fields = Some((code2, pr21, ppr2, lock2, cnr2));
            }
            let sys = if prn < 40 {
                Constellation::Glonass
            } else {
                prn += 80;
                Constellation::SBAS
            };
            let sv = match SV::try_new(sys, prn as u8) {
                Some(sv) => sv,
                None => {
                    debug!("rtcm3 {} satellite number error: prn={}", mtype, prn);
                    continue;
                },
            };
            let index = match self.obs_index(time, sv) {
                Some(index) => index,
                None => continue,
            };
            let lam1 = Carrier::L1
                .wavelength(Constellation::Glonass, Some(fcn))
                .unwrap_or(0.0);
            let lam2 = Carrier::L2
                .wavelength(Constellation::Glonass, Some(fcn))
                .unwrap_or(0.0);
            let pr1 = pr1_raw as f64 * 0.02 + amb as f64 * PRUNIT_GLO;
            self.obs.data[index].pseudorange_m[0] = pr1;
            if ppr1 != PPR_ABSENT {
                let cp1 = self.phase_cycles(sv, 0, ppr1, lam1);
                self.obs.data[index].carrier_phase_cyc[0] = pr1 / lam1 + cp1;
            }
            self.obs.data[index].lli[0] = self.lossoflock(sv, 0, lock1);
            self.obs.data[index].snr[0] = snratio(cnr1 as f64 * 0.25);
            self.obs.data[index].code[0] = if code1 != 0 { Code::L1P } else { Code::L1C };

            if let Some((code2, pr21, ppr2, lock2, cnr2)) = l2_fields {
                if pr21 != PR21_ABSENT {
                    self.obs.data[index].pseudorange_m[1] = pr1 + pr21 as f64 * 0.02;
                }
                if ppr2 != PPR_ABSENT {
                    let cp2 = self.phase_cycles(sv, 1, ppr2, lam2);
                    self.obs.data[index].carrier_phase_cyc[1] = pr1 / lam2 + cp2;
                }
                self.obs.data[index].lli[1] = self.lossoflock(sv, 1, lock2);
                self.obs.data[index].snr[1] = snratio(cnr2 as f64 * 0.25);
                self.obs.data[index].code[1] = if code2 != 0 { Code::L2P } else { Code::L2C };
            }
        }
        self.obs_complete = !sync;
        Ok(if sync { Status::None } else { Status::ObsEpoch })
    }

    /// Phase-range difference field to continued carrier phase cycles
    fn phase_cycles(&mut self, sv: SV, slot: usize, ppr: i32, lam: f64) -> f64 {
        let mut cp = ppr as f64 * 0.0005 / lam;
        if self.opts.invert_phase {
            cp = -cp;
        }
        self.adjcp(sv, slot, cp)
    }
}
