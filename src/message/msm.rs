//! Multiple Signal Message decoders, MSM4 to MSM7: satellite and
//! signal masks, cell mask, rough per satellite ranges refined by per
//! cell fine fields, and the per band code-priority selection filling
//! the observation slots.
use crate::bits::{get_signed, get_unsigned};
use crate::carrier::Carrier;
use crate::constants::{P2_10, P2_24, P2_29, P2_31, RANGE_MS};
use crate::constellation::Constellation;
use crate::observable::Code;
use crate::observation::{LliFlags, NEXOBS, NFREQ};
use crate::opts::Options;
use crate::rtcm::{snratio, Rtcm, Status};
use crate::sv::SV;
use crate::{time, Error};
use hifitime::Epoch;
use log::{debug, warn};
use std::str::FromStr;

/// Fine field marked absent on the wire
const ABSENT: f64 = -1e16;

/// MSM signal id (1..=32) to signal name, per constellation.
/// Positions follow the RTCM 3.2/3.3 tables; BeiDou keeps the early
/// draft "1x" B1 names for replay compatibility.
const MSM_SIG_GPS: [&str; 32] = [
    "", "1C", "1P", "1W", "", "", "", "2C", "2P", "2W", "", "",
    "", "", "2S", "2L", "2X", "", "", "", "", "5I", "5Q", "5X",
    "", "", "", "", "", "1S", "1L", "1X",
];
const MSM_SIG_GLO: [&str; 32] = [
    "", "1C", "1P", "", "", "", "", "2C", "2P", "", "3I", "3Q",
    "3X", "", "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "",
];
const MSM_SIG_GAL: [&str; 32] = [
    "", "1C", "1A", "1B", "1X", "1Z", "", "6C", "6A", "6B", "6X", "6Z",
    "", "7I", "7Q", "7X", "", "8I", "8Q", "8X", "", "5I", "5Q", "5X",
    "", "", "", "", "", "", "", "",
];
const MSM_SIG_QZS: [&str; 32] = [
    "", "1C", "", "", "", "", "", "", "6S", "6L", "6X", "",
    "", "", "2S", "2L", "2X", "", "", "", "", "5I", "5Q", "5X",
    "", "", "", "", "", "1S", "1L", "1X",
];
const MSM_SIG_SBS: [&str; 32] = [
    "", "1C", "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "5I", "5Q", "5X",
    "", "", "", "", "", "", "", "",
];
const MSM_SIG_BDS: [&str; 32] = [
    "", "1I", "1Q", "1X", "", "", "", "6I", "6Q", "6X", "", "",
    "", "7I", "7Q", "7X", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "",
];

fn signal_table(sys: Constellation) -> &'static [&'static str; 32] {
    match sys {
        Constellation::GPS | Constellation::LEO => &MSM_SIG_GPS,
        Constellation::Glonass => &MSM_SIG_GLO,
        Constellation::Galileo => &MSM_SIG_GAL,
        Constellation::QZSS => &MSM_SIG_QZS,
        Constellation::SBAS => &MSM_SIG_SBS,
        Constellation::BeiDou => &MSM_SIG_BDS,
    }
}

struct MsmHeader {
    sync: bool,
    /// Satellite ids (1..=64) with their mask bit set
    sats: Vec<u8>,
    /// Signal ids (1..=32) with their mask bit set
    sigs: Vec<u8>,
    /// nsat x nsig cell selection
    cellmask: Vec<bool>,
}

/// Assigns each signal an observation slot: per band, the highest
/// priority code wins the main slot `band - 1`; everything else goes
/// to the extended slots in first-seen order until they run out.
/// Bands above [NFREQ] are always extended.
fn sig_index(
    sys: Constellation,
    codes: &[Code],
    bands: &[u8],
    opts: &Options,
) -> Vec<Option<usize>> {
    let n = codes.len();
    let mut extended = vec![false; n];
    let mut best_pri = [0u8; 8];
    let mut best = [0usize; 8]; // 1-based signal index per band
    for i in 0..n {
        if codes[i] == Code::None || bands[i] == 0 {
            continue;
        }
        let band = bands[i] as usize;
        if band > NFREQ {
            extended[i] = true;
            continue;
        }
        let pri = codes[i].priority(sys, opts);
        if pri > best_pri[band - 1] {
            if best[band - 1] != 0 {
                extended[best[band - 1] - 1] = true;
            }
            best_pri[band - 1] = pri;
            best[band - 1] = i + 1;
        } else {
            extended[i] = true;
        }
    }
    let mut slots = vec![None; n];
    let mut nex = 0;
    for i in 0..n {
        if codes[i] == Code::None || bands[i] == 0 {
            continue;
        }
        if !extended[i] {
            slots[i] = Some(bands[i] as usize - 1);
        } else if nex < NEXOBS {
            slots[i] = Some(NFREQ + nex);
            nex += 1;
        } else {
            // no space left in the observation record
            warn!(
                "rtcm3 msm: no space in obs data sys={} code={}",
                sys, codes[i]
            );
        }
    }
    slots
}

impl Rtcm {
    /// Common MSM header: station id, constellation specific epoch,
    /// multiple-message flag, issue of data, clock steering and
    /// smoothing metadata, satellite / signal / cell masks.
    fn decode_msm_head(
        &mut self,
        buf: &[u8],
        sys: Constellation,
    ) -> Result<(Epoch, MsmHeader, usize, usize), Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        if i + 157 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let staid = get_unsigned(buf, i, 12) as u16;
        i += 12;
        let epoch = match sys {
            Constellation::Glonass => {
                let _dow = get_unsigned(buf, i, 3);
                i += 3;
                let tod = get_unsigned(buf, i, 27) as f64 * 0.001;
                i += 27;
                time::adjust_daily_tod_glo(self.epoch_or_now(), tod)
            },
            Constellation::BeiDou => {
                // BDT to GPS time
                let tow = get_unsigned(buf, i, 30) as f64 * 0.001 + 14.0;
                i += 30;
                time::adjust_weekly_tow(self.epoch_or_now(), tow)
            },
            _ => {
                let tow = get_unsigned(buf, i, 30) as f64 * 0.001;
                i += 30;
                time::adjust_weekly_tow(self.epoch_or_now(), tow)
            },
        };
        self.time = Some(epoch);
        let sync = get_unsigned(buf, i, 1) != 0;
        i += 1;
        let _iod = get_unsigned(buf, i, 3);
        i += 3;
        let _time_s = get_unsigned(buf, i, 7);
        i += 7;
        let _clk_str = get_unsigned(buf, i, 2);
        i += 2;
        let _clk_ext = get_unsigned(buf, i, 2);
        i += 2;
        let _smooth = get_unsigned(buf, i, 1);
        i += 1;
        let _tint_s = get_unsigned(buf, i, 3);
        i += 3;
        let mut sats = Vec::new();
        for j in 1..=64u8 {
            if get_unsigned(buf, i, 1) != 0 {
                sats.push(j);
            }
            i += 1;
        }
        let mut sigs = Vec::new();
        for j in 1..=32u8 {
            if get_unsigned(buf, i, 1) != 0 {
                sigs.push(j);
            }
            i += 1;
        }
        self.test_staid(mtype, staid)?;
        if sats.len() * sigs.len() > 64 {
            return Err(Error::CellMaskOverflow {
                mtype,
                nsat: sats.len(),
                nsig: sigs.len(),
            });
        }
        if i + sats.len() * sigs.len() > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let mut cellmask = Vec::with_capacity(sats.len() * sigs.len());
        let mut ncell = 0;
        for _ in 0..sats.len() * sigs.len() {
            let bit = get_unsigned(buf, i, 1) != 0;
            i += 1;
            ncell += usize::from(bit);
            cellmask.push(bit);
        }
        Ok((
            epoch,
            MsmHeader {
                sync,
                sats,
                sigs,
                cellmask,
            },
            ncell,
            i,
        ))
    }

    /// MSM4: full pseudorange + phaserange + CNR
    pub(crate) fn decode_msm4(&mut self, buf: &[u8], sys: Constellation) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, h, ncell, mut i) = self.decode_msm_head(buf, sys)?;
        let nsat = h.sats.len();
        if i + nsat * 18 + ncell * 48 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let mut r = vec![0.0f64; nsat];
        for rough in r.iter_mut() {
            let rng = get_unsigned(buf, i, 8);
            i += 8;
            if rng != 255 {
                *rough = rng as f64 * RANGE_MS;
            }
        }
        for rough in r.iter_mut() {
            let rng_m = get_unsigned(buf, i, 10);
            i += 10;
            if *rough != 0.0 {
                *rough += rng_m as f64 * P2_10 * RANGE_MS;
            }
        }
        let mut pr = vec![ABSENT; ncell];
        let mut cp = vec![ABSENT; ncell];
        let mut lock = vec![0u16; ncell];
        let mut half = vec![false; ncell];
        let mut cnr = vec![0.0f64; ncell];
        for fine in pr.iter_mut() {
            let value = get_signed(buf, i, 15);
            i += 15;
            if value != -16384 {
                *fine = value as f64 * P2_24 * RANGE_MS;
            }
        }
        for fine in cp.iter_mut() {
            let value = get_signed(buf, i, 22);
            i += 22;
            if value != -2097152 {
                *fine = value as f64 * P2_29 * RANGE_MS;
            }
        }
        for value in lock.iter_mut() {
            *value = get_unsigned(buf, i, 4) as u16;
            i += 4;
        }
        for value in half.iter_mut() {
            *value = get_unsigned(buf, i, 1) != 0;
            i += 1;
        }
        for value in cnr.iter_mut() {
            *value = get_unsigned(buf, i, 6) as f64;
            i += 6;
        }
        self.save_msm_obs(
            sys, epoch, &h, &r, &pr, &cp, None, None, &lock, None, &half, &cnr,
        );
        self.obs_complete = !h.sync;
        Ok(if h.sync { Status::None } else { Status::ObsEpoch })
    }

    /// MSM5: MSM4 plus Doppler and the Glonass extended (frequency
    /// channel) information
    pub(crate) fn decode_msm5(&mut self, buf: &[u8], sys: Constellation) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, h, ncell, mut i) = self.decode_msm_head(buf, sys)?;
        let nsat = h.sats.len();
        if i + nsat * 36 + ncell * 63 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let mut r = vec![0.0f64; nsat];
        let mut rr = vec![0.0f64; nsat];
        let mut ex = vec![15u8; nsat];
        for rough in r.iter_mut() {
            let rng = get_unsigned(buf, i, 8);
            i += 8;
            if rng != 255 {
                *rough = rng as f64 * RANGE_MS;
            }
        }
        for info in ex.iter_mut() {
            *info = get_unsigned(buf, i, 4) as u8;
            i += 4;
        }
        for rough in r.iter_mut() {
            let rng_m = get_unsigned(buf, i, 10);
            i += 10;
            if *rough != 0.0 {
                *rough += rng_m as f64 * P2_10 * RANGE_MS;
            }
        }
        for rate in rr.iter_mut() {
            let value = get_signed(buf, i, 14);
            i += 14;
            if value != -8192 {
                *rate = value as f64;
            }
        }
        let mut pr = vec![ABSENT; ncell];
        let mut cp = vec![ABSENT; ncell];
        let mut rrf = vec![ABSENT; ncell];
        let mut lock = vec![0u16; ncell];
        let mut half = vec![false; ncell];
        let mut cnr = vec![0.0f64; ncell];
        for fine in pr.iter_mut() {
            let value = get_signed(buf, i, 15);
            i += 15;
            if value != -16384 {
                *fine = value as f64 * P2_24 * RANGE_MS;
            }
        }
        for fine in cp.iter_mut() {
            let value = get_signed(buf, i, 22);
            i += 22;
            if value != -2097152 {
                *fine = value as f64 * P2_29 * RANGE_MS;
            }
        }
        for value in lock.iter_mut() {
            *value = get_unsigned(buf, i, 4) as u16;
            i += 4;
        }
        for value in half.iter_mut() {
            *value = get_unsigned(buf, i, 1) != 0;
            i += 1;
        }
        for value in cnr.iter_mut() {
            *value = get_unsigned(buf, i, 6) as f64;
            i += 6;
        }
        for fine in rrf.iter_mut() {
            let value = get_signed(buf, i, 15);
            i += 15;
            if value != -16384 {
                *fine = value as f64 * 0.0001;
            }
        }
        self.save_msm_obs(
            sys,
            epoch,
            &h,
            &r,
            &pr,
            &cp,
            Some(&rr),
            Some(&rrf),
            &lock,
            Some(&ex),
            &half,
            &cnr,
        );
        self.obs_complete = !h.sync;
        Ok(if h.sync { Status::None } else { Status::ObsEpoch })
    }

    /// MSM6: MSM4 widened to high resolution fields
    pub(crate) fn decode_msm6(&mut self, buf: &[u8], sys: Constellation) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, h, ncell, mut i) = self.decode_msm_head(buf, sys)?;
        let nsat = h.sats.len();
        if i + nsat * 18 + ncell * 65 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let mut r = vec![0.0f64; nsat];
        for rough in r.iter_mut() {
            let rng = get_unsigned(buf, i, 8);
            i += 8;
            if rng != 255 {
                *rough = rng as f64 * RANGE_MS;
            }
        }
        for rough in r.iter_mut() {
            let rng_m = get_unsigned(buf, i, 10);
            i += 10;
            if *rough != 0.0 {
                *rough += rng_m as f64 * P2_10 * RANGE_MS;
            }
        }
        let mut pr = vec![ABSENT; ncell];
        let mut cp = vec![ABSENT; ncell];
        let mut lock = vec![0u16; ncell];
        let mut half = vec![false; ncell];
        let mut cnr = vec![0.0f64; ncell];
        for fine in pr.iter_mut() {
            let value = get_signed(buf, i, 20);
            i += 20;
            if value != -524288 {
                *fine = value as f64 * P2_29 * RANGE_MS;
            }
        }
        for fine in cp.iter_mut() {
            let value = get_signed(buf, i, 24);
            i += 24;
            if value != -8388608 {
                *fine = value as f64 * P2_31 * RANGE_MS;
            }
        }
        for value in lock.iter_mut() {
            *value = get_unsigned(buf, i, 10) as u16;
            i += 10;
        }
        for value in half.iter_mut() {
            *value = get_unsigned(buf, i, 1) != 0;
            i += 1;
        }
        for value in cnr.iter_mut() {
            *value = get_unsigned(buf, i, 10) as f64 * 0.0625;
            i += 10;
        }
        self.save_msm_obs(
            sys, epoch, &h, &r, &pr, &cp, None, None, &lock, None, &half, &cnr,
        );
        self.obs_complete = !h.sync;
        Ok(if h.sync { Status::None } else { Status::ObsEpoch })
    }

    /// MSM7: MSM5 widened to high resolution fields
    pub(crate) fn decode_msm7(&mut self, buf: &[u8], sys: Constellation) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let (epoch, h, ncell, mut i) = self.decode_msm_head(buf, sys)?;
        let nsat = h.sats.len();
        if i + nsat * 36 + ncell * 85 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let mut r = vec![0.0f64; nsat];
        let mut rr = vec![0.0f64; nsat];
        let mut ex = vec![15u8; nsat];
        for rough in r.iter_mut() {
            let rng = get_unsigned(buf, i, 8);
            i += 8;
            if rng != 255 {
                *rough = rng as f64 * RANGE_MS;
            }
        }
        for info in ex.iter_mut() {
            *info = get_unsigned(buf, i, 4) as u8;
            i += 4;
        }
        for rough in r.iter_mut() {
            let rng_m = get_unsigned(buf, i, 10);
            i += 10;
            if *rough != 0.0 {
                *rough += rng_m as f64 * P2_10 * RANGE_MS;
            }
        }
        for rate in rr.iter_mut() {
            let value = get_signed(buf, i, 14);
            i += 14;
            if value != -8192 {
                *rate = value as f64;
            }
        }
        let mut pr = vec![ABSENT; ncell];
        let mut cp = vec![ABSENT; ncell];
        let mut rrf = vec![ABSENT; ncell];
        let mut lock = vec![0u16; ncell];
        let mut half = vec![false; ncell];
        let mut cnr = vec![0.0f64; ncell];
        for fine in pr.iter_mut() {
            let value = get_signed(buf, i, 20);
            i += 20;
            if value != -524288 {
                *fine = value as f64 * P2_29 * RANGE_MS;
            }
        }
        for fine in cp.iter_mut() {
            let value = get_signed(buf, i, 24);
            i += 24;
            if value != -8388608 {
                *fine = value as f64 * P2_31 * RANGE_MS;
            }
        }
        for value in lock.iter_mut() {
            *value = get_unsigned(buf, i, 10) as u16;
            i += 10;
        }
        for value in half.iter_mut() {
            *value = get_unsigned(buf, i, 1) != 0;
            i += 1;
        }
        for value in cnr.iter_mut() {
            *value = get_unsigned(buf, i, 10) as f64 * 0.0625;
            i += 10;
        }
        for fine in rrf.iter_mut() {
            let value = get_signed(buf, i, 20);
            i += 20;
            if value != -524288 {
                *fine = value as f64 * 0.0001;
            }
        }
        self.save_msm_obs(
            sys,
            epoch,
            &h,
            &r,
            &pr,
            &cp,
            Some(&rr),
            Some(&rrf),
            &lock,
            Some(&ex),
            &half,
            &cnr,
        );
        self.obs_complete = !h.sync;
        Ok(if h.sync { Status::None } else { Status::ObsEpoch })
    }

    /// Cell by cell observation assembly: resolves signal ids to
    /// codes, assigns observation slots by code priority, computes
    /// wavelengths (Glonass FDMA through the extended info or the
    /// stored ephemeris channel) and combines rough + fine fields.
    #[allow(clippy::too_many_arguments)]
    fn save_msm_obs(
        &mut self,
        sys: Constellation,
        epoch: Epoch,
        h: &MsmHeader,
        r: &[f64],
        pr: &[f64],
        cp: &[f64],
        rr: Option<&[f64]>,
        rrf: Option<&[f64]>,
        lock: &[u16],
        ex: Option<&[u8]>,
        half: &[bool],
        cnr: &[f64],
    ) {
        let nsig = h.sigs.len();
        let mut codes = vec![Code::None; nsig];
        let mut bands = vec![0u8; nsig];
        for (k, sig) in h.sigs.iter().enumerate() {
            let name = signal_table(sys)[*sig as usize - 1];
            match Code::from_str(name) {
                Ok(code) => {
                    codes[k] = code;
                    let mut band = code.band();
                    // BeiDou signal slots: B2 and B3 fold down
                    if sys == Constellation::BeiDou {
                        if band == 5 {
                            band = 2;
                        } else if band == 4 {
                            band = 3;
                        }
                    }
                    bands[k] = band;
                },
                Err(_) => {
                    warn!("rtcm3 msm {}: unknown signal id={}", sys, sig);
                },
            }
        }
        let slots = sig_index(sys, &codes, &bands, &self.opts);

        let mut j = 0;
        for (s, sat) in h.sats.iter().enumerate() {
            let prn = match sys {
                Constellation::QZSS => *sat as u32 + 192,
                Constellation::SBAS => *sat as u32 + 119,
                _ => *sat as u32,
            };
            let sv = SV::try_new(sys, prn as u8);
            let index = match sv {
                Some(sv) => self.obs_index(epoch, sv),
                None => {
                    debug!("rtcm3 msm satellite error: sys={} prn={}", sys, prn);
                    None
                },
            };
            for k in 0..nsig {
                if !h.cellmask[k + s * nsig] {
                    continue;
                }
                if let (Some(sv), Some(index), Some(slot)) = (sv, index, slots[k]) {
                    // satellite carrier wave length
                    let fcn = if sys == Constellation::Glonass {
                        match ex {
                            Some(ex) if ex[s] <= 13 => Some(ex[s] as i8 - 7),
                            _ => self.nav.glo_fcn(prn as u8),
                        }
                    } else {
                        None
                    };
                    let wl = Carrier::from_band(bands[k])
                        .ok()
                        .and_then(|carrier| carrier.wavelength(sys, fcn))
                        .unwrap_or(0.0);
                    let mut lli = self.lossoflock(sv, slot, lock[j]);
                    if half[j] {
                        lli |= LliFlags::LOCK_LOSS | LliFlags::HALF_CYCLE_AMBIGUITY;
                    }
                    let obs = &mut self.obs.data[index];
                    if r[s] != 0.0 && pr[j] > -1e12 {
                        obs.pseudorange_m[slot] = r[s] + pr[j];
                    }
                    if r[s] != 0.0 && cp[j] > -1e12 && wl > 0.0 {
                        obs.carrier_phase_cyc[slot] = (r[s] + cp[j]) / wl;
                    }
                    if let (Some(rr), Some(rrf)) = (rr, rrf) {
                        if rr[s] != 0.0 && rrf[j] > -1e12 && wl > 0.0 {
                            obs.doppler_hz[slot] = -(rr[s] + rrf[j]) / wl;
                        }
                    }
                    obs.lli[slot] = lli;
                    obs.snr[slot] = snratio(cnr[j]);
                    obs.code[slot] = codes[k];
                }
                j += 1;
            }
        }
    }
}
