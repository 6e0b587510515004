//! Message dispatcher: reads the 12-bit message type of a validated
//! frame and routes it to the matching decoder. Unsupported types are
//! counted and ignored.
mod ephemeris;
mod msm;
mod observation;
mod ssr;
mod station;

use crate::bits::get_unsigned;
use crate::constellation::Constellation;
use crate::rtcm::{Rtcm, Status};
use crate::{time, Error};
use log::{debug, trace};

impl Rtcm {
    /// Decodes one validated frame (header + payload) and applies its
    /// content to the control record.
    pub(crate) fn decode(&mut self, buf: &[u8]) -> Result<Status, Error> {
        if buf.len() < 5 {
            // zero (or one byte) payload: no message type field.
            // Tolerated, counted in the catch-all slot.
            debug!("rtcm3 frame without message type: len={}", buf.len());
            self.stats.bump(0);
            return Ok(Status::None);
        }
        let mtype = get_unsigned(buf, 24, 12) as u16;
        trace!("decode_rtcm3: len={} type={}", buf.len(), mtype);

        // real-time input option: stamp every frame with the host clock
        if self.opts.realtime_input {
            if let Some(now) = self.now() {
                let (week, tow) = time::gpst_tow(now);
                self.time = Some(time::gpst_from_tow(week, tow.floor()));
            }
        }

        use Constellation::{BeiDou, Galileo, Glonass, QZSS, SBAS, GPS};
        let status = match mtype {
            1001 => self.decode_obs_header_only(buf, GPS),
            1002 => self.decode_obs_gps(buf, false),
            1003 => self.decode_obs_header_only(buf, GPS),
            1004 => self.decode_obs_gps(buf, true),
            1005 => self.decode_station_position(buf, false),
            1006 => self.decode_station_position(buf, true),
            1007 => self.decode_antenna_descriptor(buf, false),
            1008 => self.decode_antenna_descriptor(buf, true),
            1009 => self.decode_obs_header_only(buf, Glonass),
            1010 => self.decode_obs_glo(buf, false),
            1011 => self.decode_obs_header_only(buf, Glonass),
            1012 => self.decode_obs_glo(buf, true),
            1019 => self.decode_eph_gps(buf),
            1020 => self.decode_eph_glo(buf),
            1033 => self.decode_receiver_antenna(buf),
            // 63: early draft of the BeiDou ephemeris
            63 | 1042 => self.decode_eph_bds(buf),
            1044 => self.decode_eph_qzs(buf),
            1045 => self.decode_eph_gal(buf, true),
            1046 => self.decode_eph_gal(buf, false),
            1057 => self.decode_ssr_orbit(buf, GPS),
            1058 => self.decode_ssr_clock(buf, GPS),
            1059 => self.decode_ssr_code_bias(buf, GPS),
            1060 => self.decode_ssr_combined(buf, GPS),
            1061 => self.decode_ssr_ura(buf, GPS),
            1062 => self.decode_ssr_high_rate_clock(buf, GPS),
            1063 => self.decode_ssr_orbit(buf, Glonass),
            1064 => self.decode_ssr_clock(buf, Glonass),
            1065 => self.decode_ssr_code_bias(buf, Glonass),
            1066 => self.decode_ssr_combined(buf, Glonass),
            1067 => self.decode_ssr_ura(buf, Glonass),
            1068 => self.decode_ssr_high_rate_clock(buf, Glonass),
            1074 => self.decode_msm4(buf, GPS),
            1075 => self.decode_msm5(buf, GPS),
            1076 => self.decode_msm6(buf, GPS),
            1077 => self.decode_msm7(buf, GPS),
            1084 => self.decode_msm4(buf, Glonass),
            1085 => self.decode_msm5(buf, Glonass),
            1086 => self.decode_msm6(buf, Glonass),
            1087 => self.decode_msm7(buf, Glonass),
            1094 => self.decode_msm4(buf, Galileo),
            1095 => self.decode_msm5(buf, Galileo),
            1096 => self.decode_msm6(buf, Galileo),
            1097 => self.decode_msm7(buf, Galileo),
            1104 => self.decode_msm4(buf, SBAS),
            1105 => self.decode_msm5(buf, SBAS),
            1106 => self.decode_msm6(buf, SBAS),
            1107 => self.decode_msm7(buf, SBAS),
            1114 => self.decode_msm4(buf, QZSS),
            1115 => self.decode_msm5(buf, QZSS),
            1116 => self.decode_msm6(buf, QZSS),
            1117 => self.decode_msm7(buf, QZSS),
            1124 => self.decode_msm4(buf, BeiDou),
            1125 => self.decode_msm5(buf, BeiDou),
            1126 => self.decode_msm6(buf, BeiDou),
            1127 => self.decode_msm7(buf, BeiDou),
            // MSM1-3 and the remaining station/system messages are
            // accepted and counted, without content update
            _ => {
                debug!("rtcm3 message type {} not supported", mtype);
                Ok(Status::None)
            },
        }?;
        self.stats.bump(mtype);
        Ok(status)
    }
}
