//! Station descriptor decoders: antenna reference point (1005/1006)
//! and antenna / receiver description strings (1007/1008/1033).
use crate::bits::{get_signed_38, get_unsigned};
use crate::rtcm::{Rtcm, Status};
use crate::station::MAX_DESCRIPTOR_LEN;
use crate::Error;

/// Length prefixed ASCII descriptor, clamped to
/// [MAX_DESCRIPTOR_LEN] characters.
fn read_descriptor(buf: &[u8], i: &mut usize, n: usize) -> String {
    let mut bytes = Vec::with_capacity(n.min(MAX_DESCRIPTOR_LEN));
    for _ in 0..n.min(MAX_DESCRIPTOR_LEN) {
        bytes.push(get_unsigned(buf, *i, 8) as u8);
        *i += 8;
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Counter byte of a length prefixed descriptor
fn read_counter(buf: &[u8], i: &mut usize, mtype: u16) -> Result<usize, Error> {
    if *i + 8 > buf.len() * 8 {
        return Err(Error::MessageTooShort {
            mtype,
            len: buf.len(),
        });
    }
    let n = get_unsigned(buf, *i, 8) as usize;
    *i += 8;
    if *i + 8 * n.min(MAX_DESCRIPTOR_LEN) > buf.len() * 8 {
        return Err(Error::MessageTooShort {
            mtype,
            len: buf.len(),
        });
    }
    Ok(n)
}

impl Rtcm {
    /// 1005 / 1006: antenna reference point, ECEF, 0.1 mm resolution.
    /// 1006 appends the antenna height.
    pub(crate) fn decode_station_position(
        &mut self,
        buf: &[u8],
        with_height: bool,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        let need = if with_height { 156 } else { 140 };
        if i + need > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let staid = get_unsigned(buf, i, 12) as u16;
        i += 12;
        let itrf = get_unsigned(buf, i, 6) as u8;
        i += 6 + 4;
        let x = get_signed_38(buf, i);
        i += 38 + 2;
        let y = get_signed_38(buf, i);
        i += 38 + 2;
        let z = get_signed_38(buf, i);
        i += 38;
        let height = if with_height {
            get_unsigned(buf, i, 16) as f64 * 1e-4
        } else {
            0.0
        };
        self.test_staid(mtype, staid)?;
        self.sta.delta_type = 0; // ECEF
        self.sta.position_m = (x * 1e-4, y * 1e-4, z * 1e-4);
        self.sta.antenna_height_m = height;
        self.sta.itrf_year = itrf;
        Ok(Status::Station)
    }

    /// 1007 / 1008: antenna descriptor, setup id, and (1008 only) the
    /// antenna serial number.
    pub(crate) fn decode_antenna_descriptor(
        &mut self,
        buf: &[u8],
        with_serial: bool,
    ) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        if i + 20 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let staid = get_unsigned(buf, i, 12) as u16;
        i += 12;
        let n = read_counter(buf, &mut i, mtype)?;
        let descriptor = read_descriptor(buf, &mut i, n);
        if i + 8 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let setup = get_unsigned(buf, i, 8) as u8;
        i += 8;
        let serial = if with_serial {
            let m = read_counter(buf, &mut i, mtype)?;
            read_descriptor(buf, &mut i, m)
        } else {
            String::new()
        };
        self.test_staid(mtype, staid)?;
        self.sta.antenna_descriptor = descriptor;
        self.sta.antenna_setup = setup;
        self.sta.antenna_serial = serial;
        Ok(Status::Station)
    }

    /// 1033: antenna descriptor and serial, receiver type, firmware
    /// version and receiver serial.
    pub(crate) fn decode_receiver_antenna(&mut self, buf: &[u8]) -> Result<Status, Error> {
        let mtype = get_unsigned(buf, 24, 12) as u16;
        let mut i = 24 + 12;
        if i + 12 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let staid = get_unsigned(buf, i, 12) as u16;
        i += 12;
        let n = read_counter(buf, &mut i, mtype)?;
        let descriptor = read_descriptor(buf, &mut i, n);
        if i + 8 > buf.len() * 8 {
            return Err(Error::MessageTooShort {
                mtype,
                len: buf.len(),
            });
        }
        let setup = get_unsigned(buf, i, 8) as u8;
        i += 8;
        let m = read_counter(buf, &mut i, mtype)?;
        let antenna_serial = read_descriptor(buf, &mut i, m);
        let n1 = read_counter(buf, &mut i, mtype)?;
        let receiver = read_descriptor(buf, &mut i, n1);
        let n2 = read_counter(buf, &mut i, mtype)?;
        let firmware = read_descriptor(buf, &mut i, n2);
        let n3 = read_counter(buf, &mut i, mtype)?;
        let receiver_serial = read_descriptor(buf, &mut i, n3);
        self.test_staid(mtype, staid)?;
        self.sta.antenna_descriptor = descriptor;
        self.sta.antenna_setup = setup;
        self.sta.antenna_serial = antenna_serial;
        self.sta.receiver = receiver;
        self.sta.firmware = firmware;
        self.sta.receiver_serial = receiver_serial;
        Ok(Status::Station)
    }
}
