//! Physical and wire-format constants shared by the decoders.

/// Speed of light (m/s)
pub const CLIGHT: f64 = 299_792_458.0;

/// Range corresponding to one millisecond of light travel (m).
/// MSM rough ranges are expressed in integer + fractional milliseconds.
pub const RANGE_MS: f64 = CLIGHT * 0.001;

/// Integer pseudorange ambiguity unit of the legacy GPS RTK
/// messages (m)
pub const PRUNIT_GPS: f64 = 299_792.458;
/// Integer pseudorange ambiguity unit of the legacy Glonass RTK
/// messages (m)
pub const PRUNIT_GLO: f64 = 599_584.916;

/// L1/E1 frequency (Hz)
pub const FREQ1: f64 = 1.575_42e9;
/// L2 frequency (Hz)
pub const FREQ2: f64 = 1.227_60e9;
/// L5/E5a/B2a frequency (Hz)
pub const FREQ5: f64 = 1.176_45e9;
/// E6/L6(LEX) frequency (Hz)
pub const FREQ6: f64 = 1.278_75e9;
/// E5b/B2b frequency (Hz)
pub const FREQ7: f64 = 1.207_14e9;
/// E5(a+b) frequency (Hz)
pub const FREQ8: f64 = 1.191_795e9;

/// Glonass G1 base frequency (Hz)
pub const FREQ1_GLO: f64 = 1.602_00e9;
/// Glonass G1 channel separation (Hz/channel)
pub const DFRQ1_GLO: f64 = 0.562_50e6;
/// Glonass G2 base frequency (Hz)
pub const FREQ2_GLO: f64 = 1.246_00e9;
/// Glonass G2 channel separation (Hz/channel)
pub const DFRQ2_GLO: f64 = 0.437_50e6;
/// Glonass G3 (CDMA) frequency (Hz)
pub const FREQ3_GLO: f64 = 1.202_025e9;

/// BeiDou B1I frequency (Hz)
pub const FREQ1_CMP: f64 = 1.561_098e9;
/// BeiDou B2I/B2b frequency (Hz)
pub const FREQ2_CMP: f64 = 1.207_14e9;
/// BeiDou B3 frequency (Hz)
pub const FREQ3_CMP: f64 = 1.268_52e9;

/// Semi-circle to radian
pub(crate) const SC2RAD: f64 = 3.141_592_653_589_8;

// Power of two scale factors of the broadcast ephemeris fields.
pub(crate) const P2_5: f64 = 0.03125;
pub(crate) const P2_6: f64 = 0.015625;
pub(crate) const P2_10: f64 = 0.0009765625;
pub(crate) const P2_11: f64 = 4.882812500000000e-04;
pub(crate) const P2_19: f64 = 1.907348632812500e-06;
pub(crate) const P2_20: f64 = 9.536743164062500e-07;
pub(crate) const P2_24: f64 = 5.960464477539063e-08;
pub(crate) const P2_29: f64 = 1.862645149230957e-09;
pub(crate) const P2_30: f64 = 9.313225746154785e-10;
pub(crate) const P2_31: f64 = 4.656612873077393e-10;
pub(crate) const P2_32: f64 = 2.328306436538696e-10;
pub(crate) const P2_33: f64 = 1.164153218269348e-10;
pub(crate) const P2_34: f64 = 5.820766091346740e-11;
pub(crate) const P2_40: f64 = 9.094947017729282e-13;
pub(crate) const P2_43: f64 = 1.136868377216160e-13;
pub(crate) const P2_46: f64 = 1.421085471520200e-14;
pub(crate) const P2_50: f64 = 8.881784197001252e-16;
pub(crate) const P2_55: f64 = 2.775557561562891e-17;
pub(crate) const P2_59: f64 = 1.734723475976807e-18;
pub(crate) const P2_66: f64 = 1.355252715606881e-20;
