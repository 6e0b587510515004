//! GNSS time reconstruction: the wire format carries modulo-week (or
//! modulo-day) time fields, which are anchored to an absolute epoch
//! using the most recently decoded time, or the host wall clock when
//! none has been seen yet.
//!
//! Time scale conversions (GPST/GST/BDT/UTC, leap seconds) are
//! delegated to [hifitime]; this module only implements the rollover
//! policy on top of it.
use hifitime::{Epoch, TimeScale, Unit};

/// Injectable wall clock: the single wall-clock dependence of the
/// decoder, used to disambiguate week and day rollovers. Inject a
/// frozen implementation for deterministic replays and tests.
pub trait TimeSource {
    /// Current time, in the UTC scale. None when the host has no
    /// clock (decoding then falls back to a minimum-week anchor).
    fn now(&self) -> Option<Epoch>;
}

/// [TimeSource] backed by the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Option<Epoch> {
        Epoch::now().ok().map(|t| t.to_time_scale(TimeScale::UTC))
    }
}

/// [TimeSource] frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FrozenClock(pub Epoch);

impl TimeSource for FrozenClock {
    fn now(&self) -> Option<Epoch> {
        Some(self.0.to_time_scale(TimeScale::UTC))
    }
}

pub(crate) const WEEK_SECONDS: f64 = 604_800.0;
pub(crate) const HALF_WEEK_SECONDS: f64 = 302_400.0;
pub(crate) const DAY_SECONDS: f64 = 86_400.0;
pub(crate) const HALF_DAY_SECONDS: f64 = 43_200.0;

/// Moscow time offset of the Glonass day boundary (s)
pub(crate) const GLO_UTC_OFFSET_SECONDS: f64 = 10_800.0;

/// Minimum GPS week anchor when the host clock is unavailable or
/// behind (2009/12/1)
pub(crate) const MIN_GPS_WEEK: u32 = 1560;
/// Minimum BeiDou week anchor (2006/1/1)
pub(crate) const MIN_BDT_WEEK: u32 = 1;

/// Builds a GPS-scale epoch from a week number and a (possibly
/// fractional, possibly out of range) time of week in seconds.
pub(crate) fn gpst_from_tow(week: u32, tow_s: f64) -> Epoch {
    let (week, tow_s) = normalize(week, tow_s);
    Epoch::from_time_of_week(week, (tow_s * 1e9).round() as u64, TimeScale::GPST)
}

/// Folds an out of range time of week back into `0..604800`,
/// borrowing from or carrying into the week counter.
fn normalize(week: u32, tow_s: f64) -> (u32, f64) {
    let mut week = week as i64;
    let mut tow = tow_s;
    while tow < 0.0 {
        tow += WEEK_SECONDS;
        week -= 1;
    }
    while tow >= WEEK_SECONDS {
        tow -= WEEK_SECONDS;
        week += 1;
    }
    (week.max(0) as u32, tow)
}

/// Week / time of week of `t`, read in the GPS scale
pub(crate) fn gpst_tow(t: Epoch) -> (u32, f64) {
    let (week, nanos) = t.to_time_scale(TimeScale::GPST).to_time_of_week();
    (week, nanos as f64 * 1e-9)
}

/// Resolves a weekly time of week against the reference epoch
/// `current`: the nearer of the two candidate weeks wins (half-week
/// test), so a TOW decoded shortly before a week rollover lands in
/// the previous week.
pub(crate) fn adjust_weekly_tow(current: Epoch, tow_s: f64) -> Epoch {
    let (week, tow_ref) = gpst_tow(current);
    let mut tow = tow_s;
    if tow < tow_ref - HALF_WEEK_SECONDS {
        tow += WEEK_SECONDS;
    } else if tow > tow_ref + HALF_WEEK_SECONDS {
        tow -= WEEK_SECONDS;
    }
    gpst_from_tow(week, tow)
}

/// Reference (week, time of week, time of day) of `current` in the
/// Glonass frame: UTC shifted to Moscow time.
fn glo_frame(current: Epoch) -> (u32, f64, f64) {
    let moscow = current.to_time_scale(TimeScale::UTC) + GLO_UTC_OFFSET_SECONDS * Unit::Second;
    let (week, nanos) = moscow.to_time_of_week();
    let tow = nanos as f64 * 1e-9;
    (week, tow, tow % DAY_SECONDS)
}

/// Resolves a Glonass time of day (Moscow time) against the reference
/// epoch `current` with the half-day test, and returns the result in
/// the GPS scale.
pub(crate) fn adjust_daily_tod_glo(current: Epoch, tod_s: f64) -> Epoch {
    let (week, tow_ref, tod_ref) = glo_frame(current);
    let mut tod = tod_s;
    if tod < tod_ref - HALF_DAY_SECONDS {
        tod += DAY_SECONDS;
    } else if tod > tod_ref + HALF_DAY_SECONDS {
        tod -= DAY_SECONDS;
    }
    let (week, tow) = normalize(week, tow_ref - tod_ref + tod);
    let moscow = Epoch::from_time_of_week(week, (tow * 1e9).round() as u64, TimeScale::UTC);
    (moscow - GLO_UTC_OFFSET_SECONDS * Unit::Second).to_time_scale(TimeScale::GPST)
}

/// As [adjust_daily_tod_glo], for a time of day already expressed in
/// UTC (the Glonass ephemeris `tb`/`tk` fields once the Moscow offset
/// has been subtracted). The half-day test still runs against the
/// Moscow day of `current`.
pub(crate) fn glo_utc_tod_to_gpst(current: Epoch, tod_utc_s: f64) -> Epoch {
    let (week, tow_ref, tod_ref) = glo_frame(current);
    let mut tod = tod_utc_s;
    if tod < tod_ref - HALF_DAY_SECONDS {
        tod += DAY_SECONDS;
    } else if tod > tod_ref + HALF_DAY_SECONDS {
        tod -= DAY_SECONDS;
    }
    let (week, tow) = normalize(week, tow_ref - tod_ref + tod);
    Epoch::from_time_of_week(week, (tow * 1e9).round() as u64, TimeScale::UTC)
        .to_time_scale(TimeScale::GPST)
}

/// Resolves a truncated (10 or 13 bit) GPS week number against the
/// 1024-week ambiguity, anchored to `now` (or [MIN_GPS_WEEK] without
/// a clock).
pub(crate) fn adjust_gps_week(now: Option<Epoch>, week: u32) -> u32 {
    let anchor = now
        .map(|t| gpst_tow(t).0)
        .unwrap_or(MIN_GPS_WEEK)
        .max(MIN_GPS_WEEK) as i64;
    let week = week as i64;
    (week + (anchor - week + 512) / 1024 * 1024) as u32
}

/// Resolves a truncated BeiDou week number, anchored to `now` (or
/// [MIN_BDT_WEEK] without a clock).
pub(crate) fn adjust_bdt_week(now: Option<Epoch>, week: u32) -> u32 {
    let anchor = now
        .map(|t| t.to_time_scale(TimeScale::BDT).to_time_of_week().0)
        .unwrap_or(MIN_BDT_WEEK)
        .max(MIN_BDT_WEEK) as i64;
    let week = week as i64;
    (week + (anchor - week + 512) / 1024 * 1024) as u32
}
