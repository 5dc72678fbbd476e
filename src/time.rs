//! # Time scales and antenna log timestamps
//!
//! Helpers shared by the antenna and XFFTS readers:
//!
//! - [`parse_log_time`] decodes the controller timestamp format `yymmddHHMMSS.ffffff` (UTC)
//!   into a [`hifitime::Epoch`].
//! - [`unix_nanoseconds`] gives the nanosecond-resolution Unix instant of an epoch, which is
//!   how the time coordinate of every dataset is exchanged.
//! - [`ut1_mjd`] and [`gmst`] provide the Earth rotation angle needed by the horizontal
//!   frame.
use hifitime::ut1::Ut1Provider;
use hifitime::Epoch;
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt},
    sequence::preceded,
    IResult, Parser,
};

use crate::constants::{DPI, MJD, SECONDS_PER_DAY, SIDEREAL_RATE, T2000};

/// Century added to the two-digit year written by the antenna controller.
const LOG_CENTURY: i32 = 2000;

type LogTimeFields<'a> = (u8, u8, u8, u8, u8, u8, Option<&'a str>);

fn two_digits(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u8>()
    })
    .parse(input)
}

fn log_time_fields(input: &str) -> IResult<&str, LogTimeFields<'_>> {
    all_consuming((
        two_digits,
        two_digits,
        two_digits,
        two_digits,
        two_digits,
        two_digits,
        opt(preceded(char('.'), digit1)),
    ))
    .parse(input)
}

/// Parse an antenna log timestamp in the `yymmddHHMMSS[.f]` format (UTC).
///
/// The fractional part is optional and may carry between one and nine digits, so
/// `160925054612.6` is 2016-09-25T05:46:12.600 UTC.
///
/// Return
/// ------
/// * The UTC [`Epoch`], or `None` if the token is not a valid timestamp (wrong layout,
///   more than nanosecond resolution, or an impossible calendar date).
pub fn parse_log_time(token: &str) -> Option<Epoch> {
    let (_, (yy, month, day, hour, minute, second, frac)) = log_time_fields(token).ok()?;

    let nanos = match frac {
        Some(digits) if digits.len() > 9 => return None,
        Some(digits) => format!("{digits:0<9}").parse::<u32>().ok()?,
        None => 0,
    };

    Epoch::maybe_from_gregorian_utc(
        LOG_CENTURY + yy as i32,
        month,
        day,
        hour,
        minute,
        second,
        nanos,
    )
    .ok()
}

/// Nanoseconds elapsed since the Unix epoch (1970-01-01T00:00:00 UTC), leap seconds excluded.
///
/// This is the representation of the `time` coordinate exchanged with the merge step.
pub fn unix_nanoseconds(epoch: &Epoch) -> i128 {
    epoch.to_unix_duration().total_nanoseconds()
}

/// Modified Julian Date of `epoch` on the UT1 scale.
///
/// Without a UT1 provider the UTC date is used (|UT1 − UTC| < 0.9 s). With a provider
/// the conversion follows hifitime: the returned epoch holds UT1 in its TAI slot.
pub fn ut1_mjd(epoch: &Epoch, ut1_provider: Option<&Ut1Provider>) -> MJD {
    match ut1_provider {
        Some(provider) => epoch.to_ut1(provider).to_mjd_tai_days(),
        None => epoch.to_mjd_utc_days(),
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial for the mean sidereal time
/// at 0h UT1, plus the fractional-day rotation of the Earth.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    let day = tjm.floor();
    let t = (day - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;
    let rotation = (tjm - day) * DPI * SIDEREAL_RATE;

    (gmst0 + rotation).rem_euclid(DPI)
}
