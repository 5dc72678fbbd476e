//! # Constants and type definitions for aste-merge
//!
//! This module centralizes the **conversion factors**, **time-scale constants** and
//! **angle type aliases** used by the antenna and spectrometer readers.
//!
//! ## Overview
//!
//! - Angular unit conversions (degrees ↔ radians, arcseconds → radians)
//! - Time-scale anchors (J2000 in MJD, seconds per day)
//! - Type aliases documenting the unit carried by an `f64`
//! - Wrap-safe angle arithmetic shared by the frame registry and the reconciler

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Numerical epsilon used when comparing epochs expressed in MJD
pub const EPS: f64 = 1e-6;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Ratio between a sidereal day and a solar day (Earth rotation rate in turns per UT1 day)
pub const SIDEREAL_RATE: f64 = 1.00273790934;

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// Speed of light in vacuum (m/s)
pub const VLIGHT: f64 = 299_792_458.0;

/// Equatorial radius of the WGS84 ellipsoid (m)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Polar radius of the WGS84 ellipsoid (m)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Constant of annual aberration (arcsec)
pub const ABERRATION_CONSTANT: f64 = 20.49552;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

// -------------------------------------------------------------------------------------------------
// Angle helpers
// -------------------------------------------------------------------------------------------------

/// Signed, wrap-safe difference `a - b` between two longitudes, in degrees.
///
/// The result lies in `[-180, 180)`, so a difference taken across the 0°/360° seam
/// stays small: `angle_difference(359.999, 0.001)` is `-0.002`, not `359.998`.
pub fn angle_difference(a: Degree, b: Degree) -> Degree {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

/// Bring a longitude back into `[0, 360)` degrees.
pub fn normalize_longitude(lon: Degree) -> Degree {
    let wrapped = lon.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
