//! # Observatory site
//!
//! The single site this crate reconciles pointing for: the ASTE 10 m antenna at
//! Pampa La Bola, Atacama. Coordinates are WGS84 geodetic, longitude east positive.
//!
//! The site is a compile-time constant; it is passed by reference through the frame
//! registry so every transform states which site it is valid for.
use hifitime::ut1::Ut1Provider;
use hifitime::Epoch;
use nalgebra::Vector3;

use crate::constants::{
    Degree, Meter, Radian, DPI, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, SECONDS_PER_DAY,
    SIDEREAL_RATE, VLIGHT,
};
use crate::earth_orientation::equequ;
use crate::time::{gmst, ut1_mjd};

/// Geodetic location of an observatory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservatorySite {
    /// Site name, for logs and diagnostics.
    pub name: &'static str,

    /// Geodetic longitude in **degrees** east of Greenwich.
    pub longitude: Degree,

    /// Geodetic latitude in **degrees**.
    pub latitude: Degree,

    /// Height above the WGS84 ellipsoid in **meters**.
    pub height: Meter,
}

impl ObservatorySite {
    /// Atacama Submillimeter Telescope Experiment.
    pub const ASTE: ObservatorySite = ObservatorySite {
        name: "ASTE",
        longitude: -67.70317915,
        latitude: -22.97163571,
        height: 4863.85,
    };

    pub fn lat_rad(&self) -> Radian {
        self.latitude.to_radians()
    }

    pub fn lon_rad(&self) -> Radian {
        self.longitude.to_radians()
    }

    /// Local apparent sidereal time at the site, in radians within [0, 2π).
    ///
    /// Greenwich mean sidereal time on UT1, plus the equation of the equinoxes
    /// (evaluated on TT), plus the east longitude of the site.
    ///
    /// Arguments
    /// -----------------
    /// * `epoch`: observation instant.
    /// * `ut1_provider`: optional Earth orientation data; UT1 ≈ UTC without it.
    pub fn local_sidereal_time(&self, epoch: &Epoch, ut1_provider: Option<&Ut1Provider>) -> Radian {
        let gast = gmst(ut1_mjd(epoch, ut1_provider)) + equequ(epoch.to_mjd_tt_days());
        (gast + self.lon_rad()).rem_euclid(DPI)
    }

    /// Geocentric position of the site in units of the equatorial radius.
    ///
    /// Returns
    /// -------
    /// * `(ρ cos φ', ρ sin φ')`, the distances from the rotation axis and from the
    ///   equatorial plane, through the parametric latitude `u`:
    ///
    /// ```text
    /// u       = atan(b/a · tan φ)
    /// ρ cos φ' = cos u + h/a · cos φ
    /// ρ sin φ' = b/a · sin u + h/a · sin φ
    /// ```
    pub fn parallax_coefficients(&self) -> (f64, f64) {
        let lat = self.lat_rad();
        let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;
        let u = (lat.sin() * axis_ratio).atan2(lat.cos());

        let rho_cos_phi = u.cos() + (self.height / EARTH_MAJOR_AXIS) * lat.cos();
        let rho_sin_phi = axis_ratio * u.sin() + (self.height / EARTH_MAJOR_AXIS) * lat.sin();
        (rho_cos_phi, rho_sin_phi)
    }

    /// Velocity of the site due to Earth rotation, in units of the speed of light.
    ///
    /// The site moves due east at `ω · a · ρ cos φ'`; at local sidereal time `last` the
    /// velocity in the equatorial frame of date is
    ///
    /// ```text
    /// β = ω a ρ cos φ' / c · (−sin last, cos last, 0)
    /// ```
    pub fn diurnal_aberration(&self, last: Radian) -> Vector3<f64> {
        let omega = DPI * SIDEREAL_RATE / SECONDS_PER_DAY;
        let (rho_cos_phi, _) = self.parallax_coefficients();
        let speed = omega * EARTH_MAJOR_AXIS * rho_cos_phi / VLIGHT;

        let (sin_last, cos_last) = last.sin_cos();
        Vector3::new(-speed * sin_last, speed * cos_last, 0.0)
    }
}
