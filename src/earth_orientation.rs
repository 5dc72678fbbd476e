//! # Earth orientation
//!
//! Obliquity, nutation and precession models used to move between the apparent
//! (true equator and equinox of date) and the FK5 (mean equator and equinox of J2000)
//! equatorial systems, the equation of the equinoxes needed for apparent sidereal time,
//! and the Earth orbital velocity behind annual aberration.
//!
//! All matrices here act on **column vectors**: `x_to = M · x_from`.
use nalgebra::{Matrix3, Vector3};

use crate::{
    constants::{ArcSec, Radian, ABERRATION_CONSTANT, DPI, MJD, RADEG, RADSEC, T2000},
    ref_system::rotmt,
};

/// One periodic term of the IAU 1980 nutation series.
///
/// `args` holds the integer multipliers of the fundamental arguments in the order
/// (D, M, M', F, Ω). Amplitudes are in units of 0.0001 arcsecond, with a linear
/// rate per Julian century.
struct NutationTerm {
    args: [i8; 5],
    dpsi: (f64, f64),
    deps: (f64, f64),
}

const fn term(args: [i8; 5], dpsi: (f64, f64), deps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, dpsi, deps }
}

/// Leading terms of the IAU 1980 (Wahr) theory, down to 5e-4 arcsecond amplitude.
const NUTATION_1980: [NutationTerm; 49] = [
    term([0, 0, 0, 0, 1], (-171996.0, -174.2), (92025.0, 8.9)),
    term([-2, 0, 0, 2, 2], (-13187.0, -1.6), (5736.0, -3.1)),
    term([0, 0, 0, 2, 2], (-2274.0, -0.2), (977.0, -0.5)),
    term([0, 0, 0, 0, 2], (2062.0, 0.2), (-895.0, 0.5)),
    term([0, 1, 0, 0, 0], (1426.0, -3.4), (54.0, -0.1)),
    term([0, 0, 1, 0, 0], (712.0, 0.1), (-7.0, 0.0)),
    term([-2, 1, 0, 2, 2], (-517.0, 1.2), (224.0, -0.6)),
    term([0, 0, 0, 2, 1], (-386.0, -0.4), (200.0, 0.0)),
    term([0, 0, 1, 2, 2], (-301.0, 0.0), (129.0, -0.1)),
    term([-2, -1, 0, 2, 2], (217.0, -0.5), (-95.0, 0.3)),
    term([-2, 0, 1, 0, 0], (-158.0, 0.0), (0.0, 0.0)),
    term([-2, 0, 0, 2, 1], (129.0, 0.1), (-70.0, 0.0)),
    term([0, 0, -1, 2, 2], (123.0, 0.0), (-53.0, 0.0)),
    term([2, 0, 0, 0, 0], (63.0, 0.0), (0.0, 0.0)),
    term([0, 0, 1, 0, 1], (63.0, 0.1), (-33.0, 0.0)),
    term([2, 0, -1, 2, 2], (-59.0, 0.0), (26.0, 0.0)),
    term([0, 0, -1, 0, 1], (-58.0, -0.1), (32.0, 0.0)),
    term([0, 0, 1, 2, 1], (-51.0, 0.0), (27.0, 0.0)),
    term([-2, 0, 2, 0, 0], (48.0, 0.0), (0.0, 0.0)),
    term([0, 0, -2, 2, 1], (46.0, 0.0), (-24.0, 0.0)),
    term([2, 0, 0, 2, 2], (-38.0, 0.0), (16.0, 0.0)),
    term([0, 0, 2, 2, 2], (-31.0, 0.0), (13.0, 0.0)),
    term([0, 0, 2, 0, 0], (29.0, 0.0), (0.0, 0.0)),
    term([-2, 0, 1, 2, 2], (29.0, 0.0), (-12.0, 0.0)),
    term([0, 0, 0, 2, 0], (26.0, 0.0), (0.0, 0.0)),
    term([-2, 0, 0, 2, 0], (-22.0, 0.0), (0.0, 0.0)),
    term([0, 0, -1, 2, 1], (21.0, 0.0), (-10.0, 0.0)),
    term([0, 2, 0, 0, 0], (17.0, -0.1), (0.0, 0.0)),
    term([2, 0, -1, 0, 1], (16.0, 0.0), (-8.0, 0.0)),
    term([-2, 2, 0, 2, 2], (-16.0, 0.1), (7.0, 0.0)),
    term([0, 1, 0, 0, 1], (-15.0, 0.0), (9.0, 0.0)),
    term([-2, 0, 1, 0, 1], (-13.0, 0.0), (7.0, 0.0)),
    term([0, -1, 0, 0, 1], (-12.0, 0.0), (6.0, 0.0)),
    term([0, 0, 2, -2, 0], (11.0, 0.0), (0.0, 0.0)),
    term([2, 0, -1, 2, 1], (-10.0, 0.0), (5.0, 0.0)),
    term([2, 0, 1, 2, 2], (-8.0, 0.0), (3.0, 0.0)),
    term([0, 1, 0, 2, 2], (7.0, 0.0), (-3.0, 0.0)),
    term([-2, 1, 1, 0, 0], (-7.0, 0.0), (0.0, 0.0)),
    term([0, -1, 0, 2, 2], (-7.0, 0.0), (3.0, 0.0)),
    term([2, 0, 0, 2, 1], (-7.0, 0.0), (3.0, 0.0)),
    term([2, 0, 1, 0, 0], (6.0, 0.0), (0.0, 0.0)),
    term([-2, 0, 2, 2, 2], (6.0, 0.0), (-3.0, 0.0)),
    term([-2, 0, 1, 2, 1], (6.0, 0.0), (-3.0, 0.0)),
    term([2, 0, -2, 0, 1], (-6.0, 0.0), (3.0, 0.0)),
    term([2, 0, 0, 0, 1], (-6.0, 0.0), (3.0, 0.0)),
    term([0, -1, 1, 0, 0], (5.0, 0.0), (0.0, 0.0)),
    term([-2, -1, 0, 2, 1], (-5.0, 0.0), (3.0, 0.0)),
    term([-2, 0, 0, 0, 1], (-5.0, 0.0), (3.0, 0.0)),
    term([0, 0, 2, 2, 1], (-5.0, 0.0), (3.0, 0.0)),
];

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// The obliquity is a cubic polynomial in Julian centuries since J2000,
/// evaluated with Horner's scheme:
///
/// ```text
/// ε = ((ob3 * t + ob2) * t + ob1) * t + ob0;
/// ```
pub fn obleq(tjm: MJD) -> Radian {
    // Obliquity coefficients
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Fundamental lunisolar arguments (D, M, M', F, Ω) in radians, IAU 1980.
fn fundamental_arguments(t: f64) -> [f64; 5] {
    let t2 = t * t;
    let t3 = t2 * t;

    let d = (1072261.307 + 1602961601.328 * t - 6.891 * t2 + 0.019 * t3) * RADSEC;
    let m = (1287099.804 + 129596581.224 * t - 0.577 * t2 - 0.012 * t3) * RADSEC;
    let mp = (485866.733 + 1717915922.633 * t + 31.310 * t2 + 0.064 * t3) * RADSEC;
    let f = (335778.877 + 1739527263.137 * t - 13.257 * t2 + 0.011 * t3) * RADSEC;
    let om = (450160.280 - 6962890.539 * t + 7.455 * t2 + 0.008 * t3) * RADSEC;

    [d % DPI, m % DPI, mp % DPI, f % DPI, om % DPI]
}

/// Compute the nutation angles in longitude and obliquity (IAU 1980 theory).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * A tuple `(Δψ, Δε)` in **arcseconds**.
///
/// The series is truncated to the terms listed in `NUTATION_1980`; the neglected terms
/// stay below one milliarcsecond in total, well inside the pointing accuracy of a
/// single-dish antenna.
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / 36525.0;
    let args = fundamental_arguments(t);

    let (dpsi, deps) = NUTATION_1980
        .iter()
        .fold((0.0, 0.0), |(dpsi, deps), term| {
            let angle: f64 = term
                .args
                .iter()
                .zip(args.iter())
                .map(|(&k, &a)| k as f64 * a)
                .sum();
            (
                dpsi + (term.dpsi.0 + term.dpsi.1 * t) * angle.sin(),
                deps + (term.deps.0 + term.deps.1 * t) * angle.cos(),
            )
        });

    // series amplitudes are in 0.0001 arcsecond
    (dpsi * 1e-4, deps * 1e-4)
}

/// Compute the nutation matrix at a given epoch.
///
/// The returned matrix `N` maps a vector from the mean equator and equinox of date to the
/// true equator and equinox of date: `x_true = N · x_mean`. It is the product
/// `R1(−ε−Δε) · R3(−Δψ) · R1(ε)` of frame rotations, written with the active
/// rotations of [`rotmt`].
pub fn rnut80(tjm: MJD) -> Matrix3<f64> {
    // Mean obliquity of the ecliptic at date (ε)
    let epsm = obleq(tjm);

    let (dpsi, deps) = nutn80(tjm);
    let dpsi = dpsi * RADSEC;
    let epst = epsm + deps * RADSEC;

    rotmt(epst, 0) * rotmt(dpsi, 2) * rotmt(-epsm, 0)
}

/// Compute the equation of the equinoxes (nutation correction) in radians.
///
/// Difference between apparent and mean sidereal time:
///
/// ```text
/// Eq_eq = Δψ * cos(ε)
/// ```
pub fn equequ(tjm: MJD) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutn80(tjm);

    RADSEC * dpsi * oblm.cos()
}

/// Compute the precession matrix from J2000 to the mean equator and equinox of date (IAU 1976).
///
/// Returns `P` such that `x_mean(tjm) = P · x_J2000`, built from the three
/// precession angles ζ, θ and z:
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// P    = R3(−z) · R2(θ) · R3(−ζ)
/// ```
pub fn prec(tjm: MJD) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rotmt(z, 2) * rotmt(-theta, 1) * rotmt(zeta, 2)
}

/// Velocity of the Earth on its orbit, in units of the speed of light.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * `β = v/c` in the mean equator and equinox of date.
///
/// Low-precision solar theory: true longitude of the Sun `λ`, eccentricity `e` and
/// longitude of perihelion `ϖ` of the Earth orbit, scaled by the constant of aberration
/// `κ`. In ecliptic coordinates
///
/// ```text
/// β = κ · (sin λ − e sin ϖ, −(cos λ − e cos ϖ), 0)
/// ```
///
/// then rotated about the x-axis by the mean obliquity. Accurate to about 0.01 arcsecond
/// of aberration.
pub fn annual_aberration(tjm: MJD) -> Vector3<f64> {
    let t = (tjm - T2000) / 36525.0;
    let t2 = t * t;

    let mean_longitude = 280.46646 + 36000.76983 * t + 0.0003032 * t2;
    let mean_anomaly = (357.52911 + 35999.05029 * t - 0.0001537 * t2) * RADEG;
    let center = (1.914602 - 0.004817 * t - 0.000014 * t2) * mean_anomaly.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * mean_anomaly).sin()
        + 0.000289 * (3.0 * mean_anomaly).sin();
    let sun_longitude = (mean_longitude + center) * RADEG;

    let eccentricity = 0.016708634 - 0.000042037 * t - 0.0000001267 * t2;
    let perihelion = (102.93735 + 1.71946 * t + 0.00046 * t2) * RADEG;

    let kappa = ABERRATION_CONSTANT * RADSEC;
    let ecliptic = Vector3::new(
        kappa * (sun_longitude.sin() - eccentricity * perihelion.sin()),
        -kappa * (sun_longitude.cos() - eccentricity * perihelion.cos()),
        0.0,
    );

    rotmt(obleq(tjm), 0) * ecliptic
}

#[cfg(test)]
mod test_earth_orientation {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_obliquity() {
        let obl = obleq(T2000);
        assert_abs_diff_eq!(obl, 0.40909280422232897, epsilon = 1e-15);
    }

    #[test]
    fn test_nutn80() {
        // full 106-term series gives (-13.923385, -5.773808) arcsec at J2000
        let (dpsi, deps) = nutn80(T2000);
        assert_abs_diff_eq!(dpsi, -13.923385169502602, epsilon = 1e-3);
        assert_abs_diff_eq!(deps, -5.773808263765919, epsilon = 1e-3);
    }

    #[test]
    fn test_rnut80_structure() {
        let rnut = rnut80(T2000);
        let (dpsi, deps) = nutn80(T2000);
        let eps = obleq(T2000);

        assert_abs_diff_eq!(
            (rnut * rnut.transpose()),
            Matrix3::identity(),
            epsilon = 1e-14
        );
        assert_abs_diff_eq!(
            rnut[(0, 1)],
            -dpsi * RADSEC * eps.cos(),
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(rnut[(1, 2)], -deps * RADSEC, epsilon = 1e-9);
        assert_abs_diff_eq!(rnut[(0, 1)], 6.19323109890795e-5, epsilon = 1e-9);
    }

    #[test]
    fn test_equequ_at_j2000() {
        let eqeq = equequ(T2000);
        let expected_rad = RADSEC * (-13.923385169502602) * (obleq(T2000).cos());
        assert_abs_diff_eq!(eqeq, expected_rad, epsilon = 1e-8);
        assert!(eqeq.abs() < 1e-4);
    }

    #[test]
    fn test_prec_identity_at_j2000() {
        assert_abs_diff_eq!(prec(T2000), Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_prec_moves_equinox_eastward() {
        // the J2000 equinox gains ζ + z of right ascension in the frame of date
        let t2050 = T2000 + 50.0 * 365.25;
        let x = prec(t2050) * Vector3::x();
        let ra_shift = x.y.atan2(x.x).to_degrees();
        assert_abs_diff_eq!(ra_shift, 0.6406161, epsilon = 0.01);
        assert!(x.z > 0.0);

        let p = prec(t2050);
        assert_abs_diff_eq!(p * p.transpose(), Matrix3::identity(), epsilon = 1e-14);
    }

    #[test]
    fn test_annual_aberration() {
        // θ Persei, 2028 November 13.19 TD: +30.045" in right ascension and +6.697" in
        // declination (Meeus, Astronomical Algorithms, example 23.a)
        let tjm = 62088.19;
        let beta = annual_aberration(tjm);

        let kappa = ABERRATION_CONSTANT * RADSEC;
        assert!(beta.norm() > kappa * 0.98 && beta.norm() < kappa * 1.02);
        assert_abs_diff_eq!(beta.z, beta.y * obleq(tjm).tan(), epsilon = 1e-15);

        let (ra, dec) = (41.54721435_f64.to_radians(), 49.34848311_f64.to_radians());
        let u = Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin());
        let shift = beta - u * u.dot(&beta);
        let east = Vector3::new(-ra.sin(), ra.cos(), 0.0);
        let north = Vector3::new(-dec.sin() * ra.cos(), -dec.sin() * ra.sin(), dec.cos());

        assert_abs_diff_eq!(shift.dot(&east) / dec.cos() / RADSEC, 30.045, epsilon = 0.005);
        assert_abs_diff_eq!(shift.dot(&north) / RADSEC, 6.697, epsilon = 0.005);
    }
}
