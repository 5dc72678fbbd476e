use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{EPS, MJD, T2000};
use crate::earth_orientation::{prec, rnut80};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefEpoch {
    J2000,
    /// Epoch of date, MJD on the TT scale
    Epoch(MJD),
}

impl RefEpoch {
    pub fn date(&self) -> MJD {
        match *self {
            RefEpoch::J2000 => T2000,
            RefEpoch::Epoch(d) => d,
        }
    }

    fn is_j2000(&self) -> bool {
        (self.date() - T2000).abs() <= EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefSystem {
    // Equatorial Mean, equatorial coordinates based on equator and mean equinox
    // at a given epoch (J2000 for FK5)
    // (corrected for precession but not for nutation)
    Equm(RefEpoch),
    // Equatorial True (same as Equm but corrected for precession and nutation)
    Equt(RefEpoch),
}

impl RefSystem {
    pub fn epoch(&self) -> RefEpoch {
        match *self {
            RefSystem::Equm(e) => e,
            RefSystem::Equt(e) => e,
        }
    }

    /// Rotation from this system to the mean equator and equinox of J2000.
    fn to_j2000(self) -> Matrix3<f64> {
        match self {
            RefSystem::Equm(e) if e.is_j2000() => Matrix3::identity(),
            RefSystem::Equm(e) => prec(e.date()).transpose(),
            RefSystem::Equt(e) => prec(e.date()).transpose() * rnut80(e.date()).transpose(),
        }
    }
}

/// Compute the rotation matrix between two equatorial reference systems and epochs.
///
/// The transformation always passes through the mean equator and equinox of J2000
/// (the FK5 frame): the source system is first brought back to J2000 (removing nutation
/// then precession), and the target system is reached by applying precession then
/// nutation at the target epoch.
///
/// Arguments
/// ---------
/// * `ref_sys1`: source reference system and epoch.
/// * `ref_sys2`: target reference system and epoch.
///
/// Return
/// ------
/// * the rotation matrix such that `x₂ = rot · x₁`, where `x₁` is a vector in the
///   source system and `x₂` the same vector expressed in the target system.
///
/// # See also
/// * [`prec`] – IAU 1976 precession matrix
/// * [`rnut80`] – IAU 1980 nutation matrix
pub fn rotpn(ref_sys1: &RefSystem, ref_sys2: &RefSystem) -> Matrix3<f64> {
    if ref_sys1 == ref_sys2 {
        return Matrix3::identity();
    }
    ref_sys2.to_j2000().transpose() * ref_sys1.to_j2000()
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes (X, Y, or Z).
///
/// This function builds a [`nalgebra::Matrix3`] representing an **active rotation**
/// of a 3D vector by an angle `alpha` around the chosen axis, counter-clockwise when
/// looking from the tip of the axis toward the origin. A frame rotation by `alpha`
/// is therefore `rotmt(-alpha, k)`.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `k` - Index of the axis of rotation:
///   * `0` → X-axis
///   * `1` → Y-axis
///   * `2` → Z-axis
///
/// # Panics
///
/// Panics if `k > 2`, as only axes 0–2 are valid.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Apply stellar aberration to a unit direction vector.
///
/// An observer moving with velocity `β = v/c` sees a source of geometric direction `u`
/// displaced toward its apex:
///
/// ```text
/// u' = (u + β) / ‖u + β‖
/// ```
///
/// Arguments
/// ---------
/// * `direction`: geometric direction (unit vector).
/// * `beta`: observer velocity in units of the speed of light, same frame as `direction`.
///
/// Returns
/// --------
/// * The observed (aberrated) unit direction.
pub fn aberrate(direction: &Vector3<f64>, beta: &Vector3<f64>) -> Vector3<f64> {
    (direction + beta).normalize()
}

/// Remove stellar aberration from an observed unit direction.
///
/// Exact inverse of [`aberrate`]: finds the `s > 0` for which `s·u' − β` has unit norm,
///
/// ```text
/// s = u'·β + sqrt((u'·β)² − ‖β‖² + 1)
/// ```
///
/// so a round trip through both functions is exact to rounding.
pub fn correct_aberration(observed: &Vector3<f64>, beta: &Vector3<f64>) -> Vector3<f64> {
    let u = observed.normalize();
    let projection = u.dot(beta);
    let scale = projection + (projection * projection - beta.norm_squared() + 1.0).sqrt();
    (u * scale - beta).normalize()
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOLERANCE: f64 = 1e-14;

    #[test]
    fn test_rotmt_active() {
        let v = rotmt(std::f64::consts::FRAC_PI_2, 2) * Vector3::x();
        assert_abs_diff_eq!(v, Vector3::y(), epsilon = TOLERANCE);

        let v = rotmt(std::f64::consts::FRAC_PI_2, 0) * Vector3::y();
        assert_abs_diff_eq!(v, Vector3::z(), epsilon = TOLERANCE);
    }

    #[test]
    #[should_panic]
    fn test_rotmt_invalid_axis() {
        rotmt(0.1, 3);
    }

    #[test]
    fn test_rotpn_identity() {
        let sys = RefSystem::Equm(RefEpoch::J2000);
        assert_eq!(rotpn(&sys, &sys), Matrix3::identity());

        let sys = RefSystem::Equm(RefEpoch::Epoch(T2000));
        let j2000 = RefSystem::Equm(RefEpoch::J2000);
        assert_abs_diff_eq!(rotpn(&sys, &j2000), Matrix3::identity(), epsilon = TOLERANCE);
    }

    #[test]
    fn test_rotpn_equt_to_equm_is_nutation() {
        let date = 57656.24;
        let equt = RefSystem::Equt(RefEpoch::Epoch(date));
        let equm = RefSystem::Equm(RefEpoch::Epoch(date));

        assert_abs_diff_eq!(
            rotpn(&equm, &equt),
            rnut80(date),
            epsilon = TOLERANCE
        );
        assert_abs_diff_eq!(
            rotpn(&equt, &equm),
            rnut80(date).transpose(),
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn test_rotpn_round_trip() {
        let date = 57656.24;
        let fk5 = RefSystem::Equm(RefEpoch::J2000);
        let apparent = RefSystem::Equt(RefEpoch::Epoch(date));

        let forward = rotpn(&fk5, &apparent);
        let backward = rotpn(&apparent, &fk5);
        assert_abs_diff_eq!(forward * backward, Matrix3::identity(), epsilon = TOLERANCE);
        assert_abs_diff_eq!(
            forward,
            rnut80(date) * prec(date),
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn test_aberration_round_trip() {
        let beta = Vector3::new(-7.9192e-5, 5.6613e-5, 2.4540e-5);
        let direction = Vector3::new(0.3, -0.5, 0.7).normalize();

        let observed = aberrate(&direction, &beta);
        assert_abs_diff_eq!(observed.norm(), 1.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(
            correct_aberration(&observed, &beta),
            direction,
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn test_aberration_toward_apex() {
        // a source at 90° from the apex is displaced by |β| toward it, none along it
        let beta = Vector3::new(1e-4, 0.0, 0.0);

        let observed = aberrate(&Vector3::y(), &beta);
        assert_abs_diff_eq!(observed.x.atan2(observed.y), 1e-4, epsilon = 1e-12);

        let observed = aberrate(&Vector3::x(), &beta);
        assert_abs_diff_eq!(observed, Vector3::x(), epsilon = TOLERANCE);
    }
}
