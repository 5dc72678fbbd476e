use approx::assert_abs_diff_eq;
use aste_merge::constants::angle_difference;
use aste_merge::SkyPosition;

pub fn assert_sky_close(actual: &SkyPosition, expected: &SkyPosition, epsilon: f64) {
    assert_eq!(actual.frame, expected.frame);
    assert_abs_diff_eq!(
        angle_difference(actual.longitude, expected.longitude),
        0.0,
        epsilon = epsilon
    );
    assert_abs_diff_eq!(actual.latitude, expected.latitude, epsilon = epsilon);
}
