//! # Coordinate frame registry
//!
//! The frames an antenna log can be expressed in, and the pure transform between them.
//!
//! ## Frames
//!
//! | Frame                  | Angles                          | Labels                  |
//! |------------------------|---------------------------------|-------------------------|
//! | [`Frame::Horizontal`]  | azimuth (N → E), elevation      | `AZEL`                  |
//! | [`Frame::Apparent`]    | true equator & equinox of date  | `APPARENT`              |
//! | [`Frame::Fk5`]         | mean equator & equinox of J2000 | `FK5`, `fk5`, `RADEC`   |
//!
//! Every transform goes through the geocentric apparent place (true equator and equinox
//! of date, annual aberration included):
//!
//! ```text
//! Horizontal ──(LAST, site latitude, diurnal aberration)──▶ Apparent
//!            ──(annual aberration, nutation, precession)──▶ FK5
//! ```
//!
//! The horizontal leg rotates about the pole by the local apparent sidereal time to the
//! hour-angle frame, then tilts about the east-west axis by the site colatitude to the
//! horizon frame (north, west, zenith). Atmospheric refraction is not modelled: the
//! elevations are those of the antenna encoders. The equatorial leg reuses [`rotpn`].
//! Aberration is applied with [`aberrate`] and removed with its exact inverse
//! [`correct_aberration`], so round trips are exact to rounding.
//!
//! All angles exchanged with callers are in **degrees**; longitudes are returned in
//! `[0, 360)`.
use std::fmt;

use hifitime::ut1::Ut1Provider;
use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

use crate::aste_errors::AsteError;
use crate::constants::{normalize_longitude, Degree};
use crate::observatory::ObservatorySite;
use crate::earth_orientation::annual_aberration;
use crate::ref_system::{aberrate, correct_aberration, rotmt, rotpn, RefEpoch, RefSystem};

/// Coordinate frames known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Azimuth (from north through east) and elevation at a site and instant.
    Horizontal,
    /// Geocentric apparent place: true equator and equinox of date, annual aberration
    /// included.
    Apparent,
    /// Mean equator and equinox of J2000.
    Fk5,
}

impl Frame {
    /// Resolve a frame label as written in an antenna log header.
    ///
    /// Return
    /// ------
    /// * The matching [`Frame`], or [`AsteError::UnsupportedFrame`] carrying the label.
    pub fn from_label(label: &str) -> Result<Frame, AsteError> {
        match label {
            "AZEL" => Ok(Frame::Horizontal),
            "APPARENT" => Ok(Frame::Apparent),
            "FK5" | "fk5" | "RADEC" => Ok(Frame::Fk5),
            other => Err(AsteError::UnsupportedFrame(other.to_string())),
        }
    }

    /// Canonical label of the frame.
    pub fn label(&self) -> &'static str {
        match self {
            Frame::Horizontal => "AZEL",
            Frame::Apparent => "APPARENT",
            Frame::Fk5 => "FK5",
        }
    }

    pub fn is_equatorial(&self) -> bool {
        !matches!(self, Frame::Horizontal)
    }

    /// Fail with [`AsteError::UnsupportedFrame`] unless sky positions can be reconciled
    /// into this frame.
    pub fn require_equatorial(&self) -> Result<(), AsteError> {
        if self.is_equatorial() {
            Ok(())
        } else {
            Err(AsteError::UnsupportedFrame(self.label().to_string()))
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A pair of angles in a given frame, in degrees.
///
/// For [`Frame::Horizontal`] the longitude is the azimuth and the latitude the elevation.
/// A position is only meaningful together with the instant and site it was observed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    pub longitude: Degree,
    pub latitude: Degree,
    pub frame: Frame,
}

impl SkyPosition {
    pub fn new(longitude: Degree, latitude: Degree, frame: Frame) -> Self {
        SkyPosition {
            longitude,
            latitude,
            frame,
        }
    }

    pub fn horizontal(azimuth: Degree, elevation: Degree) -> Self {
        SkyPosition::new(azimuth, elevation, Frame::Horizontal)
    }
}

/// Everything a transform depends on besides the angles themselves.
///
/// Bundles the instant, the site and the optional UT1 data so that the rotation
/// matrices of one instant can be built once and reused for several positions
/// (commanded and achieved pointing of the same log row).
pub struct FrameContext {
    /// apparent of date → horizon (north, west, zenith)
    apparent_to_horizon: Matrix3<f64>,
    /// site velocity from Earth rotation, v/c, true equator of date
    diurnal: Vector3<f64>,
    /// FK5 → true equator and equinox of date
    fk5_to_apparent: Matrix3<f64>,
    /// Earth orbital velocity, v/c, true equator of date
    annual: Vector3<f64>,
}

impl FrameContext {
    /// Build the rotations and aberration velocities valid at `epoch` for `site`.
    ///
    /// Arguments
    /// -----------------
    /// * `epoch`: observation instant (UTC).
    /// * `site`: observatory the horizontal coordinates refer to.
    /// * `ut1_provider`: optional Earth orientation data for the sidereal time.
    pub fn new(epoch: &Epoch, site: &ObservatorySite, ut1_provider: Option<&Ut1Provider>) -> Self {
        let last = site.local_sidereal_time(epoch, ut1_provider);
        let (sin_lat, cos_lat) = site.lat_rad().sin_cos();

        // hour-angle frame (x on the local meridian, y toward the east) → north, west, zenith
        #[rustfmt::skip]
        let horizon = Matrix3::new(
            -sin_lat,  0.0, cos_lat,
                 0.0, -1.0,     0.0,
             cos_lat,  0.0, sin_lat,
        );

        let date = epoch.to_mjd_tt_days();
        let fk5 = RefSystem::Equm(RefEpoch::J2000);
        let mean = RefSystem::Equm(RefEpoch::Epoch(date));
        let apparent = RefSystem::Equt(RefEpoch::Epoch(date));

        FrameContext {
            apparent_to_horizon: horizon * rotmt(-last, 2),
            diurnal: site.diurnal_aberration(last),
            fk5_to_apparent: rotpn(&fk5, &apparent),
            annual: rotpn(&mean, &apparent) * annual_aberration(date),
        }
    }

    /// Unit vector of `position` in the apparent frame of date.
    fn to_apparent(&self, position: &SkyPosition) -> Vector3<f64> {
        match position.frame {
            Frame::Horizontal => {
                let horizon = horizontal_to_vector(position.longitude, position.latitude);
                let topocentric = self.apparent_to_horizon.transpose() * horizon;
                correct_aberration(&topocentric, &self.diurnal)
            }
            Frame::Apparent => lonlat_to_vector(position.longitude, position.latitude),
            Frame::Fk5 => {
                let mean = lonlat_to_vector(position.longitude, position.latitude);
                aberrate(&(self.fk5_to_apparent * mean), &self.annual)
            }
        }
    }

    /// Express `position` in the `target` frame.
    pub fn transform(&self, position: &SkyPosition, target: Frame) -> SkyPosition {
        if position.frame == target {
            return *position;
        }

        let apparent = self.to_apparent(position);
        let (longitude, latitude) = match target {
            Frame::Horizontal => {
                let topocentric = aberrate(&apparent, &self.diurnal);
                vector_to_horizontal(&(self.apparent_to_horizon * topocentric))
            }
            Frame::Apparent => vector_to_lonlat(&apparent),
            Frame::Fk5 => {
                let geometric = correct_aberration(&apparent, &self.annual);
                vector_to_lonlat(&(self.fk5_to_apparent.transpose() * geometric))
            }
        };

        SkyPosition::new(longitude, latitude, target)
    }
}

/// Transform a sky position into another frame of the registry.
///
/// Pure function of its inputs; round trips through any chain of frames recover the
/// original angles to well below a micro-degree.
///
/// Arguments
/// -----------------
/// * `position`: angles and source frame.
/// * `target`: frame to express the position in.
/// * `epoch`: observation instant (UTC).
/// * `site`: observatory the horizontal coordinates refer to.
/// * `ut1_provider`: optional Earth orientation data; UT1 ≈ UTC without it.
///
/// Return
/// ----------
/// * The position expressed in `target`.
///
/// # See also
/// * [`FrameContext`] – to reuse the rotations of one instant for several positions.
pub fn transform(
    position: &SkyPosition,
    target: Frame,
    epoch: &Epoch,
    site: &ObservatorySite,
    ut1_provider: Option<&Ut1Provider>,
) -> SkyPosition {
    FrameContext::new(epoch, site, ut1_provider).transform(position, target)
}

fn lonlat_to_vector(longitude: Degree, latitude: Degree) -> Vector3<f64> {
    let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
    let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

fn vector_to_lonlat(v: &Vector3<f64>) -> (Degree, Degree) {
    let longitude = normalize_longitude(v.y.atan2(v.x).to_degrees());
    let latitude = v.z.atan2(v.x.hypot(v.y)).to_degrees();
    (longitude, latitude)
}

// azimuth runs through east while the horizon frame's y axis points west
fn horizontal_to_vector(azimuth: Degree, elevation: Degree) -> Vector3<f64> {
    lonlat_to_vector(-azimuth, elevation)
}

fn vector_to_horizontal(v: &Vector3<f64>) -> (Degree, Degree) {
    let (west_longitude, elevation) = vector_to_lonlat(v);
    (normalize_longitude(-west_longitude), elevation)
}
