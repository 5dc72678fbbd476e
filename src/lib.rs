//! # aste-merge
//!
//! Ingestion of the ASTE telescope logs ahead of their merge:
//!
//! * [`antenna`]: antenna controller logs, reconciled into pointing-corrected FK5 sky
//!   positions on a UTC time axis.
//! * [`xffts`]: XFFTS spectrometer binary logs on the same time-axis contract.
//!
//! The astrometric core ([`frames`], [`observatory`], [`ref_system`],
//! [`earth_orientation`]) converts azimuth/elevation at the ASTE site to the mean equator
//! and equinox of J2000 with the IAU 1976 precession and IAU 1980 nutation models, diurnal
//! and annual aberration included.
pub mod antenna;
pub mod aste_errors;
pub mod axis;
pub mod constants;
pub mod earth_orientation;
pub mod frames;
pub mod observatory;
pub mod ref_system;
pub mod series;
pub mod time;
pub mod xffts;

pub use antenna::{AntennaDataset, AntennaReader};
pub use aste_errors::AsteError;
pub use frames::{transform, Frame, SkyPosition};
pub use observatory::ObservatorySite;
pub use xffts::XfftsDataset;
