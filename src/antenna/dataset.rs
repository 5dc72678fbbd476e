//! # Antenna dataset
//!
//! The assembled output of an antenna log: a time coordinate, the achieved antenna
//! az/el, the reconciled sky position, and the frame label of the log.
use log::debug;

use super::reconcile::ReconciledSample;
use crate::aste_errors::AsteError;
use crate::axis::TimeAxis;
use crate::series::{data_series, DataSeries};

data_series!(
    /// Achieved antenna azimuth.
    Azimuth, f64, "azimuth", "Antenna azimuth", "Azimuth", Some("degree")
);
data_series!(
    /// Achieved antenna elevation.
    Elevation, f64, "elevation", "Antenna elevation", "Elevation", Some("degree")
);
data_series!(
    /// Pointing-corrected sky longitude.
    Longitude, f64, "longitude", "Sky longitude", "Longitude", Some("degree")
);
data_series!(
    /// Pointing-corrected sky latitude.
    Latitude, f64, "latitude", "Sky latitude", "Latitude", Some("degree")
);
data_series!(
    AzimuthError, f64, "azimuth_error", "Antenna azimuth error", "Az. error", Some("degree")
);
data_series!(
    ElevationError, f64, "elevation_error", "Antenna elevation error", "El. error", Some("degree")
);

/// Time-indexed antenna pointing.
///
/// Every series has exactly the length of [`AntennaDataset::time`]. The error series
/// only exist for logs that report them.
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaDataset {
    pub time: TimeAxis,
    pub azimuth: Azimuth,
    pub elevation: Elevation,
    pub longitude: Longitude,
    pub latitude: Latitude,
    pub azimuth_error: Option<AzimuthError>,
    pub elevation_error: Option<ElevationError>,
    /// Frame label of the source log.
    pub frame: String,
}

impl AntennaDataset {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Build an [`AntennaDataset`] from reconciled samples.
///
/// Arguments
/// -----------------
/// * `time_axis`: the time coordinate, one instant per sample.
/// * `reconciled`: samples in time-axis order.
/// * `frame_label`: frame label attached to the dataset.
///
/// Return
/// ----------
/// * The dataset, or [`AsteError::ShapeMismatch`] when the sample count differs from the
///   time-axis length.
pub fn assemble(
    time_axis: TimeAxis,
    reconciled: &[ReconciledSample],
    frame_label: &str,
) -> Result<AntennaDataset, AsteError> {
    if reconciled.len() != time_axis.len() {
        return Err(AsteError::ShapeMismatch {
            expected: time_axis.len(),
            found: reconciled.len(),
        });
    }

    let column = |f: fn(&ReconciledSample) -> f64| reconciled.iter().map(f).collect::<Vec<_>>();
    let optional = |f: fn(&ReconciledSample) -> Option<f64>| {
        if reconciled.is_empty() {
            None
        } else {
            reconciled.iter().map(f).collect::<Option<Vec<_>>>()
        }
    };

    let dataset = AntennaDataset {
        azimuth: Azimuth::new(column(|s| s.azimuth)),
        elevation: Elevation::new(column(|s| s.elevation)),
        longitude: Longitude::new(column(|s| s.longitude)),
        latitude: Latitude::new(column(|s| s.latitude)),
        azimuth_error: optional(|s| s.azimuth_error).map(AzimuthError::new),
        elevation_error: optional(|s| s.elevation_error).map(ElevationError::new),
        frame: frame_label.to_string(),
        time: time_axis,
    };

    debug!(
        "assembled {} samples: {}, {}, {}, {}",
        dataset.len(),
        Azimuth::NAME,
        Elevation::NAME,
        Longitude::NAME,
        Latitude::NAME
    );
    Ok(dataset)
}
