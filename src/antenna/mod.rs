//! # ASTE antenna logs
//!
//! Read an antenna log into a time-indexed, pointing-corrected [`AntennaDataset`].
//!
//! ## Pipeline
//!
//! ```text
//! log file ──parse──▶ AntennaLog ──TimeAxis::new──▶ TimeAxis ─┐
//!                         │                                  ├──assemble──▶ AntennaDataset
//!                         └────────reconcile (FK5)───────────┘
//! ```
//!
//! * [`log_reader`]: header and record decoding, schema selection by frame label.
//! * [`reconcile`]: horizontal → FK5 transform and pointing correction per record.
//! * [`dataset`]: the output contract and its static series metadata.
//!
//! A read either returns a complete dataset or fails with the first error; nothing is
//! cached between reads.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aste_merge::antenna::{self, AntennaReader};
//! use camino::Utf8Path;
//!
//! let dataset = antenna::read(Utf8Path::new("antlog_20160925054612")).unwrap();
//! println!("{} samples in frame {}", dataset.len(), dataset.frame);
//!
//! // with Earth orientation data for UT1
//! let reader = AntennaReader::new().with_ut1_provider(ut1_provider);
//! let dataset = reader.read(Utf8Path::new("antlog_20160925054612")).unwrap();
//! ```
pub mod dataset;
pub mod log_reader;
pub mod reconcile;

use camino::Utf8Path;
use hifitime::ut1::Ut1Provider;
use log::info;

use crate::aste_errors::AsteError;
use crate::axis::TimeAxis;
use crate::frames::Frame;
use crate::observatory::ObservatorySite;

pub use dataset::{assemble, AntennaDataset};
pub use log_reader::{parse, AntennaLog, LogSchema, RawLogRow};
pub use reconcile::{reconcile, ReconciledSample};

/// Frame every antenna dataset is reconciled into.
pub const TARGET_FRAME: Frame = Frame::Fk5;

/// Configured antenna log reader.
///
/// The site is fixed to [`ObservatorySite::ASTE`] and the output frame to FK5; the only
/// option is the source of UT1.
#[derive(Debug, Clone, Default)]
pub struct AntennaReader {
    ut1_provider: Option<Ut1Provider>,
}

impl AntennaReader {
    /// Reader evaluating sidereal time on UTC (|UT1 − UTC| < 0.9 s).
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate sidereal time on UT1 from the given Earth orientation data.
    pub fn with_ut1_provider(mut self, provider: Ut1Provider) -> Self {
        self.ut1_provider = Some(provider);
        self
    }

    /// Observatory the az/el angles of every log refer to.
    pub fn site(&self) -> &ObservatorySite {
        &ObservatorySite::ASTE
    }

    /// Run the pipeline on an already parsed log.
    ///
    /// Return
    /// ----------
    /// * The dataset, or the first error of time-axis construction, reconciliation or
    ///   assembly.
    pub fn build(&self, log: &AntennaLog) -> Result<AntennaDataset, AsteError> {
        let time = TimeAxis::new(log.times())?;
        let reconciled = reconcile(log, TARGET_FRAME, self.site(), self.ut1_provider.as_ref())?;
        assemble(time, &reconciled, &log.header.frame_label)
    }

    /// Read an antenna log file into an [`AntennaDataset`].
    ///
    /// Arguments
    /// -----------------
    /// * `path`: antenna log file.
    ///
    /// Return
    /// ----------
    /// * The dataset, or the first [`AsteError`] met. No partial dataset is ever returned.
    pub fn read(&self, path: &Utf8Path) -> Result<AntennaDataset, AsteError> {
        let log = parse(path)?;
        let dataset = self.build(&log)?;
        info!(
            "read antenna log {path}: {} samples, frame {}",
            dataset.len(),
            dataset.frame
        );
        Ok(dataset)
    }
}

/// Read an antenna log with the default [`AntennaReader`].
pub fn read(path: &Utf8Path) -> Result<AntennaDataset, AsteError> {
    AntennaReader::new().read(path)
}
