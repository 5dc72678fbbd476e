//! # Pointing reconciliation
//!
//! Turn raw antenna records into pointing-corrected sky positions.
//!
//! Every record carries the commanded and the achieved az/el of the antenna. Both are
//! taken to the target frame at the record instant and their difference, the pointing
//! error, is applied to the sky position the antenna was asked to track:
//!
//! ```text
//! corrected = commanded sky + [sky(achieved) − sky(commanded)]
//! ```
//!
//! Any systematic error of the horizontal transform cancels in the difference. Where the
//! commanded sky position comes from depends on the schema of the log:
//!
//! * [`LogSchema::AzElOffset`]: once for the whole log, in the header.
//! * [`LogSchema::SkyReport`]: per record, in its longitude/latitude columns.
//!
//! Longitude differences are taken with [`angle_difference`], so a pointing offset across
//! the 0°/360° seam stays small.
use hifitime::ut1::Ut1Provider;
use hifitime::Epoch;
use log::debug;

use super::log_reader::{AntennaLog, LogSchema, RawLogRow};
use crate::aste_errors::{AsteError, ParseRowError};
use crate::constants::{angle_difference, normalize_longitude, Degree};
use crate::frames::{Frame, FrameContext, SkyPosition};
use crate::observatory::ObservatorySite;

/// One record after pointing correction, angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledSample {
    pub time: Epoch,
    /// achieved azimuth
    pub azimuth: Degree,
    /// achieved elevation
    pub elevation: Degree,
    pub longitude: Degree,
    pub latitude: Degree,
    pub azimuth_error: Option<Degree>,
    pub elevation_error: Option<Degree>,
}

impl ReconciledSample {
    fn from_row(row: &RawLogRow, position: SkyPosition) -> Self {
        ReconciledSample {
            time: row.time,
            azimuth: row.achieved_azimuth,
            elevation: row.achieved_elevation,
            longitude: position.longitude,
            latitude: position.latitude,
            azimuth_error: row.azimuth_error,
            elevation_error: row.elevation_error,
        }
    }
}

/// Apply the measured pointing offset of `row` to `reference`.
///
/// Arguments
/// -----------------
/// * `ctx`: rotations at the row instant.
/// * `row`: the record with commanded and achieved az/el.
/// * `reference`: nominal sky target.
/// * `target`: frame the offset is measured and applied in.
///
/// Return
/// ----------
/// * The corrected position in `target`, longitude in `[0, 360)`.
pub fn offset_correction(
    ctx: &FrameContext,
    row: &RawLogRow,
    reference: &SkyPosition,
    target: Frame,
) -> SkyPosition {
    let commanded = ctx.transform(
        &SkyPosition::horizontal(row.commanded_azimuth, row.commanded_elevation),
        target,
    );
    let achieved = ctx.transform(
        &SkyPosition::horizontal(row.achieved_azimuth, row.achieved_elevation),
        target,
    );
    let reference = ctx.transform(reference, target);

    SkyPosition::new(
        normalize_longitude(
            reference.longitude + angle_difference(achieved.longitude, commanded.longitude),
        ),
        reference.latitude + (achieved.latitude - commanded.latitude),
        target,
    )
}

fn commanded_position(row: &RawLogRow, frame: Frame) -> Result<SkyPosition, AsteError> {
    let missing = |column| AsteError::MalformedRow {
        line: row.line,
        source: ParseRowError::MissingColumn(column),
    };
    let longitude = row.commanded_longitude.ok_or_else(|| missing("longitude"))?;
    let latitude = row.commanded_latitude.ok_or_else(|| missing("latitude"))?;
    Ok(SkyPosition::new(longitude, latitude, frame))
}

/// Reconcile every record of `log` into sky positions in `target`.
///
/// Arguments
/// -----------------
/// * `log`: the parsed antenna log.
/// * `target`: equatorial frame of the output positions.
/// * `site`: observatory the az/el angles refer to.
/// * `ut1_provider`: optional Earth orientation data; UT1 ≈ UTC without it.
///
/// Return
/// ----------
/// * One [`ReconciledSample`] per record, in record order, or:
///   * [`AsteError::UnsupportedFrame`] when `target` is not equatorial,
///   * [`AsteError::MalformedHeader`] when an offset log carries no reference position,
///   * [`AsteError::MalformedRow`] when a sky report record lacks its commanded sky position.
pub fn reconcile(
    log: &AntennaLog,
    target: Frame,
    site: &ObservatorySite,
    ut1_provider: Option<&Ut1Provider>,
) -> Result<Vec<ReconciledSample>, AsteError> {
    target.require_equatorial()?;
    let schema = log.header.schema;

    let samples: Vec<ReconciledSample> = match schema {
        LogSchema::AzElOffset => {
            let reference = log.header.reference.ok_or_else(|| {
                AsteError::MalformedHeader(format!(
                    "frame {} requires a reference position",
                    log.header.frame_label
                ))
            })?;

            log.rows
                .iter()
                .map(|row| {
                    let ctx = FrameContext::new(&row.time, site, ut1_provider);
                    ReconciledSample::from_row(row, offset_correction(&ctx, row, &reference, target))
                })
                .collect()
        }
        LogSchema::SkyReport => log
            .rows
            .iter()
            .map(|row| {
                let commanded = commanded_position(row, schema.frame())?;
                let ctx = FrameContext::new(&row.time, site, ut1_provider);
                Ok(ReconciledSample::from_row(
                    row,
                    offset_correction(&ctx, row, &commanded, target),
                ))
            })
            .collect::<Result<Vec<_>, AsteError>>()?,
    };

    debug!(
        "reconciled {} records of a {schema:?} log into {target} at {}",
        log.rows.len(),
        site.name
    );
    Ok(samples)
}
