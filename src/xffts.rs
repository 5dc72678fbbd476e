//! # XFFTS spectrometer logs
//!
//! Binary logs of the XFFTS spectrometer are a flat sequence of fixed-size little-endian
//! records, with no header:
//!
//! | Field       | Type               | Bytes        |
//! |-------------|--------------------|--------------|
//! | `time`      | `f64`, Unix seconds (UTC) | 8     |
//! | `integtime` | `f32`, seconds     | 4            |
//! | `obsmode`   | ASCII, NUL padded  | 8            |
//! | `spectrum`  | `f32` × `nchan`    | 4 × `nchan`  |
//!
//! With the instrument's 32768 channels a record is 131092 bytes.
//!
//! [`read`] turns such a file into an [`XfftsDataset`] sharing the time-axis contract of
//! the antenna datasets, so both can be aligned downstream. That contract is strict: record
//! times must be strictly increasing, and a file with repeated or out-of-order times is
//! rejected with [`AsteError::UnorderedTime`] instead of being returned in file order.
use camino::Utf8Path;
use hifitime::Epoch;
use log::{debug, info};
use nalgebra::DMatrix;
use nom::{
    bytes::complete::take,
    multi::count,
    number::complete::{le_f32, le_f64},
    IResult, Parser,
};

use crate::aste_errors::AsteError;
use crate::axis::{ChannelAxis, TimeAxis};
use crate::series::{data_series, DataSeries};

/// Channels per spectrum.
pub const LOG_NCHAN: usize = 32768;

const OBSMODE_LEN: usize = 8;

/// Size in bytes of one record holding `nchan` channels.
pub const fn record_size(nchan: usize) -> usize {
    8 + 4 + OBSMODE_LEN + 4 * nchan
}

data_series!(
    /// Integration time per sample.
    IntegTime, f32, "integtime", "Integration time", "Integ. time", Some("s")
);
data_series!(
    /// Observation mode per sample.
    ObsMode, String, "obsmode", "Observation mode", "Obs. mode", None
);

/// Sampled spectra, one row per time sample and one column per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    data: DMatrix<f32>,
}

impl Spectrum {
    pub const NAME: &'static str = "spectrum";
    pub const LONG_NAME: &'static str = "XFFTS spectrum";
    pub const SHORT_NAME: &'static str = "Spectrum";

    pub fn data(&self) -> &DMatrix<f32> {
        &self.data
    }

    /// `(time, chan)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }
}

/// Contents of an XFFTS log.
#[derive(Debug, Clone, PartialEq)]
pub struct XfftsDataset {
    pub time: TimeAxis,
    pub chan: ChannelAxis,
    pub integtime: IntegTime,
    pub obsmode: ObsMode,
    pub spectrum: Spectrum,
}

impl XfftsDataset {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

struct XfftsRecord {
    time: f64,
    integtime: f32,
    obsmode: String,
    spectrum: Vec<f32>,
}

type RawRecord<'a> = (f64, f32, &'a [u8], Vec<f32>);

fn record(input: &[u8], nchan: usize) -> IResult<&[u8], RawRecord<'_>> {
    let (input, time) = le_f64(input)?;
    let (input, integtime) = le_f32(input)?;
    let (input, obsmode) = take(OBSMODE_LEN).parse(input)?;
    let (input, spectrum) = count(le_f32, nchan).parse(input)?;
    Ok((input, (time, integtime, obsmode, spectrum)))
}

fn decode_record(index: usize, bytes: &[u8], nchan: usize) -> Result<XfftsRecord, AsteError> {
    let (_, (time, integtime, obsmode, spectrum)) = record(bytes, nchan)
        .map_err(|e| AsteError::MalformedRecord(format!("record {index}: {e}")))?;

    let obsmode = std::str::from_utf8(obsmode)
        .map_err(|_| AsteError::MalformedRecord(format!("record {index}: obsmode is not ASCII")))?
        .trim_end_matches('\0')
        .to_string();

    if !time.is_finite() {
        return Err(AsteError::MalformedRecord(format!(
            "record {index}: invalid time {time}"
        )));
    }

    Ok(XfftsRecord {
        time,
        integtime,
        obsmode,
        spectrum,
    })
}

/// Decode the bytes of an XFFTS log whose spectra hold `nchan` channels.
///
/// Return
/// ----------
/// * The dataset, or:
///   * [`AsteError::MalformedRecord`] when the length is not a whole number of records or
///     a record cannot be decoded,
///   * [`AsteError::UnorderedTime`] when the record times are not strictly increasing.
pub fn parse_bytes(bytes: &[u8], nchan: usize) -> Result<XfftsDataset, AsteError> {
    let size = record_size(nchan);
    if bytes.len() % size != 0 {
        return Err(AsteError::MalformedRecord(format!(
            "{} bytes is not a multiple of the {size} byte record",
            bytes.len()
        )));
    }

    let records = bytes
        .chunks_exact(size)
        .enumerate()
        .map(|(index, chunk)| decode_record(index, chunk, nchan))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("decoded {} XFFTS records of {nchan} channels", records.len());

    let time = TimeAxis::new(
        records
            .iter()
            .map(|r| Epoch::from_unix_seconds(r.time))
            .collect(),
    )?;
    let spectrum = DMatrix::from_row_iterator(
        records.len(),
        nchan,
        records.iter().flat_map(|r| r.spectrum.iter().copied()),
    );
    let integtime = records.iter().map(|r| r.integtime).collect();
    let obsmode = records.into_iter().map(|r| r.obsmode).collect();

    Ok(XfftsDataset {
        time,
        chan: ChannelAxis::new(nchan),
        integtime: IntegTime::new(integtime),
        obsmode: ObsMode::new(obsmode),
        spectrum: Spectrum { data: spectrum },
    })
}

/// Read an XFFTS log of [`LOG_NCHAN`] channels.
pub fn read(path: &Utf8Path) -> Result<XfftsDataset, AsteError> {
    let bytes = std::fs::read(path)?;
    let dataset = parse_bytes(&bytes, LOG_NCHAN)?;
    info!(
        "read XFFTS log {path}: {} samples, {} {}",
        dataset.len(),
        dataset.chan.len(),
        ObsMode::NAME
    );
    Ok(dataset)
}

#[cfg(test)]
mod xffts_test {
    use super::*;

    const NCHAN: usize = 4;

    fn encode(time: f64, integtime: f32, obsmode: &str, spectrum: [f32; NCHAN]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(record_size(NCHAN));
        bytes.extend_from_slice(&time.to_le_bytes());
        bytes.extend_from_slice(&integtime.to_le_bytes());
        let mut mode = [0u8; OBSMODE_LEN];
        mode[..obsmode.len()].copy_from_slice(obsmode.as_bytes());
        bytes.extend_from_slice(&mode);
        for v in spectrum {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    fn two_records() -> Vec<u8> {
        let mut bytes = encode(1_474_782_372.5, 0.1, "ON", [1.0, 2.0, 3.0, 4.0]);
        bytes.extend(encode(1_474_782_373.0, 0.1, "OFF", [5.0, 6.0, 7.0, 8.0]));
        bytes
    }

    #[test]
    fn test_record_size() {
        assert_eq!(record_size(LOG_NCHAN), 131092);
        assert_eq!(record_size(NCHAN), 36);
    }

    #[test]
    fn test_parse_records() {
        let dataset = parse_bytes(&two_records(), NCHAN).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.chan.len(), NCHAN);
        let expected = [1_474_782_372_500_000_000_i128, 1_474_782_373_000_000_000];
        for (ns, expected) in dataset.time.unix_nanoseconds().into_iter().zip(expected) {
            assert!((ns - expected).abs() < 1_000);
        }
        assert_eq!(dataset.integtime.data(), &[0.1, 0.1]);
        assert_eq!(dataset.obsmode.data(), &["ON".to_string(), "OFF".to_string()]);
        assert_eq!(dataset.spectrum.shape(), (2, NCHAN));
        assert_eq!(dataset.spectrum.data()[(0, 3)], 4.0);
        assert_eq!(dataset.spectrum.data()[(1, 0)], 5.0);
    }

    #[test]
    fn test_empty_log() {
        let dataset = parse_bytes(&[], NCHAN).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.spectrum.shape(), (0, NCHAN));
    }

    #[test]
    fn test_truncated_log() {
        let mut bytes = two_records();
        bytes.pop();
        assert!(matches!(
            parse_bytes(&bytes, NCHAN),
            Err(AsteError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_invalid_records() {
        let mut bytes = encode(1_474_782_372.5, 0.1, "ON", [0.0; NCHAN]);
        bytes[12] = 0xff;
        assert!(matches!(
            parse_bytes(&bytes, NCHAN),
            Err(AsteError::MalformedRecord(_))
        ));

        let bytes = encode(f64::NAN, 0.1, "ON", [0.0; NCHAN]);
        assert!(matches!(
            parse_bytes(&bytes, NCHAN),
            Err(AsteError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_unordered_records() {
        let mut bytes = encode(1_474_782_373.0, 0.1, "ON", [0.0; NCHAN]);
        bytes.extend(encode(1_474_782_372.0, 0.1, "ON", [0.0; NCHAN]));
        assert_eq!(
            parse_bytes(&bytes, NCHAN),
            Err(AsteError::UnorderedTime { index: 1 })
        );

        // repeated times are rejected too
        let mut bytes = encode(1_474_782_372.0, 0.1, "ON", [0.0; NCHAN]);
        bytes.extend(encode(1_474_782_372.5, 0.1, "ON", [0.0; NCHAN]));
        bytes.extend(encode(1_474_782_372.5, 0.1, "OFF", [0.0; NCHAN]));
        assert_eq!(
            parse_bytes(&bytes, NCHAN),
            Err(AsteError::UnorderedTime { index: 2 })
        );
    }

    #[test]
    fn test_metadata() {
        assert_eq!(IntegTime::LONG_NAME, "Integration time");
        assert_eq!(IntegTime::UNITS, Some("s"));
        assert_eq!(ObsMode::SHORT_NAME, "Obs. mode");
        assert_eq!(Spectrum::LONG_NAME, "XFFTS spectrum");
    }
}
