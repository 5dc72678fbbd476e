//! # Antenna log reader
//!
//! Decode the text logs written by the ASTE antenna controller into raw rows.
//!
//! A log is a header line followed by one whitespace separated record per sample. The first
//! token of the header is a frame label which selects the [`LogSchema`] of the records:
//!
//! | Label          | Schema                      | Header metadata          | Columns |
//! |----------------|-----------------------------|--------------------------|---------|
//! | `RADEC`        | [`LogSchema::AzElOffset`]   | `_ ref_lon ref_lat`      | 5       |
//! | `fk5` / `FK5`  | [`LogSchema::SkyReport`]    | optional `_ ref_lon ref_lat` | 9   |
//!
//! Any other label, including the horizontal `AZEL`, is rejected with
//! [`AsteError::UnsupportedFrame`]. A single malformed record rejects the whole file.
//!
//! Example
//! -----------------
//! ```text
//! RADEC _ 34.83662 -2.97831
//! 160925054612.6 31.65000 66.85000 31.65207 66.85711
//! 160925055345.0 27.23500 67.71000 27.23589 67.71096
//! ```
use camino::Utf8Path;
use hifitime::Epoch;
use log::{debug, warn};

use crate::aste_errors::{AsteError, ParseRowError};
use crate::constants::Degree;
use crate::frames::{Frame, SkyPosition};
use crate::time::parse_log_time;

/// Data type of a log column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// `yymmddHHMMSS[.f]` UTC timestamp
    Time,
    /// angle in degrees
    Float,
}

const AZEL_OFFSET_COLUMNS: [(&str, ColumnType); 5] = [
    ("time", ColumnType::Time),
    ("prog_az", ColumnType::Float),
    ("prog_el", ColumnType::Float),
    ("real_az", ColumnType::Float),
    ("real_el", ColumnType::Float),
];

const SKY_REPORT_COLUMNS: [(&str, ColumnType); 9] = [
    ("time", ColumnType::Time),
    ("longitude", ColumnType::Float),
    ("latitude", ColumnType::Float),
    ("prog_az", ColumnType::Float),
    ("prog_el", ColumnType::Float),
    ("real_az", ColumnType::Float),
    ("real_el", ColumnType::Float),
    ("az_error", ColumnType::Float),
    ("el_error", ColumnType::Float),
];

/// Record layouts written by the antenna controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSchema {
    /// Commanded and achieved az/el per record, sky reference position in the header.
    AzElOffset,
    /// Commanded sky position per record, with commanded/achieved az/el and their errors.
    SkyReport,
}

impl LogSchema {
    /// Select the schema from the header frame label.
    ///
    /// Labels unknown to the frame registry, and frames no schema is written in, are
    /// both reported as [`AsteError::UnsupportedFrame`].
    pub fn from_label(label: &str) -> Result<LogSchema, AsteError> {
        Frame::from_label(label)?;
        match label {
            "RADEC" => Ok(LogSchema::AzElOffset),
            "fk5" | "FK5" => Ok(LogSchema::SkyReport),
            other => Err(AsteError::UnsupportedFrame(other.to_string())),
        }
    }

    /// Declared `(name, type)` of every record column, in file order.
    pub fn columns(&self) -> &'static [(&'static str, ColumnType)] {
        match self {
            LogSchema::AzElOffset => &AZEL_OFFSET_COLUMNS,
            LogSchema::SkyReport => &SKY_REPORT_COLUMNS,
        }
    }

    /// Frame the commanded sky position of this schema is expressed in.
    pub fn frame(&self) -> Frame {
        match self {
            // header reference of a `RADEC` log
            LogSchema::AzElOffset => Frame::Fk5,
            // longitude/latitude columns of a `fk5` log
            LogSchema::SkyReport => Frame::Fk5,
        }
    }

    fn parse_header(&self, label: &str, metadata: &[&str]) -> Result<LogHeader, AsteError> {
        let reference = match (self, metadata) {
            (_, [_, lon, lat]) => Some(parse_reference(lon, lat, self.frame())?),
            (LogSchema::SkyReport, []) => None,
            _ => {
                return Err(AsteError::MalformedHeader(format!(
                    "frame {label} expects `{label} _ <longitude> <latitude>`, found {} metadata tokens",
                    metadata.len()
                )))
            }
        };

        Ok(LogHeader {
            frame_label: label.to_string(),
            schema: *self,
            reference,
        })
    }

    /// Decode one record according to the column declaration.
    fn parse_row(&self, line_number: usize, line: &str) -> Result<RawLogRow, ParseRowError> {
        let columns = self.columns();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != columns.len() {
            return Err(ParseRowError::ColumnCount {
                expected: columns.len(),
                found: tokens.len(),
            });
        }

        let mut time = None;
        let mut values = Vec::with_capacity(columns.len() - 1);
        for (&(name, dtype), token) in columns.iter().zip(tokens) {
            match dtype {
                ColumnType::Time => {
                    time = Some(
                        parse_log_time(token)
                            .ok_or_else(|| ParseRowError::InvalidTime(token.to_string()))?,
                    )
                }
                ColumnType::Float => values.push(parse_angle(name, token)?),
            }
        }
        let time = time.ok_or_else(|| ParseRowError::InvalidTime(line.to_string()))?;

        Ok(match (self, values.as_slice()) {
            (LogSchema::AzElOffset, &[prog_az, prog_el, real_az, real_el]) => RawLogRow {
                line: line_number,
                time,
                commanded_longitude: None,
                commanded_latitude: None,
                commanded_azimuth: prog_az,
                commanded_elevation: prog_el,
                achieved_azimuth: real_az,
                achieved_elevation: real_el,
                azimuth_error: None,
                elevation_error: None,
            },
            (
                LogSchema::SkyReport,
                &[lon, lat, prog_az, prog_el, real_az, real_el, az_error, el_error],
            ) => RawLogRow {
                line: line_number,
                time,
                commanded_longitude: Some(lon),
                commanded_latitude: Some(lat),
                commanded_azimuth: prog_az,
                commanded_elevation: prog_el,
                achieved_azimuth: real_az,
                achieved_elevation: real_el,
                azimuth_error: Some(az_error),
                elevation_error: Some(el_error),
            },
            _ => {
                return Err(ParseRowError::ColumnCount {
                    expected: columns.len(),
                    found: values.len() + 1,
                })
            }
        })
    }
}

fn parse_angle(column: &'static str, token: &str) -> Result<Degree, ParseRowError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseRowError::InvalidFloat {
            column,
            value: token.to_string(),
        })
}

fn parse_reference(lon: &str, lat: &str, frame: Frame) -> Result<SkyPosition, AsteError> {
    let malformed = |what: &str, token: &str| {
        AsteError::MalformedHeader(format!("invalid reference {what}: {token}"))
    };

    let longitude = lon
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed("longitude", lon))?;
    let latitude = lat
        .parse::<f64>()
        .ok()
        .filter(|v| (-90.0..=90.0).contains(v))
        .ok_or_else(|| malformed("latitude", lat))?;

    Ok(SkyPosition::new(longitude, latitude, frame))
}

/// Decoded header line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogHeader {
    /// Frame label exactly as written in the log.
    pub frame_label: String,
    pub schema: LogSchema,
    /// Sky reference position, when the header carries one.
    pub reference: Option<SkyPosition>,
}

/// One antenna log record, angles in degrees.
///
/// The commanded sky position and the az/el errors only exist in
/// [`LogSchema::SkyReport`] logs.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLogRow {
    /// 1-based line number in the log file.
    pub line: usize,
    pub time: Epoch,
    pub commanded_longitude: Option<Degree>,
    pub commanded_latitude: Option<Degree>,
    pub commanded_azimuth: Degree,
    pub commanded_elevation: Degree,
    pub achieved_azimuth: Degree,
    pub achieved_elevation: Degree,
    pub azimuth_error: Option<Degree>,
    pub elevation_error: Option<Degree>,
}

/// A parsed antenna log: its header and its records in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaLog {
    pub header: LogHeader,
    pub rows: Vec<RawLogRow>,
}

impl AntennaLog {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn times(&self) -> Vec<Epoch> {
        self.rows.iter().map(|row| row.time).collect()
    }
}

/// Parse the content of an antenna log.
///
/// Arguments
/// -----------------
/// * `content`: the whole log text.
///
/// Return
/// ----------
/// * The [`AntennaLog`], or the first error met:
///   * [`AsteError::MalformedHeader`] if the log is empty or the header lacks metadata,
///   * [`AsteError::UnsupportedFrame`] for a frame label no schema is written in,
///   * [`AsteError::MalformedRow`] with the 1-based line number of the first bad record.
pub fn parse_str(content: &str) -> Result<AntennaLog, AsteError> {
    let mut lines = content.lines().enumerate();

    let header_line = lines
        .next()
        .map(|(_, line)| line)
        .ok_or_else(|| AsteError::MalformedHeader("empty antenna log".into()))?;
    let mut tokens = header_line.split_whitespace();
    let label = tokens
        .next()
        .ok_or_else(|| AsteError::MalformedHeader("missing frame label".into()))?;
    let metadata: Vec<&str> = tokens.collect();

    let schema = LogSchema::from_label(label)?;
    let header = schema.parse_header(label, &metadata)?;

    let rows = lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            schema
                .parse_row(index + 1, line)
                .map_err(|source| AsteError::MalformedRow {
                    line: index + 1,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "antenna log: frame {label}, schema {schema:?}, {} records",
        rows.len()
    );
    if rows.is_empty() {
        warn!("antenna log with frame {label} holds no records");
    }

    Ok(AntennaLog { header, rows })
}

/// Read and parse an antenna log file.
///
/// See [`parse_str`] for the accepted layouts and the errors returned; I/O failures are
/// reported as [`AsteError::IoError`].
pub fn parse(path: &Utf8Path) -> Result<AntennaLog, AsteError> {
    let content = std::fs::read_to_string(path)?;
    debug!("read {} bytes from {path}", content.len());
    parse_str(&content)
}

#[cfg(test)]
mod log_reader_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const RADEC_LOG: &str = "RADEC _ 34.83662 -2.97831
160925054612.6 31.65000 66.85000 31.65207 66.85711
160925055345.0 27.23500 67.71000 27.23589 67.71096
";

    const FK5_LOG: &str = "fk5
160925054614.6 35.22711 -2.98005 32.33000 66.70900 32.33328 66.70913 0.00328 0.00013

160925055350.5 34.92006 -2.97833 27.23600 67.71100 27.23588 67.71098 -0.00012 -0.00002
";

    #[test]
    fn test_schema_registry() {
        assert_eq!(LogSchema::from_label("RADEC"), Ok(LogSchema::AzElOffset));
        assert_eq!(LogSchema::from_label("fk5"), Ok(LogSchema::SkyReport));
        assert_eq!(LogSchema::from_label("FK5"), Ok(LogSchema::SkyReport));
        assert_eq!(
            LogSchema::from_label("AZEL"),
            Err(AsteError::UnsupportedFrame("AZEL".into()))
        );
        assert_eq!(
            LogSchema::from_label("GALACTIC"),
            Err(AsteError::UnsupportedFrame("GALACTIC".into()))
        );

        assert_eq!(LogSchema::AzElOffset.columns().len(), 5);
        assert_eq!(LogSchema::SkyReport.columns().len(), 9);
        assert_eq!(LogSchema::SkyReport.columns()[0], ("time", ColumnType::Time));

        assert_eq!(LogSchema::AzElOffset.frame(), Frame::Fk5);
        assert_eq!(LogSchema::SkyReport.frame(), Frame::Fk5);
    }

    #[test]
    fn test_parse_radec_log() {
        let log = parse_str(RADEC_LOG).unwrap();

        assert_eq!(log.header.frame_label, "RADEC");
        assert_eq!(log.header.schema, LogSchema::AzElOffset);
        assert_eq!(
            log.header.reference,
            Some(SkyPosition::new(34.83662, -2.97831, Frame::Fk5))
        );
        assert_eq!(log.len(), 2);

        let row = &log.rows[0];
        assert_eq!(row.line, 2);
        assert_eq!(
            row.time,
            Epoch::from_gregorian_utc(2016, 9, 25, 5, 46, 12, 600_000_000)
        );
        assert_eq!(row.commanded_azimuth, 31.65);
        assert_eq!(row.achieved_azimuth, 31.65207);
        assert_eq!(row.achieved_elevation, 66.85711);
        assert_eq!(row.commanded_longitude, None);
        assert_eq!(row.azimuth_error, None);
        assert_eq!(log.rows[1].achieved_azimuth, 27.23589);
    }

    #[test]
    fn test_parse_fk5_log_skips_blank_lines() {
        let log = parse_str(FK5_LOG).unwrap();

        assert_eq!(log.header.frame_label, "fk5");
        assert_eq!(log.header.schema, LogSchema::SkyReport);
        assert_eq!(log.header.reference, None);
        assert_eq!(log.len(), 2);

        let last = &log.rows[1];
        assert_eq!(last.line, 4);
        assert_eq!(last.commanded_longitude, Some(34.92006));
        assert_eq!(last.commanded_latitude, Some(-2.97833));
        assert_eq!(last.achieved_azimuth, 27.23588);
        assert_abs_diff_eq!(last.azimuth_error.unwrap(), -0.00012);
        assert_eq!(
            last.time,
            Epoch::from_gregorian_utc(2016, 9, 25, 5, 53, 50, 500_000_000)
        );
    }

    #[test]
    fn test_fk5_header_with_reference() {
        let log = parse_str("FK5 _ 10.0 20.0\n").unwrap();
        assert_eq!(
            log.header.reference,
            Some(SkyPosition::new(10.0, 20.0, Frame::Fk5))
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_malformed_headers() {
        assert!(matches!(parse_str(""), Err(AsteError::MalformedHeader(_))));
        assert!(matches!(
            parse_str("   \n160925054612.6 1 2 3 4"),
            Err(AsteError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_str("RADEC\n"),
            Err(AsteError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_str("RADEC _ 34.8\n"),
            Err(AsteError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_str("RADEC _ ra -2.9\n"),
            Err(AsteError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_str("RADEC _ 34.8 95.0\n"),
            Err(AsteError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_str("fk5 _\n"),
            Err(AsteError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_unsupported_frame() {
        assert_eq!(
            parse_str("AZEL\n160925054612.6 1 2 3 4\n"),
            Err(AsteError::UnsupportedFrame("AZEL".into()))
        );
        assert_eq!(
            parse_str("galactic _ 1 2\n"),
            Err(AsteError::UnsupportedFrame("galactic".into()))
        );
    }

    #[test]
    fn test_malformed_rows() {
        let content = "RADEC _ 34.83662 -2.97831\n160925054612.6 31.65 66.85 31.65207\n";
        assert_eq!(
            parse_str(content),
            Err(AsteError::MalformedRow {
                line: 2,
                source: ParseRowError::ColumnCount {
                    expected: 5,
                    found: 4
                }
            })
        );

        let content = "RADEC _ 34.83662 -2.97831\n\n160925054612.6 31.65 66.85 31.65207 66.85711\n16092505.0 1 2 3 4\n";
        assert_eq!(
            parse_str(content),
            Err(AsteError::MalformedRow {
                line: 4,
                source: ParseRowError::InvalidTime("16092505.0".into())
            })
        );

        let content = "RADEC _ 34.83662 -2.97831\n160925054612.6 31.65 north 31.65207 66.85711\n";
        assert_eq!(
            parse_str(content),
            Err(AsteError::MalformedRow {
                line: 2,
                source: ParseRowError::InvalidFloat {
                    column: "prog_el",
                    value: "north".into()
                }
            })
        );

        let content = "fk5\n160925054614.6 35.2 -2.9 32.3 66.7 32.3 66.7 0.0 NaN\n";
        assert!(matches!(
            parse_str(content),
            Err(AsteError::MalformedRow {
                line: 2,
                source: ParseRowError::InvalidFloat {
                    column: "el_error",
                    ..
                }
            })
        ));
    }

    #[test]
    fn test_file_order_preserved() {
        let content = "RADEC _ 0 0\n160925055345.0 1 2 3 4\n160925054612.6 5 6 7 8\n";
        let log = parse_str(content).unwrap();
        assert_eq!(log.rows[0].achieved_azimuth, 3.0);
        assert_eq!(log.rows[1].achieved_azimuth, 7.0);
    }

    #[test]
    fn test_parse_missing_file() {
        let res = parse(Utf8Path::new("tests/data/does_not_exist"));
        assert!(matches!(res, Err(AsteError::IoError(_))));
    }
}
