use thiserror::Error;

/// Line-level parsing errors for antenna log rows.
///
/// Variants
/// -----------------
/// * `ColumnCount` – The row does not have the number of columns the schema declares.
/// * `InvalidTime` – The time column is not a `yymmddHHMMSS.ffffff` timestamp.
/// * `InvalidFloat` – A numeric column could not be parsed; payload carries the column name
///   and the offending token.
/// * `MissingColumn` – A record lacks a column the reconciliation policy needs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseRowError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("invalid timestamp: {0}")]
    InvalidTime(String),
    #[error("invalid value for column {column}: {value}")]
    InvalidFloat { column: &'static str, value: String },
    #[error("missing column {0}")]
    MissingColumn(&'static str),
}

#[derive(Error, Debug)]
pub enum AsteError {
    #[error("Unsupported coordinate frame: {0}")]
    UnsupportedFrame(String),

    #[error("Malformed log header: {0}")]
    MalformedHeader(String),

    #[error("Malformed row at line {line}: {source}")]
    MalformedRow {
        line: usize,
        #[source]
        source: ParseRowError,
    },

    #[error("Shape mismatch: time axis has {expected} samples, series has {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Time axis is not strictly increasing at sample {index}")]
    UnorderedTime { index: usize },

    #[error("Malformed XFFTS record: {0}")]
    MalformedRecord(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for AsteError {
    fn eq(&self, other: &Self) -> bool {
        use AsteError::*;
        match (self, other) {
            (UnsupportedFrame(a), UnsupportedFrame(b)) => a == b,
            (MalformedHeader(a), MalformedHeader(b)) => a == b,
            (
                MalformedRow {
                    line: la,
                    source: sa,
                },
                MalformedRow {
                    line: lb,
                    source: sb,
                },
            ) => la == lb && sa == sb,
            (
                ShapeMismatch {
                    expected: ea,
                    found: fa,
                },
                ShapeMismatch {
                    expected: eb,
                    found: fb,
                },
            ) => ea == eb && fa == fb,
            (UnorderedTime { index: a }, UnorderedTime { index: b }) => a == b,
            (MalformedRecord(a), MalformedRecord(b)) => a == b,

            // io errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
