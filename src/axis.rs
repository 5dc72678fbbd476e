//! # Dataset axes
//!
//! The dimensions every dataset series is indexed by:
//!
//! - [`TimeAxis`]: one UTC instant per record, strictly increasing.
//! - [`ChannelAxis`]: spectrometer channel IDs `0..n`.
//!
//! Both carry the static naming contract consumed downstream (`DIM`, `LONG_NAME`,
//! `SHORT_NAME`).
use hifitime::Epoch;
use itertools::Itertools;

use crate::aste_errors::AsteError;
use crate::time::unix_nanoseconds;

/// Ordered UTC instants, one per record.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    epochs: Vec<Epoch>,
}

impl TimeAxis {
    pub const DIM: &'static str = "time";
    pub const LONG_NAME: &'static str = "Time in UTC";
    pub const SHORT_NAME: &'static str = "Time";

    /// Build a time axis, checking that instants are strictly increasing.
    ///
    /// Return
    /// ----------
    /// * [`AsteError::UnorderedTime`] with the index of the first instant that is not
    ///   later than its predecessor.
    pub fn new(epochs: Vec<Epoch>) -> Result<Self, AsteError> {
        if let Some(pos) = epochs
            .iter()
            .tuple_windows()
            .position(|(prev, next)| next <= prev)
        {
            return Err(AsteError::UnorderedTime { index: pos + 1 });
        }
        Ok(TimeAxis { epochs })
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Epoch> {
        self.epochs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Epoch> {
        self.epochs.iter()
    }

    pub fn as_slice(&self) -> &[Epoch] {
        &self.epochs
    }

    /// Nanoseconds since the Unix epoch of every instant.
    pub fn unix_nanoseconds(&self) -> Vec<i128> {
        self.epochs.iter().map(unix_nanoseconds).collect()
    }
}

impl<'a> IntoIterator for &'a TimeAxis {
    type Item = &'a Epoch;
    type IntoIter = std::slice::Iter<'a, Epoch>;

    fn into_iter(self) -> Self::IntoIter {
        self.epochs.iter()
    }
}

/// Spectrometer channel IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelAxis {
    nchan: usize,
}

impl ChannelAxis {
    pub const DIM: &'static str = "chan";
    pub const LONG_NAME: &'static str = "Channel ID";
    pub const SHORT_NAME: &'static str = "Channel";

    pub fn new(nchan: usize) -> Self {
        ChannelAxis { nchan }
    }

    pub fn len(&self) -> usize {
        self.nchan
    }

    pub fn is_empty(&self) -> bool {
        self.nchan == 0
    }

    pub fn ids(&self) -> std::ops::Range<usize> {
        0..self.nchan
    }
}
