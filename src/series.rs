//! # Data series with static metadata
//!
//! Every variable of a dataset is a plain value struct holding its samples, with the
//! naming contract consumed downstream attached as associated constants. The
//! [`data_series!`] macro generates those structs.

/// A one-dimensional variable indexed by a dataset axis.
pub trait DataSeries {
    type Item;

    /// Variable name in the dataset.
    const NAME: &'static str;
    const LONG_NAME: &'static str;
    const SHORT_NAME: &'static str;
    /// `None` for dimensionless or textual variables.
    const UNITS: Option<&'static str>;

    fn data(&self) -> &[Self::Item];

    fn len(&self) -> usize {
        self.data().len()
    }

    fn is_empty(&self) -> bool {
        self.data().is_empty()
    }
}

/// Declare a [`DataSeries`] struct.
///
/// ```ignore
/// data_series!(
///     /// Antenna azimuth.
///     Azimuth, f64, "azimuth", "Antenna azimuth", "Azimuth", Some("degree")
/// );
/// ```
macro_rules! data_series {
    (
        $(#[$meta:meta])*
        $series:ident, $item:ty, $name:literal, $long_name:literal, $short_name:literal, $units:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $series {
            data: Vec<$item>,
        }

        impl $series {
            pub fn new(data: Vec<$item>) -> Self {
                $series { data }
            }

            pub fn into_inner(self) -> Vec<$item> {
                self.data
            }
        }

        impl $crate::series::DataSeries for $series {
            type Item = $item;

            const NAME: &'static str = $name;
            const LONG_NAME: &'static str = $long_name;
            const SHORT_NAME: &'static str = $short_name;
            const UNITS: Option<&'static str> = $units;

            fn data(&self) -> &[$item] {
                &self.data
            }
        }
    };
}

pub(crate) use data_series;
