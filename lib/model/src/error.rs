use std::fmt::{Display, Formatter};
use std::panic::Location;
use thiserror::Error;

/// Indicates that an index was larger than [MAX_INDEX](crate::ValueId::MAX_INDEX) and can
/// therefore not be stored in a [ValueId](crate::ValueId).
///
/// The error remembers the location of the call that tried to create the index. This makes it
/// possible to track down the component that produced the index.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub struct IndexTooLargeError {
    /// The index that was too large.
    pub value: u64,
    /// The location of the call that tried to create the [ValueId](crate::ValueId).
    pub location: &'static Location<'static>,
}

impl IndexTooLargeError {
    /// Creates a new [IndexTooLargeError] for `value` that points to the caller.
    #[track_caller]
    pub fn new(value: u64) -> Self {
        Self {
            value,
            location: Location::caller(),
        }
    }
}

impl Display for IndexTooLargeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The given index {} is larger than the maximum supported index. It was created in {}:{}",
            self.value,
            self.location.file(),
            self.location.line()
        )
    }
}

/// An error that can occur when creating a [DateYearOrDuration](crate::DateYearOrDuration).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("The year {0} is outside of the supported range [-9999, 9999].")]
    YearOutOfRange(i64),
    #[error("The {field} {value} is outside of the supported range.")]
    FieldOutOfRange { field: &'static str, value: i64 },
    #[error("The duration {0}ms is outside of the supported range.")]
    DurationOutOfRange(i64),
    #[error("Could not parse the lexical form '{0}'.")]
    Parse(String),
}

/// An error that can occur when creating a [GeoPoint](crate::GeoPoint).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeoPointError {
    #[error("The latitude {0} is outside of the range [-90, 90].")]
    LatitudeOutOfRange(f64),
    #[error("The longitude {0} is outside of the range [-180, 180].")]
    LongitudeOutOfRange(f64),
    #[error("Could not parse the WKT literal '{0}'. Only POINT(lng lat) is supported.")]
    InvalidWkt(String),
}
