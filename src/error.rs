//! Error types and error reporting macros.

use crate::geometry::Dim2;
use std::{error, fmt, io};

/// Errors that can occur when setting up or running an interpolation.
#[derive(Clone, Debug, PartialEq)]
pub enum InterpError {
    /// Dimensions, table lengths or array lengths are inconsistent.
    InvalidArgument(String),
    /// A sample coordinate maps outside the tabulated kernel or is not finite.
    CoordinateOutOfRange {
        sample: usize,
        axis: Dim2,
        coord: f64,
    },
    /// Memory for private accumulators or worker threads could not be obtained.
    ResourceExhausted(String),
}

/// Result type for interpolation operations.
pub type InterpResult<T> = Result<T, InterpError>;

impl InterpError {
    pub(crate) fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn resource_exhausted<S: Into<String>>(message: S) -> Self {
        Self::ResourceExhausted(message.into())
    }
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "Invalid argument: {}", message),
            Self::CoordinateOutOfRange {
                sample,
                axis,
                coord,
            } => write!(
                f,
                "Coordinate {} of sample {} along {} is outside the tabulated kernel range",
                coord, sample, axis
            ),
            Self::ResourceExhausted(message) => write!(f, "Resources exhausted: {}", message),
        }
    }
}

impl error::Error for InterpError {}

impl From<InterpError> for io::Error {
    fn from(err: InterpError) -> Self {
        let kind = match err {
            InterpError::InvalidArgument(_) | InterpError::CoordinateOutOfRange { .. } => {
                io::ErrorKind::InvalidInput
            }
            InterpError::ResourceExhausted(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn errors_convert_to_io_errors_with_matching_kind() {
        let err: io::Error = InterpError::CoordinateOutOfRange {
            sample: 3,
            axis: Dim2::Y,
            coord: f64::NAN,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err: io::Error = InterpError::resource_exhausted("no memory").into();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), "Resources exhausted: no memory");
    }
}
