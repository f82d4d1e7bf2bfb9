//! Outcome codes carried by a [`Status`](crate::Status).
//!
//! The numbering is the canonical RPC status table, so a code survives a hop
//! through any service that speaks it. Each code also has an HTTP status,
//! used when a failure is written as a problem body.
//!
//! ```rust
//! use logroute::Code;
//!
//! assert_eq!(i32::from(Code::InvalidArgument), 3);
//! assert_eq!(Code::from(5), Code::NotFound);
//! assert_eq!(Code::NotFound.http_status(), http::StatusCode::NOT_FOUND);
//! ```

use std::fmt;

use http::StatusCode;
use serde::{Serialize, Serializer};

/// A canonical outcome code. [`Code::Ok`] is the success sentinel.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Code {
    #[default]
    Ok,                 // 0
    Cancelled,          // 1
    Unknown,            // 2
    InvalidArgument,    // 3
    DeadlineExceeded,   // 4
    NotFound,           // 5
    AlreadyExists,      // 6
    PermissionDenied,   // 7
    ResourceExhausted,  // 8
    FailedPrecondition, // 9
    Aborted,            // 10
    OutOfRange,         // 11
    Unimplemented,      // 12
    Internal,           // 13
    Unavailable,        // 14
    DataLoss,           // 15
    Unauthenticated,    // 16
}

impl Code {
    /// Returns the code's name as it appears in error messages (e.g. `"NotFound"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok                 => "OK",
            Self::Cancelled          => "Canceled",
            Self::Unknown            => "Unknown",
            Self::InvalidArgument    => "InvalidArgument",
            Self::DeadlineExceeded   => "DeadlineExceeded",
            Self::NotFound           => "NotFound",
            Self::AlreadyExists      => "AlreadyExists",
            Self::PermissionDenied   => "PermissionDenied",
            Self::ResourceExhausted  => "ResourceExhausted",
            Self::FailedPrecondition => "FailedPrecondition",
            Self::Aborted            => "Aborted",
            Self::OutOfRange         => "OutOfRange",
            Self::Unimplemented      => "Unimplemented",
            Self::Internal           => "Internal",
            Self::Unavailable        => "Unavailable",
            Self::DataLoss           => "DataLoss",
            Self::Unauthenticated    => "Unauthenticated",
        }
    }

    /// The HTTP status a problem body for this code is sent with.
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::Ok                 => StatusCode::OK,
            Self::Cancelled          => StatusCode::REQUEST_TIMEOUT,
            Self::Unknown            => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidArgument    => StatusCode::BAD_REQUEST,
            Self::DeadlineExceeded   => StatusCode::GATEWAY_TIMEOUT,
            Self::NotFound           => StatusCode::NOT_FOUND,
            Self::AlreadyExists      => StatusCode::CONFLICT,
            Self::PermissionDenied   => StatusCode::FORBIDDEN,
            Self::ResourceExhausted  => StatusCode::TOO_MANY_REQUESTS,
            Self::FailedPrecondition => StatusCode::BAD_REQUEST,
            Self::Aborted            => StatusCode::CONFLICT,
            Self::OutOfRange         => StatusCode::BAD_REQUEST,
            Self::Unimplemented      => StatusCode::NOT_IMPLEMENTED,
            Self::Internal           => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable        => StatusCode::SERVICE_UNAVAILABLE,
            Self::DataLoss           => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthenticated    => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<Code> for i32 {
    fn from(c: Code) -> i32 {
        match c {
            Code::Ok                 => 0,
            Code::Cancelled          => 1,
            Code::Unknown            => 2,
            Code::InvalidArgument    => 3,
            Code::DeadlineExceeded   => 4,
            Code::NotFound           => 5,
            Code::AlreadyExists      => 6,
            Code::PermissionDenied   => 7,
            Code::ResourceExhausted  => 8,
            Code::FailedPrecondition => 9,
            Code::Aborted            => 10,
            Code::OutOfRange         => 11,
            Code::Unimplemented      => 12,
            Code::Internal           => 13,
            Code::Unavailable        => 14,
            Code::DataLoss           => 15,
            Code::Unauthenticated    => 16,
        }
    }
}

/// Numbers outside the table become [`Code::Unknown`].
impl From<i32> for Code {
    fn from(n: i32) -> Code {
        match n {
            0  => Code::Ok,
            1  => Code::Cancelled,
            3  => Code::InvalidArgument,
            4  => Code::DeadlineExceeded,
            5  => Code::NotFound,
            6  => Code::AlreadyExists,
            7  => Code::PermissionDenied,
            8  => Code::ResourceExhausted,
            9  => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _  => Code::Unknown,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codes go over the wire as their number.
impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(i32::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_round_trip_through_the_table() {
        for n in 0..=16 {
            assert_eq!(i32::from(Code::from(n)), n);
        }
    }

    #[test]
    fn out_of_range_numbers_are_unknown() {
        assert_eq!(Code::from(17), Code::Unknown);
        assert_eq!(Code::from(-1), Code::Unknown);
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Code::InvalidArgument).unwrap(), "3");
    }

    #[test]
    fn failures_never_map_to_success() {
        for n in 1..=16 {
            assert!(!Code::from(n).http_status().is_success(), "code {n}");
        }
    }
}
