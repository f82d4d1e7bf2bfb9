//! Typed outcomes: a [`Code`], a human message and optional details.
//!
//! Handlers signal failure by returning a [`StatusError`]:
//!
//! ```rust
//! use logroute::{Code, Status, StatusError};
//!
//! fn check(name: &str, stock: u32) -> Result<(), StatusError> {
//!     if name.is_empty() {
//!         return Err(Status::error(Code::InvalidArgument, "name required"));
//!     }
//!     if stock == 0 {
//!         return Err(Status::errorf(Code::FailedPrecondition, format_args!("{name} is out of stock")));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("x", 1).is_ok());
//! assert_eq!(check("", 1).unwrap_err().status().code(), Code::InvalidArgument);
//! assert_eq!(check("lamp", 0).unwrap_err().status().message(), "lamp is out of stock");
//! ```

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::code::Code;
use crate::error::Error;

/// An outcome code, message and structured details.
///
/// Immutable once built. The default value is a success with an empty
/// message, which is also how an absent status is treated.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Status {
    code: Code,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<Value>,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: Vec::new() }
    }

    /// Like [`Status::new`] with a formatted message.
    pub fn newf(code: Code, args: fmt::Arguments<'_>) -> Self {
        Self::new(code, args.to_string())
    }

    /// The error for `code` and `message`.
    ///
    /// [`Code::Ok`] has no error form and is reported as [`Code::Unknown`].
    pub fn error(code: Code, message: impl Into<String>) -> StatusError {
        let code = if code == Code::Ok { Code::Unknown } else { code };
        StatusError(Self::new(code, message))
    }

    /// Like [`Status::error`] with a formatted message.
    pub fn errorf(code: Code, args: fmt::Arguments<'_>) -> StatusError {
        Self::error(code, args.to_string())
    }

    pub fn code(&self) -> Code { self.code }
    pub fn message(&self) -> &str { &self.message }
    pub fn details(&self) -> &[Value] { &self.details }

    /// Code of an optional status; `None` counts as [`Code::Ok`].
    pub fn code_of(status: Option<&Status>) -> Code {
        status.map_or(Code::Ok, Status::code)
    }

    /// The error form of this status, or `Ok(())` when the code is OK.
    pub fn err(&self) -> Result<(), StatusError> {
        if self.code == Code::Ok {
            return Ok(());
        }
        Err(StatusError(self.clone()))
    }

    /// Returns a copy of this status with `details` appended.
    ///
    /// Each detail is serialized into a JSON attachment. Fails on an OK
    /// status, or on the first detail that cannot be serialized.
    pub fn with_details<I, D>(&self, details: I) -> Result<Status, Error>
    where
        I: IntoIterator<Item = D>,
        D: Serialize,
    {
        if self.code == Code::Ok {
            return Err(Error::DetailsOnOk);
        }
        let mut status = self.clone();
        for detail in details {
            status.details.push(serde_json::to_value(detail).map_err(Error::Detail)?);
        }
        Ok(status)
    }

    /// Recovers the status carried by `err` or anything in its source chain.
    ///
    /// The flag is `false` when no status was found; the returned status is
    /// then [`Code::Unknown`] with the error's message.
    pub fn from_error(err: &(dyn StdError + 'static)) -> (Status, bool) {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(found) = e.downcast_ref::<StatusError>() {
                return (found.0.clone(), true);
            }
            current = e.source();
        }
        (Status::new(Code::Unknown, err.to_string()), false)
    }
}

/// The error form of a non-OK [`Status`], built by [`Status::err`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("rpc error: code = {} desc = {}", .0.code, .0.message)]
pub struct StatusError(Status);

impl StatusError {
    pub fn status(&self) -> &Status { &self.0 }
    pub fn into_status(self) -> Status { self.0 }
}
