//! Input validation errors.
//!
//! Both variants are fatal to a run: a malformed record or an unsupported
//! width means no partial result can be trusted.

use thiserror::Error;

use crate::domain::ScalarKind;

/// Foundation result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building domains, parsing values or validating sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A token could not be parsed, a value lies outside its domain, or an
    /// interval has `lower > upper`.
    #[error("malformed input: {message}")]
    MalformedInput {
        /// Description of the offending value.
        message: String,
    },

    /// The byte width is not one of the widths supported for the scalar kind.
    #[error("unsupported width: {width} bytes for {kind} scalars")]
    UnsupportedWidth {
        /// Kind of scalar requested.
        kind: ScalarKind,
        /// Requested byte width.
        width: usize,
    },
}

impl Error {
    /// Builds a [`Error::MalformedInput`] from any message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
        }
    }
}
