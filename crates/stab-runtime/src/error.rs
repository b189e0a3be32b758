//! Runtime errors

use thiserror::Error;

use stab_compiler::{CompileError, ElementId};

/// Runtime result type
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime errors
#[derive(Debug, Error)]
pub enum Error {
    /// No matching engine was selected or found.
    #[error("no matching engine is available")]
    EngineUnavailable,

    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("engine failed during {operation}: {message}")]
    EngineFailure {
        operation: &'static str,
        message: String,
    },

    #[error("chunk size of {chunk} bytes cannot hold one {width}-byte point")]
    InvalidChunkSize { chunk: usize, width: usize },

    #[error("engine reported {0}, which is not in the element index")]
    UnknownElement(ElementId),

    #[error("points are {points} values but the program was compiled for {program} values")]
    DomainMismatch { points: String, program: String },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl Error {
    pub(crate) fn engine(operation: &'static str, message: impl Into<String>) -> Self {
        Error::EngineFailure {
            operation,
            message: message.into(),
        }
    }
}
