//! Tool errors

use thiserror::Error;

use crate::loading::LoadError;

/// Tool result type
pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Input(#[from] stab_foundation::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Compile(#[from] stab_compiler::CompileError),

    #[error(transparent)]
    Runtime(#[from] stab_runtime::Error),

    #[error("no intervals provided: pass --intervals or --random-intervals")]
    NoIntervals,

    #[error("no points provided: pass --points or --random-points")]
    NoPoints,
}
