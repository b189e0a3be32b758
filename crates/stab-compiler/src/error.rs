//! Compilation errors
//!
//! Every failure that would make an interval silently disappear from the
//! program is an error here. Skipping an interval would shift the
//! element-to-interval index and corrupt every result after it.

use std::path::PathBuf;

use thiserror::Error;

use crate::labeling::Branch;
use crate::program::ElementId;

/// Compiler result type
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised while labeling, assembling or persisting a program.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Foundation(#[from] stab_foundation::Error),

    /// Assembly was asked to program zero intervals.
    #[error("interval set is empty; there is nothing to program")]
    EmptyIntervalSet,

    /// The labeling of an interval does not accept its own bounds.
    #[error("interval {index} {interval} is degenerate: its comparator would never match")]
    DegenerateInterval {
        /// Index of the interval in its set.
        index: usize,
        /// The interval as text.
        interval: String,
    },

    /// The two encoded bounds have different lengths, or are empty.
    #[error("bound widths differ or are zero: lower has {lower} bytes, upper has {upper}")]
    WidthMismatch { lower: usize, upper: usize },

    /// Signed bounds whose sign bits say `lower > upper`.
    #[error("signed bounds are inverted: lower is non-negative while upper is negative")]
    InvertedBounds,

    /// A label addressed a slot the template does not have.
    #[error("the {width}-byte template has no slot for position {position} ({branch:?})")]
    MissingSlot {
        width: usize,
        position: usize,
        branch: Branch,
    },

    /// An element was registered twice in the element index.
    #[error("element {0} is already mapped to an interval")]
    DuplicateElement(ElementId),

    /// More comparators than element identifiers.
    #[error("too many comparators: {0}")]
    TooManyElements(usize),

    #[error("failed to access artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode program artifact: {0}")]
    Artifact(#[from] bincode::Error),

    #[error("failed to export network description: {0}")]
    Export(#[from] serde_json::Error),

    #[error("unsupported artifact version {found} (expected {expected})")]
    ArtifactVersion { found: u32, expected: u32 },

    /// A decoded artifact is internally inconsistent.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),
}
