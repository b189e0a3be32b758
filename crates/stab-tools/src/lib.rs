//! Stab Tools
//!
//! Command-line driver for interval stabbing: option handling, list loading,
//! random generation, the end-to-end pipeline and result printing.

pub mod config;
pub mod error;
pub mod loading;
pub mod pipeline;
pub mod random;
pub mod report;

pub use config::{Args, RunConfig, Source};
pub use error::{Result, ToolError};
pub use pipeline::{StabReport, run};

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Default is `info`, with `debug` for the stab crates.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,stab_tools=debug,stab_runtime=debug,stab_compiler=debug")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
