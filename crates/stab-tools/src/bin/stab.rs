//! Interval stabbing driver
//!
//! Compiles intervals into comparator automata and reports which intervals
//! each query point stabs.
//!
//! Usage: `stab --device software -i intervals.txt -p points.txt [--signed | --real] [-b BYTES]`

use std::process;

use clap::Parser;
use tracing::{error, info};

use stab_tools::{Args, run};

fn main() {
    stab_tools::init_logging();

    let args = Args::parse();
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid options: {}", e);
            process::exit(1);
        }
    };
    info!(domain = %config.domain, device = ?config.device, "Starting stab run");

    match run(&config) {
        Ok(report) => print!("{report}"),
        Err(e) => {
            error!("Stab run failed: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            process::exit(1);
        }
    }
}
