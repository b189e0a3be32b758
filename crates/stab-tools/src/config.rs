//! Command-line options.

use std::path::PathBuf;

use clap::Parser;
use stab_foundation::{Domain, ScalarKind};
use tracing::warn;

use crate::error::{Result, ToolError};

#[derive(Parser, Debug, Clone)]
#[command(name = "stab")]
#[command(about = "Find the intervals stabbed by each query point using comparator automata")]
pub struct Args {
    /// Matching engine device ("software" for the in-process engine)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Write the compiled program to `{NAME}.fsm` and `{NAME}.json`
    #[arg(short, long, value_name = "NAME")]
    pub fsm: Option<String>,

    /// File with one `lower upper` pair per line
    #[arg(short, long)]
    pub intervals: Option<PathBuf>,

    /// File with one point per line
    #[arg(short, long)]
    pub points: Option<PathBuf>,

    /// Byte width of every value
    #[arg(short, long, default_value_t = 4)]
    pub bytes: usize,

    /// Seed for random generation
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Number of random intervals to program
    #[arg(short = 'I', long, default_value_t = 0)]
    pub random_intervals: usize,

    /// Number of random points to stab with
    #[arg(short = 'P', long, default_value_t = 0)]
    pub random_points: usize,

    /// Maximum bytes streamed per engine search
    #[arg(short, long, default_value_t = usize::MAX)]
    pub chunks: usize,

    /// Use floating point values
    #[arg(long, conflicts_with = "signed")]
    pub real: bool,

    /// Use signed integer values
    #[arg(long)]
    pub signed: bool,
}

/// Where a list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Random(usize),
}

/// Validated options for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub domain: Domain,
    pub intervals: Source,
    pub points: Source,
    pub seed: u64,
    pub device: Option<String>,
    pub fsm: Option<String>,
    pub max_chunk_bytes: usize,
}

impl Args {
    pub fn into_config(self) -> Result<RunConfig> {
        let kind = if self.real {
            ScalarKind::Float
        } else if self.signed {
            ScalarKind::Signed
        } else {
            ScalarKind::Unsigned
        };
        let domain = Domain::new(kind, self.bytes)?;

        let intervals = source("intervals", self.intervals, self.random_intervals)
            .ok_or(ToolError::NoIntervals)?;
        let points =
            source("points", self.points, self.random_points).ok_or(ToolError::NoPoints)?;

        Ok(RunConfig {
            domain,
            intervals,
            points,
            seed: self.seed,
            device: self.device,
            fsm: self.fsm,
            max_chunk_bytes: self.chunks,
        })
    }
}

fn source(what: &str, file: Option<PathBuf>, random: usize) -> Option<Source> {
    match file {
        Some(path) => {
            if random > 0 {
                warn!("--{what} and --random-{what} provided together; --random-{what} will be ignored");
            }
            Some(Source::File(path))
        }
        None if random > 0 => Some(Source::Random(random)),
        None => None,
    }
}
