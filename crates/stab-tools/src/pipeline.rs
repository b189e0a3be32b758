//! End-to-end run: sources, compilation, artifacts, query.

use std::path::PathBuf;

use stab_compiler::ProgramAssembler;
use stab_foundation::{IntervalSet, PointSet};
use stab_runtime::{StabQuery, StabResult};
use tracing::{debug, info, instrument};

use crate::config::{RunConfig, Source};
use crate::error::Result;
use crate::loading::{load_intervals, load_points};
use crate::random::{random_intervals, random_points, seeded};

/// Everything needed to print the outcome of a run.
#[derive(Debug, Clone)]
pub struct StabReport {
    pub intervals: IntervalSet,
    pub points: PointSet,
    pub result: StabResult,
}

#[instrument(skip_all, fields(domain = %config.domain))]
pub fn run(config: &RunConfig) -> Result<StabReport> {
    // Intervals draw from the generator first so points depend on the same seed.
    let mut rng = seeded(config.seed);
    let intervals = match &config.intervals {
        Source::File(path) => load_intervals(config.domain, path)?,
        Source::Random(count) => random_intervals(config.domain, *count, &mut rng)?,
    };
    let points = match &config.points {
        Source::File(path) => load_points(config.domain, path)?,
        Source::Random(count) => random_points(config.domain, *count, &mut rng)?,
    };
    info!(intervals = intervals.len(), points = points.len(), "Inputs ready");

    let mut assembler = ProgramAssembler::new();
    if let Some(name) = &config.fsm {
        assembler = assembler.with_name(name.as_str());
    }
    let program = assembler.assemble(&intervals)?;

    if let Some(name) = &config.fsm {
        program.save(&PathBuf::from(format!("{name}.fsm")))?;
        program.export_network(&PathBuf::from(format!("{name}.json")))?;
    }

    let query = StabQuery::new().with_max_chunk_bytes(config.max_chunk_bytes);
    debug!(max_chunk_bytes = query.max_chunk_bytes(), device = ?config.device, "Query configured");
    let result = query.run_on_device(&program, &points, config.device.as_deref())?;

    Ok(StabReport {
        intervals,
        points,
        result,
    })
}
