//! Stab queries.
//!
//! Points are encoded into one contiguous buffer, streamed through the engine
//! in width-aligned chunks, and the resulting match events are decoded into a
//! [`StabResult`]. A report at absolute offset `o` belongs to point `o / B`,
//! since comparators report on the final byte of the value.

use stab_compiler::CompiledProgram;
use stab_foundation::PointSet;
use tracing::{debug, info, instrument, warn};

use crate::engine::{EngineSession, MatchEvent, MatchingEngine, open_device};
use crate::error::{Error, Result};
use crate::result::StabResult;

/// Query options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabQuery {
    max_chunk_bytes: usize,
}

impl Default for StabQuery {
    fn default() -> Self {
        Self {
            max_chunk_bytes: usize::MAX,
        }
    }
}

impl StabQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how many bytes are passed to a single `search` call.
    pub fn with_max_chunk_bytes(mut self, max_chunk_bytes: usize) -> Self {
        self.max_chunk_bytes = max_chunk_bytes;
        self
    }

    pub fn max_chunk_bytes(&self) -> usize {
        self.max_chunk_bytes
    }

    /// Largest multiple of `width` not above the configured maximum.
    pub fn chunk_size(&self, width: usize) -> Result<usize> {
        let chunk = (self.max_chunk_bytes / width) * width;
        if chunk == 0 {
            return Err(Error::InvalidChunkSize {
                chunk: self.max_chunk_bytes,
                width,
            });
        }
        Ok(chunk)
    }

    /// Streams `points` through `engine` and decodes every report.
    #[instrument(skip_all, fields(engine = engine.name(), points = points.len()))]
    pub fn run(
        &self,
        program: &CompiledProgram,
        points: &PointSet,
        engine: &mut dyn MatchingEngine,
    ) -> Result<StabResult> {
        if points.domain() != program.domain() {
            return Err(Error::DomainMismatch {
                points: points.domain().to_string(),
                program: program.domain().to_string(),
            });
        }
        let width = program.width();
        let chunk = self.chunk_size(width)?;
        let buffer = encode_points(points);

        let mut events = Vec::new();
        let mut session = EngineSession::open(engine, program)?;
        for (index, bytes) in buffer.chunks(chunk).enumerate() {
            let base = index * chunk;
            let found = session.search(bytes)?;
            debug!(chunk = index, bytes = bytes.len(), events = found.len(), "Chunk searched");
            events.extend(found.into_iter().map(|event| MatchEvent {
                offset: event.offset + base,
                ..event
            }));
        }
        session.close()?;

        let result = decode_events(program, &events)?;
        info!(
            events = events.len(),
            stabbing_points = result.len(),
            "Stab query complete"
        );
        Ok(result)
    }

    /// Runs on the named device.
    ///
    /// Without a device the engine is unavailable: a warning is logged and the
    /// result is empty.
    pub fn run_on_device(
        &self,
        program: &CompiledProgram,
        points: &PointSet,
        device: Option<&str>,
    ) -> Result<StabResult> {
        let name = match device {
            Some(name) if !name.is_empty() => name,
            _ => {
                warn!("{}; returning an empty result", Error::EngineUnavailable);
                return Ok(StabResult::new());
            }
        };
        let mut engine = open_device(name)?;
        self.run(program, points, engine.as_mut())
    }
}

/// Concatenates the big-endian encodings of every point.
pub fn encode_points(points: &PointSet) -> Vec<u8> {
    let domain = points.domain();
    let mut buffer = Vec::with_capacity(points.len() * domain.width());
    for point in points.iter() {
        domain.encode_into(point, &mut buffer);
    }
    buffer
}

/// Maps absolute-offset events to point and interval indices.
pub fn decode_events(program: &CompiledProgram, events: &[MatchEvent]) -> Result<StabResult> {
    let width = program.width();
    let index = program.element_index();
    let mut result = StabResult::new();
    for event in events {
        let interval = index
            .get(event.element)
            .ok_or(Error::UnknownElement(event.element))?;
        result.record(event.offset / width, interval);
    }
    Ok(result)
}
