//! Matching engine seam.
//!
//! A [`MatchingEngine`] executes a loaded [`CompiledProgram`] over a byte
//! buffer and reports which comparator elements matched at which offsets.
//! Engines are borrowed exclusively through an [`EngineSession`], which
//! guarantees the program is unloaded on every exit path.

use stab_compiler::{CompiledProgram, ElementId};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::software::SoftwareEngine;

/// Device name that selects the in-process [`SoftwareEngine`].
pub const SOFTWARE_DEVICE: &str = "software";

/// One report: `element` matched with its final byte at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchEvent {
    pub element: ElementId,
    /// Byte offset relative to the start of the searched buffer.
    pub offset: usize,
}

/// An executor of compiled comparator programs.
pub trait MatchingEngine {
    fn name(&self) -> &str;

    /// Loads `program`. Only one program may be loaded at a time.
    fn load(&mut self, program: &CompiledProgram) -> Result<()>;

    /// Searches one buffer from a clean state.
    ///
    /// Start elements are armed at every offset that is a multiple of the
    /// program's width, counted from the start of `buffer`.
    fn search(&mut self, buffer: &[u8]) -> Result<Vec<MatchEvent>>;

    fn unload(&mut self) -> Result<()>;
}

/// Resolves a device name to an engine.
pub fn open_device(name: &str) -> Result<Box<dyn MatchingEngine>> {
    match name {
        SOFTWARE_DEVICE => Ok(Box::new(SoftwareEngine::new())),
        other => Err(Error::UnknownDevice(other.to_string())),
    }
}

/// A loaded program on an exclusively borrowed engine.
///
/// Dropping a session that was not [closed](EngineSession::close) unloads the
/// engine and logs any unload failure.
pub struct EngineSession<'e> {
    engine: &'e mut dyn MatchingEngine,
    loaded: bool,
}

impl<'e> EngineSession<'e> {
    pub fn open(engine: &'e mut dyn MatchingEngine, program: &CompiledProgram) -> Result<Self> {
        engine.load(program)?;
        debug!(engine = engine.name(), program = program.name(), "Program loaded");
        Ok(Self {
            engine,
            loaded: true,
        })
    }

    pub fn search(&mut self, buffer: &[u8]) -> Result<Vec<MatchEvent>> {
        self.engine.search(buffer)
    }

    /// Unloads the program and reports unload errors.
    pub fn close(mut self) -> Result<()> {
        self.loaded = false;
        self.engine.unload()?;
        debug!(engine = self.engine.name(), "Program unloaded");
        Ok(())
    }
}

impl Drop for EngineSession<'_> {
    fn drop(&mut self) {
        if self.loaded {
            if let Err(e) = self.engine.unload() {
                warn!(engine = self.engine.name(), error = %e, "Failed to unload engine");
            }
        }
    }
}
