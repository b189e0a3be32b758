//! In-process reference engine.
//!
//! Flattens every comparator instance of a program into one table of
//! state-transition elements and simulates the resulting NFA over the buffer,
//! one byte per step.

use stab_compiler::{AcceptanceSet, CompiledProgram, ElementId, Symbols};
use tracing::{debug, trace};

use crate::engine::{MatchEvent, MatchingEngine, SOFTWARE_DEVICE};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Ste {
    symbols: AcceptanceSet,
    activates: Vec<usize>,
    /// Index of the owning instance if this element reports.
    report: Option<usize>,
}

#[derive(Debug, Clone)]
struct LoadedNetwork {
    width: usize,
    stes: Vec<Ste>,
    starts: Vec<usize>,
    elements: Vec<ElementId>,
}

impl LoadedNetwork {
    fn flatten(program: &CompiledProgram) -> Self {
        let template = program.template();
        let per_instance = template.elements().len();
        let mut stes = Vec::with_capacity(per_instance * program.instances().len());
        let mut starts = Vec::new();
        let mut elements = Vec::with_capacity(program.instances().len());

        for (instance_index, instance) in program.instances().iter().enumerate() {
            let base = instance_index * per_instance;
            for (offset, element) in template.elements().iter().enumerate() {
                if element.start {
                    starts.push(base + offset);
                }
                stes.push(Ste {
                    symbols: match element.symbols {
                        Symbols::Slot(slot) => instance.symbols(slot),
                        Symbols::Any => AcceptanceSet::any(),
                    },
                    activates: element.activates.iter().map(|&t| base + t).collect(),
                    report: element.report.then_some(instance_index),
                });
            }
            elements.push(instance.element);
        }

        Self {
            width: template.width(),
            stes,
            starts,
            elements,
        }
    }
}

/// NFA simulator implementing [`MatchingEngine`].
#[derive(Debug, Default)]
pub struct SoftwareEngine {
    network: Option<LoadedNetwork>,
}

impl SoftwareEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.network.is_some()
    }
}

impl MatchingEngine for SoftwareEngine {
    fn name(&self) -> &str {
        SOFTWARE_DEVICE
    }

    fn load(&mut self, program: &CompiledProgram) -> Result<()> {
        if self.network.is_some() {
            return Err(Error::engine("load", "a program is already loaded"));
        }
        let network = LoadedNetwork::flatten(program);
        debug!(
            stes = network.stes.len(),
            starts = network.starts.len(),
            "Software network loaded"
        );
        self.network = Some(network);
        Ok(())
    }

    fn search(&mut self, buffer: &[u8]) -> Result<Vec<MatchEvent>> {
        let network = self
            .network
            .as_ref()
            .ok_or_else(|| Error::engine("search", "no program is loaded"))?;

        let mut events = Vec::new();
        let mut enabled: Vec<usize> = Vec::new();
        let mut next: Vec<usize> = Vec::new();
        // Generation stamps: offset + 1 of the last step an index was touched.
        let mut seen = vec![0usize; network.stes.len()];
        let mut queued = vec![0usize; network.stes.len()];
        let mut reported = vec![0usize; network.elements.len()];

        for (offset, &byte) in buffer.iter().enumerate() {
            let stamp = offset + 1;
            if offset % network.width == 0 {
                enabled.extend_from_slice(&network.starts);
            }

            for &index in &enabled {
                if seen[index] == stamp {
                    continue;
                }
                seen[index] = stamp;
                let ste = &network.stes[index];
                if !ste.symbols.contains(byte) {
                    continue;
                }
                if let Some(instance) = ste.report {
                    if reported[instance] != stamp {
                        reported[instance] = stamp;
                        events.push(MatchEvent {
                            element: network.elements[instance],
                            offset,
                        });
                    }
                }
                for &target in &ste.activates {
                    if queued[target] != stamp {
                        queued[target] = stamp;
                        next.push(target);
                    }
                }
            }

            std::mem::swap(&mut enabled, &mut next);
            next.clear();
        }

        trace!(bytes = buffer.len(), events = events.len(), "Buffer searched");
        Ok(events)
    }

    fn unload(&mut self) -> Result<()> {
        match self.network.take() {
            Some(_) => Ok(()),
            None => Err(Error::engine("unload", "no program is loaded")),
        }
    }
}
