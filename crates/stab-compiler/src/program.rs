//! Compiled programs and the element index.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stab_foundation::{Domain, IntervalSet};

use crate::error::{CompileError, Result};
use crate::symbols::AcceptanceSet;
use crate::template::{ComparatorTemplate, SlotId};

/// Identifier of one comparator instance; this is what the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u32);

impl ElementId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "comparator_{}", self.0)
    }
}

/// Reverse map from match element to interval index.
///
/// Injective on elements. An interval split into two spans owns two elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementIndexMap {
    map: IndexMap<ElementId, usize>,
}

impl ElementIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: ElementId, interval: usize) -> Result<()> {
        if self.map.contains_key(&element) {
            return Err(CompileError::DuplicateElement(element));
        }
        self.map.insert(element, interval);
        Ok(())
    }

    pub fn get(&self, element: ElementId) -> Option<usize> {
        self.map.get(&element).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries in element creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, usize)> + '_ {
        self.map.iter().map(|(&element, &interval)| (element, interval))
    }

    pub fn elements_for(&self, interval: usize) -> Vec<ElementId> {
        self.iter()
            .filter(|&(_, owner)| owner == interval)
            .map(|(element, _)| element)
            .collect()
    }
}

/// One comparator: the template with every slot filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparatorInstance {
    pub element: ElementId,
    pub interval: usize,
    /// Acceptance set per slot, indexed by [`SlotId::index`].
    pub symbols: Vec<AcceptanceSet>,
}

impl ComparatorInstance {
    pub fn symbols(&self, slot: SlotId) -> AcceptanceSet {
        self.symbols.get(slot.index()).copied().unwrap_or_default()
    }
}

/// The aggregate automaton for one interval set.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProgram {
    pub(crate) name: String,
    pub(crate) domain: Domain,
    pub(crate) intervals: IntervalSet,
    pub(crate) template: ComparatorTemplate,
    pub(crate) instances: Vec<ComparatorInstance>,
    pub(crate) element_index: ElementIndexMap,
}

impl CompiledProgram {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The intervals the program was compiled from, in index order.
    pub fn intervals(&self) -> &IntervalSet {
        &self.intervals
    }

    pub fn template(&self) -> &ComparatorTemplate {
        &self.template
    }

    pub fn instances(&self) -> &[ComparatorInstance] {
        &self.instances
    }

    pub fn element_index(&self) -> &ElementIndexMap {
        &self.element_index
    }

    pub fn width(&self) -> usize {
        self.domain.width()
    }
}
