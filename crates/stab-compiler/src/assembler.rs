//! Program assembly.
//!
//! Every interval is lowered into spans, every span is labeled, and each
//! labeling fills the slots of a fresh comparator instance. Instance element
//! ids are allocated sequentially and recorded in the element index so match
//! events can be traced back to interval indices.

use stab_foundation::IntervalSet;
use tracing::{debug, info, instrument};

use crate::error::{CompileError, Result};
use crate::labeling::Labeling;
use crate::lowering::{EncodedSpan, lower_interval};
use crate::program::{ComparatorInstance, CompiledProgram, ElementId, ElementIndexMap};
use crate::symbols::AcceptanceSet;
use crate::template::ComparatorTemplate;

/// Builds a [`CompiledProgram`] from an [`IntervalSet`].
#[derive(Debug, Clone, Default)]
pub struct ProgramAssembler {
    name: Option<String>,
}

impl ProgramAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default `{B}bytes_network` program name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[instrument(skip_all, fields(intervals = intervals.len(), width = intervals.domain().width()))]
    pub fn assemble(&self, intervals: &IntervalSet) -> Result<CompiledProgram> {
        if intervals.is_empty() {
            return Err(CompileError::EmptyIntervalSet);
        }

        let domain = *intervals.domain();
        let template = ComparatorTemplate::for_domain(&domain);
        let mut instances = Vec::with_capacity(intervals.len());
        let mut element_index = ElementIndexMap::new();

        for (index, interval) in intervals.iter().enumerate() {
            let spans = lower_interval(&domain, interval)?;
            for span in &spans {
                let labeling = span.label()?;
                if !accepts_own_bounds(&labeling, span) {
                    return Err(CompileError::DegenerateInterval {
                        index,
                        interval: intervals.describe(index).unwrap_or_default(),
                    });
                }

                let element = next_element(instances.len())?;
                element_index.insert(element, index)?;
                instances.push(ComparatorInstance {
                    element,
                    interval: index,
                    symbols: bind_slots(&template, &labeling)?,
                });
            }
            if spans.len() > 1 {
                debug!(interval = index, spans = spans.len(), "Interval split at zero");
            }
        }

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("{}bytes_network", domain.width()));
        info!(
            name = %name,
            instances = instances.len(),
            slots = template.slot_count(),
            "Program assembled"
        );

        Ok(CompiledProgram {
            name,
            domain,
            intervals: intervals.clone(),
            template,
            instances,
            element_index,
        })
    }
}

fn accepts_own_bounds(labeling: &Labeling, span: &EncodedSpan) -> bool {
    labeling.accepts(&span.lower) && labeling.accepts(&span.upper)
}

fn next_element(count: usize) -> Result<ElementId> {
    u32::try_from(count)
        .map(ElementId::new)
        .map_err(|_| CompileError::TooManyElements(count))
}

/// Writes each label into the slot the template assigns to it.
fn bind_slots(template: &ComparatorTemplate, labeling: &Labeling) -> Result<Vec<AcceptanceSet>> {
    let mut symbols = vec![AcceptanceSet::empty(); template.slot_count()];
    for label in labeling.labels() {
        let slot = template
            .slot(label.position, label.branch)
            .ok_or(CompileError::MissingSlot {
                width: template.width(),
                position: label.position,
                branch: label.branch,
            })?;
        symbols[slot.index()] = label.set;
    }
    Ok(symbols)
}
