//! Program persistence.
//!
//! A compiled program is saved as a versioned bincode artifact (`{name}.fsm`)
//! and can be exported as a JSON network description (`{name}.json`) listing
//! the template and the symbol class of every slot of every instance.
//!
//! The template is structural and is rebuilt from the domain on load rather
//! than stored.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stab_foundation::{Domain, Interval, IntervalSet};
use tracing::{debug, info};

use crate::error::{CompileError, Result};
use crate::program::{ComparatorInstance, CompiledProgram, ElementIndexMap};
use crate::template::{ComparatorTemplate, Symbols};

/// Current binary artifact format version.
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ArtifactHeader {
    version: u32,
    name: String,
    domain: Domain,
}

/// Serialized form of a [`CompiledProgram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProgramArtifact {
    header: ArtifactHeader,
    intervals: Vec<Interval>,
    instances: Vec<ComparatorInstance>,
    element_index: ElementIndexMap,
}

impl CompiledProgram {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let artifact = ProgramArtifact {
            header: ArtifactHeader {
                version: ARTIFACT_VERSION,
                name: self.name.clone(),
                domain: self.domain,
            },
            intervals: self.intervals.iter().copied().collect(),
            instances: self.instances.clone(),
            element_index: self.element_index.clone(),
        };
        Ok(bincode::serialize(&artifact)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: ProgramArtifact = bincode::deserialize(bytes)?;
        let header = artifact.header;
        if header.version != ARTIFACT_VERSION {
            return Err(CompileError::ArtifactVersion {
                found: header.version,
                expected: ARTIFACT_VERSION,
            });
        }

        let intervals = IntervalSet::from_bounds(
            header.domain,
            artifact
                .intervals
                .iter()
                .map(|interval| (interval.lower(), interval.upper())),
        )?;
        let template = ComparatorTemplate::for_domain(&header.domain);

        for instance in &artifact.instances {
            if instance.symbols.len() != template.slot_count() {
                return Err(CompileError::CorruptArtifact(format!(
                    "{} has {} slots, template has {}",
                    instance.element,
                    instance.symbols.len(),
                    template.slot_count()
                )));
            }
            if artifact.element_index.get(instance.element) != Some(instance.interval)
                || instance.interval >= intervals.len()
            {
                return Err(CompileError::CorruptArtifact(format!(
                    "{} is not indexed to interval {}",
                    instance.element, instance.interval
                )));
            }
        }
        if artifact.element_index.len() != artifact.instances.len() {
            return Err(CompileError::CorruptArtifact(format!(
                "element index has {} entries for {} instances",
                artifact.element_index.len(),
                artifact.instances.len()
            )));
        }

        Ok(CompiledProgram {
            name: header.name,
            domain: header.domain,
            intervals,
            template,
            instances: artifact.instances,
            element_index: artifact.element_index,
        })
    }

    /// Writes the binary artifact to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            bytes = bytes.len(),
            instances = self.instances.len(),
            "Program artifact saved"
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Program artifact read");
        let program = Self::from_bytes(&bytes)?;
        info!(
            path = %path.display(),
            name = %program.name,
            instances = program.instances.len(),
            "Program artifact loaded"
        );
        Ok(program)
    }

    /// Pretty-printed JSON network description.
    pub fn network_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&NetworkExport::from_program(self))?)
    }

    pub fn export_network(&self, path: &Path) -> Result<()> {
        let json = self.network_json()?;
        std::fs::write(path, json).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Network description exported");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct NetworkExport {
    name: String,
    domain: String,
    width: usize,
    template: Vec<ElementExport>,
    instances: Vec<InstanceExport>,
}

#[derive(Debug, Serialize)]
struct ElementExport {
    name: String,
    symbols: String,
    start: bool,
    report: bool,
    activates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct InstanceExport {
    id: String,
    interval: usize,
    bounds: String,
    /// Element name to ANML symbol class, in slot order.
    symbols: IndexMap<String, String>,
}

impl NetworkExport {
    fn from_program(program: &CompiledProgram) -> Self {
        let template = &program.template;
        let elements = template.elements();
        let slot_name = |index: usize| {
            template
                .slot_keys()
                .get(index)
                .map(|key| key.name())
                .unwrap_or_else(|| format!("slot_{index}"))
        };

        let template_export = elements
            .iter()
            .map(|element| ElementExport {
                name: element.name.clone(),
                symbols: match element.symbols {
                    Symbols::Slot(_) => "$slot".to_string(),
                    Symbols::Any => "*".to_string(),
                },
                start: element.start,
                report: element.report,
                activates: element
                    .activates
                    .iter()
                    .map(|&target| elements[target].name.clone())
                    .collect(),
            })
            .collect();

        let instances = program
            .instances
            .iter()
            .map(|instance| InstanceExport {
                id: instance.element.to_string(),
                interval: instance.interval,
                bounds: program
                    .intervals
                    .describe(instance.interval)
                    .unwrap_or_default(),
                symbols: instance
                    .symbols
                    .iter()
                    .enumerate()
                    .map(|(index, set)| (slot_name(index), set.to_string()))
                    .collect(),
            })
            .collect();

        Self {
            name: program.name.clone(),
            domain: program.domain.to_string(),
            width: program.domain.width(),
            template: template_export,
            instances,
        }
    }
}
