//! Structural comparator template.
//!
//! One template exists per byte width. It lists the state-transition elements
//! of a single comparator, their activation edges and start/report flags, and
//! the `(position, branch) -> SlotId` table used to bind labeler output.
//! Instances share the template and only differ in the acceptance set held by
//! each slot.

use serde::{Deserialize, Serialize};
use stab_foundation::Domain;

use crate::labeling::Branch;

/// Index of a parameter slot within a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u16);

impl SlotId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// The `(position, branch)` address of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub position: usize,
    pub branch: Branch,
}

impl SlotKey {
    /// Name of the template element holding this slot, e.g. `lower_tie_2`.
    pub fn name(&self) -> String {
        format!("{}_{}", branch_name(self.branch), self.position)
    }
}

/// What an element matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbols {
    /// Acceptance set supplied per instance.
    Slot(SlotId),
    /// Fixed any-byte class.
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateElement {
    pub name: String,
    pub position: usize,
    pub symbols: Symbols,
    /// Armed at every width-aligned stream offset.
    pub start: bool,
    pub report: bool,
    /// Indices of the elements enabled for the next byte.
    pub activates: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparatorTemplate {
    width: usize,
    elements: Vec<TemplateElement>,
    keys: Vec<SlotKey>,
    table: Vec<[Option<SlotId>; Branch::COUNT]>,
}

impl ComparatorTemplate {
    pub fn for_domain(domain: &Domain) -> Self {
        Self::for_width(domain.width())
    }

    pub(crate) fn for_width(width: usize) -> Self {
        let mut builder = TemplateBuilder::new(width);
        if width <= 1 {
            builder.slot_element(0, Branch::Entry, true, true);
            return builder.finish();
        }

        let last = width - 1;
        let entry = builder.slot_element(0, Branch::Entry, true, false);
        let mut lower_tie = builder.slot_element(0, Branch::LowerTie, true, false);
        let mut upper_tie = builder.slot_element(0, Branch::UpperTie, true, false);
        let mut escapes = vec![entry];

        for position in 1..width {
            let report = position == last;
            let lower = builder.slot_element(position, Branch::Lower, false, report);
            let upper = builder.slot_element(position, Branch::Upper, false, report);
            let free = builder.free_element(position, report);

            for &escape in &escapes {
                builder.activate(escape, free);
            }
            builder.activate(lower_tie, lower);
            builder.activate(upper_tie, upper);

            if report {
                break;
            }
            let next_lower_tie = builder.slot_element(position, Branch::LowerTie, false, false);
            let next_upper_tie = builder.slot_element(position, Branch::UpperTie, false, false);
            builder.activate(lower_tie, next_lower_tie);
            builder.activate(upper_tie, next_upper_tie);
            lower_tie = next_lower_tie;
            upper_tie = next_upper_tie;
            escapes = vec![lower, upper, free];
        }
        builder.finish()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn elements(&self) -> &[TemplateElement] {
        &self.elements
    }

    pub fn slot_count(&self) -> usize {
        self.keys.len()
    }

    /// Slot bound to `branch` at byte `position`, if the template has one.
    pub fn slot(&self, position: usize, branch: Branch) -> Option<SlotId> {
        self.table
            .get(position)
            .and_then(|row| row[branch.index()])
    }

    pub fn slot_key(&self, slot: SlotId) -> Option<SlotKey> {
        self.keys.get(slot.index()).copied()
    }

    /// Slot addresses in [`SlotId`] order.
    pub fn slot_keys(&self) -> &[SlotKey] {
        &self.keys
    }
}

struct TemplateBuilder {
    width: usize,
    elements: Vec<TemplateElement>,
    keys: Vec<SlotKey>,
    table: Vec<[Option<SlotId>; Branch::COUNT]>,
}

impl TemplateBuilder {
    fn new(width: usize) -> Self {
        Self {
            width,
            elements: Vec::new(),
            keys: Vec::new(),
            table: vec![[None; Branch::COUNT]; width.max(1)],
        }
    }

    fn slot_element(&mut self, position: usize, branch: Branch, start: bool, report: bool) -> usize {
        // At most 4 slots per position and 8 positions per value.
        let slot = SlotId(self.keys.len() as u16);
        let key = SlotKey { position, branch };
        self.keys.push(key);
        self.table[position][branch.index()] = Some(slot);
        self.push(
            key.name(),
            position,
            Symbols::Slot(slot),
            start,
            report,
        )
    }

    fn free_element(&mut self, position: usize, report: bool) -> usize {
        self.push(format!("free_{position}"), position, Symbols::Any, false, report)
    }

    fn push(
        &mut self,
        name: String,
        position: usize,
        symbols: Symbols,
        start: bool,
        report: bool,
    ) -> usize {
        self.elements.push(TemplateElement {
            name,
            position,
            symbols,
            start,
            report,
            activates: Vec::new(),
        });
        self.elements.len() - 1
    }

    fn activate(&mut self, from: usize, to: usize) {
        self.elements[from].activates.push(to);
    }

    fn finish(self) -> ComparatorTemplate {
        ComparatorTemplate {
            width: self.width,
            elements: self.elements,
            keys: self.keys,
            table: self.table,
        }
    }
}

fn branch_name(branch: Branch) -> &'static str {
    match branch {
        Branch::Entry => "entry",
        Branch::Lower => "lower",
        Branch::Upper => "upper",
        Branch::LowerTie => "lower_tie",
        Branch::UpperTie => "upper_tie",
    }
}
