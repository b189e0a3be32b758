//! Stab Compiler
//!
//! Compiles an [`IntervalSet`](stab_foundation::IntervalSet) into a
//! [`CompiledProgram`]: one byte-level comparator automaton per interval span
//! plus the reverse index from match element to interval.
//!
//! Pipeline: intervals -> lowering -> byte codec -> range labeler -> assembler

pub mod artifact;
pub mod assembler;
pub mod error;
pub mod labeling;
pub mod lowering;
pub mod program;
pub mod symbols;
pub mod template;

pub use artifact::ARTIFACT_VERSION;
pub use assembler::ProgramAssembler;
pub use error::{CompileError, Result};
pub use labeling::{Branch, Label, Labeling, label_signed, label_unsigned};
pub use lowering::{EncodedSpan, SpanEncoding, lower_interval};
pub use program::{ComparatorInstance, CompiledProgram, ElementId, ElementIndexMap};
pub use symbols::{AcceptanceSet, Bound, ByteRange};
pub use template::{ComparatorTemplate, SlotId, SlotKey, Symbols, TemplateElement};
