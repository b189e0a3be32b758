//! Range labeling.
//!
//! Given the big-endian encodings `x <= y` of an interval's bounds, the
//! labeler derives the acceptance set of every `(position, branch)` slot of a
//! comparator so that the comparator accepts exactly the byte strings in
//! `[x, y]`.
//!
//! # Comparator semantics
//!
//! A comparator reads one value byte by byte and tracks three facts:
//!
//! - **lower tight**: the bytes so far equal the prefix of `x`
//! - **upper tight**: the bytes so far equal the prefix of `y`
//! - **free**: the value already lies strictly between `x` and `y`
//!
//! Position 0 has an [`Branch::Entry`] set that escapes straight to *free*,
//! plus the [`Branch::LowerTie`] / [`Branch::UpperTie`] bytes that keep a bound
//! tight. At each later position a tight branch may escape through its
//! [`Branch::Lower`] or [`Branch::Upper`] set, or stay tight through its tie
//! byte. On the final position the `Lower`/`Upper` sets are inclusive and
//! accept.
//!
//! While the prefixes of `x` and `y` are still equal both tight branches are
//! the same path, so both escape sets are bounded on both sides. Once the
//! prefixes diverge the lower branch only needs bytes above `x[i]` and the
//! upper branch only bytes below `y[i]`.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::symbols::{AcceptanceSet, Bound};

/// Role of a slot within one byte position of the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    /// Position 0 escape (or the whole comparator at width 1).
    Entry,
    /// Escape or final accept from the lower-tight path.
    Lower,
    /// Escape or final accept from the upper-tight path.
    Upper,
    /// Byte that keeps the lower-tight path alive.
    LowerTie,
    /// Byte that keeps the upper-tight path alive.
    UpperTie,
}

impl Branch {
    pub const COUNT: usize = 5;

    pub const ALL: [Branch; Self::COUNT] = [
        Branch::Entry,
        Branch::Lower,
        Branch::Upper,
        Branch::LowerTie,
        Branch::UpperTie,
    ];

    /// Dense index used by slot tables.
    pub fn index(self) -> usize {
        match self {
            Branch::Entry => 0,
            Branch::Lower => 1,
            Branch::Upper => 2,
            Branch::LowerTie => 3,
            Branch::UpperTie => 4,
        }
    }
}

/// One acceptance set bound to a `(position, branch)` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub position: usize,
    pub branch: Branch,
    pub set: AcceptanceSet,
}

/// All labels of one comparator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeling {
    width: usize,
    labels: Vec<Label>,
}

impl Labeling {
    fn with_width(width: usize) -> Self {
        Self {
            width,
            labels: Vec::with_capacity(4 * width),
        }
    }

    fn push(&mut self, position: usize, branch: Branch, set: AcceptanceSet) {
        self.labels.push(Label {
            position,
            branch,
            set,
        });
    }

    fn push_ties(&mut self, position: usize, x: u8, y: u8) {
        self.push(position, Branch::LowerTie, AcceptanceSet::single(x));
        self.push(position, Branch::UpperTie, AcceptanceSet::single(y));
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn get(&self, position: usize, branch: Branch) -> Option<&AcceptanceSet> {
        self.labels
            .iter()
            .find(|label| label.position == position && label.branch == branch)
            .map(|label| &label.set)
    }

    fn set(&self, position: usize, branch: Branch) -> AcceptanceSet {
        self.get(position, branch).copied().unwrap_or_default()
    }

    /// Runs the comparator over one encoded value.
    pub fn accepts(&self, value: &[u8]) -> bool {
        if value.len() != self.width {
            return false;
        }
        if self.width == 1 {
            return self.set(0, Branch::Entry).contains(value[0]);
        }

        let last = self.width - 1;
        let first = value[0];
        let mut free = self.set(0, Branch::Entry).contains(first);
        let mut lower_tight = self.set(0, Branch::LowerTie).contains(first);
        let mut upper_tight = self.set(0, Branch::UpperTie).contains(first);

        for (position, &byte) in value.iter().enumerate().take(last).skip(1) {
            free = free
                || (lower_tight && self.set(position, Branch::Lower).contains(byte))
                || (upper_tight && self.set(position, Branch::Upper).contains(byte));
            lower_tight = lower_tight && self.set(position, Branch::LowerTie).contains(byte);
            upper_tight = upper_tight && self.set(position, Branch::UpperTie).contains(byte);
        }

        let byte = value[last];
        free || (lower_tight && self.set(last, Branch::Lower).contains(byte))
            || (upper_tight && self.set(last, Branch::Upper).contains(byte))
    }
}

fn check_widths(x: &[u8], y: &[u8]) -> Result<usize> {
    if x.len() != y.len() || x.is_empty() {
        return Err(CompileError::WidthMismatch {
            lower: x.len(),
            upper: y.len(),
        });
    }
    Ok(x.len())
}

/// Labels `[x, y]` under plain byte-wise lexicographic order.
pub fn label_unsigned(x: &[u8], y: &[u8]) -> Result<Labeling> {
    let width = check_widths(x, y)?;
    if width == 1 {
        let mut labeling = Labeling::with_width(1);
        labeling.push(
            0,
            Branch::Entry,
            AcceptanceSet::between(Bound::inclusive(x[0]), Bound::inclusive(y[0])),
        );
        return Ok(labeling);
    }
    let entry = AcceptanceSet::between(Bound::exclusive(x[0]), Bound::exclusive(y[0]));
    Ok(label_positions(x, y, entry, x[0] == y[0]))
}

/// Labels `[x, y]` under two's complement order.
///
/// Same-sign bounds are monotonic in their raw bytes and go straight to
/// [`label_unsigned`]. A negative `x` with a non-negative `y` is the union of
/// `[x, all-ones]` and `[all-zeros, y]`: the first byte accepts the wrapped
/// range and every deeper byte is already diverged.
pub fn label_signed(x: &[u8], y: &[u8]) -> Result<Labeling> {
    let width = check_widths(x, y)?;
    let x_negative = x[0] & 0x80 != 0;
    let y_negative = y[0] & 0x80 != 0;
    if x_negative == y_negative {
        return label_unsigned(x, y);
    }
    if !x_negative {
        return Err(CompileError::InvertedBounds);
    }

    if width == 1 {
        let mut labeling = Labeling::with_width(1);
        labeling.push(
            0,
            Branch::Entry,
            AcceptanceSet::wrapping(Bound::inclusive(x[0]), Bound::inclusive(y[0])),
        );
        return Ok(labeling);
    }
    let entry = AcceptanceSet::wrapping(Bound::exclusive(x[0]), Bound::exclusive(y[0]));
    Ok(label_positions(x, y, entry, false))
}

/// Shared body for widths of two bytes and more.
fn label_positions(x: &[u8], y: &[u8], entry: AcceptanceSet, mut equal_prefix: bool) -> Labeling {
    let width = x.len();
    let last = width - 1;
    let mut labeling = Labeling::with_width(width);

    labeling.push(0, Branch::Entry, entry);
    labeling.push_ties(0, x[0], y[0]);

    for position in 1..last {
        let (lower, upper) = if equal_prefix {
            let between = AcceptanceSet::between(
                Bound::exclusive(x[position]),
                Bound::exclusive(y[position]),
            );
            (between, between)
        } else {
            (
                AcceptanceSet::between(Bound::exclusive(x[position]), Bound::inclusive(0xFF)),
                AcceptanceSet::between(Bound::inclusive(0x00), Bound::exclusive(y[position])),
            )
        };
        labeling.push(position, Branch::Lower, lower);
        labeling.push(position, Branch::Upper, upper);
        labeling.push_ties(position, x[position], y[position]);
        equal_prefix = equal_prefix && x[position] == y[position];
    }

    let (lower, upper) = if equal_prefix {
        let between = AcceptanceSet::between(Bound::inclusive(x[last]), Bound::inclusive(y[last]));
        (between, between)
    } else {
        (
            AcceptanceSet::between(Bound::inclusive(x[last]), Bound::inclusive(0xFF)),
            AcceptanceSet::between(Bound::inclusive(0x00), Bound::inclusive(y[last])),
        )
    };
    labeling.push(last, Branch::Lower, lower);
    labeling.push(last, Branch::Upper, upper);
    labeling
}
