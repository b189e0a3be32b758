//! Byte acceptance sets.
//!
//! An [`AcceptanceSet`] is the symbol set written into one parameter slot of a
//! comparator: at most two closed byte ranges. Two ranges are enough for every
//! set the labeler produces, including the wrap-around set of a signed
//! interval that straddles zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed byte range `[start, end]` with `start <= end`.
///
/// Deserialization goes through [`ByteRange::new`], so a stored range is never
/// inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct ByteRange {
    start: u8,
    end: u8,
}

impl ByteRange {
    /// Returns `None` when `start > end`.
    pub fn new(start: u8, end: u8) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(byte: u8) -> Self {
        Self {
            start: byte,
            end: byte,
        }
    }

    pub fn start(&self) -> u8 {
        self.start
    }

    pub fn end(&self) -> u8 {
        self.end
    }

    pub fn contains(&self, byte: u8) -> bool {
        (self.start..=self.end).contains(&byte)
    }

    /// Number of byte values in the range.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }
}

impl TryFrom<(u8, u8)> for ByteRange {
    type Error = String;

    fn try_from((start, end): (u8, u8)) -> Result<Self, Self::Error> {
        ByteRange::new(start, end)
            .ok_or_else(|| format!("inverted byte range \\x{start:02x}-\\x{end:02x}"))
    }
}

impl From<ByteRange> for (u8, u8) {
    fn from(range: ByteRange) -> Self {
        (range.start, range.end)
    }
}

/// One end of a byte interval and whether it is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    pub value: u8,
    pub inclusive: bool,
}

impl Bound {
    pub const fn inclusive(value: u8) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub const fn exclusive(value: u8) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    /// Lowest byte admitted when used as a lower bound; `None` past 0xFF.
    fn lowest(self) -> Option<u8> {
        if self.inclusive {
            Some(self.value)
        } else {
            self.value.checked_add(1)
        }
    }

    /// Highest byte admitted when used as an upper bound; `None` below 0x00.
    fn highest(self) -> Option<u8> {
        if self.inclusive {
            Some(self.value)
        } else {
            self.value.checked_sub(1)
        }
    }
}

/// Union of at most two closed byte ranges, kept sorted and disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AcceptanceSet {
    ranges: [Option<ByteRange>; 2],
}

impl AcceptanceSet {
    /// The set that accepts nothing.
    pub const fn empty() -> Self {
        Self {
            ranges: [None, None],
        }
    }

    /// The set that accepts every byte.
    pub const fn any() -> Self {
        Self {
            ranges: [Some(ByteRange { start: 0, end: 0xFF }), None],
        }
    }

    pub fn single(byte: u8) -> Self {
        Self::from_range(Some(ByteRange::single(byte)))
    }

    fn from_range(range: Option<ByteRange>) -> Self {
        Self {
            ranges: [range, None],
        }
    }

    /// Bytes between `lower` and `upper`.
    ///
    /// An exclusive lower bound at 0xFF or an exclusive upper bound at 0x00 is
    /// exhausted and yields the empty set, as does any crossed pair.
    pub fn between(lower: Bound, upper: Bound) -> Self {
        let range = match (lower.lowest(), upper.highest()) {
            (Some(start), Some(end)) => ByteRange::new(start, end),
            _ => None,
        };
        Self::from_range(range)
    }

    /// Bytes from `lower` up to 0xFF together with bytes from 0x00 up to `upper`.
    pub fn wrapping(lower: Bound, upper: Bound) -> Self {
        let high = Self::between(lower, Bound::inclusive(0xFF)).ranges[0];
        let low = Self::between(Bound::inclusive(0x00), upper).ranges[0];
        match (low, high) {
            (Some(low), Some(high)) if u16::from(low.end) + 1 >= u16::from(high.start) => {
                Self::from_range(ByteRange::new(low.start, low.end.max(high.end)))
            }
            (Some(low), Some(high)) => Self {
                ranges: [Some(low), Some(high)],
            },
            (low, high) => Self::from_range(low.or(high)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.iter().all(Option::is_none)
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.ranges().any(|range| range.contains(byte))
    }

    /// Ranges in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = ByteRange> + '_ {
        self.ranges.iter().flatten().copied()
    }

    /// Number of accepted byte values.
    pub fn len(&self) -> usize {
        self.ranges().map(|range| range.len()).sum()
    }
}

/// ANML symbol-class notation, e.g. `[\x0b-\x13]` or `[\x00-\x04\xfc-\xff]`.
impl fmt::Display for AcceptanceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for range in self.ranges() {
            if range.start == range.end {
                write!(f, "\\x{:02x}", range.start)?;
            } else {
                write!(f, "\\x{:02x}-\\x{:02x}", range.start, range.end)?;
            }
        }
        write!(f, "]")
    }
}
