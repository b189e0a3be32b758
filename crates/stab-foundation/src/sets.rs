//! Interval and point containers.
//!
//! Both containers are append-only and validate every value against their
//! domain on insertion. The position of an entry is its identity: the compiled
//! program and the stab result refer to intervals and points by index.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Domain, Scalar};
use crate::error::{Error, Result};

/// A closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    lower: Scalar,
    upper: Scalar,
}

impl Interval {
    /// Creates an interval of `domain`, requiring `lower <= upper` in the
    /// domain's natural ordering.
    pub fn new(domain: &Domain, lower: Scalar, upper: Scalar) -> Result<Self> {
        let lower = domain.check(lower)?;
        let upper = domain.check(upper)?;
        if lower.total_cmp(&upper) == Ordering::Greater {
            return Err(Error::malformed(format!(
                "interval [{}, {}] has lower bound above upper bound",
                domain.format(&lower),
                domain.format(&upper)
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Scalar {
        self.lower
    }

    pub fn upper(&self) -> Scalar {
        self.upper
    }

    /// Whether `point` lies inside the interval (both ends inclusive).
    pub fn contains(&self, point: &Scalar) -> bool {
        self.lower.total_cmp(point) != Ordering::Greater
            && point.total_cmp(&self.upper) != Ordering::Greater
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.lower, self.upper)
    }
}

/// Ordered intervals of one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSet {
    domain: Domain,
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            intervals: Vec::new(),
        }
    }

    /// Builds a set from `(lower, upper)` pairs, failing on the first invalid pair.
    pub fn from_bounds<I>(domain: Domain, bounds: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Scalar, Scalar)>,
    {
        let mut set = Self::new(domain);
        for (lower, upper) in bounds {
            set.push(lower, upper)?;
        }
        Ok(set)
    }

    /// Appends an interval and returns its index.
    pub fn push(&mut self, lower: Scalar, upper: Scalar) -> Result<usize> {
        let interval = Interval::new(&self.domain, lower, upper)?;
        self.intervals.push(interval);
        Ok(self.intervals.len() - 1)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Formats interval `index` with the domain's number formatting.
    pub fn describe(&self, index: usize) -> Option<String> {
        self.get(index).map(|interval| {
            format!(
                "[{},{}]",
                self.domain.format(&interval.lower),
                self.domain.format(&interval.upper)
            )
        })
    }
}

/// Ordered query points of one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    domain: Domain,
    points: Vec<Scalar>,
}

impl PointSet {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            points: Vec::new(),
        }
    }

    /// Builds a set from values, failing on the first value outside the domain.
    pub fn from_values<I>(domain: Domain, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Scalar>,
    {
        let mut set = Self::new(domain);
        for value in values {
            set.push(value)?;
        }
        Ok(set)
    }

    /// Appends a point and returns its index.
    pub fn push(&mut self, point: Scalar) -> Result<usize> {
        self.points.push(self.domain.check(point)?);
        Ok(self.points.len() - 1)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn get(&self, index: usize) -> Option<&Scalar> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.points.iter()
    }
}
