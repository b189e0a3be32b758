//! Result table.

use std::fmt;

use crate::pipeline::StabReport;

/// Printed when no point stabs any interval.
pub const NO_STABS: &str = "None of the points were found to be stabbing any intervals.";

/// One row per point: the point, then `[lo,hi]` of every interval it stabs.
impl fmt::Display for StabReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result.is_empty() {
            return writeln!(f, "{NO_STABS}");
        }
        let domain = self.points.domain();
        writeln!(f, "Point\tStabbed Intervals")?;
        for (index, point) in self.points.iter().enumerate() {
            write!(f, "{}", domain.format(point))?;
            for &interval in self.result.intervals_for(index) {
                if let Some(bounds) = self.intervals.describe(interval) {
                    write!(f, "\t{bounds}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
