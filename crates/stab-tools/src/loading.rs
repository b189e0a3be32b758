//! Interval and point list files.
//!
//! One record per line, whitespace separated: `lower upper` for intervals and
//! a single value for points. Blank lines are skipped.

use std::path::{Path, PathBuf};

use stab_foundation::{Domain, IntervalSet, PointSet};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Line {
        /// 1-based line number.
        line: usize,
        #[source]
        source: stab_foundation::Error,
    },
}

impl LoadError {
    fn at(line: usize) -> impl FnOnce(stab_foundation::Error) -> Self {
        move |source| LoadError::Line { line, source }
    }
}

/// Non-blank lines with their 1-based numbers, split into fields.
fn records(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.split_whitespace().collect::<Vec<_>>()))
        .filter(|(_, fields)| !fields.is_empty())
}

fn expect_fields(line: usize, fields: &[&str], expected: usize) -> Result<(), LoadError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(LoadError::Line {
            line,
            source: stab_foundation::Error::malformed(format!(
                "expected {expected} field(s), found {}",
                fields.len()
            )),
        })
    }
}

pub fn parse_intervals(domain: Domain, text: &str) -> Result<IntervalSet, LoadError> {
    let mut set = IntervalSet::new(domain);
    for (line, fields) in records(text) {
        expect_fields(line, &fields, 2)?;
        let lower = domain.parse(fields[0]).map_err(LoadError::at(line))?;
        let upper = domain.parse(fields[1]).map_err(LoadError::at(line))?;
        set.push(lower, upper).map_err(LoadError::at(line))?;
    }
    Ok(set)
}

pub fn parse_points(domain: Domain, text: &str) -> Result<PointSet, LoadError> {
    let mut set = PointSet::new(domain);
    for (line, fields) in records(text) {
        expect_fields(line, &fields, 1)?;
        let point = domain.parse(fields[0]).map_err(LoadError::at(line))?;
        set.push(point).map_err(LoadError::at(line))?;
    }
    Ok(set)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_intervals(domain: Domain, path: &Path) -> Result<IntervalSet, LoadError> {
    let set = parse_intervals(domain, &read(path)?)?;
    info!(path = %path.display(), count = set.len(), "Loaded intervals");
    Ok(set)
}

pub fn load_points(domain: Domain, path: &Path) -> Result<PointSet, LoadError> {
    let set = parse_points(domain, &read(path)?)?;
    info!(path = %path.display(), count = set.len(), "Loaded points");
    Ok(set)
}
