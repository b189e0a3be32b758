//! Pipeline tests driven through `RunConfig`, with list files on disk.

use std::fs;
use std::path::Path;

use stab_compiler::CompiledProgram;
use stab_foundation::Domain;
use stab_tools::report::NO_STABS;
use stab_tools::{RunConfig, Source, ToolError, run};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, text: &str) -> Source {
    let path = dir.join(name);
    fs::write(&path, text).expect("write list file");
    Source::File(path)
}

fn config(domain: Domain, intervals: Source, points: Source) -> RunConfig {
    RunConfig {
        domain,
        intervals,
        points,
        seed: 0,
        device: Some("software".to_string()),
        fsm: None,
        max_chunk_bytes: usize::MAX,
    }
}

#[test]
fn test_signed_files_end_to_end() {
    let dir = tempdir().unwrap();
    let cfg = config(
        Domain::signed(4).unwrap(),
        write(dir.path(), "intervals.txt", "-5 5\n100 200\n"),
        write(dir.path(), "points.txt", "-6\n-5\n0\n5\n6\n150\n"),
    );

    let report = run(&cfg).unwrap();
    assert_eq!(
        report.to_string(),
        "Point\tStabbed Intervals\n-6\n-5\t[-5,5]\n0\t[-5,5]\n5\t[-5,5]\n6\n150\t[100,200]\n"
    );
}

#[test]
fn test_float_files_with_small_chunks() {
    let dir = tempdir().unwrap();
    let mut cfg = config(
        Domain::float(4).unwrap(),
        write(dir.path(), "intervals.txt", "-2.5 1.0\n"),
        write(dir.path(), "points.txt", "-3.0\n-2.5\n-0.0\n0.0\n1.0\n1.5\n"),
    );
    cfg.max_chunk_bytes = 5;

    let report = run(&cfg).unwrap();
    let stabbing: Vec<usize> = report.result.iter().map(|(point, _)| point).collect();
    assert_eq!(stabbing, vec![1, 2, 3, 4]);
}

#[test]
fn test_artifacts_are_written() {
    let dir = tempdir().unwrap();
    let name = dir.path().join("net").to_string_lossy().into_owned();
    let mut cfg = config(
        Domain::unsigned(2).unwrap(),
        write(dir.path(), "intervals.txt", "10 20\n"),
        Source::Random(4),
    );
    cfg.fsm = Some(name.clone());

    run(&cfg).unwrap();
    let program = CompiledProgram::load(&dir.path().join("net.fsm")).unwrap();
    assert_eq!(program.name(), name);
    assert_eq!(program.instances().len(), 1);
    assert!(dir.path().join("net.json").exists());
}

#[test]
fn test_random_runs_are_reproducible() {
    let mut cfg = config(
        Domain::unsigned(1).unwrap(),
        Source::Random(10),
        Source::Random(50),
    );
    cfg.seed = 42;

    let first = run(&cfg).unwrap();
    let second = run(&cfg).unwrap();
    assert_eq!(first.intervals, second.intervals);
    assert_eq!(first.points, second.points);
    assert_eq!(first.result, second.result);
}

#[test]
fn test_without_device_reports_nothing() {
    let dir = tempdir().unwrap();
    let mut cfg = config(
        Domain::unsigned(4).unwrap(),
        write(dir.path(), "intervals.txt", "10 20\n"),
        write(dir.path(), "points.txt", "15\n"),
    );
    cfg.device = None;

    let report = run(&cfg).unwrap();
    assert_eq!(report.to_string(), format!("{NO_STABS}\n"));
}

#[test]
fn test_errors_propagate() {
    let dir = tempdir().unwrap();
    let domain = Domain::unsigned(4).unwrap();

    let malformed = config(
        domain,
        write(dir.path(), "bad.txt", "1 2\n3\n"),
        Source::Random(1),
    );
    assert!(matches!(run(&malformed), Err(ToolError::Load(_))));

    let empty = config(domain, write(dir.path(), "empty.txt", "\n"), Source::Random(1));
    assert!(matches!(run(&empty), Err(ToolError::Compile(_))));

    let mut unknown = config(domain, Source::Random(1), Source::Random(1));
    unknown.device = Some("ap0".to_string());
    assert!(matches!(run(&unknown), Err(ToolError::Runtime(_))));

    let missing = config(domain, Source::File(dir.path().join("absent.txt")), Source::Random(1));
    assert!(matches!(run(&missing), Err(ToolError::Load(_))));
}
