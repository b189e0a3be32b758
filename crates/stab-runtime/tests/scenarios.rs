//! End-to-end stab queries against the software engine.
//!
//! Covers:
//! - unsigned, signed and float scenarios at several widths
//! - chunk-size invariance
//! - unloading on mid-stream engine failure
//! - agreement with a brute-force containment check

use std::collections::BTreeMap;

use proptest::prelude::*;
use stab_compiler::{CompiledProgram, ElementId, ProgramAssembler};
use stab_foundation::{Domain, IntervalSet, PointSet, Scalar};
use stab_runtime::{
    Error, MatchEvent, MatchingEngine, SoftwareEngine, StabQuery, StabResult,
};

fn compile(domain: Domain, bounds: Vec<(Scalar, Scalar)>) -> CompiledProgram {
    let set = IntervalSet::from_bounds(domain, bounds).expect("valid intervals");
    ProgramAssembler::new().assemble(&set).expect("assembly succeeds")
}

fn points(domain: Domain, values: Vec<Scalar>) -> PointSet {
    PointSet::from_values(domain, values).expect("valid points")
}

fn run(program: &CompiledProgram, points: &PointSet, max_chunk: usize) -> StabResult {
    let mut engine = SoftwareEngine::new();
    StabQuery::new()
        .with_max_chunk_bytes(max_chunk)
        .run(program, points, &mut engine)
        .expect("query succeeds")
}

fn map(entries: &[(usize, &[usize])]) -> BTreeMap<usize, Vec<usize>> {
    entries.iter().map(|&(p, i)| (p, i.to_vec())).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_unsigned_ten_to_twenty() {
    let d = Domain::unsigned(4).unwrap();
    let program = compile(d, vec![(Scalar::Unsigned(10), Scalar::Unsigned(20))]);
    let pts = points(d, [5, 10, 15, 20, 21].map(Scalar::Unsigned).to_vec());

    let result = run(&program, &pts, usize::MAX);
    assert_eq!(result.into_map(), map(&[(1, &[0]), (2, &[0]), (3, &[0])]));
}

#[test]
fn test_signed_across_zero() {
    let d = Domain::signed(4).unwrap();
    let program = compile(d, vec![(Scalar::Signed(-5), Scalar::Signed(5))]);
    let pts = points(d, [-6, -5, 0, 5, 6].map(Scalar::Signed).to_vec());

    let result = run(&program, &pts, usize::MAX);
    assert_eq!(result.into_map(), map(&[(1, &[0]), (2, &[0]), (3, &[0])]));
}

#[test]
fn test_overlapping_intervals() {
    let d = Domain::unsigned(4).unwrap();
    let program = compile(
        d,
        vec![
            (Scalar::Unsigned(0), Scalar::Unsigned(100)),
            (Scalar::Unsigned(50), Scalar::Unsigned(150)),
        ],
    );
    let pts = points(d, vec![Scalar::Unsigned(75)]);

    let result = run(&program, &pts, usize::MAX);
    assert_eq!(result.into_map(), map(&[(0, &[0, 1])]));
}

#[test]
fn test_float_split_interval() {
    let d = Domain::float(4).unwrap();
    let program = compile(d, vec![(Scalar::Float(-2.5), Scalar::Float(1.0))]);
    assert_eq!(program.instances().len(), 2);
    assert_eq!(
        program.element_index().elements_for(0),
        vec![ElementId::new(0), ElementId::new(1)]
    );

    let pts = points(
        d,
        [-3.0, -2.5, -0.0, 0.0, 1.0, 1.5].map(Scalar::Float).to_vec(),
    );
    let result = run(&program, &pts, usize::MAX);
    assert_eq!(
        result.into_map(),
        map(&[(1, &[0]), (2, &[0]), (3, &[0]), (4, &[0])])
    );
}

#[test]
fn test_double_intervals() {
    let d = Domain::float(8).unwrap();
    let program = compile(
        d,
        vec![
            (Scalar::Float(-1e300), Scalar::Float(-1e-300)),
            (Scalar::Float(0.5), Scalar::Float(f64::INFINITY)),
        ],
    );
    let pts = points(
        d,
        [-1e301, -2.0, -0.0, 0.25, 0.5, 1e308].map(Scalar::Float).to_vec(),
    );
    let result = run(&program, &pts, 16);
    assert_eq!(
        result.into_map(),
        map(&[(1, &[0]), (4, &[1]), (5, &[1])])
    );
}

#[test]
fn test_single_byte_domain() {
    let d = Domain::signed(1).unwrap();
    let program = compile(
        d,
        vec![
            (Scalar::Signed(-128), Scalar::Signed(-100)),
            (Scalar::Signed(-1), Scalar::Signed(1)),
        ],
    );
    let pts = points(d, [-128, -100, -99, -1, 0, 2, 127].map(Scalar::Signed).to_vec());
    let result = run(&program, &pts, 1);
    assert_eq!(
        result.into_map(),
        map(&[(0, &[0]), (1, &[0]), (3, &[1]), (4, &[1])])
    );
}

#[test]
fn test_no_matches_is_empty() {
    let d = Domain::unsigned(2).unwrap();
    let program = compile(d, vec![(Scalar::Unsigned(100), Scalar::Unsigned(200))]);
    let pts = points(d, vec![Scalar::Unsigned(1), Scalar::Unsigned(65535)]);
    assert!(run(&program, &pts, usize::MAX).is_empty());

    let empty = PointSet::new(d);
    assert!(run(&program, &empty, usize::MAX).is_empty());
}

#[test]
fn test_domain_mismatch() {
    let program = compile(
        Domain::unsigned(4).unwrap(),
        vec![(Scalar::Unsigned(0), Scalar::Unsigned(1))],
    );
    let pts = points(Domain::signed(4).unwrap(), vec![Scalar::Signed(0)]);
    let mut engine = SoftwareEngine::new();
    let err = StabQuery::new().run(&program, &pts, &mut engine).unwrap_err();
    assert!(matches!(err, Error::DomainMismatch { .. }));
}

// =============================================================================
// Chunking
// =============================================================================

#[test]
fn test_chunk_size_invariance() {
    let d = Domain::unsigned(4).unwrap();
    let program = compile(
        d,
        vec![
            (Scalar::Unsigned(10), Scalar::Unsigned(20)),
            (Scalar::Unsigned(15), Scalar::Unsigned(1 << 20)),
            (Scalar::Unsigned(0), Scalar::Unsigned(0)),
        ],
    );
    let pts = points(
        d,
        [0, 9, 10, 15, 16, 20, 21, 1 << 20, (1 << 20) + 1]
            .map(Scalar::Unsigned)
            .to_vec(),
    );

    let unbounded = run(&program, &pts, usize::MAX);
    for max_chunk in [4, 7, 8, 12, 36, 1000] {
        assert_eq!(run(&program, &pts, max_chunk), unbounded, "chunk {max_chunk}");
    }
    assert_eq!(unbounded.intervals_for(3), &[0, 1]);
}

#[test]
fn test_chunk_smaller_than_width() {
    let d = Domain::unsigned(8).unwrap();
    let program = compile(d, vec![(Scalar::Unsigned(0), Scalar::Unsigned(1))]);
    let pts = points(d, vec![Scalar::Unsigned(1)]);
    let mut engine = SoftwareEngine::new();
    let err = StabQuery::new()
        .with_max_chunk_bytes(7)
        .run(&program, &pts, &mut engine)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidChunkSize { chunk: 7, width: 8 }));
    assert!(!engine.is_loaded());
}

// =============================================================================
// Engine sessions
// =============================================================================

/// Wraps the software engine and fails the n-th search.
struct FlakyEngine {
    inner: SoftwareEngine,
    fail_on: usize,
    searches: usize,
    unloads: usize,
}

impl MatchingEngine for FlakyEngine {
    fn name(&self) -> &str {
        "flaky"
    }

    fn load(&mut self, program: &CompiledProgram) -> stab_runtime::Result<()> {
        self.inner.load(program)
    }

    fn search(&mut self, buffer: &[u8]) -> stab_runtime::Result<Vec<MatchEvent>> {
        self.searches += 1;
        if self.searches == self.fail_on {
            return Err(Error::EngineFailure {
                operation: "search",
                message: "device reset".to_string(),
            });
        }
        self.inner.search(buffer)
    }

    fn unload(&mut self) -> stab_runtime::Result<()> {
        self.unloads += 1;
        self.inner.unload()
    }
}

#[test]
fn test_failing_search_still_unloads() {
    let d = Domain::unsigned(4).unwrap();
    let program = compile(d, vec![(Scalar::Unsigned(0), Scalar::Unsigned(9))]);
    let pts = points(d, (0..10).map(Scalar::Unsigned).collect());
    let mut engine = FlakyEngine {
        inner: SoftwareEngine::new(),
        fail_on: 2,
        searches: 0,
        unloads: 0,
    };

    let err = StabQuery::new()
        .with_max_chunk_bytes(8)
        .run(&program, &pts, &mut engine)
        .unwrap_err();
    assert!(matches!(err, Error::EngineFailure { operation: "search", .. }));
    assert_eq!(engine.searches, 2);
    assert_eq!(engine.unloads, 1);
    assert!(!engine.inner.is_loaded());
}

#[test]
fn test_successful_query_unloads_once() {
    let d = Domain::unsigned(4).unwrap();
    let program = compile(d, vec![(Scalar::Unsigned(0), Scalar::Unsigned(9))]);
    let pts = points(d, (0..10).map(Scalar::Unsigned).collect());
    let mut engine = FlakyEngine {
        inner: SoftwareEngine::new(),
        fail_on: usize::MAX,
        searches: 0,
        unloads: 0,
    };

    let result = StabQuery::new()
        .with_max_chunk_bytes(8)
        .run(&program, &pts, &mut engine)
        .unwrap();
    assert_eq!(result.len(), 10);
    assert_eq!(engine.searches, 5);
    assert_eq!(engine.unloads, 1);
}

#[test]
fn test_device_selection() {
    let d = Domain::unsigned(4).unwrap();
    let program = compile(d, vec![(Scalar::Unsigned(10), Scalar::Unsigned(20))]);
    let pts = points(d, vec![Scalar::Unsigned(15)]);
    let query = StabQuery::new();

    assert_eq!(
        query.run_on_device(&program, &pts, Some("software")).unwrap().len(),
        1
    );
    assert!(query.run_on_device(&program, &pts, None).unwrap().is_empty());
    assert!(matches!(
        query.run_on_device(&program, &pts, Some("ap0")),
        Err(Error::UnknownDevice(_))
    ));
}

// =============================================================================
// Brute-force agreement
// =============================================================================

fn brute_force(set: &IntervalSet, pts: &PointSet) -> StabResult {
    pts.iter()
        .enumerate()
        .flat_map(|(p, point)| {
            set.iter()
                .enumerate()
                .filter(move |(_, interval)| interval.contains(point))
                .map(move |(i, _)| (p, i))
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_signed_matches_brute_force(
        bounds in prop::collection::vec((any::<i16>(), any::<i16>()), 1..6),
        values in prop::collection::vec(any::<i16>(), 0..24),
        max_chunk in 2usize..64,
    ) {
        let d = Domain::signed(2).unwrap();
        let set = IntervalSet::from_bounds(
            d,
            bounds.iter().map(|&(a, b)| {
                (Scalar::Signed(a.min(b) as i64), Scalar::Signed(a.max(b) as i64))
            }),
        ).unwrap();
        let pts = PointSet::from_values(d, values.iter().map(|&v| Scalar::Signed(v as i64))).unwrap();
        let program = ProgramAssembler::new().assemble(&set).unwrap();

        prop_assert_eq!(run(&program, &pts, max_chunk), brute_force(&set, &pts));
    }

    #[test]
    fn prop_float_matches_brute_force(
        bounds in prop::collection::vec((-1.0e6f32..1.0e6, -1.0e6f32..1.0e6), 1..5),
        values in prop::collection::vec(-1.0e6f32..1.0e6, 0..16),
    ) {
        let d = Domain::float(4).unwrap();
        let set = IntervalSet::from_bounds(
            d,
            bounds.iter().map(|&(a, b)| {
                let (lo, hi) = if a.total_cmp(&b).is_le() { (a, b) } else { (b, a) };
                (Scalar::Float(lo as f64), Scalar::Float(hi as f64))
            }),
        ).unwrap();
        let pts = PointSet::from_values(d, values.iter().map(|&v| Scalar::Float(v as f64))).unwrap();
        let program = ProgramAssembler::new().assemble(&set).unwrap();

        prop_assert_eq!(run(&program, &pts, usize::MAX), brute_force(&set, &pts));
    }
}
