//! Seeded random intervals and points.
//!
//! Integers are uniform over the whole domain. Floats are uniform over the
//! non-NaN bit patterns of their width, so every binade and both zeros show up.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stab_foundation::{Domain, IntervalSet, PointSet, Result, Scalar, ScalarKind};
use tracing::debug;

pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn random_scalar<R: Rng + ?Sized>(domain: &Domain, rng: &mut R) -> Scalar {
    let shift = 64 - 8 * domain.width() as u32;
    match domain.kind() {
        ScalarKind::Unsigned => Scalar::Unsigned(rng.random::<u64>() >> shift),
        ScalarKind::Signed => Scalar::Signed((rng.random::<u64>() as i64) >> shift),
        ScalarKind::Float if domain.width() == 4 => loop {
            let value = f32::from_bits(rng.random());
            if !value.is_nan() {
                break Scalar::Float(f64::from(value));
            }
        },
        ScalarKind::Float => loop {
            let value = f64::from_bits(rng.random());
            if !value.is_nan() {
                break Scalar::Float(value);
            }
        },
    }
}

/// `count` intervals with both bounds drawn independently and put in order.
pub fn random_intervals<R: Rng + ?Sized>(
    domain: Domain,
    count: usize,
    rng: &mut R,
) -> Result<IntervalSet> {
    let mut set = IntervalSet::new(domain);
    for _ in 0..count {
        let a = random_scalar(&domain, rng);
        let b = random_scalar(&domain, rng);
        let (lower, upper) = match a.total_cmp(&b) {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };
        let index = set.push(lower, upper)?;
        debug!(interval = index, bounds = %set.describe(index).unwrap_or_default(), "Random interval");
    }
    Ok(set)
}

pub fn random_points<R: Rng + ?Sized>(domain: Domain, count: usize, rng: &mut R) -> Result<PointSet> {
    let mut set = PointSet::new(domain);
    for _ in 0..count {
        set.push(random_scalar(&domain, rng))?;
    }
    debug!(count, "Random points generated");
    Ok(set)
}
