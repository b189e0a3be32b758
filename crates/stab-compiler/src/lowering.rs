//! Lowering of domain intervals into byte-ordered spans.
//!
//! The labeler only understands `x <= y` in raw byte order (unsigned) or in
//! two's complement order (signed). Floats need two extra steps first: an
//! interval that crosses the sign bit is split at zero, and a negative span has
//! its bounds reversed because larger magnitudes have larger bit patterns.

use stab_foundation::{Domain, Interval, Scalar, ScalarKind};

use crate::error::Result;
use crate::labeling::{Labeling, label_signed, label_unsigned};

/// Byte order a span's bounds are compared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanEncoding {
    Unsigned,
    Signed,
}

/// One single-signed piece of an interval, already byte-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSpan {
    pub lower: Vec<u8>,
    pub upper: Vec<u8>,
    pub encoding: SpanEncoding,
}

impl EncodedSpan {
    pub fn label(&self) -> Result<Labeling> {
        match self.encoding {
            SpanEncoding::Unsigned => label_unsigned(&self.lower, &self.upper),
            SpanEncoding::Signed => label_signed(&self.lower, &self.upper),
        }
    }
}

/// Lowers one interval into one span, or two for a float straddling zero.
pub fn lower_interval(domain: &Domain, interval: &Interval) -> Result<Vec<EncodedSpan>> {
    let lower = domain.check(interval.lower())?;
    let upper = domain.check(interval.upper())?;

    let spans = match domain.kind() {
        ScalarKind::Unsigned => vec![span(domain, &lower, &upper, SpanEncoding::Unsigned)],
        ScalarKind::Signed => vec![span(domain, &lower, &upper, SpanEncoding::Signed)],
        ScalarKind::Float => {
            if domain.sign_bit_set(&lower) && !domain.sign_bit_set(&upper) {
                vec![
                    float_span(domain, lower, Scalar::Float(-0.0)),
                    float_span(domain, Scalar::Float(0.0), upper),
                ]
            } else {
                vec![float_span(domain, lower, upper)]
            }
        }
    };
    Ok(spans)
}

fn span(domain: &Domain, lower: &Scalar, upper: &Scalar, encoding: SpanEncoding) -> EncodedSpan {
    EncodedSpan {
        lower: domain.encode(lower),
        upper: domain.encode(upper),
        encoding,
    }
}

fn float_span(domain: &Domain, lower: Scalar, upper: Scalar) -> EncodedSpan {
    if domain.sign_bit_set(&lower) {
        span(domain, &upper, &lower, SpanEncoding::Unsigned)
    } else {
        span(domain, &lower, &upper, SpanEncoding::Unsigned)
    }
}
