//! Scalar domains
//!
//! A [`Domain`] pairs a [`ScalarKind`] with a byte width chosen at runtime.
//! Values travel as [`Scalar`]s and are checked against their domain when they
//! enter an interval or point set.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric family of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    /// Unsigned integers.
    Unsigned,
    /// Two's complement signed integers.
    Signed,
    /// IEEE-754 binary floating point.
    Float,
}

impl ScalarKind {
    /// Byte widths accepted for this kind.
    pub fn supported_widths(self) -> &'static [usize] {
        match self {
            ScalarKind::Unsigned | ScalarKind::Signed => &[1, 2, 4, 8],
            ScalarKind::Float => &[4, 8],
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Unsigned => write!(f, "unsigned"),
            ScalarKind::Signed => write!(f, "signed"),
            ScalarKind::Float => write!(f, "float"),
        }
    }
}

/// A scalar kind at a fixed byte width.
///
/// Constructed only through [`Domain::new`], so the width is always one of
/// [`ScalarKind::supported_widths`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain {
    kind: ScalarKind,
    width: usize,
}

impl Domain {
    /// Creates a domain, rejecting widths the kind does not support.
    pub fn new(kind: ScalarKind, width: usize) -> Result<Self> {
        if !kind.supported_widths().contains(&width) {
            return Err(Error::UnsupportedWidth { kind, width });
        }
        Ok(Self { kind, width })
    }

    /// Shorthand for an unsigned domain.
    pub fn unsigned(width: usize) -> Result<Self> {
        Self::new(ScalarKind::Unsigned, width)
    }

    /// Shorthand for a signed domain.
    pub fn signed(width: usize) -> Result<Self> {
        Self::new(ScalarKind::Signed, width)
    }

    /// Shorthand for a floating point domain.
    pub fn float(width: usize) -> Result<Self> {
        Self::new(ScalarKind::Float, width)
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Number of bytes in one encoded value.
    pub fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn bits(&self) -> u32 {
        (self.width * 8) as u32
    }

    /// Smallest value of the domain under its natural ordering.
    pub fn min_value(&self) -> Scalar {
        match self.kind {
            ScalarKind::Unsigned => Scalar::Unsigned(0),
            ScalarKind::Signed => Scalar::Signed(i64::MIN >> (64 - self.bits())),
            ScalarKind::Float => Scalar::Float(f64::NEG_INFINITY),
        }
    }

    /// Largest value of the domain under its natural ordering.
    pub fn max_value(&self) -> Scalar {
        match self.kind {
            ScalarKind::Unsigned => Scalar::Unsigned(u64::MAX >> (64 - self.bits())),
            ScalarKind::Signed => Scalar::Signed(i64::MAX >> (64 - self.bits())),
            ScalarKind::Float => Scalar::Float(f64::INFINITY),
        }
    }

    /// Whether `scalar` is a value of this domain.
    ///
    /// Floats must be non-NaN and, at width 4, exactly representable as `f32`.
    pub fn contains(&self, scalar: &Scalar) -> bool {
        match (self.kind, *scalar) {
            (ScalarKind::Unsigned, Scalar::Unsigned(v)) => v <= u64::MAX >> (64 - self.bits()),
            (ScalarKind::Signed, Scalar::Signed(v)) => {
                let shift = 64 - self.bits();
                (i64::MIN >> shift..=i64::MAX >> shift).contains(&v)
            }
            (ScalarKind::Float, Scalar::Float(v)) => {
                !v.is_nan() && (self.width == 8 || f64::from(v as f32).to_bits() == v.to_bits())
            }
            _ => false,
        }
    }

    /// Returns `scalar` unchanged if it belongs to the domain.
    pub fn check(&self, scalar: Scalar) -> Result<Scalar> {
        if self.contains(&scalar) {
            Ok(scalar)
        } else {
            Err(Error::malformed(format!(
                "{} is not a valid {} value",
                self.format(&scalar),
                self
            )))
        }
    }

    /// Parses one textual token in the domain's numeric format.
    pub fn parse(&self, token: &str) -> Result<Scalar> {
        let invalid = || Error::malformed(format!("cannot parse '{token}' as a {self} value"));
        let scalar = match self.kind {
            ScalarKind::Unsigned => Scalar::Unsigned(token.parse().map_err(|_| invalid())?),
            ScalarKind::Signed => Scalar::Signed(token.parse().map_err(|_| invalid())?),
            ScalarKind::Float if self.width == 4 => {
                let v: f32 = token.parse().map_err(|_| invalid())?;
                Scalar::Float(f64::from(v))
            }
            ScalarKind::Float => Scalar::Float(token.parse().map_err(|_| invalid())?),
        };
        // Out-of-range literals round to infinity; only a spelled-out infinity may.
        if let Scalar::Float(v) = scalar
            && v.is_infinite()
            && !is_infinity_literal(token)
        {
            return Err(invalid());
        }
        self.check(scalar)
    }

    /// Formats a scalar the way the domain's width would print it.
    pub fn format(&self, scalar: &Scalar) -> String {
        match (self.kind, *scalar) {
            (ScalarKind::Float, Scalar::Float(v)) if self.width == 4 => format!("{}", v as f32),
            _ => scalar.to_string(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-byte {}", self.width, self.kind)
    }
}

/// A single numeric value.
///
/// Width-4 floats are stored widened to `f64`; the widening is exact so the
/// `f32` bit pattern is recovered on encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Unsigned(_) => ScalarKind::Unsigned,
            Scalar::Signed(_) => ScalarKind::Signed,
            Scalar::Float(_) => ScalarKind::Float,
        }
    }

    /// Natural ordering of the value's domain.
    ///
    /// Floats follow the IEEE total order, so `-0.0 < +0.0`. Scalars of
    /// different kinds order by kind, which keeps the relation total.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Unsigned(a), Scalar::Unsigned(b)) => a.cmp(b),
            (Scalar::Signed(a), Scalar::Signed(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.total_cmp(b),
            _ => kind_rank(self.kind()).cmp(&kind_rank(other.kind())),
        }
    }
}

fn is_infinity_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    digits.eq_ignore_ascii_case("inf") || digits.eq_ignore_ascii_case("infinity")
}

fn kind_rank(kind: ScalarKind) -> u8 {
    match kind {
        ScalarKind::Unsigned => 0,
        ScalarKind::Signed => 1,
        ScalarKind::Float => 2,
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Unsigned(v) => write!(f, "{v}"),
            Scalar::Signed(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_widths() {
        assert!(Domain::unsigned(1).is_ok());
        assert!(Domain::signed(2).is_ok());
        assert!(Domain::float(4).is_ok());
        assert!(Domain::float(8).is_ok());

        assert_eq!(
            Domain::float(2),
            Err(Error::UnsupportedWidth {
                kind: ScalarKind::Float,
                width: 2
            })
        );
        assert!(matches!(
            Domain::unsigned(3),
            Err(Error::UnsupportedWidth { width: 3, .. })
        ));
        assert!(Domain::signed(16).is_err());
    }

    #[test]
    fn test_integer_bounds() {
        let d = Domain::signed(1).unwrap();
        assert_eq!(d.min_value(), Scalar::Signed(-128));
        assert_eq!(d.max_value(), Scalar::Signed(127));

        let d = Domain::signed(8).unwrap();
        assert_eq!(d.min_value(), Scalar::Signed(i64::MIN));
        assert_eq!(d.max_value(), Scalar::Signed(i64::MAX));

        let d = Domain::unsigned(4).unwrap();
        assert_eq!(d.max_value(), Scalar::Unsigned(u32::MAX as u64));
        let d = Domain::unsigned(8).unwrap();
        assert_eq!(d.max_value(), Scalar::Unsigned(u64::MAX));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let d = Domain::unsigned(4).unwrap();
        assert_eq!(d.parse("4294967295"), Ok(Scalar::Unsigned(4294967295)));
        assert!(d.parse("4294967296").is_err());
        assert!(d.parse("-1").is_err());
        assert!(d.parse("ten").is_err());

        let d = Domain::signed(2).unwrap();
        assert_eq!(d.parse("-32768"), Ok(Scalar::Signed(-32768)));
        assert!(d.parse("32768").is_err());
    }

    #[test]
    fn test_parse_floats() {
        let d = Domain::float(4).unwrap();
        assert_eq!(d.parse("1.5"), Ok(Scalar::Float(1.5)));
        assert_eq!(d.parse("0.1"), Ok(Scalar::Float(f64::from(0.1f32))));
        assert!(d.parse("NaN").is_err());
        assert!(d.parse("1e39").is_err());
        assert!(d.parse("-1e39").is_err());
        assert_eq!(d.parse("inf"), Ok(Scalar::Float(f64::INFINITY)));
        assert_eq!(d.parse("+INF"), Ok(Scalar::Float(f64::INFINITY)));
        assert_eq!(d.parse("-Infinity"), Ok(Scalar::Float(f64::NEG_INFINITY)));
        assert!(Domain::float(8).unwrap().parse("1e400").is_err());
        assert_eq!(Domain::float(8).unwrap().parse("1e39"), Ok(Scalar::Float(1e39)));

        let negative_zero = Domain::float(8).unwrap().parse("-0.0").unwrap();
        match negative_zero {
            Scalar::Float(v) => assert!(v == 0.0 && v.is_sign_negative()),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn test_contains_checks_kind_and_precision() {
        let d = Domain::float(4).unwrap();
        assert!(d.contains(&Scalar::Float(0.5)));
        assert!(!d.contains(&Scalar::Float(0.1)));
        assert!(!d.contains(&Scalar::Unsigned(1)));
        assert!(!Domain::unsigned(1).unwrap().contains(&Scalar::Unsigned(256)));
    }

    #[test]
    fn test_total_cmp_orders_zeroes() {
        let neg = Scalar::Float(-0.0);
        let pos = Scalar::Float(0.0);
        assert_eq!(neg.total_cmp(&pos), Ordering::Less);
        assert_eq!(
            Scalar::Signed(-5).total_cmp(&Scalar::Signed(5)),
            Ordering::Less
        );
    }

    #[test]
    fn test_format_width_four_float() {
        let d = Domain::float(4).unwrap();
        let v = d.parse("0.1").unwrap();
        assert_eq!(d.format(&v), "0.1");
        assert_eq!(d.to_string(), "4-byte float");
    }
}
