//! Big-endian byte codec.
//!
//! Encoding reinterprets the scalar's bit pattern and writes it most
//! significant byte first, independent of host endianness. Integers and floats
//! go through the same raw-bits path, so negative zero and every NaN-free float
//! survive a round trip bit for bit.

use crate::domain::{Domain, Scalar, ScalarKind};
use crate::error::{Error, Result};

impl Domain {
    /// Encodes `scalar` as `width` big-endian bytes.
    pub fn encode(&self, scalar: &Scalar) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width());
        self.encode_into(scalar, &mut out);
        out
    }

    /// Appends the big-endian encoding of `scalar` to `out`.
    pub fn encode_into(&self, scalar: &Scalar, out: &mut Vec<u8>) {
        let bytes = self.raw_bits(scalar).to_be_bytes();
        out.extend_from_slice(&bytes[8 - self.width()..]);
    }

    /// Decodes exactly `width` big-endian bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<Scalar> {
        if bytes.len() != self.width() {
            return Err(Error::malformed(format!(
                "expected {} bytes for a {} value, found {}",
                self.width(),
                self,
                bytes.len()
            )));
        }
        let mut buf = [0u8; 8];
        buf[8 - self.width()..].copy_from_slice(bytes);
        let raw = u64::from_be_bytes(buf);

        Ok(match self.kind() {
            ScalarKind::Unsigned => Scalar::Unsigned(raw),
            ScalarKind::Signed => {
                let shift = 64 - self.bits();
                Scalar::Signed(((raw << shift) as i64) >> shift)
            }
            ScalarKind::Float if self.width() == 4 => {
                Scalar::Float(f64::from(f32::from_bits(raw as u32)))
            }
            ScalarKind::Float => Scalar::Float(f64::from_bits(raw)),
        })
    }

    /// Tests the most significant bit of the encoded value.
    ///
    /// This is a bit test, not a numeric comparison: `-0.0` has its sign bit
    /// set.
    pub fn sign_bit_set(&self, scalar: &Scalar) -> bool {
        (self.raw_bits(scalar) >> (self.bits() - 1)) & 1 == 1
    }

    fn raw_bits(&self, scalar: &Scalar) -> u64 {
        let raw = match *scalar {
            Scalar::Unsigned(v) => v,
            Scalar::Signed(v) => v as u64,
            Scalar::Float(v) if self.width() == 4 => u64::from((v as f32).to_bits()),
            Scalar::Float(v) => v.to_bits(),
        };
        if self.bits() == 64 {
            raw
        } else {
            raw & ((1u64 << self.bits()) - 1)
        }
    }
}
