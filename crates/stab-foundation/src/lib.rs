//! Stab Foundation
//!
//! Value-level building blocks shared by the compiler and the runtime.
//!
//! - [`domain`] - [`ScalarKind`], runtime-width [`Domain`] and [`Scalar`] values
//! - [`codec`] - big-endian byte encoding of scalars (the byte codec)
//! - [`sets`] - validated [`IntervalSet`] and [`PointSet`] containers
//! - [`error`] - input validation errors
//!
//! Width is a runtime parameter: a 4-byte signed domain and an 8-byte float
//! domain are both plain [`Domain`] values, so every downstream component can
//! be exercised at every width without generic instantiation.

pub mod codec;
pub mod domain;
pub mod error;
pub mod sets;

pub use domain::{Domain, Scalar, ScalarKind};
pub use error::{Error, Result};
pub use sets::{Interval, IntervalSet, PointSet};
