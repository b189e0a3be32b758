//! Stab Runtime
//!
//! Executes compiled comparator programs against query points.
//!
//! - [`engine`] - the [`MatchingEngine`] seam and [`EngineSession`] guard
//! - [`software`] - in-process reference engine
//! - [`query`] - chunked streaming and event decoding
//! - [`result`] - the point to interval multimap

pub mod engine;
pub mod error;
pub mod query;
pub mod result;
pub mod software;

pub use engine::{EngineSession, MatchEvent, MatchingEngine, SOFTWARE_DEVICE, open_device};
pub use error::{Error, Result};
pub use query::{StabQuery, decode_events, encode_points};
pub use result::StabResult;
pub use software::SoftwareEngine;
