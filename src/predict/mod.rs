//! Prediction subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/predict/aurora
//!     → coordinates.rs (presence + range check, 400 on failure)
//!     → invoker.rs (one external process per request, JSON passthrough)
//!
//! POST /api/predict/storm
//!     → storm.rs (pure weighted-sum heuristic, no I/O)
//! ```

pub mod coordinates;
pub mod invoker;
pub mod storm;

pub use coordinates::{CoordinateError, Coordinates, CoordinatesRequest};
pub use invoker::{PredictionError, ScriptInvoker};
pub use storm::{assess, storm_probability, SolarConditions, StormAssessment};
