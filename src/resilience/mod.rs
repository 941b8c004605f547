//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to an external collaborator:
//!     → timeouts.rs (enforce deadline on script runs)
//!     → reqwest client timeouts (connect + total) for API calls
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline; a hung dependency fails closed
//! - No retries: every relayed call is a POST with side effects upstream

pub mod timeouts;

pub use timeouts::{with_timeout, TimeoutError};
