//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, JSON body decoding)
//!     → api.rs / downloads.rs (validate, call the collaborator)
//!     → response.rs (error → status code + JSON body)
//!     → Send to client
//! ```

pub mod api;
pub mod downloads;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ApiJson, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, RelayServer, ServerError};
