//! Aurora space-weather relay library.

pub mod assets;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod predict;
pub mod resilience;
pub mod upstream;

pub use assets::StaticServer;
pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
