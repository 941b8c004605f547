//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → .env + process environment (PORT, API keys, voice id)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_env_file, ConfigError};
pub use schema::{
    AssetsConfig, DownloadsConfig, GeminiConfig, ListenerConfig, ObservabilityConfig,
    PredictionConfig, RelayConfig, TimeoutConfig, TtsConfig,
};
