//! Configuration loading from disk and the environment.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid environment variable {name}: {message}")]
    Env { name: &'static str, message: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML configuration file without validating it.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load a `.env` file from the working directory or its parents into the
/// process environment. Returns its path when one was found.
///
/// Call before [`load_config`] so its values act as overrides.
pub fn load_env_file() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Load the effective configuration.
///
/// Starts from `path` when given (defaults otherwise), applies process
/// environment overrides, then validates the result.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` resolves a variable name to its value; empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.listener.bind_address = with_port(&config.listener.bind_address, "PORT", &port)?;
    }
    if let Some(port) = get("FRONTEND_PORT") {
        config.assets.bind_address = with_port(&config.assets.bind_address, "FRONTEND_PORT", &port)?;
    }
    if let Some(key) = get("GEMINI_API_KEY") {
        config.gemini.api_key = Some(key);
    }
    if let Some(key) = get("ELEVEN_API_KEY") {
        config.tts.api_key = Some(key);
    }
    if let Some(voice) = get("ELEVEN_VOICE_ID") {
        config.tts.voice_id = Some(voice);
    }

    Ok(())
}

/// Replace the port of `bind_address`, keeping its host.
fn with_port(bind_address: &str, name: &'static str, port: &str) -> Result<String, ConfigError> {
    let port: u16 = port.trim().parse().map_err(|e| ConfigError::Env {
        name,
        message: format!("'{}' is not a port: {}", port, e),
    })?;

    let ip = bind_address
        .parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .unwrap_or_else(|_| [0, 0, 0, 0].into());

    Ok(SocketAddr::new(ip, port).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_credentials_and_ports() {
        let mut config = RelayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "4100"),
                ("FRONTEND_PORT", "4200"),
                ("GEMINI_API_KEY", "g-key"),
                ("ELEVEN_API_KEY", "e-key"),
                ("ELEVEN_VOICE_ID", "voice-1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:4100");
        assert_eq!(config.assets.bind_address, "0.0.0.0:4200");
        assert_eq!(config.gemini.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.tts.api_key.as_deref(), Some("e-key"));
        assert_eq!(config.tts.voice_id.as_deref(), Some("voice-1"));
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "127.0.0.1:3000".into();
        apply_env_overrides(&mut config, env(&[("PORT", "8088")])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8088");
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = RelayConfig::default();
        apply_env_overrides(&mut config, env(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = RelayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "PORT", .. }));
    }

    #[test]
    fn test_read_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:9999"

            [prediction]
            command = ["python3", "/opt/aurora/predict.py"]
            "#
        )
        .unwrap();

        let config = read_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert_eq!(config.prediction.command[1], "/opt/aurora/predict.py");
    }

    #[test]
    fn test_read_config_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nbind_address = 1").unwrap();
        assert!(matches!(read_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timeouts]\nrequest_secs = 0").unwrap();

        match load_config(Some(file.path())) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "timeouts.request_secs"), "{errors:?}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/aurora-relay.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
