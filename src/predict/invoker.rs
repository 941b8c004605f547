//! External prediction script invocation.
//!
//! # Responsibilities
//! - Run the configured scoring command once per request
//! - Append latitude and longitude as positional arguments
//! - Capture stdout as the result and stderr as diagnostics
//! - Parse stdout as a single JSON value and hand it back unchanged
//!
//! # Design Decisions
//! - One short-lived process per request, no pooling of processes
//! - Concurrent runs are capped by a semaphore
//! - Every run has a deadline covering the wait for a slot and the process;
//!   the child is killed when the deadline passes

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::config::PredictionConfig;
use crate::observability::metrics::ProcessGauge;
use crate::predict::coordinates::Coordinates;
use crate::resilience::{with_timeout, TimeoutError};

/// Errors from running the prediction script.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("failed to start prediction process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("prediction process exited with status {code:?}")]
    Failed { code: Option<i32>, details: String },

    #[error("prediction output is not valid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        output: String,
    },

    #[error("prediction timed out")]
    Timeout(#[from] TimeoutError),

    #[error("prediction slots are no longer available")]
    Unavailable,
}

/// Runs the external prediction command.
#[derive(Debug, Clone)]
pub struct ScriptInvoker {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    slots: Arc<Semaphore>,
}

impl ScriptInvoker {
    /// Build an invoker from configuration.
    ///
    /// The first element of `command` is the program; validation guarantees it
    /// exists, an empty command yields an invoker whose runs fail to spawn.
    pub fn new(config: &PredictionConfig) -> Self {
        let mut parts = config.command.iter().cloned();
        let program = parts.next().unwrap_or_default();

        Self {
            program,
            args: parts.collect(),
            timeout: Duration::from_secs(config.timeout_secs),
            slots: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        }
    }

    /// Run one prediction for `coords` and return the script's JSON output.
    pub async fn predict(&self, coords: Coordinates) -> Result<Value, PredictionError> {
        with_timeout(self.timeout, self.run(coords)).await?
    }

    async fn run(&self, coords: Coordinates) -> Result<Value, PredictionError> {
        let _slot = self
            .slots
            .acquire()
            .await
            .map_err(|_| PredictionError::Unavailable)?;
        let _gauge = ProcessGauge::start();

        tracing::debug!(
            program = %self.program,
            latitude = coords.latitude,
            longitude = coords.longitude,
            "Spawning prediction process"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(coords.latitude.to_string())
            .arg(coords.longitude.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(PredictionError::Spawn)?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::error!(
                code = ?output.status.code(),
                stderr = %stderr,
                "Prediction script failed"
            );
            return Err(PredictionError::Failed {
                code: output.status.code(),
                details: stderr,
            });
        }

        if !stderr.is_empty() {
            tracing::debug!(stderr = %stderr, "Prediction script diagnostics");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match serde_json::from_str::<Value>(&stdout) {
            Ok(value) => Ok(value),
            Err(source) => {
                tracing::error!(output = %stdout, "Failed to parse prediction output");
                Err(PredictionError::Parse {
                    source,
                    output: stdout.into_owned(),
                })
            }
        }
    }
}
