//! Application context built once at startup and shared with handlers.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::ContextError;

/// Shared, immutable application context.
#[derive(Debug, Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    config: Config,
    run_id: Option<String>,
}

impl AppContext {
    /// Create a context without touching the filesystem.
    pub fn new(config: Config) -> Self {
        Self::from_parts(config, None)
    }

    /// Create a context, reading the run identifier if one is configured.
    pub fn load(config: Config) -> Result<Self, ContextError> {
        let run_id = match config.run_id_path.as_deref() {
            Some(path) => {
                let run_id = read_run_id(path)?;
                info!(run_id = %run_id, "Loaded run id from {}", path.display());
                Some(run_id)
            }
            None => None,
        };

        info!("Ready to serve");
        Ok(Self::from_parts(config, run_id))
    }

    fn from_parts(config: Config, run_id: Option<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner { config, run_id }),
        }
    }

    /// Loaded configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Run identifier read at startup, if any.
    pub fn run_id(&self) -> Option<&str> {
        self.inner.run_id.as_deref()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Read a run identifier, trimming surrounding whitespace.
pub fn read_run_id(path: &Path) -> Result<String, ContextError> {
    let raw = fs::read_to_string(path).map_err(|source| ContextError::RunIdRead {
        path: path.to_path_buf(),
        source,
    })?;

    let run_id = raw.trim();
    if run_id.is_empty() {
        return Err(ContextError::EmptyRunId {
            path: path.to_path_buf(),
        });
    }

    Ok(run_id.to_string())
}
