//! Server configuration management

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which storage backend serves documents for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    ObjectStore,
    LocalDir,
}

impl StorageBackend {
    /// Resolve the backend selection from the environment.
    ///
    /// `STORAGE_BACKEND` takes `s3` or `local` (default `s3`);
    /// `USE_LOCAL_PDFS=true` is honored as an alias forcing `local`.
    pub fn from_env() -> Result<Self> {
        let use_local = std::env::var("USE_LOCAL_PDFS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if use_local {
            return Ok(Self::LocalDir);
        }

        match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" | "object-store" => Ok(Self::ObjectStore),
            "local" | "filesystem" => Ok(Self::LocalDir),
            other => Err(ApiError::Config(format!(
                "invalid STORAGE_BACKEND value: {other}"
            ))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Storage backend selection, fixed for the life of the process
    pub backend: StorageBackend,

    /// Shared session secret checked at the authentication boundary
    pub session_secret: String,

    /// Root directory for the local backend; relative paths resolve against
    /// the working directory
    pub local_pdfs_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            backend: StorageBackend::from_env()?,
            session_secret: std::env::var("SESSION_SECRET")
                .map_err(|_| ApiError::Config("SESSION_SECRET must be set".to_string()))?,
            local_pdfs_dir: std::env::var("LOCAL_PDFS_DIR")
                .unwrap_or_else(|_| "local-pdfs".to_string())
                .into(),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            backend: StorageBackend::ObjectStore,
            session_secret: String::new(),
            local_pdfs_dir: "local-pdfs".into(),
        }
    }
}
