//! Environment configuration

use std::path::PathBuf;

/// The keeper's ask endpoint, as deployed
pub const DEFAULT_ENDPOINT: &str = "https://loregpt.onrender.com/ask";

#[derive(Debug, Clone)]
pub struct ArchivistConfig {
    /// Where questions are POSTed
    pub endpoint: String,
    /// Log file; a full-screen terminal cannot log to stdout
    pub log_path: PathBuf,
    /// `EnvFilter` directive for tracing
    pub log_filter: String,
}

impl ArchivistConfig {
    pub fn from_env() -> Self {
        let endpoint = std::env::var("ARCHIVIST_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let log_path = std::env::var("ARCHIVIST_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(format!("{home}/.cosmere-archivist/archivist.log"))
            });

        let log_filter =
            std::env::var("ARCHIVIST_LOG").unwrap_or_else(|_| "cosmere_archivist=info".to_string());

        Self {
            endpoint,
            log_path,
            log_filter,
        }
    }
}
