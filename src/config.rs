// Configuration loading and parsing (report.toml).
//
// Replaces the original deployment's module-level mutable credentials: the
// assembled `ReportConfig` is built once at process start and passed to the
// delivery collaborators explicitly. The compute core itself never reads it.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::event::CompetitionLevel;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// report.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire report.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ReportFile {
    email: EmailSection,
    #[serde(default)]
    comparison: ComparisonSection,
}

#[derive(Debug, Clone, Deserialize)]
struct EmailSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    username: String,
    password: String,
    /// Sender address; defaults to the username when omitted.
    #[serde(default)]
    from: Option<String>,
}

fn default_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_port() -> u16 {
    587
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ComparisonSection {
    #[serde(default)]
    default_level: Option<CompetitionLevel>,
}

// ---------------------------------------------------------------------------
// Assembled config
// ---------------------------------------------------------------------------

/// Mail-transport settings handed to the delivery collaborator.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub email: EmailConfig,
    /// Comparison level used when the roster table has no assignment.
    pub default_level: CompetitionLevel,
}

impl ReportConfig {
    /// Load and validate report.toml from the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let file: ReportFile = toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_file(file)
    }

    fn from_file(file: ReportFile) -> Result<Self, ConfigError> {
        if file.email.username.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "email.username".into(),
                message: "must not be empty".into(),
            });
        }
        if file.email.port == 0 {
            return Err(ConfigError::ValidationError {
                field: "email.port".into(),
                message: "must be a valid TCP port".into(),
            });
        }
        let from = file
            .email
            .from
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| file.email.username.clone());
        Ok(ReportConfig {
            email: EmailConfig {
                host: file.email.host,
                port: file.email.port,
                username: file.email.username,
                password: file.email.password,
                from,
            },
            default_level: file
                .comparison
                .default_level
                .unwrap_or(CompetitionLevel::D1),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
