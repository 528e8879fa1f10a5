use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::contacts::ColumnCheck;

/// Environment variable that supplies the API token
pub const TOKEN_ENV: &str = "AGENTDESK_TOKEN";

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Agent roster and contact list distribution service")]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path of the JSON snapshot used to persist agents
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// API token clients must present as a Bearer token
    #[arg(long)]
    pub token: Option<String>,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Web server settings
    #[serde(default)]
    pub web: WebSettings,

    /// Agent persistence settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Contact upload settings
    #[serde(default)]
    pub ingest: IngestSettings,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSettings {
    /// Web server port
    #[serde(default = "default_web_port")]
    pub port: u16,

    /// Origins allowed by CORS; empty allows any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Fixed API token. A random one is generated at startup when unset.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_web_port() -> u16 {
    5000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allowed_origins: default_allowed_origins(),
            token: None,
        }
    }
}

/// Agent persistence settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// JSON snapshot path; agents are kept in memory only when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Contact upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// How required CSV columns are validated
    #[serde(default)]
    pub column_check: ColumnCheck,

    /// Maximum accepted upload body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Default upload limit (5MB)
fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            column_check: ColumnCheck::default(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(p) = path {
            if p.exists() {
                return Self::read_file(p);
            }
            tracing::warn!("Config file {:?} not found, falling back to defaults", p);
        }

        let default_paths = [
            dirs::config_dir().map(|p| p.join("agentdesk/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/agentdesk/config.toml")),
            dirs::home_dir().map(|p| p.join(".agentdesk.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read_file(path);
            }
        }

        Ok(Self::default())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Take the API token from the environment, if set and non-empty
    pub fn merge_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.web.token = Some(token.trim().to_string());
            }
        }
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(port) = cli.port {
            self.web.port = port;
        }
        if let Some(data) = &cli.data {
            self.storage.path = Some(data.clone());
        }
        if let Some(token) = &cli.token {
            self.web.token = Some(token.clone());
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        const MIN_UPLOAD_BYTES: usize = 1024;

        if self.ingest.max_upload_bytes < MIN_UPLOAD_BYTES {
            self.ingest.max_upload_bytes = MIN_UPLOAD_BYTES;
        }
        if matches!(&self.web.token, Some(t) if t.trim().is_empty()) {
            self.web.token = None;
        }
    }
}
