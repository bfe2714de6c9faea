//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level Digitscope configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<PeerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Connection settings for the inference peer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerConfig {
    /// WebSocket URL of the inference peer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Board and brush behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Also paint the 4 diagonal neighbors (at lower intensity) on each stamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagonal_brush: Option<bool>,

    /// When to push the board to the peer during a drag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncMode>,
}

/// Outbound sync cadence for a drag gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Push the full board after every qualifying stamp.
    #[default]
    PerStroke,
    /// Batch silently and push once at pointer release.
    OnRelease,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "plain" (default) or "json".
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log level override (trace/debug/info/warn/error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Output target: "stderr" (default) or "stdout".
    #[serde(default = "default_log_output")]
    pub output: String,
}

fn default_log_format() -> String {
    "plain".into()
}

fn default_log_output() -> String {
    "stderr".into()
}

/// Substitute `${ENV_VAR}` patterns in a string with their environment variable values.
fn substitute_env_vars(input: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    })
    .into_owned()
}

impl Config {
    /// Load config from a JSON5 file, substituting `${ENV_VAR}` references.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(crate::error::DigitscopeError::Io)?;

        // Substitute ${ENV_VAR} references before parsing
        let substituted = substitute_env_vars(&raw);

        let config: Config = json5::from_str(&substituted)
            .map_err(|e| crate::error::DigitscopeError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Resolve the config file path.
    pub fn config_dir() -> PathBuf {
        data_dir().join("config.json")
    }

    /// WebSocket URL of the inference peer.
    pub fn peer_url(&self) -> String {
        self.peer
            .as_ref()
            .and_then(|p| p.url.clone())
            .unwrap_or_else(|| "ws://127.0.0.1:5000/ws".to_string())
    }

    /// Whether the brush also paints diagonal neighbors.
    pub fn diagonal_brush(&self) -> bool {
        self.board
            .as_ref()
            .and_then(|b| b.diagonal_brush)
            .unwrap_or(false)
    }

    /// Outbound sync cadence.
    pub fn sync_mode(&self) -> SyncMode {
        self.board
            .as_ref()
            .and_then(|b| b.sync)
            .unwrap_or_default()
    }
}

/// Data directory for Digitscope state.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".digitscope")
}
