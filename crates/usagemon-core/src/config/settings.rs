use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted for the provider key
pub const API_KEY_ENV: &str = "USAGEMON_API_KEY";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "LLM usage monitor")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the usage-recording service
    #[arg(short = 'u', long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Provider API key forwarded with chat requests
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// User label recorded with chat requests
    #[arg(long, global = true)]
    pub user_label: Option<String>,

    /// Model used for chat requests
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch the usage summary once and print it
    Summary {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Send one prompt, print the answer and the refreshed totals
    Chat {
        /// Prompt text
        #[arg(short, long)]
        prompt: String,
    },
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if running the interactive dashboard
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Usage-recording service settings
    #[serde(default)]
    pub service: ServiceSettings,

    /// Chat form defaults
    #[serde(default)]
    pub chat: ChatSettings,

    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,
}

/// Usage-recording service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Base URL the API paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (none by default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Chat form defaults
#[derive(Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Provider API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// User label recorded with each request
    #[serde(default = "default_user_label")]
    pub user_label: String,

    /// Initially selected model
    #[serde(default = "default_model")]
    pub model: String,

    /// Models offered by the form
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Initial prompt text
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_user_label() -> String {
    "alice".to_string()
}

fn default_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "gpt-5-mini".to_string(),
        "gpt-4o-mini".to_string(),
        "gpt-4o".to_string(),
    ]
}

fn default_prompt() -> String {
    "Say hello!".to_string()
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            user_label: default_user_label(),
            model: default_model(),
            models: default_models(),
            prompt: default_prompt(),
        }
    }
}

impl std::fmt::Debug for ChatSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("user_label", &self.user_label)
            .field("model", &self.model)
            .field("models", &self.models)
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// UI-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Event poll interval of the dashboard loop in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate() -> u64 {
    50
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::read_file(p);
            }
            tracing::warn!("Config file {:?} not found, falling back to defaults", p);
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("usagemon/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/usagemon/config.toml")),
            dirs::home_dir().map(|p| p.join(".usagemon.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read_file(path);
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Fill the API key from the environment when no file provided one
    pub fn merge_env(&mut self) {
        if self.chat.api_key.is_some() {
            return;
        }
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.chat.api_key = Some(key);
            }
        }
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(base_url) = &cli.base_url {
            self.service.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.timeout_secs {
            self.service.timeout_secs = Some(timeout);
        }
        if let Some(api_key) = &cli.api_key {
            self.chat.api_key = Some(api_key.clone());
        }
        if let Some(user_label) = &cli.user_label {
            self.chat.user_label = user_label.clone();
        }
        if let Some(model) = &cli.model {
            self.chat.model = model.clone();
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        const MIN_TICK_RATE: u64 = 10;

        let trimmed = self.service.base_url.trim_end_matches('/').len();
        self.service.base_url.truncate(trimmed);

        if self.chat.models.is_empty() {
            self.chat.models = default_models();
        }
        if !self.chat.models.contains(&self.chat.model) {
            self.chat.models.push(self.chat.model.clone());
        }

        if self.ui.tick_rate_ms < MIN_TICK_RATE {
            self.ui.tick_rate_ms = MIN_TICK_RATE;
        }
    }
}
