//! Configuration module for the try-on gateway

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Default request body limit (50MB, matches the upload limit of the web client)
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Allowed range for the per-attempt synthesis timeout, in seconds
pub const SYNTHESIS_TIMEOUT_RANGE: (u64, u64) = (60, 120);

/// Main application settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub synthesis: SynthesisSettings,
    pub advice: AdviceSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub max_payload_bytes: usize,
}

/// Remote garment synthesis provider
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    pub endpoint: String,
    pub api_token: Option<String>,
    /// Call the provider without a token (shared public quota)
    pub allow_anonymous: bool,
    pub timeout_secs: u64,
    pub denoise_steps: u32,
    pub seed: u64,
}

/// Language model used for styling recommendations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdviceSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with TRYON_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    ///
    /// The bare `HF_TOKEN` and `GEMINI_API_KEY` variables are used as
    /// credentials when the prefixed keys are not set.
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let mut settings = Self::load_from(&config_dir, env_source())?;
        settings.apply_credential_fallbacks(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Layer the files in `config_dir` under the given environment source
    fn load_from(config_dir: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Fill missing credentials from the unprefixed variables and normalize
    /// blank values to `None`
    fn apply_credential_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.synthesis.api_token = non_blank(self.synthesis.api_token.take())
            .or_else(|| non_blank(lookup("HF_TOKEN")));
        self.advice.api_key = non_blank(self.advice.api_key.take())
            .or_else(|| non_blank(lookup("GEMINI_API_KEY")));
    }
}

impl SynthesisSettings {
    /// Per-attempt timeout, clamped to the supported window
    pub fn timeout(&self) -> std::time::Duration {
        let (min, max) = SYNTHESIS_TIMEOUT_RANGE;
        std::time::Duration::from_secs(self.timeout_secs.clamp(min, max))
    }

    /// Whether the remote path may run at all
    pub fn is_usable(&self) -> bool {
        self.api_token.is_some() || self.allow_anonymous
    }
}

/// `TRYON_SERVER__PORT`, `TRYON_SYNTHESIS__API_TOKEN`, etc.
///
/// One underscore after the prefix, two between nested keys.
fn env_source() -> Environment {
    Environment::with_prefix("TRYON")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        SynthesisSettings {
            endpoint: "https://yisol-idm-vton.hf.space/api/tryon".to_string(),
            api_token: None,
            allow_anonymous: false,
            timeout_secs: 120,
            denoise_steps: 30,
            seed: 42,
        }
    }
}

impl Default for AdviceSettings {
    fn default() -> Self {
        AdviceSettings {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}
