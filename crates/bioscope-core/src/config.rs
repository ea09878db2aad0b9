//! Configuration for bioscope
//!
//! Settings come from an optional TOML file (path in `BIOSCOPE_CONFIG`)
//! layered under a handful of environment overrides for secrets and the
//! bind address.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "BIOSCOPE_CONFIG";

/// System-wide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BioscopeConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Text-generation provider settings
    pub llm: LlmConfig,
    /// NASA publication source settings
    pub nasa: NasaConfig,
    /// Insight generation settings
    pub insights: InsightConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "127.0.0.1:5000"
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Text-generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider id from the bioscope-llm registry
    pub provider: String,
    /// Overrides the provider's registered base URL
    pub base_url: Option<String>,
    pub model: String,
    pub summary_temperature: f32,
    pub insight_temperature: f32,
    pub query_temperature: f32,
    pub timeout_seconds: u64,
    /// Never written back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            summary_temperature: 0.3,
            insight_temperature: 0.4,
            query_temperature: 0.3,
            timeout_seconds: 60,
            api_key: None,
        }
    }
}

/// NASA publication source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NasaConfig {
    pub base_url: String,
    pub api_key: String,
    /// Query used when an ingest request omits one
    pub default_query: String,
    /// Limit used when an ingest request omits one
    pub default_limit: usize,
    /// Serve built-in sample publications when the API is unavailable
    pub sample_fallback: bool,
    pub timeout_seconds: u64,
}

impl Default for NasaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nasa.gov".to_string(),
            api_key: "DEMO_KEY".to_string(),
            default_query: "space biology".to_string(),
            default_limit: 50,
            sample_fallback: true,
            timeout_seconds: 30,
        }
    }
}

/// Insight generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Most recent publications handed to the model
    pub max_publications: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_publications: 10,
        }
    }
}

impl BioscopeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Load from `BIOSCOPE_CONFIG` (if set), apply environment overrides, and validate
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = var("BIOSCOPE_ADDR") {
            self.server.addr = addr;
        }
        if let Some(key) = var("BIOSCOPE_LLM_API_KEY").or_else(|| var("OPENAI_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = var("NASA_API_KEY") {
            self.nasa.api_key = key;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.addr '{}' is not a socket address",
                self.server.addr
            )));
        }

        if bioscope_llm::get_provider(&self.llm.provider).is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown llm.provider '{}'",
                self.llm.provider
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }

        for (name, value) in [
            ("llm.summary_temperature", self.llm.summary_temperature),
            ("llm.insight_temperature", self.llm.insight_temperature),
            ("llm.query_temperature", self.llm.query_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must be between 0.0 and 2.0",
                    name
                )));
            }
        }

        if self.llm.timeout_seconds == 0 || self.nasa.timeout_seconds == 0 {
            return Err(ConfigError::OutOfRange(
                "timeouts must be positive".to_string(),
            ));
        }

        if self.nasa.default_limit == 0 {
            return Err(ConfigError::OutOfRange(
                "nasa.default_limit must be positive".to_string(),
            ));
        }

        if self.insights.max_publications == 0 {
            return Err(ConfigError::OutOfRange(
                "insights.max_publications must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether an LLM-backed assistant can be used
    pub fn has_llm_credentials(&self) -> bool {
        let key_present = self
            .llm
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        key_present
            || bioscope_llm::get_provider(&self.llm.provider)
                .map(|p| !p.requires_api_key)
                .unwrap_or(false)
    }
}

/// Configuration loading or validation error
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Config file could not be read
    Io(String),
    /// Config file is not valid TOML for this schema
    Parse(String),
    /// Value is malformed
    Invalid(String),
    /// Value is out of valid range
    OutOfRange(String),
    /// Required field is missing
    MissingField(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Cannot read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Cannot parse config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid value: {}", msg),
            ConfigError::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
            ConfigError::MissingField(msg) => write!(f, "Missing field: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BioscopeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.insights.max_publications, 10);
        assert_eq!(config.nasa.default_limit, 50);
        assert!(!config.has_llm_credentials());
    }

    #[test]
    fn test_partial_toml() {
        let config = BioscopeConfig::from_toml(
            r#"
            [llm]
            provider = "groq"
            model = "llama-3.3-70b-versatile"

            [nasa]
            sample_fallback = false
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.llm.timeout_seconds, 60);
        assert!(!config.nasa.sample_fallback);
        assert_eq!(config.server.addr, "127.0.0.1:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\naddr = \"0.0.0.0:8080\"").unwrap();

        let config = BioscopeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");

        assert!(matches!(
            BioscopeConfig::from_file(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BIOSCOPE_ADDR", "0.0.0.0:9000"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("NASA_API_KEY", ""),
        ]);
        let mut config = BioscopeConfig::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.addr, "0.0.0.0:9000");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.nasa.api_key, "DEMO_KEY");
        assert!(config.has_llm_credentials());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = BioscopeConfig::default();
        config.llm.api_key = Some("secret".into());
        assert!(!config.to_toml().unwrap().contains("secret"));
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let mut config = BioscopeConfig::default();
        config.llm.provider = "ollama".into();
        assert!(config.has_llm_credentials());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = BioscopeConfig::default();
        config.server.addr = "nowhere".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = BioscopeConfig::default();
        config.llm.insight_temperature = 3.5;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));

        let mut config = BioscopeConfig::default();
        config.insights.max_publications = 0;
        assert!(config.validate().is_err());

        let mut config = BioscopeConfig::default();
        config.llm.provider = "acme".into();
        assert!(config.validate().is_err());
    }
}
