// ABOUTME: Configuration loading for meeting-assistant.
// ABOUTME: Reads ~/.meeting-assistant/config.toml; every key is optional and falls back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::RoleConfig;

const APP_DIR: &str = "meeting-assistant";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub roles: RolesConfig,
    pub meeting: MeetingConfig,
    pub logging: LoggingConfig,
}

/// Hosted LLM providers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: ProviderOverrides,
    pub gemini: ProviderOverrides,
    /// Provider that takes over a role whose own provider has no credential.
    /// Applied once at startup, never per call.
    pub fallback: Option<String>,
}

impl ProvidersConfig {
    /// Names of every provider the app knows how to reach.
    pub const KNOWN: [&'static str; 2] = ["openai", "gemini"];

    /// Resolve a provider's settings by name, applying config overrides to
    /// the provider's defaults.
    pub fn resolve(&self, name: &str) -> Option<ProviderSettings> {
        let (defaults, overrides) = match name {
            "openai" => (ProviderSettings::openai(), &self.openai),
            "gemini" => (ProviderSettings::gemini(), &self.gemini),
            _ => return None,
        };
        Some(overrides.apply(defaults))
    }
}

/// Optional per-provider keys as they appear in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub api_key_env: Option<String>,
}

impl ProviderOverrides {
    fn apply(&self, defaults: ProviderSettings) -> ProviderSettings {
        ProviderSettings {
            name: defaults.name,
            model: self.model.clone().unwrap_or(defaults.model),
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            api_key_env: self.api_key_env.clone().unwrap_or(defaults.api_key_env),
        }
    }
}

/// Fully resolved settings for one hosted provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub name: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub api_key_env: String,
}

impl ProviderSettings {
    pub fn openai() -> Self {
        Self {
            name: "openai".to_string(),
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.3,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }

    pub fn gemini() -> Self {
        Self {
            name: "gemini".to_string(),
            model: "gemini-1.5-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.3,
            api_key_env: "GOOGLE_API_KEY".to_string(),
        }
    }
}

/// Role defaults and which provider backs each seat.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    pub first_provider: String,
    pub second_provider: String,
    pub first: RoleConfig,
    pub second: RoleConfig,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            first_provider: "openai".to_string(),
            second_provider: "gemini".to_string(),
            first: RoleConfig::accountant(),
            second: RoleConfig::lawyer(),
        }
    }
}

/// Meeting behaviour and storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeetingConfig {
    pub default_name: String,
    pub single_role: bool,
    pub sessions_dir: Option<PathBuf>,
}

impl Default for MeetingConfig {
    fn default() -> Self {
        Self {
            default_name: "meeting".to_string(),
            single_role: false,
            sessions_dir: None,
        }
    }
}

/// Log filter used when `MEET_LOG` is not set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.meeting-assistant/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".meeting-assistant")
            .join("config.toml")
    }

    /// Path to the optional secrets file loaded after `./.env`.
    pub fn secrets_env_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("secrets.env")
    }

    /// Root of everything the app writes: meetings, transcripts, logs.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Directory holding one JSON file per saved meeting.
    pub fn sessions_dir(&self) -> PathBuf {
        self.meeting
            .sessions_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("meetings"))
    }

    pub fn transcripts_dir() -> PathBuf {
        Self::data_dir().join("transcripts")
    }

    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        let openai = config.providers.resolve("openai").unwrap();
        assert_eq!(openai.model, "gpt-4");
        assert_eq!(openai.temperature, 0.3);
        let gemini = config.providers.resolve("gemini").unwrap();
        assert_eq!(gemini.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.roles.first_provider, "openai");
        assert_eq!(config.roles.second_provider, "gemini");
        assert_eq!(config.roles.first.name, "Accountant");
        assert!(config.providers.fallback.is_none());
        assert!(!config.meeting.single_role);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
[providers]
fallback = "openai"

[providers.openai]
model = "gpt-4o"
api_key_env = "LOCAL_KEY"

[roles]
first_provider = "gemini"

[roles.first]
name = "CFO"
backstory = "Counts beans."
task = "Check {question}"

[meeting]
default_name = "weekly"
single_role = true
sessions_dir = "/tmp/meetings"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.fallback.as_deref(), Some("openai"));
        let openai = config.providers.resolve("openai").unwrap();
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.api_key_env, "LOCAL_KEY");
        // Keys left out keep the provider defaults.
        assert_eq!(openai.base_url, "https://api.openai.com/v1");
        assert_eq!(openai.temperature, 0.3);
        assert_eq!(config.roles.first_provider, "gemini");
        assert_eq!(config.roles.first.name, "CFO");
        assert_eq!(config.roles.first.task_instruction, "Check {question}");
        assert_eq!(config.meeting.default_name, "weekly");
        assert!(config.meeting.single_role);
        assert_eq!(config.sessions_dir(), PathBuf::from("/tmp/meetings"));
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml_str = r#"
[meeting]
single_role = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.meeting.single_role);
        assert_eq!(config.meeting.default_name, "meeting");
        assert_eq!(
            config.providers.resolve("gemini").unwrap().model,
            "gemini-1.5-pro"
        );
        assert_eq!(config.roles.second.name, "Lawyer");
    }

    #[test]
    fn unknown_provider_does_not_resolve() {
        let providers = ProvidersConfig::default();
        assert!(providers.resolve("anthropic").is_none());
        for name in ProvidersConfig::KNOWN {
            assert!(providers.resolve(name).is_some());
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.meeting.default_name, "meeting");
    }
}
