//! Shared configuration types.
//!
//! Both `jarvis-server` and `jarvis-ops` read `jarvis.toml` through
//! [`JarvisConfig::load`]. Secrets can be left out of the file and supplied
//! through environment variables instead; see [`JarvisConfig::apply_env`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "jarvis.toml";

/// Env var that overrides the config file path.
pub const ENV_CONFIG_PATH: &str = "JARVIS_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration (persisted as `jarvis.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JarvisConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub providers: ProviderSettings,
    #[serde(default)]
    pub voice: VoiceSettings,
    #[serde(default)]
    pub slack: SlackSettings,
    #[serde(default)]
    pub news: NewsSettings,
    #[serde(default)]
    pub government: GovernmentSettings,
    #[serde(default)]
    pub ops: OpsSettings,
    #[serde(default)]
    pub commands: CommandSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Built React client; served as the fallback route when present.
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_dir: default_data_dir(),
            web_dir: default_web_dir(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default)]
    pub anthropic_api_key: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default)]
    pub perplexity_api_key: String,
    #[serde(default = "default_perplexity_model")]
    pub perplexity_model: String,
    /// `openai`, `anthropic` or `perplexity`. Empty = first configured.
    #[serde(default)]
    pub default_provider: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_model: default_openai_model(),
            anthropic_api_key: String::new(),
            anthropic_model: default_anthropic_model(),
            perplexity_api_key: String::new(),
            perplexity_model: default_perplexity_model(),
            default_provider: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    #[serde(default)]
    pub elevenlabs_api_key: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_voice_model")]
    pub model_id: String,
    #[serde(default = "default_stability")]
    pub stability: f32,
    #[serde(default = "default_similarity")]
    pub similarity_boost: f32,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            elevenlabs_api_key: String::new(),
            voice_id: default_voice_id(),
            model_id: default_voice_model(),
            stability: default_stability(),
            similarity_boost: default_similarity(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlackSettings {
    #[serde(default)]
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_news_query")]
    pub query: String,
    #[serde(default = "default_news_page_size")]
    pub page_size: u32,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            query: default_news_query(),
            page_size: default_news_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernmentSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_government_url")]
    pub base_url: String,
}

impl Default for GovernmentSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_government_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsSettings {
    /// Where the dashboard server reaches the management API.
    #[serde(default = "default_ops_url")]
    pub url: String,
    #[serde(default = "default_ops_port")]
    pub port: u16,
    #[serde(default = "default_ops_data_dir")]
    pub data_dir: PathBuf,
    /// Where the management API reaches the dashboard's orchestrator.
    #[serde(default = "default_orchestrator_url")]
    pub orchestrator_url: String,
}

impl Default for OpsSettings {
    fn default() -> Self {
        Self {
            url: default_ops_url(),
            port: default_ops_port(),
            data_dir: default_ops_data_dir(),
            orchestrator_url: default_orchestrator_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSettings {
    /// Bearer token for the command endpoints. Empty disables them.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_queue_file")]
    pub queue_file: String,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            queue_file: default_queue_file(),
        }
    }
}

fn default_port() -> u16 {
    5000
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_web_dir() -> PathBuf {
    PathBuf::from("web/dist")
}
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}
fn default_perplexity_model() -> String {
    "sonar".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}
fn default_voice_model() -> String {
    "eleven_multilingual_v2".to_string()
}
fn default_stability() -> f32 {
    0.5
}
fn default_similarity() -> f32 {
    0.75
}
fn default_cache_capacity() -> usize {
    100
}
fn default_news_query() -> String {
    "transporte OR agronegócio OR frete OR safra".to_string()
}
fn default_news_page_size() -> u32 {
    20
}
fn default_government_url() -> String {
    "https://api.portaldatransparencia.gov.br/api-de-dados".to_string()
}
fn default_ops_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_ops_port() -> u16 {
    8000
}
fn default_ops_data_dir() -> PathBuf {
    PathBuf::from("data/ops")
}
fn default_orchestrator_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_queue_file() -> String {
    "comandos-pendentes.json".to_string()
}

impl JarvisConfig {
    /// Load from `path`, or from `$JARVIS_CONFIG`, or from `./jarvis.toml`.
    ///
    /// A missing file yields defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| non_empty_env(ENV_CONFIG_PATH).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Overlay values from the environment. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = v;
        }
        if let Some(v) = get("JARVIS_DATA_DIR") {
            self.server.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("JARVIS_WEB_DIR") {
            self.server.web_dir = PathBuf::from(v);
        }
        if let Some(v) = get("BASE_URL") {
            self.server.base_url = v;
        }
        let secrets: [(&str, &mut String); 10] = [
            ("OPENAI_API_KEY", &mut self.providers.openai_api_key),
            ("ANTHROPIC_API_KEY", &mut self.providers.anthropic_api_key),
            ("PERPLEXITY_API_KEY", &mut self.providers.perplexity_api_key),
            ("JARVIS_DEFAULT_PROVIDER", &mut self.providers.default_provider),
            ("ELEVENLABS_API_KEY", &mut self.voice.elevenlabs_api_key),
            ("SLACK_WEBHOOK_URL", &mut self.slack.webhook_url),
            ("NEWS_API_KEY", &mut self.news.api_key),
            ("GOVERNMENT_API_KEY", &mut self.government.api_key),
            ("JARVIS_COMMAND_TOKEN", &mut self.commands.token),
            ("JARVIS_OPS_URL", &mut self.ops.url),
        ];
        for (key, slot) in secrets {
            if let Some(v) = get(key) {
                *slot = v;
            }
        }
        if let Some(v) = get("JARVIS_OPS_PORT").and_then(|v| v.parse().ok()) {
            self.ops.port = v;
        }
        if let Some(v) = get("JARVIS_OPS_DATA_DIR") {
            self.ops.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("JARVIS_ORCHESTRATOR_URL") {
            self.ops.orchestrator_url = v;
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = JarvisConfig::from_toml("").expect("parse empty config");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.ops.port, 8000);
        assert_eq!(cfg.commands.queue_file, "comandos-pendentes.json");
        assert_eq!(cfg.voice.cache_capacity, 100);
        assert!(cfg.providers.openai_api_key.is_empty());
    }

    #[test]
    fn sections_deserialize_from_toml() {
        let cfg = JarvisConfig::from_toml(
            r#"
[server]
port = 8080
data_dir = "/var/lib/jarvis"

[providers]
anthropic_api_key = "sk-ant"
default_provider = "anthropic"

[voice]
cache_capacity = 5
"#,
        )
        .expect("parse config");

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.data_dir, PathBuf::from("/var/lib/jarvis"));
        assert_eq!(cfg.providers.anthropic_api_key, "sk-ant");
        assert_eq!(cfg.providers.openai_model, "gpt-4o-mini");
        assert_eq!(cfg.voice.cache_capacity, 5);
    }

    #[test]
    fn env_overrides_file_values_but_skips_blanks() {
        let mut cfg = JarvisConfig::default();
        cfg.providers.openai_api_key = "from-file".into();
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "   "),
            ("NEWS_API_KEY", "news-key"),
            ("PORT", "9001"),
            ("JARVIS_COMMAND_TOKEN", "secret"),
        ]);
        cfg.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.providers.openai_api_key, "from-file");
        assert_eq!(cfg.news.api_key, "news-key");
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.commands.token, "secret");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = std::env::temp_dir().join("jarvis-config-missing");
        let cfg = JarvisConfig::load(Some(&dir.join("nope.toml"))).expect("defaults");
        assert_eq!(cfg.server.data_dir, PathBuf::from("data"));
    }
}
