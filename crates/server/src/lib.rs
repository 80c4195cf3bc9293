//! JARVIS dashboard server: the REST API consumed by the React client.

mod assistant;
mod commands;
mod error;
mod routes;
pub mod storage;

use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get, post},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use jarvis_api_client::{
    ChatClient, ElevenLabsClient, GovernmentClient, NewsApiClient, OpsClient, SlackNotifier,
};
use jarvis_core::agents::Orchestrator;
use jarvis_core::intelligence::{Provider, ProviderMappings};
use jarvis_core::memory::MemoryStore;
use jarvis_core::tts::{TtsCache, VoiceSettings};
use jarvis_runtime_config::JarvisConfig;

pub use commands::CommandQueue;
use storage::Db;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: AppConfig,
    pub services: Services,
    pub memory: Arc<RwLock<MemoryStore>>,
    pub tts_cache: Arc<Mutex<TtsCache>>,
    pub orchestrator: Arc<Mutex<Orchestrator>>,
    pub mappings: Arc<RwLock<ProviderMappings>>,
    pub commands: CommandQueue,
}

/// Settings handlers read on every request.
#[derive(Clone)]
pub struct AppConfig {
    /// `None` disables the command endpoints.
    pub command_token: Option<String>,
    pub voice: VoiceSettings,
    pub news_query: String,
    pub news_page_size: u32,
    pub default_provider: Option<Provider>,
}

/// Upstream clients. A missing client means the integration is not configured.
#[derive(Clone)]
pub struct Services {
    /// In configuration order: OpenAI, Anthropic, Perplexity.
    pub chat: Vec<ChatClient>,
    pub tts: Option<ElevenLabsClient>,
    pub slack: Option<SlackNotifier>,
    pub news: Option<NewsApiClient>,
    pub government: Option<GovernmentClient>,
    pub ops: OpsClient,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Services {
    fn from_ref(state: &AppState) -> Self {
        state.services.clone()
    }
}

fn configured(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

impl AppConfig {
    pub fn from_config(cfg: &JarvisConfig) -> Self {
        let default_provider = configured(&cfg.providers.default_provider).and_then(|p| {
            let parsed = Provider::parse(p);
            if parsed.is_none() {
                tracing::warn!("unknown default provider {p:?}, ignoring");
            }
            parsed
        });
        Self {
            command_token: configured(&cfg.commands.token).map(str::to_string),
            voice: VoiceSettings {
                voice_id: cfg.voice.voice_id.clone(),
                model_id: cfg.voice.model_id.clone(),
                stability: cfg.voice.stability,
                similarity_boost: cfg.voice.similarity_boost,
            },
            news_query: cfg.news.query.clone(),
            news_page_size: cfg.news.page_size,
            default_provider,
        }
    }
}

impl Services {
    pub fn from_config(cfg: &JarvisConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(cfg.providers.timeout_secs.max(1));
        let p = &cfg.providers;

        let mut chat = Vec::new();
        for (provider, key, model) in [
            (Provider::OpenAi, &p.openai_api_key, &p.openai_model),
            (Provider::Anthropic, &p.anthropic_api_key, &p.anthropic_model),
            (Provider::Perplexity, &p.perplexity_api_key, &p.perplexity_model),
        ] {
            if let Some(key) = configured(key) {
                tracing::info!("AI provider enabled: {provider} ({model})");
                chat.push(ChatClient::new(provider, key, model, timeout)?);
            }
        }
        if chat.is_empty() {
            tracing::warn!("no AI provider configured, assistant will use canned replies");
        }

        let tts = configured(&cfg.voice.elevenlabs_api_key)
            .map(|key| ElevenLabsClient::new(key, timeout))
            .transpose()?;
        let slack = configured(&cfg.slack.webhook_url)
            .map(|url| SlackNotifier::new(url, timeout))
            .transpose()?;
        let news = configured(&cfg.news.api_key)
            .map(|key| NewsApiClient::new(key, timeout))
            .transpose()?;
        let government = configured(&cfg.government.api_key)
            .map(|key| GovernmentClient::new(&cfg.government.base_url, key, timeout))
            .transpose()?;
        let ops = OpsClient::new(&cfg.ops.url, Duration::from_secs(5))?;

        Ok(Self {
            chat,
            tts,
            slack,
            news,
            government,
            ops,
        })
    }

    pub fn configured_providers(&self) -> Vec<Provider> {
        self.chat.iter().map(ChatClient::provider).collect()
    }

    pub fn chat_client(&self, provider: Provider) -> Option<&ChatClient> {
        self.chat.iter().find(|c| c.provider() == provider)
    }
}

impl AppState {
    /// Open storage under `cfg.server.data_dir` and build upstream clients.
    pub fn new(cfg: &JarvisConfig) -> anyhow::Result<Self> {
        let data_dir = &cfg.server.data_dir;
        tracing::info!("data directory: {}", data_dir.display());

        let db = storage::init_db(data_dir)?;
        tracing::info!("database initialized");

        let memory = MemoryStore::open(data_dir.join("memory.json"));
        let commands = CommandQueue::new(data_dir.join(&cfg.commands.queue_file));

        Ok(Self {
            db,
            config: AppConfig::from_config(cfg),
            services: Services::from_config(cfg)?,
            memory: Arc::new(RwLock::new(memory)),
            tts_cache: Arc::new(Mutex::new(TtsCache::new(cfg.voice.cache_capacity))),
            orchestrator: Arc::new(Mutex::new(Orchestrator::new())),
            mappings: Arc::new(RwLock::new(ProviderMappings::new())),
            commands,
        })
    }
}

/// Build the full router. `web_dir`, when it exists, is served as the
/// fallback so the React client and the API share one origin.
pub fn app(state: AppState, web_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health::health))
        // Chat
        .route("/chat-messages", get(routes::chat::chat_messages))
        .route("/voice-command", post(routes::chat::voice_command))
        // Dashboard panels
        .route("/stats", get(routes::dashboard::stats))
        .route(
            "/credit-opportunities",
            get(routes::dashboard::credit_opportunities),
        )
        .route("/meta-ads", get(routes::dashboard::meta_ads))
        .route("/suggestions", get(routes::dashboard::suggestions))
        .route("/ai-trends", get(routes::dashboard::ai_trends))
        .route("/news", get(routes::news::list_news))
        .route("/government/bids", get(routes::government::bids))
        .route("/government/officials", get(routes::government::officials))
        // Planning
        .route(
            "/strategic-decisions",
            get(routes::planning::list_decisions).post(routes::planning::create_decision),
        )
        .route(
            "/enhanced-tasks",
            get(routes::planning::list_tasks).post(routes::planning::create_task),
        )
        // Intelligence panel
        .route(
            "/intelligence/interactions",
            get(routes::intelligence::interactions),
        )
        .route("/intelligence/metrics", get(routes::intelligence::metrics))
        .route("/intelligence/retry", post(routes::intelligence::retry))
        .route("/intelligence/optimize", post(routes::intelligence::optimize))
        // Voice + notifications
        .route("/tts/prepare", post(routes::voice::prepare))
        .route("/tts", post(routes::voice::synthesize))
        .route("/slack/notify", post(routes::voice::slack_notify))
        // Memory
        .route(
            "/memory",
            get(routes::memory::recall).post(routes::memory::remember),
        )
        .route("/memory/expired", delete(routes::memory::clear_expired))
        // Agents
        .route(
            "/agents/communication",
            get(routes::agents::communication),
        )
        .route(
            "/system-orchestrator/status",
            get(routes::agents::orchestrator_status),
        )
        .route(
            "/system-orchestrator/execute-cycle",
            post(routes::agents::execute_cycle),
        )
        // Management API bridge
        .route("/management/status", get(routes::management::status))
        .route(
            "/management/tasks",
            get(routes::management::list_tasks).post(routes::management::create_task),
        )
        // Internal commands (bearer token)
        .route("/commands/execute", post(routes::commands::execute))
        .route("/commands/pending", get(routes::commands::pending));

    let mut app = Router::new().nest("/api", api);

    if let Some(web_dir) = web_dir.filter(|d| d.exists()) {
        tracing::info!("serving static files from {}", web_dir.display());
        let index_html = web_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(web_dir).fallback(ServeFile::new(index_html)));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
