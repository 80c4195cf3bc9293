//! End-to-end tests against an in-process server with no upstream
//! integrations configured.

use serde_json::{Value, json};
use tempfile::TempDir;

use jarvis_api::{ChatMessage, NewsArticle, VoiceCommandResponse};
use jarvis_runtime_config::JarvisConfig;
use jarvis_server::{AppState, app};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn start(command_token: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();

        // Reserve a port and release it so the ops API is unreachable.
        let unused = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let ops_port = unused.local_addr().unwrap().port();
        drop(unused);

        let mut cfg = JarvisConfig::default();
        cfg.server.data_dir = dir.path().to_path_buf();
        cfg.ops.url = format!("http://127.0.0.1:{ops_port}");
        cfg.commands.token = command_token.unwrap_or_default().to_string();

        let state = AppState::new(&cfg).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(state, None)).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let srv = TestServer::start(None).await;
    let resp = srv.get("/health").await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn seeded_dashboard_panels_are_served() {
    let srv = TestServer::start(None).await;
    for path in [
        "/stats",
        "/credit-opportunities",
        "/meta-ads",
        "/suggestions",
        "/ai-trends",
        "/government/bids",
        "/government/officials",
    ] {
        let resp = srv.get(path).await;
        assert_eq!(resp.status().as_u16(), 200, "{path}");
    }
    let offers: Vec<Value> = srv.get("/credit-opportunities").await.json().await.unwrap();
    assert!(!offers.is_empty());
}

#[tokio::test]
async fn news_filters_by_category() {
    let srv = TestServer::start(None).await;

    let farm: Vec<NewsArticle> = srv.get("/news?category=farm").await.json().await.unwrap();
    assert!(!farm.is_empty());
    assert!(farm.iter().all(|a| a.category == "farm"));

    let alias: Vec<NewsArticle> = srv.get("/news?category=agro").await.json().await.unwrap();
    assert_eq!(alias.len(), farm.len());

    let all: Vec<NewsArticle> = srv.get("/news?category=all").await.json().await.unwrap();
    assert!(all.len() >= farm.len());

    let resp = srv.get("/news?category=astrology").await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("astrology"));
}

#[tokio::test]
async fn voice_command_stores_both_messages_and_logs_fallback() {
    let srv = TestServer::start(None).await;

    let resp = srv
        .post("/voice-command", json!({"text": "Quais linhas de crédito estão abertas?"}))
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let answer: VoiceCommandResponse = resp.json().await.unwrap();
    assert!(answer.user_message.is_user);
    assert!(!answer.bot_message.is_user);
    assert!(!answer.bot_message.content.is_empty());
    assert_eq!(answer.provider, "fallback");

    let history: Vec<ChatMessage> = srv.get("/chat-messages").await.json().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, answer.user_message.id);
    assert_eq!(history[1].id, answer.bot_message.id);

    let log: Vec<Value> = srv
        .get("/intelligence/interactions")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["provider"], "fallback");

    let memories: Vec<Value> = srv.get("/memory?kind=conversation").await.json().await.unwrap();
    assert_eq!(memories.len(), 1);
}

#[tokio::test]
async fn voice_command_rejects_empty_text() {
    let srv = TestServer::start(None).await;
    let resp = srv.post("/voice-command", json!({"text": "   "})).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn intelligence_retry_validates_input() {
    let srv = TestServer::start(None).await;

    let resp = srv
        .post(
            "/intelligence/retry",
            json!({"interaction_id": "x", "provider": "skynet"}),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = srv
        .post(
            "/intelligence/retry",
            json!({"interaction_id": "missing", "provider": "openai"}),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 404);

    srv.post("/voice-command", json!({"text": "bom dia"})).await;
    let log: Vec<Value> = srv
        .get("/intelligence/interactions")
        .await
        .json()
        .await
        .unwrap();
    let id = log[0]["id"].as_str().unwrap();
    let resp = srv
        .post(
            "/intelligence/retry",
            json!({"interaction_id": id, "provider": "openai"}),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 503);
}

#[tokio::test]
async fn optimize_and_metrics_work_on_an_empty_log() {
    let srv = TestServer::start(None).await;
    let metrics: Vec<Value> = srv.get("/intelligence/metrics").await.json().await.unwrap();
    assert!(metrics.is_empty());

    let resp = srv.post("/intelligence/optimize", json!({})).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["sample_size"], 0);
}

#[tokio::test]
async fn tts_prepare_spells_out_times() {
    let srv = TestServer::start(None).await;
    let resp = srv.post("/tts/prepare", json!({"text": "14:30"})).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["text"], "quatorze horas e 30 minutos");
    assert_eq!(body["cached"], false);
    assert_eq!(body["cache_key"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn unconfigured_integrations_answer_503() {
    let srv = TestServer::start(None).await;
    let tts = srv.post("/tts", json!({"text": "olá"})).await;
    assert_eq!(tts.status().as_u16(), 503);
    let slack = srv.post("/slack/notify", json!({"text": "olá"})).await;
    assert_eq!(slack.status().as_u16(), 503);
    let commands = srv.get("/commands/pending").await;
    assert_eq!(commands.status().as_u16(), 503);
}

#[tokio::test]
async fn command_queue_requires_bearer_token() {
    let srv = TestServer::start(Some("s3cret")).await;

    let resp = srv.post("/commands/execute", json!({"command": "backup"})).await;
    assert_eq!(resp.status().as_u16(), 401);

    let resp = srv
        .client
        .post(srv.url("/commands/execute"))
        .bearer_auth("wrong")
        .json(&json!({"command": "backup"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = srv
        .client
        .post(srv.url("/commands/execute"))
        .bearer_auth("s3cret")
        .json(&json!({"comando": "backup", "args": {"target": "db"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let queued: Value = resp.json().await.unwrap();
    assert_eq!(queued["command"], "backup");

    let pending: Value = srv
        .client
        .get(srv.url("/commands/pending"))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let commands = pending["commands"].as_array().unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0]["args"]["target"], "db");
}

#[tokio::test]
async fn management_bridge_reports_offline_ops_api() {
    let srv = TestServer::start(None).await;
    let resp = srv.get("/management/status").await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["online"], false);
    assert!(body["error"].is_string());

    let tasks = srv.get("/management/tasks").await;
    assert_eq!(tasks.status().as_u16(), 502);
}

#[tokio::test]
async fn planning_rows_round_trip() {
    let srv = TestServer::start(None).await;

    let resp = srv
        .post(
            "/strategic-decisions",
            json!({"title": "Renovar frota", "description": "Trocar dois caminhões", "impact": "high"}),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 201);
    let decisions: Vec<Value> = srv.get("/strategic-decisions").await.json().await.unwrap();
    assert_eq!(decisions[0]["title"], "Renovar frota");

    let resp = srv.post("/strategic-decisions", json!({"title": ""})).await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = srv
        .post("/enhanced-tasks", json!({"title": "Revisar contrato", "priority": "urgent"}))
        .await;
    assert_eq!(resp.status().as_u16(), 201);
    let task: Value = resp.json().await.unwrap();
    assert_eq!(task["status"], "pending");

    let resp = srv
        .post("/enhanced-tasks", json!({"title": "x", "priority": "someday"}))
        .await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn memory_remember_and_recall() {
    let srv = TestServer::start(None).await;

    let resp = srv
        .post(
            "/memory",
            json!({"kind": "fact", "content": "Cliente Silva paga em 30 dias", "importance": 0.9, "tags": ["financeiro"]}),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 201);

    let found: Vec<Value> = srv.get("/memory?q=silva").await.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["content"], "Cliente Silva paga em 30 dias");

    let by_tag: Vec<Value> = srv.get("/memory?tags=financeiro").await.json().await.unwrap();
    assert_eq!(by_tag.len(), 1);

    let resp = srv.get("/memory?kind=dream").await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = srv.post("/memory", json!({"kind": "fact", "content": "  "})).await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = srv
        .client
        .delete(srv.url("/memory/expired"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn orchestrator_cycle_updates_status() {
    let srv = TestServer::start(None).await;

    let before: Value = srv.get("/system-orchestrator/status").await.json().await.unwrap();
    assert_eq!(before["cycles"], 0);

    let resp = srv.post("/system-orchestrator/execute-cycle", json!({})).await;
    assert_eq!(resp.status().as_u16(), 200);
    let cycle: Value = resp.json().await.unwrap();
    assert_eq!(cycle["cycle"], 1);
    assert_eq!(cycle["reports"].as_array().unwrap().len(), 4);

    let after: Value = srv.get("/system-orchestrator/status").await.json().await.unwrap();
    assert_eq!(after["cycles"], 1);

    let guide: Value = srv.get("/agents/communication").await.json().await.unwrap();
    assert_eq!(guide["topic"], "index");
    assert!(!guide["content"].as_str().unwrap().is_empty());
}
