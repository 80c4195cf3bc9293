use serde_json::{Value, json};
use tempfile::TempDir;

use jarvis_ops::{OpsState, app};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();

        // Nothing listens here, so orchestrator calls fail fast.
        let unused = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let dashboard_url = format!("http://{}", unused.local_addr().unwrap());
        drop(unused);

        let state = OpsState::new(dir.path(), &dashboard_url).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn patch(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.patch(self.url(path)).json(&body).send().await.unwrap()
    }
}

#[tokio::test]
async fn banner_lists_endpoints() {
    let srv = TestServer::start().await;
    let body: Value = srv.get("/").await.json().await.unwrap();
    assert_eq!(body["service"], "jarvis-ops");
    assert!(body["endpoints"].as_array().unwrap().len() >= 5);
}

#[tokio::test]
async fn tasks_are_created_listed_and_patched() {
    let srv = TestServer::start().await;

    let resp = srv
        .post(
            "/tasks",
            json!({"titulo": "Conferir frete", "descricao": "Rota Goiânia", "prioridade": "alta"}),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["title"], "Conferir frete");
    assert_eq!(created["priority"], "high");
    assert_eq!(created["state"], "pending");
    let id = created["id"].as_str().unwrap().to_string();

    srv.post(
        "/tasks",
        json!({"title": "Urgente", "description": "Pneu furado", "priority": "critical"}),
    )
    .await;

    let all: Vec<Value> = srv.get("/tasks").await.json().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["title"], "Urgente");

    let high: Vec<Value> = srv.get("/tasks?priority=high").await.json().await.unwrap();
    assert_eq!(high.len(), 1);

    let fetched: Value = srv.get(&format!("/tasks/{id}")).await.json().await.unwrap();
    assert_eq!(fetched["id"], id.as_str());

    let resp = srv
        .patch(
            &format!("/tasks/{id}"),
            json!({"estado": "done", "resultado": "ok", "id": "hijack"}),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    let patched: Value = resp.json().await.unwrap();
    assert_eq!(patched["id"], id.as_str());
    assert_eq!(patched["state"], "done");
    assert_eq!(patched["result"], "ok");
    assert!(patched["updated_at"].is_string());

    // Persisted to disk.
    let raw = std::fs::read_to_string(srv.dir.path().join("tasks.json")).unwrap();
    let on_disk: Vec<Value> = serde_json::from_str(&raw).unwrap();
    assert!(on_disk.iter().any(|t| t["state"] == "done"));
}

#[tokio::test]
async fn task_errors_map_to_status_codes() {
    let srv = TestServer::start().await;

    let resp = srv.get("/tasks/nope").await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("nope"));

    let resp = srv.patch("/tasks/nope", json!({"state": "done"})).await;
    assert_eq!(resp.status().as_u16(), 404);

    let created: Value = srv
        .post("/tasks", json!({"title": "t", "description": "d"}))
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();
    let resp = srv
        .patch(&format!("/tasks/{id}"), json!({"priority": "whenever"}))
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = srv.get("/tasks?limit=0").await;
    assert_eq!(resp.status().as_u16(), 400);

    let resp = srv.post("/tasks", json!({"title": " ", "description": "d"})).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn diagnostics_sort_most_severe_first() {
    let srv = TestServer::start().await;
    for severity in ["info", "critico", "warning"] {
        let resp = srv
            .post(
                "/diagnostics",
                json!({"tipo": "sistema", "descricao": format!("disk {severity}"), "severidade": severity}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 201);
    }
    let listed: Vec<Value> = srv.get("/diagnostics").await.json().await.unwrap();
    let severities: Vec<&str> = listed.iter().map(|d| d["severity"].as_str().unwrap()).collect();
    assert_eq!(severities, ["critical", "warning", "info"]);

    let only: Vec<Value> = srv.get("/diagnostics?severity=warning").await.json().await.unwrap();
    assert_eq!(only.len(), 1);
}

#[tokio::test]
async fn corrections_and_improvements_filter() {
    let srv = TestServer::start().await;

    srv.post("/corrections", json!({"descricao": "reiniciar worker", "aplicada": true}))
        .await;
    srv.post("/corrections", json!({"description": "limpar cache"}))
        .await;
    let applied: Vec<Value> = srv.get("/corrections?applied=true").await.json().await.unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0]["description"], "reiniciar worker");

    srv.post(
        "/improvements",
        json!({"tipo": "otimizacao", "titulo": "Cache de TTS", "descricao": "d", "prioridade": "baixa"}),
    )
    .await;
    srv.post(
        "/improvements",
        json!({"kind": "fix", "title": "Timeout Slack", "description": "d", "priority": "high"}),
    )
    .await;
    let listed: Vec<Value> = srv.get("/improvements").await.json().await.unwrap();
    assert_eq!(listed[0]["title"], "Timeout Slack");
    let low: Vec<Value> = srv.get("/improvements?priority=low").await.json().await.unwrap();
    assert_eq!(low.len(), 1);
}

#[tokio::test]
async fn status_counts_every_collection() {
    let srv = TestServer::start().await;
    srv.post("/tasks", json!({"title": "a", "description": "d"})).await;
    srv.post("/tasks", json!({"title": "b", "description": "d", "state": "in_progress"}))
        .await;
    srv.post("/diagnostics", json!({"kind": "agent", "description": "x", "severity": "error"}))
        .await;
    srv.post("/corrections", json!({"description": "y", "applied": true}))
        .await;

    let status: Value = srv.get("/status").await.json().await.unwrap();
    assert_eq!(status["tasks"]["total"], 2);
    assert_eq!(status["tasks"]["by_state"]["in_progress"], 1);
    assert_eq!(status["diagnostics"]["by_severity"]["error"], 1);
    assert_eq!(status["corrections"]["done"], 1);
    assert_eq!(status["improvements"]["total"], 0);
}

#[tokio::test]
async fn orchestrator_proxy_reports_unreachable_dashboard() {
    let srv = TestServer::start().await;

    let resp = srv.get("/orchestrator/cycles").await;
    assert_eq!(resp.status().as_u16(), 502);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let resp = srv.post("/orchestrator/execute-cycle", json!({})).await;
    assert_eq!(resp.status().as_u16(), 502);
}

#[tokio::test]
async fn portuguese_paths_reach_the_same_collections() {
    let srv = TestServer::start().await;

    let resp = srv
        .post("/tarefas", json!({"titulo": "Revisar pneus", "descricao": "Frota 3"}))
        .await;
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let listed: Vec<Value> = srv.get("/tasks").await.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    let fetched: Value = srv.get(&format!("/tarefa/{id}")).await.json().await.unwrap();
    assert_eq!(fetched["title"], "Revisar pneus");

    srv.post("/diagnostico", json!({"kind": "agent", "description": "x", "severity": "info"}))
        .await;
    srv.post("/correcao", json!({"description": "y"})).await;
    srv.post(
        "/sugestao",
        json!({"kind": "fix", "title": "t", "description": "d", "priority": "low"}),
    )
    .await;
    for path in ["/diagnosticos", "/correcoes", "/sugestoes"] {
        let listed: Vec<Value> = srv.get(path).await.json().await.unwrap();
        assert_eq!(listed.len(), 1, "{path}");
    }

    let resp = srv.get("/orquestrador/ciclos").await;
    assert_eq!(resp.status().as_u16(), 502);
    let resp = srv.post("/orquestrador/executar-ciclo", json!({})).await;
    assert_eq!(resp.status().as_u16(), 502);
}
