//! JARVIS management API: task tracking, diagnostics, corrections and
//! improvement suggestions, each persisted as a JSON file.

mod error;
mod routes;
pub mod store;

use axum::{
    Router,
    extract::FromRef,
    routing::{MethodRouter, get, post},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use jarvis_api_client::DashboardClient;
use jarvis_core::ops::{Correction, Diagnostic, Improvement, Task};

use store::JsonStore;

/// Record collections, one file each under the data directory.
#[derive(Clone)]
pub struct Stores {
    pub tasks: Arc<JsonStore<Task>>,
    pub diagnostics: Arc<JsonStore<Diagnostic>>,
    pub corrections: Arc<JsonStore<Correction>>,
    pub improvements: Arc<JsonStore<Improvement>>,
}

impl Stores {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            tasks: Arc::new(JsonStore::new(data_dir.join("tasks.json"))),
            diagnostics: Arc::new(JsonStore::new(data_dir.join("diagnostics.json"))),
            corrections: Arc::new(JsonStore::new(data_dir.join("corrections.json"))),
            improvements: Arc::new(JsonStore::new(data_dir.join("improvements.json"))),
        }
    }
}

#[derive(Clone)]
pub struct OpsState {
    pub stores: Stores,
    pub dashboard: DashboardClient,
}

impl FromRef<OpsState> for Stores {
    fn from_ref(state: &OpsState) -> Self {
        state.stores.clone()
    }
}

impl FromRef<OpsState> for DashboardClient {
    fn from_ref(state: &OpsState) -> Self {
        state.dashboard.clone()
    }
}

impl OpsState {
    pub fn new(data_dir: &Path, orchestrator_url: &str) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        tracing::info!("data directory: {}", data_dir.display());
        Ok(Self {
            stores: Stores::open(data_dir),
            dashboard: DashboardClient::new(orchestrator_url, Duration::from_secs(10))?,
        })
    }
}

/// Register `method_router` under every path in `paths`.
fn route_aliases(
    router: Router<OpsState>,
    paths: &[&str],
    method_router: MethodRouter<OpsState>,
) -> Router<OpsState> {
    paths
        .iter()
        .fold(router, |router, path| router.route(path, method_router.clone()))
}

pub fn app(state: OpsState) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::status::banner))
        .route("/status", get(routes::status::status));

    // Each collection also answers on its Portuguese path.
    router = route_aliases(
        router,
        &["/tasks", "/tarefas", "/tarefa"],
        get(routes::tasks::list_tasks).post(routes::tasks::create_task),
    );
    router = route_aliases(
        router,
        &["/tasks/{id}", "/tarefas/{id}", "/tarefa/{id}"],
        get(routes::tasks::get_task).patch(routes::tasks::patch_task),
    );
    router = route_aliases(
        router,
        &["/diagnostics", "/diagnosticos", "/diagnostico"],
        get(routes::records::list_diagnostics).post(routes::records::create_diagnostic),
    );
    router = route_aliases(
        router,
        &["/corrections", "/correcoes", "/correcao"],
        get(routes::records::list_corrections).post(routes::records::create_correction),
    );
    router = route_aliases(
        router,
        &["/improvements", "/sugestoes", "/sugestao"],
        get(routes::records::list_improvements).post(routes::records::create_improvement),
    );
    router = route_aliases(
        router,
        &["/orchestrator/cycles", "/orquestrador/ciclos"],
        get(routes::orchestrator::cycles),
    );
    router = route_aliases(
        router,
        &["/orchestrator/execute-cycle", "/orquestrador/executar-ciclo"],
        post(routes::orchestrator::execute_cycle),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
