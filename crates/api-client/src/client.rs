use std::time::Duration;

use serde::Serialize;

use jarvis_api::{CycleResult, NewTask, OrchestratorStatus, StatusSummary, Task};

use crate::error::{ClientError, parse_response};

fn build_http(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Typed client for the management API (`jarvis-ops`).
#[derive(Clone)]
pub struct OpsClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self::with_client(build_http(timeout)?, base_url))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> Result<StatusSummary, ClientError> {
        let resp = self.client.get(self.url("/status")).send().await?;
        parse_response(resp).await
    }

    /// `GET /tasks`, forwarding the caller's filter unchanged.
    pub async fn list_tasks<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Vec<Task>, ClientError> {
        let resp = self
            .client
            .get(self.url("/tasks"))
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        let resp = self
            .client
            .post(self.url("/tasks"))
            .json(task)
            .send()
            .await?;
        parse_response(resp).await
    }
}

/// Client for the dashboard server's orchestrator, used by `jarvis-ops`.
#[derive(Clone)]
pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_http(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn orchestrator_status(&self) -> Result<OrchestratorStatus, ClientError> {
        let resp = self
            .client
            .get(self.url("/system-orchestrator/status"))
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn execute_cycle(&self) -> Result<CycleResult, ClientError> {
        let resp = self
            .client
            .post(self.url("/system-orchestrator/execute-cycle"))
            .send()
            .await?;
        parse_response(resp).await
    }
}
