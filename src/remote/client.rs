use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use super::{Coordinator, RemoteError, ReportStatus, WorkItem};

const USER_AGENT: &str = concat!("memebox/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of the coordinator protocol.
///
/// Every call is a JSON POST carrying the shared api key; the
/// coordinator authenticates on the body, not on headers.
pub struct HttpCoordinator {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpCoordinator {
    pub fn new(
        base_url: String,
        api_key: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Shared client so image fetches reuse the same connection pool
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    async fn report(&self, endpoint: &str, id: i64, hash: &str) -> ReportStatus {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        let body = json!({ "id": id, "hash": hash, "apiKey": self.api_key });

        match self.client.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(id, endpoint, "Report delivered");
                ReportStatus::Delivered
            }
            Ok(response) => {
                warn!(id, endpoint, status = %response.status(), "Report rejected by coordinator");
                ReportStatus::Undelivered
            }
            Err(e) => {
                warn!(id, endpoint, error = %e, "Report failed to send");
                ReportStatus::Undelivered
            }
        }
    }
}

#[async_trait]
impl Coordinator for HttpCoordinator {
    async fn fetch_batch(&self) -> Result<Vec<WorkItem>, RemoteError> {
        let url = format!("{}/api/new-records", self.base_url);
        let body = json!({ "apiKey": self.api_key });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RemoteError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        let items: Vec<WorkItem> = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        debug!(count = items.len(), "Fetched work batch");
        Ok(items)
    }

    async fn report_done(&self, id: i64, hash: &str) -> ReportStatus {
        self.report("mark-complete", id, hash).await
    }

    async fn report_failed(&self, id: i64, hash: &str) -> ReportStatus {
        self.report("mark-failed", id, hash).await
    }
}
