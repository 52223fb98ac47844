use crate::azure::error::{ApiError, ApiResult};
use crate::azure::types::*;
use crate::azure::Backend;
use crate::config::BackendConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const WORK_ITEMS_ENDPOINT: &str = "/api/getAzureDevOps";
pub const SAVE_ENDPOINT: &str = "/api/saveAzureDevOps";

/// JSON-over-HTTP client for the Azure DevOps integration backend
pub struct BackendClient {
    base_url: String,
    requirements_endpoint: String,
    auth_token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            requirements_endpoint: config.requirements_endpoint.clone(),
            auth_token: config.auth_token.clone(),
            timeout_secs: config.api_timeout,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// POST a JSON body and hand back the status with the raw response bytes
    async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> ApiResult<(u16, Vec<u8>)> {
        let mut request = self.client.post(self.url(endpoint)).json(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let timeout = Duration::from_secs(self.timeout_secs);
        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes.to_vec()))
        };

        let (status, bytes) = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| ApiError::Timeout(self.timeout_secs))??;

        tracing::debug!(endpoint, status, bytes = bytes.len(), "backend response");
        Ok((status, bytes))
    }

    /// POST and decode a JSON body, failing on any non-2xx status
    async fn fetch<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, bytes) = self.post(endpoint, body).await?;
        check_status(endpoint, status)?;
        decode(endpoint, &bytes)
    }
}

fn check_status(endpoint: &str, status: u16) -> ApiResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status,
        })
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(bytes).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Outcome status: JSON `statusCode` when the body carries one, HTTP status otherwise
fn save_status(http_status: u16, bytes: &[u8]) -> u16 {
    serde_json::from_slice::<SaveResponse>(bytes)
        .ok()
        .and_then(|r| r.status_code)
        .unwrap_or(http_status)
}

#[async_trait]
impl Backend for BackendClient {
    async fn get_work_items(&self, user_id: &str) -> ApiResult<Vec<WorkItem>> {
        let query = WorkItemsQuery {
            user_id: user_id.to_string(),
        };
        let (status, bytes) = self.post(WORK_ITEMS_ENDPOINT, &query).await?;
        check_status(WORK_ITEMS_ENDPOINT, status)?;

        // An empty or null body means no items
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let response: Option<WorkItemsResponse> = decode(WORK_ITEMS_ENDPOINT, &bytes)?;
        Ok(response.unwrap_or_default().into_items())
    }

    async fn save_import(&self, request: &ImportRequest) -> ApiResult<SaveOutcome> {
        let (status, bytes) = self.post(SAVE_ENDPOINT, request).await?;
        Ok(SaveOutcome {
            status: save_status(status, &bytes),
        })
    }

    async fn get_project_requirements(&self, user_id: &str, org_id: &str) -> ApiResult<Vec<Project>> {
        let query = RequirementsQuery {
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
        };
        let response: ProjectsResponse = self.fetch(&self.requirements_endpoint, &query).await?;
        Ok(response.into_projects())
    }
}
