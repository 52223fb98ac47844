mod client;
mod error;
pub mod types;

pub use client::{BackendClient, SAVE_ENDPOINT, WORK_ITEMS_ENDPOINT};
pub use error::{ApiError, ApiResult};
pub use types::{ImportRequest, Project, Requirement, SaveOutcome, WorkItem, WorkItemId};

use async_trait::async_trait;

/// The three calls the import view makes against the integration backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Importable work items for a user (`getAzureDevOps`)
    async fn get_work_items(&self, user_id: &str) -> ApiResult<Vec<WorkItem>>;

    /// Import a selection into a project requirement (`saveAzureDevOps`)
    async fn save_import(&self, request: &ImportRequest) -> ApiResult<SaveOutcome>;

    /// Projects with their requirement lists for a user/org
    async fn get_project_requirements(&self, user_id: &str, org_id: &str) -> ApiResult<Vec<Project>>;
}
