use async_trait::async_trait;
use serde_json::Value;

use crate::entity::{Domain, EntityRef, Filter, Project};
use crate::error::QuotaResult;
use crate::quota::Quotas;

/// Lookups against the identity service.
///
/// `get_*` must return `QuotaError::NotFound` when the id does not exist.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn get_domain(&self, id: &str) -> QuotaResult<Domain>;
    async fn list_domains(&self, name: &str) -> QuotaResult<Vec<Domain>>;
    /// The returned project has an empty `domain_name`.
    async fn get_project(&self, id: &str) -> QuotaResult<Project>;
    async fn list_projects(&self, name: &str, domain_id: Option<&str>) -> QuotaResult<Vec<Project>>;
}

/// Reads and writes against the quota service. Results are raw response bodies.
#[async_trait]
pub trait QuotaService: Send + Sync {
    async fn fetch(&self, target: &EntityRef, filter: &Filter) -> QuotaResult<Value>;
    /// Returns the response body, which is empty unless the service had something to say.
    async fn update(&self, target: &EntityRef, filter: &Filter, quotas: &Quotas) -> QuotaResult<Vec<u8>>;
    /// Schedules a sync job. Completion is not tracked.
    async fn sync_project(&self, domain_id: &str, project_id: &str, filter: &Filter) -> QuotaResult<()>;
}
