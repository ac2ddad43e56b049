//! In-memory stand-ins for the remote services.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::entity::{Domain, EntityRef, Filter, Project};
use crate::error::{EntityKind, QuotaError, QuotaResult};
use crate::quota::Quotas;
use crate::service::{IdentityService, QuotaService};

#[derive(Default)]
pub struct FakeIdentity {
    domains: Vec<Domain>,
    projects: Vec<Project>,
    fail_lists: bool,
    fail_gets: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, id: &str, name: &str) -> Self {
        self.domains.push(Domain {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_project(mut self, id: &str, name: &str, domain_id: &str) -> Self {
        self.projects.push(Project {
            id: id.to_string(),
            name: name.to_string(),
            domain_id: domain_id.to_string(),
            domain_name: String::new(),
        });
        self
    }

    pub fn failing_lists(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    /// Every id lookup fails with a remote error instead of `NotFound`.
    pub fn failing_gets(mut self) -> Self {
        self.fail_gets = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IdentityService for FakeIdentity {
    async fn get_domain(&self, id: &str) -> QuotaResult<Domain> {
        self.record(format!("get_domain {id}"));
        if self.fail_gets {
            return Err(QuotaError::Remote("500 Internal Server Error".to_string()));
        }
        self.domains
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| QuotaError::NotFound {
                kind: EntityKind::Domain,
                input: id.to_string(),
            })
    }

    async fn list_domains(&self, name: &str) -> QuotaResult<Vec<Domain>> {
        self.record(format!("list_domains {name}"));
        if self.fail_lists {
            return Err(QuotaError::Remote("503 Service Unavailable".to_string()));
        }
        Ok(self.domains.iter().filter(|d| d.name == name).cloned().collect())
    }

    async fn get_project(&self, id: &str) -> QuotaResult<Project> {
        self.record(format!("get_project {id}"));
        if self.fail_gets {
            return Err(QuotaError::Remote("500 Internal Server Error".to_string()));
        }
        self.projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| QuotaError::NotFound {
                kind: EntityKind::Project,
                input: id.to_string(),
            })
    }

    async fn list_projects(&self, name: &str, domain_id: Option<&str>) -> QuotaResult<Vec<Project>> {
        match domain_id {
            Some(d) => self.record(format!("list_projects {name} in {d}")),
            None => self.record(format!("list_projects {name}")),
        }
        if self.fail_lists {
            return Err(QuotaError::Remote("503 Service Unavailable".to_string()));
        }
        Ok(self
            .projects
            .iter()
            .filter(|p| p.name == name && domain_id.is_none_or(|d| p.domain_id == d))
            .cloned()
            .collect())
    }
}

/// Answers every fetch with a canned body and remembers what was asked.
#[derive(Default)]
pub struct FakeQuota {
    pub body: Value,
    pub update_response: Vec<u8>,
    pub fail: bool,
    pub fetched: Mutex<Vec<EntityRef>>,
    pub updates: Mutex<Vec<(EntityRef, Value)>>,
    pub syncs: Mutex<Vec<(String, String, Option<String>)>>,
}

impl FakeQuota {
    pub fn with_body(body: Value) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    fn check(&self) -> QuotaResult<()> {
        if self.fail {
            return Err(QuotaError::Remote("500 Internal Server Error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuotaService for FakeQuota {
    async fn fetch(&self, target: &EntityRef, _filter: &Filter) -> QuotaResult<Value> {
        self.check()?;
        self.fetched.lock().unwrap().push(target.clone());
        Ok(self.body.clone())
    }

    async fn update(&self, target: &EntityRef, _filter: &Filter, quotas: &Quotas) -> QuotaResult<Vec<u8>> {
        self.check()?;
        self.updates
            .lock()
            .unwrap()
            .push((target.clone(), quotas.to_payload(target.kind())));
        Ok(self.update_response.clone())
    }

    async fn sync_project(&self, domain_id: &str, project_id: &str, filter: &Filter) -> QuotaResult<()> {
        self.check()?;
        self.syncs.lock().unwrap().push((
            domain_id.to_string(),
            project_id.to_string(),
            filter.cluster.clone(),
        ));
        Ok(())
    }
}
