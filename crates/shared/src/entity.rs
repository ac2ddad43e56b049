use serde::{Deserialize, Serialize};

use crate::error::EntityKind;

/// Cluster scope. Never searched by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
}

impl Cluster {
    /// `current` is how the quota service spells "the cluster of my token".
    pub const CURRENT: &'static str = "current";

    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for Cluster {
    fn default() -> Self {
        Self::new(Self::CURRENT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub domain_id: String,
    /// Not part of identity responses; filled in by the resolver.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain_name: String,
}

impl Project {
    /// Placeholder used to list all projects of `domain`.
    pub fn in_domain(domain: &Domain) -> Self {
        Self {
            domain_id: domain.id.clone(),
            domain_name: domain.name.clone(),
            ..Self::default()
        }
    }
}

/// The fixed set of entity kinds a task can operate on.
///
/// Listing uses the same variants: a `Project` built with [`Project::in_domain`]
/// lists every project of that domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Cluster(Cluster),
    Domain(Domain),
    Project(Project),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Cluster(_) => EntityKind::Cluster,
            Entity::Domain(_) => EntityKind::Domain,
            Entity::Project(_) => EntityKind::Project,
        }
    }

    /// The single entity itself.
    pub fn target(&self) -> EntityRef {
        match self {
            Entity::Cluster(c) => EntityRef::Cluster(c.id.clone()),
            Entity::Domain(d) => EntityRef::Domain(d.id.clone()),
            Entity::Project(p) => EntityRef::Project {
                domain_id: p.domain_id.clone(),
                project_id: p.id.clone(),
            },
        }
    }

    /// The collection this entity belongs to.
    pub fn collection(&self) -> EntityRef {
        match self {
            Entity::Cluster(_) => EntityRef::Clusters,
            Entity::Domain(_) => EntityRef::Domains,
            Entity::Project(p) => EntityRef::Projects {
                domain_id: p.domain_id.clone(),
            },
        }
    }
}

/// Query qualifiers attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub cluster: Option<String>,
    pub area: Option<String>,
    pub service: Option<String>,
    pub resource: Option<String>,
}

impl Filter {
    /// Query parameters in the order the quota service documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(area) = &self.area {
            pairs.push(("area", area.as_str()));
        }
        if let Some(service) = &self.service {
            pairs.push(("service", service.as_str()));
        }
        if let Some(resource) = &self.resource {
            pairs.push(("resource", resource.as_str()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Show names instead of identifiers.
    pub names: bool,
    pub long: bool,
    pub human_readable: bool,
}

/// Addresses one entity or one collection at the quota service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Clusters,
    Cluster(String),
    Domains,
    Domain(String),
    Projects { domain_id: String },
    Project { domain_id: String, project_id: String },
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Clusters | EntityRef::Cluster(_) => EntityKind::Cluster,
            EntityRef::Domains | EntityRef::Domain(_) => EntityKind::Domain,
            EntityRef::Projects { .. } | EntityRef::Project { .. } => EntityKind::Project,
        }
    }

    /// Path below the quota service's `/v1` root.
    pub fn path(&self) -> String {
        match self {
            EntityRef::Clusters => "clusters".to_string(),
            EntityRef::Cluster(id) => format!("clusters/{id}"),
            EntityRef::Domains => "domains".to_string(),
            EntityRef::Domain(id) => format!("domains/{id}"),
            EntityRef::Projects { domain_id } => format!("domains/{domain_id}/projects"),
            EntityRef::Project {
                domain_id,
                project_id,
            } => format!("domains/{domain_id}/projects/{project_id}"),
        }
    }
}
