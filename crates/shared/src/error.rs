use std::fmt;

/// Which kind of entity a lookup was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Cluster,
    Domain,
    Project,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Cluster => "cluster",
            EntityKind::Domain => "domain",
            EntityKind::Project => "project",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("{kind} not found: {input}")]
    NotFound { kind: EntityKind, input: String },
    #[error("more than one {kind} exists with the name {input}")]
    Ambiguous { kind: EntityKind, input: String },
    #[error("remote service error: {0}")]
    Remote(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuotaError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuotaError::NotFound { .. })
    }
}

impl From<serde_json::Error> for QuotaError {
    fn from(err: serde_json::Error) -> Self {
        QuotaError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for QuotaError {
    fn from(err: csv::Error) -> Self {
        QuotaError::Serialization(err.to_string())
    }
}

pub type QuotaResult<T> = std::result::Result<T, QuotaError>;
