use serde_json::{json, Value};
use std::str::FromStr;

use crate::error::{EntityKind, QuotaError};
use crate::unit::Unit;

/// A single resource value to push to the quota service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub value: i64,
    pub unit: Unit,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceQuotas {
    pub service: String,
    pub resources: Vec<Resource>,
}

/// Service name to resources, in the order they were first given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quotas {
    services: Vec<ServiceQuotas>,
}

impl Quotas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignments<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (String, Resource)>,
    {
        let mut quotas = Self::new();
        for (service, resource) in assignments {
            quotas.push(service, resource);
        }
        quotas
    }

    pub fn push(&mut self, service: String, resource: Resource) {
        match self.services.iter_mut().find(|s| s.service == service) {
            Some(entry) => entry.resources.push(resource),
            None => self.services.push(ServiceQuotas {
                service,
                resources: vec![resource],
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceQuotas> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Request body for an update of the given entity kind.
    ///
    /// Clusters carry capacities (with an optional comment), domains and projects carry quotas.
    pub fn to_payload(&self, kind: EntityKind) -> Value {
        let services: Vec<Value> = self
            .iter()
            .map(|s| {
                let resources: Vec<Value> = s
                    .resources
                    .iter()
                    .map(|r| match kind {
                        EntityKind::Cluster => {
                            let mut obj = json!({
                                "name": r.name,
                                "capacity": r.value,
                                "unit": r.unit,
                            });
                            if let Some(comment) = &r.comment {
                                obj["comment"] = json!(comment);
                            }
                            obj
                        }
                        EntityKind::Domain | EntityKind::Project => json!({
                            "name": r.name,
                            "quota": r.value,
                            "unit": r.unit,
                        }),
                    })
                    .collect();
                json!({ "type": s.service, "resources": resources })
            })
            .collect();

        let mut root = serde_json::Map::new();
        root.insert(kind.to_string(), json!({ "services": services }));
        Value::Object(root)
    }
}

/// One `service/resource=value[unit][:comment]` argument from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaAssignment {
    pub service: String,
    pub resource: Resource,
}

impl FromStr for QuotaAssignment {
    type Err = QuotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            QuotaError::InvalidInput(format!(
                "{reason} in {s:?}, expected service/resource=value[unit][:comment]"
            ))
        };

        let (path, rhs) = s.split_once('=').ok_or_else(|| invalid("missing '='"))?;
        let (service, name) = path
            .split_once('/')
            .ok_or_else(|| invalid("missing '/'"))?;
        let (service, name) = (service.trim(), name.trim());
        if service.is_empty() || name.is_empty() {
            return Err(invalid("empty service or resource name"));
        }

        let (value_part, comment) = match rhs.split_once(':') {
            Some((v, c)) => (v, Some(c.trim().to_string()).filter(|c| !c.is_empty())),
            None => (rhs, None),
        };
        let value_part = value_part.trim();
        let digits_end = value_part
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value_part.len());
        if digits_end == 0 {
            return Err(invalid("missing numeric value"));
        }
        let value: i64 = value_part[..digits_end]
            .parse()
            .map_err(|_| invalid("value out of range"))?;
        let unit: Unit = value_part[digits_end..].parse()?;

        Ok(Self {
            service: service.to_string(),
            resource: Resource {
                name: name.to_string(),
                value,
                unit,
                comment,
            },
        })
    }
}

impl FromIterator<QuotaAssignment> for Quotas {
    fn from_iter<T: IntoIterator<Item = QuotaAssignment>>(iter: T) -> Self {
        Self::from_assignments(iter.into_iter().map(|a| (a.service, a.resource)))
    }
}
