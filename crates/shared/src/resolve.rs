//! Turns user input (a name or an id) into a canonical domain or project.
//!
//! An id lookup that succeeds is trusted as-is; no attempt is made to detect input
//! that happens to be a valid id of some other entity. Any failed id lookup falls
//! back to a search by name.

use tracing::debug;

use crate::entity::{Domain, Project};
use crate::error::{EntityKind, QuotaError, QuotaResult};
use crate::service::IdentityService;

/// Exactly one element of `matches`, or the matching resolution error.
fn single<T>(mut matches: Vec<T>, kind: EntityKind, input: &str) -> QuotaResult<T> {
    if matches.len() > 1 {
        return Err(QuotaError::Ambiguous {
            kind,
            input: input.to_string(),
        });
    }
    matches.pop().ok_or_else(|| QuotaError::NotFound {
        kind,
        input: input.to_string(),
    })
}

pub async fn resolve_domain(identity: &dyn IdentityService, input: &str) -> QuotaResult<Domain> {
    match identity.get_domain(input).await {
        Ok(domain) => {
            debug!(id = %domain.id, "domain resolved by id");
            return Ok(domain);
        }
        Err(err) if err.is_not_found() => debug!(input, "no domain with this id, searching by name"),
        Err(err) => debug!(%err, input, "domain id lookup failed, searching by name"),
    }

    let matches = identity.list_domains(input).await?;
    let domain = single(matches, EntityKind::Domain, input)?;
    debug!(id = %domain.id, "domain resolved by name");
    Ok(domain)
}

/// Resolve a project, optionally scoped to a domain (name or id) when searching by name.
///
/// The returned project always has `domain_name` filled in.
pub async fn resolve_project(
    identity: &dyn IdentityService,
    input: &str,
    domain_input: Option<&str>,
) -> QuotaResult<Project> {
    let mut project = match identity.get_project(input).await {
        Ok(project) => {
            debug!(id = %project.id, "project resolved by id");
            project
        }
        Err(err) => {
            if err.is_not_found() {
                debug!(input, "no project with this id, searching by name");
            } else {
                debug!(%err, input, "project id lookup failed, searching by name");
            }
            let scope = match domain_input {
                Some(d) => Some(resolve_domain(identity, d).await?),
                None => None,
            };

            let matches = identity
                .list_projects(input, scope.as_ref().map(|d| d.id.as_str()))
                .await?;
            let mut project = single(matches, EntityKind::Project, input)?;
            if let Some(domain) = scope {
                project.domain_name = domain.name;
            }
            project
        }
    };

    if project.domain_name.is_empty() {
        let domain = identity.get_domain(&project.domain_id).await?;
        project.domain_name = domain.name;
    }

    Ok(project)
}
