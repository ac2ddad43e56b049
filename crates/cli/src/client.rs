use async_trait::async_trait;
use quotactl_shared::{
    Domain, EntityKind, EntityRef, Filter, IdentityService, Project, QuotaError, QuotaResult,
    QuotaService, Quotas,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::CliConfig;

const CLUSTER_HEADER: &str = "X-Limes-Cluster-Id";

/// HTTP client for both the identity service and the quota service.
pub struct HttpClient {
    client: Client,
    identity_url: String,
    quota_url: String,
    token: Option<String>,
}

fn remote(err: reqwest::Error) -> QuotaError {
    QuotaError::Remote(err.to_string())
}

impl HttpClient {
    pub fn new(config: &CliConfig) -> Self {
        // OS_AUTH_URL usually carries the API version already
        let identity_url = config.identity_url.trim_end_matches('/');
        let identity_url = identity_url.strip_suffix("/v3").unwrap_or(identity_url);
        Self {
            client: Client::new(),
            identity_url: identity_url.to_string(),
            quota_url: config.quota_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn identity(&self, path: &str) -> String {
        format!("{}/v3/{path}", self.identity_url)
    }

    /// `{identity}/v3/{collection}/{id}` with `id` escaped as a single path segment.
    fn identity_entity(&self, collection: &str, id: &str) -> QuotaResult<Url> {
        let base = self.identity(collection);
        let mut url = Url::parse(&base)
            .map_err(|e| QuotaError::InvalidInput(format!("invalid identity URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| QuotaError::InvalidInput(format!("invalid identity URL {base}")))?
            .push(id);
        Ok(url)
    }

    fn quota(&self, target: &EntityRef) -> String {
        format!("{}/v1/{}", self.quota_url, target.path())
    }

    fn add_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.header("X-Auth-Token", token),
            None => req,
        }
    }

    fn scoped(&self, req: RequestBuilder, filter: &Filter) -> RequestBuilder {
        let req = self.add_auth(req);
        match &filter.cluster {
            Some(cluster) => req.header(CLUSTER_HEADER, cluster),
            None => req,
        }
    }

    /// Send `req`, turning transport failures and non-2xx answers into `Remote` errors.
    async fn send(&self, req: RequestBuilder) -> QuotaResult<Response> {
        let resp = req.send().await.map_err(remote)?;
        debug!(url = %resp.url(), status = %resp.status(), "response");
        error_for_status(resp).await
    }

    /// GET `{"<key>": {...}}` from the identity service, mapping 404 to `NotFound`.
    async fn identity_get<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> QuotaResult<T> {
        let key = kind.to_string();
        let url = self.identity_entity(&format!("{key}s"), id)?;
        let req = self.add_auth(self.client.get(url));
        let resp = req.send().await.map_err(remote)?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(QuotaError::NotFound {
                kind,
                input: id.to_string(),
            });
        }
        let body: Value = error_for_status(resp).await?.json().await.map_err(remote)?;
        unwrap_key(body, &key)
    }

    /// GET `{"<key>s": [...]}` from the identity service.
    async fn identity_list<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        query: &[(&str, &str)],
    ) -> QuotaResult<Vec<T>> {
        let key = format!("{kind}s");
        let req = self.add_auth(self.client.get(self.identity(&key)).query(query));
        let body: Value = self.send(req).await?.json().await.map_err(remote)?;
        unwrap_key(body, &key)
    }
}

async fn error_for_status(resp: Response) -> QuotaResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(QuotaError::Remote(format!("{status}: {}", body.trim())))
}

/// Identity responses wrap their payload in a single key named after the entity.
fn unwrap_key<T: DeserializeOwned>(mut body: Value, key: &str) -> QuotaResult<T> {
    let inner = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| QuotaError::Serialization(format!("response has no \"{key}\" key")))?;
    Ok(serde_json::from_value(inner)?)
}

#[async_trait]
impl IdentityService for HttpClient {
    async fn get_domain(&self, id: &str) -> QuotaResult<Domain> {
        self.identity_get(EntityKind::Domain, id).await
    }

    async fn list_domains(&self, name: &str) -> QuotaResult<Vec<Domain>> {
        self.identity_list(EntityKind::Domain, &[("name", name)]).await
    }

    async fn get_project(&self, id: &str) -> QuotaResult<Project> {
        self.identity_get(EntityKind::Project, id).await
    }

    async fn list_projects(&self, name: &str, domain_id: Option<&str>) -> QuotaResult<Vec<Project>> {
        let mut query = vec![("name", name)];
        if let Some(domain_id) = domain_id {
            query.push(("domain_id", domain_id));
        }
        self.identity_list(EntityKind::Project, &query).await
    }
}

#[async_trait]
impl QuotaService for HttpClient {
    async fn fetch(&self, target: &EntityRef, filter: &Filter) -> QuotaResult<Value> {
        let req = self
            .client
            .get(self.quota(target))
            .query(&filter.query_pairs());
        let resp = self.send(self.scoped(req, filter)).await?;
        resp.json().await.map_err(remote)
    }

    async fn update(&self, target: &EntityRef, filter: &Filter, quotas: &Quotas) -> QuotaResult<Vec<u8>> {
        let payload = quotas.to_payload(target.kind());
        debug!(%payload, "update payload");
        let req = self.client.put(self.quota(target)).json(&payload);
        let resp = self.send(self.scoped(req, filter)).await?;
        let body = resp.bytes().await.map_err(remote)?;
        Ok(body.to_vec())
    }

    async fn sync_project(&self, domain_id: &str, project_id: &str, filter: &Filter) -> QuotaResult<()> {
        let target = EntityRef::Project {
            domain_id: domain_id.to_string(),
            project_id: project_id.to_string(),
        };
        let url = format!("{}/sync", self.quota(&target));
        self.send(self.scoped(self.client.post(url), filter)).await?;
        Ok(())
    }
}
