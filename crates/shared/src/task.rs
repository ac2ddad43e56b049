use std::io::Write;
use tracing::debug;

use crate::entity::{Entity, Filter, OutputOptions, Project};
use crate::error::{EntityKind, QuotaError, QuotaResult};
use crate::quota::Quotas;
use crate::render::{Renderer, Report};
use crate::service::QuotaService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Csv,
    #[default]
    Table,
}

impl OutputFormat {
    /// `json` and `csv` select those formats; anything else, including nothing, means table.
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("json") => OutputFormat::Json,
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

/// One operation against one entity (or its collection).
#[derive(Debug, Clone)]
pub struct Task {
    pub entity: Entity,
    pub filter: Filter,
    pub output: OutputOptions,
}

impl Task {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            filter: Filter::default(),
            output: OutputOptions::default(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub async fn get(&self, quota: &dyn QuotaService) -> QuotaResult<Report> {
        let target = self.entity.target();
        debug!(path = %target.path(), "get");
        let body = quota.fetch(&target, &self.filter).await?;
        Ok(self.report(body))
    }

    pub async fn list(&self, quota: &dyn QuotaService) -> QuotaResult<Report> {
        let target = self.entity.collection();
        debug!(path = %target.path(), "list");
        let body = quota.fetch(&target, &self.filter).await?;
        Ok(self.report(body))
    }

    /// Push `quotas`. A project update may answer with warnings, which go to `out` verbatim.
    pub async fn set<W: Write>(
        &self,
        quota: &dyn QuotaService,
        quotas: &Quotas,
        mut out: W,
    ) -> QuotaResult<()> {
        if quotas.is_empty() {
            return Err(QuotaError::InvalidInput("no quota values given".to_string()));
        }
        let target = self.entity.target();
        debug!(path = %target.path(), services = quotas.len(), "set");
        let response = quota.update(&target, &self.filter, quotas).await?;

        if self.entity.kind() == EntityKind::Project && !response.is_empty() {
            out.write_all(&response)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn report(&self, body: serde_json::Value) -> Report {
        Report {
            entity: self.entity.clone(),
            output: self.output,
            body,
        }
    }
}

/// Render `report` completely, then write it to `out` in one go.
pub fn write_report<R: Renderer, W: Write>(report: &R, format: OutputFormat, mut out: W) -> QuotaResult<()> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Json => {
            buf = report.render_json()?;
            buf.push(b'\n');
        }
        OutputFormat::Csv => report.render_rows()?.write_csv(&mut buf)?,
        OutputFormat::Table => report.render_rows()?.write_table(&mut buf)?,
    }
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}

pub async fn run_get<W: Write>(
    task: &Task,
    quota: &dyn QuotaService,
    format: OutputFormat,
    out: W,
) -> QuotaResult<()> {
    let report = task.get(quota).await?;
    write_report(&report, format, out)
}

pub async fn run_list<W: Write>(
    task: &Task,
    quota: &dyn QuotaService,
    format: OutputFormat,
    out: W,
) -> QuotaResult<()> {
    let report = task.list(quota).await?;
    write_report(&report, format, out)
}

/// Schedule a sync of the project's quota and usage data. Returns once the job is accepted.
pub async fn run_sync(quota: &dyn QuotaService, project: &Project, filter: &Filter) -> QuotaResult<()> {
    debug!(domain = %project.domain_id, project = %project.id, "sync");
    quota
        .sync_project(&project.domain_id, &project.id, filter)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Cluster, Domain, EntityRef};
    use crate::quota::QuotaAssignment;
    use crate::test_utils::FakeQuota;
    use serde_json::json;

    fn project() -> Project {
        Project {
            id: "p-1111".to_string(),
            name: "myproject".to_string(),
            domain_id: "d-1111".to_string(),
            domain_name: "mydomain".to_string(),
        }
    }

    fn project_body() -> serde_json::Value {
        json!({
            "project": {
                "id": "p-1111",
                "name": "myproject",
                "services": [
                    {"type": "compute", "area": "compute", "resources": [
                        {"name": "cores", "quota": 10, "usage": 4}
                    ]}
                ]
            }
        })
    }

    fn quotas() -> Quotas {
        ["compute/cores=20", "compute/ram=8GiB"]
            .iter()
            .map(|s| s.parse::<QuotaAssignment>().unwrap())
            .collect()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::parse(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse(Some("yaml")), OutputFormat::Table);
        assert_eq!(OutputFormat::parse(None), OutputFormat::Table);
    }

    #[tokio::test]
    async fn test_get_fetches_single_project() {
        let quota = FakeQuota::with_body(project_body());
        let task = Task::new(Entity::Project(project()));

        let mut out = Vec::new();
        run_get(&task, &quota, OutputFormat::Csv, &mut out).await.unwrap();

        assert_eq!(
            *quota.fetched.lock().unwrap(),
            vec![EntityRef::Project {
                domain_id: "d-1111".to_string(),
                project_id: "p-1111".to_string()
            }]
        );
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "domain id,project id,area,service,category,resource,quota,usage,unit\n\
             d-1111,p-1111,compute,compute,,cores,10,4,\n"
        );
    }

    #[tokio::test]
    async fn test_get_json_is_body() {
        let quota = FakeQuota::with_body(project_body());
        let task = Task::new(Entity::Project(project()));

        let mut out = Vec::new();
        run_get(&task, &quota, OutputFormat::Json, &mut out).await.unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, project_body());
    }

    #[tokio::test]
    async fn test_list_uses_collection() {
        let body = json!({"clusters": [{"id": "west", "services": []}, {"id": "east", "services": []}]});
        let quota = FakeQuota::with_body(body);
        let task = Task::new(Entity::Cluster(Cluster::default()));

        let report = task.list(&quota).await.unwrap();

        assert_eq!(*quota.fetched.lock().unwrap(), vec![EntityRef::Clusters]);
        // clusters without services produce no rows, only a header
        assert!(report.render_rows().unwrap().rows.is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_writes_nothing() {
        let quota = FakeQuota {
            fail: true,
            ..FakeQuota::default()
        };
        let task = Task::new(Entity::Domain(Domain::default()));

        let mut out = Vec::new();
        let err = run_list(&task, &quota, OutputFormat::Table, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, QuotaError::Remote(_)));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_writes_nothing() {
        let quota = FakeQuota::with_body(json!({"unexpected": true}));
        let task = Task::new(Entity::Domain(Domain::default()));

        let mut out = Vec::new();
        let err = run_list(&task, &quota, OutputFormat::Csv, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, QuotaError::Serialization(_)));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_project_set_prints_response_body() {
        let quota = FakeQuota {
            update_response: b"cannot change compute/ram: quota exceeds domain quota".to_vec(),
            ..FakeQuota::default()
        };
        let task = Task::new(Entity::Project(project()));

        let mut out = Vec::new();
        task.set(&quota, &quotas(), &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "cannot change compute/ram: quota exceeds domain quota\n"
        );
        let updates = quota.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates[0].1["project"]["services"][0]["resources"][1],
            json!({"name": "ram", "quota": 8, "unit": "GiB"})
        );
    }

    #[tokio::test]
    async fn test_project_set_empty_response_prints_nothing() {
        let quota = FakeQuota::default();
        let task = Task::new(Entity::Project(project()));

        let mut out = Vec::new();
        task.set(&quota, &quotas(), &mut out).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_cluster_set_ignores_response_body() {
        let quota = FakeQuota {
            update_response: b"ignored".to_vec(),
            ..FakeQuota::default()
        };
        let task = Task::new(Entity::Cluster(Cluster::new("west")));

        let mut out = Vec::new();
        task.set(&quota, &quotas(), &mut out).await.unwrap();

        assert!(out.is_empty());
        let updates = quota.updates.lock().unwrap();
        assert_eq!(updates[0].0, EntityRef::Cluster("west".to_string()));
        assert!(updates[0].1["cluster"]["services"][0]["resources"][0]
            .get("capacity")
            .is_some());
    }

    #[tokio::test]
    async fn test_set_without_values_sends_nothing() {
        let quota = FakeQuota::default();
        let task = Task::new(Entity::Domain(Domain::default()));

        let err = task.set(&quota, &Quotas::new(), Vec::new()).await.unwrap_err();

        assert!(matches!(err, QuotaError::InvalidInput(_)));
        assert!(quota.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sync_passes_cluster_filter() {
        let quota = FakeQuota::default();
        let filter = Filter {
            cluster: Some("west".to_string()),
            ..Filter::default()
        };

        run_sync(&quota, &project(), &filter).await.unwrap();

        assert_eq!(
            *quota.syncs.lock().unwrap(),
            vec![(
                "d-1111".to_string(),
                "p-1111".to_string(),
                Some("west".to_string())
            )]
        );
    }
}
