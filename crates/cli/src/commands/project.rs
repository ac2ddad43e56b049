use anyhow::{Context, Result};
use quotactl_shared::{resolve_domain, resolve_project, run_sync, Entity, Filter, Project, Task};
use std::io::Write;

use crate::cli::{OutputArgs, ProjectCommand};
use crate::client::HttpClient;
use crate::config::CliConfig;
use crate::output;

pub async fn run(client: &HttpClient, cmd: ProjectCommand, config: &CliConfig) -> Result<()> {
    let out = std::io::stdout().lock();
    match cmd {
        ProjectCommand::List {
            domain,
            filter,
            output,
        } => {
            let domain = domain.or_else(|| config.domain.clone()).context(
                "no domain given: pass --domain or run `quotactl config set domain <name>`",
            )?;
            list(client, &domain, filter.into(), &output, out).await
        }
        ProjectCommand::Show {
            project,
            domain,
            filter,
            output,
        } => show(client, &project, domain.as_deref(), filter.into(), &output, out).await,
        ProjectCommand::Set {
            project,
            assignments,
            domain,
            scope,
        } => {
            let quotas = super::parse_assignments(&assignments)?;
            let project = resolve_project(client, &project, domain.as_deref())
                .await
                .context("could not set project quota")?;
            let label = label(&project);
            let task = Task::new(Entity::Project(project)).with_filter(scope.into());

            let sp = output::spinner(&format!("Updating project {label}..."));
            let mut buf = Vec::new();
            let res = task.set(client, &quotas, &mut buf).await;
            sp.finish_and_clear();
            res.context("could not set project quota")?;

            let mut out = out;
            out.write_all(&buf)?;
            output::done(&format!("project {label} updated"));
            Ok(())
        }
        ProjectCommand::Sync {
            project,
            domain,
            scope,
        } => {
            let project = resolve_project(client, &project, domain.as_deref())
                .await
                .context("could not sync project")?;
            run_sync(client, &project, &scope.into())
                .await
                .context("could not sync project")?;
            output::done(&format!("sync scheduled for project {}", label(&project)));
            Ok(())
        }
    }
}

fn label(project: &Project) -> String {
    format!("{}/{}", project.domain_name, project.name)
}

async fn list<W: Write>(
    client: &HttpClient,
    domain: &str,
    filter: Filter,
    output: &OutputArgs,
    out: W,
) -> Result<()> {
    let domain = resolve_domain(client, domain)
        .await
        .context("could not list projects")?;
    let task = Task::new(Entity::Project(Project::in_domain(&domain)))
        .with_filter(filter)
        .with_output(output.options());
    super::list(client, &task, output.format(), "project", out).await
}

async fn show<W: Write>(
    client: &HttpClient,
    project: &str,
    domain: Option<&str>,
    filter: Filter,
    output: &OutputArgs,
    out: W,
) -> Result<()> {
    let project = resolve_project(client, project, domain)
        .await
        .context("could not get project")?;
    let task = Task::new(Entity::Project(project))
        .with_filter(filter)
        .with_output(output.options());
    super::show(client, &task, output.format(), "project", out).await
}
