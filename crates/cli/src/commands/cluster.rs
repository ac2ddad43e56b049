use anyhow::{Context, Result};
use quotactl_shared::{Cluster, Entity, Filter, Task};

use crate::cli::ClusterCommand;
use crate::client::HttpClient;
use crate::output;

pub async fn run(client: &HttpClient, cmd: ClusterCommand) -> Result<()> {
    let out = std::io::stdout().lock();
    match cmd {
        ClusterCommand::List { filter, output } => {
            let task = Task::new(Entity::Cluster(Cluster::default()))
                .with_filter(filter.into())
                .with_output(output.options());
            super::list(client, &task, output.format(), "cluster", out).await
        }
        ClusterCommand::Show { id, filter, output } => {
            let cluster = id.map(Cluster::new).unwrap_or_default();
            let task = Task::new(Entity::Cluster(cluster))
                .with_filter(filter.into())
                .with_output(output.options());
            super::show(client, &task, output.format(), "cluster", out).await
        }
        ClusterCommand::Set { args, scope } => {
            let (cluster, assignments) = split_args(&args);
            set(client, cluster, assignments, scope.into(), out).await
        }
    }
}

/// `set` takes an optional cluster ID before the assignments; only assignments contain `=`.
fn split_args(args: &[String]) -> (Cluster, &[String]) {
    match args.split_first() {
        Some((first, rest)) if !first.contains('=') => (Cluster::new(first.as_str()), rest),
        _ => (Cluster::default(), args),
    }
}

async fn set<W: std::io::Write>(
    client: &HttpClient,
    cluster: Cluster,
    assignments: &[String],
    filter: Filter,
    out: W,
) -> Result<()> {
    if assignments.is_empty() {
        anyhow::bail!("no capacities given for cluster {}", cluster.id);
    }
    let quotas = super::parse_assignments(assignments)?;
    let id = cluster.id.clone();
    let task = Task::new(Entity::Cluster(cluster)).with_filter(filter);

    let sp = output::spinner(&format!("Updating cluster {id}..."));
    let res = task.set(client, &quotas, out).await;
    sp.finish_and_clear();
    res.context("could not set cluster capacity")?;

    output::done(&format!("cluster {id} updated"));
    Ok(())
}
