pub mod cluster;
pub mod config_cmd;
pub mod domain;
pub mod project;

use anyhow::{Context, Result};
use quotactl_shared::{run_get, run_list, OutputFormat, QuotaAssignment, Quotas, Task};
use std::io::Write;

use crate::cli::*;
use crate::client::HttpClient;
use crate::config::CliConfig;
use crate::output;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = CliConfig::load()?;
    let client = HttpClient::new(&config);

    match cli.command {
        Commands::Cluster(cmd) => cluster::run(&client, cmd).await,
        Commands::Domain(cmd) => domain::run(&client, cmd).await,
        Commands::Project(cmd) => project::run(&client, cmd, &config).await,
        Commands::Config(cmd) => config_cmd::run(cmd, &config),
    }
}

/// Fetch a single entity under a spinner and print it.
pub(crate) async fn show<W: Write>(
    client: &HttpClient,
    task: &Task,
    format: OutputFormat,
    what: &str,
    mut out: W,
) -> Result<()> {
    let sp = output::spinner_for(format, &format!("Fetching {what}..."));
    let mut buf = Vec::new();
    let res = run_get(task, client, format, &mut buf).await;
    output::finish(sp);
    res.with_context(|| format!("could not get {what}"))?;
    out.write_all(&buf)?;
    Ok(())
}

/// Fetch a collection under a spinner and print it.
pub(crate) async fn list<W: Write>(
    client: &HttpClient,
    task: &Task,
    format: OutputFormat,
    what: &str,
    mut out: W,
) -> Result<()> {
    let sp = output::spinner_for(format, &format!("Fetching {what}s..."));
    let mut buf = Vec::new();
    let res = run_list(task, client, format, &mut buf).await;
    output::finish(sp);
    res.with_context(|| format!("could not list {what}s"))?;
    out.write_all(&buf)?;
    Ok(())
}

pub(crate) fn parse_assignments(args: &[String]) -> Result<Quotas> {
    let assignments = args
        .iter()
        .map(|arg| arg.parse::<QuotaAssignment>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid quota assignment")?;
    Ok(assignments.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments_groups_by_service() {
        let args = ["compute/cores=10", "network/ports=50", "compute/ram=4GiB"]
            .map(String::from);
        let quotas = parse_assignments(&args).unwrap();
        assert_eq!(quotas.len(), 2);
        let first = quotas.iter().next().unwrap();
        assert_eq!(first.service, "compute");
        assert_eq!(first.resources.len(), 2);
    }

    #[test]
    fn test_parse_assignments_reports_bad_input() {
        let args = ["compute/cores".to_string()];
        let err = parse_assignments(&args).unwrap_err();
        assert_eq!(err.to_string(), "invalid quota assignment");
    }
}
