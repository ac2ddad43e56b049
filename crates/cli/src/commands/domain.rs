use anyhow::{Context, Result};
use quotactl_shared::{resolve_domain, Domain, Entity, Task};

use crate::cli::DomainCommand;
use crate::client::HttpClient;
use crate::output;

pub async fn run(client: &HttpClient, cmd: DomainCommand) -> Result<()> {
    let out = std::io::stdout().lock();
    match cmd {
        DomainCommand::List { filter, output } => {
            let task = Task::new(Entity::Domain(Domain::default()))
                .with_filter(filter.into())
                .with_output(output.options());
            super::list(client, &task, output.format(), "domain", out).await
        }
        DomainCommand::Show {
            domain,
            filter,
            output,
        } => {
            let domain = resolve_domain(client, &domain)
                .await
                .context("could not get domain")?;
            let task = Task::new(Entity::Domain(domain))
                .with_filter(filter.into())
                .with_output(output.options());
            super::show(client, &task, output.format(), "domain", out).await
        }
        DomainCommand::Set {
            domain,
            assignments,
            scope,
        } => {
            let quotas = super::parse_assignments(&assignments)?;
            let domain = resolve_domain(client, &domain)
                .await
                .context("could not set domain quota")?;
            let name = domain.name.clone();
            let task = Task::new(Entity::Domain(domain)).with_filter(scope.into());

            let sp = output::spinner(&format!("Updating domain {name}..."));
            let res = task.set(client, &quotas, out).await;
            sp.finish_and_clear();
            res.context("could not set domain quota")?;

            output::done(&format!("domain {name} updated"));
            Ok(())
        }
    }
}
