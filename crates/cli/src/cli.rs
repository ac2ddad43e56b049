use clap::{Args, Parser, Subcommand};
use quotactl_shared::{Filter, OutputFormat, OutputOptions};

#[derive(Parser)]
#[command(
    name = "quotactl",
    about = "Inspect and manage cluster, domain and project quotas",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Log requests and lookups to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster capacity and usage
    #[command(subcommand)]
    Cluster(ClusterCommand),

    /// Domain quota and usage
    #[command(subcommand)]
    Domain(DomainCommand),

    /// Project quota and usage
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum ClusterCommand {
    /// List all clusters
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show one cluster (defaults to the cluster of the token)
    Show {
        /// Cluster ID
        id: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Change cluster capacities
    Set {
        /// Optional cluster ID, followed by service/resource=value[unit][:comment]
        #[arg(required = true, value_name = "[ID] ASSIGNMENTS")]
        args: Vec<String>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[derive(Subcommand)]
pub enum DomainCommand {
    /// List all domains
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show one domain
    Show {
        /// Domain name or ID
        domain: String,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Change domain quotas
    Set {
        /// Domain name or ID
        domain: String,
        /// service/resource=value[unit]
        #[arg(required = true)]
        assignments: Vec<String>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List the projects of a domain
    List {
        /// Domain name or ID (defaults to the configured domain)
        #[arg(long)]
        domain: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show one project
    Show {
        /// Project name or ID
        project: String,
        /// Domain name or ID, narrows the name search
        #[arg(long)]
        domain: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Change project quotas
    Set {
        /// Project name or ID
        project: String,
        /// service/resource=value[unit]
        #[arg(required = true)]
        assignments: Vec<String>,
        /// Domain name or ID, narrows the name search
        #[arg(long)]
        domain: Option<String>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Schedule a rescan of project quota and usage
    Sync {
        /// Project name or ID
        project: String,
        /// Domain name or ID, narrows the name search
        #[arg(long)]
        domain: Option<String>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Config key: identity_url, quota_url, token, domain
        key: String,
        /// Config value
        value: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Send requests to this cluster instead of the token's own
    #[arg(long)]
    pub cluster: Option<String>,
    /// Only resources of services in this area
    #[arg(long)]
    pub area: Option<String>,
    /// Only resources of this service type
    #[arg(long)]
    pub service: Option<String>,
    /// Only this resource (needs --service)
    #[arg(long, requires = "service")]
    pub resource: Option<String>,
}

impl From<FilterArgs> for Filter {
    fn from(args: FilterArgs) -> Self {
        Filter {
            cluster: args.cluster,
            area: args.area,
            service: args.service,
            resource: args.resource,
        }
    }
}

/// Target of a write. Only the cluster can be chosen.
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Send requests to this cluster instead of the token's own
    #[arg(long)]
    pub cluster: Option<String>,
}

impl From<ScopeArgs> for Filter {
    fn from(args: ScopeArgs) -> Self {
        Filter {
            cluster: args.cluster,
            ..Filter::default()
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format: json, csv or table
    #[arg(long, short = 'f', value_name = "FORMAT")]
    pub format: Option<String>,
    /// Show names instead of IDs
    #[arg(long)]
    pub names: bool,
    /// Show all columns
    #[arg(long, short = 'l')]
    pub long: bool,
    /// Show byte values in the largest fitting unit
    #[arg(long)]
    pub human_readable: bool,
}

impl OutputArgs {
    pub fn format(&self) -> OutputFormat {
        OutputFormat::parse(self.format.as_deref())
    }

    pub fn options(&self) -> OutputOptions {
        OutputOptions {
            names: self.names,
            long: self.long,
            human_readable: self.human_readable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_show_flags() {
        let cli = Cli::parse_from([
            "quotactl", "project", "show", "myproject", "--domain", "mydomain", "--service",
            "compute", "--format", "csv", "--names",
        ]);
        let Commands::Project(ProjectCommand::Show {
            project,
            domain,
            filter,
            output,
        }) = cli.command
        else {
            panic!("expected project show");
        };
        assert_eq!(project, "myproject");
        assert_eq!(domain.as_deref(), Some("mydomain"));
        assert_eq!(Filter::from(filter).service.as_deref(), Some("compute"));
        assert_eq!(output.format(), OutputFormat::Csv);
        assert!(output.options().names);
    }

    #[test]
    fn test_resource_filter_needs_service() {
        let res = Cli::try_parse_from(["quotactl", "domain", "list", "--resource", "cores"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_set_needs_assignments() {
        let res = Cli::try_parse_from(["quotactl", "domain", "set", "mydomain"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_writes_reject_read_filters() {
        for flag in ["--area", "--service", "--resource"] {
            let res = Cli::try_parse_from(["quotactl", "project", "sync", "p", flag, "x"]);
            assert!(res.is_err(), "project sync accepted {flag}");
            let res = Cli::try_parse_from([
                "quotactl", "project", "set", "p", "compute/cores=1", flag, "x",
            ]);
            assert!(res.is_err(), "project set accepted {flag}");
        }
        let res = Cli::try_parse_from(["quotactl", "domain", "set", "d", "compute/cores=1", "--service", "network"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_write_keeps_cluster_scope() {
        let cli = Cli::parse_from(["quotactl", "project", "sync", "p", "--cluster", "west"]);
        let Commands::Project(ProjectCommand::Sync { scope, .. }) = cli.command else {
            panic!("expected project sync");
        };
        assert_eq!(
            Filter::from(scope),
            Filter {
                cluster: Some("west".to_string()),
                ..Filter::default()
            }
        );
    }

    #[test]
    fn test_debug_is_global() {
        let cli = Cli::parse_from(["quotactl", "cluster", "list", "--debug"]);
        assert!(cli.debug);
    }
}
