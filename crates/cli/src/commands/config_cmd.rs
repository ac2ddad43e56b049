use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommand;
use crate::config::CliConfig;

const ENV_OVERRIDES: &[&str] = &[
    "OS_AUTH_URL",
    "QUOTACTL_QUOTA_URL",
    "OS_AUTH_TOKEN",
    "OS_PROJECT_DOMAIN_NAME",
];

pub fn run(cmd: ConfigCommand, config: &CliConfig) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(config),
        ConfigCommand::Set { key, value } => set(&key, &value),
    }
}

fn mask(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

fn show(config: &CliConfig) -> Result<()> {
    let path = CliConfig::path()?;
    let unset = || "(not set)".dimmed().to_string();

    println!();
    println!("  {}", "Configuration".bold());
    println!("  {}", "─".repeat(36).dimmed());
    println!("  {}         {}", "file:".dimmed(), path.display());
    println!("  {} {}", "identity_url:".dimmed(), config.identity_url);
    println!("  {}    {}", "quota_url:".dimmed(), config.quota_url);
    println!(
        "  {}        {}",
        "token:".dimmed(),
        config.token.as_deref().map(mask).unwrap_or_else(unset)
    );
    println!(
        "  {}       {}",
        "domain:".dimmed(),
        config.domain.clone().unwrap_or_else(unset)
    );
    println!();

    for var in ENV_OVERRIDES {
        if std::env::var(var).is_ok() {
            println!("  {} {var} environment variable is active", "ℹ".blue());
        }
    }

    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    CliConfig::set(key, value)?;

    println!(
        "  {} {key} = {}",
        "✓".green().bold(),
        if key == "token" {
            mask(value)
        } else {
            value.to_string()
        }
    );
    Ok(())
}
