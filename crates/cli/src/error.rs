use colored::Colorize;
use quotactl_shared::QuotaError;

/// Format an error for CLI display with contextual help messages.
pub fn display_error(err: &anyhow::Error) {
    let quota_err = err.chain().find_map(|e| e.downcast_ref::<QuotaError>());
    let chain = err
        .chain()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ");

    if chain.contains("Connection refused")
        || chain.contains("error sending request")
        || chain.contains("tcp connect error")
    {
        eprintln!("  {} Cannot reach the identity or quota service", "ERROR".red().bold());
        eprintln!("        Current endpoints: {}", "quotactl config show".dimmed());
    } else if chain.contains("401 Unauthorized") {
        eprintln!("  {} Authentication failed", "ERROR".red().bold());
        eprintln!(
            "        Set a token: {} or export OS_AUTH_TOKEN",
            "quotactl config set token <token>".dimmed()
        );
    } else {
        eprintln!("  {} {}", "ERROR".red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("        {} {cause}", "caused by:".dimmed());
        }
        match quota_err {
            Some(QuotaError::Ambiguous { .. }) => eprintln!(
                "        {}",
                "Use the ID instead, or narrow the search with --domain".dimmed()
            ),
            Some(QuotaError::InvalidInput(_)) => eprintln!(
                "        Expected {}",
                "service/resource=value[unit][:comment]".dimmed()
            ),
            _ => {}
        }
    }
}
