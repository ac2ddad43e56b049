use colored::Colorize;
use quotactl_shared::OutputFormat;

/// Create a styled spinner with a message.
pub fn spinner(msg: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("  {spinner} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Spinner for interactive table output only; machine-readable formats stay quiet.
pub fn spinner_for(format: OutputFormat, msg: &str) -> Option<indicatif::ProgressBar> {
    match format {
        OutputFormat::Table => Some(spinner(msg)),
        OutputFormat::Json | OutputFormat::Csv => None,
    }
}

pub fn finish(sp: Option<indicatif::ProgressBar>) {
    if let Some(sp) = sp {
        sp.finish_and_clear();
    }
}

/// Confirmation line on stderr, so stdout stays clean for piping.
pub fn done(msg: &str) {
    eprintln!("  {} {msg}", "✓".green().bold());
}
