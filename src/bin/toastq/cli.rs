use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;
use toastq::types::Position;

#[derive(Parser, Debug)]
#[command(author, version, about = "Console toast queue fed from stdin", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Container placement (e.g. "top-end").
    #[arg(long)]
    pub position: Option<Position>,

    /// Delay before an autohide toast is closed (e.g. "3s").
    #[arg(long, value_parser = parse_duration)]
    pub autohide_delay: Option<Duration>,

    /// Maximum number of toasts held at once.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub max_entries: Option<usize>,

    /// Simulated exit animation length before a hidden toast is removed.
    #[arg(long, value_parser = parse_duration)]
    pub exit_delay: Option<Duration>,

    /// Print snapshots as JSON lines instead of text.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Use a JSON layer for logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "toastq=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::time::Duration;
    use toastq::types::Position;

    #[test]
    fn parses_queue_overrides() {
        let cli = match Cli::try_parse_from([
            "toastq",
            "--position",
            "top-start",
            "--autohide-delay",
            "5s",
            "--max-entries",
            "4",
        ]) {
            Ok(cli) => cli,
            Err(err) => panic!("arguments should parse: {err}"),
        };
        assert_eq!(cli.position, Some(Position::TopStart));
        assert_eq!(cli.autohide_delay, Some(Duration::from_secs(5)));
        assert_eq!(cli.max_entries, Some(4));
        assert!(!cli.json);
    }

    #[test]
    fn rejects_unknown_position() {
        assert!(Cli::try_parse_from(["toastq", "--position", "left"]).is_err());
    }
}
