use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::watch;
use toastq::autohide::AutohideScheduler;
use toastq::config::Settings;
use toastq::error::ConfigError;
use toastq::telemetry::init_tracing;
use toastq::{QueueHandle, Result, Snapshot, ToastQueue};
use tracing::{info, warn};

use super::cli::Cli;
use super::input::{Command, parse_line};
use super::render::{ConsoleRenderer, Format};

const DEFAULT_CONFIG: &str = "toastq.toml";

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut settings = Settings::from_env_and_file(&config_path)?;
    apply_cli_overrides(&cli, &mut settings)?;

    let queue = ToastQueue::new(settings.queue.clone());
    info!(
        position = %settings.queue.position,
        autohide_delay_ms = settings.queue.autohide_delay.as_millis(),
        max_entries = ?settings.queue.max_entries,
        exit_delay_ms = settings.render.exit_delay.as_millis(),
        "toast queue ready"
    );

    let format = if cli.json { Format::Json } else { Format::Text };
    let renderer = ConsoleRenderer::new(
        queue.handle(),
        settings.queue.position,
        settings.render.exit_delay,
        format,
        tokio::io::stdout(),
    );
    let renderer = tokio::spawn(renderer.run(queue.subscribe()));
    let autohide = tokio::spawn(AutohideScheduler::for_queue(&queue).run());

    let producer = queue.handle();
    let mut settled = queue.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("shutdown signal received, stopping");
                break;
            }
            read = lines.next_line() => match classify_read(read)? {
                Input::Line(line) => dispatch(&producer, &line)?,
                Input::Skipped => {}
                Input::End => {
                    info!("end of input, waiting for toasts to settle");
                    tokio::select! {
                        _ = signal::ctrl_c() => info!("shutdown signal received, stopping"),
                        () = wait_settled(&mut settled) => {}
                    }
                    break;
                }
            },
        }
    }

    // Dropping the queue closes both subscriptions and cancels pending timers.
    drop(queue);
    for (name, task) in [("renderer", renderer), ("autohide", autohide)] {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(task = name, error = %err, "task failed"),
            Err(err) => warn!(task = name, error = %err, "task terminated unexpectedly"),
        }
    }

    Ok(())
}

fn apply_cli_overrides(cli: &Cli, settings: &mut Settings) -> Result<()> {
    if let Some(position) = cli.position {
        settings.queue.position = position;
    }
    if let Some(delay) = cli.autohide_delay {
        settings.queue.autohide_delay = delay;
    }
    if let Some(max_entries) = cli.max_entries {
        let max_entries = NonZeroUsize::new(max_entries).ok_or(ConfigError::InvalidField {
            field: "cli.max_entries",
            message: "value must be greater than zero".to_string(),
        })?;
        settings.queue.max_entries = Some(max_entries);
    }
    if let Some(exit_delay) = cli.exit_delay {
        settings.render.exit_delay = exit_delay;
    }
    Ok(())
}

#[derive(Debug, Eq, PartialEq)]
enum Input {
    Line(String),
    Skipped,
    End,
}

/// A line that is not valid UTF-8 is dropped; any other read failure ends the run.
fn classify_read(read: io::Result<Option<String>>) -> Result<Input> {
    match read {
        Ok(Some(line)) => Ok(Input::Line(line)),
        Ok(None) => Ok(Input::End),
        Err(err) if err.kind() == io::ErrorKind::InvalidData => {
            warn!(error = %err, "ignoring input line that is not valid UTF-8");
            Ok(Input::Skipped)
        }
        Err(err) => Err(err.into()),
    }
}

fn dispatch(producer: &QueueHandle, line: &str) -> Result<()> {
    let command = match parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(()),
        Err(message) => {
            warn!(%message, "ignoring input line");
            return Ok(());
        }
    };

    match command {
        Command::Create(data) => {
            if producer.create(data)?.is_none() {
                info!("queue full; toast dropped");
            }
        }
        Command::Close(raw) => {
            if let Some(id) = lookup(producer, raw)? {
                producer.close(id)?;
            }
        }
        Command::Remove(raw) => {
            if let Some(id) = lookup(producer, raw)? {
                producer.remove(id)?;
            }
        }
        Command::Clear => {
            producer.clear()?;
        }
    }
    Ok(())
}

fn lookup(producer: &QueueHandle, raw: u64) -> Result<Option<toastq::EntryId>> {
    let id = producer.snapshot()?.ids().find(|id| id.get() == raw);
    if id.is_none() {
        warn!(id = raw, "no such toast");
    }
    Ok(id)
}

/// Resolves once nothing in the queue will change on its own: every remaining
/// entry is visible and sticky.
async fn wait_settled(rx: &mut watch::Receiver<Snapshot>) {
    let settled = |snapshot: &Snapshot| {
        snapshot
            .iter()
            .all(|entry| entry.is_visible() && !entry.autohide())
    };
    if rx.wait_for(|snapshot| settled(snapshot)).await.is_err() {
        warn!("toast queue dropped while waiting to settle");
    }
}

#[cfg(test)]
mod tests {
    use super::{Input, apply_cli_overrides, classify_read, dispatch, wait_settled};
    use crate::cli::Cli;
    use clap::Parser;
    use std::io;
    use std::num::NonZeroUsize;
    use std::time::Duration;
    use toastq::ToastQueue;
    use toastq::autohide::AutohideScheduler;
    use toastq::config::Settings;
    use toastq::error::Error;

    #[test]
    fn cli_overrides_win_over_settings() {
        let cli = match Cli::try_parse_from(["toastq", "--max-entries", "2", "--exit-delay", "1s"]) {
            Ok(cli) => cli,
            Err(err) => panic!("arguments should parse: {err}"),
        };
        let mut settings = Settings::default();
        if let Err(err) = apply_cli_overrides(&cli, &mut settings) {
            panic!("overrides should apply: {err}");
        }
        assert_eq!(settings.queue.max_entries, NonZeroUsize::new(2));
        assert_eq!(settings.render.exit_delay, Duration::from_secs(1));
    }

    #[test]
    fn zero_max_entries_from_cli_is_rejected() {
        let cli = match Cli::try_parse_from(["toastq", "--max-entries", "0"]) {
            Ok(cli) => cli,
            Err(err) => panic!("arguments should parse: {err}"),
        };
        let mut settings = Settings::default();
        assert!(matches!(
            apply_cli_overrides(&cli, &mut settings),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let read = Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        ));
        assert!(matches!(classify_read(read), Ok(Input::Skipped)));
        assert!(matches!(
            classify_read(Ok(Some("A|a".to_string()))),
            Ok(Input::Line(line)) if line == "A|a"
        ));
        assert!(matches!(classify_read(Ok(None)), Ok(Input::End)));
    }

    #[test]
    fn other_read_errors_end_the_run() {
        let read = Err(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(classify_read(read), Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn input_continues_after_invalid_utf8() {
        use tokio::io::{AsyncBufReadExt, BufReader};

        let queue = ToastQueue::default();
        let producer = queue.handle();
        let raw: &[u8] = b"A|a\n\xff\xfe|bad\nB|b\n";
        let mut lines = BufReader::new(raw).lines();
        loop {
            match classify_read(lines.next_line().await) {
                Ok(Input::Line(line)) => {
                    if let Err(err) = dispatch(&producer, &line) {
                        panic!("dispatch should not fail: {err}");
                    }
                }
                Ok(Input::Skipped) => {}
                Ok(Input::End) => break,
                Err(err) => panic!("invalid input should not end the run: {err}"),
            }
        }
        let titles: Vec<_> = queue.snapshot().iter().map(|e| e.title().to_string()).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn dispatch_drives_the_queue() {
        let queue = ToastQueue::default();
        let producer = queue.handle();
        for line in ["A|a", "B|b", "/close 1", "garbage", "/remove 7"] {
            if let Err(err) = dispatch(&producer, line) {
                panic!("dispatch should not fail: {err}");
            }
        }
        let snapshot = queue.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot[0].is_visible());
        assert!(snapshot[1].is_visible());
    }

    #[test]
    fn dispatch_after_teardown_is_an_error() {
        let queue = ToastQueue::default();
        let producer = queue.handle();
        drop(queue);
        assert!(matches!(dispatch(&producer, "A|a"), Err(Error::Detached)));
    }

    #[tokio::test(start_paused = true)]
    async fn settles_once_autohide_entries_are_gone() {
        let queue = ToastQueue::default();
        let mut rx = queue.subscribe();
        queue.create(toastq::ToastData::new("sticky", "s").autohide(false));
        let Some(id) = queue.create(toastq::ToastData::new("A", "a")) else {
            panic!("unbounded queue should accept");
        };
        let autohide = tokio::spawn(AutohideScheduler::for_queue(&queue).run());

        let handle = queue.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(4)).await;
            let _ = handle.remove(id);
        });

        wait_settled(&mut rx).await;
        assert_eq!(queue.len(), 1);
        drop(queue);
        assert!(matches!(autohide.await, Ok(Ok(()))));
    }
}
