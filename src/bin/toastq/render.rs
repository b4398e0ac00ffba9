use std::collections::HashMap;
use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use toastq::Result;
use toastq::timer::ScopedTimer;
use toastq::types::Position;
use toastq::{Entry, EntryId, QueueHandle, Snapshot};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Text,
    Json,
}

/// Draws every published snapshot and plays the part of the exit animation:
/// a hidden entry is removed once `exit_delay` has elapsed.
pub struct ConsoleRenderer<W> {
    queue: QueueHandle,
    position: Position,
    exit_delay: Duration,
    format: Format,
    exits: HashMap<EntryId, ScopedTimer>,
    out: W,
    draw_failed: bool,
}

impl<W: AsyncWrite + Unpin> ConsoleRenderer<W> {
    pub fn new(
        queue: QueueHandle,
        position: Position,
        exit_delay: Duration,
        format: Format,
        out: W,
    ) -> Self {
        Self {
            queue,
            position,
            exit_delay,
            format,
            exits: HashMap::new(),
            out,
            draw_failed: false,
        }
    }

    /// Follow the queue until it is dropped.
    ///
    /// Exit timers are armed before drawing, and a failed draw is only
    /// logged: hidden entries keep being removed even when the output is gone.
    pub async fn run(mut self, mut rx: watch::Receiver<Snapshot>) -> Result<()> {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            self.sync(&snapshot);
            if let Err(err) = self.draw(&snapshot).await {
                if !self.draw_failed {
                    warn!(error = %err, "failed to draw toasts; output disabled");
                }
                self.draw_failed = true;
            }
        }
        debug!(pending = self.exits.len(), "toast queue dropped; renderer stopping");
        Ok(())
    }

    pub async fn draw(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.draw_failed {
            return Ok(());
        }
        let frame = self.render(snapshot)?;
        self.out.write_all(frame.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    fn render(&self, snapshot: &Snapshot) -> Result<String> {
        match self.format {
            Format::Json => {
                let mut line = serde_json::to_string(snapshot)
                    .map_err(|err| std::io::Error::other(err.to_string()))?;
                line.push('\n');
                Ok(line)
            }
            Format::Text => {
                let mut frame = format!("[{}] {} toast(s)\n", self.position, snapshot.len());
                // top placements stack newest first
                let rows: Box<dyn Iterator<Item = &Entry>> = if self.position.is_top() {
                    Box::new(snapshot.iter().rev())
                } else {
                    Box::new(snapshot.iter())
                };
                for entry in rows {
                    frame.push_str("  ");
                    frame.push_str(&format_entry(entry));
                    frame.push('\n');
                }
                Ok(frame)
            }
        }
    }

    /// Schedule removal of newly hidden entries; forget entries already gone.
    pub fn sync(&mut self, snapshot: &Snapshot) {
        self.exits.retain(|id, _| snapshot.contains(*id));

        for entry in snapshot.iter().filter(|entry| !entry.is_visible()) {
            let id = entry.id();
            if self.exits.contains_key(&id) {
                continue;
            }
            let queue = self.queue.clone();
            let timer = ScopedTimer::spawn(self.exit_delay, move || {
                if let Err(err) = queue.remove(id) {
                    warn!(%id, error = %err, "exit finished after queue teardown");
                }
            });
            self.exits.insert(id, timer);
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn format_entry(entry: &Entry) -> String {
    let marker = if entry.is_visible() { '*' } else { '-' };
    let mut line = format!("{} {marker} {}: {}", entry.id(), entry.title(), entry.body());
    if let Some(variant) = entry.variant() {
        line.push_str(" (");
        line.push_str(variant);
        line.push(')');
    }
    if !entry.autohide() {
        line.push_str(" [sticky]");
    }
    line
}
