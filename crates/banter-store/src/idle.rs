use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// The interaction kinds that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
}

enum Command {
    Activity(Activity),
    Stop,
}

/// Watches user activity and fires a callback after a fixed window of
/// silence — exactly once per idle period; any later activity re-arms it.
///
/// The monitor is a scoped resource: dropping the handle cancels the
/// pending deadline and the background task on every exit path, so skipped
/// teardown cannot leak anything.
pub struct IdleMonitor {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl IdleMonitor {
    /// Starts armed: the first window begins immediately.
    pub fn start<F>(window: Duration, on_idle: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut deadline = Some(Instant::now() + window);
            loop {
                let event = match deadline {
                    Some(at) => tokio::select! {
                        cmd = rx.recv() => match cmd {
                            Some(cmd) => Some(cmd),
                            None => break,
                        },
                        _ = sleep_until(at) => None,
                    },
                    None => match rx.recv().await {
                        Some(cmd) => Some(cmd),
                        None => break,
                    },
                };

                match event {
                    Some(Command::Activity(_)) => {
                        deadline = Some(Instant::now() + window);
                    }
                    Some(Command::Stop) => {
                        deadline = None;
                    }
                    None => {
                        debug!("inactivity window elapsed");
                        on_idle();
                        // Disarmed until the next activity.
                        deadline = None;
                    }
                }
            }
        });

        Self { tx, task }
    }

    /// Report a qualifying interaction; cancels the pending deadline and
    /// schedules a new one at the full window.
    pub fn record(&self, activity: Activity) {
        let _ = self.tx.send(Command::Activity(activity));
    }

    /// Cancel the pending deadline without tearing the monitor down; the
    /// next activity arms it again.
    pub fn stop(&self) {
        let _ = self.tx.send(Command::Stop);
    }
}

impl Drop for IdleMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
