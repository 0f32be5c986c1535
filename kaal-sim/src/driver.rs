//! Real-time driver for a [`Dashboard`].
//!
//! The driver owns one dashboard inside one tokio task. Model time follows
//! the task's clock: the task sleeps until the next timer deadline, fires it,
//! and publishes a fresh snapshot. Commands arrive over an mpsc channel and
//! are applied between timer callbacks, never during one.
//!
//! ```rust,no_run
//! use kaal_sim::{driver, Command, SimSettings};
//! use kaal_types::Mode;
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = driver::spawn(SimSettings::default()).unwrap();
//!     handle.execute(Command::RequestMode(Mode::Commander)).await.unwrap();
//!     let snapshot = handle.latest();
//!     println!("{}", snapshot.mode);
//!     handle.stop().await.unwrap();
//! }
//! ```

use kaal_types::DashboardSnapshot;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::dashboard::{Command, Dashboard};
use crate::notify::{Notice, Notifier};
use crate::outcome::Outcome;
use crate::settings::{SettingsError, SimSettings};

/// Pending commands before `submit` reports back-pressure.
const COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("driver has stopped")]
    Closed,

    #[error("command queue is full")]
    Busy,

    #[error("driver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Something the driver reports besides snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// A submitted command was applied or ignored.
    Outcome { command: Command, outcome: Outcome },
    Notice(Notice),
}

#[derive(Debug)]
struct Request {
    command: Command,
    reply: Option<oneshot::Sender<Outcome>>,
}

/// Forwards notices into the driver's event stream.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<DriverEvent>,
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        let _ = self.tx.send(DriverEvent::Notice(notice));
    }
}

/// Handle to a running driver task.
#[derive(Debug)]
pub struct DriverHandle {
    commands: mpsc::Sender<Request>,
    snapshots: watch::Receiver<DashboardSnapshot>,
    events: mpsc::UnboundedReceiver<DriverEvent>,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<Dashboard>,
    seed: u64,
}

impl DriverHandle {
    /// Queue a command without waiting for it. Its outcome arrives as a
    /// [`DriverEvent::Outcome`].
    pub fn submit(&self, command: Command) -> Result<(), DriverError> {
        self.commands
            .try_send(Request {
                command,
                reply: None,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DriverError::Busy,
                mpsc::error::TrySendError::Closed(_) => DriverError::Closed,
            })
    }

    /// Apply a command and wait for its outcome.
    pub async fn execute(&self, command: Command) -> Result<Outcome, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Request {
                command,
                reply: Some(reply),
            })
            .await
            .map_err(|_| DriverError::Closed)?;
        rx.await.map_err(|_| DriverError::Closed)
    }

    /// The most recently published snapshot.
    /// The seed the dashboard runs with, including one drawn at startup.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn latest(&self) -> DashboardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }

    /// Next queued event, if any, without waiting.
    pub fn try_event(&mut self) -> Option<DriverEvent> {
        self.events.try_recv().ok()
    }

    pub async fn next_event(&mut self) -> Option<DriverEvent> {
        self.events.recv().await
    }

    /// Stop the task and get the dashboard back with its timers cancelled.
    pub async fn stop(self) -> Result<Dashboard, DriverError> {
        let _ = self.stop_tx.send(true);
        Ok(self.task.await?)
    }
}

/// Start a dashboard on the current tokio runtime.
pub fn spawn(settings: SimSettings) -> Result<DriverHandle, DriverError> {
    let (events_tx, events) = mpsc::unbounded_channel();
    let dashboard = Dashboard::new(
        settings,
        ChannelNotifier {
            tx: events_tx.clone(),
        },
    )?;

    let seed = dashboard.seed();
    let (commands, commands_rx) = mpsc::channel(COMMAND_CAPACITY);
    let (snapshots_tx, snapshots) = watch::channel(dashboard.snapshot());
    let (stop_tx, stop_rx) = watch::channel(false);

    let task = tokio::spawn(run(dashboard, commands_rx, snapshots_tx, events_tx, stop_rx));

    Ok(DriverHandle {
        commands,
        snapshots,
        events,
        stop_tx,
        task,
        seed,
    })
}

async fn run(
    mut dashboard: Dashboard,
    mut commands: mpsc::Receiver<Request>,
    snapshots: watch::Sender<DashboardSnapshot>,
    events: mpsc::UnboundedSender<DriverEvent>,
    mut stop_rx: watch::Receiver<bool>,
) -> Dashboard {
    // Model time zero is the moment the task starts.
    let start = Instant::now();
    info!("driver started");

    loop {
        let deadline = dashboard.next_deadline();
        let wake = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(start + at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = wake => {
                let fired = dashboard.advance_to(start.elapsed());
                if fired > 0 {
                    snapshots.send_replace(dashboard.snapshot());
                }
            }
            request = commands.recv() => {
                let Some(Request { command, reply }) = request else {
                    debug!("command channel closed");
                    break;
                };
                dashboard.advance_to(start.elapsed());
                let outcome = dashboard.apply(command.clone());
                snapshots.send_replace(dashboard.snapshot());
                match reply {
                    Some(reply) => {
                        let _ = reply.send(outcome);
                    }
                    None => {
                        let _ = events.send(DriverEvent::Outcome { command, outcome });
                    }
                }
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    dashboard.shutdown();
    snapshots.send_replace(dashboard.snapshot());
    info!("driver stopped");
    dashboard
}
