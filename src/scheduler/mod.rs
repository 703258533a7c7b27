//! Probe scheduling and the connectivity state loop.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  changed()   ┌─────────────────────────────┐
//! │ ReachabilitySignal│────────────▶│                             │
//! └──────────────────┘              │         state loop          │
//! ┌──────────────────┐  tick        │  (owns SessionState, single │  watch::Sender
//! │ interval timer   │────────────▶│   task, no locks)           │──────────────▶ SessionFeed (TUI)
//! └──────────────────┘              │                             │
//! ┌──────────────────┐  outcome     │                             │
//! │ probe task       │────────────▶│                             │
//! └──────────────────┘   (mpsc)     └─────────────────────────────┘
//!          ▲                                     │
//!          └──────────── spawn on tick ──────────┘
//! ```
//!
//! Every mutation of the session goes through the single state-loop task, so
//! native events and probe outcomes are applied one at a time in the order the
//! loop receives them. Probes run in their own task, which keeps native events
//! flowing while a probe is in flight.

mod clock;
mod feed;

pub use clock::{Clock, SystemClock};
pub use feed::SessionFeed;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::data::{ConnectivityStatus, SessionState};
use crate::probe::{ProbeError, Prober};
use crate::signal::ReachabilitySignal;

/// Default time between polling ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Commands accepted by a running scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ProbeNow,
    Shutdown,
}

/// Where a status report came from. Only used for logging.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Native,
    Probe,
}

/// Configures and starts the polling loop.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use netwatch::probe::HttpProber;
/// use netwatch::scheduler::ProbeScheduler;
/// use netwatch::signal::RouteSignal;
///
/// # tokio_test::block_on(async {
/// let prober = Arc::new(HttpProber::builder().build().unwrap());
/// let signal = RouteSignal::spawn(Duration::from_secs(1));
///
/// let handle = ProbeScheduler::new(prober)
///     .poll_interval(Duration::from_secs(10))
///     .spawn(&signal);
///
/// println!("currently {}", handle.state().current_status());
/// handle.shutdown().await;
/// # });
/// ```
#[derive(Debug)]
pub struct ProbeScheduler {
    prober: Arc<dyn Prober>,
    poll_interval: Duration,
    clock: Arc<dyn Clock>,
}

impl ProbeScheduler {
    /// Create a scheduler around the given prober with default settings.
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            poll_interval: DEFAULT_POLL_INTERVAL,
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the polling interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Replace the wall clock used for timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed the session from `signal` and start the state loop.
    ///
    /// The first poll tick fires immediately. Must be called from within a
    /// tokio runtime.
    pub fn spawn(self, signal: &dyn ReachabilitySignal) -> SchedulerHandle {
        let mut reachability = signal.subscribe();
        let initial = ConnectivityStatus::from_reachable(*reachability.borrow_and_update());
        let state = SessionState::started_at(initial, self.clock.now());

        info!(
            status = %initial,
            signal = signal.description(),
            target = self.prober.target(),
            "session started"
        );

        let (state_tx, state_rx) = watch::channel(state.clone());
        let (command_tx, command_rx) = mpsc::channel(8);

        let state_loop = StateLoop::new(
            state,
            state_tx,
            self.prober,
            self.clock,
            reachability,
            command_rx,
        );
        let task = tokio::spawn(state_loop.run(self.poll_interval));

        SchedulerHandle {
            control: SchedulerControl { commands: command_tx },
            state: state_rx,
            task,
        }
    }
}

/// Cloneable remote control for a running scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerControl {
    commands: mpsc::Sender<Command>,
}

impl SchedulerControl {
    /// Ask the scheduler to probe immediately instead of waiting for the next tick.
    ///
    /// Returns `false` if the scheduler is gone or its queue is full.
    pub fn probe_now(&self) -> bool {
        self.commands.try_send(Command::ProbeNow).is_ok()
    }

    /// Ask the scheduler to stop. Does not wait for it.
    pub fn request_shutdown(&self) -> bool {
        self.commands.try_send(Command::Shutdown).is_ok()
    }

    /// A control whose scheduler has already stopped.
    #[cfg(test)]
    pub(crate) fn disconnected() -> Self {
        let (commands, _) = mpsc::channel(1);
        Self { commands }
    }
}

/// Owner handle for a running scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    control: SchedulerControl,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Snapshot of the current session.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// A feed of session snapshots for the presentation layer.
    pub fn feed(&self) -> SessionFeed {
        SessionFeed::new(self.state.clone())
    }

    pub fn control(&self) -> SchedulerControl {
        self.control.clone()
    }

    /// See [`SchedulerControl::probe_now`].
    pub fn probe_now(&self) -> bool {
        self.control.probe_now()
    }

    /// Stop the scheduler and wait until the repeating timer, the signal
    /// subscription and any in-flight probe have been released.
    pub async fn shutdown(self) {
        let _ = self.control.commands.send(Command::Shutdown).await;
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                warn!("scheduler task failed: {}", e);
            }
        }
    }
}

/// Result of one probe, tagged with the probe that produced it.
type ProbeOutcome = (u64, Result<(), ProbeError>);

/// The probe currently owned by the state loop.
#[derive(Debug)]
struct InFlight {
    generation: u64,
    task: JoinHandle<()>,
}

/// The single task that owns the session.
struct StateLoop {
    state: SessionState,
    state_tx: watch::Sender<SessionState>,
    prober: Arc<dyn Prober>,
    clock: Arc<dyn Clock>,
    reachability: watch::Receiver<bool>,
    commands: mpsc::Receiver<Command>,
    outcome_tx: mpsc::Sender<ProbeOutcome>,
    outcomes: mpsc::Receiver<ProbeOutcome>,
    in_flight: Option<InFlight>,
    next_generation: u64,
}

impl StateLoop {
    fn new(
        state: SessionState,
        state_tx: watch::Sender<SessionState>,
        prober: Arc<dyn Prober>,
        clock: Arc<dyn Clock>,
        reachability: watch::Receiver<bool>,
        commands: mpsc::Receiver<Command>,
    ) -> Self {
        let (outcome_tx, outcomes) = mpsc::channel(1);
        Self {
            state,
            state_tx,
            prober,
            clock,
            reachability,
            commands,
            outcome_tx,
            outcomes,
            in_flight: None,
            next_generation: 0,
        }
    }

    async fn run(mut self, poll_interval: Duration) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut signal_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.start_probe(),
                Some((generation, outcome)) = self.outcomes.recv() => {
                    self.finish_probe(generation, outcome);
                }
                changed = self.reachability.changed(), if signal_open => {
                    match changed {
                        Ok(()) => {
                            let reachable = *self.reachability.borrow_and_update();
                            self.report(ConnectivityStatus::from_reachable(reachable), Trigger::Native);
                        }
                        Err(_) => {
                            debug!("reachability signal closed, continuing with polling only");
                            signal_open = false;
                        }
                    }
                }
                command = self.commands.recv() => {
                    match command {
                        Some(Command::ProbeNow) => self.start_probe(),
                        Some(Command::Shutdown) | None => break,
                    }
                }
            }
        }

        self.cancel_probe().await;
        debug!("scheduler stopped");
    }

    /// Stamp the check and spawn one probe, unless one is already running.
    fn start_probe(&mut self) {
        if let Some(probe) = &self.in_flight {
            if !probe.task.is_finished() {
                warn!("previous probe still in flight, skipping this check");
                return;
            }
            // Finished, so its outcome is already queued (or the task panicked)
            match self.outcomes.try_recv() {
                Ok((generation, outcome)) => self.finish_probe(generation, outcome),
                Err(_) => {
                    warn!("probe task ended without reporting an outcome");
                    self.in_flight = None;
                }
            }
        }

        self.state.record_check_at(self.clock.now());
        self.publish();

        let generation = self.next_generation;
        self.next_generation += 1;

        let prober = Arc::clone(&self.prober);
        let outcome_tx = self.outcome_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = prober.probe().await;
            let _ = outcome_tx.send((generation, outcome)).await;
        });
        self.in_flight = Some(InFlight { generation, task });
    }

    /// Apply the outcome of the probe identified by `generation`.
    fn finish_probe(&mut self, generation: u64, outcome: Result<(), ProbeError>) {
        let tracked = self
            .in_flight
            .as_ref()
            .is_some_and(|probe| probe.generation == generation);
        if !tracked {
            debug!(generation, "ignoring outcome of a probe that is no longer tracked");
            return;
        }

        self.in_flight = None;
        self.apply_probe_outcome(outcome);
    }

    /// Abort the in-flight probe, if any, and wait for it to be dropped.
    async fn cancel_probe(&mut self) {
        if let Some(probe) = self.in_flight.take() {
            probe.task.abort();
            let _ = probe.task.await;
        }
    }

    fn apply_probe_outcome(&mut self, outcome: Result<(), ProbeError>) {
        match outcome {
            Ok(()) => self.report(ConnectivityStatus::Online, Trigger::Probe),
            Err(e) => {
                debug!("probe failed: {}", e);
                self.report(ConnectivityStatus::Offline, Trigger::Probe);
            }
        }
    }

    fn report(&mut self, status: ConnectivityStatus, trigger: Trigger) {
        let transitioned = self.state.report(status, self.clock.now());
        if transitioned {
            info!(status = %status, trigger = ?trigger, "connectivity changed");
            self.publish();
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}
