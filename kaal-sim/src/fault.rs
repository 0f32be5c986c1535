//! Single-fault injection with timed auto-recovery.
//!
//! ```text
//! Normal --simulate(kind)--> Faulted --recovery delay--> Recovering --restore delay--> Normal
//!    ^                          |                            |
//!    +-------simulate(None)-----+----------------------------+
//! ```

use std::time::Duration;

use kaal_types::{FaultKind, FaultMetrics, FaultPhase, FaultState};
use tracing::{debug, info};

use crate::event::{SimScheduler, TimerEvent};
use crate::outcome::{Outcome, Rejection};
use crate::scheduler::TimerId;

#[derive(Debug)]
pub struct FaultInjectionEngine {
    state: FaultState,
    recovery_delay: Duration,
    restore_delay: Duration,
    /// The one phase timer that can be pending at a time.
    timer: Option<TimerId>,
}

impl FaultInjectionEngine {
    pub fn new(recovery_delay: Duration, restore_delay: Duration) -> Self {
        Self {
            state: FaultState::normal(),
            recovery_delay,
            restore_delay,
            timer: None,
        }
    }

    pub fn state(&self) -> &FaultState {
        &self.state
    }

    /// Inject `kind`, or with `None` abort the current fault.
    pub fn simulate_fault(&mut self, kind: Option<FaultKind>, scheduler: &mut SimScheduler) -> Outcome {
        match (kind, self.state.active_fault) {
            (Some(_), Some(active)) => Rejection::FaultInProgress { active }.into(),
            (None, None) => Rejection::NoActiveFault.into(),
            (Some(kind), None) => {
                self.state = FaultState {
                    active_fault: Some(kind),
                    phase: FaultPhase::Faulted,
                    metrics: FaultMetrics::baseline().with_fault(kind),
                };
                self.timer = Some(scheduler.schedule_after(self.recovery_delay, TimerEvent::FaultRecover));
                info!(fault = %kind, "fault injected");
                Outcome::Applied
            }
            (None, Some(active)) => {
                self.cancel_timers(scheduler);
                self.state = FaultState::normal();
                info!(fault = %active, "fault reset");
                Outcome::Applied
            }
        }
    }

    /// Handle a fired fault timer. Returns false for events it does not own.
    pub fn on_timer(&mut self, event: TimerEvent, scheduler: &mut SimScheduler) -> bool {
        match event {
            TimerEvent::FaultRecover => {
                self.timer = None;
                if self.state.phase == FaultPhase::Faulted {
                    self.state.phase = FaultPhase::Recovering;
                    self.timer = Some(scheduler.schedule_after(self.restore_delay, TimerEvent::FaultRestore));
                    info!(fault = ?self.state.active_fault, "fault recovery started");
                }
                true
            }
            TimerEvent::FaultRestore => {
                self.timer = None;
                if self.state.phase == FaultPhase::Recovering {
                    self.state = FaultState::normal();
                    info!("fault cleared, systems normal");
                }
                true
            }
            _ => false,
        }
    }

    /// Cancel any pending phase timer without touching the state.
    pub fn cancel_timers(&mut self, scheduler: &mut SimScheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
            debug!("fault timer cancelled");
        }
    }
}
