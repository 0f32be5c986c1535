//! Commander-side diagnostic run and safety kill switch.

use std::time::Duration;

use kaal_types::SafetyConsoleState;
use tracing::{info, warn};

use crate::event::{SimScheduler, TimerEvent};
use crate::outcome::{Outcome, Rejection};
use crate::scheduler::TimerId;

#[derive(Debug)]
pub struct SafetyConsole {
    state: SafetyConsoleState,
    run_time: Duration,
    timer: Option<TimerId>,
}

impl SafetyConsole {
    pub fn new(run_time: Duration) -> Self {
        Self {
            state: SafetyConsoleState::default(),
            run_time,
            timer: None,
        }
    }

    pub fn state(&self) -> SafetyConsoleState {
        self.state
    }

    pub fn run_diagnostic(&mut self, scheduler: &mut SimScheduler) -> Outcome {
        if self.state.safety_triggered {
            return Rejection::SafetyLatched.into();
        }
        if self.state.diagnostic_running {
            return Rejection::DiagnosticRunning.into();
        }
        self.state.diagnostic_running = true;
        self.timer = Some(scheduler.schedule_after(self.run_time, TimerEvent::DiagnosticComplete));
        info!("system diagnostic started");
        Outcome::Applied
    }

    /// Latch the kill switch, stopping any running diagnostic.
    pub fn trigger_safety(&mut self, scheduler: &mut SimScheduler) -> Outcome {
        if self.state.safety_triggered {
            return Rejection::SafetyLatched.into();
        }
        self.cancel_timers(scheduler);
        self.state = SafetyConsoleState {
            diagnostic_running: false,
            safety_triggered: true,
        };
        warn!("safety protocol triggered");
        Outcome::Applied
    }

    pub fn reset_safety(&mut self) -> Outcome {
        if !self.state.safety_triggered {
            return Rejection::SafetyNotTriggered.into();
        }
        self.state.safety_triggered = false;
        info!("safety protocol reset");
        Outcome::Applied
    }

    pub fn on_timer(&mut self, event: TimerEvent) -> bool {
        if event != TimerEvent::DiagnosticComplete {
            return false;
        }
        self.timer = None;
        self.state.diagnostic_running = false;
        info!("system diagnostic complete");
        true
    }

    pub fn cancel_timers(&mut self, scheduler: &mut SimScheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> (SafetyConsole, SimScheduler) {
        (SafetyConsole::new(Duration::from_millis(3000)), SimScheduler::new())
    }

    #[test]
    fn diagnostic_runs_for_its_duration() {
        let (mut console, mut s) = console();
        assert!(console.run_diagnostic(&mut s).is_applied());
        assert_eq!(console.state().diagnostic_label(), "CHECKING");
        assert_eq!(
            console.run_diagnostic(&mut s),
            Outcome::Ignored(Rejection::DiagnosticRunning)
        );

        assert!(s.pop_due(Duration::from_millis(2999)).is_none());
        let (_, event) = s.pop_due(Duration::from_millis(3000)).unwrap();
        assert!(console.on_timer(event));
        assert!(!console.state().diagnostic_running);
    }

    #[test]
    fn trigger_stops_running_diagnostic() {
        let (mut console, mut s) = console();
        let _ = console.run_diagnostic(&mut s);
        assert!(console.trigger_safety(&mut s).is_applied());

        let state = console.state();
        assert!(state.safety_triggered);
        assert!(!state.diagnostic_running);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn latch_blocks_until_reset() {
        let (mut console, mut s) = console();
        let _ = console.trigger_safety(&mut s);
        assert_eq!(
            console.trigger_safety(&mut s),
            Outcome::Ignored(Rejection::SafetyLatched)
        );
        assert_eq!(
            console.run_diagnostic(&mut s),
            Outcome::Ignored(Rejection::SafetyLatched)
        );

        assert!(console.reset_safety().is_applied());
        assert_eq!(console.state().safety_label(), "READY");
        assert!(console.run_diagnostic(&mut s).is_applied());
    }

    #[test]
    fn reset_without_trigger_is_rejected() {
        let (mut console, _) = console();
        assert_eq!(
            console.reset_safety(),
            Outcome::Ignored(Rejection::SafetyNotTriggered)
        );
    }
}
