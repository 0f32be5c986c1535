//! Engineer/Commander mode switching with a timed cross-fade.

use std::time::Duration;

use kaal_types::Mode;
use tracing::info;

use crate::event::{SimScheduler, TimerEvent};
use crate::outcome::{Outcome, Rejection};
use crate::scheduler::TimerId;

#[derive(Debug)]
pub struct ModeController {
    current: Mode,
    target: Option<Mode>,
    transition: Duration,
    timer: Option<TimerId>,
}

impl ModeController {
    pub fn new(initial: Mode, transition: Duration) -> Self {
        Self {
            current: initial,
            target: None,
            transition,
            timer: None,
        }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// The mode being faded to, if a transition is underway.
    pub fn target(&self) -> Option<Mode> {
        self.target
    }

    /// Start fading to `target`. The switch itself happens on commit.
    pub fn request_mode(&mut self, target: Mode, scheduler: &mut SimScheduler) -> Outcome {
        if let Some(pending) = self.target {
            return Rejection::TransitionInProgress { target: pending }.into();
        }
        if target == self.current {
            return Rejection::AlreadyInMode(target).into();
        }

        self.target = Some(target);
        self.timer = Some(scheduler.schedule_after(self.transition, TimerEvent::ModeCommit));
        info!(from = %self.current, to = %target, "mode transition started");
        Outcome::Applied
    }

    /// Complete the pending transition, returning the newly current mode.
    pub fn commit(&mut self) -> Option<Mode> {
        self.timer = None;
        let target = self.target.take()?;
        self.current = target;
        info!(mode = %target, "mode committed");
        Some(target)
    }

    /// Drop a pending transition, staying in the current mode.
    pub fn cancel(&mut self, scheduler: &mut SimScheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
        self.target = None;
    }
}
