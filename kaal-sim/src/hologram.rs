//! Hologram projector with a drifting sync figure.

use std::time::Duration;

use kaal_types::HologramState;
use rand::Rng;
use tracing::{debug, info};

use crate::event::{SimScheduler, TimerEvent};
use crate::scheduler::TimerId;

/// Sync figures drawn on each tick.
const SYNC_RANGE: std::ops::RangeInclusive<u8> = 94..=99;

#[derive(Debug)]
pub struct HologramProjector {
    state: HologramState,
    interval: Duration,
    timer: Option<TimerId>,
}

impl HologramProjector {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: HologramState::initial(),
            interval,
            timer: None,
        }
    }

    pub fn state(&self) -> HologramState {
        self.state
    }

    /// Arm the sync timer if the projector is on.
    pub fn start(&mut self, scheduler: &mut SimScheduler) {
        if self.state.active && self.timer.is_none() {
            self.timer = Some(scheduler.schedule_every(self.interval, TimerEvent::HologramSync));
        }
    }

    /// Switch the projector, returning whether it is now on. The sync figure
    /// holds its last value while off.
    pub fn toggle(&mut self, scheduler: &mut SimScheduler) -> bool {
        self.state.active = !self.state.active;
        if self.state.active {
            self.start(scheduler);
        } else {
            self.cancel_timers(scheduler);
        }
        info!(active = self.state.active, "hologram toggled");
        self.state.active
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state.sync_percentage = rng.gen_range(SYNC_RANGE);
        debug!(sync = self.state.sync_percentage, "hologram sync");
    }

    pub fn on_timer<R: Rng + ?Sized>(&mut self, event: TimerEvent, rng: &mut R) -> bool {
        if event != TimerEvent::HologramSync {
            return false;
        }
        self.tick(rng);
        true
    }

    pub fn cancel_timers(&mut self, scheduler: &mut SimScheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
    }
}
