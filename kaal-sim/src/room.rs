//! The commander's room sequence.
//!
//! At most one room system runs at a time unless everything is switched on
//! together. Any change that leaves the room engaged re-arms an idle timer;
//! when it fires the room drops back to standby.

use std::time::Duration;

use kaal_types::{DeviceId, RoomState};
use tracing::{debug, info};

use crate::event::{SimScheduler, TimerEvent};
use crate::scheduler::TimerId;

#[derive(Debug)]
pub struct RoomSequence {
    state: RoomState,
    reset_after: Duration,
    timer: Option<TimerId>,
}

impl RoomSequence {
    pub fn new(reset_after: Duration) -> Self {
        Self {
            state: RoomState::default(),
            reset_after,
            timer: None,
        }
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    /// Select `id`, or deselect it if it is the running system. Leaves
    /// all-systems mode either way.
    pub fn toggle(&mut self, id: impl Into<DeviceId>, scheduler: &mut SimScheduler) {
        let id = id.into();
        let active_system = if self.state.active_system.as_ref() == Some(&id) {
            None
        } else {
            Some(id)
        };
        self.set(
            RoomState {
                active_system,
                all_active: false,
            },
            scheduler,
        );
    }

    pub fn activate_all(&mut self, scheduler: &mut SimScheduler) {
        self.set(
            RoomState {
                active_system: None,
                all_active: true,
            },
            scheduler,
        );
    }

    /// Only a real change restarts the idle timer.
    fn set(&mut self, next: RoomState, scheduler: &mut SimScheduler) {
        if next == self.state {
            return;
        }
        self.cancel_timers(scheduler);
        self.state = next;
        if self.state.is_engaged() {
            self.timer = Some(scheduler.schedule_after(self.reset_after, TimerEvent::RoomReset));
        }
        debug!(system = ?self.state.active_system, all = self.state.all_active, "room changed");
    }

    pub fn on_timer(&mut self, event: TimerEvent) -> bool {
        if event != TimerEvent::RoomReset {
            return false;
        }
        self.timer = None;
        self.state = RoomState::default();
        info!("room back to standby");
        true
    }

    pub fn cancel_timers(&mut self, scheduler: &mut SimScheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
    }
}
