//! System monitor gauges and the watchdog timer.

use std::time::Duration;

use kaal_types::{DiagnosticsReading, WatchdogStatus};
use rand::Rng;
use tracing::{debug, info};

use crate::event::{SimScheduler, TimerEvent};
use crate::outcome::{Outcome, Rejection};
use crate::scheduler::TimerId;

/// Step size and band of a random-walk gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeBand {
    pub step: f64,
    pub low: f64,
    pub high: f64,
}

impl GaugeBand {
    pub const POWER: Self = Self::new(1.5, 55.0, 85.0);
    pub const CURRENT: Self = Self::new(0.1, 2.8, 4.0);
    pub const TEMPERATURE: Self = Self::new(1.0, 38.0, 52.0);
    pub const RELAY_RESPONSE: Self = Self::new(2.0, 20.0, 45.0);

    const fn new(step: f64, low: f64, high: f64) -> Self {
        Self { step, low, high }
    }

    fn walk<R: Rng + ?Sized>(&self, value: f64, rng: &mut R) -> f64 {
        (value + rng.gen_range(-self.step..=self.step)).clamp(self.low, self.high)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

#[derive(Debug)]
pub struct DiagnosticsMonitor {
    reading: DiagnosticsReading,
    interval: Duration,
    restart_delay: Duration,
    tick_timer: Option<TimerId>,
    watchdog_timer: Option<TimerId>,
}

impl DiagnosticsMonitor {
    pub fn new(interval: Duration, restart_delay: Duration) -> Self {
        Self {
            reading: DiagnosticsReading::initial(),
            interval,
            restart_delay,
            tick_timer: None,
            watchdog_timer: None,
        }
    }

    pub fn reading(&self) -> &DiagnosticsReading {
        &self.reading
    }

    pub fn start(&mut self, scheduler: &mut SimScheduler) {
        if self.tick_timer.is_none() {
            self.tick_timer = Some(scheduler.schedule_every(self.interval, TimerEvent::DiagnosticsTick));
        }
    }

    /// Step every gauge once.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let r = &mut self.reading;
        r.power = GaugeBand::POWER.walk(r.power, rng);
        r.current_draw = GaugeBand::CURRENT.walk(r.current_draw, rng);
        r.temperature = GaugeBand::TEMPERATURE.walk(r.temperature, rng);
        r.relay_response = GaugeBand::RELAY_RESPONSE.walk(r.relay_response, rng);
        debug!(
            power = r.power,
            current = r.current_draw,
            temperature = r.temperature,
            relay = r.relay_response,
            "diagnostics tick"
        );
    }

    /// Restart the watchdog; it comes back after the restart delay.
    pub fn reset_watchdog(&mut self, scheduler: &mut SimScheduler) -> Outcome {
        if self.reading.watchdog == WatchdogStatus::Restarting {
            return Rejection::WatchdogRestarting.into();
        }
        self.reading.watchdog = WatchdogStatus::Restarting;
        self.watchdog_timer = Some(scheduler.schedule_after(self.restart_delay, TimerEvent::WatchdogRestored));
        info!("watchdog restarting");
        Outcome::Applied
    }

    /// Handle a fired diagnostics timer. Returns false for events it does not own.
    pub fn on_timer<R: Rng + ?Sized>(&mut self, event: TimerEvent, rng: &mut R) -> bool {
        match event {
            TimerEvent::DiagnosticsTick => {
                self.tick(rng);
                true
            }
            TimerEvent::WatchdogRestored => {
                self.watchdog_timer = None;
                self.reading.watchdog = WatchdogStatus::Active;
                info!("watchdog active");
                true
            }
            _ => false,
        }
    }

    pub fn cancel_timers(&mut self, scheduler: &mut SimScheduler) {
        for id in [self.tick_timer.take(), self.watchdog_timer.take()].into_iter().flatten() {
            scheduler.cancel(id);
        }
    }
}
