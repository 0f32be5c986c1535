//! Timer events shared by every engine.

use crate::scheduler::Scheduler;

/// What a fired timer asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// Redraw the status strip.
    TelemetryTick,
    /// Finish the mode cross-fade.
    ModeCommit,
    /// Faulted -> Recovering.
    FaultRecover,
    /// Recovering -> Normal.
    FaultRestore,
    /// Step the diagnostics gauges.
    DiagnosticsTick,
    WatchdogRestored,
    DiagnosticComplete,
    /// Redraw the hologram sync figure.
    HologramSync,
    /// Room systems idle back to standby.
    RoomReset,
}

pub type SimScheduler = Scheduler<TimerEvent>;
