//! Per-mode view bundles.
//!
//! Exactly one bundle is mounted at a time. Mounting builds fresh engines and
//! arms their repeating timers; unmounting cancels every timer the bundle owns,
//! so nothing from a hidden view can fire after a mode switch.

use kaal_types::{CommanderSnapshot, DevicePanel, EngineerSnapshot, Mode, ViewSnapshot};
use rand::Rng;
use tracing::debug;

use crate::console::SafetyConsole;
use crate::devices::DeviceToggleRegistry;
use crate::diagnostics::DiagnosticsMonitor;
use crate::event::{SimScheduler, TimerEvent};
use crate::fault::FaultInjectionEngine;
use crate::hologram::HologramProjector;
use crate::levels::EffectMixer;
use crate::room::RoomSequence;
use crate::settings::SimSettings;

/// Technical view: fault injection, diagnostics, the hologram and the
/// hardware panels.
#[derive(Debug)]
pub struct EngineerView {
    pub fault: FaultInjectionEngine,
    pub diagnostics: DiagnosticsMonitor,
    pub hologram: HologramProjector,
    pub environment: DeviceToggleRegistry,
    pub levels: EffectMixer,
    pub relays: DeviceToggleRegistry,
}

impl EngineerView {
    pub fn mount(settings: &SimSettings, scheduler: &mut SimScheduler) -> Self {
        let mut diagnostics =
            DiagnosticsMonitor::new(settings.diagnostics_interval(), settings.watchdog_restart());
        diagnostics.start(scheduler);
        let mut hologram = HologramProjector::new(settings.hologram_sync_interval());
        hologram.start(scheduler);
        Self {
            fault: FaultInjectionEngine::new(settings.fault_recovery_delay(), settings.fault_restore_delay()),
            diagnostics,
            hologram,
            environment: DeviceToggleRegistry::new(DevicePanel::Environment),
            levels: EffectMixer::new(),
            relays: DeviceToggleRegistry::new(DevicePanel::Relays),
        }
    }

    pub fn unmount(&mut self, scheduler: &mut SimScheduler) {
        self.fault.cancel_timers(scheduler);
        self.diagnostics.cancel_timers(scheduler);
        self.hologram.cancel_timers(scheduler);
    }

    fn on_timer<R: Rng + ?Sized>(&mut self, event: TimerEvent, scheduler: &mut SimScheduler, rng: &mut R) -> bool {
        self.fault.on_timer(event, scheduler)
            || self.diagnostics.on_timer(event, rng)
            || self.hologram.on_timer(event, rng)
    }

    pub fn snapshot(&self) -> EngineerSnapshot {
        EngineerSnapshot {
            fault: self.fault.state().clone(),
            diagnostics: self.diagnostics.reading().clone(),
            environment: self.environment.active().clone(),
            levels: self.levels.levels().clone(),
            relays: self.relays.active().clone(),
            hologram: self.hologram.state(),
        }
    }
}

/// Strategic view: safety console and room systems.
#[derive(Debug)]
pub struct CommanderView {
    pub console: SafetyConsole,
    pub room: RoomSequence,
}

impl CommanderView {
    pub fn mount(settings: &SimSettings) -> Self {
        Self {
            console: SafetyConsole::new(settings.diagnostic_run()),
            room: RoomSequence::new(settings.room_reset()),
        }
    }

    pub fn unmount(&mut self, scheduler: &mut SimScheduler) {
        self.console.cancel_timers(scheduler);
        self.room.cancel_timers(scheduler);
    }

    fn on_timer(&mut self, event: TimerEvent) -> bool {
        self.console.on_timer(event) || self.room.on_timer(event)
    }

    pub fn snapshot(&self) -> CommanderSnapshot {
        CommanderSnapshot {
            console: self.console.state(),
            room: self.room.state().clone(),
        }
    }
}

/// Whichever view bundle is currently mounted.
#[derive(Debug)]
pub enum MountedView {
    Engineer(EngineerView),
    Commander(CommanderView),
}

impl MountedView {
    pub fn mount(mode: Mode, settings: &SimSettings, scheduler: &mut SimScheduler) -> Self {
        debug!(%mode, "mounting view");
        match mode {
            Mode::Engineer => MountedView::Engineer(EngineerView::mount(settings, scheduler)),
            Mode::Commander => MountedView::Commander(CommanderView::mount(settings)),
        }
    }

    pub fn unmount(&mut self, scheduler: &mut SimScheduler) {
        debug!(mode = %self.mode(), "unmounting view");
        match self {
            MountedView::Engineer(view) => view.unmount(scheduler),
            MountedView::Commander(view) => view.unmount(scheduler),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            MountedView::Engineer(_) => Mode::Engineer,
            MountedView::Commander(_) => Mode::Commander,
        }
    }

    pub fn engineer_mut(&mut self) -> Option<&mut EngineerView> {
        match self {
            MountedView::Engineer(view) => Some(view),
            MountedView::Commander(_) => None,
        }
    }

    pub fn commander_mut(&mut self) -> Option<&mut CommanderView> {
        match self {
            MountedView::Commander(view) => Some(view),
            MountedView::Engineer(_) => None,
        }
    }

    /// The free-toggle registry backing `panel`, if this view owns it. The
    /// room is a sequence, not a registry.
    pub fn registry_mut(&mut self, panel: DevicePanel) -> Option<&mut DeviceToggleRegistry> {
        match (self, panel) {
            (MountedView::Engineer(view), DevicePanel::Environment) => Some(&mut view.environment),
            (MountedView::Engineer(view), DevicePanel::Relays) => Some(&mut view.relays),
            _ => None,
        }
    }

    pub fn on_timer<R: Rng + ?Sized>(&mut self, event: TimerEvent, scheduler: &mut SimScheduler, rng: &mut R) -> bool {
        match self {
            MountedView::Engineer(view) => view.on_timer(event, scheduler, rng),
            MountedView::Commander(view) => view.on_timer(event),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        match self {
            MountedView::Engineer(view) => ViewSnapshot::Engineer(view.snapshot()),
            MountedView::Commander(view) => ViewSnapshot::Commander(view.snapshot()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaal_types::FaultKind;

    #[test]
    fn engineer_unmount_cancels_all_view_timers() {
        let settings = SimSettings::default();
        let mut s = SimScheduler::new();
        let mut view = MountedView::mount(Mode::Engineer, &settings, &mut s);

        let engineer = view.engineer_mut().unwrap();
        let _ = engineer.fault.simulate_fault(Some(FaultKind::Temperature), &mut s);
        let _ = engineer.diagnostics.reset_watchdog(&mut s);
        // fault recovery, diagnostics tick, watchdog, hologram sync
        assert_eq!(s.pending(), 4);

        view.unmount(&mut s);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn commander_unmount_cancels_running_diagnostic() {
        let settings = SimSettings::default();
        let mut s = SimScheduler::new();
        let mut view = MountedView::mount(Mode::Commander, &settings, &mut s);
        assert_eq!(s.pending(), 0);

        let _ = view.commander_mut().unwrap().console.run_diagnostic(&mut s);
        assert_eq!(s.pending(), 1);
        view.unmount(&mut s);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn commander_unmount_cancels_room_reset() {
        let settings = SimSettings::default();
        let mut s = SimScheduler::new();
        let mut view = MountedView::mount(Mode::Commander, &settings, &mut s);

        view.commander_mut().unwrap().room.activate_all(&mut s);
        assert_eq!(s.pending(), 1);
        view.unmount(&mut s);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn commander_routes_room_reset() {
        let settings = SimSettings::default();
        let mut s = SimScheduler::new();
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let mut view = MountedView::mount(Mode::Commander, &settings, &mut s);

        view.commander_mut().unwrap().room.toggle("terrain", &mut s);
        let (_, event) = s.pop_due(settings.room_reset()).unwrap();
        assert!(view.on_timer(event, &mut s, &mut rng));
        assert!(!view.commander_mut().unwrap().room.state().is_engaged());
    }

    #[test]
    fn engineer_unmount_stops_hologram_sync() {
        let settings = SimSettings::default();
        let mut s = SimScheduler::new();
        let mut view = MountedView::mount(Mode::Engineer, &settings, &mut s);
        let engineer = view.engineer_mut().unwrap();
        assert!(engineer.hologram.state().active);

        view.unmount(&mut s);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn registries_belong_to_their_view() {
        let settings = SimSettings::default();
        let mut s = SimScheduler::new();
        let mut engineer = MountedView::mount(Mode::Engineer, &settings, &mut s);
        let mut commander = MountedView::mount(Mode::Commander, &settings, &mut s);

        assert!(engineer.registry_mut(DevicePanel::Relays).is_some());
        assert!(engineer.registry_mut(DevicePanel::Room).is_none());
        assert!(commander.registry_mut(DevicePanel::Room).is_none());
        assert!(commander.registry_mut(DevicePanel::Environment).is_none());
        assert!(commander.registry_mut(DevicePanel::LiveMap).is_none());
        assert_eq!(commander.snapshot().mode(), Mode::Commander);
    }
}
