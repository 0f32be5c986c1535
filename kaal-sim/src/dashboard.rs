//! The dashboard state machine.
//!
//! A [`Dashboard`] owns the model clock, the shell engines that stay mounted
//! in both modes (status strip, mode controller, live map) and whichever view
//! bundle is current. It is driven from outside by [`Dashboard::advance_to`],
//! which fires due timers one at a time, and mutated by [`Dashboard::apply`].
//! Between those calls its state is consistent and [`Dashboard::snapshot`]
//! captures it.

use std::time::Duration;

use kaal_types::{DashboardSnapshot, DeviceId, DevicePanel, FaultKind, Mode, SchemaVersion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::devices::DeviceToggleRegistry;
use crate::event::{SimScheduler, TimerEvent};
use crate::mode::ModeController;
use crate::notify::{Notice, Notifier};
use crate::outcome::{Outcome, Rejection};
use crate::settings::{SettingsError, SimSettings};
use crate::telemetry::TelemetrySimulator;
use crate::view::MountedView;

/// An operator action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RequestMode(Mode),
    /// Inject a fault, or with `None` reset the active one.
    SimulateFault(Option<FaultKind>),
    ToggleDevice { panel: DevicePanel, id: DeviceId },
    /// Set an environmental effect's intensity; values above 100 are clamped.
    SetLevel { device: DeviceId, level: u8 },
    ToggleHologram,
    /// Bring every room system up at once.
    ActivateRoom,
    ResetWatchdog,
    RunDiagnostic,
    TriggerSafety,
    ResetSafety,
}

impl Command {
    pub fn toggle(panel: DevicePanel, id: impl Into<DeviceId>) -> Self {
        Command::ToggleDevice { panel, id: id.into() }
    }
}

pub struct Dashboard {
    settings: SimSettings,
    seed: u64,
    scheduler: SimScheduler,
    rng: ChaCha8Rng,
    telemetry: TelemetrySimulator,
    modes: ModeController,
    live_map: DeviceToggleRegistry,
    view: MountedView,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("now", &self.scheduler.now())
            .field("seed", &self.seed)
            .field("mode", &self.modes.current())
            .field("pending_timers", &self.scheduler.pending())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Build a dashboard at model time zero with the initial view mounted.
    pub fn new(settings: SimSettings, notifier: impl Notifier + 'static) -> Result<Self, SettingsError> {
        settings.validate()?;

        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut scheduler = SimScheduler::new();

        let mut telemetry = TelemetrySimulator::standard(
            settings.telemetry_update_probability,
            settings.telemetry_interval(),
        );
        telemetry.start(&mut scheduler);

        let modes = ModeController::new(settings.initial_mode, settings.mode_transition());
        let view = MountedView::mount(settings.initial_mode, &settings, &mut scheduler);

        info!(seed, mode = %settings.initial_mode, "dashboard started");

        Ok(Self {
            seed,
            scheduler,
            rng: ChaCha8Rng::seed_from_u64(seed),
            telemetry,
            modes,
            live_map: DeviceToggleRegistry::new(DevicePanel::LiveMap),
            view,
            notifier: Box::new(notifier),
            settings,
        })
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// The seed actually used, including one drawn at startup.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Fire every timer due at or before `until`, then move the clock there.
    ///
    /// Returns how many timers fired.
    pub fn advance_to(&mut self, until: Duration) -> usize {
        let mut fired = 0;
        while let Some((_, event)) = self.scheduler.pop_due(until) {
            self.on_timer(event);
            fired += 1;
        }
        self.scheduler.advance_clock(until);
        fired
    }

    pub fn advance_by(&mut self, delta: Duration) -> usize {
        self.advance_to(self.now() + delta)
    }

    fn on_timer(&mut self, event: TimerEvent) {
        trace!(?event, now = ?self.scheduler.now(), "timer fired");
        match event {
            TimerEvent::TelemetryTick => {
                self.telemetry.tick(&mut self.rng);
            }
            TimerEvent::ModeCommit => self.commit_mode(),
            other => {
                if !self.view.on_timer(other, &mut self.scheduler, &mut self.rng) {
                    debug!(event = ?other, "timer for unmounted view ignored");
                }
            }
        }
    }

    /// Swap view bundles as part of the commit callback.
    fn commit_mode(&mut self) {
        let Some(mode) = self.modes.commit() else {
            return;
        };
        self.view.unmount(&mut self.scheduler);
        self.view = MountedView::mount(mode, &self.settings, &mut self.scheduler);
        self.notifier.notify(Notice::mode_committed(mode));
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        let outcome = self.dispatch(command.clone());
        match &outcome {
            Outcome::Applied => debug!(?command, "command applied"),
            Outcome::Ignored(reason) => debug!(?command, %reason, "command ignored"),
        }
        outcome
    }

    fn dispatch(&mut self, command: Command) -> Outcome {
        let scheduler = &mut self.scheduler;
        match command {
            Command::RequestMode(target) => self.modes.request_mode(target, scheduler),
            Command::ToggleDevice {
                panel: DevicePanel::LiveMap,
                id,
            } => {
                self.live_map.toggle(id);
                Outcome::Applied
            }
            Command::ToggleDevice {
                panel: DevicePanel::Room,
                id,
            } => match self.view.commander_mut() {
                Some(view) => {
                    view.room.toggle(id, scheduler);
                    Outcome::Applied
                }
                None => Rejection::NotMounted(Mode::Commander).into(),
            },
            Command::ToggleDevice { panel, id } => match self.view.registry_mut(panel) {
                Some(registry) => {
                    registry.toggle(id);
                    Outcome::Applied
                }
                // The remaining panels belong to the engineer view.
                None => Rejection::NotMounted(Mode::Engineer).into(),
            },
            Command::SetLevel { device, level } => match self.view.engineer_mut() {
                Some(view) => view.levels.set_level(device, level, &view.environment),
                None => Rejection::NotMounted(Mode::Engineer).into(),
            },
            Command::ToggleHologram => match self.view.engineer_mut() {
                Some(view) => {
                    view.hologram.toggle(scheduler);
                    Outcome::Applied
                }
                None => Rejection::NotMounted(Mode::Engineer).into(),
            },
            Command::ActivateRoom => match self.view.commander_mut() {
                Some(view) => {
                    view.room.activate_all(scheduler);
                    Outcome::Applied
                }
                None => Rejection::NotMounted(Mode::Commander).into(),
            },
            Command::SimulateFault(kind) => match self.view.engineer_mut() {
                Some(view) => view.fault.simulate_fault(kind, scheduler),
                None => Rejection::NotMounted(Mode::Engineer).into(),
            },
            Command::ResetWatchdog => match self.view.engineer_mut() {
                Some(view) => view.diagnostics.reset_watchdog(scheduler),
                None => Rejection::NotMounted(Mode::Engineer).into(),
            },
            Command::RunDiagnostic => match self.view.commander_mut() {
                Some(view) => view.console.run_diagnostic(scheduler),
                None => Rejection::NotMounted(Mode::Commander).into(),
            },
            Command::TriggerSafety => match self.view.commander_mut() {
                Some(view) => {
                    let outcome = view.console.trigger_safety(scheduler);
                    if outcome.is_applied() {
                        self.notifier.notify(Notice::SafetyTriggered);
                    }
                    outcome
                }
                None => Rejection::NotMounted(Mode::Commander).into(),
            },
            Command::ResetSafety => match self.view.commander_mut() {
                Some(view) => {
                    let outcome = view.console.reset_safety();
                    if outcome.is_applied() {
                        self.notifier.notify(Notice::SafetyReset);
                    }
                    outcome
                }
                None => Rejection::NotMounted(Mode::Commander).into(),
            },
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            version: SchemaVersion::current(),
            at: self.scheduler.now().into(),
            mode: self.modes.current(),
            transitioning: self.modes.is_transitioning(),
            status_bar: self.telemetry.readings().clone(),
            live_map: self.live_map.active().clone(),
            view: self.view.snapshot(),
        }
    }

    /// Cancel every outstanding timer. The dashboard stays readable.
    pub fn shutdown(&mut self) {
        self.telemetry.stop(&mut self.scheduler);
        self.modes.cancel(&mut self.scheduler);
        self.view.unmount(&mut self.scheduler);
        let stray = self.scheduler.cancel_all();
        if stray > 0 {
            debug!(stray, "cancelled untracked timers");
        }
        info!(now = ?self.scheduler.now(), "dashboard shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use kaal_types::{FaultPhase, FaultState, WatchdogStatus};

    fn settings() -> SimSettings {
        SimSettings {
            seed: Some(42),
            ..SimSettings::default()
        }
    }

    fn dashboard() -> (Dashboard, RecordingNotifier) {
        let recorder = RecordingNotifier::new();
        let dashboard = Dashboard::new(settings(), recorder.clone()).unwrap();
        (dashboard, recorder)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_in_engineer_mode_with_shell_and_view_timers() {
        let (dashboard, _) = dashboard();
        let snap = dashboard.snapshot();
        assert_eq!(snap.mode, Mode::Engineer);
        assert!(!snap.transitioning);
        assert_eq!(snap.status_bar.len(), 7);
        assert!(snap.engineer().is_some());
        // telemetry tick, diagnostics tick, hologram sync
        assert_eq!(dashboard.pending_timers(), 3);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let bad = SimSettings {
            telemetry_interval_ms: 0,
            ..SimSettings::default()
        };
        assert!(Dashboard::new(bad, RecordingNotifier::new()).is_err());
    }

    #[test]
    fn mode_switch_swaps_views_at_commit() {
        let (mut dashboard, recorder) = dashboard();
        assert!(dashboard.apply(Command::RequestMode(Mode::Commander)).is_applied());

        dashboard.advance_to(ms(499));
        let snap = dashboard.snapshot();
        assert!(snap.transitioning);
        assert_eq!(snap.mode, Mode::Engineer);
        assert!(snap.engineer().is_some());

        dashboard.advance_to(ms(500));
        let snap = dashboard.snapshot();
        assert!(!snap.transitioning);
        assert_eq!(snap.mode, Mode::Commander);
        assert!(snap.commander().is_some());
        assert_eq!(recorder.notices(), vec![Notice::mode_committed(Mode::Commander)]);
    }

    #[test]
    fn second_request_during_transition_is_ignored() {
        let (mut dashboard, recorder) = dashboard();
        assert!(dashboard.apply(Command::RequestMode(Mode::Commander)).is_applied());

        dashboard.advance_to(ms(200));
        assert_eq!(
            dashboard.apply(Command::RequestMode(Mode::Engineer)),
            Outcome::Ignored(Rejection::TransitionInProgress {
                target: Mode::Commander
            })
        );

        dashboard.advance_to(ms(500));
        let snap = dashboard.snapshot();
        assert_eq!(snap.mode, Mode::Commander);
        assert!(!snap.transitioning);
        assert!(snap.commander().is_some());
        assert_eq!(recorder.notices(), vec![Notice::mode_committed(Mode::Commander)]);

        // No second commit is waiting to flip the mode back.
        dashboard.advance_to(ms(5000));
        assert_eq!(dashboard.mode(), Mode::Commander);
        assert_eq!(recorder.notices().len(), 1);
    }

    #[test]
    fn unmounting_leaves_only_shell_timers() {
        let (mut dashboard, _) = dashboard();
        let _ = dashboard.apply(Command::SimulateFault(Some(FaultKind::Temperature)));
        let _ = dashboard.apply(Command::ResetWatchdog);
        let _ = dashboard.apply(Command::RequestMode(Mode::Commander));
        assert_eq!(dashboard.pending_timers(), 6);

        dashboard.advance_to(ms(500));
        // Only the telemetry tick survives; the commander view arms nothing.
        assert_eq!(dashboard.pending_timers(), 1);
        assert_eq!(dashboard.next_deadline(), Some(ms(5000)));
    }

    #[test]
    fn fault_lifecycle_end_to_end() {
        let (mut dashboard, _) = dashboard();
        let _ = dashboard.apply(Command::SimulateFault(Some(FaultKind::Current)));

        let fault = |d: &Dashboard| d.snapshot().engineer().unwrap().fault.clone();
        assert_eq!(fault(&dashboard).phase, FaultPhase::Faulted);

        dashboard.advance_to(ms(3000));
        assert_eq!(fault(&dashboard).phase, FaultPhase::Recovering);

        dashboard.advance_to(ms(8000));
        assert_eq!(fault(&dashboard), FaultState::normal());
    }

    #[test]
    fn fault_state_is_fresh_after_round_trip() {
        let (mut dashboard, _) = dashboard();
        let _ = dashboard.apply(Command::SimulateFault(Some(FaultKind::Voltage)));
        let _ = dashboard.apply(Command::RequestMode(Mode::Commander));
        dashboard.advance_by(ms(500));
        let _ = dashboard.apply(Command::RequestMode(Mode::Engineer));
        dashboard.advance_by(ms(500));

        let snap = dashboard.snapshot();
        assert_eq!(snap.engineer().unwrap().fault, FaultState::normal());

        // The aborted fault's timers never fire into the new view.
        dashboard.advance_to(ms(20_000));
        assert_eq!(dashboard.snapshot().engineer().unwrap().fault, FaultState::normal());
    }

    #[test]
    fn commands_for_hidden_view_are_rejected() {
        let (mut dashboard, recorder) = dashboard();
        assert_eq!(
            dashboard.apply(Command::TriggerSafety),
            Outcome::Ignored(Rejection::NotMounted(Mode::Commander))
        );
        assert_eq!(
            dashboard.apply(Command::toggle(DevicePanel::Room, "fog")),
            Outcome::Ignored(Rejection::NotMounted(Mode::Commander))
        );
        assert!(recorder.notices().is_empty());
    }

    #[test]
    fn live_map_toggles_in_both_modes() {
        let (mut dashboard, _) = dashboard();
        assert!(dashboard.apply(Command::toggle(DevicePanel::LiveMap, "fog")).is_applied());
        let _ = dashboard.apply(Command::RequestMode(Mode::Commander));
        dashboard.advance_by(ms(500));
        assert!(dashboard.apply(Command::toggle(DevicePanel::LiveMap, "led")).is_applied());

        let live_map = dashboard.snapshot().live_map;
        assert!(live_map.contains(&DeviceId::from("fog")));
        assert!(!live_map.contains(&DeviceId::from("led")));
    }

    fn commander() -> Dashboard {
        let mut settings = settings();
        settings.initial_mode = Mode::Commander;
        Dashboard::new(settings, RecordingNotifier::new()).unwrap()
    }

    #[test]
    fn room_runs_one_system_then_resets() {
        let mut dashboard = commander();
        let room = |d: &Dashboard| d.snapshot().commander().unwrap().room.clone();

        assert!(dashboard.apply(Command::toggle(DevicePanel::Room, "fog")).is_applied());
        assert!(dashboard.apply(Command::toggle(DevicePanel::Room, "terrain")).is_applied());
        assert_eq!(room(&dashboard).active_system, Some(DeviceId::from("terrain")));

        dashboard.advance_to(ms(4000));
        assert!(dashboard.apply(Command::ActivateRoom).is_applied());
        let lit = dashboard.snapshot().devices(DevicePanel::Room).unwrap();
        assert_eq!(lit.len(), DevicePanel::Room.devices().len());

        // Activating all re-armed the idle timer at 4s.
        dashboard.advance_to(ms(13_999));
        assert!(room(&dashboard).all_active);
        dashboard.advance_to(ms(14_000));
        assert!(!room(&dashboard).is_engaged());
    }

    #[test]
    fn leaving_commander_cancels_room_reset() {
        let mut dashboard = commander();
        let _ = dashboard.apply(Command::ActivateRoom);
        let _ = dashboard.apply(Command::RequestMode(Mode::Engineer));
        dashboard.advance_to(ms(500));
        // telemetry, diagnostics, hologram; no room reset left behind
        assert_eq!(dashboard.pending_timers(), 3);
        assert_eq!(
            dashboard.apply(Command::ActivateRoom),
            Outcome::Ignored(Rejection::NotMounted(Mode::Commander))
        );
    }

    #[test]
    fn hologram_sync_stops_while_off() {
        let (mut dashboard, _) = dashboard();
        let hologram = |d: &Dashboard| d.snapshot().engineer().unwrap().hologram;

        dashboard.advance_to(ms(9000));
        assert!((94..=99).contains(&hologram(&dashboard).sync_percentage));

        assert!(dashboard.apply(Command::ToggleHologram).is_applied());
        let frozen = hologram(&dashboard);
        assert!(!frozen.active);
        assert_eq!(dashboard.pending_timers(), 2);

        dashboard.advance_to(ms(30_000));
        assert_eq!(hologram(&dashboard), frozen);

        let _ = dashboard.apply(Command::ToggleHologram);
        assert!(hologram(&dashboard).active);
        assert_eq!(dashboard.pending_timers(), 3);
    }

    #[test]
    fn levels_follow_environment_switches() {
        let (mut dashboard, _) = dashboard();
        let level = |d: &Dashboard, id: &str| d.snapshot().engineer().unwrap().levels.get(id).copied();

        assert_eq!(
            dashboard.apply(Command::SetLevel {
                device: "fog".into(),
                level: 80
            }),
            Outcome::Ignored(Rejection::DeviceInactive("fog".into()))
        );
        assert_eq!(level(&dashboard, "fog"), Some(50));

        let _ = dashboard.apply(Command::toggle(DevicePanel::Environment, "fog"));
        assert!(dashboard
            .apply(Command::SetLevel {
                device: "fog".into(),
                level: 180
            })
            .is_applied());
        assert_eq!(level(&dashboard, "fog"), Some(100));

        let _ = dashboard.apply(Command::RequestMode(Mode::Commander));
        dashboard.advance_to(ms(500));
        assert_eq!(
            dashboard.apply(Command::SetLevel {
                device: "led".into(),
                level: 10
            }),
            Outcome::Ignored(Rejection::NotMounted(Mode::Engineer))
        );
    }

    #[test]
    fn safety_latch_notifies() {
        let mut settings = settings();
        settings.initial_mode = Mode::Commander;
        let recorder = RecordingNotifier::new();
        let mut dashboard = Dashboard::new(settings, recorder.clone()).unwrap();

        let _ = dashboard.apply(Command::RunDiagnostic);
        assert!(dashboard.apply(Command::TriggerSafety).is_applied());
        assert!(!dashboard.apply(Command::TriggerSafety).is_applied());
        assert!(dashboard.apply(Command::ResetSafety).is_applied());

        assert_eq!(recorder.notices(), vec![Notice::SafetyTriggered, Notice::SafetyReset]);
        assert!(!dashboard.snapshot().commander().unwrap().console.diagnostic_running);
    }

    #[test]
    fn watchdog_returns_after_restart_delay() {
        let (mut dashboard, _) = dashboard();
        let _ = dashboard.apply(Command::ResetWatchdog);
        let watchdog = |d: &Dashboard| d.snapshot().engineer().unwrap().diagnostics.watchdog;

        dashboard.advance_to(ms(1999));
        assert_eq!(watchdog(&dashboard), WatchdogStatus::Restarting);
        dashboard.advance_to(ms(2000));
        assert_eq!(watchdog(&dashboard), WatchdogStatus::Active);
    }

    #[test]
    fn same_seed_same_history() {
        let (mut a, _) = dashboard();
        let (mut b, _) = dashboard();
        a.advance_to(ms(120_000));
        b.advance_to(ms(120_000));
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn shutdown_cancels_everything() {
        let (mut dashboard, _) = dashboard();
        let _ = dashboard.apply(Command::SimulateFault(Some(FaultKind::Temperature)));
        let _ = dashboard.apply(Command::RequestMode(Mode::Commander));
        dashboard.shutdown();
        assert_eq!(dashboard.pending_timers(), 0);
        assert_eq!(dashboard.advance_to(ms(60_000)), 0);
    }
}
