//! Results of guarded operations.
//!
//! The simulation never fails, but several operations are guarded by an
//! invariant (one fault at a time, one mode transition at a time, ...).
//! A guarded call that is refused changes nothing and queues nothing; it
//! reports which guard refused it so callers and tests can see it.

use kaal_types::{DeviceId, FaultKind, Mode};
use thiserror::Error;

/// Why a guarded operation was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("a {active} fault is already being handled")]
    FaultInProgress { active: FaultKind },

    #[error("no fault to reset")]
    NoActiveFault,

    #[error("already in {0} mode")]
    AlreadyInMode(Mode),

    #[error("mode transition to {target} already underway")]
    TransitionInProgress { target: Mode },

    #[error("{0} view is not mounted")]
    NotMounted(Mode),

    #[error("watchdog restart already in progress")]
    WatchdogRestarting,

    #[error("diagnostic already running")]
    DiagnosticRunning,

    #[error("safety protocol is latched; reset it first")]
    SafetyLatched,

    #[error("safety protocol is not triggered")]
    SafetyNotTriggered,

    #[error("{0} is switched off")]
    DeviceInactive(DeviceId),

    #[error("{0} has no level control")]
    NoLevelControl(DeviceId),
}

/// What happened to a guarded operation.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Applied => None,
            Outcome::Ignored(r) => Some(r),
        }
    }
}

impl From<Rejection> for Outcome {
    fn from(r: Rejection) -> Self {
        Outcome::Ignored(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_name_the_guard() {
        let r = Rejection::FaultInProgress {
            active: FaultKind::Current,
        };
        assert_eq!(r.to_string(), "a current fault is already being handled");
        assert_eq!(
            Rejection::AlreadyInMode(Mode::Commander).to_string(),
            "already in commander mode"
        );
    }

    #[test]
    fn outcome_accessors() {
        assert!(Outcome::Applied.is_applied());
        let ignored: Outcome = Rejection::DiagnosticRunning.into();
        assert!(!ignored.is_applied());
        assert_eq!(ignored.rejection(), Some(&Rejection::DiagnosticRunning));
    }
}
